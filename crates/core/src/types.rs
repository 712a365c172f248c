use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Site owner/operator record, consumed by templates and structured data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: Author,
    pub url: String,
    pub icon: String,
    pub contact_email: String,
}

/// Author information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub url: String,
    pub image: String,
    pub email: String,
    pub description: String,
    pub job_title: String,
}

/// Semantic color, shared by project tags and theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Error,
    Neutral,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Primary,
        Color::Secondary,
        Color::Success,
        Color::Info,
        Color::Warning,
        Color::Error,
        Color::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Primary => "primary",
            Color::Secondary => "secondary",
            Color::Success => "success",
            Color::Info => "info",
            Color::Warning => "warning",
            Color::Error => "error",
            Color::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown color '{}'", s))
    }
}

/// Tag attached to a project card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTag {
    pub id: String,
    pub name: String,
    pub color: Color,
}

/// Portfolio project entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Catalog-assigned id, unique within its catalog
    pub id: u32,
    pub title: String,
    pub description: String,
    pub tags: Vec<ProjectTag>,
    pub image_url: String,
    pub link: String,
}

/// Where a project image is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Local,
    Remote,
}

impl ProjectEntry {
    pub fn image_source(&self) -> ImageSource {
        if is_absolute_url(&self.image_url) {
            ImageSource::Remote
        } else {
            ImageSource::Local
        }
    }

    /// Case-insensitive tag lookup
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Get a URL-safe slug from the title
    pub fn slug(&self) -> String {
        self.title
            .trim()
            .to_lowercase()
            .replace(char::is_whitespace, "-")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-')
            .collect()
    }
}

pub(crate) fn is_absolute_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Which content schema the collection is checked against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    #[default]
    Base,
    Extended,
}

/// Pass-through settings for the markdown build pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub highlight_langs: Vec<String>,
    pub toc_depth: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub content_dir: PathBuf,
    pub schema: SchemaVariant,
    /// Fail on duplicate catalog ids instead of reassigning them
    #[serde(default)]
    pub strict_ids: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            highlight_langs: ["js", "python", "html", "go"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            toc_depth: 3,
            preset: None,
            content_dir: PathBuf::from("content/blog"),
            schema: SchemaVariant::Base,
            strict_ids: false,
        }
    }
}

impl BuildConfig {
    pub fn highlights(&self, lang: &str) -> bool {
        self.highlight_langs
            .iter()
            .any(|l| l.eq_ignore_ascii_case(lang))
    }
}

/// A validated markdown content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub date: String,
    pub title: String,
    pub description: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawbody: Option<String>,
    /// Markdown body following the front-matter
    #[serde(default)]
    pub body: String,
    /// Front-matter keys the schema does not describe
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Author byline fields carried by extended entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCard {
    pub name: String,
    pub avatar: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(image_url: &str) -> ProjectEntry {
        ProjectEntry {
            id: 1,
            title: " Dashboard Interactivo ".to_string(),
            description: "d".to_string(),
            tags: vec![ProjectTag {
                id: "1".to_string(),
                name: "Vue".to_string(),
                color: Color::Primary,
            }],
            image_url: image_url.to_string(),
            link: "https://example.com/".to_string(),
        }
    }

    #[test]
    fn test_image_source() {
        assert_eq!(entry("./dash.png").image_source(), ImageSource::Local);
        assert_eq!(entry("/dash.png").image_source(), ImageSource::Local);
        assert_eq!(
            entry("https://cdn.example.com/x.png").image_source(),
            ImageSource::Remote
        );
    }

    #[test]
    fn test_slug_and_tags() {
        let e = entry("./dash.png");
        assert_eq!(e.slug(), "dashboard-interactivo");
        assert!(e.has_tag("vue"));
        assert!(!e.has_tag("nuxt"));
    }

    #[test]
    fn test_color_from_str() {
        assert_eq!("Primary".parse::<Color>().unwrap(), Color::Primary);
        assert_eq!("error".parse::<Color>().unwrap(), Color::Error);
        assert!("purple".parse::<Color>().is_err());
    }

    #[test]
    fn test_build_defaults() {
        let build = BuildConfig::default();
        assert!(build.highlights("Go"));
        assert!(!build.highlights("rust"));
        assert_eq!(build.toc_depth, 3);
    }
}
