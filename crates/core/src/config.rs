use crate::error::{Error, Result};
use crate::schema::{ContentSchema, FieldSpec};
use crate::theme::Theme;
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Typed site configuration loaded from folio.toml
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub metadata: SiteMetadata,
    pub theme: Theme,
    pub build: BuildConfig,
    pub schema: ContentSchema,
}

/// Raw TOML configuration structure
/// This matches the folio.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    author: RawAuthor,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    build: RawBuild,
    #[serde(default)]
    schema: Option<RawSchema>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    id: String,
    name: String,
    description: String,
    url: String,
    icon: String,
    contact_email: String,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: String,
    url: String,
    image: String,
    email: String,
    description: String,
    job_title: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawBuild {
    highlight_langs: Option<Vec<String>>,
    toc_depth: Option<u8>,
    preset: Option<String>,
    content_dir: Option<String>, // Convert to PathBuf
    schema: Option<SchemaVariant>,
    strict_ids: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    field: Vec<FieldSpec>,
}

/// Parse folio.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_site_toml_str(&content).map_err(|e| Error::in_file(path, e))
}

/// Parse folio.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    require_non_empty(&raw.site.id, "site.id")?;
    require_non_empty(&raw.site.name, "site.name")?;
    require_non_empty(&raw.author.name, "author.name")?;
    require_email(&raw.site.contact_email, "site.contact_email")?;
    require_email(&raw.author.email, "author.email")?;
    require_url(&raw.site.url, "site.url")?;

    let metadata = SiteMetadata {
        id: raw.site.id,
        name: raw.site.name,
        description: raw.site.description,
        author: Author {
            name: raw.author.name,
            url: raw.author.url,
            image: raw.author.image,
            email: raw.author.email,
            description: raw.author.description,
            job_title: raw.author.job_title,
        },
        url: raw.site.url,
        icon: raw.site.icon,
        contact_email: raw.site.contact_email,
    };

    validate_theme(&raw.theme)?;

    let build = convert_build(raw.build)?;

    let schema = match raw.schema {
        Some(schema) => ContentSchema::from_fields(schema.field)
            .map_err(|e| Error::ConfigParse(format!("schema: {}", e)))?,
        None => ContentSchema::for_variant(build.schema),
    };

    Ok(SiteConfig {
        metadata,
        theme: raw.theme,
        build,
        schema,
    })
}

fn convert_build(raw: RawBuild) -> Result<BuildConfig> {
    let defaults = BuildConfig::default();

    let toc_depth = raw.toc_depth.unwrap_or(defaults.toc_depth);
    if !(1..=6).contains(&toc_depth) {
        return Err(Error::ConfigParse(format!(
            "build.toc_depth must be between 1 and 6, got {}",
            toc_depth
        )));
    }

    let highlight_langs = match raw.highlight_langs {
        Some(langs) => langs
            .iter()
            .map(|lang| normalize_lang(lang))
            .collect::<Result<Vec<_>>>()?,
        None => defaults.highlight_langs,
    };

    let content_dir = match raw.content_dir {
        Some(dir) => validate_path(&dir, "build.content_dir")?,
        None => defaults.content_dir,
    };

    Ok(BuildConfig {
        highlight_langs,
        toc_depth,
        preset: raw.preset.filter(|p| !p.trim().is_empty()),
        content_dir,
        schema: raw.schema.unwrap_or_default(),
        strict_ids: raw.strict_ids.unwrap_or(defaults.strict_ids),
    })
}

fn normalize_lang(lang: &str) -> Result<String> {
    let lang = lang.trim().to_lowercase();
    let valid = !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#'));
    if !valid {
        return Err(Error::ConfigParse(format!(
            "Invalid language '{}' in 'build.highlight_langs'",
            lang
        )));
    }
    Ok(lang)
}

fn validate_theme(theme: &Theme) -> Result<()> {
    for key in theme.colors.keys() {
        key.parse::<Color>()
            .map_err(|e| Error::ConfigParse(format!("theme.colors: {}", e)))?;
    }
    for (i, cv) in theme.compound_variants.iter().enumerate() {
        if !theme.components.contains_key(&cv.component) {
            tracing::warn!(
                "theme.compound_variants[{}] targets component '{}' with no base slots",
                i,
                cv.component
            );
        }
    }
    Ok(())
}

fn require_non_empty(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "'{}' must not be empty",
            field_name
        )));
    }
    Ok(())
}

fn require_url(value: &str, field_name: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| Error::ConfigParse(format!("Invalid URL in '{}': {}", field_name, e)))
}

fn require_email(value: &str, field_name: &str) -> Result<()> {
    if !is_valid_email(value) {
        return Err(Error::ConfigParse(format!(
            "Invalid email in '{}': '{}'",
            field_name, value
        )));
    }
    Ok(())
}

/// Basic shape check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
        return false;
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return false;
    }
    !email.chars().any(char::is_whitespace)
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references so a config
/// file cannot point outside the site directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Variant;

    const MINIMAL: &str = r##"
[site]
id = "portafolio_raulanto"
name = "raulantoDev"
description = "Portafolio de Raul Anto"
url = "https://github.com/raulanto"
icon = "/icon.svg"
contact_email = "raulantodev@gmail.com"

[author]
name = "Raul Antonio"
url = "https://github.com/raulanto"
image = "https://avatars.githubusercontent.com/u/31132987?v=4"
email = "raulantodev@gmail.com"
description = "Desarrollador Full Stack"
job_title = "raulantoDev"
"##;

    fn with(extra: &str) -> String {
        format!("{}\n{}", MINIMAL, extra)
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(config.metadata.id, "portafolio_raulanto");
        assert_eq!(config.metadata.author.job_title, "raulantoDev");
        assert_eq!(config.build, BuildConfig::default());
        assert_eq!(config.schema, ContentSchema::base());
        assert!(config.theme.components.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = with(
            r##"
[theme.colors]
primary = "blue"
neutral = "zinc"

[theme.components.card]
body = "flex flex-col gap-2"

[theme.components.formField]
container = "flex flex-col gap-2"
help = "m-0"

[[theme.compound_variants]]
component = "card"
color = "primary"
variant = "soft"
slots = { body = "bg-primary/10" }

[build]
highlight_langs = ["JS", "python", "html", "go", "rust"]
toc_depth = 2
preset = "vercel"
content_dir = "content/posts"
schema = "extended"
"##,
        );
        let config = parse_site_toml_str(&toml).unwrap();
        assert_eq!(
            config.build.highlight_langs,
            vec!["js", "python", "html", "go", "rust"]
        );
        assert_eq!(config.build.toc_depth, 2);
        assert_eq!(config.build.preset.as_deref(), Some("vercel"));
        assert_eq!(config.build.content_dir, PathBuf::from("content/posts"));
        assert_eq!(config.schema, ContentSchema::extended());
        assert_eq!(
            config
                .theme
                .resolve("card", "body", Color::Primary, Variant::Soft),
            "flex flex-col gap-2 bg-primary/10"
        );
        assert_eq!(config.theme.slot_class("formField", "help"), Some("m-0"));
    }

    #[test]
    fn test_custom_schema_fields() {
        let toml = with(
            r##"
[[schema.field]]
name = "date"
type = "string"

[[schema.field]]
name = "title"
type = "string"

[[schema.field]]
name = "description"
type = "string"

[[schema.field]]
name = "name"
type = "string"

[[schema.field]]
name = "series"
required = false
type = "string"
"##,
        );
        let config = parse_site_toml_str(&toml).unwrap();
        assert!(config.schema.field("series").is_some());
        assert!(config.schema.field("tags").is_none());
    }

    #[test]
    fn test_strict_ids_flag() {
        let config = parse_site_toml_str(&with("[build]\nstrict_ids = true\n")).unwrap();
        assert!(config.build.strict_ids);
    }

    #[test]
    fn test_file_errors_name_the_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, with("[build]\ntoc_depth = 0\n")).unwrap();

        let err = parse_site_toml(&path).unwrap_err();
        assert!(err.to_string().contains("folio.toml: "));
        assert!(err.to_string().contains("build.toc_depth"));
        assert!(matches!(err.cause(), Error::ConfigParse(_)));
    }

    #[test]
    fn test_rejects_bad_toc_depth() {
        let err = parse_site_toml_str(&with("[build]\ntoc_depth = 9\n")).unwrap_err();
        assert!(err.to_string().contains("build.toc_depth"));
        let err = parse_site_toml_str(&with("[build]\ntoc_depth = 0\n")).unwrap_err();
        assert!(err.to_string().contains("build.toc_depth"));
    }

    #[test]
    fn test_rejects_bad_language() {
        let err =
            parse_site_toml_str(&with("[build]\nhighlight_langs = [\"java script\"]\n")).unwrap_err();
        assert!(err.to_string().contains("build.highlight_langs"));
    }

    #[test]
    fn test_rejects_unknown_theme_color() {
        let err = parse_site_toml_str(&with("[theme.colors]\npurple = \"violet\"\n")).unwrap_err();
        assert!(err.to_string().contains("theme.colors"));
    }

    #[test]
    fn test_rejects_bad_contact_email() {
        let toml = MINIMAL.replace(
            "contact_email = \"raulantodev@gmail.com\"",
            "contact_email = \"raulantodev\"",
        );
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("site.contact_email"));
    }

    #[test]
    fn test_rejects_empty_id() {
        let toml = MINIMAL.replace("id = \"portafolio_raulanto\"", "id = \"  \"");
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("site.id"));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let err = parse_site_toml_str("[site]\nid = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("raulantodev@gmail.com"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@.example.com"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn test_validate_path_valid_relative() {
        assert!(validate_path("content/blog", "build.content_dir").is_ok());
        assert!(validate_path("posts", "build.content_dir").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_escapes() {
        let result = validate_path("/etc", "build.content_dir");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Absolute paths not allowed")
        );

        let result = validate_path("content/../../secret", "build.content_dir");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );

        let result = validate_path("   ", "build.content_dir");
        assert!(result.unwrap_err().to_string().contains("Empty path"));
    }
}
