//! Project catalog.
//!
//! The catalog is read from a `projects.toml` data file (or the copy
//! compiled into the crate) and is immutable once built. Ids in the data
//! file are not trusted: entries are re-keyed 1..=n in declared order, and
//! every collision in the source ids is recorded so it can be reported.

use crate::error::{Error, Result};
use crate::types::{Color, ProjectEntry, ProjectTag, is_absolute_url};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

const BUILTIN_CATALOG: &str = include_str!("../data/projects.toml");

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default, rename = "project")]
    projects: Vec<RawProject>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: RawId,
    title: String,
    description: String,
    #[serde(default, alias = "tag")]
    tags: Vec<RawTag>,
    #[serde(alias = "imageUrl")]
    image_url: String,
    link: String,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    id: RawId,
    name: String,
    #[serde(alias = "colorCategory", alias = "color_category")]
    color: String,
}

/// Source ids appear both as integers and as strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl RawId {
    fn canonical(&self) -> String {
        match self {
            RawId::Int(i) => i.to_string(),
            RawId::Str(s) => s.trim().to_string(),
        }
    }
}

/// A source id shared by more than one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    pub id: String,
    pub indices: Vec<usize>,
}

/// A tag id repeated inside one project entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTag {
    pub entry: usize,
    pub tag_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<ProjectEntry>,
    rekeyed: Vec<DuplicateId>,
}

impl Catalog {
    /// Parse a catalog, re-keying entries whose source ids collide
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawCatalog = toml::from_str(content)?;
        let source_ids: Vec<String> = raw.projects.iter().map(|p| p.id.canonical()).collect();
        let rekeyed = find_duplicates(&source_ids);

        for dup in &rekeyed {
            tracing::warn!(
                "project id {} is used by entries at indices {:?}; assigning sequential ids",
                dup.id,
                dup.indices
            );
        }

        let entries = raw
            .projects
            .into_iter()
            .enumerate()
            .map(|(i, p)| convert_project(i, p))
            .collect::<Result<Vec<_>>>()?;

        let catalog = Self { entries, rekeyed };
        for entry in &catalog.entries {
            for warning in entry.url_warnings() {
                tracing::warn!("project {} ({}): {}", entry.id, entry.title, warning);
            }
        }
        Ok(catalog)
    }

    /// Parse a catalog, failing on the first colliding source id instead
    /// of re-keying
    pub fn strict(content: &str) -> Result<Self> {
        let catalog = Self::from_toml_str(content)?;
        catalog.ensure_unique_ids()?;
        Ok(catalog)
    }

    /// Error on the first source id shared by more than one entry
    pub fn ensure_unique_ids(&self) -> Result<()> {
        match self.rekeyed.first() {
            Some(dup) => Err(Error::DuplicateId {
                id: dup.id.clone(),
                indices: dup.indices.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| Error::in_file(path, e))
    }

    /// Like `load`, but duplicate source ids are an error
    pub fn load_strict<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::strict(&content).map_err(|e| Error::in_file(path, e))
    }

    /// The catalog compiled into the crate, parsed once per process
    pub fn builtin() -> Result<&'static Catalog> {
        if let Some(catalog) = BUILTIN.get() {
            return Ok(catalog);
        }
        let catalog = Self::from_toml_str(BUILTIN_CATALOG)?;
        Ok(BUILTIN.get_or_init(|| catalog))
    }

    /// Every entry, in declared order
    pub fn list_all(&self) -> &[ProjectEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&ProjectEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries carrying a tag with this name (case-insensitive)
    pub fn by_tag<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ProjectEntry> + 'a {
        self.entries.iter().filter(move |e| e.has_tag(name))
    }

    /// Source ids that collided and were replaced
    pub fn rekeyed(&self) -> &[DuplicateId] {
        &self.rekeyed
    }

    pub fn duplicate_tags(&self) -> Vec<DuplicateTag> {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| {
                let ids: Vec<String> = entry.tags.iter().map(|t| t.id.clone()).collect();
                find_duplicates(&ids).into_iter().map(move |d| DuplicateTag {
                    entry: i,
                    tag_id: d.id,
                })
            })
            .collect()
    }
}

fn convert_project(index: usize, raw: RawProject) -> Result<ProjectEntry> {
    let tags = raw
        .tags
        .into_iter()
        .map(|t| {
            let color: Color = t.color.parse().map_err(|e| {
                Error::ConfigParse(format!("project[{}].tags '{}': {}", index, t.name, e))
            })?;
            Ok(ProjectTag {
                id: t.id.canonical(),
                name: t.name.trim().to_string(),
                color,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if raw.title.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "project[{}].title must not be empty",
            index
        )));
    }

    let id = u32::try_from(index + 1)
        .map_err(|_| Error::InvalidData("catalog has too many entries".to_string()))?;

    Ok(ProjectEntry {
        id,
        title: raw.title.trim().to_string(),
        description: raw.description.trim().to_string(),
        tags,
        image_url: raw.image_url.trim().to_string(),
        link: raw.link.trim().to_string(),
    })
}

/// Group equal ids, keeping only those seen more than once, in order of
/// first appearance
fn find_duplicates(ids: &[String]) -> Vec<DuplicateId> {
    let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, id) in ids.iter().enumerate() {
        seen.entry(id.as_str()).or_default().push(i);
    }
    let mut dups: Vec<DuplicateId> = seen
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(id, indices)| DuplicateId {
            id: id.to_string(),
            indices,
        })
        .collect();
    dups.sort_by_key(|d| d.indices[0]);
    dups
}

impl ProjectEntry {
    /// Non-fatal problems with `link` and absolute `image_url` values
    pub fn url_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match parse_absolute(&self.link) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => warnings.push(format!(
                "link '{}' uses unexpected scheme '{}'",
                self.link,
                url.scheme()
            )),
            Err(e) => warnings.push(format!("link '{}' is not a valid URL: {}", self.link, e)),
        }

        if is_absolute_url(&self.image_url)
            && let Err(e) = parse_absolute(&self.image_url)
        {
            warnings.push(format!(
                "image_url '{}' is not a valid URL: {}",
                self.image_url, e
            ));
        }

        warnings
    }
}

fn parse_absolute(s: &str) -> std::result::Result<Url, url::ParseError> {
    match s.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{}", rest)),
        None => Url::parse(s),
    }
}
