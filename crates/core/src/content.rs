//! Markdown content collection: loading, validation and rendering helpers.

use crate::error::{Error, Result};
use crate::frontmatter;
use crate::schema::ContentSchema;
use crate::types::ContentEntry;
use chrono::{DateTime, NaiveDate};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A validated entry together with the file it came from
#[derive(Debug, Clone, Serialize)]
pub struct LoadedEntry {
    pub path: PathBuf,
    pub entry: ContentEntry,
}

/// Result of loading a collection directory
#[derive(Debug, Default)]
pub struct CollectionLoad {
    /// Valid entries, newest first
    pub entries: Vec<LoadedEntry>,
    /// Files excluded from the build, with the reason
    pub failures: Vec<Error>,
}

impl CollectionLoad {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One heading in a table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub depth: u8,
    pub text: String,
    pub slug: String,
}

/// Parse and validate one markdown source.
///
/// When the schema declares `rawbody` and the front-matter does not set it,
/// the markdown body is used.
pub fn parse_entry(path: &Path, source: &str, schema: &ContentSchema) -> Result<ContentEntry> {
    let (mut front, body) = frontmatter::split(source).map_err(|message| Error::FrontMatter {
        path: path.to_path_buf(),
        message,
    })?;

    if schema.field("rawbody").is_some() && !front.contains_key("rawbody") {
        front.insert("rawbody".to_string(), Value::String(body.to_string()));
    }

    let mut entry = schema.validate(&front).map_err(|source| Error::Schema {
        path: path.to_path_buf(),
        source,
    })?;
    entry.body = body.to_string();
    Ok(entry)
}

/// Read and validate a markdown file
pub fn load_entry<P: AsRef<Path>>(path: P, schema: &ContentSchema) -> Result<ContentEntry> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_entry(path, &source, schema)
}

/// Load every markdown file under `dir`.
///
/// Files failing the schema are excluded and reported in `failures`; they
/// are never coerced into entries.
pub fn load_collection<P: AsRef<Path>>(dir: P, schema: &ContentSchema) -> Result<CollectionLoad> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "content directory not found"),
        ));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| Error::InvalidData(format!("walking {}: {}", dir.display(), e)))?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut load = CollectionLoad::default();
    for path in files {
        match load_entry(&path, schema) {
            Ok(entry) => {
                tracing::debug!(path = %path.display(), title = %entry.title, "loaded content entry");
                load.entries.push(LoadedEntry { path, entry });
            }
            Err(err) => {
                tracing::warn!("excluding content file: {}", err);
                load.failures.push(err);
            }
        }
    }

    // Newest first; undated entries last, ties keep path order
    load.entries
        .sort_by(|a, b| b.entry.parsed_date().cmp(&a.entry.parsed_date()));
    Ok(load)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

impl ContentEntry {
    /// Parse the `date` field as `YYYY-MM-DD` or an RFC 3339 timestamp
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
    }

    pub fn render_html(&self) -> String {
        let parser = Parser::new_ext(&self.body, markdown_options());
        let mut out = String::with_capacity(self.body.len() * 2);
        html::push_html(&mut out, parser);
        out
    }

    /// Headings up to `max_depth` (1 = `#` only)
    pub fn toc(&self, max_depth: u8) -> Vec<TocItem> {
        let mut items = Vec::new();
        let mut current: Option<(u8, String)> = None;

        for event in Parser::new_ext(&self.body, markdown_options()) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current = Some((heading_depth(level), String::new()));
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((depth, text)) = current.take()
                        && depth <= max_depth
                    {
                        let text = text.trim().to_string();
                        items.push(TocItem {
                            depth,
                            slug: heading_slug(&text),
                            text,
                        });
                    }
                }
                _ => {}
            }
        }
        items
    }

    /// Distinct fenced-code languages in order of first use
    pub fn code_languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = Vec::new();
        for event in Parser::new_ext(&self.body, markdown_options()) {
            if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = event {
                let lang = info.split([' ', ',', '{']).next().unwrap_or("").trim();
                if !lang.is_empty() && !langs.iter().any(|l| l == lang) {
                    langs.push(lang.to_string());
                }
            }
        }
        langs
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn heading_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const POST: &str = r#"---
date: "2024-03-10"
title: Graficas en Nuxt
description: Notas sobre dashboards
name: graficas
tags: [vue, nuxt]
---
# Graficas en Nuxt

Intro.

## Instalacion

```js
npm i chart.js
```

### Paso `uno`

```rust
fn main() {}
```

```js
console.log(1)
```
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_entry() {
        let entry = parse_entry(Path::new("post.md"), POST, &ContentSchema::base()).unwrap();
        assert_eq!(entry.title, "Graficas en Nuxt");
        assert_eq!(entry.tags, Some(vec!["vue".to_string(), "nuxt".to_string()]));
        assert!(entry.body.starts_with("# Graficas en Nuxt"));
        assert_eq!(entry.rawbody, None);
        assert_eq!(entry.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 10));
    }

    #[test]
    fn test_rawbody_filled_from_body() {
        let src = "---\ndate: 2024-01-01\ntitle: T\ndescription: D\nname: N\nauthor: A\nauthor_avatar: /a.png\nauthor_description: dev\nthumbnail: /t.png\n---\nhello\n";
        let entry = parse_entry(Path::new("x.md"), src, &ContentSchema::extended()).unwrap();
        assert_eq!(entry.rawbody.as_deref(), Some("hello\n"));
    }

    #[test]
    fn test_schema_error_names_file_and_field() {
        let src = "---\ndate: 2024-01-01\ntitle: T\ndescription: D\n---\n";
        let err = parse_entry(Path::new("blog/broken.md"), src, &ContentSchema::base()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("blog/broken.md"));
        assert!(msg.contains("'name'"));
        match err {
            Error::Schema { source, .. } => {
                assert_eq!(source.fields().collect::<Vec<_>>(), vec!["name"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_toc_respects_depth() {
        let entry = parse_entry(Path::new("post.md"), POST, &ContentSchema::base()).unwrap();
        let toc = entry.toc(2);
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].text, "Graficas en Nuxt");
        assert_eq!(toc[0].slug, "graficas-en-nuxt");
        assert_eq!(toc[1].depth, 2);

        let toc = entry.toc(3);
        assert_eq!(toc[2].text, "Paso uno");
        assert_eq!(toc[2].slug, "paso-uno");
    }

    #[test]
    fn test_code_languages() {
        let entry = parse_entry(Path::new("post.md"), POST, &ContentSchema::base()).unwrap();
        assert_eq!(entry.code_languages(), vec!["js", "rust"]);
    }

    #[test]
    fn test_render_html() {
        let entry = parse_entry(Path::new("post.md"), POST, &ContentSchema::base()).unwrap();
        let html = entry.render_html();
        assert!(html.contains("<h1>Graficas en Nuxt</h1>"));
        assert!(html.contains("<h2>Instalacion</h2>"));
    }

    #[test]
    fn test_parsed_date_formats() {
        let mut entry = parse_entry(Path::new("post.md"), POST, &ContentSchema::base()).unwrap();
        entry.date = "2024-05-01T10:00:00Z".to_string();
        assert_eq!(entry.parsed_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
        entry.date = "mayo".to_string();
        assert_eq!(entry.parsed_date(), None);
    }

    #[test]
    fn test_load_collection_excludes_failures() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        write(dir, "a.md", "---\ndate: 2023-01-01\ntitle: Old\ndescription: D\nname: old\n---\n");
        write(dir, "b.md", "---\ndate: 2024-06-01\ntitle: New\ndescription: D\nname: new\n---\n");
        write(dir, "c.md", "---\ndate: 2024-06-01\ntitle: Broken\ndescription: D\n---\n");
        write(dir, "d.md", "no front matter");
        write(dir, "notes.txt", "ignored");

        let load = load_collection(dir, &ContentSchema::base()).unwrap();
        let titles: Vec<_> = load.entries.iter().map(|e| e.entry.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);
        assert_eq!(load.failures.len(), 2);
        assert!(!load.is_clean());
        assert!(load.failures[0].to_string().contains("c.md"));
        assert!(matches!(load.failures[1], Error::FrontMatter { .. }));
    }

    #[test]
    fn test_load_collection_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = load_collection(temp.path().join("nope"), &ContentSchema::base());
        assert!(result.is_err());
    }
}
