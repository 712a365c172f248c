use anyhow::{Context, Result};
use chrono::Local;
use folio_kit_core::config::is_valid_email;
use folio_kit_core::site::{CATALOG_FILE, SITE_FILE};
use std::fs;
use std::path::PathBuf;

const CONTENT_DIR: &str = "content/blog";

/// Escape a string for safe inclusion in a TOML basic string.
///
/// The site template is written by hand (to keep comments and layout), so
/// values interpolated into it are escaped here instead of going through
/// the toml serializer.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Turn a display name into a lowercase identifier
fn site_id(name: &str) -> String {
    let id: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let id = id.trim_matches('_').to_string();
    if id.is_empty() { "portfolio".to_string() } else { id }
}

/// Scaffold a site directory: folio.toml, projects.toml and one sample post.
///
/// Refuses to touch a directory that already has a folio.toml.
pub fn run(
    path: PathBuf,
    name: Option<String>,
    author: Option<String>,
    email: Option<String>,
) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    let site_toml_path = path.join(SITE_FILE);
    if site_toml_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            SITE_FILE,
            site_toml_path.display()
        );
    }

    if let Some(email) = email.as_deref()
        && !is_valid_email(email)
    {
        anyhow::bail!("Invalid email address: '{}'", email);
    }

    let name = name.unwrap_or_else(|| "My Portfolio".to_string());
    let author = author.unwrap_or_else(|| "Your Name".to_string());
    let email = email.unwrap_or_else(|| "you@example.com".to_string());

    fs::create_dir_all(path.join(CONTENT_DIR))
        .with_context(|| format!("Failed to create {}", path.join(CONTENT_DIR).display()))?;

    fs::write(&site_toml_path, site_template(&name, &author, &email))
        .context("Failed to write folio.toml")?;
    println!("✓ Created {}", SITE_FILE);

    let catalog_path = path.join(CATALOG_FILE);
    if catalog_path.exists() {
        println!("• Keeping existing {}", CATALOG_FILE);
    } else {
        fs::write(&catalog_path, CATALOG_TEMPLATE).context("Failed to write projects.toml")?;
        println!("✓ Created {}", CATALOG_FILE);
    }

    let post_path = path.join(CONTENT_DIR).join("hello-world.md");
    if !post_path.exists() {
        fs::write(&post_path, post_template(&author)).context("Failed to write sample post")?;
        println!("✓ Created {}/hello-world.md", CONTENT_DIR);
    }

    println!("\nNext steps:");
    println!("  1. Edit {} (site metadata, theme, build settings)", SITE_FILE);
    println!("  2. List your work in {}", CATALOG_FILE);
    println!("  3. Check everything: folio-kit validate {}", path.display());

    Ok(())
}

fn site_template(name: &str, author: &str, email: &str) -> String {
    let id = site_id(name);
    let name = toml_escape_string(name);
    let author = toml_escape_string(author);
    let email = toml_escape_string(email);

    format!(
        r#"# Site metadata
[site]
id = "{id}"
name = "{name}"
description = "Portfolio of {author}"
url = "https://example.com"
icon = "/icon.svg"
contact_email = "{email}"

[author]
name = "{author}"
url = "https://example.com"
image = "/avatar.png"
email = "{email}"
description = ""
job_title = "Developer"

# Palette names for each semantic color
[theme.colors]
primary = "blue"
neutral = "zinc"

# component -> slot -> classes
[theme.components.card]
body = "flex flex-col gap-2"

[theme.components.formField]
container = "flex flex-col gap-2"
help = "m-0"

[theme.components.toaster]
viewport = "z-[10001]"

# Applied on top of the base slots when color and variant both match
# [[theme.compound_variants]]
# component = "card"
# color = "primary"
# variant = "soft"
# slots = {{ body = "bg-primary/10" }}

[build]
highlight_langs = ["js", "python", "html", "go"]
toc_depth = 3
content_dir = "{content_dir}"
# schema = "extended"   # also require author, author_avatar, author_description, thumbnail
# strict_ids = true     # fail on duplicate project ids instead of renumbering
"#,
        content_dir = CONTENT_DIR,
    )
}

const CATALOG_TEMPLATE: &str = r#"# Project catalog. Entries keep their order; ids are reassigned on load.

[[project]]
id = 1
title = "My First Project"
description = "What it does and why it matters"
image_url = "./first-project.png"
link = "https://example.com/"

[[project.tags]]
id = 1
name = "Rust"
color = "primary"
"#;

fn post_template(author: &str) -> String {
    let date = Local::now().format("%Y-%m-%d");
    // TOML basic-string escapes are a subset of YAML double-quoted ones
    let author = toml_escape_string(author);
    format!(
        r#"---
date: "{date}"
title: "Hello, world"
description: "First post by {author}"
name: hello-world
tags: [intro]
---
# Hello, world

This post was generated by `folio-kit init`.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"a "b" \c"#), r#"a \"b\" \\c"#);
        assert_eq!(toml_escape_string("x\ny"), "x\\ny");
    }

    #[test]
    fn test_site_id() {
        assert_eq!(site_id("Raul Anto Dev"), "raul_anto_dev");
        assert_eq!(site_id("  !!  "), "portfolio");
    }

    #[test]
    fn test_init_creates_valid_site() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("site");

        run(
            root.clone(),
            Some("Raul \"Dev\"".to_string()),
            Some("Raul Antonio".to_string()),
            Some("raul@example.com".to_string()),
        )
        .unwrap();

        let report = folio_kit_validator::validate_site(&root);
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let site = folio_kit_core::Site::load(&root).unwrap();
        assert_eq!(site.metadata.get().name, "Raul \"Dev\"");
        assert_eq!(site.catalog.len(), 1);
    }

    #[test]
    fn test_sample_post_survives_escapes_in_author() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("site");

        run(
            root.clone(),
            None,
            Some(r#"A\B "C""#.to_string()),
            None,
        )
        .unwrap();

        let report = folio_kit_validator::validate_site(&root);
        assert!(report.is_ok(), "{:?}", report.errors);

        let site = folio_kit_core::Site::load(&root).unwrap();
        let content = site.load_content().unwrap();
        assert!(content.is_clean());
        assert_eq!(
            content.entries[0].entry.description,
            r#"First post by A\B "C""#
        );
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SITE_FILE), "").unwrap();
        let err = run(temp.path().to_path_buf(), None, None, None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_init_rejects_bad_email() {
        let temp = TempDir::new().unwrap();
        let err = run(
            temp.path().to_path_buf(),
            None,
            None,
            Some("nope".to_string()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid email"));
        assert!(!temp.path().join(SITE_FILE).exists());
    }
}
