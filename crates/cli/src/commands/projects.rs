use anyhow::{Context, Result};
use folio_kit_core::{ImageSource, ProjectEntry, Site};
use std::path::PathBuf;

pub fn run(path: PathBuf, tag: Option<String>, json: bool) -> Result<()> {
    let site = Site::load(&path).context("Failed to load site")?;

    let projects: Vec<&ProjectEntry> = match tag.as_deref() {
        Some(tag) => site.catalog.by_tag(tag).collect(),
        None => site.catalog.list_all().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    for project in &projects {
        let tags: Vec<String> = project
            .tags
            .iter()
            .map(|t| format!("{} ({})", t.name, t.color))
            .collect();
        let image = match project.image_source() {
            ImageSource::Local => "local",
            ImageSource::Remote => "remote",
        };

        println!("{:>3}  {}", project.id, project.title);
        println!("     {}", project.description);
        if !tags.is_empty() {
            println!("     tags:  {}", tags.join(", "));
        }
        println!("     link:  {}", project.link);
        println!("     image: {} ({})", project.image_url, image);
    }

    println!("\n{} project(s)", projects.len());
    Ok(())
}
