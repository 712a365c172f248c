use anyhow::{Context, Result};
use folio_kit_core::Site;
use std::path::PathBuf;

pub fn run(path: PathBuf, json_ld: bool) -> Result<()> {
    let site = Site::load(&path).context("Failed to load site")?;
    let meta = site.metadata.get();

    if json_ld {
        println!("{}", serde_json::to_string_pretty(&meta.json_ld())?);
        return Ok(());
    }

    println!("{} ({})", meta.name, meta.id);
    println!("  {}", meta.description);
    println!("  URL:     {}", meta.url);
    println!("  Icon:    {}", meta.icon);
    println!("  Contact: {}", meta.contact_email);
    println!("  Author:  {} <{}>", meta.author.name, meta.author.email);
    println!("           {}", meta.author.job_title);
    println!("           {}", meta.author.url);

    Ok(())
}
