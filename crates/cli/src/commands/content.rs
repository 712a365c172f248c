use anyhow::{Context, Result};
use folio_kit_core::Site;
use folio_kit_core::content::{LoadedEntry, TocItem};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct EntrySummary<'a> {
    path: String,
    date: &'a str,
    title: &'a str,
    name: &'a str,
    tags: &'a [String],
    toc: Vec<TocItem>,
}

fn summarize<'a>(loaded: &'a LoadedEntry, root: &Path, toc_depth: u8) -> EntrySummary<'a> {
    EntrySummary {
        path: loaded
            .path
            .strip_prefix(root)
            .unwrap_or(&loaded.path)
            .display()
            .to_string(),
        date: &loaded.entry.date,
        title: &loaded.entry.title,
        name: &loaded.entry.name,
        tags: loaded.entry.tags.as_deref().unwrap_or_default(),
        toc: loaded.entry.toc(toc_depth),
    }
}

pub fn run(path: PathBuf, json: bool) -> Result<()> {
    let site = Site::load(&path).context("Failed to load site")?;
    let load = site
        .load_content()
        .with_context(|| format!("Failed to read {}", site.content_dir().display()))?;

    for failure in &load.failures {
        eprintln!("✗ {}", failure);
    }

    let toc_depth = site.build.toc_depth;
    let summaries: Vec<EntrySummary> = load
        .entries
        .iter()
        .map(|e| summarize(e, &path, toc_depth))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for (summary, loaded) in summaries.iter().zip(&load.entries) {
            let date = loaded
                .entry
                .parsed_date()
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_else(|| summary.date.to_string());
            println!("{}  {}", date, summary.title);
            println!("     {}", summary.path);
            if !summary.tags.is_empty() {
                println!("     tags: {}", summary.tags.join(", "));
            }
            for item in &summary.toc {
                let indent = "  ".repeat(usize::from(item.depth.saturating_sub(1)));
                println!("     {}- {}", indent, item.text);
            }
        }
        println!(
            "\n{} entr{} valid, {} rejected",
            load.entries.len(),
            if load.entries.len() == 1 { "y" } else { "ies" },
            load.failures.len()
        );
    }

    if !load.is_clean() {
        anyhow::bail!(
            "{} content file(s) failed the schema",
            load.failures.len()
        );
    }
    Ok(())
}
