use anyhow::{Context, Result, anyhow};
use folio_kit_core::Site;
use folio_kit_core::theme::Variant;
use folio_kit_core::types::Color;
use std::path::PathBuf;

pub fn run(path: PathBuf, component: &str, slot: &str, color: &str, variant: &str) -> Result<()> {
    let color: Color = color.parse().map_err(|e: String| anyhow!(e))?;
    let variant: Variant = variant.parse().map_err(|e: String| anyhow!(e))?;

    let site = Site::load(&path).context("Failed to load site")?;
    let theme = &site.theme;

    if theme.slot_class(component, slot).is_none() {
        eprintln!("⚠ No base class for {}.{}", component, slot);
    }

    println!("{}", theme.resolve(component, slot, color, variant));
    Ok(())
}
