use crate::catalog::Catalog;
use crate::config::{SiteConfig, parse_site_toml};
use crate::content::{CollectionLoad, load_collection};
use crate::error::Result;
use crate::metadata::SiteMetadataProvider;
use crate::schema::ContentSchema;
use crate::theme::Theme;
use crate::types::BuildConfig;
use std::path::{Path, PathBuf};

pub const SITE_FILE: &str = "folio.toml";
pub const CATALOG_FILE: &str = "projects.toml";

/// Where the project catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    File,
    Builtin,
}

/// Everything loaded from a site directory at startup.
///
/// The site metadata lives only behind `metadata`; the rest of folio.toml
/// is split into `theme`, `build` and `schema`.
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    pub theme: Theme,
    pub build: BuildConfig,
    pub schema: ContentSchema,
    pub catalog: Catalog,
    pub catalog_source: CatalogSource,
    pub metadata: SiteMetadataProvider,
}

impl Site {
    /// Load folio.toml and the project catalog.
    ///
    /// Without a projects.toml the built-in catalog is used. With
    /// `build.strict_ids` set, duplicate catalog ids fail the load.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let SiteConfig {
            metadata,
            theme,
            build,
            schema,
        } = parse_site_toml(root.join(SITE_FILE))?;

        let catalog_path = root.join(CATALOG_FILE);
        let (catalog, catalog_source) = if catalog_path.exists() {
            let catalog = if build.strict_ids {
                Catalog::load_strict(&catalog_path)?
            } else {
                Catalog::load(&catalog_path)?
            };
            (catalog, CatalogSource::File)
        } else {
            tracing::debug!("no {} in {}, using built-in catalog", CATALOG_FILE, root.display());
            let catalog = Catalog::builtin()?;
            if build.strict_ids {
                catalog.ensure_unique_ids()?;
            }
            (catalog.clone(), CatalogSource::Builtin)
        };

        Ok(Self {
            root,
            theme,
            build,
            schema,
            catalog,
            catalog_source,
            metadata: SiteMetadataProvider::new(metadata),
        })
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.build.content_dir)
    }

    pub fn load_content(&self) -> Result<CollectionLoad> {
        load_collection(self.content_dir(), &self.schema)
    }
}
