pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod metadata;
pub mod schema;
pub mod site;
pub mod theme;
pub mod types;

pub use catalog::Catalog;
pub use config::{SiteConfig, parse_site_toml};
pub use error::{Error, Result};
pub use metadata::SiteMetadataProvider;
pub use schema::{ContentSchema, SchemaValidationError};
pub use site::Site;
pub use types::*;
