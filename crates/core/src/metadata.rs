use crate::types::SiteMetadata;
use serde_json::{Value, json};
use std::sync::Arc;

/// Read-only handle to the site metadata record.
///
/// Built once at startup and handed to whatever renders pages; clones share
/// the same record.
#[derive(Debug, Clone)]
pub struct SiteMetadataProvider {
    record: Arc<SiteMetadata>,
}

impl SiteMetadataProvider {
    pub fn new(record: SiteMetadata) -> Self {
        Self {
            record: Arc::new(record),
        }
    }

    pub fn get(&self) -> &SiteMetadata {
        &self.record
    }
}

impl SiteMetadata {
    /// schema.org structured data for the site and its author
    pub fn json_ld(&self) -> Value {
        json!({
            "@context": "https://schema.org",
            "@graph": [
                {
                    "@type": "WebSite",
                    "@id": format!("{}#website", self.url),
                    "name": self.name,
                    "description": self.description,
                    "url": self.url,
                    "author": { "@id": format!("{}#author", self.url) },
                },
                {
                    "@type": "Person",
                    "@id": format!("{}#author", self.url),
                    "name": self.author.name,
                    "url": self.author.url,
                    "image": self.author.image,
                    "email": format!("mailto:{}", self.author.email),
                    "description": self.author.description,
                    "jobTitle": self.author.job_title,
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Author;

    fn record() -> SiteMetadata {
        SiteMetadata {
            id: "portafolio_raulanto".to_string(),
            name: "raulantoDev".to_string(),
            description: "Portafolio de Raul Anto".to_string(),
            author: Author {
                name: "Raul Antonio".to_string(),
                url: "https://github.com/raulanto".to_string(),
                image: "https://avatars.githubusercontent.com/u/31132987?v=4".to_string(),
                email: "raulantodev@gmail.com".to_string(),
                description: "Desarrollador Full Stack".to_string(),
                job_title: "raulantoDev".to_string(),
            },
            url: "https://github.com/raulanto".to_string(),
            icon: "/icon.svg".to_string(),
            contact_email: "raulantodev@gmail.com".to_string(),
        }
    }

    #[test]
    fn test_get_is_stable() {
        let provider = SiteMetadataProvider::new(record());
        let clone = provider.clone();
        assert_eq!(provider.get(), provider.get());
        assert_eq!(provider.get(), clone.get());
        assert!(std::ptr::eq(provider.get(), clone.get()));
        assert_eq!(provider.get(), &record());
    }

    #[test]
    fn test_json_ld() {
        let ld = record().json_ld();
        assert_eq!(ld["@context"], "https://schema.org");
        assert_eq!(ld["@graph"][0]["@type"], "WebSite");
        assert_eq!(ld["@graph"][0]["name"], "raulantoDev");
        assert_eq!(ld["@graph"][1]["jobTitle"], "raulantoDev");
        assert_eq!(ld["@graph"][1]["email"], "mailto:raulantodev@gmail.com");
    }
}
