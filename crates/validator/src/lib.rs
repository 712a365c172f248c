//! Whole-site validation.
//!
//! Loads a site directory the same way a build does and sorts every
//! finding into errors (the build must stop), warnings (it may continue)
//! and info lines.

use folio_kit_core::site::{CATALOG_FILE, CatalogSource};
use folio_kit_core::{Error, Site};
use std::path::Path;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_site<P: AsRef<Path>>(root: P) -> ValidationReport {
    let root = root.as_ref();
    let mut report = ValidationReport::default();

    let site = match Site::load(root) {
        Ok(site) => site,
        Err(err) => {
            report.errors.push(describe_load_error(&err, root));
            return report;
        }
    };

    let meta = site.metadata.get();
    report
        .info
        .push(format!("Site: {} ({})", meta.name, meta.id));

    check_catalog(&site, &mut report);
    check_content(&site, root, &mut report);

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}

/// Load errors name the file they came from, relative to the site root
fn describe_load_error(err: &Error, root: &Path) -> String {
    match err {
        Error::InFile { path, source } => format!("{}: {}", relative(path, root), source),
        Error::IoError { path, source } => format!("{}: {}", relative(path, root), source),
        Error::DuplicateId { .. } => format!("built-in catalog: {}", err),
        other => other.to_string(),
    }
}

fn check_catalog(site: &Site, report: &mut ValidationReport) {
    let source = match site.catalog_source {
        CatalogSource::File => CATALOG_FILE,
        CatalogSource::Builtin => "built-in catalog",
    };
    report
        .info
        .push(format!("Projects: {} (from {})", site.catalog.len(), source));

    for dup in site.catalog.rekeyed() {
        report.warnings.push(format!(
            "{}: project id {} is shared by entries at indices {:?}; ids were reassigned",
            source, dup.id, dup.indices
        ));
    }

    let entries = site.catalog.list_all();
    for dup in site.catalog.duplicate_tags() {
        let title = entries
            .get(dup.entry)
            .map(|e| e.title.as_str())
            .unwrap_or("?");
        report.warnings.push(format!(
            "{}: project '{}' repeats tag id {}",
            source, title, dup.tag_id
        ));
    }

    for entry in entries {
        for warning in entry.url_warnings() {
            report
                .warnings
                .push(format!("{}: project '{}': {}", source, entry.title, warning));
        }
    }
}

fn check_content(site: &Site, root: &Path, report: &mut ValidationReport) {
    let dir = site.content_dir();
    if !dir.is_dir() {
        report.warnings.push(format!(
            "content directory not found: {}",
            relative(&dir, root)
        ));
        return;
    }

    let load = match site.load_content() {
        Ok(load) => load,
        Err(err) => {
            report.errors.push(err.to_string());
            return;
        }
    };

    for failure in &load.failures {
        match failure {
            Error::Schema { path, source } => {
                for field in &source.errors {
                    report
                        .errors
                        .push(format!("{}: {}", relative(path, root), field));
                }
            }
            Error::FrontMatter { path, message } => {
                report
                    .errors
                    .push(format!("{}: {}", relative(path, root), message));
            }
            other => report.errors.push(other.to_string()),
        }
    }

    let build = &site.build;
    for loaded in &load.entries {
        let path = relative(&loaded.path, root);

        if loaded.entry.parsed_date().is_none() {
            report.warnings.push(format!(
                "{}: date '{}' is not an ISO-8601 date",
                path, loaded.entry.date
            ));
        }

        for lang in loaded.entry.code_languages() {
            if !build.highlights(&lang) {
                report.warnings.push(format!(
                    "{}: code block language '{}' is not in build.highlight_langs",
                    path, lang
                ));
            }
        }
    }

    report.info.push(format!(
        "Content: {} valid, {} rejected ({})",
        load.entries.len(),
        load.failures.len(),
        relative(&dir, root)
    ));
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
