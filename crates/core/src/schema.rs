//! Content collection schema.
//!
//! A schema is plain data: an ordered list of field specs (name, required
//! flag, expected type) interpreted by one generic validator. Adding a
//! front-matter field to the collection is a change to the field list, not
//! to the validator.

use crate::error::{Error, Result};
use crate::types::{AuthorCard, ContentEntry, SchemaVariant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Fields every schema must require so a typed `ContentEntry` can be built
const CORE_FIELDS: &[&str] = &["date", "title", "description", "name"];

/// Optional fields that map onto typed `ContentEntry` members, with the
/// only type each may be declared as
const TYPED_FIELDS: &[(&str, FieldType)] = &[
    ("tags", FieldType::StringList),
    ("author", FieldType::String),
    ("author_avatar", FieldType::String),
    ("author_description", FieldType::String),
    ("thumbnail", FieldType::String),
    ("rawbody", FieldType::String),
];

const AUTHOR_FIELDS: &[&str] = &["author", "author_avatar", "author_description"];

/// Primitive type a front-matter field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    StringList,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::StringList => f.write_str("list of strings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn required(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            ty,
        }
    }

    pub fn optional(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            ty,
        }
    }
}

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    WrongType { found: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub expected: FieldType,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            FieldProblem::Missing => write!(
                f,
                "field '{}' is missing (expected {})",
                self.field, self.expected
            ),
            FieldProblem::WrongType { found } => write!(
                f,
                "field '{}' has wrong type (expected {}, found {})",
                self.field, self.expected, found
            ),
        }
    }
}

/// Every field that failed validation for one record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema validation failed: {}", join_errors(.errors))]
pub struct SchemaValidationError {
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSchema {
    #[serde(rename = "field")]
    fields: Vec<FieldSpec>,
}

impl ContentSchema {
    /// `date`, `title`, `description`, `name` required; `tags` optional
    pub fn base() -> Self {
        Self {
            fields: vec![
                FieldSpec::required("date", FieldType::String),
                FieldSpec::required("title", FieldType::String),
                FieldSpec::required("description", FieldType::String),
                FieldSpec::optional("tags", FieldType::StringList),
                FieldSpec::required("name", FieldType::String),
            ],
        }
    }

    /// Base schema plus the author byline, thumbnail and raw body
    pub fn extended() -> Self {
        let mut schema = Self::base();
        for name in [
            "author",
            "author_avatar",
            "author_description",
            "thumbnail",
            "rawbody",
        ] {
            schema
                .fields
                .push(FieldSpec::required(name, FieldType::String));
        }
        schema
    }

    pub fn for_variant(variant: SchemaVariant) -> Self {
        match variant {
            SchemaVariant::Base => Self::base(),
            SchemaVariant::Extended => Self::extended(),
        }
    }

    /// Build a schema from a data-described field list.
    ///
    /// The list must require the core fields as strings and must not
    /// declare a field twice.
    pub fn from_fields(fields: Vec<FieldSpec>) -> Result<Self> {
        for core in CORE_FIELDS {
            match fields.iter().find(|f| f.name == *core) {
                Some(f) if f.required && f.ty == FieldType::String => {}
                _ => {
                    return Err(Error::InvalidData(format!(
                        "schema must declare '{}' as a required string",
                        core
                    )));
                }
            }
        }
        for (name, ty) in TYPED_FIELDS {
            if let Some(f) = fields.iter().find(|f| f.name == *name)
                && f.ty != *ty
            {
                return Err(Error::InvalidData(format!(
                    "schema field '{}' must be a {}, not a {}",
                    name, ty, f.ty
                )));
            }
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::InvalidData(format!(
                    "schema declares field '{}' more than once",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Parse a `[[field]]` list from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: ContentSchema = toml::from_str(content)?;
        Self::from_fields(raw.fields)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate an untyped front-matter mapping.
    ///
    /// Reports every failing field, in schema order. Keys the schema does
    /// not describe are kept in `ContentEntry::extra`.
    pub fn validate(
        &self,
        record: &Map<String, Value>,
    ) -> std::result::Result<ContentEntry, SchemaValidationError> {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|spec| check_field(spec, record.get(&spec.name)))
            .collect();

        if !errors.is_empty() {
            return Err(SchemaValidationError { errors });
        }

        Ok(self.build_entry(record))
    }

    fn build_entry(&self, record: &Map<String, Value>) -> ContentEntry {
        let string = |name: &str| -> Option<String> {
            self.field(name)?;
            record.get(name)?.as_str().map(str::to_string)
        };

        let tags = self.field("tags").and_then(|_| {
            record.get("tags")?.as_array().map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
        });

        let author = match (
            string("author"),
            string("author_avatar"),
            string("author_description"),
        ) {
            (Some(name), Some(avatar), Some(description)) => Some(AuthorCard {
                name,
                avatar,
                description,
            }),
            _ => None,
        };

        let thumbnail = string("thumbnail");
        let rawbody = string("rawbody");

        // A key leaves `extra` only when its value landed in a typed member
        let typed = |key: &str| match key {
            "date" | "title" | "description" | "name" => true,
            "tags" => tags.is_some(),
            "thumbnail" => thumbnail.is_some(),
            "rawbody" => rawbody.is_some(),
            _ => author.is_some() && AUTHOR_FIELDS.contains(&key),
        };

        let extra = record
            .iter()
            .filter(|(k, _)| !typed(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        ContentEntry {
            date: string("date").unwrap_or_default(),
            title: string("title").unwrap_or_default(),
            description: string("description").unwrap_or_default(),
            name: string("name").unwrap_or_default(),
            tags,
            author,
            thumbnail,
            rawbody,
            body: String::new(),
            extra,
        }
    }
}

impl Default for ContentSchema {
    fn default() -> Self {
        Self::base()
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Option<FieldError> {
    let problem = match value {
        None if spec.required => FieldProblem::Missing,
        None => return None,
        Some(v) if type_matches(spec.ty, v) => return None,
        Some(v) => FieldProblem::WrongType {
            found: describe(v),
        },
    };
    Some(FieldError {
        field: spec.name.clone(),
        expected: spec.ty,
        problem,
    })
}

fn type_matches(ty: FieldType, value: &Value) -> bool {
    match ty {
        FieldType::String => value.is_string(),
        FieldType::StringList => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Object(_) => "mapping".to_string(),
        Value::Array(items) => match items.iter().find(|v| !v.is_string()) {
            Some(bad) => format!("list containing {}", describe(bad)),
            None => "list of strings".to_string(),
        },
    }
}
