//! Front-matter splitting.
//!
//! Recognises a YAML block fenced by `---` or a TOML block fenced by `+++`
//! at the very start of a markdown file. Either way the result is an
//! untyped JSON mapping, so the schema validator sees one value model.

use serde_json::{Map, Value};

pub type FrontMatter = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn fence(self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
        }
    }
}

/// Split `source` into front-matter and body.
///
/// Returns a plain message on failure; callers attach the file path.
pub fn split(source: &str) -> Result<(FrontMatter, &str), String> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let format = if is_fence(first_line(source), "---") {
        Format::Yaml
    } else if is_fence(first_line(source), "+++") {
        Format::Toml
    } else {
        return Err("no front-matter block (expected leading `---` or `+++`)".to_string());
    };

    let after_open = &source[first_line(source).len()..];
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))
        .unwrap_or(after_open);

    let (block, body) = find_closing(after_open, format.fence())
        .ok_or_else(|| format!("unterminated front-matter (missing closing `{}`)", format.fence()))?;

    let map = match format {
        Format::Yaml => parse_yaml(block)?,
        Format::Toml => parse_toml(block)?,
    };
    Ok((map, body))
}

fn first_line(s: &str) -> &str {
    s.split('\n').next().unwrap_or("").trim_end_matches('\r')
}

fn is_fence(line: &str, fence: &str) -> bool {
    line.trim_end() == fence
}

/// Locate the closing fence; returns (block, body after the fence line)
fn find_closing<'a>(s: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in s.split_inclusive('\n') {
        if is_fence(line.trim_end_matches(['\r', '\n']), fence) {
            let body = &s[offset + line.len()..];
            return Some((&s[..offset], body));
        }
        offset += line.len();
    }
    None
}

fn parse_yaml(block: &str) -> Result<FrontMatter, String> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|e| format!("invalid YAML front-matter: {}", e))?;
    match yaml_to_json(value)? {
        Value::Object(map) => Ok(map),
        other => Err(format!(
            "front-matter must be a mapping, found {}",
            kind(&other)
        )),
    }
}

fn parse_toml(block: &str) -> Result<FrontMatter, String> {
    let table: toml::Table =
        toml::from_str(block).map_err(|e| format!("invalid TOML front-matter: {}", e))?;
    Ok(table
        .into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect())
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Y;
    Ok(match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Y::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                let key = match k {
                    Y::String(s) => s,
                    Y::Number(n) => n.to_string(),
                    Y::Bool(b) => b.to_string(),
                    _ => return Err("front-matter keys must be scalars".to_string()),
                };
                map.insert(key, yaml_to_json(v)?);
            }
            Value::Object(map)
        }
        Y::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        // Dates stay textual, the schema types them as strings
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
