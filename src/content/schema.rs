//! content::schema
//!
//! Collection schema documents.
//!
//! A schema document describes the fields of a collection's items and how
//! they are stored:
//!
//! ```yaml
//! schema:
//!   properties:
//!     title:
//!       type: string
//!     body:
//!       type: markdown
//!       description: Main text
//!   required:
//!     - title
//! storage:
//!   path: posts/
//!   format: json
//!   idField: slug
//! ```
//!
//! [`parse_schema`] is a single-pass, indentation-sensitive scanner over a
//! fixed two-space dialect. Field keys sit at exactly four spaces and field
//! attributes at exactly six; anything it does not recognise is skipped.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::split_indent;
use crate::core::CoreError;

/// Value type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    String,
    Markdown,
    Image,
    Date,
    /// Any type name the form layer has no special handling for.
    Other(String),
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    SingleLine,
    MultiLine,
    Date,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::SingleLine => write!(f, "single-line"),
            InputKind::MultiLine => write!(f, "multi-line"),
            InputKind::Date => write!(f, "date"),
        }
    }
}

impl FieldType {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "string" => FieldType::String,
            "markdown" => FieldType::Markdown,
            "image" => FieldType::Image,
            "date" => FieldType::Date,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Markdown => "markdown",
            FieldType::Image => "image",
            FieldType::Date => "date",
            FieldType::Other(name) => name,
        }
    }

    /// Editor input for this type; unknown types fall back to a text line.
    pub fn input_kind(&self) -> InputKind {
        match self {
            FieldType::Markdown => InputKind::MultiLine,
            FieldType::Date => InputKind::Date,
            FieldType::String | FieldType::Image | FieldType::Other(_) => InputKind::SingleLine,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field of a collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Serialization format of stored items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Json,
    Yaml,
}

impl StorageFormat {
    /// Any declared format other than `json` is stored as YAML.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            StorageFormat::Json
        } else {
            StorageFormat::Yaml
        }
    }

    /// Format implied by a file name's extension, if recognised.
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(StorageFormat::Json),
            "yml" | "yaml" => Some(StorageFormat::Yaml),
            _ => None,
        }
    }

    /// File extension including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Json => ".json",
            StorageFormat::Yaml => ".yml",
        }
    }

    /// Fence tag used when embedding content in Markdown.
    pub fn fence_tag(&self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Yaml => "yaml",
        }
    }

    /// Serialize item data in this format.
    ///
    /// JSON is pretty-printed with two-space indentation.
    pub fn serialize_item(&self, data: &Map<String, Value>) -> Result<String, CoreError> {
        match self {
            StorageFormat::Json => serde_json::to_string_pretty(data)
                .map_err(|e| CoreError::InvalidInput(format!("cannot serialize item: {}", e))),
            StorageFormat::Yaml => serde_yaml::to_string(data)
                .map_err(|e| CoreError::InvalidInput(format!("cannot serialize item: {}", e))),
        }
    }
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.fence_tag())
    }
}

/// Where and how a collection's items are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    /// Items directory; `None` means `<collection>/`
    pub path: Option<String>,
    pub format: StorageFormat,
    /// Item field whose value names the file
    pub id_field: String,
}

impl Default for StorageSpec {
    fn default() -> Self {
        Self {
            path: None,
            format: StorageFormat::default(),
            id_field: "id".to_string(),
        }
    }
}

/// File stem used when an item has no usable identifier.
pub const DEFAULT_ITEM_ID: &str = "new-item";

impl StorageSpec {
    /// Items directory with a trailing slash.
    pub fn directory(&self, collection: &str) -> String {
        match self.path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) if path.ends_with('/') => path.to_string(),
            Some(path) => format!("{}/", path),
            None => format!("{}/", collection),
        }
    }

    /// Target path for a new item: `<directory><id><extension>`.
    ///
    /// The id is the item's `id_field` value; strings and numbers are used
    /// as-is, anything else (or an empty string) becomes `new-item`.
    pub fn item_path(&self, collection: &str, item: &Map<String, Value>) -> String {
        let id = match item.get(&self.id_field) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => DEFAULT_ITEM_ID.to_string(),
        };
        format!("{}{}{}", self.directory(collection), id, self.format.extension())
    }
}

/// A parsed collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CollectionSchema {
    /// Fields in declaration order
    pub properties: IndexMap<String, FieldSpec>,
    pub required: Vec<String>,
    pub storage: StorageSpec,
}

impl CollectionSchema {
    /// Required field names with no matching property.
    pub fn undeclared_required(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| !self.properties.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Schema,
    Storage,
    Properties,
}

/// Parse a collection schema document.
///
/// Never fails; unrecognised lines are ignored and missing parts keep
/// their defaults.
pub fn parse_schema(text: &str) -> CollectionSchema {
    let mut schema = CollectionSchema::default();
    let lines: Vec<&str> = text.lines().collect();
    let mut section: Option<Section> = None;
    let mut current_field: Option<String> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        i += 1;
        let (indent, rest) = split_indent(line);

        match rest.trim_end() {
            "schema:" => {
                section = Some(Section::Schema);
                continue;
            }
            "storage:" => {
                section = Some(Section::Storage);
                continue;
            }
            "properties:" => {
                section = Some(Section::Properties);
                current_field = None;
                continue;
            }
            _ => {}
        }

        // A shallower key closes `properties` and returns to its parent.
        if section == Some(Section::Properties) && indent < 4 && !rest.is_empty() {
            section = if indent == 0 { None } else { Some(Section::Schema) };
            current_field = None;
        }

        match section {
            Some(Section::Storage) if indent > 0 => {
                if let Some(value) = key_value(rest, "path") {
                    schema.storage.path = Some(value.to_string());
                } else if let Some(value) = key_value(rest, "format") {
                    schema.storage.format = StorageFormat::parse(value);
                } else if let Some(value) = key_value(rest, "idField") {
                    schema.storage.id_field = value.to_string();
                }
            }
            Some(Section::Properties) => {
                if indent == 4 {
                    if let Some(name) = field_opener(rest) {
                        schema.properties.entry(name.to_string()).or_default();
                        current_field = Some(name.to_string());
                    }
                } else if indent == 6 {
                    let field = current_field
                        .as_ref()
                        .and_then(|name| schema.properties.get_mut(name));
                    if let Some(field) = field {
                        if let Some(value) = key_value(rest, "type") {
                            field.field_type = FieldType::parse(unquote(value));
                        } else if let Some(value) = key_value(rest, "description") {
                            field.description = Some(unquote(value).to_string());
                        }
                    }
                }
            }
            Some(Section::Schema) if indent > 0 => {
                if rest.trim_end() == "required:" {
                    while let Some(item) = lines.get(i).and_then(|l| list_item(l)) {
                        schema.required.push(unquote(item).to_string());
                        i += 1;
                    }
                } else if let Some(value) = key_value(rest, "required") {
                    schema.required.extend(inline_list(value));
                }
            }
            _ => {}
        }
    }

    schema
}

/// Value of `key: value` on an indentation-stripped line; the value must
/// be non-empty.
fn key_value<'a>(rest: &'a str, key: &str) -> Option<&'a str> {
    let value = rest.strip_prefix(key)?.strip_prefix(':')?.trim();
    (!value.is_empty()).then_some(value)
}

/// Field name of a bare `name:` line.
fn field_opener(rest: &str) -> Option<&str> {
    let name = rest.trim_end().strip_suffix(':')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

/// Value of an indented `- value` list line.
fn list_item(line: &str) -> Option<&str> {
    let (indent, rest) = split_indent(line);
    if indent == 0 {
        return None;
    }
    let value = rest.strip_prefix('-')?.trim();
    (!value.is_empty()).then_some(value)
}

/// Items of an inline `[a, b]` list.
fn inline_list(value: &str) -> Vec<String> {
    value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .map(|inner| {
            inner
                .split(',')
                .map(|item| unquote(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
