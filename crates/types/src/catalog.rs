//! Declarative operation metadata.
//!
//! An [`OperationSpec`] describes one API operation the way a UI or CLI needs
//! to see it: a `group:action` name, the HTTP method and path, and an ordered
//! list of input fields. The typed request model lives in `brickken-registry`;
//! these structs only carry the surface metadata.

use serde::{Deserialize, Serialize};

/// How a field's value is entered and coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free-form string value.
    String,
    /// One of a fixed set of values (see [`FieldSpec::enum_values`]).
    Enum,
    /// RFC 3339 date-time.
    DateTime,
    /// Repeatable flag collected into a JSON array of strings.
    Array,
    /// JSON value (typically an array of objects) supplied verbatim.
    Json,
    /// Path to a local file uploaded as a multipart form part.
    File,
}

/// A single input field of an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears on the wire (camelCase).
    pub name: String,
    /// Whether the operation fails validation without this field.
    pub required: bool,
    /// Input kind used for coercion and CLI argument construction.
    pub kind: FieldKind,
    /// Valid values for [`FieldKind::Enum`] fields; empty otherwise.
    #[serde(default)]
    pub enum_values: Vec<String>,
    /// Value assumed when the field is not supplied.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Human-readable description shown in help output.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the value must be redacted in logs and dry-run output.
    #[serde(default)]
    pub sensitive: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind,
            enum_values: Vec::new(),
            default_value: None,
            description: None,
            sensitive: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn enumerated<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(name, FieldKind::Enum);
        spec.enum_values = values.into_iter().map(Into::into).collect();
        spec
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A complete operation specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Resource group the operation belongs to (e.g. "tx", "info").
    pub group: String,
    /// Full operation name in `group:action` format.
    pub name: String,
    /// Brief description of what the operation does.
    pub summary: String,
    /// HTTP method used by this operation.
    pub method: String,
    /// API endpoint path relative to the environment base URL.
    pub path: String,
    /// Whether the request body is sent as a multipart form.
    #[serde(default)]
    pub multipart: bool,
    /// Ordered list of input fields.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl OperationSpec {
    /// The part of the name after the group prefix.
    pub fn action(&self) -> &str {
        self.name.split_once(':').map(|x| x.1).unwrap_or(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
