//! Document model - the schema declared by a PLY header.
//!
//! A [`Document`] is an ordered list of comments and [`Element`]s; each
//! element is a named row group with an ordered list of [`Property`]
//! columns.

use crate::util::ScalarKind;

/// A named column within an element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Property {
    /// Name of this property.
    pub name: String,
    /// Kind of each stored value.
    pub value_kind: ScalarKind,
    /// Kind of the length prefix; `Unused` for plain properties.
    pub list_kind: ScalarKind,
}

impl Property {
    /// Create a plain (single value per row) property.
    pub fn scalar(name: impl Into<String>, value_kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            value_kind,
            list_kind: ScalarKind::Unused,
        }
    }

    /// Create a list property: `<list_kind count><value_kind value>*count`.
    pub fn list(name: impl Into<String>, list_kind: ScalarKind, value_kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            value_kind,
            list_kind,
        }
    }

    /// Check if this is a list property.
    #[inline]
    pub fn is_list(&self) -> bool {
        self.list_kind != ScalarKind::Unused
    }

    /// Human-readable shape, used in diagnostics ("list uchar uint", "float").
    pub fn type_name(&self) -> String {
        if self.is_list() {
            format!("list {} {}", self.list_kind, self.value_kind)
        } else {
            self.value_kind.to_string()
        }
    }
}

/// A named homogeneous row group ("vertex", "face").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Name of this element.
    pub name: String,
    /// Number of rows.
    pub count: usize,
    /// Columns in on-disk order.
    pub properties: Vec<Property>,
}

impl Element {
    /// Create an element without properties.
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            properties: Vec::new(),
        }
    }

    /// Append a property (builder style).
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Find a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Find the on-disk index of a property by name.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Check if any property is list-valued.
    pub fn has_lists(&self) -> bool {
        self.properties.iter().any(Property::is_list)
    }

    /// Size of one row in bytes for the binary encoding, when fixed.
    ///
    /// Returns `None` if the element has list properties.
    pub fn binary_row_size(&self) -> Option<usize> {
        if self.has_lists() {
            return None;
        }
        Some(self.properties.iter().map(|p| p.value_kind.num_bytes()).sum())
    }
}

/// Full schema of one PLY file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// Comment lines (without the `comment ` prefix).
    pub comments: Vec<String>,
    /// Elements in declaration order.
    pub elements: Vec<Element>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an element by name.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Total row count across all elements.
    pub fn total_rows(&self) -> usize {
        self.elements.iter().map(|e| e.count).sum()
    }
}
