//! Column descriptors: typed views binding element properties to rows.

use std::collections::HashSet;

use super::rows::{ListRow, Rows, ScalarRow};
use crate::core::{Element, Property};
use crate::file::{ScalarSink, ScalarSource};
use crate::util::{Error, PlyPod, Result, ScalarKind};

/// What every column descriptor declares about itself.
pub trait ColumnSpec {
    /// Target element name.
    fn element_name(&self) -> &str;

    /// Bound property names, in field order.
    fn property_names(&self) -> &[String];

    /// Number of rows currently held by the container.
    fn row_count(&self) -> usize;

    /// Element contributed by this column on the write side.
    fn create(&self) -> Element;
}

/// A column that can be filled from a file body.
pub trait ReadColumn: ColumnSpec {
    /// Fit the row container to `element` before any row is parsed.
    fn attach(&mut self, element: &Element) -> Result<()>;

    /// Check if the column's fields are list-valued.
    fn is_list(&self) -> bool;

    /// Parse one field of one row from `source`.
    fn read_field(
        &mut self,
        row: usize,
        field: usize,
        property: &Property,
        source: &mut dyn ScalarSource,
    ) -> Result<()>;
}

/// A column that can be serialized row by row.
pub trait WriteColumn: ColumnSpec {
    /// Write all fields of `row` in declared order.
    fn write_row(&self, row: usize, sink: &mut dyn ScalarSink) -> Result<()>;
}

fn validate_names(element: &str, properties: &[&str]) -> Result<Vec<String>> {
    if element.is_empty() {
        return Err(Error::column("element name is empty"));
    }
    let mut seen = HashSet::new();
    for name in properties {
        if name.is_empty() {
            return Err(Error::column(format!("empty property name in element '{element}'")));
        }
        if !seen.insert(*name) {
            return Err(Error::column(format!(
                "property '{name}' listed twice for element '{element}'"
            )));
        }
    }
    Ok(properties.iter().map(|name| name.to_string()).collect())
}

fn row_out_of_range(element: &str, row: usize) -> Error {
    Error::other(format!("row {row} out of range for element '{element}'"))
}

// ============================================================================
// Scalar columns
// ============================================================================

/// Binds `R::ARITY` scalar properties of one element to a row container.
///
/// Field `i` of every row maps to `properties[i]`. Values are cast from the
/// on-disk kind to `R::Value` on read and written as `R::Value` on write.
///
/// ```ignore
/// let mut points: Vec<glam::Vec3> = Vec::new();
/// let column = ScalarColumn::new("vertex", &["x", "y", "z"], &mut points)?;
/// ```
pub struct ScalarColumn<'a, R> {
    element: String,
    properties: Vec<String>,
    rows: Rows<'a, R>,
}

impl<'a, R: ScalarRow> ScalarColumn<'a, R> {
    /// Create a column; the number of names must equal the row arity.
    pub fn new(element: &str, properties: &[&str], rows: impl Into<Rows<'a, R>>) -> Result<Self> {
        if properties.len() != R::ARITY {
            return Err(Error::column(format!(
                "element '{element}' binds {} properties to rows of arity {}",
                properties.len(),
                R::ARITY
            )));
        }
        Ok(Self {
            properties: validate_names(element, properties)?,
            element: element.to_string(),
            rows: rows.into(),
        })
    }

    /// Bound rows.
    pub fn rows(&self) -> &[R] {
        self.rows.as_slice()
    }
}

impl<R: ScalarRow> ColumnSpec for ScalarColumn<'_, R> {
    fn element_name(&self) -> &str {
        &self.element
    }

    fn property_names(&self) -> &[String] {
        &self.properties
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn create(&self) -> Element {
        self.properties.iter().fold(
            Element::new(self.element.as_str(), self.rows.len()),
            |element, name| element.with_property(Property::scalar(name.as_str(), R::Value::KIND)),
        )
    }
}

impl<R: ScalarRow> ReadColumn for ScalarColumn<'_, R> {
    fn attach(&mut self, element: &Element) -> Result<()> {
        self.rows.attach(element, R::empty)
    }

    fn is_list(&self) -> bool {
        false
    }

    fn read_field(
        &mut self,
        row: usize,
        field: usize,
        property: &Property,
        source: &mut dyn ScalarSource,
    ) -> Result<()> {
        let value = source.read_scalar(property.value_kind)?.cast::<R::Value>();
        let rows = self
            .rows
            .as_mut_slice()
            .ok_or_else(|| Error::ReadOnlyColumn(self.element.clone()))?;
        let slot = rows.get_mut(row).ok_or_else(|| row_out_of_range(&self.element, row))?;
        slot.set(field, value);
        Ok(())
    }
}

impl<R: ScalarRow> WriteColumn for ScalarColumn<'_, R> {
    fn write_row(&self, row: usize, sink: &mut dyn ScalarSink) -> Result<()> {
        let slot = self
            .rows
            .as_slice()
            .get(row)
            .ok_or_else(|| row_out_of_range(&self.element, row))?;
        for field in 0..R::ARITY {
            sink.write_scalar(slot.get(field).into_scalar())?;
        }
        Ok(())
    }
}

// ============================================================================
// List columns
// ============================================================================

/// Binds one list property of one element to a container of list rows.
///
/// Lists longer than a fixed-capacity row are truncated on read: the first
/// `capacity` values are kept and the rest are consumed and dropped. Use
/// [`strict`](Self::strict) to turn truncation into an error.
pub struct ListColumn<'a, R> {
    element: String,
    properties: Vec<String>,
    list_kind: ScalarKind,
    strict: bool,
    rows: Rows<'a, R>,
}

impl<'a, R: ListRow> ListColumn<'a, R> {
    /// Create a column whose length prefix is written as `list_kind`.
    pub fn new(
        element: &str,
        property: &str,
        list_kind: ScalarKind,
        rows: impl Into<Rows<'a, R>>,
    ) -> Result<Self> {
        if !list_kind.is_numeric() {
            return Err(Error::column(format!(
                "list property '{element}.{property}' needs a numeric length kind"
            )));
        }
        Ok(Self {
            properties: validate_names(element, &[property])?,
            element: element.to_string(),
            list_kind,
            strict: false,
            rows: rows.into(),
        })
    }

    /// Fail instead of truncating lists that exceed a fixed capacity.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Kind of the length prefix.
    pub fn list_kind(&self) -> ScalarKind {
        self.list_kind
    }

    /// Bound rows.
    pub fn rows(&self) -> &[R] {
        self.rows.as_slice()
    }
}

impl<R: ListRow> ColumnSpec for ListColumn<'_, R> {
    fn element_name(&self) -> &str {
        &self.element
    }

    fn property_names(&self) -> &[String] {
        &self.properties
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn create(&self) -> Element {
        Element::new(self.element.as_str(), self.rows.len()).with_property(Property::list(
            self.properties[0].as_str(),
            self.list_kind,
            R::Value::KIND,
        ))
    }
}

impl<R: ListRow> ReadColumn for ListColumn<'_, R> {
    fn attach(&mut self, element: &Element) -> Result<()> {
        self.rows.attach(element, R::empty)
    }

    fn is_list(&self) -> bool {
        true
    }

    fn read_field(
        &mut self,
        row: usize,
        _field: usize,
        property: &Property,
        source: &mut dyn ScalarSource,
    ) -> Result<()> {
        let len = source.read_list_len(property)?;
        let rows = self
            .rows
            .as_mut_slice()
            .ok_or_else(|| Error::ReadOnlyColumn(self.element.clone()))?;
        let slot = rows.get_mut(row).ok_or_else(|| row_out_of_range(&self.element, row))?;

        slot.begin(len);
        let mut dropped = 0usize;
        for index in 0..len {
            let value = source.read_scalar(property.value_kind)?.cast::<R::Value>();
            if !slot.put(index, value) {
                dropped += 1;
            }
        }

        if dropped > 0 && self.strict {
            return Err(Error::InvalidListLength {
                property: format!("{}.{}", self.element, property.name),
                length: len.to_string(),
            });
        }
        Ok(())
    }
}

impl<R: ListRow> WriteColumn for ListColumn<'_, R> {
    fn write_row(&self, row: usize, sink: &mut dyn ScalarSink) -> Result<()> {
        let slot = self
            .rows
            .as_slice()
            .get(row)
            .ok_or_else(|| row_out_of_range(&self.element, row))?;
        let values = slot.values();
        sink.write_list_len(&self.properties[0], values.len(), self.list_kind)?;
        for value in values {
            sink.write_scalar(value.into_scalar())?;
        }
        Ok(())
    }
}
