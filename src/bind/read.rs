//! Read orchestration: drive column bindings across a file body.

use std::io::BufRead;

use super::column::ReadColumn;
use super::conflict::check_conflicts;
use crate::file::{PlyReader, ScalarSource};
use crate::util::{Error, Result};

/// Where one on-disk property goes while reading rows.
#[derive(Clone, Copy, Debug)]
enum Target {
    /// Consume and drop.
    Skip,
    /// Parse into `columns[column]`, field `field`.
    Bound { column: usize, field: usize },
}

fn shape(is_list: bool) -> &'static str {
    if is_list { "list" } else { "scalar" }
}

/// Fill every column from the reader's body.
///
/// Elements are visited in file order. Properties are consumed in on-disk
/// order; unbound ones are skipped value by value. Columns are validated
/// against each other before the header is touched.
///
/// Elements with no rows are skipped entirely, and columns naming an element
/// the file does not declare are left untouched.
pub fn bind_read<R: BufRead>(
    reader: &mut PlyReader<R>,
    columns: &mut [&mut dyn ReadColumn],
) -> Result<()> {
    check_conflicts(columns.iter().map(|c| (c.element_name(), c.property_names())))?;

    let (document, body) = reader.split()?;
    tracing::debug!(columns = columns.len(), elements = document.elements.len(), "binding columns for read");

    for column in columns.iter() {
        if document.element(column.element_name()).is_none() {
            tracing::debug!(element = column.element_name(), "column targets an element absent from file");
        }
    }

    for element in &document.elements {
        if element.count == 0 {
            continue;
        }

        let mut plan = vec![Target::Skip; element.properties.len()];
        for (index, column) in columns.iter_mut().enumerate() {
            if column.element_name() != element.name {
                continue;
            }
            column.attach(element)?;

            for (field, name) in column.property_names().iter().enumerate() {
                let position = element.property_index(name).ok_or_else(|| Error::MissingProperty {
                    element: element.name.clone(),
                    property: name.clone(),
                })?;
                let property = &element.properties[position];
                if property.is_list() != column.is_list() {
                    return Err(Error::TypeMismatch {
                        element: element.name.clone(),
                        property: name.clone(),
                        expected: shape(column.is_list()).to_string(),
                        actual: property.type_name(),
                    });
                }
                plan[position] = Target::Bound { column: index, field };
            }
        }

        tracing::trace!(
            element = %element.name,
            rows = element.count,
            bound = plan.iter().filter(|t| matches!(t, Target::Bound { .. })).count(),
            "reading element"
        );

        for row in 0..element.count {
            for (property, target) in element.properties.iter().zip(&plan) {
                match *target {
                    Target::Skip => body.skip_property(property)?,
                    Target::Bound { column, field } => {
                        columns[column].read_field(row, field, property, &mut *body)?
                    }
                }
            }
        }
    }

    Ok(())
}
