//! Write orchestration: emit a header and body from column bindings.

use std::io::Write;

use super::column::WriteColumn;
use super::conflict::check_conflicts;
use crate::core::Element;
use crate::file::PlyWriter;
use crate::util::{Error, Result};

/// Register the columns' elements, write the header, then every row.
///
/// Columns sharing an element name are merged into one element, their
/// properties concatenated in argument order; they must agree on row count.
/// Within a row each column writes its fields in its own order, and a line
/// terminator follows the last column.
pub fn bind_write<W: Write>(writer: &mut PlyWriter<W>, columns: &[&dyn WriteColumn]) -> Result<()> {
    check_conflicts(columns.iter().map(|c| (c.element_name(), c.property_names())))?;

    // Element plus the indices of the columns contributing to it.
    let mut groups: Vec<(Element, Vec<usize>)> = Vec::new();
    for (index, column) in columns.iter().enumerate() {
        let created = column.create();
        match groups.iter_mut().find(|(e, _)| e.name == created.name) {
            Some((element, members)) => {
                if element.count != created.count {
                    return Err(Error::ElementCountMismatch {
                        element: created.name,
                        expected: element.count,
                        actual: created.count,
                    });
                }
                element.properties.extend(created.properties);
                members.push(index);
            }
            None => groups.push((created, vec![index])),
        }
    }

    tracing::debug!(columns = columns.len(), elements = groups.len(), "binding columns for write");
    for (element, _) in &groups {
        writer.add_element(element.clone())?;
    }
    writer.write_header()?;

    for (element, members) in &groups {
        tracing::trace!(element = %element.name, rows = element.count, "writing element");
        for row in 0..element.count {
            for &index in members {
                columns[index].write_row(row, &mut *writer)?;
            }
            writer.write_line_end()?;
        }
    }

    writer.flush()
}
