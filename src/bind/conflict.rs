//! Static validation of a set of column bindings.

use std::collections::HashSet;

use crate::util::{Error, Result};

/// Reject bindings in which two columns claim the same element property.
///
/// Takes `(element, property names)` pairs, one per column. Runs before any
/// I/O and depends only on the columns themselves.
pub fn check_conflicts<'s, I>(columns: I) -> Result<()>
where
    I: IntoIterator<Item = (&'s str, &'s [String])>,
{
    let mut claimed: HashSet<(&str, &str)> = HashSet::new();
    for (element, properties) in columns {
        for property in properties {
            if !claimed.insert((element, property.as_str())) {
                return Err(Error::PropertyConflict {
                    element: element.to_string(),
                    property: property.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_disjoint() {
        let a = names(&["x", "y", "z"]);
        let b = names(&["nx", "ny", "nz"]);
        let c = names(&["x"]);
        let columns = [("vertex", &a[..]), ("vertex", &b[..]), ("camera", &c[..])];
        assert!(check_conflicts(columns).is_ok());
    }

    #[test]
    fn test_overlap() {
        let a = names(&["x", "y", "z"]);
        let b = names(&["x"]);
        let err = check_conflicts([("vertex", &a[..]), ("vertex", &b[..])]);
        assert!(matches!(
            err,
            Err(Error::PropertyConflict { element, property }) if element == "vertex" && property == "x"
        ));
    }
}
