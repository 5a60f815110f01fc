use serde::Serialize;

use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

/// The depot is always the first column of the distance table.
pub const DEPOT: LocationIdx = LocationIdx::new(0);

/// A column of the distance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    name: String,
    street: String,
}

impl Location {
    pub fn new(name: impl Into<String>, street: impl Into<String>) -> Self {
        Location {
            name: name.into(),
            street: street.into(),
        }
    }

    /// Reads a header cell: the first non-empty line is the display name, the
    /// street is the first later line containing a digit (or the name itself).
    pub fn from_header_cell(cell: &str) -> Option<Location> {
        let mut lines = cell.lines().map(str::trim).filter(|line| !line.is_empty());

        let name = lines.next()?;
        let street = lines
            .find(|line| line.chars().any(|c| c.is_ascii_digit()))
            .unwrap_or(name);

        Some(Location::new(name, street))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn street(&self) -> &str {
        &self.street
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_cell() {
        let location = Location::from_header_cell(
            "Sugar House Park\n 1330 2100 S\n Salt Lake City, UT 84106",
        )
        .unwrap();
        assert_eq!(location.name(), "Sugar House Park");
        assert_eq!(location.street(), "1330 2100 S");

        let location = Location::from_header_cell("Western Governors University\nSalt Lake City").unwrap();
        assert_eq!(location.street(), "Western Governors University");

        assert!(Location::from_header_cell(" \n ").is_none());
    }
}
