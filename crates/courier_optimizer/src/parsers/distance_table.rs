use std::io::Read;

use tracing::{debug, warn};

use crate::{
    parsers::parser::{ParseError, TableParser, read_records},
    problem::{
        distance_index::{DistanceIndexBuilder, DistanceTableError},
        location::Location,
    },
};

/// Location columns and matrix values start at this column.
const FIRST_LOCATION_COLUMN: usize = 2;

/// Reads the distance table: a header row naming each location followed by
/// one lower-triangular matrix row per location.
pub struct DistanceTableParser {
    depot_name: String,
}

impl DistanceTableParser {
    pub fn new(depot_name: impl Into<String>) -> Self {
        DistanceTableParser {
            depot_name: depot_name.into(),
        }
    }

    fn is_header(&self, record: &[String]) -> bool {
        record.len() > 5 && record.iter().any(|cell| cell.contains(&self.depot_name))
    }
}

impl TableParser for DistanceTableParser {
    type Output = DistanceIndexBuilder;

    fn parse_reader<R: Read>(&self, reader: R) -> Result<DistanceIndexBuilder, ParseError> {
        let records = read_records(reader)?;

        let header_row = records
            .iter()
            .position(|record| self.is_header(record))
            .ok_or(DistanceTableError::HeaderNotFound)?;

        let locations = records[header_row]
            .iter()
            .skip(FIRST_LOCATION_COLUMN)
            .filter_map(|cell| Location::from_header_cell(cell))
            .collect::<Vec<_>>();
        if locations.is_empty() {
            return Err(DistanceTableError::NoLocations.into());
        }

        let num_locations = locations.len();
        let depot = locations[0].name().to_owned();

        let mut builder = DistanceIndexBuilder::default();
        builder.set_locations(locations);
        if depot != self.depot_name {
            builder.add_alias(self.depot_name.as_str(), depot);
        }

        for (row, record) in records
            .iter()
            .skip(header_row + 1)
            .take(num_locations)
            .enumerate()
        {
            let values = (0..=row)
                .map(|column| {
                    let cell = record.get(FIRST_LOCATION_COLUMN + column)?.trim();
                    if cell.is_empty() {
                        return None;
                    }
                    match cell.parse::<f64>() {
                        Ok(distance) => Some(distance),
                        Err(_) => {
                            warn!(row, column, cell, "Ignoring non-numeric distance");
                            None
                        }
                    }
                })
                .collect::<Vec<_>>();

            builder.set_row(row, &values);
        }

        debug!(locations = num_locations, header_row, "Parsed distance table");

        Ok(builder)
    }
}
