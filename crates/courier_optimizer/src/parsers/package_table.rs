use std::io::Read;

use tracing::{debug, warn};

use crate::{
    parsers::parser::{ParseError, TableParser, read_records},
    problem::{
        deadline::Deadline,
        package::{Package, PackageBuilder},
        package_store::PackageStore,
    },
};

const MIN_CELLS: usize = 7;
const DEFAULT_STATE: &str = "UT";

/// Reads the package table. Columns after the header row are: ID, address,
/// city, state, zip, deadline, weight and optional notes.
#[derive(Default)]
pub struct PackageTableParser;

fn is_header(record: &[String]) -> bool {
    let joined = record.join(" ").to_lowercase();
    joined.contains("package") && joined.contains("id")
}

fn parse_package(record: &[String]) -> Option<Package> {
    let cell = |column: usize| record.get(column).map(|cell| cell.trim()).unwrap_or("");

    let id = match cell(0).parse::<u32>() {
        Ok(id) => id,
        Err(_) => {
            warn!(cell = cell(0), "Skipping package row without a numeric ID");
            return None;
        }
    };

    let weight = match cell(6) {
        "" => 0.0,
        text => text.parse::<f64>().unwrap_or_else(|_| {
            warn!(package = id, weight = text, "Unreadable weight, using 0");
            0.0
        }),
    };

    let state = match cell(3) {
        "" => DEFAULT_STATE,
        state => state,
    };

    let mut builder = PackageBuilder::new(id);
    builder
        .set_address(cell(1))
        .set_city(cell(2))
        .set_state(state)
        .set_zip_code(cell(4))
        .set_deadline(Deadline::parse(cell(5)))
        .set_weight(weight)
        .set_notes(cell(7));

    Some(builder.build())
}

impl TableParser for PackageTableParser {
    type Output = PackageStore;

    fn parse_reader<R: Read>(&self, reader: R) -> Result<PackageStore, ParseError> {
        let records = read_records(reader)?;

        let header_row = records
            .iter()
            .position(|record| is_header(record))
            .ok_or(ParseError::PackageHeaderNotFound)?;

        let mut packages = PackageStore::new();
        for record in &records[header_row + 1..] {
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            if record.len() < MIN_CELLS {
                warn!(cells = record.len(), "Skipping short package row");
                continue;
            }

            if let Some(package) = parse_package(record) {
                if !packages.insert(package) {
                    debug!("Duplicate package row, details updated");
                }
            }
        }

        debug!(packages = packages.len(), header_row, "Parsed package table");

        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::package::{PackageId, PackageStatus};

    use super::*;

    const TABLE: &str = "\
WGUPS Package File,,,,,,,
,,,,,,,
\"Package
ID\",Address,City,State,Zip,Delivery Deadline,Weight KILO,Special Notes
1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30 AM,21,
2,2530 S 500 E,Salt Lake City,,84106,EOD,44,
3,233 Canyon Rd,Salt Lake City,UT,84103,EOD,2,Can only be on truck 2
Total,,,,,,,
4,380 W 2880 S,Salt Lake City
5,410 S State St,Salt Lake City,UT,84111,EOD,heavy,Wrong address listed
,,,,,,,
";

    #[test]
    fn test_parse_packages() {
        let packages = PackageTableParser.parse_reader(TABLE.as_bytes()).unwrap();

        assert_eq!(packages.len(), 4);
        assert!(!packages.contains(PackageId::new(4)));

        let first = packages.get(PackageId::new(1)).unwrap();
        assert_eq!(first.address(), "195 W Oakland Ave");
        assert_eq!(first.zip_code(), "84115");
        assert_eq!(first.deadline().to_string(), "10:30 AM");
        assert_eq!(first.weight(), 21.0);
        assert_eq!(first.status(), PackageStatus::AtHub);

        let second = packages.get(PackageId::new(2)).unwrap();
        assert_eq!(second.state(), "UT");
        assert!(second.deadline().is_end_of_day());

        assert_eq!(
            packages.get(PackageId::new(3)).unwrap().notes(),
            "Can only be on truck 2"
        );
        assert_eq!(packages.get(PackageId::new(5)).unwrap().weight(), 0.0);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            PackageTableParser.parse_reader("1,2,3\n".as_bytes()),
            Err(ParseError::PackageHeaderNotFound)
        ));
    }
}
