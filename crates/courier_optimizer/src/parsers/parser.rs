use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use thiserror::Error;

use crate::problem::distance_index::DistanceTableError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Table(#[from] DistanceTableError),

    #[error("Package table header row not found")]
    PackageHeaderNotFound,
}

/// A parser for one of the CSV input tables.
pub trait TableParser {
    type Output;

    fn parse_reader<R: Read>(&self, reader: R) -> Result<Self::Output, ParseError>;

    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<Self::Output, ParseError> {
        let path = file.as_ref();
        let file = File::open(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;

        self.parse_reader(BufReader::new(file))
    }
}

/// Reads every record as trimmed-free text cells. Records may have any
/// length and invalid UTF-8 is replaced rather than rejected.
pub(crate) fn read_records<R: Read>(reader: R) -> Result<Vec<Vec<String>>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = vec![];
    for record in reader.byte_records() {
        let record = record?;
        records.push(
            record
                .iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .collect::<Vec<_>>(),
        );
    }

    if let Some(first) = records.first_mut().and_then(|record| record.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_owned();
        }
    }

    Ok(records)
}
