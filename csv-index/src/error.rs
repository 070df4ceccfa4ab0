use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CsvIndexError>;

#[derive(Debug, Error)]
pub enum CsvIndexError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no header row")]
    MissingHeaders,

    #[error("no geometry column (wkt, geojson or x/y) in headers: {0}")]
    MissingGeometryColumn(String),

    #[error("row {row}: missing value for column {column:?}")]
    MissingValue { row: u64, column: String },

    #[error("row {row}: value of column {column:?} is not valid UTF-8")]
    InvalidEncoding {
        row: u64,
        column: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("row {row}: invalid coordinate {value:?}")]
    InvalidCoordinate {
        row: u64,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("row {row}: invalid WKT geometry {value:?}")]
    InvalidWkt { row: u64, value: String },

    #[error("row {row}: invalid GeoJSON geometry: {source}")]
    InvalidGeoJson {
        row: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("row {row}: geometry has no coordinates")]
    EmptyGeometry { row: u64 },
}

impl CsvIndexError {
    /// Errors confined to a single row, which are skipped unless parsing strictly
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            CsvIndexError::MissingValue { .. }
                | CsvIndexError::InvalidEncoding { .. }
                | CsvIndexError::InvalidCoordinate { .. }
                | CsvIndexError::InvalidWkt { .. }
                | CsvIndexError::InvalidGeoJson { .. }
                | CsvIndexError::EmptyGeometry { .. }
        )
    }
}
