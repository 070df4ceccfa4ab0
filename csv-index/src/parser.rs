use csv::{ByteRecord, ReaderBuilder, Trim};
use log::{debug, warn};
use marker_placement::geometry::primitives::{Point, Rect};

use crate::error::{CsvIndexError, Result};
use crate::geometry::{geojson_bbox, wkt_bbox};
use crate::{CsvIndexOptions, IndexEntry};

const X_NAMES: [&str; 5] = ["x", "lon", "lng", "long", "longitude"];
const Y_NAMES: [&str; 3] = ["y", "lat", "latitude"];

/// Columns holding the geometry of a row
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeometryColumns {
    Wkt(usize),
    GeoJson(usize),
    XY { x: usize, y: usize },
}

impl GeometryColumns {
    /// Detects the geometry columns from the header names (case insensitive).
    /// A `wkt` column takes precedence over a `geojson` column, which takes precedence over a pair
    /// of coordinate columns.
    pub fn detect(headers: &ByteRecord) -> Result<Self> {
        let names = headers
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim()
                    .trim_start_matches('\u{feff}')
                    .to_ascii_lowercase()
            })
            .collect::<Vec<_>>();
        let position = |candidates: &[&str]| {
            names
                .iter()
                .position(|n| candidates.iter().any(|c| *c == n.as_str()))
        };

        if let Some(i) = position(&["wkt"]) {
            return Ok(GeometryColumns::Wkt(i));
        }
        if let Some(i) = position(&["geojson"]) {
            return Ok(GeometryColumns::GeoJson(i));
        }
        match (position(&X_NAMES), position(&Y_NAMES)) {
            (Some(x), Some(y)) => Ok(GeometryColumns::XY { x, y }),
            _ => Err(CsvIndexError::MissingGeometryColumn(names.join(","))),
        }
    }
}

/// Parses a CSV file row by row, collecting the bounding box of every row's geometry.
///
/// The aggregate extent is kept up to date while parsing, so it remains available after a failure.
#[derive(Clone, Debug)]
pub struct CsvFileParser {
    options: CsvIndexOptions,
    extent: Option<Rect>,
}

impl CsvFileParser {
    pub fn new(options: CsvIndexOptions) -> Self {
        Self {
            options,
            extent: None,
        }
    }

    /// Union of the boxes of all rows parsed so far
    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.options.separator)
            .quote(self.options.quote)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::Headers);
        builder
    }

    /// Parses `data`, appending a `(bbox, (offset, size))` entry for every row with a valid
    /// geometry to `boxes`. `offset` and `size` locate the row's bytes within `data`, without line
    /// terminator.
    pub fn parse(&mut self, data: &[u8], boxes: &mut Vec<IndexEntry>) -> Result<()> {
        let mut reader = self.reader_builder().from_reader(data);
        //rows are kept as raw bytes, only the geometry columns have to be valid UTF-8
        let mut record = ByteRecord::new();

        let headers = match &self.options.manual_headers {
            Some(manual) => {
                let mut header_reader = self.reader_builder().from_reader(manual.as_bytes());
                let mut headers = ByteRecord::new();
                match header_reader.read_byte_record(&mut headers)? {
                    true => headers,
                    false => return Err(CsvIndexError::MissingHeaders),
                }
            }
            None => match reader.read_byte_record(&mut record)? {
                true => record.clone(),
                false => return Err(CsvIndexError::MissingHeaders),
            },
        };
        let columns = GeometryColumns::detect(&headers)?;
        debug!("[CSV] geometry columns: {columns:?}");

        let mut n_skipped = 0;
        while reader.read_byte_record(&mut record)? {
            let start = record.position().map_or(0, |p| p.byte());
            let row = record.position().map_or(0, |p| p.line());
            let end = reader.position().byte();
            let locator = record_locator(data, start, end);

            match self.row_bbox(&record, &columns, row) {
                Ok(bbox) => {
                    boxes.push((bbox, locator));
                    self.extent = Some(match self.extent {
                        Some(extent) => Rect::bounding_rect(extent, bbox),
                        None => bbox,
                    });
                }
                Err(e) if e.is_row_error() && !self.options.strict => {
                    warn!("[CSV] skipping {e}");
                    n_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        if n_skipped > 0 {
            warn!("[CSV] {n_skipped} row(s) without a valid geometry were skipped");
        }
        Ok(())
    }

    fn row_bbox(&self, record: &ByteRecord, columns: &GeometryColumns, row: u64) -> Result<Rect> {
        let value = |i: usize, column: &str| {
            let raw = record.get(i).unwrap_or_default();
            let v = std::str::from_utf8(raw)
                .map_err(|source| CsvIndexError::InvalidEncoding {
                    row,
                    column: column.to_string(),
                    source,
                })?
                .trim();
            match v.is_empty() {
                false => Ok(v),
                true => Err(CsvIndexError::MissingValue {
                    row,
                    column: column.to_string(),
                }),
            }
        };
        let coordinate = |i: usize, column: &str| {
            let v = value(i, column)?;
            v.parse::<f64>()
                .map_err(|source| CsvIndexError::InvalidCoordinate {
                    row,
                    value: v.to_string(),
                    source,
                })
        };

        match *columns {
            GeometryColumns::XY { x, y } => {
                let point = Point(coordinate(x, "x")?, coordinate(y, "y")?);
                Ok(Rect::from_point(point))
            }
            GeometryColumns::Wkt(i) => {
                let wkt = value(i, "wkt")?;
                wkt_bbox(wkt).ok_or_else(|| CsvIndexError::InvalidWkt {
                    row,
                    value: wkt.to_string(),
                })
            }
            GeometryColumns::GeoJson(i) => {
                let geojson = value(i, "geojson")?;
                geojson_bbox(geojson)
                    .map_err(|source| CsvIndexError::InvalidGeoJson { row, source })?
                    .ok_or(CsvIndexError::EmptyGeometry { row })
            }
        }
    }
}

/// `(offset, size)` of the raw record spanning `start..end`, without surrounding line terminators
fn record_locator(data: &[u8], start: u64, end: u64) -> (u64, u64) {
    let raw = &data[start as usize..end as usize];
    let is_terminator = |b: &u8| matches!(b, b'\n' | b'\r');
    let leading = raw.iter().take_while(|b| is_terminator(b)).count();
    let trailing = raw[leading..].iter().rev().take_while(|b| is_terminator(b)).count();
    let offset = start + leading as u64;
    (offset, (raw.len() - leading - trailing) as u64)
}
