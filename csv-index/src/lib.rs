//! Builds the entries of a bounding-box spatial index for a CSV file.
//!
//! Every row with a valid geometry yields its bounding box together with the location of the row
//! in the file, so the row can be read back directly once the index has been queried.

use std::path::Path;
use std::sync::Arc;

use log::{debug, error};
use marker_placement::geometry::primitives::Rect;

mod error;
mod file_cache;
mod geometry;
mod parser;

#[doc(inline)]
pub use error::{CsvIndexError, Result};
#[doc(inline)]
pub use file_cache::FileCache;
#[doc(inline)]
pub use geometry::{geojson_bbox, wkt_bbox};
#[doc(inline)]
pub use parser::{CsvFileParser, GeometryColumns};

/// Bounding box of a row, together with its `(offset, size)` in bytes within the file
pub type IndexEntry = (Rect, (u64, u64));

/// Dialect and behavior of the CSV parse
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvIndexOptions {
    /// Header row to use instead of the first line of the file, which is then treated as data
    pub manual_headers: Option<String>,
    pub separator: u8,
    pub quote: u8,
    /// Read the file through the process-wide [`FileCache`]
    pub use_file_cache: bool,
    /// Fail on the first row without a valid geometry instead of skipping it
    pub strict: bool,
}

impl Default for CsvIndexOptions {
    fn default() -> Self {
        Self {
            manual_headers: None,
            separator: b',',
            quote: b'"',
            use_file_cache: false,
            strict: false,
        }
    }
}

/// Appends an [`IndexEntry`] for every row of the CSV file at `path` to `boxes`.
///
/// Returns whether the whole file was processed, together with the union of all boxes found.
/// Errors are never propagated: they are logged and `false` is returned along with the extent of the rows
/// processed before the failure, `None` if there were none.
pub fn process_csv_file(
    boxes: &mut Vec<IndexEntry>,
    path: &Path,
    options: &CsvIndexOptions,
) -> (bool, Option<Rect>) {
    let loaded: Result<Arc<[u8]>> = match options.use_file_cache {
        true => FileCache::global().find(path),
        false => file_cache::read_file(path).map(Arc::from),
    };
    let data = match loaded {
        Ok(data) => data,
        Err(e) => {
            error!("[CSV] {e}");
            return (false, None);
        }
    };

    let mut parser = CsvFileParser::new(options.clone());
    let n_boxes = boxes.len();
    match parser.parse(&data, boxes) {
        Ok(()) => {
            debug!(
                "[CSV] indexed {} row(s) of {path:?}, extent: {:?}",
                boxes.len() - n_boxes,
                parser.extent()
            );
            (true, parser.extent())
        }
        Err(e) => {
            error!("[CSV] {path:?}: {e}");
            (false, parser.extent())
        }
    }
}
