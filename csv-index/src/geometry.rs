use marker_placement::geometry::primitives::{Point, Rect};
use serde_json::Value;

const WKT_TYPES: [&str; 7] = [
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
];

/// Bounding box of a WKT geometry.
///
/// Only the first two ordinates of every coordinate are considered, Z and M values are ignored.
/// Returns `None` if the text is not valid WKT or the geometry is empty.
pub fn wkt_bbox(wkt: &str) -> Option<Rect> {
    let wkt = wkt.trim();
    let open = wkt.find('(')?;
    let keyword = wkt[..open].split_whitespace().next()?.to_ascii_uppercase();
    if !WKT_TYPES.contains(&keyword.as_str()) || !parentheses_balanced(&wkt[open..]) {
        return None;
    }

    let mut points = vec![];
    for tuple in wkt[open..].split([',', '(', ')']) {
        let tuple = tuple.trim();
        if tuple.is_empty() {
            continue;
        }
        //nested geometry type inside a collection
        if WKT_TYPES.contains(&tuple.to_ascii_uppercase().as_str()) {
            continue;
        }
        let mut ordinates = tuple.split_whitespace().map(str::parse::<f64>);
        match (ordinates.next(), ordinates.next()) {
            (Some(Ok(x)), Some(Ok(y))) if x.is_finite() && y.is_finite() => {
                points.push(Point(x, y))
            }
            _ => return None,
        }
    }
    Rect::from_points(points)
}

fn parentheses_balanced(s: &str) -> bool {
    let mut depth = 0_i32;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// Bounding box of a GeoJSON geometry object (or feature).
/// Returns `Ok(None)` if the geometry holds no coordinates.
pub fn geojson_bbox(geojson: &str) -> serde_json::Result<Option<Rect>> {
    let value: Value = serde_json::from_str(geojson)?;
    let mut points = vec![];
    collect_geojson_points(&value, &mut points);
    Ok(Rect::from_points(points))
}

fn collect_geojson_points(value: &Value, points: &mut Vec<Point>) {
    let Value::Object(object) = value else {
        return;
    };
    if let Some(coordinates) = object.get("coordinates") {
        collect_positions(coordinates, points);
    }
    if let Some(Value::Array(geometries)) = object.get("geometries") {
        geometries
            .iter()
            .for_each(|g| collect_geojson_points(g, points));
    }
    if let Some(geometry) = object.get("geometry") {
        collect_geojson_points(geometry, points);
    }
}

fn collect_positions(value: &Value, points: &mut Vec<Point>) {
    let Value::Array(items) = value else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => points.push(Point(x, y)),
        _ => items.iter().for_each(|item| collect_positions(item, points)),
    }
}
