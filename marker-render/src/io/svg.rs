use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Result, ensure};
use marker_placement::geometry::Geometry;
use marker_placement::geometry::primitives::{LineString, Point, Polygon, Rect};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Group, Path, Title};

use crate::render::{PlacedMarker, Scene, SymbolLayer};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgDrawOptions {
    ///The theme to use for the svg
    #[serde(default)]
    pub theme: SvgTheme,
    ///Draw the bounding box of every marker on top
    #[serde(default)]
    pub draw_bboxes: bool,
    ///Draw a dot at the anchor of every marker
    #[serde(default = "enabled")]
    pub draw_anchors: bool,
}

fn enabled() -> bool {
    true
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgTheme::default(),
            draw_bboxes: false,
            draw_anchors: true,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgTheme {
    pub stroke_width_multiplier: f64,
    pub canvas_fill: Color,
    pub feature_stroke: Color,
    pub polygon_fill: Color,
    /// Fill of the markers, cycled through per layer
    pub marker_fills: [Color; 4],
    pub bbox_stroke: Color,
}

impl Default for SvgTheme {
    fn default() -> Self {
        SvgTheme::EARTH_TONES
    }
}

impl SvgTheme {
    pub const EARTH_TONES: SvgTheme = SvgTheme {
        stroke_width_multiplier: 2.0,
        canvas_fill: Color(0xF5, 0xEB, 0xDC),
        feature_stroke: Color(0x6B, 0x4F, 0x2E),
        polygon_fill: Color(0xCC, 0x82, 0x4A),
        marker_fills: [
            Color(0xFF, 0xC8, 0x79),
            Color(0x2E, 0x8B, 0x57),
            Color(0x46, 0x82, 0xB4),
            Color(0xB2, 0x22, 0x22),
        ],
        bbox_stroke: Color(0xFF, 0x00, 0x00),
    };

    pub const GRAY: SvgTheme = SvgTheme {
        stroke_width_multiplier: 2.5,
        canvas_fill: Color(0xFF, 0xFF, 0xFF),
        feature_stroke: Color(0x2D, 0x2D, 0x2D),
        polygon_fill: Color(0xD3, 0xD3, 0xD3),
        marker_fills: [
            Color(0x7A, 0x7A, 0x7A),
            Color(0x63, 0x63, 0x63),
            Color(0x4A, 0x4A, 0x4A),
            Color(0x30, 0x30, 0x30),
        ],
        bbox_stroke: Color(0xD0, 0x00, 0x00),
    };
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color(u8, u8, u8);

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        ensure!(
            hex.len() == 6 && hex.is_ascii(),
            "color must be formatted as #RRGGBB: {s:?}"
        );
        let r = u8::from_str_radix(&hex[0..2], 16)?;
        let g = u8::from_str_radix(&hex[2..4], 16)?;
        let b = u8::from_str_radix(&hex[4..6], 16)?;
        Ok(Color(r, g, b))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Draws the canvas, the features and the markers of every layer
pub fn scene_to_svg(
    scene: &Scene,
    placed: &[Vec<PlacedMarker>],
    options: SvgDrawOptions,
) -> Document {
    let theme = &options.theme;
    let canvas = scene.canvas;
    let margin = 0.025 * f64::max(canvas.width(), canvas.height());
    let stroke_width =
        f64::min(canvas.width(), canvas.height()) * 0.001 * theme.stroke_width_multiplier;

    let canvas_group = Group::new().set("id", "canvas").add(
        data_to_path(
            rect_data(&canvas),
            &[
                ("fill", &*theme.canvas_fill.to_string()),
                ("stroke", "black"),
                ("stroke-width", &*format!("{stroke_width}")),
            ],
        )
        .add(Title::new(format!(
            "canvas, bbox: [x_min: {:.3}, y_min: {:.3}, x_max: {:.3}, y_max: {:.3}]",
            canvas.x_min, canvas.y_min, canvas.x_max, canvas.y_max
        ))),
    );

    let features_group = scene.features.iter().fold(
        Group::new().set("id", "features"),
        |group, feature| {
            let feature_group = geometry_group(&feature.geometry, &options, stroke_width)
                .set("id", format!("feature_{}", feature.id))
                .add(Title::new(format!("feature, id: {}", feature.id)));
            group.add(feature_group)
        },
    );

    let mut document = Document::new()
        .set(
            "viewBox",
            (
                canvas.x_min - margin,
                canvas.y_min - margin,
                canvas.width() + 2.0 * margin,
                canvas.height() + 2.0 * margin,
            ),
        )
        .add(canvas_group)
        .add(features_group);

    for (i, (layer, markers)) in scene.layers.iter().zip(placed).enumerate() {
        let fill = theme.marker_fills[i % theme.marker_fills.len()];
        document = document.add(layer_group(layer, markers, fill, &options, stroke_width));
    }
    document
}

fn layer_group(
    layer: &SymbolLayer,
    markers: &[PlacedMarker],
    fill: Color,
    options: &SvgDrawOptions,
    stroke_width: f64,
) -> Group {
    let mut group = Group::new().set("id", format!("layer_{}", layer.name));
    for marker in markers {
        let p = &marker.position;
        //outline of the marker itself, not of its axis-aligned bounding box
        let t = layer.params.transform.clone().rotate(p.angle).translate((p.x, p.y));
        let outline = layer.params.size.corners().map(|Point(x, y)| t.apply(x, y));
        let data = outline[1..]
            .iter()
            .fold(Data::new().move_to(outline[0]), |data, &c| data.line_to(c))
            .close();
        group = group.add(
            data_to_path(
                data,
                &[
                    ("fill", &*fill.to_string()),
                    ("fill-opacity", "0.8"),
                    ("stroke", "black"),
                    ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
                ],
            )
            .add(Title::new(format!(
                "marker, layer: {}, feature: {}, x: {:.3}, y: {:.3}, angle: {:.3}",
                layer.name, marker.feature_id, p.x, p.y, p.angle
            ))),
        );
        if options.draw_bboxes {
            group = group.add(data_to_path(
                rect_data(&marker.bbox),
                &[
                    ("fill", "none"),
                    ("stroke", &*options.theme.bbox_stroke.to_string()),
                    ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
                    ("stroke-dasharray", &*format!("{}", 2.0 * stroke_width)),
                ],
            ));
        }
        if options.draw_anchors {
            group = group.add(point(p.point(), Some("black"), Some(stroke_width)));
        }
    }
    group
}

fn geometry_group(geometry: &Geometry, options: &SvgDrawOptions, stroke_width: f64) -> Group {
    let theme = &options.theme;
    let stroke = theme.feature_stroke.to_string();
    geometry.parts().fold(Group::new(), |group, part| match part {
        Geometry::Point(p) => group.add(point(*p, Some(&stroke), Some(2.0 * stroke_width))),
        Geometry::LineString(l) => group.add(data_to_path(
            line_string_data(l),
            &[
                ("fill", "none"),
                ("stroke", &*stroke),
                ("stroke-width", &*format!("{stroke_width}")),
                ("stroke-linecap", "round"),
                ("stroke-linejoin", "round"),
            ],
        )),
        Geometry::Polygon(p) => group.add(data_to_path(
            polygon_data(p),
            &[
                ("fill", &*theme.polygon_fill.to_string()),
                ("fill-opacity", "0.5"),
                ("stroke", &*stroke),
                ("stroke-width", &*format!("{stroke_width}")),
            ],
        )),
        Geometry::Multi(_) => group,
    })
}

pub fn data_to_path(data: Data, params: &[(&str, &str)]) -> Path {
    let mut path = Path::new();
    for param in params {
        path = path.set(param.0, param.1)
    }
    path.set("d", data)
}

pub fn point(Point(x, y): Point, fill: Option<&str>, rad: Option<f64>) -> Circle {
    Circle::new()
        .set("cx", x)
        .set("cy", y)
        .set("r", rad.unwrap_or(0.5))
        .set("fill", fill.unwrap_or("black"))
}

pub fn line_string_data(line: &LineString) -> Data {
    let first = line.first();
    line.vertices()[1..]
        .iter()
        .fold(Data::new().move_to((first.0, first.1)), |data, p| {
            data.line_to((p.0, p.1))
        })
}

pub fn polygon_data(polygon: &Polygon) -> Data {
    let first = polygon.vertex(0);
    polygon.vertices[1..]
        .iter()
        .fold(Data::new().move_to((first.0, first.1)), |data, p| {
            data.line_to((p.0, p.1))
        })
        .close()
}

pub fn rect_data(rect: &Rect) -> Data {
    Data::new()
        .move_to((rect.x_min, rect.y_min))
        .line_to((rect.x_max, rect.y_min))
        .line_to((rect.x_max, rect.y_max))
        .line_to((rect.x_min, rect.y_max))
        .close()
}
