//! Seams to the platform: map renderer, geolocation and modal prompts.
//!
//! The session never talks to a concrete widget toolkit; embedders implement
//! these traits over whatever map library hosts the session.

use foundation::{Coordinate, Polygon, ShapeId};
use serde::{Deserialize, Serialize};

use crate::style::ShapeStyle;

/// Handle to a layer the session added to the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileLayerConfig {
    /// Template with `{id}`, `{z}`, `{x}`, `{y}` and `{accessToken}`
    /// placeholders.
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    pub id: String,
    pub tile_size: u32,
    pub zoom_offset: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl TileLayerConfig {
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        self.url_template
            .replace("{id}", &self.id)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{accessToken}", self.access_token.as_deref().unwrap_or(""))
    }
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template:
                "https://api.mapbox.com/styles/v1/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}"
                    .to_string(),
            attribution: "Map data &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, Imagery \u{a9} <a href=\"https://www.mapbox.com/\">Mapbox</a>".to_string(),
            max_zoom: 18,
            id: "mapbox/streets-v11".to_string(),
            tile_size: 512,
            zoom_offset: -1,
            access_token: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolygonToolOptions {
    pub allow_intersection: bool,
    pub show_area: bool,
}

impl Default for PolygonToolOptions {
    fn default() -> Self {
        Self {
            allow_intersection: false,
            show_area: true,
        }
    }
}

/// Which drawing tools are offered. Only area shapes are enabled by
/// default since only areas can contain a reference vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawToolOptions {
    pub polygon: PolygonToolOptions,
    pub rectangle: bool,
    pub marker: bool,
    pub circlemarker: bool,
    pub polyline: bool,
    pub circle: bool,
}

impl Default for DrawToolOptions {
    fn default() -> Self {
        Self {
            polygon: PolygonToolOptions::default(),
            rectangle: true,
            marker: false,
            circlemarker: false,
            polyline: false,
            circle: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOptions {
    /// Upper bound the platform should wait before reporting
    /// `LocationUnavailable::Timeout`. `None` leaves it to the platform.
    pub timeout_ms: Option<u64>,
    pub maximum_age_ms: u64,
    pub enable_high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout_ms: Some(10_000),
            maximum_age_ms: 0,
            enable_high_accuracy: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapLayer {
    Tiles(TileLayerConfig),
    Circle {
        center: Coordinate,
        radius_m: f64,
        style: ShapeStyle,
    },
    Marker {
        position: Coordinate,
    },
    Polygon {
        polygon: Polygon,
        style: ShapeStyle,
    },
}

/// Map rendering collaborator.
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn add_layer(&mut self, layer: MapLayer) -> LayerHandle;
    fn bind_popup(&mut self, layer: LayerHandle, text: &str);
    fn attach_draw_tool(&mut self, options: &DrawToolOptions);
    /// Restyles a shape owned by the drawing tool.
    fn style_shape(&mut self, shape: ShapeId, style: &ShapeStyle);
    fn bind_shape_popup(&mut self, shape: ShapeId, text: &str);
}

/// One-shot device position request.
///
/// Implementations report the outcome exactly once through
/// `MapSession::location_resolved`.
pub trait Geolocator {
    fn request_position(&mut self, options: &PositionOptions);
}

/// Modal user interaction. Blocking is acceptable: it runs on the UI thread
/// while the user is deciding.
pub trait UserPrompt {
    /// Asks for a shape name; `None` when the user cancels.
    fn prompt_name(&mut self, message: &str) -> Option<String>;

    fn alert(&mut self, _message: &str) {}
}

impl<F> UserPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn prompt_name(&mut self, _message: &str) -> Option<String> {
        self()
    }
}
