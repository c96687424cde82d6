//! Replays a recorded drawing session against a log-only map and prints the
//! resulting annotation list.
//!
//! annotate_replay <events.json> [--at LAT,LON]
//!
//! `events.json` is an array of
//! `{"event": "draw:created", "id": 1, "name": "A", "geometry": {...}}`,
//! `{"event": "draw:edited", "shapes": [{"id": 1, "geometry": {...}}]}` and
//! `{"event": "draw:deleted", "ids": [1]}` entries. Without `--at` the
//! position request is reported as denied and the fallback center is used.

use std::collections::VecDeque;
use std::env;
use std::fs;

use annotations::AnnotationListView;
use foundation::{Coordinate, ShapeId};
use serde_json::Value;
use session::{
    DrawEvent, DrawEventKind, DrawToolOptions, DrawnShape, Geolocator, LayerHandle,
    LocationUnavailable, MapLayer, MapSession, MapSurface, PositionOptions, SessionConfig,
    ShapeStyle, logging,
};
use tracing::info;

#[derive(Debug, Default)]
struct LogMap {
    next_layer: u64,
}

impl MapSurface for LogMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        info!(lat = center.latitude, lon = center.longitude, zoom, "set view");
    }

    fn add_layer(&mut self, layer: MapLayer) -> LayerHandle {
        let handle = LayerHandle(self.next_layer);
        self.next_layer += 1;
        let kind = match &layer {
            MapLayer::Tiles(_) => "tiles",
            MapLayer::Circle { .. } => "circle",
            MapLayer::Marker { .. } => "marker",
            MapLayer::Polygon { .. } => "polygon",
        };
        info!(layer = handle.0, kind, "add layer");
        handle
    }

    fn bind_popup(&mut self, layer: LayerHandle, text: &str) {
        info!(layer = layer.0, text, "bind popup");
    }

    fn attach_draw_tool(&mut self, options: &DrawToolOptions) {
        info!(rectangle = options.rectangle, "draw tool attached");
    }

    fn style_shape(&mut self, shape: ShapeId, style: &ShapeStyle) {
        info!(shape = shape.get(), color = %style.color, "style shape");
    }

    fn bind_shape_popup(&mut self, shape: ShapeId, text: &str) {
        info!(shape = shape.get(), text, "bind shape popup");
    }
}

/// Position is supplied from the command line after `attach`.
struct DeferredGeolocator;

impl Geolocator for DeferredGeolocator {
    fn request_position(&mut self, options: &PositionOptions) {
        info!(timeout_ms = ?options.timeout_ms, "position requested");
    }
}

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    logging::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(path) = args.first() else {
        return Err(usage());
    };
    let position = match args.get(1).map(String::as_str) {
        None => Err(LocationUnavailable::PermissionDenied),
        Some("--at") => Ok(parse_lat_lon(args.get(2).ok_or_else(usage)?)?),
        Some(other) => return Err(format!("unknown arg: {other}\n\n{}", usage())),
    };

    let config = SessionConfig::from_env().map_err(|e| e.to_string())?;
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let script: Value = serde_json::from_str(&payload).map_err(|e| format!("parse {path:?}: {e}"))?;
    let entries = script
        .as_array()
        .ok_or_else(|| "event script must be a JSON array".to_string())?;

    let mut names: VecDeque<Option<String>> = entries
        .iter()
        .filter(|e| e["event"] == DrawEventKind::Created.leaflet_name())
        .map(|e| e["name"].as_str().map(str::to_string))
        .collect();
    let prompt = move || names.pop_front().flatten();

    let mut session = MapSession::new(config, LogMap::default(), DeferredGeolocator, prompt);
    session.attach().map_err(|e| e.to_string())?;
    session.location_resolved(position);

    for (i, entry) in entries.iter().enumerate() {
        let event = parse_event(entry).map_err(|e| format!("event {i}: {e}"))?;
        session
            .handle(&event)
            .map_err(|e| format!("event {i}: {e}"))?;
    }

    let mut view = AnnotationListView::new();
    view.refresh(session.store());
    print!("{}", view.render_text());
    Ok(())
}

fn parse_lat_lon(arg: &str) -> Result<Coordinate, String> {
    let (lat, lon) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {arg:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude {lat:?}: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude {lon:?}: {e}"))?;
    Coordinate::checked(lat, lon).map_err(|e| e.to_string())
}

fn parse_id(value: &Value) -> Result<ShapeId, String> {
    value
        .as_u64()
        .map(ShapeId::new)
        .ok_or_else(|| format!("invalid shape id: {value}"))
}

fn parse_shape(value: &Value) -> Result<DrawnShape, String> {
    let id = parse_id(&value["id"])?;
    DrawnShape::from_geojson(id, &value["geometry"]).map_err(|e| e.to_string())
}

fn parse_event(entry: &Value) -> Result<DrawEvent, String> {
    let name = entry["event"].as_str().unwrap_or_default();
    match DrawEventKind::from_leaflet_name(name) {
        Some(DrawEventKind::Created) => Ok(DrawEvent::Created(parse_shape(entry)?)),
        Some(DrawEventKind::Edited) => {
            let shapes = entry["shapes"]
                .as_array()
                .ok_or_else(|| "draw:edited needs a shapes array".to_string())?;
            Ok(DrawEvent::Edited(
                shapes.iter().map(parse_shape).collect::<Result<_, _>>()?,
            ))
        }
        Some(DrawEventKind::Deleted) => {
            let ids = entry["ids"]
                .as_array()
                .ok_or_else(|| "draw:deleted needs an ids array".to_string())?;
            Ok(DrawEvent::Deleted(
                ids.iter().map(parse_id).collect::<Result<_, _>>()?,
            ))
        }
        None => Err(format!("unknown event {name:?}")),
    }
}

fn usage() -> String {
    "usage: annotate_replay <events.json> [--at LAT,LON]".to_string()
}

#[cfg(test)]
mod tests {
    use super::{parse_event, parse_lat_lon};
    use foundation::{Coordinate, ShapeId};
    use serde_json::json;
    use session::{DrawEvent, DrawEventKind};

    #[test]
    fn parses_recorded_events() {
        let created = parse_event(&json!({
            "event": "draw:created",
            "id": 3,
            "name": "A",
            "geometry": {"type": "Point", "coordinates": [77.1, 28.7]}
        }))
        .expect("created");
        assert_eq!(created.kind(), DrawEventKind::Created);

        let deleted = parse_event(&json!({"event": "draw:deleted", "ids": [3, 4]})).expect("deleted");
        assert_eq!(deleted, DrawEvent::Deleted(vec![ShapeId::new(3), ShapeId::new(4)]));

        assert!(parse_event(&json!({"event": "draw:edited"})).is_err());
        assert!(parse_event(&json!({"event": "draw:moved"})).is_err());
    }

    #[test]
    fn parses_position_argument() {
        assert_eq!(parse_lat_lon("28.7, 77.1"), Ok(Coordinate::new(28.7, 77.1)));
        assert!(parse_lat_lon("95,0").is_err());
        assert!(parse_lat_lon("28.7").is_err());
    }
}
