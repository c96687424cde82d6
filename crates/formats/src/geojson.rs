//! GeoJSON interchange for the shapes exchanged with the map and drawing
//! tools. Only `Point` and `Polygon` geometries are understood; features
//! wrap a geometry and are otherwise ignored.

use foundation::{Coordinate, Geometry, Polygon};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonError {
    InvalidJson(String),
    InvalidGeometry(String),
    UnsupportedGeometry(String),
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::InvalidJson(msg) => write!(f, "JSON parse error: {msg}"),
            GeoJsonError::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            GeoJsonError::UnsupportedGeometry(ty) => {
                write!(f, "unsupported geometry type: {ty}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

pub fn geometry_from_geojson_str(payload: &str) -> Result<Geometry, GeoJsonError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| GeoJsonError::InvalidJson(e.to_string()))?;
    geometry_from_geojson_value(&value)
}

/// Parses a GeoJSON `Feature` or bare geometry object.
pub fn geometry_from_geojson_value(value: &Value) -> Result<Geometry, GeoJsonError> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("geometry must be an object"))?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("missing type"))?;

    if ty == "Feature" {
        let geometry = obj
            .get("geometry")
            .ok_or_else(|| invalid("feature missing geometry"))?;
        return geometry_from_geojson_value(geometry);
    }

    let coords = obj
        .get("coordinates")
        .ok_or_else(|| invalid("geometry missing coordinates"))?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_position(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(Polygon::new(parse_rings(coords)?))),
        other => Err(GeoJsonError::UnsupportedGeometry(other.to_string())),
    }
}

pub fn geometry_to_geojson_value(geom: &Geometry) -> Value {
    let mut obj = Map::new();
    match geom {
        Geometry::Point(c) => {
            obj.insert("type".to_string(), Value::String("Point".to_string()));
            obj.insert("coordinates".to_string(), position(c));
        }
        Geometry::Polygon(p) => {
            obj.insert("type".to_string(), Value::String("Polygon".to_string()));
            let rings = p
                .rings
                .iter()
                .map(|ring| Value::Array(ring.iter().map(position).collect()))
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(rings));
        }
    }
    Value::Object(obj)
}

/// Wraps a geometry in a `Feature` with the given properties.
pub fn feature_to_geojson_value(geom: &Geometry, properties: Map<String, Value>) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String("Feature".to_string()));
    obj.insert("properties".to_string(), Value::Object(properties));
    obj.insert("geometry".to_string(), geometry_to_geojson_value(geom));
    Value::Object(obj)
}

fn position(c: &Coordinate) -> Value {
    Value::Array(vec![Value::from(c.longitude), Value::from(c.latitude)])
}

fn invalid(msg: &str) -> GeoJsonError {
    GeoJsonError::InvalidGeometry(msg.to_string())
}

fn parse_position(value: &Value) -> Result<Coordinate, GeoJsonError> {
    let arr = value
        .as_array()
        .ok_or_else(|| invalid("position must be an array"))?;
    if arr.len() < 2 {
        return Err(invalid("position must have [lon, lat]"));
    }
    let lon = arr[0]
        .as_f64()
        .ok_or_else(|| invalid("lon must be a number"))?;
    let lat = arr[1]
        .as_f64()
        .ok_or_else(|| invalid("lat must be a number"))?;
    Coordinate::checked(lat, lon).map_err(|e| GeoJsonError::InvalidGeometry(e.to_string()))
}

fn parse_rings(value: &Value) -> Result<Vec<Vec<Coordinate>>, GeoJsonError> {
    let rings = value
        .as_array()
        .ok_or_else(|| invalid("Polygon coordinates must be an array of rings"))?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        let positions = ring
            .as_array()
            .ok_or_else(|| invalid("ring must be an array of positions"))?;
        let mut pts = Vec::with_capacity(positions.len());
        for p in positions {
            pts.push(parse_position(p)?);
        }
        out.push(pts);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{
        GeoJsonError, feature_to_geojson_value, geometry_from_geojson_str,
        geometry_from_geojson_value, geometry_to_geojson_value,
    };
    use foundation::{Coordinate, Geometry, Polygon};
    use serde_json::{Map, json};

    #[test]
    fn parses_leaflet_feature_polygon() {
        let payload = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[77.0, 28.6], [77.2, 28.6], [77.2, 28.8], [77.0, 28.8], [77.0, 28.6]]]
            }
        }"#;
        let geom = geometry_from_geojson_str(payload).expect("parse");
        let poly = geom.as_polygon().expect("polygon");
        let ext = poly.exterior().expect("exterior");
        assert_eq!(ext.len(), 5);
        assert_eq!(ext[1], Coordinate::new(28.6, 77.2));
    }

    #[test]
    fn parses_bare_point() {
        let geom = geometry_from_geojson_value(&json!({"type": "Point", "coordinates": [77.1025, 28.7041]}))
            .expect("parse");
        assert_eq!(geom, Geometry::Point(Coordinate::new(28.7041, 77.1025)));
    }

    #[test]
    fn rejects_unsupported_and_malformed() {
        let line = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        assert_eq!(
            geometry_from_geojson_value(&line),
            Err(GeoJsonError::UnsupportedGeometry("LineString".to_string()))
        );
        let short = json!({"type": "Point", "coordinates": [1.0]});
        assert!(matches!(
            geometry_from_geojson_value(&short),
            Err(GeoJsonError::InvalidGeometry(_))
        ));
        let out_of_range = json!({"type": "Point", "coordinates": [0.0, 95.0]});
        assert!(geometry_from_geojson_value(&out_of_range).is_err());
        assert!(matches!(
            geometry_from_geojson_str("{"),
            Err(GeoJsonError::InvalidJson(_))
        ));
    }

    #[test]
    fn emits_lon_lat_ordering() {
        let square = Polygon::rectangle(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 2.0));
        let value = geometry_to_geojson_value(&Geometry::Polygon(square));
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0][1], json!([2.0, 0.0]));

        let feature = feature_to_geojson_value(&Geometry::Point(Coordinate::new(1.0, 2.0)), Map::new());
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"]["coordinates"], json!([2.0, 1.0]));
    }
}
