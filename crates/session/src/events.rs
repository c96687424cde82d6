use std::collections::BTreeMap;

use formats::{GeoJsonError, geometry_from_geojson_value};
use foundation::{Geometry, Polygon, ShapeId};
use serde_json::Value;

use crate::error::SessionError;

/// A shape as delivered by the drawing tool.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    pub id: ShapeId,
    pub geometry: Geometry,
}

impl DrawnShape {
    pub fn new(id: ShapeId, geometry: impl Into<Geometry>) -> Self {
        Self {
            id,
            geometry: geometry.into(),
        }
    }

    /// Builds a shape from the drawing tool's GeoJSON export (`Feature` or
    /// bare geometry).
    pub fn from_geojson(id: ShapeId, value: &Value) -> Result<Self, GeoJsonError> {
        Ok(Self::new(id, geometry_from_geojson_value(value)?))
    }

    /// Area of the shape, if it has one.
    pub fn polygon(&self) -> Option<&Polygon> {
        self.geometry.as_polygon()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawEventKind {
    Created,
    Edited,
    Deleted,
}

impl DrawEventKind {
    pub const ALL: [DrawEventKind; 3] = [
        DrawEventKind::Created,
        DrawEventKind::Edited,
        DrawEventKind::Deleted,
    ];

    /// Event name used by the Leaflet.draw plugin.
    pub fn leaflet_name(self) -> &'static str {
        match self {
            DrawEventKind::Created => "draw:created",
            DrawEventKind::Edited => "draw:edited",
            DrawEventKind::Deleted => "draw:deleted",
        }
    }

    pub fn from_leaflet_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.leaflet_name() == name)
    }
}

/// Shape lifecycle events emitted by the drawing tool.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    Created(DrawnShape),
    Edited(Vec<DrawnShape>),
    Deleted(Vec<ShapeId>),
}

impl DrawEvent {
    pub fn kind(&self) -> DrawEventKind {
        match self {
            DrawEvent::Created(_) => DrawEventKind::Created,
            DrawEvent::Edited(_) => DrawEventKind::Edited,
            DrawEvent::Deleted(_) => DrawEventKind::Deleted,
        }
    }
}

pub type DrawHandler<S> = fn(&mut S, &DrawEvent) -> Result<(), SessionError>;

/// Explicit mapping from event kind to handler.
///
/// Handlers are plain function pointers; the table has no dependency on a
/// map or drawing tool.
pub struct DrawEventRouter<S> {
    handlers: BTreeMap<DrawEventKind, DrawHandler<S>>,
}

impl<S> Default for DrawEventRouter<S> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<S> std::fmt::Debug for DrawEventRouter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawEventRouter")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S> DrawEventRouter<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, returning the handler it replaced.
    pub fn register(&mut self, kind: DrawEventKind, handler: DrawHandler<S>) -> Option<DrawHandler<S>> {
        self.handlers.insert(kind, handler)
    }

    pub fn unregister(&mut self, kind: DrawEventKind) -> Option<DrawHandler<S>> {
        self.handlers.remove(&kind)
    }

    pub fn handler(&self, kind: DrawEventKind) -> Option<DrawHandler<S>> {
        self.handlers.get(&kind).copied()
    }

    pub fn handles(&self, kind: DrawEventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn dispatch(&self, target: &mut S, event: &DrawEvent) -> Result<(), SessionError> {
        let kind = event.kind();
        let handler = self
            .handler(kind)
            .ok_or(SessionError::UnhandledEvent(kind))?;
        handler(target, event)
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawEvent, DrawEventKind, DrawEventRouter, DrawnShape};
    use crate::error::SessionError;
    use foundation::{Coordinate, Geometry, Polygon, ShapeId};
    use serde_json::json;

    #[derive(Default)]
    struct Counter {
        created: usize,
        deleted: usize,
    }

    fn on_created(c: &mut Counter, _e: &DrawEvent) -> Result<(), SessionError> {
        c.created += 1;
        Ok(())
    }

    fn on_deleted(c: &mut Counter, e: &DrawEvent) -> Result<(), SessionError> {
        if let DrawEvent::Deleted(ids) = e {
            c.deleted += ids.len();
        }
        Ok(())
    }

    fn square(id: u64) -> DrawnShape {
        DrawnShape::new(
            ShapeId::new(id),
            Polygon::rectangle(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)),
        )
    }

    #[test]
    fn dispatches_by_kind() {
        let mut router: DrawEventRouter<Counter> = DrawEventRouter::new();
        assert!(router.register(DrawEventKind::Created, on_created).is_none());
        router.register(DrawEventKind::Deleted, on_deleted);

        let mut c = Counter::default();
        router
            .dispatch(&mut c, &DrawEvent::Created(square(1)))
            .expect("created");
        router
            .dispatch(&mut c, &DrawEvent::Deleted(vec![ShapeId::new(1), ShapeId::new(2)]))
            .expect("deleted");
        assert_eq!(c.created, 1);
        assert_eq!(c.deleted, 2);
    }

    #[test]
    fn unregistered_kind_is_an_error() {
        let mut router: DrawEventRouter<Counter> = DrawEventRouter::new();
        router.register(DrawEventKind::Created, on_created);
        assert!(router.handles(DrawEventKind::Created));
        assert!(!router.handles(DrawEventKind::Edited));

        let mut c = Counter::default();
        assert_eq!(
            router.dispatch(&mut c, &DrawEvent::Edited(vec![square(1)])),
            Err(SessionError::UnhandledEvent(DrawEventKind::Edited))
        );
        router.unregister(DrawEventKind::Created);
        assert!(router.dispatch(&mut c, &DrawEvent::Created(square(2))).is_err());
        assert_eq!(c.created, 0);
    }

    #[test]
    fn leaflet_event_names() {
        for kind in DrawEventKind::ALL {
            assert_eq!(DrawEventKind::from_leaflet_name(kind.leaflet_name()), Some(kind));
        }
        assert_eq!(DrawEventKind::from_leaflet_name("draw:drawstart"), None);
    }

    #[test]
    fn shape_from_geojson_feature() {
        let feature = json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": [77.1, 28.7]}
        });
        let shape = DrawnShape::from_geojson(ShapeId::new(9), &feature).expect("shape");
        assert_eq!(shape.geometry, Geometry::Point(Coordinate::new(28.7, 77.1)));
        assert!(shape.polygon().is_none());
    }
}
