use annotations::{Annotation, AnnotationError, AnnotationStore, InMemoryAnnotationStore};
use foundation::{Coordinate, Polygon, ShapeId};
use geometry::{ReferencePoint, ReferenceRing, classify_shape};
use tracing::{debug, info, warn};

use crate::collaborators::{Geolocator, MapLayer, MapSurface, UserPrompt};
use crate::config::{ConsistencyPolicy, SessionConfig};
use crate::error::{LocationUnavailable, SessionError};
use crate::events::{DrawEvent, DrawEventKind, DrawEventRouter, DrawHandler, DrawnShape};
use crate::journal::SessionJournal;

pub const NAME_PROMPT: &str = "Enter layer name";
pub const CENTER_POPUP: &str = "Center";
pub const RING_POPUP: &str = "Benzene Ring";
pub const VERTEX_POPUP: &str = "I am a Benzene Ring Vertex";

/// Decides whether a drawn area covers the reference ring.
pub type Classifier = fn(&Polygon, &[ReferencePoint]) -> bool;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    ResolvingLocation,
    Ready,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CenterSource {
    Device,
    Fallback,
}

/// Owns all state of one map annotation session.
///
/// Lifecycle:
/// - `attach` moves `Uninitialized` -> `ResolvingLocation` and asks the
///   geolocator for a position.
/// - The first `location_resolved` call, success or failure, draws the base
///   map and reference ring and moves to `Ready`. Later calls are ignored.
/// - Draw events are accepted only in `Ready`.
///
/// Everything runs on the UI thread; handlers are invoked one at a time.
pub struct MapSession<M, G, P, S = InMemoryAnnotationStore> {
    config: SessionConfig,
    map: M,
    geolocator: G,
    prompt: P,
    store: S,
    classifier: Classifier,
    router: DrawEventRouter<Self>,
    state: SessionState,
    center: Option<(Coordinate, CenterSource)>,
    ring: Option<ReferenceRing>,
    journal: SessionJournal,
}

impl<M, G, P> MapSession<M, G, P>
where
    M: MapSurface,
    G: Geolocator,
    P: UserPrompt,
{
    pub fn new(config: SessionConfig, map: M, geolocator: G, prompt: P) -> Self {
        Self::with_store(config, map, geolocator, prompt, InMemoryAnnotationStore::new())
    }
}

impl<M, G, P, S> MapSession<M, G, P, S>
where
    M: MapSurface,
    G: Geolocator,
    P: UserPrompt,
    S: AnnotationStore,
{
    pub fn with_store(config: SessionConfig, map: M, geolocator: G, prompt: P, store: S) -> Self {
        Self {
            config,
            map,
            geolocator,
            prompt,
            store,
            classifier: classify_shape,
            router: Self::default_router(),
            state: SessionState::Uninitialized,
            center: None,
            ring: None,
            journal: SessionJournal::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Router wired to the built-in created/edited/deleted handlers.
    pub fn default_router() -> DrawEventRouter<Self> {
        let mut router = DrawEventRouter::new();
        router.register(DrawEventKind::Created, Self::on_created);
        router.register(DrawEventKind::Edited, Self::on_edited);
        router.register(DrawEventKind::Deleted, Self::on_deleted);
        router
    }

    /// Replaces the handler for one event kind.
    pub fn register_handler(
        &mut self,
        kind: DrawEventKind,
        handler: DrawHandler<Self>,
    ) -> Option<DrawHandler<Self>> {
        self.router.register(kind, handler)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn center(&self) -> Option<Coordinate> {
        self.center.map(|(c, _)| c)
    }

    pub fn center_source(&self) -> Option<CenterSource> {
        self.center.map(|(_, s)| s)
    }

    pub fn reference_ring(&self) -> Option<&ReferenceRing> {
        self.ring.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn annotations(&self) -> Vec<&Annotation> {
        self.store.all()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn geolocator(&self) -> &G {
        &self.geolocator
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn journal(&self) -> &SessionJournal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut SessionJournal {
        &mut self.journal
    }

    /// Called once the map widget exists. Shows the fallback view and starts
    /// the position request.
    pub fn attach(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::AlreadyAttached);
        }
        self.map
            .set_view(self.config.fallback_center, self.config.zoom);
        self.state = SessionState::ResolvingLocation;
        self.journal.emit("session.attached", "requesting device position");
        self.geolocator.request_position(&self.config.geolocation);
        Ok(())
    }

    /// Geolocation callback. Only the first outcome while resolving is
    /// honored; returns `false` when the outcome was ignored.
    pub fn location_resolved(
        &mut self,
        outcome: Result<Coordinate, LocationUnavailable>,
    ) -> bool {
        if self.state != SessionState::ResolvingLocation {
            debug!(state = ?self.state, "ignoring late geolocation outcome");
            return false;
        }

        let (center, source) = match outcome {
            Ok(c) => match c.validate() {
                Ok(()) => {
                    info!(lat = c.latitude, lon = c.longitude, "device position resolved");
                    (c, CenterSource::Device)
                }
                Err(e) => {
                    warn!("device reported an invalid position ({e}); using fallback center");
                    (self.config.fallback_center, CenterSource::Fallback)
                }
            },
            Err(e) => {
                info!("{e}; using fallback center");
                (self.config.fallback_center, CenterSource::Fallback)
            }
        };

        self.journal.emit(
            "session.location",
            format!(
                "{source:?} center {:.4},{:.4}",
                center.latitude, center.longitude
            ),
        );
        self.enter_ready(center, source);
        true
    }

    fn enter_ready(&mut self, center: Coordinate, source: CenterSource) {
        let cfg = &self.config;
        self.map.set_view(center, cfg.zoom);
        self.map.add_layer(MapLayer::Tiles(cfg.tile_layer.clone()));

        let circle = self.map.add_layer(MapLayer::Circle {
            center,
            radius_m: cfg.center_marker_radius_m,
            style: cfg.styles.center.clone(),
        });
        self.map.bind_popup(circle, CENTER_POPUP);

        let ring = ReferenceRing::generate(center, cfg.ring.radius, cfg.ring.vertex_count);
        let outline = self.map.add_layer(MapLayer::Polygon {
            polygon: ring.outline(),
            style: cfg.styles.ring.clone(),
        });
        self.map.bind_popup(outline, RING_POPUP);
        for vertex in &ring.vertices {
            let marker = self.map.add_layer(MapLayer::Marker {
                position: vertex.coordinate(),
            });
            self.map.bind_popup(marker, VERTEX_POPUP);
        }
        debug!(vertices = ring.len(), "reference ring drawn");

        if let Some(msg) = &cfg.instructions {
            self.prompt.alert(msg);
        }
        self.map.attach_draw_tool(&cfg.draw_tool);

        self.center = Some((center, source));
        self.ring = Some(ring);
        self.state = SessionState::Ready;
        let vertices = self.ring.as_ref().map_or(0, ReferenceRing::len);
        self.journal
            .emit("session.ready", format!("{vertices} reference vertices"));
    }

    /// Routes a drawing-tool event to its registered handler.
    pub fn handle(&mut self, event: &DrawEvent) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady(self.state));
        }
        let kind = event.kind();
        let handler = self
            .router
            .handler(kind)
            .ok_or(SessionError::UnhandledEvent(kind))?;
        handler(self, event)
    }

    /// Classifies `shape` against the reference ring. Shapes without an
    /// area never cover a vertex.
    pub fn classify(&self, shape: &DrawnShape) -> bool {
        let (Some(polygon), Some(ring)) = (shape.polygon(), self.ring.as_ref()) else {
            return false;
        };
        (self.classifier)(polygon, &ring.vertices)
    }

    fn restyle(&mut self, id: ShapeId, selected: bool) {
        let style = self.config.styles.for_selection(selected);
        self.map.style_shape(id, style);
    }

    /// Applies the consistency policy to a store result.
    fn reconcile(&mut self, result: Result<(), AnnotationError>) -> Result<(), SessionError> {
        let Err(e) = result else {
            return Ok(());
        };
        self.journal.emit("store.conflict", e.to_string());
        match self.config.consistency {
            ConsistencyPolicy::Strict => Err(e.into()),
            ConsistencyPolicy::Lenient => {
                warn!("draw tool and annotation store disagree: {e}");
                Ok(())
            }
        }
    }

    fn on_created(&mut self, event: &DrawEvent) -> Result<(), SessionError> {
        let DrawEvent::Created(shape) = event else {
            return Err(SessionError::UnhandledEvent(event.kind()));
        };
        // Duplicates are settled before the user is asked for a name.
        if self.store.find(shape.id).is_some() {
            return self.reconcile(Err(AnnotationError::DuplicateId(shape.id)));
        }
        let selected = self.classify(shape);
        let name = self.prompt.prompt_name(NAME_PROMPT);

        let created = self.store.create(shape.id, name.clone(), selected);
        let applied = created.is_ok();
        self.reconcile(created)?;
        if !applied {
            return Ok(());
        }

        self.restyle(shape.id, selected);
        if let Some(name) = &name {
            self.map.bind_shape_popup(shape.id, name);
        }
        info!(id = shape.id.get(), selected, "shape created");
        self.journal.emit(
            "shape.created",
            format!("{} selected={selected}", shape.id),
        );
        Ok(())
    }

    fn on_edited(&mut self, event: &DrawEvent) -> Result<(), SessionError> {
        let DrawEvent::Edited(shapes) = event else {
            return Err(SessionError::UnhandledEvent(event.kind()));
        };
        let mut first_err = None;
        for shape in shapes {
            let selected = self.classify(shape);
            let updated = self.store.update(shape.id, selected);
            let applied = updated.is_ok();
            if let Err(e) = self.reconcile(updated) {
                first_err.get_or_insert(e);
            }
            if !applied {
                continue;
            }
            self.restyle(shape.id, selected);
            debug!(id = shape.id.get(), selected, "shape edited");
            self.journal
                .emit("shape.edited", format!("{} selected={selected}", shape.id));
        }
        first_err.map_or(Ok(()), Err)
    }

    fn on_deleted(&mut self, event: &DrawEvent) -> Result<(), SessionError> {
        let DrawEvent::Deleted(ids) = event else {
            return Err(SessionError::UnhandledEvent(event.kind()));
        };
        let mut first_err = None;
        for &id in ids {
            let removed = self.store.remove(id).map(|_| ());
            let applied = removed.is_ok();
            if let Err(e) = self.reconcile(removed) {
                first_err.get_or_insert(e);
            }
            if applied {
                debug!(id = id.get(), "shape deleted");
                self.journal.emit("shape.deleted", id.to_string());
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl<M, G, P, S> std::fmt::Debug for MapSession<M, G, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("state", &self.state)
            .field("center", &self.center)
            .field("ring", &self.ring)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
