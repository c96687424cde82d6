use foundation::ShapeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// User-facing record for a drawn shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: ShapeId,
    /// Name typed by the user; `None` when the prompt was cancelled.
    pub name: Option<String>,
    /// Whether the shape contains at least one reference vertex.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    DuplicateId(ShapeId),
    NotFound(ShapeId),
}

impl std::fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationError::DuplicateId(id) => write!(f, "annotation {id} already exists"),
            AnnotationError::NotFound(id) => write!(f, "annotation {id} not found"),
        }
    }
}

impl std::error::Error for AnnotationError {}

/// Ordered annotation storage keyed by shape id.
///
/// Ordering contract:
/// - `all()` yields annotations in creation order; removal does not reorder
///   the survivors.
///
/// Failed operations leave the store untouched.
pub trait AnnotationStore {
    fn create(
        &mut self,
        id: ShapeId,
        name: Option<String>,
        selected: bool,
    ) -> Result<(), AnnotationError>;
    fn update(&mut self, id: ShapeId, selected: bool) -> Result<(), AnnotationError>;
    fn rename(&mut self, id: ShapeId, name: Option<String>) -> Result<(), AnnotationError>;
    fn remove(&mut self, id: ShapeId) -> Result<Annotation, AnnotationError>;
    fn find(&self, id: ShapeId) -> Option<&Annotation>;
    fn all(&self) -> Vec<&Annotation>;
    /// Incremented by every successful mutation.
    fn revision(&self) -> u64;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAnnotationStore {
    entries: IndexMap<ShapeId, Annotation>,
    revision: u64,
}

impl InMemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.entries.keys().copied()
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

impl AnnotationStore for InMemoryAnnotationStore {
    fn create(
        &mut self,
        id: ShapeId,
        name: Option<String>,
        selected: bool,
    ) -> Result<(), AnnotationError> {
        if self.entries.contains_key(&id) {
            return Err(AnnotationError::DuplicateId(id));
        }
        self.entries.insert(id, Annotation { id, name, selected });
        self.bump();
        Ok(())
    }

    fn update(&mut self, id: ShapeId, selected: bool) -> Result<(), AnnotationError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(AnnotationError::NotFound(id))?;
        entry.selected = selected;
        self.bump();
        Ok(())
    }

    fn rename(&mut self, id: ShapeId, name: Option<String>) -> Result<(), AnnotationError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(AnnotationError::NotFound(id))?;
        entry.name = name;
        self.bump();
        Ok(())
    }

    fn remove(&mut self, id: ShapeId) -> Result<Annotation, AnnotationError> {
        let removed = self
            .entries
            .shift_remove(&id)
            .ok_or(AnnotationError::NotFound(id))?;
        self.bump();
        Ok(removed)
    }

    fn find(&self, id: ShapeId) -> Option<&Annotation> {
        self.entries.get(&id)
    }

    fn all(&self) -> Vec<&Annotation> {
        self.entries.values().collect()
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
