use foundation::ShapeId;
use serde::Serialize;

use crate::store::AnnotationStore;

pub const UNNAMED_LABEL: &str = "Unnamed shape";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: ShapeId,
    pub label: String,
    pub selected: bool,
}

/// Read-only projection of an annotation store for the side panel.
///
/// The view caches its rows and only rebuilds them when the store's
/// revision moves.
#[derive(Debug, Default)]
pub struct AnnotationListView {
    rows: Vec<ListRow>,
    seen_revision: Option<u64>,
}

impl AnnotationListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stale(&self, store: &dyn AnnotationStore) -> bool {
        self.seen_revision != Some(store.revision())
    }

    /// Rebuilds rows if the store changed since the last call.
    ///
    /// Returns `true` when the rows were rebuilt.
    pub fn refresh(&mut self, store: &dyn AnnotationStore) -> bool {
        if !self.is_stale(store) {
            return false;
        }
        self.rows = store
            .all()
            .into_iter()
            .map(|a| ListRow {
                id: a.id,
                label: a
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| UNNAMED_LABEL.to_string()),
                selected: a.selected,
            })
            .collect();
        self.seen_revision = Some(store.revision());
        true
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|r| r.selected).count()
    }

    /// Plain-text rendering, one shape per line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let mark = if row.selected { "[x]" } else { "[ ]" };
            out.push_str(&format!("{mark} {} ({})\n", row.label, row.id));
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.rows)
    }
}
