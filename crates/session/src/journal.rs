use std::collections::VecDeque;

/// Entries kept before the oldest are evicted.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1024;

/// Record of what happened during a session.
///
/// Entries are numbered from 0 in emission order; numbering continues
/// across `drain` calls and evictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Bounded journal. Once `capacity` entries are held, each `emit` drops the
/// oldest one; embedders that need the full history `drain` it regularly.
#[derive(Debug)]
pub struct SessionJournal {
    next_seq: u64,
    capacity: usize,
    entries: VecDeque<JournalEntry>,
}

impl Default for SessionJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl SessionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            seq: self.next_seq,
            kind,
            message: message.into(),
        });
        self.next_seq += 1;
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn drain(&mut self) -> Vec<JournalEntry> {
        self.entries.drain(..).collect()
    }
}
