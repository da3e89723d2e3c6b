//! Identifiers and simple allocators for core entities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable performer id, shared by every sheet of a show.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DotId(pub String);

impl DotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DotId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DotId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(pub u32);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuityId(pub String);

impl ContinuityId {
    /// Fresh random id for a continuity created in the editor.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ContinuityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic allocator for SheetId.
/// Loaded shows report their existing ids through `observe` so new sheets never collide.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_sheet: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_sheet(&mut self) -> SheetId {
        let id = SheetId(self.next_sheet);
        self.next_sheet = self.next_sheet.wrapping_add(1);
        id
    }

    /// Record an id that already exists so later allocations skip past it.
    #[inline]
    pub fn observe(&mut self, id: SheetId) {
        if id.0 >= self.next_sheet {
            self.next_sheet = id.0.wrapping_add(1);
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
