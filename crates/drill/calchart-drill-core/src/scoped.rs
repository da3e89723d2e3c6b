//! Handles that are only valid while the sheet they were opened on is active.
//!
//! Editing tools hold one of these instead of a raw reference so that a
//! sheet switch between opening and applying an edit is detected.

use serde::{Deserialize, Serialize};

use crate::dot_type::DotType;
use crate::ids::SheetId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeStatus {
    Active,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetScoped<T> {
    sheet: SheetId,
    value: T,
}

impl<T> SheetScoped<T> {
    pub fn new(sheet: SheetId, value: T) -> Self {
        Self { sheet, value }
    }

    /// Sheet the handle was opened on.
    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    pub fn status(&self, active: SheetId) -> ScopeStatus {
        if active == self.sheet {
            ScopeStatus::Active
        } else {
            ScopeStatus::Expired
        }
    }

    pub fn get(&self, active: SheetId) -> Option<&T> {
        match self.status(active) {
            ScopeStatus::Active => Some(&self.value),
            ScopeStatus::Expired => None,
        }
    }

    pub fn get_mut(&mut self, active: SheetId) -> Option<&mut T> {
        match self.status(active) {
            ScopeStatus::Active => Some(&mut self.value),
            ScopeStatus::Expired => None,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Location of one continuity within a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuityRef {
    pub dot_type: DotType,
    pub index: usize,
}

/// A pending edit to the dot order of an ordered continuity.
pub type OrderEdit = SheetScoped<ContinuityRef>;
