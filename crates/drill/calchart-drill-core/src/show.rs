//! The show model: dots, sheets, formations and per-dot-type continuities.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::compass::Orientation;
use crate::continuity::{Continuity, ContinuityKind, OrderedDots};
use crate::coordinate::StepCoordinate;
use crate::dot_type::DotType;
use crate::error::DrillError;
use crate::ids::{DotId, IdAllocator, SheetId};
use crate::scoped::OrderEdit;

/// A performer. Dots exist for the whole show.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub id: DotId,
    #[serde(default)]
    pub label: String,
}

/// A dot's spot and symbol on one sheet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDot {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub dot_type: DotType,
}

impl SheetDot {
    pub fn position(&self) -> StepCoordinate {
        StepCoordinate::new(self.x, self.y)
    }
}

/// One stuntsheet: a formation plus the continuities that lead out of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: SheetId,
    #[serde(default)]
    pub label: String,
    pub beats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beats_per_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub positions: IndexMap<DotId, SheetDot>,
    #[serde(default)]
    pub continuities: IndexMap<DotType, Vec<Continuity>>,
}

impl Sheet {
    pub fn new(id: SheetId, label: impl Into<String>, beats: u32) -> Self {
        Self {
            id,
            label: label.into(),
            beats,
            beats_per_step: None,
            orientation: None,
            positions: IndexMap::new(),
            continuities: IndexMap::new(),
        }
    }

    /// Dot types present on this sheet, in display order.
    pub fn dot_types(&self) -> Vec<DotType> {
        DotType::sort(self.positions.values().map(|d| d.dot_type))
    }
}

/// Sheet-level defaults after falling back to the show's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetDefaults {
    pub beats_per_step: u32,
    pub orientation: Orientation,
}

impl Default for SheetDefaults {
    fn default() -> Self {
        Self {
            beats_per_step: 1,
            orientation: Orientation::East,
        }
    }
}

/// What the compiler needs to know about a show. [`Show`] implements it;
/// hosts with their own document model can too.
pub trait ShowModel {
    fn dots(&self) -> Vec<DotId>;
    fn sheets(&self) -> Vec<SheetId>;
    fn sheet_beats(&self, sheet: SheetId) -> u32;
    fn sheet_defaults(&self, sheet: SheetId) -> SheetDefaults;
    fn dot_type(&self, sheet: SheetId, dot: &DotId) -> Option<DotType>;
    fn position_in_sheet(&self, sheet: SheetId, dot: &DotId) -> Option<StepCoordinate>;
    fn continuities(&self, sheet: SheetId, dot_type: DotType) -> &[Continuity];
    fn next_sheet(&self, sheet: SheetId) -> Option<SheetId>;
}

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub name: String,
    #[serde(default = "one")]
    pub beats_per_step: u32,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub dots: Vec<Dot>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(skip)]
    ids: IdAllocator,
}

impl Show {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beats_per_step: 1,
            orientation: Orientation::East,
            dots: Vec::new(),
            sheets: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn dot(&self, id: &DotId) -> Option<&Dot> {
        self.dots.iter().find(|d| &d.id == id)
    }

    pub fn add_dot(
        &mut self,
        id: impl Into<DotId>,
        label: impl Into<String>,
    ) -> Result<&Dot, DrillError> {
        let id = id.into();
        if self.dot(&id).is_some() {
            return Err(DrillError::DuplicateDot { dot: id });
        }
        self.dots.push(Dot {
            id,
            label: label.into(),
        });
        let last = self.dots.len() - 1;
        Ok(&self.dots[last])
    }

    /// Append a sheet and return its id.
    pub fn add_sheet(&mut self, label: impl Into<String>, beats: u32) -> SheetId {
        let id = self.ids.alloc_sheet();
        self.sheets.push(Sheet::new(id, label, beats));
        id
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: SheetId) -> Result<&mut Sheet, DrillError> {
        self.sheets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DrillError::UnknownSheet { sheet: id })
    }

    /// Put `dot` on `sheet` at `(x, y)` in step space.
    pub fn place(
        &mut self,
        sheet: SheetId,
        dot: &DotId,
        x: f64,
        y: f64,
        dot_type: DotType,
    ) -> Result<(), DrillError> {
        if self.dot(dot).is_none() {
            return Err(DrillError::UnknownDot {
                dot: dot.clone(),
                context: format!("sheet {sheet}"),
            });
        }
        self.sheet_mut(sheet)?
            .positions
            .insert(dot.clone(), SheetDot { x, y, dot_type });
        Ok(())
    }

    /// Append a continuity to the list for its dot type.
    pub fn add_continuity(
        &mut self,
        sheet: SheetId,
        continuity: Continuity,
    ) -> Result<(), DrillError> {
        self.sheet_mut(sheet)?
            .continuities
            .entry(continuity.dot_type)
            .or_default()
            .push(continuity);
        Ok(())
    }

    pub fn continuities_mut(
        &mut self,
        sheet: SheetId,
        dot_type: DotType,
    ) -> Result<&mut Vec<Continuity>, DrillError> {
        Ok(self
            .sheet_mut(sheet)?
            .continuities
            .entry(dot_type)
            .or_default())
    }

    pub fn continuity_mut(
        &mut self,
        sheet: SheetId,
        dot_type: DotType,
        index: usize,
    ) -> Result<&mut Continuity, DrillError> {
        self.sheet_mut(sheet)?
            .continuities
            .get_mut(&dot_type)
            .and_then(|list| list.get_mut(index))
            .ok_or(DrillError::NoSuchContinuity {
                sheet,
                dot_type,
                index,
            })
    }

    /// Apply `edit_fn` to the dot order referenced by `edit`, as long as the
    /// edit was opened on the sheet that is still active.
    pub fn edit_order(
        &mut self,
        edit: &OrderEdit,
        active: SheetId,
        edit_fn: impl FnOnce(&mut dyn OrderedDots),
    ) -> Result<(), DrillError> {
        let target = edit.get(active).ok_or(DrillError::EditExpired {
            opened: edit.sheet(),
            active,
        })?;
        let sheet = edit.sheet();
        let continuity = self.continuity_mut(sheet, target.dot_type, target.index)?;
        let label = continuity.label();
        let ordered = continuity
            .ordered_mut()
            .ok_or_else(|| DrillError::NotOrdered {
                sheet,
                label: label.to_string(),
            })?;
        edit_fn(ordered);
        Ok(())
    }

    /// Check cross references and option ranges.
    pub fn validate(&self) -> Result<(), DrillError> {
        check_beats_per_step(self.beats_per_step)?;
        let mut seen = hashbrown::HashSet::with_capacity(self.dots.len());
        for dot in &self.dots {
            if !seen.insert(&dot.id) {
                return Err(DrillError::DuplicateDot {
                    dot: dot.id.clone(),
                });
            }
        }

        let mut sheet_ids = hashbrown::HashSet::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            if !sheet_ids.insert(sheet.id) {
                return Err(DrillError::DuplicateSheet { sheet: sheet.id });
            }
            if let Some(bps) = sheet.beats_per_step {
                check_beats_per_step(bps)?;
            }
            for dot in sheet.positions.keys() {
                if !seen.contains(dot) {
                    return Err(DrillError::UnknownDot {
                        dot: dot.clone(),
                        context: format!("positions of sheet {}", sheet.id),
                    });
                }
            }
            for continuity in sheet.continuities.values().flatten() {
                let mut result = Ok(());
                continuity.walk(&mut |c| {
                    if result.is_err() {
                        return;
                    }
                    if let Some(bps) = c.beats_per_step {
                        result = check_beats_per_step(bps);
                    }
                    if let Some(ordered) = c.ordered() {
                        let order = ordered.get_order();
                        if let Some(unknown) = order.iter().find(|d| !seen.contains(*d)) {
                            result = Err(DrillError::UnknownDot {
                                dot: unknown.clone(),
                                context: format!("{} order on sheet {}", c.label(), sheet.id),
                            });
                        }
                    }
                });
                result?;
            }
        }
        Ok(())
    }

    /// Bring derived state in line after loading: continuity dot types follow
    /// the list they are filed under, and new sheet ids skip existing ones.
    pub(crate) fn normalize(&mut self) {
        self.ids.reset();
        for sheet in &mut self.sheets {
            self.ids.observe(sheet.id);
            for (dot_type, list) in sheet.continuities.iter_mut() {
                for continuity in list.iter_mut() {
                    retag(continuity, *dot_type);
                }
            }
        }
    }

    fn sheet_index(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id == id)
    }
}

fn retag(continuity: &mut Continuity, dot_type: DotType) {
    continuity.dot_type = dot_type;
    if let ContinuityKind::TwoStep(two) = &mut continuity.kind {
        for nested in &mut two.continuities {
            retag(nested, dot_type);
        }
    }
}

fn check_beats_per_step(value: u32) -> Result<(), DrillError> {
    if value == 0 {
        Err(DrillError::InvalidBeatsPerStep { value })
    } else {
        Ok(())
    }
}

impl ShowModel for Show {
    fn dots(&self) -> Vec<DotId> {
        self.dots.iter().map(|d| d.id.clone()).collect()
    }

    fn sheets(&self) -> Vec<SheetId> {
        self.sheets.iter().map(|s| s.id).collect()
    }

    fn sheet_beats(&self, sheet: SheetId) -> u32 {
        self.sheet(sheet).map_or(0, |s| s.beats)
    }

    fn sheet_defaults(&self, sheet: SheetId) -> SheetDefaults {
        let sheet = self.sheet(sheet);
        SheetDefaults {
            beats_per_step: sheet
                .and_then(|s| s.beats_per_step)
                .unwrap_or(self.beats_per_step)
                .max(1),
            orientation: sheet
                .and_then(|s| s.orientation)
                .unwrap_or(self.orientation),
        }
    }

    fn dot_type(&self, sheet: SheetId, dot: &DotId) -> Option<DotType> {
        self.sheet(sheet)?.positions.get(dot).map(|d| d.dot_type)
    }

    fn position_in_sheet(&self, sheet: SheetId, dot: &DotId) -> Option<StepCoordinate> {
        self.sheet(sheet)?.positions.get(dot).map(SheetDot::position)
    }

    fn continuities(&self, sheet: SheetId, dot_type: DotType) -> &[Continuity] {
        self.sheet(sheet)
            .and_then(|s| s.continuities.get(&dot_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn next_sheet(&self, sheet: SheetId) -> Option<SheetId> {
        let index = self.sheet_index(sheet)?;
        self.sheets.get(index + 1).map(|s| s.id)
    }
}
