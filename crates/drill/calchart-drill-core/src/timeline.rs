//! Stitching per-sheet command lists into one timeline per dot, and
//! answering "where is dot D at beat B".
//!
//! Each sheet segment keeps the cumulative end beat of its commands and each
//! dot timeline keeps the cumulative end beat of its sheets, so a lookup is
//! two binary searches followed by one `sample`. A beat that falls exactly on
//! a boundary belongs to the earlier command (or sheet) and yields its end
//! state.

use indexmap::IndexMap;
use serde::Serialize;

use crate::collisions::SheetCollisions;
use crate::config::Config;
use crate::continuity::{compile_continuities, CompileContext, Compiled, SheetEnv};
use crate::coordinate::StepCoordinate;
use crate::diagnostics::{Diagnostics, IssueKind};
use crate::ids::{DotId, SheetId};
use crate::movement::{MovementCommand, StopCommand, BEAT_TOLERANCE};
use crate::show::ShowModel;
use crate::state::AnimationState;

/// Index of the first prefix end that is at or after `beat`.
fn boundary_index(ends: &[u32], beat: f64) -> usize {
    ends.partition_point(|&end| (end as f64) < beat - BEAT_TOLERANCE)
}

/// One dot's commands for one sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SheetSegment {
    sheet: SheetId,
    commands: Vec<MovementCommand>,
    #[serde(skip)]
    command_ends: Vec<u32>,
}

impl SheetSegment {
    pub fn new(sheet: SheetId, commands: Vec<MovementCommand>) -> Self {
        let command_ends = commands
            .iter()
            .scan(0u32, |acc, cmd| {
                *acc += cmd.duration();
                Some(*acc)
            })
            .collect();
        Self {
            sheet,
            commands,
            command_ends,
        }
    }

    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    pub fn commands(&self) -> &[MovementCommand] {
        &self.commands
    }

    pub fn beats(&self) -> u32 {
        self.command_ends.last().copied().unwrap_or(0)
    }

    /// State `beat` beats into the sheet.
    pub fn state_at(&self, beat: f64) -> Option<AnimationState> {
        if self.commands.is_empty() {
            return None;
        }
        let index = boundary_index(&self.command_ends, beat).min(self.commands.len() - 1);
        let start = if index == 0 {
            0
        } else {
            self.command_ends[index - 1]
        };
        self.commands[index].sample(beat - start as f64)
    }
}

/// All sheets of one dot, back to back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DotTimeline {
    dot: DotId,
    segments: Vec<SheetSegment>,
    #[serde(skip)]
    sheet_beats: Vec<u32>,
    #[serde(skip)]
    sheet_ends: Vec<u32>,
}

impl DotTimeline {
    fn new(dot: DotId) -> Self {
        Self {
            dot,
            segments: Vec::new(),
            sheet_beats: Vec::new(),
            sheet_ends: Vec::new(),
        }
    }

    fn push(&mut self, segment: SheetSegment, beats: u32) {
        let end = self.sheet_ends.last().copied().unwrap_or(0) + beats;
        self.segments.push(segment);
        self.sheet_beats.push(beats);
        self.sheet_ends.push(end);
    }

    pub fn dot(&self) -> &DotId {
        &self.dot
    }

    pub fn segments(&self) -> &[SheetSegment] {
        &self.segments
    }

    pub fn segment(&self, sheet: SheetId) -> Option<&SheetSegment> {
        self.segments.iter().find(|s| s.sheet == sheet)
    }

    pub fn total_beats(&self) -> u32 {
        self.sheet_ends.last().copied().unwrap_or(0)
    }

    /// State at show beat `beat`, or `None` before the show, after it, or
    /// while the dot has nothing compiled.
    pub fn state_at(&self, beat: f64) -> Option<AnimationState> {
        if beat.is_nan() || beat < 0.0 || beat > self.total_beats() as f64 + BEAT_TOLERANCE {
            return None;
        }
        let mut index = boundary_index(&self.sheet_ends, beat);
        // Zero-beat sheets take no time and are never the answer.
        while index < self.sheet_beats.len() && self.sheet_beats[index] == 0 {
            index += 1;
        }
        let segment = self.segments.get(index)?;
        let start = if index == 0 {
            0
        } else {
            self.sheet_ends[index - 1]
        };
        segment.state_at(beat - start as f64)
    }
}

/// Where each sheet sits on the show's beat line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SheetSpan {
    pub sheet: SheetId,
    pub start: u32,
    pub beats: u32,
}

/// The compiled show.
#[derive(Clone, Debug, Serialize)]
pub struct ShowTimeline {
    dots: IndexMap<DotId, DotTimeline>,
    sheets: Vec<SheetSpan>,
    total_beats: u32,
    diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    collisions: IndexMap<SheetId, SheetCollisions>,
}

impl ShowTimeline {
    pub fn total_beats(&self) -> u32 {
        self.total_beats
    }

    pub fn sheets(&self) -> &[SheetSpan] {
        &self.sheets
    }

    pub fn sheet_span(&self, sheet: SheetId) -> Option<SheetSpan> {
        self.sheets.iter().copied().find(|s| s.sheet == sheet)
    }

    pub fn dots(&self) -> impl Iterator<Item = &DotId> {
        self.dots.keys()
    }

    pub fn dot(&self, dot: &DotId) -> Option<&DotTimeline> {
        self.dots.get(dot)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Collisions found while compiling, when enabled in the config.
    pub fn detected_collisions(&self, sheet: SheetId) -> Option<&SheetCollisions> {
        self.collisions.get(&sheet)
    }

    pub fn state_at(&self, dot: &DotId, beat: f64) -> Option<AnimationState> {
        self.dots.get(dot)?.state_at(beat)
    }

    /// Every dot that has a state at `beat`, in show order.
    pub fn states_at(&self, beat: f64) -> IndexMap<DotId, AnimationState> {
        self.dots
            .iter()
            .filter_map(|(id, timeline)| Some((id.clone(), timeline.state_at(beat)?)))
            .collect()
    }

    pub fn commands(&self, dot: &DotId, sheet: SheetId) -> Option<&[MovementCommand]> {
        Some(self.dots.get(dot)?.segment(sheet)?.commands())
    }

    /// Continuity text of each command the dot runs on `sheet`.
    pub fn continuity_texts(&self, dot: &DotId, sheet: SheetId) -> Vec<String> {
        self.commands(dot, sheet)
            .map(|cmds| cmds.iter().map(MovementCommand::continuity_text).collect())
            .unwrap_or_default()
    }
}

/// Compile every dot of `model` into a timeline.
pub fn compile_show(model: &dyn ShowModel, cfg: &Config) -> ShowTimeline {
    let sheets = model.sheets();
    let mut spans = Vec::with_capacity(sheets.len());
    let mut start = 0u32;
    for &sheet in &sheets {
        let beats = model.sheet_beats(sheet);
        spans.push(SheetSpan {
            sheet,
            start,
            beats,
        });
        start += beats;
    }

    let mut diagnostics = Diagnostics::new();
    let dots: IndexMap<DotId, DotTimeline> = model
        .dots()
        .into_iter()
        .map(|dot| {
            let timeline = compile_dot(model, &dot, &sheets, cfg, &mut diagnostics);
            (dot, timeline)
        })
        .collect();
    log::debug!(
        "compiled {} dots over {} sheets ({} beats, {} issues, {} errors)",
        dots.len(),
        sheets.len(),
        start,
        diagnostics.len(),
        diagnostics.errors().count()
    );

    let mut timeline = ShowTimeline {
        dots,
        sheets: spans,
        total_beats: start,
        diagnostics,
        collisions: IndexMap::new(),
    };
    if cfg.detect_collisions {
        for span in timeline.sheets.clone() {
            let found = timeline.collisions(span.sheet, cfg.collision_radius);
            timeline.collisions.insert(span.sheet, found);
        }
    }
    timeline
}

/// Compile one dot across every sheet. The final position of a sheet seeds
/// the next one unless its continuities failed, in which case the next sheet
/// starts from the dot's own spot.
pub fn compile_dot(
    model: &dyn ShowModel,
    dot: &DotId,
    sheets: &[SheetId],
    cfg: &Config,
    diagnostics: &mut Diagnostics,
) -> DotTimeline {
    let mut timeline = DotTimeline::new(dot.clone());
    let mut carried: Option<StepCoordinate> = None;

    for &sheet in sheets {
        let beats = model.sheet_beats(sheet);
        let own = model.position_in_sheet(sheet, dot);
        if own.is_none() {
            diagnostics.report(dot, sheet, IssueKind::DotNotInSheet);
        }
        let Some(start) = carried.or(own) else {
            timeline.push(SheetSegment::new(sheet, Vec::new()), beats);
            continue;
        };

        let env = SheetEnv::new(model, sheet);
        let continuities = model
            .dot_type(sheet, dot)
            .map(|t| model.continuities(sheet, t))
            .unwrap_or(&[]);
        let ctx = CompileContext::new(start, beats);
        log::debug!("dot {dot} sheet {sheet}: {} continuities", continuities.len());

        let (mut compiled, clean) = match compile_continuities(continuities, dot, ctx, &env) {
            Ok(compiled) => (compiled, true),
            Err(error) => {
                diagnostics.report(dot, sheet, IssueKind::Continuity { error });
                (Compiled::empty(ctx), false)
            }
        };

        let left = compiled.context.remaining;
        if left > 0 {
            if clean && model.next_sheet(sheet).is_some() {
                diagnostics.report(dot, sheet, IssueKind::UnusedBeats { beats: left });
            }
            if cfg.pad_unused_beats || !clean {
                compiled.push(StopCommand::new(
                    compiled.context.position,
                    env.defaults.orientation.angle(),
                    left,
                    env.defaults.beats_per_step,
                    false,
                ));
            }
        }

        if clean && cfg.check_formation {
            if let Some(expected) = env.next_position(dot) {
                let actual = compiled.context.position;
                if !actual.approx_eq(&expected, cfg.formation_tolerance) {
                    let kind = IssueKind::EndsOffFormation { expected, actual };
                    diagnostics.report(dot, sheet, kind);
                }
            }
        }

        carried = clean.then_some(compiled.context.position);
        timeline.push(SheetSegment::new(sheet, compiled.commands), beats);
    }
    timeline
}
