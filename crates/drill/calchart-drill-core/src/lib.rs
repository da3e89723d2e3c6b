//! Calchart Drill Core (engine-agnostic)
//!
//! Compiles a show's continuities into per-dot movement timelines and samples
//! them per beat. The crate holds the show model, the continuity vocabulary,
//! movement commands, the timeline stitcher and compile diagnostics. Rendering,
//! editing UI and persistence transport belong to the host.

pub mod collisions;
pub mod compass;
pub mod config;
pub mod continuity;
pub mod coordinate;
pub mod diagnostics;
pub mod dot_type;
pub mod error;
pub mod ids;
pub mod movement;
pub mod scoped;
pub mod show;
pub mod state;
pub mod stored_show;
pub mod timeline;

// Re-exports for consumers (hosts and the wasm facade)
pub use collisions::SheetCollisions;
pub use compass::{CardinalDirection, CompoundDirection, Orientation};
pub use config::Config;
pub use continuity::{
    CompileContext, Compiled, Continuity, ContinuityKind, DotOrder, Ending, OrderedDots, SheetEnv,
};
pub use coordinate::{Coordinate, Pixel, PixelCoordinate, Step, StepCoordinate};
pub use diagnostics::{CompileIssue, Diagnostics, IssueKind, Severity};
pub use dot_type::DotType;
pub use error::{ContinuityError, DrillError};
pub use ids::{ContinuityId, DotId, IdAllocator, SheetId};
pub use movement::{ArcCommand, MoveCommand, MoveStyle, MovementCommand, StopCommand};
pub use scoped::{ContinuityRef, OrderEdit, ScopeStatus, SheetScoped};
pub use show::{Dot, Sheet, SheetDefaults, SheetDot, Show, ShowModel};
pub use state::AnimationState;
pub use stored_show::parse_show_json;
pub use timeline::{compile_show, DotTimeline, SheetSegment, SheetSpan, ShowTimeline};
