//! Slowlap-Pfadplaner Library.
//! Inkrementeller Mittellinien-Planer für Pylonen-Strecken, als Library
//! exportiert für Replay-Tool, Tests und Benchmarks.

pub mod core;
pub mod error;
pub mod planner;
pub mod shared;

pub use core::{
    Boundaries, Cone, ConeColour, ConeId, ConeObservation, ConePair, ConeStore, PathPoint,
};
pub use error::{PlannerError, Result};
pub use planner::{LoopState, PathPlanner, PlannerOutput, VisualMarker};
pub use shared::PlannerOptions;
