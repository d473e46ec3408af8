//! Geteilte Bausteine für `core` und `planner`.
//!
//! Enthält die Planer-Optionen und reine Geometrie-Funktionen,
//! um direkte Abhängigkeiten zwischen den Schichten zu vermeiden.

pub mod geometry;
pub mod options;

pub use options::PlannerOptions;
pub use options::{PASSED_RADIUS, TRACK_WIDTH};
