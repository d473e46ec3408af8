//! Core-Domänentypen: Pylonen, Pfadpunkte, ConeStore, Randfolgen.

pub mod boundaries;
pub mod cone;
/// Append-only Speicher aller Pylonen
///
/// Dieses Modul definiert:
/// - ConeStore: besitzt jede Pylone der Session
/// - IngestReport: was ein Frame verändert hat
pub mod cone_store;
pub mod path_point;

pub use boundaries::Boundaries;
pub use cone::{Cone, ConeColour, ConeId, ConeObservation};
pub use cone_store::{ConeStore, IngestReport};
pub use path_point::{ConePair, PathPoint};
