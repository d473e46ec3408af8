//! Fehlertypen des Pfadplaners.
//!
//! Geometrische Ablehnungen sind keine Fehler; hier landen nur verletzte
//! Vorbedingungen, die der Aufrufer sehen muss.

use thiserror::Error;

use crate::core::ConeColour;

/// Vom Planer gemeldete Vorbedingungs-Verletzungen.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Beobachtungsliste geschrumpft: vorher {previous}, jetzt {received} Pylonen")]
    ObservationsShrunk { previous: usize, received: usize },

    #[error("Index-Zuordnung verletzt: Pylone {index} war {expected:?}, ist jetzt {received:?}")]
    ColourChanged {
        index: usize,
        expected: ConeColour,
        received: ConeColour,
    },

    #[error("Beobachtung {index} hat keine endliche Position")]
    NonFiniteObservation { index: usize },

    #[error("Fahrzeugposition ist nicht endlich")]
    NonFinitePose,

    #[error("Ungültige Optionen: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
