//! Punkte der geplanten Mittellinie.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ConeId;

/// Die beiden Pylonen, aus deren Mittelpunkt ein Pfadpunkt entstanden ist.
///
/// Immer als (links, rechts) normalisiert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConePair {
    /// Linke Pylone
    pub left: ConeId,
    /// Rechte Pylone
    pub right: ConeId,
}

impl ConePair {
    /// Erstellt ein Paar.
    pub fn new(left: ConeId, right: ConeId) -> Self {
        Self { left, right }
    }

    /// Beide Handles des Paares.
    pub fn ids(self) -> [ConeId; 2] {
        [self.left, self.right]
    }
}

/// Ein Punkt der Mittellinie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Position in Weltkoordinaten
    pub position: Vec2,
    /// Kurswinkel-Änderung bei Annahme (Grad)
    pub angle: f32,
    /// Erzeugendes Pylonen-Paar; `None` für Startposition und Start/Ziel-Punkt
    pub cones: Option<ConePair>,
    /// Anzeige-Flag für die Visualisierung
    pub accepted: bool,
}

impl PathPoint {
    /// Punkt ohne Pylonen-Referenz (Fahrzeugposition, Start/Ziel).
    pub fn synthetic(position: Vec2) -> Self {
        Self {
            position,
            angle: 0.0,
            cones: None,
            accepted: true,
        }
    }

    /// Mittelpunkt eines Pylonen-Paares.
    pub fn from_pair(position: Vec2, pair: ConePair, angle: f32) -> Self {
        Self {
            position,
            angle,
            cones: Some(pair),
            accepted: true,
        }
    }

    /// `true` wenn der Punkt aus einem Pylonen-Paar stammt.
    pub fn has_cones(&self) -> bool {
        self.cones.is_some()
    }
}
