//! Pylonen (Cones) als Streckenbegrenzung und ihre Beobachtungen aus der Perzeption.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Farbkategorie einer Pylone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConeColour {
    /// Linke Streckenbegrenzung (blau)
    Left,
    /// Rechte Streckenbegrenzung (gelb)
    Right,
    /// Start/Ziel-Markierung (rot/orange)
    Timing,
}

impl ConeColour {
    /// Übersetzt den Farbbuchstaben der Perzeption (`b`, `y`, `r`/`o`).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'b' => Some(Self::Left),
            'y' => Some(Self::Right),
            'r' | 'o' => Some(Self::Timing),
            _ => None,
        }
    }

    /// Gegenüberliegende Seite; `Timing` hat keine.
    pub fn opposite(self) -> Option<Self> {
        match self {
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::Timing => None,
        }
    }
}

/// Stabiles Handle auf eine Pylone im [`ConeStore`](super::ConeStore).
///
/// Der Store wächst nur durch Anhängen, ein einmal ausgegebenes Handle
/// bleibt daher für die gesamte Session gültig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConeId(pub(crate) usize);

impl ConeId {
    /// Index im Store (entspricht dem Index der Beobachtungsliste).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Eine Beobachtung der Perzeption für einen Frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeObservation {
    /// Position in Weltkoordinaten
    pub position: Vec2,
    /// Farbkategorie
    pub colour: ConeColour,
}

impl ConeObservation {
    /// Erstellt eine Beobachtung aus Koordinaten.
    pub fn new(x: f32, y: f32, colour: ConeColour) -> Self {
        Self {
            position: Vec2::new(x, y),
            colour,
        }
    }
}

/// Eine im Store gehaltene Pylone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Letzte bekannte Position (eingefroren sobald passiert)
    pub position: Vec2,
    /// Farbkategorie
    pub colour: ConeColour,
    /// Fahrzeug war bereits in Reichweite
    pub passed_by: bool,
    /// Anzahl akzeptierter Mittellinien-Punkte, die diese Pylone verwenden
    pub paired: u32,
    /// Diagnose-Zähler: wie oft die Pylone insgesamt gepaart wurde
    pub mapped: u32,
}

impl Cone {
    /// Erstellt eine neue, noch nicht passierte Pylone.
    pub fn new(position: Vec2, colour: ConeColour) -> Self {
        Self {
            position,
            colour,
            passed_by: false,
            paired: 0,
            mapped: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_codes_map_to_categories() {
        assert_eq!(ConeColour::from_code('b'), Some(ConeColour::Left));
        assert_eq!(ConeColour::from_code('Y'), Some(ConeColour::Right));
        assert_eq!(ConeColour::from_code('r'), Some(ConeColour::Timing));
        assert_eq!(ConeColour::from_code('o'), Some(ConeColour::Timing));
        assert_eq!(ConeColour::from_code('g'), None);
    }

    #[test]
    fn timing_has_no_opposite_side() {
        assert_eq!(ConeColour::Left.opposite(), Some(ConeColour::Right));
        assert_eq!(ConeColour::Right.opposite(), Some(ConeColour::Left));
        assert_eq!(ConeColour::Timing.opposite(), None);
    }

    #[test]
    fn observation_deserializes_from_json() {
        let obs: ConeObservation =
            serde_json::from_str(r#"{"position":[1.5,-2.0],"colour":"right"}"#)
                .expect("gueltiges JSON erwartet");
        assert_eq!(obs, ConeObservation::new(1.5, -2.0, ConeColour::Right));
    }
}
