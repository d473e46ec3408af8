//! Linke und rechte Streckenbegrenzung als geordnete Pylonen-Folgen.

use super::{ConeColour, ConeId, ConeStore};

/// Geordnete Randfolgen in Fahrtrichtung.
///
/// Einträge werden nur angehängt, nie umsortiert. Der Anker markiert je
/// Seite den letzten stabilen (passierten und gepaarten) Eintrag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundaries {
    /// Linke Pylonen in Fahrtrichtung
    pub left: Vec<ConeId>,
    /// Rechte Pylonen in Fahrtrichtung
    pub right: Vec<ConeId>,
    left_anchor: usize,
    right_anchor: usize,
}

impl Boundaries {
    /// Erstellt leere Randfolgen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Randfolge einer Farbe; `Timing` hat keine.
    pub fn side(&self, colour: ConeColour) -> &[ConeId] {
        match colour {
            ConeColour::Left => &self.left,
            ConeColour::Right => &self.right,
            ConeColour::Timing => &[],
        }
    }

    pub(crate) fn side_mut(&mut self, colour: ConeColour) -> Option<&mut Vec<ConeId>> {
        match colour {
            ConeColour::Left => Some(&mut self.left),
            ConeColour::Right => Some(&mut self.right),
            ConeColour::Timing => None,
        }
    }

    /// Index des letzten stabilen Eintrags einer Seite (0 wenn keiner).
    pub fn anchor(&self, colour: ConeColour) -> usize {
        match colour {
            ConeColour::Left => self.left_anchor,
            ConeColour::Right => self.right_anchor,
            ConeColour::Timing => 0,
        }
    }

    /// `true` wenn beide Seiten mindestens eine Pylone enthalten.
    pub fn both_sides_known(&self) -> bool {
        !self.left.is_empty() && !self.right.is_empty()
    }

    /// Kürzt beide Folgen auf ihren stabilen Teil.
    ///
    /// Vom Ende her fallen Pylonen weg, die noch nicht passiert oder nie
    /// gepaart wurden; sie werden im selben Zyklus neu einsortiert.
    pub fn settle(&mut self, store: &ConeStore) {
        self.left_anchor = settle_side(&mut self.left, store);
        self.right_anchor = settle_side(&mut self.right, store);
    }
}

fn settle_side(side: &mut Vec<ConeId>, store: &ConeStore) -> usize {
    while let Some(&last) = side.last() {
        let cone = store.cone(last);
        if cone.passed_by && cone.paired > 0 {
            break;
        }
        side.pop();
    }
    side.len().saturating_sub(1)
}
