//! Der ConeStore: besitzt alle Pylonen einer Session.
//!
//! Einzige Identitäts-Information ist der Index in der Beobachtungsliste:
//! bereits gemeldete Pylonen behalten ihren Index, neue werden angehängt.

use std::collections::HashSet;

use glam::Vec2;

use super::{Boundaries, Cone, ConeColour, ConeId, ConeObservation, ConePair};
use crate::error::{PlannerError, Result};

/// Ergebnis eines [`ConeStore::ingest`]-Aufrufs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Linke/rechte Pylonen, die (erneut) einsortiert werden müssen
    pub staged: Vec<ConeId>,
    /// Erstmals gesehene Start/Ziel-Pylonen
    pub new_timing: Vec<ConeId>,
    /// Anzahl neu angelegter Pylonen
    pub new_cones: usize,
    /// Anzahl in diesem Aufruf als passiert markierter Pylonen
    pub newly_passed: usize,
    /// Mindestens eine Start/Ziel-Pylone hat ihre Position geändert
    pub timing_moved: bool,
}

/// Append-only Arena aller beobachteten Pylonen.
#[derive(Debug, Clone, Default)]
pub struct ConeStore {
    cones: Vec<Cone>,
}

impl ConeStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self { cones: Vec::new() }
    }

    /// Gibt die Anzahl gespeicherter Pylonen zurück.
    pub fn len(&self) -> usize {
        self.cones.len()
    }

    /// Gibt `true` zurück, wenn noch keine Pylone bekannt ist.
    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }

    /// Liefert die Pylone zu einem Handle.
    pub fn get(&self, id: ConeId) -> Option<&Cone> {
        self.cones.get(id.0)
    }

    /// Liefert die Pylone zu einem vom Store ausgegebenen Handle.
    ///
    /// Handles stammen ausschließlich aus diesem Store und bleiben gültig.
    pub(crate) fn cone(&self, id: ConeId) -> &Cone {
        &self.cones[id.0]
    }

    /// Position einer Pylone.
    pub fn position(&self, id: ConeId) -> Vec2 {
        self.cone(id).position
    }

    /// Iterator über alle Pylonen mit Handle.
    pub fn iter(&self) -> impl Iterator<Item = (ConeId, &Cone)> {
        self.cones.iter().enumerate().map(|(i, c)| (ConeId(i), c))
    }

    /// Prüft eine Beobachtungsliste gegen den aktuellen Bestand, ohne zu mutieren.
    pub fn validate(&self, observations: &[ConeObservation]) -> Result<()> {
        if observations.len() < self.cones.len() {
            return Err(PlannerError::ObservationsShrunk {
                previous: self.cones.len(),
                received: observations.len(),
            });
        }
        for (index, obs) in observations.iter().enumerate() {
            if !obs.position.is_finite() {
                return Err(PlannerError::NonFiniteObservation { index });
            }
            if let Some(known) = self.cones.get(index) {
                if known.colour != obs.colour {
                    return Err(PlannerError::ColourChanged {
                        index,
                        expected: known.colour,
                        received: obs.colour,
                    });
                }
            }
        }
        Ok(())
    }

    /// Übernimmt die Beobachtungen eines Frames.
    ///
    /// Neue Indizes legen Pylonen an, bekannte und noch nicht passierte
    /// Pylonen werden nachgeführt oder als passiert markiert. Passierte,
    /// aber nie gepaarte Pylonen werden erneut zum Einsortieren vorgemerkt.
    /// Anschließend werden die Randfolgen in `boundaries` auf ihren stabilen
    /// Teil gekürzt.
    pub fn ingest(
        &mut self,
        observations: &[ConeObservation],
        car_position: Vec2,
        passed_radius: f32,
        boundaries: &mut Boundaries,
    ) -> Result<IngestReport> {
        self.validate(observations)?;

        let mut report = IngestReport::default();

        for (index, obs) in observations.iter().enumerate() {
            let id = ConeId(index);

            if index >= self.cones.len() {
                self.cones.push(Cone::new(obs.position, obs.colour));
                report.new_cones += 1;
                match obs.colour {
                    ConeColour::Timing => report.new_timing.push(id),
                    _ => report.staged.push(id),
                }
                continue;
            }

            let cone = &mut self.cones[index];
            if !cone.passed_by {
                if cone.position.distance(car_position) < passed_radius {
                    // Position ab hier eingefroren
                    cone.passed_by = true;
                    report.newly_passed += 1;
                } else {
                    let moved = cone.position != obs.position;
                    cone.position = obs.position;
                    match cone.colour {
                        ConeColour::Timing => report.timing_moved |= moved,
                        _ => report.staged.push(id),
                    }
                }
            } else if cone.paired == 0 && cone.colour != ConeColour::Timing {
                report.staged.push(id);
            }
        }

        boundaries.settle(self);

        let sequenced: HashSet<ConeId> = boundaries
            .left
            .iter()
            .chain(boundaries.right.iter())
            .copied()
            .collect();
        report.staged.retain(|id| !sequenced.contains(id));

        Ok(report)
    }

    /// Zählt eine akzeptierte Paarung auf beiden Pylonen hoch.
    pub(crate) fn record_pairing(&mut self, pair: ConePair) {
        for id in pair.ids() {
            let cone = &mut self.cones[id.0];
            cone.paired += 1;
            cone.mapped += 1;
        }
    }

    /// Nimmt eine Paarung zurück (nur durch den Pruner).
    pub(crate) fn release_pairing(&mut self, pair: ConePair) {
        for id in pair.ids() {
            let cone = &mut self.cones[id.0];
            cone.paired = cone.paired.saturating_sub(1);
        }
    }

    /// Zählt die Paarung einer einzelnen Pylone hoch (Start/Ziel-Pylonen).
    pub(crate) fn increment_paired(&mut self, id: ConeId) {
        self.cones[id.0].paired += 1;
    }

    /// Nimmt die Paarung einer einzelnen Pylone zurück.
    pub(crate) fn decrement_paired(&mut self, id: ConeId) {
        let cone = &mut self.cones[id.0];
        cone.paired = cone.paired.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests;
