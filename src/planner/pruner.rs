//! Rückschnitt der Mittellinie: unbestätigte Punkte und zu weite Vorausschau.

use glam::Vec2;

use crate::core::{ConeId, ConeStore, PathPoint};
use crate::shared::options::LOOKAHEAD_POINTS;

/// Die ersten beiden Punkte der Linie werden nie entfernt.
const PROTECTED_POINTS: usize = 2;

/// Ergebnis eines Rückschnitts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Index des dem Fahrzeug nächsten Punktes vor dem Rückschnitt
    pub nearest_index: Option<usize>,
    /// Entfernte Punkte, deren Pylonen noch nicht beide passiert waren
    pub removed_unconfirmed: usize,
    /// Entfernte Punkte jenseits der Vorausschau
    pub removed_lookahead: usize,
    /// Der synthetische Start/Ziel-Punkt wurde entfernt
    pub removed_start_finish: bool,
}

/// Sucht vom Ende her den dem Fahrzeug nächsten Punkt.
///
/// Lokale Suche: sie endet am ersten Punkt, der nicht näher liegt als sein
/// Nachfolger. Bei Gleichstand gewinnt der spätere Punkt.
pub fn nearest_from_tail(centre_line: &[PathPoint], car_position: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, point) in centre_line.iter().enumerate().rev() {
        let dist = point.position.distance(car_position);
        match best {
            Some((_, best_dist)) if dist >= best_dist => break,
            _ => best = Some((index, dist)),
        }
    }
    best.map(|(index, _)| index)
}

/// Entfernt das letzte Element und nimmt dessen Paarungen zurück.
fn pop_point(
    store: &mut ConeStore,
    centre_line: &mut Vec<PathPoint>,
    start_finish_sources: &[ConeId],
    outcome: &mut PruneOutcome,
) {
    let Some(point) = centre_line.pop() else {
        return;
    };
    match point.cones {
        Some(pair) => store.release_pairing(pair),
        None => {
            for &id in start_finish_sources {
                store.decrement_paired(id);
            }
            outcome.removed_start_finish = true;
        }
    }
}

fn tail_is_unconfirmed(store: &ConeStore, centre_line: &[PathPoint]) -> bool {
    match centre_line.last() {
        Some(point) => match point.cones {
            Some(pair) => !pair.ids().iter().all(|&id| store.cone(id).passed_by),
            None => true,
        },
        None => false,
    }
}

/// Schneidet die Mittellinie zurück.
///
/// 1. Vom Ende her fallen Punkte weg, solange deren Pylonen nicht beide
///    passiert sind (synthetische Punkte gelten als unbestätigt).
/// 2. Hinter dem fahrzeugnächsten Punkt bleiben höchstens
///    [`LOOKAHEAD_POINTS`] Punkte stehen.
///
/// Linien mit weniger als drei Punkten bleiben unverändert.
pub fn prune(
    store: &mut ConeStore,
    centre_line: &mut Vec<PathPoint>,
    start_finish_sources: &[ConeId],
    car_position: Vec2,
) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();
    if centre_line.len() <= PROTECTED_POINTS {
        return outcome;
    }

    outcome.nearest_index = nearest_from_tail(centre_line, car_position);

    while centre_line.len() > PROTECTED_POINTS && tail_is_unconfirmed(store, centre_line) {
        pop_point(store, centre_line, start_finish_sources, &mut outcome);
        outcome.removed_unconfirmed += 1;
    }

    if let Some(nearest) = outcome.nearest_index {
        while centre_line.len() > nearest + LOOKAHEAD_POINTS + 1 {
            pop_point(store, centre_line, start_finish_sources, &mut outcome);
            outcome.removed_lookahead += 1;
        }
    }

    outcome
}

/// Entfernt den synthetischen Start/Ziel-Punkt an beliebiger Stelle
/// (außer dem Startpunkt) und nimmt die Paarungen seiner Timing-Pylonen zurück.
pub fn remove_start_finish(
    store: &mut ConeStore,
    centre_line: &mut Vec<PathPoint>,
    start_finish_sources: &[ConeId],
) -> bool {
    let Some(index) = centre_line
        .iter()
        .skip(1)
        .position(|p| p.cones.is_none())
        .map(|i| i + 1)
    else {
        return false;
    };
    centre_line.remove(index);
    for &id in start_finish_sources {
        store.decrement_paired(id);
    }
    true
}
