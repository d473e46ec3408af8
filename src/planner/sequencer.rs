//! Einsortieren neu beobachteter Pylonen in die Randfolgen.
//!
//! Die Reihenfolge in einer Randfolge ist die Fahrreihenfolge, nicht die
//! Distanz zum Fahrzeug. Neue Pylonen werden über eine Kostenfunktion aus
//! Abstand, Seitenabstand und Krümmungsänderung angehängt.

use glam::Vec2;

use crate::core::{Boundaries, ConeColour, ConeId, ConeStore};
use crate::shared::geometry::curvature_change_rad;
use crate::shared::options::{BOOTSTRAP_OPPOSITE_FACTOR, OPPOSITE_SCAN_PATIENCE};
use crate::shared::PlannerOptions;

/// Kosten, wenn auf der Gegenseite noch keine Pylone passiert wurde.
pub const NO_PASSED_OPPOSITE_COST: f32 = 99.0;

const COST1_WEIGHT: f32 = 1.0;
const COST2_WEIGHT: f32 = 2.0;
const COST3_WEIGHT: f32 = 1.5;

/// Ergebnis des Einsortierens einer Farbe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOutcome {
    /// Angehängte Pylonen
    pub appended: usize,
    /// Auf den nächsten Zyklus verschobene Pylonen
    pub deferred: usize,
}

/// Sucht die nächstgelegene Pylone in `candidates`, vom Ende her.
///
/// Bricht ab, sobald [`OPPOSITE_SCAN_PATIENCE`] Kandidaten in Folge keine
/// Verbesserung bringen. Das Ende der Folge enthält fast immer das Minimum.
pub fn find_opposite_closest(
    store: &ConeStore,
    position: Vec2,
    candidates: &[ConeId],
) -> Option<(ConeId, f32)> {
    let mut best: Option<(ConeId, f32)> = None;
    let mut misses = 0usize;

    for &id in candidates.iter().rev() {
        let dist = store.position(id).distance(position);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {
                misses += 1;
                if misses >= OPPOSITE_SCAN_PATIENCE {
                    break;
                }
            }
            _ => {
                best = Some((id, dist));
                misses = 0;
            }
        }
    }

    best
}

/// Hängt die vorgemerkten Pylonen `staged` einer Farbe an ihre Randfolge an.
///
/// `staged_opposite` sind die im selben Zyklus vorgemerkten Pylonen der
/// Gegenseite; sie zählen nur beim Bootstrap als Partner.
pub fn sort_and_push(
    store: &ConeStore,
    boundaries: &mut Boundaries,
    colour: ConeColour,
    staged: &[ConeId],
    staged_opposite: &[ConeId],
    car_position: Vec2,
    options: &PlannerOptions,
) -> SortOutcome {
    let Some(opposite_colour) = colour.opposite() else {
        return SortOutcome::default();
    };
    if staged.is_empty() {
        return SortOutcome::default();
    }

    let settled_len = boundaries.side(colour).len();
    let outcome = if staged.len() < 2 || settled_len < 2 {
        bootstrap(
            store,
            boundaries,
            colour,
            opposite_colour,
            staged,
            staged_opposite,
            car_position,
            options,
        )
    } else {
        let ordered = order_by_cost(store, boundaries, colour, opposite_colour, staged);
        if options.debug {
            log::debug!("{colour:?}: Kosten-Reihenfolge {ordered:?}");
        }
        let appended = ordered.len();
        if let Some(side) = boundaries.side_mut(colour) {
            side.extend(ordered);
        }
        SortOutcome {
            appended,
            deferred: 0,
        }
    };

    if options.debug {
        log::debug!(
            "{colour:?}: {} Pylonen einsortiert, {} verschoben",
            outcome.appended,
            outcome.deferred
        );
    }
    outcome
}

/// Wenige Pylonen: nur übernehmen, wenn eine Gegenseiten-Pylone in Streckenbreite liegt.
#[allow(clippy::too_many_arguments)]
fn bootstrap(
    store: &ConeStore,
    boundaries: &mut Boundaries,
    colour: ConeColour,
    opposite_colour: ConeColour,
    staged: &[ConeId],
    staged_opposite: &[ConeId],
    car_position: Vec2,
    options: &PlannerOptions,
) -> SortOutcome {
    let reference = boundaries
        .side(colour)
        .last()
        .map(|&id| store.position(id))
        .unwrap_or(car_position);

    let mut keyed: Vec<(f32, ConeId)> = staged
        .iter()
        .map(|&id| (store.position(id).distance(reference), id))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let gate = options.track_width * BOOTSTRAP_OPPOSITE_FACTOR;
    let mut outcome = SortOutcome::default();

    for (_, id) in keyed {
        let position = store.position(id);
        let settled = find_opposite_closest(store, position, boundaries.side(opposite_colour));
        let pending = find_opposite_closest(store, position, staged_opposite);
        let nearest = [settled, pending]
            .into_iter()
            .flatten()
            .map(|(_, dist)| dist)
            .min_by(f32::total_cmp);

        match nearest {
            Some(dist) if dist < gate => {
                if let Some(side) = boundaries.side_mut(colour) {
                    side.push(id);
                }
                outcome.appended += 1;
            }
            _ => {
                if options.debug {
                    log::debug!(
                        "{colour:?}-Pylone {} verworfen: Gegenseite {:?} (Grenze {gate})",
                        id.index(),
                        nearest
                    );
                }
                outcome.deferred += 1;
            }
        }
    }

    outcome
}

/// Sortiert vorgemerkte Pylonen nach `cost1² + 2·cost2² + 1.5·cost3²`.
fn order_by_cost(
    store: &ConeStore,
    boundaries: &Boundaries,
    colour: ConeColour,
    opposite_colour: ConeColour,
    staged: &[ConeId],
) -> Vec<ConeId> {
    let side = boundaries.side(colour);
    let opposite = boundaries.side(opposite_colour);
    let passed_opposite: Vec<ConeId> = opposite
        .iter()
        .copied()
        .filter(|&id| store.cone(id).passed_by)
        .collect();

    let mut keyed: Vec<(f32, ConeId)> = staged
        .iter()
        .map(|&id| {
            let position = store.position(id);
            let cost1 = side
                .last()
                .map(|&last| store.position(last).distance(position))
                .unwrap_or(0.0);
            let cost2 = find_opposite_closest(store, position, &passed_opposite)
                .map(|(_, dist)| dist)
                .unwrap_or(NO_PASSED_OPPOSITE_COST);
            let cost3 = match side {
                [.., before, last] => {
                    curvature_change_rad(store.position(*before), store.position(*last), position)
                }
                _ => 0.0,
            };
            let cost = COST1_WEIGHT * cost1 * cost1
                + COST2_WEIGHT * cost2 * cost2
                + COST3_WEIGHT * cost3 * cost3;
            (cost, id)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, id)| id).collect()
}
