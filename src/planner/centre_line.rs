//! Aufbau der Mittellinie aus linken/rechten Pylonen-Paaren.

use std::collections::HashSet;

use glam::Vec2;

use super::sequencer::find_opposite_closest;
use crate::core::{Boundaries, ConeColour, ConeId, ConePair, ConeStore, PathPoint};
use crate::shared::geometry::turn_angle_deg;
use crate::shared::options::{MAX_NEW_POINTS_PER_SIDE, MAX_PAIRINGS, REJECT_BUFFER_TICKS};
use crate::shared::PlannerOptions;

/// Diagnose-Puffer abgelehnter Pfadpunkte (nur für die Visualisierung).
#[derive(Debug, Clone, Default)]
pub struct RejectedPoints {
    points: Vec<PathPoint>,
    pending_ticks: u32,
}

impl RejectedPoints {
    /// Alle gepufferten Ablehnungen.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Anzahl gepufferter Ablehnungen.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Gibt `true` zurück, wenn keine Ablehnung gepuffert ist.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Puffert eine Ablehnung; ein bereits gepuffertes Paar wird ignoriert.
    pub fn record(&mut self, point: PathPoint) -> bool {
        let duplicate = point.cones.is_some()
            && self.points.iter().any(|p| p.cones == point.cones);
        if duplicate {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Schließt einen Zyklus ab; nach [`REJECT_BUFFER_TICKS`] Zyklen mit
    /// anstehenden Ablehnungen wird der Puffer geleert.
    pub fn end_tick(&mut self) {
        if self.points.is_empty() {
            return;
        }
        self.pending_ticks += 1;
        if self.pending_ticks >= REJECT_BUFFER_TICKS {
            self.points.clear();
            self.pending_ticks = 0;
        }
    }
}

/// Ergebnis eines Aufbau-Schritts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    /// An die Mittellinie angehängte Punkte
    pub appended: usize,
    /// Neu gepufferte Ablehnungen
    pub rejected: usize,
}

/// Bewertung eines Kandidaten-Mittelpunkts.
#[derive(Debug, Clone, PartialEq)]
enum Candidate {
    Accepted(PathPoint),
    /// Pylonen zu weit auseinander oder zu nah beieinander
    BadPair { point: PathPoint, pair_dist: f32 },
    /// Abstand oder Winkel zur bisherigen Linie unzulässig
    BadGeometry { point: PathPoint, spacing: f32 },
}

/// Bewertet den Mittelpunkt eines Pylonen-Paares gegen die Referenzpunkte.
///
/// `reference` enthält die letzten ein oder zwei Punkte der Linie plus die
/// in diesem Zyklus bereits angenommenen Kandidaten derselben Seite.
fn evaluate(
    store: &ConeStore,
    pair: ConePair,
    reference: &[Vec2],
    options: &PlannerOptions,
) -> Candidate {
    let left = store.position(pair.left);
    let right = store.position(pair.right);
    let midpoint = (left + right) * 0.5;

    let pair_dist = left.distance(right);
    if !options.pair_distance_range().contains(&pair_dist) {
        return Candidate::BadPair {
            point: rejected_point(midpoint, pair, 0.0),
            pair_dist,
        };
    }

    let (angle, spacing) = match reference {
        [.., before, last] => (
            turn_angle_deg(*before, *last, midpoint),
            last.distance(midpoint),
        ),
        [last] => (0.0, last.distance(midpoint)),
        [] => (0.0, f32::INFINITY),
    };

    if options.accepts_turn_angle(angle)
        && spacing > options.min_point_dist
        && spacing < options.max_point_dist
    {
        Candidate::Accepted(PathPoint::from_pair(midpoint, pair, angle))
    } else {
        Candidate::BadGeometry {
            point: rejected_point(midpoint, pair, angle),
            spacing,
        }
    }
}

fn rejected_point(position: Vec2, pair: ConePair, angle: f32) -> PathPoint {
    PathPoint {
        accepted: false,
        ..PathPoint::from_pair(position, pair, angle)
    }
}

fn normalized_pair(colour: ConeColour, this: ConeId, opposite: ConeId) -> ConePair {
    match colour {
        ConeColour::Right => ConePair::new(opposite, this),
        _ => ConePair::new(this, opposite),
    }
}

/// Erzeugt neue Kandidaten entlang einer Seite, ab deren Anker.
#[allow(clippy::too_many_arguments)]
fn walk_side(
    store: &ConeStore,
    boundaries: &Boundaries,
    colour: ConeColour,
    base: &[Vec2],
    existing: &HashSet<ConePair>,
    rejected: &mut RejectedPoints,
    outcome: &mut BuildOutcome,
    options: &PlannerOptions,
) -> Vec<PathPoint> {
    let Some(opposite_colour) = colour.opposite() else {
        return Vec::new();
    };
    let side = boundaries.side(colour);
    let opposite = boundaries.side(opposite_colour);
    let start = boundaries.anchor(colour).min(side.len());

    let mut reference = base.to_vec();
    let mut accepted = Vec::new();
    let mut taken = 0usize;

    for &id in &side[start..] {
        if taken >= MAX_NEW_POINTS_PER_SIDE {
            break;
        }
        let cone = store.cone(id);
        if cone.passed_by && cone.paired >= MAX_PAIRINGS {
            continue;
        }
        let Some((opposite_id, _)) = find_opposite_closest(store, cone.position, opposite) else {
            break;
        };
        let pair = normalized_pair(colour, id, opposite_id);

        // Paar bildet bereits einen Punkt der Linie
        if existing.contains(&pair) {
            taken += 1;
            continue;
        }

        match evaluate(store, pair, &reference, options) {
            Candidate::Accepted(point) => {
                reference.push(point.position);
                accepted.push(point);
                taken += 1;
            }
            Candidate::BadPair { point, pair_dist } => {
                if options.debug {
                    log::debug!(
                        "[XX] Punkt {:?} abgelehnt: Pylonen-Abstand {pair_dist:.2}",
                        point.position
                    );
                }
                if rejected.record(point) {
                    outcome.rejected += 1;
                }
            }
            Candidate::BadGeometry { point, spacing } => {
                if options.debug {
                    log::debug!(
                        "[XX] Punkt {:?} abgelehnt: Abstand {spacing:.2}, Winkel {:.1}",
                        point.position,
                        point.angle
                    );
                }
                if rejected.record(point) {
                    outcome.rejected += 1;
                }
            }
        }
    }

    accepted
}

/// Verlängert die Mittellinie um neue Mittelpunkte aus beiden Randfolgen.
///
/// Pro Seite werden höchstens zwei Kandidaten angenommen. Kandidaten beider
/// Seiten werden zusammengelegt, nach Abstand zum ältesten Referenzpunkt
/// sortiert und angehängt; die Pylonen beider Paare zählen als gepaart.
pub fn extend_centre_line(
    store: &mut ConeStore,
    boundaries: &Boundaries,
    centre_line: &mut Vec<PathPoint>,
    rejected: &mut RejectedPoints,
    options: &PlannerOptions,
) -> BuildOutcome {
    let mut outcome = BuildOutcome::default();
    if !boundaries.both_sides_known() || centre_line.is_empty() {
        return outcome;
    }

    let base: Vec<Vec2> = centre_line[centre_line.len().saturating_sub(2)..]
        .iter()
        .map(|p| p.position)
        .collect();
    let existing: HashSet<ConePair> = centre_line.iter().filter_map(|p| p.cones).collect();

    let from_left = walk_side(
        store,
        boundaries,
        ConeColour::Left,
        &base,
        &existing,
        rejected,
        &mut outcome,
        options,
    );
    let from_right = walk_side(
        store,
        boundaries,
        ConeColour::Right,
        &base,
        &existing,
        rejected,
        &mut outcome,
        options,
    );

    let merge_radius = options.merge_radius();
    let mut merged = from_right;
    for point in from_left {
        let duplicate = merged
            .iter()
            .any(|p| p.position.distance(point.position) <= merge_radius);
        if !duplicate {
            merged.push(point);
        }
    }

    let origin = base[0];
    merged.sort_by(|a, b| {
        a.position
            .distance(origin)
            .total_cmp(&b.position.distance(origin))
    });

    for point in merged {
        if let Some(pair) = point.cones {
            store.record_pairing(pair);
        }
        centre_line.push(point);
        outcome.appended += 1;
    }

    outcome
}
