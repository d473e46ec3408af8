//! Der Pfadplaner: verbindet Store, Randfolgen, Mittellinie und Rundenschluss.
//!
//! Ein Zyklus (`update`) läuft in fester Reihenfolge:
//! Startzone → Übernahme → Rückschnitt → Start/Ziel → Einsortieren →
//! Mittellinie → Rundenschluss → Ausgabe.

pub mod centre_line;
pub mod loop_closure;
pub mod output;
pub mod pruner;
pub mod sequencer;

pub use centre_line::{BuildOutcome, RejectedPoints};
pub use loop_closure::{LoopClosureDetector, LoopState, StartFinish};
pub use output::{PlannerOutput, VisualMarker};
pub use pruner::PruneOutcome;
pub use sequencer::SortOutcome;

use glam::Vec2;

use crate::core::{Boundaries, Cone, ConeColour, ConeId, ConeObservation, ConeStore, PathPoint};
use crate::error::{PlannerError, Result};
use crate::shared::PlannerOptions;

/// Inkrementeller Mittellinien-Planer für eine Session.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    options: PlannerOptions,
    initial_position: Vec2,
    store: ConeStore,
    boundaries: Boundaries,
    timing: Vec<ConeId>,
    centre_line: Vec<PathPoint>,
    rejected: RejectedPoints,
    loop_closure: LoopClosureDetector,
    ticks: u64,
}

impl PathPlanner {
    /// Erstellt einen Planer; die Mittellinie beginnt an `initial_position`.
    pub fn new(initial_position: Vec2, options: PlannerOptions) -> Result<Self> {
        options.validate()?;
        if !initial_position.is_finite() {
            return Err(PlannerError::NonFinitePose);
        }
        Ok(Self {
            options,
            initial_position,
            store: ConeStore::new(),
            boundaries: Boundaries::new(),
            timing: Vec::new(),
            centre_line: vec![PathPoint::synthetic(initial_position)],
            rejected: RejectedPoints::default(),
            loop_closure: LoopClosureDetector::new(initial_position),
            ticks: 0,
        })
    }

    /// Verarbeitet einen Frame und liefert die aktualisierte Planung.
    ///
    /// Nach dem Rundenschluss wird die eingefrorene Ausgabe wiederholt.
    /// Bei einem Fehler bleibt der Zustand unverändert.
    pub fn update(
        &mut self,
        observations: &[ConeObservation],
        car_position: Vec2,
    ) -> Result<PlannerOutput> {
        if self.loop_closure.is_complete() {
            return Ok(self.output());
        }
        if !car_position.is_finite() {
            log::warn!("Frame {} verworfen: Fahrzeugposition nicht endlich", self.ticks);
            return Err(PlannerError::NonFinitePose);
        }
        if let Err(e) = self.store.validate(observations) {
            log::warn!("Frame {} verworfen: {}", self.ticks, e);
            return Err(e);
        }

        self.ticks += 1;
        self.loop_closure
            .update_start_zone(car_position, &self.options);

        let report = self.store.ingest(
            observations,
            car_position,
            self.options.passed_radius,
            &mut self.boundaries,
        )?;
        self.timing.extend(report.new_timing.iter().copied());

        let pruned = pruner::prune(
            &mut self.store,
            &mut self.centre_line,
            self.loop_closure.start_finish_sources(),
            car_position,
        );
        if pruned.removed_start_finish {
            self.loop_closure.retract_start_finish();
        }

        // Neue oder verschobene Timing-Pylonen: Referenz neu bestimmen
        let timing_changed = report.timing_moved || !report.new_timing.is_empty();
        if timing_changed
            && self.loop_closure.state() == LoopState::NotStarted
            && self.loop_closure.start_finish().is_some()
        {
            pruner::remove_start_finish(
                &mut self.store,
                &mut self.centre_line,
                self.loop_closure.start_finish_sources(),
            );
            self.loop_closure.retract_start_finish();
        }

        self.loop_closure.try_start_finish(
            &mut self.store,
            &self.timing,
            &mut self.centre_line,
            &self.options,
        );

        let (left, right): (Vec<ConeId>, Vec<ConeId>) = report
            .staged
            .iter()
            .copied()
            .partition(|&id| self.store.cone(id).colour == ConeColour::Left);
        let sorted_left = sequencer::sort_and_push(
            &self.store,
            &mut self.boundaries,
            ConeColour::Left,
            &left,
            &right,
            car_position,
            &self.options,
        );
        let sorted_right = sequencer::sort_and_push(
            &self.store,
            &mut self.boundaries,
            ConeColour::Right,
            &right,
            &left,
            car_position,
            &self.options,
        );

        let built = centre_line::extend_centre_line(
            &mut self.store,
            &self.boundaries,
            &mut self.centre_line,
            &mut self.rejected,
            &self.options,
        );

        self.loop_closure.check_closure(
            car_position,
            &mut self.centre_line,
            &self.boundaries,
            &self.store,
            &self.options,
        );

        if self.options.debug {
            log::debug!(
                "Frame {}: {} neu, {} passiert, Rand +{}/+{} (verschoben {}/{}), \
                 Linie +{} -{} ({} Punkte), {} abgelehnt, {:?}",
                self.ticks,
                report.new_cones,
                report.newly_passed,
                sorted_left.appended,
                sorted_right.appended,
                sorted_left.deferred,
                sorted_right.deferred,
                built.appended,
                pruned.removed_unconfirmed + pruned.removed_lookahead,
                self.centre_line.len(),
                built.rejected,
                self.loop_closure.state(),
            );
        }

        let output = self.output();
        self.rejected.end_tick();
        Ok(output)
    }

    /// Stellt die Ausgabe aus dem aktuellen Zustand zusammen.
    pub fn output(&self) -> PlannerOutput {
        PlannerOutput::collect(
            &self.store,
            &self.boundaries,
            &self.centre_line,
            &self.rejected,
            self.loop_closure.is_complete(),
        )
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn initial_position(&self) -> Vec2 {
        self.initial_position
    }

    pub fn store(&self) -> &ConeStore {
        &self.store
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn centre_line(&self) -> &[PathPoint] {
        &self.centre_line
    }

    /// Linke Randfolge in Fahrtrichtung.
    pub fn left_cones(&self) -> impl Iterator<Item = &Cone> {
        self.boundaries.left.iter().map(|&id| self.store.cone(id))
    }

    /// Rechte Randfolge in Fahrtrichtung.
    pub fn right_cones(&self) -> impl Iterator<Item = &Cone> {
        self.boundaries.right.iter().map(|&id| self.store.cone(id))
    }

    pub fn cone(&self, id: ConeId) -> Option<&Cone> {
        self.store.get(id)
    }

    /// Gepufferte Ablehnungen der letzten Zyklen.
    pub fn rejected_points(&self) -> &[PathPoint] {
        self.rejected.points()
    }

    pub fn start_finish(&self) -> Option<&StartFinish> {
        self.loop_closure.start_finish()
    }

    /// Alle bisher gesehenen Start/Ziel-Pylonen.
    pub fn timing_cones(&self) -> &[ConeId] {
        &self.timing
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_closure.state()
    }

    pub fn is_complete(&self) -> bool {
        self.loop_closure.is_complete()
    }

    /// Anzahl verarbeiteter Frames.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle() -> Vec<ConeObservation> {
        vec![
            ConeObservation::new(2.0, 1.5, ConeColour::Left),
            ConeObservation::new(5.0, 1.5, ConeColour::Left),
            ConeObservation::new(2.0, -1.5, ConeColour::Right),
            ConeObservation::new(5.0, -1.5, ConeColour::Right),
        ]
    }

    #[test]
    fn new_rejects_invalid_input() {
        let bad = PlannerOptions {
            track_width: -1.0,
            ..PlannerOptions::default()
        };
        assert!(matches!(
            PathPlanner::new(Vec2::ZERO, bad),
            Err(PlannerError::InvalidOptions(_))
        ));
        assert_eq!(
            PathPlanner::new(Vec2::new(f32::NAN, 0.0), PlannerOptions::default()).err(),
            Some(PlannerError::NonFinitePose)
        );
    }

    #[test]
    fn empty_frame_returns_start_only() {
        let mut planner =
            PathPlanner::new(Vec2::ZERO, PlannerOptions::default()).expect("Planer erwartet");
        let output = planner.update(&[], Vec2::ZERO).expect("Update erwartet");
        assert_eq!(output.centre_line, vec![PathPoint::synthetic(Vec2::ZERO)]);
        assert!(output.markers.is_empty());
        assert_eq!(planner.ticks(), 1);
    }

    #[test]
    fn failed_update_leaves_state_untouched() {
        let mut planner =
            PathPlanner::new(Vec2::ZERO, PlannerOptions::default()).expect("Planer erwartet");
        let before = planner.update(&rectangle(), Vec2::ZERO).expect("Update erwartet");

        let mut recoloured = rectangle();
        recoloured[0].colour = ConeColour::Right;
        assert!(matches!(
            planner.update(&recoloured, Vec2::ZERO),
            Err(PlannerError::ColourChanged { index: 0, .. })
        ));
        assert!(matches!(
            planner.update(&rectangle(), Vec2::new(f32::INFINITY, 0.0)),
            Err(PlannerError::NonFinitePose)
        ));
        assert_eq!(planner.ticks(), 1);
        assert_eq!(planner.output(), before);
    }
}
