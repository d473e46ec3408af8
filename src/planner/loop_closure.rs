//! Start/Ziel-Erkennung und Rundenschluss.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{Boundaries, ConeId, ConeStore, PathPoint};
use crate::shared::geometry::{centroid, heading_deg};
use crate::shared::options::TIMING_BEARING_LIMIT;
use crate::shared::PlannerOptions;

/// Zustand der Runde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Fahrzeug noch in der Startzone
    #[default]
    NotStarted,
    /// Startzone verlassen, Strecke wird erkundet
    Exploring,
    /// Linie ist in die Nähe der Startposition zurückgekehrt
    ReadyToClose,
    /// Runde geschlossen, Ausgabe eingefroren
    Complete,
}

/// Referenzpunkt der Start/Ziel-Linie aus den Timing-Pylonen.
#[derive(Debug, Clone, PartialEq)]
pub struct StartFinish {
    /// Schwerpunkt der Timing-Pylonen
    pub position: Vec2,
    /// Peilung von der Startposition aus (Grad)
    pub bearing: f32,
    /// Timing-Pylonen, deren Paarungszähler erhöht wurden
    pub sources: Vec<ConeId>,
}

/// Berechnet den Start/Ziel-Referenzpunkt.
///
/// Gültig nur, wenn der Schwerpunkt näher als eine Streckenbreite an der
/// ersten Timing-Pylone liegt und annähernd geradeaus voraus liegt.
pub fn locate_start_finish(
    store: &ConeStore,
    timing: &[ConeId],
    initial_position: Vec2,
    options: &PlannerOptions,
) -> Option<StartFinish> {
    let first = store.position(*timing.first()?);
    let position = centroid(timing.iter().map(|&id| store.position(id)))?;

    if position.distance(first) >= options.track_width {
        return None;
    }
    let bearing = heading_deg(initial_position, position);
    if bearing.abs() >= TIMING_BEARING_LIMIT {
        return None;
    }

    Some(StartFinish {
        position,
        bearing,
        sources: timing.to_vec(),
    })
}

/// Fügt einen Punkt so ein, dass die Abstände zur Startposition entlang
/// der Linie aufsteigend bleiben. Index 0 bleibt unangetastet.
pub fn insert_by_distance(
    centre_line: &mut Vec<PathPoint>,
    point: PathPoint,
    initial_position: Vec2,
) -> usize {
    let dist = point.position.distance(initial_position);
    let index = centre_line
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, p)| p.position.distance(initial_position) > dist)
        .map_or(centre_line.len(), |(i, _)| i);
    centre_line.insert(index, point);
    index
}

/// Verfolgt den Rundenzustand und den Start/Ziel-Punkt.
#[derive(Debug, Clone)]
pub struct LoopClosureDetector {
    state: LoopState,
    initial_position: Vec2,
    start_finish: Option<StartFinish>,
}

impl LoopClosureDetector {
    /// Erstellt den Detektor für eine Startposition.
    pub fn new(initial_position: Vec2) -> Self {
        Self {
            state: LoopState::NotStarted,
            initial_position,
            start_finish: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == LoopState::Complete
    }

    /// Aktueller Start/Ziel-Punkt, falls akzeptiert.
    pub fn start_finish(&self) -> Option<&StartFinish> {
        self.start_finish.as_ref()
    }

    /// Timing-Pylonen des aktuellen Start/Ziel-Punktes.
    pub fn start_finish_sources(&self) -> &[ConeId] {
        self.start_finish
            .as_ref()
            .map(|sf| sf.sources.as_slice())
            .unwrap_or_default()
    }

    /// Verlässt die Startzone, sobald das Fahrzeug weit genug entfernt ist.
    pub fn update_start_zone(&mut self, car_position: Vec2, options: &PlannerOptions) {
        if self.state == LoopState::NotStarted
            && car_position.distance(self.initial_position) > options.start_zone_radius
        {
            log::info!(
                "Startzone verlassen bei ({:.2}, {:.2})",
                car_position.x,
                car_position.y
            );
            self.state = LoopState::Exploring;
        }
    }

    /// Versucht, den Start/Ziel-Punkt aus den Timing-Pylonen zu bestimmen
    /// und in die Linie einzufügen. Nur in der Startzone und nur solange
    /// kein gültiger Punkt existiert.
    pub fn try_start_finish(
        &mut self,
        store: &mut ConeStore,
        timing: &[ConeId],
        centre_line: &mut Vec<PathPoint>,
        options: &PlannerOptions,
    ) -> bool {
        if self.state != LoopState::NotStarted || self.start_finish.is_some() || timing.is_empty() {
            return false;
        }
        let Some(found) = locate_start_finish(store, timing, self.initial_position, options) else {
            return false;
        };

        let index = insert_by_distance(
            centre_line,
            PathPoint::synthetic(found.position),
            self.initial_position,
        );
        for &id in &found.sources {
            store.increment_paired(id);
        }
        log::info!(
            "Start/Ziel-Punkt bei ({:.2}, {:.2}) an Index {index} (Peilung {:.1}°)",
            found.position.x,
            found.position.y,
            found.bearing
        );
        self.start_finish = Some(found);
        true
    }

    /// Vergisst den Start/Ziel-Punkt, nachdem der Pruner ihn entfernt hat.
    pub fn retract_start_finish(&mut self) {
        if self.start_finish.take().is_some() {
            log::debug!("Start/Ziel-Punkt zurückgenommen");
        }
    }

    /// Prüft den Rundenschluss und hängt bei Erfolg die Startposition an.
    pub fn check_closure(
        &mut self,
        car_position: Vec2,
        centre_line: &mut Vec<PathPoint>,
        boundaries: &Boundaries,
        store: &ConeStore,
        options: &PlannerOptions,
    ) -> bool {
        if !matches!(self.state, LoopState::Exploring | LoopState::ReadyToClose) {
            return false;
        }
        let Some(last) = centre_line.last().map(|p| p.position) else {
            return false;
        };

        let line_returned = last.distance(self.initial_position) < options.close_radius;
        let car_at_first_left = boundaries
            .left
            .first()
            .is_some_and(|&id| car_position.distance(store.position(id)) < options.passed_radius);

        if !(line_returned || car_at_first_left) {
            self.state = LoopState::Exploring;
            return false;
        }
        self.state = LoopState::ReadyToClose;

        let [first, .., second_last, _] = centre_line.as_slice() else {
            return false;
        };
        let angle = heading_deg(first.position, last) - heading_deg(last, second_last.position);
        if !options.accepts_turn_angle(angle) {
            return false;
        }

        centre_line.push(PathPoint::synthetic(self.initial_position));
        self.state = LoopState::Complete;
        log::info!(
            "Runde geschlossen: {} Punkte, Schlusswinkel {angle:.1}°",
            centre_line.len()
        );
        true
    }
}
