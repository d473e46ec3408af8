//! Ausgabe eines Planungszyklus.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::centre_line::RejectedPoints;
use crate::core::{Boundaries, Cone, ConeId, ConeStore, PathPoint};
use crate::shared::options::VISUALIZED_POINTS;

/// Pylonen-Markierung für die Visualisierung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualMarker {
    pub position: Vec2,
    /// `true` für Pylonen angenommener Punkte, `false` für Ablehnungen
    pub accepted: bool,
}

/// Ergebnis eines `update`-Aufrufs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerOutput {
    /// Mittellinie vom Startpunkt aus
    pub centre_line: Vec<PathPoint>,
    /// Linke Randfolge (Kopien)
    pub left: Vec<Cone>,
    /// Rechte Randfolge (Kopien)
    pub right: Vec<Cone>,
    /// Pylonen der letzten Linienpunkte und der Ablehnungen
    pub markers: Vec<VisualMarker>,
    /// Runde geschlossen
    pub complete: bool,
}

impl PlannerOutput {
    /// Stellt die Ausgabe aus dem aktuellen Planerzustand zusammen.
    pub fn collect(
        store: &ConeStore,
        boundaries: &Boundaries,
        centre_line: &[PathPoint],
        rejected: &RejectedPoints,
        complete: bool,
    ) -> Self {
        let copy_side = |ids: &[ConeId]| -> Vec<Cone> {
            ids.iter().map(|&id| store.cone(id).clone()).collect()
        };

        let recent = &centre_line[centre_line.len().saturating_sub(VISUALIZED_POINTS)..];
        let accepted = recent.iter().map(|p| (p, true));
        let declined = rejected.points().iter().map(|p| (p, false));

        let markers = accepted
            .chain(declined)
            .filter_map(|(point, accepted)| point.cones.map(|pair| (pair, accepted)))
            .flat_map(|(pair, accepted)| {
                pair.ids().into_iter().map(move |id| VisualMarker {
                    position: store.position(id),
                    accepted,
                })
            })
            .collect();

        Self {
            centre_line: centre_line.to_vec(),
            left: copy_side(&boundaries.left),
            right: copy_side(&boundaries.right),
            markers,
            complete,
        }
    }

    /// Anzahl der Linienpunkte aus Pylonen-Paaren.
    pub fn paired_points(&self) -> usize {
        self.centre_line.iter().filter(|p| p.has_cones()).count()
    }
}
