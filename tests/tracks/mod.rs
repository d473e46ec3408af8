//! Synthetische Strecken für die Integrationstests.
//!
//! Die Perzeption wird so nachgebildet, wie der Planer sie erwartet:
//! einmal gemeldete Pylonen behalten ihren Index, neue kommen hinten dazu.

#![allow(dead_code)]

use glam::Vec2;
use slowlap_planner::{ConeColour, ConeObservation};

/// Sichtweite der simulierten Perzeption.
pub const VIEW_RANGE: f32 = 10.0;

/// Gerader Korridor entlang +x: Paare bei x = spacing, 2·spacing, ...
pub fn corridor(pairs: usize, spacing: f32, half_width: f32) -> Vec<ConeObservation> {
    (1..=pairs)
        .flat_map(|i| {
            let x = spacing * i as f32;
            [
                ConeObservation::new(x, half_width, ConeColour::Left),
                ConeObservation::new(x, -half_width, ConeColour::Right),
            ]
        })
        .collect()
}

/// Sichtbarer Präfix des Korridors für eine Fahrzeugposition.
pub fn corridor_view(cones: &[ConeObservation], car: Vec2) -> Vec<ConeObservation> {
    cones
        .iter()
        .take_while(|c| c.position.x <= car.x + VIEW_RANGE)
        .copied()
        .collect()
}

/// Kreisrunde Strecke, gegen den Uhrzeigersinn, Start im Ursprung Richtung +x.
pub struct RingTrack {
    cones: Vec<ConeObservation>,
    seen: Vec<usize>,
}

impl RingTrack {
    pub const RADIUS: f32 = 20.0;
    pub const HALF_WIDTH: f32 = 1.5;

    pub fn new() -> Self {
        let circumference = std::f32::consts::TAU * Self::RADIUS;
        let gates = (circumference / 3.0) as usize;
        let cones = (0..gates)
            .flat_map(|k| {
                let theta = std::f32::consts::TAU * k as f32 / gates as f32;
                [
                    ConeObservation {
                        position: Self::on_ring(Self::RADIUS - Self::HALF_WIDTH, theta),
                        colour: ConeColour::Left,
                    },
                    ConeObservation {
                        position: Self::on_ring(Self::RADIUS + Self::HALF_WIDTH, theta),
                        colour: ConeColour::Right,
                    },
                ]
            })
            .collect();
        Self {
            cones,
            seen: Vec::new(),
        }
    }

    fn on_ring(radius: f32, theta: f32) -> Vec2 {
        Vec2::new(radius * theta.sin(), Self::RADIUS - radius * theta.cos())
    }

    /// Fahrzeugposition nach `step` Metern Fahrt auf der Mittellinie.
    pub fn car_position(step: usize) -> Vec2 {
        Self::on_ring(Self::RADIUS, step as f32 / Self::RADIUS)
    }

    /// Fährt einen Meter weiter und liefert Beobachtungen plus Fahrzeugposition.
    pub fn observe(&mut self, step: usize) -> (Vec<ConeObservation>, Vec2) {
        let theta = step as f32 / Self::RADIUS;
        let car = Self::car_position(step);
        let heading = Vec2::new(theta.cos(), theta.sin());

        for (index, cone) in self.cones.iter().enumerate() {
            if self.seen.contains(&index) {
                continue;
            }
            let offset = cone.position - car;
            if offset.length() < VIEW_RANGE && offset.dot(heading) > -1.0 {
                self.seen.push(index);
            }
        }

        let observations = self.seen.iter().map(|&i| self.cones[i]).collect();
        (observations, car)
    }
}
