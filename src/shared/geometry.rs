//! Reine Geometrie-Funktionen für Pfad- und Pylonen-Berechnungen.
//!
//! Layer-neutral: wird von `core` und `planner` gleichermaßen verwendet.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Kurswinkel von `from` nach `to` im globalen Frame (Grad, (-180, 180]).
pub fn heading_deg(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

/// Kurswinkel-Änderung beim Übergang a→b nach b→c (Grad).
///
/// Bewusst nicht normalisiert: ein Vorzeichenwechsel über ±180° liefert
/// Werte nahe ±360°, die über die obere Winkelschwelle abgefangen werden.
pub fn turn_angle_deg(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    heading_deg(b, c) - heading_deg(a, b)
}

/// Normalisiert einen Winkel auf (-π, π].
pub fn wrap_angle_rad(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Richtungsänderung (Radiant, normalisiert) beim Anhängen von `next` an `a`→`b`.
pub fn curvature_change_rad(a: Vec2, b: Vec2, next: Vec2) -> f32 {
    let before = b - a;
    let after = next - b;
    wrap_angle_rad(after.y.atan2(after.x) - before.y.atan2(before.x))
}

/// Arithmetisches Mittel einer Punktmenge; `None` bei leerer Menge.
pub fn centroid(points: impl IntoIterator<Item = Vec2>) -> Option<Vec2> {
    let (sum, count) = points
        .into_iter()
        .fold((Vec2::ZERO, 0usize), |(sum, n), p| (sum + p, n + 1));
    (count > 0).then(|| sum / count as f32)
}
