//! Zentrale Konfiguration für den Pfadplaner.
//!
//! `PlannerOptions` enthält alle pro Session festen Tuning-Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

// ── Strecke ─────────────────────────────────────────────────────────

/// Nominale Streckenbreite zwischen linker und rechter Pylone (Meter).
pub const TRACK_WIDTH: f32 = 3.0;
/// Fahrzeug-Abstand, ab dem eine Pylone als passiert gilt.
pub const PASSED_RADIUS: f32 = 2.0;

// ── Mittellinie ─────────────────────────────────────────────────────

/// Minimaler Abstand zum letzten Pfadpunkt (exklusiv).
pub const MIN_POINT_DIST: f32 = 1.0;
/// Maximaler Abstand zum letzten Pfadpunkt (exklusiv).
pub const MAX_POINT_DIST: f32 = 8.0;
/// Untere Winkelschwelle (Grad): darunter gilt ein Punkt als fast gerade.
pub const MAX_PATH_ANGLE_LOW: f32 = 45.0;
/// Obere Winkelschwelle (Grad): darüber gilt ein Punkt als Umkehr bzw. Überlauf über ±180°.
pub const MAX_PATH_ANGLE_HIGH: f32 = 315.0;

// ── Rundenschluss ───────────────────────────────────────────────────

/// Distanz zur Startposition, ab der die Startzone verlassen ist.
pub const START_ZONE_RADIUS: f32 = 15.0;
/// Distanz letzter Pfadpunkt → Startposition für den Rundenschluss.
pub const CLOSE_RADIUS: f32 = 5.0;

// ── Feste Algorithmus-Konstanten ────────────────────────────────────

/// Bootstrap-Schwelle: Abstand zur Gegenseite in Vielfachen der Streckenbreite.
pub const BOOTSTRAP_OPPOSITE_FACTOR: f32 = 1.25;
/// Untere Grenze des Pylonen-Paarabstands in Vielfachen der Streckenbreite.
pub const PAIR_DIST_MIN_FACTOR: f32 = 0.5;
/// Obere Grenze des Pylonen-Paarabstands in Vielfachen der Streckenbreite.
pub const PAIR_DIST_MAX_FACTOR: f32 = 1.5;
/// Kandidaten näher als dieser Anteil der Streckenbreite gelten als Duplikat.
pub const MERGE_FACTOR: f32 = 0.1;
/// Abbruch der Gegenseiten-Suche nach so vielen Pylonen ohne Verbesserung.
pub const OPPOSITE_SCAN_PATIENCE: usize = 10;
/// Pylonen mit so vielen Paarungen werden nach dem Passieren nicht mehr verwendet.
pub const MAX_PAIRINGS: u32 = 3;
/// Maximal akzeptierte neue Punkte pro Seite und Zyklus.
pub const MAX_NEW_POINTS_PER_SIDE: usize = 2;
/// Anzahl der letzten Pfadpunkte, deren Pylonen visualisiert werden.
pub const VISUALIZED_POINTS: usize = 10;
/// Zyklen mit anstehenden Ablehnungen, nach denen der Puffer geleert wird.
pub const REJECT_BUFFER_TICKS: u32 = 5;
/// Maximaler Kurswinkel Startposition → Start/Ziel-Mittelpunkt (Grad).
pub const TIMING_BEARING_LIMIT: f32 = 20.0;
/// Lookahead hinter dem nächstgelegenen Pfadpunkt.
pub const LOOKAHEAD_POINTS: usize = 2;

/// Alle pro Session festen Planer-Optionen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerOptions {
    // ── Strecke ─────────────────────────────────────────────────
    /// Nominale Streckenbreite
    pub track_width: f32,
    /// Radius, in dem eine Pylone als passiert markiert wird
    pub passed_radius: f32,

    // ── Mittellinie ─────────────────────────────────────────────
    /// Minimaler Punktabstand
    pub min_point_dist: f32,
    /// Maximaler Punktabstand
    pub max_point_dist: f32,
    /// Untere Winkelschwelle (Grad)
    pub max_path_angle_low: f32,
    /// Obere Winkelschwelle (Grad)
    pub max_path_angle_high: f32,

    // ── Rundenschluss ───────────────────────────────────────────
    /// Radius der Startzone
    #[serde(default = "default_start_zone_radius")]
    pub start_zone_radius: f32,
    /// Radius für den Rundenschluss
    #[serde(default = "default_close_radius")]
    pub close_radius: f32,

    // ── Diagnose ────────────────────────────────────────────────
    /// Ausführliche Diagnose-Logs pro Zyklus
    #[serde(default)]
    pub debug: bool,

    // ── Geschwindigkeit (reserviert, ohne Wirkung) ──────────────
    /// Konstante Sollgeschwindigkeit statt Profil
    #[serde(default)]
    pub const_velocity: bool,
    /// Maximale Geschwindigkeit
    #[serde(default)]
    pub v_max: f32,
    /// Konstante Geschwindigkeit
    #[serde(default)]
    pub v_const: f32,
    /// Maximale Reibungsverstärkung
    #[serde(default)]
    pub max_f_gain: f32,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            track_width: TRACK_WIDTH,
            passed_radius: PASSED_RADIUS,

            min_point_dist: MIN_POINT_DIST,
            max_point_dist: MAX_POINT_DIST,
            max_path_angle_low: MAX_PATH_ANGLE_LOW,
            max_path_angle_high: MAX_PATH_ANGLE_HIGH,

            start_zone_radius: START_ZONE_RADIUS,
            close_radius: CLOSE_RADIUS,

            debug: false,

            const_velocity: false,
            v_max: 0.0,
            v_const: 0.0,
            max_f_gain: 0.0,
        }
    }
}

/// Serde-Default für `start_zone_radius` (ältere TOML-Dateien).
fn default_start_zone_radius() -> f32 {
    START_ZONE_RADIUS
}

/// Serde-Default für `close_radius`.
fn default_close_radius() -> f32 {
    CLOSE_RADIUS
}

impl PlannerOptions {
    /// Prüft die Optionen auf innere Konsistenz.
    pub fn validate(&self) -> Result<(), PlannerError> {
        let positive = [
            ("track_width", self.track_width),
            ("passed_radius", self.passed_radius),
            ("min_point_dist", self.min_point_dist),
            ("max_point_dist", self.max_point_dist),
            ("start_zone_radius", self.start_zone_radius),
            ("close_radius", self.close_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlannerError::InvalidOptions(format!(
                    "{name} muss positiv sein (ist {value})"
                )));
            }
        }
        if self.min_point_dist >= self.max_point_dist {
            return Err(PlannerError::InvalidOptions(format!(
                "min_point_dist ({}) muss kleiner als max_point_dist ({}) sein",
                self.min_point_dist, self.max_point_dist
            )));
        }
        if !(self.max_path_angle_low < self.max_path_angle_high) {
            return Err(PlannerError::InvalidOptions(format!(
                "max_path_angle_low ({}) muss kleiner als max_path_angle_high ({}) sein",
                self.max_path_angle_low, self.max_path_angle_high
            )));
        }
        Ok(())
    }

    /// Winkel-Bedingung für Pfadpunkte und Rundenschluss: fast gerade ODER fast Umkehr.
    pub fn accepts_turn_angle(&self, angle_deg: f32) -> bool {
        let magnitude = angle_deg.abs();
        magnitude < self.max_path_angle_low || magnitude > self.max_path_angle_high
    }

    /// Zulässiger Bereich für den Abstand eines Pylonen-Paares.
    pub fn pair_distance_range(&self) -> std::ops::RangeInclusive<f32> {
        (self.track_width * PAIR_DIST_MIN_FACTOR)..=(self.track_width * PAIR_DIST_MAX_FACTOR)
    }

    /// Radius, unter dem zwei Kandidaten zusammengelegt werden.
    pub fn merge_radius(&self) -> f32 {
        self.track_width * MERGE_FACTOR
    }

    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }
}
