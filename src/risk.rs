// Impact Risk Assessment - tiered size/proximity/velocity scoring for NEOs

use serde::{Deserialize, Serialize};

use crate::api_client::ProcessedAsteroid;
use crate::constants::LUNAR_DISTANCE_KM;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    fn score(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Extreme => 4,
        }
    }
}

/// Coarse damage class implied by the combined risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageClass {
    Minimal,
    LocalDamage,
    RegionalDestruction,
    GlobalCatastrophe,
}

/// Per-factor and combined risk for one asteroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub size_risk: RiskLevel,
    pub proximity_risk: RiskLevel,
    pub velocity_risk: RiskLevel,
    pub overall_risk: RiskLevel,
    pub potential_damage: DamageClass,
}

fn size_risk(diameter_km: f64) -> RiskLevel {
    if diameter_km > 1.0 {
        RiskLevel::Extreme
    } else if diameter_km > 0.5 {
        RiskLevel::High
    } else if diameter_km > 0.1 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn proximity_risk(miss_distance_lunar: f64) -> RiskLevel {
    if miss_distance_lunar < 1.0 {
        RiskLevel::Extreme
    } else if miss_distance_lunar < 5.0 {
        RiskLevel::High
    } else if miss_distance_lunar < 20.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn velocity_risk(velocity_km_s: f64) -> RiskLevel {
    if velocity_km_s > 30.0 {
        RiskLevel::High
    } else if velocity_km_s > 20.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Assess impact risk for an asteroid from its diameter and closest recorded
/// Earth approach. Asteroids with no close-approach record score low on
/// proximity and velocity.
pub fn assess(asteroid: &ProcessedAsteroid) -> RiskAssessment {
    let size = size_risk(asteroid.estimated_diameter_m / 1000.0);

    let closest = asteroid
        .close_approaches
        .iter()
        .filter(|ca| ca.miss_distance_km > 0.0)
        .min_by(|a, b| a.miss_distance_km.total_cmp(&b.miss_distance_km));

    let (proximity, velocity) = match closest {
        Some(approach) => (
            proximity_risk(approach.miss_distance_km / LUNAR_DISTANCE_KM),
            velocity_risk(approach.velocity_km_s),
        ),
        None => (RiskLevel::Low, RiskLevel::Low),
    };

    let total = size.score() + proximity.score() + velocity.score();

    let (overall, damage) = if total >= 10 {
        (RiskLevel::Extreme, DamageClass::GlobalCatastrophe)
    } else if total >= 8 {
        (RiskLevel::High, DamageClass::RegionalDestruction)
    } else if total >= 6 {
        (RiskLevel::Medium, DamageClass::LocalDamage)
    } else {
        (RiskLevel::Low, DamageClass::Minimal)
    };

    RiskAssessment {
        size_risk: size,
        proximity_risk: proximity,
        velocity_risk: velocity,
        overall_risk: overall,
        potential_damage: damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ProcessedCloseApproach;
    use crate::orbital_mechanics::OrbitalElements;

    fn asteroid(diameter_m: f64, approaches: Vec<ProcessedCloseApproach>) -> ProcessedAsteroid {
        ProcessedAsteroid {
            id: "2000433".to_string(),
            name: "433 Eros".to_string(),
            orbital_elements: OrbitalElements {
                semi_major_axis: 1.458,
                eccentricity: 0.2227,
                inclination: 10.83_f64.to_radians(),
                longitude_ascending_node: 304.3_f64.to_radians(),
                argument_perihelion: 178.9_f64.to_radians(),
                mean_anomaly: 0.0,
                epoch: 2461000.5,
            },
            estimated_diameter_m: diameter_m,
            estimated_mass_kg: 1.0e15,
            is_potentially_hazardous: false,
            absolute_magnitude: 10.4,
            orbit_class: "AMO".to_string(),
            close_approaches: approaches,
        }
    }

    fn approach(miss_km: f64, velocity: f64) -> ProcessedCloseApproach {
        ProcessedCloseApproach {
            date: "2029-04-13".to_string(),
            miss_distance_km: miss_km,
            velocity_km_s: velocity,
            orbiting_body: "Earth".to_string(),
        }
    }

    #[test]
    fn test_large_close_fast_is_extreme() {
        let threat = asteroid(1500.0, vec![approach(200_000.0, 35.0)]);
        let assessment = assess(&threat);
        assert_eq!(assessment.size_risk, RiskLevel::Extreme);
        assert_eq!(assessment.proximity_risk, RiskLevel::Extreme);
        assert_eq!(assessment.velocity_risk, RiskLevel::High);
        assert_eq!(assessment.overall_risk, RiskLevel::Extreme);
        assert_eq!(assessment.potential_damage, DamageClass::GlobalCatastrophe);
    }

    #[test]
    fn test_small_distant_is_low() {
        let rock = asteroid(40.0, vec![approach(30_000_000.0, 12.0)]);
        let assessment = assess(&rock);
        assert_eq!(assessment.overall_risk, RiskLevel::Low);
        assert_eq!(assessment.potential_damage, DamageClass::Minimal);
    }

    #[test]
    fn test_no_approach_data_scores_conservatively() {
        let unknown = asteroid(700.0, vec![]);
        let assessment = assess(&unknown);
        assert_eq!(assessment.size_risk, RiskLevel::High);
        assert_eq!(assessment.proximity_risk, RiskLevel::Low);
        assert_eq!(assessment.overall_risk, RiskLevel::Low);
    }

    #[test]
    fn test_closest_approach_drives_proximity() {
        // the nearer of two recorded approaches dominates
        let body = asteroid(
            200.0,
            vec![approach(10_000_000.0, 15.0), approach(300_000.0, 25.0)],
        );
        let assessment = assess(&body);
        assert_eq!(assessment.proximity_risk, RiskLevel::Extreme);
        assert_eq!(assessment.velocity_risk, RiskLevel::Medium);
    }
}
