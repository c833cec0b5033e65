// Impact Effects - closed-form scaling laws applied to the terminal state
// of an entry: crater, blast, seismic, thermal and environmental estimates

use serde::{Deserialize, Serialize};

use crate::constants::{TNT_MEGATON_J, TNT_TON_J};
use crate::entry_simulation::{
    AsteroidParameters, EntryOutcome, FragmentationEvent, TargetLocation, TrajectoryPoint,
};

/// Standoff distances at which blast overpressure is reported (m).
pub const STANDOFF_DISTANCES_M: [f64; 6] =
    [1_000.0, 5_000.0, 10_000.0, 25_000.0, 50_000.0, 100_000.0];

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Crater dimensions for a ground impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crater {
    /// Rim-to-rim diameter (m)
    pub diameter: f64,
    /// Depth below the original surface (m)
    pub depth: f64,
    /// Excavated volume (m³)
    pub ejecta_volume: f64,
}

/// Peak blast overpressure at one standoff distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShockwavePoint {
    /// Distance from ground zero (m)
    pub distance: f64,
    /// Peak overpressure (kPa)
    pub overpressure_kpa: f64,
}

/// Thermal radiation estimates for the fireball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalEffects {
    /// Fireball radius (m)
    pub fireball_radius: f64,
    /// Fireball duration (s)
    pub duration: f64,
    /// Effective fireball surface temperature (K)
    pub peak_temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TsunamiRisk {
    None,
    Low,
    Moderate,
    High,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OzoneDamage {
    Negligible,
    Moderate,
    Severe,
}

/// Coarse environmental consequence estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalEffects {
    pub tsunami_risk: TsunamiRisk,
    /// Estimated global mean cooling from dust loading (°C)
    pub climate_cooling_c: f64,
    pub ozone_damage: OzoneDamage,
}

/// Terminal snapshot of one estimation call. Energies are in joules
/// (callers convert to tons-TNT or petajoules themselves); the TNT
/// equivalent is the one annotated mixed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub outcome: EntryOutcome,
    /// Kinetic energy of the surviving body at termination (J)
    pub kinetic_energy: f64,
    /// TNT equivalent of the released energy (megatons)
    pub tnt_megatons: f64,
    /// Energy lost to the atmosphere during entry (J)
    pub energy_deposited: f64,
    /// Speed at termination (m/s)
    pub terminal_velocity: f64,
    /// Altitude at termination; 0 for a ground impact (m)
    pub burst_altitude: f64,
    /// Surviving mass at termination (kg)
    pub final_mass: f64,
    /// Present only for a ground impact
    pub crater: Option<Crater>,
    /// Present only for a ground impact
    pub seismic_magnitude: Option<f64>,
    pub shockwave: Vec<ShockwavePoint>,
    pub thermal: ThermalEffects,
    pub environmental: EnvironmentalEffects,
    pub fragmentation_events: Vec<FragmentationEvent>,
    pub trajectory: Vec<TrajectoryPoint>,
}

impl ImpactResult {
    pub fn impact_occurred(&self) -> bool {
        self.outcome == EntryOutcome::Impact
    }
}

// =============================================================================
// SCALING LAWS
// =============================================================================

/// Crater dimensions from impact energy via the empirical TNT power law
/// D(km) = 0.1 · Mt^(1/3), depth at a 1:5 depth-to-diameter ratio.
pub fn crater_dimensions(energy: f64) -> Crater {
    let megatons = energy / TNT_MEGATON_J;
    let diameter = 100.0 * megatons.cbrt();
    let depth = diameter / 5.0;
    // paraboloid of revolution
    let ejecta_volume = std::f64::consts::PI * diameter * diameter * depth / 8.0;
    Crater {
        diameter,
        depth,
        ejecta_volume,
    }
}

/// Seismic magnitude from impact energy via the logarithmic
/// energy-to-magnitude mapping M = 0.67·log10(E) - 5.87.
pub fn seismic_magnitude(energy: f64) -> f64 {
    0.67 * energy.log10() - 5.87
}

/// Peak overpressure (kPa) at a distance via Kinney-Graham scaled-distance
/// blast scaling, Z = R / W^(1/3) with W in kg TNT.
pub fn overpressure_at(energy: f64, distance: f64) -> f64 {
    let tnt_kg = energy / (TNT_TON_J / 1000.0);
    if tnt_kg <= 0.0 || distance <= 0.0 {
        return 0.0;
    }
    let z = distance / tnt_kg.cbrt();
    let p = 1772.0 / (z * z * z) - 114.0 / (z * z) + 108.0 / z;
    p.max(0.0)
}

/// Overpressure profile at the six fixed standoff distances.
pub fn shockwave_profile(energy: f64) -> Vec<ShockwavePoint> {
    STANDOFF_DISTANCES_M
        .iter()
        .map(|&distance| ShockwavePoint {
            distance,
            overpressure_kpa: overpressure_at(energy, distance),
        })
        .collect()
}

/// Effective fireball surface temperature (K).
const FIREBALL_TEMPERATURE_K: f64 = 6000.0;

/// Fireball radius, duration and temperature from released energy.
pub fn thermal_effects(energy: f64) -> ThermalEffects {
    let megatons = energy / TNT_MEGATON_J;
    ThermalEffects {
        fireball_radius: 0.002 * energy.max(0.0).cbrt(),
        duration: megatons.max(0.0).powf(0.44),
        peak_temperature: FIREBALL_TEMPERATURE_K,
    }
}

fn downgrade(risk: TsunamiRisk) -> TsunamiRisk {
    match risk {
        TsunamiRisk::Severe => TsunamiRisk::High,
        TsunamiRisk::High => TsunamiRisk::Moderate,
        TsunamiRisk::Moderate => TsunamiRisk::Low,
        _ => TsunamiRisk::None,
    }
}

/// Tsunami risk tier. Requires a ground impact at a known location; polar
/// targets (mostly ice or land) are downgraded one tier.
pub fn tsunami_risk(
    megatons: f64,
    target: Option<&TargetLocation>,
    outcome: EntryOutcome,
) -> TsunamiRisk {
    let target = match (outcome, target) {
        (EntryOutcome::Impact, Some(t)) => t,
        _ => return TsunamiRisk::None,
    };

    let base = if megatons < 0.1 {
        TsunamiRisk::None
    } else if megatons < 10.0 {
        TsunamiRisk::Low
    } else if megatons < 1_000.0 {
        TsunamiRisk::Moderate
    } else if megatons < 100_000.0 {
        TsunamiRisk::High
    } else {
        TsunamiRisk::Severe
    };

    if target.latitude.abs() > 66.5 {
        downgrade(base)
    } else {
        base
    }
}

/// Global mean cooling estimate (°C) from stratospheric dust loading.
pub fn climate_cooling(megatons: f64) -> f64 {
    if megatons <= 1_000.0 {
        0.0
    } else {
        1.5 * (megatons.log10() - 3.0)
    }
}

/// Ozone damage tier from NOx production in the shocked air.
pub fn ozone_damage(megatons: f64) -> OzoneDamage {
    if megatons < 100.0 {
        OzoneDamage::Negligible
    } else if megatons < 10_000.0 {
        OzoneDamage::Moderate
    } else {
        OzoneDamage::Severe
    }
}

/// Assemble the full result from the terminal state of an entry.
#[allow(clippy::too_many_arguments)]
pub(crate) fn derive(
    params: &AsteroidParameters,
    outcome: EntryOutcome,
    initial_energy: f64,
    final_mass: f64,
    terminal_velocity: f64,
    terminal_altitude: f64,
    trajectory: Vec<TrajectoryPoint>,
    fragmentation_events: Vec<FragmentationEvent>,
) -> ImpactResult {
    let kinetic_energy = 0.5 * final_mass * terminal_velocity * terminal_velocity;
    let energy_deposited = (initial_energy - kinetic_energy).max(0.0);

    // Ground impacts release the surviving kinetic energy at the surface;
    // airbursts have already dumped theirs into the atmosphere
    let released = match outcome {
        EntryOutcome::Impact => kinetic_energy,
        EntryOutcome::Airburst => energy_deposited,
    };
    let tnt_megatons = released / TNT_MEGATON_J;

    let (crater, seismic) = match outcome {
        EntryOutcome::Impact => (
            Some(crater_dimensions(kinetic_energy)),
            Some(seismic_magnitude(kinetic_energy)),
        ),
        EntryOutcome::Airburst => (None, None),
    };

    ImpactResult {
        outcome,
        kinetic_energy,
        tnt_megatons,
        energy_deposited,
        terminal_velocity,
        burst_altitude: terminal_altitude,
        final_mass,
        crater,
        seismic_magnitude: seismic,
        shockwave: shockwave_profile(released),
        thermal: thermal_effects(released),
        environmental: EnvironmentalEffects {
            tsunami_risk: tsunami_risk(tnt_megatons, params.target.as_ref(), outcome),
            climate_cooling_c: climate_cooling(tnt_megatons),
            ozone_damage: ozone_damage(tnt_megatons),
        },
        fragmentation_events,
        trajectory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_crater_scaling_known_value() {
        // 1 Mt -> 100 m diameter, 20 m depth
        let crater = crater_dimensions(TNT_MEGATON_J);
        assert_relative_eq!(crater.diameter, 100.0, epsilon = 1e-9);
        assert_relative_eq!(crater.depth, 20.0, epsilon = 1e-9);
        assert!(crater.ejecta_volume > 0.0);
    }

    #[test]
    fn test_crater_grows_with_energy() {
        let small = crater_dimensions(1e15);
        let large = crater_dimensions(1e17);
        assert!(large.diameter > small.diameter);
        assert!(large.ejecta_volume > small.ejecta_volume);
    }

    #[test]
    fn test_seismic_magnitude_mapping() {
        // Meteor Crater class event, ~10 Mt
        let magnitude = seismic_magnitude(10.0 * TNT_MEGATON_J);
        assert!(magnitude > 4.0 && magnitude < 7.0);

        // magnitude grows with energy
        assert!(seismic_magnitude(1e18) > seismic_magnitude(1e16));
    }

    #[test]
    fn test_overpressure_decays_with_distance() {
        let energy = 50.0 * TNT_MEGATON_J;
        let profile = shockwave_profile(energy);
        assert_eq!(profile.len(), STANDOFF_DISTANCES_M.len());

        for pair in profile.windows(2) {
            assert!(pair[0].overpressure_kpa > pair[1].overpressure_kpa);
        }
        assert!(profile[0].overpressure_kpa > 0.0);
    }

    #[test]
    fn test_overpressure_zero_energy() {
        assert_eq!(overpressure_at(0.0, 1000.0), 0.0);
    }

    #[test]
    fn test_thermal_effects_scale() {
        let small = thermal_effects(TNT_MEGATON_J);
        let large = thermal_effects(1000.0 * TNT_MEGATON_J);
        assert!(large.fireball_radius > small.fireball_radius);
        assert!(large.duration > small.duration);
        assert_eq!(small.peak_temperature, FIREBALL_TEMPERATURE_K);
    }

    #[test]
    fn test_tsunami_requires_impact_and_location() {
        let target = TargetLocation {
            latitude: 10.0,
            longitude: -140.0,
        };

        assert_eq!(
            tsunami_risk(500.0, Some(&target), EntryOutcome::Airburst),
            TsunamiRisk::None
        );
        assert_eq!(
            tsunami_risk(500.0, None, EntryOutcome::Impact),
            TsunamiRisk::None
        );
        assert_eq!(
            tsunami_risk(500.0, Some(&target), EntryOutcome::Impact),
            TsunamiRisk::Moderate
        );
    }

    #[test]
    fn test_tsunami_polar_downgrade() {
        let polar = TargetLocation {
            latitude: 80.0,
            longitude: 0.0,
        };
        assert_eq!(
            tsunami_risk(500.0, Some(&polar), EntryOutcome::Impact),
            TsunamiRisk::Low
        );
    }

    #[test]
    fn test_climate_cooling_thresholds() {
        assert_eq!(climate_cooling(100.0), 0.0);
        assert_eq!(climate_cooling(1_000.0), 0.0);
        assert_relative_eq!(climate_cooling(10_000.0), 1.5, epsilon = 1e-9);
        // Chicxulub-class loading cools by several degrees
        let chicxulub = climate_cooling(1e8);
        assert!(chicxulub > 5.0 && chicxulub < 10.0);
    }

    #[test]
    fn test_ozone_damage_tiers() {
        assert_eq!(ozone_damage(1.0), OzoneDamage::Negligible);
        assert_eq!(ozone_damage(500.0), OzoneDamage::Moderate);
        assert_eq!(ozone_damage(1e6), OzoneDamage::Severe);
    }
}
