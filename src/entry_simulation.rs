// Atmospheric Entry Simulation - fixed-timestep 1-D entry with drag,
// ablation and fragmentation of the descending body

use std::f64::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::atmosphere;
use crate::constants::{EARTH_RADIUS, SURFACE_GRAVITY};
use crate::error::SimulationError;
use crate::impact_effects::{self, ImpactResult};
use crate::materials::Composition;

// =============================================================================
// PARAMETERS
// =============================================================================

/// Ground coordinates for an impact scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Immutable input to a single estimation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidParameters {
    /// Pre-entry diameter (m)
    pub diameter_m: f64,
    /// Entry velocity (km/s)
    pub velocity_km_s: f64,
    /// Entry angle from horizontal (degrees, 0-90)
    pub entry_angle_deg: f64,
    pub composition: Composition,
    pub target: Option<TargetLocation>,
}

impl AsteroidParameters {
    pub fn new(
        diameter_m: f64,
        velocity_km_s: f64,
        entry_angle_deg: f64,
        composition: Composition,
    ) -> Self {
        Self {
            diameter_m,
            velocity_km_s,
            entry_angle_deg,
            composition,
            target: None,
        }
    }

    pub fn with_target(mut self, latitude: f64, longitude: f64) -> Self {
        self.target = Some(TargetLocation {
            latitude,
            longitude,
        });
        self
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.diameter_m.is_finite() || self.diameter_m <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "diameter must be positive, got {}",
                self.diameter_m
            )));
        }
        if !self.velocity_km_s.is_finite() || self.velocity_km_s <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "velocity must be positive, got {}",
                self.velocity_km_s
            )));
        }
        if !self.entry_angle_deg.is_finite()
            || self.entry_angle_deg < 0.0
            || self.entry_angle_deg > 90.0
        {
            return Err(SimulationError::InvalidParameter(format!(
                "entry angle must be within [0, 90] degrees, got {}",
                self.entry_angle_deg
            )));
        }
        if let Some(target) = &self.target {
            if target.latitude.abs() > 90.0 || target.longitude.abs() > 180.0 {
                return Err(SimulationError::InvalidParameter(format!(
                    "target location out of range: ({}, {})",
                    target.latitude, target.longitude
                )));
            }
        }
        Ok(())
    }
}

/// Tunables for the entry integration. Constructor-injected so callers own
/// their configuration; no module-level state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Integration step (s)
    pub time_step: f64,
    /// Hard safety bound on steps, not a physical termination condition
    pub max_steps: usize,
    /// Upper bound on pieces produced by one break-up event
    pub max_fragments: u32,
    /// Altitude at which the simulation starts (m)
    pub entry_altitude: f64,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            max_steps: 10_000,
            max_fragments: 10,
            entry_altitude: 100_000.0,
        }
    }
}

// =============================================================================
// TRAJECTORY STATE
// =============================================================================

/// One sample of the descending body, recorded per integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Seconds since entry
    pub time: f64,
    /// m
    pub altitude: f64,
    /// m/s
    pub velocity: f64,
    /// kg
    pub mass: f64,
    /// m
    pub diameter: f64,
    /// Ram pressure (Pa)
    pub dynamic_pressure: f64,
    /// Estimated stagnation temperature (K)
    pub temperature: f64,
}

/// Terminal state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOutcome {
    /// The body (or its largest fragment) reached the ground
    Impact,
    /// The body ablated or broke up to negligible mass in flight
    Airburst,
}

/// One break-up event along the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentationEvent {
    pub time: f64,
    pub altitude: f64,
    pub dynamic_pressure: f64,
    pub fragment_count: u32,
}

// Mass fraction of the original body below which flight terminates as an
// airburst, and above which break-up is still considered
const AIRBURST_MASS_FRACTION: f64 = 0.01;
const FRAGMENTATION_MASS_FRACTION: f64 = 0.1;

// Radiative heating of the surface is suppressed by the shock layer as the
// body grows; the effective heat-transfer fraction scales as 1/(1 + d/d0)
const ABLATION_SHIELDING_DIAMETER: f64 = 0.5;

// Stagnation-temperature estimate is capped; radiative losses dominate
// beyond this in reality
const STAGNATION_TEMPERATURE_CAP: f64 = 12_000.0;

fn sphere_mass(diameter: f64, density: f64) -> f64 {
    let radius = diameter / 2.0;
    (4.0 / 3.0) * PI * radius.powi(3) * density
}

fn sphere_diameter(mass: f64, density: f64) -> f64 {
    (6.0 * mass / (PI * density)).cbrt()
}

fn gravity_at(altitude: f64) -> f64 {
    let ratio = EARTH_RADIUS / (EARTH_RADIUS + altitude);
    SURFACE_GRAVITY * ratio * ratio
}

fn stagnation_temperature(air_temperature: f64, mach: f64) -> f64 {
    (air_temperature * (1.0 + 0.2 * mach * mach)).min(STAGNATION_TEMPERATURE_CAP)
}

/// Split a body into `2..=max_fragments` pieces with randomized mass
/// fractions (0.1 + 0.8·r each, normalized so the fragments sum to the
/// pre-breakup mass) and return the largest piece.
fn fragment<R: Rng>(mass: f64, max_fragments: u32, rng: &mut R) -> (f64, u32) {
    let count = rng.gen_range(2..=max_fragments.max(2));
    let weights: Vec<f64> = (0..count).map(|_| 0.1 + 0.8 * rng.gen::<f64>()).collect();
    let total: f64 = weights.iter().sum();
    let largest = weights.iter().fold(f64::MIN, |a, &w| a.max(w));
    (mass * largest / total, count)
}

// =============================================================================
// SIMULATOR
// =============================================================================

/// Atmospheric entry and impact estimator.
///
/// Each call owns its trajectory buffer and touches no shared state beyond
/// the read-only material and atmosphere tables, so concurrent calls from
/// parallel threads are safe.
#[derive(Debug, Clone, Default)]
pub struct EntrySimulator {
    config: EntryConfig,
}

impl EntrySimulator {
    pub fn new(config: EntryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    /// Estimate the outcome of an entry using a non-seeded random source for
    /// fragmentation. Two calls with identical inputs may fragment
    /// differently; use [`estimate_impact_seeded`](Self::estimate_impact_seeded)
    /// for replayable trajectories.
    pub fn estimate_impact(
        &self,
        params: &AsteroidParameters,
    ) -> Result<ImpactResult, SimulationError> {
        self.simulate(params, &mut rand::thread_rng())
    }

    /// Deterministic variant: identical inputs and seed yield an identical
    /// `ImpactResult`.
    pub fn estimate_impact_seeded(
        &self,
        params: &AsteroidParameters,
        seed: u64,
    ) -> Result<ImpactResult, SimulationError> {
        self.simulate(params, &mut SmallRng::seed_from_u64(seed))
    }

    fn simulate<R: Rng>(
        &self,
        params: &AsteroidParameters,
        rng: &mut R,
    ) -> Result<ImpactResult, SimulationError> {
        params.validate()?;

        let material = params.composition.properties();
        let dt = self.config.time_step;
        let sin_angle = params.entry_angle_deg.to_radians().sin();

        let mut velocity = params.velocity_km_s * 1000.0;
        let mut altitude = self.config.entry_altitude;
        let mut diameter = params.diameter_m;
        let initial_mass = sphere_mass(diameter, material.density);
        let mut mass = initial_mass;
        let initial_energy = 0.5 * initial_mass * velocity * velocity;
        let mut time = 0.0;

        let mut trajectory = Vec::new();
        let mut fragmentation_events = Vec::new();
        let mut outcome = EntryOutcome::Airburst;

        for _ in 0..self.config.max_steps {
            let (air_density, air_temperature) = atmosphere::conditions_at(altitude);
            let mach = atmosphere::mach_number(velocity, air_temperature);
            let dynamic_pressure = 0.5 * air_density * velocity * velocity;

            trajectory.push(TrajectoryPoint {
                time,
                altitude,
                velocity,
                mass,
                diameter,
                dynamic_pressure,
                temperature: stagnation_temperature(air_temperature, mach),
            });

            // Break-up: ram pressure above material strength while the body
            // is still substantially intact; the largest fragment carries on
            if dynamic_pressure > material.fragmentation_threshold
                && mass > FRAGMENTATION_MASS_FRACTION * initial_mass
            {
                let (largest, count) = fragment(mass, self.config.max_fragments, rng);
                fragmentation_events.push(FragmentationEvent {
                    time,
                    altitude,
                    dynamic_pressure,
                    fragment_count: count,
                });
                mass = largest;
                diameter = sphere_diameter(mass, material.density);
            }

            let area = PI * (diameter / 2.0) * (diameter / 2.0);
            let drag_coefficient = atmosphere::drag_coefficient(mach);

            // Deceleration from drag, acceleration from the along-path
            // component of gravity
            let acceleration = -(dynamic_pressure * drag_coefficient * area) / mass
                + gravity_at(altitude) * sin_angle;

            // Ablative mass loss from a heat-flux approximation; the heated
            // surface sheds mass once raised to the melting point
            let shielding = 1.0 + diameter / ABLATION_SHIELDING_DIAMETER;
            let heat_flux = 0.5 * (material.ablation_coefficient / shielding)
                * air_density
                * velocity.powi(3);
            let heating_delta_t = (material.melting_point - air_temperature).max(50.0);
            let mass_loss_rate = heat_flux * area / (material.heat_capacity * heating_delta_t);

            mass = (mass - mass_loss_rate * dt).max(0.0);
            velocity = (velocity + acceleration * dt).max(0.0);
            altitude -= velocity * sin_angle * dt;
            time += dt;

            if altitude <= 0.0 {
                altitude = 0.0;
                outcome = EntryOutcome::Impact;
                break;
            }
            if mass < AIRBURST_MASS_FRACTION * initial_mass {
                outcome = EntryOutcome::Airburst;
                break;
            }

            diameter = sphere_diameter(mass, material.density);
        }

        Ok(impact_effects::derive(
            params,
            outcome,
            initial_energy,
            mass,
            velocity,
            altitude,
            trajectory,
            fragmentation_events,
        ))
    }
}

/// Convenience wrapper using the default configuration and a non-seeded
/// random source.
pub fn estimate_impact(params: &AsteroidParameters) -> Result<ImpactResult, SimulationError> {
    EntrySimulator::default().estimate_impact(params)
}
