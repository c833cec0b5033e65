// MeteorSim - Asteroid Entry, Impact & Orbital Simulation Core
// Numerical core behind the impact-visualization frontend: Keplerian
// positions for planets and NEOs, atmospheric entry with ablation and
// fragmentation, and closed-form impact-effect scaling

pub mod api_client;
pub mod atmosphere;
pub mod constants;
pub mod entry_simulation;
pub mod error;
pub mod impact_effects;
pub mod materials;
pub mod orbital_mechanics;
pub mod risk;

pub use api_client::{ApiConfig, NeoCache, NeoWsClient, ProcessedAsteroid};
pub use entry_simulation::{
    estimate_impact, AsteroidParameters, EntryConfig, EntryOutcome, EntrySimulator,
    TrajectoryPoint,
};
pub use error::{FetchError, SimulationError};
pub use impact_effects::ImpactResult;
pub use materials::{Composition, MaterialProperties};
pub use orbital_mechanics::{
    heliocentric_position, HeliocentricPosition, OrbitalElements, Planet,
};
pub use risk::{assess, RiskAssessment, RiskLevel};
