// NASA NeoWs API Client - fetches Near-Earth Object data
// Fetch failures surface as typed errors; substituting demo data is the
// caller's decision, never the client's

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::orbital_mechanics::OrbitalElements;

// =============================================================================
// CONFIGURATION
// =============================================================================

const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";

/// Explicit client configuration; passed into constructors instead of being
/// read from module-level state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read configuration from `NASA_NEOWS_BASE_URL` / `NASA_API_KEY`,
    /// loading a `.env` file when present. Falls back to NASA's public
    /// DEMO_KEY.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            base_url: std::env::var("NASA_NEOWS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("NASA_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string()),
        }
    }
}

// =============================================================================
// API RESPONSE TYPES (slim subset consumed by the simulation)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoFeedResponse {
    pub element_count: Option<i32>,
    pub near_earth_objects: Option<HashMap<String, Vec<NeoObject>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoBrowseResponse {
    pub page: Option<PageInfo>,
    pub near_earth_objects: Vec<NeoObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub size: i32,
    pub total_elements: i32,
    pub total_pages: i32,
    pub number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoObject {
    pub id: String,
    pub name: String,
    pub absolute_magnitude_h: Option<f64>,
    pub estimated_diameter: Option<EstimatedDiameter>,
    pub is_potentially_hazardous_asteroid: Option<bool>,
    pub close_approach_data: Option<Vec<CloseApproachData>>,
    pub orbital_data: Option<OrbitalData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    pub meters: Option<DiameterRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseApproachData {
    pub close_approach_date: Option<String>,
    pub relative_velocity: Option<RelativeVelocity>,
    pub miss_distance: Option<MissDistance>,
    pub orbiting_body: Option<String>,
}

// NeoWs serves numeric fields as strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeVelocity {
    pub kilometers_per_second: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissDistance {
    pub kilometers: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalData {
    pub epoch_osculation: Option<String>,
    pub eccentricity: Option<String>,
    pub semi_major_axis: Option<String>,
    pub inclination: Option<String>,
    pub ascending_node_longitude: Option<String>,
    pub perihelion_argument: Option<String>,
    pub mean_anomaly: Option<String>,
    pub orbit_class: Option<OrbitClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitClass {
    pub orbit_class_type: Option<String>,
}

// =============================================================================
// PROCESSED ASTEROID DATA
// =============================================================================

/// NeoWs object normalized into the crate's internal shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedAsteroid {
    pub id: String,
    pub name: String,
    pub orbital_elements: OrbitalElements,
    pub estimated_diameter_m: f64,
    pub estimated_mass_kg: f64,
    pub is_potentially_hazardous: bool,
    pub absolute_magnitude: f64,
    pub orbit_class: String,
    pub close_approaches: Vec<ProcessedCloseApproach>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCloseApproach {
    pub date: String,
    pub miss_distance_km: f64,
    pub velocity_km_s: f64,
    pub orbiting_body: String,
}

/// Bulk density estimate (kg/m³) from the spectral/orbit class.
/// References: Carry (2012), DeMeo & Carry (2013)
pub fn estimate_density(orbit_class: &str) -> f64 {
    match orbit_class.to_uppercase().as_str() {
        // NEA orbital classes carry no spectral information
        "AMO" | "APO" | "ATE" | "IEO" => 2000.0,

        s if s.contains('C') => 1700.0, // carbonaceous
        s if s.contains('B') => 1500.0, // primitive
        s if s.contains('D') => 1200.0, // organic-rich
        s if s.contains('P') => 1300.0, // primitive
        s if s.contains('S') => 2700.0, // silicaceous
        s if s.contains('Q') => 2500.0, // ordinary chondrite
        s if s.contains('V') => 3200.0, // basaltic
        s if s.contains('M') => 4000.0, // metallic
        s if s.contains('X') => 3500.0, // metal-rich, uncertain

        _ => 2000.0, // rubble pile average
    }
}

/// Mass estimate from mean diameter and class-derived density.
pub fn estimate_mass(diameter_m: f64, orbit_class: &str) -> f64 {
    let radius = diameter_m / 2.0;
    let volume = (4.0 / 3.0) * std::f64::consts::PI * radius.powi(3);
    estimate_density(orbit_class) * volume
}

fn parse_field(value: &Option<String>) -> Option<f64> {
    value.as_ref().and_then(|s| s.parse::<f64>().ok())
}

impl NeoObject {
    /// Normalize a NeoWs object. Returns `None` when the orbital data is
    /// absent or unparseable; batch endpoints skip such objects.
    pub fn to_processed(&self) -> Option<ProcessedAsteroid> {
        let orbital_data = self.orbital_data.as_ref()?;

        let orbital_elements = OrbitalElements {
            semi_major_axis: parse_field(&orbital_data.semi_major_axis)?,
            eccentricity: parse_field(&orbital_data.eccentricity)?,
            inclination: parse_field(&orbital_data.inclination)?.to_radians(),
            longitude_ascending_node: parse_field(&orbital_data.ascending_node_longitude)?
                .to_radians(),
            argument_perihelion: parse_field(&orbital_data.perihelion_argument)?.to_radians(),
            mean_anomaly: parse_field(&orbital_data.mean_anomaly)?.to_radians(),
            epoch: parse_field(&orbital_data.epoch_osculation).unwrap_or(2460000.5),
        };

        let diameter = self
            .estimated_diameter
            .as_ref()
            .and_then(|d| d.meters.as_ref())
            .map(|m| (m.estimated_diameter_min + m.estimated_diameter_max) / 2.0)
            .unwrap_or(100.0);

        let orbit_class = orbital_data
            .orbit_class
            .as_ref()
            .and_then(|c| c.orbit_class_type.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let close_approaches = self
            .close_approach_data
            .as_ref()
            .map(|approaches| {
                approaches
                    .iter()
                    .map(|ca| ProcessedCloseApproach {
                        date: ca.close_approach_date.clone().unwrap_or_default(),
                        miss_distance_km: ca
                            .miss_distance
                            .as_ref()
                            .map(|m| parse_field(&m.kilometers).unwrap_or(0.0))
                            .unwrap_or(0.0),
                        velocity_km_s: ca
                            .relative_velocity
                            .as_ref()
                            .map(|v| parse_field(&v.kilometers_per_second).unwrap_or(0.0))
                            .unwrap_or(0.0),
                        orbiting_body: ca
                            .orbiting_body
                            .clone()
                            .unwrap_or_else(|| "Earth".to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(ProcessedAsteroid {
            id: self.id.clone(),
            name: self.name.clone(),
            orbital_elements,
            estimated_diameter_m: diameter,
            estimated_mass_kg: estimate_mass(diameter, &orbit_class),
            is_potentially_hazardous: self.is_potentially_hazardous_asteroid.unwrap_or(false),
            absolute_magnitude: self.absolute_magnitude_h.unwrap_or(0.0),
            orbit_class,
            close_approaches,
        })
    }
}

// =============================================================================
// API CLIENT
// =============================================================================

pub struct NeoWsClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl NeoWsClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("NeoWs request failed: {}", e);
            FetchError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("NeoWs returned status {} for {}", status, url);
            return Err(FetchError::Status(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// NEOs making close approaches to Earth within a date range (the feed
    /// endpoint accepts at most 7 days).
    pub async fn fetch_feed(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ProcessedAsteroid>, FetchError> {
        let url = format!(
            "{}/feed?start_date={}&end_date={}&api_key={}",
            self.config.base_url, start_date, end_date, self.config.api_key
        );

        let data: NeoFeedResponse = self.get_json(&url).await?;

        let mut asteroids = Vec::new();
        if let Some(by_date) = data.near_earth_objects {
            for neos in by_date.into_values() {
                asteroids.extend(neos.iter().filter_map(NeoObject::to_processed));
            }
        }
        log::debug!("feed returned {} usable asteroids", asteroids.len());

        Ok(asteroids)
    }

    /// Page through the full NEO catalog. Returns the page contents and the
    /// total page count.
    pub async fn browse(
        &self,
        page: i32,
        size: i32,
    ) -> Result<(Vec<ProcessedAsteroid>, i32), FetchError> {
        let url = format!(
            "{}/neo/browse?page={}&size={}&api_key={}",
            self.config.base_url, page, size, self.config.api_key
        );

        let data: NeoBrowseResponse = self.get_json(&url).await?;

        let total_pages = data.page.map(|p| p.total_pages).unwrap_or(1);
        let asteroids: Vec<ProcessedAsteroid> = data
            .near_earth_objects
            .iter()
            .filter_map(NeoObject::to_processed)
            .collect();

        Ok((asteroids, total_pages))
    }

    /// Look up a single NEO by its NeoWs id.
    pub async fn fetch_neo(&self, neo_id: &str) -> Result<ProcessedAsteroid, FetchError> {
        let url = format!(
            "{}/neo/{}?api_key={}",
            self.config.base_url, neo_id, self.config.api_key
        );

        let neo: NeoObject = self.get_json(&url).await?;
        neo.to_processed()
            .ok_or_else(|| FetchError::MissingOrbitalData(neo_id.to_string()))
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// TTL cache over processed asteroid data. Owned and shared by the caller
/// (wrap in `Arc` as needed); nothing here is process-global.
pub struct NeoCache {
    asteroids: RwLock<Vec<ProcessedAsteroid>>,
    last_refresh: RwLock<Option<Instant>>,
    ttl: Duration,
}

impl NeoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            asteroids: RwLock::new(Vec::new()),
            last_refresh: RwLock::new(None),
            ttl,
        }
    }

    pub fn get(&self) -> Vec<ProcessedAsteroid> {
        self.asteroids.read().clone()
    }

    pub fn set(&self, asteroids: Vec<ProcessedAsteroid>) {
        *self.asteroids.write() = asteroids;
        *self.last_refresh.write() = Some(Instant::now());
    }

    pub fn is_valid(&self) -> bool {
        match *self.last_refresh.read() {
            Some(last) => last.elapsed() < self.ttl,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.asteroids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.read().is_empty()
    }
}

impl Default for NeoCache {
    fn default() -> Self {
        // matches NeoWs's own hourly refresh cadence
        Self::new(Duration::from_secs(3600))
    }
}

// =============================================================================
// DEMO DATA
// =============================================================================

/// Built-in stand-in asteroids for offline use. The client never falls back
/// to these on its own; callers substitute them deliberately.
pub fn demo_asteroids() -> Vec<ProcessedAsteroid> {
    vec![
        ProcessedAsteroid {
            id: "2099942".to_string(),
            name: "99942 Apophis".to_string(),
            orbital_elements: OrbitalElements {
                semi_major_axis: 0.9224,
                eccentricity: 0.1914,
                inclination: 3.34_f64.to_radians(),
                longitude_ascending_node: 203.96_f64.to_radians(),
                argument_perihelion: 126.68_f64.to_radians(),
                mean_anomaly: 245.8_f64.to_radians(),
                epoch: 2460800.5,
            },
            estimated_diameter_m: 370.0,
            estimated_mass_kg: estimate_mass(370.0, "ATE"),
            is_potentially_hazardous: true,
            absolute_magnitude: 19.7,
            orbit_class: "ATE".to_string(),
            close_approaches: vec![ProcessedCloseApproach {
                date: "2029-04-13".to_string(),
                miss_distance_km: 38_012.0,
                velocity_km_s: 7.42,
                orbiting_body: "Earth".to_string(),
            }],
        },
        ProcessedAsteroid {
            id: "2101955".to_string(),
            name: "101955 Bennu".to_string(),
            orbital_elements: OrbitalElements {
                semi_major_axis: 1.1264,
                eccentricity: 0.2037,
                inclination: 6.03_f64.to_radians(),
                longitude_ascending_node: 2.06_f64.to_radians(),
                argument_perihelion: 66.22_f64.to_radians(),
                mean_anomaly: 101.7_f64.to_radians(),
                epoch: 2460800.5,
            },
            estimated_diameter_m: 490.0,
            estimated_mass_kg: estimate_mass(490.0, "APO"),
            is_potentially_hazardous: true,
            absolute_magnitude: 20.19,
            orbit_class: "APO".to_string(),
            close_approaches: vec![ProcessedCloseApproach {
                date: "2135-09-25".to_string(),
                miss_distance_km: 334_000.0,
                velocity_km_s: 5.99,
                orbiting_body: "Earth".to_string(),
            }],
        },
        ProcessedAsteroid {
            id: "2025143".to_string(),
            name: "25143 Itokawa".to_string(),
            orbital_elements: OrbitalElements {
                semi_major_axis: 1.3241,
                eccentricity: 0.2803,
                inclination: 1.62_f64.to_radians(),
                longitude_ascending_node: 69.08_f64.to_radians(),
                argument_perihelion: 162.82_f64.to_radians(),
                mean_anomaly: 35.5_f64.to_radians(),
                epoch: 2460800.5,
            },
            estimated_diameter_m: 330.0,
            estimated_mass_kg: estimate_mass(330.0, "APO"),
            is_potentially_hazardous: false,
            absolute_magnitude: 19.26,
            orbit_class: "APO".to_string(),
            close_approaches: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_NEO_JSON: &str = r#"{
        "id": "3542519",
        "name": "(2010 PK9)",
        "absolute_magnitude_h": 21.87,
        "estimated_diameter": {
            "meters": {
                "estimated_diameter_min": 100.6,
                "estimated_diameter_max": 225.0
            }
        },
        "is_potentially_hazardous_asteroid": true,
        "close_approach_data": [
            {
                "close_approach_date": "2025-08-07",
                "relative_velocity": { "kilometers_per_second": "13.49" },
                "miss_distance": { "kilometers": "4625434.5" },
                "orbiting_body": "Earth"
            }
        ],
        "orbital_data": {
            "epoch_osculation": "2461000.5",
            "eccentricity": "0.6758",
            "semi_major_axis": "1.4956",
            "inclination": "12.59",
            "ascending_node_longitude": "306.5",
            "perihelion_argument": "195.6",
            "mean_anomaly": "212.4",
            "orbit_class": { "orbit_class_type": "APO" }
        }
    }"#;

    #[test]
    fn test_neo_object_to_processed() {
        let neo: NeoObject = serde_json::from_str(SAMPLE_NEO_JSON).unwrap();
        let processed = neo.to_processed().unwrap();

        assert_eq!(processed.id, "3542519");
        assert_eq!(processed.orbit_class, "APO");
        assert!(processed.is_potentially_hazardous);
        assert_eq!(processed.estimated_diameter_m, (100.6 + 225.0) / 2.0);
        assert_eq!(processed.orbital_elements.semi_major_axis, 1.4956);
        assert_eq!(processed.orbital_elements.eccentricity, 0.6758);
        assert_eq!(processed.orbital_elements.epoch, 2461000.5);

        let approach = &processed.close_approaches[0];
        assert_eq!(approach.velocity_km_s, 13.49);
        assert_eq!(approach.miss_distance_km, 4625434.5);
    }

    #[test]
    fn test_missing_orbital_data_yields_none() {
        let neo = NeoObject {
            id: "1".to_string(),
            name: "incomplete".to_string(),
            absolute_magnitude_h: None,
            estimated_diameter: None,
            is_potentially_hazardous_asteroid: None,
            close_approach_data: None,
            orbital_data: None,
        };
        assert!(neo.to_processed().is_none());
    }

    #[test]
    fn test_density_estimation_by_class() {
        assert_eq!(estimate_density("APO"), 2000.0);
        assert_eq!(estimate_density("S"), 2700.0);
        assert_eq!(estimate_density("M"), 4000.0);
        assert_eq!(estimate_density("weird"), 2000.0);
    }

    #[test]
    fn test_mass_scales_with_diameter_cubed() {
        let small = estimate_mass(100.0, "S");
        let large = estimate_mass(200.0, "S");
        assert!((large / small - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cache_ttl() {
        let cache = NeoCache::new(Duration::from_secs(3600));
        assert!(!cache.is_valid());
        assert!(cache.is_empty());

        cache.set(demo_asteroids());
        assert!(cache.is_valid());
        assert_eq!(cache.len(), 3);

        let expired = NeoCache::new(Duration::ZERO);
        expired.set(demo_asteroids());
        assert!(!expired.is_valid());
    }

    #[test]
    fn test_demo_asteroids_have_sane_orbits() {
        for asteroid in demo_asteroids() {
            let el = &asteroid.orbital_elements;
            assert!(el.semi_major_axis > 0.5 && el.semi_major_axis < 2.0);
            assert!(el.eccentricity >= 0.0 && el.eccentricity < 1.0);
            assert!(asteroid.estimated_mass_kg > 0.0);

            let position = el.position_at(el.epoch + 100.0);
            assert!(position.distance.is_finite() && position.distance > 0.0);
        }
    }

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::new("SECRET");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, "SECRET");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // port 9 (discard) refuses the connection immediately
        let client = NeoWsClient::new(ApiConfig {
            base_url: "http://127.0.0.1:9/neo/rest/v1".to_string(),
            api_key: "DEMO_KEY".to_string(),
        });

        let err = client.fetch_neo("3542519").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
