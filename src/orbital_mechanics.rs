// Orbital Mechanics - Keplerian positions for planets and NEOs
// Planet element table: JPL "Approximate Positions of the Planets"
// (Standish), J2000 values with per-century drift rates, valid 1800-2050 AD

use std::f64::consts::PI;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_CENTURY, GAUSSIAN_K, J2000_JD, SECONDS_PER_DAY};
use crate::error::SimulationError;

// =============================================================================
// TIME
// =============================================================================

/// Julian Date for a UTC instant.
pub fn julian_date(date: DateTime<Utc>) -> f64 {
    // Unix epoch 1970-01-01T00:00:00Z is JD 2440587.5
    2440587.5 + date.timestamp() as f64 / SECONDS_PER_DAY
        + date.timestamp_subsec_nanos() as f64 / (SECONDS_PER_DAY * 1e9)
}

/// Julian centuries elapsed since the J2000 epoch.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

// =============================================================================
// KEPLER SOLVER
// =============================================================================

const KEPLER_MAX_ITERATIONS: u32 = 100;
const KEPLER_TOLERANCE: f64 = 1e-8;

/// Solution of Kepler's equation M = E - e·sin(E).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerSolution {
    /// Eccentric anomaly (radians)
    pub eccentric_anomaly: f64,
    /// False when the iteration cap was hit before meeting tolerance; the
    /// value is still the best available estimate (silent-degradation policy)
    pub converged: bool,
    pub iterations: u32,
}

/// Solve Kepler's equation via Newton-Raphson.
///
/// Never fails: on non-convergence the best estimate is returned with
/// `converged == false` and a warning is logged.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    let mut e_anom = mean_anomaly;

    for iteration in 0..KEPLER_MAX_ITERATIONS {
        let f = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
        let f_prime = 1.0 - eccentricity * e_anom.cos();
        let delta = f / f_prime;
        e_anom -= delta;

        if delta.abs() < KEPLER_TOLERANCE {
            return KeplerSolution {
                eccentric_anomaly: e_anom,
                converged: true,
                iterations: iteration + 1,
            };
        }
    }

    log::warn!(
        "Kepler solver hit iteration cap (M={:.6}, e={:.6}); returning best estimate",
        mean_anomaly,
        eccentricity
    );

    KeplerSolution {
        eccentric_anomaly: e_anom,
        converged: false,
        iterations: KEPLER_MAX_ITERATIONS,
    }
}

// =============================================================================
// HELIOCENTRIC POSITION
// =============================================================================

/// Heliocentric ecliptic position of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeliocentricPosition {
    /// Ecliptic x (AU)
    pub x: f64,
    /// Ecliptic y (AU)
    pub y: f64,
    /// Ecliptic z (AU)
    pub z: f64,
    /// Distance from the Sun (AU)
    pub distance: f64,
    /// True anomaly (radians)
    pub true_anomaly: f64,
    /// False when the underlying Kepler solve did not converge
    pub kepler_converged: bool,
}

/// Rotate perifocal coordinates into the heliocentric ecliptic frame using
/// argument of perihelion ω, ascending node Ω and inclination i.
fn perifocal_to_ecliptic(x_orb: f64, y_orb: f64, omega: f64, node: f64, incl: f64) -> (f64, f64, f64) {
    let (sin_w, cos_w) = omega.sin_cos();
    let (sin_node, cos_node) = node.sin_cos();
    let (sin_i, cos_i) = incl.sin_cos();

    let r11 = cos_node * cos_w - sin_node * sin_w * cos_i;
    let r12 = -cos_node * sin_w - sin_node * cos_w * cos_i;
    let r21 = sin_node * cos_w + cos_node * sin_w * cos_i;
    let r22 = -sin_node * sin_w + cos_node * cos_w * cos_i;
    let r31 = sin_w * sin_i;
    let r32 = cos_w * sin_i;

    (
        r11 * x_orb + r12 * y_orb,
        r21 * x_orb + r22 * y_orb,
        r31 * x_orb + r32 * y_orb,
    )
}

/// Wrap an angle in radians to (-π, π].
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI {
        wrapped - 2.0 * PI
    } else {
        wrapped
    }
}

/// Position on an ellipse given a (AU), e and mean anomaly, rotated into the
/// ecliptic frame.
fn elliptical_position(
    a: f64,
    e: f64,
    mean_anomaly: f64,
    omega: f64,
    node: f64,
    incl: f64,
) -> HeliocentricPosition {
    let solution = solve_kepler(normalize_angle(mean_anomaly), e);
    let e_anom = solution.eccentric_anomaly;

    let x_orb = a * (e_anom.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * e_anom.sin();

    let true_anomaly = ((1.0 - e * e).sqrt() * e_anom.sin()).atan2(e_anom.cos() - e);
    let distance = a * (1.0 - e * e_anom.cos());

    let (x, y, z) = perifocal_to_ecliptic(x_orb, y_orb, omega, node, incl);

    HeliocentricPosition {
        x,
        y,
        z,
        distance,
        true_anomaly,
        kepler_converged: solution.converged,
    }
}

// =============================================================================
// PLANETS
// =============================================================================

/// The eight supported planet keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Earth => "earth",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
        }
    }

    fn elements(&self) -> &'static PlanetElements {
        &PLANET_ELEMENTS[*self as usize]
    }
}

impl FromStr for Planet {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mercury" => Ok(Planet::Mercury),
            "venus" => Ok(Planet::Venus),
            "earth" => Ok(Planet::Earth),
            "mars" => Ok(Planet::Mars),
            "jupiter" => Ok(Planet::Jupiter),
            "saturn" => Ok(Planet::Saturn),
            "uranus" => Ok(Planet::Uranus),
            "neptune" => Ok(Planet::Neptune),
            other => Err(SimulationError::UnknownBody(other.to_string())),
        }
    }
}

/// J2000 osculating elements and per-century rates. Angles in degrees,
/// semi-major axis in AU.
struct PlanetElements {
    a: f64,
    a_rate: f64,
    e: f64,
    e_rate: f64,
    incl: f64,
    incl_rate: f64,
    mean_longitude: f64,
    mean_longitude_rate: f64,
    perihelion_longitude: f64,
    perihelion_longitude_rate: f64,
    node_longitude: f64,
    node_longitude_rate: f64,
}

#[rustfmt::skip]
static PLANET_ELEMENTS: [PlanetElements; 8] = [
    // Mercury
    PlanetElements { a: 0.38709927, a_rate: 0.00000037, e: 0.20563593, e_rate: 0.00001906,
        incl: 7.00497902, incl_rate: -0.00594749, mean_longitude: 252.25032350,
        mean_longitude_rate: 149472.67411175, perihelion_longitude: 77.45779628,
        perihelion_longitude_rate: 0.16047689, node_longitude: 48.33076593, node_longitude_rate: -0.12534081 },
    // Venus
    PlanetElements { a: 0.72333566, a_rate: 0.00000390, e: 0.00677672, e_rate: -0.00004107,
        incl: 3.39467605, incl_rate: -0.00078890, mean_longitude: 181.97909950,
        mean_longitude_rate: 58517.81538729, perihelion_longitude: 131.60246718,
        perihelion_longitude_rate: 0.00268329, node_longitude: 76.67984255, node_longitude_rate: -0.27769418 },
    // Earth-Moon barycenter
    PlanetElements { a: 1.00000261, a_rate: 0.00000562, e: 0.01671123, e_rate: -0.00004392,
        incl: -0.00001531, incl_rate: -0.01294668, mean_longitude: 100.46457166,
        mean_longitude_rate: 35999.37244981, perihelion_longitude: 102.93768193,
        perihelion_longitude_rate: 0.32327364, node_longitude: 0.0, node_longitude_rate: 0.0 },
    // Mars
    PlanetElements { a: 1.52371034, a_rate: 0.00001847, e: 0.09339410, e_rate: 0.00007882,
        incl: 1.84969142, incl_rate: -0.00813131, mean_longitude: -4.55343205,
        mean_longitude_rate: 19140.30268499, perihelion_longitude: -23.94362959,
        perihelion_longitude_rate: 0.44441088, node_longitude: 49.55953891, node_longitude_rate: -0.29257343 },
    // Jupiter
    PlanetElements { a: 5.20288700, a_rate: -0.00011607, e: 0.04838624, e_rate: -0.00013253,
        incl: 1.30439695, incl_rate: -0.00183714, mean_longitude: 34.39644051,
        mean_longitude_rate: 3034.74612775, perihelion_longitude: 14.72847983,
        perihelion_longitude_rate: 0.21252668, node_longitude: 100.47390909, node_longitude_rate: 0.20469106 },
    // Saturn
    PlanetElements { a: 9.53667594, a_rate: -0.00125060, e: 0.05386179, e_rate: -0.00050991,
        incl: 2.48599187, incl_rate: 0.00193609, mean_longitude: 49.95424423,
        mean_longitude_rate: 1222.49362201, perihelion_longitude: 92.59887831,
        perihelion_longitude_rate: -0.41897216, node_longitude: 113.66242448, node_longitude_rate: -0.28867794 },
    // Uranus
    PlanetElements { a: 19.18916464, a_rate: -0.00196176, e: 0.04725744, e_rate: -0.00004397,
        incl: 0.77263783, incl_rate: -0.00242939, mean_longitude: 313.23810451,
        mean_longitude_rate: 428.48202785, perihelion_longitude: 170.95427630,
        perihelion_longitude_rate: 0.40805281, node_longitude: 74.01692503, node_longitude_rate: 0.04240589 },
    // Neptune
    PlanetElements { a: 30.06992276, a_rate: 0.00026291, e: 0.00859048, e_rate: 0.00005105,
        incl: 1.77004347, incl_rate: 0.00035372, mean_longitude: -55.12002969,
        mean_longitude_rate: 218.45945325, perihelion_longitude: 44.96476227,
        perihelion_longitude_rate: -0.32241464, node_longitude: 131.78422574, node_longitude_rate: -0.00508664 },
];

/// Heliocentric ecliptic position of a planet at a UTC instant.
pub fn planet_position(planet: Planet, date: DateTime<Utc>) -> HeliocentricPosition {
    planet_position_at_jd(planet, julian_date(date))
}

/// Same as [`planet_position`], keyed by Julian Date.
pub fn planet_position_at_jd(planet: Planet, jd: f64) -> HeliocentricPosition {
    let t = julian_centuries(jd);
    let el = planet.elements();

    let a = el.a + el.a_rate * t;
    let e = el.e + el.e_rate * t;
    let incl = (el.incl + el.incl_rate * t).to_radians();
    let mean_longitude = el.mean_longitude + el.mean_longitude_rate * t;
    let perihelion_longitude = el.perihelion_longitude + el.perihelion_longitude_rate * t;
    let node = (el.node_longitude + el.node_longitude_rate * t).to_radians();

    let omega = (perihelion_longitude.to_radians()) - node;
    let mean_anomaly = (mean_longitude - perihelion_longitude).to_radians();

    elliptical_position(a, e, mean_anomaly, omega, node, incl)
}

/// Heliocentric position looked up by planet name.
///
/// The name is validated against the eight supported keys; anything else is
/// an `UnknownBody` error.
pub fn heliocentric_position(
    body_name: &str,
    date: DateTime<Utc>,
) -> Result<HeliocentricPosition, SimulationError> {
    let planet = Planet::from_str(body_name)?;
    Ok(planet_position(planet, date))
}

// =============================================================================
// NEO ORBITAL ELEMENTS
// =============================================================================

/// Osculating Keplerian elements for a small body, as served by NeoWs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (AU)
    pub semi_major_axis: f64,
    /// Eccentricity (0-1 for elliptical)
    pub eccentricity: f64,
    /// Inclination (radians)
    pub inclination: f64,
    /// Longitude of ascending node (radians)
    pub longitude_ascending_node: f64,
    /// Argument of perihelion (radians)
    pub argument_perihelion: f64,
    /// Mean anomaly at epoch (radians)
    pub mean_anomaly: f64,
    /// Epoch of osculation (Julian Date)
    pub epoch: f64,
}

impl OrbitalElements {
    /// Mean motion (rad/day) from Kepler's third law.
    pub fn mean_motion(&self) -> f64 {
        GAUSSIAN_K / self.semi_major_axis.powf(1.5)
    }

    /// Heliocentric ecliptic position at a Julian Date, propagating the mean
    /// anomaly linearly from the element epoch.
    pub fn position_at(&self, jd: f64) -> HeliocentricPosition {
        let mean_anomaly = self.mean_anomaly + self.mean_motion() * (jd - self.epoch);
        elliptical_position(
            self.semi_major_axis,
            self.eccentricity,
            mean_anomaly,
            self.argument_perihelion,
            self.longitude_ascending_node,
            self.inclination,
        )
    }

    /// Orbital period in days.
    pub fn period_days(&self) -> f64 {
        2.0 * PI / self.mean_motion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_julian_date_epochs() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_relative_eq!(julian_date(j2000), 2451545.0, epsilon = 1e-6);

        let unix_epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_relative_eq!(julian_date(unix_epoch), 2440587.5, epsilon = 1e-9);
    }

    #[test]
    fn test_kepler_circular_orbit_is_exact() {
        // For e = 0, E = M identically
        let solution = solve_kepler(1.0, 0.0);
        assert!(solution.converged);
        assert_relative_eq!(solution.eccentric_anomaly, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kepler_residual_meets_tolerance() {
        for &(m, e) in &[(0.5, 0.5), (3.0, 0.9), (-2.0, 0.2), (0.1, 0.0167)] {
            let solution = solve_kepler(m, e);
            assert!(solution.converged);
            let residual = solution.eccentric_anomaly - e * solution.eccentric_anomaly.sin() - m;
            assert!(residual.abs() < 1e-8, "residual {} for M={}, e={}", residual, m, e);
        }
    }

    #[test]
    fn test_earth_distance_stays_within_orbit_bounds() {
        // Earth's perihelion/aphelion bounds: [0.983, 1.017] AU
        for day in (0..3650).step_by(37) {
            let jd = J2000_JD + day as f64;
            let position = planet_position_at_jd(Planet::Earth, jd);
            assert!(position.kepler_converged);
            assert!(
                position.distance > 0.983 && position.distance < 1.017,
                "Earth at {} AU on JD {}",
                position.distance,
                jd
            );
        }
    }

    #[test]
    fn test_all_planets_finite_over_range() {
        for planet in Planet::ALL {
            for year in [1900.0, 1975.0, 2000.0, 2026.0, 2049.0] {
                let jd = J2000_JD + (year - 2000.0) * 365.25;
                let p = planet_position_at_jd(planet, jd);
                assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
                assert!(p.distance.is_finite() && p.distance > 0.0);
                assert!(p.true_anomaly.is_finite());
            }
        }
    }

    #[test]
    fn test_planet_distance_ordering_holds() {
        let jd = J2000_JD + 1234.5;
        let mercury = planet_position_at_jd(Planet::Mercury, jd);
        let jupiter = planet_position_at_jd(Planet::Jupiter, jd);
        let neptune = planet_position_at_jd(Planet::Neptune, jd);
        assert!(mercury.distance < jupiter.distance);
        assert!(jupiter.distance < neptune.distance);
    }

    #[test]
    fn test_heliocentric_position_is_deterministic() {
        let date = Utc.with_ymd_and_hms(2025, 6, 15, 3, 30, 0).unwrap();
        let first = heliocentric_position("earth", date).unwrap();
        let second = heliocentric_position("earth", date).unwrap();
        // bit-identical, not approximately equal
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_body_is_rejected() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let err = heliocentric_position("pluto", date).unwrap_err();
        assert_eq!(err, SimulationError::UnknownBody("pluto".to_string()));
    }

    #[test]
    fn test_body_name_is_case_insensitive() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            heliocentric_position("Mars", date).unwrap(),
            heliocentric_position("mars", date).unwrap()
        );
    }

    #[test]
    fn test_neo_elements_propagate_full_period() {
        let elements = OrbitalElements {
            semi_major_axis: 1.1264,
            eccentricity: 0.2037,
            inclination: 6.03_f64.to_radians(),
            longitude_ascending_node: 2.06_f64.to_radians(),
            argument_perihelion: 66.22_f64.to_radians(),
            mean_anomaly: 101.7_f64.to_radians(),
            epoch: 2461000.5,
        };

        let start = elements.position_at(elements.epoch);
        let after_period = elements.position_at(elements.epoch + elements.period_days());

        // one full revolution returns to the same point
        assert_relative_eq!(start.x, after_period.x, epsilon = 1e-6);
        assert_relative_eq!(start.y, after_period.y, epsilon = 1e-6);
        assert_relative_eq!(start.z, after_period.z, epsilon = 1e-6);

        // distance bounded by perihelion/aphelion
        let q = elements.semi_major_axis * (1.0 - elements.eccentricity);
        let ap = elements.semi_major_axis * (1.0 + elements.eccentricity);
        assert!(start.distance >= q - 1e-9 && start.distance <= ap + 1e-9);
    }
}
