// Physical Constants (SI units unless annotated)

/// Astronomical Unit in meters
pub const AU: f64 = 1.495978707e11;

/// J2000 reference epoch as a Julian Date (2000-01-01 12:00 TT)
pub const J2000_JD: f64 = 2451545.0;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Gaussian gravitational constant (rad/day for a in AU)
pub const GAUSSIAN_K: f64 = 0.01720209895;

/// Earth's mean radius (m)
pub const EARTH_RADIUS: f64 = 6.371e6;

/// Standard gravity at Earth's surface (m/s²)
pub const SURFACE_GRAVITY: f64 = 9.80665;

/// Specific gas constant for dry air (J/(kg·K))
pub const R_AIR: f64 = 287.05;

/// Heat capacity ratio for air
pub const GAMMA_AIR: f64 = 1.4;

/// One ton of TNT in joules
pub const TNT_TON_J: f64 = 4.184e9;

/// One megaton of TNT in joules
pub const TNT_MEGATON_J: f64 = 4.184e15;

/// Mean Earth-Moon distance (km), used to express miss distances in lunar units
pub const LUNAR_DISTANCE_KM: f64 = 384_400.0;
