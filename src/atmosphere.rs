// Layered standard-atmosphere model and Mach-dependent drag
// Layer values follow the US Standard Atmosphere 1976 breakpoints

use crate::constants::{GAMMA_AIR, R_AIR};

/// One atmospheric layer breakpoint.
#[derive(Debug, Clone, Copy)]
pub struct AtmosphereLayer {
    /// Base altitude (m)
    pub altitude: f64,
    /// Air density at the base (kg/m³)
    pub density: f64,
    /// Temperature at the base (K)
    pub temperature: f64,
}

/// Nine-layer table from sea level to 100 km.
pub static ATMOSPHERE_LAYERS: [AtmosphereLayer; 9] = [
    AtmosphereLayer { altitude: 0.0, density: 1.225, temperature: 288.15 },
    AtmosphereLayer { altitude: 11_000.0, density: 3.6391e-1, temperature: 216.65 },
    AtmosphereLayer { altitude: 20_000.0, density: 8.8030e-2, temperature: 216.65 },
    AtmosphereLayer { altitude: 32_000.0, density: 1.3220e-2, temperature: 228.65 },
    AtmosphereLayer { altitude: 47_000.0, density: 1.4300e-3, temperature: 270.65 },
    AtmosphereLayer { altitude: 51_000.0, density: 8.6000e-4, temperature: 270.65 },
    AtmosphereLayer { altitude: 71_000.0, density: 6.4210e-5, temperature: 214.65 },
    AtmosphereLayer { altitude: 86_000.0, density: 6.9580e-6, temperature: 186.87 },
    AtmosphereLayer { altitude: 100_000.0, density: 5.6040e-7, temperature: 195.08 },
];

/// Density scale height used above the top table entry (m)
const UPPER_SCALE_HEIGHT: f64 = 7_000.0;

/// Air density (kg/m³) and temperature (K) at an altitude.
///
/// Density is interpolated geometrically between layers (it falls off
/// exponentially, so linear interpolation would overshoot by orders of
/// magnitude mid-layer); temperature is interpolated linearly. Above the
/// top layer density decays exponentially toward vacuum.
pub fn conditions_at(altitude: f64) -> (f64, f64) {
    let layers = &ATMOSPHERE_LAYERS;

    if altitude <= 0.0 {
        let base = &layers[0];
        return (base.density, base.temperature);
    }

    let top = &layers[layers.len() - 1];
    if altitude >= top.altitude {
        let density = top.density * (-(altitude - top.altitude) / UPPER_SCALE_HEIGHT).exp();
        return (density, top.temperature);
    }

    for pair in layers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if altitude < upper.altitude {
            let f = (altitude - lower.altitude) / (upper.altitude - lower.altitude);
            let density = lower.density * (upper.density / lower.density).powf(f);
            let temperature = lower.temperature + f * (upper.temperature - lower.temperature);
            return (density, temperature);
        }
    }

    (top.density, top.temperature)
}

/// Local speed of sound (m/s) for a given air temperature.
pub fn speed_of_sound(temperature: f64) -> f64 {
    (GAMMA_AIR * R_AIR * temperature).sqrt()
}

/// Mach number for a speed at a given air temperature.
pub fn mach_number(velocity: f64, temperature: f64) -> f64 {
    velocity / speed_of_sound(temperature)
}

// Sphere drag coefficients per Mach regime
const CD_SUBSONIC: f64 = 0.47;
const CD_TRANSONIC_PEAK: f64 = 1.0;
const CD_HYPERSONIC: f64 = 0.92;

const MACH_TRANSONIC: f64 = 0.8;
const MACH_SUPERSONIC: f64 = 1.2;
const MACH_HYPERSONIC: f64 = 5.0;

/// Drag coefficient for a sphere across four piecewise Mach regimes:
/// subsonic, transonic (rising to the wave-drag peak), supersonic
/// (relaxing off the peak), hypersonic (constant).
pub fn drag_coefficient(mach: f64) -> f64 {
    if mach < MACH_TRANSONIC {
        CD_SUBSONIC
    } else if mach < MACH_SUPERSONIC {
        let f = (mach - MACH_TRANSONIC) / (MACH_SUPERSONIC - MACH_TRANSONIC);
        CD_SUBSONIC + f * (CD_TRANSONIC_PEAK - CD_SUBSONIC)
    } else if mach < MACH_HYPERSONIC {
        let f = (mach - MACH_SUPERSONIC) / (MACH_HYPERSONIC - MACH_SUPERSONIC);
        CD_TRANSONIC_PEAK + f * (CD_HYPERSONIC - CD_TRANSONIC_PEAK)
    } else {
        CD_HYPERSONIC
    }
}
