// Asteroid material compositions and their bulk properties
// Density references: Carry (2012), DeMeo & Carry (2013)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Bulk material composition of an impactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    Iron,
    Stone,
    Ice,
    Carbonaceous,
}

impl Composition {
    pub const ALL: [Composition; 4] = [
        Composition::Iron,
        Composition::Stone,
        Composition::Ice,
        Composition::Carbonaceous,
    ];

    /// Static property table lookup. Never mutated at runtime.
    pub fn properties(&self) -> &'static MaterialProperties {
        match self {
            Composition::Iron => &IRON,
            Composition::Stone => &STONE,
            Composition::Ice => &ICE,
            Composition::Carbonaceous => &CARBONACEOUS,
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Composition::Iron => "iron",
            Composition::Stone => "stone",
            Composition::Ice => "ice",
            Composition::Carbonaceous => "carbonaceous",
        };
        f.write_str(name)
    }
}

impl FromStr for Composition {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iron" => Ok(Composition::Iron),
            "stone" | "stony" => Ok(Composition::Stone),
            "ice" | "icy" => Ok(Composition::Ice),
            "carbonaceous" => Ok(Composition::Carbonaceous),
            other => Err(SimulationError::InvalidParameter(format!(
                "unknown composition '{}'",
                other
            ))),
        }
    }
}

/// Bulk properties governing entry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Bulk density (kg/m³)
    pub density: f64,
    /// Tensile strength (Pa)
    pub tensile_strength: f64,
    /// Melting point (K)
    pub melting_point: f64,
    /// Specific heat capacity (J/(kg·K))
    pub heat_capacity: f64,
    /// Thermal conductivity (W/(m·K))
    pub thermal_conductivity: f64,
    /// Fraction of incident aerodynamic heating spent on ablation
    pub ablation_coefficient: f64,
    /// Dynamic pressure at which the body breaks up (Pa)
    pub fragmentation_threshold: f64,
}

pub static IRON: MaterialProperties = MaterialProperties {
    density: 7800.0,
    tensile_strength: 5.0e7,
    melting_point: 1811.0,
    heat_capacity: 450.0,
    thermal_conductivity: 80.0,
    ablation_coefficient: 0.01,
    fragmentation_threshold: 1.0e8,
};

pub static STONE: MaterialProperties = MaterialProperties {
    density: 3000.0,
    tensile_strength: 1.0e7,
    melting_point: 1700.0,
    heat_capacity: 800.0,
    thermal_conductivity: 2.0,
    ablation_coefficient: 0.05,
    fragmentation_threshold: 2.0e6,
};

pub static ICE: MaterialProperties = MaterialProperties {
    density: 917.0,
    tensile_strength: 1.0e6,
    melting_point: 273.0,
    heat_capacity: 2100.0,
    thermal_conductivity: 2.2,
    ablation_coefficient: 0.1,
    fragmentation_threshold: 1.0e5,
};

pub static CARBONACEOUS: MaterialProperties = MaterialProperties {
    density: 1700.0,
    tensile_strength: 3.0e6,
    melting_point: 1500.0,
    heat_capacity: 1000.0,
    thermal_conductivity: 1.5,
    ablation_coefficient: 0.05,
    fragmentation_threshold: 3.0e5,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_lookup() {
        assert_eq!(Composition::Iron.properties().density, 7800.0);
        assert_eq!(Composition::Stone.properties().density, 3000.0);
        assert_eq!(Composition::Ice.properties().density, 917.0);
        assert_eq!(Composition::Carbonaceous.properties().density, 1700.0);
    }

    #[test]
    fn test_strength_ordering() {
        // Iron holds together far longer than ice under ram pressure
        assert!(
            Composition::Iron.properties().fragmentation_threshold
                > Composition::Stone.properties().fragmentation_threshold
        );
        assert!(
            Composition::Stone.properties().fragmentation_threshold
                > Composition::Ice.properties().fragmentation_threshold
        );
    }

    #[test]
    fn test_parse_known_keys() {
        assert_eq!("iron".parse::<Composition>().unwrap(), Composition::Iron);
        assert_eq!("Stone".parse::<Composition>().unwrap(), Composition::Stone);
        assert_eq!(
            "carbonaceous".parse::<Composition>().unwrap(),
            Composition::Carbonaceous
        );
    }

    #[test]
    fn test_parse_unknown_key_is_invalid_parameter() {
        let err = "unobtainium".parse::<Composition>().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
    }
}
