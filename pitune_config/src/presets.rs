//! Preset catalog of control strategy archetypes.
//!
//! Presets are read-only starting points; they never reach the engine
//! directly and are converted into core controller settings by the caller.

use serde::Deserialize;

use crate::Acting;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub kp: f64,
    /// per minute
    pub ki: f64,
    /// per minute
    #[serde(default = "default_imax")]
    pub imax: f64,
    #[serde(default)]
    pub istartup: f64,
    #[serde(default = "default_ilimit")]
    pub ilimit: f64,
    #[serde(default)]
    pub acting: Acting,
}

fn default_imax() -> f64 {
    10.0
}

fn default_ilimit() -> f64 {
    100.0
}

// name, kp, ki, imax, istartup, ilimit, acting
const BUILTIN: [(&str, f64, f64, f64, f64, f64, Acting); 6] = [
    ("Zone Heating", 2.0, 0.2, 10.0, 0.0, 50.0, Acting::Reverse),
    ("Zone Cooling", 2.0, 0.2, 10.0, 0.0, 50.0, Acting::Direct),
    ("Supply Air Temperature", 4.0, 0.5, 20.0, 0.0, 50.0, Acting::Direct),
    ("Duct Static Pressure", 0.5, 1.5, 30.0, 20.0, 50.0, Acting::Reverse),
    ("Chilled Water Valve", 3.0, 0.3, 15.0, 0.0, 50.0, Acting::Direct),
    ("Hot Water Reset", 1.0, 0.05, 5.0, 0.0, 25.0, Acting::Reverse),
];

/// The built-in presets, in catalog order.
pub fn builtin_presets() -> Vec<Preset> {
    BUILTIN
        .iter()
        .map(|&(name, kp, ki, imax, istartup, ilimit, acting)| Preset {
            name: name.to_string(),
            kp,
            ki,
            imax,
            istartup,
            ilimit,
            acting,
        })
        .collect()
}

pub fn find_builtin(name: &str) -> Option<Preset> {
    builtin_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
