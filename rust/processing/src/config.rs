// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration loaded from environment variables.

/// Default number of fractional digits in written coordinates.
pub const DEFAULT_PRECISION: usize = 15;

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Re-project vertices onto the Gauss-Krüger 3° grid (`OBJ_GEOREF_OUTPUT_GK3`).
    ///
    /// When off, vertices are only scaled and rotated, and the origin location
    /// is written next to the output mesh.
    pub output_gk3: bool,
    /// Fractional digits of written coordinates (`OBJ_GEOREF_PRECISION`).
    pub precision: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            output_gk3: std::env::var("OBJ_GEOREF_OUTPUT_GK3")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            precision: std::env::var("OBJ_GEOREF_PRECISION")
                .unwrap_or_else(|_| DEFAULT_PRECISION.to_string())
                .parse()
                .unwrap_or(DEFAULT_PRECISION),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_gk3: false,
            precision: DEFAULT_PRECISION,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
