// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # obj-georef Projection
//!
//! Cartographic projection for georeferenced meshes.
//!
//! ## Overview
//!
//! - **Engine seam**: [`ProjectionEngine`] with owned handles and the RAII
//!   [`ProjectionPair`]
//! - **Built-in engine**: pure-Rust transverse Mercator / UTM, long/lat and
//!   Helmert datum shifts ([`BuiltinEngine`])
//! - **PROJ engine**: delegates to libproj (`proj-transforms` feature)
//! - **Gauss-Krüger**: UTM to 3° grid conversion with zone prefixing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use obj_georef_projection::{to_geographic, utm_to_gauss_kruger, BuiltinEngine};
//! use nalgebra::Point3;
//!
//! let utm = Point3::new(440000.0, 4420000.0, 0.0);
//! let geo = to_geographic(&BuiltinEngine, "+proj=utm +zone=50 +datum=WGS84", utm)?;
//! let gk = utm_to_gauss_kruger(&BuiltinEngine, "+proj=utm +zone=50 +datum=WGS84", utm, true)?;
//! ```

pub mod definition;
pub mod ellipsoid;
pub mod engine;
pub mod error;
pub mod gauss_kruger;
pub mod tmerc;

#[cfg(feature = "proj-transforms")]
pub mod proj_engine;

pub use definition::{is_geographic_definition, ProjectionDef, ProjectionKind, TmercParams, WGS84_LONGLAT};
pub use ellipsoid::{Datum, Ellipsoid, Helmert};
pub use engine::{to_geographic, BuiltinEngine, BuiltinProjection, GeographicPoint, ProjectionEngine, ProjectionPair};
pub use error::{Error, Result};
pub use gauss_kruger::{
    gauss_kruger_zone, prefix_zone_code, utm_to_gauss_kruger, utm_to_transverse_mercator, zone_prefix_magnitude,
};
pub use tmerc::TransverseMercator;

#[cfg(feature = "proj-transforms")]
pub use proj_engine::{ProjEngine, ProjHandle};
