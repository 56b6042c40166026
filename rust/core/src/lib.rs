// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # obj-georef Core
//!
//! Transform-parameter resolution for mesh georeferencing.
//!
//! ## Overview
//!
//! - **Parameter Document**: owned XML element tree read with [quick-xml](https://docs.rs/quick-xml)
//! - **Parameter Resolver**: finds the `mesh_painting` 1.0 block and extracts
//!   scale, rotation, translation and the projection command
//! - **Similarity Transform**: `scale * R * p (+ t)` and its inverse on
//!   [nalgebra](https://docs.rs/nalgebra) types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use obj_georef_core::{resolve_file, Point3};
//!
//! let params = resolve_file("input.xml")?;
//! let map = params.local_to_map(&Point3::new(1.0, 2.0, 3.0));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization of [`TransformParameters`]

pub mod document;
pub mod error;
pub mod fast_parse;
pub mod params;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point3, Vector3};

pub use document::{Element, ParamDocument};
pub use error::{Error, Result};
pub use fast_parse::{parse_exact_reals, parse_leading_reals, parse_real, tokens};
pub use params::{resolve, resolve_file, MODULE_NAME, MODULE_VERSION};
pub use transform::TransformParameters;
