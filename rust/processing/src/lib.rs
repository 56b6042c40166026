// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh georeferencing pipeline shared by the CLI and tests.
//!
//! Reads an OBJ mesh line by line, applies the resolved similarity
//! transform to every vertex and writes the converted mesh atomically,
//! together with the geographic origin location (`.longlat`) when no
//! re-projection is requested.

pub mod config;
pub mod error;
pub mod obj;
pub mod origin;
pub mod pipeline;
pub mod run;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use obj::MeshRecord;
pub use origin::{locate_origin, longlat_path};
pub use pipeline::{format_vertex, PipelineStats, VertexPipeline};
pub use run::{convert_mesh, convert_mesh_file, RunSummary};
