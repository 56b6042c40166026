// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! obj-coor-sys-conv - carry a locally modelled OBJ mesh into map coordinates.
//!
//! ```text
//! obj-coor-sys-conv <input_mesh> <parameter_document> <output_mesh>
//! ```
//!
//! Transform parameters come from the `mesh_painting` 1.0 block of the
//! parameter document. By default vertices are scaled and rotated, and the
//! geographic location of the translation is written to
//! `<output_mesh>.longlat`. With `OBJ_GEOREF_OUTPUT_GK3=1` vertices are
//! translated and re-projected onto the Gauss-Krüger 3° grid instead.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`. Stdout carries
//! the final `done.` / `fail.` status line only.

use obj_georef_processing::{convert_mesh_file, Config, ErrorKind};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,obj_georef=info";

#[cfg(not(feature = "proj-transforms"))]
type Engine = obj_georef_projection::BuiltinEngine;
#[cfg(feature = "proj-transforms")]
type Engine = obj_georef_projection::ProjEngine;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        print_usage();
        return ExitCode::from(ErrorKind::Usage.exit_code());
    }

    let config = Config::from_env();
    tracing::debug!(
        output_gk3 = config.output_gk3,
        precision = config.precision,
        "Loaded configuration"
    );

    let engine = Engine::default();
    match convert_mesh_file(
        &engine,
        Path::new(&args[1]),
        Path::new(&args[2]),
        Path::new(&args[3]),
        &config,
    ) {
        Ok(_) => {
            println!("done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "Conversion failed");
            eprintln!("error: {e}");
            println!("fail.");
            ExitCode::from(e.kind().exit_code())
        }
    }
}

fn print_usage() {
    println!("Usage:");
    println!("\tobj-coor-sys-conv <input_mesh> <parameter_document> <output_mesh>");
    println!("\te.g. obj-coor-sys-conv mesh.obj input.xml out.obj");
}
