// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end mesh conversion
//!
//! The converted mesh and its origin sidecar are written to temporary
//! files next to the output and only persisted once every line and the
//! origin location succeeded. A failed run leaves no mesh behind.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::origin::{format_origin, locate_origin, longlat_path};
use crate::pipeline::{PipelineStats, VertexPipeline};
use obj_georef_core::{resolve_file, TransformParameters};
use obj_georef_projection::{GeographicPoint, ProjectionEngine};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub stats: PipelineStats,
    /// Geographic origin, written only when re-projection is off
    pub origin: Option<GeographicPoint>,
}

/// Resolve the parameter document and convert `input` into `output`
pub fn convert_mesh_file<E: ProjectionEngine>(
    engine: &E,
    input: &Path,
    parameter_document: &Path,
    output: &Path,
    config: &Config,
) -> Result<RunSummary> {
    let params = resolve_file(parameter_document)?;
    tracing::info!(
        scale = params.scale,
        translation = ?params.translation.as_slice(),
        projection = %params.projection_command,
        "Resolved transform parameters"
    );

    convert_mesh(engine, &params, input, output, config)
}

/// Convert `input` into `output` with already resolved parameters
pub fn convert_mesh<E: ProjectionEngine>(
    engine: &E,
    params: &TransformParameters,
    input: &Path,
    output: &Path,
    config: &Config,
) -> Result<RunSummary> {
    let reader = File::open(input)
        .map(BufReader::new)
        .map_err(|e| Error::file_access(input, e))?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = stage_file(dir, output)?;

    let mut pipeline = VertexPipeline::new(params, engine, config);
    let staged = transform_stream(&mut pipeline, reader, input, staged, output)?;
    let stats = pipeline.stats();
    tracing::debug!(vertices = stats.vertices, passthrough_lines = stats.passthrough_lines, "Mesh staged");

    // Required in default mode; computed before anything is committed
    let origin = if config.output_gk3 {
        None
    } else {
        Some(locate_origin(engine, params)?)
    };

    let sidecar = match &origin {
        Some(origin) => {
            let path = longlat_path(output);
            let mut file = stage_file(dir, &path)?;
            file.write_all(format_origin(origin, config.precision).as_bytes())
                .map_err(|e| Error::file_access(&path, e))?;
            Some((file, path))
        }
        None => None,
    };

    // Sidecar first: if it cannot be committed, the mesh is never written
    let sidecar_path = match sidecar {
        Some((file, path)) => {
            if path.exists() {
                tracing::warn!(path = %path.display(), "Replacing existing origin file");
            }
            file.persist(&path)
                .map_err(|e| Error::file_access(&path, e.error))?;
            Some(path)
        }
        None => None,
    };

    if let Err(e) = staged.persist(output) {
        if let Some(path) = &sidecar_path {
            if let Err(cleanup) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %cleanup, "Cannot remove origin file");
            }
        }
        return Err(Error::file_access(output, e.error));
    }

    if let (Some(path), Some(origin)) = (&sidecar_path, &origin) {
        tracing::info!(
            path = %path.display(),
            longitude = origin.longitude,
            latitude = origin.latitude,
            height = origin.height,
            "Wrote origin location"
        );
    }

    tracing::info!(
        vertices = stats.vertices,
        passthrough_lines = stats.passthrough_lines,
        output = %output.display(),
        "Mesh converted"
    );

    Ok(RunSummary { stats, origin })
}

/// Temporary file next to `target`, committed later with `persist`
///
/// Created with the permissions a plain file creation would get (umask
/// applied), or those of an existing `target`.
fn stage_file(dir: &Path, target: &Path) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".obj-georef-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let staged = builder
        .tempfile_in(dir)
        .map_err(|e| Error::file_access(dir, e))?;

    if let Ok(meta) = std::fs::metadata(target) {
        if meta.is_file() {
            staged
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| Error::file_access(target, e))?;
        }
    }
    Ok(staged)
}

fn transform_stream<E: ProjectionEngine, R: BufRead>(
    pipeline: &mut VertexPipeline<'_, E>,
    mut reader: R,
    input: &Path,
    staged: NamedTempFile,
    output: &Path,
) -> Result<NamedTempFile> {
    let mut writer = BufWriter::new(staged);
    let mut line = Vec::with_capacity(128);
    let mut line_number = 0;

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| Error::file_access(input, e))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let out = pipeline.transform_line(line_number, &line)?;
        writer
            .write_all(&out)
            .map_err(|e| Error::file_access(output, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::file_access(output, e.into_error()))
}
