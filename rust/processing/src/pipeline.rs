// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex Transform Pipeline
//!
//! Applies the resolved similarity transform to every vertex record of a
//! mesh, optionally followed by the UTM to Gauss-Krüger re-projection.
//! Non-vertex lines are returned as borrowed slices of the input so the
//! caller writes them back byte for byte.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::obj::MeshRecord;
use nalgebra::Point3;
use obj_georef_core::TransformParameters;
use obj_georef_projection::{utm_to_gauss_kruger, ProjectionEngine};
use std::borrow::Cow;

/// Line counts of one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub vertices: usize,
    pub passthrough_lines: usize,
}

/// Per-line vertex transformer
pub struct VertexPipeline<'a, E: ProjectionEngine> {
    params: &'a TransformParameters,
    engine: &'a E,
    config: &'a Config,
    stats: PipelineStats,
}

impl<'a, E: ProjectionEngine> VertexPipeline<'a, E> {
    pub fn new(params: &'a TransformParameters, engine: &'a E, config: &'a Config) -> Self {
        Self {
            params,
            engine,
            config,
            stats: PipelineStats::default(),
        }
    }

    /// Transform one vertex position
    ///
    /// `scale * R * p`, then with re-projection enabled `+ t` and the
    /// zone-prefixed Gauss-Krüger conversion.
    pub fn transform_vertex(&self, p: &Point3<f64>) -> Result<Point3<f64>> {
        let mapped = self.params.apply_similarity(p);
        if !self.config.output_gk3 {
            return Ok(mapped);
        }

        let utm = mapped + self.params.translation;
        Ok(utm_to_gauss_kruger(
            self.engine,
            &self.params.projection_command,
            utm,
            true,
        )?)
    }

    /// Transform one input line (terminator included)
    ///
    /// `line_number` is 1-based and only used for error reporting.
    pub fn transform_line<'l>(&mut self, line_number: usize, line: &'l [u8]) -> Result<Cow<'l, [u8]>> {
        match MeshRecord::classify(line) {
            MeshRecord::Other(bytes) => {
                self.stats.passthrough_lines += 1;
                Ok(Cow::Borrowed(bytes))
            }
            MeshRecord::MalformedVertex { body } => Err(Error::MalformedVertex {
                line: line_number,
                content: String::from_utf8_lossy(body).into_owned(),
            }),
            MeshRecord::Vertex {
                position,
                terminator,
            } => {
                let out = self.transform_vertex(&position)?;
                self.stats.vertices += 1;

                let mut bytes = format_vertex(&out, self.config.precision).into_bytes();
                bytes.extend_from_slice(terminator);
                Ok(Cow::Owned(bytes))
            }
        }
    }

    /// Counts accumulated so far
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}

/// `v x y z` in fixed-point notation
pub fn format_vertex(p: &Point3<f64>, precision: usize) -> String {
    format!(
        "v {:.prec$} {:.prec$} {:.prec$}",
        p.x,
        p.y,
        p.z,
        prec = precision
    )
}
