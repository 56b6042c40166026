// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PROJ-backed engine (feature `proj-transforms`)
//!
//! Handles validate their definition with `Proj::new`. Each transform
//! builds a `Proj::new_known_crs` pipeline between the two definitions.
//! PROJ exchanges geographic coordinates in degrees, so they are converted
//! at the boundary to keep the radian contract of [`ProjectionEngine`].

use crate::definition::is_geographic_definition;
use crate::engine::ProjectionEngine;
use crate::error::{Error, Result};
use nalgebra::Point3;
use proj::Proj;

/// Engine delegating to the system PROJ library
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjEngine;

/// Validated PROJ definition
pub struct ProjHandle {
    definition: String,
    geographic: bool,
    _proj: Proj,
}

impl ProjectionEngine for ProjEngine {
    type Handle = ProjHandle;

    fn create(&self, definition: &str) -> Result<ProjHandle> {
        if definition.trim().is_empty() {
            return Err(Error::init(definition, "empty projection definition"));
        }
        let proj = Proj::new(definition).map_err(|e| Error::init(definition, e.to_string()))?;
        Ok(ProjHandle {
            definition: definition.to_string(),
            geographic: is_geographic_definition(definition),
            _proj: proj,
        })
    }

    fn is_geographic(&self, handle: &ProjHandle) -> bool {
        handle.geographic
    }

    fn transform(&self, source: &ProjHandle, destination: &ProjHandle, point: Point3<f64>) -> Result<Point3<f64>> {
        let pipeline = Proj::new_known_crs(&source.definition, &destination.definition, None)
            .map_err(|e| {
                Error::Transform(format!(
                    "cannot build pipeline {} -> {}: {e}",
                    source.definition, destination.definition
                ))
            })?;

        let input = if source.geographic {
            (point.x.to_degrees(), point.y.to_degrees())
        } else {
            (point.x, point.y)
        };

        let (x, y) = pipeline
            .convert(input)
            .map_err(|e| Error::Transform(format!("({:.6}, {:.6}): {e}", point.x, point.y)))?;

        let out = if destination.geographic {
            Point3::new(x.to_radians(), y.to_radians(), point.z)
        } else {
            Point3::new(x, y, point.z)
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::WGS84_LONGLAT;
    use crate::engine::to_geographic;
    use approx::assert_relative_eq;

    #[test]
    fn test_proj_matches_reference() {
        let geo = to_geographic(
            &ProjEngine,
            "+proj=utm +zone=50 +datum=WGS84 +units=m +no_defs",
            Point3::new(440000.0, 4420000.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(geo.longitude, 116.297832424, epsilon = 1e-7);
        assert_relative_eq!(geo.latitude, 39.927982444, epsilon = 1e-7);
    }

    #[test]
    fn test_proj_rejects_bad_definition() {
        assert!(matches!(ProjEngine.create("+proj=nonsense"), Err(Error::Init { .. })));
        assert!(ProjEngine.create(WGS84_LONGLAT).unwrap().geographic);
    }
}
