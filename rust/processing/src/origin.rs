// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Origin location sidecar (`<output>.longlat`)

use crate::error::Result;
use nalgebra::Point3;
use obj_georef_core::TransformParameters;
use obj_georef_projection::{to_geographic, GeographicPoint, ProjectionEngine};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension appended to the output mesh path
pub const LONGLAT_EXTENSION: &str = "longlat";

/// Geographic position of the translation, read as a point in the source projection
pub fn locate_origin<E: ProjectionEngine>(engine: &E, params: &TransformParameters) -> Result<GeographicPoint> {
    let origin = Point3::from(params.translation);
    Ok(to_geographic(engine, &params.projection_command, origin)?)
}

/// `<output>.longlat`, appended to the full file name
pub fn longlat_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".");
    name.push(LONGLAT_EXTENSION);
    PathBuf::from(name)
}

/// `lon lat height` line in fixed-point notation
pub fn format_origin(origin: &GeographicPoint, precision: usize) -> String {
    format!(
        "{:.prec$} {:.prec$} {:.prec$}\n",
        origin.longitude,
        origin.latitude,
        origin.height,
        prec = precision
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};
    use obj_georef_projection::BuiltinEngine;

    #[test]
    fn test_longlat_path_appends() {
        assert_eq!(longlat_path(Path::new("out/mesh.obj")), PathBuf::from("out/mesh.obj.longlat"));
        assert_eq!(longlat_path(Path::new("mesh")), PathBuf::from("mesh.longlat"));
    }

    #[test]
    fn test_locate_origin() {
        let params = TransformParameters {
            rotation: Matrix3::identity(),
            translation: Vector3::new(440000.0, 4420000.0, 50.0),
            scale: 1.0,
            projection_command: "+proj=utm +zone=50 +datum=WGS84 +units=m +no_defs".to_string(),
        };

        let origin = locate_origin(&BuiltinEngine, &params).unwrap();
        assert_relative_eq!(origin.longitude, 116.297832424, epsilon = 1e-8);
        assert_relative_eq!(origin.latitude, 39.927982444, epsilon = 1e-8);
        assert_eq!(origin.height, 50.0);
    }

    #[test]
    fn test_locate_origin_without_command_fails() {
        let params = TransformParameters {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
            scale: 1.0,
            projection_command: String::new(),
        };
        let err = locate_origin(&BuiltinEngine, &params).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ProjectionInit);
    }

    #[test]
    fn test_format_origin() {
        let origin = GeographicPoint {
            longitude: 116.5,
            latitude: -39.25,
            height: 0.0,
        };
        assert_eq!(format_origin(&origin, 3), "116.500 -39.250 0.000\n");
    }
}
