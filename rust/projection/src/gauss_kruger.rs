// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UTM to Gauss-Krüger 3° grid
//!
//! The grid coordinates come from a linear correction of the UTM
//! easting/northing (undoing the 0.9996 scale factor). The 3° zone is
//! derived from the geographic longitude of the uncorrected point and
//! prefixed onto the easting as leading digits.

use crate::definition::{UTM_FALSE_EASTING, UTM_SCALE_FACTOR};
use crate::engine::{to_geographic, ProjectionEngine};
use crate::error::Result;
use nalgebra::Point3;

/// Undo the UTM scale factor around the false easting
#[inline]
pub fn utm_to_transverse_mercator(utm: &Point3<f64>) -> Point3<f64> {
    Point3::new(
        (utm.x - UTM_FALSE_EASTING) / UTM_SCALE_FACTOR + UTM_FALSE_EASTING,
        utm.y / UTM_SCALE_FACTOR,
        utm.z,
    )
}

/// 3° Gauss-Krüger zone number for a longitude in degrees
#[inline]
pub fn gauss_kruger_zone(longitude: f64) -> i32 {
    (((longitude - 1.5) / 3.0).floor() + 1.0).floor() as i32
}

/// Smallest power of ten, at least 10, strictly greater than `gk_x`
pub fn zone_prefix_magnitude(gk_x: f64) -> f64 {
    let mut p: f64 = 10.0;
    while p.is_finite() && gk_x / p >= 1.0 {
        p *= 10.0;
    }
    p
}

/// Prefix the zone number onto an easting as leading digits
#[inline]
pub fn prefix_zone_code(gk_x: f64, zone: i32) -> f64 {
    gk_x + zone_prefix_magnitude(gk_x) * f64::from(zone)
}

/// Convert a UTM point to the Gauss-Krüger 3° grid
///
/// Without a projection command, or with `prefix_zone_code` off, only the
/// linear correction is applied. Otherwise the longitude of `utm` is
/// computed through `engine` to find the zone.
pub fn utm_to_gauss_kruger<E: ProjectionEngine>(
    engine: &E,
    source_command: &str,
    utm: Point3<f64>,
    prefix_zone: bool,
) -> Result<Point3<f64>> {
    let mut gk = utm_to_transverse_mercator(&utm);
    if source_command.trim().is_empty() || !prefix_zone {
        return Ok(gk);
    }

    let geo = to_geographic(engine, source_command, utm)?;
    let zone = gauss_kruger_zone(geo.longitude);
    gk.x = prefix_zone_code(gk.x, zone);

    tracing::trace!(zone, x = gk.x, y = gk.y, "Gauss-Krüger grid position");
    Ok(gk)
}
