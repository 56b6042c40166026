// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection Engine
//!
//! The [`ProjectionEngine`] trait is the seam between the conversion
//! logic and the library that does the cartographic maths. Engines hand
//! out owned handles; a [`ProjectionPair`] holds the source and
//! destination handles for exactly one conversion and releases them when
//! it goes out of scope, on success and on every error path.
//!
//! Engine contract: geographic coordinates are exchanged in radians
//! (longitude, latitude) with the height in metres.

use crate::definition::{ProjectionDef, ProjectionKind, WGS84_LONGLAT};
use crate::error::{Error, Result};
use crate::tmerc::TransverseMercator;
use nalgebra::Point3;

/// Forward/inverse cartographic projection engine
pub trait ProjectionEngine {
    /// Engine-owned projection context; released on drop
    type Handle;

    /// Construct a projection from its definition string
    fn create(&self, definition: &str) -> Result<Self::Handle>;

    /// Check if a projection is geographic long/lat
    fn is_geographic(&self, handle: &Self::Handle) -> bool;

    /// Transform one point from `source` to `destination`
    fn transform(
        &self,
        source: &Self::Handle,
        destination: &Self::Handle,
        point: Point3<f64>,
    ) -> Result<Point3<f64>>;
}

/// Source and destination projections for one conversion
pub struct ProjectionPair<'e, E: ProjectionEngine> {
    engine: &'e E,
    source: E::Handle,
    destination: E::Handle,
    source_definition: String,
}

impl<'e, E: ProjectionEngine> ProjectionPair<'e, E> {
    /// Construct both projections; fails if either definition is unusable
    pub fn new(engine: &'e E, source: &str, destination: &str) -> Result<Self> {
        let source_handle = engine.create(source)?;
        let destination_handle = engine.create(destination)?;
        Ok(Self {
            engine,
            source: source_handle,
            destination: destination_handle,
            source_definition: source.to_string(),
        })
    }

    /// Pair from `source` to geographic WGS84
    pub fn to_wgs84_longlat(engine: &'e E, source: &str) -> Result<Self> {
        Self::new(engine, source, WGS84_LONGLAT)
    }

    /// Fail with a domain error if the source is already geographic
    pub fn require_planar_source(&self) -> Result<()> {
        if self.engine.is_geographic(&self.source) {
            return Err(Error::Domain {
                definition: self.source_definition.clone(),
            });
        }
        Ok(())
    }

    /// Check if the destination is geographic long/lat
    pub fn destination_is_geographic(&self) -> bool {
        self.engine.is_geographic(&self.destination)
    }

    /// Run the engine from source to destination
    pub fn forward(&self, point: Point3<f64>) -> Result<Point3<f64>> {
        self.engine.transform(&self.source, &self.destination, point)
    }
}

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

/// Convert a planar point in `source_command` to WGS84 longitude/latitude
///
/// Fails with [`Error::Init`] if a projection cannot be built (an empty
/// command included), [`Error::Domain`] if the source is geographic and
/// [`Error::Transform`] if the engine fails.
pub fn to_geographic<E: ProjectionEngine>(
    engine: &E,
    source_command: &str,
    point: Point3<f64>,
) -> Result<GeographicPoint> {
    let pair = ProjectionPair::to_wgs84_longlat(engine, source_command)?;
    pair.require_planar_source()?;

    let out = pair.forward(point)?;
    if !pair.destination_is_geographic() {
        return Err(Error::Transform(
            "destination projection is not geographic".to_string(),
        ));
    }

    let geo = GeographicPoint {
        longitude: out.x.to_degrees(),
        latitude: out.y.to_degrees(),
        height: out.z,
    };
    tracing::trace!(
        x = point.x,
        y = point.y,
        longitude = geo.longitude,
        latitude = geo.latitude,
        "Projected to geographic"
    );
    Ok(geo)
}

/// Built-in pure-Rust engine: transverse Mercator / UTM and long/lat
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

/// Handle of the built-in engine
#[derive(Debug, Clone)]
pub struct BuiltinProjection {
    def: ProjectionDef,
    tmerc: Option<TransverseMercator>,
}

impl BuiltinProjection {
    pub fn definition(&self) -> &ProjectionDef {
        &self.def
    }
}

impl ProjectionEngine for BuiltinEngine {
    type Handle = BuiltinProjection;

    fn create(&self, definition: &str) -> Result<BuiltinProjection> {
        let def = ProjectionDef::parse(definition)?;
        let tmerc = match def.kind {
            ProjectionKind::TransverseMercator(params) => {
                Some(TransverseMercator::new(&def.ellipsoid, params))
            }
            ProjectionKind::Geographic => None,
        };
        Ok(BuiltinProjection { def, tmerc })
    }

    fn is_geographic(&self, handle: &BuiltinProjection) -> bool {
        handle.def.is_geographic()
    }

    fn transform(
        &self,
        source: &BuiltinProjection,
        destination: &BuiltinProjection,
        point: Point3<f64>,
    ) -> Result<Point3<f64>> {
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return Err(Error::Transform(format!("non-finite input point {point:?}")));
        }

        let (lon, lat, h) = match &source.tmerc {
            Some(tm) => {
                let (lon, lat) = tm.inverse(point.x, point.y);
                (lon, lat, point.z)
            }
            None => (point.x, point.y, point.z),
        };

        if !(lat.is_finite() && lon.is_finite()) || lat.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(Error::Transform(format!(
                "latitude or longitude exceeded limits for point {point:?}"
            )));
        }

        let (lon, lat, h) = shift_datum(&source.def, &destination.def, lon, lat, h);

        let out = match &destination.tmerc {
            Some(tm) => {
                let (x, y) = tm.forward(lon, lat);
                Point3::new(x, y, h)
            }
            None => Point3::new(lon, lat, h),
        };

        if !(out.x.is_finite() && out.y.is_finite() && out.z.is_finite()) {
            return Err(Error::Transform(format!("non-finite result for point {point:?}")));
        }
        Ok(out)
    }
}

/// Move geodetic coordinates between datums through WGS84 geocentric space
///
/// No shift happens when either side lacks datum information, or when both
/// sides share datum and ellipsoid.
fn shift_datum(
    source: &ProjectionDef,
    destination: &ProjectionDef,
    lon: f64,
    lat: f64,
    h: f64,
) -> (f64, f64, f64) {
    let (Some(from), Some(to)) = (source.datum, destination.datum) else {
        return (lon, lat, h);
    };
    if from == to && source.ellipsoid == destination.ellipsoid {
        return (lon, lat, h);
    }

    let ecef = source.ellipsoid.geodetic_to_ecef(lon, lat, h);
    let target = to.from_wgs84(&from.to_wgs84(&ecef));
    destination.ellipsoid.ecef_to_geodetic(&target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_builtin_utm_to_geographic() {
        let geo = to_geographic(
            &BuiltinEngine,
            "+proj=utm +zone=50 +datum=WGS84",
            Point3::new(440000.0, 4420000.0, 35.0),
        )
        .unwrap();

        assert_relative_eq!(geo.longitude, 116.297832424, epsilon = 1e-8);
        assert_relative_eq!(geo.latitude, 39.927982444, epsilon = 1e-8);
        assert_eq!(geo.height, 35.0);
    }

    #[test]
    fn test_builtin_geographic_round_trip() {
        let engine = BuiltinEngine;
        let utm = engine.create("+proj=utm +zone=50 +south +datum=WGS84").unwrap();
        let ll = engine.create(WGS84_LONGLAT).unwrap();

        let p = Point3::new(612345.678, 7456789.012, 10.0);
        let geo = engine.transform(&utm, &ll, p).unwrap();
        assert!(geo.y < 0.0, "southern hemisphere latitude expected");

        let back = engine.transform(&ll, &utm, geo).unwrap();
        assert_relative_eq!(back, p, epsilon = 1e-6);
    }

    #[test]
    fn test_builtin_datum_shift_moves_point() {
        let engine = BuiltinEngine;
        let gk = engine
            .create("+proj=tmerc +lon_0=9 +k=1 +x_0=3500000 +ellps=bessel +datum=potsdam")
            .unwrap();
        let plain = engine
            .create("+proj=tmerc +lon_0=9 +k=1 +x_0=3500000 +ellps=bessel")
            .unwrap();
        let ll = engine.create(WGS84_LONGLAT).unwrap();

        let p = Point3::new(3_500_000.0, 5_500_000.0, 0.0);
        let shifted = engine.transform(&gk, &ll, p).unwrap();
        let unshifted = engine.transform(&plain, &ll, p).unwrap();

        // Potsdam to WGS84 moves positions by tens of metres
        let dlon = (shifted.x - unshifted.x).to_degrees().abs();
        let dlat = (shifted.y - unshifted.y).to_degrees().abs();
        assert!(dlon > 1e-5 || dlat > 1e-5);
        assert!(dlon < 1e-2 && dlat < 1e-2);
    }

    #[test]
    fn test_to_geographic_errors() {
        let engine = BuiltinEngine;
        let p = Point3::new(440000.0, 4420000.0, 0.0);

        assert!(matches!(to_geographic(&engine, "", p), Err(Error::Init { .. })));
        assert!(matches!(
            to_geographic(&engine, "+proj=longlat +datum=WGS84", p),
            Err(Error::Domain { .. })
        ));
        assert!(matches!(
            to_geographic(&engine, "+proj=utm +zone=50", Point3::new(f64::NAN, 0.0, 0.0)),
            Err(Error::Transform(_))
        ));
    }

    /// Engine that counts live handles
    struct CountingEngine {
        live: Rc<Cell<i32>>,
        fail_destination: bool,
        fail_transform: bool,
        geographic_destination: bool,
    }

    struct CountingHandle {
        live: Rc<Cell<i32>>,
        geographic: bool,
    }

    impl Drop for CountingHandle {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                live: Rc::new(Cell::new(0)),
                fail_destination: false,
                fail_transform: false,
                geographic_destination: true,
            }
        }
    }

    impl ProjectionEngine for CountingEngine {
        type Handle = CountingHandle;

        fn create(&self, definition: &str) -> Result<CountingHandle> {
            let destination = definition == WGS84_LONGLAT;
            if destination && self.fail_destination {
                return Err(Error::init(definition, "refused"));
            }
            self.live.set(self.live.get() + 1);
            Ok(CountingHandle {
                live: self.live.clone(),
                geographic: if destination {
                    self.geographic_destination
                } else {
                    definition.contains("longlat")
                },
            })
        }

        fn is_geographic(&self, handle: &CountingHandle) -> bool {
            handle.geographic
        }

        fn transform(
            &self,
            _source: &CountingHandle,
            _destination: &CountingHandle,
            point: Point3<f64>,
        ) -> Result<Point3<f64>> {
            if self.fail_transform {
                return Err(Error::Transform("engine failure".to_string()));
            }
            Ok(point)
        }
    }

    #[test]
    fn test_handles_released_on_success() {
        let engine = CountingEngine::new();
        to_geographic(&engine, "+proj=utm +zone=50", Point3::origin()).unwrap();
        assert_eq!(engine.live.get(), 0);
    }

    #[test]
    fn test_handles_released_on_every_failure() {
        let mut engine = CountingEngine::new();
        engine.fail_destination = true;
        assert!(matches!(
            to_geographic(&engine, "+proj=utm +zone=50", Point3::origin()),
            Err(Error::Init { .. })
        ));
        assert_eq!(engine.live.get(), 0);

        let engine = CountingEngine::new();
        assert!(matches!(
            to_geographic(&engine, "+proj=longlat", Point3::origin()),
            Err(Error::Domain { .. })
        ));
        assert_eq!(engine.live.get(), 0);

        let mut engine = CountingEngine::new();
        engine.fail_transform = true;
        assert!(matches!(
            to_geographic(&engine, "+proj=utm +zone=50", Point3::origin()),
            Err(Error::Transform(_))
        ));
        assert_eq!(engine.live.get(), 0);

        let mut engine = CountingEngine::new();
        engine.geographic_destination = false;
        assert!(matches!(
            to_geographic(&engine, "+proj=utm +zone=50", Point3::origin()),
            Err(Error::Transform(_))
        ));
        assert_eq!(engine.live.get(), 0);
    }
}
