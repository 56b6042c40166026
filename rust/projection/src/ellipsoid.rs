// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference ellipsoids, datums and geocentric conversion

use nalgebra::Vector3;

/// Arc-seconds to radians
const SEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Reference ellipsoid given by semi-major axis and inverse flattening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub a: f64,
    /// Inverse flattening
    pub rf: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 298.257_223_563);
    pub const GRS80: Ellipsoid = Ellipsoid::new(6_378_137.0, 298.257_222_101);
    pub const KRASSOWSKY: Ellipsoid = Ellipsoid::new(6_378_245.0, 298.3);
    pub const INTERNATIONAL: Ellipsoid = Ellipsoid::new(6_378_388.0, 297.0);
    pub const BESSEL: Ellipsoid = Ellipsoid::new(6_377_397.155, 299.152_812_8);
    // a = 6378206.4, b = 6356583.8
    pub const CLARKE_1866: Ellipsoid = Ellipsoid::new(6_378_206.4, 294.978_698_213_898);

    /// Ellipsoid from semi-major axis and inverse flattening
    pub const fn new(a: f64, rf: f64) -> Self {
        Self { a, rf }
    }

    /// Ellipsoid from both semi-axes
    pub fn from_axes(a: f64, b: f64) -> Self {
        Self { a, rf: a / (a - b) }
    }

    /// Look up a PROJ ellipsoid name (`+ellps=`)
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "WGS84" => Some(Self::WGS84),
            "GRS80" => Some(Self::GRS80),
            "krass" => Some(Self::KRASSOWSKY),
            "intl" => Some(Self::INTERNATIONAL),
            "bessel" => Some(Self::BESSEL),
            "clrk66" => Some(Self::CLARKE_1866),
            _ => None,
        }
    }

    /// Flattening
    #[inline]
    pub fn f(&self) -> f64 {
        1.0 / self.rf
    }

    /// Semi-minor axis
    #[inline]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f())
    }

    /// First eccentricity squared
    #[inline]
    pub fn e2(&self) -> f64 {
        let f = self.f();
        f * (2.0 - f)
    }

    /// Geodetic (radians, metres) to earth-centred earth-fixed
    pub fn geodetic_to_ecef(&self, lon: f64, lat: f64, h: f64) -> Vector3<f64> {
        let e2 = self.e2();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = self.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Vector3::new(
            (n + h) * cos_lat * lon.cos(),
            (n + h) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + h) * sin_lat,
        )
    }

    /// Earth-centred earth-fixed to geodetic (radians, metres)
    pub fn ecef_to_geodetic(&self, ecef: &Vector3<f64>) -> (f64, f64, f64) {
        let e2 = self.e2();
        let p = ecef.x.hypot(ecef.y);
        let lon = ecef.y.atan2(ecef.x);

        if p < 1e-9 {
            let lat = std::f64::consts::FRAC_PI_2.copysign(ecef.z);
            return (lon, lat, ecef.z.abs() - self.b());
        }

        let mut lat = ecef.z.atan2(p * (1.0 - e2));
        let mut h = 0.0;
        for _ in 0..16 {
            let sin_lat = lat.sin();
            let n = self.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            h = p / lat.cos() - n;
            let next = ecef.z.atan2(p * (1.0 - e2 * n / (n + h)));
            let done = (next - lat).abs() < 1e-14;
            lat = next;
            if done {
                break;
            }
        }

        (lon, lat, h)
    }
}

/// Seven-parameter datum shift to WGS84 (PROJ `+towgs84`, position vector convention)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Helmert {
    /// Translation in metres
    pub translation: [f64; 3],
    /// Rotation in arc-seconds
    pub rotation: [f64; 3],
    /// Scale difference in parts per million
    pub scale_ppm: f64,
}

impl Helmert {
    /// Identity shift, the datum is WGS84 itself
    pub const IDENTITY: Helmert = Helmert {
        translation: [0.0; 3],
        rotation: [0.0; 3],
        scale_ppm: 0.0,
    };

    /// Build from the 3 or 7 values of a `+towgs84` list
    pub fn from_params(values: &[f64]) -> Option<Self> {
        match *values {
            [dx, dy, dz] => Some(Self {
                translation: [dx, dy, dz],
                ..Self::IDENTITY
            }),
            [dx, dy, dz, rx, ry, rz, s] => Some(Self {
                translation: [dx, dy, dz],
                rotation: [rx, ry, rz],
                scale_ppm: s,
            }),
            _ => None,
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    fn factors(&self) -> (Vector3<f64>, Vector3<f64>, f64) {
        let [dx, dy, dz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        (
            Vector3::new(dx, dy, dz),
            Vector3::new(rx, ry, rz) * SEC_TO_RAD,
            1.0 + self.scale_ppm * 1e-6,
        )
    }

    /// Geocentric coordinates on this datum to WGS84
    pub fn to_wgs84(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let (t, r, m) = self.factors();
        Vector3::new(
            m * (p.x - r.z * p.y + r.y * p.z),
            m * (r.z * p.x + p.y - r.x * p.z),
            m * (-r.y * p.x + r.x * p.y + p.z),
        ) + t
    }

    /// Geocentric WGS84 coordinates to this datum
    pub fn from_wgs84(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let (t, r, m) = self.factors();
        let q = (p - t) / m;
        Vector3::new(
            q.x + r.z * q.y - r.y * q.z,
            -r.z * q.x + q.y + r.x * q.z,
            r.y * q.x - r.x * q.y + q.z,
        )
    }
}

/// Named datum: default ellipsoid and shift to WGS84
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    pub ellipsoid: Ellipsoid,
    pub to_wgs84: Helmert,
}

impl Datum {
    /// Look up a PROJ datum name (`+datum=`)
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "WGS84" => Some(Self {
                ellipsoid: Ellipsoid::WGS84,
                to_wgs84: Helmert::IDENTITY,
            }),
            "NAD83" => Some(Self {
                ellipsoid: Ellipsoid::GRS80,
                to_wgs84: Helmert::IDENTITY,
            }),
            "potsdam" => Some(Self {
                ellipsoid: Ellipsoid::BESSEL,
                to_wgs84: Helmert {
                    translation: [598.1, 73.7, 418.2],
                    rotation: [0.202, 0.045, -2.455],
                    scale_ppm: 6.7,
                },
            }),
            _ => None,
        }
    }
}
