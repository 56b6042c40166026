// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transverse Mercator
//!
//! Krüger series to sixth order in the third flattening `n`, after
//! Karney (2011), "Transverse Mercator with an accuracy of a few
//! nanometers". Within a UTM zone the error is far below a millimetre.
//! The inverse recovers latitude from the conformal latitude by Newton
//! iteration.

use crate::definition::TmercParams;
use crate::ellipsoid::Ellipsoid;

const ORDER: usize = 6;

/// Prepared transverse Mercator projection for one ellipsoid
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    e: f64,
    e2: f64,
    /// Rectifying radius
    big_a: f64,
    alpha: [f64; ORDER],
    beta: [f64; ORDER],
    params: TmercParams,
    /// Scaled northing of the latitude of origin
    y_origin: f64,
}

impl TransverseMercator {
    pub fn new(ellipsoid: &Ellipsoid, params: TmercParams) -> Self {
        let f = ellipsoid.f();
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let big_a = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        let e2 = ellipsoid.e2();
        let mut tm = Self {
            e: e2.sqrt(),
            e2,
            big_a,
            alpha,
            beta,
            params,
            y_origin: 0.0,
        };
        if params.lat_0 != 0.0 {
            let (_, xi) = tm.gauss_krueger(0.0, params.lat_0);
            tm.y_origin = params.k_0 * big_a * xi;
        }
        tm
    }

    /// Geographic (radians) to projected easting/northing
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (eta, xi) = self.gauss_krueger(lon - self.params.lon_0, lat);
        let k = self.params.k_0 * self.big_a;
        (
            self.params.x_0 + k * eta,
            self.params.y_0 + k * xi - self.y_origin,
        )
    }

    /// Projected easting/northing to geographic (radians)
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let k = self.params.k_0 * self.big_a;
        let xi = (y - self.params.y_0 + self.y_origin) / k;
        let eta = (x - self.params.x_0) / k;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let m = 2.0 * (j + 1) as f64;
            xi_p -= b * (m * xi).sin() * (m * eta).cosh();
            eta_p -= b * (m * xi).cos() * (m * eta).sinh();
        }

        let tau_p = xi_p.sin() / (eta_p.sinh().powi(2) + xi_p.cos().powi(2)).sqrt();
        let lam = eta_p.sinh().atan2(xi_p.cos());
        let lat = self.tau_from_conformal(tau_p).atan();

        (normalize_lon(self.params.lon_0 + lam), lat)
    }

    /// Unscaled (eta, xi) for a longitude relative to the central meridian
    fn gauss_krueger(&self, lam: f64, lat: f64) -> (f64, f64) {
        let tau_p = self.conformal_tau(lat.tan());
        let (sin_lam, cos_lam) = lam.sin_cos();

        let xi_p = tau_p.atan2(cos_lam);
        let eta_p = (sin_lam / (tau_p * tau_p + cos_lam * cos_lam).sqrt()).asinh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let m = 2.0 * (j + 1) as f64;
            xi += a * (m * xi_p).sin() * (m * eta_p).cosh();
            eta += a * (m * xi_p).cos() * (m * eta_p).sinh();
        }
        (eta, xi)
    }

    /// tan of the conformal latitude for tan of the geodetic latitude
    fn conformal_tau(&self, tau: f64) -> f64 {
        let sigma = (self.e * (self.e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
    }

    /// Invert `conformal_tau` by Newton iteration
    fn tau_from_conformal(&self, tau_p: f64) -> f64 {
        let mut tau = tau_p;
        for _ in 0..16 {
            let tau_i = self.conformal_tau(tau);
            let delta = (tau_p - tau_i) / (1.0 + tau_i * tau_i).sqrt()
                * (1.0 + (1.0 - self.e2) * tau * tau)
                / ((1.0 - self.e2) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }
        tau
    }
}

/// Wrap a longitude into (-pi, pi]
fn normalize_lon(lon: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
