// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection Definitions
//!
//! Parses PROJ.4-style definition strings such as
//! `+proj=utm +zone=50 +datum=WGS84 +units=m +no_defs` into a typed
//! [`ProjectionDef`]. The `EPSG:326zz`, `EPSG:327zz` (WGS84 / UTM) and
//! `EPSG:4326` shorthands are accepted as well.
//!
//! Keys that do not change the maths (`+no_defs`, `+type=crs`, ...) are
//! ignored, as PROJ ignores them.

use crate::ellipsoid::{Datum, Ellipsoid, Helmert};
use crate::error::{Error, Result};

/// Destination of every conversion: geographic long/lat on WGS84
pub const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +ellps=WGS84";

/// UTM scale factor on the central meridian
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing on the southern hemisphere
pub const UTM_SOUTH_FALSE_NORTHING: f64 = 10_000_000.0;

/// Transverse Mercator parameters (angles in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TmercParams {
    pub lat_0: f64,
    pub lon_0: f64,
    pub k_0: f64,
    pub x_0: f64,
    pub y_0: f64,
}

impl TmercParams {
    /// Parameters of a UTM zone (1..=60)
    pub fn utm(zone: u8, south: bool) -> Self {
        Self {
            lat_0: 0.0,
            lon_0: (f64::from(zone) * 6.0 - 183.0).to_radians(),
            k_0: UTM_SCALE_FACTOR,
            x_0: UTM_FALSE_EASTING,
            y_0: if south { UTM_SOUTH_FALSE_NORTHING } else { 0.0 },
        }
    }
}

/// Kind of coordinate system a definition describes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    /// Geographic longitude/latitude
    Geographic,
    /// Planar transverse Mercator (UTM is a special case)
    TransverseMercator(TmercParams),
}

/// Parsed projection definition
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionDef {
    pub kind: ProjectionKind,
    pub ellipsoid: Ellipsoid,
    /// Shift to WGS84; `None` when no datum information was given
    pub datum: Option<Helmert>,
}

impl ProjectionDef {
    /// Parse a definition string
    pub fn parse(definition: &str) -> Result<Self> {
        let trimmed = definition.trim();
        if trimmed.is_empty() {
            return Err(Error::init(definition, "empty projection definition"));
        }

        if let Some(code) = epsg_code(trimmed) {
            return Self::from_epsg(definition, code);
        }

        let params = Params::parse(trimmed);

        if let Some(init) = params.value("init") {
            let code = init
                .strip_prefix("epsg:")
                .or_else(|| init.strip_prefix("EPSG:"))
                .ok_or_else(|| Error::init(definition, format!("unsupported init file `{init}`")))?;
            return Self::from_epsg(definition, code);
        }

        if let Some(units) = params.value("units") {
            if units != "m" {
                return Err(Error::init(definition, format!("unsupported units `{units}`")));
            }
        }
        if let Some(pm) = params.value("pm") {
            if pm != "greenwich" && params.number(definition, "pm")? != Some(0.0) {
                return Err(Error::init(definition, format!("unsupported prime meridian `{pm}`")));
            }
        }

        let (ellipsoid, datum) = ellipsoid_and_datum(definition, &params)?;

        let proj = params
            .value("proj")
            .ok_or_else(|| Error::init(definition, "missing +proj"))?;

        let kind = match proj {
            "longlat" | "latlong" | "lonlat" | "latlon" => ProjectionKind::Geographic,
            "utm" => {
                let zone = params
                    .number(definition, "zone")?
                    .ok_or_else(|| Error::init(definition, "utm requires +zone"))?;
                if zone.fract() != 0.0 || !(1.0..=60.0).contains(&zone) {
                    return Err(Error::init(definition, format!("invalid utm zone {zone}")));
                }
                ProjectionKind::TransverseMercator(TmercParams::utm(zone as u8, params.has("south")))
            }
            "tmerc" | "etmerc" => {
                let k_0 = match params.number(definition, "k_0")? {
                    Some(k) => Some(k),
                    None => params.number(definition, "k")?,
                };
                ProjectionKind::TransverseMercator(TmercParams {
                    lat_0: params.number(definition, "lat_0")?.unwrap_or(0.0).to_radians(),
                    lon_0: params.number(definition, "lon_0")?.unwrap_or(0.0).to_radians(),
                    k_0: k_0.unwrap_or(1.0),
                    x_0: params.number(definition, "x_0")?.unwrap_or(0.0),
                    y_0: params.number(definition, "y_0")?.unwrap_or(0.0),
                })
            }
            other => {
                return Err(Error::init(definition, format!("unsupported projection `{other}`")));
            }
        };

        Ok(Self {
            kind,
            ellipsoid,
            datum,
        })
    }

    fn from_epsg(definition: &str, code: &str) -> Result<Self> {
        let code: u32 = code
            .parse()
            .map_err(|_| Error::init(definition, format!("invalid EPSG code `{code}`")))?;

        let kind = match code {
            4326 => ProjectionKind::Geographic,
            32601..=32660 => ProjectionKind::TransverseMercator(TmercParams::utm((code - 32600) as u8, false)),
            32701..=32760 => ProjectionKind::TransverseMercator(TmercParams::utm((code - 32700) as u8, true)),
            _ => return Err(Error::init(definition, format!("unsupported EPSG code {code}"))),
        };

        Ok(Self {
            kind,
            ellipsoid: Ellipsoid::WGS84,
            datum: Some(Helmert::IDENTITY),
        })
    }

    /// Check if this definition is geographic long/lat
    #[inline]
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, ProjectionKind::Geographic)
    }
}

/// Quick kind check without full parsing
///
/// Used by engines that hand the definition to another library and only
/// need to know whether it describes long/lat.
pub fn is_geographic_definition(definition: &str) -> bool {
    let trimmed = definition.trim();
    if let Some(code) = epsg_code(trimmed) {
        return code == "4326";
    }
    matches!(
        Params::parse(trimmed).value("proj"),
        Some("longlat" | "latlong" | "lonlat" | "latlon")
    )
}

fn epsg_code(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("EPSG:")
        .or_else(|| trimmed.strip_prefix("epsg:"))
        .map(str::trim)
}

fn ellipsoid_and_datum(definition: &str, params: &Params<'_>) -> Result<(Ellipsoid, Option<Helmert>)> {
    let named_datum = match params.value("datum") {
        Some(name) => Some(
            Datum::by_name(name)
                .ok_or_else(|| Error::init(definition, format!("unknown datum `{name}`")))?,
        ),
        None => None,
    };

    let mut ellipsoid = match params.value("ellps") {
        Some(name) => Ellipsoid::by_name(name)
            .ok_or_else(|| Error::init(definition, format!("unknown ellipsoid `{name}`")))?,
        None => named_datum.map_or(Ellipsoid::WGS84, |d| d.ellipsoid),
    };

    if let Some(a) = params.number(definition, "a")? {
        ellipsoid.a = a;
    }
    if let Some(rf) = params.number(definition, "rf")? {
        ellipsoid.rf = rf;
    } else if let Some(b) = params.number(definition, "b")? {
        ellipsoid = Ellipsoid::from_axes(ellipsoid.a, b);
    }
    if !(ellipsoid.a > 0.0 && ellipsoid.rf > 1.0) {
        return Err(Error::init(definition, "invalid ellipsoid parameters"));
    }

    let datum = match params.value("towgs84") {
        Some(list) => {
            let values = list
                .split(',')
                .map(|v| v.trim().parse::<f64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| Error::init(definition, format!("invalid +towgs84 `{list}`")))?;
            Some(Helmert::from_params(&values).ok_or_else(|| {
                Error::init(definition, "+towgs84 needs 3 or 7 parameters")
            })?)
        }
        None => named_datum.map(|d| d.to_wgs84),
    };

    Ok((ellipsoid, datum))
}

/// `+key=value` / `+flag` list, first occurrence wins
struct Params<'a> {
    entries: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Params<'a> {
    fn parse(definition: &'a str) -> Self {
        let entries = definition
            .split_whitespace()
            .map(|token| token.trim_start_matches('+'))
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            })
            .collect();
        Self { entries }
    }

    fn get(&self, key: &str) -> Option<Option<&'a str>> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn value(&self, key: &str) -> Option<&'a str> {
        self.get(key).flatten()
    }

    fn number(&self, definition: &str, key: &str) -> Result<Option<f64>> {
        match self.value(key) {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| Error::init(definition, format!("invalid +{key} value `{raw}`"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmerc(def: &ProjectionDef) -> TmercParams {
        match def.kind {
            ProjectionKind::TransverseMercator(p) => p,
            ProjectionKind::Geographic => panic!("expected transverse mercator"),
        }
    }

    #[test]
    fn test_parse_utm() {
        let def = ProjectionDef::parse("+proj=utm +zone=50 +datum=WGS84 +units=m +no_defs").unwrap();
        let p = tmerc(&def);

        assert!((p.lon_0.to_degrees() - 117.0).abs() < 1e-12);
        assert_eq!(p.k_0, 0.9996);
        assert_eq!(p.x_0, 500000.0);
        assert_eq!(p.y_0, 0.0);
        assert_eq!(def.ellipsoid, Ellipsoid::WGS84);
        assert_eq!(def.datum, Some(Helmert::IDENTITY));
    }

    #[test]
    fn test_parse_utm_south() {
        let def = ProjectionDef::parse("+proj=utm +zone=33 +south +ellps=GRS80").unwrap();
        let p = tmerc(&def);
        assert_eq!(p.y_0, 10_000_000.0);
        assert!((p.lon_0.to_degrees() - 15.0).abs() < 1e-12);
        assert_eq!(def.ellipsoid, Ellipsoid::GRS80);
        assert_eq!(def.datum, None);
    }

    #[test]
    fn test_parse_tmerc_gauss_kruger() {
        let def = ProjectionDef::parse(
            "+proj=tmerc +lat_0=0 +lon_0=117 +k=1 +x_0=500000 +y_0=0 +ellps=krass +towgs84=15.8,-154.4,-82.3 +units=m",
        )
        .unwrap();
        let p = tmerc(&def);

        assert_eq!(p.k_0, 1.0);
        assert_eq!(def.ellipsoid, Ellipsoid::KRASSOWSKY);
        assert_eq!(def.datum.unwrap().translation, [15.8, -154.4, -82.3]);
    }

    #[test]
    fn test_parse_geographic() {
        let def = ProjectionDef::parse(WGS84_LONGLAT).unwrap();
        assert!(def.is_geographic());
        assert!(ProjectionDef::parse("+proj=latlong +ellps=WGS84").unwrap().is_geographic());
    }

    #[test]
    fn test_parse_epsg_shorthand() {
        let north = ProjectionDef::parse("EPSG:32650").unwrap();
        assert!((tmerc(&north).lon_0.to_degrees() - 117.0).abs() < 1e-12);

        let south = ProjectionDef::parse("+init=epsg:32733").unwrap();
        assert_eq!(tmerc(&south).y_0, 10_000_000.0);

        assert!(ProjectionDef::parse("EPSG:4326").unwrap().is_geographic());
        assert!(ProjectionDef::parse("EPSG:3857").is_err());
    }

    #[test]
    fn test_invalid_definitions() {
        for def in [
            "",
            "   ",
            "+zone=50",
            "+proj=merc",
            "+proj=utm",
            "+proj=utm +zone=61",
            "+proj=utm +zone=abc",
            "+proj=utm +zone=50 +ellps=unknown",
            "+proj=utm +zone=50 +datum=unknown",
            "+proj=utm +zone=50 +units=ft",
            "+proj=tmerc +towgs84=1,2",
        ] {
            let result = ProjectionDef::parse(def);
            assert!(
                matches!(result, Err(Error::Init { .. })),
                "definition {def:?} should fail to initialize"
            );
        }
    }

    #[test]
    fn test_is_geographic_definition() {
        assert!(is_geographic_definition(WGS84_LONGLAT));
        assert!(is_geographic_definition("EPSG:4326"));
        assert!(!is_geographic_definition("+proj=utm +zone=50"));
        assert!(!is_geographic_definition(""));
    }
}
