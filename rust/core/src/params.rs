// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter Resolver
//!
//! Locates the `mesh_painting` 1.0 block of a parameter document and
//! extracts the similarity transform and projection command from it.
//!
//! Expected shape:
//!
//! ```xml
//! <module_list>
//!   <module_item>
//!     <module_name>mesh_painting</module_name>
//!     <module_version>1.0</module_version>
//!     <model_projection_param>
//!       <aom_parameters>
//!         <scale>1.0</scale>
//!         <translation>500000 4000000 20</translation>
//!         <rotation>
//!           <row>1 0 0</row>
//!           <row>0 1 0</row>
//!           <row>0 0 1</row>
//!         </rotation>
//!       </aom_parameters>
//!       <dproj_cmd>+proj=utm +zone=50 +datum=WGS84</dproj_cmd>
//!     </model_projection_param>
//!   </module_item>
//! </module_list>
//! ```
//!
//! The first `module_item` that yields a complete group wins. Incomplete
//! groups are skipped, never merged with values from other items.

use crate::document::{Element, ParamDocument};
use crate::error::{Error, Result};
use crate::fast_parse::{parse_exact_reals, parse_real};
use crate::transform::TransformParameters;
use nalgebra::{Matrix3, Vector3};
use std::path::Path;

/// Module identifier honoured by this tool
pub const MODULE_NAME: &str = "mesh_painting";
/// Module version honoured by this tool
pub const MODULE_VERSION: &str = "1.0";

const MODULE_LIST: &str = "module_list";
const MODULE_ITEM: &str = "module_item";

/// Why a candidate block was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    NoProjectionParam,
    NoAomParameters,
    MissingScale,
    InvalidScale,
    BadTranslation,
    BadRotation,
}

/// Resolve transform parameters from a parameter document on disk
pub fn resolve_file(path: impl AsRef<Path>) -> Result<TransformParameters> {
    let doc = ParamDocument::load(path)?;
    resolve(&doc)
}

/// Resolve transform parameters from a parsed document
pub fn resolve(doc: &ParamDocument) -> Result<TransformParameters> {
    let module_list = doc.root(MODULE_LIST).ok_or(Error::MissingRoot(MODULE_LIST))?;

    for (index, item) in module_list.children_named(MODULE_ITEM).enumerate() {
        if !is_target_module(item) {
            continue;
        }

        match read_module(item) {
            Ok(params) => {
                tracing::debug!(
                    index,
                    scale = params.scale,
                    has_projection = params.has_projection(),
                    "Resolved transform parameters"
                );
                return Ok(params);
            }
            Err(reason) => {
                tracing::debug!(index, ?reason, "Skipping incomplete parameter block");
            }
        }
    }

    Err(Error::NoMatchingModule {
        name: MODULE_NAME,
        version: MODULE_VERSION,
    })
}

/// Check name and version; items missing either field never match
fn is_target_module(item: &Element) -> bool {
    matches!(
        (item.child_text("module_name"), item.child_text("module_version")),
        (Some(MODULE_NAME), Some(MODULE_VERSION))
    )
}

fn read_module(item: &Element) -> std::result::Result<TransformParameters, Skip> {
    let mp_param = item
        .first_child("model_projection_param")
        .ok_or(Skip::NoProjectionParam)?;
    let aom = mp_param
        .first_child("aom_parameters")
        .ok_or(Skip::NoAomParameters)?;

    let scale = read_scale(aom)?;
    let translation = aom
        .child_text("translation")
        .and_then(parse_exact_reals::<3>)
        .map(Vector3::from)
        .ok_or(Skip::BadTranslation)?;
    let rotation = aom
        .first_child("rotation")
        .and_then(read_rotation)
        .ok_or(Skip::BadRotation)?;

    let projection_command = mp_param
        .child_text("dproj_cmd")
        .unwrap_or_default()
        .to_string();

    Ok(TransformParameters {
        rotation,
        translation,
        scale,
        projection_command,
    })
}

fn read_scale(aom: &Element) -> std::result::Result<f64, Skip> {
    let text = aom.child_text("scale").ok_or(Skip::MissingScale)?;
    match parse_real(text.as_bytes()) {
        Some(s) if s.is_finite() && s > 0.0 => Ok(s),
        _ => Err(Skip::InvalidScale),
    }
}

/// Read the first three `row` children as matrix rows
fn read_rotation(rotation: &Element) -> Option<Matrix3<f64>> {
    let mut rows = rotation.children_named("row");
    let mut m = Matrix3::zeros();

    for r in 0..3 {
        let values = parse_exact_reals::<3>(rows.next()?.text())?;
        for (c, value) in values.into_iter().enumerate() {
            m[(r, c)] = value;
        }
    }

    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, version: &str, body: &str) -> String {
        format!(
            "<module_item><module_name>{name}</module_name>\
             <module_version>{version}</module_version>{body}</module_item>"
        )
    }

    fn params_body(scale: &str, translation: &str, rows: &[&str], cmd: &str) -> String {
        let rows: String = rows.iter().map(|r| format!("<row>{r}</row>")).collect();
        format!(
            "<model_projection_param><aom_parameters>\
             <scale>{scale}</scale><translation>{translation}</translation>\
             <rotation>{rows}</rotation></aom_parameters>\
             <dproj_cmd>{cmd}</dproj_cmd></model_projection_param>"
        )
    }

    const IDENTITY: [&str; 3] = ["1 0 0", "0 1 0", "0 0 1"];

    fn resolve_str(items: &[String]) -> Result<TransformParameters> {
        let xml = format!("<module_list>{}</module_list>", items.concat());
        resolve(&ParamDocument::parse_str(&xml).unwrap())
    }

    #[test]
    fn test_resolves_complete_block() {
        let body = params_body("2.0", "10 20 30", &IDENTITY, "+proj=utm +zone=50 +datum=WGS84");
        let params = resolve_str(&[item("mesh_painting", "1.0", &body)]).unwrap();

        assert_eq!(params.scale, 2.0);
        assert_eq!(params.translation, Vector3::new(10.0, 20.0, 30.0));
        assert_eq!(params.rotation, Matrix3::identity());
        assert_eq!(params.projection_command, "+proj=utm +zone=50 +datum=WGS84");
    }

    #[test]
    fn test_rotation_rows_are_matrix_rows() {
        let body = params_body("1", "0 0 0", &["0 -1 0", "1 0 0", "0 0 1"], "");
        let params = resolve_str(&[item("mesh_painting", "1.0", &body)]).unwrap();

        assert_eq!(params.rotation[(0, 1)], -1.0);
        assert_eq!(params.rotation[(1, 0)], 1.0);
        assert!(!params.has_projection());
    }

    #[test]
    fn test_missing_dproj_cmd_means_no_projection() {
        let body = "<model_projection_param><aom_parameters><scale>1</scale>\
                    <translation>1 2 3</translation><rotation><row>1 0 0</row>\
                    <row>0 1 0</row><row>0 0 1</row></rotation></aom_parameters>\
                    </model_projection_param>";
        let params = resolve_str(&[item("mesh_painting", "1.0", body)]).unwrap();
        assert_eq!(params.projection_command, "");
    }

    #[test]
    fn test_wrong_name_or_version_fails() {
        let body = params_body("1", "0 0 0", &IDENTITY, "");
        let result = resolve_str(&[
            item("mesh_texturing", "1.0", &body),
            item("mesh_painting", "2.0", &body),
        ]);
        assert!(matches!(result, Err(Error::NoMatchingModule { .. })));
    }

    #[test]
    fn test_item_without_name_is_skipped() {
        let body = params_body("1", "0 0 0", &IDENTITY, "");
        let xml = format!(
            "<module_list><module_item><module_version>1.0</module_version>{body}</module_item></module_list>"
        );
        let result = resolve(&ParamDocument::parse_str(&xml).unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_scale_rejects_block() {
        for scale in ["0", "-1.5", "abc", "nan"] {
            let body = params_body(scale, "0 0 0", &IDENTITY, "");
            let result = resolve_str(&[item("mesh_painting", "1.0", &body)]);
            assert!(result.is_err(), "scale {scale:?} should be rejected");
        }
    }

    #[test]
    fn test_short_translation_rejects_block() {
        let body = params_body("1", "10 20", &IDENTITY, "");
        assert!(resolve_str(&[item("mesh_painting", "1.0", &body)]).is_err());
    }

    #[test]
    fn test_short_rotation_rejects_block() {
        let two_rows = params_body("1", "0 0 0", &["1 0 0", "0 1 0"], "");
        assert!(resolve_str(&[item("mesh_painting", "1.0", &two_rows)]).is_err());

        let short_row = params_body("1", "0 0 0", &["1 0 0", "0 1", "0 0 1"], "");
        assert!(resolve_str(&[item("mesh_painting", "1.0", &short_row)]).is_err());
    }

    #[test]
    fn test_first_complete_block_wins() {
        let incomplete = params_body("-1", "1 1 1", &IDENTITY, "first");
        let second = params_body("2", "2 2 2", &IDENTITY, "second");
        let third = params_body("3", "3 3 3", &IDENTITY, "third");

        let params = resolve_str(&[
            item("mesh_painting", "1.0", &incomplete),
            item("mesh_painting", "1.0", &second),
            item("mesh_painting", "1.0", &third),
        ])
        .unwrap();

        assert_eq!(params.scale, 2.0);
        assert_eq!(params.translation, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(params.projection_command, "second");
    }

    #[test]
    fn test_partial_blocks_are_not_merged() {
        // Scale only in the first block, translation/rotation only in the second
        let scale_only = "<model_projection_param><aom_parameters><scale>2</scale>\
                          </aom_parameters></model_projection_param>";
        let no_scale = "<model_projection_param><aom_parameters>\
                        <translation>1 2 3</translation><rotation><row>1 0 0</row>\
                        <row>0 1 0</row><row>0 0 1</row></rotation></aom_parameters>\
                        </model_projection_param>";

        let result = resolve_str(&[
            item("mesh_painting", "1.0", scale_only),
            item("mesh_painting", "1.0", no_scale),
        ]);
        assert!(matches!(result, Err(Error::NoMatchingModule { .. })));
    }

    #[test]
    fn test_missing_module_list() {
        let doc = ParamDocument::parse_str("<modules/>").unwrap();
        assert!(matches!(resolve(&doc), Err(Error::MissingRoot("module_list"))));
    }
}
