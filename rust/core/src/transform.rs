// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Similarity Transform Parameters
//!
//! Scale, rotation and translation that carry locally modelled mesh
//! coordinates into a projected map frame, plus the projection command
//! describing that frame.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Resolved transform parameters, immutable after resolution
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformParameters {
    /// Rotation matrix (orthonormal by convention, not enforced)
    pub rotation: Matrix3<f64>,
    /// Offset of the local origin in the projected frame
    pub translation: Vector3<f64>,
    /// Uniform scale factor, always > 0
    pub scale: f64,
    /// Source projection definition (empty when no re-projection is requested)
    pub projection_command: String,
}

impl TransformParameters {
    /// Check if a source projection was declared
    #[inline]
    pub fn has_projection(&self) -> bool {
        !self.projection_command.is_empty()
    }

    /// Scaled rotation without translation: `scale * R * p`
    #[inline]
    pub fn apply_similarity(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.scale * (self.rotation * p.coords))
    }

    /// Transform local coordinates to map coordinates: `scale * R * p + t`
    #[inline]
    pub fn local_to_map(&self, p: &Point3<f64>) -> Point3<f64> {
        self.apply_similarity(p) + self.translation
    }

    /// Transform map coordinates back to local coordinates
    ///
    /// Uses the transpose of the rotation, so it is exact only for an
    /// orthonormal rotation.
    #[inline]
    pub fn map_to_local(&self, q: &Point3<f64>) -> Point3<f64> {
        let d = q.coords - self.translation;
        Point3::from(self.rotation.transpose() * d / self.scale)
    }

    /// Undo [`apply_similarity`](Self::apply_similarity) with a true matrix inverse
    ///
    /// Returns `None` if the rotation is singular.
    pub fn invert_similarity(&self, p: &Point3<f64>) -> Option<Point3<f64>> {
        let inverse = self.rotation.try_inverse()?;
        Some(Point3::from(inverse * p.coords / self.scale))
    }

    /// Get 4x4 transformation matrix of `local_to_map`
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut m = (self.rotation * self.scale).to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }
}
