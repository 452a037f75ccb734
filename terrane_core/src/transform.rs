// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2-D affine transforms classified once at construction.
//!
//! A layer transform is the 2×3 matrix `[[a, c, tx], [b, d, ty]]`. Rather
//! than re-deriving "is this a plain scale?" at every consumer, the
//! classification is resolved when the transform is built and carried as a
//! tagged variant:
//!
//! - [`Identity`](Transform::Identity) — no work anywhere.
//! - [`ScaleTranslate`](Transform::ScaleTranslate) — `b == 0 && c == 0`.
//!   Unlocks the fast path: scale factors map directly onto a layer's
//!   device representation and translation becomes a coordinate offset,
//!   with no matrix math at composite time.
//! - [`General`](Transform::General) — rotation or shear present; carried
//!   as a full [`kurbo::Affine`] and applied pivoted at the layer's center.
//!
//! Composition preserves the variant where it can: two scale-translate
//! transforms compose into a scale-translate without touching the matrix
//! path.

use kurbo::Affine;

/// Determinants with magnitude below this are treated as non-invertible.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// A 2-D affine transform, classified at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    /// The identity transform.
    Identity,
    /// A transform with no rotation or shear (`b == 0 && c == 0`).
    ScaleTranslate {
        /// Horizontal scale factor (`a`).
        sx: f64,
        /// Vertical scale factor (`d`).
        sy: f64,
        /// Horizontal translation in logical points.
        tx: f64,
        /// Vertical translation in logical points.
        ty: f64,
    },
    /// A transform with rotation or shear; applied pivoted at the layer's
    /// center.
    General(Affine),
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self::Identity;

    /// Returns the identity transform.
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::Identity
    }

    /// Builds a transform from raw coefficients `[a, b, c, d, tx, ty]`.
    #[must_use]
    pub fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self::from_affine(Affine::new(coeffs))
    }

    /// Classifies an affine matrix into a [`Transform`] variant.
    ///
    /// Classification is canonical: a scale-translate with unit scales and
    /// zero translation becomes [`Identity`](Self::Identity), so
    /// component-wise equality and variant equality coincide.
    #[must_use]
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, tx, ty] = affine.as_coeffs();
        if b == 0.0 && c == 0.0 {
            Self::scale_translate(a, d, tx, ty)
        } else {
            Self::General(affine)
        }
    }

    /// Builds a pure non-uniform scale.
    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::scale_translate(sx, sy, 0.0, 0.0)
    }

    /// Builds a pure translation.
    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::scale_translate(1.0, 1.0, dx, dy)
    }

    /// Builds a rotation around the origin (radians).
    ///
    /// A multiple of a full turn collapses back to a scale-translate via
    /// classification only when the sine term is exactly zero, which holds
    /// for `0.0` itself.
    #[must_use]
    pub fn rotate(radians: f64) -> Self {
        Self::from_affine(Affine::rotate(radians))
    }

    /// Canonicalizing constructor for the scale-only family.
    fn scale_translate(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        if sx == 1.0 && sy == 1.0 && tx == 0.0 && ty == 0.0 {
            Self::Identity
        } else {
            Self::ScaleTranslate { sx, sy, tx, ty }
        }
    }

    /// Returns whether this is the identity transform.
    #[inline]
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Returns whether this transform has no rotation or shear.
    ///
    /// True for both [`Identity`](Self::Identity) and
    /// [`ScaleTranslate`](Self::ScaleTranslate).
    #[inline]
    #[must_use]
    pub const fn is_scale_only(&self) -> bool {
        !matches!(self, Self::General(_))
    }

    /// Returns the full affine matrix for this transform.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        match self {
            Self::Identity => Affine::IDENTITY,
            Self::ScaleTranslate { sx, sy, tx, ty } => Affine::new([sx, 0.0, 0.0, sy, tx, ty]),
            Self::General(affine) => affine,
        }
    }

    /// Returns the raw coefficients `[a, b, c, d, tx, ty]`.
    #[must_use]
    pub fn as_coeffs(self) -> [f64; 6] {
        self.to_affine().as_coeffs()
    }

    /// Returns a transform applying `self` first, then `other`.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        other * self
    }

    /// Returns the inverse transform.
    ///
    /// A degenerate (non-invertible) transform yields the identity sentinel
    /// rather than a NaN-poisoned matrix; a visually wrong frame beats a
    /// crashed layout pass. The event is logged.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::ScaleTranslate { sx, sy, tx, ty } => {
                if sx.abs() < DEGENERATE_EPSILON || sy.abs() < DEGENERATE_EPSILON {
                    log::warn!("degenerate scale-translate ({sx}, {sy}) treated as identity");
                    Self::Identity
                } else {
                    Self::scale_translate(1.0 / sx, 1.0 / sy, -tx / sx, -ty / sy)
                }
            }
            Self::General(affine) => {
                if affine.determinant().abs() < DEGENERATE_EPSILON {
                    log::warn!("degenerate transform {affine:?} treated as identity");
                    Self::Identity
                } else {
                    Self::from_affine(affine.inverse())
                }
            }
        }
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::Identity
    }
}

impl core::ops::Mul for Transform {
    type Output = Self;

    /// Matrix composition: `a * b` applies `b` first, then `a`.
    ///
    /// The variant is carried through composition — identity short-circuits
    /// and two scale-translates compose component-wise without entering the
    /// matrix path.
    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Identity, t) | (t, Self::Identity) => t,
            (
                Self::ScaleTranslate { sx, sy, tx, ty },
                Self::ScaleTranslate {
                    sx: rsx,
                    sy: rsy,
                    tx: rtx,
                    ty: rty,
                },
            ) => Self::scale_translate(sx * rsx, sy * rsy, sx * rtx + tx, sy * rty + ty),
            (a, b) => Self::from_affine(a.to_affine() * b.to_affine()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default(), Transform::IDENTITY);
        assert!(Transform::identity().is_identity());
    }

    #[test]
    fn unit_scale_canonicalizes_to_identity() {
        assert_eq!(Transform::scale(1.0, 1.0), Transform::Identity);
        assert_eq!(Transform::translate(0.0, 0.0), Transform::Identity);
        assert_eq!(
            Transform::from_coeffs([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            Transform::Identity
        );
    }

    #[test]
    fn zero_shear_classifies_as_scale_translate() {
        let t = Transform::from_coeffs([2.0, 0.0, 0.0, 3.0, 5.0, 7.0]);
        assert_eq!(
            t,
            Transform::ScaleTranslate {
                sx: 2.0,
                sy: 3.0,
                tx: 5.0,
                ty: 7.0,
            }
        );
        assert!(t.is_scale_only());
    }

    #[test]
    fn rotation_classifies_as_general() {
        let t = Transform::rotate(0.5);
        assert!(matches!(t, Transform::General(_)));
        assert!(!t.is_scale_only());
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(Transform::rotate(0.0), Transform::Identity);
    }

    #[test]
    fn coeffs_round_trip() {
        let coeffs = [2.0, 0.0, 0.0, 0.5, -3.0, 4.0];
        assert_eq!(Transform::from_coeffs(coeffs).as_coeffs(), coeffs);
    }

    #[test]
    fn identity_composition_short_circuits() {
        let t = Transform::scale(2.0, 2.0);
        assert_eq!(Transform::Identity * t, t);
        assert_eq!(t * Transform::Identity, t);
    }

    #[test]
    fn scale_translate_composition_stays_on_fast_path() {
        let a = Transform::from_coeffs([2.0, 0.0, 0.0, 2.0, 1.0, 1.0]);
        let b = Transform::from_coeffs([3.0, 0.0, 0.0, 0.5, 4.0, -2.0]);
        let c = a * b;
        assert!(c.is_scale_only());
        // Matches full matrix composition.
        assert_eq!(c.to_affine(), a.to_affine() * b.to_affine());
    }

    #[test]
    fn general_composition_matches_matrix_product() {
        let a = Transform::rotate(0.3);
        let b = Transform::translate(10.0, 5.0);
        let c = a * b;
        let expected = a.to_affine() * b.to_affine();
        let p = Point::new(3.0, 4.0);
        assert_eq!(c.to_affine() * p, expected * p);
    }

    #[test]
    fn then_applies_left_to_right() {
        let scale = Transform::scale(2.0, 2.0);
        let shift = Transform::translate(10.0, 0.0);
        // Scale first, then shift: the origin lands at (10, 0).
        let p = Point::new(1.0, 1.0);
        assert_eq!(scale.then(shift).to_affine() * p, Point::new(12.0, 2.0));
        // Shift first, then scale: the shift is doubled.
        assert_eq!(shift.then(scale).to_affine() * p, Point::new(22.0, 2.0));
    }

    #[test]
    fn scale_translate_inverse() {
        let t = Transform::from_coeffs([2.0, 0.0, 0.0, 4.0, 6.0, -8.0]);
        let inv = t.inverse();
        assert!(inv.is_scale_only());
        assert_eq!(inv * t, Transform::Identity);
        assert_eq!(t * inv, Transform::Identity);
    }

    #[test]
    fn general_inverse_round_trips_points() {
        let t = Transform::rotate(1.0) * Transform::translate(5.0, 6.0);
        let inv = t.inverse();
        let p = Point::new(2.0, -3.0);
        let q = (inv * t).to_affine() * p;
        assert!((q.x - p.x).abs() < 1e-9);
        assert!((q.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inverse_is_identity() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(Transform::scale(0.0, 2.0).inverse(), Transform::Identity);
        let collapsed = Transform::from_coeffs([1.0, 2.0, 1.0, 2.0, 0.0, 0.0]);
        assert_eq!(collapsed.inverse(), Transform::Identity);
    }

    #[test]
    fn identity_inverse_is_identity() {
        assert_eq!(Transform::Identity.inverse(), Transform::Identity);
    }
}
