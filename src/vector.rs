//! Vector math and tilt decomposition.
//!
//! Pure functions over `Vector3<f64>`. Raw readings are widened with
//! [`Vector3::as_f64`] before use; nothing here rescales them.
//!
//! The tilt angles treat a reading as the projection of gravity onto the
//! device axes. Each angle is the inclination of one axis relative to the
//! plane of the other two.

use crate::error::{Result, SensingError};
use crate::types::{AngleTriple, Vector3};

/// Sum of per-axis products.
pub fn dot_product(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Euclidean length. Zero only for the zero vector.
///
/// Computed with `hypot`, so no intermediate square overflows or
/// underflows.
pub fn magnitude(v: &Vector3<f64>) -> f64 {
    v.x.hypot(v.y).hypot(v.z)
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// Fails with [`SensingError::DegenerateVector`] if either operand has
/// zero (or non-finite) magnitude. Both operands are normalized before
/// the dot product, and the cosine is clamped to `[-1, 1]` since rounding
/// can push it just outside the domain of `acos`.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Result<f64> {
    let unit_a = unit(a)?;
    let unit_b = unit(b)?;
    let cosine = dot_product(&unit_a, &unit_b).clamp(-1.0, 1.0);
    Ok(cosine.acos())
}

fn unit(v: &Vector3<f64>) -> Result<Vector3<f64>> {
    let length = magnitude(v);
    if length == 0.0 || !length.is_finite() {
        return Err(SensingError::DegenerateVector);
    }
    Ok(v.map(|c| c / length))
}

/// Inclination of the x axis: `atan(x / sqrt(y² + z²))`.
pub fn roll(v: &Vector3<f64>) -> Result<f64> {
    let denom = (v.y * v.y + v.z * v.z).sqrt();
    checked_atan(v.x, denom, "roll")
}

/// Inclination of the y axis: `atan(y / sqrt(x² + z²))`.
pub fn pitch(v: &Vector3<f64>) -> Result<f64> {
    let denom = (v.x * v.x + v.z * v.z).sqrt();
    checked_atan(v.y, denom, "pitch")
}

/// The historical "yaw": `atan(sqrt(x² + y²) / z)`.
///
/// This is the angle of the z axis, not a heading. The formula is kept
/// exactly as recorded data was produced with it.
pub fn yaw(v: &Vector3<f64>) -> Result<f64> {
    let num = (v.x * v.x + v.y * v.y).sqrt();
    checked_atan(num, v.z, "yaw")
}

/// All three tilt angles of a gravity-projection vector, in radians.
///
/// Fails with [`SensingError::DivisionByZero`] on the first angle whose
/// denominator is exactly zero. Callers choose whether to skip the sample
/// or abort; no sentinel is substituted here.
pub fn tilt_angles(v: &Vector3<f64>) -> Result<AngleTriple> {
    Ok(AngleTriple::new(roll(v)?, pitch(v)?, yaw(v)?))
}

fn checked_atan(num: f64, denom: f64, angle: &'static str) -> Result<f64> {
    if denom == 0.0 {
        return Err(SensingError::DivisionByZero { angle });
    }
    Ok((num / denom).atan())
}

/// Radians to degrees (`× 180/π`).
pub fn to_degrees(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

/// Degrees to radians (`× π/180`).
pub fn to_radians(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    fn samples() -> Vec<Vector3<f64>> {
        vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-106.0, 15.0, -504.0),
            Vector3::new(18.0, 14.0, -547.0),
            Vector3::new(0.001, -0.002, 0.003),
            Vector3::new(1e6, 3e5, -2e6),
            Vector3::new(512.0, 512.0, 512.0),
        ]
    }

    #[test]
    fn test_dot_product_and_magnitude() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, -5.0, 6.0);
        assert_eq!(dot_product(&a, &b), 12.0);
        assert_eq!(magnitude(&Vector3::new(3.0, 4.0, 0.0)), 5.0);
        assert_eq!(magnitude(&Vector3::default()), 0.0);
    }

    #[test]
    fn test_angle_with_itself_is_zero() {
        for v in samples() {
            let angle = angle_between(&v, &v).unwrap();
            assert!(angle.abs() < 1e-6, "angle({v:?}, itself) = {angle}");
        }
    }

    #[test]
    fn test_angle_with_opposite_is_pi() {
        for v in samples() {
            let angle = angle_between(&v, &-v).unwrap();
            assert!((angle - PI).abs() < 1e-6, "angle({v:?}, -itself) = {angle}");
        }
    }

    #[test]
    fn test_angle_is_symmetric() {
        let all = samples();
        for a in &all {
            for b in &all {
                let ab = angle_between(a, b).unwrap();
                let ba = angle_between(b, a).unwrap();
                assert!((ab - ba).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_angle_between_orthogonal_axes() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 2.0, 0.0);
        assert!((angle_between(&x, &y).unwrap() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_angle_at_extreme_magnitudes() {
        let huge = Vector3::new(1e200, 1e200, 1e200);
        assert!(magnitude(&huge).is_finite());
        assert!(angle_between(&huge, &huge).unwrap().abs() < 1e-6);
        assert!((angle_between(&huge, &-huge).unwrap() - PI).abs() < 1e-6);

        let tiny = Vector3::new(1e-170, 0.0, 0.0);
        assert!(magnitude(&tiny) > 0.0);
        let y = Vector3::new(0.0, 1e-170, 0.0);
        assert!((angle_between(&tiny, &y).unwrap() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_angle_between_non_finite_fails() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let inf = Vector3::new(f64::INFINITY, 0.0, 0.0);
        let nan = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(matches!(angle_between(&inf, &v), Err(SensingError::DegenerateVector)));
        assert!(matches!(angle_between(&v, &nan), Err(SensingError::DegenerateVector)));
    }

    #[test]
    fn test_angle_between_zero_vector_fails() {
        let zero = Vector3::default();
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!(matches!(
            angle_between(&zero, &v),
            Err(SensingError::DegenerateVector)
        ));
        assert!(matches!(
            angle_between(&v, &zero),
            Err(SensingError::DegenerateVector)
        ));
    }

    #[test]
    fn test_tilt_angles_flat_device() {
        // Lying flat: gravity entirely on z.
        let angles = tilt_angles(&Vector3::new(0.0, 0.0, -512.0)).unwrap();
        assert_eq!(angles.roll, 0.0);
        assert_eq!(angles.pitch, 0.0);
        assert_eq!(angles.yaw, 0.0);
    }

    #[test]
    fn test_tilt_angles_diagonal() {
        let angles = tilt_angles(&Vector3::new(1.0, 0.0, 1.0)).unwrap();
        assert!((angles.roll - FRAC_PI_4).abs() < EPS);
        assert_eq!(angles.pitch, 0.0);
        assert!((angles.yaw - FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_tilt_angles_yaw_sign_follows_z() {
        let up = tilt_angles(&Vector3::new(3.0, 4.0, 5.0)).unwrap();
        let down = tilt_angles(&Vector3::new(3.0, 4.0, -5.0)).unwrap();
        assert!(up.yaw > 0.0);
        assert!((up.yaw + down.yaw).abs() < EPS);
    }

    #[test]
    fn test_yaw_division_by_zero() {
        let err = tilt_angles(&Vector3::new(100.0, 50.0, 0.0)).unwrap_err();
        assert!(matches!(err, SensingError::DivisionByZero { angle: "yaw" }));
    }

    #[test]
    fn test_roll_division_by_zero() {
        let err = tilt_angles(&Vector3::new(100.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, SensingError::DivisionByZero { angle: "roll" }));
    }

    #[test]
    fn test_pitch_division_by_zero() {
        let err = pitch(&Vector3::new(0.0, 300.0, 0.0)).unwrap_err();
        assert!(matches!(err, SensingError::DivisionByZero { angle: "pitch" }));
    }

    #[test]
    fn test_degrees_round_trip() {
        for x in [0.0, 1.0, -1.0, 45.0, 180.0, -359.99, 1e-8, 12345.678, 1e9] {
            let back = to_degrees(to_radians(x));
            assert!((back - x).abs() <= 1e-9 * x.abs().max(1.0), "{x} -> {back}");
        }
        assert!((to_degrees(PI) - 180.0).abs() < EPS);
    }
}
