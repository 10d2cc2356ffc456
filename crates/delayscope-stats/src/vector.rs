//! Vector arithmetic over equal-length numeric sequences.

/// Absolute tolerance below which a dot product or norm is treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum VectorError {
    #[display("Cannot {operation} with a zero vector")]
    ZeroVector { operation: &'static str },
    #[display("Vectors differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
}

/// Record of a length mismatch that was resolved by truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub left_len: usize,
    pub right_len: usize,
    /// Length both vectors were cut down to.
    pub used_len: usize,
}

/// Cuts both vectors to the shorter length.
///
/// Returns the truncation that was applied, if any.
pub fn truncate_to_common_length(
    left: &mut Vec<f64>,
    right: &mut Vec<f64>,
) -> Option<Truncation> {
    if left.len() == right.len() {
        return None;
    }
    let truncation = Truncation {
        left_len: left.len(),
        right_len: right.len(),
        used_len: left.len().min(right.len()),
    };
    left.truncate(truncation.used_len);
    right.truncate(truncation.used_len);
    Some(truncation)
}

fn check_len(left: &[f64], right: &[f64]) -> Result<(), VectorError> {
    if left.len() == right.len() {
        Ok(())
    } else {
        Err(VectorError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        })
    }
}

#[must_use]
pub fn dot(left: &[f64], right: &[f64]) -> f64 {
    left.iter().zip(right).map(|(a, b)| a * b).sum()
}

/// Euclidean norm.
#[must_use]
pub fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// ```
/// # use delayscope_stats::vector::angle;
/// let theta = angle(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
/// assert!((theta.to_degrees() - 90.0).abs() < 1e-12);
/// assert!(angle(&[0.0, 0.0], &[1.0, 0.0]).is_err());
/// ```
pub fn angle(left: &[f64], right: &[f64]) -> Result<f64, VectorError> {
    let (left_norm, right_norm) = (norm(left), norm(right));
    if left_norm < ZERO_TOLERANCE || right_norm < ZERO_TOLERANCE {
        return Err(VectorError::ZeroVector {
            operation: "compute an angle",
        });
    }
    let cosine = (dot(left, right) / left_norm / right_norm).clamp(-1.0, 1.0);
    Ok(cosine.acos())
}

/// Whether the dot product is zero within [`ZERO_TOLERANCE`].
#[must_use]
pub fn is_orthogonal(left: &[f64], right: &[f64]) -> bool {
    dot(left, right).abs() < ZERO_TOLERANCE
}

pub fn unit_vector(v: &[f64]) -> Result<Vec<f64>, VectorError> {
    let n = norm(v);
    if n < ZERO_TOLERANCE {
        return Err(VectorError::ZeroVector {
            operation: "compute a unit vector",
        });
    }
    Ok(v.iter().map(|x| x / n).collect())
}

/// Projection of `v` onto `onto`.
pub fn projection(v: &[f64], onto: &[f64]) -> Result<Vec<f64>, VectorError> {
    check_len(v, onto)?;
    let denom = dot(onto, onto);
    if denom.abs() < ZERO_TOLERANCE {
        return Err(VectorError::ZeroVector {
            operation: "project onto",
        });
    }
    let scale = dot(v, onto) / denom;
    Ok(onto.iter().map(|x| x * scale).collect())
}

/// Vector from `origin` to `point`.
pub fn position_vector(origin: &[f64], point: &[f64]) -> Result<Vec<f64>, VectorError> {
    check_len(origin, point)?;
    Ok(point.iter().zip(origin).map(|(p, o)| p - o).collect())
}

/// Elementwise and reduction results for a pair of equal-length vectors.
#[derive(Debug, Clone)]
pub struct VectorOps {
    pub sum: Vec<f64>,
    pub difference: Vec<f64>,
    pub product: Vec<f64>,
    pub dot: f64,
    pub left_norm: f64,
    pub right_norm: f64,
    pub angle_radians: f64,
    pub angle_degrees: f64,
    pub orthogonal: bool,
}

impl VectorOps {
    /// Computes every operation at once.
    ///
    /// Fails if the lengths differ or either vector is (nearly) zero, since
    /// the angle is undefined in that case.
    ///
    /// ```
    /// # use delayscope_stats::vector::VectorOps;
    /// let ops = VectorOps::compute(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
    /// assert_eq!(ops.dot, 0.0);
    /// assert!(ops.orthogonal);
    /// assert!((ops.angle_degrees - 90.0).abs() < 1e-12);
    /// ```
    pub fn compute(left: &[f64], right: &[f64]) -> Result<Self, VectorError> {
        check_len(left, right)?;
        let angle_radians = angle(left, right)?;
        Ok(Self {
            sum: left.iter().zip(right).map(|(a, b)| a + b).collect(),
            difference: left.iter().zip(right).map(|(a, b)| a - b).collect(),
            product: left.iter().zip(right).map(|(a, b)| a * b).collect(),
            dot: dot(left, right),
            left_norm: norm(left),
            right_norm: norm(right),
            angle_radians,
            angle_degrees: angle_radians.to_degrees(),
            orthogonal: is_orthogonal(left, right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_with_self_is_norm_squared() {
        let v = [3.0, -4.0, 12.0];
        assert!((dot(&v, &v) - norm(&v).powi(2)).abs() < 1e-9);
        assert_eq!(norm(&v), 13.0);
    }

    #[test]
    fn test_angle_with_self_is_zero() {
        let v = [0.3, 1.7, 2.9, 4.1];
        assert!(angle(&v, &v).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors() {
        let theta = angle(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((theta - std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonality_matches_dot_tolerance() {
        assert!(is_orthogonal(&[1.0, 1.0], &[1.0, -1.0]));
        assert!(is_orthogonal(&[1e-5, 0.0], &[1e-5, 0.0]));
        assert!(!is_orthogonal(&[1.0, 1.0], &[1.0, 0.0]));
    }

    #[test]
    fn test_truncation() {
        let mut left = vec![1.0, 2.0, 3.0];
        let mut right = vec![4.0, 5.0];
        let truncation = truncate_to_common_length(&mut left, &mut right).unwrap();
        assert_eq!(
            truncation,
            Truncation {
                left_len: 3,
                right_len: 2,
                used_len: 2
            }
        );
        assert_eq!(left, vec![1.0, 2.0]);

        let ops = VectorOps::compute(&left, &right).unwrap();
        assert_eq!(ops.sum, vec![5.0, 7.0]);
        assert_eq!(ops.difference, vec![-3.0, -3.0]);
        assert_eq!(ops.product, vec![4.0, 10.0]);
        assert_eq!(ops.dot, 14.0);
    }

    #[test]
    fn test_no_truncation_for_equal_lengths() {
        let mut left = vec![1.0];
        let mut right = vec![2.0];
        assert!(truncate_to_common_length(&mut left, &mut right).is_none());
    }

    #[test]
    fn test_zero_vector_errors() {
        assert!(matches!(
            VectorOps::compute(&[0.0, 0.0], &[1.0, 2.0]),
            Err(VectorError::ZeroVector { .. })
        ));
        assert!(unit_vector(&[0.0, 0.0]).is_err());
        assert!(projection(&[1.0, 2.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_angle_checks_each_norm() {
        let theta = angle(&[1e-5, 0.0], &[0.0, 1e-5]).unwrap();
        assert!((theta.to_degrees() - 90.0).abs() < 1e-9);
        assert!(matches!(
            angle(&[1e-9], &[1e9]),
            Err(VectorError::ZeroVector { .. })
        ));
    }

    #[test]
    fn test_unit_projection_position() {
        let unit = unit_vector(&[3.0, 4.0]).unwrap();
        assert!((unit[0] - 0.6).abs() < 1e-12);
        assert!((unit[1] - 0.8).abs() < 1e-12);

        let proj = projection(&[2.0, 3.0], &[1.0, 0.0]).unwrap();
        assert_eq!(proj, vec![2.0, 0.0]);

        assert_eq!(
            position_vector(&[1.0, 1.0], &[4.0, 5.0]).unwrap(),
            vec![3.0, 4.0]
        );
        assert!(position_vector(&[1.0], &[1.0, 2.0]).is_err());
    }
}
