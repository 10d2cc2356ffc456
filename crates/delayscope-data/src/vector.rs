//! Vector arithmetic between two numeric columns.

use std::fmt::Write as _;

use delayscope_stats::vector::{self, Truncation, VectorOps};
use serde::Serialize;
use tracing::warn;

use crate::{error::AnalysisResult, table::Table};

/// Number of leading elements shown for array-valued results.
pub const PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TruncationInfo {
    pub left_len: usize,
    pub right_len: usize,
    pub used_len: usize,
}

impl From<Truncation> for TruncationInfo {
    fn from(t: Truncation) -> Self {
        Self {
            left_len: t.left_len,
            right_len: t.right_len,
            used_len: t.used_len,
        }
    }
}

/// Results of every vector operation on a pair of columns.
#[derive(Debug, Clone, Serialize)]
pub struct VectorReport {
    pub left_column: String,
    pub right_column: String,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub sum: Vec<f64>,
    pub difference: Vec<f64>,
    pub product: Vec<f64>,
    pub dot: f64,
    pub left_norm: f64,
    pub right_norm: f64,
    pub angle_radians: f64,
    pub angle_degrees: f64,
    pub orthogonal: bool,
    /// Set when the inputs had different lengths and were cut to the shorter one.
    pub truncation: Option<TruncationInfo>,
}

impl VectorReport {
    /// Computes the report for two columns; missing cells count as zero.
    pub fn compute(table: &Table, left_column: &str, right_column: &str) -> AnalysisResult<Self> {
        let zero_filled = |name: &str| -> AnalysisResult<Vec<f64>> {
            Ok(table
                .numeric_column(name)?
                .iter()
                .map(|v| v.unwrap_or(0.0))
                .collect())
        };
        let left = zero_filled(left_column)?;
        let right = zero_filled(right_column)?;
        Self::from_vectors(left_column, right_column, left, right)
    }

    /// Computes the report for two explicit vectors, truncating the longer one.
    pub fn from_vectors(
        left_column: &str,
        right_column: &str,
        mut left: Vec<f64>,
        mut right: Vec<f64>,
    ) -> AnalysisResult<Self> {
        let truncation = vector::truncate_to_common_length(&mut left, &mut right);
        if let Some(t) = truncation {
            warn!(
                left_len = t.left_len,
                right_len = t.right_len,
                used_len = t.used_len,
                "Vectors differ in length; truncated to the shorter one"
            );
        }
        let ops = VectorOps::compute(&left, &right)?;
        Ok(Self {
            left_column: left_column.to_owned(),
            right_column: right_column.to_owned(),
            left,
            right,
            sum: ops.sum,
            difference: ops.difference,
            product: ops.product,
            dot: ops.dot,
            left_norm: ops.left_norm,
            right_norm: ops.right_norm,
            angle_radians: ops.angle_radians,
            angle_degrees: ops.angle_degrees,
            orthogonal: ops.orthogonal,
            truncation: truncation.map(TruncationInfo::from),
        })
    }

    /// Operation name and full textual result, in report order.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        self.rows_with(usize::MAX)
    }

    /// Like [`VectorReport::rows`] with arrays cut to [`PREVIEW_LEN`] elements.
    #[must_use]
    pub fn preview_rows(&self) -> Vec<(&'static str, String)> {
        self.rows_with(PREVIEW_LEN)
    }

    fn rows_with(&self, limit: usize) -> Vec<(&'static str, String)> {
        vec![
            ("Addition", format_array(&self.sum, limit)),
            ("Subtraction", format_array(&self.difference, limit)),
            ("Dot Product", self.dot.to_string()),
            ("Element-wise Multiplication", format_array(&self.product, limit)),
            ("Vector 1 Magnitude", self.left_norm.to_string()),
            ("Vector 2 Magnitude", self.right_norm.to_string()),
            ("Angle (radians)", self.angle_radians.to_string()),
            ("Angle (degrees)", self.angle_degrees.to_string()),
            ("Orthogonal", self.orthogonal.to_string()),
        ]
    }

    #[must_use]
    pub fn left_preview(&self) -> String {
        format_array(&self.left, PREVIEW_LEN)
    }

    #[must_use]
    pub fn right_preview(&self) -> String {
        format_array(&self.right, PREVIEW_LEN)
    }
}

fn format_array(values: &[f64], limit: usize) -> String {
    let mut out = String::from("[");
    for (i, v) in values.iter().take(limit).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{v}");
    }
    if values.len() > limit {
        out.push_str(", ...");
    }
    out.push(']');
    out
}
