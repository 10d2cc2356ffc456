//! Numeric kernels for the delayscope flight-delay analysis tool.
//!
//! Everything in this crate operates on plain slices and iterators. Loading
//! data, handling missing values and persisting results are the job of
//! `delayscope-data`.
//!
//! # Modules
//!
//! - [`descriptive`]: mean, median, sample standard deviation, weighted mean
//! - [`percentiles`]: interpolated quantiles and box-plot summaries
//! - [`histogram`]: equal-width binning
//! - [`density`]: Gaussian kernel density estimation
//! - [`crosstab`]: joint counts and joint/conditional probability tables
//! - [`combinatorics`]: exact permutation and combination counts
//! - [`vector`]: elementwise and reduction operations on numeric vectors
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use delayscope_stats::descriptive;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(descriptive::mean(&values), Some(3.0));
//! assert_eq!(descriptive::median(&values), Some(3.0));
//! ```
//!
//! ## Counting selections
//!
//! ```
//! use delayscope_stats::combinatorics;
//!
//! assert_eq!(combinatorics::permutation(5, 2).unwrap(), 20);
//! assert_eq!(combinatorics::combination(5, 2).unwrap(), 10);
//! ```
//!
//! ## Cross-tabulating two variables
//!
//! ```
//! use delayscope_stats::crosstab::CrossTab;
//!
//! let table = CrossTab::from_pairs([("A", "X"), ("A", "Y"), ("B", "X")]);
//! let joint = table.joint_probability(3);
//! assert!((joint.total() - 1.0).abs() < 1e-12);
//! ```

pub mod combinatorics;
pub mod crosstab;
pub mod density;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod vector;
