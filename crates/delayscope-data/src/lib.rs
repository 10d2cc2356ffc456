//! Table loading and analysis operations for delayscope.
//!
//! The [`session::AnalysisSession`] is the entry point used by the CLI: it
//! owns a [`table::Table`] loaded from the input CSV, memoizes statistics in a
//! [`cache::StatCache`], and optionally writes each result to a
//! [`store::ResultStore`].
//!
//! ```
//! use delayscope_data::{session::AnalysisSession, table::Table};
//!
//! let csv = "carrier_name,arr_delay\nA,10\nA,20\nB,30\n";
//! let table = Table::from_csv_reader(csv.as_bytes()).unwrap();
//! let mut session = AnalysisSession::new(table, None);
//!
//! assert_eq!(session.mean("arr_delay").unwrap(), 20.0);
//! assert_eq!(session.unique_count("carrier_name").unwrap(), 2);
//! ```

pub mod cache;
pub mod combinatorics;
pub mod descriptive;
pub mod error;
pub mod probability;
pub mod query;
pub mod region;
pub mod session;
pub mod store;
pub mod table;
pub mod vector;
