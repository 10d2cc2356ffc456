use std::io;

use clap::{Args, Subcommand};
use delayscope_data::combinatorics::Calculation;

use crate::{command::Context, report, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct CombinatoricsArg {
    #[command(subcommand)]
    calculation: CalculationArg,
}

#[derive(Debug, Clone, Subcommand)]
enum CalculationArg {
    /// Ordered selections of r out of n: n! / (n-r)!
    Permutation { n: u64, r: u64 },
    /// Unordered selections of r out of n: n! / (r! (n-r)!)
    Combination { n: u64, r: u64 },
    /// Ordered selections with repetition: n^r
    PermutationWithRepetition { n: u64, r: u64 },
    /// Unordered selections with repetition: (n+r-1)! / (r! (n-1)!)
    CombinationWithRepetition { n: u64, r: u64 },
    /// Arrangements of n items around a circle: (n-1)!
    Circular { n: u64 },
    /// Distinct orderings of a multiset given each value's frequency
    Multiset {
        #[arg(value_delimiter = ',', required = true)]
        frequencies: Vec<u64>,
    },
    /// Combinations of the distinct values of a column
    Column { column: String, r: u64 },
}

impl CalculationArg {
    fn calculation(&self) -> Option<Calculation> {
        let calculation = match self {
            Self::Permutation { n, r } => Calculation::Permutation { n: *n, r: *r },
            Self::Combination { n, r } => Calculation::Combination { n: *n, r: *r },
            Self::PermutationWithRepetition { n, r } => {
                Calculation::PermutationWithRepetition { n: *n, r: *r }
            }
            Self::CombinationWithRepetition { n, r } => {
                Calculation::CombinationWithRepetition { n: *n, r: *r }
            }
            Self::Circular { n } => Calculation::CircularPermutation { n: *n },
            Self::Multiset { frequencies } => Calculation::PermutationFromFrequencies {
                frequencies: frequencies.clone(),
            },
            Self::Column { .. } => return None,
        };
        Some(calculation)
    }
}

pub(crate) fn run(arg: &CombinatoricsArg, ctx: &Context) -> anyhow::Result<()> {
    if let CalculationArg::Column { column, r } = &arg.calculation {
        return run_column(column, *r, ctx);
    }
    if let Some(calculation) = arg.calculation.calculation() {
        run_calculation(&calculation, ctx)?;
    }
    Ok(())
}

fn run_column(column: &str, r: u64, ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let analysis = session.analyze_column_combinations(column, r)?;
    let values = session.value_frequencies(column)?;
    util::print_notices(&mut session)?;

    let mut stdout = io::stdout().lock();
    if ctx.json {
        util::write_json(&mut stdout, &analysis)?;
    } else {
        report::write_column_combinations(&mut stdout, &analysis, &values)?;
    }
    Ok(())
}

fn run_calculation(calculation: &Calculation, ctx: &Context) -> anyhow::Result<()> {
    // Pure arithmetic, so the dataset is not loaded.
    let mut session = ctx.detached_session();
    let record = session.combinatorics(calculation)?;
    util::print_notices(&mut session)?;

    let mut stdout = io::stdout().lock();
    if ctx.json {
        util::write_json(&mut stdout, &record)?;
    } else {
        report::write_combinatorics(&mut stdout, calculation, &record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_mapping() {
        let arg = CalculationArg::Multiset {
            frequencies: vec![2, 1],
        };
        assert_eq!(
            arg.calculation(),
            Some(Calculation::PermutationFromFrequencies {
                frequencies: vec![2, 1]
            })
        );
        assert_eq!(
            CalculationArg::Circular { n: 4 }
                .calculation()
                .unwrap()
                .evaluate()
                .unwrap(),
            6
        );
        assert!(
            CalculationArg::Column {
                column: "carrier_name".to_owned(),
                r: 2
            }
            .calculation()
            .is_none()
        );
    }
}
