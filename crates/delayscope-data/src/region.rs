//! Static classification of airport codes into geographic regions.

use std::{collections::HashMap, sync::LazyLock};

use tracing::debug;

use crate::{
    error::AnalysisResult,
    table::{Column, Table},
};

/// Region assigned to codes absent from [`REGIONS`] and to missing airports.
pub const OTHER_REGION: &str = "Other";

/// Name of the column added by [`categorize_airports`].
pub const REGION_COLUMN: &str = "region";

/// Name of the column read by [`categorize_airports`].
pub const AIRPORT_COLUMN: &str = "airport";

pub const REGIONS: &[(&str, &[&str])] = &[
    (
        "Northeast",
        &[
            "JFK", "LGA", "BOS", "PVD", "BDL", "ALB", "SYR", "ROC", "BGM", "BUF", "HPN", "ABE",
            "EWR", "SWF", "PWM", "BTV", "MVY", "ACK", "HYA",
        ],
    ),
    (
        "Midwest",
        &[
            "ORD", "MDW", "CLE", "CMH", "DAY", "CVG", "IND", "DTW", "GRR", "LAN", "MBS", "MSP",
            "DSM", "CID", "STL", "MCI", "OMA", "FAR", "GFK", "FSD", "BIS", "MOT", "XWA",
        ],
    ),
    (
        "South",
        &[
            "ATL", "CLT", "RDU", "IAD", "DCA", "BWI", "ORF", "RIC", "CHS", "SAV", "JAX", "MCO",
            "TPA", "FLL", "MIA", "PBI", "MEM", "BNA", "HSV", "BHM", "MOB", "MSY", "DAL", "DFW",
            "IAH", "HOU", "OKC", "TUL", "SAT", "AUS", "CRW", "SHV", "MGM", "GSP",
        ],
    ),
    (
        "West",
        &[
            "LAX", "SFO", "SAN", "SJC", "BUR", "ONT", "SMF", "RNO", "LAS", "PHX", "TUS", "SEA",
            "PDX", "BOI", "DEN", "COS", "SLC", "GEG", "MSO", "BZN", "FCA", "HLN", "BIL", "RDM",
        ],
    ),
    (
        "Alaska",
        &[
            "ANC", "FAI", "JNU", "KTN", "SIT", "ADK", "BET", "BRW", "CDV", "OTZ", "OME", "SCC",
            "WRG", "GST", "YAK",
        ],
    ),
    ("Pacific Territories", &["GUM", "SPN", "PPG"]),
];

static AIRPORT_TO_REGION: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    REGIONS
        .iter()
        .flat_map(|(region, codes)| codes.iter().map(move |code| (*code, *region)))
        .collect()
});

/// Region of an airport code, or [`OTHER_REGION`].
///
/// ```
/// # use delayscope_data::region::region_of;
/// assert_eq!(region_of("ATL"), "South");
/// assert_eq!(region_of("ZZZ"), "Other");
/// ```
#[must_use]
pub fn region_of(code: &str) -> &'static str {
    AIRPORT_TO_REGION
        .get(code.trim())
        .copied()
        .unwrap_or(OTHER_REGION)
}

/// Names of every region, including [`OTHER_REGION`] last.
pub fn region_names() -> impl Iterator<Item = &'static str> {
    REGIONS
        .iter()
        .map(|(name, _)| *name)
        .chain([OTHER_REGION])
}

/// Adds (or replaces) the `region` column derived from `airport`.
pub fn categorize_airports(table: &mut Table) -> AnalysisResult<()> {
    let airports = table.column(AIRPORT_COLUMN)?;
    let regions = (0..table.row_count())
        .map(|row| {
            let region = airports
                .category(row)
                .map_or(OTHER_REGION, |code| region_of(&code.to_string()));
            Some(region.to_owned())
        })
        .collect();
    table.set_column(Column::categorical(REGION_COLUMN, regions))?;
    debug!("Added '{REGION_COLUMN}' column");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AnalysisError, table::tests::sample_table};

    #[test]
    fn test_every_code_is_unique() {
        let total = REGIONS.iter().map(|(_, codes)| codes.len()).sum::<usize>();
        assert_eq!(AIRPORT_TO_REGION.len(), total);
    }

    #[test]
    fn test_region_lookup() {
        assert_eq!(region_of("JFK"), "Northeast");
        assert_eq!(region_of("ORD"), "Midwest");
        assert_eq!(region_of("SEA"), "West");
        assert_eq!(region_of("ANC"), "Alaska");
        assert_eq!(region_of("GUM"), "Pacific Territories");
        assert_eq!(region_of("jfk"), OTHER_REGION);
    }

    #[test]
    fn test_categorize_airports() {
        let mut table = sample_table();
        categorize_airports(&mut table).unwrap();
        let regions = (0..table.row_count())
            .map(|row| table.column(REGION_COLUMN).unwrap().display_cell(row))
            .collect::<Vec<_>>();
        assert_eq!(regions, ["South", "Northeast", "Midwest", "Alaska", "Other"]);
    }

    #[test]
    fn test_categorize_requires_airport_column() {
        let mut table = Table::new(vec![Column::numeric("x", vec![Some(1.0)])]).unwrap();
        assert!(matches!(
            categorize_airports(&mut table),
            Err(AnalysisError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_region_names_end_with_other() {
        let names = region_names().collect::<Vec<_>>();
        assert_eq!(names.len(), 7);
        assert_eq!(names.last(), Some(&OTHER_REGION));
    }
}
