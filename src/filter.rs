//! Relation listing filters
//!
//! A closed set of filter kinds, built by a pure parser from path-style
//! tokens ("filter-for/incomplete", "filter-for/region/01/subregion/011")
//! and applied by pattern matching.

use crate::percent::Percent;
use crate::relation::RelationConfig;

/// Which relations a listing shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RelationFilter {
    /// Everything.
    #[default]
    All,
    /// Only relations that are not fully mapped yet.
    HideComplete,
    /// Only relations in one region.
    Region(String),
    /// Only relations in one subregion of one region.
    Subregion(String, String),
}

impl RelationFilter {
    /// Parse "/"-separated filter tokens. Unknown or incomplete token
    /// sequences fall back to showing everything.
    pub fn parse(tokens: &[&str]) -> Self {
        if tokens.contains(&"incomplete") {
            return Self::HideComplete;
        }
        let value_of = |key: &str| {
            tokens
                .windows(2)
                .find(|w| w[0] == key)
                .map(|w| w[1].to_string())
        };
        let region = value_of("region");
        let subregion = value_of("subregion");
        match (region, subregion) {
            (Some(region), Some(subregion)) => Self::Subregion(region, subregion),
            (Some(region), None) => Self::Region(region),
            _ => Self::All,
        }
    }

    /// Whether a relation passes this filter. Completeness means both
    /// tracked percentages are at 100.
    pub fn matches(&self, config: &RelationConfig, coverage: &[Percent]) -> bool {
        match self {
            Self::All => true,
            Self::HideComplete => !coverage.iter().all(Percent::is_complete),
            Self::Region(region) => config.region == *region,
            Self::Subregion(region, subregion) => {
                config.region == *region && config.subregion == *subregion
            }
        }
    }
}
