use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::errors::ClientError;

/// Ordering applied to the strategy list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Descending APY, missing APY counts as 0
    #[default]
    Apy,
    /// Descending TVL, missing TVL counts as 0
    Tvl,
    /// Descending 7-day APY change, missing values last
    Novelty,
}

impl FromStr for SortOption {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apy" => Ok(SortOption::Apy),
            "tvl" => Ok(SortOption::Tvl),
            "novelty" => Ok(SortOption::Novelty),
            other => Err(ClientError::InvalidInput(format!(
                "unknown sort option '{}', expected apy/tvl/novelty",
                other
            ))),
        }
    }
}

/// Growth filter applied before sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthFilter {
    #[default]
    None,
    /// Keep strategies whose APY grew by at least 5 points over 7 days
    #[serde(rename = "apy_growth_gt_5")]
    ApyGrowthGt5,
}

/// Client-side settings for deriving views; never trigger network activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewOptions {
    pub sort_by: SortOption,
    pub growth_filter: GrowthFilter,
    pub only_new: bool,
    pub only_top: bool,
}
