use serde::{Deserialize, Serialize};

use super::cache::CacheKey;
use crate::common::types::RiskLevel;
use crate::view::{GrowthFilter, SortOption, ViewOptions};

/// Normalize a token symbol the way the backend keys it
pub fn normalize_token(token: &str) -> String {
    token.trim().to_uppercase()
}

/// Current strategy filters
///
/// Only `token`, `risk_level` and `include_wrappers` select what is fetched;
/// the remaining fields shape the derived view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub token: String,
    pub risk_level: RiskLevel,
    pub include_wrappers: bool,
    pub sort_by: SortOption,
    pub growth_filter: GrowthFilter,
    pub only_new: bool,
    pub only_top: bool,
    pub auto_fetch_enabled: bool,
    /// Bumped whenever a new fetch cycle should run
    pub request_id: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            token: "ETH".to_string(),
            risk_level: RiskLevel::Medium,
            include_wrappers: true,
            sort_by: SortOption::Apy,
            growth_filter: GrowthFilter::None,
            only_new: false,
            only_top: false,
            auto_fetch_enabled: true,
            request_id: 0,
        }
    }
}

/// Mutations accepted by [`FilterState::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetToken(String),
    SetRiskLevel(RiskLevel),
    SetIncludeWrappers(bool),
    ToggleIncludeWrappers,
    SetSortBy(SortOption),
    SetGrowthFilter(GrowthFilter),
    SetOnlyNew(bool),
    SetOnlyTop(bool),
    SetAutoFetchEnabled(bool),
    /// Request a fetch cycle even with auto-fetch disabled
    TriggerFetch,
}

impl FilterState {
    /// Apply an action, returning true when `request_id` advanced
    pub fn apply(&mut self, action: FilterAction) -> bool {
        let before = self.request_id;
        match action {
            FilterAction::SetToken(token) => {
                self.token = normalize_token(&token);
                self.bump_if_auto();
            }
            FilterAction::SetRiskLevel(risk_level) => {
                self.risk_level = risk_level;
                self.bump_if_auto();
            }
            FilterAction::SetIncludeWrappers(include) => {
                self.include_wrappers = include;
                self.bump_if_auto();
            }
            FilterAction::ToggleIncludeWrappers => {
                self.include_wrappers = !self.include_wrappers;
                self.bump_if_auto();
            }
            FilterAction::SetSortBy(sort_by) => self.sort_by = sort_by,
            FilterAction::SetGrowthFilter(filter) => self.growth_filter = filter,
            FilterAction::SetOnlyNew(value) => self.only_new = value,
            FilterAction::SetOnlyTop(value) => self.only_top = value,
            FilterAction::SetAutoFetchEnabled(value) => {
                self.auto_fetch_enabled = value;
                if value {
                    self.request_id += 1;
                }
            }
            FilterAction::TriggerFetch => self.request_id += 1,
        }
        self.request_id != before
    }

    fn bump_if_auto(&mut self) {
        if self.auto_fetch_enabled {
            self.request_id += 1;
        }
    }

    /// Key of the fetch-relevant projection
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.token, self.risk_level, self.include_wrappers)
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            sort_by: self.sort_by,
            growth_filter: self.growth_filter,
            only_new: self.only_new,
            only_top: self.only_top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let state = FilterState::default();
        assert_eq!(state.token, "ETH");
        assert_eq!(state.risk_level, RiskLevel::Medium);
        assert!(state.include_wrappers);
        assert!(state.auto_fetch_enabled);
        assert_eq!(state.request_id, 0);
    }

    #[test]
    fn test_fetch_fields_bump_request_id() {
        let mut state = FilterState::default();
        assert!(state.apply(FilterAction::SetToken("  usdc ".into())));
        assert_eq!(state.token, "USDC");
        assert!(state.apply(FilterAction::SetRiskLevel(RiskLevel::High)));
        assert!(state.apply(FilterAction::SetIncludeWrappers(false)));
        assert!(state.apply(FilterAction::ToggleIncludeWrappers));
        assert!(state.include_wrappers);
        assert_eq!(state.request_id, 4);
    }

    #[test]
    fn test_view_fields_do_not_bump_request_id() {
        let mut state = FilterState::default();
        assert!(!state.apply(FilterAction::SetSortBy(SortOption::Tvl)));
        assert!(!state.apply(FilterAction::SetGrowthFilter(GrowthFilter::ApyGrowthGt5)));
        assert!(!state.apply(FilterAction::SetOnlyNew(true)));
        assert!(!state.apply(FilterAction::SetOnlyTop(true)));
        assert_eq!(state.request_id, 0);
        assert_eq!(
            state.view_options(),
            ViewOptions {
                sort_by: SortOption::Tvl,
                growth_filter: GrowthFilter::ApyGrowthGt5,
                only_new: true,
                only_top: true,
            }
        );
    }

    #[test]
    fn test_auto_fetch_disabled_suppresses_bumps_until_triggered() {
        let mut state = FilterState::default();
        assert!(!state.apply(FilterAction::SetAutoFetchEnabled(false)));
        assert!(!state.apply(FilterAction::SetToken("btc".into())));
        assert_eq!(state.token, "BTC");
        assert_eq!(state.request_id, 0);

        assert!(state.apply(FilterAction::TriggerFetch));
        assert!(state.apply(FilterAction::SetAutoFetchEnabled(true)));
        assert_eq!(state.request_id, 2);
    }

    #[test]
    fn test_cache_key_ignores_view_fields() {
        let mut a = FilterState::default();
        let mut b = FilterState::default();
        a.apply(FilterAction::SetSortBy(SortOption::Novelty));
        b.apply(FilterAction::SetOnlyTop(true));
        b.apply(FilterAction::SetToken(" eth".into()));
        assert_eq!(a.cache_key(), b.cache_key());
    }
}
