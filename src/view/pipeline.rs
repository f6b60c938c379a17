use rust_decimal::Decimal;

use super::options::{GrowthFilter, SortOption, ViewOptions};
use crate::common::types::{ApiResponse, Strategy};

/// Maximum list length when `only_top` is set
pub const TOP_LIMIT: usize = 10;

/// Entries shown in the preview after the pinned best strategy
pub const PREVIEW_EXTRA: usize = 3;

/// Minimum 7-day APY growth (points) kept by [`GrowthFilter::ApyGrowthGt5`]
fn growth_threshold() -> Decimal {
    Decimal::from(5)
}

// The "new or still small" cut-offs below are product heuristics with no
// documented derivation; keep them as-is.
fn novelty_apy_7d_threshold() -> Decimal {
    Decimal::new(5, 1)
}

fn novelty_tvl_ceiling() -> Decimal {
    Decimal::from(2_000_000)
}

/// Views derived from a single strategy response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyView {
    /// Best strategy as reported by the backend
    pub best: Option<Strategy>,
    /// Filtered and sorted list
    pub filtered: Vec<Strategy>,
    /// Best strategy pinned first, then up to [`PREVIEW_EXTRA`] others
    pub preview: Vec<Strategy>,
    /// Filtered list without the pinned best strategy
    pub table: Vec<Strategy>,
}

impl StrategyView {
    pub fn is_empty(&self) -> bool {
        self.best.is_none() && self.filtered.is_empty()
    }
}

/// Derive every view of `response` for the given options
pub fn derive_view(response: &ApiResponse, options: &ViewOptions) -> StrategyView {
    let best = response.best_strategy().cloned();
    let filtered = apply_view_options(base_strategies(response), options);

    let best_key = best.as_ref().map(Strategy::identity_key);
    let is_best = |s: &Strategy| best_key.as_deref() == Some(s.identity_key().as_str());

    let preview: Vec<Strategy> = match &best {
        Some(pinned) => std::iter::once(pinned.clone())
            .chain(
                filtered
                    .iter()
                    .filter(|&s| !is_best(s))
                    .take(PREVIEW_EXTRA)
                    .cloned(),
            )
            .collect(),
        None => filtered.iter().take(PREVIEW_EXTRA + 1).cloned().collect(),
    };

    let table: Vec<Strategy> = filtered.iter().filter(|&s| !is_best(s)).cloned().collect();

    StrategyView {
        best,
        filtered,
        preview,
        table,
    }
}

/// Owned copy of the response's ranked list
pub fn base_strategies(response: &ApiResponse) -> Vec<Strategy> {
    response.strategies().into_iter().cloned().collect()
}

/// Apply growth/novelty filters, sorting and top-N truncation
pub fn apply_view_options(mut strategies: Vec<Strategy>, options: &ViewOptions) -> Vec<Strategy> {
    if options.growth_filter == GrowthFilter::ApyGrowthGt5 {
        let threshold = growth_threshold();
        strategies.retain(|s| s.apy_7d.is_some_and(|growth| growth >= threshold));
    }

    if options.only_new {
        strategies.retain(is_new_or_small);
    }

    sort_strategies(&mut strategies, options.sort_by);

    if options.only_top {
        take_top(&mut strategies);
    }

    strategies
}

/// Heuristic "new or still small": notable APY growth or TVL under 2M
pub fn is_new_or_small(strategy: &Strategy) -> bool {
    let growing = strategy
        .apy_7d
        .is_some_and(|growth| growth >= novelty_apy_7d_threshold());
    growing || strategy.tvl_or_zero() < novelty_tvl_ceiling()
}

/// Stable descending sort by the selected key
pub fn sort_strategies(strategies: &mut [Strategy], sort_by: SortOption) {
    match sort_by {
        SortOption::Apy => strategies.sort_by(|a, b| b.apy_or_zero().cmp(&a.apy_or_zero())),
        SortOption::Tvl => strategies.sort_by(|a, b| b.tvl_or_zero().cmp(&a.tvl_or_zero())),
        // `None` orders below every value, so missing growth sorts last.
        SortOption::Novelty => strategies.sort_by(|a, b| b.apy_7d.cmp(&a.apy_7d)),
    }
}

/// Truncate to [`TOP_LIMIT`] entries
pub fn take_top(strategies: &mut Vec<Strategy>) {
    strategies.truncate(TOP_LIMIT);
}
