//! Derived strategy views
//!
//! Everything here is pure and synchronous: views are recomputed from an
//! already fetched [`ApiResponse`](crate::common::types::ApiResponse) and
//! never cause network traffic.
//!
//! # Pipeline
//!
//! ```text
//! all_strategies | best + alternatives
//!        │
//!        ▼
//! growth filter ──► only-new filter ──► stable sort ──► only-top (10)
//!        │
//!        ▼
//! preview (best pinned + 3)      table (everything but best)
//! ```

mod options;
mod pipeline;

pub use options::{GrowthFilter, SortOption, ViewOptions};

pub use pipeline::{
    apply_view_options, base_strategies, derive_view, is_new_or_small, sort_strategies, take_top,
    StrategyView, PREVIEW_EXTRA, TOP_LIMIT,
};
