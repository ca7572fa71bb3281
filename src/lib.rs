#![doc(test(attr(deny(warnings))))]

//! Finance Core aggregates expense, income, and investment entries into
//! period totals, category breakdowns, 11-day work periods, and rule-based
//! insights, on top of a repository seam that announces every change.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod insights;
pub mod period;
pub mod storage;
pub mod sync;
pub mod utils;

pub use errors::{FinanceError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and logs startup.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], with an explicit filter taking precedence over `RUST_LOG`.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            "Finance Core tracing initialized."
        );
    });
}
