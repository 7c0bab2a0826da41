//! # listview
//!
//! The list engine behind a print-shop admin console: fetch a collection from
//! the backend, then filter, sort, paginate and summarize it on the client.
//!
//! ## Features
//!
//! - **Generic Engine**: one filter/sort/paginate/stats pipeline for every record type
//! - **Reducer State**: a single `ListViewState` updated by `ViewEvent`s
//! - **Stale-Response Guard**: request tokens drop responses that arrive out of order
//! - **Re-fetch After Mutation**: create, update and delete always reload the list
//! - **Typed Option Schema**: configurable product options validated at the boundary
//! - **Pluggable Backends**: in-memory store or REST collections over `reqwest`
//! - **CSV Export**: the filtered set as a quoted CSV file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listview::prelude::*;
//!
//! let config = ConsoleConfig::default_config();
//! let orders = RestCollection::<Order>::from_config(&config, "orders")?;
//! let controller = ListController::new(orders);
//!
//! controller.refresh().await?;
//! controller.dispatch(ViewEvent::SetSearch("alice".into()))?;
//! controller.dispatch(ViewEvent::SetMinPrice(Some(100.0)))?;
//!
//! let snapshot = controller.snapshot()?;
//! println!("{} orders, {} in total", snapshot.stats.count, snapshot.stats.total_value);
//! ```

pub mod analytics;
pub mod config;
pub mod core;
pub mod export;
pub mod resources;
pub mod storage;
pub mod telemetry;
pub mod view;

pub use crate::core::error::{ListviewError, Result};

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        CollectionService, DerivedStats, Facet, FieldKind, FieldValue, FilterCriteria, Mutation,
        OptionChoice, OptionGroup, OptionSchema, Page, PaginationMeta, QuantityTiers, Record,
        SortDirection, SortSpec, apply_filters, apply_sort, compute_stats, facets, paginate,
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, FetchError, ListviewError, ParseError, Result, ValidationError,
    };

    // === View ===
    pub use crate::view::{
        FetchOutcome, ListController, ListSnapshot, ListViewState, LoadState, Notice, ViewEvent,
    };

    // === Resources ===
    pub use crate::resources::{
        Banner, ContactSubmission, Customer, Faq, Order, Review, UserCard, VisitingCard,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryCollection;
    #[cfg(feature = "rest")]
    pub use crate::storage::RestCollection;

    // === Analytics ===
    #[cfg(feature = "rest")]
    pub use crate::analytics::AnalyticsClient;
    pub use crate::analytics::{DayStats, WeekRange};

    // === Config ===
    pub use crate::config::{CollectionEndpoints, ConsoleConfig, UpdateMethod};

    // === Export ===
    pub use crate::export::{CsvExport, to_csv_string, write_csv};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
}
