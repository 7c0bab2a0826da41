//! Core module containing the record abstraction and the list engine

pub mod engine;
pub mod error;
pub mod field;
pub mod lenient;
pub mod options;
pub mod query;
pub mod record;
pub mod service;
pub mod stats;
pub mod validation;

pub use engine::{Facet, apply_filters, apply_sort, facets, filter_and_sort, paginate};
pub use error::{
    ConfigError, FetchError, FieldError, ListviewError, ParseError, Result, ValidationError,
};
pub use field::{FieldKind, FieldValue, SortKey};
pub use options::{OptionChoice, OptionGroup, OptionSchema, QuantityTiers};
pub use query::{FilterCriteria, Page, PaginationMeta, SortDirection, SortSpec};
pub use record::Record;
pub use service::{CollectionService, Mutation};
pub use stats::{DerivedStats, compute_stats, compute_stats_at};
