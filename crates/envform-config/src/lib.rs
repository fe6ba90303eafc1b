#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File-backed `KEY=VALUE` configuration store and the filter list codec.
//!
//! Layout: `model.rs` (`ConfigMap` and its text form), `store.rs` (`EnvStore` +
//! `EnvFileStore`), `filter.rs` (delimiter-safe list encoding), `fields.rs`
//! (form field catalog), `cron.rs` (cron expression shape checks),
//! `defaults.rs` (canonical default configuration).

pub mod cron;
pub mod defaults;
pub mod error;
pub mod fields;
pub mod filter;
pub mod model;
pub mod store;

pub use cron::{CronCheck, CronPart, CronPartCheck, check_cron};
pub use defaults::{DEFAULT_CONFIG, DEFAULT_ENV_FILE};
pub use error::{ConfigError, ConfigResult};
pub use fields::{FIELD_SPECS, FieldKind, FieldSpec, check_field, field_spec};
pub use filter::{
    DEFAULT_SEPARATOR, EditOutcome, FILTER_KEY, FilterEditError, FilterList,
    SEPARATOR_SEARCH_LIMIT, Separator, decode, delimiter_key, encode, find_unused_separator,
    generate_separator,
};
pub use model::ConfigMap;
pub use store::{EnvFileStore, EnvStore};
