//! kiezname — batch pipeline and query helpers for Berlin's registered
//! first-name dataset (2012-2022, 12 districts).
//!
//! The pipeline runs loader → assembler → feature deriver once, producing
//! an immutable enriched table. Query functions consume that table
//! read-only; none of them mutate their input.

pub mod assembler;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod query;
pub mod remote;
pub mod schema;
pub mod similarity;

pub use assembler::{assemble, read_corpus, write_corpus};
pub use config::{CorpusConfig, NameFilter};
pub use error::NamesError;
pub use features::{add_features, write_features};
pub use loader::load_names;
pub use query::{
    filter_gender, filter_kiez, filter_names, first_names_only, gender_range, to_timeseries,
    GenderFilter,
};
pub use remote::fetch_features;
pub use similarity::{levenshtein, similar_names};
