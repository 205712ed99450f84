//! Corpus loading
//!
//! Rows from a tabular source become tagged [`Document`]s and are embedded
//! into the vector index in rate-limited batches:
//! - [`CorpusLoader::ensure_indexed`] loads once per dataset tag
//! - [`CorpusLoader::resume`] continues a partial load from the stored count
//! - [`CorpusLoader::purge`] removes a dataset tag entirely

pub mod loader;
pub mod source;

pub use loader::CorpusLoader;
pub use loader::LoadOptions;
pub use loader::LoadOutcome;
pub use loader::LoadStats;
pub use loader::LoadStatus;
pub use source::CorpusSource;
pub use source::CsvSource;

use crate::models::Document;
