pub mod analyzer;
pub mod assembler;
pub mod dataset;
pub mod error;
pub mod index;
pub mod pages;
pub mod persist;
pub mod query;

pub use analyzer::{Analyzer, LexiconAnalyzer, PartOfSpeech, Term};
pub use assembler::Assembler;
pub use dataset::{Condition, Dataset, Mutation, Subpage};
pub use error::{Error, Result};
pub use index::{build_index, InvertedIndex};
pub use pages::{dispatch, PageKind, Scraped, SubpageKind};
pub use query::{resolve, DEFAULT_URL};

/// Entry page of the conditions site; the crawl starts here and unmatched queries land here.
pub const HUB_URL: &str = "http://www.nhs.uk/Conditions/Pages/hub.aspx";

/// File name shared by the crawler output and the server input.
pub const DEFAULT_DATASET_FILE: &str = "nhs-conditions.json";
