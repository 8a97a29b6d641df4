mod config;
mod entries;
mod error;
mod fetcher;
pub mod logging;
mod scraper;
mod siblings;
mod writer;

pub use config::{Config, FetchConfig};
pub use entries::{
    collapse_whitespace, entries_from_texts, extract_entries, list_items, split_sentences,
    EntryRecord, FIELDNAMES,
};
pub use error::{ScrapeError, WriteError};
pub use fetcher::{BasicAuth, Fetcher, Request};
pub use scraper::{
    objectives_entries, syllabus_entries, RunSummary, Scraper, OBJECTIVES_FILE, SYLLABUS_FILE,
};
pub use siblings::{collect_siblings, Section, OBJECTIVES, SYLLABUS};
pub use writer::{append_rows, Row};

pub use select;
