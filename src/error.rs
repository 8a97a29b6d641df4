use reqwest::StatusCode;

/// Errors raised while fetching and extracting a course page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Couldn't fetch {url} got: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} for {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Giving up on {url} after {attempts} timed out attempts")]
    RetriesExhausted { url: String, attempts: usize },

    #[error("No {section} section found for course {course}")]
    MissingSection {
        course: String,
        section: &'static str,
    },

    #[error("Invalid heading pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while appending rows to a TSV file.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Row has field {field:?} which is not in fieldnames {fieldnames:?}")]
    UnknownField {
        field: String,
        fieldnames: Vec<String>,
    },

    #[error("Row is missing field {field:?}")]
    MissingField { field: String },
}
