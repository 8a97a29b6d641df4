use std::path::{Path, PathBuf};

use anyhow::Result;
use futures::{stream, StreamExt};
use select::document::Document;

use crate::config::Config;
use crate::entries::{extract_entries, list_items, EntryRecord, FIELDNAMES};
use crate::error::ScrapeError;
use crate::fetcher::{Fetcher, Request};
use crate::siblings::{OBJECTIVES, SYLLABUS};
use crate::writer::append_rows;

pub const SYLLABUS_FILE: &str = "syllabus.tsv";
pub const OBJECTIVES_FILE: &str = "objectives.tsv";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub courses: usize,
    pub syllabus_rows: usize,
    pub objectives_rows: usize,
}

pub struct Scraper {
    config: Config,
    fetcher: Fetcher,
    output_dir: PathBuf,
}

impl Scraper {
    pub fn new<P: Into<PathBuf>>(config: Config, output_dir: P) -> Result<Self> {
        let fetcher = Fetcher::new(&config.fetch)?;
        Ok(Self {
            config,
            fetcher,
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Scrapes every configured course, appending rows in configuration order.
    ///
    /// The first failing course aborts the run, rows of previous courses stay
    /// on disk.
    pub async fn run(&self) -> Result<RunSummary> {
        let courses = self
            .config
            .pairs()
            .map(|(stream, course)| {
                let url = self.config.course_url(course)?;
                Ok::<_, anyhow::Error>((stream, course, url))
            })
            .collect::<Result<Vec<_>>>()?;

        let request = &Request::default();
        let mut pages = stream::iter(courses)
            .map(|(stream, course, url)| async move {
                log::info!("Fetching {stream}/{course} from {url}");
                let page = self.fetcher.fetch_text(&url, request).await;
                (stream, course, page)
            })
            .buffered(self.config.fetch.concurrent_downloads);

        let mut summary = RunSummary::default();
        while let Some((stream, course, page)) = pages.next().await {
            let doc = Document::from(page?.as_str());

            let syllabus = syllabus_entries(stream, course, &doc)?;
            append_rows(self.output_dir.join(SYLLABUS_FILE), &FIELDNAMES, &syllabus)?;

            let objectives = objectives_entries(stream, course, &doc)?;
            append_rows(self.output_dir.join(OBJECTIVES_FILE), &FIELDNAMES, &objectives)?;

            log::info!(
                "Wrote {} syllabus and {} objectives entries for {stream}/{course}",
                syllabus.len(),
                objectives.len()
            );
            summary.courses += 1;
            summary.syllabus_rows += syllabus.len();
            summary.objectives_rows += objectives.len();
        }

        log::info!(
            "Scraped {} courses: {} syllabus and {} objectives entries",
            summary.courses,
            summary.syllabus_rows,
            summary.objectives_rows
        );
        Ok(summary)
    }
}

/// Entries of the first container following the syllabus heading.
pub fn syllabus_entries(
    stream: &str,
    course: &str,
    doc: &Document,
) -> Result<Vec<EntryRecord>, ScrapeError> {
    let siblings = SYLLABUS.collect(doc)?;
    let container = siblings.first().ok_or_else(|| ScrapeError::MissingSection {
        course: course.to_string(),
        section: SYLLABUS.name,
    })?;
    Ok(extract_entries(stream, course, list_items(container)))
}

/// Entries of the objectives section.
///
/// When the heading is followed by several elements the first one is an
/// introduction and the list is the second one.
pub fn objectives_entries(
    stream: &str,
    course: &str,
    doc: &Document,
) -> Result<Vec<EntryRecord>, ScrapeError> {
    let siblings = OBJECTIVES.collect(doc)?;
    let source = if siblings.len() > 1 {
        list_items(&siblings[1])
    } else {
        siblings
    };
    Ok(extract_entries(stream, course, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<h1>SE101</h1>
<h2>Objectives</h2>
<p>On completion students will be able to:</p>
<ul>
  <li>Write small programs.</li>
  <li>Reason about
      correctness? Test code</li>
</ul>
<h2>Lecture Topics</h2>
<ul><li>Variables</li><li>Loops. Functions</li></ul>
<ol><li>Ignored</li></ol>
<h2>Assessment</h2>
</body></html>
"#;

    fn entries(records: &[EntryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.entry.as_str()).collect()
    }

    #[test]
    fn syllabus_uses_first_container() {
        let doc = Document::from(PAGE);
        let records = syllabus_entries("se", "SE101", &doc).unwrap();
        assert_eq!(vec!["Variables", "Loops", "Functions"], entries(&records));
    }

    #[test]
    fn objectives_skip_introduction() {
        let doc = Document::from(PAGE);
        let records = objectives_entries("se", "SE101", &doc).unwrap();
        assert_eq!(
            vec!["Write small programs.", "Reason about correctness", "Test code"],
            entries(&records)
        );
    }

    #[test]
    fn objectives_single_sibling_used_whole() {
        let doc = Document::from("<h2>Objectives</h2><p>Be curious. Ask why?</p><h2>x</h2>");
        let records = objectives_entries("s", "c", &doc).unwrap();
        assert_eq!(vec!["Be curious", "Ask why?"], entries(&records));
    }

    #[test]
    fn missing_objectives_is_empty() {
        let doc = Document::from("<h2>Syllabus</h2><ul><li>x</li></ul>");
        assert!(objectives_entries("s", "c", &doc).unwrap().is_empty());
    }

    #[test]
    fn missing_syllabus_is_an_error() {
        let doc = Document::from("<h2>Objectives</h2><ul><li>x</li></ul>");
        let err = syllabus_entries("s", "CS9", &doc).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::MissingSection { ref course, section: "syllabus" } if course == "CS9"
        ));
    }
}
