//! Locates a heading and walks the elements that follow it.

use regex::Regex;
use select::document::Document;
use select::node::Node;
use select::predicate::Name;

use crate::error::ScrapeError;

/// A heading section of a course page.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub name: &'static str,
    pub tag: &'static str,
    /// Heading text patterns, in priority order
    pub labels: &'static [&'static str],
    pub stop: &'static str,
}

pub const SYLLABUS: Section = Section {
    name: "syllabus",
    tag: "h2",
    labels: &["Lecture.*", "Topics", "Syllabus"],
    stop: "h2",
};

pub const OBJECTIVES: Section = Section {
    name: "objectives",
    tag: "h2",
    labels: &["Objectives"],
    stop: "h2",
};

impl Section {
    pub fn collect<'a>(&self, doc: &'a Document) -> Result<Vec<Node<'a>>, ScrapeError> {
        collect_siblings(doc, self.tag, self.labels, self.stop)
    }
}

/// Finds the first `tag` element matching a label and returns its following
/// sibling elements up to, but excluding, the next `stop` element.
///
/// Labels are tried in order and the first one with a match wins, even if a
/// later label matches an earlier heading of the page.
pub fn collect_siblings<'a, S: AsRef<str>>(
    doc: &'a Document,
    tag: &str,
    labels: &[S],
    stop: &str,
) -> Result<Vec<Node<'a>>, ScrapeError> {
    let Some(heading) = find_heading(doc, tag, labels)? else {
        return Ok(Vec::new());
    };

    log::debug!("Matched <{tag}> heading {:?}", heading.text().trim());

    let mut siblings = Vec::new();
    let mut next = next_element(heading);
    while let Some(node) = next {
        if node.name() == Some(stop) {
            break;
        }
        siblings.push(node);
        next = next_element(node);
    }

    Ok(siblings)
}

fn find_heading<'a, S: AsRef<str>>(
    doc: &'a Document,
    tag: &str,
    labels: &[S],
) -> Result<Option<Node<'a>>, ScrapeError> {
    for label in labels {
        let label = label.as_ref();
        let re = Regex::new(label).map_err(|source| ScrapeError::Pattern {
            pattern: label.to_string(),
            source,
        })?;
        if let Some(heading) = doc.find(Name(tag)).find(|n| re.is_match(&n.text())) {
            return Ok(Some(heading));
        }
    }
    Ok(None)
}

// Skips text and comment nodes.
fn next_element(node: Node) -> Option<Node> {
    let mut next = node.next();
    while let Some(n) = next {
        if n.name().is_some() {
            return Some(n);
        }
        next = n.next();
    }
    None
}
