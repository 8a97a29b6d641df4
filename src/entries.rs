use lazy_static::lazy_static;
use regex::Regex;
use select::node::Node;
use select::predicate::Name;
use serde::Serialize;

use crate::writer::Row;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.?] ").unwrap();
}

pub const FIELDNAMES: [&str; 3] = ["stream", "course", "entry"];

/// One sentence of a course section, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub stream: String,
    pub course: String,
    pub entry: String,
}

impl Row for EntryRecord {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "stream" => Some(self.stream.as_str()),
            "course" => Some(self.course.as_str()),
            "entry" => Some(self.entry.as_str()),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        FIELDNAMES.to_vec()
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Splits on a period or question mark followed by a space.
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_END.split(text)
}

/// Descendant `li` elements of a node.
pub fn list_items<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    node.find(Name("li")).collect()
}

/// Turns the text of the given elements into one record per sentence.
pub fn extract_entries<'a, I>(stream: &str, course: &str, elements: I) -> Vec<EntryRecord>
where
    I: IntoIterator<Item = Node<'a>>,
{
    let texts = elements
        .into_iter()
        .map(|node| node.text())
        .collect::<Vec<_>>();
    entries_from_texts(stream, course, texts)
}

/// Same as [`extract_entries`] over already extracted element texts.
pub fn entries_from_texts<I, S>(stream: &str, course: &str, texts: I) -> Vec<EntryRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = texts
        .into_iter()
        .map(|t| collapse_whitespace(t.as_ref()))
        .collect::<Vec<_>>()
        .join(". ");

    split_sentences(&joined)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| EntryRecord {
            stream: stream.to_string(),
            course: course.to_string(),
            entry: entry.to_string(),
        })
        .collect()
}
