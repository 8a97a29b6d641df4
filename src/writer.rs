use std::collections::BTreeMap;
use std::path::Path;

use crate::error::WriteError;

/// A record addressable by field name.
pub trait Row {
    fn field(&self, name: &str) -> Option<&str>;

    fn field_names(&self) -> Vec<&str>;
}

impl Row for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// Spreadsheet tab dialect: CRLF lines, quoting only when needed.
fn tsv_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b'\t')
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .double_quote(true)
        .has_headers(false);
    builder
}

/// Appends `rows` to the TSV file at `path`, writing the `fieldnames` header
/// first when the file is empty.
///
/// Every row is checked against `fieldnames` before the file is touched.
pub fn append_rows<P, R>(path: P, fieldnames: &[&str], rows: &[R]) -> Result<(), WriteError>
where
    P: AsRef<Path>,
    R: Row,
{
    let records = rows
        .iter()
        .map(|row| ordered_fields(row, fieldnames))
        .collect::<Result<Vec<_>, _>>()?;

    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;
    let empty = file.metadata()?.len() == 0;

    let mut wtr = tsv_builder().from_writer(file);
    if empty {
        wtr.write_record(fieldnames)?;
    }
    for record in &records {
        wtr.write_record(record)?;
    }
    wtr.flush()?;

    Ok(())
}

fn ordered_fields<'r, R: Row>(
    row: &'r R,
    fieldnames: &[&str],
) -> Result<Vec<&'r str>, WriteError> {
    if let Some(field) = row
        .field_names()
        .into_iter()
        .find(|name| !fieldnames.contains(name))
    {
        return Err(WriteError::UnknownField {
            field: field.to_string(),
            fieldnames: fieldnames.iter().map(|s| s.to_string()).collect(),
        });
    }

    fieldnames
        .iter()
        .map(|name| {
            row.field(name).ok_or_else(|| WriteError::MissingField {
                field: name.to_string(),
            })
        })
        .collect()
}
