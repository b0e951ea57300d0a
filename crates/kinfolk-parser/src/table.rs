//! CSV ingestion: header mapping and row extraction.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, trace};

use kinfolk_core::record::PersonRecord;

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    list::split_list,
    span::Span,
};

/// The recognized columns of the person table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Generation,
    Parent1,
    Parent2,
    SpouseIds,
    SpouseStatuses,
    BirthYear,
    DeathYear,
}

impl Column {
    const REQUIRED: [Column; 3] = [Column::Id, Column::Name, Column::Generation];

    /// Matches a header cell, ignoring case, `_` and spaces.
    fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .chars()
            .filter(|c| *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "generation" => Some(Column::Generation),
            "parent1id" => Some(Column::Parent1),
            "parent2id" => Some(Column::Parent2),
            "spouseid" | "spouseids" => Some(Column::SpouseIds),
            "spousestatus" | "spousestatuses" => Some(Column::SpouseStatuses),
            "birthyear" => Some(Column::BirthYear),
            "deathyear" => Some(Column::DeathYear),
            _ => None,
        }
    }

    fn header_name(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "Name",
            Column::Generation => "generation",
            Column::Parent1 => "Parent1ID",
            Column::Parent2 => "Parent2ID",
            Column::SpouseIds => "SpouseID",
            Column::SpouseStatuses => "SpouseStatus",
            Column::BirthYear => "BirthYear",
            Column::DeathYear => "DeathYear",
        }
    }
}

/// Column positions resolved from the header row. The first matching header
/// wins when a column appears twice.
#[derive(Debug, Default)]
struct ColumnMap {
    slots: Vec<(Column, usize)>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            match Column::from_header(header) {
                Some(column) if map.index(column).is_none() => map.slots.push((column, index)),
                Some(_) => debug!(header = header; "Ignoring repeated column"),
                None => trace!(header = header; "Ignoring unknown column"),
            }
        }
        map
    }

    fn index(&self, column: Column) -> Option<usize> {
        self.slots
            .iter()
            .find(|(candidate, _)| *candidate == column)
            .map(|(_, index)| *index)
    }

    fn missing(&self) -> impl Iterator<Item = Column> + '_ {
        Column::REQUIRED
            .into_iter()
            .filter(|column| self.index(*column).is_none())
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: Column) -> Option<&'r str> {
        self.index(column)
            .and_then(|index| record.get(index))
            .filter(|value| !value.is_empty())
    }

    fn to_record(&self, record: &StringRecord) -> PersonRecord {
        let owned = |column| self.cell(record, column).map(str::to_string);
        let list = |column| self.cell(record, column).map(split_list).unwrap_or_default();
        PersonRecord {
            id: owned(Column::Id),
            name: owned(Column::Name),
            generation: owned(Column::Generation),
            parent1_id: owned(Column::Parent1),
            parent2_id: owned(Column::Parent2),
            spouse_ids: list(Column::SpouseIds),
            spouse_statuses: list(Column::SpouseStatuses),
            birth_year: owned(Column::BirthYear),
            death_year: owned(Column::DeathYear),
            line: record.position().map(csv::Position::line),
        }
    }
}

/// Reads the person table from raw bytes.
pub(crate) fn read_table(source: &[u8]) -> Result<Vec<PersonRecord>, ParseError> {
    if source.iter().all(u8::is_ascii_whitespace) {
        return Err(Diagnostic::error("source is empty")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..source.len()), "no header row")
            .with_help("provide a CSV table with a header row such as `ID,Name,generation`")
            .into());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|err| malformed(&err, source))?
        .clone();
    let header_span = header_span(source);
    let columns = ColumnMap::from_headers(&headers);

    let missing: Vec<Diagnostic> = columns
        .missing()
        .map(|column| {
            Diagnostic::error(format!(
                "missing required column `{}`",
                column.header_name()
            ))
            .with_code(ErrorCode::E101)
            .with_label(header_span, "header row")
            .with_help(format!(
                "add a `{}` column; required columns are `ID`, `Name` and `generation`",
                column.header_name()
            ))
        })
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::new(missing));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| malformed(&err, source))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        records.push(columns.to_record(&record));
    }

    if records.is_empty() {
        return Err(Diagnostic::error("table has no data rows")
            .with_code(ErrorCode::E103)
            .with_label(header_span, "only a header row was found")
            .with_help("add one row per person below the header")
            .into());
    }

    debug!(rows = records.len(); "Read person table");
    Ok(records)
}

/// Byte span of the first non-blank line, which the CSV reader uses as the
/// header row.
fn header_span(source: &[u8]) -> Span {
    let mut start = 0;
    for line in source.split_inclusive(|byte| *byte == b'\n') {
        let content = line.trim_ascii_end();
        if !content.trim_ascii_start().is_empty() {
            return Span::new(start..start + content.len());
        }
        start += line.len();
    }
    Span::at(0)
}

fn malformed(err: &csv::Error, source: &[u8]) -> ParseError {
    let offset = err
        .position()
        .map(|position| position.byte() as usize)
        .unwrap_or_default()
        .min(source.len());
    let end = source[offset..]
        .iter()
        .position(|byte| *byte == b'\n')
        .map_or(source.len(), |len| offset + len);

    let mut diagnostic = Diagnostic::error(format!("malformed CSV: {err}"))
        .with_code(ErrorCode::E102)
        .with_label(Span::new(offset..end), "could not read this record");
    if let csv::ErrorKind::Utf8 { .. } = err.kind() {
        diagnostic = diagnostic.with_help("save the table as UTF-8 text");
    }
    diagnostic.into()
}
