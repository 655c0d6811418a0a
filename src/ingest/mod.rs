//! Roster ingestion from CSV exports.
//!
//! Headers drive the column mapping: `student_id`, `name`, and `grade` are
//! required, `section` is optional. Assessment columns are recognized by a
//! `pass:` or `cat4:` prefix (a `:sas` suffix on CAT4 columns marks raw SAS
//! instead of stanines); any other numeric column becomes an academic
//! subject. Blank cells mean the assessment was not sat and are skipped.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::profiling::domain::{Cat4Domain, Cat4Score, PassFactor, StudentRecord};

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    UnknownPassFactor { column: String },
    UnknownCat4Domain { column: String },
    InvalidNumber { column: String, row: usize, value: String },
    EmptyField { column: &'static str, row: usize },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read roster: {}", err),
            IngestError::Csv(err) => write!(f, "failed to parse roster: {}", err),
            IngestError::MissingColumn(column) => {
                write!(f, "roster is missing the required '{}' column", column)
            }
            IngestError::UnknownPassFactor { column } => {
                write!(f, "column '{}' does not name a known PASS factor", column)
            }
            IngestError::UnknownCat4Domain { column } => {
                write!(f, "column '{}' does not name a known CAT4 battery", column)
            }
            IngestError::InvalidNumber { column, row, value } => write!(
                f,
                "row {}: column '{}' holds '{}', which is not a number",
                row, column, value
            ),
            IngestError::EmptyField { column, row } => {
                write!(f, "row {}: required column '{}' is empty", row, column)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for IngestError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// What one CSV column feeds into.
#[derive(Debug, Clone, PartialEq)]
enum ColumnRole {
    StudentId,
    Name,
    Grade,
    Section,
    Pass(PassFactor),
    Cat4 { domain: Cat4Domain, sas: bool },
    Academic(String),
}

fn classify_header(raw: &str) -> Result<ColumnRole, IngestError> {
    let header = raw.trim();
    let key = header.to_ascii_lowercase().replace([' ', '-'], "_");

    match key.as_str() {
        "student_id" | "id" => return Ok(ColumnRole::StudentId),
        "name" | "student_name" => return Ok(ColumnRole::Name),
        "grade" | "grade_level" | "year_group" => return Ok(ColumnRole::Grade),
        "section" | "class" => return Ok(ColumnRole::Section),
        _ => {}
    }

    if let Some(rest) = key.strip_prefix("pass:").or_else(|| key.strip_prefix("pass_")) {
        let factor = PassFactor::parse(rest).ok_or_else(|| IngestError::UnknownPassFactor {
            column: header.to_string(),
        })?;
        return Ok(ColumnRole::Pass(factor));
    }

    if let Some(rest) = key.strip_prefix("cat4:").or_else(|| key.strip_prefix("cat4_")) {
        let (battery, sas) = match rest.strip_suffix(":sas").or_else(|| rest.strip_suffix("_sas")) {
            Some(stripped) => (stripped, true),
            None => (rest, false),
        };
        let domain = Cat4Domain::parse(battery).ok_or_else(|| IngestError::UnknownCat4Domain {
            column: header.to_string(),
        })?;
        return Ok(ColumnRole::Cat4 { domain, sas });
    }

    Ok(ColumnRole::Academic(header.to_string()))
}

pub fn read_roster(path: &Path) -> Result<Vec<StudentRecord>, IngestError> {
    let file = File::open(path)?;
    parse_roster(file)
}

pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<StudentRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let roles = headers
        .iter()
        .map(classify_header)
        .collect::<Result<Vec<_>, _>>()?;

    for (role, label) in [
        (ColumnRole::StudentId, "student_id"),
        (ColumnRole::Name, "name"),
        (ColumnRole::Grade, "grade"),
    ] {
        if !roles.contains(&role) {
            return Err(IngestError::MissingColumn(label));
        }
    }

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        // Header is line 1; data rows are 1-indexed below it.
        records.push(parse_row(&roles, &row, index + 2)?);
    }

    Ok(records)
}

fn parse_row(
    roles: &[ColumnRole],
    row: &csv::StringRecord,
    line: usize,
) -> Result<StudentRecord, IngestError> {
    let mut record = StudentRecord::new("", "", "");

    for (role, cell) in roles.iter().zip(row.iter()) {
        let cell = cell.trim();
        match role {
            ColumnRole::StudentId => {
                if cell.is_empty() {
                    return Err(IngestError::EmptyField {
                        column: "student_id",
                        row: line,
                    });
                }
                record.student_id = cell.to_string();
            }
            ColumnRole::Name => {
                if cell.is_empty() {
                    return Err(IngestError::EmptyField {
                        column: "name",
                        row: line,
                    });
                }
                record.name = cell.to_string();
            }
            ColumnRole::Grade => {
                if cell.is_empty() {
                    return Err(IngestError::EmptyField {
                        column: "grade",
                        row: line,
                    });
                }
                record.grade = cell.to_string();
            }
            ColumnRole::Section => {
                if !cell.is_empty() {
                    record.section = Some(cell.to_string());
                }
            }
            ColumnRole::Pass(factor) => {
                if let Some(value) = parse_cell(cell, factor.label(), line)? {
                    record.pass_percentiles.insert(*factor, value);
                }
            }
            ColumnRole::Cat4 { domain, sas } => {
                if let Some(value) = parse_cell(cell, domain.label(), line)? {
                    let score = if *sas {
                        Cat4Score::Sas(value)
                    } else {
                        Cat4Score::Stanine(value)
                    };
                    record.cat4_scores.insert(*domain, score);
                }
            }
            ColumnRole::Academic(subject) => {
                if let Some(value) = parse_cell(cell, subject, line)? {
                    record.academic_stanines.insert(subject.clone(), value);
                }
            }
        }
    }

    Ok(record)
}

fn parse_cell(cell: &str, column: &str, line: usize) -> Result<Option<f64>, IngestError> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| IngestError::InvalidNumber {
            column: column.to_string(),
            row: line,
            value: cell.to_string(),
        })
}
