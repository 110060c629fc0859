//! The person import pipeline: a `;`-separated file reader, an uppercasing
//! processor and a writer that logs each chunk.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use batchflow_exec::item::IteratorItemReader;
use batchflow_exec::{ItemProcessor, ItemReader, ItemWriter};

const SEPARATOR: char = ';';
const COLUMNS: [&str; 3] = ["id", "name", "email"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PersonFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("file is empty, expected a header with columns id;name;email")]
    MissingHeader,
    #[error("header has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Parses a header-mapped file. Columns may appear in any order, extra
/// columns are ignored, leading whitespace is trimmed and blank lines are
/// skipped.
pub fn parse_persons(content: &str) -> Result<Vec<Person>, PersonFileError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().ok_or(PersonFileError::MissingHeader)?;
    let header: Vec<&str> = header.split(SEPARATOR).map(str::trim).collect();
    let mut positions = [0usize; 3];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .ok_or(PersonFileError::MissingColumn(column))?;
    }
    let width = positions.iter().max().map_or(0, |p| p + 1);

    let mut persons = Vec::new();
    for (line, row) in lines {
        let fields: Vec<&str> = row.split(SEPARATOR).map(str::trim_start).collect();
        if fields.len() < width {
            return Err(PersonFileError::ShortRow {
                line,
                expected: width,
                found: fields.len(),
            });
        }
        let [id, name, email] = positions.map(|p| fields[p].trim_end().to_string());
        persons.push(Person { id, name, email });
    }
    Ok(persons)
}

pub fn read_persons(path: &Path) -> Result<Vec<Person>, PersonFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| PersonFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_persons(&content)
}

/// Serves the rows of a person file, parsed up front.
pub struct CsvPersonReader {
    rows: IteratorItemReader<Person>,
}

impl CsvPersonReader {
    pub fn open(path: &Path) -> Result<Self, PersonFileError> {
        let persons = read_persons(path)?;
        info!(path = %path.display(), rows = persons.len(), "loaded person file");
        Ok(Self {
            rows: IteratorItemReader::new(persons),
        })
    }
}

#[async_trait]
impl ItemReader<Person> for CsvPersonReader {
    async fn read(&self) -> Result<Option<Person>, anyhow::Error> {
        self.rows.read().await
    }
}

#[derive(Debug, thiserror::Error)]
#[error("person {id} has no name")]
pub struct MissingName {
    pub id: String,
}

/// Uppercases names. Rows without a name are rejected so the skip policy
/// can decide whether the run tolerates them.
pub struct UppercaseProcessor;

#[async_trait]
impl ItemProcessor<Person, Person> for UppercaseProcessor {
    async fn process(&self, person: &Person) -> Result<Option<Person>, anyhow::Error> {
        if person.name.trim().is_empty() {
            return Err(MissingName {
                id: person.id.clone(),
            }
            .into());
        }
        Ok(Some(Person {
            id: person.id.clone(),
            name: person.name.to_uppercase(),
            email: person.email.clone(),
        }))
    }
}

pub struct LoggingPersonWriter;

#[async_trait]
impl ItemWriter<Person> for LoggingPersonWriter {
    async fn write(&self, persons: &[Person]) -> Result<(), anyhow::Error> {
        info!(count = persons.len(), "writing persons");
        for p in persons {
            info!(id = %p.id, name = %p.name, email = %p.email, "person");
        }
        Ok(())
    }
}
