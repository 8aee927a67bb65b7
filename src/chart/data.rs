//! Event and edge tables.
//!
//! Events: `ID, Date, World, Description, Characters, Important_Trigger,
//! Death`. Edges: `Source, Target, Type, Description`. Dates are written
//! `DD-MM-YYYY`; flags are the literal `TRUE` in any case.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ChartError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "World", default)]
    pub world: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Characters", default)]
    pub characters: String,
    #[serde(rename = "Important_Trigger", default, deserialize_with = "flag")]
    pub important_trigger: bool,
    #[serde(rename = "Death", default, deserialize_with = "flag")]
    pub death: bool,
}

impl EventRecord {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_event_date(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "Type", default)]
    pub edge_type: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.is_some_and(|t| t.trim().eq_ignore_ascii_case("true")))
}

/// `DD-MM-YYYY`, falling back to ISO `YYYY-MM-DD`
pub fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

fn read_table<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

fn read_table_file<T>(path: &Path) -> Result<Vec<T>, ChartError>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file).map_err(|source| ChartError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

pub fn events_from_reader(reader: impl Read) -> Result<Vec<EventRecord>, csv::Error> {
    read_table(reader)
}

pub fn edges_from_reader(reader: impl Read) -> Result<Vec<EdgeRecord>, csv::Error> {
    read_table(reader)
}

pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<EventRecord>, ChartError> {
    let path = path.as_ref();
    let events: Vec<EventRecord> = read_table_file(path)?;
    log::info!("Read {} events from {}", events.len(), path.display());
    Ok(events)
}

pub fn read_edges(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>, ChartError> {
    let path = path.as_ref();
    let edges: Vec<EdgeRecord> = read_table_file(path)?;
    log::info!("Read {} edges from {}", edges.len(), path.display());
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &str = "\
ID,Date,World,Description,Characters,Important_Trigger,Death
E1,21-06-2019,Jonas,Jonas finds the cave,Jonas,TRUE,FALSE
E2,04-11-1986,Adam,Mikkel goes missing,\"Mikkel, Ulrich\",false,true
E3,,Eva,Undated,,,
";

    #[test]
    fn test_events_parse_flags_and_quotes() {
        let events = events_from_reader(EVENTS.as_bytes()).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[0].important_trigger);
        assert!(!events[0].death);
        assert!(events[1].death);
        assert_eq!(events[1].characters, "Mikkel, Ulrich");
        assert!(!events[2].important_trigger);
    }

    #[test]
    fn test_dates() {
        assert_eq!(parse_event_date("21-06-2019"), NaiveDate::from_ymd_opt(2019, 6, 21));
        assert_eq!(parse_event_date("2019-06-21"), NaiveDate::from_ymd_opt(2019, 6, 21));
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("someday"), None);
    }

    #[test]
    fn test_edges_parse() {
        let csv = "Source,Target,Type,Description\nE1,E2,dashed arrow,time travel\nE2,E3,arrow,\n";
        let edges = edges_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].edge_type, "dashed arrow");
        assert_eq!(edges[1].description, "");
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_events("no/such/events.csv").unwrap_err();
        assert!(matches!(err, ChartError::Io { .. }));
        assert!(err.to_string().contains("no/such/events.csv"));
    }

    #[test]
    fn test_missing_id_column_is_an_error() {
        let csv = "Date,World\n01-01-2000,Adam\n";
        assert!(events_from_reader(csv.as_bytes()).is_err());
    }
}
