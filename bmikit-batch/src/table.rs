use std::str::FromStr;

use csv::StringRecord;
use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use bmikit_model::measurement::{Gender, Measurement};

/// Canonical input header, in column order. `Height`/`Weight` are accepted
/// as unitless aliases for the last two.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Name", "Age", "Gender", "Height(cm)", "Weight(kg)"];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(
        "missing required columns: {}; the file must contain {}",
        missing.join(", "),
        REQUIRED_COLUMNS.join(", ")
    )]
    SchemaMismatch { missing: Vec<String> },
    #[error("could not read input table")]
    Read(#[from] csv::Error),
    #[error("could not open input file")]
    Io(#[from] std::io::Error),
}

/// One rejected row. The batch carries on; rejected rows are excluded from
/// the aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("row {line}: {message}")]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Columns {
    name: usize,
    age: usize,
    gender: usize,
    height: usize,
    weight: usize,
}

impl Columns {
    pub(crate) fn resolve(headers: &StringRecord) -> Result<Self, TableError> {
        let index: FxHashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.trim(), i))
            .collect();
        let lookup = |canonical: &str, aliases: &[&str]| {
            std::iter::once(canonical)
                .chain(aliases.iter().copied())
                .find_map(|name| index.get(name).copied())
        };

        let name = lookup("Name", &[]);
        let age = lookup("Age", &[]);
        let gender = lookup("Gender", &[]);
        let height = lookup("Height(cm)", &["Height"]);
        let weight = lookup("Weight(kg)", &["Weight"]);

        match (name, age, gender, height, weight) {
            (Some(name), Some(age), Some(gender), Some(height), Some(weight)) => Ok(Self {
                name,
                age,
                gender,
                height,
                weight,
            }),
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .zip([name, age, gender, height, weight])
                    .filter(|(_, resolved)| resolved.is_none())
                    .map(|(column, _)| (*column).to_owned())
                    .collect();
                Err(TableError::SchemaMismatch { missing })
            }
        }
    }

    pub(crate) fn parse_row(
        &self,
        record: &StringRecord,
        line: usize,
    ) -> Result<Measurement, RowError> {
        let name = match field(record, self.name) {
            "" => None,
            name => Some(name.to_owned()),
        };
        let gender = match field(record, self.gender) {
            "" => None,
            raw => match Gender::from_str(raw) {
                Ok(gender) => Some(gender),
                Err(_) => {
                    debug!("row {}: unknown gender {:?}, using base tips", line, raw);
                    None
                }
            },
        };
        let age = parse_field(record, self.age, "Age", line)?;
        let height_cm = parse_field(record, self.height, "Height(cm)", line)?;
        let weight_kg = parse_field(record, self.weight, "Weight(kg)", line)?;

        Ok(Measurement::new(name, age, gender, height_cm, weight_kg))
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

fn parse_field<T: FromStr>(
    record: &StringRecord,
    index: usize,
    column: &str,
    line: usize,
) -> Result<T, RowError> {
    let raw = field(record, index);
    raw.parse().map_err(|_| RowError {
        line,
        message: format!("invalid {} value {:?}", column, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(columns: &[&str]) -> StringRecord {
        StringRecord::from(columns.to_vec())
    }

    #[test]
    fn resolve_accepts_canonical_header() {
        let columns = Columns::resolve(&headers(&REQUIRED_COLUMNS)).unwrap();
        assert_eq!(columns.height, 3);
        assert_eq!(columns.weight, 4);
    }

    #[test]
    fn resolve_accepts_unitless_aliases_and_reordering() {
        let columns =
            Columns::resolve(&headers(&["Weight", "Height", "Name", "Gender", "Age"])).unwrap();
        assert_eq!(columns.weight, 0);
        assert_eq!(columns.height, 1);
        assert_eq!(columns.age, 4);
    }

    #[test]
    fn resolve_lists_every_missing_column() {
        let err = Columns::resolve(&headers(&["Name", "Age", "Gender"])).unwrap_err();
        match err {
            TableError::SchemaMismatch { missing } => {
                assert_eq!(missing, vec!["Height(cm)".to_owned(), "Weight(kg)".to_owned()]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn schema_mismatch_message_names_required_columns() {
        let err = Columns::resolve(&headers(&["Name"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Weight(kg)"));
        assert!(message.contains("Name, Age, Gender, Height(cm), Weight(kg)"));
    }

    #[test]
    fn parse_row_reads_a_complete_row() {
        let columns = Columns::resolve(&headers(&REQUIRED_COLUMNS)).unwrap();
        let record = StringRecord::from(vec!["Alice", "34", "female", "170", "70"]);
        let measurement = columns.parse_row(&record, 2).unwrap();
        assert_eq!(measurement.name.as_deref(), Some("Alice"));
        assert_eq!(measurement.age, 34);
        assert_eq!(measurement.gender, Some(Gender::Female));
        assert_eq!(measurement.height_cm, 170.0);
        assert_eq!(measurement.weight_kg, 70.0);
    }

    #[test]
    fn parse_row_treats_blank_name_and_unknown_gender_as_absent() {
        let columns = Columns::resolve(&headers(&REQUIRED_COLUMNS)).unwrap();
        let record = StringRecord::from(vec!["", "34", "N/A", "170", "70"]);
        let measurement = columns.parse_row(&record, 2).unwrap();
        assert_eq!(measurement.name, None);
        assert_eq!(measurement.gender, None);
    }

    #[test]
    fn parse_row_rejects_unparseable_numbers() {
        let columns = Columns::resolve(&headers(&REQUIRED_COLUMNS)).unwrap();
        let record = StringRecord::from(vec!["Bob", "forty", "male", "170", "70"]);
        let err = columns.parse_row(&record, 5).unwrap_err();
        assert_eq!(err.line, 5);
        assert!(err.message.contains("Age"));

        let record = StringRecord::from(vec!["Bob", "40", "male", "tall", "70"]);
        let err = columns.parse_row(&record, 6).unwrap_err();
        assert!(err.message.contains("Height(cm)"));
    }

    #[test]
    fn parse_row_reports_short_records_as_row_errors() {
        let columns = Columns::resolve(&headers(&REQUIRED_COLUMNS)).unwrap();
        let record = StringRecord::from(vec!["Bob", "40"]);
        let err = columns.parse_row(&record, 3).unwrap_err();
        assert_eq!(err.line, 3);
    }
}
