use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use rust_xlsxwriter::Workbook;
use serde::Serialize;

use crate::OutputRow;

pub const SHEET_NAME: &str = "BMI Results";

const HEADERS: [&str; 8] = [
    "Name",
    "Age",
    "Gender",
    "Height(cm)",
    "Weight(kg)",
    "BMI",
    "Category",
    "Tips",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not write CSV output")]
    Csv(#[from] csv::Error),
    #[error("could not write workbook output")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Height(cm)")]
    height_cm: f64,
    #[serde(rename = "Weight(kg)")]
    weight_kg: f64,
    #[serde(rename = "BMI")]
    bmi: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Tips")]
    tips: String,
}

impl<'a> From<&'a OutputRow> for CsvRow<'a> {
    fn from(row: &'a OutputRow) -> Self {
        Self {
            name: row.name.as_deref().unwrap_or(""),
            age: row.age,
            gender: row.gender.map(|gender| gender.to_string()).unwrap_or_default(),
            height_cm: row.height_cm,
            weight_kg: row.weight_kg,
            bmi: format!("{:.2}", row.bmi),
            category: row.category.to_string(),
            tips: row.tips.iter().join("; "),
        }
    }
}

pub fn write_csv<W: Write>(rows: &[OutputRow], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_csv_file(rows: &[OutputRow], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn build_workbook(rows: &[OutputRow]) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, row.name.as_deref().unwrap_or(""))?;
        worksheet.write_number(r, 1, row.age as f64)?;
        worksheet.write_string(
            r,
            2,
            row.gender.map(|gender| gender.to_string()).unwrap_or_default(),
        )?;
        worksheet.write_number(r, 3, row.height_cm)?;
        worksheet.write_number(r, 4, row.weight_kg)?;
        worksheet.write_number(r, 5, row.bmi)?;
        worksheet.write_string(r, 6, row.category.to_string())?;
        worksheet.write_string(r, 7, row.tips.iter().join("; "))?;
    }

    Ok(workbook)
}

/// Single-sheet workbook named "BMI Results", same columns as the CSV.
pub fn write_workbook(rows: &[OutputRow], path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(rows)?;
    workbook.save(path)?;
    Ok(())
}

pub fn workbook_bytes(rows: &[OutputRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(rows)?;
    Ok(workbook.save_to_buffer()?)
}
