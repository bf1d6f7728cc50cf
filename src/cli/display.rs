use crate::store::{Record, Schema};
use crate::{CatalogError, Result};
use serde_json::{Map, Value};
use std::io::Write;

/// Print records as an aligned text table with one column per schema column
pub fn write_table(out: &mut dyn Write, schema: &Schema, records: &[&Record]) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "No items.")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| r.to_row(schema).into_iter().map(|v| single_line(&v)).collect())
        .collect();

    // Column widths: widest cell or header
    let widths: Vec<usize> = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    let header: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| c.to_uppercase())
        .collect();
    writeln!(out, "{}", pad_row(&header, &widths))?;
    writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    )?;
    for row in &rows {
        writeln!(out, "{}", pad_row(row, &widths))?;
    }

    Ok(())
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    padded.join("  ").trim_end().to_string()
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Print one record as `Column: value` lines in schema order
pub fn write_details(out: &mut dyn Write, schema: &Schema, record: &Record) -> Result<()> {
    for (column, value) in schema.columns().iter().zip(record.to_row(schema)) {
        writeln!(out, "{}: {}", column, value)?;
    }
    Ok(())
}

/// JSON object for a record keyed by the schema's column names, with the id
/// under its own column name as a number
fn record_json(schema: &Schema, record: &Record) -> Value {
    let mut object = Map::new();
    for (i, column) in schema.columns().iter().enumerate() {
        let value = if i == schema.id_index() {
            Value::from(record.id)
        } else {
            Value::from(record.field(column).unwrap_or_default())
        };
        object.insert(column.clone(), value);
    }
    Value::Object(object)
}

/// Print records as a pretty JSON array
pub fn write_json(out: &mut dyn Write, schema: &Schema, records: &[&Record]) -> Result<()> {
    let array: Vec<Value> = records.iter().map(|r| record_json(schema, r)).collect();
    serde_json::to_writer_pretty(&mut *out, &array)?;
    writeln!(out)?;
    Ok(())
}

/// Print a single record as a pretty JSON object
pub fn write_json_record(out: &mut dyn Write, schema: &Schema, record: &Record) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &record_json(schema, record))?;
    writeln!(out)?;
    Ok(())
}

/// Print records in the durable file's CSV layout
pub fn write_csv(out: &mut dyn Write, schema: &Schema, records: &[&Record]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer
        .write_record(schema.columns())
        .map_err(|e| CatalogError::Io(e.into()))?;
    for record in records {
        writer
            .write_record(record.to_row(schema))
            .map_err(|e| CatalogError::Io(e.into()))?;
    }
    writer.flush()?;
    Ok(())
}
