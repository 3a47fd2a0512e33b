//! Inventory CSV parsing for bulk import.
//!
//! Expected record layout: `group_id,total,name,price`. Records whose
//! first field is empty are skipped. Quoted fields may contain commas,
//! doubled quotes and newlines.

use crate::contract::error::InventoryError;

/// One parsed import row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub group_id: i64,
    pub total: i64,
    pub name: String,
    pub price: f64,
}

/// Parse a whole CSV body. Fails on the first malformed record so
/// nothing is imported from a broken file; an empty file (or one with
/// only skipped records) is rejected outright.
pub fn parse_inventory_csv(body: &str) -> Result<Vec<CsvRow>, InventoryError> {
    let mut rows = Vec::new();

    for (index, record) in split_records(body).into_iter().enumerate() {
        let row_number = index + 1;
        if record[0].trim().is_empty() {
            continue;
        }
        if record.len() != 4 {
            return Err(InventoryError::validation(format!(
                "row {row_number}: expected 4 columns (group_id,total,name,price), got {}",
                record.len()
            )));
        }

        let group_id = record[0].trim().parse::<i64>().map_err(|_| {
            InventoryError::validation(format!(
                "row {row_number}: invalid group id '{}'",
                record[0].trim()
            ))
        })?;
        let total = record[1].trim().parse::<i64>().map_err(|_| {
            InventoryError::validation(format!(
                "row {row_number}: invalid total '{}'",
                record[1].trim()
            ))
        })?;
        if total < 0 {
            return Err(InventoryError::validation(format!(
                "row {row_number}: total must not be negative"
            )));
        }
        let name = record[2].trim();
        if name.is_empty() {
            return Err(InventoryError::validation(format!(
                "row {row_number}: item name must not be empty"
            )));
        }
        let price = record[3].trim().parse::<f64>().map_err(|_| {
            InventoryError::validation(format!(
                "row {row_number}: invalid price '{}'",
                record[3].trim()
            ))
        })?;
        if !price.is_finite() {
            return Err(InventoryError::validation(format!(
                "row {row_number}: invalid price '{}'",
                record[3].trim()
            )));
        }

        rows.push(CsvRow {
            group_id,
            total,
            name: name.to_string(),
            price,
        });
    }

    if rows.is_empty() {
        return Err(InventoryError::validation("CSV file cannot be empty"));
    }

    Ok(rows)
}

/// Split a CSV body into records of fields, honoring quoting. Records
/// that are entirely empty (blank lines) are dropped.
fn split_records(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut records, &mut record, &mut field);
            }
            '\n' => finish_record(&mut records, &mut record, &mut field),
            _ => field.push(c),
        }
    }

    // Final record without a trailing newline.
    if !field.is_empty() || !record.is_empty() {
        finish_record(&mut records, &mut record, &mut field);
    }

    records
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    let finished = std::mem::take(record);
    if finished.iter().any(|f| !f.trim().is_empty()) {
        records.push(finished);
    }
}
