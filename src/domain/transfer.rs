//! Catalogue CSV export and import.

use std::fmt::Write;

use crate::models::CatalogueItem;

pub const CSV_HEADER: [&str; 7] = [
    "Part ID",
    "Name",
    "Category",
    "Price",
    "Stock",
    "Description",
    "Image",
];

pub fn export_csv(items: &[CatalogueItem]) -> String {
    let mut csv = String::new();
    let header: Vec<String> = CSV_HEADER.iter().map(|h| quote(h)).collect();
    let _ = writeln!(csv, "{}", header.join(","));
    for item in items {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{}",
            quote(&item.part_id),
            quote(&item.name),
            quote(&item.category),
            quote(&format!("{:.2}", item.price)),
            quote(&item.stock.to_string()),
            quote(&item.description),
            quote(item.image.as_deref().unwrap_or_default()),
        );
    }
    csv
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Splits CSV text into rows of fields. Handles quoted fields with embedded commas,
/// doubled quotes and line breaks. Blank lines are dropped.
pub fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|field| !field.trim().is_empty()) {
        rows.push(row);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImport {
    pub items: Vec<CatalogueItem>,
    pub skipped: usize,
}

/// Reads positional rows `(id, name, category, price, stock, description, image)`.
/// A leading header row is ignored; rows missing id or name or carrying a bad number are
/// counted as skipped.
pub fn items_from_csv(input: &str) -> ParsedImport {
    let mut rows = parse_csv(input).into_iter().peekable();
    if rows.peek().is_some_and(|row| is_header(row)) {
        rows.next();
    }

    let mut items = Vec::new();
    let mut skipped = 0;
    for row in rows {
        match item_from_row(&row) {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }
    ParsedImport { items, skipped }
}

fn is_header(row: &[String]) -> bool {
    row.first()
        .map(|cell| cell.trim().to_lowercase())
        .is_some_and(|cell| matches!(cell.as_str(), "part id" | "part_id" | "id"))
}

fn item_from_row(row: &[String]) -> Option<CatalogueItem> {
    let cell = move |index: usize| row.get(index).map(|s| s.trim()).unwrap_or_default();

    let part_id = cell(0);
    let name = cell(1);
    if part_id.is_empty() || name.is_empty() {
        return None;
    }
    let price = match cell(3) {
        "" => 0.0,
        raw => raw.parse::<f64>().ok().filter(|p| p.is_finite() && *p >= 0.0)?,
    };
    let stock = match cell(4) {
        "" => 0,
        raw => raw.parse::<u32>().ok()?,
    };
    let image = Some(cell(6)).filter(|s| !s.is_empty()).map(str::to_string);

    Some(CatalogueItem {
        part_id: part_id.to_string(),
        name: name.to_string(),
        category: cell(2).to_string(),
        price,
        stock,
        description: cell(5).to_string(),
        image,
    })
}
