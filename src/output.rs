use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::table::Table;

pub struct ExportReport {
    pub rows: usize,
    pub columns: usize,
}

pub fn export_xlsx(path: &Path, table: &Table) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("games")?;
        write_header(sheet, &table.headers)?;
        write_rows(sheet, table)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        rows: table.len(),
        columns: table.width(),
    })
}

fn write_header(worksheet: &mut Worksheet, headers: &[String]) -> Result<()> {
    for (col_idx, name) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, name)
            .with_context(|| format!("write header cell {col_idx}"))?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, table: &Table) -> Result<()> {
    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = row_idx as u32 + 1;
        for (col_idx, cell) in row.iter().enumerate() {
            let Some(value) = cell else {
                continue;
            };
            let col = col_idx as u16;
            match value.parse::<f64>() {
                Ok(number) if number.is_finite() => worksheet.write_number(sheet_row, col, number),
                _ => worksheet.write_string(sheet_row, col, value),
            }
            .with_context(|| format!("write cell ({sheet_row},{col_idx})"))?;
        }
    }
    Ok(())
}
