//! Excel形式テンプレートの読み込み（先頭シートのみ）

use crate::error::{LabelError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let read_error = |message: String| LabelError::TemplateRead {
        path: path.display().to_string(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_error("workbook has no sheets".into()))?
        .map_err(|e| read_error(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // 整数値のセルは "5.0" ではなく "5"
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}
