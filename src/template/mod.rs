//! 曜日別発注数テンプレート
//!
//! 2つの表形式データ（white/brown 用のメイン、other 用のサブ）を
//! ラベル名 → (列名 → 値) として読み込み、曜日ボタンで発注数を一括設定する。
//!
//! 対応形式: CSV / Excel（xlsx, xlsm, xls, ods）

mod day;
pub mod xlsx;

pub use day::DaySelector;

use crate::error::{LabelError, Result};
use crate::order::{Category, CategoryFilter, EntryId, OrderModel, SiteId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// キー列のヘッダー名
const NAME_HEADER: &str = "Name";

/// 1行分（列名 → 生の値）
pub type TemplateRow = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    rows: HashMap<String, TemplateRow>,
}

impl TemplateTable {
    /// ファイルから読み込み（拡張子で形式を判定）
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(read_error(path, "file not found"));
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let rows = match ext.as_str() {
            "csv" => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| read_error(path, &e.to_string()))?;
                parse_csv(&content).map_err(|message| read_error(path, &message))?
            }
            "xlsx" | "xlsm" | "xls" | "ods" => xlsx::read_rows(path)?,
            _ => return Err(read_error(path, "unsupported template format")),
        };

        Self::from_rows(rows).map_err(|message| read_error(path, &message))
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str) -> std::result::Result<Self, String> {
        Self::from_rows(parse_csv(content)?)
    }

    /// 先頭の空でない行をヘッダーとして表を構築
    fn from_rows(rows: Vec<Vec<String>>) -> std::result::Result<Self, String> {
        let mut iter = rows
            .into_iter()
            .filter(|r| r.iter().any(|cell| !cell.trim().is_empty()));

        let header: Vec<String> = iter
            .next()
            .ok_or("template is empty")?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let name_idx = header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(NAME_HEADER))
            .ok_or_else(|| format!("missing '{}' column", NAME_HEADER))?;

        let mut table = HashMap::new();

        for fields in iter {
            let key = match fields.get(name_idx) {
                Some(k) if !k.trim().is_empty() => k.trim().to_string(),
                _ => continue,
            };

            let row: TemplateRow = header
                .iter()
                .zip(fields.iter())
                .enumerate()
                .filter(|(i, (column, _))| *i != name_idx && !column.is_empty())
                .map(|(_, (column, value))| (column.clone(), value.trim().to_string()))
                .collect();

            if table.insert(key.clone(), row).is_some() {
                tracing::debug!("duplicate template row '{}', last one wins", key);
            }
        }

        Ok(Self { rows: table })
    }

    pub fn row(&self, label: &str) -> Option<&TemplateRow> {
        self.rows.get(label)
    }

    /// ラベル名・列名で値を取得
    pub fn lookup(&self, label: &str, column: &str) -> Option<&str> {
        self.rows.get(label)?.get(column).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rows.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn read_error(path: &Path, message: &str) -> LabelError {
    LabelError::TemplateRead {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// CSVを行ごとに分割（引用符内のカンマ・"" エスケープに対応）
fn parse_csv(content: &str) -> std::result::Result<Vec<Vec<String>>, String> {
    let content = content.trim_start_matches('\u{feff}');
    content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            parse_csv_line(line).ok_or_else(|| format!("unterminated quote at line {}", i + 1))
        })
        .collect()
}

fn parse_csv_line(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                // フィールド終了
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }

    // 最後のフィールド
    fields.push(field);
    Some(fields)
}

/// 一括設定の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    /// テンプレートに行があり値を設定したエントリ数
    pub updated: usize,
    /// テンプレートに行が無く変更しなかったエントリ数
    pub untouched: usize,
    /// 設定後の店舗合計
    pub total: u64,
}

/// 読み込み済みテンプレートを店舗の発注数に適用
///
/// white/brown はメイン、other はサブテンプレートの "<day> <category>" 列を参照する。
/// 行はあるが列が無い・値が数値でない場合は0になる。
pub fn apply(
    model: &mut OrderModel,
    site: &SiteId,
    day: DaySelector,
    main: &TemplateTable,
    other: &TemplateTable,
) -> PopulateSummary {
    let ids: Vec<EntryId> = model
        .entries_matching(site, CategoryFilter::All)
        .iter()
        .map(|e| e.id.clone())
        .collect();

    let mut summary = PopulateSummary::default();

    for id in ids {
        let table = match id.category {
            Category::White | Category::Brown => main,
            Category::Other => other,
        };

        let Some(row) = table.row(&id.label) else {
            summary.untouched += 1;
            continue;
        };

        let column = day.column(id.category);
        let raw = row.get(&column).map(String::as_str).unwrap_or("");
        tracing::debug!("{} <- '{}' ({})", id, raw, column);
        model.set_quantity(&id, raw);
        summary.updated += 1;
    }

    summary.total = model.total_for(site);
    summary
}

/// テンプレートファイルの組
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub main_path: PathBuf,
    pub other_path: PathBuf,
}

impl TemplateSource {
    pub fn new(main_path: impl Into<PathBuf>, other_path: impl Into<PathBuf>) -> Self {
        Self {
            main_path: main_path.into(),
            other_path: other_path.into(),
        }
    }

    /// 両方読み込んでから適用する（どちらかが失敗したら発注数は一切変更しない）
    pub fn populate(
        &self,
        model: &mut OrderModel,
        site: &SiteId,
        day: DaySelector,
    ) -> Result<PopulateSummary> {
        let main = TemplateTable::load(&self.main_path)?;
        let other = TemplateTable::load(&self.other_path)?;
        tracing::info!(
            "populate {} for {}: {} main row(s), {} other row(s)",
            day,
            site,
            main.len(),
            other.len()
        );

        Ok(apply(model, site, day, &main, &other))
    }
}
