//! ナビゲーショングリッド
//!
//! white（列0）・brown（列1）のエントリを (店舗, 行, 列) で引けるようにし、
//! 上下左右のフォーカス移動を提供する。エントリ自体は所有せず ID だけ持つ。

use crate::order::{Category, EntryId, SiteId};
use std::collections::HashMap;

pub const COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// 移動先の (行, 列)。範囲外（負）なら None
    pub fn apply(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        match self {
            Direction::Up => row.checked_sub(1).map(|r| (r, col)),
            Direction::Down => Some((row + 1, col)),
            Direction::Left => col.checked_sub(1).map(|c| (row, c)),
            Direction::Right => Some((row, col + 1)),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// グリッド上の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub row: usize,
    pub col: usize,
}

/// UI側の表示範囲（スクロール全体に対する割合 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Default)]
pub struct NavigationGrid {
    columns: HashMap<SiteId, [Vec<EntryId>; COLUMNS]>,
}

impl NavigationGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列の末尾に追加（行は0から詰めて振られる）。other は登録しない
    pub fn insert(&mut self, id: EntryId) -> Option<Address> {
        let col = id.category.grid_column()?;
        let column = &mut self.columns.entry(id.site.clone()).or_default()[col];
        column.push(id);
        Some(Address {
            row: column.len() - 1,
            col,
        })
    }

    pub fn entry_at(&self, site: &SiteId, row: usize, col: usize) -> Option<&EntryId> {
        self.columns.get(site)?.get(col)?.get(row)
    }

    /// 方向キーでの移動。移動先が無ければ None（何もしない）
    pub fn step(
        &self,
        site: &SiteId,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Option<(Address, &EntryId)> {
        let (row, col) = direction.apply(row, col)?;
        let id = self.entry_at(site, row, col)?;
        Some((Address { row, col }, id))
    }

    pub fn address_of(&self, id: &EntryId) -> Option<Address> {
        let col = id.category.grid_column()?;
        let row = self
            .columns
            .get(&id.site)?
            .get(col)?
            .iter()
            .position(|e| e == id)?;
        Some(Address { row, col })
    }

    /// 最初のエントリ（white 優先）
    pub fn first(&self, site: &SiteId) -> Option<Address> {
        let columns = self.columns.get(site)?;
        (0..COLUMNS)
            .find(|&col| !columns[col].is_empty())
            .map(|col| Address { row: 0, col })
    }

    /// 列ごとの行数
    pub fn column_len(&self, site: &SiteId, category: Category) -> usize {
        category
            .grid_column()
            .and_then(|col| self.columns.get(site).map(|c| c[col].len()))
            .unwrap_or(0)
    }

    /// 表示上の行数（長い方の列）
    pub fn row_count(&self, site: &SiteId) -> usize {
        self.columns
            .get(site)
            .map(|c| c.iter().map(Vec::len).max().unwrap_or(0))
            .unwrap_or(0)
    }

    /// スクロール位置の提案
    ///
    /// 対象行が表示範囲外なら、全体に対する行の相対位置を新しい上端として返す。
    /// 範囲内なら None。
    pub fn scroll_hint(&self, site: &SiteId, row: usize, viewport: Viewport) -> Option<f32> {
        let rows = self.row_count(site);
        if rows == 0 || row >= rows {
            return None;
        }

        let top = row as f32 / rows as f32;
        let bottom = (row + 1) as f32 / rows as f32;
        if top < viewport.top || bottom > viewport.bottom {
            Some(top)
        } else {
            None
        }
    }
}
