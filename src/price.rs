//! 価格の読み取り・一括更新
//!
//! 表示価格は white 区分の先頭ラベル（自然順）から読み取る。
//! 一括更新は white/brown の全ラベルが対象で、other は独自価格のため対象外。
//! 更新後は要求値ではなく実際に保存された値を再読込して表示する
//! （一部失敗時は一部の文書としか一致しない価格が表示されうる）。

use crate::batch::{BatchProgress, CancelFlag, ItemFailure};
use crate::config::Config;
use crate::device::{DeviceError, LabelDevice, OpenDocument};
use crate::error::{LabelError, Result};
use crate::order::{Category, CategoryFilter, OrderModel, SiteId};
use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PriceService {
    field: String,
    currency_symbol: String,
    no_price_text: String,
}

/// 一括更新の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceUpdate {
    /// 入力が空（何もしない）
    Cancelled,
    /// white/brown のラベルが無い
    NothingToUpdate,
    Completed(PriceUpdateReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceUpdateReport {
    /// 正規化後の要求価格
    pub requested: String,
    pub total: usize,
    pub updated: usize,
    pub failures: Vec<ItemFailure>,
    /// 更新後に再読込した表示価格
    pub displayed: String,
    pub cancelled: bool,
}

impl PriceService {
    pub fn new(
        field: impl Into<String>,
        currency_symbol: impl Into<String>,
        no_price_text: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            currency_symbol: currency_symbol.into(),
            no_price_text: no_price_text.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.price_field, &config.currency_symbol, &config.no_price_text)
    }

    pub fn no_price_text(&self) -> &str {
        &self.no_price_text
    }

    /// 入力価格を通貨記号付きに正規化
    ///
    /// 空入力は `Ok(None)`。数値として読めない入力は `InvalidPrice`。
    pub fn normalize_price(&self, input: &str) -> Result<Option<String>> {
        lazy_static::lazy_static! {
            static ref AMOUNT_RE: Regex = Regex::new(r"^\d+(\.\d{1,2})?$").unwrap();
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let amount = trimmed
            .strip_prefix(self.currency_symbol.as_str())
            .unwrap_or(trimmed)
            .trim();

        if !AMOUNT_RE.is_match(amount) {
            return Err(LabelError::InvalidPrice(input.to_string()));
        }

        Ok(Some(format!("{}{}", self.currency_symbol, amount)))
    }

    /// 店舗の表示価格を取得（読めなければ既定の表示文字列）
    pub fn read_price<D: LabelDevice + ?Sized>(
        &self,
        device: &mut D,
        model: &OrderModel,
        site: &SiteId,
    ) -> String {
        let whites = model.entries_matching(site, CategoryFilter::Only(Category::White));
        let Some(first) = whites.first() else {
            return self.no_price_text.clone();
        };

        match self.read_document_price(device, &first.path) {
            Ok(Some(price)) if !price.trim().is_empty() => price,
            Ok(_) => self.no_price_text.clone(),
            Err(e) => {
                tracing::warn!("Error reading price from {}: {}", first.path.display(), e);
                self.no_price_text.clone()
            }
        }
    }

    fn read_document_price<D: LabelDevice + ?Sized>(
        &self,
        device: &mut D,
        path: &Path,
    ) -> std::result::Result<Option<String>, DeviceError> {
        let mut doc = OpenDocument::open(device, path)?;
        doc.read_field(&self.field)
    }

    /// white/brown 全ラベルの価格を更新
    ///
    /// 1件の失敗で中断せず、ログに記録して次へ進む。
    /// 各件の処理後に `on_progress` を呼ぶ。
    pub fn set_price<D, F>(
        &self,
        device: &mut D,
        model: &OrderModel,
        site: &SiteId,
        input: &str,
        cancel: &CancelFlag,
        mut on_progress: F,
    ) -> Result<PriceUpdate>
    where
        D: LabelDevice + ?Sized,
        F: FnMut(BatchProgress),
    {
        let Some(requested) = self.normalize_price(input)? else {
            return Ok(PriceUpdate::Cancelled);
        };

        let paths: Vec<_> = model
            .entries_matching(site, CategoryFilter::Priced)
            .iter()
            .map(|e| e.path.clone())
            .collect();

        if paths.is_empty() {
            return Ok(PriceUpdate::NothingToUpdate);
        }

        let total = paths.len();
        tracing::info!("updating price to {} on {} label(s) in {}", requested, total, site);

        let mut updated = 0;
        let mut failures = Vec::new();
        let mut cancelled = false;

        for (index, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("price update cancelled after {}/{}", index, total);
                cancelled = true;
                break;
            }

            match self.write_document_price(device, path, &requested) {
                Ok(()) => updated += 1,
                Err(error) => {
                    tracing::warn!("Error updating {}: {}", path.display(), error);
                    failures.push(ItemFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }

            on_progress(BatchProgress {
                processed: index + 1,
                total,
            });
        }

        let displayed = self.read_price(device, model, site);

        Ok(PriceUpdate::Completed(PriceUpdateReport {
            requested,
            total,
            updated,
            failures,
            displayed,
            cancelled,
        }))
    }

    fn write_document_price<D: LabelDevice + ?Sized>(
        &self,
        device: &mut D,
        path: &Path,
        price: &str,
    ) -> std::result::Result<(), DeviceError> {
        let mut doc = OpenDocument::open(device, path)?;
        doc.write_and_save(&self.field, price)
    }
}
