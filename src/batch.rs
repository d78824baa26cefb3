//! 一括処理の共通部品
//!
//! 価格更新・印刷はどちらも呼び出し元のスレッドで最後まで実行される。
//! 各項目の処理後に進捗コールバックを呼ぶので、UI側はそこで再描画や
//! イベントループの処理を行う。

use crate::device::DeviceError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 項目単位の失敗（ログに記録して次の項目へ進む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub error: DeviceError,
}

/// 進捗（処理済み件数 / 全件数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

/// キャンセル要求フラグ（各項目の処理前に確認される）
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
