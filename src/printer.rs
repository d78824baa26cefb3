//! 連続印刷ジョブ
//!
//! 枚数 > 0 のラベルを1つの連続セッション（途中カットなし）でまとめて印刷する。
//!
//! 状態遷移: `Idle → Started → (各ラベル: 印刷 / 失敗) → Ended`
//! セッション開始を拒否された場合のみ `AbortedAtStart` で終了し、文書には一切触れない。

use crate::batch::{BatchProgress, CancelFlag, ItemFailure};
use crate::device::{CutMode, DeviceError, LabelDevice, PrintSession};
use crate::error::{LabelError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintJobState {
    Idle,
    Started,
    Ended,
    AbortedAtStart,
}

/// 1ラベル分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Printed,
    OpenFailed(DeviceError),
    PrintFailed(DeviceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintItem {
    pub path: PathBuf,
    pub copies: u32,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintReport {
    pub items: Vec<PrintItem>,
    pub state: PrintJobState,
    pub cancelled: bool,
}

impl PrintReport {
    pub fn printed(&self) -> impl Iterator<Item = &PrintItem> {
        self.items
            .iter()
            .filter(|i| i.outcome == ItemOutcome::Printed)
    }

    /// 失敗した項目（個別に通知済み）
    pub fn failures(&self) -> Vec<ItemFailure> {
        self.items
            .iter()
            .filter_map(|i| match &i.outcome {
                ItemOutcome::Printed => None,
                ItemOutcome::OpenFailed(e) | ItemOutcome::PrintFailed(e) => Some(ItemFailure {
                    path: i.path.clone(),
                    error: e.clone(),
                }),
            })
            .collect()
    }

    pub fn copies_printed(&self) -> u64 {
        self.printed().map(|i| u64::from(i.copies)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// 印刷対象なし（エラーではない）
    NothingToPrint,
    /// ジョブ完了（全項目成功とは限らない）
    Completed(PrintReport),
}

#[derive(Debug)]
pub struct PrintJobRunner {
    session_mode: CutMode,
    item_mode: CutMode,
    state: PrintJobState,
}

impl Default for PrintJobRunner {
    fn default() -> Self {
        Self {
            session_mode: CutMode::Continuous,
            item_mode: CutMode::CutAtEnd,
            state: PrintJobState::Idle,
        }
    }
}

impl PrintJobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PrintJobState {
        self.state
    }

    /// 選択されたラベルを印刷
    ///
    /// `selection` は (文書パス, 枚数)。枚数0の項目は送らない。
    /// セッション開始失敗のみ `PrintSessionStart` エラーになる。
    pub fn run<D, F>(
        &mut self,
        device: &mut D,
        selection: &[(PathBuf, u32)],
        cancel: &CancelFlag,
        mut on_progress: F,
    ) -> Result<PrintOutcome>
    where
        D: LabelDevice + ?Sized,
        F: FnMut(BatchProgress),
    {
        self.state = PrintJobState::Idle;

        let jobs: Vec<&(PathBuf, u32)> = selection.iter().filter(|(_, copies)| *copies > 0).collect();
        if jobs.is_empty() {
            return Ok(PrintOutcome::NothingToPrint);
        }

        let mut session = match PrintSession::start(device, "", self.session_mode) {
            Ok(session) => session,
            Err(e) => {
                self.state = PrintJobState::AbortedAtStart;
                tracing::error!("failed to start printing: {}", e);
                return Err(LabelError::PrintSessionStart(e.to_string()));
            }
        };
        self.state = PrintJobState::Started;
        tracing::info!("print session started: {} label(s)", jobs.len());

        let total = jobs.len();
        let mut items = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, (path, copies)) in jobs.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("print job cancelled after {}/{}", index, total);
                cancelled = true;
                break;
            }

            let outcome = match session.open(path) {
                Err(e) => {
                    tracing::warn!("Failed to open: {}", path.display());
                    ItemOutcome::OpenFailed(e)
                }
                Ok(()) => match session.print_out(*copies, self.item_mode) {
                    Ok(()) => ItemOutcome::Printed,
                    Err(e) => {
                        tracing::warn!("Error printing {}: {}", path.display(), e);
                        ItemOutcome::PrintFailed(e)
                    }
                },
            };

            items.push(PrintItem {
                path: path.clone(),
                copies: *copies,
                outcome,
            });

            on_progress(BatchProgress {
                processed: index + 1,
                total,
            });
        }

        if let Err(e) = session.finish() {
            tracing::warn!("failed to end print session: {}", e);
        }
        self.state = PrintJobState::Ended;

        Ok(PrintOutcome::Completed(PrintReport {
            items,
            state: self.state,
            cancelled,
        }))
    }
}
