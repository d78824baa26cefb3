//! メモリ上のデバイス（ドライラン・テスト用）
//!
//! 文書ごとのフィールド値を保持し、save されたものだけを永続化する。
//! 失敗注入と呼び出し履歴の記録に対応。

use super::{CutMode, DeviceError, LabelDevice};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const PRICE_FIELD: &str = "Price";

/// 記録されるデバイス呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Open(PathBuf),
    ReadField(String),
    WriteField(String, String),
    Save,
    StartPrint(CutMode),
    PrintOut(u32, CutMode),
    EndPrint,
    Close,
}

#[derive(Debug, Default)]
pub struct MemoryDevice {
    /// 保存済みのフィールド値
    documents: HashMap<PathBuf, HashMap<String, String>>,
    /// 開いている文書と編集中のフィールド値
    current: Option<(PathBuf, HashMap<String, String>)>,
    session_active: bool,
    refuse_session: bool,
    fail_open: HashSet<PathBuf>,
    fail_save: HashSet<PathBuf>,
    fail_print: HashSet<PathBuf>,
    missing_field: HashSet<PathBuf>,
    calls: Vec<DeviceCall>,
    printed: Vec<(PathBuf, u32)>,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// 価格フィールドを持つ文書を登録
    pub fn with_document(self, path: impl Into<PathBuf>, price: &str) -> Self {
        self.with_field(path, PRICE_FIELD, price)
    }

    pub fn with_field(mut self, path: impl Into<PathBuf>, name: &str, value: &str) -> Self {
        self.documents
            .entry(path.into())
            .or_default()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn fail_open(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_open.insert(path.into());
        self
    }

    pub fn fail_save(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_save.insert(path.into());
        self
    }

    pub fn fail_print(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_print.insert(path.into());
        self
    }

    /// 書き込み時にフィールドが見つからない文書
    pub fn missing_field(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_field.insert(path.into());
        self
    }

    pub fn refuse_session(mut self) -> Self {
        self.refuse_session = true;
        self
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn open_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Open(_)))
            .count()
    }

    /// 印刷済み (文書, 枚数)
    pub fn printed(&self) -> &[(PathBuf, u32)] {
        &self.printed
    }

    /// 保存済みのフィールド値
    pub fn stored_field(&self, path: &Path, name: &str) -> Option<&str> {
        self.documents.get(path)?.get(name).map(String::as_str)
    }

    pub fn stored_price(&self, path: &Path) -> Option<&str> {
        self.stored_field(path, PRICE_FIELD)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn session_active(&self) -> bool {
        self.session_active
    }

    fn record(&mut self, call: DeviceCall) {
        tracing::debug!("[memory device] {:?}", call);
        self.calls.push(call);
    }

    fn current_path(&self) -> Result<&PathBuf, DeviceError> {
        self.current
            .as_ref()
            .map(|(p, _)| p)
            .ok_or_else(|| DeviceError::Bridge("no document is open".into()))
    }
}

impl LabelDevice for MemoryDevice {
    fn open(&mut self, path: &Path) -> Result<(), DeviceError> {
        self.record(DeviceCall::Open(path.to_path_buf()));
        self.current = None;

        if self.fail_open.contains(path) {
            return Err(DeviceError::Open(path.to_path_buf()));
        }

        let fields = self.documents.get(path).cloned().unwrap_or_default();
        self.current = Some((path.to_path_buf(), fields));
        Ok(())
    }

    fn read_field(&mut self, name: &str) -> Result<Option<String>, DeviceError> {
        self.record(DeviceCall::ReadField(name.to_string()));
        let (_, fields) = self
            .current
            .as_ref()
            .ok_or_else(|| DeviceError::Bridge("no document is open".into()))?;
        Ok(fields.get(name).cloned())
    }

    fn write_field(&mut self, name: &str, value: &str) -> Result<(), DeviceError> {
        self.record(DeviceCall::WriteField(name.to_string(), value.to_string()));
        let path = self.current_path()?.clone();

        if self.missing_field.contains(&path) {
            return Err(DeviceError::FieldMissing {
                path,
                field: name.to_string(),
            });
        }

        if let Some((_, fields)) = self.current.as_mut() {
            fields.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), DeviceError> {
        self.record(DeviceCall::Save);
        let path = self.current_path()?.clone();

        if self.fail_save.contains(&path) {
            return Err(DeviceError::Save(path));
        }

        if let Some((_, fields)) = &self.current {
            self.documents.insert(path, fields.clone());
        }
        Ok(())
    }

    fn start_print(&mut self, label: &str, mode: CutMode) -> Result<(), DeviceError> {
        self.record(DeviceCall::StartPrint(mode));

        if self.refuse_session {
            return Err(DeviceError::SessionRefused(format!(
                "session '{}' refused by device",
                label
            )));
        }

        self.session_active = true;
        Ok(())
    }

    fn print_out(&mut self, copies: u32, mode: CutMode) -> Result<(), DeviceError> {
        self.record(DeviceCall::PrintOut(copies, mode));
        let path = self.current_path()?.clone();

        if !self.session_active {
            return Err(DeviceError::Print {
                path,
                message: "no print session".into(),
            });
        }

        if self.fail_print.contains(&path) {
            return Err(DeviceError::Print {
                path,
                message: "printer error".into(),
            });
        }

        self.printed.push((path, copies));
        Ok(())
    }

    fn end_print(&mut self) -> Result<(), DeviceError> {
        self.record(DeviceCall::EndPrint);
        self.session_active = false;
        Ok(())
    }

    fn close(&mut self) {
        self.record(DeviceCall::Close);
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsaved_changes_are_discarded() {
        let mut device = MemoryDevice::new().with_document("a.lbx", "£1.00");
        device.open(Path::new("a.lbx")).unwrap();
        device.write_field("Price", "£9.99").unwrap();
        device.close();

        assert_eq!(device.stored_price(Path::new("a.lbx")), Some("£1.00"));
    }

    #[test]
    fn test_save_persists() {
        let mut device = MemoryDevice::new();
        device.open(Path::new("b.lbx")).unwrap();
        device.write_field("Price", "£2.00").unwrap();
        device.save().unwrap();
        device.close();

        assert_eq!(device.stored_price(Path::new("b.lbx")), Some("£2.00"));
    }

    #[test]
    fn test_read_without_open_fails() {
        let mut device = MemoryDevice::new();
        assert!(device.read_field("Price").is_err());
    }

    #[test]
    fn test_print_requires_session() {
        let mut device = MemoryDevice::new();
        device.open(Path::new("a.lbx")).unwrap();
        assert!(matches!(device.print_out(1, CutMode::CutAtEnd), Err(DeviceError::Print { .. })));
        assert!(device.printed().is_empty());
    }
}
