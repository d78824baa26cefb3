//! ラベル印刷デバイス連携
//!
//! 文書の open / フィールド読み書き / save / 印刷セッションを行う外部サービスの契約。
//! サービスは再入不可で同時に開ける文書は1つだけなので、
//! 文書と印刷セッションはガードで取得し、どの経路でも必ず解放する。

pub mod bridge;
pub mod memory;

use crate::config::BridgeConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Failed to open: {0}")]
    Open(PathBuf),

    #[error("Field '{field}' not found in {path}")]
    FieldMissing { path: PathBuf, field: String },

    #[error("Failed to save: {0}")]
    Save(PathBuf),

    #[error("Failed to print {path}: {message}")]
    Print { path: PathBuf, message: String },

    #[error("Print session refused: {0}")]
    SessionRefused(String),

    #[error("Device bridge error: {0}")]
    Bridge(String),
}

/// カット設定（デバイス側のコード値）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutMode {
    /// 連続（途中でカットしない）
    Continuous,
    /// 最後のラベルでカット
    CutAtEnd,
    /// 1枚ごとにカット
    CutEach,
}

impl CutMode {
    pub fn code(&self) -> u32 {
        match self {
            CutMode::Continuous => 0,
            CutMode::CutAtEnd => 1,
            CutMode::CutEach => 2,
        }
    }
}

/// デバイス操作の契約
pub trait LabelDevice {
    /// 文書を開く（既に開いている文書は置き換えられる）
    fn open(&mut self, path: &Path) -> Result<(), DeviceError>;

    /// 開いている文書のテキストフィールドを読む（フィールドが無ければ None）
    fn read_field(&mut self, name: &str) -> Result<Option<String>, DeviceError>;

    fn write_field(&mut self, name: &str, value: &str) -> Result<(), DeviceError>;

    fn save(&mut self) -> Result<(), DeviceError>;

    fn start_print(&mut self, label: &str, mode: CutMode) -> Result<(), DeviceError>;

    fn print_out(&mut self, copies: u32, mode: CutMode) -> Result<(), DeviceError>;

    fn end_print(&mut self) -> Result<(), DeviceError>;

    /// 開いている文書を閉じる（何も開いていなくてもよい）
    fn close(&mut self);
}

impl<D: LabelDevice + ?Sized> LabelDevice for Box<D> {
    fn open(&mut self, path: &Path) -> Result<(), DeviceError> {
        (**self).open(path)
    }

    fn read_field(&mut self, name: &str) -> Result<Option<String>, DeviceError> {
        (**self).read_field(name)
    }

    fn write_field(&mut self, name: &str, value: &str) -> Result<(), DeviceError> {
        (**self).write_field(name, value)
    }

    fn save(&mut self) -> Result<(), DeviceError> {
        (**self).save()
    }

    fn start_print(&mut self, label: &str, mode: CutMode) -> Result<(), DeviceError> {
        (**self).start_print(label, mode)
    }

    fn print_out(&mut self, copies: u32, mode: CutMode) -> Result<(), DeviceError> {
        (**self).print_out(copies, mode)
    }

    fn end_print(&mut self) -> Result<(), DeviceError> {
        (**self).end_print()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// 設定に応じたデバイスを用意（ドライランならメモリ上のデバイス）
pub fn connect(config: &BridgeConfig, dry_run: bool) -> crate::error::Result<Box<dyn LabelDevice>> {
    if dry_run {
        tracing::info!("dry run: device calls are not sent to the printer");
        return Ok(Box::new(memory::MemoryDevice::new()));
    }

    Ok(Box::new(bridge::BridgeDevice::spawn(config)?))
}

/// 開いた文書のガード（drop 時に close）
pub struct OpenDocument<'a, D: LabelDevice + ?Sized> {
    device: &'a mut D,
    path: PathBuf,
}

impl<'a, D: LabelDevice + ?Sized> OpenDocument<'a, D> {
    pub fn open(device: &'a mut D, path: &Path) -> Result<Self, DeviceError> {
        if let Err(e) = device.open(path) {
            device.close();
            return Err(e);
        }

        Ok(Self {
            device,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_field(&mut self, name: &str) -> Result<Option<String>, DeviceError> {
        self.device.read_field(name)
    }

    /// フィールドに書き込んで保存
    pub fn write_and_save(&mut self, name: &str, value: &str) -> Result<(), DeviceError> {
        self.device.write_field(name, value)?;
        self.device.save()
    }
}

impl<D: LabelDevice + ?Sized> Drop for OpenDocument<'_, D> {
    fn drop(&mut self) {
        self.device.close();
    }
}

/// 連続印刷セッションのガード
///
/// `finish` されずに drop された場合（キャンセル・パニック）も
/// セッション終了と文書クローズを行う。
pub struct PrintSession<'a, D: LabelDevice + ?Sized> {
    device: &'a mut D,
    finished: bool,
}

impl<'a, D: LabelDevice + ?Sized> PrintSession<'a, D> {
    pub fn start(device: &'a mut D, label: &str, mode: CutMode) -> Result<Self, DeviceError> {
        device.start_print(label, mode)?;
        Ok(Self {
            device,
            finished: false,
        })
    }

    /// セッション中の文書を切り替える
    pub fn open(&mut self, path: &Path) -> Result<(), DeviceError> {
        self.device.open(path)
    }

    /// 開いている文書を指定枚数印刷
    pub fn print_out(&mut self, copies: u32, mode: CutMode) -> Result<(), DeviceError> {
        self.device.print_out(copies, mode)
    }

    pub fn finish(mut self) -> Result<(), DeviceError> {
        self.finished = true;
        let result = self.device.end_print();
        self.device.close();
        result
    }
}

impl<D: LabelDevice + ?Sized> Drop for PrintSession<'_, D> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.device.end_print() {
            tracing::warn!("failed to end print session: {}", e);
        }
        self.device.close();
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{DeviceCall, MemoryDevice};
    use super::*;

    #[test]
    fn test_open_document_closes_on_drop() {
        let mut device = MemoryDevice::new().with_document("a.lbx", "£1.00");
        {
            let mut doc = OpenDocument::open(&mut device, Path::new("a.lbx")).unwrap();
            assert_eq!(doc.read_field("Price").unwrap().as_deref(), Some("£1.00"));
        }
        assert!(!device.is_open());
        assert_eq!(device.calls().last(), Some(&DeviceCall::Close));
    }

    #[test]
    fn test_open_failure_still_releases() {
        let mut device = MemoryDevice::new().fail_open("a.lbx");
        let Err(err) = OpenDocument::open(&mut device, Path::new("a.lbx")) else {
            panic!("expected open failure");
        };
        assert!(matches!(err, DeviceError::Open(_)));
        assert_eq!(device.calls().last(), Some(&DeviceCall::Close));
    }

    #[test]
    fn test_print_session_released_on_drop() {
        let mut device = MemoryDevice::new().with_document("a.lbx", "£1.00");
        {
            let mut session = PrintSession::start(&mut device, "", CutMode::Continuous).unwrap();
            session.open(Path::new("a.lbx")).unwrap();
            session.print_out(2, CutMode::CutAtEnd).unwrap();
        }
        assert!(!device.session_active());
        assert!(!device.is_open());
    }

    #[test]
    fn test_cut_mode_codes() {
        assert_eq!(CutMode::Continuous.code(), 0);
        assert_eq!(CutMode::CutAtEnd.code(), 1);
        assert_eq!(CutMode::CutEach.code(), 2);
    }
}
