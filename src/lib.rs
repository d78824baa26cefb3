//! 店舗別ラベル発注・印刷ツール
//!
//! 店舗フォルダのラベル文書を走査して発注数を管理し、
//! 曜日テンプレートによる一括設定、価格の一括更新、連続印刷を行う。

pub mod app;
pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod grid;
pub mod order;
pub mod price;
pub mod printer;
pub mod session;
pub mod template;

pub use app::AppContext;
pub use error::{LabelError, Result};
