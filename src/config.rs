use crate::error::{LabelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ラベルルートを上書きする環境変数
pub const ROOT_ENV: &str = "LABEL_PRINT_ROOT";

/// テンプレートの既定配置先（ルート直下の隠しフォルダ）
const TEMPLATE_DIR: &str = ".templates";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root_dir: Option<PathBuf>,
    /// white/brown 用テンプレート
    pub main_template: Option<PathBuf>,
    /// other 用テンプレート
    pub other_template: Option<PathBuf>,
    /// 曜日ボタンを使える店舗（None なら全店舗）
    pub primary_site: Option<String>,
    pub price_field: String,
    pub currency_symbol: String,
    pub no_price_text: String,
    pub document_extensions: Vec<String>,
    pub bridge: BridgeConfig,
}

/// 印刷デバイスのブリッジプロセス設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            command: "bpac-bridge".into(),
            args: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: None,
            main_template: None,
            other_template: None,
            primary_site: None,
            price_field: "Price".into(),
            currency_symbol: "£".into(),
            no_price_text: "£0.00".into(),
            document_extensions: vec!["lbx".into(), "lbl".into()],
            bridge: BridgeConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LabelError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("label-print").join("config.json"))
    }

    /// ラベルルートを解決（環境変数 > 設定ファイル）
    pub fn resolve_root(&self) -> Result<PathBuf> {
        if let Ok(root) = std::env::var(ROOT_ENV) {
            if !root.trim().is_empty() {
                return Ok(PathBuf::from(root));
            }
        }

        self.root_dir.clone().ok_or_else(|| {
            LabelError::Config(format!(
                "label root is not set. Use `label-print config --set-root PATH` or {}",
                ROOT_ENV
            ))
        })
    }

    pub fn main_template_path(&self, root: &Path) -> PathBuf {
        self.main_template
            .clone()
            .unwrap_or_else(|| root.join(TEMPLATE_DIR).join("main.csv"))
    }

    pub fn other_template_path(&self, root: &Path) -> PathBuf {
        self.other_template
            .clone()
            .unwrap_or_else(|| root.join(TEMPLATE_DIR).join("other.csv"))
    }

    /// 曜日ボタンがこの店舗で使えるか
    pub fn is_primary_site(&self, site: &str) -> bool {
        match &self.primary_site {
            Some(primary) => primary == site,
            None => true,
        }
    }

    /// 対応するラベル文書の拡張子か（大文字小文字を区別しない）
    pub fn is_document_extension(&self, ext: &str) -> bool {
        self.document_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}
