use crate::device::DeviceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Failed to read template {path}: {message}")]
    TemplateRead { path: String, message: String },

    #[error("Failed to start printing: {0}")]
    PrintSessionStart(String),

    #[error("No folder selected")]
    NoSiteSelected,

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("{day} is only available on the primary site (current site: {site})")]
    DayNotAllowed { day: String, site: String },

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Invalid quantity '{0}'. Use category/label=copies (e.g. white/ham=3)")]
    InvalidQuantitySpec(String),

    #[error("Unknown day: {0}")]
    UnknownDay(String),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Input error: {0}")]
    Interaction(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LabelError>;
