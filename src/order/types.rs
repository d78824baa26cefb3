use std::fmt;
use std::path::PathBuf;

/// ラベル区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    White,
    Brown,
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::White, Category::Brown, Category::Other];

    /// 店舗フォルダ内のサブフォルダ名（テンプレート列名にも使う）
    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::White => "white",
            Category::Brown => "brown",
            Category::Other => "other",
        }
    }

    /// ナビゲーショングリッドの列（other は対象外）
    pub fn grid_column(&self) -> Option<usize> {
        match self {
            Category::White => Some(0),
            Category::Brown => Some(1),
            Category::Other => None,
        }
    }

    pub fn from_grid_column(col: usize) -> Option<Self> {
        match col {
            0 => Some(Category::White),
            1 => Some(Category::Brown),
            _ => None,
        }
    }

    /// 価格一括更新の対象か
    pub fn is_priced(&self) -> bool {
        !matches!(self, Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.folder_name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" | "w" => Ok(Category::White),
            "brown" | "b" => Ok(Category::Brown),
            "other" | "o" => Ok(Category::Other),
            _ => Err(format!("Unknown category: {}. Use white, brown, or other", s)),
        }
    }
}

/// 店舗ID（フォルダ名）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// (店舗, 区分, ラベル名) の安定ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub site: SiteId,
    pub category: Category,
    pub label: String,
}

impl EntryId {
    pub fn new(site: SiteId, category: Category, label: impl Into<String>) -> Self {
        Self {
            site,
            category,
            label: label.into(),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.site, self.category, self.label)
    }
}

/// ラベル1枚分の発注数レコード
#[derive(Debug, Clone)]
pub struct LabelEntry {
    pub id: EntryId,
    /// ラベル文書のフルパス
    pub path: PathBuf,
    pub quantity: u32,
}

impl LabelEntry {
    pub fn category(&self) -> Category {
        self.id.category
    }

    pub fn label(&self) -> &str {
        &self.id.label
    }
}

/// 区分フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// white + brown
    Priced,
    Only(Category),
}

impl CategoryFilter {
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Priced => category.is_priced(),
            CategoryFilter::Only(c) => *c == category,
        }
    }
}
