//! 店舗カタログ
//!
//! ルートフォルダ直下の各サブフォルダを「店舗」とし、
//! white/brown/other の各区分フォルダからラベル文書を収集する。

pub mod natural;

use crate::config::Config;
use crate::error::{LabelError, Result};
use crate::grid::NavigationGrid;
use crate::order::{Category, EntryId, OrderModel, SiteId};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use natural::{natural_cmp, sort_natural};

/// ラベル文書
#[derive(Debug, Clone)]
pub struct LabelDocument {
    /// 拡張子を除いたファイル名
    pub label: String,
    pub path: PathBuf,
}

/// 区分フォルダ
#[derive(Debug, Clone)]
pub struct CategoryFolder {
    pub category: Category,
    /// フォルダが無ければ None（UI側でプレースホルダを表示）
    pub folder: Option<PathBuf>,
    /// 自然順
    pub documents: Vec<LabelDocument>,
}

#[derive(Debug, Clone)]
pub struct Site {
    pub id: SiteId,
    pub path: PathBuf,
    /// white, brown, other の順
    pub categories: Vec<CategoryFolder>,
}

impl Site {
    pub fn category(&self, category: Category) -> Option<&CategoryFolder> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn has_folder(&self, category: Category) -> bool {
        self.category(category)
            .map(|c| c.folder.is_some())
            .unwrap_or(false)
    }

    pub fn documents(&self, category: Category) -> &[LabelDocument] {
        self.category(category)
            .map(|c| c.documents.as_slice())
            .unwrap_or(&[])
    }

    pub fn document_count(&self) -> usize {
        self.categories.iter().map(|c| c.documents.len()).sum()
    }
}

/// ルートフォルダから店舗一覧を取得
pub fn discover(root: &Path, config: &Config) -> Result<Vec<Site>> {
    if !root.is_dir() {
        return Err(LabelError::FolderNotFound(root.display().to_string()));
    }

    let mut sites = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        // シンボリックリンク先も店舗として扱う
        if !entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        // .templates 等の隠しフォルダは店舗ではない
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path().to_path_buf();
        let categories = Category::ALL
            .iter()
            .map(|&category| scan_category(&path, category, config))
            .collect();

        sites.push(Site {
            id: SiteId::new(name),
            path,
            categories,
        });
    }

    sort_natural(&mut sites, |s| s.id.as_str());
    tracing::debug!("discovered {} site(s) under {}", sites.len(), root.display());

    Ok(sites)
}

fn scan_category(site_path: &Path, category: Category, config: &Config) -> CategoryFolder {
    let folder = site_path.join(category.folder_name());

    if !folder.is_dir() {
        tracing::debug!("no '{}' folder in {}", category, site_path.display());
        return CategoryFolder {
            category,
            folder: None,
            documents: Vec::new(),
        };
    }

    let documents = list_documents(&folder, config);
    CategoryFolder {
        category,
        folder: Some(folder),
        documents,
    }
}

/// 区分フォルダ直下のラベル文書を自然順で列挙
pub fn list_documents(folder: &Path, config: &Config) -> Vec<LabelDocument> {
    let mut documents: Vec<LabelDocument> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| {
            let path = e.path();
            let ext = path.extension()?.to_string_lossy().to_string();
            if !config.is_document_extension(&ext) {
                return None;
            }
            let label = path.file_stem()?.to_string_lossy().to_string();
            Some(LabelDocument {
                label,
                path: path.to_path_buf(),
            })
        })
        .collect();

    documents.sort_by(|a, b| natural_cmp(&a.label, &b.label).then_with(|| a.path.cmp(&b.path)));

    // 同名ファイルが拡張子違いで並んだ場合は先勝ち
    documents.dedup_by(|later, kept| {
        let duplicate = later.label == kept.label;
        if duplicate {
            tracing::warn!("duplicate label ignored: {}", later.path.display());
        }
        duplicate
    });

    documents
}

/// 店舗一覧を発注モデルとナビゲーショングリッドに登録
///
/// 全エントリは枚数0で作成される。グリッドには white/brown のみ。
pub fn register_sites(sites: &[Site], model: &mut OrderModel, grid: &mut NavigationGrid) {
    for site in sites {
        for folder in &site.categories {
            for doc in &folder.documents {
                let id = EntryId::new(site.id.clone(), folder.category, doc.label.clone());
                if !model.register(id.clone(), doc.path.clone()) {
                    continue;
                }
                grid.insert(id);
            }
        }
    }
}
