//! 発注数モデル
//!
//! (店舗, 区分, ラベル) ごとの印刷枚数を保持し、店舗ごとの合計を算出する。
//! エントリはカタログ構築時に一度だけ作成され、セッション中は削除されない。

mod types;

pub use types::{Category, CategoryFilter, EntryId, LabelEntry, SiteId};

use std::collections::HashMap;
use std::path::PathBuf;

/// 入力文字列を枚数に変換
///
/// 数値として読めない入力・負数は 0 扱い（自由入力を許容するため）。
/// 小数は切り捨てる。
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    if let Ok(n) = trimmed.parse::<u32>() {
        return n;
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => {
            if v >= u32::MAX as f64 {
                u32::MAX
            } else {
                v.trunc() as u32
            }
        }
        _ => 0,
    }
}

#[derive(Debug, Default)]
pub struct OrderModel {
    entries: Vec<LabelEntry>,
    index: HashMap<EntryId, usize>,
    /// 店舗 → エントリ位置（登録順）
    by_site: HashMap<SiteId, Vec<usize>>,
}

impl OrderModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを枚数0で登録（登録済みなら何もしない）
    pub fn register(&mut self, id: EntryId, path: PathBuf) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }

        let pos = self.entries.len();
        self.by_site.entry(id.site.clone()).or_default().push(pos);
        self.index.insert(id.clone(), pos);
        self.entries.push(LabelEntry {
            id,
            path,
            quantity: 0,
        });
        true
    }

    pub fn get(&self, id: &EntryId) -> Option<&LabelEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// 自由入力の枚数を設定（未登録IDなら false）
    pub fn set_quantity(&mut self, id: &EntryId, raw_input: &str) -> bool {
        self.set_count(id, parse_quantity(raw_input))
    }

    pub fn set_count(&mut self, id: &EntryId, quantity: u32) -> bool {
        match self.index.get(id) {
            Some(&pos) => {
                self.entries[pos].quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// 店舗の合計枚数（全区分）
    pub fn total_for(&self, site: &SiteId) -> u64 {
        self.site_positions(site)
            .iter()
            .map(|&pos| u64::from(self.entries[pos].quantity))
            .sum()
    }

    /// 店舗のエントリを登録順で取得
    pub fn entries_matching(&self, site: &SiteId, filter: CategoryFilter) -> Vec<&LabelEntry> {
        self.site_positions(site)
            .iter()
            .map(|&pos| &self.entries[pos])
            .filter(|e| filter.accepts(e.category()))
            .collect()
    }

    /// 印刷対象（枚数 > 0）を (パス, 枚数) で取得
    pub fn print_selection(&self, site: &SiteId) -> Vec<(PathBuf, u32)> {
        self.entries_matching(site, CategoryFilter::All)
            .into_iter()
            .filter(|e| e.quantity > 0)
            .map(|e| (e.path.clone(), e.quantity))
            .collect()
    }

    /// 店舗内でラベル名が一致するエントリを検索
    pub fn find(&self, site: &SiteId, category: Category, label: &str) -> Option<&LabelEntry> {
        self.get(&EntryId::new(site.clone(), category, label))
    }

    pub fn sites(&self) -> impl Iterator<Item = &SiteId> {
        self.by_site.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn site_positions(&self, site: &SiteId) -> &[usize] {
        self.by_site.get(site).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(site: &str, category: Category, label: &str) -> EntryId {
        EntryId::new(SiteId::new(site), category, label)
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("5"), 5);
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity("3.9"), 3);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("-4"), 0);
        assert_eq!(parse_quantity("NaN"), 0);
    }

    #[test]
    fn test_register_is_unique() {
        let mut model = OrderModel::new();
        let ham = id("Kitchen", Category::White, "ham");
        assert!(model.register(ham.clone(), PathBuf::from("a.lbx")));
        assert!(!model.register(ham.clone(), PathBuf::from("b.lbx")));
        assert_eq!(model.len(), 1);
        assert_eq!(model.get(&ham).unwrap().path, PathBuf::from("a.lbx"));
    }

    #[test]
    fn test_total_across_categories() {
        let mut model = OrderModel::new();
        let a = id("Kitchen", Category::White, "ham");
        let b = id("Kitchen", Category::Brown, "ham");
        let c = id("Kitchen", Category::Other, "panini");
        let other_site = id("Kiosk", Category::White, "ham");
        for e in [&a, &b, &c, &other_site] {
            model.register(e.clone(), PathBuf::from(format!("{}.lbx", e.label)));
        }

        model.set_quantity(&a, "2");
        model.set_quantity(&b, "oops");
        model.set_quantity(&c, "4");
        model.set_quantity(&other_site, "100");

        assert_eq!(model.total_for(&SiteId::new("Kitchen")), 6);
        assert_eq!(model.total_for(&SiteId::new("Kiosk")), 100);
        assert_eq!(model.total_for(&SiteId::new("Nowhere")), 0);
    }

    #[test]
    fn test_set_quantity_unknown_entry() {
        let mut model = OrderModel::new();
        assert!(!model.set_quantity(&id("Kitchen", Category::White, "ham"), "3"));
    }

    #[test]
    fn test_entries_matching_filter() {
        let mut model = OrderModel::new();
        model.register(id("S", Category::White, "a"), PathBuf::from("a"));
        model.register(id("S", Category::Brown, "b"), PathBuf::from("b"));
        model.register(id("S", Category::Other, "c"), PathBuf::from("c"));

        let site = SiteId::new("S");
        assert_eq!(model.entries_matching(&site, CategoryFilter::All).len(), 3);
        let priced: Vec<_> = model
            .entries_matching(&site, CategoryFilter::Priced)
            .iter()
            .map(|e| e.label().to_string())
            .collect();
        assert_eq!(priced, vec!["a", "b"]);
        assert_eq!(
            model.entries_matching(&site, CategoryFilter::Only(Category::Other)).len(),
            1
        );
    }

    #[test]
    fn test_print_selection_skips_zero() {
        let mut model = OrderModel::new();
        let a = id("S", Category::White, "a");
        let b = id("S", Category::White, "b");
        let c = id("S", Category::Other, "c");
        model.register(a.clone(), PathBuf::from("a.lbx"));
        model.register(b.clone(), PathBuf::from("b.lbx"));
        model.register(c.clone(), PathBuf::from("c.lbx"));
        model.set_quantity(&a, "3");
        model.set_quantity(&c, "2");

        let selection = model.print_selection(&SiteId::new("S"));
        assert_eq!(
            selection,
            vec![(PathBuf::from("a.lbx"), 3), (PathBuf::from("c.lbx"), 2)]
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("White".parse::<Category>().unwrap(), Category::White);
        assert_eq!("b".parse::<Category>().unwrap(), Category::Brown);
        assert!("green".parse::<Category>().is_err());
    }
}
