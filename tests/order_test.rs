//! 発注数・テンプレート適用テスト
//!
//! 店舗フォルダを一時ディレクトリに作成し、AppContext 経由で検証

use label_print_rust::config::Config;
use label_print_rust::error::LabelError;
use label_print_rust::grid::Direction;
use label_print_rust::order::{Category, EntryId, SiteId};
use label_print_rust::template::{DaySelector, TemplateTable};
use label_print_rust::AppContext;
use chrono::Weekday;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), "").unwrap();
    }
}

/// Kitchen: white 3件 / brown 1件 / other 1件、Cafe: white 1件
fn label_root() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    let kitchen = dir.path().join("Kitchen");
    touch(&kitchen.join("white"), &["ham.lbx", "egg.lbx", "tuna.lbx"]);
    touch(&kitchen.join("brown"), &["cheese.lbx"]);
    touch(&kitchen.join("other"), &["panini.lbx"]);
    touch(&dir.path().join("Cafe").join("white"), &["ham.lbx"]);
    dir
}

fn write_templates(root: &Path) {
    let templates = root.join(".templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("main.csv"),
        "Name,Monday white,Monday brown,Tuesday white\n\
         ham,5,,2\n\
         cheese,,4,\n\
         egg,abc,,1\n",
    )
    .unwrap();
    fs::write(
        templates.join("other.csv"),
        "Name,Monday other\npanini,2\n",
    )
    .unwrap();
}

fn id(category: Category, label: &str) -> EntryId {
    EntryId::new(SiteId::new("Kitchen"), category, label)
}

fn quantity(app: &AppContext, category: Category, label: &str) -> u32 {
    app.model().get(&id(category, label)).map(|e| e.quantity).unwrap()
}

/// 店舗走査と初期状態（全て0）
#[test]
fn test_load_registers_all_entries() {
    let root = label_root();
    let mut app = AppContext::load(Config::default(), root.path()).unwrap();

    let names: Vec<_> = app.sites().iter().map(|s| s.id.as_str().to_string()).collect();
    assert_eq!(names, vec!["Cafe", "Kitchen"]);
    assert_eq!(app.model().len(), 6);

    app.select_site("Kitchen").unwrap();
    assert_eq!(app.total().unwrap(), 0);
    assert_eq!(app.displayed_price(), "£0.00");
}

/// 枚数入力と店舗合計（other を含む・数値でなければ0）
#[test]
fn test_quantities_and_total() {
    let root = label_root();
    let mut app = AppContext::load(Config::default(), root.path()).unwrap();
    app.select_site("Kitchen").unwrap();

    assert_eq!(app.set_quantity(&id(Category::White, "ham"), "3").unwrap(), 3);
    assert_eq!(app.set_quantity(&id(Category::Brown, "cheese"), "2").unwrap(), 5);
    assert_eq!(app.apply_quantity_spec("other/panini=4").unwrap(), 9);
    assert_eq!(app.set_quantity(&id(Category::White, "ham"), "lots").unwrap(), 6);

    assert!(matches!(
        app.apply_quantity_spec("white/missing=1"),
        Err(LabelError::UnknownLabel(_))
    ));
    assert!(matches!(
        app.apply_quantity_spec("ham=1"),
        Err(LabelError::InvalidQuantitySpec(_))
    ));

    // 他店舗の合計には影響しない
    app.select_site("Cafe").unwrap();
    assert_eq!(app.total().unwrap(), 0);
}

/// グリッド移動（white/brown の2列、範囲外は移動しない）
#[test]
fn test_grid_navigation() {
    let root = label_root();
    let mut app = AppContext::load(Config::default(), root.path()).unwrap();
    app.select_site("Kitchen").unwrap();

    // white: egg, ham, tuna（自然順）
    let (address, entry) = app.move_focus(0, 0, Direction::Down).unwrap();
    assert_eq!((address.row, address.col), (1, 0));
    assert_eq!(entry.label(), "ham");

    let (address, entry) = app.move_focus(0, 0, Direction::Right).unwrap();
    assert_eq!((address.row, address.col), (0, 1));
    assert_eq!(entry.label(), "cheese");

    // brown は1件のみ
    assert!(app.move_focus(2, 0, Direction::Right).is_none());
    assert!(app.move_focus(0, 0, Direction::Up).is_none());
    assert!(app.move_focus(0, 0, Direction::Left).is_none());
    assert!(app.move_focus(2, 0, Direction::Down).is_none());
}

/// Monday: 行のあるラベルは列の値、行の無いラベルは変更しない
#[test]
fn test_populate_monday() {
    let root = label_root();
    write_templates(root.path());

    let mut app = AppContext::load(Config::default(), root.path()).unwrap();
    app.select_site("Kitchen").unwrap();
    app.set_quantity(&id(Category::White, "tuna"), "7").unwrap();

    let summary = app.populate(DaySelector::Day(Weekday::Mon)).unwrap();

    assert_eq!(quantity(&app, Category::White, "ham"), 5);
    assert_eq!(quantity(&app, Category::Brown, "cheese"), 4);
    assert_eq!(quantity(&app, Category::Other, "panini"), 2);
    // 数値でない値は0
    assert_eq!(quantity(&app, Category::White, "egg"), 0);
    // テンプレートに無いラベルはそのまま
    assert_eq!(quantity(&app, Category::White, "tuna"), 7);

    assert_eq!(summary.updated, 4);
    assert_eq!(summary.untouched, 1);
    assert_eq!(summary.total, 18);
}

/// 列が空欄のラベルは0になる
#[test]
fn test_populate_blank_cell_is_zero() {
    let root = label_root();
    write_templates(root.path());

    let mut app = AppContext::load(Config::default(), root.path()).unwrap();
    app.select_site("Kitchen").unwrap();
    app.set_quantity(&id(Category::White, "ham"), "9").unwrap();

    app.populate(DaySelector::Day(Weekday::Tue)).unwrap();
    assert_eq!(quantity(&app, Category::White, "ham"), 2);
    assert_eq!(quantity(&app, Category::White, "egg"), 1);
    // "Tuesday brown" 列が無い
    assert_eq!(quantity(&app, Category::Brown, "cheese"), 0);
}

/// Reset はテンプレートに行のあるラベルを0にする
#[test]
fn test_populate_reset() {
    let root = label_root();
    write_templates(root.path());

    let mut app = AppContext::load(Config::default(), root.path()).unwrap();
    app.select_site("Kitchen").unwrap();
    app.populate(DaySelector::Day(Weekday::Mon)).unwrap();
    app.set_quantity(&id(Category::White, "tuna"), "3").unwrap();

    let summary = app.populate(DaySelector::Reset).unwrap();

    assert_eq!(quantity(&app, Category::White, "ham"), 0);
    assert_eq!(quantity(&app, Category::Brown, "cheese"), 0);
    assert_eq!(quantity(&app, Category::Other, "panini"), 0);
    assert_eq!(quantity(&app, Category::White, "tuna"), 3);
    assert_eq!(summary.total, 3);
}

/// テンプレートが読めなければ発注数は一切変更しない
#[test]
fn test_populate_load_failure_changes_nothing() {
    let root = label_root();
    let templates = root.path().join(".templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("main.csv"), "Name,Monday white\nham,5\n").unwrap();
    // other.csv が無い

    let mut app = AppContext::load(Config::default(), root.path()).unwrap();
    app.select_site("Kitchen").unwrap();
    app.set_quantity(&id(Category::White, "ham"), "1").unwrap();

    let result = app.populate(DaySelector::Day(Weekday::Mon));
    assert!(matches!(result, Err(LabelError::TemplateRead { .. })));
    assert_eq!(quantity(&app, Category::White, "ham"), 1);
    assert_eq!(app.total().unwrap(), 1);
}

/// 曜日は主店舗のみ、Reset は全店舗
#[test]
fn test_day_buttons_only_on_primary_site() {
    let root = label_root();
    write_templates(root.path());

    let config = Config {
        primary_site: Some("Kitchen".to_string()),
        ..Default::default()
    };
    let mut app = AppContext::load(config, root.path()).unwrap();
    app.select_site("Cafe").unwrap();

    let result = app.populate(DaySelector::Day(Weekday::Mon));
    assert!(matches!(result, Err(LabelError::DayNotAllowed { .. })));

    let summary = app.populate(DaySelector::Reset).unwrap();
    assert_eq!(summary.updated, 1);
}

/// Excel テンプレート
#[test]
fn test_populate_from_xlsx() {
    let root = label_root();
    let templates = root.path().join(".templates");
    fs::create_dir_all(&templates).unwrap();

    let main_path = templates.join("main.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Wednesday white").unwrap();
    sheet.write_string(1, 0, "ham").unwrap();
    sheet.write_number(1, 1, 6.0).unwrap();
    sheet.write_string(2, 0, "egg").unwrap();
    sheet.write_number(2, 1, 2.0).unwrap();
    workbook.save(&main_path).unwrap();

    let other_path = templates.join("other.csv");
    fs::write(&other_path, "Name,Wednesday other\npanini,1\n").unwrap();

    let table = TemplateTable::load(&main_path).unwrap();
    assert_eq!(table.lookup("ham", "Wednesday white"), Some("6"));

    let config = Config {
        main_template: Some(main_path),
        other_template: Some(other_path),
        ..Default::default()
    };
    let mut app = AppContext::load(config, root.path()).unwrap();
    app.select_site("Kitchen").unwrap();

    let summary = app.populate(DaySelector::Day(Weekday::Wed)).unwrap();
    assert_eq!(quantity(&app, Category::White, "ham"), 6);
    assert_eq!(quantity(&app, Category::White, "egg"), 2);
    assert_eq!(quantity(&app, Category::Other, "panini"), 1);
    assert_eq!(summary.total, 9);
}
