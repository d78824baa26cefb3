//! 店舗フォルダ走査テスト
//!
//! 自然順・区分フォルダの欠落・拡張子フィルタを検証

use label_print_rust::catalog;
use label_print_rust::config::Config;
use label_print_rust::order::Category;
use label_print_rust::AppContext;
use std::fs;
use tempfile::tempdir;

/// ラベルと店舗は自然順（item2 < item10）
#[test]
fn test_natural_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    for site in ["Site10", "Site2", "site1"] {
        let white = dir.path().join(site).join("white");
        fs::create_dir_all(&white).unwrap();
        for name in ["item10.lbx", "Item2.lbx", "item1.lbx"] {
            fs::write(white.join(name), "").unwrap();
        }
    }

    let sites = catalog::discover(dir.path(), &Config::default()).unwrap();
    let names: Vec<_> = sites.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(names, vec!["site1", "Site2", "Site10"]);

    let labels: Vec<_> = sites[0]
        .documents(Category::White)
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(labels, vec!["item1", "Item2", "item10"]);
}

/// 区分フォルダが無くても店舗は一覧に出る
#[test]
fn test_missing_category_folders() {
    let dir = tempdir().expect("Failed to create temp dir");
    let site = dir.path().join("Kiosk");
    fs::create_dir_all(site.join("brown")).unwrap();
    fs::write(site.join("brown").join("roll.lbx"), "").unwrap();

    let sites = catalog::discover(dir.path(), &Config::default()).unwrap();
    assert_eq!(sites.len(), 1);

    let kiosk = &sites[0];
    assert!(!kiosk.has_folder(Category::White));
    assert!(kiosk.has_folder(Category::Brown));
    assert!(!kiosk.has_folder(Category::Other));
    assert!(kiosk.documents(Category::White).is_empty());
    assert_eq!(kiosk.document_count(), 1);
}

/// ラベル文書以外・サブフォルダ・隠しフォルダは無視
#[test]
fn test_ignores_non_documents() {
    let dir = tempdir().expect("Failed to create temp dir");
    let white = dir.path().join("Kitchen").join("white");
    fs::create_dir_all(white.join("archive")).unwrap();
    fs::write(white.join("ham.LBX"), "").unwrap();
    fs::write(white.join("notes.txt"), "").unwrap();
    fs::write(white.join("archive").join("old.lbx"), "").unwrap();
    fs::create_dir_all(dir.path().join(".templates")).unwrap();
    fs::write(dir.path().join("readme.txt"), "").unwrap();

    let sites = catalog::discover(dir.path(), &Config::default()).unwrap();
    assert_eq!(sites.len(), 1);

    let labels: Vec<_> = sites[0]
        .documents(Category::White)
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(labels, vec!["ham"]);
}

/// シンボリックリンクの店舗フォルダ・ラベル文書も対象
#[cfg(unix)]
#[test]
fn test_follows_symlinks() {
    use std::os::unix::fs::symlink;

    let shared = tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(shared.path().join("white")).unwrap();
    fs::write(shared.path().join("white").join("ham.lbx"), "").unwrap();
    fs::write(shared.path().join("tuna.lbx"), "").unwrap();

    let dir = tempdir().expect("Failed to create temp dir");
    symlink(shared.path(), dir.path().join("Shared")).unwrap();

    let white = dir.path().join("Kitchen").join("white");
    fs::create_dir_all(&white).unwrap();
    fs::write(white.join("egg.lbx"), "").unwrap();
    symlink(shared.path().join("tuna.lbx"), white.join("tuna.lbx")).unwrap();

    let sites = catalog::discover(dir.path(), &Config::default()).unwrap();
    let names: Vec<_> = sites.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(names, vec!["Kitchen", "Shared"]);

    let kitchen: Vec<_> = sites[0]
        .documents(Category::White)
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(kitchen, vec!["egg", "tuna"]);
    assert_eq!(sites[1].documents(Category::White).len(), 1);
}

/// 拡張子違いの同名ラベルは1件として数える
#[test]
fn test_duplicate_labels_counted_once() {
    let dir = tempdir().expect("Failed to create temp dir");
    let white = dir.path().join("Kitchen").join("white");
    fs::create_dir_all(&white).unwrap();
    for name in ["ham.lbx", "ham.lbl", "egg.lbx"] {
        fs::write(white.join(name), "").unwrap();
    }

    let app = AppContext::load(Config::default(), dir.path()).unwrap();
    assert_eq!(app.sites()[0].document_count(), 2);
    assert_eq!(app.model().len(), 2);
}
