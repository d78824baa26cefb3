use crate::template::DaySelector;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "label-print")]
#[command(about = "Per-site label order quantities, price updates and batch printing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ラベルルート（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// プリンタに送らずメモリ上のデバイスで実行
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 店舗と区分ごとのラベル数を一覧表示
    Sites,

    /// 店舗の価格を表示/一括更新
    Price {
        /// 店舗名（フォルダ名）
        #[arg(short, long)]
        site: String,

        /// white/brown 全ラベルに設定する価格（例: 2.50）
        #[arg(long)]
        set: Option<String>,
    },

    /// 枚数 > 0 のラベルを連続印刷
    Print {
        #[arg(short, long)]
        site: String,

        /// テンプレートから枚数を設定する曜日（monday..saturday/reset/today）
        #[arg(short, long, value_parser = parse_day)]
        day: Option<DaySelector>,

        /// 枚数を個別指定（category/label=copies、複数可）
        #[arg(short, long = "qty")]
        quantities: Vec<String>,

        /// 印刷せずに対象を表示
        #[arg(long)]
        list: bool,
    },

    /// 対話式で枚数を入力して印刷
    Order {
        #[arg(short, long)]
        site: String,

        /// 開始前にテンプレートから枚数を設定する曜日
        #[arg(short, long, value_parser = parse_day)]
        day: Option<DaySelector>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// ラベルルートを設定
        #[arg(long)]
        set_root: Option<PathBuf>,

        /// 曜日ボタンを使える店舗を設定
        #[arg(long)]
        set_primary_site: Option<String>,

        /// デバイスブリッジのコマンドを設定
        #[arg(long)]
        set_bridge: Option<String>,
    },
}

fn parse_day(s: &str) -> Result<DaySelector, String> {
    s.parse::<DaySelector>().map_err(|e| e.to_string())
}
