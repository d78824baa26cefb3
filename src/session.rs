//! 対話式発注数入力
//!
//! 選択中店舗の white/brown をグリッドとして辿り、枚数を入力する。

use crate::app::AppContext;
use crate::error::{LabelError, Result};
use crate::grid::{Address, Direction, Viewport};
use crate::order::Category;
use dialoguer::Input;

/// 1画面に表示する行数
const PAGE_ROWS: usize = 10;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// 枚数を入力（数値でなければ0）
    Quantity(String),
    /// 移動
    Move(Direction),
    /// 合計を表示
    Total,
    /// 印刷して終了
    Print,
    /// 終了
    Quit,
}

/// 終了方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Print,
}

pub fn parse_action(input: &str) -> SessionAction {
    let trimmed = input.trim();
    match trimmed {
        "" => SessionAction::Move(Direction::Down),
        "t" | "T" => SessionAction::Total,
        "p" | "P" => SessionAction::Print,
        "q" | "Q" => SessionAction::Quit,
        _ => match trimmed.parse::<Direction>() {
            Ok(direction) => SessionAction::Move(direction),
            Err(_) => SessionAction::Quantity(trimmed.to_string()),
        },
    }
}

/// 対話式で枚数を入力
pub fn run_interactive_order(app: &mut AppContext) -> Result<SessionEnd> {
    let site = app.active_site().cloned().ok_or(LabelError::NoSiteSelected)?;

    let Some(mut focus) = app.grid().first(&site) else {
        println!("No white/brown labels in {}", site);
        return Ok(SessionEnd::Quit);
    };

    println!("---");
    println!("Keys: [number] set copies  [Enter] next  [u/d/l/r] move  [t] total  [p] print  [q] quit");
    println!("---\n");

    let rows = app.grid().row_count(&site);
    let page = PAGE_ROWS.min(rows) as f32 / rows as f32;
    let mut viewport = Viewport { top: 0.0, bottom: page };

    loop {
        let Some(id) = app.grid().entry_at(&site, focus.row, focus.col).cloned() else {
            break;
        };
        let quantity = app.model().get(&id).map(|e| e.quantity).unwrap_or(0);
        let column = match id.category {
            Category::White => "W",
            _ => "B",
        };

        if let Some(top) = app.grid().scroll_hint(&site, focus.row, viewport) {
            viewport = Viewport { top, bottom: top + page };
            println!("-- rows {}-{} of {} --", focus.row + 1, (focus.row + PAGE_ROWS).min(rows), rows);
        }

        println!("[{}/{}] {} {} (current: {})", focus.row + 1, rows, column, id.label, quantity);

        let input: String = Input::new()
            .with_prompt("copies")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| LabelError::Interaction(e.to_string()))?;

        match parse_action(&input) {
            SessionAction::Quantity(raw) => {
                let total = app.set_quantity(&id, &raw)?;
                let set = app.model().get(&id).map(|e| e.quantity).unwrap_or(0);
                println!("  → {} (total: {})\n", set, total);
                focus = step_or_stay(app, focus, Direction::Down);
            }
            SessionAction::Move(direction) => {
                focus = step_or_stay(app, focus, direction);
            }
            SessionAction::Total => {
                println!("  Total: {}\n", app.total()?);
            }
            SessionAction::Print => return Ok(SessionEnd::Print),
            SessionAction::Quit => return Ok(SessionEnd::Quit),
        }
    }

    Ok(SessionEnd::Quit)
}

fn step_or_stay(app: &AppContext, focus: Address, direction: Direction) -> Address {
    match app.move_focus(focus.row, focus.col, direction) {
        Some((address, _)) => address,
        None => {
            println!("  (no label there)\n");
            focus
        }
    }
}
