//! 自然順ソート
//!
//! 名前を数字列と非数字列に分割し、数字列は整数として、
//! 非数字列は大文字小文字を無視して比較する（"item2" < "item10"）。

use regex::Regex;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Part {
    Text(String),
    /// 先頭ゼロを除いた桁列（桁数 → 辞書順で整数比較と同じ結果になる）
    Number { digits_len: usize, digits: String },
}

fn natural_key(text: &str) -> Vec<Part> {
    lazy_static::lazy_static! {
        static ref RUN_RE: Regex = Regex::new(r"\d+|\D+").unwrap();
    }

    let mut parts = Vec::new();

    for m in RUN_RE.find_iter(text) {
        let run = m.as_str();
        if run.as_bytes()[0].is_ascii_digit() {
            // 非数字列と数字列が交互に並ぶよう先頭を揃える
            if parts.is_empty() {
                parts.push(Part::Text(String::new()));
            }
            let trimmed = run.trim_start_matches('0');
            parts.push(Part::Number {
                digits_len: trimmed.len(),
                digits: trimmed.to_string(),
            });
        } else {
            parts.push(Part::Text(run.to_lowercase()));
        }
    }

    parts
}

/// 自然順の比較
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}

/// 自然順でソート
pub fn sort_natural<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}
