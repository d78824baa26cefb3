use crate::error::LabelError;
use crate::order::Category;
use chrono::{Datelike, Weekday};
use std::fmt;

/// 曜日ボタン（または Reset）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    Day(Weekday),
    /// 対応する列が存在しないため、一致したエントリは全て0になる
    Reset,
}

impl DaySelector {
    /// UIに並べるボタン（月〜土 + Reset）
    pub const BUTTONS: [DaySelector; 7] = [
        DaySelector::Day(Weekday::Mon),
        DaySelector::Day(Weekday::Tue),
        DaySelector::Day(Weekday::Wed),
        DaySelector::Day(Weekday::Thu),
        DaySelector::Day(Weekday::Fri),
        DaySelector::Day(Weekday::Sat),
        DaySelector::Reset,
    ];

    pub fn today() -> Self {
        DaySelector::Day(chrono::Local::now().weekday())
    }

    pub fn name(&self) -> &'static str {
        match self {
            DaySelector::Day(day) => weekday_name(*day),
            DaySelector::Reset => "Reset",
        }
    }

    /// テンプレートの列名 "<Day> <category>"
    pub fn column(&self, category: Category) -> String {
        format!("{} {}", self.name(), category.folder_name())
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, DaySelector::Reset)
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DaySelector {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "mon" | "monday" => Weekday::Mon,
            "tue" | "tues" | "tuesday" => Weekday::Tue,
            "wed" | "wednesday" => Weekday::Wed,
            "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
            "fri" | "friday" => Weekday::Fri,
            "sat" | "saturday" => Weekday::Sat,
            "sun" | "sunday" => Weekday::Sun,
            "reset" => return Ok(DaySelector::Reset),
            "today" => return Ok(DaySelector::today()),
            _ => return Err(LabelError::UnknownDay(s.to_string())),
        };
        Ok(DaySelector::Day(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        let monday = DaySelector::Day(Weekday::Mon);
        assert_eq!(monday.column(Category::White), "Monday white");
        assert_eq!(DaySelector::Day(Weekday::Tue).column(Category::Other), "Tuesday other");
        assert_eq!(DaySelector::Reset.column(Category::Brown), "Reset brown");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Monday".parse::<DaySelector>().unwrap(), DaySelector::Day(Weekday::Mon));
        assert_eq!("sat".parse::<DaySelector>().unwrap(), DaySelector::Day(Weekday::Sat));
        assert_eq!("RESET".parse::<DaySelector>().unwrap(), DaySelector::Reset);
        assert!("someday".parse::<DaySelector>().is_err());
    }

    #[test]
    fn test_buttons() {
        assert_eq!(DaySelector::BUTTONS.len(), 7);
        assert!(DaySelector::BUTTONS.iter().filter(|d| d.is_reset()).count() == 1);
        assert!(!DaySelector::BUTTONS.contains(&DaySelector::Day(Weekday::Sun)));
    }
}
