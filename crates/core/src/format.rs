//! Portuguese display helpers for durations, dates and greetings.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

/// Format a duration in minutes ("5 minutos", "1 hora", "1h 30min").
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{} minuto{}", minutes, plural(minutes));
    }

    let hours = minutes / 60;
    let mins = minutes % 60;

    if mins == 0 {
        return format!("{} hora{}", hours, plural(hours));
    }

    format!("{}h {}min", hours, mins)
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// Long Brazilian date: "18 de outubro de 2026".
pub fn format_date_br(date: NaiveDate) -> String {
    format!("{:02} de {} de {}", date.day(), month_name(date), date.year())
}

/// "Hoje", "Ontem", or the day and month.
pub fn format_relative_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Hoje".to_string()
    } else if today - date == Duration::days(1) {
        "Ontem".to_string()
    } else {
        format!("{:02} de {}", date.day(), month_name(date))
    }
}

/// Part of the day, used for greetings and planner slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    /// Before noon
    Morning,
    /// Noon until 18h
    Afternoon,
    /// 18h onwards
    Night,
}

impl DayPeriod {
    /// Period for an hour of the day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            DayPeriod::Morning
        } else if hour < 18 {
            DayPeriod::Afternoon
        } else {
            DayPeriod::Night
        }
    }

    /// Portuguese name.
    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "Manhã",
            DayPeriod::Afternoon => "Tarde",
            DayPeriod::Night => "Noite",
        }
    }

    /// Greeting for this period.
    pub fn greeting(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "Bom dia",
            DayPeriod::Afternoon => "Boa tarde",
            DayPeriod::Night => "Boa noite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(1), "1 minuto");
        assert_eq!(format_duration(0), "0 minutos");
        assert_eq!(format_duration(15), "15 minutos");
        assert_eq!(format_duration(60), "1 hora");
        assert_eq!(format_duration(120), "2 horas");
        assert_eq!(format_duration(90), "1h 30min");
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_date_br(date(2026, 10, 18)), "18 de outubro de 2026");
        assert_eq!(format_date_br(date(2026, 3, 5)), "05 de março de 2026");

        let today = date(2026, 10, 18);
        assert_eq!(format_relative_date(today, today), "Hoje");
        assert_eq!(format_relative_date(date(2026, 10, 17), today), "Ontem");
        assert_eq!(format_relative_date(date(2026, 9, 1), today), "01 de setembro");
    }

    #[test]
    fn test_day_period_boundaries() {
        assert_eq!(DayPeriod::from_hour(0), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(11), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(17), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(18).greeting(), "Boa noite");
        assert_eq!(DayPeriod::Afternoon.label(), "Tarde");
    }
}
