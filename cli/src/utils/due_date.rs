use std::str::FromStr;

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use wool_core::util::TIMESTAMP_FORMAT;

/// Due date as typed on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum DueDate {
    /// Clears the due date
    None,
    Today,
    Tomorrow,
    NextWeek,
    NextMonth,
    Specific(NaiveDateTime),
}

impl DueDate {
    /// Timestamp stored on the note; empty when cleared. Relative dates
    /// resolve to midnight of that day.
    pub fn to_timestamp(&self) -> String {
        let today = Local::now().date_naive();
        let day = match self {
            DueDate::None => return String::new(),
            DueDate::Today => today,
            DueDate::Tomorrow => today.succ_opt().unwrap_or(today),
            DueDate::NextWeek => today.checked_add_days(Days::new(7)).unwrap_or(today),
            DueDate::NextMonth => today.checked_add_days(Days::new(30)).unwrap_or(today),
            DueDate::Specific(dt) => return dt.format(TIMESTAMP_FORMAT).to_string(),
        };
        day.and_time(NaiveTime::MIN).format(TIMESTAMP_FORMAT).to_string()
    }
}

impl FromStr for DueDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "next week" => Ok(Self::NextWeek),
            "next month" => Ok(Self::NextMonth),
            _ => {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
                    return Ok(Self::Specific(dt));
                }
                match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Ok(d) => Ok(Self::Specific(d.and_time(NaiveTime::MIN))),
                    Err(e) => anyhow::bail!("Invalid due date: {}", e),
                }
            }
        }
    }
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DueDate::None => write!(f, "none"),
            DueDate::Today => write!(f, "today"),
            DueDate::Tomorrow => write!(f, "tomorrow"),
            DueDate::NextWeek => write!(f, "next week"),
            DueDate::NextMonth => write!(f, "next month"),
            DueDate::Specific(dt) => write!(f, "{}", dt.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
