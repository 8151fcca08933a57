use chrono::NaiveDate;
use phf::phf_ordered_map;
use serde::Deserialize;

use super::{require_non_empty, Dated, Id, Summary};
use crate::error::{Error, Result};

/// Event categories and their display colors, in the order they are offered.
pub static EVENT_CATEGORIES: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "Physical Training" => "#3b82f6",
    "Safety Training" => "#8b5cf6",
    "Emergency Response" => "#ef4444",
    "Equipment Inspection" => "#f59e0b",
    "Leadership Training" => "#eab308",
    "Team Building" => "#10b981",
    "Religious Activity" => "#14b8a6",
    "Community Service" => "#06b6d4",
    "Routine Maintenance" => "#92400e",
    "Special Event" => "#ec4899",
    "Development Program" => "#6366f1",
    "Collaboration Activity" => "#a855f7",
};

pub fn category_color(category: &str) -> Option<&'static str> {
    EVENT_CATEGORIES.get(category).copied()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    pub id: Id,
    pub name: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl Event {
    pub fn color(&self) -> Option<&'static str> {
        category_color(&self.category)
    }

    pub fn spans(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Events are placed on the calendar by their first day.
impl Dated for Event {
    fn date(&self) -> NaiveDate {
        self.start_date
    }
}

impl Summary for Event {
    fn summary(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        if category_color(&self.category).is_none() {
            return Err(Error::invalid_record(&format!(
                "unknown category '{}'",
                self.category
            )));
        }
        if self.end_date < self.start_date {
            return Err(Error::invalid_record(
                "end date must not be before start date",
            ));
        }
        Ok(())
    }

    pub fn into_record(self, id: Id) -> Event {
        Event {
            id,
            name: self.name,
            category: self.category,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn categories_keep_their_order() {
        let names: Vec<_> = EVENT_CATEGORIES.keys().copied().collect();
        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "Physical Training");
        assert_eq!(names[11], "Collaboration Activity");
        assert_eq!(category_color("Religious Activity"), Some("#14b8a6"));
        assert_eq!(category_color("Picnic"), None);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let event = NewEvent {
            name: "Fire drill".to_owned(),
            category: "Emergency Response".to_owned(),
            start_date: date(10),
            end_date: date(9),
            description: None,
        };
        let err = event.validate().unwrap_err();
        assert!(err.is_invalid_record());

        let single_day = NewEvent {
            end_date: date(10),
            ..event
        };
        assert!(single_day.validate().is_ok());
    }

    #[test]
    fn blank_description_is_dropped() {
        let event = NewEvent {
            name: "Open day".to_owned(),
            category: "Special Event".to_owned(),
            start_date: date(1),
            end_date: date(3),
            description: Some("  ".to_owned()),
        }
        .into_record(1);
        assert_eq!(event.description, None);
        assert!(event.spans(date(2)));
        assert!(!event.spans(date(4)));
        assert_eq!(event.date(), date(1));
    }
}
