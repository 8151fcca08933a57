use chrono::NaiveDate;
use serde::Deserialize;

use super::{require_listed, require_non_empty, require_participants, Dated, Id, Summary};
use crate::error::Result;

pub const ACTIVITY_TYPES: [&str; 9] = [
    "Fajr Prayer",
    "Dhuhr Prayer",
    "Asr Prayer",
    "Maghrib Prayer",
    "Isha Prayer",
    "Islamic Studies",
    "Quran Recitation",
    "Religious Lecture",
    "Community Prayer",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReligiousActivity {
    pub id: Id,
    pub date: NaiveDate,
    pub activity: String,
    pub in_charge: String,
    #[serde(default)]
    pub participants: Vec<Id>,
}

impl Dated for ReligiousActivity {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Summary for ReligiousActivity {
    fn summary(&self) -> &str {
        &self.activity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReligiousActivity {
    pub date: NaiveDate,
    pub activity: String,
    pub in_charge: String,
    pub participants: Vec<Id>,
}

impl NewReligiousActivity {
    pub fn validate(&self) -> Result<()> {
        require_listed("activity", &self.activity, &ACTIVITY_TYPES)?;
        require_non_empty("in_charge", &self.in_charge)?;
        require_participants(&self.participants)
    }

    pub fn into_record(self, id: Id) -> ReligiousActivity {
        ReligiousActivity {
            id,
            date: self.date,
            activity: self.activity,
            in_charge: self.in_charge,
            participants: self.participants,
        }
    }
}
