use chrono::NaiveDate;
use serde::Deserialize;

use super::{require_listed, require_non_empty, require_participants, Dated, Id, Summary};
use crate::error::Result;

pub const TRAINING_TYPES: [&str; 9] = [
    "Physical Fitness Training",
    "Combat Drills",
    "Agility Exercises",
    "Endurance Training",
    "Strength Conditioning",
    "Flexibility Sessions",
    "Safety Equipment Inspection",
    "Emergency Response Drill",
    "Team Building Workshop",
];

/// After-hours slots offered for physical training.
pub const TIME_SLOTS: [&str; 2] = ["5:00 PM - 6:00 PM", "6:00 PM - 7:00 PM"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhysicalTraining {
    pub id: Id,
    pub date: NaiveDate,
    pub training_type: String,
    pub in_charge: String,
    #[serde(default)]
    pub participants: Vec<Id>,
    pub time_slot: String,
}

impl Dated for PhysicalTraining {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Summary for PhysicalTraining {
    fn summary(&self) -> &str {
        &self.training_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhysicalTraining {
    pub date: NaiveDate,
    pub training_type: String,
    pub in_charge: String,
    pub participants: Vec<Id>,
    pub time_slot: String,
}

impl NewPhysicalTraining {
    pub fn validate(&self) -> Result<()> {
        require_listed("training type", &self.training_type, &TRAINING_TYPES)?;
        require_listed("time slot", &self.time_slot, &TIME_SLOTS)?;
        require_non_empty("in_charge", &self.in_charge)?;
        require_participants(&self.participants)
    }

    pub fn into_record(self, id: Id) -> PhysicalTraining {
        PhysicalTraining {
            id,
            date: self.date,
            training_type: self.training_type,
            in_charge: self.in_charge,
            participants: self.participants,
            time_slot: self.time_slot,
        }
    }
}
