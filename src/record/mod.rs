pub mod event;
pub mod religious;
pub mod session;
pub mod training;

use chrono::NaiveDate;
use derive_more::Display;
use serde::Deserialize;

pub use event::{Event, NewEvent, EVENT_CATEGORIES};
pub use religious::{NewReligiousActivity, ReligiousActivity, ACTIVITY_TYPES};
pub use session::TrainingSession;
pub use training::{NewPhysicalTraining, PhysicalTraining, TIME_SLOTS, TRAINING_TYPES};

use crate::error::{Error, Result};

pub type Id = u64;

/// Anything that can be placed on a calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// One-line description used when a record is listed under a day.
pub trait Summary {
    fn summary(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TrainerStatus {
    #[display(fmt = "active")]
    Active,
    #[display(fmt = "inactive")]
    Inactive,
}

impl Default for TrainerStatus {
    fn default() -> Self {
        TrainerStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Trainer {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub status: TrainerStatus,
}

impl Trainer {
    pub fn is_active(&self) -> bool {
        self.status == TrainerStatus::Active
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::invalid_record(&format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

pub(crate) fn require_listed(field: &str, value: &str, catalog: &[&str]) -> Result<()> {
    if catalog.contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_record(&format!(
            "unknown {} '{}'",
            field, value
        )))
    }
}

pub(crate) fn require_participants(participants: &[Id]) -> Result<()> {
    if participants.is_empty() {
        Err(Error::invalid_record("participants must not be empty"))
    } else {
        Ok(())
    }
}
