use chrono::NaiveDate;
use serde::Deserialize;

use super::{Dated, Id, Summary};

/// A scheduled training session as shown on the schedule page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingSession {
    pub id: Id,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub session_type: String,
    #[serde(default)]
    pub trainer_id: Option<Id>,
}

impl Dated for TrainingSession {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Summary for TrainingSession {
    fn summary(&self) -> &str {
        &self.session_type
    }
}
