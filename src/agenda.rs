use chrono::NaiveDate;
use derive_more::Display;
use log;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::calendar::MonthIndex;
use crate::config::{Config, RoomConfig};
use crate::dormitory::{DormitoryAssignment, OccupancyStats};
use crate::error::{Error, ErrorKind, Result};
use crate::record::*;

/// Everything the pages work on, as fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Agenda {
    trainers: Vec<Trainer>,
    physical_training: Vec<PhysicalTraining>,
    religious_activities: Vec<ReligiousActivity>,
    training_sessions: Vec<TrainingSession>,
    events: Vec<Event>,
    dormitory_assignments: Vec<DormitoryAssignment>,
}

impl Agenda {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::from(err).with_msg(&format!("could not read '{}'", path.display()))
        })?;

        let agenda = Self::from_str(&content).map_err(|err| {
            Error::new(
                ErrorKind::DataParse,
                &format!(
                    "{}: {}",
                    path.display(),
                    err.message.as_deref().unwrap_or_default()
                ),
            )
        })?;

        log::info!(
            "Loaded {} trainers, {} physical trainings, {} religious activities, {} sessions, {} events and {} room assignments from '{}'",
            agenda.trainers.len(),
            agenda.physical_training.len(),
            agenda.religious_activities.len(),
            agenda.training_sessions.len(),
            agenda.events.len(),
            agenda.dormitory_assignments.len(),
            path.display()
        );

        Ok(agenda)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.data_file {
            Some(path) => Self::from_path(path),
            None => {
                log::warn!("No data file configured, starting with an empty agenda");
                Ok(Agenda::default())
            }
        }
    }

    pub fn trainers(&self) -> &[Trainer] {
        &self.trainers
    }

    pub fn trainer(&self, id: Id) -> Option<&Trainer> {
        self.trainers.iter().find(|trainer| trainer.id == id)
    }

    pub fn active_trainers(&self) -> impl Iterator<Item = &Trainer> {
        self.trainers.iter().filter(|trainer| trainer.is_active())
    }

    pub fn physical_training(&self) -> &[PhysicalTraining] {
        &self.physical_training
    }

    pub fn religious_activities(&self) -> &[ReligiousActivity] {
        &self.religious_activities
    }

    pub fn training_sessions(&self) -> &[TrainingSession] {
        &self.training_sessions
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn dormitory_assignments(&self) -> &[DormitoryAssignment] {
        &self.dormitory_assignments
    }

    pub fn physical_training_of_day(&self, date: &NaiveDate) -> impl Iterator<Item = &PhysicalTraining> {
        of_day(&self.physical_training, *date)
    }

    pub fn religious_activities_of_day(
        &self,
        date: &NaiveDate,
    ) -> impl Iterator<Item = &ReligiousActivity> {
        of_day(&self.religious_activities, *date)
    }

    pub fn training_sessions_of_day(&self, date: &NaiveDate) -> impl Iterator<Item = &TrainingSession> {
        of_day(&self.training_sessions, *date)
    }

    pub fn physical_training_of_month(&self, month: MonthIndex) -> impl Iterator<Item = &PhysicalTraining> {
        of_month(&self.physical_training, month)
    }

    pub fn religious_activities_of_month(
        &self,
        month: MonthIndex,
    ) -> impl Iterator<Item = &ReligiousActivity> {
        of_month(&self.religious_activities, month)
    }

    pub fn training_sessions_of_month(&self, month: MonthIndex) -> impl Iterator<Item = &TrainingSession> {
        of_month(&self.training_sessions, month)
    }

    /// Events starting today or later, soonest first.
    pub fn upcoming_events(&self, today: NaiveDate, limit: usize) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| event.start_date >= today)
            .collect();
        upcoming.sort_by_key(|event| event.start_date);
        upcoming.truncate(limit);
        upcoming
    }

    pub fn add_physical_training(&mut self, training: NewPhysicalTraining) -> Result<&PhysicalTraining> {
        training.validate()?;
        let id = next_id(self.physical_training.iter().map(|t| t.id));
        self.physical_training.push(training.into_record(id));
        log::debug!("Added physical training {}", id);
        Ok(&self.physical_training[self.physical_training.len() - 1])
    }

    pub fn add_religious_activity(
        &mut self,
        activity: NewReligiousActivity,
    ) -> Result<&ReligiousActivity> {
        activity.validate()?;
        let id = next_id(self.religious_activities.iter().map(|a| a.id));
        self.religious_activities.push(activity.into_record(id));
        log::debug!("Added religious activity {}", id);
        Ok(&self.religious_activities[self.religious_activities.len() - 1])
    }

    pub fn add_event(&mut self, event: NewEvent) -> Result<&Event> {
        event.validate()?;
        let id = next_id(self.events.iter().map(|e| e.id));
        self.events.push(event.into_record(id));
        log::debug!("Added event {}", id);
        Ok(&self.events[self.events.len() - 1])
    }
}

fn of_day<R: Dated>(records: &[R], date: NaiveDate) -> impl Iterator<Item = &R> {
    records.iter().filter(move |record| record.date() == date)
}

fn of_month<R: Dated>(records: &[R], month: MonthIndex) -> impl Iterator<Item = &R> {
    records.iter().filter(move |record| month.contains(&record.date()))
}

fn next_id(ids: impl Iterator<Item = Id>) -> Id {
    ids.max().map_or(1, |max| max + 1)
}

impl FromStr for Agenda {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        let agenda: Agenda = toml::from_str(content)?;

        for event in agenda.events.iter().filter(|e| e.end_date < e.start_date) {
            log::warn!(
                "Event '{}' ({}) ends before it starts",
                event.name,
                event.id
            );
        }

        Ok(agenda)
    }
}

/// The kinds of dated rows a calendar page can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ActivityKind {
    #[display(fmt = "physical")]
    PhysicalTraining,
    #[display(fmt = "religious")]
    ReligiousActivity,
    #[display(fmt = "sessions")]
    TrainingSession,
    #[display(fmt = "events")]
    Event,
}

impl ActivityKind {
    pub const VARIANTS: [&'static str; 4] = ["physical", "religious", "sessions", "events"];
}

impl FromStr for ActivityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "physical" => Ok(ActivityKind::PhysicalTraining),
            "religious" => Ok(ActivityKind::ReligiousActivity),
            "sessions" => Ok(ActivityKind::TrainingSession),
            "events" => Ok(ActivityKind::Event),
            other => Err(Error::invalid_argument(&format!(
                "unknown activity kind '{}'",
                other
            ))),
        }
    }
}

/// Headline numbers of the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_trainers: usize,
    pub today_sessions: usize,
    pub physical_training: usize,
    pub religious_activities: usize,
    pub upcoming_events: usize,
    pub occupancy_rate: u32,
}

impl DashboardStats {
    pub fn compute(agenda: &Agenda, today: NaiveDate, rooms: &RoomConfig, upcoming_limit: usize) -> Self {
        DashboardStats {
            active_trainers: agenda.active_trainers().count(),
            today_sessions: agenda.training_sessions_of_day(&today).count(),
            physical_training: agenda.physical_training_of_day(&today).count(),
            religious_activities: agenda.religious_activities_of_day(&today).count(),
            upcoming_events: agenda.upcoming_events(today, upcoming_limit).len(),
            occupancy_rate: occupancy(agenda, rooms).occupancy_rate,
        }
    }
}

/// Stat cards of the schedule page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleStats {
    pub active_trainers: usize,
    pub today_sessions: usize,
    pub month_sessions: usize,
}

impl ScheduleStats {
    pub fn compute(agenda: &Agenda, today: NaiveDate, month: MonthIndex) -> Self {
        ScheduleStats {
            active_trainers: agenda.active_trainers().count(),
            today_sessions: agenda.training_sessions_of_day(&today).count(),
            month_sessions: agenda.training_sessions_of_month(month).count(),
        }
    }
}

/// Stat cards of an activity calendar page: rows dated today, rows in the
/// viewed month and the number of active trainers who can take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityStats {
    pub today: usize,
    pub this_month: usize,
    pub active_participants: usize,
}

impl ActivityStats {
    pub fn compute<R: Dated>(agenda: &Agenda, records: &[R], today: NaiveDate, month: MonthIndex) -> Self {
        ActivityStats {
            today: of_day(records, today).count(),
            this_month: of_month(records, month).count(),
            active_participants: agenda.active_trainers().count(),
        }
    }
}

/// Occupancy of the whole dormitory with the configured room layout.
pub fn occupancy(agenda: &Agenda, rooms: &RoomConfig) -> OccupancyStats {
    OccupancyStats::compute(
        &agenda.dormitory_assignments,
        rooms.total_rooms,
        rooms.room_capacity,
    )
}
