use derive_more::Display;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashSet;

use crate::record::{Id, Trainer};

pub const DEFAULT_TOTAL_ROOMS: usize = 50;
pub const DEFAULT_ROOM_CAPACITY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DormitoryAssignment {
    pub id: Id,
    pub room_id: String,
    pub trainer_id: Id,
}

/// Room identifiers look like `A-2-14`: building, floor, room number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomId<'a> {
    pub building: &'a str,
    pub floor: Option<&'a str>,
    pub number: Option<&'a str>,
}

impl<'a> RoomId<'a> {
    pub fn parse(room_id: &'a str) -> Self {
        let mut parts = room_id.splitn(3, '-');
        RoomId {
            building: parts.next().unwrap_or(""),
            floor: parts.next(),
            number: parts.next(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoomStatus {
    #[display(fmt = "Empty")]
    Empty,
    #[display(fmt = "Available")]
    Available,
    #[display(fmt = "Full")]
    Full,
}

impl RoomStatus {
    /// A room is only `Full` at exactly its capacity; an overbooked room
    /// still reads as `Available`.
    pub fn of(occupancy: usize, capacity: usize) -> Self {
        if occupancy == 0 {
            RoomStatus::Empty
        } else if occupancy == capacity {
            RoomStatus::Full
        } else {
            RoomStatus::Available
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room<'a> {
    pub id: &'a str,
    pub assignments: Vec<&'a DormitoryAssignment>,
}

impl<'a> Room<'a> {
    pub fn room_id(&self) -> RoomId<'a> {
        RoomId::parse(self.id)
    }

    pub fn occupancy(&self) -> usize {
        self.assignments.len()
    }

    pub fn status(&self, capacity: usize) -> RoomStatus {
        RoomStatus::of(self.occupancy(), capacity)
    }

    pub fn free_slots(&self, capacity: usize) -> usize {
        capacity.saturating_sub(self.occupancy())
    }

    /// Percentage of beds taken, capped at 100.
    pub fn fill_percent(&self, capacity: usize) -> u32 {
        if capacity == 0 {
            return 0;
        }
        (self.occupancy().min(capacity) * 100 / capacity) as u32
    }
}

/// Groups assignments per room, rooms ordered by id.
pub fn group_by_room(assignments: &[DormitoryAssignment]) -> Vec<Room<'_>> {
    assignments
        .iter()
        .into_group_map_by(|assignment| assignment.room_id.as_str())
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(id, assignments)| Room { id, assignments })
        .collect()
}

/// Active trainers that appear in no assignment, in roster order.
pub fn unassigned_trainers<'a>(trainers: &'a [Trainer], assignments: &[DormitoryAssignment]) -> Vec<&'a Trainer> {
    let assigned: HashSet<Id> = assignments.iter().map(|assignment| assignment.trainer_id).collect();
    trainers
        .iter()
        .filter(|trainer| trainer.is_active() && !assigned.contains(&trainer.id))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub building: Option<String>,
    pub floor: Option<String>,
    pub search: Option<String>,
}

impl RoomFilter {
    pub fn building(mut self, building: &str) -> Self {
        self.building = Some(building.to_owned());
        self
    }

    pub fn floor(mut self, floor: &str) -> Self {
        self.floor = Some(floor.to_owned());
        self
    }

    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_owned());
        self
    }

    pub fn matches<F>(&self, room: &Room<'_>, trainer_name: F) -> bool
    where
        F: Fn(Id) -> Option<String>,
    {
        let room_id = room.room_id();

        if let Some(building) = &self.building {
            if room_id.building != building.as_str() {
                return false;
            }
        }

        if let Some(floor) = &self.floor {
            if room_id.floor != Some(floor.as_str()) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                room.assignments.iter().any(|assignment| {
                    trainer_name(assignment.trainer_id)
                        .map_or(false, |name| name.to_lowercase().contains(&term))
                })
            }
            _ => true,
        }
    }

    pub fn apply<'r, 'a>(&self, rooms: &'r [Room<'a>], trainers: &[Trainer]) -> Vec<&'r Room<'a>> {
        let name_of = |id: Id| {
            trainers
                .iter()
                .find(|trainer| trainer.id == id)
                .map(|trainer| trainer.name.clone())
        };
        rooms.iter().filter(|room| self.matches(room, name_of)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyStats {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    pub total_capacity: usize,
    pub current_occupancy: usize,
    pub occupancy_rate: u32,
}

impl OccupancyStats {
    pub fn compute(assignments: &[DormitoryAssignment], total_rooms: usize, room_capacity: usize) -> Self {
        let occupied_rooms = assignments
            .iter()
            .map(|assignment| assignment.room_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_capacity = total_rooms * room_capacity;
        let current_occupancy = assignments.len();

        OccupancyStats {
            total_rooms,
            occupied_rooms,
            available_rooms: total_rooms.saturating_sub(occupied_rooms),
            total_capacity,
            current_occupancy,
            occupancy_rate: occupancy_rate(current_occupancy, total_capacity),
        }
    }
}

/// Rounded percentage; half a percent rounds up.
pub fn occupancy_rate(occupancy: usize, capacity: usize) -> u32 {
    if capacity == 0 {
        return 0;
    }
    ((occupancy * 200 + capacity) / (capacity * 2)) as u32
}
