use itertools::Itertools;

use crate::agenda::{Agenda, DashboardStats};
use crate::calendar::{CalendarGrid, GridCell, WeekGrid};
use crate::dormitory::{unassigned_trainers, OccupancyStats, Room};
use crate::record::{Event, Summary};

const HEADER: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 5;

struct DayCell {
    day_num: Option<u32>,
    is_today: bool,
    is_special: bool,
    today_symbol: Option<char>,
    special_symbol: Option<char>,
}

impl DayCell {
    fn from_grid<R: ?Sized>(cell: &GridCell<'_, R>) -> Self {
        DayCell {
            day_num: cell.day(),
            is_today: cell.is_today(),
            is_special: cell.is_special_weekday(),
            today_symbol: None,
            special_symbol: None,
        }
    }

    fn today_symbol_opt(mut self, symbol_opt: Option<char>) -> Self {
        self.today_symbol = symbol_opt;
        self
    }

    fn special_symbol_opt(mut self, symbol_opt: Option<char>) -> Self {
        self.special_symbol = symbol_opt;
        self
    }

    fn marker(flag: bool, symbol: Option<char>) -> char {
        match symbol {
            Some(symbol) if flag => symbol,
            _ => ' ',
        }
    }

    fn text(&self) -> String {
        match self.day_num {
            Some(day) => format!(
                "{:>3}{}{}",
                day,
                Self::marker(self.is_today, self.today_symbol),
                Self::marker(self.is_special, self.special_symbol)
            ),
            None => " ".repeat(CELL_WIDTH),
        }
    }
}

/// Plain-text month grid with a per-day listing of records below it.
pub struct MonthView {
    today_symbol: Option<char>,
    special_symbol: Option<char>,
    preview_limit: usize,
}

impl Default for MonthView {
    fn default() -> Self {
        MonthView {
            today_symbol: Some('*'),
            special_symbol: Some('+'),
            preview_limit: 2,
        }
    }
}

impl MonthView {
    pub fn today_symbol(mut self, symbol: char) -> Self {
        self.today_symbol = Some(symbol);
        self
    }

    pub fn no_today_symbol(mut self) -> Self {
        self.today_symbol = None;
        self
    }

    pub fn special_symbol(mut self, symbol: char) -> Self {
        self.special_symbol = Some(symbol);
        self
    }

    pub fn no_special_symbol(mut self) -> Self {
        self.special_symbol = None;
        self
    }

    pub fn preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    pub fn render<R: Summary + ?Sized>(&self, grid: &CalendarGrid<'_, R>) -> String {
        let header = HEADER.iter().map(|day| format!("{:>3}  ", day)).join(" ");
        let mut lines = vec![grid.title(), header.trim_end().to_owned()];

        for week in grid.weeks() {
            let line = week
                .iter()
                .map(|cell| {
                    DayCell::from_grid(cell)
                        .today_symbol_opt(self.today_symbol)
                        .special_symbol_opt(self.special_symbol)
                        .text()
                })
                .join(" ");
            lines.push(line.trim_end().to_owned());
        }

        let busy_days = grid.days().filter(|cell| !cell.records().is_empty()).collect_vec();
        if !busy_days.is_empty() {
            lines.push(String::new());
        }
        for cell in busy_days {
            let preview = cell.preview(self.preview_limit);
            let mut line = format!(
                "{:>2}: {}",
                cell.day().unwrap_or_default(),
                preview.shown().iter().map(|record| record.summary()).join(", ")
            );
            if preview.overflow() > 0 {
                line.push_str(&format!(" (+{} more)", preview.overflow()));
            }
            lines.push(line);
        }

        to_text(lines)
    }
}

fn to_text(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn render_week<R: Summary + ?Sized>(week: &WeekGrid<'_, R>) -> String {
    let mut lines = vec![format!(
        "Week of {} to {}",
        week.first().format("%-d %B %Y"),
        week.last().format("%-d %B %Y")
    )];

    for day in week.days() {
        let marker = if day.is_today() { '*' } else { ' ' };
        let summaries = day.records().iter().map(|record| record.summary()).join(", ");
        let line = format!("{}{} {}", day.date().format("%a %e"), marker, summaries);
        lines.push(line.trim_end().to_owned());
    }

    to_text(lines)
}

pub fn render_dashboard(stats: &DashboardStats, agenda: &Agenda, upcoming: &[&Event]) -> String {
    let mut lines = vec![
        format!("Active trainers:      {}", stats.active_trainers),
        format!("Sessions today:       {}", stats.today_sessions),
        format!("Physical training:    {}", stats.physical_training),
        format!("Religious activities: {}", stats.religious_activities),
        format!("Upcoming events:      {}", stats.upcoming_events),
        format!("Dormitory occupancy:  {}%", stats.occupancy_rate),
    ];

    if !upcoming.is_empty() {
        lines.push(String::new());
        lines.extend(upcoming.iter().map(|event| {
            format!(
                "{}  {} ({})",
                event.start_date.format("%Y-%m-%d"),
                event.name,
                event.category
            )
        }));
    }

    if agenda.trainers().is_empty() {
        lines.push(String::new());
        lines.push("No trainers loaded".to_owned());
    }

    to_text(lines)
}

pub fn render_rooms(rooms: &[&Room<'_>], agenda: &Agenda, stats: &OccupancyStats, capacity: usize) -> String {
    let mut lines = vec![format!(
        "{} of {} rooms occupied, {} of {} beds taken ({}%)",
        stats.occupied_rooms,
        stats.total_rooms,
        stats.current_occupancy,
        stats.total_capacity,
        stats.occupancy_rate
    )];

    if rooms.is_empty() {
        lines.push("No rooms found matching your filters".to_owned());
    }

    for room in rooms {
        let names = room
            .assignments
            .iter()
            .map(|assignment| {
                agenda
                    .trainer(assignment.trainer_id)
                    .map_or_else(|| format!("#{}", assignment.trainer_id), |t| t.name.clone())
            })
            .join(", ");
        lines.push(format!(
            "{:<10} {}/{} {:<9} {}",
            room.id,
            room.occupancy(),
            capacity,
            room.status(capacity).to_string(),
            names
        ));
    }

    lines.push(String::new());
    lines.push("Unassigned trainers:".to_owned());
    let unassigned = unassigned_trainers(agenda.trainers(), agenda.dormitory_assignments());
    if unassigned.is_empty() {
        lines.push("  All trainers are assigned to rooms".to_owned());
    }
    lines.extend(
        unassigned
            .iter()
            .map(|trainer| format!("  {} ({})", trainer.name, trainer.rank)),
    );

    to_text(lines)
}
