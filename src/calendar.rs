use chrono::{Datelike, Duration, Local, Month, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Error, Result};
use crate::record::Dated;

pub const DAYS_PER_WEEK: usize = 7;

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn checked_month(month: u32) -> Result<Month> {
    Month::from_u32(month).ok_or_else(|| {
        Error::invalid_argument(&format!("month must be within 1..=12, got {}", month))
    })
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    checked_month(month)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::invalid_argument(&format!("year {} is out of range", year)))
}

pub fn days_of_month(year: i32, month: u32) -> Result<u32> {
    let days = match checked_month(month)? {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    };

    Ok(days)
}

/// Number of blank cells before day 1, counting columns from Sunday.
pub fn leading_padding(year: i32, month: u32) -> Result<usize> {
    Ok(first_of_month(year, month)?.weekday().num_days_from_sunday() as usize)
}

/// Maps the 0 = Sunday .. 6 = Saturday column convention to a weekday.
pub fn weekday_from_index(index: u32) -> Result<Weekday> {
    if index > 6 {
        return Err(Error::invalid_argument(&format!(
            "weekday index must be within 0..=6, got {}",
            index
        )));
    }
    // chrono counts from Monday
    Weekday::from_u32((index + 6) % 7)
        .ok_or_else(|| Error::invalid_argument(&format!("invalid weekday index {}", index)))
}

#[derive(Debug, PartialEq)]
pub struct GridCell<'a, R: ?Sized> {
    day: Option<u32>,
    is_today: bool,
    is_special_weekday: bool,
    records: Vec<&'a R>,
}

impl<'a, R: ?Sized> Clone for GridCell<'a, R> {
    fn clone(&self) -> Self {
        GridCell {
            day: self.day,
            is_today: self.is_today,
            is_special_weekday: self.is_special_weekday,
            records: self.records.clone(),
        }
    }
}

impl<'a, R: ?Sized> GridCell<'a, R> {
    fn padding() -> Self {
        GridCell {
            day: None,
            is_today: false,
            is_special_weekday: false,
            records: Vec::new(),
        }
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn is_padding(&self) -> bool {
        self.day.is_none()
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn is_special_weekday(&self) -> bool {
        self.is_special_weekday
    }

    pub fn records(&self) -> &[&'a R] {
        &self.records
    }

    pub fn preview(&self, limit: usize) -> CellPreview<'_, 'a, R> {
        CellPreview::of(&self.records, limit)
    }
}

/// Month laid out in Sunday-first rows, ready to be drawn cell by cell.
#[derive(Debug, PartialEq)]
pub struct CalendarGrid<'a, R: ?Sized> {
    year: i32,
    month: Month,
    leading_padding: usize,
    cells: Vec<GridCell<'a, R>>,
}

impl<'a, R: ?Sized> Clone for CalendarGrid<'a, R> {
    fn clone(&self) -> Self {
        CalendarGrid {
            year: self.year,
            month: self.month,
            leading_padding: self.leading_padding,
            cells: self.cells.clone(),
        }
    }
}

impl<'a, R: ?Sized> CalendarGrid<'a, R> {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.month.name(), self.year)
    }

    pub fn leading_padding(&self) -> usize {
        self.leading_padding
    }

    pub fn days_in_month(&self) -> u32 {
        (self.cells.len() - self.leading_padding) as u32
    }

    pub fn cells(&self) -> &[GridCell<'a, R>] {
        &self.cells
    }

    /// Rows of seven cells; the last row is cut short after the last day.
    pub fn weeks(&self) -> std::slice::Chunks<'_, GridCell<'a, R>> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn days(&self) -> impl Iterator<Item = &GridCell<'a, R>> {
        self.cells[self.leading_padding..].iter()
    }

    pub fn cell(&self, day: u32) -> Option<&GridCell<'a, R>> {
        if day == 0 {
            return None;
        }
        self.cells.get(self.leading_padding + day as usize - 1)
    }

    pub fn record_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.records.len()).sum()
    }
}

/// Lays out `records` on the month `year`-`month`.
///
/// Records dated outside the month are left out. Within a day, records keep
/// the order in which they were given. `today` and `special_weekday` only set
/// flags; nothing here reads the clock.
pub fn build<'a, R, I>(
    year: i32,
    month: u32,
    records: I,
    today: Option<NaiveDate>,
    special_weekday: Option<Weekday>,
) -> Result<CalendarGrid<'a, R>>
where
    R: Dated + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let month_value = checked_month(month)?;
    let first = first_of_month(year, month)?;
    let padding = first.weekday().num_days_from_sunday() as usize;
    let num_days = days_of_month(year, month)?;

    let mut cells: Vec<GridCell<'a, R>> = std::iter::repeat_with(GridCell::padding)
        .take(padding)
        .chain((0..num_days).map(|day0| {
            let date = first + Duration::days(day0 as i64);
            GridCell {
                day: Some(day0 + 1),
                is_today: today == Some(date),
                is_special_weekday: special_weekday == Some(date.weekday()),
                records: Vec::new(),
            }
        }))
        .collect();

    for record in records {
        let date = record.date();
        if date.year() == year && date.month() == month {
            cells[padding + date.day0() as usize].records.push(record);
        }
    }

    Ok(CalendarGrid {
        year,
        month: month_value,
        leading_padding: padding,
        cells,
    })
}

/// The first `limit` records of a cell plus how many were left out.
#[derive(Debug, PartialEq)]
pub struct CellPreview<'c, 'a, R: ?Sized> {
    shown: &'c [&'a R],
    overflow: usize,
}

impl<'c, 'a, R: ?Sized> CellPreview<'c, 'a, R> {
    pub fn of(records: &'c [&'a R], limit: usize) -> Self {
        let shown = &records[..records.len().min(limit)];
        CellPreview {
            shown,
            overflow: records.len() - shown.len(),
        }
    }

    pub fn shown(&self) -> &'c [&'a R] {
        self.shown
    }

    pub fn overflow(&self) -> usize {
        self.overflow
    }
}

#[derive(Debug, PartialEq)]
pub struct WeekDay<'a, R: ?Sized> {
    date: NaiveDate,
    is_today: bool,
    records: Vec<&'a R>,
}

impl<'a, R: ?Sized> WeekDay<'a, R> {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn records(&self) -> &[&'a R] {
        &self.records
    }
}

/// Monday to Sunday of one week.
#[derive(Debug, PartialEq)]
pub struct WeekGrid<'a, R: ?Sized> {
    days: Vec<WeekDay<'a, R>>,
}

impl<'a, R: ?Sized> WeekGrid<'a, R> {
    pub fn days(&self) -> &[WeekDay<'a, R>] {
        &self.days
    }

    pub fn first(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn last(&self) -> NaiveDate {
        self.days[DAYS_PER_WEEK - 1].date
    }

    pub fn record_count(&self) -> usize {
        self.days.iter().map(|day| day.records.len()).sum()
    }
}

/// Monday of the week containing `date`; a Sunday belongs to the week before.
pub fn week_start(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_sub_signed(Duration::days(
        date.weekday().num_days_from_monday() as i64,
    ))
    .ok_or_else(|| Error::invalid_argument(&format!("no week start for {}", date)))
}

pub fn build_week<'a, R, I>(
    anchor: NaiveDate,
    records: I,
    today: Option<NaiveDate>,
) -> Result<WeekGrid<'a, R>>
where
    R: Dated + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let monday = week_start(anchor)?;
    let mut days = Vec::with_capacity(DAYS_PER_WEEK);
    for offset in 0..DAYS_PER_WEEK {
        let date = monday
            .checked_add_signed(Duration::days(offset as i64))
            .ok_or_else(|| Error::invalid_argument(&format!("week of {} is out of range", anchor)))?;
        days.push(WeekDay {
            date,
            is_today: today == Some(date),
            records: Vec::new(),
        });
    }

    for record in records {
        let offset = record.date().signed_duration_since(monday).num_days();
        if (0..DAYS_PER_WEEK as i64).contains(&offset) {
            days[offset as usize].records.push(record);
        }
    }

    Ok(WeekGrid { days })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        first_of_month(year, month)?;
        Ok(MonthIndex {
            index: checked_month(month)?,
            year,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn number(&self) -> u32 {
        self.index.number_from_month()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.number()
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    pub fn grid<'a, R, I>(
        &self,
        records: I,
        today: Option<NaiveDate>,
        special_weekday: Option<Weekday>,
    ) -> Result<CalendarGrid<'a, R>>
    where
        R: Dated + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        build(self.year, self.number(), records, today, special_weekday)
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.index.number_from_month() as i64 - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        MonthIndex {
            index: Month::from_i64(ordinal.rem_euclid(12) + 1).unwrap_or(Month::January),
            year: ordinal.div_euclid(12) as i32,
        }
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::from(Local::now().date_naive())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index.name(), self.year)
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex {
            index: Month::from_u32(m.month()).unwrap_or(Month::January),
            year: m.year(),
        }
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::from_ordinal(self.ordinal() + rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::from_ordinal(self.ordinal() - rhs as i64)
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: u32,
        date: NaiveDate,
    }

    impl Dated for Item {
        fn date(&self) -> NaiveDate {
            self.date
        }
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn item(id: u32, year: i32, month: u32, day: u32) -> Item {
        Item {
            id,
            date: ymd(year, month, day),
        }
    }

    #[test]
    fn leap_years() {
        assert_eq!(days_of_month(2024, 2).unwrap(), 29);
        assert_eq!(days_of_month(2023, 2).unwrap(), 28);
        assert_eq!(days_of_month(2000, 2).unwrap(), 29);
        assert_eq!(days_of_month(1900, 2).unwrap(), 28);
        assert!(!is_leap_year(2100));
    }

    #[test]
    fn days_of_month_agrees_with_chrono() {
        for year in [1600, 1899, 1900, 1999, 2000, 2023, 2024, 2025, 2400] {
            for month in 1..=12u32 {
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                let expected = ymd(next_year, next_month, 1)
                    .signed_duration_since(ymd(year, month, 1))
                    .num_days() as u32;
                assert_eq!(days_of_month(year, month).unwrap(), expected);
            }
        }
    }

    #[test]
    fn cell_count_is_padding_plus_days() {
        for year in [1900, 2000, 2023, 2024, 2025] {
            for month in 1..=12u32 {
                let grid = build::<Item, _>(year, month, &[], None, None).unwrap();
                let days = days_of_month(year, month).unwrap();
                let padding = leading_padding(year, month).unwrap();

                assert!(padding <= 6);
                assert_eq!(grid.leading_padding(), padding);
                assert_eq!(grid.cells().len(), padding + days as usize);
                assert_eq!(grid.days().count(), days as usize);
                assert_eq!(grid.days_in_month(), days);
                assert!(grid.cells()[..padding].iter().all(GridCell::is_padding));
            }
        }
    }

    #[test]
    fn day_numbers_strictly_increase() {
        let grid = build::<Item, _>(2024, 2, &[], None, None).unwrap();
        let days: Vec<u32> = grid.cells().iter().filter_map(GridCell::day).collect();
        assert_eq!(days, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn march_2025_starts_on_saturday() {
        let grid = build::<Item, _>(2025, 3, &[], None, None).unwrap();
        assert_eq!(grid.leading_padding(), 6);
        assert_eq!(grid.title(), "March 2025");

        let weeks: Vec<_> = grid.weeks().collect();
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][6].day(), Some(1));
        assert_eq!(weeks[5].len(), 2);
    }

    #[test]
    fn records_land_on_their_day() {
        let records = vec![item(1, 2025, 3, 15), item(2, 2025, 4, 1)];
        let grid = build(2025, 3, &records, None, None).unwrap();

        let ids: Vec<u32> = grid.cell(15).unwrap().records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(grid.record_count(), 1);
        assert!(grid
            .cells()
            .iter()
            .all(|cell| cell.records().iter().all(|r| r.id != 2)));
    }

    #[test]
    fn records_keep_input_order() {
        let records = vec![
            item(3, 2025, 3, 10),
            item(1, 2025, 3, 2),
            item(2, 2025, 3, 10),
            item(9, 2024, 3, 10),
        ];
        let grid = build(2025, 3, &records, None, None).unwrap();

        let ids: Vec<u32> = grid.cell(10).unwrap().records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(grid.cell(2).unwrap().records()[0].id, 1);
        assert_eq!(grid.record_count(), 3);
    }

    #[test]
    fn today_is_flagged_once() {
        let grid = build::<Item, _>(2025, 3, &[], Some(ymd(2025, 3, 15)), None).unwrap();
        let today: Vec<u32> = grid
            .cells()
            .iter()
            .filter(|cell| cell.is_today())
            .filter_map(GridCell::day)
            .collect();
        assert_eq!(today, vec![15]);

        let other_month = build::<Item, _>(2025, 4, &[], Some(ymd(2025, 3, 15)), None).unwrap();
        assert!(other_month.cells().iter().all(|cell| !cell.is_today()));
    }

    #[test]
    fn fridays_are_flagged() {
        let friday = weekday_from_index(5).unwrap();
        assert_eq!(friday, Weekday::Fri);

        let grid = build::<Item, _>(2025, 3, &[], None, Some(friday)).unwrap();
        let fridays: Vec<u32> = grid
            .cells()
            .iter()
            .filter(|cell| cell.is_special_weekday())
            .filter_map(GridCell::day)
            .collect();
        assert_eq!(fridays, vec![7, 14, 21, 28]);
        assert!(grid.cells()[..6].iter().all(|c| !c.is_special_weekday()));
    }

    #[test]
    fn weekday_index_convention() {
        assert_eq!(weekday_from_index(0).unwrap(), Weekday::Sun);
        assert_eq!(weekday_from_index(6).unwrap(), Weekday::Sat);
        assert!(weekday_from_index(7).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(build::<Item, _>(2025, 0, &[], None, None)
            .unwrap_err()
            .is_invalid_argument());
        assert!(build::<Item, _>(2025, 13, &[], None, None)
            .unwrap_err()
            .is_invalid_argument());
        assert!(days_of_month(2025, 13).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        assert!(build::<Item, _>(i32::MAX, 1, &[], None, None)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn empty_february() {
        let grid = build::<Item, _>(2025, 2, &[], None, None).unwrap();
        assert_eq!(grid.days().count(), 28);
        assert!(grid.days().all(|cell| cell.records().is_empty()));
    }

    #[test]
    fn build_is_idempotent() {
        let records = vec![item(1, 2025, 3, 15), item(2, 2025, 3, 15)];
        let first = build(2025, 3, &records, Some(ymd(2025, 3, 1)), Some(Weekday::Fri));
        let second = build(2025, 3, &records, Some(ymd(2025, 3, 1)), Some(Weekday::Fri));
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn trait_objects_share_one_grid() {
        let items = vec![item(1, 2025, 3, 3)];
        let dates = vec![ymd(2025, 3, 3), ymd(2025, 3, 4)];
        let mixed: Vec<&dyn Dated> = vec![&items[0], &dates[0], &dates[1]];

        let grid = build(2025, 3, mixed.iter().copied(), None, None).unwrap();
        assert_eq!(grid.cell(3).unwrap().records().len(), 2);
        assert_eq!(grid.cell(4).unwrap().records().len(), 1);
    }

    #[test]
    fn preview_reports_overflow() {
        let records = vec![
            item(1, 2025, 3, 5),
            item(2, 2025, 3, 5),
            item(3, 2025, 3, 5),
        ];
        let grid = build(2025, 3, &records, None, None).unwrap();
        let preview = grid.cell(5).unwrap().preview(2);
        assert_eq!(preview.shown().len(), 2);
        assert_eq!(preview.overflow(), 1);

        let preview = grid.cell(5).unwrap().preview(5);
        assert_eq!(preview.shown().len(), 3);
        assert_eq!(preview.overflow(), 0);
    }

    #[test]
    fn week_starts_on_monday() {
        let records = vec![
            item(1, 2025, 3, 10),
            item(2, 2025, 3, 16),
            item(3, 2025, 3, 17),
            item(4, 2025, 3, 9),
        ];
        let week = build_week(ymd(2025, 3, 16), &records, Some(ymd(2025, 3, 12))).unwrap();

        assert_eq!(week.first(), ymd(2025, 3, 10));
        assert_eq!(week.last(), ymd(2025, 3, 16));
        assert_eq!(week.days()[0].weekday(), Weekday::Mon);
        assert_eq!(week.days()[0].records()[0].id, 1);
        assert_eq!(week.days()[6].records()[0].id, 2);
        assert_eq!(week.record_count(), 2);
        assert!(week.days()[2].is_today());
    }

    #[test]
    fn week_across_month_boundary() {
        let week = build_week::<Item, _>(ymd(2025, 3, 1), &[], None).unwrap();
        assert_eq!(week.first(), ymd(2025, 2, 24));
        assert_eq!(week.last(), ymd(2025, 3, 2));
    }

    #[test]
    fn month_navigation_wraps_years() {
        let december = MonthIndex::new(2024, 12).unwrap();
        assert_eq!(december.next(), MonthIndex::new(2025, 1).unwrap());
        assert_eq!(december.next().prev(), december);

        let november = MonthIndex::new(2024, 11).unwrap();
        assert_eq!(november + 3, MonthIndex::new(2025, 2).unwrap());
        assert_eq!(
            MonthIndex::new(2025, 3).unwrap() - 15,
            MonthIndex::new(2023, 12).unwrap()
        );
        assert!(november < december);
        assert_eq!(december.to_string(), "December 2024");
        assert!(MonthIndex::new(2024, 13).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn month_index_builds_its_grid() {
        let index = MonthIndex::from(ymd(2024, 2, 20));
        assert!(index.contains(&ymd(2024, 2, 1)));
        assert!(!index.contains(&ymd(2023, 2, 1)));

        let grid = index.grid::<Item, _>(&[], None, None).unwrap();
        assert_eq!(grid.days_in_month(), 29);
        assert_eq!(grid.month(), Month::February);
    }
}
