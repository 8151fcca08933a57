extern crate garrison as lib;

use chrono::{Datelike, Local, NaiveDate};
use flexi_logger::{Duplicate, FileSpec, Logger};
use lib::agenda::{occupancy, ActivityKind, ActivityStats, Agenda, DashboardStats, ScheduleStats};
use lib::calendar::{self, MonthIndex};
use lib::config::Config;
use lib::dormitory::{self, RoomFilter};
use lib::record::{Dated, Summary};
use lib::render::{self, MonthView};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "garrison",
    about = "Garrison - schedules, calendars and dormitory rosters of a training facility."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "d",
        long = "data",
        help = "path to data file, overrides the config",
        parse(from_os_str)
    )]
    pub data_file: Option<PathBuf>,

    #[structopt(long = "today", help = "date to treat as today (YYYY-MM-DD)")]
    pub today: Option<NaiveDate>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "show a month calendar")]
    Month {
        #[structopt(short = "y", long = "year")]
        year: Option<i32>,
        #[structopt(short = "m", long = "month", help = "month number, 1 to 12")]
        month: Option<u32>,
        #[structopt(
            short = "k",
            long = "kind",
            default_value = "physical",
            possible_values = &ActivityKind::VARIANTS
        )]
        kind: ActivityKind,
    },
    #[structopt(about = "show the week containing a date")]
    Week {
        #[structopt(long = "date", help = "any day of the week (YYYY-MM-DD)")]
        date: Option<NaiveDate>,
        #[structopt(
            short = "k",
            long = "kind",
            default_value = "sessions",
            possible_values = &ActivityKind::VARIANTS
        )]
        kind: ActivityKind,
    },
    #[structopt(about = "show dashboard statistics")]
    Dashboard,
    #[structopt(about = "list dormitory rooms and their occupants")]
    Rooms {
        #[structopt(long = "building")]
        building: Option<String>,
        #[structopt(long = "floor")]
        floor: Option<String>,
        #[structopt(long = "search", help = "part of an occupant's name")]
        search: Option<String>,
    },
}

fn print_month<R: Dated + Summary>(
    records: &[R],
    index: MonthIndex,
    today: NaiveDate,
    config: &Config,
) -> lib::Result<()> {
    let grid = index.grid(records, Some(today), config.special_weekday)?;
    log::debug!("{} records placed on {}", grid.record_count(), grid.title());
    print!(
        "{}",
        MonthView::default()
            .preview_limit(config.preview_limit)
            .render(&grid)
    );
    Ok(())
}

fn print_week<R: Dated + Summary>(records: &[R], anchor: NaiveDate, today: NaiveDate) -> lib::Result<()> {
    let week = calendar::build_week(anchor, records, Some(today))?;
    print!("{}", render::render_week(&week));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .duplicate_to_stderr(Duplicate::Warn)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        eprintln!("Garrison ran into a fatal error!");
        eprintln!("Consider filing an issue with a log file and the backtrace below");
        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if args.data_file.is_some() {
        config.data_file = args.data_file;
    }

    let agenda = Agenda::from_config(&config)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    match args.cmd.unwrap_or(Command::Dashboard) {
        Command::Month { year, month, kind } => {
            let index = MonthIndex::new(
                year.unwrap_or_else(|| today.year()),
                month.unwrap_or_else(|| today.month()),
            )?;
            match kind {
                ActivityKind::PhysicalTraining => {
                    print_month(agenda.physical_training(), index, today, &config)?
                }
                ActivityKind::ReligiousActivity => {
                    print_month(agenda.religious_activities(), index, today, &config)?;
                    let stats = ActivityStats::compute(&agenda, agenda.religious_activities(), today, index);
                    println!(
                        "\nActivities today: {}  This month: {}  Active participants: {}",
                        stats.today, stats.this_month, stats.active_participants
                    );
                }
                ActivityKind::TrainingSession => {
                    print_month(agenda.training_sessions(), index, today, &config)?;
                    let stats = ScheduleStats::compute(&agenda, today, index);
                    println!(
                        "\nActive trainers: {}  Sessions today: {}  Sessions this month: {}",
                        stats.active_trainers, stats.today_sessions, stats.month_sessions
                    );
                }
                ActivityKind::Event => print_month(agenda.events(), index, today, &config)?,
            }
        }
        Command::Week { date, kind } => {
            let anchor = date.unwrap_or(today);
            match kind {
                ActivityKind::PhysicalTraining => {
                    print_week(agenda.physical_training(), anchor, today)?
                }
                ActivityKind::ReligiousActivity => {
                    print_week(agenda.religious_activities(), anchor, today)?
                }
                ActivityKind::TrainingSession => {
                    print_week(agenda.training_sessions(), anchor, today)?
                }
                ActivityKind::Event => print_week(agenda.events(), anchor, today)?,
            }
        }
        Command::Dashboard => {
            let stats = DashboardStats::compute(&agenda, today, &config.rooms, config.upcoming_limit);
            let upcoming = agenda.upcoming_events(today, config.upcoming_limit);
            print!("{}", render::render_dashboard(&stats, &agenda, &upcoming));
        }
        Command::Rooms {
            building,
            floor,
            search,
        } => {
            let filter = RoomFilter {
                building,
                floor,
                search,
            };
            let rooms = dormitory::group_by_room(agenda.dormitory_assignments());
            let shown = filter.apply(&rooms, agenda.trainers());
            let stats = occupancy(&agenda, &config.rooms);
            print!(
                "{}",
                render::render_rooms(&shown, &agenda, &stats, config.rooms.room_capacity)
            );
        }
    }

    Ok(())
}
