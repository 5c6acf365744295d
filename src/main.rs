use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use medcal::calendar::{build_month, build_week, CalendarDay, MonthView};
use medcal::config;
use medcal::daemon::run_daemon;
use medcal::database::load_medications;
use medcal::expiration::{
    annotate_all, expiring_within, group_by_status, matches_search, sort_by, stats,
    AnnotatedMedication, ExpirationStatus, MedicationStats, SortField, SortOrder,
};
use medcal::time::TimeOfDay;
use medcal::timeline::{build_day_schedule, group_at, DaySchedule, TimeGroup};
use medcal::{Medication, Result};

#[derive(Parser)]
#[command(name = "medcal")]
#[command(
    about = "Medication dose calendar",
    long_about = "Shows when each medication dose falls: a week strip, a month grid, a per-day timeline, and expiration status. Reads medications from a JSON file kept by your medication store."
)]
#[command(version)]
struct Cli {
    /// Medications file (defaults to $MEDCAL_DATA or ~/.medcal.json)
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the week (Monday to Sunday) containing a date
    #[command(visible_alias = "w")]
    Week {
        /// Any date in the week (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show every dose on one day, grouped by time
    #[command(visible_alias = "d")]
    Day {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show what is due at one time of day
    At {
        /// Time of day (e.g., "08:00", "8", "noon")
        time: TimeOfDay,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show the month containing a date
    #[command(visible_alias = "m")]
    Month {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List medications by expiration status
    #[command(visible_aliases = ["s", "list"])]
    Status {
        /// Only show medications ending within this many days
        #[arg(short, long)]
        expiring_within: Option<i64>,
        /// Only show medications whose name, dosage or color contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Sort medications by this field
        #[arg(long, value_enum)]
        sort: Option<SortField>,
        /// Sort direction; missing values stay last either way
        #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,
    },
    /// Start the background daemon for dose reminders
    Daemon,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_file = cli.file.unwrap_or_else(config::data_file);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let load = || load_medications(&data_file);

    match cli.command {
        Commands::Week { date } => {
            let week = build_week(date.unwrap_or(today), &load()?, today);
            output(cli.json, &week, || print_week(&week))
        }
        Commands::Day { date } => {
            let schedule = build_day_schedule(date.unwrap_or(today), &load()?);
            output(cli.json, &schedule, || print_day(&schedule))
        }
        Commands::At { time, date } => {
            let date = date.unwrap_or(today);
            let group = group_at(date, time, &load()?);
            output(cli.json, &group, || print_group(date, &group))
        }
        Commands::Month { date } => {
            let month = build_month(date.unwrap_or(today), &load()?, today);
            output(cli.json, &month, || print_month(&month))
        }
        Commands::Status {
            expiring_within: within,
            search,
            sort,
            order,
        } => {
            let query = StatusQuery {
                within,
                search,
                sort: sort.map(|field| (field, order)),
            };
            status(&load()?, today, &query, cli.json)
        }
        Commands::Daemon => {
            run_daemon(&data_file);
            Ok(())
        }
    }
}

fn output<T: Serialize>(json: bool, value: &T, print_text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print_text();
    }
    Ok(())
}

fn print_week(week: &[CalendarDay]) {
    if let (Some(first), Some(last)) = (week.first(), week.last()) {
        println!("\nWeek of {} to {}", first.date, last.date);
    }
    println!("{}", "=".repeat(60));

    for day in week {
        let mut marker = String::new();
        if day.is_today {
            marker.push_str(" (today)");
        }
        if !day.is_current_month {
            marker.push_str(" *");
        }
        println!("\n{} {:>2}{}", day.day_name, day.day_number, marker);

        if day.doses.is_empty() {
            println!("  -");
        }
        for dose in &day.doses {
            println!("  {}  {}", dose.time, dose.medication_name);
        }
    }
    println!();
}

fn print_day(schedule: &DaySchedule) {
    println!("\nDoses for {}", schedule.date.format("%A %Y-%m-%d"));
    println!("{}", "=".repeat(60));

    if schedule.groups.is_empty() {
        println!("No doses scheduled.");
        return;
    }

    for group in &schedule.groups {
        println!("\n{}", group.time);
        for entry in &group.medications {
            println!("  {}", entry.medication.display_name());
        }
    }
    println!("\nTotal doses: {}", schedule.total_doses);
    println!();
}

fn print_group(date: NaiveDate, group: &TimeGroup) {
    if group.medications.is_empty() {
        println!("Nothing scheduled at {} on {}.", group.time, date);
        return;
    }
    println!("\nDue at {} on {}:", group.time, date);
    for entry in &group.medications {
        println!("  {}", entry.medication.display_name());
    }
    println!();
}

fn print_month(month: &MonthView) {
    let title = month
        .days
        .first()
        .map(|d| d.date.format("%B %Y").to_string())
        .unwrap_or_default();
    println!("\n{:^28}", title);
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");

    let mut line = "    ".repeat(month.leading_days as usize);
    let mut column = month.leading_days;
    for day in &month.days {
        // '*' marks days with doses, '!' marks today
        let mark = if day.is_today {
            '!'
        } else if !day.doses.is_empty() {
            '*'
        } else {
            ' '
        };
        line.push_str(&format!(" {:>2}{}", day.day_number, mark));
        column += 1;
        if column % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    println!();
}

#[derive(Serialize)]
struct StatusReport<'a> {
    stats: MedicationStats,
    medications: Vec<&'a AnnotatedMedication>,
}

struct StatusQuery {
    within: Option<i64>,
    search: Option<String>,
    sort: Option<(SortField, SortOrder)>,
}

fn status(meds: &[Medication], today: NaiveDate, query: &StatusQuery, json: bool) -> Result<()> {
    let annotated = annotate_all(meds, today);

    let mut selected: Vec<&AnnotatedMedication> = match query.within {
        Some(days) => expiring_within(&annotated, days),
        None => annotated.iter().collect(),
    };
    if let Some(term) = &query.search {
        selected.retain(|m| matches_search(m, term));
    }
    if let Some((field, order)) = query.sort {
        sort_by(&mut selected, field, order);
    }

    if json {
        let report = StatusReport {
            stats: stats(&annotated),
            medications: selected,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if selected.is_empty() {
        match (query.within, &query.search) {
            (_, Some(term)) => println!("No medications match '{}'.", term),
            (Some(days), None) => println!("No medications end within {} days.", days),
            (None, None) => println!("No medications found."),
        }
        return Ok(());
    }

    let owned: Vec<AnnotatedMedication> = selected.into_iter().cloned().collect();
    for group in group_by_status(&owned) {
        let heading = match group.status {
            ExpirationStatus::Active => "Active",
            ExpirationStatus::ExpiringSoon => "Expiring Soon",
            ExpirationStatus::Expired => "Expired",
        };
        println!("\n{} ({}):", heading, group.count);
        println!("{}", "=".repeat(60));

        for med in &group.medications {
            println!("\n{}", med.display_name);
            println!(
                "  Every:    {} hours from {}",
                med.frequency_hours,
                med.medication.first_dose_time()
            );
            if let Some(start) = med.medication.start_date {
                println!("  Starts:   {}", start);
            }
            if let Some(end) = med.medication.end_date {
                println!("  Ends:     {}", end);
            }
            if let Some(days) = med.days_until_expiration() {
                println!("  Days left: {}", days.max(0));
            }
            println!("  Taken:    {}", if med.medication.consumed { "✓" } else { "✗" });
        }
    }

    let s = stats(&annotated);
    println!(
        "\nTotal: {}  Active: {}  Expiring soon: {}  Expired: {}",
        s.total, s.active, s.expiring_soon, s.expired
    );
    println!();
    Ok(())
}
