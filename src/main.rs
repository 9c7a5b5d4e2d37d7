use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

use famcal::config::{CalendarConfig, parse_timezone};
use famcal::core::entity::{EntityIndex, EntityRecord};
use famcal::core::entity_filter::EntityFocus;
use famcal::core::filter::{FilterContext, FilterState};
use famcal::core::item::{EntityId, ItemKind, ScheduledItem};
use famcal::core::temporal::CalendarView;

#[derive(Parser)]
#[command(name = "famcal", about = "Lay out family calendar data for display")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the agenda, grouped by month and day
    Agenda(ViewArgs),
    /// Print the period rows for each date
    Periods(ViewArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// JSON array of scheduled items
    #[arg(long)]
    items: PathBuf,
    /// JSON array of entity records
    #[arg(long)]
    entities: Option<PathBuf>,
    /// JSON filter state; overrides the configured filters
    #[arg(long)]
    filters: Option<PathBuf>,
    /// IANA timezone; overrides the configured zone
    #[arg(long)]
    tz: Option<String>,
    /// Only show the calendar of this entity
    #[arg(long)]
    focus: Option<EntityId>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))?)
}

fn init_logging(config: &CalendarConfig) {
    // Journal logging (`journalctl --user -t famcal -f`): famcal at info/debug, others at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("famcal") {
                let max = if famcal::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    famcal::set_debug_logging(config.debug_logging);

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("famcal".to_string()),
        Err(e) => {
            eprintln!("famcal: journal unavailable, logging disabled: {}", e);
            return;
        }
    };
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn build_view(
    args: &ViewArgs,
    config: &CalendarConfig,
) -> Result<CalendarView, Box<dyn std::error::Error>> {
    let items: Vec<ScheduledItem> = read_json(&args.items)?;
    let entities: Vec<EntityRecord> = match &args.entities {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let filters: FilterState = match &args.filters {
        Some(path) => read_json(path)?,
        None => config.filters.clone(),
    };
    let tz = match &args.tz {
        Some(name) => parse_timezone(name)?,
        None => config.tz()?,
    };

    log::info!(
        "Building calendar from {} items and {} entities in {}",
        items.len(),
        entities.len(),
        tz
    );

    let index = EntityIndex::new(entities);
    let ctx = FilterContext::new(&index);
    let color = &config.default_period_color;
    Ok(match args.focus {
        Some(id) => CalendarView::build_for_entity(
            &items,
            &EntityFocus::entity(id),
            &filters,
            &ctx,
            &tz,
            color,
        ),
        None => CalendarView::build(&items, &filters, &ctx, &tz, color),
    })
}

fn kind_label(kind: &ItemKind) -> String {
    match kind {
        ItemKind::Task { task_type } => task_type.as_keyword().to_string(),
        ItemKind::Period { .. } => "PERIOD".into(),
        ItemKind::Entity { entity_type } => format!("{:?}", entity_type).to_uppercase(),
        _ => "SCHOOL".into(),
    }
}

fn print_agenda(view: &CalendarView) {
    for section in view.agenda.month_sections() {
        println!("== {}-{:02} ==", section.year, section.month);
        for day in &section.days {
            println!("  {}", day.date.format("%a %Y-%m-%d"));
            for entry in &day.entries {
                let time = entry
                    .start_datetime
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_else(|| "all day".into());
                let check = if entry.is_complete { "x" } else { " " };
                println!(
                    "    [{}] {:>7}  {} ({})",
                    check,
                    time,
                    entry.title,
                    kind_label(&entry.kind)
                );
            }
        }
    }
    if view.hidden > 0 {
        println!("({} hidden by filters)", view.hidden);
    }
}

fn print_periods(view: &CalendarView) {
    for (date, day) in view.periods.iter() {
        let rows: Vec<String> = day
            .periods
            .iter()
            .map(|entry| match entry.id {
                Some(id) => id.to_string(),
                None => ".".into(),
            })
            .collect();
        println!("{}  {}", date, rows.join(" "));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => CalendarConfig::default_path()?,
    };
    let config = CalendarConfig::load(&config_path)?;
    init_logging(&config);

    match &cli.command {
        Command::Agenda(args) => print_agenda(&build_view(args, &config)?),
        Command::Periods(args) => print_periods(&build_view(args, &config)?),
    }

    Ok(())
}
