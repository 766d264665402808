use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monthgrid::calendar::weekday_name;
use monthgrid::config::AppConfig;
use monthgrid::{CalendarDate, CalendarView, WeekdayConvention};

#[derive(Parser, Debug)]
#[command(name = "monthgrid")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "Print the month grid of a calendar view as JSON")]
struct Args {
    /// Any day of the month to show, as YYYY-MM-DD (default: today)
    #[arg(short, long)]
    date: Option<CalendarDate>,

    /// First column of the grid, e.g. "sunday" or "mon" (overrides config)
    #[arg(short, long)]
    week_start: Option<WeekdayConvention>,

    /// Move this many months forward from --date (negative to go back)
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    months: i32,

    /// Day to mark as selected (ignored unless it is in the shown month)
    #[arg(short, long)]
    select: Option<CalendarDate>,

    /// Read settings from this file instead of the default config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let convention = args.week_start.unwrap_or(config.week_start);

    let reference = args.date.unwrap_or_else(CalendarDate::today);
    let mut view = CalendarView::new(reference, convention);

    if args.months != 0 && !view.shift_months(args.months) {
        anyhow::bail!("Cannot move {} months from {}", args.months, reference);
    }

    if let Some(day) = args.select {
        if !view.select(day) {
            tracing::warn!("{} is not in the shown month; keeping {}", day, view.selected());
        }
    }

    let output = grid_json(&view, &config)?;
    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);
    Ok(())
}

/// Everything a host needs to draw the month: header, column names and rows
fn grid_json(view: &CalendarView, config: &AppConfig) -> Result<serde_json::Value> {
    let grid = view.grid();

    let title = view
        .title(&config.title_format)
        .map_err(|_| anyhow::anyhow!("Invalid title_format: '{}'", config.title_format))?;

    let weekdays: Vec<&str> = grid.weekday_header().into_iter().map(weekday_name).collect();

    let mut weeks = Vec::new();
    for week in grid.weeks() {
        let mut row = Vec::with_capacity(7);
        for cell in week {
            let label = cell
                .label(&config.day_format)
                .map_err(|_| anyhow::anyhow!("Invalid day_format: '{}'", config.day_format))?;
            row.push(serde_json::json!({
                "date": cell.date,
                "label": label,
                "in_current_month": cell.in_current_month,
                "selected": view.is_selected(cell),
            }));
        }
        weeks.push(row);
    }

    Ok(serde_json::json!({
        "title": title,
        "month_start": grid.month_start(),
        "month_end": grid.month_end(),
        "week_start": weekday_name(grid.convention().first_day()),
        "weekdays": weekdays,
        "selected": view.selected(),
        "weeks": weeks,
    }))
}
