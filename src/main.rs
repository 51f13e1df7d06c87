use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{error, info};
use tui::backend::CrosstermBackend;
use tui::Terminal;

use ges_explorer::{
    apply_filters, apply_sort, display_range, distinct_values, extract_series, init_logging,
    read_dataset, write_csv, App, Dimension, DimensionValue, Field, FilterState, InvalidYearRange,
    Metric, SeriesQuery, SortOrder, SurveyDataSet, YearRange,
};

const DEFAULT_DATA_PATH: &str = "data/survey.json";

#[derive(Parser)]
#[command(name = "ges")]
#[command(
    about = "Explore the Graduate Employment Survey as a table and trend chart",
    long_about = None
)]
struct Cli {
    /// Dataset file (.json array or .csv)
    #[arg(long, global = true, env = "GES_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    #[arg(long, global = true, env = "GES_LOG_LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long, global = true, env = "GES_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the table and chart in the terminal
    Browse {
        #[arg(long, default_value = "10")]
        page_size: NonZeroUsize,
    },
    /// Print the distinct values of a column
    Dimensions { dimension: Dimension },
    /// Write filtered and sorted rows as CSV
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        from: Option<i32>,
        #[arg(long)]
        to: Option<i32>,
        #[arg(long)]
        university: Vec<String>,
        #[arg(long)]
        school: Vec<String>,
        #[arg(long)]
        degree: Vec<String>,
        #[arg(long)]
        sort: Option<Field>,
        #[arg(long)]
        descending: bool,
    },
    /// Print a metric's yearly series and its chart range
    Series {
        #[arg(long)]
        metric: Metric,
        #[arg(long)]
        university: Option<String>,
        #[arg(long)]
        degree: Option<String>,
    },
}

enum Event<I> {
    Input(I),
    Tick,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_dir = absolute(&cli.log_dir)?;
    let _logger = init_logging(&cli.log_level, &log_dir).context("failed to start logging")?;

    let records = read_dataset(&cli.data)
        .with_context(|| format!("failed to load dataset from {}", cli.data.display()))?;
    let dataset = SurveyDataSet::new(records);

    let command = cli.command.unwrap_or(Commands::Browse {
        page_size: NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN),
    });
    let result = match command {
        Commands::Browse { page_size } => browse(&dataset, page_size),
        Commands::Dimensions { dimension } => {
            for value in distinct_values(dataset.records(), dimension) {
                println!("{value}");
            }
            Ok(())
        }
        Commands::Export {
            out,
            from,
            to,
            university,
            school,
            degree,
            sort,
            descending,
        } => {
            let mut filters = FilterState::new();
            if from.is_some() || to.is_some() {
                match export_year_range(dataset.years(), from, to)? {
                    Some(range) => filters.set_year_range(range),
                    None => filters.set(Dimension::Year, Vec::new()),
                }
            }
            for (dimension, values) in [
                (Dimension::University, university),
                (Dimension::School, school),
                (Dimension::Degree, degree),
            ] {
                if !values.is_empty() {
                    filters.set(dimension, values.into_iter().map(DimensionValue::from));
                }
            }
            let order = sort.map(|field| {
                if descending {
                    SortOrder::descending(field)
                } else {
                    SortOrder::ascending(field)
                }
            });
            let rows = apply_sort(apply_filters(dataset.records(), &filters), order);
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            write_csv(file, rows.iter().copied())?;
            info!(
                "event=export module=cli status=ok rows={} out={}",
                rows.len(),
                out.display()
            );
            println!("Wrote {} rows to {}.", rows.len(), out.display());
            Ok(())
        }
        Commands::Series {
            metric,
            university,
            degree,
        } => {
            let query = SeriesQuery {
                metric,
                university,
                degree,
            };
            let mut series = extract_series(dataset.records(), &query);
            series.sort_by_year();
            for rejected in &series.rejected {
                eprintln!("skipped: {rejected}");
            }
            match display_range(metric, &series.values()) {
                Some(range) => {
                    for point in &series.points {
                        println!("{}\t{}", point.year, point.value);
                    }
                    println!("range\t{}\t{}", range.lower, range.upper);
                }
                None => println!("No data found."),
            }
            Ok(())
        }
    };

    if let Err(err) = &result {
        error!("event=app_exit module=cli status=error error={err:#}");
    }
    result
}

/// Narrows `--from`/`--to` to the years the dataset holds. `None` when the
/// requested span misses every year.
fn export_year_range(
    years: &[i32],
    from: Option<i32>,
    to: Option<i32>,
) -> Result<Option<YearRange>, InvalidYearRange> {
    let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
        return Ok(None);
    };
    if let (Some(start), Some(end)) = (from, to) {
        YearRange::new(start, end)?;
    }
    let start = from.map_or(first, |year| year.max(first));
    let end = to.map_or(last, |year| year.min(last));
    if start > end {
        return Ok(None);
    }
    YearRange::new(start, end).map(Some)
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("failed to resolve working directory")?
        .join(path))
}

fn browse(dataset: &SurveyDataSet, page_size: NonZeroUsize) -> anyhow::Result<()> {
    let mut app = App::new(dataset, page_size);

    enable_raw_mode().context("failed to enter raw mode")?;
    let outcome = run_ui(&mut app);
    disable_raw_mode().context("failed to leave raw mode")?;
    outcome
}

fn run_ui(app: &mut App) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(200);
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            match event::poll(timeout) {
                Ok(true) => {
                    if let Ok(CEvent::Key(key)) = event::read() {
                        if tx.send(Event::Input(key)).is_err() {
                            return;
                        }
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    error!("event=poll module=ui status=error error={err}");
                    return;
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|rect| ges_explorer::ui::draw(rect, app))?;

        match rx.recv()? {
            Event::Input(KeyEvent { code, kind, .. }) => {
                if kind != KeyEventKind::Press {
                    continue;
                }
                if !app.on_key(code) {
                    terminal.clear()?;
                    terminal.show_cursor()?;
                    break;
                }
            }
            Event::Tick => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS: [i32; 4] = [2018, 2019, 2020, 2021];

    #[test]
    fn export_range_is_clamped_to_dataset_years() {
        let range = export_year_range(&YEARS, Some(-2_000_000_000), Some(2_000_000_000))
            .unwrap()
            .unwrap();
        assert_eq!(range, YearRange::new(2018, 2021).unwrap());
        assert_eq!(range.years().count(), 4);

        let open_end = export_year_range(&YEARS, Some(2020), None).unwrap();
        assert_eq!(open_end, YearRange::new(2020, 2021).ok());
    }

    #[test]
    fn export_range_outside_the_data_matches_nothing() {
        assert_eq!(export_year_range(&YEARS, Some(2030), Some(2040)).unwrap(), None);
        assert_eq!(export_year_range(&YEARS, None, Some(1999)).unwrap(), None);
        assert_eq!(export_year_range(&[], Some(2018), Some(2019)).unwrap(), None);
    }

    #[test]
    fn export_range_rejects_inverted_bounds() {
        let err = export_year_range(&YEARS, Some(2021), Some(2019)).unwrap_err();
        assert_eq!(err, InvalidYearRange { start: 2021, end: 2019 });
    }
}
