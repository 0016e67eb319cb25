//! Build daily climatologies and anomalies from a radiosonde archive.
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use metfor::{Km, Quantity};
use sounding_climatology::{
    export::export_run,
    pipeline::run,
    source::{load_profile, ArchiveDir},
    station::{
        export_file_name, local_to_utc, parse_timestamp, write_station_csv, StationArchive,
        DEFAULT_FIELDS,
    },
    AltitudeGrid, CalendarDate, Cadence, ClimoError, LaunchReport, MalformedPolicy, OutOfRange,
    PipelineConfig, Profile, SoundingSummary, StationField, StationLocation, Variable,
};
use std::{fs::File, path::PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raise the log level, repeat for more. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Climatology of a range of years and the anomaly of the last one.
    Climatology {
        /// Directory holding the `.cor` files.
        #[arg(long, env = "SONDE_ARCHIVE")]
        archive: PathBuf,

        /// The archive has one sub-directory per year.
        #[arg(long)]
        per_year_dirs: bool,

        /// First year of the climatology.
        #[arg(long)]
        first_year: i32,

        /// Year compared against the climatology of the others.
        #[arg(long)]
        last_year: i32,

        /// Variable to aggregate.
        #[arg(long, default_value = "temperature")]
        variable: Variable,

        /// Grid step in km, from 0.001 to 35.
        #[arg(long, default_value_t = 0.3)]
        step: f64,

        /// What to do with samples outside of the grid.
        #[arg(long, value_enum, default_value_t = OutOfRangeArg::Drop)]
        out_of_range: OutOfRangeArg,

        /// Stop at the first file that cannot be used instead of skipping it.
        #[arg(long)]
        abort_on_malformed: bool,

        /// Keep February 29th.
        #[arg(long)]
        keep_leap_day: bool,

        /// Only process days before this one (DD-MM-YYYY), defaults to today.
        #[arg(long)]
        until: Option<CalendarDate>,

        /// File names to ignore, may be repeated.
        #[arg(long)]
        exclude: Vec<String>,

        /// Directory to write the CSV files into.
        #[arg(short, long, env = "SONDE_OUTPUT")]
        output: PathBuf,
    },
    /// Summary of a single launch.
    Summary {
        /// Directory holding the `.cor` files.
        #[arg(long, env = "SONDE_ARCHIVE")]
        archive: PathBuf,

        /// The archive has one sub-directory per year.
        #[arg(long)]
        per_year_dirs: bool,

        /// Launch day (DD-MM-YYYY).
        #[arg(long)]
        date: CalendarDate,
    },
    /// Extract a window of the surface station minute or hourly data.
    Station {
        /// Directory holding the monthly `DON_*` exports.
        #[arg(long, env = "SONDE_STATION_ARCHIVE")]
        archive: PathBuf,

        /// Which exports to read, `minute` or `hourly`.
        #[arg(long, default_value = "minute")]
        cadence: Cadence,

        /// Start of the window (DDMMYYYYhhmm), included.
        #[arg(long, value_parser = parse_time)]
        start: NaiveDateTime,

        /// End of the window (DDMMYYYYhhmm), included.
        #[arg(long, value_parser = parse_time)]
        end: NaiveDateTime,

        /// The window is given in UTC instead of Dumont d'Urville local time.
        #[arg(long)]
        utc: bool,

        /// Parameters to write, comma separated. Defaults to T,U,P,FF,DD,FXI.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<StationField>,

        /// Directory to write the CSV file into.
        #[arg(short, long, env = "SONDE_OUTPUT")]
        output: PathBuf,
    },
}

fn parse_time(arg: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(arg).ok_or_else(|| format!("'{}' is not a DDMMYYYYhhmm time", arg))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutOfRangeArg {
    Drop,
    Clamp,
    Reject,
}

impl From<OutOfRangeArg> for OutOfRange {
    fn from(arg: OutOfRangeArg) -> Self {
        match arg {
            OutOfRangeArg::Drop => OutOfRange::Drop,
            OutOfRangeArg::Clamp => OutOfRange::Clamp,
            OutOfRangeArg::Reject => OutOfRange::Reject,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Climatology {
            archive,
            per_year_dirs,
            first_year,
            last_year,
            variable,
            step,
            out_of_range,
            abort_on_malformed,
            keep_leap_day,
            until,
            exclude,
            output,
        } => {
            let source = ArchiveDir::new(&archive)
                .with_per_year_subdirs(per_year_dirs)
                .with_excluded(exclude);

            let on_malformed = if abort_on_malformed {
                MalformedPolicy::Abort
            } else {
                MalformedPolicy::Skip
            };

            let until = match until {
                Some(until) => until,
                None => CalendarDate::today()?,
            };

            let config = PipelineConfig::new(first_year, last_year)
                .with_variable(variable)
                .with_grid(AltitudeGrid::new(Km(step))?)
                .with_out_of_range(out_of_range.into())
                .with_on_malformed(on_malformed)
                .with_skip_leap_day(!keep_leap_day)
                .with_until(Some(until));

            info!("reading {} from {}", variable, archive.display());
            let result = run(&source, &config)
                .with_context(|| format!("building the {} climatology", variable))?;

            for failure in &result.report.failures {
                warn!("{} was skipped: {}", failure.date, failure.error);
            }

            let names = export_run(&output, &result)?;
            println!(
                "{} days, {} launches, {} missing, {} skipped",
                result.report.dates,
                result.report.present,
                result.report.missing,
                result.report.failures.len()
            );
            for name in names {
                println!("{}", output.join(name).display());
            }
        }
        Command::Summary {
            archive,
            per_year_dirs,
            date,
        } => {
            let source = ArchiveDir::new(&archive).with_per_year_subdirs(per_year_dirs);
            let report = source.fetch_report(date)?;

            let rec = match load_profile(&source, date)? {
                Profile::Present(rec) => rec,
                Profile::Missing => bail!(ClimoError::SourceNotFound(date)),
            };

            let tropopause = report
                .as_ref()
                .and_then(|r| r.tropopause.into_option())
                .map(Km::from);
            let summary = SoundingSummary::from_record(&rec, tropopause, StationLocation::default())
                .with_context(|| format!("summarizing {}", rec.source_name()))?;

            print_summary(rec.source_name(), &summary);
            if let Some(report) = report {
                print_report(&report);
            }
        }
        Command::Station {
            archive,
            cadence,
            start,
            end,
            utc,
            fields,
            output,
        } => {
            let (start_utc, end_utc) = if utc {
                (start, end)
            } else {
                (local_to_utc(start), local_to_utc(end))
            };

            let fields = if fields.is_empty() {
                DEFAULT_FIELDS.to_vec()
            } else {
                fields
            };

            let observations = StationArchive::new(&archive, cadence)
                .load_window(start_utc, end_utc)
                .with_context(|| format!("reading {} data from {}", cadence, archive.display()))?;

            std::fs::create_dir_all(&output)?;
            let path = output.join(export_file_name(cadence, start, end));
            write_station_csv(File::create(&path)?, &observations, &fields)?;

            println!("{} lines", observations.len());
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn print_summary(name: &str, summary: &SoundingSummary) {
    println!("{}", name);
    println!(
        "  apogee:          {:.2} km at {:.1} hPa",
        summary.apogee.unpack(),
        summary.apogee_pressure.unpack()
    );
    println!("  min temperature: {:.1} C", summary.min_temperature.unpack());
    if let Some(t) = summary.tropopause_temperature {
        println!("  tropopause:      {:.1} C", t.unpack());
    }
    println!(
        "  max wind:        {:.1} m/s ({:.0} kt) from {:.0} at {:.2} km",
        summary.max_wind.speed.unpack(),
        summary.max_wind.speed_knots().unpack(),
        summary.max_wind.direction,
        summary.max_wind.altitude.unpack()
    );
    println!("  drift:           {:.1} km", summary.drift_distance.unpack());
}

fn print_report(report: &LaunchReport) {
    if let Some(id) = &report.sonde_id {
        println!("  sonde:           {}", id);
    }
    if let Some(start) = &report.sonde_start {
        println!("  launched:        {}", start);
    }
    if let Some(p) = report.ground_pressure.into_option() {
        println!("  ground pressure: {:.1} hPa", p.unpack());
    }
    if let Some(t) = report.ground_temperature.into_option() {
        println!("  ground temp:     {:.1} C", t.unpack());
    }
    if let Some(clouds) = &report.ground_clouds {
        println!("  clouds:          {}", clouds);
    }
}
