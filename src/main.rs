use clap::{Parser, Subcommand};
use sheetcalc::cli;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetcalc")]
#[command(about = "Spreadsheet-compatible conditional aggregation and calendar math")]
#[command(long_about = "Sheetcalc - spreadsheet functions from the command line

COMMANDS:
  serial       - Date to serial day number (1900 date system)
  from-serial  - Serial day number to date (fractions give a time of day)
  edate        - Shift a date by months, clamping to month end
  eomonth      - Last day of the month N months away
  days360      - Days between two dates on the 30/360 calendar
  yearfrac     - Year fraction under a day-count basis
  workday      - Date N business days away
  networkdays  - Business days between two dates (inclusive)
  weekday      - Weekday number under a numbering mode
  aggregate    - SUMIFS/COUNTIFS/AVERAGEIFS/MAXIFS/MINIFS over an inline table

EXAMPLES:
  sheetcalc serial 2024-01-01                       # 45292
  sheetcalc yearfrac 2024-01-31 2024-02-29 --basis act/360
  sheetcalc workday 2024-01-05 1 --holidays 2024-01-08
  sheetcalc aggregate sum amount --table '{region: [EMEA, US], amount: [1, 2]}' region EMEA

ENVIRONMENT:
  SHEETCALC_BASIS         default --basis for yearfrac
  SHEETCALC_HOLIDAYS      default --holidays (comma-separated YYYY-MM-DD)
  SHEETCALC_WEEKDAY_MODE  default --mode for weekday
  SHEETCALC_LOG           log filter, e.g. sheetcalc=debug")]
#[command(version)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log calculation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a date to its serial day number
    Serial {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Convert a serial day number to a date
    FromSerial {
        /// Serial number; a fractional part is decoded as a time of day
        #[arg(allow_hyphen_values = true)]
        serial: String,
    },

    /// Shift a date by whole months (EDATE)
    Edate {
        /// Start date (YYYY-MM-DD)
        date: String,

        /// Months to add (negative goes back)
        #[arg(allow_hyphen_values = true)]
        months: i32,
    },

    /// Last day of the month N months away (EOMONTH)
    Eomonth {
        /// Start date (YYYY-MM-DD)
        date: String,

        /// Months to add (negative goes back)
        #[arg(allow_hyphen_values = true)]
        months: i32,
    },

    /// Days between two dates on the 30/360 calendar (DAYS360)
    Days360 {
        start: String,
        end: String,

        /// European method: add a day when both dates fall on the 31st
        #[arg(long)]
        european: bool,
    },

    #[command(long_about = "Year fraction between two dates (YEARFRAC).

BASIS (code or name):
  0  us30/360       US 30/360 (default)
  1  act/act        Actual/Actual
  2  act/360        Actual/360
  3  act/365        Actual/365
  4  euro30/360     European 30/360")]
    /// Year fraction between two dates (YEARFRAC)
    Yearfrac {
        start: String,
        end: String,

        /// Day-count basis
        #[arg(short, long, default_value = "0", env = "SHEETCALC_BASIS")]
        basis: String,
    },

    /// Date N business days away (WORKDAY)
    Workday {
        /// Start date (YYYY-MM-DD)
        start: String,

        /// Business days to move (negative goes back)
        #[arg(allow_hyphen_values = true)]
        days: i64,

        /// Holidays to skip (comma-separated YYYY-MM-DD)
        #[arg(long, default_value = "", env = "SHEETCALC_HOLIDAYS")]
        holidays: String,
    },

    /// Business days between two dates, both inclusive (NETWORKDAYS)
    Networkdays {
        start: String,
        end: String,

        /// Holidays to skip (comma-separated YYYY-MM-DD)
        #[arg(long, default_value = "", env = "SHEETCALC_HOLIDAYS")]
        holidays: String,
    },

    #[command(long_about = "Weekday number of a date (WEEKDAY).

MODES:
  1       Sunday=1 .. Saturday=7 (default)
  2, 11   Monday=1 .. Sunday=7
  3       Monday=0 .. Sunday=6
  12-16   Tuesday..Saturday=1
  17      Sunday=1 .. Saturday=7")]
    /// Weekday number of a date (WEEKDAY)
    Weekday {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Numbering mode
        #[arg(short, long, default_value = "1", env = "SHEETCALC_WEEKDAY_MODE")]
        mode: String,
    },

    #[command(long_about = "Conditional aggregation over an inline table.

The table is YAML text mapping column names to lists:
  --table '{region: [EMEA, US, EMEA], amount: [100, 250, 300]}'

Criteria follow as column/value pairs, all of which must hold:
  sheetcalc aggregate sum amount --table '...' region EMEA year 2024

Values are typed: numbers, true/false and YYYY-MM-DD dates are recognized,
anything else is text. Quote a value to force text: '\"2024\"'.

--matches COLUMN=REGEX adds a regex filter on a text column.")]
    #[command(allow_negative_numbers = true)]
    /// Conditional aggregation (SUMIFS, COUNTIFS, AVERAGEIFS, MAXIFS, MINIFS)
    Aggregate {
        /// sum, count, average, max or min
        kind: String,

        /// Column to aggregate
        target: String,

        /// Table as inline YAML
        #[arg(short, long)]
        table: String,

        /// Regex filter COLUMN=REGEX (repeatable)
        #[arg(long = "matches")]
        matches: Vec<String>,

        /// Criteria as column/value pairs
        criteria: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "sheetcalc=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SHEETCALC_LOG").unwrap_or_else(|_| fallback.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match cli.command {
        Commands::Serial { date } => cli::serial(&date, json)?,

        Commands::FromSerial { serial } => cli::from_serial(&serial, json)?,

        Commands::Edate { date, months } => cli::edate(&date, months, json)?,

        Commands::Eomonth { date, months } => cli::eomonth(&date, months, json)?,

        Commands::Days360 {
            start,
            end,
            european,
        } => cli::days360(&start, &end, european, json)?,

        Commands::Yearfrac { start, end, basis } => cli::yearfrac(&start, &end, &basis, json)?,

        Commands::Workday {
            start,
            days,
            holidays,
        } => cli::workday(&start, days, &holidays, json)?,

        Commands::Networkdays {
            start,
            end,
            holidays,
        } => cli::networkdays(&start, &end, &holidays, json)?,

        Commands::Weekday { date, mode } => cli::weekday(&date, &mode, json)?,

        Commands::Aggregate {
            kind,
            target,
            table,
            matches,
            criteria,
        } => cli::aggregate(&kind, &target, &table, &matches, &criteria, json)?,
    }

    Ok(())
}
