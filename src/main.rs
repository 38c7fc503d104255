use anyhow::{Context, Result};
use cardioinsight::filter::ClinicalFilter;
use cardioinsight::logging::{init_logging, LogConfig, LogFormat};
use cardioinsight::session::Session;
use cardioinsight::views::patient::PatientSelection;
use cardioinsight::views::{
    page_for, render_current, ClinicalView, ColumnsView, OverviewView, PatientView, PolicyView, View,
    ViewResult,
};
use cardioinsight::{report, runtime, OutputFormat, RenderOptions};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cardioinsight", version)]
#[command(about = "Explore a heart disease CSV: overview, clinical, policy and patient views", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: ReportFormat,

    /// Also write every chart as an image into DIR
    #[arg(long, value_name = "DIR", global = true)]
    charts: Option<PathBuf>,

    /// JSON render configuration ({"width", "height", "type"})
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Chart height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Chart image format
    #[arg(long = "image-format", value_enum, global = true)]
    image_format: Option<OutputFormat>,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatArg,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the detected clinical role of each column
    Columns { file: PathBuf },
    /// Population overview
    Overview { file: PathBuf },
    /// Risk factor analysis over a filtered cohort
    Clinical {
        file: PathBuf,
        #[arg(long)]
        age_min: Option<f64>,
        #[arg(long)]
        age_max: Option<f64>,
        /// Hide male patients
        #[arg(long)]
        no_male: bool,
        /// Hide female patients
        #[arg(long)]
        no_female: bool,
        /// Keep only patients with or without exercise-induced angina
        #[arg(long, value_enum)]
        angina: Option<AnginaArg>,
    },
    /// Population-level trends
    Policy { file: PathBuf },
    /// Individual risk profile
    Patient {
        file: PathBuf,
        /// Patient number, starting at 1
        #[arg(long, default_value_t = 1)]
        patient: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnginaArg {
    With,
    Without,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        with_ansi: io::stderr().is_terminal(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        ..LogConfig::default()
    };
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    if let Err(error) = run(&cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = render_options(cli)?;
    let mut session = Session::new();

    match &cli.command {
        Command::Columns { file } => {
            session.load_file(file)?;
            emit::<ColumnsView>(cli, &session, &(), &options)
        }
        Command::Overview { file } => {
            session.load_file(file)?;
            emit::<OverviewView>(cli, &session, &(), &options)
        }
        Command::Clinical {
            file,
            age_min,
            age_max,
            no_male,
            no_female,
            angina,
        } => {
            session.load_file(file)?;
            let filter = clinical_filter(&session, *age_min, *age_max, !no_male, !no_female, *angina);
            emit::<ClinicalView>(cli, &session, &filter, &options)
        }
        Command::Policy { file } => {
            session.load_file(file)?;
            emit::<PolicyView>(cli, &session, &(), &options)
        }
        Command::Patient { file, patient } => {
            session.load_file(file)?;
            emit::<PatientView>(cli, &session, &PatientSelection { index: *patient }, &options)
        }
    }
}

/// Config file first, then individual flag overrides
fn render_options(cli: &Cli) -> Result<RenderOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            RenderOptions::from_json(&json)
                .with_context(|| format!("Invalid render config {}", path.display()))?
        }
        None => RenderOptions::default(),
    };
    if let Some(width) = cli.width {
        options.width = width;
    }
    if let Some(height) = cli.height {
        options.height = height;
    }
    if let Some(format) = cli.image_format {
        options.format = format;
    }
    Ok(options)
}

/// Missing ends of the age range fall back to the dataset's age domain
fn clinical_filter(
    session: &Session,
    age_min: Option<f64>,
    age_max: Option<f64>,
    show_male: bool,
    show_female: bool,
    angina: Option<AnginaArg>,
) -> ClinicalFilter {
    let age = match (age_min, age_max) {
        (None, None) => None,
        (lo, hi) => {
            let (dlo, dhi) = session
                .current()
                .map(|ds| {
                    let roles = cardioinsight::roles::detect_columns(&ds.columns);
                    cardioinsight::filter::age_domain(ds, &roles)
                })
                .unwrap_or(cardioinsight::filter::DEFAULT_AGE_DOMAIN);
            Some((lo.unwrap_or(dlo), hi.unwrap_or(dhi)))
        }
    };

    ClinicalFilter {
        age,
        show_male,
        show_female,
        angina: angina.map(|a| matches!(a, AnginaArg::With)),
    }
}

fn emit<V: View>(cli: &Cli, session: &Session, state: &V::State, options: &RenderOptions) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.format {
        ReportFormat::Json => {
            let json = match render_current::<V>(session, state)? {
                ViewResult::Ready(output) => serde_json::to_string_pretty(&output),
                ViewResult::NoData => serde_json::to_string_pretty(&serde_json::Value::Null),
            }
            .context("Failed to serialize view")?;
            writeln!(handle, "{}", json).context("Failed to write report to stdout")?;
        }
        ReportFormat::Text => {
            let page = page_for::<V>(session, state)?;
            write!(handle, "{}", report::render_page(&page)).context("Failed to write report to stdout")?;
        }
    }
    handle.flush().context("Failed to flush stdout")?;

    if let Some(dir) = &cli.charts {
        let page = page_for::<V>(session, state)?;
        for path in runtime::render_page(&page, dir, options)? {
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}
