use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use ttyplot::{Error, PlotConfig};

#[derive(Parser, Debug)]
#[command(
    name = "ttyplot",
    version,
    about = "Realtime plotting of numbers read from stdin",
    after_help = "Keys: 'r' toggles rate mode, 'q' quits.\nExample: stresstest -2 | ttyplot -2 -t 'sine and cosine'"
)]
struct Cli {
    /// Read two values per record and plot two series
    #[arg(short = '2')]
    two: bool,

    /// Plot the rate of change of the values instead of the values
    #[arg(short = 'r')]
    rate: bool,

    /// Plot character
    #[arg(short = 'c', value_name = "CHAR")]
    plot_char: Option<char>,

    /// Character drawn when a value exceeds the hard maximum
    #[arg(short = 'e', value_name = "CHAR")]
    error_char: Option<char>,

    /// Character drawn when a value falls below the hard minimum
    #[arg(short = 'E', value_name = "CHAR")]
    error_char_min: Option<char>,

    /// Initial axis maximum; grows with the data
    #[arg(short = 's', value_name = "SOFTMAX", allow_negative_numbers = true)]
    soft_max: Option<f64>,

    /// Initial axis minimum; shrinks with the data
    #[arg(short = 'S', value_name = "SOFTMIN", allow_negative_numbers = true)]
    soft_min: Option<f64>,

    /// Fixed axis maximum; larger values are drawn as errors
    #[arg(short = 'm', value_name = "HARDMAX", allow_negative_numbers = true)]
    hard_max: Option<f64>,

    /// Fixed axis minimum; smaller values are drawn as errors
    #[arg(short = 'M', value_name = "HARDMIN", allow_negative_numbers = true)]
    hard_min: Option<f64>,

    /// Title shown above the chart
    #[arg(short = 't', value_name = "TITLE")]
    title: Option<String>,

    /// Unit printed after every value
    #[arg(short = 'u', value_name = "UNIT")]
    unit: Option<String>,

    /// YAML configuration file [default: ~/.ttyplot/config.yaml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flags win over whatever the configuration file says.
    fn apply(&self, cfg: &mut PlotConfig) {
        cfg.two_series |= self.two;
        cfg.rate |= self.rate;
        if self.plot_char.is_some() {
            cfg.plot_char = self.plot_char;
        }
        if let Some(c) = self.error_char {
            cfg.error_char = c;
        }
        if let Some(c) = self.error_char_min {
            cfg.error_char_min = c;
        }
        if let Some(v) = self.soft_max {
            cfg.limits.soft_max = v;
        }
        if let Some(v) = self.soft_min {
            cfg.limits.soft_min = v;
        }
        if self.hard_max.is_some() {
            cfg.limits.hard_max = self.hard_max;
        }
        if self.hard_min.is_some() {
            cfg.limits.hard_min = self.hard_min;
        }
        if let Some(t) = &self.title {
            cfg.title = t.clone();
        }
        if let Some(u) = &self.unit {
            cfg.unit = u.clone();
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(
        if log_file.is_some() { "info" } else { "error" },
    ));
    builder.format_timestamp_millis();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<PlotConfig> {
    let mut cfg = match &cli.config {
        Some(path) => PlotConfig::load_from_path(path)?,
        None => PlotConfig::load_default()?,
    };
    cli.apply(&mut cfg);
    cfg.validate().map_err(|reason| Error::Config {
        origin: "arguments".to_string(),
        reason,
    })?;
    Ok(cfg)
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.log_file.as_deref())?;
    let cfg = load_config(&cli)?;
    log::info!(
        "{} starting: two_series={} rate={} limits={:?}",
        ttyplot::VERSION_STRING,
        cfg.two_series,
        cfg.rate,
        cfg.limits
    );
    ttyplot::run(cfg).context("dashboard stopped")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging_to_file = cli.log_file.is_some();
    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The stderr logger would print the same line twice.
            if logging_to_file {
                log::error!("{:#}", err);
            }
            eprintln!("ttyplot: {:#}", err);
            let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
            ExitCode::from(code)
        }
    }
}
