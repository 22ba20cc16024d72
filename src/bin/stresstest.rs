//! Endless sine (and optionally cosine) wave on stdout, for feeding ttyplot.

use std::io::{self, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "stresstest", version, about = "Generate test data for ttyplot")]
struct Cli {
    /// Output a cosine wave as second value
    #[arg(short = '2')]
    two: bool,

    /// Samples per second
    #[arg(short = 'r', long, default_value_t = 100.0)]
    rate: f64,
}

fn wave(n: u32, two: bool) -> String {
    let rad = (n as f64).to_radians();
    let mut line = format!("{:.1}\n", rad.sin() * 5.0 + 5.0);
    if two {
        line.push_str(&format!("{:.1}\n", rad.cos() * 5.0 + 5.0));
    }
    line
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if !(cli.rate.is_finite() && cli.rate > 0.0) {
        eprintln!("stresstest: rate must be a positive number");
        return ExitCode::FAILURE;
    }
    let delay = Duration::from_secs_f64(1.0 / cli.rate);
    let mut out = io::stdout().lock();
    let mut n: u32 = 0;
    loop {
        // A closed pipe ends the run.
        if out.write_all(wave(n, cli.two).as_bytes()).and_then(|_| out.flush()).is_err() {
            return ExitCode::SUCCESS;
        }
        n = (n + 5) % 360;
        thread::sleep(delay);
    }
}
