//! Settle the explorer session once for the given controls and print the
//! live summary.
//!
//! Usage: `run [--n N] [--sigma S] [--chart out.svg]`

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use covary_explorer::{ReportView, Session};

#[derive(Parser, Debug)]
#[command(name = "run")]
#[command(about = "Settle the explorer session once and print the live summary")]
struct Args {
    /// Sample size n
    #[arg(long, default_value = "1000")]
    n: f64,

    /// Noise sigma
    #[arg(long, default_value = "0.5")]
    sigma: f64,

    /// Write the scatter chart SVG to this path
    #[arg(long)]
    chart: Option<PathBuf>,
}

fn main() {
    covary_tools::init_logging();

    let args = Args::parse();

    let mut session = match Session::new() {
        Ok(s) => s,
        Err(e) => {
            error!("failed to build session: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = session.set_sample_size(args.n) {
        error!("rejected --n: {e}");
        process::exit(1);
    }
    if let Err(e) = session.set_noise_sigma(args.sigma) {
        error!("rejected --sigma: {e}");
        process::exit(1);
    }

    let view = session.report();
    println!("{}", view.to_text());

    if let Some(path) = args.chart {
        let ReportView::Ready(report) = view else {
            error!("no chart available for a degraded report");
            process::exit(1);
        };
        if let Err(e) = std::fs::write(&path, &report.chart_svg) {
            error!("failed to write {}: {e}", path.display());
            process::exit(1);
        }
        info!("chart written to {}", path.display());
    }
}
