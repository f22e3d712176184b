//! Export a static artifact for the given controls: chart, text summary,
//! and a JSON payload, written into an output directory.
//!
//! Usage: `export --out <dir> [--n N] [--sigma S]`

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use covary_explorer::{ReportView, Session, Summary};

#[derive(Parser, Debug)]
#[command(name = "export")]
#[command(about = "Render the session once and write chart.svg, summary.md, summary.json")]
struct Args {
    /// Output directory (created if missing)
    #[arg(long)]
    out: PathBuf,

    /// Sample size n
    #[arg(long, default_value = "1000")]
    n: f64,

    /// Noise sigma
    #[arg(long, default_value = "0.5")]
    sigma: f64,
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

    let report = match session.report() {
        ReportView::Ready(report) => report,
        other => {
            error!("nothing to export: {}", other.to_text());
            process::exit(1);
        }
    };

    let Some(fit) = session.fit() else {
        error!("fit unavailable after settle");
        process::exit(1);
    };
    let summary = Summary::new(session.sample_size(), session.noise_sigma(), fit);
    let json = match serde_json::to_string_pretty(&summary) {
        Ok(j) => j,
        Err(e) => {
            error!("failed to serialize summary: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = fs::create_dir_all(&args.out) {
        error!("failed to create {}: {e}", args.out.display());
        process::exit(1);
    }

    let writes = [
        ("chart.svg", report.chart_svg.as_str()),
        ("summary.md", report.summary.as_str()),
        ("summary.json", json.as_str()),
    ];
    for (name, contents) in writes {
        let path = args.out.join(name);
        if let Err(e) = fs::write(&path, contents) {
            error!("failed to write {}: {e}", path.display());
            process::exit(1);
        }
    }

    info!("exported to {}", args.out.display());
}
