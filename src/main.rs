use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::fmt;

use polysecret::TestCase;

/// Recover the constant term of a polynomial from encoded evaluation points.
#[derive(Debug, Parser)]
#[command(name = "polysecret", version)]
struct Args {
    /// JSON test case with a `keys` object and one `{base, value}` entry per x.
    file: PathBuf,

    /// Check the points left out of the selection against the recovered polynomial.
    #[arg(long)]
    check: bool,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let test_case = TestCase::from_path(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;

    println!("Test Case: {}", args.file.display());
    println!("Number of roots (n): {}", test_case.keys.n);
    println!("Minimum roots required (k): {}", test_case.keys.k);

    let set = test_case.to_point_set().context("decoding points")?;

    println!("\nDecoded Points:");
    for point in set.points() {
        println!("  x = {}, y = {}", point.x(), point.y());
    }

    if !args.check {
        let secret = set.secret().context("interpolating")?;
        info!(%secret, "secret recovered");
        println!("\nSecret (constant term c): {}", secret);
        return Ok(true);
    }

    let report = set.check_consistency().context("interpolating")?;
    info!(secret = %report.secret, outliers = report.outliers.len(), "consistency check finished");
    println!("\nSecret (constant term c): {}", report.secret);
    if report.is_consistent() {
        println!("All {} points lie on the recovered polynomial.", set.points().len());
    } else {
        println!("\nPoints off the recovered polynomial:");
        for outlier in &report.outliers {
            println!(
                "  x = {}: given {}, polynomial gives {}",
                outlier.point.x(),
                outlier.point.y(),
                outlier.interpolated
            );
        }
    }
    Ok(report.is_consistent())
}

fn main() -> ExitCode {
    let args = Args::parse();

    fmt()
        .with_max_level(log_level(args.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
