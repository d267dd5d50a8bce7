use std::error::Error;

use clap::Parser;
use sales_dashboard::{ReportBuilder, COMPLETION_MESSAGE};

/// Renders the sales report from `sales_data1.csv` into `visualizations/`.
///
/// The output directory must already exist. Text on the PNG charts needs a
/// TrueType font: put `Roboto-Regular.ttf` under `assets/fonts` next to the
/// binary, point `SALES_DASHBOARD_FONTS_DIR` at a directory holding it, or
/// rely on a system DejaVu Sans / Arial install. Set `RUST_LOG=info` to see
/// each file as it is written.
#[derive(Parser)]
#[command(author, version, about = "Static and interactive sales charts")]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match ReportBuilder::new().run() {
        Ok(output) => {
            log::debug!("{} artifacts written", output.artifacts.len());
            println!("{}", COMPLETION_MESSAGE);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
