use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use log::info;

use rill::output::{ConsoleRenderer, SeriesFormat};
use rill::ui::cli::drivers::InquireDriver;
use rill::ui::cli::wizard::prompt_choice;
use rill::ui::types::build::build_task;
use rill::ui::types::choices::TaskChoice;

#[derive(Parser, Debug)]
#[command(name = "rill", about = "Live anomaly detection over a numeric stream")]
struct Opts {
    /// JSON task file; without it the interactive wizard runs.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the retained score series here when the run ends.
    #[arg(short, long)]
    export: Option<PathBuf>,

    #[arg(short, long, default_value = "csv")]
    format: SeriesFormat,

    /// Do not print a line per tick.
    #[arg(short, long)]
    quiet: bool,

    /// Print only anomalies and gaps.
    #[arg(long)]
    anomalies_only: bool,

    /// Disable ANSI colors in the per-tick output.
    #[arg(long)]
    no_color: bool,
}

fn load_task(opts: &Opts) -> anyhow::Result<TaskChoice> {
    match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => prompt_choice::<TaskChoice, _>(&InquireDriver),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let task = load_task(&opts)?;
    info!("task: {}", serde_json::to_string(&task)?);

    let (tx, rx) = mpsc::channel();
    let mut driver = build_task(task)?.with_progress(tx);
    if !opts.quiet {
        let console = ConsoleRenderer::new(std::io::stdout(), !opts.no_color)
            .anomalies_only(opts.anomalies_only);
        driver = driver.with_sink(Box::new(console));
    }

    let progress = thread::spawn(move || {
        for report in rx {
            info!("progress: {report}");
        }
    });

    let report = driver.run();

    if let Some(path) = &opts.export {
        driver
            .series()
            .export(path, opts.format)
            .with_context(|| format!("exporting to {}", path.display()))?;
        info!("exported {} points to {}", driver.series().len(), path.display());
    }

    // closes the progress channel
    drop(driver);
    let _ = progress.join();

    println!("{report}");
    Ok(())
}
