mod app;
mod cli;
mod config;
mod effects;
mod frames;
mod logging;
mod ui;

use anyhow::Context;
use clap::Parser;
use syllabix_client::StreamHandle;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, problem) = config::load_or_default(&cli.config);
    cli.apply_overrides(&mut config);
    logging::initialize(config.log, &config.log_file, cli.verbose);
    config::report_config(&cli.config, problem.as_ref());

    let handle =
        StreamHandle::new(config.client_settings()).context("could not start the stream runtime")?;
    let job_id = match cli.command {
        Command::Watch { job_id } => job_id,
        Command::Upload { files, no_watch } => {
            let job_id = app::upload(&handle, &files)?;
            if no_watch {
                return Ok(());
            }
            job_id
        }
    };

    let state = app::watch(&handle, &job_id, config.view_settings())?;
    println!(
        "Job {} completed: {} file(s), {} page(s)",
        job_id, state.total_files, state.total_pages
    );
    Ok(())
}
