//! batticon: a battery status indicator for the terminal.

mod cli;
mod term_window;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::info;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};

use batticon_engine::{EngineOptions, EventLoop, ExitPipe, StatusEngine};
use batticon_pixmap::IconTable;
use batticon_power::SysfsBattery;

use crate::cli::Cli;
use crate::term_window::TermWindow;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("batticon: {err:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let source = SysfsBattery::open().context("failed to open the battery")?;
    let icons =
        IconTable::bundled(cli.hidpi).context("failed to build the icon set")?;
    let mut window = TermWindow::open(cli.display.as_deref())
        .context("failed to open the display terminal")?;
    let mut exit = ExitPipe::install(&[SIGTERM, SIGINT, SIGHUP])
        .context("failed to install the exit handlers")?;

    let options = EngineOptions {
        poll_interval: Duration::from_secs(cli.interval),
        hidpi: cli.hidpi,
    };
    let mut engine = StatusEngine::new(source, icons, options);

    info!("polling the battery every {}s", cli.interval);

    EventLoop::new()?.run(&mut engine, &mut window, &mut exit)?;

    Ok(())
}
