// Library entry: module exports and the top-level run
pub mod cli;
pub mod commands;
pub mod config;
pub mod repository;
pub mod ssh;
pub mod transfer;
pub mod utils;

use anyhow::{Context, Result};
use cli::{Cli, Invocation, USAGE};
use commands::App;
use std::io::Write;

/// Runs one invocation and returns the process exit status.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<i32> {
    let command = match cli.invocation()? {
        Invocation::Run(command) => command,
        Invocation::Usage(status) => {
            writeln!(out, "{}", USAGE)?;
            return Ok(status);
        }
    };

    let work_dir = std::env::current_dir().context("Failed to determine the current directory")?;
    let app = App::new(&cli.config, work_dir);
    app.execute(&command, out)?;
    Ok(0)
}
