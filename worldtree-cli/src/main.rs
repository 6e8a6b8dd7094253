mod cli;
mod commands;
mod keymap;
mod log_capture;
mod project;
mod script;
mod state;
mod ui;

use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let explicit = cli.config.as_deref();

    match cli.command {
        Command::Simulate {
            script,
            format,
            every,
        } => {
            log_capture::install_stderr()?;
            let loaded = project::load_config(explicit)?;
            commands::simulate_cmd::run(&script, format, every, loaded)
        }
        Command::Config { defaults } => {
            log_capture::install_stderr()?;
            commands::config_cmd::run(explicit, defaults)
        }
        Command::Preview => {
            let loaded = project::load_config(explicit)?;
            commands::preview_cmd::run(loaded).await
        }
    }
}
