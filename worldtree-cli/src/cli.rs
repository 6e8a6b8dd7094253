use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "wtcli",
    about = "World Tree free camera tools",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Camera config file (defaults to .worldtree/camera.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a scripted input session and print the camera trajectory
    Simulate {
        /// Path to the .toml input script
        script: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Print every Nth frame
        #[arg(long, default_value_t = 1)]
        every: u32,
    },
    /// Fly the camera interactively in the terminal
    Preview,
    /// Print the effective camera config as TOML
    Config {
        /// Ignore config files and print the built-in defaults
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
