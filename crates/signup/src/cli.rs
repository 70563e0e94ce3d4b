use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "signup", version, about = "Sign-up form validation and gating driver")]
pub struct Cli {
    /// Extra configuration file, layered over the config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Drive a form instance from a script (stdin when no file is given),
    /// printing a JSON snapshot after every command
    Run {
        #[arg(long)]
        script: Option<PathBuf>,
        /// Only print the final snapshot
        #[arg(long)]
        quiet: bool,
    },
    /// Print the field schema as JSON
    Schema {
        /// Only this field (camelCase name, e.g. `confirmPassword`)
        #[arg(long)]
        field: Option<String>,
    },
}
