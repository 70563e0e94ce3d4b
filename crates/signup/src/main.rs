use std::fs;
use std::io::{self, Read};

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use signup::cli::{Cli, Cmd};
use signup::config::{self, Config};
use signup::driver;
use signup::form::FormSchema;
use signup::{ModalSlot, SignUpForm, Verifiers};

#[tokio::main]
async fn main() -> Result<()> {
    signup::errors::init()?;
    let args = Cli::parse();

    config::ensure_data_and_config_dirs_exist()?;
    let cfg = Config::new(args.config.as_deref())?;
    let _log_guard = signup::logging::init(&cfg.log, &cfg.config.data_dir)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.cmd {
        Cmd::Schema { field } => {
            driver::print_schema(&FormSchema::sign_up(), field.as_deref(), &mut out)?
        }
        Cmd::Run { script, quiet } => {
            let text = match &script {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let commands = driver::parse_script(&text)?;
            info!(commands = commands.len(), "running script");

            let mut form = SignUpForm::new(Verifiers::from_config(&cfg.verification), ModalSlot::new());
            driver::execute(&mut form, commands, &mut out, quiet).await?;
        }
    }
    Ok(())
}
