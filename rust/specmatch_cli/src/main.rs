mod cli;
mod config;
mod error;
mod io;
mod processing;

use clap::Parser;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

use crate::cli::{
    Args,
    Commands,
};
use crate::config::Mode;
use crate::error::CliError;
use crate::processing::{
    main_search,
    main_write_template,
};

// mimalloc is much faster than the default allocator on windows
#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), CliError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    if let Err(e) = set_global_default(subscriber) {
        eprintln!("Unable to set up logging: {}", e);
    }

    let args = Args::parse();
    match args.command {
        Some(Commands::Lcms(args)) => main_search(Mode::Lcms, args)?,
        Some(Commands::Gcms(args)) => main_search(Mode::Gcms, args)?,
        Some(Commands::WriteTemplate(args)) => main_write_template(args)?,
        None => {
            println!("No command provided");
        }
    }
    Ok(())
}
