use crate::commands::{Cli, Commands};
use crate::convert::{convert_cue, convert_wav};
use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

mod capture;
mod commands;
mod convert;
mod cue;
mod disc;
mod error;
mod wav;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let logger = env_logger::builder()
        .filter_level(default_level)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    match cli.command {
        Commands::Cue(cmd) => convert_cue(cmd, pb.clone()).await?,
        Commands::Wav(cmd) => convert_wav(cmd, pb.clone()).await?,
    }

    Ok(())
}
