use std::fs::{self, File};
use std::process::ExitCode;

use clap::Parser;
use hncli::cli::{self, Cli};
use hncli::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

fn main() -> ExitCode {
    let args = Cli::parse();
    dotenv::dotenv().ok();

    // File logger at ~/.hncli/hncli.log; stdout belongs to the commands
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Some(dir) = config::data_dir() {
        if fs::create_dir_all(&dir).is_ok() {
            if let Ok(log_file) = File::create(dir.join("hncli.log")) {
                let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
            }
        }
    }

    log::info!("hn starting up with {:?}", args.command);

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("hn: {e}");
            ExitCode::FAILURE
        }
    }
}
