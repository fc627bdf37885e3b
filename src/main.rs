use std::{env, fs::File, path::PathBuf};

use anyhow::Result;
use env_logger::{Env, Target};
use log::LevelFilter;

use spectroplay::config::{default_config_path, load_config, AppConfig};

/// The terminal belongs to the UI, so log lines go to a file.
fn init_logging() {
    let log_path = env::temp_dir().join("spectroplay.log");
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    match File::create(&log_path) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();

    let config = match default_config_path() {
        Some(path) => load_config(&path),
        None => AppConfig::default(),
    };
    let initial = env::args_os().nth(1).map(PathBuf::from);

    log::info!("starting spectroplay");
    spectroplay::ui::run(config, initial)
}
