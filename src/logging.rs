use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Terminal logger at the configured level; unknown names fall back to info.
pub fn init_logger(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .build();
    if let Err(e) = TermLogger::init(filter, config, TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Failed to initialise logger: {}", e);
    }
}
