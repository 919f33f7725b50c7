use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Logs to stderr so stdout only carries the generated fixture
pub fn setup_simple_logger(level: LevelFilter) -> anyhow::Result<()> {
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("init_data_mock")
        .build();

    Ok(TermLogger::init(
        level,
        logger_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?)
}
