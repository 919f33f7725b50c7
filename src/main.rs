use clap::Parser;
use init_data_mock::{action, config, logger};

fn main() -> anyhow::Result<()> {
    let args = action::AppArgs::parse();

    let app_config = config::AppConfig::load()?;
    logger::setup_simple_logger(app_config.log_level)?;

    println!("{}", args.run(&app_config)?);
    Ok(())
}
