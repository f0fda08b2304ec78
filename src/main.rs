use clap::Parser;
use color_eyre::Result;
use visit_beacon::{
    init_errors,
    init_logging,
    run,
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    init_logging()?;
    let config = Config::new(Args::parse())?;
    run(config).await
}
