use clap::Parser;
use log::info;

use sift::api::SiftApi;
use sift::conf::Config;
use sift::core::{CliArgs, setup_logging};
use sift::service::SiftService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    let config = Config::load(args.config.as_deref())?;
    info!(
        "Sift started, storing uploads in {}",
        config.storage.upload_dir.display()
    );

    let addr = config.server.addr();
    let api = SiftApi::new(SiftService::new(config));
    api.serve(&addr).await?;
    Ok(())
}
