//! mealdeck admin - main entry point

use anyhow::Result;
use clap::Parser;

use mealdeck_admin::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    mealdeck_admin::run(args).await
}
