use clap::Parser;
use imgw_collector::cli::{init_logging, run, Cli};
use imgw_collector::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli).await
}
