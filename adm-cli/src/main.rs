//! ADM CLI - synthetic marketing analytics from the command line.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "adm-cli",
    version,
    about = "Synthetic marketing analytics dashboard toolkit"
)]
struct Cli {
    #[command(flatten)]
    globals: adm_cmd::GlobalArgs,

    #[command(subcommand)]
    command: adm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    adm_cmd::run(cli.command, cli.globals).await
}
