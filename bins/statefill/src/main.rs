use clap::Parser;
use eyre::Result;
use statefill::{cmd::Cli, init_tracing};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_level)?;
    cli.command.run()?;

    Ok(())
}
