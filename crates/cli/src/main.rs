use clap::Parser;
use hours::pipeline::{self, RunOptions};
use hours::{Credentials, Result};

mod cli;
mod logging;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("hours: {err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let credentials = Credentials::load(&cli.config)?;

    let options = RunOptions {
        headless: !cli.headed && credentials.headless.unwrap_or(true),
        wait: credentials.wait_config(),
    };

    pipeline::run(&credentials, &options).await
}
