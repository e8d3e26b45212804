use anyhow::Result;
use clap::Parser;

mod run;

#[derive(Parser)]
#[command(name = "tso")]
#[command(
    about = "Sorts decorator arrays, DTO members and template attributes into a canonical order",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(flatten)]
    run: run::Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_filter));

    if !run::handler(&cli.run).await? {
        std::process::exit(1);
    }

    Ok(())
}
