//! scanlogin CLI binary entry point.

use clap::Parser;
use scanlogin::cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let result = match cli.command {
        Commands::Login(args) => match scanlogin::cli::login::load_config(cli.config.as_deref()) {
            Ok(config) => scanlogin::cli::login::handle_login(config, args).await,
            Err(e) => Err(e.into()),
        },
        Commands::Apps => {
            scanlogin::cli::login::handle_apps();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
