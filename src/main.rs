//! heartloop CLI binary entry point.

use heartloop::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Chat(args) => commands::handle_chat(args, cli.config.as_deref()).await,
        Commands::Memory(args) => commands::handle_memory(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
