mod cli;

use clap::Parser;
use cli::{
    config_path, handle_add, handle_batch, handle_config, handle_hash, handle_link, handle_normalize,
    handle_recent, handle_verify, init_logging, load_config, Cli, Commands, FAIL,
};
use docverify::{ClientConfig, DocverifyResult};

#[tokio::main]
async fn main() -> DocverifyResult<()> {
    let cli = Cli::parse();
    let config_path = config_path(&cli);

    let config = match load_config(&cli, &config_path) {
        Ok(config) => config,
        // Still allow inspecting and rewriting a broken file.
        Err(e) if matches!(cli.command, Commands::Config { .. }) => {
            eprintln!("{} {}", FAIL, e);
            ClientConfig::default()
        }
        Err(e) => return Err(e),
    };

    init_logging(&cli, &config.logging);

    match cli.command {
        Commands::Hash { file } => {
            handle_hash(&file, &cli.format)?;
        }
        Commands::Normalize { inputs } => {
            handle_normalize(&inputs, &cli.format)?;
        }
        Commands::Add { file, identity, label } => {
            handle_add(&config, &file, identity, label, &cli.format).await?;
        }
        Commands::Verify { raw, file, link } => {
            handle_verify(&config, raw, file, link, &cli.format).await?;
        }
        Commands::Batch { manual, sheet, concurrency } => {
            handle_batch(&config, manual, sheet, concurrency, &cli.format).await?;
        }
        Commands::Recent { clear } => {
            handle_recent(&config, clear, &cli.format)?;
        }
        Commands::Link { raw, base } => {
            handle_link(&raw, base.as_deref(), &config, &cli.format)?;
        }
        Commands::Config { action } => {
            handle_config(&config_path, &config, action, &cli.format)?;
        }
    }

    Ok(())
}
