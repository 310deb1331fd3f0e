use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::{AnyStore, Backend, Engine, Seed, StorageConfig, ZeroGroups, codec, summarize};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "mercado_admin")]
#[command(about = "Admin utilities for Mercado shopping lists")]
struct Cli {
    /// Storage backend (also read from `MERCADO_STORAGE__BACKEND`).
    #[arg(long)]
    backend: Option<Backend>,
    /// Directory of the csv backend.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Spreadsheet id of the sheets backend. The access token is only read
    /// from `MERCADO_STORAGE__ACCESS_TOKEN`.
    #[arg(long)]
    spreadsheet_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every list, oldest first.
    Lists,
    /// Print the items of a list.
    Show(ListArgs),
    /// Create a list, empty or seeded from the template or another list.
    Create(CreateArgs),
    /// Print what was spent on a list, per category.
    Totals(ListArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    name: String,
}

#[derive(Args, Debug)]
struct CreateArgs {
    name: String,
    /// Seed the list with the default template.
    #[arg(long, conflicts_with = "copy_of")]
    template: bool,
    /// Seed the list with the items of another list.
    #[arg(long)]
    copy_of: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    storage: StorageConfig,
}

fn storage_config(cli: &Cli) -> Result<StorageConfig, Box<dyn Error + Send + Sync>> {
    let settings: Settings = config::Config::builder()
        .add_source(
            config::Environment::with_prefix("MERCADO")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;
    let mut storage = settings.storage;
    if let Some(backend) = cli.backend {
        storage.backend = backend;
    }
    if let Some(data_dir) = &cli.data_dir {
        storage.data_dir = data_dir.clone();
    }
    if let Some(spreadsheet_id) = &cli.spreadsheet_id {
        storage.spreadsheet_id = spreadsheet_id.clone();
    }
    Ok(storage)
}

fn price(amount: f64) -> String {
    format!("${amount:.2}")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = storage_config(&cli)?;
    let engine = Engine::builder().store(AnyStore::open(&storage)?).build()?;

    match cli.command {
        Command::Lists => {
            for name in engine.lists().await? {
                println!("{name}");
            }
        }
        Command::Show(ListArgs { name }) => {
            for item in engine.list_items(&name).await? {
                let check = if item.is_checked { "x" } else { " " };
                println!(
                    "[{check}] {:<24} {:>6} {:<12} {:<14} {}",
                    item.name,
                    codec::format_decimal(item.quantity),
                    item.unit.to_string(),
                    item.category.to_string(),
                    price(item.price),
                );
            }
        }
        Command::Create(args) => {
            let seed = match (args.template, args.copy_of) {
                (_, Some(source)) => Seed::CopyOf(source),
                (true, None) => Seed::DefaultTemplate,
                (false, None) => Seed::Empty,
            };
            let outcome = engine.new_list(&args.name, seed).await?;
            println!("created list: {}", outcome.name);
            if let Some(evicted) = outcome.evicted {
                println!("deleted oldest list: {evicted}");
            }
            if let Some(err) = outcome.eviction_error {
                eprintln!("could not delete the oldest list: {err}");
            }
        }
        Command::Totals(ListArgs { name }) => {
            let items = engine.list_items(&name).await?;
            match summarize(&items, ZeroGroups::Keep) {
                Some(totals) => {
                    for group in &totals.by_category {
                        println!(
                            "{:<14} {:>3} {:>12}",
                            group.category.to_string(),
                            group.items,
                            price(group.total)
                        );
                    }
                    println!("{:<18} {:>12}", "total", price(totals.grand_total));
                }
                None => println!("nothing checked on {name}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn every_subcommand_has_help() {
        let cli = Cli::command();
        cli.clone().debug_assert();
        for sub in cli.get_subcommands() {
            assert!(sub.get_about().is_some(), "{} has no help", sub.get_name());
        }
    }
}
