// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::style;
use shelfwise_catalog::{BookTree, SortedList};
use shelfwise_config::{Config, ConfigManager, EngineKind};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

mod commands;

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_name("BOOK_ID")
        .help("Book ID (integer)")
        .value_parser(value_parser!(i32))
        .allow_negative_numbers(true)
}

fn build_cli() -> Command {
    Command::new("shelfwise")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book catalog with loan tracking, kept in a flat data file")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .help("Catalog data file (overrides the configured one)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("engine")
                .short('e')
                .long("engine")
                .value_name("ENGINE")
                .help("Storage engine")
                .value_parser(["tree", "list"])
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Print how long the command took")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new book")
                .arg(id_arg())
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("author").required(true).value_name("AUTHOR").help("Book author")),
        )
        .subcommand(Command::new("remove").about("Remove a book").arg(id_arg()))
        .subcommand(Command::new("find").about("Show a single book").arg(id_arg()))
        .subcommand(Command::new("list").about("List all books in id order"))
        .subcommand(Command::new("levels").about("List books level by level (tree engine)"))
        .subcommand(Command::new("loan").about("Lend a book out").arg(id_arg()))
        .subcommand(Command::new("return").about("Bring a loaned book back").arg(id_arg()))
        .subcommand(Command::new("stats").about("Show catalog statistics"))
        .subcommand(Command::new("rebalance").about("Rebuild the tree into a balanced shape"))
        .subcommand(
            Command::new("generate")
                .about("Replace the catalog with generated test data")
                .arg(
                    Arg::new("count")
                        .required(true)
                        .value_name("COUNT")
                        .help("Number of books to generate")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .value_name("N")
                        .help("Seed for reproducible output")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Overwrite an existing data file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export the catalog as JSON")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output file path (stdout if omitted)")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or create the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("init").about("Write a default config file if none exists"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}

/// Applies command-line flags on top of the loaded configuration
fn apply_flags(config: &mut Config, matches: &ArgMatches) -> Result<()> {
    if let Some(path) = matches.get_one::<PathBuf>("file") {
        config.catalog.data_file = path.clone();
    }
    if let Some(engine) = matches.get_one::<String>("engine") {
        config.catalog.engine = engine
            .parse::<EngineKind>()
            .map_err(anyhow::Error::msg)?;
    }
    if matches.get_flag("timing") {
        config.app.show_timing = true;
    }
    Ok(())
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), err);
            if let Some(hint) = commands::failure_hint(&err) {
                eprintln!("{}", style(hint).dim());
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let matches = build_cli().get_matches();

    let manager = match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => ConfigManager::with_directory(dir),
        None => ConfigManager::new().context("Failed to locate config directory")?,
    };

    // The configured level is the default filter, so config is read first.
    // RUST_LOG still takes precedence.
    let loaded = manager.load_with_env_overrides();
    let level = loaded
        .as_ref()
        .map(|config| config.app.log_level)
        .unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_env(env_logger::Env::default())
        .init();

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };
    apply_flags(&mut config, &matches)?;

    let Some((name, sub_matches)) = matches.subcommand() else {
        build_cli().print_help()?;
        return Ok(());
    };

    if name == "config" {
        return commands::config_command(&manager, &config, sub_matches);
    }

    let started = Instant::now();
    match config.catalog.engine {
        EngineKind::Tree => commands::run::<BookTree>(&config, name, sub_matches)?,
        EngineKind::List => commands::run::<SortedList>(&config, name, sub_matches)?,
    }

    if config.app.show_timing {
        println!(
            "{} {:.3?} ({} engine)",
            style("Elapsed:").dim(),
            started.elapsed(),
            config.catalog.engine
        );
    }

    Ok(())
}
