// FILE: crates/cli/src/commands.rs

use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use console::style;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shelfwise_catalog::generator::generate;
use shelfwise_catalog::{
    BookTree, Catalog, CatalogError, CatalogFile, CatalogStore, InsertOutcome, Listing, LoadReport,
    LoanOutcome, ReturnOutcome, SortedList,
};
use shelfwise_config::{Config, ConfigManager};
use shelfwise_core::{AppError, Book, BookId, TextBounds, Validator};
use std::path::PathBuf;

/// Shape queries that only some engines can answer
pub trait EngineShape: CatalogStore + Sized {
    /// Books in breadth-first order, if the engine is a tree
    fn levels(catalog: &Catalog<Self>) -> Option<Vec<&Book>>;

    fn height(catalog: &Catalog<Self>) -> Option<usize>;

    /// Returns false if the engine has nothing to rebalance
    fn rebalance(catalog: &mut Catalog<Self>) -> bool;
}

impl EngineShape for BookTree {
    fn levels(catalog: &Catalog<Self>) -> Option<Vec<&Book>> {
        Some(catalog.levels().collect())
    }

    fn height(catalog: &Catalog<Self>) -> Option<usize> {
        Some(catalog.height())
    }

    fn rebalance(catalog: &mut Catalog<Self>) -> bool {
        catalog.rebalance();
        true
    }
}

impl EngineShape for SortedList {
    fn levels(_: &Catalog<Self>) -> Option<Vec<&Book>> {
        None
    }

    fn height(_: &Catalog<Self>) -> Option<usize> {
        None
    }

    fn rebalance(_: &mut Catalog<Self>) -> bool {
        false
    }
}

/// Loads the data file, runs one catalog command, and saves if it changed anything
///
/// An invalid config is refused before the data file is read or written.
pub fn run<S: EngineShape>(config: &Config, name: &str, matches: &ArgMatches) -> Result<()> {
    config.ensure_valid().with_context(|| {
        format!(
            "Refusing to use {} with this config",
            config.catalog.data_file.display()
        )
    })?;

    let bounds = config.catalog.text_bounds();
    let file = CatalogFile::new(&config.catalog.data_file).with_bounds(bounds);

    if name == "generate" {
        return generate_catalog::<S>(&file, matches);
    }

    let (mut catalog, report) = file
        .load_or_empty::<S>()
        .with_context(|| format!("Failed to load {}", file.path().display()))?;
    print_load_report(&report);

    if execute(&mut catalog, name, matches, &bounds)? {
        file.save(&catalog)
            .with_context(|| format!("Failed to save {}", file.path().display()))?;
    }

    Ok(())
}

/// Runs a command against an in-memory catalog. Returns true if it mutated.
pub fn execute<S: EngineShape>(
    catalog: &mut Catalog<S>,
    name: &str,
    matches: &ArgMatches,
    bounds: &TextBounds,
) -> Result<bool> {
    match name {
        "add" => add_book(catalog, matches, bounds),
        "remove" => remove_book(catalog, matches),
        "find" => find_book(catalog, matches).map(|_| false),
        "list" => {
            list_books(catalog);
            Ok(false)
        }
        "levels" => show_levels(catalog).map(|_| false),
        "loan" => loan_book(catalog, matches),
        "return" => return_book(catalog, matches),
        "stats" => {
            show_stats(catalog);
            Ok(false)
        }
        "rebalance" => rebalance(catalog),
        "export" => export_catalog(catalog, matches).map(|_| false),
        other => bail!("Unknown command: {}", other),
    }
}

fn book_id(matches: &ArgMatches) -> Result<BookId> {
    matches
        .get_one::<i32>("id")
        .map(|&id| BookId::new(id))
        .ok_or_else(|| anyhow!("Book ID is required"))
}

fn text_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("{} is required", name))
}

/// Add a new book
pub fn add_book<S: CatalogStore>(
    catalog: &mut Catalog<S>,
    matches: &ArgMatches,
    bounds: &TextBounds,
) -> Result<bool> {
    let id = book_id(matches)?;
    let title = bounds.truncate_title(text_arg(matches, "title")?);
    let author = bounds.truncate_author(text_arg(matches, "author")?);

    let book = Book::new(id, title, author);
    if let Err(errors) = book.validate() {
        return Err(AppError::InvalidArgument {
            argument: "book".to_string(),
            reason: errors.join("; "),
        }
        .into());
    }

    match catalog.insert(book.id, book.title, book.author) {
        InsertOutcome::Inserted => {
            println!("{} Book {} added", style("✓").green().bold(), id);
            Ok(true)
        }
        InsertOutcome::DuplicateId => {
            println!(
                "{} A book with ID {} already exists; nothing changed",
                style("!").yellow().bold(),
                id
            );
            Ok(false)
        }
    }
}

/// Remove a book
pub fn remove_book<S: CatalogStore>(catalog: &mut Catalog<S>, matches: &ArgMatches) -> Result<bool> {
    let id = book_id(matches)?;

    match catalog.remove(id) {
        Some(book) => {
            println!("{} Book removed: {}", style("✓").green().bold(), book.title);
            Ok(true)
        }
        None => {
            print_not_found(id);
            Ok(false)
        }
    }
}

/// Show a single book
pub fn find_book<S: CatalogStore>(catalog: &Catalog<S>, matches: &ArgMatches) -> Result<()> {
    let id = book_id(matches)?;

    match catalog.find(id) {
        Some(book) => {
            println!("\n{}", style("Book Information").bold().cyan());
            println!("{}", "=".repeat(80));
            println!("ID: {}", book.id);
            println!("Title: {}", style(&book.title).bold());
            println!("Author: {}", book.author);
            println!("Status: {}", availability(book));
        }
        None => print_not_found(id),
    }
    Ok(())
}

/// List every book in id order
pub fn list_books<S: CatalogStore>(catalog: &Catalog<S>) {
    match catalog.list_all() {
        Listing::Empty => {
            println!("No books in catalog. Use the 'add' command to add one.");
        }
        Listing::Books(books) => {
            println!("\n{} Books in Catalog", style(books.len()).bold().cyan());
            println!("{}", "=".repeat(80));
            for book in books {
                print_book_row(book);
            }
        }
    }
}

/// List books breadth-first, root first
pub fn show_levels<S: EngineShape>(catalog: &Catalog<S>) -> Result<()> {
    let books = S::levels(catalog).ok_or_else(|| {
        anyhow!(
            "The {} engine has no levels; run with --engine tree",
            catalog.engine()
        )
    })?;

    if books.is_empty() {
        println!("No books in catalog.");
        return Ok(());
    }

    println!(
        "\n{} Books in Level Order (height {})",
        style(books.len()).bold().cyan(),
        S::height(catalog).unwrap_or_default()
    );
    println!("{}", "=".repeat(80));
    for book in books {
        print_book_row(book);
    }
    Ok(())
}

/// Lend a book out
pub fn loan_book<S: CatalogStore>(catalog: &mut Catalog<S>, matches: &ArgMatches) -> Result<bool> {
    let id = book_id(matches)?;

    match catalog.loan(id) {
        LoanOutcome::Loaned => {
            println!("{} Book {} is now on loan", style("✓").green().bold(), id);
            Ok(true)
        }
        LoanOutcome::Unavailable => {
            println!("{} Book {} is already on loan", style("!").yellow().bold(), id);
            Ok(false)
        }
        LoanOutcome::NotFound => {
            print_not_found(id);
            Ok(false)
        }
    }
}

/// Bring a book back
pub fn return_book<S: CatalogStore>(
    catalog: &mut Catalog<S>,
    matches: &ArgMatches,
) -> Result<bool> {
    let id = book_id(matches)?;

    match catalog.return_book(id) {
        ReturnOutcome::Returned => {
            println!("{} Book {} returned", style("✓").green().bold(), id);
            Ok(true)
        }
        ReturnOutcome::AlreadyAvailable => {
            println!("{} Book {} was not on loan", style("!").yellow().bold(), id);
            Ok(false)
        }
        ReturnOutcome::NotFound => {
            print_not_found(id);
            Ok(false)
        }
    }
}

/// Show catalog statistics
pub fn show_stats<S: EngineShape>(catalog: &Catalog<S>) {
    let stats = catalog.stats();

    println!("\n{}", style("Catalog Statistics").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Engine: {}", catalog.engine());
    println!("Total Books: {}", style(stats.total).bold());
    println!("Available: {}", style(stats.available).green());
    println!("On Loan: {}", style(stats.on_loan).yellow());
    if let Some(height) = S::height(catalog) {
        println!(
            "Tree Height: {} (minimum {})",
            height,
            min_height(stats.total)
        );
    }
}

/// Rebuild the tree into a balanced shape
pub fn rebalance<S: EngineShape>(catalog: &mut Catalog<S>) -> Result<bool> {
    let before = S::height(catalog);

    if !S::rebalance(catalog) {
        bail!(
            "The {} engine cannot be rebalanced; run with --engine tree",
            catalog.engine()
        );
    }

    println!(
        "{} Rebalanced {} books: height {} -> {}",
        style("✓").green().bold(),
        catalog.len(),
        before.unwrap_or_default(),
        S::height(catalog).unwrap_or_default()
    );
    Ok(true)
}

/// Export the catalog as JSON
pub fn export_catalog<S: CatalogStore>(catalog: &Catalog<S>, matches: &ArgMatches) -> Result<()> {
    let books: Vec<&Book> = catalog.iter().collect();
    let json = serde_json::to_string_pretty(&books).context("Failed to serialize to JSON")?;

    match matches.get_one::<PathBuf>("output") {
        Some(output) => {
            std::fs::write(output, json).context("Failed to write export file")?;
            println!(
                "{} Exported {} books to {}",
                style("✓").green().bold(),
                books.len(),
                output.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Replace the data file with generated books
pub fn generate_catalog<S: CatalogStore>(file: &CatalogFile, matches: &ArgMatches) -> Result<()> {
    let count = matches
        .get_one::<usize>("count")
        .copied()
        .ok_or_else(|| anyhow!("Count is required"))?;

    if file.exists() && !matches.get_flag("force") {
        bail!(
            "{} already exists; pass --force to replace it",
            file.path().display()
        );
    }

    let mut rng = match matches.get_one::<u64>("seed") {
        Some(&seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let catalog: Catalog<S> = generate(count, &mut rng).context("Failed to generate books")?;
    let written = file
        .save(&catalog)
        .with_context(|| format!("Failed to save {}", file.path().display()))?;

    println!(
        "{} Generated {} books into {}",
        style("✓").green().bold(),
        written,
        file.path().display()
    );
    Ok(())
}

/// `config show|init|path`
pub fn config_command(manager: &ConfigManager, config: &Config, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => {
            let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
            println!("# {}", manager.config_path().display());
            print!("{}", toml);
            if let Err(errors) = config.validate() {
                for error in errors {
                    eprintln!("{} {}", style("!").yellow().bold(), error);
                }
            }
        }
        Some(("init", _)) => {
            if manager.initialize().context("Failed to write config file")? {
                println!(
                    "{} Created {}",
                    style("✓").green().bold(),
                    manager.config_path().display()
                );
            } else {
                println!(
                    "Config file already exists at {}",
                    manager.config_path().display()
                );
            }
        }
        Some(("path", _)) => println!("{}", manager.config_path().display()),
        _ => bail!("Unknown config command"),
    }
    Ok(())
}

/// A plain-language note for a failed command, when the cause is a known
/// catalog error
pub fn failure_hint(err: &anyhow::Error) -> Option<String> {
    let app = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<CatalogError>()
            .and_then(CatalogError::app_error)
            .or_else(|| cause.downcast_ref::<AppError>())
    })?;

    let mut hint = app.user_message();
    if app.is_recoverable() {
        hint.push_str(" Retrying may help.");
    }
    Some(hint)
}

fn print_load_report(report: &LoadReport) {
    for malformed in &report.malformed {
        eprintln!(
            "{} Skipped line {}: {}",
            style("!").yellow().bold(),
            malformed.line,
            malformed.reason
        );
    }
    for id in &report.duplicates {
        eprintln!(
            "{} Skipped duplicate book ID {}",
            style("!").yellow().bold(),
            id
        );
    }
}

fn print_not_found(id: BookId) {
    println!("{} No book with ID {}", style("!").yellow().bold(), id);
}

fn print_book_row(book: &Book) {
    println!(
        "{:>8}  {:<36}  {:<24}  {}",
        book.id,
        truncate(&book.title, 36),
        truncate(&book.author, 24),
        availability(book)
    );
}

fn availability(book: &Book) -> String {
    if book.available {
        style("available").green().to_string()
    } else {
        style("on loan").yellow().to_string()
    }
}

/// Height of a perfectly balanced tree holding `count` books
fn min_height(count: usize) -> usize {
    (usize::BITS - count.leading_zeros()) as usize
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}
