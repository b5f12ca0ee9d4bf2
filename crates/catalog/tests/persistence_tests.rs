// FILE: crates/catalog/tests/persistence_tests.rs
//! Save/load round trips through real files

use shelfwise_catalog::persistence::{load, save};
use shelfwise_catalog::{
    BookTree, Catalog, CatalogError, CatalogFile, CatalogStore, Listing, SortedList,
};
use shelfwise_core::{AppError, Book, BookId, TextBounds};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

type Result<T> = std::result::Result<T, CatalogError>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn listed(catalog: &Catalog<impl CatalogStore>) -> Vec<Book> {
    match catalog.list_all() {
        Listing::Books(books) => books.into_iter().cloned().collect(),
        Listing::Empty => Vec::new(),
    }
}

fn ascending_catalog(n: i32) -> Catalog {
    let mut catalog = Catalog::new();
    for id in 1..=n {
        catalog.insert(BookId::new(id), format!("Title {}", id), format!("Author {}", id));
    }
    catalog
}

#[test]
fn test_round_trip_preserves_every_field() -> Result<()> {
    init_logging();
    let dir = TempDir::new()?;
    let file = CatalogFile::new(dir.path().join("books.dat"));

    let mut original: Catalog = Catalog::new();
    original.insert(BookId::new(10), "The Left Hand of Darkness", "Ursula K. Le Guin");
    original.insert(BookId::new(3), "Solaris", "Stanisław Lem");
    original.insert(BookId::new(42), "Hitchhiker's Guide", "Douglas Adams");
    original.insert(BookId::new(-1), "Negative Space", "Nobody");
    original.loan(BookId::new(3));

    assert_eq!(file.save(&original)?, 4);

    let mut reloaded: Catalog = Catalog::new();
    let report = file.load_into(&mut reloaded)?;

    assert_eq!(report.loaded, 4);
    assert!(report.is_clean());
    assert_eq!(listed(&reloaded), listed(&original));
    Ok(())
}

#[test]
fn test_round_trip_with_delimiters_in_text() -> Result<()> {
    let dir = TempDir::new()?;
    let file = CatalogFile::new(dir.path().join("books.dat"));

    let mut original: Catalog = Catalog::new();
    original.insert(BookId::new(1), "Either|Or", "Søren \\ Kierkegaard");
    original.insert(BookId::new(2), "Line\nBreak", "A|B|C");

    file.save(&original)?;
    let (reloaded, report) = file.load_or_empty::<BookTree>()?;

    assert!(report.is_clean());
    assert_eq!(listed(&reloaded), listed(&original));
    Ok(())
}

#[test]
fn test_seven_ascending_ids_reload_balanced() -> Result<()> {
    let dir = TempDir::new()?;
    let file = CatalogFile::new(dir.path().join("books.dat"));

    let original = ascending_catalog(7);
    assert_eq!(original.height(), 7);

    file.save(&original)?;
    let (reloaded, _) = file.load_or_empty::<BookTree>()?;

    assert!(reloaded.height() <= 3);
    let ids: Vec<i32> = reloaded.iter().map(|b| b.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    Ok(())
}

#[test]
fn test_ten_thousand_ascending_ids_reload_logarithmic() -> Result<()> {
    let dir = TempDir::new()?;
    let file = CatalogFile::new(dir.path().join("books.dat"));

    let original = ascending_catalog(10_000);
    assert_eq!(original.height(), 10_000);

    file.save(&original)?;
    let (reloaded, report) = file.load_or_empty::<BookTree>()?;

    assert_eq!(report.loaded, 10_000);
    assert_eq!(reloaded.height(), 14);
    assert_eq!(reloaded.store().count_nodes(), 10_000);
    Ok(())
}

#[test]
fn test_saved_file_is_in_balanced_order() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("books.dat");
    let file = CatalogFile::new(&path);

    file.save(&ascending_catalog(3))?;

    let contents = fs::read_to_string(&path)?;
    assert_eq!(
        contents,
        "2|Title 2|Author 2|1\n1|Title 1|Author 1|1\n3|Title 3|Author 3|1\n"
    );
    Ok(())
}

#[test]
fn test_missing_file_is_resource_error_and_catalog_unchanged() {
    let dir = TempDir::new().unwrap();
    let file = CatalogFile::new(dir.path().join("nope.dat"));

    let mut catalog = ascending_catalog(2);
    let result = file.load_into(&mut catalog);

    assert!(matches!(
        result,
        Err(CatalogError::App(AppError::FileNotFound { .. }))
    ));
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_load_or_empty_without_file() -> Result<()> {
    let dir = TempDir::new()?;
    let file = CatalogFile::new(dir.path().join("fresh.dat"));

    let (catalog, report) = file.load_or_empty::<SortedList>()?;

    assert!(catalog.is_empty());
    assert_eq!(report.loaded, 0);
    Ok(())
}

#[test]
fn test_save_into_missing_directory_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let file = CatalogFile::new(dir.path().join("missing").join("books.dat"));

    let catalog = ascending_catalog(3);
    let result = file.save(&catalog);

    assert!(matches!(result, Err(CatalogError::App(_))));
    assert_eq!(catalog.len(), 3);
}

#[cfg(unix)]
#[test]
fn test_save_keeps_existing_file_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new()?;
    let path = dir.path().join("books.dat");
    let file = CatalogFile::new(&path);

    file.save(&ascending_catalog(2))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

    file.save(&ascending_catalog(5))?;

    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o644);
    let (reloaded, _) = file.load_or_empty::<BookTree>()?;
    assert_eq!(reloaded.len(), 5);
    Ok(())
}

#[test]
fn test_original_tool_file_loads() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("livros.dat");
    fs::write(
        &path,
        "4|Livro 17|Autor 3|1\n2|Livro 9|Autor 88|0\n6|Livro 500|Autor 1|1\n",
    )?;

    let file = CatalogFile::new(&path).with_bounds(TextBounds::default());
    let (catalog, report) = file.load_or_empty::<BookTree>()?;

    assert_eq!(report.loaded, 3);
    assert_eq!(catalog.levels().next().map(|b| b.id), Some(BookId::new(4)));
    assert!(!catalog.find(BookId::new(2)).unwrap().available);
    Ok(())
}

#[test]
fn test_tree_file_loads_into_list_engine() -> Result<()> {
    let mut out = Vec::new();
    save(&ascending_catalog(50), &mut out)?;

    let mut list: Catalog<SortedList> = Catalog::new();
    let report = load(&mut list, Cursor::new(out), &TextBounds::default())?;

    assert_eq!(report.loaded, 50);
    assert_eq!(listed(&list), listed(&ascending_catalog(50)));
    Ok(())
}

#[test]
fn test_growth_after_load_can_skew_until_next_save() -> Result<()> {
    let mut out = Vec::new();
    save(&ascending_catalog(7), &mut out)?;

    let mut catalog: Catalog = Catalog::new();
    load(&mut catalog, Cursor::new(out), &TextBounds::default())?;
    for id in 8..=20 {
        catalog.insert(BookId::new(id), "T", "A");
    }
    assert!(catalog.height() > 5);

    let mut out = Vec::new();
    save(&catalog, &mut out)?;
    let mut reloaded: Catalog = Catalog::new();
    load(&mut reloaded, Cursor::new(out), &TextBounds::default())?;
    assert_eq!(reloaded.height(), 5);
    Ok(())
}
