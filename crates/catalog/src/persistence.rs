//! Catalog data file persistence
//!
//! Saving writes one line per book in midpoint-first order (see
//! `snapshot::balanced_order`), so reading the file back through ordinary
//! insertion rebuilds a tree of minimal height no matter how skewed the saved
//! tree was.
//!
//! Loading is all-or-nothing with respect to I/O: every line is read and
//! decoded before the catalog is touched. Lines that fail to decode are
//! skipped and reported, never guessed at.

use crate::catalog::{Catalog, InsertOutcome};
use crate::error::CatalogResult;
use crate::format::{self, LineError};
use crate::snapshot;
use crate::store::CatalogStore;
use shelfwise_core::{AppError, Book, BookId, TextBounds};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A line of the data file that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: LineError,
}

impl MalformedLine {
    pub fn to_error(&self) -> AppError {
        AppError::MalformedRecord {
            line: self.line,
            reason: self.reason.to_string(),
        }
    }
}

/// Summary of a load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Books added to the catalog
    pub loaded: usize,
    /// Ids skipped because the catalog already held them
    pub duplicates: Vec<BookId>,
    pub malformed: Vec<MalformedLine>,
}

impl LoadReport {
    /// True when every line was loaded
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.malformed.is_empty()
    }
}

/// Writes every book in balanced order. Returns the number of lines written.
pub fn save<S: CatalogStore, W: Write>(catalog: &Catalog<S>, writer: W) -> CatalogResult<usize> {
    let sorted = snapshot::flatten(catalog.store());
    let mut writer = BufWriter::new(writer);

    for book in snapshot::balanced_order(&sorted) {
        writeln!(writer, "{}", format::encode_line(book))?;
    }
    writer.flush()?;

    Ok(sorted.len())
}

/// Reads books from `reader` into `catalog`
///
/// Titles and authors longer than `bounds` allow are truncated. Blank lines
/// are ignored. On a read error nothing is inserted.
pub fn load<S: CatalogStore, R: BufRead>(
    catalog: &mut Catalog<S>,
    mut reader: R,
    bounds: &TextBounds,
) -> CatalogResult<LoadReport> {
    let mut decoded: Vec<Book> = Vec::new();
    let mut report = LoadReport::default();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| AppError::IoError {
                message: format!("reading line {}", line_number + 1),
                source,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let result = std::str::from_utf8(&buffer)
            .map_err(|_| LineError::InvalidUtf8)
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    format::decode_line(line).map(Some)
                }
            });

        match result {
            Ok(Some(book)) => decoded.push(book),
            Ok(None) => {}
            Err(reason) => {
                log::warn!("Skipping line {}: {}", line_number, reason);
                report.malformed.push(MalformedLine {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    for book in decoded {
        let title = bounds.truncate_title(&book.title);
        let author = bounds.truncate_author(&book.author);

        match catalog.insert(book.id, title, author) {
            InsertOutcome::Inserted => {
                // Insertion always starts a book as available.
                catalog.set_availability(book.id, book.available);
                report.loaded += 1;
            }
            InsertOutcome::DuplicateId => {
                log::warn!("Skipping duplicate book id {}", book.id);
                report.duplicates.push(book.id);
            }
        }
    }

    Ok(report)
}

/// A catalog data file on disk
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
    bounds: TextBounds,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bounds: TextBounds::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: TextBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the file into `catalog`
    ///
    /// If the file cannot be opened the catalog is left unchanged.
    pub fn load_into<S: CatalogStore>(&self, catalog: &mut Catalog<S>) -> CatalogResult<LoadReport> {
        let file = File::open(&self.path)
            .map_err(|e| AppError::open_failed("read", &self.path, e))?;

        let report = load(catalog, BufReader::new(file), &self.bounds)?;

        log::info!(
            "Loaded {} books from {} ({} duplicates, {} malformed lines)",
            report.loaded,
            self.path.display(),
            report.duplicates.len(),
            report.malformed.len()
        );
        Ok(report)
    }

    /// Loads the file into a fresh catalog, or returns an empty one if the
    /// file does not exist yet
    pub fn load_or_empty<S: CatalogStore>(&self) -> CatalogResult<(Catalog<S>, LoadReport)> {
        let mut catalog = Catalog::new();

        if !self.exists() {
            log::info!(
                "Data file not found at {}, starting empty",
                self.path.display()
            );
            return Ok((catalog, LoadReport::default()));
        }

        let report = self.load_into(&mut catalog)?;
        Ok((catalog, report))
    }

    /// Saves `catalog` atomically
    ///
    /// The lines go to a temporary file next to the target, which then
    /// replaces it, so a failed save never leaves a partial data file. An
    /// existing file keeps its permissions.
    pub fn save<S: CatalogStore>(&self, catalog: &Catalog<S>) -> CatalogResult<usize> {
        let written = self.replace_with(|out| save(catalog, out))?;

        log::info!("Saved {} books to {}", written, self.path.display());
        Ok(written)
    }

    /// Runs `write` against a temporary sibling of the target and swaps it in
    /// only if `write` succeeds
    fn replace_with<F>(&self, write: F) -> CatalogResult<usize>
    where
        F: FnOnce(&mut File) -> CatalogResult<usize>,
    {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(dir)
            .map_err(|e| AppError::open_failed("write", &self.path, e))?;

        let written = write(temp_file.as_file_mut())?;

        // NamedTempFile creates files as 0600.
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|source| AppError::IoError {
                    message: format!("copying permissions of {}", self.path.display()),
                    source,
                })?;
        }

        temp_file
            .persist(&self.path)
            .map_err(|e| AppError::ResourceUnavailable {
                operation: "replace".to_string(),
                path: self.path.clone(),
                source: e.error,
            })?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::SortedList;
    use crate::tree::BookTree;
    use std::io::Cursor;

    fn ascending(n: i32) -> Catalog {
        let mut catalog = Catalog::new();
        for id in 1..=n {
            catalog.insert(BookId::new(id), format!("T{}", id), format!("A{}", id));
        }
        catalog
    }

    fn saved_ids<S: CatalogStore>(catalog: &Catalog<S>) -> Vec<i32> {
        let mut out = Vec::new();
        save(catalog, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| line.split('|').next().unwrap().parse().unwrap())
            .collect()
    }

    #[test]
    fn test_save_emits_balanced_order() {
        let catalog = ascending(7);
        assert_eq!(saved_ids(&catalog), vec![4, 2, 1, 3, 6, 5, 7]);
    }

    #[test]
    fn test_save_format() {
        let mut catalog: Catalog = Catalog::new();
        catalog.insert(BookId::new(5), "T", "A");
        catalog.loan(BookId::new(5));

        let mut out = Vec::new();
        assert_eq!(save(&catalog, &mut out).unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "5|T|A|0\n");
    }

    #[test]
    fn test_save_empty_writes_nothing() {
        let catalog: Catalog = Catalog::new();
        let mut out = Vec::new();
        assert_eq!(save(&catalog, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_list_engine_saves_balanced_too() {
        let mut catalog: Catalog<SortedList> = Catalog::new();
        for id in 1..=7 {
            catalog.insert(BookId::new(id), "T", "A");
        }
        assert_eq!(saved_ids(&catalog), vec![4, 2, 1, 3, 6, 5, 7]);
    }

    #[test]
    fn test_load_restores_availability() {
        let input = "2|B|Y|0\n1|A|X|1\n3|C|Z|0\n";
        let mut catalog: Catalog = Catalog::new();

        let report = load(&mut catalog, Cursor::new(input), &TextBounds::default()).unwrap();

        assert_eq!(report.loaded, 3);
        assert!(report.is_clean());
        assert!(catalog.find(BookId::new(1)).unwrap().available);
        assert!(!catalog.find(BookId::new(2)).unwrap().available);
        assert!(!catalog.find(BookId::new(3)).unwrap().available);
        assert_eq!(catalog.height(), 2);
    }

    #[test]
    fn test_load_skips_and_reports_malformed_lines() {
        let input = "1|A|X|1\nbroken line\n\n2|B|Y|maybe\n3|C|Z|1\n";
        let mut catalog: Catalog = Catalog::new();

        let report = load(&mut catalog, Cursor::new(input), &TextBounds::default()).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.malformed.len(), 2);
        assert_eq!(report.malformed[0].line, 2);
        assert_eq!(report.malformed[0].reason, LineError::FieldCount { found: 1 });
        assert_eq!(report.malformed[1].line, 4);
        assert!(matches!(
            report.malformed[1].to_error(),
            AppError::MalformedRecord { line: 4, .. }
        ));
        assert!(catalog.find(BookId::new(2)).is_none());
    }

    #[test]
    fn test_load_reports_invalid_utf8() {
        let mut input = b"1|A|X|1\n".to_vec();
        input.extend_from_slice(b"2|\xff\xfe|Y|1\n");
        let mut catalog: Catalog = Catalog::new();

        let report = load(&mut catalog, Cursor::new(input), &TextBounds::default()).unwrap();

        assert_eq!(report.loaded, 1);
        assert_eq!(report.malformed[0].reason, LineError::InvalidUtf8);
    }

    #[test]
    fn test_load_duplicates_keep_first_record() {
        let input = "1|First|X|0\n1|Second|Y|1\n";
        let mut catalog: Catalog = Catalog::new();

        let report = load(&mut catalog, Cursor::new(input), &TextBounds::default()).unwrap();

        assert_eq!(report.loaded, 1);
        assert_eq!(report.duplicates, vec![BookId::new(1)]);
        let book = catalog.find(BookId::new(1)).unwrap();
        assert_eq!(book.title, "First");
        assert!(!book.available);
    }

    #[test]
    fn test_load_truncates_to_bounds() {
        let input = "1|A very long title|An author|1\n";
        let mut catalog: Catalog = Catalog::new();

        load(&mut catalog, Cursor::new(input), &TextBounds::new(6, 2)).unwrap();

        let book = catalog.find(BookId::new(1)).unwrap();
        assert_eq!(book.title, "A very");
        assert_eq!(book.author, "An");
    }

    #[test]
    fn test_load_without_trailing_newline() {
        let mut catalog: Catalog<BookTree> = Catalog::new();
        let report = load(&mut catalog, Cursor::new("7|T|A|1"), &TextBounds::default()).unwrap();
        assert_eq!(report.loaded, 1);
    }

    #[test]
    fn test_write_failure_keeps_previous_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("books.dat");
        let file = CatalogFile::new(&path);
        file.save(&ascending(3)).unwrap();
        let before = fs::read(&path).unwrap();

        let result = file.replace_with(|out| {
            out.write_all(b"9|Half a rec")?;
            Err(std::io::Error::other("disk full").into())
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("books.dat")]);
    }

    #[test]
    fn test_successful_replace_overwrites_same_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("books.dat");
        let file = CatalogFile::new(&path);
        file.save(&ascending(3)).unwrap();

        let written = file.replace_with(|out| save(&ascending(1), out)).unwrap();

        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1|T1|A1|1\n");
    }

    struct FailingReader {
        served: bool,
    }

    impl std::io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                return Err(std::io::Error::other("disk went away"));
            }
            self.served = true;
            let line = b"1|A|X|1\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn test_read_error_leaves_catalog_unchanged() {
        let mut catalog: Catalog = Catalog::new();
        let reader = BufReader::new(FailingReader { served: false });

        let result = load(&mut catalog, reader, &TextBounds::default());

        assert!(result.is_err());
        assert!(catalog.is_empty());
    }
}
