//! Loading and checkpoint-saving of string catalogs.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::Catalog;

/// What: Error type for catalog reads and writes.
///
/// Inputs: Produced by [`load`] and [`save`].
///
/// Output: Implements `Display`/`Error`; carries the path that failed.
///
/// Details:
/// - `Read` and `Parse` are read failures and are fatal to a run.
/// - `Serialize` and `Write` are write failures; during checkpointing they are logged and skipped.
#[derive(Debug)]
pub enum CatalogError {
    /// File missing or unreadable.
    Read {
        /// Catalog path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// File contents are not a valid catalog document.
    Parse {
        /// Catalog path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Catalog could not be serialized.
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Serialized catalog could not be written to disk.
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Whether this error happened while reading the input catalog.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read catalog {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "catalog {} is not valid: {source}", path.display())
            }
            Self::Serialize { path, source } => {
                write!(
                    f,
                    "failed to serialize catalog for {}: {source}",
                    path.display()
                )
            }
            Self::Write { path, source } => {
                write!(f, "failed to write catalog {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Serialize { source, .. } => Some(source),
        }
    }
}

/// What: Load a catalog document from `path`.
///
/// Inputs:
/// - `path`: Location of the `.xcstrings` file.
///
/// Output:
/// - Parsed [`Catalog`].
///
/// # Errors
/// - `CatalogError::Read` when the file is missing or unreadable.
/// - `CatalogError::Parse` when the contents are not a valid catalog.
pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: Catalog = serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        entries = catalog.len(),
        "[Catalog] Loaded catalog"
    );
    Ok(catalog)
}

/// What: Render the catalog exactly as it is written to disk.
///
/// Inputs:
/// - `catalog`: Document to render.
///
/// Output:
/// - Pretty JSON with two-space indentation and a trailing newline.
///
/// # Errors
/// - Returns the `serde_json` error if serialization fails.
pub fn to_pretty_json(catalog: &Catalog) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(catalog)?;
    text.push('\n');
    Ok(text)
}

/// What: Persist the catalog to `path`, replacing any previous file atomically.
///
/// Inputs:
/// - `catalog`: Document to write.
/// - `path`: Destination file.
///
/// Output:
/// - `Ok(())` once the new contents are in place.
///
/// # Errors
/// - `CatalogError::Serialize` if the document cannot be rendered.
/// - `CatalogError::Write` if the temporary file cannot be created, written or renamed.
///
/// Details:
/// - Serializes fully in memory before touching the filesystem.
/// - Writes into a temporary file in the destination directory and renames it over `path`,
///   so an existing file is never truncated or half-written.
/// - Creates the parent directory when missing.
/// - An existing destination keeps its permissions.
pub fn save(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    let text = to_pretty_json(catalog).map_err(|source| CatalogError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let write_err = |source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".xcstrings-")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::trace!(
        path = %path.display(),
        bytes = text.len(),
        "[Catalog] Catalog written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entry, STATE_TRANSLATED};

    /// Catalog JSON with metadata the pipeline does not interpret, in Xcode key order.
    const SAMPLE: &str = r#"{
          "sourceLanguage": "en",
          "strings": {
            "": {},
            "Cancel": {
              "comment": null,
              "extractionState": "manual"
            },
            "Done": {
              "comment": "Button title",
              "isCommentAutoGenerated": true,
              "localizations": {
                "de": { "stringUnit": { "state": "translated", "value": "Fertig" } }
              }
            },
            "%lld items": {
              "localizations": {
                "en": {
                  "variations": {
                    "plural": {
                      "one": { "stringUnit": { "state": "new", "value": "%lld item" } },
                      "other": { "stringUnit": { "state": "new", "value": "%lld items" } }
                    }
                  }
                }
              },
              "shouldTranslate": true,
              "x-reviewed-by": ["ana", 3, null]
            }
          },
          "version": "1.0"
        }"#;

    /// Parsed [`SAMPLE`].
    fn sample_catalog() -> Catalog {
        serde_json::from_str(SAMPLE).expect("sample catalog parses")
    }

    #[test]
    /// What: Save then reload yields an equal catalog, including unrecognized metadata.
    ///
    /// Inputs:
    /// - Sample catalog with plural variations, a null comment, an unknown field between
    ///   known ones and a trailing unknown field.
    ///
    /// Output:
    /// - Reloaded catalog equals the original, and the file text equals the pretty-printed
    ///   input, so null fields and interleaved unknown fields keep their place.
    fn save_then_load_is_lossless() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Localizable.xcstrings");
        let original = sample_catalog();
        save(&original, &path).expect("save");
        let reloaded = load(&path).expect("load");
        assert_eq!(reloaded, original);

        let input: serde_json::Value = serde_json::from_str(SAMPLE).expect("json");
        let expected = format!(
            "{}\n",
            serde_json::to_string_pretty(&input).expect("pretty")
        );
        assert_eq!(fs::read_to_string(&path).expect("read"), expected);
        assert!(expected.contains("\"comment\": null"));
    }

    #[test]
    /// What: Saving the same catalog twice produces byte-identical files.
    ///
    /// Inputs:
    /// - Sample catalog saved to two paths.
    ///
    /// Output:
    /// - Identical bytes; keys keep their original order.
    fn save_is_byte_identical() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.xcstrings");
        let b = dir.path().join("b.xcstrings");
        let catalog = sample_catalog();
        save(&catalog, &a).expect("save a");
        save(&catalog, &b).expect("save b");
        save(&catalog, &b).expect("save b again");
        let bytes_a = fs::read(&a).expect("read a");
        assert_eq!(bytes_a, fs::read(&b).expect("read b"));

        let text = String::from_utf8(bytes_a).expect("utf8");
        let done = text.find("\"Done\"").expect("Done key");
        let items = text.find("\"%lld items\"").expect("plural key");
        assert!(done < items, "insertion order must be preserved");
        assert!(text.ends_with("}\n"));
    }

    #[test]
    /// What: Missing and malformed files map to read errors.
    ///
    /// Inputs:
    /// - Nonexistent path; file containing invalid JSON; JSON without `strings`.
    ///
    /// Output:
    /// - `Read` for the missing file, `Parse` for both malformed files.
    fn load_reports_read_and_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.xcstrings");
        let err = load(&missing).expect_err("missing file");
        assert!(matches!(err, CatalogError::Read { .. }));
        assert!(err.is_read());

        let broken = dir.path().join("broken.xcstrings");
        fs::write(&broken, "{ \"strings\": ").expect("write");
        assert!(matches!(
            load(&broken).expect_err("broken"),
            CatalogError::Parse { .. }
        ));

        let no_strings = dir.path().join("nostrings.xcstrings");
        fs::write(&no_strings, "{ \"version\": \"1.0\" }").expect("write");
        assert!(matches!(
            load(&no_strings).expect_err("no strings"),
            CatalogError::Parse { .. }
        ));
    }

    #[test]
    /// What: A failed save leaves the previously written file untouched.
    ///
    /// Inputs:
    /// - Valid catalog saved to a path, then a save aimed at a path whose parent is a file.
    ///
    /// Output:
    /// - Second save fails with `Write`; the first file still holds the original bytes.
    fn failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("out.xcstrings");
        let catalog = sample_catalog();
        save(&catalog, &good).expect("save");
        let before = fs::read(&good).expect("read");

        // `out.xcstrings` is a file, so it cannot act as a directory.
        let impossible = good.join("nested.xcstrings");
        let mut changed = catalog;
        changed.strings.insert(
            "New".to_string(),
            Entry::default().with_unit("de", STATE_TRANSLATED, "Neu"),
        );
        let err = save(&changed, &impossible).expect_err("cannot write below a file");
        assert!(matches!(err, CatalogError::Write { .. }));
        assert!(!err.is_read());
        assert_eq!(fs::read(&good).expect("read"), before);
    }

    #[cfg(unix)]
    #[test]
    /// What: Overwriting a catalog keeps the destination's permissions.
    ///
    /// Inputs:
    /// - Catalog file with mode 0644, loaded and saved back to the same path.
    ///
    /// Output:
    /// - Mode is still 0644 after the save.
    fn save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Localizable.xcstrings");
        fs::write(&path, SAMPLE).expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        let catalog = load(&path).expect("load");
        save(&catalog, &path).expect("save");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    /// What: Saving creates missing parent directories.
    ///
    /// Inputs:
    /// - Destination inside two nonexistent directories.
    ///
    /// Output:
    /// - File exists and loads back.
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("nested").join("L.xcstrings");
        save(&Catalog::new("1.0"), &path).expect("save");
        assert!(load(&path).expect("load").is_empty());
    }
}
