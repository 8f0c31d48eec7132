//! Save downloads into a directory

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ExportError;

use super::{sanitize_filename, Delivery, DownloadSink, Payload};

/// Give up picking a free name after this many numbered candidates
const MAX_NAME_ATTEMPTS: usize = 10_000;

/// Writes each payload as a file in a target directory.
///
/// Bytes go to a temp file in the same directory first and are then moved
/// into place, so a failed delivery never leaves a partial file behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Replace existing files instead of picking `name (1).ext`
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn persist(&self, mut tmp: NamedTempFile, name: &str) -> Result<Delivery, ExportError> {
        if self.overwrite {
            let target = self.dir.join(name);
            tmp.persist(&target).map_err(|e| e.error)?;
            return Ok(delivered(name.to_string(), target));
        }

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = numbered_name(name, attempt);
            let target = self.dir.join(&candidate);
            match tmp.persist_noclobber(&target) {
                Ok(_) => {
                    if attempt > 0 {
                        tracing::debug!(requested = name, used = %candidate, "name taken, renamed download");
                    }
                    return Ok(delivered(candidate, target));
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => tmp = e.file,
                Err(e) => return Err(e.error.into()),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {} in {}", name, self.dir.display()),
        )
        .into())
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, payload: &Payload) -> Result<Delivery, ExportError> {
        let name = sanitize_filename(&payload.filename);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&payload.bytes)?;
        tmp.flush()?;

        let delivery = self.persist(tmp, &name)?;
        tracing::info!(
            path = ?delivery.location,
            bytes = payload.len(),
            "saved download"
        );
        Ok(delivery)
    }
}

fn delivered(filename: String, target: PathBuf) -> Delivery {
    Delivery {
        filename,
        location: Some(target),
    }
}

/// `export.csv` -> `export (n).csv`; `n == 0` keeps the name
fn numbered_name(name: &str, n: usize) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", name, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, text: &str) -> Payload {
        Payload::csv(name, text.to_string())
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("export.csv", 0), "export.csv");
        assert_eq!(numbered_name("export.csv", 2), "export (2).csv");
        assert_eq!(numbered_name("scores.2024.csv", 1), "scores.2024 (1).csv");
        assert_eq!(numbered_name("data", 1), "data (1)");
    }

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let delivery = sink.deliver(&payload("scores.csv", "\"a\",\"b\"")).unwrap();

        assert_eq!(delivery.filename, "scores.csv");
        let location = delivery.location.unwrap();
        assert_eq!(location, dir.path().join("scores.csv"));
        assert_eq!(std::fs::read_to_string(location).unwrap(), "\"a\",\"b\"");
        assert_eq!(dir_entries(dir.path()), vec!["scores.csv"]);
    }

    #[test]
    fn test_existing_file_gets_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        sink.deliver(&payload("export.csv", "1")).unwrap();
        let second = sink.deliver(&payload("export.csv", "2")).unwrap();
        let third = sink.deliver(&payload("export.csv", "3")).unwrap();

        assert_eq!(second.filename, "export (1).csv");
        assert_eq!(third.filename, "export (2).csv");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("export.csv")).unwrap(),
            "1"
        );
        assert_eq!(dir_entries(dir.path()).len(), 3);
    }

    #[test]
    fn test_overwrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path()).with_overwrite(true);
        sink.deliver(&payload("export.csv", "old")).unwrap();
        let delivery = sink.deliver(&payload("export.csv", "new")).unwrap();

        assert_eq!(delivery.filename, "export.csv");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("export.csv")).unwrap(),
            "new"
        );
        assert_eq!(dir_entries(dir.path()), vec!["export.csv"]);
    }

    #[test]
    fn test_unsafe_name_stays_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let delivery = sink.deliver(&payload("../escape.csv", "x")).unwrap();
        assert_eq!(delivery.filename, "_escape.csv");
        assert_eq!(dir_entries(dir.path()), vec!["_escape.csv"]);
    }

    #[test]
    fn test_missing_dir_fails_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut sink = DirectorySink::new(&missing);
        let err = sink.deliver(&payload("export.csv", "x")).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(dir_entries(dir.path()).is_empty());
    }
}
