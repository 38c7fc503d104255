//! The single in-memory dataset slot shared by every view.
//!
//! A session holds at most one [`Dataset`]. A successful load replaces it
//! wholesale and notifies every subscriber; a rejected load leaves it as
//! it was.

use crate::data::Dataset;
use crate::error::LoadError;
use crate::parser::parse_csv;
use std::path::Path;
use tracing::{info, warn};

type Observer = Box<dyn FnMut(&Dataset)>;

#[derive(Default)]
pub struct Session {
    dataset: Option<Dataset>,
    observers: Vec<Observer>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently loaded dataset, if any
    pub fn current(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Register a callback run after every successful load
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Dataset) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Drop the loaded dataset
    pub fn clear(&mut self) {
        self.dataset = None;
    }

    /// Parse `content` and make it the current dataset.
    pub fn load_str(&mut self, content: &str, filename: &str) -> Result<&Dataset, LoadError> {
        ensure_csv(filename)?;

        let dataset = parse_csv(content, filename).map_err(|e| {
            warn!(filename, error = %e, "failed to parse CSV");
            LoadError::from(e)
        })?;

        info!("Loaded {} patients from {}", dataset.len(), filename);

        for observer in &mut self.observers {
            observer(&dataset);
        }
        Ok(&*self.dataset.insert(dataset))
    }

    /// Read a file from disk and load it
    pub fn load_file(&mut self, path: &Path) -> Result<&Dataset, LoadError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        ensure_csv(&filename)?;

        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&content, &filename)
    }
}

/// Only `.csv` file names are accepted
fn ensure_csv(filename: &str) -> Result<(), LoadError> {
    if filename.ends_with(".csv") {
        return Ok(());
    }
    warn!(filename, "rejected non-CSV file");
    Err(LoadError::NotCsv {
        filename: filename.to_string(),
    })
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("dataset", &self.dataset.as_ref().map(|d| &d.filename))
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FIRST: &str = "age,target\n50,1\n60,0\n";
    const SECOND: &str = "age,target\n41,0\n";

    #[test]
    fn test_starts_empty() {
        assert!(Session::new().current().is_none());
    }

    #[test]
    fn test_second_load_replaces_first() {
        let mut session = Session::new();
        session.load_str(FIRST, "one.csv").unwrap();
        assert_eq!(session.current().unwrap().len(), 2);

        session.load_str(SECOND, "two.csv").unwrap();
        let current = session.current().unwrap();
        assert_eq!(current.filename, "two.csv");
        assert_eq!(current.len(), 1);
        assert_eq!(current.rows[0].number("age"), Some(41.0));
    }

    #[test]
    fn test_parse_failure_keeps_previous() {
        let mut session = Session::new();
        session.load_str(FIRST, "one.csv").unwrap();
        let err = session.load_str("age,target", "bad.csv").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert_eq!(session.current().unwrap().filename, "one.csv");
    }

    #[test]
    fn test_non_csv_rejected() {
        let mut session = Session::new();
        let err = session.load_str(FIRST, "heart.xlsx").unwrap_err();
        assert!(matches!(err, LoadError::NotCsv { .. }));
        assert!(session.current().is_none());
    }

    #[test]
    fn test_observers_notified_on_success_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut session = Session::new();
        session.subscribe(move |ds| sink.borrow_mut().push(ds.filename.clone()));

        session.load_str(FIRST, "one.csv").unwrap();
        let _ = session.load_str("", "broken.csv");
        session.load_str(SECOND, "two.csv").unwrap();

        assert_eq!(*seen.borrow(), vec!["one.csv".to_string(), "two.csv".to_string()]);
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.load_str(FIRST, "one.csv").unwrap();
        session.clear();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_load_file_missing() {
        let mut session = Session::new();
        let err = session
            .load_file(Path::new("/nonexistent/dir/heart.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_load_file_rejects_name_before_reading() {
        let mut session = Session::new();
        // the path does not exist, so reaching the read would give LoadError::Read
        let err = session
            .load_file(Path::new("/nonexistent/dir/heart.txt"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotCsv { ref filename } if filename == "heart.txt"));
        assert!(session.current().is_none());
    }

    #[test]
    fn test_load_file_from_disk() {
        let path = std::env::temp_dir().join(format!("cardioinsight-{}.csv", std::process::id()));
        std::fs::write(&path, FIRST).unwrap();

        let mut session = Session::new();
        let loaded = session.load_file(&path).unwrap().len();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, 2);
        assert!(session.current().unwrap().filename.starts_with("cardioinsight-"));
    }
}
