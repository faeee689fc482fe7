//! Append-only JSONL writer for one client session.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::entry::SessionLogEntry;

/// Writer appending entries to `<logs_dir>/<date>_<user>.jsonl`
pub struct SessionLogWriter {
    user: String,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl SessionLogWriter {
    /// Open (or create) today's log file for `user`
    ///
    /// Characters that are unsafe in file names are replaced with `_`.
    pub fn new(logs_dir: impl AsRef<Path>, user: impl Into<String>) -> io::Result<Self> {
        let user = user.into();
        let logs_dir = logs_dir.as_ref();
        fs::create_dir_all(logs_dir)?;

        let date = chrono::Local::now().format("%Y-%m-%d");
        let path = logs_dir.join(format!("{}_{}.jsonl", date, file_stem(&user)));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            user,
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line and flush
    pub fn write(&self, entry: &SessionLogEntry) -> io::Result<()> {
        let json = entry
            .to_line()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut writer = self.lock()?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.lock()?.flush()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, BufWriter<File>>> {
        self.writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))
    }
}

impl Drop for SessionLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

fn file_stem(user: &str) -> String {
    let stem: String = user
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "anonymous".to_string()
    } else {
        stem
    }
}

/// Read every parseable entry of a log file; malformed lines are skipped
pub fn read_entries(path: impl AsRef<Path>) -> io::Result<Vec<SessionLogEntry>> {
    let file = File::open(path)?;
    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Ok(entry) = SessionLogEntry::parse_line(&line) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writer_appends_lines() {
        let temp = TempDir::new().unwrap();
        let writer = SessionLogWriter::new(temp.path(), "ada").unwrap();

        writer
            .write(&SessionLogEntry::new("info", "ada", "taskroom", "one"))
            .unwrap();
        writer
            .write(&SessionLogEntry::new("warn", "ada", "taskroom", "two"))
            .unwrap();

        let entries = read_entries(writer.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].level, "warn");
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let temp = TempDir::new().unwrap();
        let writer = SessionLogWriter::new(temp.path(), "ada/../x y").unwrap();

        let name = writer.path().file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_ada____x_y.jsonl"));
        assert_eq!(writer.path().parent().unwrap(), temp.path());
        assert_eq!(writer.user(), "ada/../x y");
    }

    #[test]
    fn test_read_entries_skips_garbage() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mixed.jsonl");
        let good = SessionLogEntry::new("info", "ada", "t", "ok").to_line().unwrap();
        std::fs::write(&path, format!("{}\nnot json\n", good)).unwrap();

        assert_eq!(read_entries(&path).unwrap().len(), 1);
    }
}
