//! File I/O utilities with atomic writes
//!
//! Both data files are rewritten whole on save. The atomic path writes to a
//! sibling temp file and renames it over the target, so a failed save leaves
//! the previous file intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{TallyError, TallyResult};

/// Open a file for buffered reading
pub fn open_for_read<P: AsRef<Path>>(path: P) -> TallyResult<BufReader<File>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| TallyError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

/// Write a file atomically (write to temp, then rename)
pub fn write_atomic<P, F>(path: P, write: F) -> TallyResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> TallyResult<()>,
{
    let path = path.as_ref();
    ensure_parent(path)?;

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let result = write_and_sync(&temp_path, write).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| {
            TallyError::Io(format!("Failed to replace {}: {}", path.display(), e))
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Truncate and overwrite a file in place
pub fn write_direct<P, F>(path: P, write: F) -> TallyResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> TallyResult<()>,
{
    let path = path.as_ref();
    ensure_parent(path)?;
    write_and_sync(path, write)
}

fn write_and_sync<F>(path: &Path, write: F) -> TallyResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> TallyResult<()>,
{
    let file = File::create(path)
        .map_err(|e| TallyError::Io(format!("Failed to create {}: {}", path.display(), e)))?;

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;

    writer
        .flush()
        .map_err(|e| TallyError::Io(format!("Failed to flush {}: {}", path.display(), e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| TallyError::Io(format!("Failed to sync {}: {}", path.display(), e)))?;

    Ok(())
}

fn ensure_parent(path: &Path) -> TallyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                TallyError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_back(path: &Path) -> String {
        let mut contents = String::new();
        open_for_read(path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = open_for_read(temp_dir.path().join("missing.csv")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_write_atomic_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");

        write_atomic(&path, |w| {
            w.write_all(b"hello\n")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(read_back(&path), "hello\n");
        assert!(!temp_dir.path().join("transactions.csv.tmp").exists());
    }

    #[test]
    fn test_failed_atomic_write_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.dat");
        fs::write(&path, "old").unwrap();

        let result = write_atomic(&path, |w| {
            w.write_all(b"partial")?;
            Err(TallyError::Storage("boom".into()))
        });

        assert!(result.is_err());
        assert_eq!(read_back(&path), "old");
        assert!(!temp_dir.path().join("users.dat.tmp").exists());
    }

    #[test]
    fn test_write_direct_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("file.txt");

        write_direct(&path, |w| {
            w.write_all(b"first")?;
            Ok(())
        })
        .unwrap();
        write_direct(&path, |w| {
            w.write_all(b"second")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(read_back(&path), "second");
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a file for writing
        let err = write_direct(temp_dir.path(), |_| Ok(())).unwrap_err();
        assert!(err.is_io());
    }
}
