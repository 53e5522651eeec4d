use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Write `dest` atomically.
///
/// `write` fills a temp file created next to `dest`; the temp file is
/// renamed over `dest` only after `write` returns `Ok` and the data is
/// synced. On error the temp file is removed and `dest` is left untouched.
///
/// # Errors
///
/// Returns the closure's error, or an IO error if the directory, temp file,
/// sync, or rename fails.
pub fn write_atomic<E, F>(dest: &Path, write: F) -> Result<(), E>
where
    E: From<io::Error>,
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), E>,
{
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    debug!(
        tmp = %tmp.path().display(),
        dest = %dest.display(),
        "Publishing output file"
    );
    tmp.persist(dest).map_err(|e| E::from(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_publishes() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");

        write_atomic::<io::Error, _>(&dest, |w| w.write_all(b"hello")).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "hello");
        // Only the published file remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_failure_leaves_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");

        let result = write_atomic::<io::Error, _>(&dest, |w| {
            w.write_all(b"partial")?;
            Err(io::Error::other("boom"))
        });

        assert!(result.is_err());
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");
        std::fs::write(&dest, "old").unwrap();

        write_atomic::<io::Error, _>(&dest, |w| w.write_all(b"new")).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("nested/deeper/out.txt");

        write_atomic::<io::Error, _>(&dest, |w| w.write_all(b"x")).unwrap();

        assert!(dest.exists());
    }
}
