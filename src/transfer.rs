use log::info;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Hands generated bytes to whatever saves them for the user.
///
/// Delivery is fire-and-forget from the document's point of view: the
/// export has already succeeded by the time this is called.
pub trait FileTransfer {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Saves deliveries into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryTransfer {
    dir: PathBuf,
}

impl DirectoryTransfer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryTransfer { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileTransfer for DirectoryTransfer {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        // Only the final component is honoured so a crafted name cannot escape `dir`.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid file name"))?;

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let mut file = File::create(&path)?;
        file.write_all(bytes)?;
        file.flush()?;

        info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Keeps the last delivered file in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransfer {
    last: Option<(String, Vec<u8>)>,
}

impl MemoryTransfer {
    pub fn new() -> Self {
        MemoryTransfer::default()
    }

    pub fn last(&self) -> Option<(&str, &[u8])> {
        self.last
            .as_ref()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }

    pub fn take(&mut self) -> Option<(String, Vec<u8>)> {
        self.last.take()
    }
}

impl FileTransfer for MemoryTransfer {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        self.last = Some((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_transfer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut transfer = DirectoryTransfer::new(dir.path().join("out"));
        transfer.deliver("a_modified.xlsx", b"PK\x03\x04").unwrap();

        let written = fs::read(dir.path().join("out").join("a_modified.xlsx")).unwrap();
        assert_eq!(written, b"PK\x03\x04");
    }

    #[test]
    fn directory_transfer_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut transfer = DirectoryTransfer::new(dir.path());
        transfer.deliver("../../evil.xlsx", b"x").unwrap();
        assert!(dir.path().join("evil.xlsx").exists());
    }

    #[test]
    fn memory_transfer_keeps_last() {
        let mut transfer = MemoryTransfer::new();
        assert!(transfer.last().is_none());
        transfer.deliver("one.xlsx", b"1").unwrap();
        transfer.deliver("two.xlsx", b"2").unwrap();
        assert_eq!(transfer.last(), Some(("two.xlsx", &b"2"[..])));
        assert_eq!(transfer.take(), Some(("two.xlsx".to_string(), b"2".to_vec())));
        assert!(transfer.last().is_none());
    }
}
