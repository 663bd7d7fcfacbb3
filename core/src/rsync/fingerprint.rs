//! Content fingerprinting
//!
//! Files are identified by the CRC32 (IEEE) of their full content. The
//! checksum is fast and order sensitive; it is not meant to resist deliberate
//! collisions.

use crate::rsync::types::FileHash;
use ferry_common::{CommonError, Result};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Stream `reader` to the end and return the CRC32 of everything read.
pub fn checksum_reader<R: Read>(mut reader: R) -> std::io::Result<u32> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Fingerprint the file at `full_path`.
///
/// The returned [`FileHash`] has an empty `target_folder`; callers that know
/// where the file should land fill it in.
pub fn generate_file_hash<P: AsRef<Path>>(full_path: P) -> Result<FileHash> {
    let full_path = full_path.as_ref();

    match std::fs::metadata(full_path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CommonError::not_found_error_with_source(
                format!("{} does not exist", full_path.display()),
                e,
            ));
        }
        Err(e) => {
            return Err(CommonError::io_error_with_source(
                format!("cannot stat {}", full_path.display()),
                e,
            ));
        }
    }

    let file = File::open(full_path).map_err(|e| {
        CommonError::io_error_with_source(format!("cannot open {}", full_path.display()), e)
    })?;
    let hash = checksum_reader(file).map_err(|e| {
        CommonError::io_error_with_source(format!("cannot read {}", full_path.display()), e)
    })?;

    Ok(FileHash {
        full_path: full_path.to_path_buf(),
        target_folder: String::new(),
        file: base_name(full_path),
        hash,
    })
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_known_checksum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello").unwrap();

        let fh = generate_file_hash(&path).unwrap();
        assert_eq!(fh.hash, 0x3610a686);
        assert_eq!(fh.hash, 907060870);
        assert_eq!(fh.file, "a.txt");
        assert_eq!(fh.full_path, path);
        assert!(fh.target_folder.is_empty());
    }

    #[test]
    fn test_same_content_same_hash() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("nested-b.bin");
        std::fs::write(&a, b"identical bytes").unwrap();
        std::fs::write(&b, b"identical bytes").unwrap();

        let first = generate_file_hash(&a).unwrap().hash;
        let again = generate_file_hash(&a).unwrap().hash;
        let other = generate_file_hash(&b).unwrap().hash;
        assert_eq!(first, again);
        assert_eq!(first, other);
    }

    #[test]
    fn test_different_content_different_hash() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"ab").unwrap();
        std::fs::write(&b, b"ba").unwrap();

        assert_ne!(
            generate_file_hash(&a).unwrap().hash,
            generate_file_hash(&b).unwrap().hash
        );
    }

    #[test]
    fn test_large_file_spans_buffers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("large.bin");
        let data: Vec<u8> = (0..READ_BUFFER_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let mut file = File::create(&path).unwrap();
        file.write_all(&data).unwrap();
        drop(file);

        let fh = generate_file_hash(&path).unwrap();
        assert_eq!(fh.hash, crc32fast::hash(&data));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(generate_file_hash(&path).unwrap().hash, 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = generate_file_hash(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, CommonError::NotFoundError { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = generate_file_hash(dir.path()).unwrap_err();
        assert!(matches!(err, CommonError::IoError { .. }));
    }
}
