//! SHA-256 file digests for copy-skip decisions.
//!
//! Digests are computed on demand and never stored.

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, NasError};

/// Read buffer size; memory use stays flat regardless of file size.
pub const CHUNK_SIZE: usize = 4096;

/// SHA-256 digest of a file's full contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash the file at `path`, reading it in [`CHUNK_SIZE`] pieces.
pub fn hash_file(path: &Path) -> Result<FileDigest, NasError> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err(path, e)),
        };
        hasher.update(&buf[..n]);
    }
    Ok(finish(hasher))
}

/// Hash an in-memory byte slice. Same result as [`hash_file`] on a file with
/// those contents.
pub fn hash_bytes(bytes: &[u8]) -> FileDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    finish(hasher)
}

fn finish(hasher: Sha256) -> FileDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    FileDigest(out)
}
