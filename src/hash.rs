//! SHA-256 digests of file contents.
use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::Digest;
use sha2::Sha256;

use crate::errors::Error;

/// Size of the chunks a file is streamed through the hasher in.
const CHUNK_SIZE: usize = 8192;

/// Builds a SHA-256 context from a source.
pub trait Sha256Builder {
    /// Feeds the whole source into a fresh context.
    fn sha256_build(&self) -> Result<Sha256, Error>;

    /// Feeds `data` into `context`.
    fn sha256_update(&self, data: &[u8], context: &mut Sha256) -> Result<(), Error> {
        context.update(data);
        Ok(())
    }
}

/// Turns a finished context into its lowercase hex digest.
pub trait Sha256String {
    /// Finalizes the context.
    fn sha256_string(self) -> String;
}

impl Sha256String for Sha256 {
    fn sha256_string(self) -> String {
        format!("{:x}", self.finalize())
    }
}

impl Sha256Builder for &Path {
    /// Streams the file in chunks; the contents are never held in memory.
    fn sha256_build(&self) -> Result<Sha256, Error> {
        let mut file = fs::File::open(self).map_err(|e| Error::Read {
            what: self.to_string_lossy().to_string(),
            how: e.to_string(),
        })?;
        let mut context = Sha256::new();
        let mut buffer = vec![0; CHUNK_SIZE];

        loop {
            let bytes_read = file.read(&mut buffer).map_err(|e| Error::Read {
                what: self.to_string_lossy().to_string(),
                how: e.to_string(),
            })?;

            if bytes_read == 0 {
                break;
            }
            self.sha256_update(&buffer[..bytes_read], &mut context)?;
        }
        Ok(context)
    }
}

impl Sha256Builder for &[u8] {
    fn sha256_build(&self) -> Result<Sha256, Error> {
        let mut context = Sha256::new();
        self.sha256_update(self, &mut context)?;
        Ok(context)
    }
}
