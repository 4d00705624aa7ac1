//! Error types for the imprint crate.

use std::path::PathBuf;

/// Errors that can occur during discovery, watermarking, and export.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// The output directory resolves to a source directory and overwriting
    /// sources was not explicitly allowed.
    #[error(
        "output directory {output} must differ from source directory {source_dir} \
         (set allow_overwrite_source to override)"
    )]
    OutputIntoSourceDir {
        /// Resolved output directory.
        output: PathBuf,
        /// Conflicting resolved source directory.
        source_dir: PathBuf,
    },

    /// Two distinct source files map to the same destination path.
    #[error("sources {first} and {second} both export to {dest}")]
    DuplicateDestination {
        /// Colliding destination path.
        dest: PathBuf,
        /// First source mapping to the destination.
        first: PathBuf,
        /// Second source mapping to the destination.
        second: PathBuf,
    },
}

impl Error {
    /// Whether this error is a configuration error (raised before any image
    /// is touched) rather than a per-file processing failure.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::OutputIntoSourceDir { .. } | Error::DuplicateDestination { .. }
        )
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let conflict = Error::OutputIntoSourceDir {
            output: PathBuf::from("/photos"),
            source_dir: PathBuf::from("/photos"),
        };
        assert!(conflict.to_string().contains("/photos"));

        let dup = Error::DuplicateDestination {
            dest: PathBuf::from("/out/a.jpg"),
            first: PathBuf::from("/in/x/a.png"),
            second: PathBuf::from("/in/y/a.tif"),
        };
        let msg = dup.to_string();
        assert!(msg.contains("/out/a.jpg"));
        assert!(msg.contains("a.png"));
    }

    #[test]
    fn directory_conflict_carries_paths_as_payload_not_cause() {
        use std::error::Error as _;

        // The conflicting directory is message payload; the error has no
        // underlying cause to chain.
        let conflict = Error::OutputIntoSourceDir {
            output: PathBuf::from("/out"),
            source_dir: PathBuf::from("/photos"),
        };
        assert!(conflict.source().is_none());
        assert!(conflict.to_string().contains("allow_overwrite_source"));
    }

    #[test]
    fn configuration_errors_are_classified() {
        let conflict = Error::OutputIntoSourceDir {
            output: PathBuf::from("/out"),
            source_dir: PathBuf::from("/out"),
        };
        assert!(conflict.is_configuration());

        let io_err = Error::Io(std::io::Error::other("disk"));
        assert!(!io_err.is_configuration());
    }
}
