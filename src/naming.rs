//! Output file naming rules.

use std::path::{Path, PathBuf};

/// Policy for deriving an output filename stem from a source filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NamingMode {
    /// Keep the original stem unchanged.
    #[default]
    Keep,
    /// Prepend a prefix to the stem.
    Prefix,
    /// Append a suffix to the stem.
    Suffix,
}

impl std::fmt::Display for NamingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamingMode::Keep => write!(f, "keep"),
            NamingMode::Prefix => write!(f, "prefix"),
            NamingMode::Suffix => write!(f, "suffix"),
        }
    }
}

/// Logical output format token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// JPEG output, written with a quality setting, no alpha channel.
    #[default]
    Jpeg,
    /// PNG output, lossless, alpha preserved.
    Png,
}

impl OutputFormat {
    /// File extension used for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Png => write!(f, "png"),
        }
    }
}

/// Construct the destination path for a source file.
///
/// The stem is transformed per `mode`, the extension is forced by `format`
/// regardless of the source extension, and the result lands directly under
/// `out_dir`. Collisions between distinct sources mapping to one destination
/// are not detected here; the exporter guards against them.
#[must_use]
pub fn build_output_path(
    src: &Path,
    out_dir: &Path,
    mode: NamingMode,
    prefix: &str,
    suffix: &str,
    format: OutputFormat,
) -> PathBuf {
    let stem = src.file_stem().unwrap_or_default().to_string_lossy();
    let stem = match mode {
        NamingMode::Keep => stem.into_owned(),
        NamingMode::Prefix => format!("{prefix}{stem}"),
        NamingMode::Suffix => format!("{stem}{suffix}"),
    };
    out_dir.join(format!("{stem}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_mode_forces_jpeg_extension() {
        let dest = build_output_path(
            Path::new("photo.png"),
            Path::new("/out"),
            NamingMode::Keep,
            "",
            "",
            OutputFormat::Jpeg,
        );
        assert_eq!(dest, PathBuf::from("/out/photo.jpg"));
    }

    #[test]
    fn suffix_mode_inserts_before_extension() {
        let dest = build_output_path(
            Path::new("a/b/img.tif"),
            Path::new("/out"),
            NamingMode::Suffix,
            "",
            "_wm",
            OutputFormat::Png,
        );
        assert_eq!(dest, PathBuf::from("/out/img_wm.png"));
    }

    #[test]
    fn prefix_mode_prepends_to_stem() {
        let dest = build_output_path(
            Path::new("shot.jpeg"),
            Path::new("exports"),
            NamingMode::Prefix,
            "wm_",
            "ignored",
            OutputFormat::Jpeg,
        );
        assert_eq!(dest, PathBuf::from("exports/wm_shot.jpg"));
    }

    #[test]
    fn format_tokens_and_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.to_string(), "jpeg");
        assert_eq!(OutputFormat::Png.to_string(), "png");
    }

    #[test]
    fn defaults_are_keep_and_jpeg() {
        assert_eq!(NamingMode::default(), NamingMode::Keep);
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
    }
}
