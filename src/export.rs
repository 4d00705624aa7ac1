//! Batch export: naming, resizing, format conversion, and collision guards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{ColorType, DynamicImage};

use crate::error::{Error, Result};
use crate::naming::{build_output_path, NamingMode, OutputFormat};

/// How to derive the output size from the source size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ResizeMode {
    /// Keep the source size.
    #[default]
    None,
    /// Set the width to the resize value.
    ByWidth,
    /// Set the height to the resize value.
    ByHeight,
    /// Scale both axes by the resize value as a percentage.
    ByPercent,
}

impl std::fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeMode::None => write!(f, "none"),
            ResizeMode::ByWidth => write!(f, "by-width"),
            ResizeMode::ByHeight => write!(f, "by-height"),
            ResizeMode::ByPercent => write!(f, "by-percent"),
        }
    }
}

/// Options controlling export behavior.
///
/// JPEG quality is clamped to [0, 100] when the file is written, not at
/// construction. `stop_on_error` selects the per-file failure policy: abort
/// the batch on the first failure (default) or collect failures and keep
/// going.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Target directory, created recursively on export.
    pub output_dir: PathBuf,
    /// Output format for every file in the batch.
    pub output_format: OutputFormat,
    /// Filename stem transformation.
    pub naming_mode: NamingMode,
    /// Stem prefix, used when `naming_mode` is [`NamingMode::Prefix`].
    pub prefix: String,
    /// Stem suffix, used when `naming_mode` is [`NamingMode::Suffix`].
    pub suffix: String,
    /// JPEG quality, semantically 0-100, clamped at use. Ignored for PNG.
    pub jpeg_quality: i32,
    /// Resize policy.
    pub resize_mode: ResizeMode,
    /// Width, height, or percent, interpreted per `resize_mode`.
    pub resize_value: Option<u32>,
    /// Maintain the source aspect ratio when resizing by one dimension.
    pub keep_aspect_ratio: bool,
    /// Allow `output_dir` to equal a source file's directory.
    pub allow_overwrite_source: bool,
    /// Abort the batch on the first per-file failure instead of collecting
    /// failures and continuing.
    pub stop_on_error: bool,
}

impl ExportOptions {
    /// Create options for the given output directory with default settings:
    /// JPEG at quality 90, original names, no resizing, source directories
    /// protected, batch aborted on first failure.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_format: OutputFormat::Jpeg,
            naming_mode: NamingMode::Keep,
            prefix: String::new(),
            suffix: String::new(),
            jpeg_quality: 90,
            resize_mode: ResizeMode::None,
            resize_value: None,
            keep_aspect_ratio: true,
            allow_overwrite_source: false,
            stop_on_error: true,
        }
    }

    /// Destination path for a source file under these options.
    #[must_use]
    pub fn destination_for(&self, src: &Path) -> PathBuf {
        build_output_path(
            src,
            &self.output_dir,
            self.naming_mode,
            &self.prefix,
            &self.suffix,
            self.output_format,
        )
    }
}

/// A single file that failed to export.
#[derive(Debug)]
pub struct ExportFailure {
    /// Source path that failed.
    pub source: PathBuf,
    /// The error that stopped it.
    pub error: Error,
}

/// Outcome of a batch export.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Destination paths of successfully exported files, in input order.
    pub exported: Vec<PathBuf>,
    /// Files skipped due to errors. Always empty when
    /// [`ExportOptions::stop_on_error`] is set, since the first failure
    /// aborts the batch instead.
    pub failures: Vec<ExportFailure>,
}

/// Compute the target size for an image under the resize policy.
///
/// `ResizeMode::None` or a missing value leaves the size unchanged. Scaled
/// axes are rounded and every result axis is floored to 1. Percent scaling
/// is floored at 1%.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_target_size(
    w: u32,
    h: u32,
    mode: ResizeMode,
    value: Option<u32>,
    keep_aspect: bool,
) -> (u32, u32) {
    let Some(value) = value else {
        return (w, h);
    };
    match mode {
        ResizeMode::None => (w, h),
        ResizeMode::ByWidth => {
            let new_w = value.max(1);
            let new_h = if keep_aspect && w > 0 {
                ((f64::from(h) * f64::from(new_w) / f64::from(w)).round() as u32).max(1)
            } else {
                h.max(1)
            };
            (new_w, new_h)
        }
        ResizeMode::ByHeight => {
            let new_h = value.max(1);
            let new_w = if keep_aspect && h > 0 {
                ((f64::from(w) * f64::from(new_h) / f64::from(h)).round() as u32).max(1)
            } else {
                w.max(1)
            };
            (new_w, new_h)
        }
        ResizeMode::ByPercent => {
            let scale = (f64::from(value) / 100.0).max(0.01);
            let new_w = ((f64::from(w) * scale) as u32).max(1);
            let new_h = ((f64::from(h) * scale) as u32).max(1);
            (new_w, new_h)
        }
    }
}

fn clamp_quality(quality: i32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        quality.clamp(0, 100) as u8
    }
}

/// Save an image in the given output format.
///
/// The quality parameter applies only to JPEG and is clamped to [0, 100].
/// JPEG input must already be in an alpha-free color mode; use
/// [`export_image`] for the full conversion pipeline.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    jpeg_quality: i32,
) -> Result<()> {
    match format {
        OutputFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(file, clamp_quality(jpeg_quality));
            encoder.encode_image(img)?;
        }
        OutputFormat::Png => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
    }
    Ok(())
}

/// Validate the batch configuration and create the output directory.
///
/// Creates `output_dir` recursively, then (unless overwriting sources is
/// allowed) verifies the resolved output directory differs from every
/// distinct resolved source parent, and that no two sources map to the same
/// destination path. All checks run before any image is opened. Source
/// parents that fail to resolve are skipped rather than treated as a match.
///
/// # Errors
///
/// Returns [`Error::OutputIntoSourceDir`] or [`Error::DuplicateDestination`]
/// on a configuration conflict, or an I/O error if the directory cannot be
/// created.
pub fn prepare_output_dir(files: &[PathBuf], options: &ExportOptions) -> Result<()> {
    std::fs::create_dir_all(&options.output_dir)?;

    if !options.allow_overwrite_source {
        let out = std::fs::canonicalize(&options.output_dir)?;
        let mut parents: Vec<&Path> = files.iter().filter_map(|f| f.parent()).collect();
        parents.sort_unstable();
        parents.dedup();
        for parent in parents {
            let Ok(resolved) = std::fs::canonicalize(parent) else {
                continue;
            };
            if resolved == out {
                return Err(Error::OutputIntoSourceDir {
                    output: out,
                    source_dir: parent.to_path_buf(),
                });
            }
        }
    }

    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
    for src in files {
        let dest = options.destination_for(src);
        if let Some(first) = seen.insert(dest.clone(), src) {
            return Err(Error::DuplicateDestination {
                dest,
                first: first.clone(),
                second: src.clone(),
            });
        }
    }

    Ok(())
}

/// Export an already-loaded image to its destination.
///
/// Computes the destination from `src` and the naming rules, converts JPEG
/// output to an alpha-free color mode if needed, applies the resize policy
/// with Lanczos3 resampling, creates the destination's parent directory, and
/// writes the file. Returns the destination path.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn export_image(img: &DynamicImage, src: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let dest = options.destination_for(src);

    let mut working = if options.output_format == OutputFormat::Jpeg
        && !matches!(img.color(), ColorType::Rgb8 | ColorType::L8)
    {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img.clone()
    };

    let (target_w, target_h) = compute_target_size(
        working.width(),
        working.height(),
        options.resize_mode,
        options.resize_value,
        options.keep_aspect_ratio,
    );
    if (target_w, target_h) != (working.width(), working.height()) {
        working = working.resize_exact(target_w, target_h, FilterType::Lanczos3);
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    save_image(&working, &dest, options.output_format, options.jpeg_quality)?;
    Ok(dest)
}

/// Open a source file and export it.
///
/// # Errors
///
/// Returns an error if the source cannot be decoded or the destination
/// cannot be written.
pub fn export_file(src: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let img = image::open(src)?;
    export_image(&img, src, options)
}

/// Export a batch of images to the output directory.
///
/// An empty input returns an empty report without creating the output
/// directory or validating anything. Otherwise the configuration guards in
/// [`prepare_output_dir`] run first, then files are processed independently
/// in input order. With `stop_on_error` set (the default) the first per-file
/// failure aborts the batch; otherwise failures are collected in the report
/// and the remaining files are still processed.
///
/// # Errors
///
/// Returns configuration errors from [`prepare_output_dir`], and per-file
/// errors when `stop_on_error` is set.
pub fn export_images(files: &[PathBuf], options: &ExportOptions) -> Result<ExportReport> {
    let mut report = ExportReport::default();
    if files.is_empty() {
        return Ok(report);
    }

    prepare_output_dir(files, options)?;

    for src in files {
        match export_file(src, options) {
            Ok(dest) => report.exported.push(dest),
            Err(error) if options.stop_on_error => return Err(error),
            Err(error) => report.failures.push(ExportFailure {
                source: src.clone(),
                error,
            }),
        }
    }

    Ok(report)
}
