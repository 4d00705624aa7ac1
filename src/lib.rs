//! Text image watermarking with nine-grid placement and a batch export
//! pipeline.
//!
//! The crate discovers image files, renders a text watermark at one of nine
//! grid positions with configurable font, color, and opacity, and exports
//! the results with configurable naming, resizing, and format conversion.
//! Decoding, encoding, and font rasterization are delegated to the `image`,
//! `imageproc`, and `ab_glyph` crates.
//!
//! # Quick Start
//!
//! ```no_run
//! use imprint::{
//!     apply_text_watermark, discover_inputs, export_image, ExportOptions,
//!     TextWatermarkOptions,
//! };
//!
//! let inputs = discover_inputs(["./photos"]);
//! let wm = TextWatermarkOptions {
//!     text: "© 2026 Example".to_string(),
//!     ..TextWatermarkOptions::default()
//! };
//! let export = ExportOptions::new("./out");
//!
//! for src in &inputs.files {
//!     let img = image::open(src).unwrap();
//!     let marked = apply_text_watermark(&img, &wm);
//!     export_image(&marked, src, &export).unwrap();
//! }
//! ```
//!
//! # Batch export
//!
//! [`export_images`] runs the whole pipeline without watermarking: naming
//! rules, resize policy, format conversion, and overwrite protection.
//!
//! ```no_run
//! use imprint::{discover_inputs, export_images, ExportOptions};
//!
//! let inputs = discover_inputs(["./photos"]);
//! let report = export_images(&inputs.files, &ExportOptions::new("./out")).unwrap();
//! println!("exported {} files", report.exported.len());
//! ```

#![deny(missing_docs)]

pub mod discover;
pub mod error;
pub mod export;
pub mod naming;
pub mod position;
pub mod watermark;

pub use discover::{discover_inputs, is_supported_input, ImportResult, SUPPORTED_INPUT_EXTS};
pub use error::{Error, Result};
pub use export::{
    compute_target_size, export_file, export_image, export_images, prepare_output_dir, save_image,
    ExportFailure, ExportOptions, ExportReport, ResizeMode,
};
pub use naming::{build_output_path, NamingMode, OutputFormat};
pub use position::{compute_position, GridPosition};
pub use watermark::{
    apply_text_watermark, apply_text_watermark_with_font, is_font_available, load_font,
    text_dimensions, TextWatermarkOptions,
};
