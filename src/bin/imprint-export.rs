use std::path::PathBuf;
use std::process;

use clap::Parser;

use imprint::{
    discover_inputs, export_images, ExportOptions, NamingMode, OutputFormat, ResizeMode,
};

#[derive(Parser)]
#[command(
    name = "imprint-export",
    about = "Batch-export images with naming, resize, and format rules (no watermark)",
    version,
    after_help = "Simple usage: imprint-export ./photos -o ./out --format png --mode suffix --suffix _export"
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Jpeg)]
    format: OutputFormat,

    /// Output naming mode
    #[arg(long, value_enum, default_value_t = NamingMode::Keep)]
    mode: NamingMode,

    /// Stem prefix for --mode prefix
    #[arg(long, default_value = "")]
    prefix: String,

    /// Stem suffix for --mode suffix
    #[arg(long, default_value = "")]
    suffix: String,

    /// JPEG quality (0-100)
    #[arg(long, default_value = "90")]
    quality: i32,

    /// Resize mode
    #[arg(long, value_enum, default_value_t = ResizeMode::None)]
    resize: ResizeMode,

    /// Width, height, or percent, per --resize
    #[arg(long)]
    resize_value: Option<u32>,

    /// Do not preserve aspect ratio when resizing by one dimension
    #[arg(long)]
    no_keep_aspect: bool,

    /// Allow exporting into a source file's directory
    #[arg(long)]
    allow_overwrite_source: bool,

    /// Continue past per-file failures instead of aborting the batch
    #[arg(long)]
    keep_going: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let options = ExportOptions {
        output_format: cli.format,
        naming_mode: cli.mode,
        prefix: cli.prefix,
        suffix: cli.suffix,
        jpeg_quality: cli.quality,
        resize_mode: cli.resize,
        resize_value: cli.resize_value,
        keep_aspect_ratio: !cli.no_keep_aspect,
        allow_overwrite_source: cli.allow_overwrite_source,
        stop_on_error: !cli.keep_going,
        ..ExportOptions::new(cli.out)
    };

    let discovered = discover_inputs(&cli.inputs);
    if discovered.files.is_empty() {
        eprintln!("Error: no supported images found under the given inputs");
        process::exit(1);
    }

    if !cli.quiet {
        eprintln!(
            "Discovered {} file(s) under {}",
            discovered.files.len(),
            discovered.common_root.display()
        );
    }

    let report = match export_images(&discovered.files, &options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if !cli.quiet {
        for dest in &report.exported {
            eprintln!("[OK] {}", dest.display());
        }
    }
    for failure in &report.failures {
        eprintln!("[FAIL] {}: {}", failure.source.display(), failure.error);
    }

    if !cli.quiet {
        eprintln!();
        eprint!("[Summary] Exported: {}", report.exported.len());
        if !report.failures.is_empty() {
            eprint!(", Failed: {}", report.failures.len());
        }
        eprintln!(" (Total: {})", discovered.files.len());
    }

    if !report.failures.is_empty() {
        process::exit(1);
    }
}
