use std::path::PathBuf;
use std::process;

use clap::Parser;
use rayon::prelude::*;

use imprint::{
    apply_text_watermark_with_font, discover_inputs, export_image, load_font, prepare_output_dir,
    ExportOptions, GridPosition, NamingMode, OutputFormat, ResizeMode, TextWatermarkOptions,
};

/// Named colors accepted by `--color`, alongside raw `R,G,B` triples.
const COLOR_NAMES: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("purple", [128, 0, 128]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

fn parse_color(s: &str) -> Result<[u8; 3], String> {
    let lower = s.to_lowercase();
    if let Some((_, rgb)) = COLOR_NAMES.iter().find(|(name, _)| *name == lower) {
        return Ok(*rgb);
    }
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() == 3 {
        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<i32>()
                .map(|v| v.clamp(0, 255))
                .map_err(|_| format!("invalid color component: {part}"))?
                .try_into()
                .unwrap_or(255);
        }
        return Ok(rgb);
    }
    Err(format!("expected a color name or R,G,B triple, got: {s}"))
}

#[derive(Parser)]
#[command(
    name = "imprint",
    about = "Apply a text watermark to images and export the results",
    version,
    after_help = "Simple usage: imprint ./photos -o ./out --text \"(c) 2026 Example\"\n\n\
                  Inputs may be files or folders; folders are walked recursively."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out: PathBuf,

    /// Watermark text
    #[arg(short, long)]
    text: String,

    /// Font size in pixels
    #[arg(long, default_value = "24")]
    font_size: u32,

    /// Font name or path (falls back to common system fonts)
    #[arg(long)]
    font: Option<String>,

    /// Text color: a name (white, red, ...) or an R,G,B triple
    #[arg(short, long, default_value = "white", value_parser = parse_color)]
    color: [u8; 3],

    /// Opacity percentage (0-100)
    #[arg(long, default_value = "100")]
    opacity: i32,

    /// Watermark position on the nine-grid
    #[arg(short, long, value_enum, default_value_t = GridPosition::BottomRight)]
    position: GridPosition,

    /// Margin from the image edges in pixels
    #[arg(long, default_value = "20")]
    margin: u32,

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

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let watermark = TextWatermarkOptions {
        text: cli.text,
        font_size: cli.font_size,
        color: cli.color,
        opacity: cli.opacity,
        position: cli.position,
        margin: cli.margin,
        font: cli.font,
    };

    let export = ExportOptions {
        output_format: cli.format,
        naming_mode: cli.mode,
        prefix: cli.prefix,
        suffix: cli.suffix,
        jpeg_quality: cli.quality,
        resize_mode: cli.resize,
        resize_value: cli.resize_value,
        keep_aspect_ratio: !cli.no_keep_aspect,
        allow_overwrite_source: cli.allow_overwrite_source,
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
        if cli.verbose {
            eprintln!(
                "Watermark: \"{}\" at {} ({}px, opacity {}%)",
                watermark.text,
                watermark.position.label(),
                watermark.font_size,
                watermark.opacity
            );
        }
    }

    if let Err(e) = prepare_output_dir(&discovered.files, &export) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    // Resolve the font once; the batch reuses the face across threads.
    let font = load_font(watermark.font.as_deref());

    // Each file is processed independently; failures are reported and do
    // not stop the rest of the batch.
    let results: Vec<(PathBuf, imprint::Result<PathBuf>)> = discovered
        .files
        .par_iter()
        .map(|src| {
            let outcome = image::open(src)
                .map_err(imprint::Error::from)
                .and_then(|img| {
                    let marked = apply_text_watermark_with_font(&img, &watermark, &font);
                    export_image(&marked, src, &export)
                });
            (src.clone(), outcome)
        })
        .collect();

    let mut fail_count = 0u32;
    for (src, outcome) in &results {
        let name = src.file_name().map_or_else(
            || src.display().to_string(),
            |f| f.to_string_lossy().to_string(),
        );
        match outcome {
            Ok(dest) => {
                if !cli.quiet {
                    eprintln!("[OK] {name} -> {}", dest.display());
                }
            }
            Err(e) => {
                fail_count += 1;
                eprintln!("[FAIL] {name}: {e}");
            }
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        let ok = results.len() as u32 - fail_count;
        eprint!("[Summary] Exported: {ok}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_resolve() {
        assert_eq!(parse_color("white").unwrap(), [255, 255, 255]);
        assert_eq!(parse_color("RED").unwrap(), [255, 0, 0]);
        assert_eq!(parse_color("grey").unwrap(), [128, 128, 128]);
    }

    #[test]
    fn rgb_triples_parse_and_clamp() {
        assert_eq!(parse_color("10, 20,30").unwrap(), [10, 20, 30]);
        assert_eq!(parse_color("300,-5,255").unwrap(), [255, 0, 255]);
    }

    #[test]
    fn malformed_colors_are_rejected() {
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("fuchsia").is_err());
        assert!(parse_color("a,b,c").is_err());
    }
}
