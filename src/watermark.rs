//! Text watermark rendering.
//!
//! Renders a text string onto a transparent overlay, places it with the
//! nine-grid calculator, and alpha-composites the overlay over the source
//! image. The input image is never mutated; callers get a new image in the
//! source's original color type.

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{ColorType, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::position::{compute_position, GridPosition};

/// DejaVu Sans, embedded as the last-resort font so rendering always has a
/// scalable face available.
static FALLBACK_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Well-known font locations tried when a named font is not a path, and as
/// the fallback chain when no font was requested.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/TTF",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:/Windows/Fonts",
];

/// Fallback font file names tried in order, first hit wins.
const SYSTEM_FONT_FILES: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
];

/// Options controlling text watermark rendering.
///
/// Opacity is interpreted as a 0-100 percentage and clamped when the
/// watermark is applied, not at construction; out-of-range values are
/// tolerated. An empty `text` or non-positive `opacity` makes
/// [`apply_text_watermark`] a no-op copy.
#[derive(Debug, Clone)]
pub struct TextWatermarkOptions {
    /// Watermark content. Empty means "render nothing".
    pub text: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// Text color as RGB.
    pub color: [u8; 3],
    /// Opacity percentage, semantically 0-100, clamped at use.
    pub opacity: i32,
    /// Nine-grid placement preset.
    pub position: GridPosition,
    /// Padding from the image edges in pixels.
    pub margin: u32,
    /// Font name or path. `None` uses the system fallback chain.
    pub font: Option<String>,
}

impl Default for TextWatermarkOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24,
            color: [255, 255, 255],
            opacity: 100,
            position: GridPosition::BottomRight,
            margin: 20,
            font: None,
        }
    }
}

/// Try to load a font from a single candidate file.
fn load_font_file(path: &Path) -> Option<FontArc> {
    let data = std::fs::read(path).ok()?;
    FontArc::try_from_vec(data).ok()
}

/// Resolve a caller-specified font name: first as a literal path, then as a
/// file name under the well-known font directories (with and without a
/// `.ttf` suffix).
fn resolve_named_font(name: &str) -> Option<FontArc> {
    let direct = Path::new(name);
    if direct.is_file() {
        if let Some(font) = load_font_file(direct) {
            return Some(font);
        }
    }
    for dir in SYSTEM_FONT_DIRS {
        let base = Path::new(dir);
        for candidate in [base.join(name), base.join(format!("{name}.ttf"))] {
            if candidate.is_file() {
                if let Some(font) = load_font_file(&candidate) {
                    return Some(font);
                }
            }
        }
    }
    None
}

/// Load a font for rendering, never failing.
///
/// Tries the requested font first, then the ordered system fallback list,
/// then the embedded DejaVu Sans. Load failures along the chain are
/// absorbed silently.
///
/// # Panics
///
/// Panics if the embedded fallback font cannot be parsed, which only
/// happens if the binary's data is corrupted.
#[must_use]
pub fn load_font(requested: Option<&str>) -> FontArc {
    if let Some(name) = requested {
        if let Some(font) = resolve_named_font(name) {
            return font;
        }
    }
    for dir in SYSTEM_FONT_DIRS {
        for file in SYSTEM_FONT_FILES {
            let candidate = Path::new(dir).join(file);
            if candidate.is_file() {
                if let Some(font) = load_font_file(&candidate) {
                    return font;
                }
            }
        }
    }
    FontArc::try_from_slice(FALLBACK_FONT).expect("embedded fallback font must parse")
}

/// Whether a named font can be resolved without falling back.
#[must_use]
pub fn is_font_available(name: &str) -> bool {
    resolve_named_font(name).is_some()
}

/// Measure the rendered bounding box of `text` at `font_size` pixels.
///
/// The exact box is font-metric dependent; with the same resolved font the
/// measurement is deterministic.
#[must_use]
pub fn text_dimensions(text: &str, font_size: u32, font: Option<&str>) -> (u32, u32) {
    let face = load_font(font);
    #[allow(clippy::cast_precision_loss)]
    let scale = PxScale::from(font_size as f32);
    text_size(scale, &face, text)
}

/// Convert an RGBA working image back to the source's color type.
fn restore_color_type(img: RgbaImage, original: ColorType) -> DynamicImage {
    let rgba = DynamicImage::ImageRgba8(img);
    match original {
        ColorType::L8 => DynamicImage::ImageLuma8(rgba.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(rgba.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(rgba.to_rgb8()),
        ColorType::L16 => DynamicImage::ImageLuma16(rgba.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(rgba.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(rgba.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(rgba.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(rgba.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(rgba.to_rgba32f()),
        _ => rgba,
    }
}

/// Render a text watermark onto a copy of the provided image.
///
/// A non-positive opacity or empty text returns an unmodified copy; callers
/// may construct options defensively without checking first. Otherwise the
/// text is drawn at `options.position` with
/// `alpha = round(255 * clamp(opacity, 0, 100) / 100)` and composited over
/// the image, and the result is converted back to the source color type.
#[must_use]
pub fn apply_text_watermark(image: &DynamicImage, options: &TextWatermarkOptions) -> DynamicImage {
    apply_text_watermark_with_font(image, options, &load_font(options.font.as_deref()))
}

/// Render a text watermark using an already-resolved font.
///
/// Identical to [`apply_text_watermark`] but skips font resolution, so
/// batch callers can [`load_font`] once and reuse the face across images;
/// `FontArc` is cheap to clone and share between threads.
#[must_use]
pub fn apply_text_watermark_with_font(
    image: &DynamicImage,
    options: &TextWatermarkOptions,
    font: &FontArc,
) -> DynamicImage {
    if options.opacity <= 0 || options.text.is_empty() {
        return image.clone();
    }

    let original_color = image.color();
    let mut base = image.to_rgba8();
    let mut overlay = RgbaImage::new(base.width(), base.height());

    #[allow(clippy::cast_precision_loss)]
    let scale = PxScale::from(options.font_size as f32);
    let (text_w, text_h) = text_size(scale, font, &options.text);

    let (x, y) = compute_position(
        base.width(),
        base.height(),
        text_w,
        text_h,
        options.position,
        options.margin,
    );

    let opacity = options.opacity.clamp(0, 100);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let alpha = (255.0 * f64::from(opacity) / 100.0).round() as u8;
    let [r, g, b] = options.color;

    #[allow(clippy::cast_possible_wrap)]
    let (draw_x, draw_y) = (x as i32, y as i32);
    draw_text_mut(
        &mut overlay,
        Rgba([r, g, b, alpha]),
        draw_x,
        draw_y,
        scale,
        font,
        &options.text,
    );

    image::imageops::overlay(&mut base, &overlay, 0, 0);
    restore_color_type(base, original_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_rgb(w: u32, h: u32, px: [u8; 3]) -> DynamicImage {
        let mut img = image::RgbImage::new(w, h);
        for p in img.pixels_mut() {
            *p = image::Rgb(px);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn zero_opacity_returns_identical_copy() {
        let img = solid_rgb(64, 48, [10, 20, 30]);
        let opts = TextWatermarkOptions {
            text: "Demo".to_string(),
            opacity: 0,
            ..TextWatermarkOptions::default()
        };
        let out = apply_text_watermark(&img, &opts);
        assert_eq!(img.as_bytes(), out.as_bytes());
    }

    #[test]
    fn negative_opacity_is_a_noop() {
        let img = solid_rgb(64, 48, [200, 0, 0]);
        let opts = TextWatermarkOptions {
            text: "Demo".to_string(),
            opacity: -5,
            ..TextWatermarkOptions::default()
        };
        let out = apply_text_watermark(&img, &opts);
        assert_eq!(img.as_bytes(), out.as_bytes());
    }

    #[test]
    fn empty_text_is_a_noop() {
        let img = solid_rgb(64, 48, [0, 0, 0]);
        let opts = TextWatermarkOptions::default();
        let out = apply_text_watermark(&img, &opts);
        assert_eq!(img.as_bytes(), out.as_bytes());
    }

    #[test]
    fn visible_watermark_changes_pixels() {
        let img = solid_rgb(200, 100, [0, 0, 0]);
        let opts = TextWatermarkOptions {
            text: "WM".to_string(),
            font_size: 32,
            ..TextWatermarkOptions::default()
        };
        let out = apply_text_watermark(&img, &opts);
        assert_ne!(img.as_bytes(), out.as_bytes());
    }

    #[test]
    fn result_keeps_dimensions_and_color_type() {
        let img = solid_rgb(123, 45, [5, 5, 5]);
        let opts = TextWatermarkOptions {
            text: "x".to_string(),
            ..TextWatermarkOptions::default()
        };
        let out = apply_text_watermark(&img, &opts);
        assert_eq!((out.width(), out.height()), (123, 45));
        assert_eq!(out.color(), ColorType::Rgb8);
    }

    #[test]
    fn rgba_input_stays_rgba() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(80, 60));
        let opts = TextWatermarkOptions {
            text: "a".to_string(),
            ..TextWatermarkOptions::default()
        };
        assert_eq!(apply_text_watermark(&img, &opts).color(), ColorType::Rgba8);
    }

    #[test]
    fn overdriven_opacity_clamps_to_full() {
        let img = solid_rgb(200, 100, [0, 0, 0]);
        let full = TextWatermarkOptions {
            text: "WM".to_string(),
            font_size: 32,
            opacity: 100,
            ..TextWatermarkOptions::default()
        };
        let over = TextWatermarkOptions {
            opacity: 250,
            ..full.clone()
        };
        assert_eq!(
            apply_text_watermark(&img, &full).as_bytes(),
            apply_text_watermark(&img, &over).as_bytes()
        );
    }

    #[test]
    fn unknown_font_falls_back_silently() {
        let img = solid_rgb(200, 100, [0, 0, 0]);
        let opts = TextWatermarkOptions {
            text: "WM".to_string(),
            font_size: 32,
            font: Some("no-such-font-family".to_string()),
            ..TextWatermarkOptions::default()
        };
        let out = apply_text_watermark(&img, &opts);
        assert_ne!(img.as_bytes(), out.as_bytes());
    }

    #[test]
    fn preloaded_font_matches_per_call_resolution() {
        let img = solid_rgb(200, 100, [0, 0, 0]);
        let opts = TextWatermarkOptions {
            text: "WM".to_string(),
            font_size: 32,
            ..TextWatermarkOptions::default()
        };
        let font = load_font(opts.font.as_deref());
        assert_eq!(
            apply_text_watermark(&img, &opts).as_bytes(),
            apply_text_watermark_with_font(&img, &opts, &font).as_bytes()
        );
    }

    #[test]
    fn unknown_font_is_not_available() {
        assert!(!is_font_available("no-such-font-family"));
    }

    #[test]
    fn text_dimensions_are_positive_and_grow() {
        let (w1, h1) = text_dimensions("W", 24, None);
        let (w2, _) = text_dimensions("WWWW", 24, None);
        assert!(w1 > 0 && h1 > 0);
        assert!(w2 > w1);
    }

    #[test]
    fn default_options_match_documented_defaults() {
        let opts = TextWatermarkOptions::default();
        assert_eq!(opts.font_size, 24);
        assert_eq!(opts.color, [255, 255, 255]);
        assert_eq!(opts.opacity, 100);
        assert_eq!(opts.position, GridPosition::BottomRight);
        assert_eq!(opts.margin, 20);
        assert!(opts.font.is_none());
    }
}
