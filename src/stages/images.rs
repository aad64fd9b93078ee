// src/stages/images.rs

//! Top-level `img/*` compression.
//!
//! PNGs are palette-quantised and written as indexed PNG, JPEGs are
//! re-encoded progressively, SVGs lose comments and inter-tag whitespace.
//! Anything else is copied. A result that is not smaller than its input is
//! discarded in favour of the original bytes.

use anyhow::{anyhow, Context, Result};
use image::ImageFormat;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::StageError;

use super::select::{dest_rel, select_files};
use super::{StageContext, StageReport, StageResult};

pub const SOURCE_PATTERN: &str = "img/*";
pub const DEST_DIR: &str = "img";

const JPEG_QUALITY: u8 = 85;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageKind {
    Png,
    Jpeg,
    Svg,
    Other,
}

impl ImageKind {
    fn from_rel(rel: &str) -> Self {
        let ext = rel
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => ImageKind::Png,
            "jpg" | "jpeg" => ImageKind::Jpeg,
            "svg" => ImageKind::Svg,
            _ => ImageKind::Other,
        }
    }

    fn plugin(self) -> &'static str {
        match self {
            ImageKind::Png => "imagequant",
            ImageKind::Jpeg => "jpeg-encoder",
            ImageKind::Svg => "svg",
            ImageKind::Other => "images",
        }
    }
}

pub fn run(ctx: &StageContext) -> StageResult {
    let files = select_files(ctx.fs.as_ref(), ctx.paths.source_root(), SOURCE_PATTERN, None)
        .map_err(|e| StageError::from_anyhow("images", e))?;

    let mut report = StageReport::default();
    let mut saved = 0usize;
    for file in &files {
        let original = ctx
            .fs
            .read(&file.path)
            .map_err(|e| StageError::from_anyhow("images", e).in_file(file.rel.clone()))?;

        let kind = ImageKind::from_rel(&file.rel);
        let compressed = compress(kind, &original).map_err(|e| {
            StageError::from_anyhow(kind.plugin(), e).in_file(file.rel.clone())
        })?;

        let output = match compressed {
            Some(bytes) if bytes.len() < original.len() => bytes,
            _ => original.clone(),
        };
        saved += original.len() - output.len();
        debug!(file = %file.rel, original = original.len(), written = output.len(), "image processed");

        ctx.write_output(&mut report, "images", &dest_rel(DEST_DIR, &file.rel_to_base), &output)?;
    }

    info!(files = report.files_written(), saved_bytes = saved, "images compressed");
    Ok(report)
}

/// `Ok(None)` means "no compressor for this kind".
fn compress(kind: ImageKind, bytes: &[u8]) -> Result<Option<Vec<u8>>> {
    match kind {
        ImageKind::Png => compress_png(bytes).map(Some),
        ImageKind::Jpeg => compress_jpeg(bytes).map(Some),
        ImageKind::Svg => compress_svg(bytes).map(Some),
        ImageKind::Other => Ok(None),
    }
}

fn compress_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let rgba = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .context("decoding PNG")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<imagequant::RGBA> = rgba
        .pixels()
        .map(|p| imagequant::RGBA::new(p.0[0], p.0[1], p.0[2], p.0[3]))
        .collect();

    let mut liq = imagequant::new();
    liq.set_speed(4)?;
    liq.set_quality(0, 100)?;
    let mut img = liq.new_image(pixels, width as usize, height as usize, 0.0)?;
    let mut quantized = liq.quantize(&mut img)?;
    quantized.set_dithering_level(1.0)?;
    let (palette, indexed) = quantized.remapped(&mut img)?;

    let rgb_palette: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let alpha: Vec<u8> = palette.iter().map(|c| c.a).collect();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(rgb_palette);
        if alpha.iter().any(|&a| a != u8::MAX) {
            encoder.set_trns(alpha);
        }
        encoder.set_compression(png::Compression::Best);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&indexed)?;
        writer.finish()?;
    }
    Ok(out)
}

fn compress_jpeg(bytes: &[u8]) -> Result<Vec<u8>> {
    let rgb = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .context("decoding JPEG")?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let width = u16::try_from(width).map_err(|_| anyhow!("JPEG wider than 65535 px"))?;
    let height = u16::try_from(height).map_err(|_| anyhow!("JPEG taller than 65535 px"))?;

    let mut out = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut out, JPEG_QUALITY);
    encoder.set_progressive(true);
    encoder.encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)?;
    Ok(out)
}

/// Strip comments and whitespace between tags. Attributes (including
/// `viewBox`) are left untouched.
pub fn compress_svg(bytes: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(bytes).context("SVG is not valid UTF-8")?;
    let comment = Regex::new(r"(?s)<!--.*?-->")?;
    let gap = Regex::new(r">\s+<")?;

    let without_comments = comment.replace_all(text, "");
    let collapsed = gap.replace_all(&without_comments, "><");
    Ok(collapsed.trim().as_bytes().to_vec())
}
