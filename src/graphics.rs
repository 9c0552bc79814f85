use image::{imageops, GrayImage, Luma};
use rusttype::{point, Font, Scale};
use ar_reshaper::{ArabicReshaper, ReshaperConfig};
use unicode_bidi::BidiInfo;

use crate::glyphs::{glyph, ADVANCE, GLYPH_H};

pub const WHITE: Luma<u8> = Luma([255]);
pub const BLACK: Luma<u8> = Luma([0]);

fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Visual-order string: every RTL run reversed (Arabic ones reshaped first),
/// LTR runs untouched.
fn bidi_then_shape(text: &str, reshaper: &ArabicReshaper) -> String {
    let info = BidiInfo::new(text, None);
    let Some(para) = info.paragraphs.first() else {
        return String::new();
    };
    let (levels, ranges) = info.visual_runs(para, para.range.clone());

    // `levels` is per byte; a run's level is the level of its first byte
    let mut out = String::new();
    for range in ranges {
        let rtl = levels.get(range.start).is_some_and(|l| l.is_rtl());
        let slice = &text[range];
        if rtl {
            if slice.chars().any(is_arabic) {
                out.extend(reshaper.reshape(slice).chars().rev());
            } else {
                out.extend(slice.chars().rev());
            }
        } else {
            out.push_str(slice);
        }
    }
    out
}

/// Render one line with a TrueType font as a tight 1-bit image. Bold draws
/// a second pass one pixel to the right.
pub fn render_ttf_line(text: &str, font: &Font<'_>, font_px: f32, bold: bool) -> GrayImage {
    let reshaper = ArabicReshaper::new(ReshaperConfig::default());
    let visual = bidi_then_shape(text, &reshaper);

    let scale = Scale::uniform(font_px);
    let vm = font.v_metrics(scale);
    let ascent = vm.ascent.ceil();
    let line_h = (ascent - vm.descent.floor()).ceil().max(1.0) as u32;

    let pad = 1u32;
    let text_w = font
        .layout(&visual, scale, point(0.0, ascent))
        .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x))
        .max()
        .unwrap_or(0)
        .max(0) as u32;

    let w = text_w + pad * 2 + bold as u32;
    let mut img = GrayImage::from_pixel(w, line_h, WHITE);
    let passes: &[i32] = if bold { &[0, 1] } else { &[0] };

    for &dx in passes {
        for g in font.layout(&visual, scale, point(pad as f32 + dx as f32, ascent)) {
            if let Some(bb) = g.pixel_bounding_box() {
                g.draw(|x, y, v| {
                    if v > 0.5 {
                        let px = x as i32 + bb.min.x;
                        let py = y as i32 + bb.min.y;
                        if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < line_h {
                            img.put_pixel(px as u32, py as u32, BLACK);
                        }
                    }
                });
            }
        }
    }
    img
}

/// Integer magnification of the 5x7 font that best matches `font_px`.
pub fn bitmap_scale(font_px: f64) -> u32 {
    (font_px / (GLYPH_H + 1) as f64).round().max(1.0) as u32
}

/// Render ASCII text with the built-in bitmap font.
pub fn render_bitmap_line(text: &str, scale: u32, bold: bool) -> GrayImage {
    let chars = text.chars().count() as u32;
    let w = (chars * ADVANCE * scale).max(1) + bold as u32;
    let h = GLYPH_H * scale;
    let mut img = GrayImage::from_pixel(w, h, WHITE);

    for (i, ch) in text.chars().enumerate() {
        let x0 = i as u32 * ADVANCE * scale;
        for (col, bits) in glyph(ch).iter().enumerate() {
            for row in 0..GLYPH_H {
                if bits & (1u8 << row) == 0 {
                    continue;
                }
                let px = x0 + col as u32 * scale;
                let py = row * scale;
                for dy in 0..scale {
                    for dx in 0..scale + bold as u32 {
                        img.put_pixel(px + dx, py + dy, BLACK);
                    }
                }
            }
        }
    }
    img
}

/// A text line in whichever face is available.
pub fn render_line(text: &str, font: Option<&Font<'_>>, font_px: f64, bold: bool) -> GrayImage {
    match font {
        Some(f) => render_ttf_line(text, f, font_px as f32, bold),
        None => render_bitmap_line(text, bitmap_scale(font_px), bold),
    }
}

/// Copy `src` onto `dst` at `(x, y)`, clipping at the edges.
pub fn blit(dst: &mut GrayImage, src: &GrayImage, x: u32, y: u32) {
    for (sx, sy, p) in src.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx < dst.width() && dy < dst.height() {
            dst.put_pixel(dx, dy, *p);
        }
    }
}

/// Copy `src` centred horizontally within `width` starting at `x0`.
pub fn blit_centered(dst: &mut GrayImage, src: &GrayImage, x0: u32, width: u32, y: u32) {
    let x = x0 + width.saturating_sub(src.width()) / 2;
    blit(dst, src, x, y);
}

/// One-pixel dashed frame around the whole image.
pub fn dashed_border(img: &mut GrayImage, gray: u8, dash: u32) {
    let (w, h) = img.dimensions();
    let on = |i: u32| (i / dash.max(1)) % 2 == 0;
    for x in (0..w).filter(|&x| on(x)) {
        img.put_pixel(x, 0, Luma([gray]));
        img.put_pixel(x, h - 1, Luma([gray]));
    }
    for y in (0..h).filter(|&y| on(y)) {
        img.put_pixel(0, y, Luma([gray]));
        img.put_pixel(w - 1, y, Luma([gray]));
    }
}

/// Shrink to fit `max_w` x `max_h` keeping aspect ratio; smaller images pass
/// through untouched.
pub fn fit_within(img: &GrayImage, max_w: u32, max_h: u32) -> GrayImage {
    let (w, h) = img.dimensions();
    if (w <= max_w && h <= max_h) || max_w == 0 || max_h == 0 {
        return img.clone();
    }
    let ratio = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let nw = ((w as f64 * ratio).floor() as u32).max(1);
    let nh = ((h as f64 * ratio).floor() as u32).max(1);
    imageops::resize(img, nw, nh, imageops::FilterType::Nearest)
}

/// Squash to at most `max_h` rows, leaving columns alone. Bars keep their
/// widths so a squashed barcode still scans.
pub fn fit_height(img: &GrayImage, max_h: u32) -> GrayImage {
    if img.height() <= max_h || max_h == 0 {
        return img.clone();
    }
    imageops::resize(img, img.width(), max_h, imageops::FilterType::Nearest)
}

/// Rotate 90 degrees clockwise.
pub fn rotate90(img: &GrayImage) -> GrayImage {
    imageops::rotate90(img)
}
