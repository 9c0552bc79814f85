//! Placing finished label faces onto pages.

use image::{GrayImage, ImageError};

use crate::consts::{LABEL_MARGIN_IN, SHEET_H_IN, SHEET_MARGIN_IN, SHEET_W_IN};
use crate::geometry::{inches_to_px, ResolvedGeometry};
use crate::graphics::{blit, WHITE};
use crate::renderer::encode_png;

/// Page size and spacing, all in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub page_w: u32,
    pub page_h: u32,
    /// Unprintable border around the page.
    pub margin: u32,
    /// Space kept around each label.
    pub gutter: u32,
}

impl SheetLayout {
    /// US Letter sheet of stickers.
    pub fn letter(dpi: u32) -> Self {
        Self {
            page_w: inches_to_px(SHEET_W_IN, dpi),
            page_h: inches_to_px(SHEET_H_IN, dpi),
            margin: inches_to_px(SHEET_MARGIN_IN, dpi),
            gutter: inches_to_px(LABEL_MARGIN_IN, dpi),
        }
    }

    /// Label-maker stock: every label is its own page.
    pub fn roll(geometry: &ResolvedGeometry, dpi: u32) -> Self {
        Self {
            page_w: geometry.width_px(dpi),
            page_h: geometry.height_px(dpi),
            margin: 0,
            gutter: 0,
        }
    }

    fn usable(&self) -> (u32, u32) {
        (
            self.page_w.saturating_sub(2 * self.margin),
            self.page_h.saturating_sub(2 * self.margin),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,
    pub x: u32,
    pub y: u32,
}

/// Flow boxes left to right, top to bottom. A box that does not fit what
/// is left of the row wraps; one that does not fit what is left of the page
/// starts the next page. Boxes are never split.
pub fn flow(sizes: &[(u32, u32)], layout: &SheetLayout) -> Vec<Placement> {
    let (usable_w, usable_h) = layout.usable();
    let (mut page, mut x, mut y, mut row_h) = (0usize, 0u32, 0u32, 0u32);
    let mut out = Vec::with_capacity(sizes.len());

    for &(w, h) in sizes {
        let cell_w = w + 2 * layout.gutter;
        let cell_h = h + 2 * layout.gutter;

        if x > 0 && x + cell_w > usable_w {
            x = 0;
            y += row_h;
            row_h = 0;
        }
        if y > 0 && y + cell_h > usable_h {
            page += 1;
            x = 0;
            y = 0;
            row_h = 0;
        }
        if cell_w > usable_w || cell_h > usable_h {
            tracing::warn!(w, h, page, "label larger than the printable area; it will be clipped");
        }

        out.push(Placement {
            page,
            x: layout.margin + x + layout.gutter,
            y: layout.margin + y + layout.gutter,
        });
        x += cell_w;
        row_h = row_h.max(cell_h);
    }
    out
}

/// Rendered pages ready for a print sink.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintDocument {
    pub dpi: u32,
    pub pages: Vec<GrayImage>,
}

impl PrintDocument {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn to_png_pages(&self) -> Result<Vec<Vec<u8>>, ImageError> {
        self.pages.iter().map(encode_png).collect()
    }
}

pub fn paginate(faces: &[GrayImage], layout: &SheetLayout, dpi: u32) -> PrintDocument {
    let sizes: Vec<(u32, u32)> = faces.iter().map(|f| f.dimensions()).collect();
    let placements = flow(&sizes, layout);
    let page_count = placements.last().map_or(0, |p| p.page + 1);

    let mut pages = vec![GrayImage::from_pixel(layout.page_w, layout.page_h, WHITE); page_count];
    for (face, at) in faces.iter().zip(&placements) {
        blit(&mut pages[at.page], face, at.x, at.y);
    }
    PrintDocument { dpi, pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SheetLayout {
        SheetLayout { page_w: 100, page_h: 100, margin: 5, gutter: 2 }
    }

    #[test]
    fn wraps_rows_then_pages() {
        // 40x40 boxes take 44x44 cells in a 90x90 area: two per row, two rows
        let placed = flow(&[(40, 40); 5], &sheet());
        assert_eq!(placed[0], Placement { page: 0, x: 7, y: 7 });
        assert_eq!(placed[1], Placement { page: 0, x: 51, y: 7 });
        assert_eq!(placed[2], Placement { page: 0, x: 7, y: 51 });
        assert_eq!(placed[3], Placement { page: 0, x: 51, y: 51 });
        assert_eq!(placed[4], Placement { page: 1, x: 7, y: 7 });
    }

    #[test]
    fn never_splits_a_label() {
        let layout = SheetLayout::letter(203);
        let sizes = vec![(609, 406), (406, 254), (305, 203), (1015, 812), (457, 711)];
        let all: Vec<(u32, u32)> = sizes.iter().cycle().take(40).copied().collect();
        for (p, (w, h)) in flow(&all, &layout).iter().zip(&all) {
            assert!(p.x + w <= layout.page_w - layout.margin, "{p:?}");
            assert!(p.y + h <= layout.page_h - layout.margin, "{p:?}");
        }
    }

    #[test]
    fn roll_puts_one_label_per_page() {
        let g = ResolvedGeometry { width_in: 3.5, height_in: 1.125, rotation_degrees: 0 };
        let layout = SheetLayout::roll(&g, 203);
        let faces = vec![GrayImage::from_pixel(g.width_px(203), g.height_px(203), WHITE); 3];
        let doc = paginate(&faces, &layout, 203);
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.pages[0].dimensions(), (711, 228));
    }

    #[test]
    fn empty_input_has_no_pages() {
        let doc = paginate(&[], &SheetLayout::letter(96), 96);
        assert!(doc.is_empty());
    }
}
