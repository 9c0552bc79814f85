use image::GrayImage;

use crate::consts::{DARKNESS, INVERT_BITS, SPEED};
use crate::page::PrintDocument;

/// Append an EPL ASCII command line terminated with CRLF
pub fn epl_line(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

/// Pack a gray image into 1-bit rows, MSB first, dark pixels set.
/// Returns (bytes per row, height, rows)
pub fn image_to_row_bytes(img: &GrayImage) -> (u32, u32, Vec<u8>) {
    let (w, h) = img.dimensions();
    let bpr = (w + 7) / 8;
    let mut out = vec![0u8; (bpr * h) as usize];

    for (x, y, p) in img.enumerate_pixels() {
        if p.0[0] < 128 {
            let i = (y * bpr + x / 8) as usize;
            out[i] |= 1 << (7 - (x % 8));
        }
    }
    if INVERT_BITS {
        for b in &mut out {
            *b = !*b;
        }
    }
    (bpr, h, out)
}

/// Append GW header + raw binary rows + CRLF
pub fn gw_bytes(buf: &mut Vec<u8>, x: u32, y: u32, img: &GrayImage) {
    let (bpr, h, rows) = image_to_row_bytes(img);
    epl_line(buf, &format!("GW{},{},{},{}", x, y, bpr, h));
    buf.extend_from_slice(&rows);
    buf.extend_from_slice(b"\r\n");
}

/// One EPL2 form per page: clear, size, darkness, speed, bitmap, print once.
pub fn document_to_epl(doc: &PrintDocument) -> Vec<u8> {
    let mut buf = Vec::new();
    for page in &doc.pages {
        epl_line(&mut buf, "N");
        epl_line(&mut buf, &format!("q{}", page.width()));
        epl_line(&mut buf, &format!("Q{},{}", page.height(), 24));
        epl_line(&mut buf, &format!("D{}", DARKNESS));
        epl_line(&mut buf, &format!("S{}", SPEED));
        gw_bytes(&mut buf, 0, 0, page);
        epl_line(&mut buf, "P1");
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn packs_rows_msb_first() {
        let mut img = GrayImage::from_pixel(10, 2, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(9, 1, Luma([0]));
        let (bpr, h, rows) = image_to_row_bytes(&img);
        assert_eq!((bpr, h), (2, 2));
        let raw: Vec<u8> = if INVERT_BITS { rows.iter().map(|b| !b).collect() } else { rows };
        assert_eq!(raw, [0b1000_0000, 0, 0, 0b0100_0000]);
    }

    #[test]
    fn one_form_per_page() {
        let page = GrayImage::from_pixel(16, 3, Luma([255]));
        let doc = PrintDocument { dpi: 203, pages: vec![page.clone(), page] };
        let job = document_to_epl(&doc);

        let header = b"N\r\nq16\r\nQ3,24\r\nD8\r\nS2\r\nGW0,0,2,3\r\n";
        assert!(job.starts_with(header));
        let form_len = header.len() + 2 * 3 + 2 + b"P1\r\n".len();
        assert_eq!(job.len(), form_len * 2);
        assert!(job.ends_with(b"\r\nP1\r\n"));
    }
}
