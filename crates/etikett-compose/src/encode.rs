// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document serializer — encodes a composed canvas as a single-page printable
// document using `printpdf` 0.8.
//
// The physical page is exact A4; the bitmap is placed with an explicit
// transform that spans the full page regardless of pixel rounding, so a
// printer at "100% scale" reproduces the modeled slot positions in
// millimetres exactly.

use std::path::Path;

use etikett_core::error::{EtikettError, Result};
use etikett_core::types::{A4_MM, OutputFormat};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::sheet::ComposedSheet;

/// Encode a composed sheet into the requested output format.
#[instrument(skip(sheet), fields(format = ?format, width = sheet.width(), height = sheet.height()))]
pub fn encode(sheet: &ComposedSheet, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Pdf => encode_pdf(sheet),
        OutputFormat::Png => encode_png(sheet),
    }
}

/// Encode a sheet and write it to a file.
///
/// Encoding happens fully in memory before the file is touched: either the
/// complete document is written, or nothing is.
pub fn write_sheet(
    sheet: &ComposedSheet,
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes = encode(sheet, format)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(
        path = %path.as_ref().display(),
        bytes = bytes.len(),
        "Sticker sheet written"
    );
    Ok(())
}

/// Single-page PDF at exact physical A4 dimensions.
fn encode_pdf(sheet: &ComposedSheet) -> Result<Vec<u8>> {
    let raw = RawImage {
        pixels: RawImageData::U8(sheet.as_rgb().as_raw().clone()),
        width: sheet.width() as usize,
        height: sheet.height() as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };

    let mut doc = PdfDocument::new("Etikett Sticker Sheet");
    let image_id = doc.add_image(&raw);

    let page_w = Mm(A4_MM.0);
    let page_h = Mm(A4_MM.1);

    // Native image size in points at the canvas DPI, then the exact scale
    // that makes the bitmap span the full page. The two are within a pixel's
    // rounding of each other; the explicit scale removes even that.
    let dpi = sheet.dpi() as f32;
    let image_w_pt = sheet.width() as f32 / dpi * 72.0;
    let image_h_pt = sheet.height() as f32 / dpi * 72.0;
    let scale_x = page_w.into_pt().0 / image_w_pt;
    let scale_y = page_h.into_pt().0 / image_h_pt;

    debug!(scale_x, scale_y, dpi, "Placing canvas full-bleed on A4 page");

    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            dpi: Some(dpi),
            rotate: None,
        },
    }];

    doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Raw PNG of the canvas (preview path — carries no physical size metadata,
/// so it is not suitable for 100%-scale printing).
fn encode_png(sheet: &ComposedSheet) -> Result<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    sheet
        .as_rgb()
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|err| EtikettError::Encoding(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{Placement, compose};
    use crate::raster::SourceVoucher;
    use etikett_core::ComposeConfig;
    use image::{Rgb, RgbImage};

    fn small_sheet() -> ComposedSheet {
        let voucher = SourceVoucher::from_rgb(RgbImage::from_pixel(200, 100, Rgb([10, 10, 10])));
        let config = ComposeConfig {
            dpi: 60,
            ..ComposeConfig::default()
        };
        compose(&Placement::AllFilled(&voucher), &config).unwrap()
    }

    /// Resolve the first page's MediaBox, following /Parent inheritance.
    fn media_box(doc: &lopdf::Document) -> Vec<f32> {
        let mut dict_id = *doc.get_pages().values().next().expect("no pages");
        loop {
            let dict = doc.get_dictionary(dict_id).expect("page dictionary");
            if let Ok(obj) = dict.get(b"MediaBox") {
                let arr = obj.as_array().expect("MediaBox array");
                return arr.iter().map(|o| o.as_float().unwrap()).collect();
            }
            match dict.get(b"Parent") {
                Ok(lopdf::Object::Reference(id)) => dict_id = *id,
                _ => panic!("no MediaBox on page or ancestors"),
            }
        }
    }

    #[test]
    fn pdf_output_is_a_single_a4_page() {
        let bytes = encode(&small_sheet(), OutputFormat::Pdf).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        // 210mm × 297mm in points, within a point of tolerance.
        let mb = media_box(&doc);
        assert_eq!(mb.len(), 4);
        assert!((mb[2] - mb[0] - 595.28).abs() < 1.0, "width {:?}", mb);
        assert!((mb[3] - mb[1] - 841.89).abs() < 1.0, "height {:?}", mb);
    }

    #[test]
    fn png_output_round_trips_canvas_dimensions() {
        let sheet = small_sheet();
        let bytes = encode(&sheet, OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), sheet.width());
        assert_eq!(decoded.height(), sheet.height());
    }

    #[test]
    fn write_sheet_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.pdf");
        write_sheet(&small_sheet(), OutputFormat::Pdf, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }
}
