// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterizer — converts the source document's first page into a
// fixed-resolution raster image.
//
// PDF input renders through pdfium (behind the "pdfium" feature gate, since
// pdfium is an external native library); PNG/JPEG vouchers decode directly
// with the `image` crate. Multi-page input is truncated to page one — that is
// a documented limitation, not silent data loss, so it is logged.

use etikett_core::error::{EtikettError, Result};
use etikett_core::types::DocumentKind;
use image::RgbImage;
use tracing::{info, instrument};

/// The rasterized first page of the input document.
///
/// Immutable once built; every placement scales from this raster and must
/// preserve its aspect ratio.
#[derive(Debug, Clone)]
pub struct SourceVoucher {
    image: RgbImage,
}

impl SourceVoucher {
    /// Wrap an already-rasterized page.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// Pixel width of the rasterized page.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Pixel height of the rasterized page.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width / height ratio of the rasterized page.
    pub fn aspect_ratio(&self) -> f32 {
        self.image.width() as f32 / self.image.height() as f32
    }

    /// Borrow the underlying raster.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }
}

/// Rasterize the first page of a source document at the given resolution.
///
/// Only the first page is considered; additional pages are ignored with a
/// warning. Fails with [`EtikettError::UnreadableDocument`] when the bytes do
/// not decode as the claimed kind or the document has no pages.
#[instrument(skip(bytes), fields(kind = ?kind, dpi, bytes_len = bytes.len()))]
pub fn rasterize_first_page(bytes: &[u8], kind: DocumentKind, dpi: u32) -> Result<SourceVoucher> {
    if dpi == 0 {
        return Err(EtikettError::InvalidGeometry(
            "rasterization DPI must be positive".into(),
        ));
    }

    let image = match kind {
        DocumentKind::Pdf => rasterize_pdf(bytes, dpi)?,
        DocumentKind::Png | DocumentKind::Jpeg => {
            let decoded = image::load_from_memory(bytes).map_err(|err| {
                EtikettError::UnreadableDocument(format!("failed to decode image: {}", err))
            })?;
            decoded.to_rgb8()
        }
    };

    info!(
        width = image.width(),
        height = image.height(),
        "Source voucher rasterized"
    );
    Ok(SourceVoucher::from_rgb(image))
}

#[cfg(feature = "pdfium")]
fn rasterize_pdf(bytes: &[u8], dpi: u32) -> Result<RgbImage> {
    use pdfium_render::prelude::*;
    use tracing::{debug, warn};

    let bindings = Pdfium::bind_to_system_library().map_err(|err| {
        EtikettError::UnreadableDocument(format!("pdfium library unavailable: {:?}", err))
    })?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium.load_pdf_from_byte_slice(bytes, None).map_err(|err| {
        EtikettError::UnreadableDocument(format!("failed to open PDF: {:?}", err))
    })?;

    let page_count = u32::from(document.pages().len());
    if page_count == 0 {
        return Err(EtikettError::UnreadableDocument(
            "PDF has zero pages".into(),
        ));
    }
    if page_count > 1 {
        warn!(page_count, "Multi-page source; only page one is used");
    }

    let page = document.pages().first().map_err(|err| {
        EtikettError::UnreadableDocument(format!("cannot read first page: {:?}", err))
    })?;

    // Page size is in PDF points (1/72 inch); convert to target pixels.
    let width_px = (page.width().value / 72.0 * dpi as f32).round().max(1.0) as i32;
    let height_px = (page.height().value / 72.0 * dpi as f32).round().max(1.0) as i32;

    debug!(width_px, height_px, "Rendering PDF page");

    let render_config = PdfRenderConfig::new()
        .set_target_width(width_px)
        .set_maximum_height(height_px + 1);

    let bitmap = page.render_with_config(&render_config).map_err(|err| {
        EtikettError::UnreadableDocument(format!("PDF page render failed: {:?}", err))
    })?;

    Ok(bitmap.as_image().to_rgb8())
}

#[cfg(not(feature = "pdfium"))]
fn rasterize_pdf(_bytes: &[u8], _dpi: u32) -> Result<RgbImage> {
    Err(EtikettError::UnreadableDocument(
        "PDF rasterization requires the `pdfium` feature (and the pdfium native library)".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([180, 20, 20]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn png_voucher_keeps_dimensions() {
        let bytes = png_bytes(800, 400);
        let voucher = rasterize_first_page(&bytes, DocumentKind::Png, 300).unwrap();
        assert_eq!(voucher.width(), 800);
        assert_eq!(voucher.height(), 400);
        assert!((voucher.aspect_ratio() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let result = rasterize_first_page(b"not an image", DocumentKind::Png, 300);
        assert!(matches!(result, Err(EtikettError::UnreadableDocument(_))));
    }

    #[test]
    fn zero_dpi_is_invalid_geometry() {
        let bytes = png_bytes(10, 10);
        let result = rasterize_first_page(&bytes, DocumentKind::Png, 0);
        assert!(matches!(result, Err(EtikettError::InvalidGeometry(_))));
    }

    #[cfg(not(feature = "pdfium"))]
    #[test]
    fn pdf_without_pdfium_is_unreadable() {
        let result = rasterize_first_page(b"%PDF-1.5", DocumentKind::Pdf, 300);
        assert!(matches!(result, Err(EtikettError::UnreadableDocument(_))));
    }
}
