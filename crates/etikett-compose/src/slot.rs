// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Slot renderer — draws a scaled voucher copy into one slot rectangle of a
// shared canvas, centered and aspect-preserving, with optional border and
// position-label decoration.

use std::sync::OnceLock;

use ab_glyph::{FontVec, PxScale};
use etikett_core::error::Result;
use etikett_core::types::Slot;
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::geometry::SlotRect;
use crate::raster::SourceVoucher;

/// Border and label color for the active slot (the one that will print).
pub const DECOR_COLOR: Rgb<u8> = Rgb([100, 100, 255]);

/// Visual decoration applied to a slot region.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoration {
    /// Draw an inset rectangular border marking this as the active slot.
    pub border: bool,
    /// Render a "POSITION: TOP|MIDDLE|BOTTOM" label near the slot's top edge.
    pub label: bool,
}

/// Largest size that fits the voucher into the slot's content area.
///
/// The content area is `1 - margin_ratio` of each slot dimension; the scale
/// factor is the same on both axes, so the source aspect ratio is preserved
/// exactly (up to 1px rounding).
pub fn fitted_size(
    voucher_width: u32,
    voucher_height: u32,
    rect: &SlotRect,
    margin_ratio: f32,
) -> (u32, u32) {
    let scale_x = rect.width as f32 / voucher_width as f32;
    let scale_y = rect.height as f32 / voucher_height as f32;
    let scale = scale_x.min(scale_y) * (1.0 - margin_ratio);

    let width = (voucher_width as f32 * scale).round().max(1.0) as u32;
    let height = (voucher_height as f32 * scale).round().max(1.0) as u32;
    (width, height)
}

/// Draw one slot of the sheet: scaled centered content (if any) plus the
/// requested decoration.
pub fn render_slot(
    canvas: &mut RgbImage,
    rect: &SlotRect,
    slot: Slot,
    content: Option<&SourceVoucher>,
    decoration: Decoration,
    margin_ratio: f32,
) -> Result<()> {
    if let Some(voucher) = content {
        let (width, height) = fitted_size(voucher.width(), voucher.height(), rect, margin_ratio);
        let scaled = imageops::resize(
            voucher.as_rgb(),
            width,
            height,
            imageops::FilterType::Lanczos3,
        );

        // Center within the slot on both axes.
        let x = rect.x + (rect.width.saturating_sub(width)) / 2;
        let y = rect.y + (rect.height.saturating_sub(height)) / 2;

        debug!(slot = %slot, width, height, x, y, "Placing voucher in slot");
        imageops::replace(canvas, &scaled, i64::from(x), i64::from(y));
    }

    if decoration.border {
        draw_border(canvas, rect);
    }
    if decoration.label {
        draw_label(canvas, rect, slot);
    }

    Ok(())
}

// -- Decoration ---------------------------------------------------------------

/// Border inset from the slot boundary, proportional to slot width
/// (≈10px on an A4 canvas at 300 DPI).
fn border_inset(rect: &SlotRect) -> u32 {
    ((rect.width as f32 * 0.004).round() as u32).max(2)
}

fn draw_border(canvas: &mut RgbImage, rect: &SlotRect) {
    let inset = border_inset(rect);
    let thickness = ((rect.width as f32 * 0.0012).round() as u32).max(1);

    for t in 0..thickness {
        let offset = inset + t;
        if rect.width <= 2 * offset || rect.height <= 2 * offset {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at((rect.x + offset) as i32, (rect.y + offset) as i32)
                .of_size(rect.width - 2 * offset, rect.height - 2 * offset),
            DECOR_COLOR,
        );
    }
}

fn draw_label(canvas: &mut RgbImage, rect: &SlotRect, slot: Slot) {
    let Some(font) = label_font() else {
        warn!(slot = %slot, "No label font found on this system; skipping position label");
        return;
    };

    // ≈40px text, 50px/30px offsets on a 300 DPI canvas, scaled with the slot.
    let size = (rect.height as f32 * 0.034).max(12.0);
    let x = rect.x + border_inset(rect) * 5;
    let y = rect.y + border_inset(rect) * 3;

    draw_text_mut(
        canvas,
        DECOR_COLOR,
        x as i32,
        y as i32,
        PxScale::from(size),
        font,
        &format!("POSITION: {}", slot.label()),
    );
}

/// Lazily loaded label font, looked up from common system locations.
///
/// The label is a visual aid only, so a missing font degrades to a warning
/// rather than an error.
fn label_font() -> Option<&'static FontVec> {
    static FONT: OnceLock<Option<FontVec>> = OnceLock::new();
    FONT.get_or_init(|| {
        const CANDIDATES: [&str; 4] = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        ];
        CANDIDATES
            .iter()
            .find_map(|path| std::fs::read(path).ok())
            .and_then(|bytes| FontVec::try_from_vec(bytes).ok())
    })
    .as_ref()
}
