// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet composer — assembles a full A4 canvas from rendered slots plus the
// dashed cut-guide lines at the two slot boundaries.

use etikett_core::ComposeConfig;
use etikett_core::error::Result;
use etikett_core::types::{A4_MM, Slot};
use image::{Rgb, RgbImage};
use tracing::{info, instrument};

use crate::geometry::slot_rects;
use crate::raster::SourceVoucher;
use crate::slot::{Decoration, render_slot};

/// Cut-guide color (light gray, visible but unobtrusive after printing).
const GUIDE_COLOR: Rgb<u8> = Rgb([200, 200, 200]);

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Assignment of voucher content to the three slots for one composition.
#[derive(Debug, Clone, Copy)]
pub enum Placement<'a> {
    /// Identical copies of the voucher in all three slots (replicate mode).
    /// No slot is singled out, so no borders or labels are drawn.
    AllFilled(&'a SourceVoucher),
    /// Content in exactly one slot; the active slot carries a border and
    /// label, the blank slots a label only, so the operator can tell at a
    /// glance which position will print.
    SingleFilled(Slot, &'a SourceVoucher),
}

/// The composed A4 raster canvas, ready for serialization.
#[derive(Debug, Clone)]
pub struct ComposedSheet {
    canvas: RgbImage,
    dpi: u32,
}

impl ComposedSheet {
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Resolution the canvas was composed at; the serializer must embed a
    /// physical size that agrees with it.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.canvas
    }
}

/// A4 canvas size in pixels at the given resolution (2480×3508 at 300 DPI).
pub fn canvas_size(dpi: u32) -> (u32, u32) {
    let width = (A4_MM.0 / 25.4 * dpi as f32).round() as u32;
    let height = (A4_MM.1 / 25.4 * dpi as f32).round() as u32;
    (width, height)
}

/// Compose one sticker sheet from a placement.
///
/// Deterministic for a given placement and configuration: composing twice
/// yields pixel-identical canvases.
#[instrument(skip(placement, config), fields(dpi = config.dpi))]
pub fn compose(placement: &Placement<'_>, config: &ComposeConfig) -> Result<ComposedSheet> {
    let (width, height) = canvas_size(config.dpi);
    let rects = slot_rects(width, height)?;

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for slot in Slot::ALL {
        let rect = &rects[slot.index()];
        let (content, decoration) = match placement {
            Placement::AllFilled(voucher) => (Some(*voucher), Decoration::default()),
            Placement::SingleFilled(active, voucher) if *active == slot => (
                Some(*voucher),
                Decoration {
                    border: true,
                    label: true,
                },
            ),
            Placement::SingleFilled(..) => (
                None,
                Decoration {
                    border: false,
                    label: true,
                },
            ),
        };
        render_slot(&mut canvas, rect, slot, content, decoration, config.margin_ratio)?;
    }

    // Cut guides go on top, at the two slot boundaries, in both modes.
    draw_cut_guides(&mut canvas, rects[1].y, rects[2].y);

    info!(width, height, "Sheet composed");
    Ok(ComposedSheet {
        canvas,
        dpi: config.dpi,
    })
}

/// Batch driver for selective "all" mode: one independent `SingleFilled`
/// sheet per slot.
///
/// The three compositions share no mutable state; one slot's failure leaves
/// the other two untouched, so each outcome is reported separately.
pub fn compose_all_positions(
    voucher: &SourceVoucher,
    config: &ComposeConfig,
) -> [(Slot, Result<ComposedSheet>); 3] {
    Slot::ALL.map(|slot| {
        let sheet = compose(&Placement::SingleFilled(slot, voucher), config);
        (slot, sheet)
    })
}

/// Dashed horizontal lines spanning the canvas width at the given rows.
///
/// Dash rhythm and line weight scale with resolution (10px on / 10px off,
/// 2px wide at 300 DPI).
fn draw_cut_guides(canvas: &mut RgbImage, first_boundary: u32, second_boundary: u32) {
    let width = canvas.width();
    let height = canvas.height();
    let dash = (width / 248).max(2);
    let weight = (height / 1754).max(1);

    for boundary in [first_boundary, second_boundary] {
        for row in boundary..(boundary + weight).min(height) {
            let mut x = 0;
            while x < width {
                for dx in 0..dash.min(width - x) {
                    canvas.put_pixel(x + dx, row, GUIDE_COLOR);
                }
                x += dash * 2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([200, 0, 0]);

    fn test_config() -> ComposeConfig {
        // 60 DPI keeps the canvases small (496×702) while staying A4-shaped.
        ComposeConfig {
            dpi: 60,
            ..ComposeConfig::default()
        }
    }

    fn voucher() -> SourceVoucher {
        SourceVoucher::from_rgb(RgbImage::from_pixel(200, 100, RED))
    }

    fn slot_center(sheet: &ComposedSheet, slot: Slot) -> Rgb<u8> {
        let rects = slot_rects(sheet.width(), sheet.height()).unwrap();
        let rect = rects[slot.index()];
        *sheet
            .as_rgb()
            .get_pixel(rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    #[test]
    fn canvas_size_matches_a4_at_300dpi() {
        assert_eq!(canvas_size(300), (2480, 3508));
    }

    #[test]
    fn all_filled_puts_content_in_every_slot() {
        let v = voucher();
        let sheet = compose(&Placement::AllFilled(&v), &test_config()).unwrap();
        for slot in Slot::ALL {
            assert_eq!(slot_center(&sheet, slot), RED);
        }
    }

    #[test]
    fn single_filled_is_exclusive_to_the_active_slot() {
        let v = voucher();
        let sheet =
            compose(&Placement::SingleFilled(Slot::Middle, &v), &test_config()).unwrap();
        assert_eq!(slot_center(&sheet, Slot::Middle), RED);
        assert_eq!(slot_center(&sheet, Slot::Top), BACKGROUND);
        assert_eq!(slot_center(&sheet, Slot::Bottom), BACKGROUND);
    }

    #[test]
    fn active_slot_carries_the_border_and_blank_slots_do_not() {
        let v = voucher();
        let sheet =
            compose(&Placement::SingleFilled(Slot::Middle, &v), &test_config()).unwrap();
        let rects = slot_rects(sheet.width(), sheet.height()).unwrap();

        // Probe each slot's border track: the inset corner pixel.
        let probe = |slot: Slot| {
            let rect = rects[slot.index()];
            let inset = ((rect.width as f32 * 0.004).round() as u32).max(2);
            *sheet.as_rgb().get_pixel(rect.x + inset, rect.y + inset)
        };

        assert_eq!(probe(Slot::Middle), crate::slot::DECOR_COLOR);
        assert_ne!(probe(Slot::Top), crate::slot::DECOR_COLOR);
        assert_ne!(probe(Slot::Bottom), crate::slot::DECOR_COLOR);
    }

    #[test]
    fn replicate_mode_draws_no_borders() {
        let v = voucher();
        let sheet = compose(&Placement::AllFilled(&v), &test_config()).unwrap();
        let rects = slot_rects(sheet.width(), sheet.height()).unwrap();
        for rect in rects {
            let inset = ((rect.width as f32 * 0.004).round() as u32).max(2);
            assert_ne!(
                *sheet.as_rgb().get_pixel(rect.x + inset, rect.y + inset),
                crate::slot::DECOR_COLOR
            );
        }
    }

    #[test]
    fn cut_guides_are_identical_across_placements() {
        let v = voucher();
        let config = test_config();
        let all = compose(&Placement::AllFilled(&v), &config).unwrap();
        let single = compose(&Placement::SingleFilled(Slot::Top, &v), &config).unwrap();

        let rects = slot_rects(all.width(), all.height()).unwrap();
        for boundary in [rects[1].y, rects[2].y] {
            for x in 0..all.width() {
                assert_eq!(
                    all.as_rgb().get_pixel(x, boundary),
                    single.as_rgb().get_pixel(x, boundary),
                    "cut guide differs at x={} y={}",
                    x,
                    boundary
                );
            }
        }
        // And the guide actually exists: the first dash pixel is gray.
        assert_eq!(*all.as_rgb().get_pixel(0, rects[1].y), GUIDE_COLOR);
    }

    #[test]
    fn composition_is_idempotent() {
        let v = voucher();
        let config = test_config();
        let first = compose(&Placement::SingleFilled(Slot::Bottom, &v), &config).unwrap();
        let second = compose(&Placement::SingleFilled(Slot::Bottom, &v), &config).unwrap();
        assert_eq!(first.as_rgb().as_raw(), second.as_rgb().as_raw());
    }

    #[test]
    fn batch_driver_produces_one_sheet_per_slot() {
        let v = voucher();
        let results = compose_all_positions(&v, &test_config());
        assert_eq!(results.len(), 3);
        for (slot, outcome) in results {
            let sheet = outcome.unwrap();
            // Exactly the designated slot is filled.
            for probe in Slot::ALL {
                if probe == slot {
                    assert_eq!(slot_center(&sheet, probe), RED);
                } else {
                    assert_eq!(slot_center(&sheet, probe), BACKGROUND);
                }
            }
        }
    }
}
