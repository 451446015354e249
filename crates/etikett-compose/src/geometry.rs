// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Slot geometry model — the pixel rectangles of the three physical sticker
// slots on an A4 canvas.
//
// The physical sheet is 210mm × 297mm with three 210mm × 99mm slots stacked
// top-to-bottom, no gaps. In pixel space the slot boundaries sit at
// (i * height) / 3, so for canvas heights not divisible by three the bottom
// slot absorbs the ≤2px remainder and the union always covers [0, height).

use etikett_core::error::{EtikettError, Result};

/// Bounding rectangle of one slot in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SlotRect {
    /// First row below the rectangle.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Compute the three slot rectangles for a canvas, top-to-bottom.
///
/// Pure and deterministic: full canvas width, equal thirds of the height
/// (up to integer rounding), zero inter-slot gap.
pub fn slot_rects(canvas_width: u32, canvas_height: u32) -> Result<[SlotRect; 3]> {
    if canvas_width == 0 || canvas_height == 0 {
        return Err(EtikettError::InvalidGeometry(format!(
            "canvas must have positive dimensions, got {}x{}",
            canvas_width, canvas_height
        )));
    }

    let boundary = |i: u32| -> u32 { ((i as u64 * canvas_height as u64) / 3) as u32 };

    let mut rects = [SlotRect {
        x: 0,
        y: 0,
        width: canvas_width,
        height: 0,
    }; 3];

    for (i, rect) in rects.iter_mut().enumerate() {
        let top = boundary(i as u32);
        let bottom = boundary(i as u32 + 1);
        rect.y = top;
        rect.height = bottom - top;
    }

    Ok(rects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_full_height_without_gaps() {
        // Includes the A4@300DPI height (3508) and heights with remainders.
        for height in [3508, 3507, 702, 100, 99, 3, 7] {
            let rects = slot_rects(2480, height).unwrap();
            assert_eq!(rects[0].y, 0);
            assert_eq!(rects[0].bottom(), rects[1].y);
            assert_eq!(rects[1].bottom(), rects[2].y);
            assert_eq!(rects[2].bottom(), height);
            for rect in &rects {
                assert_eq!(rect.x, 0);
                assert_eq!(rect.width, 2480);
                // Equal thirds up to rounding.
                assert!((rect.height as i64 - height as i64 / 3).abs() <= 1);
            }
        }
    }

    #[test]
    fn a4_300dpi_slots_are_about_1169px() {
        let rects = slot_rects(2480, 3508).unwrap();
        assert_eq!(rects[0].height, 1169);
        assert_eq!(rects[1].height, 1169);
        assert_eq!(rects[2].height, 1170);
        assert_eq!(rects[1].y, 1169);
        assert_eq!(rects[2].y, 2338);
    }

    #[test]
    fn non_positive_dimensions_fail() {
        assert!(matches!(
            slot_rects(0, 3508),
            Err(EtikettError::InvalidGeometry(_))
        ));
        assert!(matches!(
            slot_rects(2480, 0),
            Err(EtikettError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            slot_rects(2480, 3508).unwrap(),
            slot_rects(2480, 3508).unwrap()
        );
    }
}
