// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// etikett-compose — Sticker-sheet composition engine.
//
// Pipeline: rasterize the source voucher's first page, derive the three slot
// rectangles for the A4 canvas, render scaled voucher copies into slots with
// optional decoration, assemble the full sheet with cut guides, and serialize
// it back to a printable document.

pub mod encode;
pub mod geometry;
pub mod raster;
pub mod sheet;
pub mod slot;

// Re-export the primary types so callers can use `etikett_compose::Placement` etc.
pub use geometry::{SlotRect, slot_rects};
pub use raster::{SourceVoucher, rasterize_first_page};
pub use sheet::{ComposedSheet, Placement, compose, compose_all_positions};
pub use slot::Decoration;
