// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Etikett sticker-sheet composer.

use serde::{Deserialize, Serialize};

/// One of the three fixed physical regions on a pre-cut A4 sticker sheet.
///
/// Each slot is 210mm × 99mm; the sheet stacks them top-to-bottom with no
/// gaps. The CLI parses raw integers 1–3 at the boundary and converts
/// immediately, so illegal slot values are unrepresentable past that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Top,
    Middle,
    Bottom,
}

impl Slot {
    /// All slots in top-to-bottom sheet order.
    pub const ALL: [Slot; 3] = [Slot::Top, Slot::Middle, Slot::Bottom];

    /// 1-based ordinal as printed on the physical sheet (1=top, 3=bottom).
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Top => 1,
            Self::Middle => 2,
            Self::Bottom => 3,
        }
    }

    /// 0-based index into the top-to-bottom slot rectangle sequence.
    pub fn index(&self) -> usize {
        (self.ordinal() - 1) as usize
    }

    /// Parse the 1-based ordinal used on the CLI and in the courier API's
    /// `Start_Position` parameter.
    pub fn from_ordinal(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Top),
            2 => Some(Self::Middle),
            3 => Some(Self::Bottom),
            _ => None,
        }
    }

    /// Uppercase display name used for the position label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Middle => "MIDDLE",
            Self::Bottom => "BOTTOM",
        }
    }

    /// Lowercase name used in output file names.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Serialization target for the composed sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Single-page PDF sized to exact physical A4 (the print path).
    Pdf,
    /// Raw PNG of the composed canvas (inspection / preview path).
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }
}

/// Supported source document kinds for rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentKind {
    /// Infer document kind from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// A4 page dimensions in millimetres (width, height).
pub const A4_MM: (f32, f32) = (210.0, 297.0);

/// Height of one sticker slot in millimetres (a third of the A4 page).
pub const SLOT_HEIGHT_MM: f32 = 99.0;
