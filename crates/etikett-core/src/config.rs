// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition configuration.

use serde::{Deserialize, Serialize};

use crate::types::OutputFormat;

/// Explicit configuration for one composition run.
///
/// Passed down the pipeline instead of living in process-wide state, so two
/// invocations with different settings never interfere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Raster and output resolution in dots per inch.
    pub dpi: u32,
    /// Fraction of each slot dimension reserved as breathing room around the
    /// placed voucher (0.10 = the voucher fits within 90% of the slot).
    pub margin_ratio: f32,
    /// Serialization target for composed sheets.
    pub output_format: OutputFormat,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            margin_ratio: 0.10,
            output_format: OutputFormat::Pdf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_print_fidelity() {
        let config = ComposeConfig::default();
        assert_eq!(config.dpi, 300);
        assert!((config.margin_ratio - 0.10).abs() < f32::EPSILON);
        assert_eq!(config.output_format, OutputFormat::Pdf);
    }
}
