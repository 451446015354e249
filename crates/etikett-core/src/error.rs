// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Etikett.

use thiserror::Error;

/// Top-level error type for all Etikett operations.
#[derive(Debug, Error)]
pub enum EtikettError {
    // -- Composition errors --
    /// The source byte stream is not a valid page-based document, or it has
    /// zero pages. Multi-page input is not an error — only page one is used.
    #[error("unreadable source document: {0}")]
    UnreadableDocument(String),

    /// Non-positive canvas or slot dimensions. Unreachable through the CLI;
    /// seeing this indicates a defect in the caller.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The composed canvas could not be serialized to the requested format.
    #[error("document encoding failed: {0}")]
    Encoding(String),

    // -- Courier errors --
    /// The response envelope did not contain the payload at the expected
    /// nested path. Distinct from a successful-but-empty payload, which is a
    /// normal "not found" outcome and not an error.
    #[error("courier envelope shape mismatch: {0}")]
    EnvelopeShape(String),

    /// The courier endpoint rejected the request or reported an execution
    /// error of its own.
    #[error("courier API error: {0}")]
    Api(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EtikettError>;
