// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Courier response envelope — the nested shape returned by the ACS endpoint.
//
// The voucher document lives at
// `ACSOutputResponce.ACSValueOutput[0].ACSObjectOutput.Voucher_Pdf`, with the
// voucher identifier as a sibling `Voucher_No` field. A same-named
// `ACSObjectOutput` field at the top level of `ACSOutputResponce` has always
// been observed empty; it is a decoy and is never read. All path knowledge
// is confined to `extract_voucher_document` so a future shape change touches
// exactly one place.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use etikett_core::error::{EtikettError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// Top-level ACS response.
#[derive(Debug, Clone, Deserialize)]
pub struct AcsResponse {
    #[serde(rename = "ACSExecution_HasError")]
    pub has_error: bool,
    #[serde(rename = "ACSExecutionErrorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "ACSOutputResponce", default)]
    pub output: Option<AcsOutput>,
}

/// The `ACSOutputResponce` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct AcsOutput {
    #[serde(rename = "ACSValueOutput", default)]
    pub value_output: Vec<AcsValueItem>,
    /// Decoy: same name as the nested payload holder, always empty in every
    /// observed response. Kept only so unexpected population can be logged.
    #[serde(rename = "ACSObjectOutput", default)]
    pub decoy_object_output: serde_json::Value,
    #[serde(rename = "ACSTableOutput", default)]
    pub table_output: serde_json::Value,
}

/// One `ACSValueOutput` item.
#[derive(Debug, Clone, Deserialize)]
pub struct AcsValueItem {
    #[serde(rename = "ACSObjectOutput", default)]
    pub object_output: Option<AcsVoucherObject>,
}

/// The nested object actually carrying the document payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AcsVoucherObject {
    #[serde(rename = "Voucher_No", default)]
    pub voucher_no: Option<String>,
    #[serde(rename = "Voucher_Pdf", default)]
    pub voucher_pdf: Option<String>,
}

/// A decoded voucher document together with its identifier.
#[derive(Debug, Clone)]
pub struct VoucherDocument {
    pub voucher_no: String,
    pub bytes: Vec<u8>,
}

/// Extract the voucher document from a parsed response envelope.
///
/// Returns `Ok(None)` when the payload field is present but empty — the
/// courier's normal "no document available" outcome. A missing nested path is
/// an [`EtikettError::EnvelopeShape`] error instead, since it means the
/// contract this module replicates no longer holds.
pub fn extract_voucher_document(response: &AcsResponse) -> Result<Option<VoucherDocument>> {
    if response.has_error {
        return Err(EtikettError::Api(
            response
                .error_message
                .clone()
                .unwrap_or_else(|| "courier reported an execution error".into()),
        ));
    }

    let output = response.output.as_ref().ok_or_else(|| {
        EtikettError::EnvelopeShape("response has no ACSOutputResponce".into())
    })?;

    if !is_empty_value(&output.decoy_object_output) {
        // Never observed populated; never trusted either. Log and move on.
        warn!("top-level ACSObjectOutput is unexpectedly non-empty; ignoring decoy field");
    }

    let item = output.value_output.first().ok_or_else(|| {
        EtikettError::EnvelopeShape("ACSValueOutput is empty".into())
    })?;

    let object = item.object_output.as_ref().ok_or_else(|| {
        EtikettError::EnvelopeShape("ACSValueOutput[0] has no nested ACSObjectOutput".into())
    })?;

    let payload = object.voucher_pdf.as_deref().ok_or_else(|| {
        EtikettError::EnvelopeShape("nested ACSObjectOutput has no Voucher_Pdf field".into())
    })?;

    if payload.is_empty() {
        debug!("Voucher_Pdf present but empty — no document available");
        return Ok(None);
    }

    let bytes = BASE64.decode(payload).map_err(|err| {
        EtikettError::EnvelopeShape(format!("Voucher_Pdf is not valid base64: {}", err))
    })?;

    let voucher_no = object.voucher_no.clone().unwrap_or_default();
    debug!(voucher_no = %voucher_no, bytes = bytes.len(), "Voucher document extracted");

    Ok(Some(VoucherDocument { voucher_no, bytes }))
}

fn is_empty_value(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}
