// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// etikett-courier — ACS courier REST API collaborator.
//
// The envelope module owns the one brittle external contract in the system:
// the nested response shape carrying the base64 voucher document. The client
// module is a thin async wrapper over the single-endpoint request format.

pub mod client;
pub mod envelope;

pub use client::{CourierClient, CourierConfig, CourierCredentials, PrintType};
pub use envelope::{AcsResponse, VoucherDocument, extract_voucher_document};
