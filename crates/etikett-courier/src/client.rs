// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ACS courier REST client — single endpoint, `{ACSAlias, ACSInputParameters}`
// request bodies, API key in the `AcsApiKey` header. The documented rate
// limit is 10 calls/sec, so consecutive calls are spaced at least 100ms
// apart.

use std::time::{Duration, Instant};

use etikett_core::error::{EtikettError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::envelope::{AcsResponse, VoucherDocument, extract_voucher_document};

/// Production endpoint; every method is a POST to this one URL.
pub const DEFAULT_BASE_URL: &str =
    "https://webservices.acscourier.net/ACSRestServices/api/ACSAutoRest";

const API_KEY_HEADER: &str = "AcsApiKey";
const MIN_CALL_INTERVAL: Duration = Duration::from_millis(100);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Account credentials sent inside `ACSInputParameters` on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierCredentials {
    #[serde(rename = "Company_ID")]
    pub company_id: String,
    #[serde(rename = "Company_Password")]
    pub company_password: String,
    #[serde(rename = "User_ID")]
    pub user_id: String,
    #[serde(rename = "User_Password")]
    pub user_password: String,
}

/// Client configuration; loaded from the environment in the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CourierConfig {
    pub base_url: String,
    pub api_key: String,
    pub credentials: CourierCredentials,
}

impl CourierConfig {
    /// Read configuration from `ACS_*` environment variables.
    ///
    /// `ACS_BASE_URL` is optional and defaults to the production endpoint;
    /// the key and credential variables are required.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| EtikettError::Api(format!("missing environment variable {}", name)))
        };
        Ok(Self {
            base_url: std::env::var("ACS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            api_key: var("ACS_API_KEY")?,
            credentials: CourierCredentials {
                company_id: var("ACS_COMPANY_ID")?,
                company_password: var("ACS_COMPANY_PASSWORD")?,
                user_id: var("ACS_USER_ID")?,
                user_password: var("ACS_USER_PASSWORD")?,
            },
        })
    }
}

/// Voucher print layout requested from the courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintType {
    /// Thermal label printer format.
    Thermal,
    /// Laser A4 format — the input the sticker-sheet composer expects.
    Laser,
}

impl PrintType {
    pub fn api_value(&self) -> u8 {
        match self {
            Self::Thermal => 1,
            Self::Laser => 2,
        }
    }
}

/// Thin async client for the ACS single-endpoint API.
pub struct CourierClient {
    http: reqwest::Client,
    config: CourierConfig,
    last_call: Mutex<Option<Instant>>,
}

impl CourierClient {
    pub fn new(config: CourierConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&config.api_key)
                .map_err(|_| EtikettError::Api("API key is not a valid header value".into()))?,
        );

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|err| EtikettError::Api(format!("failed to build HTTP client: {}", err)))?;

        Ok(Self {
            http,
            config,
            last_call: Mutex::new(None),
        })
    }

    /// Fetch the printable voucher document for a voucher number.
    ///
    /// Returns `Ok(None)` when the courier has no document for the voucher
    /// yet (normal outcome for freshly created vouchers).
    #[instrument(skip(self), fields(voucher_no, print_type = ?print_type))]
    pub async fn fetch_voucher_document(
        &self,
        voucher_no: &str,
        print_type: PrintType,
    ) -> Result<Option<VoucherDocument>> {
        let params = json!({
            "Voucher_No": voucher_no,
            "Print_Type": print_type.api_value(),
            "Start_Position": 1,
            "Language": "GR",
        });

        let response = self.invoke("ACS_Print_Voucher_V2", params).await?;
        let document = extract_voucher_document(&response)?;

        if let Some(doc) = &document {
            info!(bytes = doc.bytes.len(), "Voucher document downloaded");
        }
        Ok(document)
    }

    /// POST one aliased method call and parse the response envelope.
    async fn invoke(&self, alias: &str, params: serde_json::Value) -> Result<AcsResponse> {
        self.pace().await;

        let body = request_body(alias, &self.config.credentials, params)?;
        debug!(alias, "Calling courier endpoint");

        let response = self
            .http
            .post(&self.config.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| EtikettError::Api(format!("request failed: {}", err)))?
            .error_for_status()
            .map_err(|err| EtikettError::Api(format!("courier returned HTTP error: {}", err)))?;

        response
            .json::<AcsResponse>()
            .await
            .map_err(|err| EtikettError::Api(format!("malformed courier response: {}", err)))
    }

    /// Enforce the minimum spacing between consecutive calls.
    async fn pace(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_CALL_INTERVAL {
                tokio::time::sleep(MIN_CALL_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Build the `{ACSAlias, ACSInputParameters}` request body, with the
/// credentials merged into the parameters.
fn request_body(
    alias: &str,
    credentials: &CourierCredentials,
    params: serde_json::Value,
) -> Result<serde_json::Value> {
    let mut input = serde_json::to_value(credentials)?;
    if let (serde_json::Value::Object(map), serde_json::Value::Object(extra)) =
        (&mut input, params)
    {
        map.extend(extra);
    }
    Ok(json!({
        "ACSAlias": alias,
        "ACSInputParameters": input,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CourierCredentials {
        CourierCredentials {
            company_id: "999_acs".into(),
            company_password: "secret".into(),
            user_id: "api_user".into(),
            user_password: "secret2".into(),
        }
    }

    #[test]
    fn request_body_has_the_documented_shape() {
        let body = request_body(
            "ACS_Print_Voucher_V2",
            &credentials(),
            json!({ "Voucher_No": "7401461340", "Print_Type": 2 }),
        )
        .unwrap();

        assert_eq!(body["ACSAlias"], "ACS_Print_Voucher_V2");
        let input = &body["ACSInputParameters"];
        assert_eq!(input["Company_ID"], "999_acs");
        assert_eq!(input["User_Password"], "secret2");
        assert_eq!(input["Voucher_No"], "7401461340");
        assert_eq!(input["Print_Type"], 2);
    }

    #[test]
    fn print_type_maps_to_documented_values() {
        assert_eq!(PrintType::Thermal.api_value(), 1);
        assert_eq!(PrintType::Laser.api_value(), 2);
    }
}
