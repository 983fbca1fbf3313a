//! NOAA CO-OPS tide predictions API client
//!
//! This module fetches high/low tide predictions from the NOAA Tides and
//! Currents data API for the Manzanita area, using Nehalem Bay as the
//! reference station (Station ID: 9437908). Heights are in feet above MLLW.

use reqwest::Client;
use thiserror::Error;

use super::PredictionsResponse;

/// Base URL for the NOAA CO-OPS data API
const NOAA_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// NOAA subordinate station for Nehalem Bay (Manzanita, OR)
const STATION_ID: &str = "9437908";

/// Caller identifier sent with every request, per NOAA API usage guidelines
const APPLICATION_ID: &str = "manzanita-tides-cli";

/// Errors that can occur when fetching tide predictions
#[derive(Debug, Error)]
pub enum NoaaError {
    /// HTTP request failed (network error or non-success status)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for fetching high/low tide predictions from the NOAA CO-OPS API
///
/// Station, datum, time zone, and units are fixed; only the date range
/// varies per request. The client performs exactly one request per call and
/// does no caching, retrying, or payload validation beyond structural
/// parsing.
#[derive(Debug, Clone)]
pub struct NoaaClient {
    client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl Default for NoaaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NoaaClient {
    /// Creates a new NoaaClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: NOAA_BASE_URL.to_string(),
        }
    }

    /// Creates a new NoaaClient with a custom base URL (for testing)
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Builds the request URL for the given date range
    ///
    /// Every parameter except the two dates is fixed. `interval=hilo`
    /// requests only the high/low inflection points rather than the full
    /// tidal curve.
    fn build_url(&self, begin_date: &str, end_date: &str) -> String {
        format!(
            "{}?begin_date={}&end_date={}&station={}&product=predictions&datum=MLLW&time_zone=gmt&interval=hilo&units=english&application={}&format=json",
            self.base_url, begin_date, end_date, STATION_ID, APPLICATION_ID
        )
    }

    /// Fetches high/low predictions for the given date range
    ///
    /// # Arguments
    /// * `begin_date` - First day of the range, in yyyyMMdd format
    /// * `end_date` - Last day of the range, in yyyyMMdd format
    ///
    /// # Returns
    /// * `Ok(PredictionsResponse)` - The ordered prediction batch
    /// * `Err(NoaaError)` - If the request or parsing fails; failures
    ///   propagate to the caller without retry or fallback
    pub async fn fetch_hilo_predictions(
        &self,
        begin_date: &str,
        end_date: &str,
    ) -> Result<PredictionsResponse, NoaaError> {
        let url = self.build_url(begin_date, end_date);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;
        let predictions: PredictionsResponse = serde_json::from_str(&text)?;

        Ok(predictions)
    }
}
