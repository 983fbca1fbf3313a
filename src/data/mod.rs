//! Core data models for Manzanita Tides
//!
//! This module contains the types used throughout the application for
//! representing NOAA high/low tide predictions and the persisted cache record.

pub mod noaa;
pub mod predictions;

pub use noaa::{NoaaClient, NoaaError};
pub use predictions::{date_range, TideService};

use serde::{Deserialize, Serialize};

/// Whether a predicted tidal extreme is high water or low water
///
/// NOAA encodes this on the wire as a single character (`"H"` or `"L"`);
/// any other value fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideType {
    #[serde(rename = "H")]
    High,
    #[serde(rename = "L")]
    Low,
}

/// A single predicted tidal extreme at the station
///
/// Field values are kept exactly as NOAA returns them: `time` is a
/// `"YYYY-MM-DD HH:MM"` string in GMT and `value` is an unparsed decimal
/// string giving the height in feet above MLLW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiLoPrediction {
    /// Prediction timestamp, verbatim from the API
    #[serde(rename = "t")]
    pub time: String,
    /// Tide height, verbatim from the API
    #[serde(rename = "v")]
    pub value: String,
    /// High or low water
    #[serde(rename = "type")]
    pub tide_type: TideType,
}

/// An ordered batch of predictions covering one requested date range
///
/// Insertion order is chronological as returned by the API. The
/// `predictions` field is required: a response body without it is a parse
/// error, not an empty batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<HiLoPrediction>,
}

/// Persisted cache record (schema version 1)
///
/// Starts empty, is overwritten wholesale on every successful fetch, and
/// survives process restarts. `created` is epoch milliseconds at the time of
/// the fetch. A record without `created` is treated as empty even if a
/// predictions value is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TideCache {
    /// When the cached batch was fetched, in epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// The last successfully fetched batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<PredictionsResponse>,
}

impl TideCache {
    /// Returns the cached batch if the record was created within
    /// `max_age_ms` of `now_ms`.
    ///
    /// Returns `None` for an empty record, a record missing its `created`
    /// timestamp, or a record older than the window.
    pub fn fresh_predictions(
        &self,
        now_ms: i64,
        max_age_ms: i64,
    ) -> Option<&PredictionsResponse> {
        let created = self.created?;
        let predictions = self.predictions.as_ref()?;
        if now_ms - created <= max_age_ms {
            Some(predictions)
        } else {
            None
        }
    }
}
