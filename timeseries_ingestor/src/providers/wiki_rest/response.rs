use serde::Deserialize;

use crate::models::sample::Sample;

/// Body of `GET /timeseries`.
///
/// The API has been seen to answer with an object lacking `data` when the
/// item is unknown, so the array is optional.
#[derive(Deserialize, Debug)]
pub struct TimeseriesResponse {
    #[serde(default)]
    pub data: Option<Vec<Sample>>,
}
