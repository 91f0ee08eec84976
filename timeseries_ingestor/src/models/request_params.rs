use serde::{Deserialize, Serialize};

use crate::models::{item::ItemId, timestep::Timestep};

/// Parameters for requesting one page of the time series.
///
/// This is the standard input for every
/// [`PageSource`](crate::providers::PageSource) implementation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The item whose history is requested.
    pub item_id: ItemId,

    /// Bucket width of the requested samples.
    pub timestep: Timestep,

    /// Anchor timestamp (seconds since epoch) for the page.
    ///
    /// `None` asks for the most recent data. Otherwise it is the timestamp of
    /// the last sample of the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<i64>,
}

impl PageRequest {
    /// The first page of a session: no cursor.
    pub fn latest(item_id: ItemId, timestep: Timestep) -> Self {
        Self {
            item_id,
            timestep,
            cursor: None,
        }
    }

    /// Same item and timestep, anchored at `cursor`.
    pub fn at(&self, cursor: i64) -> Self {
        Self {
            cursor: Some(cursor),
            ..self.clone()
        }
    }
}
