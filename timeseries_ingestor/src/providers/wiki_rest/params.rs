use crate::models::request_params::PageRequest;

/// Query-string pairs for one `GET /timeseries` request.
///
/// The `timestamp` pair is only present when the request carries a cursor.
pub fn construct_params(request: &PageRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("id", request.item_id.to_string()),
        ("timestep", request.timestep.as_str().to_string()),
    ];
    if let Some(cursor) = request.cursor {
        query.push(("timestamp", cursor.to_string()));
    }
    query
}
