use serde::{Deserialize, Serialize};

/// One page of a filtered collection.
///
/// `total_count` always describes the whole filtered collection, never just
/// the returned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub total_count: usize,
}
