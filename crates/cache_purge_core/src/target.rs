use serde::{Deserialize, Serialize};

/// Public URL of a storage object, as addressed by the edge cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurgeTarget {
    pub base_url: String,
    pub file_name: String,
    pub complete_url: String,
}

impl PurgeTarget {
    pub fn new(base_url: &str, object_name: &str) -> Self {
        let file_name = object_name.trim_start_matches('/').to_string();
        let complete_url = format!("{}/{file_name}", base_url.trim_end_matches('/'));
        Self {
            base_url: base_url.to_string(),
            file_name,
            complete_url,
        }
    }
}
