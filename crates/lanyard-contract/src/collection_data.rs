//! Collection-data resource contract.

use serde::{Deserialize, Serialize};

use crate::common::ObjectId;

/// Collection path for collection-data. POST creates, GET lists (paginated).
pub const COLLECTION_DATA_PATH: &str = "/api/v1/collection-data";

/// Item path for a single collection-data entry.
pub fn collection_data_path(id: &ObjectId) -> String {
    format!("{}/{}", COLLECTION_DATA_PATH, id)
}

/// A collection-data entry as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionData {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub remark: String,
}

/// Request body for creating a collection-data entry.
#[derive(Debug, Serialize)]
pub struct CreateCollectionDataRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<&'a str>,
}

/// Request body for updating a collection-data entry.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionDataRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<&'a str>,
    /// Free-form note describing what this update changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_description: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_uses_camel_case() {
        let request = UpdateCollectionDataRequest {
            name: Some("renamed"),
            update_description: Some("rename pass"),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "renamed", "updateDescription": "rename pass" })
        );
    }
}
