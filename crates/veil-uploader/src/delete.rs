use crate::error::DeletionError;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};
use veil_core::{DeletionCode, ObjectId, ObjectStore};

/// Body of a deletion request.
///
/// Both codes are kept as raw JSON values: a code of the wrong JSON type is a
/// malformed code, not a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    #[serde(default)]
    pub deletion_code: Option<Value>,
    #[serde(default)]
    pub data_code: Option<Value>,
}


/// Removes objects whose deletion code is presented.
pub struct DeletionService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for DeletionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ObjectStore + ?Sized> DeletionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Deletes the object named by `dataCode` if `deletionCode` matches.
    ///
    /// Deletion is immediate and irreversible. A wrong code leaves the object
    /// untouched and is indistinguishable from an unknown id.
    pub async fn delete(&self, request: DeletionRequest) -> Result<(), DeletionError> {
        let (Some(Value::String(code)), Some(Value::String(id))) =
            (request.deletion_code, request.data_code)
        else {
            return Err(DeletionError::MalformedCodes);
        };
        let code = DeletionCode::parse(code).map_err(|_| DeletionError::MalformedCodes)?;
        let id = ObjectId::parse(id).map_err(|_| DeletionError::MalformedCodes)?;

        let object = self.store.get_with_metadata(&id).await.map_err(|e| {
            error!(id = %id, error = %e, "failed to load object for deletion");
            DeletionError::from(e)
        })?;

        match object {
            Some(object) if object.metadata.deletion_code.matches(&code) => {}
            Some(_) => {
                debug!(id = %id, "deletion code mismatch");
                return Err(DeletionError::Rejected);
            }
            None => {
                debug!(id = %id, "deletion requested for unknown object");
                return Err(DeletionError::Rejected);
            }
        }

        self.store.delete(&id).await.map_err(|e| {
            error!(id = %id, error = %e, "failed to delete object");
            DeletionError::from(e)
        })?;

        info!(id = %id, "deleted object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use jiff::Timestamp;
    use veil_core::{ObjectKind, ObjectMetadata, PutOptions, ReadStore};
    use veil_storage::InMemoryStore;

    const CODE: &str = "V1StGXR8_Z5jdHi6B-myT";

    async fn seeded() -> (DeletionService<InMemoryStore>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let id = ObjectId::new_unchecked("abcdefghij");
        let metadata = ObjectMetadata {
            id: id.clone(),
            size: 19,
            deletion_code: DeletionCode::new_unchecked(CODE),
            timezone: "UTC".to_string(),
            created_at: Timestamp::from_second(0).unwrap(),
            expire_seconds: None,
            kind: ObjectKind::Url,
        };
        store
            .put(
                &id,
                Bytes::from_static(b"https://example.com"),
                PutOptions::builder().metadata(metadata).build(),
            )
            .await
            .unwrap();
        (DeletionService::new(Arc::clone(&store)), store)
    }

    fn request(code: &str, id: &str) -> DeletionRequest {
        DeletionRequest {
            deletion_code: Some(Value::from(code)),
            data_code: Some(Value::from(id)),
        }
    }

    #[tokio::test]
    async fn matching_code_deletes() {
        let (service, store) = seeded().await;

        service.delete(request(CODE, "abcdefghij")).await.unwrap();

        let id = ObjectId::new_unchecked("abcdefghij");
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_code_leaves_object() {
        let (service, store) = seeded().await;

        let err = service
            .delete(request("V1StGXR8_Z5jdHi6B-myX", "abcdefghij"))
            .await
            .unwrap_err();
        assert!(matches!(err, DeletionError::Rejected));

        let id = ObjectId::new_unchecked("abcdefghij");
        assert!(store.get(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_rejected() {
        let (service, _store) = seeded().await;

        let err = service
            .delete(request(CODE, "zzzzzzzzzz"))
            .await
            .unwrap_err();
        assert!(matches!(err, DeletionError::Rejected));
    }

    #[tokio::test]
    async fn malformed_codes_are_rejected() {
        let (service, store) = seeded().await;

        // 20 characters
        let short_code = request("wrong-code-000000000", "abcdefghij");
        let short_id = request(CODE, "abc");
        let missing = DeletionRequest::default();

        for req in [short_code, short_id, missing] {
            let err = service.delete(req).await.unwrap_err();
            assert!(matches!(err, DeletionError::MalformedCodes));
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn non_string_codes_are_malformed() {
        let (service, store) = seeded().await;

        let bodies = [
            r#"{"deletionCode":123456789012345678901,"dataCode":"abcdefghij"}"#,
            r#"{"deletionCode":"V1StGXR8_Z5jdHi6B-myT","dataCode":["abcdefghij"]}"#,
            r#"{"deletionCode":null,"dataCode":"abcdefghij"}"#,
        ];
        for body in bodies {
            let req: DeletionRequest = serde_json::from_str(body).unwrap();
            let err = service.delete(req).await.unwrap_err();
            assert!(matches!(err, DeletionError::MalformedCodes), "{body}");
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn request_uses_client_field_names() {
        let req: DeletionRequest =
            serde_json::from_str(r#"{"deletionCode":"a","dataCode":"b"}"#).unwrap();
        assert_eq!(req.deletion_code, Some(Value::from("a")));
        assert_eq!(req.data_code, Some(Value::from("b")));
    }
}
