use crate::error::ViewError;
use crate::locate::load;
use bytes::Bytes;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error};
use veil_core::ReadStore;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// What the raw endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// Permanent redirect to a stored URL.
    Redirect(String),
    /// The stored bytes, served as-is.
    Bytes { content_type: String, body: Bytes },
}

/// Serves stored payloads byte for byte.
pub struct RawRetrievalService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for RawRetrievalService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ReadStore + ?Sized> RawRetrievalService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Looks up `code` and returns the payload, or a redirect for URLs.
    pub async fn fetch(
        &self,
        code: &str,
        client_addr: Option<IpAddr>,
    ) -> Result<RawContent, ViewError> {
        let object = load(self.store.as_ref(), code, client_addr, ViewError::InvalidFileCode)
            .await
            .inspect_err(|e| match e {
                ViewError::Storage(e) => error!(code, error = %e, "failed to load raw object"),
                other => debug!(code, error = %other, "raw lookup failed"),
            })?;

        if object.metadata.is_url() {
            let target = String::from_utf8_lossy(&object.payload).into_owned();
            return Ok(RawContent::Redirect(target));
        }

        let content_type = object
            .metadata
            .mime()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        Ok(RawContent::Bytes {
            content_type,
            body: object.payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use veil_core::{
        DeletionCode, FileInfo, ObjectId, ObjectKind, ObjectMetadata, ObjectStore, PutOptions,
    };
    use veil_storage::InMemoryStore;

    async fn put(store: &InMemoryStore, id: &ObjectId, payload: &'static [u8], kind: ObjectKind) {
        let metadata = ObjectMetadata {
            id: id.clone(),
            size: payload.len() as u64,
            deletion_code: DeletionCode::new_unchecked("x".repeat(21)),
            timezone: "UTC".to_string(),
            created_at: Timestamp::from_second(0).unwrap(),
            expire_seconds: None,
            kind,
        };
        store
            .put(
                id,
                Bytes::from_static(payload),
                PutOptions::builder().metadata(metadata).build(),
            )
            .await
            .unwrap();
    }

    fn file(mime: &str) -> ObjectKind {
        ObjectKind::File(FileInfo {
            mime: mime.to_string(),
            extension: None,
            embed_data: None,
        })
    }

    #[tokio::test]
    async fn file_is_served_with_its_mime() {
        let store = Arc::new(InMemoryStore::new());
        put(&store, &ObjectId::new_unchecked("abcdefghij"), b"\x89PNG", file("image/png")).await;
        let service = RawRetrievalService::new(store);

        let content = service.fetch("abcdefghij", None).await.unwrap();
        assert_eq!(
            content,
            RawContent::Bytes {
                content_type: "image/png".to_string(),
                body: Bytes::from_static(b"\x89PNG"),
            }
        );
    }

    #[tokio::test]
    async fn url_is_redirected() {
        let store = Arc::new(InMemoryStore::new());
        put(
            &store,
            &ObjectId::new_unchecked("abcdefghij"),
            b"https://example.com",
            ObjectKind::Url,
        )
        .await;
        let service = RawRetrievalService::new(store);

        let content = service.fetch("abcdefghij", None).await.unwrap();
        assert_eq!(content, RawContent::Redirect("https://example.com".to_string()));
    }

    #[tokio::test]
    async fn short_code_is_invalid() {
        let service = RawRetrievalService::new(Arc::new(InMemoryStore::new()));
        let err = service.fetch("short", None).await.unwrap_err();
        assert!(matches!(err, ViewError::InvalidFileCode(_)));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let service = RawRetrievalService::new(Arc::new(InMemoryStore::new()));
        let err = service.fetch("abcdefghij", None).await.unwrap_err();
        assert!(matches!(err, ViewError::NotFound));
    }

    #[tokio::test]
    async fn transport_code_reads_the_callers_mailbox() {
        let store = Arc::new(InMemoryStore::new());
        let addr: IpAddr = "198.51.100.7".parse().unwrap();
        put(&store, &ObjectId::mailbox(addr), b"hi", file("text/plain")).await;
        let service = RawRetrievalService::new(store);

        let content = service.fetch("t", Some(addr)).await.unwrap();
        assert!(matches!(
            content,
            RawContent::Bytes { body, .. } if body == Bytes::from_static(b"hi")
        ));

        let other: IpAddr = "198.51.100.8".parse().unwrap();
        assert!(matches!(
            service.fetch("t", Some(other)).await.unwrap_err(),
            ViewError::NotFound
        ));
        assert!(matches!(
            service.fetch("t", None).await.unwrap_err(),
            ViewError::NotFound
        ));
    }
}
