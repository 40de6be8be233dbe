use crate::error::ViewError;
use crate::html::{DeletionControl, MediaCategory, Page};
use crate::humanize::{kilobytes, relative_time};
use crate::locate::load;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error};
use typed_builder::TypedBuilder;
use veil_core::{Clock, ReadStore, SystemClock};

/// Served for `/robots.txt`: keep crawlers away from every upload.
pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /";

#[derive(Debug, Clone, TypedBuilder)]
pub struct RenderSettings {
    /// Base of the raw-content locator the page embeds media from.
    #[builder(setter(into))]
    pub raw_base_url: String,
    /// Endpoint the deletion control posts to.
    #[builder(setter(into))]
    pub deletion_api_url: String,
    /// Where an empty path redirects.
    #[builder(setter(into))]
    pub home_url: String,
}

/// What the render endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Permanent redirect.
    Redirect(String),
    /// A static plain-text document.
    Text(&'static str),
    Html(String),
}

/// Builds human-facing landing pages.
pub struct RenderService<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    settings: RenderSettings,
}

impl<S: ?Sized> Clone for RenderService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            settings: self.settings.clone(),
        }
    }
}

impl<S: ReadStore + ?Sized> RenderService<S> {
    pub fn new(store: Arc<S>, settings: RenderSettings) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Renders the page for `code`, the request path without its leading `/`.
    ///
    /// `deletion_code` is the `delete` query value; when present the page
    /// carries a control that deletes the object with it.
    pub async fn render(
        &self,
        code: &str,
        deletion_code: Option<&str>,
        client_addr: Option<IpAddr>,
    ) -> Result<Rendered, ViewError> {
        if code.is_empty() {
            return Ok(Rendered::Redirect(self.settings.home_url.clone()));
        }
        if code == "robots.txt" {
            return Ok(Rendered::Text(ROBOTS_TXT));
        }

        let object = load(self.store.as_ref(), code, client_addr, ViewError::InvalidDataCode)
            .await
            .inspect_err(|e| match e {
                ViewError::Storage(e) => error!(code, error = %e, "failed to load object"),
                other => debug!(code, error = %other, "render lookup failed"),
            })?;

        let metadata = &object.metadata;
        if metadata.is_url() {
            let target = String::from_utf8_lossy(&object.payload).into_owned();
            return Ok(Rendered::Redirect(target));
        }

        let raw_url = format!("{}/{}", self.settings.raw_base_url.trim_end_matches('/'), code);
        let uploaded = relative_time(metadata.created_at, self.clock.now());
        let size = kilobytes(metadata.size);

        let page = Page {
            code,
            raw_url: &raw_url,
            category: MediaCategory::of(metadata.mime()),
            payload: &object.payload,
            uploaded: &uploaded,
            size: &size,
            embed: metadata.embed_data(),
            deletion: deletion_code
                .filter(|c| !c.is_empty())
                .map(|deletion_code| DeletionControl {
                    api_url: &self.settings.deletion_api_url,
                    deletion_code,
                    data_code: code,
                }),
        };

        Ok(Rendered::Html(page.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use jiff::{SignedDuration, Timestamp};
    use veil_core::{
        DeletionCode, FileInfo, ManualClock, ObjectId, ObjectKind, ObjectMetadata, ObjectStore,
        PutOptions,
    };
    use veil_storage::InMemoryStore;

    fn created() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn settings() -> RenderSettings {
        RenderSettings::builder()
            .raw_base_url("https://raw.veil")
            .deletion_api_url("https://api.veil/delete")
            .home_url("https://veil.example")
            .build()
    }

    async fn service_with(
        id: ObjectId,
        payload: &'static [u8],
        kind: ObjectKind,
    ) -> RenderService<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        let metadata = ObjectMetadata {
            id: id.clone(),
            size: 2500,
            deletion_code: DeletionCode::new_unchecked("x".repeat(21)),
            timezone: "UTC".to_string(),
            created_at: created(),
            expire_seconds: None,
            kind,
        };
        store
            .put(
                &id,
                Bytes::from_static(payload),
                PutOptions::builder().metadata(metadata).build(),
            )
            .await
            .unwrap();

        let clock = ManualClock::new(created());
        clock.advance(SignedDuration::from_mins(5));
        RenderService::new(store, settings()).with_clock(clock)
    }

    fn file(mime: &str, embed: Option<&str>) -> ObjectKind {
        ObjectKind::File(FileInfo {
            mime: mime.to_string(),
            extension: None,
            embed_data: embed.map(str::to_string),
        })
    }

    fn html(rendered: Rendered) -> String {
        match rendered {
            Rendered::Html(html) => html,
            other => panic!("expected html, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_path_goes_home() {
        let service = RenderService::new(Arc::new(InMemoryStore::new()), settings());
        let rendered = service.render("", None, None).await.unwrap();
        assert_eq!(rendered, Rendered::Redirect("https://veil.example".to_string()));
    }

    #[tokio::test]
    async fn robots_txt_is_static() {
        let service = RenderService::new(Arc::new(InMemoryStore::new()), settings());
        let rendered = service.render("robots.txt", None, None).await.unwrap();
        assert_eq!(rendered, Rendered::Text("User-agent: *\nDisallow: /"));
    }

    #[tokio::test]
    async fn short_code_is_invalid() {
        let service = RenderService::new(Arc::new(InMemoryStore::new()), settings());
        let err = service.render("abc", None, None).await.unwrap_err();
        assert!(matches!(err, ViewError::InvalidDataCode(_)));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let service = RenderService::new(Arc::new(InMemoryStore::new()), settings());
        let err = service.render("abcdefghij", None, None).await.unwrap_err();
        assert!(matches!(err, ViewError::NotFound));
    }

    #[tokio::test]
    async fn url_object_redirects() {
        let service = service_with(
            ObjectId::new_unchecked("abcdefghij"),
            b"https://example.com",
            ObjectKind::Url,
        )
        .await;
        let rendered = service.render("abcdefghij", None, None).await.unwrap();
        assert_eq!(rendered, Rendered::Redirect("https://example.com".to_string()));
    }

    #[tokio::test]
    async fn image_page_embeds_raw_url_and_preview_tags() {
        let embed = r#"<meta property="og:image" content="https://raw.veil/abcdefghij">"#;
        let service = service_with(
            ObjectId::new_unchecked("abcdefghij"),
            b"\x89PNG",
            file("image/png", Some(embed)),
        )
        .await;

        let page = html(service.render("abcdefghij", None, None).await.unwrap());
        assert!(page.contains(r#"<img src="https://raw.veil/abcdefghij""#));
        assert!(page.contains(embed));
        assert!(page.contains("Uploaded: 5 minutes ago"));
        assert!(page.contains("Size: 2.5 KB"));
        assert!(!page.contains("delete-confirm"));
    }

    #[tokio::test]
    async fn text_page_inlines_payload() {
        let service = service_with(
            ObjectId::new_unchecked("abcdefghij"),
            b"hello <world>",
            file("text/plain", None),
        )
        .await;

        let page = html(service.render("abcdefghij", None, None).await.unwrap());
        assert!(page.contains("hello &lt;world&gt;"));
    }

    #[tokio::test]
    async fn delete_query_adds_control() {
        let service = service_with(
            ObjectId::new_unchecked("abcdefghij"),
            b"%PDF",
            file("application/pdf", None),
        )
        .await;

        let page = html(
            service
                .render("abcdefghij", Some("V1StGXR8_Z5jdHi6B-myT"), None)
                .await
                .unwrap(),
        );
        assert!(page.contains("download>Download</a>"));
        assert!(page.contains("delete-confirm"));
        assert!(page.contains(r#"dataCode: "abcdefghij""#));

        let page = html(service.render("abcdefghij", Some(""), None).await.unwrap());
        assert!(!page.contains("delete-confirm"));
    }

    #[tokio::test]
    async fn transport_code_renders_the_mailbox() {
        let addr: IpAddr = "192.0.2.44".parse().unwrap();
        let service =
            service_with(ObjectId::mailbox(addr), b"ping", file("text/plain", None)).await;

        let page = html(service.render("t", None, Some(addr)).await.unwrap());
        assert!(page.contains("ping"));

        let err = service.render("t", None, None).await.unwrap_err();
        assert!(matches!(err, ViewError::NotFound));
    }
}
