//! HTML landing pages for stored files.

use html_escape::{encode_double_quoted_attribute, encode_text};

const PAGE: &str = include_str!("../templates/page.html");
const DELETE_CONTROL: &str = include_str!("../templates/delete.html");

/// Top-level MIME category, which decides how a file is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Audio,
    Video,
    Text,
    Image,
    Other,
}

impl MediaCategory {
    pub fn of(mime: Option<&str>) -> Self {
        let top = mime
            .and_then(|mime| mime.split('/').next())
            .unwrap_or_default();
        match top {
            "audio" => Self::Audio,
            "video" => Self::Video,
            "text" => Self::Text,
            "image" => Self::Image,
            _ => Self::Other,
        }
    }
}

/// Values needed to wire the deletion control to the delete endpoint.
#[derive(Debug, Clone, Copy)]
pub struct DeletionControl<'a> {
    pub api_url: &'a str,
    pub deletion_code: &'a str,
    pub data_code: &'a str,
}

/// Everything shown on a landing page.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    /// The path code the page was requested under.
    pub code: &'a str,
    pub raw_url: &'a str,
    pub category: MediaCategory,
    pub payload: &'a [u8],
    pub uploaded: &'a str,
    pub size: &'a str,
    /// Pre-rendered preview tags, inserted verbatim.
    pub embed: Option<&'a str>,
    pub deletion: Option<DeletionControl<'a>>,
}

impl Page<'_> {
    pub fn render(&self) -> String {
        let element = self.element();
        let delete = self.deletion.map(render_deletion_control).unwrap_or_default();

        fill(
            PAGE,
            &[
                ("EMBED", self.embed.unwrap_or_default()),
                ("TITLE", &*encode_text(self.code)),
                ("ELEMENT", element.as_str()),
                ("UPLOADED", self.uploaded),
                ("SIZE", self.size),
                ("DELETE", delete.as_str()),
            ],
        )
    }

    fn element(&self) -> String {
        let src = encode_double_quoted_attribute(self.raw_url);
        match self.category {
            MediaCategory::Audio => format!(
                r#"<audio controls src="{src}">Your browser does not support the audio element.</audio>"#
            ),
            MediaCategory::Video => format!(
                r#"<video controls src="{src}">Your browser does not support the video element.</video>"#
            ),
            MediaCategory::Text => {
                let text = String::from_utf8_lossy(self.payload);
                format!(r#"<pre id="text-data">{}</pre>"#, encode_text(&text))
            }
            MediaCategory::Image => format!(
                r#"<img src="{src}" alt="{}">"#,
                encode_double_quoted_attribute(self.code)
            ),
            MediaCategory::Other => format!(
                r#"<p>This file is not viewable, click below to download.</p><a class="button" href="{src}" download>Download</a>"#
            ),
        }
    }
}

fn render_deletion_control(control: DeletionControl<'_>) -> String {
    fill(
        DELETE_CONTROL,
        &[
            ("DELETION_API", js_string(control.api_url).as_str()),
            ("DELETION_CODE", js_string(control.deletion_code).as_str()),
            ("DATA_CODE", js_string(control.data_code).as_str()),
        ],
    )
}

/// A JavaScript string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

/// Replaces each `%KEY%` in `template` with its value in a single pass, so
/// substituted values are never scanned for placeholders themselves.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let replacement = tail.find('%').and_then(|end| {
            let key = &tail[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('%');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(category: MediaCategory, payload: &'a [u8]) -> Page<'a> {
        Page {
            code: "abcdefghij",
            raw_url: "https://raw.veil/abcdefghij",
            category,
            payload,
            uploaded: "a few seconds ago",
            size: "0.005",
            embed: None,
            deletion: None,
        }
    }

    #[test]
    fn category_from_mime() {
        assert_eq!(MediaCategory::of(Some("audio/ogg")), MediaCategory::Audio);
        assert_eq!(MediaCategory::of(Some("video/mp4")), MediaCategory::Video);
        assert_eq!(MediaCategory::of(Some("text/plain")), MediaCategory::Text);
        assert_eq!(MediaCategory::of(Some("image/png")), MediaCategory::Image);
        assert_eq!(MediaCategory::of(Some("application/pdf")), MediaCategory::Other);
        assert_eq!(MediaCategory::of(None), MediaCategory::Other);
    }

    #[test]
    fn fill_is_single_pass() {
        let out = fill("a %X% b %Y% 100% c", &[("X", "%Y%"), ("Y", "y")]);
        assert_eq!(out, "a %Y% b y 100% c");
    }

    #[test]
    fn text_is_escaped() {
        let html = page(MediaCategory::Text, b"<script>alert(1)</script>").render();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let html = page(MediaCategory::Text, b"ok \xff").render();
        assert!(html.contains("ok \u{FFFD}"));
    }

    #[test]
    fn each_category_has_its_element() {
        let cases = [
            (MediaCategory::Audio, "<audio controls"),
            (MediaCategory::Video, "<video controls"),
            (MediaCategory::Image, "<img src=\"https://raw.veil/abcdefghij\""),
            (MediaCategory::Other, "download>Download</a>"),
        ];
        for (category, needle) in cases {
            let html = page(category, b"").render();
            assert!(html.contains(needle), "{category:?}");
        }
    }

    #[test]
    fn page_shows_age_and_size() {
        let html = page(MediaCategory::Other, b"").render();
        assert!(html.contains("Uploaded: a few seconds ago"));
        assert!(html.contains("Size: 0.005 KB"));
        assert!(html.contains("<title>abcdefghij</title>"));
    }

    #[test]
    fn deletion_control_only_with_code() {
        let html = page(MediaCategory::Other, b"").render();
        assert!(!html.contains("delete-confirm"));

        let mut with_code = page(MediaCategory::Other, b"");
        with_code.deletion = Some(DeletionControl {
            api_url: "https://api.veil/delete",
            deletion_code: "V1StGXR8_Z5jdHi6B-myT",
            data_code: "abcdefghij",
        });
        let html = with_code.render();
        assert!(html.contains("delete-confirm"));
        assert!(html.contains(r#"const endpoint = "https://api.veil/delete";"#));
        assert!(html.contains(r#"deletionCode: "V1StGXR8_Z5jdHi6B-myT""#));
    }

    #[test]
    fn crafted_code_cannot_leave_the_script() {
        let mut crafted = page(MediaCategory::Other, b"");
        crafted.deletion = Some(DeletionControl {
            api_url: "https://api.veil/delete",
            deletion_code: "\"});</script><script>alert(1)//",
            data_code: "abcdefghij",
        });
        let html = crafted.render();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r#"\"});\u003c/script\u003e"#));
    }
}
