//! Open Graph and Twitter Card tags for link previews.

use html_escape::encode_quoted_attribute;
use regex::Regex;
use std::sync::LazyLock;
use veil_generator::Chance;

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:#|0x)(?:[a-f0-9]{3}|[a-f0-9]{6})\b|(?:rgb|hsl)a?\([^)]*\)")
        .expect("color pattern is valid")
});

fn meta_name(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{name}" content="{}">"#,
        encode_quoted_attribute(content)
    )
}

fn meta_property(property: &str, content: &str) -> String {
    format!(
        r#"<meta property="{property}" content="{}">"#,
        encode_quoted_attribute(content)
    )
}

/// Preview tags for media files served from `raw_url`.
///
/// Images get a large summary card, videos an inline player. Every other
/// MIME type has no media preview.
pub fn media_tags(raw_url: &str, mime: &str) -> Option<String> {
    if mime.starts_with("image") {
        Some(
            [
                meta_name("twitter:card", "summary_large_image"),
                meta_name("twitter:image", raw_url),
                meta_name("twitter:image:src", raw_url),
                meta_property("og:image", raw_url),
            ]
            .concat(),
        )
    } else if mime.starts_with("video") {
        Some(
            [
                meta_name("twitter:card", "player"),
                meta_name("twitter:player", raw_url),
                meta_name("twitter:player:stream", raw_url),
                meta_name("twitter:player:stream:content_type", mime),
            ]
            .concat(),
        )
    } else {
        None
    }
}

/// Resolves the requested theme color.
///
/// `random` draws a fresh hex color. Anything else is kept only if it looks
/// like a hex, `rgb()` or `hsl()` color.
pub fn theme_color(requested: &str, chance: &dyn Chance) -> Option<String> {
    if requested == "random" {
        Some(chance.hex_color())
    } else if COLOR.is_match(requested) {
        Some(requested.to_string())
    } else {
        None
    }
}

/// Customization tags requested by the uploader. Empty values are skipped.
pub fn card_tags(color: Option<&str>, title: Option<&str>, description: Option<&str>) -> String {
    let mut tags = String::new();

    if let Some(color) = color.filter(|c| !c.is_empty()) {
        tags.push_str(&meta_name("theme-color", color));
    }
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        tags.push_str(&meta_name("twitter:title", title));
        tags.push_str(&meta_property("og:title", title));
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        tags.push_str(&meta_name("twitter:description", description));
        tags.push_str(&meta_property("og:description", description));
    }

    tags
}
