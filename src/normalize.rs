//! Reduce a post's cooked HTML to the plain text that gets rendered.

use scraper::{ElementRef, Html, Node};

use crate::discourse::{PostId, RawPost};

/// A post body reduced to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPost {
    pub id: PostId,
    pub text: String,
}

/// Converts cooked HTML into plain text.
///
/// Implementations must be total: malformed markup degrades the output,
/// it never fails the conversion.
pub trait Normalizer {
    fn normalize(&self, html: &str) -> String;

    fn normalize_post(&self, post: &RawPost) -> NormalizedPost {
        NormalizedPost {
            id: post.id,
            text: self.normalize(&post.html),
        }
    }
}

/// [`Normalizer`] built on the html5ever tree builder via `scraper`.
///
/// Audio players are dropped with everything inside them, and
/// `<img class="emoji">` is replaced by its `alt` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlNormalizer;

impl Normalizer for HtmlNormalizer {
    fn normalize(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut text = String::with_capacity(html.len());
        collect_text(fragment.root_element(), &mut text);
        text
    }
}

/// Normalize `html` with the default [`HtmlNormalizer`].
#[must_use]
pub fn normalize(html: &str) -> String {
    HtmlNormalizer.normalize(html)
}

/// Append the text nodes under `element` in document order.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if el.name() == "audio" {
                    continue;
                }
                if el.name() == "img" && el.classes().any(|c| c == "emoji") {
                    out.push_str(el.attr("alt").unwrap_or(""));
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(normalize("<p>Hello</p>"), "Hello");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_emoji_replaced_by_alt() {
        let html = r#"<p>Nice <img src="/images/emoji/twitter/fire.png?v=12" title=":fire:" class="emoji" alt=":fire:" loading="lazy" width="20" height="20"> work</p>"#;
        assert_eq!(normalize(html), "Nice :fire: work");
    }

    #[test]
    fn test_emoji_single_quotes() {
        assert_eq!(normalize("<img class='emoji' alt='fire'>"), "fire");
    }

    #[test]
    fn test_emoji_among_other_classes() {
        let html = r#"<img class="emoji only-emoji" alt=":smile:">"#;
        assert_eq!(normalize(html), ":smile:");
    }

    #[test]
    fn test_emoji_without_alt() {
        assert_eq!(normalize(r#"a<img class="emoji">b"#), "ab");
    }

    #[test]
    fn test_non_emoji_image_dropped_silently() {
        // Plain images carry no text nodes
        let html = r#"<p>see <img src="/uploads/a.png" alt="diagram"></p>"#;
        assert_eq!(normalize(html), "see ");
    }

    #[test]
    fn test_class_must_match_whole_token() {
        let html = r#"<img class="emojis" alt="nope">"#;
        assert_eq!(normalize(html), "");
    }

    #[test]
    fn test_audio_removed_with_contents() {
        let html = r#"<p>Listen:</p><audio controls><source src="/uploads/x.mp3">Your browser does not support audio</audio><p>done</p>"#;
        let text = normalize(html);
        assert_eq!(text, "Listen:done");
        assert!(!text.contains("browser"));
        assert!(!text.contains("source"));
    }

    #[test]
    fn test_audio_only_is_empty() {
        let html = r#"<audio controls=""><source src="https://example.com/a.mp3"></audio>"#;
        assert!(normalize(html).trim().is_empty());
    }

    #[test]
    fn test_audio_followed_by_text() {
        assert_eq!(normalize("<audio></audio>World"), "World");
    }

    #[test]
    fn test_nested_media_inside_markup() {
        let html = r#"<blockquote><p>quoted <img class="emoji" alt=":+1:"></p><div><audio><p>gone</p></audio></div></blockquote>"#;
        assert_eq!(normalize(html), "quoted :+1:");
    }

    #[test]
    fn test_malformed_markup_tolerated() {
        assert_eq!(normalize("<p>unclosed <b>bold <i>both</p>tail"), "unclosed bold bothtail");
        assert_eq!(normalize("a</div></span>b"), "ab");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(normalize("<p>a &amp; b &lt;c&gt;</p>"), "a & b <c>");
    }

    #[test]
    fn test_whitespace_kept() {
        assert_eq!(normalize("<p>one</p>\n<p>two</p>"), "one\ntwo");
    }

    #[test]
    fn test_deterministic() {
        let html = r#"<p>x <img class="emoji" alt="y"></p><audio>z</audio>"#;
        assert_eq!(normalize(html), normalize(html));
    }

    #[test]
    fn test_normalize_post() {
        let raw = RawPost {
            id: 12,
            html: "<p>hi</p>".to_string(),
        };
        assert_eq!(
            HtmlNormalizer.normalize_post(&raw),
            NormalizedPost {
                id: 12,
                text: "hi".to_string()
            }
        );
    }
}
