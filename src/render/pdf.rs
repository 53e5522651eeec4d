use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use super::layout::{paginate, LineStyle, Page, PageLayout};
use super::RenderError;
use crate::fs_utils::write_atomic;
use crate::normalize::NormalizedPost;

const LAYER_NAME: &str = "Text";

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_error(e: impl std::fmt::Debug) -> RenderError {
    RenderError::Pdf(format!("{e:?}"))
}

/// One text draw on a page, positioned in points.
#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    page: usize,
    style: LineStyle,
    size: f32,
    text: String,
    x: f32,
    y: f32,
}

/// Every laid-out line as the draw call that renders it, in page order.
fn text_runs(pages: &[Page], layout: &PageLayout) -> Vec<TextRun> {
    pages
        .iter()
        .enumerate()
        .flat_map(|(page, p)| {
            p.lines.iter().map(move |line| TextRun {
                page,
                style: line.style,
                size: layout.font_size(line.style),
                text: line.text.clone(),
                x: line.x,
                y: line.y,
            })
        })
        .collect()
}

/// Lay out `posts` on letter pages and write them to `destination`.
///
/// # Errors
///
/// Returns an error if the fonts cannot be registered or the file cannot be
/// written.
pub fn write_pdf(posts: &[NormalizedPost], title: &str, destination: &Path) -> Result<(), RenderError> {
    let layout = PageLayout::letter();
    let pages = paginate(posts, &layout);
    let (width, height) = (pt_to_mm(layout.width), pt_to_mm(layout.height));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let layers: Vec<_> = (0..pages.len())
        .map(|index| {
            if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, LAYER_NAME)
            }
        })
        .collect();

    for run in text_runs(&pages, &layout) {
        let (page_index, layer_index) = layers[run.page];
        let font = match run.style {
            LineStyle::Heading => &bold,
            LineStyle::Body => &regular,
        };
        doc.get_page(page_index).get_layer(layer_index).use_text(
            run.text,
            run.size,
            pt_to_mm(run.x),
            pt_to_mm(run.y),
            font,
        );
    }

    debug!(pages = pages.len(), posts = posts.len(), "Laid out PDF");

    write_atomic(destination, move |writer| doc.save(writer).map_err(pdf_error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64, text: &str) -> NormalizedPost {
        NormalizedPost {
            id,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_text_runs_follow_layout() {
        let layout = PageLayout::letter();
        let filler: String = (0..60).map(|i| format!("line {i}\n")).collect();
        let pages = paginate(&[post(1, &filler), post(2, "Hello")], &layout);
        let runs = text_runs(&pages, &layout);

        let placed: Vec<_> = pages
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.lines.iter().map(move |l| (i, l.text.clone(), l.x, l.y)))
            .collect();
        let drawn: Vec<_> = runs
            .iter()
            .map(|r| (r.page, r.text.clone(), r.x, r.y))
            .collect();
        assert_eq!(drawn, placed);

        let headings: Vec<_> = runs
            .iter()
            .filter(|r| r.style == LineStyle::Heading)
            .map(|r| (r.page, r.text.as_str(), r.size))
            .collect();
        assert_eq!(headings, vec![(0, "Post #1", 14.0), (1, "Post #2", 14.0)]);
        assert!(runs
            .iter()
            .filter(|r| r.style == LineStyle::Body)
            .all(|r| r.size == 10.0));
    }

    // Optimized builds compress content streams, so the drawn strings are
    // only readable in the raw file in debug builds.
    #[cfg(debug_assertions)]
    #[test]
    fn test_write_pdf_draws_posts_in_order() {
        fn hex(text: &str) -> Vec<u8> {
            let mut out = String::from("<");
            for c in text.chars() {
                match c {
                    '\u{2019}' => out.push_str("92"),
                    c => out.push_str(&format!("{:02X}", c as u32)),
                }
            }
            out.push('>');
            out.into_bytes()
        }
        fn position(haystack: &[u8], needle: &[u8]) -> Option<usize> {
            haystack.windows(needle.len()).position(|w| w == needle)
        }

        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("thread.pdf");
        let posts = vec![post(1, "Hello"), post(2, "don\u{2019}t stop"), post(3, "")];

        write_pdf(&posts, "thread", &dest).unwrap();

        let bytes = std::fs::read(&dest).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let positions: Vec<usize> = ["Post #1", "Hello", "Post #2", "don\u{2019}t stop", "Post #3"]
            .iter()
            .map(|text| position(&bytes, &hex(text)).unwrap_or_else(|| panic!("{text:?} not drawn")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(position(&bytes, &hex("Post #4")).is_none());
    }

    #[test]
    fn test_write_pdf_no_posts() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("empty.pdf");

        write_pdf(&[], "empty", &dest).unwrap();

        assert!(std::fs::read(&dest).unwrap().starts_with(b"%PDF-"));
    }
}
