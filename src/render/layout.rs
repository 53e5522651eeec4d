//! Page layout for the PDF target.
//!
//! Positions are in points with the origin at the bottom-left corner of the
//! page, matching PDF user space. Lines are measured with the Helvetica
//! advance widths in [`super::metrics`] and hold text as it will be drawn.

use super::metrics::{advance, encodable_text, text_units, Face};
use crate::normalize::NormalizedPost;

/// Dimensions and type scale of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub heading_size: f32,
    pub heading_leading: f32,
    pub space_before_heading: f32,
    pub body_size: f32,
    pub body_leading: f32,
    pub space_before_body: f32,
    pub space_after_body: f32,
}

impl PageLayout {
    /// US letter with one inch margins.
    #[must_use]
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 72.0,
            heading_size: 14.0,
            heading_leading: 18.0,
            space_before_heading: 12.0,
            body_size: 10.0,
            body_leading: 14.0,
            space_before_body: 20.0,
            space_after_body: 20.0,
        }
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Width available to a line between the side margins.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    #[must_use]
    pub fn font_size(&self, style: LineStyle) -> f32 {
        match style {
            LineStyle::Heading => self.heading_size,
            LineStyle::Body => self.body_size,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::letter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Heading,
    Body,
}

impl LineStyle {
    #[must_use]
    pub fn face(self) -> Face {
        match self {
            Self::Heading => Face::Bold,
            Self::Body => Face::Regular,
        }
    }
}

/// One line of text with its baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub style: LineStyle,
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Lay out `posts` in order; always returns at least one page.
///
/// Each post gets a `Post #{id}` heading followed by its wrapped body with
/// fixed spacing before and after. A heading is never left alone at the
/// bottom of a page when its body has text. Characters the built-in fonts
/// cannot draw are replaced with `?` before measuring.
#[must_use]
pub fn paginate(posts: &[NormalizedPost], layout: &PageLayout) -> Vec<Page> {
    let mut pager = Pager::new(layout);

    for post in posts {
        let body = wrap_text(
            &encodable_text(&post.text),
            LineStyle::Body.face(),
            layout.body_size,
            layout.content_width(),
        );
        let keep_with = if body.is_empty() {
            0.0
        } else {
            layout.space_before_body + layout.body_leading
        };

        pager.heading(format!("Post #{}", post.id), keep_with);
        pager.skip(layout.space_before_body);
        for line in body {
            pager.body_line(line);
        }
        pager.skip(layout.space_after_body);
    }

    pager.pages
}

struct Pager<'a> {
    layout: &'a PageLayout,
    pages: Vec<Page>,
    y: f32,
}

impl<'a> Pager<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: vec![Page::default()],
            y: layout.top(),
        }
    }

    fn current(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn at_top(&self) -> bool {
        self.pages.last().map_or(true, |p| p.lines.is_empty())
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= self.layout.margin
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.layout.top();
    }

    fn skip(&mut self, height: f32) {
        if !self.at_top() {
            self.y -= height;
        }
    }

    fn place(&mut self, style: LineStyle, text: String) {
        let x = self.layout.margin;
        let y = self.y;
        self.current().lines.push(PlacedLine { style, text, x, y });
    }

    fn heading(&mut self, text: String, keep_with: f32) {
        if !self.at_top() {
            let needed = self.layout.space_before_heading + self.layout.heading_leading + keep_with;
            if self.fits(needed) {
                self.y -= self.layout.space_before_heading;
            } else {
                self.new_page();
            }
        }
        self.y -= self.layout.heading_leading;
        self.place(LineStyle::Heading, text);
    }

    fn body_line(&mut self, text: String) {
        if !self.fits(self.layout.body_leading) {
            self.new_page();
        }
        self.y -= self.layout.body_leading;
        self.place(LineStyle::Body, text);
    }
}

/// Wrap `text` into lines no wider than `max_width` points when set in
/// `face` at `size`.
///
/// Runs of whitespace inside a line collapse to one space, source newlines
/// start a new line, consecutive blank lines collapse to one, and leading or
/// trailing blank lines are dropped. Words wider than a line are split.
#[must_use]
pub fn wrap_text(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    // Widths are compared in 1/1000 em units.
    let max_units = ((max_width * 1000.0 / size).floor() as u32).max(1);
    let space = advance(' ', face);
    let mut lines = Vec::new();
    let mut blank_pending = false;

    for source_line in text.lines() {
        let mut words = source_line.split_whitespace().peekable();
        if words.peek().is_none() {
            blank_pending = !lines.is_empty();
            continue;
        }
        if blank_pending {
            lines.push(String::new());
            blank_pending = false;
        }

        let mut current = String::new();
        let mut current_units = 0;
        for word in words {
            for piece in split_long_word(word, face, max_units) {
                let piece_units = text_units(piece, face);
                if !current.is_empty() && current_units + space + piece_units > max_units {
                    lines.push(std::mem::take(&mut current));
                    current_units = 0;
                }
                if !current.is_empty() {
                    current.push(' ');
                    current_units += space;
                }
                current.push_str(piece);
                current_units += piece_units;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Cut `word` into pieces of at most `max_units`; a single glyph wider than
/// that still gets its own piece.
fn split_long_word(word: &str, face: Face, max_units: u32) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut units = 0;
    for (i, c) in word.char_indices() {
        let width = advance(c, face);
        if units > 0 && units + width > max_units {
            pieces.push(&word[start..i]);
            start = i;
            units = 0;
        }
        units += width;
    }
    pieces.push(&word[start..]);
    pieces
}
