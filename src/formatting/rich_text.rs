// src/formatting/rich_text.rs
//! Renders rich text blocks as HTML.
//!
//! Consecutive list items are grouped into a single `<ul>` or `<ol>`.
//! Span offsets count UTF-16 code units, as the content API does; spans
//! that run past the end of their text are ignored. All text and attribute values are escaped.

use crate::model::{RichTextBlock, RichTextKind, Span, SpanKind};
use handlebars::html_escape;

/// Renders a sequence of blocks to an HTML fragment.
pub fn rich_text_to_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block.kind {
            RichTextKind::ListItem => Some("ul"),
            RichTextKind::OrderedListItem => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        render_block(block, &mut html);
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

fn render_block(block: &RichTextBlock, html: &mut String) {
    let element = match block.kind {
        RichTextKind::Paragraph => "p",
        RichTextKind::Heading1 => "h1",
        RichTextKind::Heading2 => "h2",
        RichTextKind::Heading3 => "h3",
        RichTextKind::Heading4 => "h4",
        RichTextKind::Heading5 => "h5",
        RichTextKind::Heading6 => "h6",
        RichTextKind::Preformatted => "pre",
        RichTextKind::ListItem | RichTextKind::OrderedListItem => "li",
        RichTextKind::Image => {
            render_image(block, html);
            return;
        }
        RichTextKind::Embed | RichTextKind::Unknown => {
            log::debug!("Skipping unsupported rich text block ({:?})", block.kind);
            return;
        }
    };

    html.push_str(&format!(
        "<{0}>{1}</{0}>",
        element,
        render_spans(&block.text, &block.spans)
    ));
}

fn render_image(block: &RichTextBlock, html: &mut String) {
    let Some(url) = block.url.as_deref().filter(|u| !u.is_empty()) else {
        return;
    };
    html.push_str(&format!(
        "<p class=\"block-img\"><img src=\"{}\" alt=\"{}\" /></p>",
        html_escape(url),
        html_escape(block.alt.as_deref().unwrap_or_default())
    ));
}

/// Applies inline spans to `text`, escaping everything between tags.
///
/// The text is cut at every span boundary and each segment is emitted inside
/// the spans covering it. A span that ends while a span opened after it is
/// still active closes both, then the survivor is reopened.
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();

    // UTF-16 offset of each char, then of the end of the text
    let mut unit_offsets = Vec::with_capacity(chars.len() + 1);
    let mut units = 0;
    for ch in &chars {
        unit_offsets.push(units);
        units += ch.len_utf16();
    }
    unit_offsets.push(units);
    let char_index = |unit: usize| unit_offsets.partition_point(|&offset| offset < unit);

    let mut resolved: Vec<(usize, usize, &Span)> = spans
        .iter()
        .filter(|s| s.start < s.end && s.end <= units && opening_tag(s).is_some())
        .map(|s| (char_index(s.start), char_index(s.end), s))
        .filter(|(start, end, _)| start < end)
        .collect();
    // Outer spans open first when two start at the same offset
    resolved.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut boundaries: Vec<usize> = resolved
        .iter()
        .flat_map(|(start, end, _)| [*start, *end])
        .chain([0, chars.len()])
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<usize> = Vec::new();

    for segment in boundaries.windows(2) {
        let (from, to) = (segment[0], segment[1]);
        let covers = |i: usize| resolved[i].0 <= from && resolved[i].1 >= to;

        if let Some(depth) = open.iter().position(|&i| !covers(i)) {
            let closed = open.split_off(depth);
            for &i in closed.iter().rev() {
                out.push_str(closing_tag(resolved[i].2));
            }
            for i in closed.into_iter().filter(|&i| covers(i)) {
                push_opening_tag(&mut out, resolved[i].2);
                open.push(i);
            }
        }

        for (i, (start, _, span)) in resolved.iter().enumerate() {
            if *start == from {
                push_opening_tag(&mut out, span);
                open.push(i);
            }
        }

        let segment_text: String = chars[from..to].iter().collect();
        out.push_str(&html_escape(&segment_text));
    }

    for &i in open.iter().rev() {
        out.push_str(closing_tag(resolved[i].2));
    }
    out
}

fn push_opening_tag(out: &mut String, span: &Span) {
    if let Some(tag) = opening_tag(span) {
        out.push_str(&tag);
    }
}

fn opening_tag(span: &Span) -> Option<String> {
    match span.kind {
        SpanKind::Strong => Some("<strong>".to_string()),
        SpanKind::Em => Some("<em>".to_string()),
        SpanKind::Hyperlink => {
            let data = span.data.as_ref()?;
            let url = data.url.as_deref().filter(|u| !u.is_empty())?;
            let target = match data.target.as_deref() {
                Some(target) if !target.is_empty() => format!(
                    " target=\"{}\" rel=\"noopener noreferrer\"",
                    html_escape(target)
                ),
                _ => String::new(),
            };
            Some(format!("<a href=\"{}\"{}>", html_escape(url), target))
        }
        SpanKind::Label => {
            let label = span.data.as_ref().and_then(|d| d.label.as_deref())?;
            Some(format!("<span class=\"{}\">", html_escape(label)))
        }
        SpanKind::Unknown => None,
    }
}

fn closing_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Label => "</span>",
        SpanKind::Unknown => "",
    }
}
