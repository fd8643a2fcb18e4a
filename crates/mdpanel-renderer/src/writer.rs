//! Event to HTML writer for panel output.
//!
//! Raw HTML passes through untouched, bare URLs in prose become links, and
//! fenced code is buffered so it can be handed to the highlighter as a whole.

use std::collections::HashMap;
use std::sync::LazyLock;

use markdown_weaver::{
    Alignment, BlockQuoteKind, CodeBlockKind, CowStr, Event, Event::*, LinkType, Tag, TagEnd,
};
use markdown_weaver_escape::{
    FmtWriter, StrWrite, escape_href, escape_html, escape_html_body_text,
};
use regex::Regex;

use crate::error::HighlightError;
use crate::highlight::CodeHighlighter;

/// Bare web addresses: an explicit scheme or a leading `www.`.
static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").unwrap());

/// Inline raw HTML elements whose text is left unlinked.
const UNLINKED_RAW_TAGS: &[&str] = &["a", "code", "kbd", "pre", "samp"];

pub enum TableState {
    Head,
    Body,
}

pub(crate) struct HtmlWriter<'a, 'h, I, W> {
    /// Iterator supplying events.
    iter: I,

    /// Writer to write to.
    writer: W,

    highlighter: &'h CodeHighlighter,

    /// Whether or not the last write wrote a newline.
    end_newline: bool,

    /// Whether if inside a metadata block (text should not be written)
    in_non_writing_block: bool,

    /// Open `<a>` or raw code-like elements; bare URLs inside them are left alone.
    link_depth: usize,

    /// Prose text not yet written out.
    pending_text: String,

    /// Language and collected text of the code block being read.
    code_buffer: Option<(Option<String>, String)>,

    table_state: TableState,
    table_alignments: Vec<Alignment>,
    table_cell_index: usize,
    numbers: HashMap<CowStr<'a>, usize>,
}

impl<'a, 'h, I, W> HtmlWriter<'a, 'h, I, W>
where
    I: Iterator<Item = Event<'a>>,
    W: StrWrite,
{
    pub(crate) fn new(iter: I, writer: W, highlighter: &'h CodeHighlighter) -> Self {
        Self {
            iter,
            writer,
            highlighter,
            end_newline: true,
            in_non_writing_block: false,
            link_depth: 0,
            pending_text: String::new(),
            code_buffer: None,
            table_state: TableState::Head,
            table_alignments: vec![],
            table_cell_index: 0,
            numbers: HashMap::new(),
        }
    }

    /// Writes a new line.
    #[inline]
    fn write_newline(&mut self) -> Result<(), W::Error> {
        self.end_newline = true;
        self.writer.write_str("\n")
    }

    /// Writes a buffer, and tracks whether or not a newline was written.
    #[inline]
    fn write(&mut self, s: &str) -> Result<(), W::Error> {
        self.writer.write_str(s)?;

        if !s.is_empty() {
            self.end_newline = s.ends_with('\n');
        }
        Ok(())
    }

    pub(crate) fn run(mut self) -> Result<(), W::Error> {
        while let Some(event) = self.iter.next() {
            if !matches!(event, Text(_)) {
                self.flush_text()?;
            }
            match event {
                Start(tag) => {
                    self.start_tag(tag)?;
                }
                End(tag) => {
                    self.end_tag(tag)?;
                }
                Text(text) => {
                    if let Some((_, buffer)) = self.code_buffer.as_mut() {
                        buffer.push_str(&text);
                    } else if !self.in_non_writing_block {
                        self.pending_text.push_str(&text);
                    }
                }
                Code(text) => {
                    self.write("<code>")?;
                    escape_html_body_text(&mut self.writer, &text)?;
                    self.write("</code>")?;
                }
                Html(html) => {
                    self.write(&html)?;
                }
                InlineHtml(html) => {
                    self.track_raw_tag(&html);
                    self.write(&html)?;
                }
                SoftBreak => {
                    self.write_newline()?;
                }
                HardBreak => {
                    self.write("<br />\n")?;
                }
                Rule => {
                    if self.end_newline {
                        self.write("<hr />\n")?;
                    } else {
                        self.write("\n<hr />\n")?;
                    }
                }
                FootnoteReference(name) => {
                    let len = self.numbers.len() + 1;
                    self.write("<sup class=\"footnote-reference\"><a href=\"#")?;
                    escape_html(&mut self.writer, &name)?;
                    self.write("\">")?;
                    let number = *self.numbers.entry(name).or_insert(len);
                    write!(&mut self.writer, "{}", number)?;
                    self.write("</a></sup>")?;
                }
                TaskListMarker(true) => {
                    self.write("<input disabled=\"\" type=\"checkbox\" checked=\"\"/>\n")?;
                }
                TaskListMarker(false) => {
                    self.write("<input disabled=\"\" type=\"checkbox\"/>\n")?;
                }
                // Math and weaver blocks are never enabled in the parser options.
                InlineMath(_) | DisplayMath(_) | WeaverBlock(_) => {}
            }
        }
        self.flush_text()
    }

    /// Writes merged text collected since the last non-text event.
    ///
    /// The parser splits prose at punctuation, so URLs are only found
    /// reliably once adjacent text events are joined.
    fn flush_text(&mut self) -> Result<(), W::Error> {
        if self.pending_text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending_text);
        if self.link_depth == 0 {
            self.write_linkified(&text)?;
        } else {
            escape_html_body_text(&mut self.writer, &text)?;
        }
        self.end_newline = text.ends_with('\n');
        Ok(())
    }

    /// Raw `<a>`, `<code>` and similar tags count towards link nesting too.
    fn track_raw_tag(&mut self, html: &str) {
        let Some(tag) = html.trim_start().strip_prefix('<') else {
            return;
        };
        let (closing, tag) = match tag.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, tag),
        };
        let name_end = tag
            .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            .unwrap_or(tag.len());
        let name = &tag[..name_end];
        if !UNLINKED_RAW_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            return;
        }
        if closing {
            self.link_depth = self.link_depth.saturating_sub(1);
        } else if !tag.trim_end().ends_with("/>") {
            self.link_depth += 1;
        }
    }

    /// Writes prose text, turning bare URLs into links.
    fn write_linkified(&mut self, text: &str) -> Result<(), W::Error> {
        let mut last = 0;
        for found in BARE_URL_RE.find_iter(text) {
            let url = trim_url_tail(found.as_str());
            if url.is_empty() {
                continue;
            }
            let start = found.start();
            let end = start + url.len();
            escape_html_body_text(&mut self.writer, &text[last..start])?;

            self.writer.write_str("<a href=\"")?;
            if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
                self.writer.write_str("http://")?;
            }
            escape_href(&mut self.writer, url)?;
            self.writer.write_str("\">")?;
            escape_html_body_text(&mut self.writer, url)?;
            self.writer.write_str("</a>")?;
            last = end;
        }
        escape_html_body_text(&mut self.writer, &text[last..])
    }

    /// Writes the start of an HTML tag.
    fn start_tag(&mut self, tag: Tag<'a>) -> Result<(), W::Error> {
        match tag {
            Tag::HtmlBlock => Ok(()),
            Tag::Paragraph => {
                if self.end_newline {
                    self.write("<p>")
                } else {
                    self.write("\n<p>")
                }
            }
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                if self.end_newline {
                    self.write("<")?;
                } else {
                    self.write("\n<")?;
                }
                write!(&mut self.writer, "{}", level)?;
                if let Some(id) = id {
                    self.write(" id=\"")?;
                    escape_html(&mut self.writer, &id)?;
                    self.write("\"")?;
                }
                let mut classes = classes.iter();
                if let Some(class) = classes.next() {
                    self.write(" class=\"")?;
                    escape_html(&mut self.writer, class)?;
                    for class in classes {
                        self.write(" ")?;
                        escape_html(&mut self.writer, class)?;
                    }
                    self.write("\"")?;
                }
                for (attr, value) in attrs {
                    self.write(" ")?;
                    escape_html(&mut self.writer, &attr)?;
                    if let Some(val) = value {
                        self.write("=\"")?;
                        escape_html(&mut self.writer, &val)?;
                        self.write("\"")?;
                    } else {
                        self.write("=\"\"")?;
                    }
                }
                self.write(">")
            }
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.write("<table>")
            }
            Tag::TableHead => {
                self.table_state = TableState::Head;
                self.table_cell_index = 0;
                self.write("<thead><tr>")
            }
            Tag::TableRow => {
                self.table_cell_index = 0;
                self.write("<tr>")
            }
            Tag::TableCell => {
                match self.table_state {
                    TableState::Head => {
                        self.write("<th")?;
                    }
                    TableState::Body => {
                        self.write("<td")?;
                    }
                }
                match self.table_alignments.get(self.table_cell_index) {
                    Some(&Alignment::Left) => self.write(" style=\"text-align: left\">"),
                    Some(&Alignment::Center) => self.write(" style=\"text-align: center\">"),
                    Some(&Alignment::Right) => self.write(" style=\"text-align: right\">"),
                    _ => self.write(">"),
                }
            }
            Tag::BlockQuote(kind) => {
                let class_str = match kind {
                    None => "",
                    Some(kind) => match kind {
                        BlockQuoteKind::Note => " class=\"markdown-alert-note\"",
                        BlockQuoteKind::Tip => " class=\"markdown-alert-tip\"",
                        BlockQuoteKind::Important => " class=\"markdown-alert-important\"",
                        BlockQuoteKind::Warning => " class=\"markdown-alert-warning\"",
                        BlockQuoteKind::Caution => " class=\"markdown-alert-caution\"",
                    },
                };
                if self.end_newline {
                    self.write(&format!("<blockquote{}>\n", class_str))
                } else {
                    self.write(&format!("\n<blockquote{}>\n", class_str))
                }
            }
            Tag::CodeBlock(info) => {
                if !self.end_newline {
                    self.write_newline()?;
                }
                let lang = match info {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code_buffer = Some((lang, String::new()));
                Ok(())
            }
            Tag::List(Some(1)) => {
                if self.end_newline {
                    self.write("<ol>\n")
                } else {
                    self.write("\n<ol>\n")
                }
            }
            Tag::List(Some(start)) => {
                if self.end_newline {
                    self.write("<ol start=\"")?;
                } else {
                    self.write("\n<ol start=\"")?;
                }
                write!(&mut self.writer, "{}", start)?;
                self.write("\">\n")
            }
            Tag::List(None) => {
                if self.end_newline {
                    self.write("<ul>\n")
                } else {
                    self.write("\n<ul>\n")
                }
            }
            Tag::Item => {
                if self.end_newline {
                    self.write("<li>")
                } else {
                    self.write("\n<li>")
                }
            }
            Tag::DefinitionList => {
                if self.end_newline {
                    self.write("<dl>\n")
                } else {
                    self.write("\n<dl>\n")
                }
            }
            Tag::DefinitionListTitle => {
                if self.end_newline {
                    self.write("<dt>")
                } else {
                    self.write("\n<dt>")
                }
            }
            Tag::DefinitionListDefinition => {
                if self.end_newline {
                    self.write("<dd>")
                } else {
                    self.write("\n<dd>")
                }
            }
            Tag::Subscript => self.write("<sub>"),
            Tag::Superscript => self.write("<sup>"),
            Tag::Emphasis => self.write("<em>"),
            Tag::Strong => self.write("<strong>"),
            Tag::Strikethrough => self.write("<del>"),
            Tag::Link {
                link_type: LinkType::Email,
                dest_url,
                title,
                id: _,
            } => {
                self.link_depth += 1;
                self.write("<a href=\"mailto:")?;
                escape_href(&mut self.writer, &dest_url)?;
                if !title.is_empty() {
                    self.write("\" title=\"")?;
                    escape_html(&mut self.writer, &title)?;
                }
                self.write("\">")
            }
            Tag::Link {
                link_type: _,
                dest_url,
                title,
                id: _,
            } => {
                self.link_depth += 1;
                self.write("<a href=\"")?;
                escape_href(&mut self.writer, &dest_url)?;
                if !title.is_empty() {
                    self.write("\" title=\"")?;
                    escape_html(&mut self.writer, &title)?;
                }
                self.write("\">")
            }
            Tag::Image {
                link_type: _,
                dest_url,
                title,
                id: _,
                attrs: _,
            } => {
                self.write("<img src=\"")?;
                escape_href(&mut self.writer, &dest_url)?;
                self.write("\" alt=\"")?;
                self.raw_text()?;
                if !title.is_empty() {
                    self.write("\" title=\"")?;
                    escape_html(&mut self.writer, &title)?;
                }
                self.write("\" />")
            }
            Tag::FootnoteDefinition(name) => {
                if self.end_newline {
                    self.write("<div class=\"footnote-definition\" id=\"")?;
                } else {
                    self.write("\n<div class=\"footnote-definition\" id=\"")?;
                }
                escape_html(&mut self.writer, &name)?;
                self.write("\"><sup class=\"footnote-definition-label\">")?;
                let len = self.numbers.len() + 1;
                let number = *self.numbers.entry(name).or_insert(len);
                write!(&mut self.writer, "{}", number)?;
                self.write("</sup>")
            }
            Tag::MetadataBlock(_) | Tag::WeaverBlock(..) => {
                self.in_non_writing_block = true;
                Ok(())
            }
            // Embeds are only produced with obsidian embeds enabled.
            Tag::Embed { .. } => Ok(()),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), W::Error> {
        match tag {
            TagEnd::HtmlBlock => {}
            TagEnd::Paragraph => {
                self.write("</p>\n")?;
            }
            TagEnd::Heading(level) => {
                self.write("</")?;
                write!(&mut self.writer, "{}", level)?;
                self.write(">\n")?;
            }
            TagEnd::Table => {
                self.write("</tbody></table>\n")?;
            }
            TagEnd::TableHead => {
                self.write("</tr></thead><tbody>\n")?;
                self.table_state = TableState::Body;
            }
            TagEnd::TableRow => {
                self.write("</tr>\n")?;
            }
            TagEnd::TableCell => {
                match self.table_state {
                    TableState::Head => {
                        self.write("</th>")?;
                    }
                    TableState::Body => {
                        self.write("</td>")?;
                    }
                }
                self.table_cell_index += 1;
            }
            TagEnd::BlockQuote(_) => {
                self.write("</blockquote>\n")?;
            }
            TagEnd::CodeBlock => {
                if let Some((lang, buffer)) = self.code_buffer.take() {
                    self.write_code_block(lang.as_deref(), &buffer)?;
                }
            }
            TagEnd::List(true) => {
                self.write("</ol>\n")?;
            }
            TagEnd::List(false) => {
                self.write("</ul>\n")?;
            }
            TagEnd::Item => {
                self.write("</li>\n")?;
            }
            TagEnd::DefinitionList => {
                self.write("</dl>\n")?;
            }
            TagEnd::DefinitionListTitle => {
                self.write("</dt>\n")?;
            }
            TagEnd::DefinitionListDefinition => {
                self.write("</dd>\n")?;
            }
            TagEnd::Emphasis => {
                self.write("</em>")?;
            }
            TagEnd::Superscript => {
                self.write("</sup>")?;
            }
            TagEnd::Subscript => {
                self.write("</sub>")?;
            }
            TagEnd::Strong => {
                self.write("</strong>")?;
            }
            TagEnd::Strikethrough => {
                self.write("</del>")?;
            }
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.write("</a>")?;
            }
            TagEnd::Image => (), // consumed by raw_text
            TagEnd::Embed => (),
            TagEnd::WeaverBlock(_) | TagEnd::MetadataBlock(_) => {
                self.in_non_writing_block = false;
            }
            TagEnd::FootnoteDefinition => {
                self.write("</div>\n")?;
            }
        }
        Ok(())
    }

    /// Writes a buffered code block, highlighted when the language is known.
    fn write_code_block(&mut self, lang: Option<&str>, buffer: &str) -> Result<(), W::Error> {
        let Some(lang) = lang else {
            self.write("<pre><code>")?;
            escape_html_body_text(&mut self.writer, buffer)?;
            return self.write("</code></pre>\n");
        };

        self.write("<pre><code class=\"language-")?;
        escape_html(&mut self.writer, lang)?;
        self.write("\">")?;
        let highlighted = self.highlighter.highlight(lang, buffer);
        write_code_body(&mut self.writer, buffer, highlighted)?;
        self.write("</code></pre>\n")
    }

    // run raw text, consuming end tag
    fn raw_text(&mut self) -> Result<(), W::Error> {
        let mut nest = 0;
        while let Some(event) = self.iter.next() {
            match event {
                Start(_) => nest += 1,
                End(_) => {
                    if nest == 0 {
                        break;
                    }
                    nest -= 1;
                }
                Html(_) => {}
                InlineHtml(text) | Code(text) | Text(text) => {
                    // Don't use escape_html_body_text here.
                    // The output of this function is used in the `alt` attribute.
                    escape_html(&mut self.writer, &text)?;
                    self.end_newline = text.ends_with('\n');
                }
                SoftBreak | HardBreak | Rule => {
                    self.write(" ")?;
                }
                FootnoteReference(name) => {
                    let len = self.numbers.len() + 1;
                    let number = *self.numbers.entry(name).or_insert(len);
                    write!(&mut self.writer, "[{}]", number)?;
                }
                TaskListMarker(true) => self.write("[x]")?,
                TaskListMarker(false) => self.write("[ ]")?,
                InlineMath(_) | DisplayMath(_) | WeaverBlock(_) => {}
            }
        }
        Ok(())
    }
}

/// Drops trailing punctuation that usually ends the sentence rather than the URL.
///
/// A closing parenthesis is kept when the URL contains its opening partner.
fn trim_url_tail(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let drop = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '*' | '_' | '~' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            _ => false,
        };
        if !drop {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

/// Writes highlighted markup, or the escaped code when there is none.
///
/// Highlighting failures are logged and never reach the caller.
fn write_code_body<W: StrWrite>(
    writer: &mut W,
    code: &str,
    highlighted: Result<Option<String>, HighlightError>,
) -> Result<(), W::Error> {
    match highlighted {
        Ok(Some(html)) => writer.write_str(&html),
        Ok(None) => escape_html_body_text(writer, code),
        Err(err) => {
            tracing::warn!(error = %err, "highlighting failed, emitting plain code");
            escape_html_body_text(writer, code)
        }
    }
}

/// Iterate over an `Iterator` of `Event`s, generate HTML for each `Event`, and
/// write it into a Unicode-accepting buffer.
pub(crate) fn write_html_fmt<'a, I, W>(
    writer: W,
    iter: I,
    highlighter: &CodeHighlighter,
) -> core::fmt::Result
where
    I: Iterator<Item = Event<'a>>,
    W: core::fmt::Write,
{
    HtmlWriter::new(iter, FmtWriter(writer), highlighter).run()
}
