//! Markdown to HTML conversion.

use std::collections::HashMap;
use std::fmt::Write;

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::text::{escape_html, slugify};

/// Result of rendering a markdown document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Title extracted from the first H1 heading (if extraction was enabled).
    pub title: Option<String>,
}

/// Markdown to HTML renderer.
///
/// Supports tables and strikethrough on top of CommonMark. Headings receive
/// slug IDs so section anchors stay stable across rebuilds. The first H1 can
/// optionally be captured as the document title; it is still rendered.
pub struct MarkdownRenderer {
    output: String,
    extract_title: bool,
    title: Option<String>,
    /// Heading capture: plain text feeds the slug and title, html keeps
    /// inline formatting.
    heading_level: Option<u8>,
    heading_text: String,
    heading_html: String,
    heading_ids: HashMap<String, usize>,
    in_code_block: bool,
    code_lang: Option<String>,
    code_buf: String,
    table_alignments: Vec<Alignment>,
    table_cell: usize,
    in_table_head: bool,
    /// Alt text arrives as child events; the img tag is written on `TagEnd`.
    image_alt: Option<String>,
    pending_image: Option<(String, String)>,
}

impl MarkdownRenderer {
    /// Create a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            extract_title: false,
            title: None,
            heading_level: None,
            heading_text: String::new(),
            heading_html: String::new(),
            heading_ids: HashMap::new(),
            in_code_block: false,
            code_lang: None,
            code_buf: String::new(),
            table_alignments: Vec::new(),
            table_cell: 0,
            in_table_head: false,
            image_alt: None,
            pending_image: None,
        }
    }

    /// Enable title extraction from the first H1 heading.
    ///
    /// The heading is still rendered; its plain text is additionally
    /// reported in [`RenderResult::title`].
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Render a markdown document and return the HTML with extracted title.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, parser_options());
        for event in parser {
            self.process_event(event);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.title.take(),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                // Not produced with the enabled parser options
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the slug ID is known.
                self.heading_level = Some(heading_level_to_num(level));
                self.heading_text.clear();
                self.heading_html.clear();
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                // Fence info may carry attributes after the language token.
                self.code_lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code_buf.clear();
                self.in_code_block = true;
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.table_cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table_cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.cell_alignment_style();
                let cell = if self.in_table_head { "th" } else { "td" };
                let _ = write!(self.output, "<{cell}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let link = format!(r#"<a href="{}">"#, escape_html(&dest_url));
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image_alt = Some(String::new());
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => self.finish_heading(),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.in_table_head {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table_cell += 1;
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => self.finish_image(),
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn finish_heading(&mut self) {
        let Some(level) = self.heading_level.take() else {
            return;
        };
        let text = std::mem::take(&mut self.heading_text);
        let html = std::mem::take(&mut self.heading_html);
        let id = self.heading_id(&text);

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(text.trim().to_owned());
        }

        let _ = write!(
            self.output,
            r#"<h{level} id="{id}">{}</h{level}>"#,
            html.trim()
        );
    }

    /// Generate a unique slug ID for a heading.
    fn heading_id(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.heading_ids.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }

    fn finish_code_block(&mut self) {
        self.in_code_block = false;
        let content = std::mem::take(&mut self.code_buf);
        match self.code_lang.take() {
            Some(lang) => {
                let _ = write!(
                    self.output,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(&lang),
                    escape_html(&content)
                );
            }
            None => {
                let _ = write!(
                    self.output,
                    "<pre><code>{}</code></pre>",
                    escape_html(&content)
                );
            }
        }
    }

    fn finish_image(&mut self) {
        let alt = self.image_alt.take().unwrap_or_default();
        let Some((src, title)) = self.pending_image.take() else {
            return;
        };
        if title.is_empty() {
            let _ = write!(
                self.output,
                r#"<img src="{}" alt="{}">"#,
                escape_html(&src),
                escape_html(&alt)
            );
        } else {
            let _ = write!(
                self.output,
                r#"<img src="{}" title="{}" alt="{}">"#,
                escape_html(&src),
                escape_html(&title),
                escape_html(&alt)
            );
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            self.code_buf.push_str(text);
        } else if let Some(alt) = self.image_alt.as_mut() {
            alt.push_str(text);
        } else if self.heading_level.is_some() {
            self.heading_text.push_str(text);
            self.heading_html.push_str(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading_level.is_some() {
            self.heading_text.push_str(code);
            let _ = write!(self.heading_html, "<code>{}</code>", escape_html(code));
        } else {
            let _ = write!(self.output, "<code>{}</code>", escape_html(code));
        }
    }

    fn soft_break(&mut self) {
        if self.in_code_block {
            self.code_buf.push('\n');
        } else {
            self.output.push('\n');
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading_level.is_some() {
            self.heading_html.push_str(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn cell_alignment_style(&self) -> &'static str {
        match self.table_alignments.get(self.table_cell) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser options for the supported markdown extensions.
fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
