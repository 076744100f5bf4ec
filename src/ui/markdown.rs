//! Markdown rendering for answers.
//!
//! Two targets share one parser configuration:
//! - [`render_html`] produces a fragment that is safe to drop into a page.
//!   Raw HTML from the model is escaped, never passed through, and link or
//!   image targets with script-capable schemes are replaced by `#`.
//! - [`render_lines`] produces styled ratatui lines for the history panel.

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, Sender};
use crate::ui::theme::Theme;

const BLOCKED_SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "data:", "file:"];

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Whether a link destination may be emitted as-is.
///
/// Browsers ignore embedded whitespace and control characters when reading
/// a scheme, so those are stripped before comparing.
pub fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    !BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

/// Markdown to a sanitized HTML fragment.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options()).map(sanitize_event);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Transcript as page markup: one `div.message` per entry, the placeholder
/// as three empty spans.
pub fn render_transcript_html(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str("<div class=\"message ");
        out.push_str(message.sender.css_class());
        out.push_str("\">");
        if message.is_pending() {
            out.push_str("<span></span><span></span><span></span>");
        } else {
            out.push_str(&render_html(&message.content));
        }
        out.push_str("</div>\n");
    }
    out
}

type Cell = Vec<Span<'static>>;

/// Cells collected while inside a table; laid out once the table ends.
#[derive(Default)]
struct TableBuffer {
    rows: Vec<Vec<Cell>>,
    header_rows: usize,
}

impl TableBuffer {
    fn start_row(&mut self) {
        self.rows.push(Vec::new());
    }

    fn push_cell(&mut self, cell: Cell) {
        if let Some(row) = self.rows.last_mut() {
            row.push(cell);
        }
    }

    fn cell_width(cell: &[Span<'_>]) -> usize {
        cell.iter().map(|span| span.content.width()).sum()
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| Self::cell_width(cell))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn border(widths: &[usize], left: &str, mid: &str, right: &str, style: Style) -> Line<'static> {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        Line::from(Span::styled(format!("{left}{}{right}", inner.join(mid)), style))
    }

    fn into_lines(self, header_style: Style, border_style: Style) -> Vec<Line<'static>> {
        let widths = self.column_widths();
        if widths.is_empty() {
            return Vec::new();
        }
        let mut lines = vec![Self::border(&widths, "┌", "┬", "┐", border_style)];
        let row_count = self.rows.len();
        for (index, mut row) in self.rows.into_iter().enumerate() {
            let header = index < self.header_rows;
            row.resize_with(widths.len(), Vec::new);
            let mut spans = Vec::new();
            for (cell, width) in row.into_iter().zip(&widths) {
                let pad = width - Self::cell_width(&cell);
                spans.push(Span::styled("│ ", border_style));
                for span in cell {
                    if header {
                        let style = span.style.patch(header_style);
                        spans.push(Span::styled(span.content, style));
                    } else {
                        spans.push(span);
                    }
                }
                spans.push(Span::raw(" ".repeat(pad + 1)));
            }
            spans.push(Span::styled("│", border_style));
            lines.push(Line::from(spans));
            if header && index + 1 == self.header_rows && index + 1 < row_count {
                lines.push(Self::border(&widths, "├", "┼", "┤", border_style));
            }
        }
        lines.push(Self::border(&widths, "└", "┴", "┘", border_style));
        lines
    }
}

struct LineRenderer<'t> {
    theme: &'t Theme,
    base: Style,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    link_urls: Vec<String>,
    link_text: String,
    in_code_block: bool,
    table: Option<TableBuffer>,
}

impl<'t> LineRenderer<'t> {
    fn new(theme: &'t Theme, base: Style) -> Self {
        Self {
            theme,
            base,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![base],
            lists: Vec::new(),
            link_urls: Vec::new(),
            link_text: String::new(),
            in_code_block: false,
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, patch: Style) {
        let next = self.style().patch(patch);
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if !self.link_urls.is_empty() {
            self.link_text.push_str(text);
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank(&mut self) {
        self.flush();
        let previous_blank = self
            .lines
            .last()
            .map(|line| line.spans.iter().all(|s| s.content.trim().is_empty()))
            .unwrap_or(true);
        if !previous_blank {
            self.lines.push(Line::default());
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let mut style = self.theme.md_heading_style;
                if level == HeadingLevel::H1 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                self.push_style(style);
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::raw("  ".repeat(depth)));
                self.spans
                    .push(Span::styled(marker, self.theme.md_list_marker_style));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_urls.push(dest_url.to_string());
                self.link_text.clear();
                self.push_style(self.theme.md_link_style);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::HtmlBlock => self.flush(),
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableBuffer::default());
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.start_row();
                }
            }
            Tag::TableCell => self.flush(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.blank();
                } else {
                    self.flush();
                }
            }
            TagEnd::Heading(_) => {
                self.pop_style();
                self.blank();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_urls.pop() {
                    let shown = url.trim_start_matches("mailto:");
                    if !url.is_empty() && shown != self.link_text.trim() {
                        self.spans
                            .push(Span::styled(format!(" ({url})"), self.theme.md_link_url_style));
                    }
                }
                self.link_text.clear();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::HtmlBlock => self.blank(),
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.spans);
                if let Some(table) = self.table.as_mut() {
                    table.push_cell(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header_rows = table.rows.len();
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    let header = self.style().patch(self.theme.md_heading_style);
                    let lines = table.into_lines(header, self.theme.md_rule_style);
                    self.lines.extend(lines);
                }
                self.blank();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.theme.md_code_block_style;
            for line in text.lines() {
                self.lines
                    .push(Line::from(Span::styled(format!("    {line}"), style)));
            }
            return;
        }
        let style = self.style();
        self.push_text(text, style);
    }

    fn render(mut self, markdown: &str) -> Vec<Line<'static>> {
        for event in Parser::new_ext(markdown, parser_options()) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(tag) => self.end(tag),
                Event::Text(text) | Event::InlineHtml(text) => self.text(&text),
                Event::Html(block) => {
                    let style = self.style();
                    for line in block.lines() {
                        self.push_text(line, style);
                        self.flush();
                    }
                }
                Event::Code(code) => {
                    let style = self.theme.md_inline_code_style;
                    self.push_text(&code, style);
                }
                Event::SoftBreak => {
                    let style = self.style();
                    self.push_text(" ", style);
                }
                Event::HardBreak => self.flush(),
                Event::Rule => {
                    self.flush();
                    self.lines
                        .push(Line::from(Span::styled("─".repeat(24), self.theme.md_rule_style)));
                    self.blank();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.spans
                        .push(Span::styled(marker, self.theme.md_list_marker_style));
                }
                _ => {}
            }
        }

        self.flush();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|s| s.content.trim().is_empty()))
        {
            self.lines.pop();
        }
        self.lines
    }
}

/// Markdown to terminal lines in the given base style.
pub fn render_lines(markdown: &str, base: Style, theme: &Theme) -> Vec<Line<'static>> {
    LineRenderer::new(theme, base).render(markdown)
}

/// Lines for a whole transcript entry, without the spacer that separates
/// messages. `frame` drives the placeholder animation.
pub fn render_message_lines(message: &Message, theme: &Theme, frame: usize) -> Vec<Line<'static>> {
    match message.sender {
        Sender::User => {
            let mut lines: Vec<Line<'static>> = Vec::new();
            for (index, text) in message.content.lines().enumerate() {
                let prefix = if index == 0 { "You: " } else { "     " };
                lines.push(Line::from(vec![
                    Span::styled(prefix, theme.user_prefix_style),
                    Span::styled(text.to_string(), theme.user_text_style),
                ]));
            }
            if lines.is_empty() {
                lines.push(Line::from(Span::styled("You: ", theme.user_prefix_style)));
            }
            lines
        }
        Sender::Assistant => render_lines(&message.content, theme.assistant_text_style, theme),
        Sender::Pending => {
            let active = frame % 3;
            let dots: Vec<Span<'static>> = (0..3)
                .map(|i| {
                    let style = if i == active {
                        theme.pending_dot_active_style
                    } else {
                        theme.pending_dot_style
                    };
                    Span::styled(if i < 2 { "● " } else { "●" }, style)
                })
                .collect();
            vec![Line::from(dots)]
        }
    }
}
