//! Style-preserving word wrap for history lines.
//!
//! History is wrapped here rather than by the paragraph widget so the row
//! count used for scrolling is exactly what gets drawn.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// A run of word or whitespace characters. A word may span several styles.
#[derive(Debug, Clone)]
struct Token {
    pieces: Vec<(String, Style)>,
    width: usize,
    space: bool,
}

impl Token {
    fn new(space: bool) -> Self {
        Self {
            pieces: Vec::new(),
            width: 0,
            space,
        }
    }

    fn push(&mut self, ch: char, style: Style) {
        self.width += char_width(ch);
        match self.pieces.last_mut() {
            Some((text, last)) if *last == style => text.push(ch),
            _ => self.pieces.push((ch.to_string(), style)),
        }
    }

    /// Hard-split an over-long word into chunks of at most `width` columns.
    fn split(self, width: usize) -> Vec<Token> {
        let mut chunks = Vec::new();
        let mut current = Token::new(false);
        for (text, style) in self.pieces {
            for ch in text.chars() {
                if current.width > 0 && current.width + char_width(ch) > width {
                    chunks.push(std::mem::replace(&mut current, Token::new(false)));
                }
                current.push(ch, style);
            }
        }
        if current.width > 0 {
            chunks.push(current);
        }
        chunks
    }
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn tokenize(line: &Line<'_>) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for span in &line.spans {
        for ch in span.content.chars() {
            let space = ch.is_whitespace();
            match tokens.last_mut() {
                Some(token) if token.space == space => token.push(ch, span.style),
                _ => {
                    let mut token = Token::new(space);
                    token.push(ch, span.style);
                    tokens.push(token);
                }
            }
        }
    }
    tokens
}

fn finish(mut row: Vec<Token>, style: Style) -> Line<'static> {
    while row.last().is_some_and(|token| token.space) {
        row.pop();
    }
    let spans: Vec<Span<'static>> = row
        .into_iter()
        .flat_map(|token| token.pieces)
        .map(|(text, style)| Span::styled(text, style))
        .collect();
    Line::from(spans).style(style)
}

/// Wrap one line to `width` columns. Leading indentation on the first row is
/// kept; continuation rows start at the next word.
pub fn wrap_line(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    let tokens = tokenize(line);
    if width == 0 || tokens.is_empty() {
        return vec![finish(tokens, line.style)];
    }

    let mut rows = Vec::new();
    let mut row: Vec<Token> = Vec::new();
    let mut row_width = 0usize;
    let mut continuation = false;

    for token in tokens {
        if token.space {
            if continuation && row.is_empty() {
                continue;
            }
            if row_width + token.width <= width {
                row_width += token.width;
                row.push(token);
            } else {
                rows.push(finish(std::mem::take(&mut row), line.style));
                row_width = 0;
                continuation = true;
            }
            continue;
        }

        if row_width + token.width <= width {
            row_width += token.width;
            row.push(token);
            continue;
        }

        if row_width > 0 {
            rows.push(finish(std::mem::take(&mut row), line.style));
            row_width = 0;
            continuation = true;
        }

        if token.width <= width {
            row_width = token.width;
            row.push(token);
        } else {
            let mut chunks = token.split(width);
            let last = chunks.pop();
            for chunk in chunks {
                rows.push(finish(vec![chunk], line.style));
            }
            if let Some(last) = last {
                row_width = last.width;
                row.push(last);
            }
            continuation = true;
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(finish(row, line.style));
    }
    rows
}

pub fn wrap_lines(lines: &[Line<'_>], width: usize) -> Vec<Line<'static>> {
    lines
        .iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}
