//! Markdown to styled terminal lines
//!
//! Chat messages are markdown. This renders them straight from the
//! pulldown-cmark event stream into wrapped ratatui lines.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Theme;

/// Render `markdown` into lines no wider than `width`
pub fn render_markdown(markdown: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut renderer = Renderer::new(theme, width);

    for event in Parser::new_ext(markdown, options) {
        renderer.event(event);
    }

    renderer.finish()
}

/// A table being collected cell by cell
#[derive(Default)]
struct TableBuffer {
    rows: Vec<Vec<String>>,
    cell: String,
}

struct Renderer<'t> {
    theme: &'t Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    /// Spans of the block being built
    spans: Vec<Span<'static>>,
    /// Inline style stack
    styles: Vec<Style>,
    /// One entry per open list: the next item number, or `None` for bullets
    lists: Vec<Option<u64>>,
    /// Marker for the first line of the current list item
    bullet: Option<String>,
    quote_depth: usize,
    in_code_block: bool,
    table: Option<TableBuffer>,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme, width: usize) -> Self {
        Self {
            theme,
            width,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![Style::default().fg(theme.fg_primary)],
            lists: Vec::new(),
            bullet: None,
            quote_depth: 0,
            in_code_block: false,
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let style = f(self.style());
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = &mut self.table {
                    table.cell.push_str(&code);
                } else {
                    let style =
                        Style::default().fg(self.theme.md_code).bg(self.theme.bg_secondary);
                    self.spans.push(Span::styled(code.to_string(), style));
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                let rule = "─".repeat(self.width.max(1));
                let style = Style::default().fg(self.theme.border);
                self.lines.push(Line::from(Span::styled(rule, style)));
                self.blank();
            }
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.blank();
                let theme = self.theme;
                self.push_style(|s| match level {
                    HeadingLevel::H1 => s
                        .fg(theme.md_heading)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    HeadingLevel::H2 => s.fg(theme.md_heading).add_modifier(Modifier::BOLD),
                    _ => s.fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
                });
            }
            Tag::Strong => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Tag::Emphasis => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Tag::Strikethrough => self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { .. } => {
                let link = self.theme.md_link;
                self.push_style(|s| s.fg(link).add_modifier(Modifier::UNDERLINED));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.bullet = Some(marker);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                let quote = self.theme.md_quote;
                self.push_style(|s| s.fg(quote).add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableBuffer::default());
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table.rows.push(Vec::new());
                }
            }
            Tag::TableCell => {
                if let Some(table) = &mut self.table {
                    table.cell.clear();
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.blank();
            }
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            TagEnd::Item => self.flush(),
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::TableCell => {
                if let Some(table) = &mut self.table {
                    let cell = std::mem::take(&mut table.cell).trim().to_string();
                    if let Some(row) = table.rows.last_mut() {
                        row.push(cell);
                    }
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.render_table(table.rows);
                }
                self.blank();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(table) = &mut self.table {
            table.cell.push_str(text);
            return;
        }

        if self.in_code_block {
            let style = Style::default().fg(self.theme.md_code);
            for line in text.lines() {
                self.lines.push(Line::from(vec![
                    Span::styled("  ", style),
                    Span::styled(line.to_string(), style),
                ]));
            }
            return;
        }

        self.spans.push(Span::styled(text.to_string(), self.style()));
    }

    /// Prefixes for the first and following lines of the current block
    fn prefixes(&mut self) -> (String, String) {
        let mut lead = "│ ".repeat(self.quote_depth);
        lead.push_str(&"  ".repeat(self.lists.len().saturating_sub(1)));

        match self.bullet.take() {
            Some(bullet) => {
                let hang = " ".repeat(bullet.chars().count());
                (format!("{}{}", lead, bullet), format!("{}{}", lead, hang))
            }
            None => {
                let hang = if self.lists.is_empty() { String::new() } else { "  ".to_string() };
                (format!("{}{}", lead, hang), format!("{}{}", lead, hang))
            }
        }
    }

    /// Wrap the pending spans into lines
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        let (first, rest) = self.prefixes();
        let width = self.width.saturating_sub(first.chars().count());
        let prefix_style = Style::default().fg(self.theme.fg_muted);

        for (i, line) in wrap_spans(spans, width).into_iter().enumerate() {
            let prefix = if i == 0 { &first } else { &rest };
            let mut all = Vec::with_capacity(line.spans.len() + 1);
            if !prefix.is_empty() {
                all.push(Span::styled(prefix.clone(), prefix_style));
            }
            all.extend(line.spans);
            self.lines.push(Line::from(all));
        }
    }

    fn render_table(&mut self, rows: Vec<Vec<String>>) {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![0; columns];
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        // Share what is left after the separators between columns
        let available = self.width.saturating_sub(3 * columns + 1).max(columns);
        let cap = (available / columns).max(3);
        for width in &mut widths {
            *width = (*width).min(cap).max(1);
        }

        let border = Style::default().fg(self.theme.border);
        for (row_idx, row) in rows.iter().enumerate() {
            let cell_style = if row_idx == 0 {
                Style::default().fg(self.theme.accent_primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg_primary)
            };

            let mut spans = vec![Span::styled("│ ", border)];
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                spans.push(Span::styled(pad_or_truncate(cell, *width), cell_style));
                spans.push(Span::styled(" │ ", border));
            }
            self.lines.push(Line::from(spans));

            if row_idx == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                let rule = format!("├─{}─┤", rule.join("─┼─"));
                self.lines.push(Line::from(Span::styled(rule, border)));
            }
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Pad string to width or truncate with ellipsis
fn pad_or_truncate(s: &str, width: usize) -> String {
    let char_count = s.chars().count();
    if char_count > width {
        let truncated: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        format!("{:width$}", s, width = width)
    }
}

/// Wrap styled spans into lines while preserving formatting
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let mut lines = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in spans {
        let style = span.style;

        for word in span.content.split_inclusive(char::is_whitespace) {
            let word_len = word.chars().count();

            if current_width + word_len > width && current_width > 0 {
                lines.push(Line::from(std::mem::take(&mut current_line)));
                current_width = 0;
            }

            // Leading spaces are dropped at the start of a wrapped line
            let word =
                if current_width == 0 && !lines.is_empty() { word.trim_start() } else { word };
            if word.is_empty() {
                continue;
            }
            current_line.push(Span::styled(word.to_string(), style));
            current_width += word.chars().count();
        }
    }

    if !current_line.is_empty() {
        lines.push(Line::from(current_line));
    }

    if lines.is_empty() {
        lines.push(Line::from(""));
    }

    lines
}
