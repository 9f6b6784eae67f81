//! Splitting chapter markdown into sections

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Section;

/// Leading outline number such as "1.2 " in a section title (compiled once)
static OUTLINE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)*\s*").unwrap());

/// Split chapter markdown into sections
///
/// A line whose trimmed form starts with `#` opens a new section. Its title is
/// the line with every `#` removed, and its content starts with the heading
/// line itself. Following lines belong to the open section until the next
/// heading. Lines before the first heading are dropped, so markdown without
/// headings yields no sections.
pub fn parse_content_into_sections(markdown: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in markdown.split('\n') {
        if line.trim().starts_with('#') {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section::new(line.replace('#', "").trim(), line));
        } else if let Some(section) = current.as_mut() {
            section.content.push('\n');
            section.content.push_str(line);
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    sections
}

/// Strip a leading outline number ("2.1 Cap Rates" -> "Cap Rates")
pub fn strip_outline_prefix(title: &str) -> &str {
    match OUTLINE_PREFIX_RE.find(title) {
        Some(m) => &title[m.end()..],
        None => title,
    }
}

/// Whether a section holds supplementary content that is shown without a pause
pub fn is_factoid(title: &str) -> bool {
    strip_outline_prefix(title.trim()).to_lowercase().starts_with("factoid")
}
