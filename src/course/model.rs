//! Content model for a course
//!
//! A course is a table of contents plus an ordered list of chapters. Chapter
//! markdown is fetched lazily and cached on the chapter; sections are derived
//! from that markdown on demand and never stored here.

use serde::{Deserialize, Serialize};

use crate::api::{ChapterInfo, CourseContent};

/// A complete course as served by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    /// Table of contents markdown
    pub table_of_contents: String,
    /// Title of the chapter the course starts with
    pub first_chapter_title: Option<String>,
    /// Chapters in course order
    pub chapters: Vec<Chapter>,
}

impl From<CourseContent> for Course {
    fn from(content: CourseContent) -> Self {
        let mut chapters: Vec<Chapter> =
            content.all_chapters.into_iter().map(Chapter::from).collect();

        if let (Some(title), Some(markdown)) =
            (&content.first_chapter_title, content.first_chapter_content)
        {
            if let Some(chapter) = chapters.iter_mut().find(|c| &c.title == title) {
                chapter.content = Some(markdown);
            }
        }

        Self {
            table_of_contents: content.content,
            first_chapter_title: content.first_chapter_title,
            chapters,
        }
    }
}

/// A chapter in a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title (unique, used as the chapter identifier)
    pub title: String,
    /// Chapter number for display
    pub number: u32,
    /// Locked chapters cannot be opened until an earlier one is completed
    pub locked: bool,
    /// Cached markdown, if already fetched
    pub content: Option<String>,
}

impl Chapter {
    /// Create a new chapter without cached content
    pub fn new(title: impl Into<String>, number: u32, locked: bool) -> Self {
        Self { title: title.into(), number, locked, content: None }
    }
}

impl From<ChapterInfo> for Chapter {
    fn from(info: ChapterInfo) -> Self {
        Self::new(info.title, info.number, info.locked)
    }
}

/// A heading-delimited unit of chapter content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text without `#` markers
    pub title: String,
    /// Markdown including the heading line
    pub content: String,
}

impl Section {
    /// Create a new section
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }

    /// Whether the content holds a markdown table
    pub fn has_table(&self) -> bool {
        self.content.contains("| ---")
    }
}
