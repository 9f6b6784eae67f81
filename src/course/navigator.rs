//! Chapter list, lock state and completion tracking

use std::collections::HashSet;

use crate::api::CompleteChapterResponse;

use super::model::{Chapter, Course};

/// Owns the chapter list and everything the learner has unlocked or finished
#[derive(Debug, Clone, Default)]
pub struct CourseNavigator {
    /// Table of contents markdown
    table_of_contents: String,
    /// Title of the chapter the course starts with
    first_chapter_title: Option<String>,
    /// Chapters in course order
    chapters: Vec<Chapter>,
    /// Titles of completed chapters
    completed: HashSet<String>,
}

impl CourseNavigator {
    /// Create a navigator for a freshly loaded course
    pub fn new(course: Course) -> Self {
        Self {
            table_of_contents: course.table_of_contents,
            first_chapter_title: course.first_chapter_title,
            chapters: course.chapters,
            completed: HashSet::new(),
        }
    }

    pub fn table_of_contents(&self) -> &str {
        &self.table_of_contents
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Title of the first chapter, falling back to the head of the chapter list
    pub fn first_chapter_title(&self) -> Option<&str> {
        self.first_chapter_title
            .as_deref()
            .or_else(|| self.chapters.first().map(|c| c.title.as_str()))
    }

    pub fn chapter(&self, title: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.title == title)
    }

    pub fn is_completed(&self, title: &str) -> bool {
        self.completed.contains(title)
    }

    /// Number of completed chapters
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// A chapter can be opened when it is not locked or already completed.
    /// Unknown titles are never unlocked.
    pub fn is_unlocked(&self, title: &str) -> bool {
        if self.is_completed(title) {
            return true;
        }
        self.chapter(title).is_some_and(|c| !c.locked)
    }

    /// First chapter that is unlocked, not completed and not `current`
    pub fn next_unlocked_after(&self, current: Option<&str>) -> Option<&Chapter> {
        self.chapters.iter().find(|c| {
            !c.locked && !self.is_completed(&c.title) && Some(c.title.as_str()) != current
        })
    }

    /// Apply a successful completion of `title`
    ///
    /// The chapter list is replaced wholesale by the unlocked chapters the
    /// backend returned. Cached markdown carries over for chapters that keep
    /// their title. Returns the title of the newly unlocked chapter, if any.
    pub fn apply_completion(
        &mut self,
        title: &str,
        response: CompleteChapterResponse,
    ) -> Option<String> {
        let mut chapters: Vec<Chapter> =
            response.unlocked_chapters.into_iter().map(Chapter::from).collect();
        for chapter in &mut chapters {
            chapter.content = self.cached_content(&chapter.title).map(str::to_string);
        }

        self.chapters = chapters;
        self.completed.insert(title.to_string());

        response.next_chapter.map(|c| c.title)
    }

    /// Progress through a chapter as a percentage
    ///
    /// Completed chapters are at 100. The chapter being read reports how far
    /// the cursor is through its sections. Everything else is at 0.
    pub fn chapter_progress(&self, title: &str, active: Option<(&str, usize, usize)>) -> u8 {
        if self.is_completed(title) {
            return 100;
        }
        match active {
            Some((current, index, len)) if current == title && len > 0 => {
                let ratio = index.min(len) as f64 / len as f64;
                (ratio * 100.0).round() as u8
            }
            _ => 0,
        }
    }

    /// Remember fetched markdown for a chapter
    pub fn cache_content(&mut self, title: &str, content: impl Into<String>) {
        if let Some(chapter) = self.chapters.iter_mut().find(|c| c.title == title) {
            chapter.content = Some(content.into());
        }
    }

    pub fn cached_content(&self, title: &str) -> Option<&str> {
        self.chapter(title).and_then(|c| c.content.as_deref())
    }

    /// Forget every completed chapter (restart)
    pub fn reset_progress(&mut self) {
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChapterInfo;

    fn navigator() -> CourseNavigator {
        let mut first = Chapter::new("Basics", 1, false);
        first.content = Some("# Basics\nintro".into());
        CourseNavigator::new(Course {
            table_of_contents: "# Contents".into(),
            first_chapter_title: Some("Basics".into()),
            chapters: vec![
                first,
                Chapter::new("Financing", 2, true),
                Chapter::new("Exit", 3, true),
            ],
        })
    }

    fn info(title: &str, number: u32, locked: bool) -> ChapterInfo {
        ChapterInfo { title: title.into(), number, locked }
    }

    #[test]
    fn locked_chapters_are_not_unlocked() {
        let nav = navigator();
        assert!(nav.is_unlocked("Basics"));
        assert!(!nav.is_unlocked("Financing"));
        assert!(!nav.is_unlocked("Missing"));
    }

    #[test]
    fn first_chapter_falls_back_to_list_head() {
        let nav = CourseNavigator::new(Course {
            table_of_contents: String::new(),
            first_chapter_title: None,
            chapters: vec![Chapter::new("Only", 1, false)],
        });
        assert_eq!(nav.first_chapter_title(), Some("Only"));
    }

    #[test]
    fn completion_replaces_chapter_list() {
        let mut nav = navigator();
        let response = CompleteChapterResponse {
            unlocked_chapters: vec![
                info("Basics", 1, false),
                info("Financing", 2, false),
                info("Exit", 3, true),
            ],
            next_chapter: Some(info("Financing", 2, false)),
        };

        let next = nav.apply_completion("Basics", response);
        assert_eq!(next.as_deref(), Some("Financing"));
        assert!(nav.is_completed("Basics"));
        assert!(nav.is_unlocked("Financing"));
        assert!(!nav.is_unlocked("Exit"));
        assert_eq!(nav.cached_content("Basics"), Some("# Basics\nintro"));
    }

    #[test]
    fn completed_chapter_stays_unlocked_even_if_flagged_locked() {
        let mut nav = navigator();
        let response = CompleteChapterResponse {
            unlocked_chapters: vec![info("Basics", 1, true)],
            next_chapter: None,
        };
        assert_eq!(nav.apply_completion("Basics", response), None);
        assert!(nav.is_unlocked("Basics"));
    }

    #[test]
    fn next_unlocked_skips_current_and_completed() {
        let mut nav = navigator();
        assert_eq!(nav.next_unlocked_after(Some("Basics")), None);
        assert_eq!(nav.next_unlocked_after(None).map(|c| c.title.as_str()), Some("Basics"));

        let response = CompleteChapterResponse {
            unlocked_chapters: vec![info("Basics", 1, false), info("Financing", 2, false)],
            next_chapter: Some(info("Financing", 2, false)),
        };
        nav.apply_completion("Basics", response);
        assert_eq!(
            nav.next_unlocked_after(Some("Basics")).map(|c| c.title.as_str()),
            Some("Financing")
        );
        assert_eq!(nav.next_unlocked_after(Some("Financing")), None);
    }

    #[test]
    fn progress_percentages() {
        let mut nav = navigator();
        assert_eq!(nav.chapter_progress("Basics", Some(("Basics", 1, 3))), 33);
        assert_eq!(nav.chapter_progress("Basics", Some(("Basics", 2, 3))), 67);
        assert_eq!(nav.chapter_progress("Basics", Some(("Basics", 0, 0))), 0);
        assert_eq!(nav.chapter_progress("Financing", Some(("Basics", 2, 3))), 0);
        assert_eq!(nav.chapter_progress("Basics", None), 0);

        nav.apply_completion(
            "Basics",
            CompleteChapterResponse { unlocked_chapters: vec![], next_chapter: None },
        );
        assert_eq!(nav.chapter_progress("Basics", None), 100);
    }

    #[test]
    fn cache_and_reset() {
        let mut nav = navigator();
        nav.cache_content("Financing", "# Debt");
        assert_eq!(nav.cached_content("Financing"), Some("# Debt"));
        assert_eq!(nav.cached_content("Missing"), None);

        nav.apply_completion(
            "Basics",
            CompleteChapterResponse {
                unlocked_chapters: vec![info("Basics", 1, false)],
                next_chapter: None,
            },
        );
        assert_eq!(nav.completed_count(), 1);
        nav.reset_progress();
        assert_eq!(nav.completed_count(), 0);
        assert!(!nav.is_completed("Basics"));
    }
}
