//! Fixed bot texts

use crate::course::strip_outline_prefix;

pub const COURSE_LOAD_FAILED: &str = "Sorry, there was a problem loading the course.";
pub const CHAPTER_LOAD_FAILED: &str = "Sorry, there was a problem loading the chapter.";
pub const ANSWER_FAILED: &str = "Sorry, I had trouble thinking of an answer.";
pub const NEXT_CHAPTER_UNAVAILABLE: &str = "Moving to the next chapter is not implemented yet!";
pub const COMPLETION_FALLBACK: &str = "Congratulations, you've completed this chapter!";
pub const COURSE_COMPLETE: &str = "\n\n🎓 Amazing! You've completed the entire course! You're now ready to apply your multifamily knowledge in the real world.";

pub fn ready_to_start(first_chapter: &str) -> String {
    format!("Are you ready to start with **{}**?", first_chapter)
}

/// Prompt shown between two sections
pub fn section_transition(current: &str, next: &str) -> String {
    format!(
        "Hope you understood **{}**. Let me know if you have any questions, otherwise, we can move on to the next section: **{}**",
        strip_outline_prefix(current),
        strip_outline_prefix(next)
    )
}

pub fn chapter_completed(title: &str) -> String {
    format!("🎉 Congratulations! You've completed **{}**!", title)
}

pub fn chapter_unlocked(next: &str) -> String {
    format!("\n\nGreat news! **{}** is now unlocked and ready for you.", next)
}

/// Actions offered after a chapter completes and `next` is unlocked
pub fn next_chapter_actions(next: &str) -> Vec<String> {
    vec![
        format!("Start {}", next),
        "Review this chapter".to_string(),
        "View all chapters".to_string(),
    ]
}
