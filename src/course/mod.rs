//! Course content, sections and navigation
//!
//! Holds the course as loaded from the backend, splits chapter markdown into
//! sections and tracks which chapters are unlocked or completed.

pub mod model;
pub mod navigator;
pub mod sections;

pub use model::{Chapter, Course, Section};
pub use navigator::CourseNavigator;
pub use sections::{is_factoid, parse_content_into_sections, strip_outline_prefix};
