//! Mentor - a conversational TUI for working through a course
//!
//! Mentor walks a learner through a course one section at a time, answers
//! questions with a streamed tutor, and unlocks chapters as they are
//! completed. Course content and answers come from a remote backend.

pub mod api;
pub mod app;
pub mod bot;
pub mod chat;
pub mod config;
pub mod course;
pub mod theme;
pub mod ui;

pub use app::App;
pub use bot::Bot;
pub use config::Config;
pub use theme::Theme;
