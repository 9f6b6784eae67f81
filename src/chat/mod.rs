//! Chat transcript building blocks
//!
//! Per-view transcripts, intent classification, progressive reveal and
//! streamed answers. None of these talk to the terminal; the bot drives them
//! and the UI reads the resulting transcripts.

pub mod intent;
pub mod reveal;
pub mod stream;
pub mod transcript;

pub use intent::{Intent, classify_local, classify_remote};
pub use reveal::Reveal;
pub use stream::{StreamProgress, StreamingAnswer};
pub use transcript::{ChatMessage, MessageHandle, MessageKind, Sender, View, ViewManager};
