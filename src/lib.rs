// Library surface for the binary, headless driving and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod library;
pub mod runtime;
pub mod scores;
pub mod session;
pub mod snippet;
pub mod stats;
pub mod timer;
pub mod typing_policy;
pub mod ui;
pub mod util;

pub use error::{Result, TortoiseError};
pub use session::{Keystroke, TypingSession};
pub use snippet::Snippet;
pub use stats::Score;
