pub mod navigator;
mod progress;
mod service;
mod store;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use navigator::{Direction, random_jump, step};
pub use progress::SessionProgress;
pub use service::{LoadTicket, StudySession};
pub use store::SessionStore;
pub use view::{AnswerReveal, QuestionView, Selection, SessionStatus, SessionView};
