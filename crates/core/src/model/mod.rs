pub mod answer;
mod chapter;
pub mod format;
mod ids;
mod option;
mod question;

pub use answer::{ANALYSIS_MARKER, AnswerParts};
pub use chapter::{ChapterFilter, chapter_name_from_file, distinct_chapters, filter_by_chapter};
pub use format::{FormattedLine, FormattedText, format_question_text};
pub use ids::{ParseIdError, QuestionId};
pub use option::{OptionLetter, ParseOptionError};
pub use question::{Question, QuestionDraft, QuestionError, ValidatedQuestion};
