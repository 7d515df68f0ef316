//! Display formatting for question text.
//!
//! Presentation only: nothing here feeds answer comparison, which always works
//! on the raw strings.

use serde::Serialize;
use std::fmt;

use super::option::OptionLetter;

/// Characters that may follow a choice letter to mark an option line.
pub const OPTION_SEPARATORS: [char; 3] = ['.', '、', '．'];

/// Byte span of a choice marker such as `A.` or `C、` inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMarker {
    pub letter: OptionLetter,
    pub start: usize,
    pub end: usize,
}

/// Finds the first choice marker (`[A-E][.、．]`) in `text`.
#[must_use]
pub fn find_option_marker(text: &str) -> Option<OptionMarker> {
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let Some(letter) = OptionLetter::from_char(c) else {
            continue;
        };
        if let Some(&(sep_at, sep)) = chars.peek() {
            if OPTION_SEPARATORS.contains(&sep) {
                return Some(OptionMarker {
                    letter,
                    start,
                    end: sep_at + sep.len_utf8(),
                });
            }
        }
    }
    None
}

/// True when `text` embeds at least one choice marker anywhere.
#[must_use]
pub fn contains_option_marker(text: &str) -> bool {
    find_option_marker(text).is_some()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FormattedLine {
    Text(String),
    Option {
        letter: OptionLetter,
        label: String,
        content: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedText {
    pub lines: Vec<FormattedLine>,
}

impl FormattedText {
    /// Option lines in display order.
    pub fn options(&self) -> impl Iterator<Item = OptionLetter> + '_ {
        self.lines.iter().filter_map(|line| match line {
            FormattedLine::Option { letter, .. } => Some(*letter),
            FormattedLine::Text(_) => None,
        })
    }
}

impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            match line {
                FormattedLine::Text(text) => f.write_str(text)?,
                FormattedLine::Option { label, content, .. } => write!(f, "{label}{content}")?,
            }
        }
        Ok(())
    }
}

/// Splits raw question text into display lines.
///
/// Runs of newlines collapse into one break. Within a line, the first choice
/// marker starts an option that runs to the end of the line; text before the
/// marker stays a plain line of its own.
#[must_use]
pub fn format_question_text(text: &str) -> FormattedText {
    let mut lines = Vec::new();
    for segment in text.split('\n').filter(|s| !s.is_empty()) {
        match find_option_marker(segment) {
            Some(marker) => {
                let lead = &segment[..marker.start];
                if !lead.is_empty() {
                    lines.push(FormattedLine::Text(lead.to_owned()));
                }
                lines.push(FormattedLine::Option {
                    letter: marker.letter,
                    label: segment[marker.start..marker.end].to_owned(),
                    content: segment[marker.end..].to_owned(),
                });
            }
            None => lines.push(FormattedLine::Text(segment.to_owned())),
        }
    }
    FormattedText { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(letter: OptionLetter, label: &str, content: &str) -> FormattedLine {
        FormattedLine::Option {
            letter,
            label: label.into(),
            content: content.into(),
        }
    }

    #[test]
    fn collapses_newline_runs_and_splits_options() {
        let formatted = format_question_text("1. 下列哪味药?\n\n\nA.人参\nB、黄芪\nC．当归");
        assert_eq!(
            formatted.lines,
            vec![
                FormattedLine::Text("1. 下列哪味药?".into()),
                option(OptionLetter::A, "A.", "人参"),
                option(OptionLetter::B, "B、", "黄芪"),
                option(OptionLetter::C, "C．", "当归"),
            ]
        );
        assert_eq!(
            formatted.options().collect::<Vec<_>>(),
            vec![OptionLetter::A, OptionLetter::B, OptionLetter::C]
        );
    }

    #[test]
    fn option_mid_line_takes_rest_of_line() {
        let formatted = format_question_text("选出正确项 A.甲 B.乙");
        assert_eq!(
            formatted.lines,
            vec![
                FormattedLine::Text("选出正确项 ".into()),
                option(OptionLetter::A, "A.", "甲 B.乙"),
            ]
        );
    }

    #[test]
    fn lowercase_and_out_of_range_letters_are_plain_text() {
        let formatted = format_question_text("a.小写\nF.超出");
        assert_eq!(
            formatted.lines,
            vec![
                FormattedLine::Text("a.小写".into()),
                FormattedLine::Text("F.超出".into()),
            ]
        );
    }

    #[test]
    fn display_joins_lines() {
        let formatted = format_question_text("题干\nA.一\nB.二");
        assert_eq!(formatted.to_string(), "题干\nA.一\nB.二");
    }

    #[test]
    fn marker_search_reports_byte_span() {
        let marker = find_option_marker("甲D、乙").unwrap();
        assert_eq!(marker.letter, OptionLetter::D);
        assert_eq!(marker.start, "甲".len());
        assert_eq!(marker.end, "甲D、".len());
        assert!(!contains_option_marker("没有选项"));
    }
}
