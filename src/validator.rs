use miette::{Diagnostic, SourceSpan};
use serde_json::error::Category;
use thiserror::Error;

use crate::value::JsonValue;

/// Prefix of every malformed-input message.
pub const ERROR_PREFIX: &str = "Invalid JSON: ";

#[derive(Error, Debug, Clone, Diagnostic)]
pub enum JsonError {
    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(jsonfold::invalid_json))]
    Invalid(
        String,
        #[source_code] String,
        #[label("error here")] SourceSpan,
        #[help] String,
    ),
    #[error("failed to format json: {0}")]
    #[diagnostic(code(jsonfold::format))]
    Format(String),
}

/// A successfully parsed document together with its canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub value: JsonValue,
    pub text: String,
}

/// Outcome of one validate/format pass.
#[derive(Debug, Clone)]
pub enum Validation {
    /// The input was empty or whitespace only.
    Empty,
    Valid(Formatted),
    Invalid(JsonError),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Error text, empty unless the input was malformed.
    pub fn message(&self) -> String {
        match self {
            Validation::Invalid(err) => err.to_string(),
            _ => String::new(),
        }
    }
}

/// Runs the full pipeline: blank input short-circuits to [`Validation::Empty`],
/// anything else is parsed and formatted.
pub fn validate(content: &str) -> Validation {
    if content.trim().is_empty() {
        return Validation::Empty;
    }
    match validate_json(content) {
        Ok(formatted) => Validation::Valid(formatted),
        Err(err) => Validation::Invalid(err),
    }
}

/// Parses `content` and re-serializes it with two-space indentation.
pub fn validate_json(content: &str) -> Result<Formatted, JsonError> {
    let parsed = serde_json::from_str::<serde_json::Value>(content)
        .map_err(|err| malformed(content, &err))?;
    let value = JsonValue::from(parsed);
    let text = format_value(&value)?;
    Ok(Formatted { value, text })
}

pub fn format_value(value: &JsonValue) -> Result<String, JsonError> {
    serde_json::to_string_pretty(value).map_err(|err| JsonError::Format(err.to_string()))
}

fn malformed(content: &str, err: &serde_json::Error) -> JsonError {
    let offset = offset_at(content, err.line(), err.column());
    let len = content[offset..].chars().next().map_or(0, char::len_utf8);
    let help = match err.classify() {
        Category::Eof => unclosed_hint(content),
        Category::Syntax => "check the punctuation right before the marked position".to_string(),
        Category::Data => "this value cannot be represented in json".to_string(),
        Category::Io => "the input could not be read".to_string(),
    };
    JsonError::Invalid(
        err.to_string(),
        content.to_owned(),
        SourceSpan::new(offset.into(), len),
        help,
    )
}

/// Byte offset of a serde_json position. Its columns count bytes, so a
/// column inside a multi-byte character is snapped back to the char start.
fn offset_at(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn unclosed_hint(content: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for ch in content.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => stack.push(ch),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }
    if in_string {
        return "close the string with `\"`".to_string();
    }
    let closers: String = stack
        .iter()
        .rev()
        .map(|open| if *open == '{' { '}' } else { ']' })
        .collect();
    if closers.is_empty() {
        "the document ended before a value was complete".to_string()
    } else {
        format!("add `{}` at the end", closers)
    }
}
