//! Pane composition for the terminal front end.

use crate::locale::Locale;
use crate::session::Output;

const GAP: &str = " │ ";

/// Stacked (`Rows`) or side-by-side (`Columns`) panes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    #[default]
    Rows,
    Columns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub title: String,
    pub lines: Vec<String>,
}

impl Pane {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    fn rows(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.lines.len() + 2);
        rows.push(self.title.clone());
        rows.push("─".repeat(self.title.chars().count()));
        rows.extend(self.lines.iter().cloned());
        rows
    }
}

/// Input pane; shows the placeholder label while the input is blank.
pub fn input_pane(locale: &Locale, input: &str) -> Pane {
    let lines = if input.trim().is_empty() {
        vec![locale.labels.data.clone()]
    } else {
        input.lines().map(str::to_owned).collect()
    };
    Pane::new(locale.labels.input.clone(), lines)
}

/// Output pane: the error panel when the input is malformed, otherwise
/// `body` (formatted text or tree lines), empty for blank input.
pub fn output_pane(locale: &Locale, output: &Output, body: Vec<String>) -> Pane {
    let lines = match output.error() {
        Some(err) => vec![format!("! {}", locale.error), err.to_string()],
        None if output.is_blank() => Vec::new(),
        None => body,
    };
    Pane::new(locale.labels.output.clone(), lines)
}

pub fn compose(panes: &[Pane], layout: Layout) -> String {
    match layout {
        Layout::Rows => panes
            .iter()
            .map(|pane| pane.rows().join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n"),
        Layout::Columns => columns(panes),
    }
}

/// The whole page: the locale's title over the composed panes.
pub fn page(locale: &Locale, panes: &[Pane], layout: Layout) -> String {
    let rule = "═".repeat(locale.title.chars().count());
    format!("{}\n{}\n\n{}", locale.title, rule, compose(panes, layout))
}

fn columns(panes: &[Pane]) -> String {
    let columns: Vec<Vec<String>> = panes.iter().map(Pane::rows).collect();
    let widths: Vec<usize> = columns
        .iter()
        .map(|rows| rows.iter().map(|row| row.chars().count()).max().unwrap_or(0))
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    (0..height)
        .map(|idx| {
            let last = columns.len().saturating_sub(1);
            let mut line = String::new();
            for (col, rows) in columns.iter().enumerate() {
                let cell = rows.get(idx).map(String::as_str).unwrap_or("");
                line.push_str(cell);
                if col < last {
                    let pad = widths[col] - cell.chars().count();
                    line.extend(std::iter::repeat(' ').take(pad));
                    line.push_str(GAP);
                }
            }
            line.trim_end().to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
