//! Result rendering
//!
//! A finished generation can be shown four ways: a rendered rich-text view,
//! the raw Markdown source, the HTML that Markdown converts to, and a CSV
//! table of the itemized requirements.

mod csv_export;
mod html;
mod terminal;

pub use csv_export::{CSV_HEADER, UTF8_BOM, requirements_to_csv};
pub use html::markdown_to_html;
pub use terminal::{format_requirements_table, render_markdown_for_terminal, sanitize_for_display};

use crate::error::Result;
use crate::types::GenerationOutput;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The view a user has selected for the current result
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewMode {
    /// Markdown rendered to rich text
    #[default]
    Rendered,
    /// Raw Markdown source
    Markdown,
    /// Converted HTML shown as literal text
    Html,
    /// Itemized requirements as CSV
    Csv,
}

/// Produces every representation of one generation result
pub struct ResultView<'a> {
    output: &'a GenerationOutput,
}

impl<'a> ResultView<'a> {
    pub fn new(output: &'a GenerationOutput) -> Self {
        Self { output }
    }

    /// Text shown for the given view mode
    pub fn render(&self, mode: ViewMode) -> Result<String> {
        match mode {
            ViewMode::Rendered => {
                let mut rendered = render_markdown_for_terminal(self.output.markdown());
                let requirements = self.output.requirements();
                if !requirements.is_empty() {
                    rendered.push('\n');
                    rendered.push_str(&format_requirements_table(&requirements));
                }
                Ok(rendered)
            }
            ViewMode::Markdown => Ok(self.markdown().to_string()),
            ViewMode::Html => Ok(self.html()),
            ViewMode::Csv => self.csv(),
        }
    }

    /// Text placed on the clipboard for the given view mode
    ///
    /// The Markdown view copies the source; the rendered and HTML views copy
    /// the converted HTML; the CSV view copies the CSV text.
    pub fn copy_text(&self, mode: ViewMode) -> Result<String> {
        match mode {
            ViewMode::Markdown => Ok(self.markdown().to_string()),
            ViewMode::Rendered | ViewMode::Html => Ok(self.html()),
            ViewMode::Csv => self.csv(),
        }
    }

    pub fn markdown(&self) -> &str {
        self.output.markdown()
    }

    pub fn html(&self) -> String {
        markdown_to_html(self.output.markdown())
    }

    pub fn csv(&self) -> Result<String> {
        requirements_to_csv(self.output.requirements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FormattedResult, RequirementItem};

    fn structured() -> GenerationOutput {
        GenerationOutput::Structured(FormattedResult {
            markdown_output: "## Key Features\n- **Export** to CSV".to_string(),
            requirements_list: vec![RequirementItem {
                group: "Key Features".to_string(),
                id: "KF-001".to_string(),
                sequence: 1,
                description: "Export to CSV".to_string(),
            }],
        })
    }

    #[test]
    fn test_view_mode_parses_case_insensitively() {
        assert_eq!("HTML".parse::<ViewMode>().ok(), Some(ViewMode::Html));
        assert_eq!(ViewMode::Csv.to_string(), "csv");
    }

    #[test]
    fn test_copy_text_follows_view_mode() {
        let output = structured();
        let view = ResultView::new(&output);
        assert_eq!(
            view.copy_text(ViewMode::Markdown).expect("markdown copy"),
            "## Key Features\n- **Export** to CSV"
        );
        let html = view.copy_text(ViewMode::Rendered).expect("html copy");
        assert!(html.contains("<strong>Export</strong>"));
        assert_eq!(html, view.copy_text(ViewMode::Html).expect("html copy"));
    }

    #[test]
    fn test_html_view_is_literal_source() {
        let output = structured();
        let view = ResultView::new(&output);
        let html = view.render(ViewMode::Html).expect("html renders");
        assert!(html.starts_with("<h2>Key Features</h2>"));
    }

    #[test]
    fn test_plain_text_csv_has_only_header() {
        let output = GenerationOutput::PlainText("# Doc".to_string());
        let csv = ResultView::new(&output).csv().expect("csv renders");
        assert_eq!(csv, format!("{UTF8_BOM}group,id,sequence,description\n"));
    }
}
