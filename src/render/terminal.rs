//! Terminal rendering of Markdown documents
//!
//! The rendered view in a terminal: the model drives the document structure
//! and we apply the `SilkCircuit` palette on top of it.

use crate::types::RequirementItem;
use crate::ui::rgb::{
    CORAL, DIM_SEPARATOR, DIM_WHITE, ELECTRIC_PURPLE, ELECTRIC_YELLOW, NEON_CYAN, SUCCESS_GREEN,
};
use colored::Colorize;
use std::borrow::Cow;
use std::fmt::Write;

const DESCRIPTION_WIDTH: usize = 72;

/// Render markdown content with `SilkCircuit` terminal styling
///
/// Handles headers, bold text, inline code, fenced code blocks, bullet and
/// numbered lists, and table rows.
pub fn render_markdown_for_terminal(markdown: &str) -> String {
    let markdown = sanitize_for_display(markdown);
    let mut output = String::new();
    let mut in_code_block = false;

    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            writeln!(
                output,
                "  {}",
                line.truecolor(DIM_WHITE.0, DIM_WHITE.1, DIM_WHITE.2)
            )
            .expect("write to string should not fail");
            continue;
        }

        if let Some(header) = line.strip_prefix("### ") {
            writeln!(
                output,
                "\n{} {}",
                "─".truecolor(NEON_CYAN.0, NEON_CYAN.1, NEON_CYAN.2),
                header.truecolor(NEON_CYAN.0, NEON_CYAN.1, NEON_CYAN.2).bold()
            )
            .expect("write to string should not fail");
        } else if let Some(header) = line.strip_prefix("## ") {
            writeln!(
                output,
                "\n{} {} {}",
                "─".truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2),
                header
                    .to_uppercase()
                    .truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2)
                    .bold(),
                "─".repeat(32usize.saturating_sub(header.chars().count())).truecolor(
                    DIM_SEPARATOR.0,
                    DIM_SEPARATOR.1,
                    DIM_SEPARATOR.2
                )
            )
            .expect("write to string should not fail");
        } else if let Some(header) = line.strip_prefix("# ") {
            writeln!(
                output,
                "{}  {}  {}",
                "━━━".truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2),
                header
                    .to_uppercase()
                    .truecolor(NEON_CYAN.0, NEON_CYAN.1, NEON_CYAN.2)
                    .bold(),
                "━━━".truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2)
            )
            .expect("write to string should not fail");
        } else if let Some(content) = bullet_content(line) {
            let indent = line.len() - line.trim_start().len();
            writeln!(
                output,
                "{}  {} {}",
                " ".repeat(indent),
                "•".truecolor(CORAL.0, CORAL.1, CORAL.2),
                style_line_content(content)
            )
            .expect("write to string should not fail");
        } else if let Some((num, rest)) = numbered_item(line) {
            writeln!(
                output,
                "  {} {}",
                format!("{num}.").truecolor(CORAL.0, CORAL.1, CORAL.2).bold(),
                style_line_content(rest)
            )
            .expect("write to string should not fail");
        } else if line.trim_start().starts_with('|') {
            writeln!(output, "  {}", style_table_row(line))
                .expect("write to string should not fail");
        } else if line.trim().is_empty() {
            output.push('\n');
        } else {
            writeln!(output, "{}", style_line_content(line))
                .expect("write to string should not fail");
        }
    }

    output
}

/// Drop control characters a terminal would interpret, keeping newlines and tabs
///
/// Model output must not be able to move the cursor, clear the screen or
/// retitle the window.
pub fn sanitize_for_display(text: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c.is_control() && c != '\n' && c != '\t';
    if text.chars().any(is_unsafe) {
        Cow::Owned(text.chars().filter(|&c| !is_unsafe(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

fn bullet_content(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let (num, rest) = line.trim_start().split_once(". ")?;
    (!num.is_empty() && num.chars().all(|c| c.is_ascii_digit())).then_some((num, rest))
}

fn style_table_row(line: &str) -> String {
    let trimmed = line.trim();
    // Separator rows like |---|:--:| carry no content
    if trimmed
        .chars()
        .all(|c| matches!(c, '|' | '-' | ':' | ' '))
    {
        return "─"
            .repeat(trimmed.chars().count())
            .truecolor(DIM_SEPARATOR.0, DIM_SEPARATOR.1, DIM_SEPARATOR.2)
            .to_string();
    }

    let separator = " │ "
        .truecolor(DIM_SEPARATOR.0, DIM_SEPARATOR.1, DIM_SEPARATOR.2)
        .to_string();
    trimmed
        .trim_matches('|')
        .split('|')
        .map(|cell| style_line_content(cell.trim()))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Style inline content - handles bold and inline code
fn style_line_content(content: &str) -> String {
    let mut result = String::new();
    let mut chars = content.chars().peekable();
    let mut current_text = String::new();

    let flush = |text: &mut String, result: &mut String| {
        if !text.is_empty() {
            result.push_str(
                &text
                    .truecolor(DIM_WHITE.0, DIM_WHITE.1, DIM_WHITE.2)
                    .to_string(),
            );
            text.clear();
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            // Handle bold text **text**
            '*' if chars.peek() == Some(&'*') => {
                flush(&mut current_text, &mut result);
                chars.next();

                let mut bold = String::new();
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'*') {
                        chars.next();
                        break;
                    }
                    bold.push(c);
                }

                result.push_str(
                    &bold
                        .truecolor(NEON_CYAN.0, NEON_CYAN.1, NEON_CYAN.2)
                        .bold()
                        .to_string(),
                );
            }
            // Handle inline code `code`
            '`' => {
                flush(&mut current_text, &mut result);

                let mut code = String::new();
                for c in chars.by_ref() {
                    if c == '`' {
                        break;
                    }
                    code.push(c);
                }

                result.push_str(
                    &code
                        .truecolor(ELECTRIC_YELLOW.0, ELECTRIC_YELLOW.1, ELECTRIC_YELLOW.2)
                        .to_string(),
                );
            }
            _ => current_text.push(ch),
        }
    }

    flush(&mut current_text, &mut result);
    result
}

/// Itemized requirements grouped by section, descriptions wrapped
pub fn format_requirements_table(items: &[&RequirementItem]) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{}  {}  {}",
        "━━━".truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2),
        format!("REQUIREMENTS ({})", items.len())
            .truecolor(NEON_CYAN.0, NEON_CYAN.1, NEON_CYAN.2)
            .bold(),
        "━━━".truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2)
    )
    .expect("write to string should not fail");

    let id_width = items
        .iter()
        .map(|item| sanitize_for_display(&item.id).chars().count())
        .max()
        .unwrap_or(0);

    let mut current_group: Option<&str> = None;
    for item in items {
        if current_group != Some(item.group.as_str()) {
            writeln!(
                output,
                "\n{}",
                sanitize_for_display(&item.group)
                    .as_ref()
                    .truecolor(ELECTRIC_PURPLE.0, ELECTRIC_PURPLE.1, ELECTRIC_PURPLE.2)
                    .bold()
            )
            .expect("write to string should not fail");
            current_group = Some(item.group.as_str());
        }

        let id = sanitize_for_display(&item.id);
        let description = sanitize_for_display(&item.description);
        let prefix_width = id_width + 4;
        let wrapped = textwrap::wrap(&description, DESCRIPTION_WIDTH);
        for (index, line) in wrapped.iter().enumerate() {
            if index == 0 {
                writeln!(
                    output,
                    "  {}  {}",
                    format!("{id:<id_width$}")
                        .truecolor(SUCCESS_GREEN.0, SUCCESS_GREEN.1, SUCCESS_GREEN.2)
                        .bold(),
                    line.truecolor(DIM_WHITE.0, DIM_WHITE.1, DIM_WHITE.2)
                )
                .expect("write to string should not fail");
            } else {
                writeln!(
                    output,
                    "{}{}",
                    " ".repeat(prefix_width),
                    line.truecolor(DIM_WHITE.0, DIM_WHITE.1, DIM_WHITE.2)
                )
                .expect("write to string should not fail");
            }
        }
    }

    output
}
