use crate::config::{API_KEY_ENV, API_KEY_ENV_FALLBACK, Config};
use crate::encoder;
use crate::error::ReqscribeError;
use crate::export::{self, CopyFeedback};
use crate::llm::{GenerationMode, RequirementsClient};
use crate::messages;
use crate::prompt;
use crate::render::{ResultView, ViewMode};
use crate::session::{ImportSummary, Session};
use crate::ui::{self, rgb};
use crate::{log_debug, log_info};

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything the `gen` command was asked to do
#[derive(Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenOptions {
    pub text: Option<String>,
    pub text_file: Option<PathBuf>,
    pub files: Vec<PathBuf>,
    pub view: Option<ViewMode>,
    pub plain: bool,
    pub copy: bool,
    pub save_md: bool,
    pub save_csv: bool,
    pub out_dir: Option<PathBuf>,
}

impl GenOptions {
    fn mode(&self) -> GenerationMode {
        if self.plain {
            GenerationMode::PlainText
        } else {
            GenerationMode::Structured
        }
    }
}

/// Handle the 'gen' command
pub async fn handle_gen_command(options: GenOptions) -> Result<()> {
    let config = Config::load()?;

    // A missing credential stops us before any file is read
    let client = RequirementsClient::from_config(&config).map_err(|e| {
        if e.is_fatal() {
            ui::print_info(&format!(
                "Set {API_KEY_ENV} (or {API_KEY_ENV_FALLBACK}) or run 'reqscribe config --api-key <KEY>'."
            ));
        }
        e
    })?;

    let mut session = Session::new();
    session.set_text(collect_text(&options).await?);

    if !options.files.is_empty() {
        let spinner = ui::create_spinner(messages::get_file_message().text);
        let loaded = encoder::load_files(&options.files).await;
        spinner.finish_and_clear();

        let summary = session.add_files(loaded);
        report_import(&summary);
    }

    let spinner = ui::create_spinner("");
    spinner.set_message(messages::get_waiting_message().styled().to_string());
    let outcome = session.submit(&client, options.mode()).await;
    spinner.finish_and_clear();

    if let Err(e) = outcome {
        log_debug!("Session ended in {} state", session.state());
        if matches!(e, ReqscribeError::InvalidInput) {
            ui::print_info("Pass notes with --text or --text-file, or attach files.");
        }
        return Err(e.into());
    }

    let output = session
        .result()
        .ok_or_else(|| anyhow!("No result available after a successful request"))?;
    let view = ResultView::new(output);
    let mode = options.view.unwrap_or(config.default_view);

    if mode == ViewMode::Csv && output.requirements().is_empty() {
        ui::print_warning("No itemized requirements in this result; the CSV has only a header.");
    }
    println!("{}", view.render(mode)?);

    if options.save_md || options.save_csv {
        let dir = output_dir(&options, &config);
        if options.save_md {
            let path = export::save_markdown(&view, &dir)?;
            ui::print_success(&format!("Saved {}", path.display()));
        }
        if options.save_csv {
            let path = export::save_csv(&view, &dir)?;
            ui::print_success(&format!("Saved {}", path.display()));
        }
    }

    if options.copy {
        copy_with_feedback(&view.copy_text(mode)?, mode).await?;
    }

    Ok(())
}

/// Notes from `--text` and `--text-file`, in that order
async fn collect_text(options: &GenOptions) -> Result<String> {
    let mut parts = Vec::new();
    if let Some(text) = &options.text {
        parts.push(text.clone());
    }
    if let Some(path) = &options.text_file {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parts.push(content);
    }
    Ok(parts.join("\n\n"))
}

fn report_import(summary: &ImportSummary) {
    if !summary.attached.is_empty() {
        ui::print_info(&format!("Attached: {}", summary.attached.join(", ")));
    }
    if !summary.merged_text.is_empty() {
        ui::print_info(&format!(
            "Merged into text: {}",
            summary.merged_text.join(", ")
        ));
    }
    if !summary.duplicates.is_empty() {
        ui::print_warning(&format!(
            "Skipped duplicate file names: {}",
            summary.duplicates.join(", ")
        ));
    }
    for failure in &summary.failed {
        ui::print_error(failure);
    }
}

fn output_dir(options: &GenOptions, config: &Config) -> PathBuf {
    options
        .out_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Copy to the clipboard and hold the "copied" indicator until it reverts
///
/// Some clipboard managers only take ownership while the process is alive,
/// so waiting out the indicator also keeps the content available.
async fn copy_with_feedback(content: &str, mode: ViewMode) -> Result<()> {
    export::copy_to_clipboard(content)?;

    let mut feedback = CopyFeedback::new();
    feedback.mark(Instant::now());
    log_info!("Copied {} view to clipboard", mode);

    let spinner = ui::create_spinner(&format!("✓ Copied {mode} to clipboard"));
    if let Some(remaining) = feedback.remaining(Instant::now()) {
        tokio::time::sleep(remaining).await;
    }
    spinner.finish_and_clear();

    ui::print_success(&format!("Copied {mode} to clipboard"));
    Ok(())
}

/// Handle the 'config' command
pub fn handle_config_command(
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
    default_view: Option<ViewMode>,
) -> Result<()> {
    let path = Config::get_config_path()?;
    // Read the file alone so an environment key never gets written back
    let mut config = Config::load_from(&path)?;

    if timeout_seconds == Some(0) {
        return Err(anyhow!("Timeout must be greater than zero"));
    }

    if config.update(api_key, model, base_url, timeout_seconds, default_view) {
        config.save_to(&path)?;
        ui::print_success("Configuration updated successfully.");
        ui::print_newline();
    }

    print_configuration(&config, &path);
    Ok(())
}

/// Handle the 'schema' command
pub fn handle_schema_command(json_schema: bool) -> Result<()> {
    let schema = if json_schema {
        prompt::formatted_result_json_schema()?
    } else {
        serde_json::to_string_pretty(&prompt::response_schema())?
    };
    println!("{schema}");
    Ok(())
}

fn print_configuration(config: &Config, path: &Path) {
    let purple = rgb::ELECTRIC_PURPLE;
    let cyan = rgb::NEON_CYAN;
    let coral = rgb::CORAL;
    let yellow = rgb::ELECTRIC_YELLOW;
    let dim = rgb::DIM_WHITE;

    println!();
    println!(
        "{}  {}  {}",
        "━━━".truecolor(purple.0, purple.1, purple.2),
        "REQSCRIBE CONFIGURATION"
            .truecolor(cyan.0, cyan.1, cyan.2)
            .bold(),
        "━━━".truecolor(purple.0, purple.1, purple.2)
    );
    println!();

    print_section_header("SERVICE");
    print_config_row("Model", &config.model, cyan, true);
    print_config_row("Base URL", &config.base_url, dim, false);
    print_config_row("API Key", &config.masked_api_key(), yellow, false);
    let env_key = [API_KEY_ENV, API_KEY_ENV_FALLBACK]
        .into_iter()
        .find(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty()));
    if let Some(name) = env_key {
        print_config_row("Env Key", &format!("{name} (takes precedence)"), yellow, false);
    }
    print_config_row(
        "Timeout",
        &format!("{}s", config.timeout_seconds),
        coral,
        false,
    );

    println!();
    print_section_header("OUTPUT");
    print_config_row("View", &config.default_view.to_string(), cyan, false);
    let out_dir = config
        .output_dir
        .as_ref()
        .map_or_else(|| "(current directory)".to_string(), |p| p.display().to_string());
    print_config_row("Directory", &out_dir, dim, false);

    println!();
    print_config_row("File", &path.display().to_string(), dim, false);
}

fn print_section_header(name: &str) {
    let purple = rgb::ELECTRIC_PURPLE;
    let dim_sep = rgb::DIM_SEPARATOR;
    println!(
        "{} {} {}",
        "─".truecolor(purple.0, purple.1, purple.2),
        name.truecolor(purple.0, purple.1, purple.2).bold(),
        "─"
            .repeat(30 - name.len().min(28))
            .truecolor(dim_sep.0, dim_sep.1, dim_sep.2)
    );
}

fn print_config_row(label: &str, value: &str, value_color: (u8, u8, u8), highlight: bool) {
    let dim = rgb::DIM_WHITE;
    let label_styled = format!("{label:>12}").truecolor(dim.0, dim.1, dim.2);

    let value_styled = if highlight {
        value
            .truecolor(value_color.0, value_color.1, value_color.2)
            .bold()
    } else {
        value.truecolor(value_color.0, value_color.1, value_color.2)
    };

    println!("{label_styled}  {value_styled}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_text_joins_inline_and_file_notes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "Export to CSV").expect("write notes");

        let options = GenOptions {
            text: Some("Login page".to_string()),
            text_file: Some(notes),
            ..GenOptions::default()
        };
        let text = collect_text(&options).await.expect("text collected");
        assert_eq!(text, "Login page\n\nExport to CSV");
    }

    #[test]
    fn test_output_dir_prefers_flag_over_config() {
        let config = Config {
            output_dir: Some(PathBuf::from("/tmp/specs")),
            ..Config::default()
        };
        let mut options = GenOptions::default();
        assert_eq!(output_dir(&options, &config), PathBuf::from("/tmp/specs"));

        options.out_dir = Some(PathBuf::from("out"));
        assert_eq!(output_dir(&options, &config), PathBuf::from("out"));
    }

    #[test]
    fn test_plain_flag_selects_mode() {
        let options = GenOptions {
            plain: true,
            ..GenOptions::default()
        };
        assert_eq!(options.mode(), GenerationMode::PlainText);
        assert_eq!(GenOptions::default().mode(), GenerationMode::Structured);
    }
}
