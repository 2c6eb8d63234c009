use crate::commands::{self, GenOptions};
use crate::log_debug;
use crate::render::ViewMode;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use std::path::PathBuf;

const LOG_FILE: &str = "reqscribe-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "reqscribe: turn notes and documents into requirement specifications",
    long_about = "reqscribe sends your free-form notes and attached documents to a generative model and returns a structured requirements document plus an itemized requirement list you can view, copy, or export as Markdown or CSV.",
    disable_version_flag = true,
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, waiting messages, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
#[command(subcommand_negates_reqs = true)]
#[command(subcommand_precedence_over_arg = true)]
pub enum Commands {
    /// Generate a requirements document
    #[command(
        about = "Generate a requirements document using AI",
        long_about = "Generate a requirements document from text and attached files.\n\nImages, PDF, Word, PowerPoint and .hwp files are sent as attachments. Plain text and Markdown files are merged into the text input in the order given."
    )]
    Gen {
        /// Free-form requirement notes
        #[arg(short, long, help = "Free-form requirement notes")]
        text: Option<String>,

        /// Read the notes from a file
        #[arg(long, value_name = "PATH", help = "Read the notes from a file")]
        text_file: Option<PathBuf>,

        /// Files to attach or merge
        #[arg(value_name = "FILES", help = "Files to attach or merge")]
        files: Vec<PathBuf>,

        /// How to show the result
        #[arg(long, value_enum, help = "How to show the result")]
        view: Option<ViewMode>,

        /// Ask for a Markdown document only, without the itemized list
        #[arg(long, help = "Ask for a Markdown document only")]
        plain: bool,

        /// Copy the shown view to the clipboard
        #[arg(short, long, help = "Copy the shown view to the clipboard")]
        copy: bool,

        /// Save requirements.md
        #[arg(long, help = "Save the document as requirements.md")]
        save_md: bool,

        /// Save requirements.csv
        #[arg(long, help = "Save the itemized list as requirements.csv")]
        save_csv: bool,

        /// Directory for saved files
        #[arg(long, value_name = "DIR", help = "Directory for saved files")]
        out_dir: Option<PathBuf>,
    },

    /// Configure reqscribe settings
    #[command(about = "Configure reqscribe settings")]
    Config {
        /// Set API key
        #[arg(long, help = "Set API key")]
        api_key: Option<String>,

        /// Set model
        #[arg(long, help = "Set model")]
        model: Option<String>,

        /// Set the service base URL
        #[arg(long, help = "Set the service base URL")]
        base_url: Option<String>,

        /// Set request timeout in seconds
        #[arg(long, help = "Set request timeout in seconds")]
        timeout: Option<u64>,

        /// Set the default view
        #[arg(long, value_enum, help = "Set the default view")]
        view: Option<ViewMode>,
    },

    /// Print the response schema
    #[command(about = "Print the response schema sent with structured requests")]
    Schema {
        /// Print the JSON Schema of the parsed result instead
        #[arg(long, help = "Print the JSON Schema of the parsed result instead")]
        json_schema: bool,
    },
}

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;
        log_debug!("Logging to {}", log_file);
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command).await
    } else {
        let _ = Cli::parse_from(["reqscribe", "--help"]);
        Ok(())
    }
}

/// Dispatch a parsed subcommand
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Gen {
            text,
            text_file,
            files,
            view,
            plain,
            copy,
            save_md,
            save_csv,
            out_dir,
        } => {
            let options = GenOptions {
                text,
                text_file,
                files,
                view,
                plain,
                copy,
                save_md,
                save_csv,
                out_dir,
            };
            log_debug!("Handling 'gen' command with {:?}", options);
            commands::handle_gen_command(options).await
        }
        Commands::Config {
            api_key,
            model,
            base_url,
            timeout,
            view,
        } => {
            log_debug!(
                "Handling 'config' command with model: {:?}, base_url: {:?}, timeout: {:?}, view: {:?}",
                model,
                base_url,
                timeout,
                view
            );
            commands::handle_config_command(api_key, model, base_url, timeout, view)
        }
        Commands::Schema { json_schema } => commands::handle_schema_command(json_schema),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_arguments_parse() {
        let cli = Cli::try_parse_from([
            "reqscribe",
            "gen",
            "-t",
            "로그인 기능 필요",
            "--view",
            "csv",
            "--save-md",
            "notes.md",
            "diagram.png",
        ])
        .expect("arguments parse");

        let Some(Commands::Gen {
            text,
            files,
            view,
            save_md,
            plain,
            ..
        }) = cli.command
        else {
            panic!("expected gen command");
        };
        assert_eq!(text.as_deref(), Some("로그인 기능 필요"));
        assert_eq!(files, vec![PathBuf::from("notes.md"), PathBuf::from("diagram.png")]);
        assert_eq!(view, Some(ViewMode::Csv));
        assert!(save_md);
        assert!(!plain);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["reqscribe", "schema", "--quiet"]).expect("parse");
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Some(Commands::Schema { json_schema: false })
        ));
    }
}
