//! CLI entry point for `eml2pdf`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use eml2pdf::config::{self, Config};
use eml2pdf::error::ConvertError;
use eml2pdf::export::convert::{batch_convert, BatchSummary, ConvertOptions};
use eml2pdf::export::render::RendererChoice;

#[derive(Parser)]
#[command(name = "eml2pdf", version, about = "Batch convert EML files to PDFs")]
struct Cli {
    /// EML file or directory
    #[arg(
        value_name = "INPUT_PATH",
        required_unless_present_any = ["completions", "manpage"]
    )]
    input_path: Option<PathBuf>,

    /// Output directory for PDFs
    #[arg(
        value_name = "OUTPUT_DIR",
        required_unless_present_any = ["completions", "manpage"]
    )]
    output_dir: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(long)]
    recursive: bool,

    /// Overwrite existing PDFs
    #[arg(long)]
    overwrite: bool,

    /// Skip extracting attachments
    #[arg(long)]
    no_attachments: bool,

    /// Directory (within output) for saved attachments
    #[arg(long, value_name = "NAME")]
    attachments_dir: Option<String>,

    /// Lay out plain text directly instead of using the external HTML renderer
    #[arg(long)]
    force_text: bool,

    /// Print a JSON report of converted files and attachments
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,

    /// Generate a man page and exit
    #[arg(long)]
    manpage: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let code = e
                .downcast_ref::<ConvertError>()
                .map(ConvertError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    if let Some(shell) = cli.completions {
        return cmd_completions(shell);
    }
    if cli.manpage {
        return cmd_manpage();
    }

    let (Some(input), Some(output)) = (&cli.input_path, &cli.output_dir) else {
        anyhow::bail!("INPUT_PATH and OUTPUT_DIR are required");
    };

    let options = conversion_options(cli, config);
    let recursive = cli.recursive || config.convert.recursive;
    let summary = cmd_convert(input, output, recursive, &options)?;

    if cli.json {
        print_summary_json(&summary)?;
    } else {
        println!("Converted {} file(s).", summary.count());
    }
    Ok(())
}

/// Merge command-line flags over the configured defaults.
fn conversion_options(cli: &Cli, config: &Config) -> ConvertOptions {
    let mut options = ConvertOptions::from_config(config);
    options.overwrite |= cli.overwrite;
    if cli.no_attachments {
        options.extract_attachments = false;
    }
    if let Some(dir) = &cli.attachments_dir {
        options.attachments_dirname = dir.clone();
    }
    if cli.force_text {
        options.renderer = RendererChoice::DirectOnly;
    }
    options
}

/// Convert with a progress bar on stderr.
fn cmd_convert(
    input: &Path,
    output: &Path,
    recursive: bool,
    options: &ConvertOptions,
) -> anyhow::Result<BatchSummary> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Converting [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let result = batch_convert(input, output, recursive, options, &|current, total| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
    });
    pb.finish_and_clear();

    Ok(result?)
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "eml2pdf.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "eml2pdf", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Print the batch report as JSON.
fn print_summary_json(summary: &BatchSummary) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "converted_count": summary.count(),
        "converted": summary.converted,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "eml2pdf",
            "in",
            "out",
            "--overwrite",
            "--no-attachments",
            "--attachments-dir",
            "files",
            "--force-text",
        ]);
        let options = conversion_options(&cli, &Config::default());
        assert!(options.overwrite);
        assert!(!options.extract_attachments);
        assert_eq!(options.attachments_dirname, "files");
        assert!(matches!(options.renderer, RendererChoice::DirectOnly));
    }

    #[test]
    fn test_positionals_required() {
        assert!(Cli::try_parse_from(["eml2pdf", "in"]).is_err());
        assert!(Cli::try_parse_from(["eml2pdf", "--manpage"]).is_ok());
    }
}
