//! Document sinks: the external HTML renderer and the direct-layout canvas.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::config::RendererConfig;
use crate::error::{ConvertError, Result};
use crate::export::html::build_email_html;
use crate::export::layout::{layout_email, PageGeometry};
use crate::export::pdf::write_pdf;
use crate::model::attachment::Attachment;
use crate::model::mail::EmailContent;

/// Placeholders substituted in the renderer's argument list.
const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Something that turns extracted content into a document file.
pub trait DocumentSink {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Render `content` and the attachment listing into `output`.
    fn render(&self, content: &EmailContent, attachments: &[Attachment], output: &Path)
        -> Result<()>;
}

/// How the composer picks its sink.
#[derive(Debug, Clone)]
pub enum RendererChoice {
    /// Use the external renderer when its program is installed, else the canvas.
    Auto(RendererConfig),
    /// Always lay out text directly.
    DirectOnly,
}

impl Default for RendererChoice {
    fn default() -> Self {
        Self::Auto(RendererConfig::default())
    }
}

impl RendererChoice {
    /// `DirectOnly` when the config forces text layout, `Auto` otherwise.
    pub fn from_config(config: &RendererConfig) -> Self {
        if config.force_text {
            Self::DirectOnly
        } else {
            Self::Auto(config.clone())
        }
    }
}

/// Pick the sink for one conversion.
pub fn select_sink(choice: &RendererChoice) -> Box<dyn DocumentSink> {
    match choice {
        RendererChoice::Auto(config) => match ExternalRenderer::locate(config) {
            Some(renderer) => {
                debug!(program = %renderer.program.display(), "Using external renderer");
                Box::new(renderer)
            }
            None => {
                debug!(command = %config.command, "External renderer not found, using text layout");
                Box::new(DirectCanvas::default())
            }
        },
        RendererChoice::DirectOnly => Box::new(DirectCanvas::default()),
    }
}

/// Render with the chosen sink; an unavailable external renderer falls back to the canvas.
///
/// Returns the name of the sink that produced the document.
pub fn compose(
    choice: &RendererChoice,
    content: &EmailContent,
    attachments: &[Attachment],
    output: &Path,
) -> Result<&'static str> {
    let sink = select_sink(choice);
    match sink.render(content, attachments, output) {
        Ok(()) => Ok(sink.name()),
        Err(ConvertError::RendererUnavailable(program)) => {
            warn!(program = %program, "Renderer disappeared, falling back to text layout");
            let canvas = DirectCanvas::default();
            canvas.render(content, attachments, output)?;
            Ok(canvas.name())
        }
        Err(e) => Err(e),
    }
}

/// Word-wrap and paginate onto fixed letter pages, written with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct DirectCanvas {
    pub geometry: PageGeometry,
}

impl DocumentSink for DirectCanvas {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(
        &self,
        content: &EmailContent,
        attachments: &[Attachment],
        output: &Path,
    ) -> Result<()> {
        let flat = content.flatten();
        let pages = layout_email(&flat, attachments, &self.geometry);
        debug!(pages = pages.len(), output = %output.display(), "Laid out text document");
        write_pdf(&pages, &self.geometry, output)
    }
}

/// An external HTML-to-PDF program such as `wkhtmltopdf`.
#[derive(Debug, Clone)]
pub struct ExternalRenderer {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalRenderer {
    /// Resolve the configured command on `PATH`. `None` when it is not installed.
    pub fn locate(config: &RendererConfig) -> Option<Self> {
        let program = find_program(&config.command)?;
        Some(Self {
            program,
            args: config.args.clone(),
        })
    }

    fn expand_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

impl DocumentSink for ExternalRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(
        &self,
        content: &EmailContent,
        attachments: &[Attachment],
        output: &Path,
    ) -> Result<()> {
        let html = build_email_html(content, attachments);

        let mut page = tempfile::Builder::new()
            .prefix("eml2pdf-")
            .suffix(".html")
            .tempfile()
            .map_err(|e| ConvertError::io(std::env::temp_dir(), e))?;
        page.write_all(html.as_bytes())
            .and_then(|()| page.flush())
            .map_err(|e| ConvertError::io(page.path(), e))?;

        let program = self.program.display().to_string();
        // Success is judged by the output file, so a stale one must not survive.
        if output.exists() {
            std::fs::remove_file(output).map_err(|e| ConvertError::io(output, e))?;
        }
        let status = Command::new(&self.program)
            .args(self.expand_args(page.path(), output))
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConvertError::RendererUnavailable(program.clone()),
                _ => ConvertError::Render {
                    program: program.clone(),
                    reason: e.to_string(),
                },
            })?;

        if !status.success() {
            return Err(ConvertError::Render {
                program,
                reason: format!("exited with {status}"),
            });
        }
        if !output.is_file() {
            return Err(ConvertError::Render {
                program,
                reason: format!("no output written to {}", output.display()),
            });
        }
        Ok(())
    }
}

/// Find an executable: paths with a separator are checked directly, bare names on `PATH`.
fn find_program(command: &str) -> Option<PathBuf> {
    if command.trim().is_empty() {
        return None;
    }
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let path = dir.join(command);
        if path.is_file() {
            return Some(path);
        }
        let exe = path.with_extension("exe");
        (cfg!(windows) && exe.is_file()).then_some(exe)
    })
}
