//! Convert `.eml` files to PDF, one at a time or a whole directory.

use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::export::attachment::save_attachments;
use crate::export::render::{compose, RendererChoice};
use crate::model::attachment::Attachment;
use crate::parser::eml::read_eml;
use crate::parser::mime::extract_content;

/// Extension of the input message format, matched case-insensitively.
pub const EML_EXTENSION: &str = "eml";
/// Extension of the produced documents.
pub const PDF_EXTENSION: &str = "pdf";

/// Per-message conversion options.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Replace an existing output document.
    pub overwrite: bool,
    /// Save attachments under `<output dir>/<attachments_dirname>/<stem>/`.
    pub extract_attachments: bool,
    pub attachments_dirname: String,
    pub renderer: RendererChoice,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            extract_attachments: true,
            attachments_dirname: "attachments".to_string(),
            renderer: RendererChoice::default(),
        }
    }
}

impl ConvertOptions {
    /// Options taken from the `[convert]` and `[renderer]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            overwrite: config.convert.overwrite,
            extract_attachments: config.convert.extract_attachments,
            attachments_dirname: config.convert.attachments_dir.clone(),
            renderer: RendererChoice::from_config(&config.renderer),
        }
    }
}

/// Result of converting one message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConvertedMessage {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `"html"` for the external renderer, `"text"` for direct layout.
    pub renderer: &'static str,
    pub attachments: Vec<Attachment>,
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct BatchSummary {
    pub converted: Vec<ConvertedMessage>,
}

impl BatchSummary {
    /// Number of messages converted.
    pub fn count(&self) -> usize {
        self.converted.len()
    }
}

/// Convert one `.eml` file into `pdf_path`.
///
/// Fails with [`ConvertError::OutputExists`] before touching anything when
/// `pdf_path` exists and `overwrite` is off.
pub fn convert_eml_to_pdf(
    eml_path: &Path,
    pdf_path: &Path,
    options: &ConvertOptions,
) -> Result<ConvertedMessage> {
    if pdf_path.exists() && !options.overwrite {
        return Err(ConvertError::OutputExists(pdf_path.to_path_buf()));
    }

    let msg = read_eml(eml_path)?;
    let content = extract_content(&msg);

    let output_dir = pdf_path.parent().unwrap_or(Path::new("."));
    let attachments = if options.extract_attachments {
        let dir = output_dir
            .join(&options.attachments_dirname)
            .join(file_stem(eml_path));
        save_attachments(&msg, &dir)?
    } else {
        Vec::new()
    };

    std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;
    let renderer = compose(&options.renderer, &content, &attachments, pdf_path)?;

    info!(
        input = %eml_path.display(),
        output = %pdf_path.display(),
        renderer,
        attachments = attachments.len(),
        "Converted message"
    );

    Ok(ConvertedMessage {
        input: eml_path.to_path_buf(),
        output: pdf_path.to_path_buf(),
        renderer,
        attachments,
    })
}

/// Eligible input files: `path` itself if it is an `.eml` file, or the `.eml`
/// files in directory `path` (all subdirectories when `recursive`), sorted by name.
pub fn collect_eml_files(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(if has_eml_extension(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(path).to_path_buf();
            match e.into_io_error() {
                Some(source) => ConvertError::io(at, source),
                None => ConvertError::io(at, std::io::Error::other("filesystem loop")),
            }
        })?;
        if entry.file_type().is_file() && has_eml_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Convert every eligible input into `output_dir/<stem>.pdf`.
///
/// Stops at the first failure; documents already written stay on disk.
/// `progress` receives `(current, total)` before each file and once at the end.
pub fn batch_convert(
    input_path: &Path,
    output_dir: &Path,
    recursive: bool,
    options: &ConvertOptions,
    progress: &dyn Fn(usize, usize),
) -> Result<BatchSummary> {
    let inputs = collect_eml_files(input_path, recursive)?;
    let total = inputs.len();
    let mut summary = BatchSummary::default();

    for (i, eml_path) in inputs.iter().enumerate() {
        progress(i, total);
        let pdf_path = output_dir.join(format!("{}.{PDF_EXTENSION}", file_stem(eml_path)));
        let converted = convert_eml_to_pdf(eml_path, &pdf_path, options)?;
        summary.converted.push(converted);
    }
    progress(total, total);

    Ok(summary)
}

fn has_eml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EML_EXTENSION))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "message".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_eml_extension() {
        assert!(has_eml_extension(Path::new("a/b.eml")));
        assert!(has_eml_extension(Path::new("B.EML")));
        assert!(!has_eml_extension(Path::new("b.txt")));
        assert!(!has_eml_extension(Path::new("eml")));
    }

    #[test]
    fn test_collect_single_file() {
        let tmp = tempfile::tempdir().unwrap();
        let eml = tmp.path().join("m.Eml");
        let txt = tmp.path().join("m.txt");
        std::fs::write(&eml, "Subject: x\n\ny").unwrap();
        std::fs::write(&txt, "x").unwrap();
        assert_eq!(collect_eml_files(&eml, false).unwrap(), vec![eml]);
        assert!(collect_eml_files(&txt, false).unwrap().is_empty());
    }

    #[test]
    fn test_collect_directory_recursion() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("sub");
        std::fs::create_dir(&nested).unwrap();
        std::fs::create_dir(tmp.path().join("dir.eml")).unwrap();
        for p in [tmp.path().join("b.eml"), tmp.path().join("a.EML"), nested.join("c.eml")] {
            std::fs::write(p, "Subject: x\n\ny").unwrap();
        }

        let flat = collect_eml_files(tmp.path(), false).unwrap();
        let names: Vec<String> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.EML", "b.eml"]);

        let deep = collect_eml_files(tmp.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&nested.join("c.eml")));
    }

    #[test]
    fn test_collect_missing_input() {
        let err = collect_eml_files(Path::new("/no/such/input"), false).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }

    #[test]
    fn test_output_exists_checked_first() {
        let tmp = tempfile::tempdir().unwrap();
        let pdf = tmp.path().join("out.pdf");
        std::fs::write(&pdf, "existing").unwrap();
        // The input does not even exist: the precondition is reported first.
        let err = convert_eml_to_pdf(
            &tmp.path().join("missing.eml"),
            &pdf,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::OutputExists(_)));
        assert_eq!(std::fs::read_to_string(&pdf).unwrap(), "existing");
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.convert.attachments_dir = "files".into();
        config.renderer.force_text = true;
        let options = ConvertOptions::from_config(&config);
        assert_eq!(options.attachments_dirname, "files");
        assert!(options.extract_attachments);
        assert!(matches!(options.renderer, RendererChoice::DirectOnly));
    }
}
