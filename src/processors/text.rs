//! Plain-text (`.txt`) file processor for single files and directories

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::client::GoogleTranslator;
use crate::core::config::TranslatorConfig;
use crate::core::driver::{DriverOptions, TranslationDriver};
use crate::core::errors::{Result, TranslationError};
use crate::core::io::{OutputSink, SourceReader};
use crate::core::models::{BatchJob, BatchReport, ProgressEvent, TranslationMode};

/// How output files are named relative to their input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNaming {
    /// Same file name as the input
    Same,
    /// Suffix inserted before the extension, `notes.txt` -> `notes_translated.txt`
    Suffix(String),
}

impl OutputNaming {
    /// Build from a configured suffix; an empty suffix keeps names
    pub fn from_suffix(suffix: &str) -> Self {
        if suffix.is_empty() {
            OutputNaming::Same
        } else {
            OutputNaming::Suffix(suffix.to_string())
        }
    }

    /// Output path for `relative`, keeping its parent directories
    pub fn apply(&self, relative: &Path) -> PathBuf {
        match self {
            OutputNaming::Same => relative.to_path_buf(),
            OutputNaming::Suffix(suffix) => {
                let stem = relative
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut name = format!("{}{}", stem, suffix);
                if let Some(ext) = relative.extension() {
                    name.push('.');
                    name.push_str(&ext.to_string_lossy());
                }
                relative.with_file_name(name)
            }
        }
    }
}

/// Options for translating a directory
#[derive(Debug, Clone)]
pub struct DirectoryOptions {
    pub source_lang: String,
    pub target_lang: String,
    pub mode: TranslationMode,
    pub naming: OutputNaming,
    pub recursive: bool,
    /// Restrict the batch to these file names (or relative paths); empty means all
    pub only: Vec<String>,
}

/// Reads units from files under a root directory; unit ids are relative paths
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SourceReader for DirectorySource {
    async fn read(&self, id: &str) -> Result<String> {
        let path = self.root.join(id);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| TranslationError::file(path.display(), e))
    }
}

/// Writes translated units under an output directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    naming: OutputNaming,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, naming: OutputNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    /// Destination of unit `id`
    pub fn output_path(&self, id: &str) -> PathBuf {
        self.root.join(self.naming.apply(Path::new(id)))
    }
}

#[async_trait]
impl OutputSink for DirectorySink {
    async fn write(&mut self, id: &str, text: &str) -> Result<()> {
        let output = self.output_path(id);
        write_text(&output, text).await?;
        debug!("Wrote {}", output.display());
        Ok(())
    }
}

/// Write `text` to `path`, creating missing parent directories
async fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TranslationError::file(parent.display(), e))?;
        }
    }

    tokio::fs::write(path, text)
        .await
        .map_err(|e| TranslationError::file(path.display(), e))
}

/// Text file processor driving translation of `.txt` files
#[derive(Clone)]
pub struct TextFileProcessor {
    driver: TranslationDriver,
}

impl TextFileProcessor {
    /// Create a new text processor
    pub fn new(driver: TranslationDriver) -> Self {
        Self { driver }
    }

    /// Create a processor backed by the HTTP provider described by `config`
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        let provider = Arc::new(GoogleTranslator::new(config.clone())?);
        Ok(Self::new(TranslationDriver::new(
            provider,
            DriverOptions::from(config),
        )))
    }

    /// Find `.txt` files in `dir`, as paths relative to it, sorted
    pub fn find_files(&self, dir: &Path, recursive: bool) -> Result<Vec<String>> {
        if !dir.is_dir() {
            return Err(TranslationError::FileError {
                path: dir.display().to_string(),
                message: "Not a directory".to_string(),
            });
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(dir).max_depth(max_depth) {
            let entry = entry.map_err(|e| TranslationError::file(dir.display(), e))?;
            let path = entry.path();
            if entry.file_type().is_file() && is_text_file(path) {
                if let Ok(relative) = path.strip_prefix(dir) {
                    files.push(relative_id(relative));
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Resolve the batch job and its collaborators for a directory run.
    ///
    /// Fails if the input directory cannot be listed or the output directory
    /// cannot be created. The output directory is left alone when nothing is
    /// selected.
    pub fn prepare_directory(
        &self,
        input: &Path,
        output: &Path,
        options: &DirectoryOptions,
    ) -> Result<(BatchJob, DirectorySource, DirectorySink)> {
        let mut units = self.find_files(input, options.recursive)?;
        if !options.only.is_empty() {
            units.retain(|id| {
                let name = Path::new(id)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                options.only.iter().any(|o| *o == name || o == id)
            });
        }

        if !units.is_empty() {
            std::fs::create_dir_all(output)
                .map_err(|e| TranslationError::file(output.display(), e))?;
        }

        let job = BatchJob::new(units, &options.source_lang, &options.target_lang)
            .with_mode(options.mode);
        Ok((
            job,
            DirectorySource::new(input),
            DirectorySink::new(output, options.naming.clone()),
        ))
    }

    /// Translate every selected `.txt` file of `input` into `output`
    pub async fn translate_directory<F>(
        &self,
        input: &Path,
        output: &Path,
        options: &DirectoryOptions,
        on_progress: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        info!("Translating directory {} -> {}", input.display(), output.display());
        let (job, source, mut sink) = self.prepare_directory(input, output, options)?;
        self.driver
            .translate_batch(&job, &source, &mut sink, on_progress)
            .await
    }

    /// Translate a single file; chunk progress goes to `on_progress`
    pub async fn translate_file<F>(
        &self,
        input: &Path,
        output: &Path,
        source_lang: &str,
        target_lang: &str,
        mode: TranslationMode,
        mut on_progress: F,
    ) -> Result<()>
    where
        F: FnMut(f64) + Send,
    {
        debug!("Translating: {}", input.display());

        let content = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| TranslationError::file(input.display(), e))?;

        let translated = match mode {
            TranslationMode::Whole => {
                let text = self.driver.translate_one(&content, source_lang, target_lang).await?;
                on_progress(100.0);
                text
            }
            TranslationMode::Chunked => {
                self.driver
                    .translate_chunked(&content, source_lang, target_lang, on_progress)
                    .await?
            }
        };

        write_text(output, &translated).await?;

        info!("Translated: {} -> {}", input.display(), output.display());
        Ok(())
    }
}

/// Check if file is plain text
fn is_text_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

/// Unit id for a relative path, always `/`-separated
fn relative_id(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Default output for a single file: `<stem><suffix>.<ext>` next to the input
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let suffix = if suffix.is_empty() { "_translated" } else { suffix };
    OutputNaming::Suffix(suffix.to_string()).apply(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::provider::mock::ScriptedProvider;

    fn processor(provider: Arc<ScriptedProvider>) -> TextFileProcessor {
        TextFileProcessor::new(TranslationDriver::new(provider, DriverOptions::default()))
    }

    fn options(mode: TranslationMode, naming: OutputNaming) -> DirectoryOptions {
        DirectoryOptions {
            source_lang: "en".to_string(),
            target_lang: "pt".to_string(),
            mode,
            naming,
            recursive: false,
            only: vec![],
        }
    }

    #[test]
    fn test_output_naming() {
        let suffix = OutputNaming::Suffix("_traduzido".to_string());
        assert_eq!(suffix.apply(Path::new("notes.txt")), PathBuf::from("notes_traduzido.txt"));
        assert_eq!(
            suffix.apply(Path::new("sub/notes.txt")),
            PathBuf::from("sub/notes_traduzido.txt")
        );
        assert_eq!(suffix.apply(Path::new("README")), PathBuf::from("README_traduzido"));
        assert_eq!(OutputNaming::Same.apply(Path::new("notes.txt")), PathBuf::from("notes.txt"));
        assert_eq!(OutputNaming::from_suffix(""), OutputNaming::Same);
    }

    #[test]
    fn test_is_text_file() {
        assert!(is_text_file(Path::new("a.txt")));
        assert!(is_text_file(Path::new("a.TXT")));
        assert!(!is_text_file(Path::new("a.md")));
        assert!(!is_text_file(Path::new("txt")));
    }

    #[test]
    fn test_find_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("c.md"), "c").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("d.txt"), "d").unwrap();

        let processor = processor(Arc::new(ScriptedProvider::new()));
        assert_eq!(processor.find_files(dir.path(), false).unwrap(), vec!["a.txt", "b.txt"]);
        assert_eq!(
            processor.find_files(dir.path(), true).unwrap(),
            vec!["a.txt", "b.txt", "nested/d.txt"]
        );
    }

    #[test]
    fn test_find_files_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(Arc::new(ScriptedProvider::new()));
        let err = processor.find_files(&dir.path().join("nope"), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[tokio::test]
    async fn test_directory_batch_writes_only_successes() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("translated");
        std::fs::write(input.path().join("file1.txt"), "one").unwrap();
        std::fs::write(input.path().join("file2.txt"), "two").unwrap();
        std::fs::write(input.path().join("file3.txt"), "three").unwrap();

        let provider = Arc::new(ScriptedProvider::new().fail_transport_on("two"));
        let processor = processor(provider);

        let report = processor
            .translate_directory(
                input.path(),
                &out_dir,
                &options(TranslationMode::Whole, OutputNaming::Same),
                |_| {},
            )
            .await
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, "file2.txt");
        assert_eq!(report.failed[0].kind, ErrorKind::Provider);

        assert_eq!(std::fs::read_to_string(out_dir.join("file1.txt")).unwrap(), "ONE");
        assert!(!out_dir.join("file2.txt").exists());
        assert_eq!(std::fs::read_to_string(out_dir.join("file3.txt")).unwrap(), "THREE");
    }

    #[tokio::test]
    async fn test_directory_batch_suffix_recursive_and_only() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::create_dir(input.path().join("ch")).unwrap();
        std::fs::write(input.path().join("ch").join("intro.txt"), "hello\n\nworld").unwrap();
        std::fs::write(input.path().join("skip.txt"), "skip").unwrap();

        let provider = Arc::new(ScriptedProvider::new());
        let processor = processor(provider.clone());
        let mut opts = options(
            TranslationMode::Chunked,
            OutputNaming::Suffix("_translated".to_string()),
        );
        opts.recursive = true;
        opts.only = vec!["intro.txt".to_string()];

        let report = processor
            .translate_directory(input.path(), output.path(), &opts, |_| {})
            .await
            .unwrap();

        assert!(report.is_complete_success());
        assert_eq!(report.total, 1);
        let written = output.path().join("ch").join("intro_translated.txt");
        assert_eq!(std::fs::read_to_string(written).unwrap(), "HELLO\n\nWORLD");
        assert_eq!(provider.calls(), vec!["hello", "world"]);
    }

    #[test]
    fn test_prepare_directory_empty_selection_creates_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("translated");
        std::fs::write(input.path().join("notes.txt"), "hi").unwrap();

        let processor = processor(Arc::new(ScriptedProvider::new()));
        let mut opts = options(TranslationMode::Whole, OutputNaming::Same);
        opts.only = vec!["other.txt".to_string()];

        let (job, _, _) = processor.prepare_directory(input.path(), &out_dir, &opts).unwrap();
        assert!(job.units.is_empty());
        assert!(!out_dir.exists());

        opts.only.clear();
        let (job, _, _) = processor.prepare_directory(input.path(), &out_dir, &opts).unwrap();
        assert_eq!(job.units, vec!["notes.txt"]);
        assert!(out_dir.is_dir());
    }

    #[tokio::test]
    async fn test_translate_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "good morning").unwrap();
        let output = default_output_path(&input, "");
        assert_eq!(output, dir.path().join("notes_translated.txt"));

        let processor = processor(Arc::new(ScriptedProvider::new()));
        let mut progress = Vec::new();
        processor
            .translate_file(&input, &output, "en", "pt", TranslationMode::Whole, |p| progress.push(p))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "GOOD MORNING");
        assert_eq!(progress, vec![100.0]);
    }

    #[tokio::test]
    async fn test_translate_missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(Arc::new(ScriptedProvider::new()));

        let err = processor
            .translate_file(
                &dir.path().join("missing.txt"),
                &dir.path().join("out.txt"),
                "en",
                "pt",
                TranslationMode::Chunked,
                |_| {},
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::FileError { .. }));
    }
}
