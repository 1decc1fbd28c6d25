use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::context::VoiceoverContext;
use crate::conversion::RecordConverter;
use crate::file_utils::FileManager;
use crate::language_utils::Language;
use crate::loader::CollectionLoader;
use crate::playback::{ConsoleSink, SilentClip};

// @module: Application controller for conversion and preview

/// Outcome of a batch conversion
#[derive(Debug, Default)]
pub struct ConversionSummary {
    /// Collections written
    pub converted: Vec<PathBuf>,
    /// Sources that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl ConversionSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn output_dir(&self, output_dir: Option<&Path>) -> PathBuf {
        output_dir.map(Path::to_path_buf).unwrap_or_else(|| self.config.json_dir.clone())
    }

    /// Convert one CSV file into a collection
    pub fn convert_file(&self, input_file: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let converter = RecordConverter::new(&self.config.conversion);
        let output_dir = self.output_dir(output_dir);
        converter
            .convert_file(input_file, &output_dir)
            .with_context(|| format!("Failed to convert {:?}", input_file))
    }

    /// Convert every CSV file below a directory; failures are logged and counted
    pub fn convert_folder(&self, input_dir: &Path, output_dir: Option<&Path>) -> Result<ConversionSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let tables = FileManager::find_files(input_dir, "csv")?;
        if tables.is_empty() {
            warn!("No CSV tables found in {:?}", input_dir);
            return Ok(ConversionSummary::default());
        }

        let converter = RecordConverter::new(&self.config.conversion);
        let output_dir = self.output_dir(output_dir);

        let progress_bar = ProgressBar::new(tables.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tables ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let mut summary = ConversionSummary::default();
        for table in &tables {
            let file_name = table
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(format!("Converting: {}", file_name));

            match converter.convert_file(table, &output_dir) {
                Ok(output_path) => summary.converted.push(output_path),
                Err(e) => {
                    error!("Error converting {}: {}", file_name, e);
                    summary.failed.push((table.clone(), e.to_string()));
                }
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("Conversion complete");

        info!(
            "Folder conversion completed in {}: {} converted, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.converted.len(),
            summary.failed.len()
        );

        Ok(summary)
    }

    /// Convert a file or every table in a directory
    pub fn convert_path(&self, input_path: &Path, output_dir: Option<&Path>) -> Result<ConversionSummary> {
        if input_path.is_dir() {
            return self.convert_folder(input_path, output_dir);
        }

        let mut summary = ConversionSummary::default();
        match self.convert_file(input_path, output_dir) {
            Ok(output_path) => summary.converted.push(output_path),
            Err(e) => {
                error!("{:#}", e);
                summary.failed.push((input_path.to_path_buf(), format!("{:#}", e)));
            }
        }
        Ok(summary)
    }

    /// One row per loaded line: key, audio reference and segment count per language
    pub fn describe_scene(&self, scene: &str) -> Result<Vec<String>> {
        let loader = CollectionLoader::from_config(&self.config);
        let map = loader
            .load_scene(scene)
            .with_context(|| format!("Failed to load scene '{}'", scene))?;

        let mut lines: Vec<_> = map.lines().collect();
        lines.sort_by(|a, b| a.key.cmp(&b.key));

        let rows = lines
            .into_iter()
            .map(|line| {
                let counts = Language::ALL
                    .iter()
                    .map(|&language| format!("{}:{}", language, line.lang_object(language).segment_count()))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{:<24} {:<24} {}", line.key, line.audio_file_name, counts)
            })
            .collect();

        Ok(rows)
    }

    /// Play a line against the console with a silent clip of the given length
    pub async fn preview(
        &self,
        scene: &str,
        key: &str,
        language: Option<Language>,
        clip_length: f32,
    ) -> Result<()> {
        let sink = Arc::new(ConsoleSink::new());
        let audio = Arc::new(SilentClip::new(clip_length));
        let context = VoiceoverContext::activate(&self.config, scene, sink, audio);

        if let Some(language) = language {
            context.set_active_language(language);
        }
        debug!(
            "Previewing '{}' in {} ({})",
            key,
            context.active_language().display_name(),
            context.active_language().native_name()
        );

        if !context.request_playback(key, true) {
            if let Some(load_error) = context.load_error() {
                return Err(anyhow!("Scene '{}' is unavailable: {}", scene, load_error));
            }
            return Err(anyhow!("No voiceover line '{}' in scene '{}'", key, scene));
        }

        context.scheduler().wait_until_idle().await;
        Ok(())
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
