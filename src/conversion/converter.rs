use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::app_config::ConversionConfig;
use crate::conversion::tabular::{self, Cell, TableRow};
use crate::errors::ConversionError;
use crate::file_utils::FileManager;
use crate::language_utils::Language;
use crate::voiceover::{LangObject, LangObjects, VoiceoverCollection, VoiceoverLine};

// @module: Table rows to voiceover collection conversion

/// Required column holding the line key
pub const KEY_COLUMN: &str = "key";

/// Required column holding the audio reference
pub const AUDIO_COLUMN: &str = "audioFileName";

/// Converts source table rows into a persisted `VoiceoverCollection`
#[derive(Debug, Clone)]
pub struct RecordConverter {
    // @field: Separator between timestamps in one cell
    timestamp_delimiter: char,

    // @field: Separator between lines in one cell
    line_delimiter: char,

    // @field: Pretty-print output
    pretty_output: bool,
}

impl RecordConverter {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            timestamp_delimiter: config.timestamp_delimiter,
            line_delimiter: config.line_delimiter,
            pretty_output: config.pretty_output,
        }
    }

    /// Convert parsed rows, preserving row order
    pub fn convert(&self, rows: &[TableRow]) -> Result<VoiceoverCollection, ConversionError> {
        let voiceover_lines = rows
            .iter()
            .map(|row| self.convert_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VoiceoverCollection::new(voiceover_lines))
    }

    /// Convert a single row into a voiceover line
    pub fn convert_row(&self, row: &TableRow) -> Result<VoiceoverLine, ConversionError> {
        let key = required_cell(row, KEY_COLUMN)?.as_text().trim().to_string();
        if key.is_empty() {
            return Err(ConversionError::MalformedRecord {
                row: row.row_number,
                column: KEY_COLUMN.to_string(),
            });
        }
        let audio_file_name = required_cell(row, AUDIO_COLUMN)?.as_text().trim().to_string();

        let mut lang_objects: LangObjects = Default::default();
        for language in Language::ALL {
            let timestamps_column = language.timestamps_column();
            let lines_column = language.lines_column();

            let timestamps = self.parse_timestamps(
                required_cell(row, &timestamps_column)?,
                row.row_number,
                &timestamps_column,
            )?;
            let lines = self.parse_lines(required_cell(row, &lines_column)?);

            let lang_object = LangObject::new(timestamps, lines);
            lang_object
                .validate()
                .map_err(|reason| ConversionError::InvalidSegments {
                    row: row.row_number,
                    key: key.clone(),
                    language,
                    reason,
                })?;

            lang_objects[language.index()] = lang_object;
        }

        Ok(VoiceoverLine::new(key, audio_file_name, lang_objects))
    }

    /// Parse a timestamps cell into offsets in seconds
    pub fn parse_timestamps(&self, cell: &Cell, row: usize, column: &str) -> Result<Vec<f32>, ConversionError> {
        match cell {
            Cell::Number { value, .. } => Ok(vec![*value as f32]),
            Cell::Text(text) => {
                if text.trim().is_empty() {
                    return Ok(Vec::new());
                }

                text.split(self.timestamp_delimiter)
                    .map(|token| {
                        token.trim().parse::<f32>().map_err(|_| ConversionError::TimestampParse {
                            row,
                            column: column.to_string(),
                            token: token.to_string(),
                        })
                    })
                    .collect()
            }
        }
    }

    /// Split a lines cell into display segments
    pub fn parse_lines(&self, cell: &Cell) -> Vec<String> {
        let text = cell.as_text();
        if text.is_empty() {
            return Vec::new();
        }
        text.split(self.line_delimiter).map(str::to_string).collect()
    }

    /// Serialize a collection to its persisted JSON form
    pub fn to_json(&self, collection: &VoiceoverCollection) -> Result<String, ConversionError> {
        let json = if self.pretty_output {
            serde_json::to_string_pretty(collection)?
        } else {
            serde_json::to_string(collection)?
        };
        Ok(json)
    }

    /// Convert a CSV file and persist the result under `output_dir`
    ///
    /// The output keeps the input's base name with a `.json` extension. Nothing
    /// is written unless every row converts.
    pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_file: P1,
        output_dir: P2,
    ) -> Result<PathBuf, ConversionError> {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let rows = tabular::read_table(input_file).map_err(|e| ConversionError::Source {
            path: input_file.to_path_buf(),
            message: format!("{:#}", e),
        })?;
        debug!("Read {} row(s) from {:?}", rows.len(), input_file);

        let collection = self.convert(&rows)?;
        let json = self.to_json(&collection)?;

        FileManager::ensure_dir(output_dir).map_err(|source| ConversionError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let output_path = FileManager::generate_output_path(input_file, output_dir, "json");
        FileManager::write_atomic(&output_path, &json).map_err(|source| ConversionError::Io {
            path: output_path.clone(),
            source,
        })?;

        info!("Converted {} voiceover line(s): {:?}", collection.len(), output_path);
        Ok(output_path)
    }
}

impl Default for RecordConverter {
    fn default() -> Self {
        Self::new(&ConversionConfig::default())
    }
}

fn required_cell<'a>(row: &'a TableRow, column: &str) -> Result<&'a Cell, ConversionError> {
    row.get(column).ok_or_else(|| ConversionError::MalformedRecord {
        row: row.row_number,
        column: column.to_lowercase(),
    })
}
