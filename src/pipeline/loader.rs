//! Dataset provider: numbered delimited text files on disk

use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use super::dataset::{Dataset, DatasetError};

/// Cell values read as missing in addition to empty fields
const NULL_MARKERS: [&str; 4] = ["NA", "NaN", "nan", "null"];

/// Source of the datasets in a batch, addressed by numeric index
pub trait DatasetProvider: Sync {
    /// Human-readable name of the dataset at `index` (its file name)
    fn name(&self, index: u32) -> String;

    /// Load the dataset at `index`
    fn load(&self, index: u32) -> Result<Dataset, DatasetError>;
}

/// File name template with an index placeholder: `{i}` or zero-padded `{i:03}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    prefix: String,
    width: usize,
    suffix: String,
}

impl FilePattern {
    pub fn file_name(&self, index: u32) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            index,
            self.suffix,
            width = self.width
        )
    }
}

impl std::fmt::Display for FilePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.width == 0 {
            write!(f, "{}{{i}}{}", self.prefix, self.suffix)
        } else {
            write!(f, "{}{{i:0{}}}{}", self.prefix, self.width, self.suffix)
        }
    }
}

impl std::str::FromStr for FilePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let start = s
            .find("{i")
            .ok_or_else(|| format!("File pattern '{}' has no {{i}} placeholder", s))?;
        let end = s[start..]
            .find('}')
            .map(|offset| start + offset)
            .ok_or_else(|| format!("Unclosed placeholder in file pattern '{}'", s))?;

        let spec = &s[start + 2..end];
        let width = match spec.strip_prefix(':') {
            None if spec.is_empty() => 0,
            Some(digits) => digits
                .parse::<usize>()
                .map_err(|_| format!("Invalid width '{}' in file pattern '{}'", digits, s))?,
            None => return Err(format!("Invalid placeholder in file pattern '{}'", s)),
        };

        let suffix = &s[end + 1..];
        if suffix.contains("{i") {
            return Err(format!("File pattern '{}' has more than one placeholder", s));
        }

        Ok(Self {
            prefix: s[..start].to_string(),
            width,
            suffix: suffix.to_string(),
        })
    }
}

/// How dataset files are parsed
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Name of the class label column
    pub class_column: String,
    /// Field delimiter
    pub separator: u8,
    /// Rows used for schema inference (0 = full scan)
    pub infer_schema_length: usize,
    /// Marker count every dataset must have, if set
    pub expected_markers: Option<usize>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            class_column: "Class".to_string(),
            separator: b',',
            infer_schema_length: 10000,
            expected_markers: None,
        }
    }
}

/// Datasets stored as `<dir>/<pattern with index>`
#[derive(Debug, Clone)]
pub struct FileDatasetProvider {
    dir: PathBuf,
    pattern: FilePattern,
    options: LoaderOptions,
}

impl FileDatasetProvider {
    pub fn new(dir: impl Into<PathBuf>, pattern: FilePattern, options: LoaderOptions) -> Self {
        Self {
            dir: dir.into(),
            pattern,
            options,
        }
    }

    pub fn path(&self, index: u32) -> PathBuf {
        self.dir.join(self.pattern.file_name(index))
    }
}

impl DatasetProvider for FileDatasetProvider {
    fn name(&self, index: u32) -> String {
        self.pattern.file_name(index)
    }

    fn load(&self, index: u32) -> Result<Dataset, DatasetError> {
        let path = self.path(index);
        let df = read_table(&path, self.options.separator, self.options.infer_schema_length)?;
        let dataset = Dataset::from_dataframe(&df, &self.options.class_column)?;

        if let Some(expected) = self.options.expected_markers {
            if dataset.markers.len() != expected {
                return Err(DatasetError::Malformed(format!(
                    "expected {} marker columns, found {}",
                    expected,
                    dataset.markers.len()
                )));
            }
        }

        Ok(dataset)
    }
}

/// Read a delimited text file with a header row into a DataFrame.
///
/// Bytes that are not valid UTF-8 are decoded as GBK.
pub fn read_table(
    path: &Path,
    separator: u8,
    infer_schema_length: usize,
) -> Result<DataFrame, DatasetError> {
    let text = read_text(path)?;

    // Convert schema length: 0 means full scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .map_parse_options(|opts| {
            let null_values =
                NullValues::AllColumns(NULL_MARKERS.iter().map(|s| (*s).into()).collect());
            opts.with_separator(separator)
                .with_null_values(Some(null_values))
        })
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a delimited text file cell for cell: no header row, every column a string,
/// no null markers.
pub fn read_raw_table(path: &Path, separator: u8) -> Result<DataFrame, DatasetError> {
    let text = read_text(path)?;

    CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn read_text(path: &Path) -> Result<String, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| DatasetError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(&bytes).into_owned())
}

/// Decode file contents as UTF-8 (BOM stripped), falling back to GBK
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    let (text, _, _) = encoding_rs::GBK.decode(bytes);
    text
}
