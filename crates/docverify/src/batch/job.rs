use calamine::{open_workbook_auto, Data, Reader};
use docverify_types::{DocverifyError, DocverifyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

const LABEL_COLUMN: usize = 0;
const HASH_COLUMN: usize = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchSource {
    Manual,
    Spreadsheet,
}

impl fmt::Display for BatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSource::Manual => write!(f, "manual"),
            BatchSource::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub label: Option<String>,
    pub raw: String,
}

impl BatchEntry {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            label: None,
            raw: raw.into(),
        }
    }

    pub fn labelled(label: impl Into<String>, raw: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            label: (!label.trim().is_empty()).then(|| label.trim().to_string()),
            raw: raw.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BatchJob {
    pub id: Uuid,
    pub source: BatchSource,
    pub entries: Vec<BatchEntry>,
}

impl BatchJob {
    pub fn new(source: BatchSource, entries: Vec<BatchEntry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            entries,
        }
    }

    /// Whitespace- or comma-separated fingerprints, as typed or pasted.
    pub fn from_manual(text: &str) -> Self {
        let entries = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(BatchEntry::new)
            .collect();

        Self::new(BatchSource::Manual, entries)
    }

    /// Row 0 is a header and is skipped. Column 0 labels the entry, column 1
    /// holds the fingerprint; missing cells read as empty. Rows with no
    /// content at all are dropped.
    pub fn from_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        let entries = rows
            .into_iter()
            .skip(1)
            .filter(|row| row.as_ref().iter().any(|cell| !cell.as_ref().trim().is_empty()))
            .map(|row| {
                let row = row.as_ref();
                let cell = |i: usize| row.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default();
                BatchEntry::labelled(cell(LABEL_COLUMN), cell(HASH_COLUMN))
            })
            .collect();

        Self::new(BatchSource::Spreadsheet, entries)
    }

    pub fn from_spreadsheet(path: impl AsRef<Path>) -> DocverifyResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let rows = match extension.as_str() {
            "csv" => read_csv(path)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
            other => {
                return Err(DocverifyError::Spreadsheet(format!(
                    "unsupported file type '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };

        let job = Self::from_rows(rows);
        info!(
            "Loaded {} entries from {}",
            job.entries.len(),
            path.display()
        );
        Ok(job)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_csv(path: &Path) -> DocverifyResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DocverifyError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| DocverifyError::Spreadsheet(format!("{}: {}", path.display(), e)))
        })
        .collect()
}

fn read_workbook(path: &Path) -> DocverifyResult<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DocverifyError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DocverifyError::Spreadsheet(format!("{} has no worksheets", path.display())))?
        .map_err(|e| DocverifyError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    debug!("First worksheet of {} is {:?}", path.display(), range.get_size());
    Ok(range.rows().map(|row| row.iter().map(render_cell).collect()).collect())
}

/// Renders a cell the way the normalizer expects to see it. Integral numbers
/// lose their fractional part; other floats keep full precision in
/// scientific form.
pub(crate) fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        Data::Float(f) => format!("{:e}", f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
