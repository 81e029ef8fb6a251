//! CSV datasets and the per-column statistics that seed the insight prompt.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::InsightError;

/// Descriptive statistics for one column. Empty cells are not counted.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnProfile {
    Numeric {
        count: usize,
        mean: f64,
        /// Sample standard deviation; `None` with fewer than two values.
        std: Option<f64>,
        min: f64,
        max: f64,
    },
    Text {
        count: usize,
        unique: usize,
        top: Option<String>,
        freq: usize,
    },
}

impl ColumnProfile {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnProfile::Numeric { .. } => "float64",
            ColumnProfile::Text { .. } => "object",
        }
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        match self {
            ColumnProfile::Numeric { mean, .. } => Some(*mean),
            ColumnProfile::Text { .. } => None,
        }
    }
}

/// A parsed CSV file: a header plus rows of equal width.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Reads and parses a `.csv` file.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::InvalidDataset`] if the path does not end in
    /// `.csv`, cannot be read, or fails [`Dataset::parse`].
    pub fn from_path(path: &Path) -> Result<Self, InsightError> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(InsightError::InvalidDataset {
                name,
                reason: "only .csv files are accepted".to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| InsightError::InvalidDataset {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(name, &content)
    }

    /// Parses CSV text. Fields may be double-quoted; quoted fields may hold
    /// commas, doubled quotes and line breaks. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::InvalidDataset`] if there is no header or no
    /// data row, if a quote is left open, or if a row's field count differs
    /// from the header's.
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self, InsightError> {
        let name = name.into();
        let invalid = |reason: String| InsightError::InvalidDataset {
            name: name.clone(),
            reason,
        };

        let mut records = parse_records(content).map_err(&invalid)?.into_iter();
        let columns: Vec<String> = records
            .next()
            .ok_or_else(|| invalid("file is empty".to_string()))?
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in records.enumerate() {
            if record.len() != columns.len() {
                return Err(invalid(format!(
                    "row {} has {} fields, expected {}",
                    index + 1,
                    record.len(),
                    columns.len()
                )));
            }
            rows.push(record);
        }
        if rows.is_empty() {
            return Err(invalid("file has a header but no data rows".to_string()));
        }

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of column `index`, empty cells skipped.
    fn cells(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    /// Profiles column `index`. A column is numeric when it has at least one
    /// value and every value parses as a number.
    #[must_use]
    pub fn profile(&self, index: usize) -> ColumnProfile {
        let values: Option<Vec<f64>> = self.cells(index).map(|c| c.parse::<f64>().ok()).collect();
        match values {
            Some(values) if !values.is_empty() => numeric_profile(&values),
            _ => text_profile(self.cells(index)),
        }
    }

    /// Profile of the column named `column`, if present.
    #[must_use]
    pub fn profile_of(&self, column: &str) -> Option<ColumnProfile> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|index| self.profile(index))
    }

    #[must_use]
    pub fn profiles(&self) -> Vec<(String, ColumnProfile)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.clone(), self.profile(index)))
            .collect()
    }

    /// Plain-text summary: row count, column names, column types and
    /// per-column statistics.
    #[must_use]
    pub fn summary(&self, heading: &str) -> String {
        let profiles = self.profiles();
        let mut out = String::new();
        let _ = writeln!(out, "{heading}:");
        let _ = writeln!(out, "- Total records: {}", self.row_count());
        let _ = writeln!(out, "- Columns: {}", self.columns.join(", "));
        let types: Vec<String> = profiles
            .iter()
            .map(|(column, profile)| format!("{column}: {}", profile.type_name()))
            .collect();
        let _ = writeln!(out, "- Data types: {}", types.join(", "));
        let _ = writeln!(out, "- Statistical summary:");
        for (column, profile) in &profiles {
            let _ = writeln!(out, "  {column}: {}", describe(profile));
        }
        out
    }
}

fn describe(profile: &ColumnProfile) -> String {
    match profile {
        ColumnProfile::Numeric {
            count,
            mean,
            std,
            min,
            max,
        } => {
            let std = std.map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}"));
            format!("count={count} mean={mean:.3} std={std} min={min:.3} max={max:.3}")
        }
        ColumnProfile::Text {
            count,
            unique,
            top,
            freq,
        } => format!(
            "count={count} unique={unique} top={} freq={freq}",
            top.as_deref().unwrap_or("n/a")
        ),
    }
}

#[allow(clippy::cast_precision_loss)]
fn numeric_profile(values: &[f64]) -> ColumnProfile {
    let count = values.len();
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (count > 1).then(|| {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    });
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ColumnProfile::Numeric {
        count,
        mean,
        std,
        min,
        max,
    }
}

/// The most frequent value wins; ties go to the value seen first.
fn text_profile<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnProfile {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut count = 0;
    for (seen, cell) in cells.enumerate() {
        count += 1;
        counts.entry(cell).or_insert((0, seen)).0 += 1;
    }
    let top = counts
        .iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(value, (freq, _))| ((*value).to_string(), *freq));
    ColumnProfile::Text {
        count,
        unique: counts.len(),
        freq: top.as_ref().map_or(0, |(_, freq)| *freq),
        top: top.map(|(value, _)| value),
    }
}

/// Splits CSV text into records. Rows consisting of a single empty field
/// (blank lines) are dropped.
fn parse_records(content: &str) -> Result<Vec<Vec<String>>, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    let mut finish_record = |record: &mut Vec<String>, field: &mut String| {
        record.push(std::mem::take(field));
        let done = std::mem::take(record);
        if !(done.len() == 1 && done[0].trim().is_empty()) {
            records.push(done);
        }
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => finish_record(&mut record, &mut field),
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        finish_record(&mut record, &mut field);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPAIGNS: &str = "campaign,clicks,ctr\nSpring,120,2.5\nSummer,80,1.5\nAutumn,100,2.0\n";

    #[test]
    fn parses_quoted_fields() {
        let ds = Dataset::parse(
            "ads.csv",
            "title,desc\r\n\"Learn, fast\",\"He said \"\"go\"\"\"\r\n\"multi\nline\",x\r\n",
        )
        .expect("valid csv");
        assert_eq!(ds.columns, vec!["title", "desc"]);
        assert_eq!(ds.rows[0], vec!["Learn, fast", "He said \"go\""]);
        assert_eq!(ds.rows[1][0], "multi\nline");
    }

    #[test]
    fn rejects_empty_file() {
        let err = Dataset::parse("empty.csv", "").unwrap_err();
        assert!(matches!(err, InsightError::InvalidDataset { ref reason, .. } if reason == "file is empty"));
    }

    #[test]
    fn rejects_header_only() {
        assert!(Dataset::parse("h.csv", "a,b\n").is_err());
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Dataset::parse("r.csv", "a,b\n1,2\n3\n").unwrap_err();
        assert!(err.to_string().contains("row 2 has 1 fields, expected 2"));
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(Dataset::parse("q.csv", "a\n\"open\n").is_err());
    }

    #[test]
    fn numeric_columns_get_sample_statistics() {
        let ds = Dataset::parse("c.csv", CAMPAIGNS).expect("valid csv");
        let ColumnProfile::Numeric {
            count,
            mean,
            std,
            min,
            max,
        } = ds.profile_of("clicks").expect("column")
        else {
            panic!("clicks should be numeric");
        };
        assert_eq!(count, 3);
        assert!((mean - 100.0).abs() < 1e-9);
        assert!((std.expect("std") - 20.0).abs() < 1e-9);
        assert!((min - 80.0).abs() < 1e-9);
        assert!((max - 120.0).abs() < 1e-9);
    }

    #[test]
    fn text_columns_report_top_value() {
        let ds = Dataset::parse("p.csv", "platform\nGoogle\nBing\nGoogle\n\n").expect("valid csv");
        assert_eq!(
            ds.profile(0),
            ColumnProfile::Text {
                count: 3,
                unique: 2,
                top: Some("Google".to_string()),
                freq: 2,
            }
        );
    }

    #[test]
    fn mixed_columns_are_text() {
        let ds = Dataset::parse("m.csv", "v\n1\nabc\n").expect("valid csv");
        assert_eq!(ds.profile(0).type_name(), "object");
    }

    #[test]
    fn summary_lists_rows_columns_and_types() {
        let ds = Dataset::parse("c.csv", CAMPAIGNS).expect("valid csv");
        let summary = ds.summary("Campaign Data Summary");
        assert!(summary.contains("- Total records: 3"));
        assert!(summary.contains("- Columns: campaign, clicks, ctr"));
        assert!(summary.contains("clicks: float64"));
        assert!(summary.contains("campaign: object"));
    }

    #[test]
    fn from_path_rejects_non_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, "a\n1\n").expect("write");
        let err = Dataset::from_path(&path).unwrap_err();
        assert!(matches!(err, InsightError::InvalidDataset { ref name, .. } if name == "data.xlsx"));
    }

    #[test]
    fn from_path_reads_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mine.CSV");
        std::fs::write(&path, CAMPAIGNS).expect("write");
        let ds = Dataset::from_path(&path).expect("valid");
        assert_eq!(ds.name, "mine.CSV");
        assert_eq!(ds.row_count(), 3);
    }
}
