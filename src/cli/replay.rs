//! Replay scripts and CSV inspection

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::component::ComponentInputs;
use crate::config::CsvLayout;
use crate::session::persistence::parse_line;

/// Parse JSON-lines invocations; blank lines and `#` comments are skipped
pub fn parse_invocations(text: &str) -> Result<Vec<ComponentInputs>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str::<ComponentInputs>(line)
                .with_context(|| format!("Invalid invocation on line {}", idx + 1))
        })
        .collect()
}

/// What an exported log contains
#[derive(Debug, Clone, PartialEq)]
pub struct CsvSummary {
    pub rows: usize,
    pub favorites: usize,
    /// Field count of each row, in order
    pub fields_per_row: Vec<usize>,
}

pub fn inspect_csv(path: &Path, layout: CsvLayout) -> Result<CsvSummary> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    summarize(&contents, layout)
}

fn summarize(contents: &str, layout: CsvLayout) -> Result<CsvSummary> {
    // Position of the favorite flag counted from the end of the row
    let favorite_from_end = match layout {
        CsvLayout::Full => 2,
        CsvLayout::Compact => 1,
    };

    let mut summary = CsvSummary {
        rows: 0,
        favorites: 0,
        fields_per_row: Vec::new(),
    };

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = parse_line(line).with_context(|| format!("Bad row {}", idx + 1))?;
        if values.len() >= favorite_from_end && values[values.len() - favorite_from_end] != 0.0 {
            summary.favorites += 1;
        }
        summary.rows += 1;
        summary.fields_per_row.push(values.len());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invocations_with_defaults() {
        let script = r#"
# start the session
{"start": true, "participant": 7, "log_path": "/tmp/", "design_vector": [1, 2]}

{"design_vector": [3, 4], "favorite": true}
"#;
        let invocations = parse_invocations(script).unwrap();
        assert_eq!(invocations.len(), 2);
        assert!(invocations[0].start);
        assert_eq!(invocations[0].session_length_minutes, None);
        assert_eq!(invocations[1].design_vector, vec![3.0, 4.0]);
        assert_eq!(invocations[1].phase, 1);
    }

    #[test]
    fn test_parse_invocations_reports_line() {
        let err = parse_invocations("{\"start\": true}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_summarize_full_layout() {
        let csv = "1,2,0.5,20240101120000,0,0,1\n3,4,0.7,20240101120001,1,1,1\n";
        let summary = summarize(csv, CsvLayout::Full).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.favorites, 1);
        assert_eq!(summary.fields_per_row, vec![7, 7]);
    }

    #[test]
    fn test_summarize_compact_layout() {
        let csv = "1,20240101120000,1\n";
        let summary = summarize(csv, CsvLayout::Compact).unwrap();
        assert_eq!(summary.favorites, 1);
    }
}
