use crate::error::{ReportError, ReportResult};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|e| ReportError::io(path, e))?;
    debug!(path, rows = rows.len(), "wrote csv");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> ReportResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|e| ReportError::io(path, e))?;
    debug!(path, "wrote json");
    Ok(())
}

/// Markdown rendering of at most `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table<T>(
    report_no: usize,
    title: &str,
    note: Option<&str>,
    rows: &[T],
    max_rows: usize,
) where
    T: Tabled + Clone,
{
    println!("Report {}: {}", report_no, title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnderperformanceRow;

    fn row(rank: usize, dimension: &str, count: usize, severity: &str) -> UnderperformanceRow {
        UnderperformanceRow {
            rank,
            dimension: dimension.into(),
            count,
            severity: severity.into(),
        }
    }

    fn rows() -> Vec<UnderperformanceRow> {
        vec![row(1, "Risk Level", 3, "warning"), row(2, "Completion", 1, "caution")]
    }

    #[test]
    fn render_limits_rows() {
        let table = render_table(&rows(), 1).unwrap();
        assert!(table.contains("Risk Level"));
        assert!(!table.contains("Completion"));
        assert!(render_table::<UnderperformanceRow>(&[], 5).is_none());
    }

    #[test]
    fn csv_uses_renamed_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.csv");
        let path = path.to_str().unwrap();
        write_csv(path, &rows()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Rank,Dimension,Count,Severity\n"));
        assert!(text.contains("1,Risk Level,3,warning"));
    }
}
