use chrono::NaiveTime;
use zipsheet_core::{CellValue, Grid, Sheet};

/// Render a sheet as left-aligned text columns, blank rows skipped.
pub fn sheet(grid: &Grid, limit: Option<usize>) -> String {
    let rows: Vec<Vec<String>> = grid
        .data_range()
        .into_iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .take(limit.unwrap_or(usize::MAX))
        .map(|row| row.iter().map(cell).collect())
        .collect();

    let columns = rows.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{text:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn cell(value: &CellValue) -> String {
    match value {
        // Daily rows hold midnight; the time adds nothing.
        CellValue::DateTime(dt) if dt.time() == NaiveTime::MIN => {
            dt.format("%a %b %-d").to_string()
        }
        CellValue::DateTime(dt) => dt.format("%a %b %-d %-I:%M %p").to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use zipsheet_core::CellRef;

    #[test]
    fn aligns_columns_and_skips_blank_rows() {
        let mut grid = Grid::new("daily");
        grid.set_values(1, 1, vec![vec!["Date".into(), "High (°F)".into()]]);
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        grid.set_values(3, 1, vec![vec![day.into(), 58.0.into()]]);

        let text = sheet(&grid, None);

        assert_eq!(text, "Date       High (°F)\nFri Mar 1  58\n");
    }

    #[test]
    fn hourly_times_show_clock() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(13, 0, 0).unwrap();
        assert_eq!(cell(&CellValue::DateTime(t)), "Fri Mar 1 1:00 PM");
    }

    #[test]
    fn limit_caps_rows() {
        let mut grid = Grid::new("s");
        for r in 1..=5 {
            grid.set_value(CellRef::new(r, 1), (r as f64).into());
        }
        assert_eq!(sheet(&grid, Some(2)), "1\n2\n");
    }
}
