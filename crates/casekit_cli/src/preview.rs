//! Plain-text table preview for terminal output.

use casekit_table::Dataset;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render the first `n_rows` rows as an aligned text table.
///
/// Widths are measured in terminal display columns, so wide (CJK) characters
/// count twice. Cells wider than `n_width_cell_max` columns are cut with `…`.
/// A footer line states how many rows are shown.
pub fn render_preview(dataset: &Dataset, n_rows: usize, n_width_cell_max: usize) -> String {
    if dataset.width() == 0 {
        return "(no columns)\n".to_string();
    }

    let ds_head = dataset.head(n_rows);
    let n_width_cell_max = usize::max(1, n_width_cell_max);

    let l_header: Vec<String> = ds_head
        .column_names()
        .iter()
        .map(|c_name| truncate_cell(c_name, n_width_cell_max))
        .collect();
    let l_grid: Vec<Vec<String>> = ds_head
        .rows()
        .map(|row| {
            row.iter()
                .map(|value| truncate_cell(&value.to_string(), n_width_cell_max))
                .collect()
        })
        .collect();

    let mut l_widths: Vec<usize> = l_header
        .iter()
        .map(|c_name| UnicodeWidthStr::width(c_name.as_str()))
        .collect();
    for row in &l_grid {
        for (n_idx_col, c_cell) in row.iter().enumerate() {
            l_widths[n_idx_col] =
                usize::max(l_widths[n_idx_col], UnicodeWidthStr::width(c_cell.as_str()));
        }
    }

    let mut c_out = String::new();
    c_out.push_str(&format_row(&l_header, &l_widths));
    c_out.push_str(
        &l_widths
            .iter()
            .map(|n_width| "-".repeat(*n_width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    c_out.push('\n');
    for row in &l_grid {
        c_out.push_str(&format_row(row, &l_widths));
    }
    c_out.push_str(&format!(
        "({} of {} rows)\n",
        ds_head.height(),
        dataset.height()
    ));
    c_out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let c_line = cells
        .iter()
        .zip(widths)
        .map(|(c_cell, n_width)| pad_right(c_cell, *n_width))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{}\n", c_line.trim_end())
}

// `{:<n$}` pads by char count, not display width.
fn pad_right(text: &str, n_width: usize) -> String {
    let n_pad = n_width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(n_pad))
}

fn truncate_cell(text: &str, n_width_max: usize) -> String {
    if UnicodeWidthStr::width(text) <= n_width_max {
        return text.to_string();
    }
    let n_budget = n_width_max - 1;
    let mut n_used = 0usize;
    let mut c_cut = String::new();
    for chr in text.chars() {
        let n_width_chr = UnicodeWidthChar::width(chr).unwrap_or(0);
        if n_used + n_width_chr > n_budget {
            break;
        }
        n_used += n_width_chr;
        c_cut.push(chr);
    }
    c_cut.push('…');
    c_cut
}

#[cfg(test)]
mod tests {
    use casekit_table::EnumCellValue;

    use super::*;

    #[test]
    fn test_render_preview() {
        let ds = Dataset::new(vec![
            (
                "caseId".to_string(),
                vec!["C-1".into(), "C-2".into(), "C-3".into()],
            ),
            (
                "rubix_Score".to_string(),
                vec![
                    EnumCellValue::Number(7.0),
                    EnumCellValue::None,
                    EnumCellValue::Number(1.5),
                ],
            ),
        ])
        .unwrap();

        let c_out = render_preview(&ds, 2, 32);
        assert_eq!(
            c_out,
            "caseId | rubix_Score\n\
             -------+------------\n\
             C-1    | 7\n\
             C-2\n\
             (2 of 3 rows)\n"
        );
    }

    #[test]
    fn test_render_preview_truncates_and_handles_empty() {
        let ds = Dataset::new(vec![(
            "notes".to_string(),
            vec![EnumCellValue::from("abcdefghij")],
        )])
        .unwrap();
        assert!(render_preview(&ds, 5, 4).contains("abc…"));
        assert_eq!(render_preview(&Dataset::default(), 5, 32), "(no columns)\n");
    }

    #[test]
    fn test_render_preview_aligns_wide_characters() {
        let ds = Dataset::new(vec![
            (
                "counterpartyName".to_string(),
                vec!["株式会社テスト".into(), "Acme".into()],
            ),
            ("caseId".to_string(), vec!["C-1".into(), "C-2".into()]),
        ])
        .unwrap();

        let c_out = render_preview(&ds, 5, 32);
        assert_eq!(
            c_out,
            "counterpartyName | caseId\n\
             -----------------+-------\n\
             株式会社テスト   | C-1\n\
             Acme             | C-2\n\
             (2 of 2 rows)\n"
        );
    }

    #[test]
    fn test_truncate_cell_by_display_width() {
        assert_eq!(truncate_cell("株式会社テスト", 6), "株式…");
        assert_eq!(truncate_cell("株式", 4), "株式");
        assert_eq!(truncate_cell("abcdef", 3), "ab…");
    }
}
