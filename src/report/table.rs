//! Org-style table rendering for the human-readable compliance log.

/// Render rows as an org-mode table :
///
/// | Device     | Subject | ... |
/// |------------+---------+-----|
/// | dist-rtr01 | system  | ... |
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();

    for row in rows {
        for (index, cell) in row.iter().enumerate().take(column_count) {
            if cell.len() > widths[index] {
                widths[index] = cell.len();
            }
        }
    }

    let mut output = String::new();
    push_row(
        &mut output,
        &headers.iter().map(|header| header.to_string()).collect::<Vec<_>>(),
        &widths,
    );

    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width + 2)).collect();
    output.push('|');
    output.push_str(&separator.join("+"));
    output.push_str("|\n");

    for row in rows {
        push_row(&mut output, row, &widths);
    }

    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    output.push('|');
    for (index, width) in widths.iter().enumerate() {
        let cell = cells.get(index).map(String::as_str).unwrap_or("");
        output.push_str(&format!(" {:<width$} |", cell, width = width));
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_the_widest_cell() {
        let rendered = render_table(
            &["Device", "Verdict"],
            &[
                vec!["dist-rtr01".to_string(), "Passed".to_string()],
                vec!["r2".to_string(), "Failed".to_string()],
            ],
        );

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Device     | Verdict |");
        assert_eq!(lines[1], "|------------+---------|");
        assert_eq!(lines[2], "| dist-rtr01 | Passed  |");
        assert_eq!(lines[3], "| r2         | Failed  |");
    }

    #[test]
    fn short_rows_render_with_empty_cells() {
        let rendered = render_table(&["A", "B"], &[vec!["x".to_string()]]);
        assert!(rendered.lines().last().unwrap().contains("| x |"));
    }
}
