//! Plain text reports of a working set.

use std::fmt;

use crate::working_set::WorkingSet;

/// Maximum width of a table cell.
pub const MAX_CELL_LENGTH: usize = 25;

/// Render rows as a pipe delimited table, truncating cells to `max_length`
/// characters when given.
pub fn tabulate(headers: &[&str], rows: &[Vec<String>], max_length: Option<usize>) -> String {
    let truncate = |value: &str| -> String {
        match max_length {
            Some(max) => value.chars().take(max).collect(),
            None => value.to_string(),
        }
    };
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();

    let line = format!(
        "|{}|",
        "-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1))
    );

    let mut table = Vec::with_capacity(rows.len() + 4);
    table.push(line.clone());
    table.push(render_row(headers.iter().copied(), &widths));
    table.push(line.clone());
    for row in &rows {
        table.push(render_row(row.iter().map(String::as_str), &widths));
    }
    table.push(line);
    table.join("\n")
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (cell, &width) in cells.zip(widths) {
        out.push_str(&format!("{cell:<width$}|"));
    }
    out
}

impl WorkingSet {
    /// The aggregation as a table.
    pub fn aggregation_table(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .iter()
            .map(|record| {
                vec![
                    record.path.display().to_string(),
                    record.filename.clone(),
                    record.character_count().to_string(),
                    record.token_count().to_string(),
                    record.transformed_text().unwrap_or_default().to_string(),
                ]
            })
            .collect();
        tabulate(
            &["path", "filename", "characters", "tokens", "transformed_text"],
            &rows,
            Some(MAX_CELL_LENGTH),
        )
    }

    /// One line per recorded checkpoint.
    pub fn saved_states(&self) -> String {
        let mut out = String::from("Saved States:");
        for (i, checkpoint) in self.history.iter().enumerate() {
            out.push_str(&format!(
                "\n[{}] - {} files after applying {:?} ({})",
                i,
                checkpoint.aggregation.len(),
                checkpoint.applied_filters,
                checkpoint.created_at.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        out
    }

    /// Applied filters, the current checkpoint and staged transformations.
    pub fn pipeline_report(&self) -> String {
        let mut out = String::from("Applied Filters:");
        out.push_str(&format!(
            "\n> {} states have been saved.\n> Currently on state {} / {}",
            self.history.len(),
            self.history.current(),
            self.history.len()
        ));
        if self.applied_filters.is_empty() {
            out.push_str("\nNone");
        }
        for filter in &self.applied_filters {
            out.push('\n');
            out.push_str(filter);
        }

        out.push_str("\n\nStaged Transformations:");
        if self.pipeline.is_empty() {
            out.push_str("\nNone");
        }
        for staged in self.pipeline.staged() {
            out.push_str(&format!("\n{staged}"));
        }
        out
    }
}

impl fmt::Display for WorkingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let staged: Vec<String> = self
            .staged_transformations()
            .iter()
            .map(ToString::to_string)
            .collect();
        write!(
            f,
            "{}\nStaged Transformations: {:?}",
            self.aggregation_table(),
            staged
        )
    }
}
