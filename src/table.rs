//! In-memory table: jagged rows of string cells.

use crate::reader::Row;

/// Rows of string cells plus the width of the widest row.
///
/// A table is never empty: no content is represented by one row holding one
/// empty cell. Rows may be shorter than [`Table::max_column_count`]; missing
/// trailing cells read as empty strings.
///
/// Structural edits never fail. Out-of-range indices leave the table
/// untouched and the edit returns `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    max_column_count: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Create the sentinel table `[[""]]`.
    pub fn new() -> Self {
        Self {
            rows: vec![vec![String::new()]],
            max_column_count: 1,
        }
    }

    /// Build a table from parsed rows, substituting the sentinel when the
    /// rows hold no cells at all.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let max_column_count = widest(&rows);
        if max_column_count == 0 {
            return Self::new();
        }
        Self {
            rows,
            max_column_count,
        }
    }

    /// Returns true for the sentinel table.
    pub fn is_sentinel(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].len() == 1 && self.rows[0][0].is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the widest row.
    #[inline]
    pub fn max_column_count(&self) -> usize {
        self.max_column_count
    }

    /// Cell text, with implicit trailing cells reading as `""`.
    ///
    /// Returns `None` only when the row or column lies outside the table.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.max_column_count {
            return None;
        }
        self.rows
            .get(row)
            .map(|r| r.get(column).map_or("", String::as_str))
    }

    /// Rows padded with empty cells to `max_column_count`.
    pub fn padded_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| {
                let mut padded = row.clone();
                padded.resize(self.max_column_count, String::new());
                padded
            })
            .collect()
    }

    /// Rows with trailing empty cells removed, keeping at least one cell.
    ///
    /// Two tables that differ only in implicit padding normalize equally.
    pub fn normalized_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| {
                let keep = row
                    .iter()
                    .rposition(|cell| !cell.is_empty())
                    .map_or(1, |last| last + 1);
                row.iter().take(keep.max(1)).cloned().collect::<Row>()
            })
            .map(|mut row| {
                if row.is_empty() {
                    row.push(String::new());
                }
                row
            })
            .collect()
    }

    /// Insert a row of empty cells at `index`, or append when `None`.
    ///
    /// The new row is `max_column_count` wide. An index past the end is
    /// ignored.
    pub fn add_row(&mut self, index: Option<usize>) -> bool {
        let new_row = vec![String::new(); self.max_column_count];
        match index {
            Some(i) if i > self.rows.len() => false,
            Some(i) => {
                self.rows.insert(i, new_row);
                true
            }
            None => {
                self.rows.push(new_row);
                true
            }
        }
    }

    /// Remove the row at `index`.
    pub fn delete_row(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        self.recompute_width();
        true
    }

    /// Insert an empty column at `index`, or append when `None`.
    ///
    /// Rows shorter than `index` receive the new cell at their end.
    pub fn add_column(&mut self, index: Option<usize>) -> bool {
        let insert_at = index.unwrap_or(self.max_column_count);
        self.max_column_count += 1;
        for row in &mut self.rows {
            if insert_at < row.len() {
                row.insert(insert_at, String::new());
            } else {
                row.push(String::new());
            }
        }
        true
    }

    /// Remove the column at `index` from every row that has it.
    pub fn delete_column(&mut self, index: usize) -> bool {
        if index >= self.max_column_count {
            return false;
        }
        for row in &mut self.rows {
            if index < row.len() {
                row.remove(index);
            }
        }
        self.recompute_width();
        true
    }

    /// Set one cell, growing the row with empty cells as needed.
    pub fn update_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> bool {
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        let Some(width) = column.checked_add(1) else {
            return false;
        };
        if target.len() < width {
            target.resize(width, String::new());
        }
        target[column] = value.into();
        self.max_column_count = self.max_column_count.max(target.len());
        true
    }

    fn recompute_width(&mut self) {
        self.max_column_count = widest(&self.rows);
        if self.max_column_count == 0 {
            *self = Self::new();
        }
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_rows(rows)
    }
}

fn widest(rows: &[Row]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}
