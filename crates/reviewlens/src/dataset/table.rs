use crate::error::DatasetError;

/// An ordered table of string cells with a header row.
///
/// Every row holds exactly one cell per header; missing cells are stored as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of a single row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.cells.get(index).map(String::as_str)
    }
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds a table, padding short rows and dropping cells beyond the header width.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|cells| Record {
            headers: &self.headers,
            cells,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            headers: &self.headers,
            cells,
        })
    }

    /// Returns the cells of `column` in row order.
    pub fn column(&self, column: &str) -> Result<Vec<&str>, DatasetError> {
        let index = self
            .column_index(column)
            .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Assigns `values` to `column`, replacing an existing column of that name
    /// in place or appending a new one at the end.
    pub fn set_column(&mut self, column: &str, values: Vec<String>) -> Result<(), DatasetError> {
        if values.len() != self.rows.len() {
            return Err(DatasetError::ColumnLength {
                column: column.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(column) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<String>> {
        &mut self.rows
    }
}
