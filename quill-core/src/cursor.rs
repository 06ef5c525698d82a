use crate::{Error, Result, Value};
use std::{collections::VecDeque, sync::Arc};

/// Forward only iterator over the rows of a query result.
///
/// A cursor starts *before* the first row, `advance` moves to the next row
/// and reports whether one exists. Column accessors describe the result
/// shape, `value` reads a column of the current row.
pub trait Cursor {
    fn advance(&mut self) -> Result<bool>;

    fn column_count(&self) -> usize;

    /// Label of the column, the alias given in the statement if any.
    fn column_label(&self, index: usize) -> &str;

    /// Underlying column name, defaults to the label.
    fn column_name(&self, index: usize) -> &str {
        self.column_label(index)
    }

    fn value(&self, index: usize) -> Result<Value>;
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }
    fn column_count(&self) -> usize {
        (**self).column_count()
    }
    fn column_label(&self, index: usize) -> &str {
        (**self).column_label(index)
    }
    fn column_name(&self, index: usize) -> &str {
        (**self).column_name(index)
    }
    fn value(&self, index: usize) -> Result<Value> {
        (**self).value(index)
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }
    fn column_count(&self) -> usize {
        (**self).column_count()
    }
    fn column_label(&self, index: usize) -> &str {
        (**self).column_label(index)
    }
    fn column_name(&self, index: usize) -> &str {
        (**self).column_name(index)
    }
    fn value(&self, index: usize) -> Result<Value> {
        (**self).value(index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLabel {
    pub label: String,
    pub name: String,
}

impl ColumnLabel {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
        }
    }
}

impl From<&str> for ColumnLabel {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

impl From<String> for ColumnLabel {
    fn from(value: String) -> Self {
        Self::new(value.clone(), value)
    }
}

impl From<(&str, &str)> for ColumnLabel {
    fn from((label, name): (&str, &str)) -> Self {
        Self::new(label, name)
    }
}

/// Materialized query result, a cursor owning all of its rows.
///
/// ```rust
/// use quill_core::{Cursor, RowSet, Value};
/// let mut rows = RowSet::new(["id", "name"]).with_row([Value::from(1), Value::from("a")]);
/// assert!(rows.advance().unwrap());
/// assert_eq!(rows.value(1).unwrap(), Value::from("a"));
/// assert!(!rows.advance().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Arc<[ColumnLabel]>,
    rows: VecDeque<Box<[Value]>>,
    current: Option<Box<[Value]>>,
}

impl RowSet {
    pub fn new<L: Into<ColumnLabel>>(columns: impl IntoIterator<Item = L>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: VecDeque::new(),
            current: None,
        }
    }

    /// Appends a row. Missing trailing values are `Value::Null`, extra values are dropped.
    pub fn push<V: Into<Value>>(&mut self, row: impl IntoIterator<Item = V>) {
        let len = self.columns.len();
        let mut row: Vec<Value> = row.into_iter().take(len).map(Into::into).collect();
        row.resize(len, Value::Null);
        self.rows.push_back(row.into());
    }

    pub fn with_row<V: Into<Value>>(mut self, row: impl IntoIterator<Item = V>) -> Self {
        self.push(row);
        self
    }

    pub fn columns(&self) -> &[ColumnLabel] {
        &self.columns
    }

    /// Rows not yet reached by the cursor.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Cursor for RowSet {
    fn advance(&mut self) -> Result<bool> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_label(&self, index: usize) -> &str {
        self.columns.get(index).map_or("", |v| v.label.as_str())
    }

    fn column_name(&self, index: usize) -> &str {
        self.columns.get(index).map_or("", |v| v.name.as_str())
    }

    fn value(&self, index: usize) -> Result<Value> {
        let Some(row) = &self.current else {
            return Err(Error::msg("The cursor is not positioned on a row"));
        };
        row.get(index).cloned().ok_or_else(|| {
            Error::msg(format!(
                "Column index {index} is out of range, the row has {} columns",
                row.len()
            ))
        })
    }
}
