//! Lazy, read-only views over one or two dataset columns.
//!
//! A view never copies the dataset: it keeps a shared reference, the column
//! key(s) and an optional row limit, and reads one row per access.

use std::iter::FusedIterator;

use crate::error::{EvaluateError, Result};

use super::model::{Dataset, Row, Value};

/// Maximum number of rows a view exposes. `None` means the whole dataset.
pub type RowLimit = Option<usize>;

fn bounded_len(dataset_len: usize, n_rows: RowLimit) -> usize {
    match n_rows {
        Some(limit) => dataset_len.min(limit),
        None => dataset_len,
    }
}

// ---------------------------------------------------------------------------
// ColumnSequence – shared capability set of the views
// ---------------------------------------------------------------------------

/// Index-addressable, iterable, read-only sequence.
pub trait ColumnSequence {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `index`. Fails with [`EvaluateError::IndexOutOfRange`]
    /// for `index >= len()`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Fresh iterator over `0..len()`. Each call starts over.
    fn iter(&self) -> ColumnIter<'_, Self>
    where
        Self: Sized,
    {
        ColumnIter {
            sequence: self,
            next: 0,
            end: self.len(),
        }
    }
}

/// Iterator produced by [`ColumnSequence::iter`]; one dataset read per item.
#[derive(Debug)]
pub struct ColumnIter<'a, S> {
    sequence: &'a S,
    next: usize,
    end: usize,
}

impl<S: ColumnSequence> Iterator for ColumnIter<'_, S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.sequence.get(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<S: ColumnSequence> ExactSizeIterator for ColumnIter<'_, S> {}

impl<S: ColumnSequence> FusedIterator for ColumnIter<'_, S> {}

// ---------------------------------------------------------------------------
// ColumnView
// ---------------------------------------------------------------------------

/// One column of a dataset, optionally truncated to the first `n_rows` rows.
#[derive(Debug)]
pub struct ColumnView<'d, D: ?Sized> {
    dataset: &'d D,
    key: String,
    n_rows: RowLimit,
}

impl<D: ?Sized> Clone for ColumnView<'_, D> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset,
            key: self.key.clone(),
            n_rows: self.n_rows,
        }
    }
}

impl<'d, D: Dataset + ?Sized> ColumnView<'d, D> {
    pub fn new(dataset: &'d D, key: impl Into<String>, n_rows: RowLimit) -> Self {
        Self {
            dataset,
            key: key.into(),
            n_rows,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn n_rows(&self) -> RowLimit {
        self.n_rows
    }
}

impl<D: Dataset + ?Sized> ColumnSequence for ColumnView<'_, D> {
    type Item = Value;

    fn len(&self) -> usize {
        bounded_len(self.dataset.len(), self.n_rows)
    }

    fn get(&self, index: usize) -> Result<Value> {
        let len = self.len();
        if index >= len {
            return Err(EvaluateError::IndexOutOfRange { index, len });
        }
        let row = self.dataset.row(index)?;
        column_value(&row, &self.key, index)
    }
}

impl<'a, 'd, D: Dataset + ?Sized> IntoIterator for &'a ColumnView<'d, D> {
    type Item = Result<Value>;
    type IntoIter = ColumnIter<'a, ColumnView<'d, D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// ColumnPairView
// ---------------------------------------------------------------------------

/// Two columns of a dataset, each renamed to an output key.
///
/// Every element is a fresh two-entry [`Row`]. When `second_col` is `None`
/// the second key always maps to [`Value::Null`].
#[derive(Debug)]
pub struct ColumnPairView<'d, D: ?Sized> {
    dataset: &'d D,
    first_col: String,
    second_col: Option<String>,
    first_key: String,
    second_key: String,
    n_rows: RowLimit,
}

impl<D: ?Sized> Clone for ColumnPairView<'_, D> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset,
            first_col: self.first_col.clone(),
            second_col: self.second_col.clone(),
            first_key: self.first_key.clone(),
            second_key: self.second_key.clone(),
            n_rows: self.n_rows,
        }
    }
}

impl<'d, D: Dataset + ?Sized> ColumnPairView<'d, D> {
    /// * `first_col` / `second_col` – column names in the dataset
    /// * `first_key` / `second_key` – keys used in each returned row
    /// * `n_rows` – number of leading rows to expose
    ///
    /// An empty `second_col` counts as no second column.
    pub fn new(
        dataset: &'d D,
        first_col: impl Into<String>,
        second_col: Option<String>,
        first_key: impl Into<String>,
        second_key: impl Into<String>,
        n_rows: RowLimit,
    ) -> Self {
        Self {
            dataset,
            first_col: first_col.into(),
            second_col: second_col.filter(|col| !col.is_empty()),
            first_key: first_key.into(),
            second_key: second_key.into(),
            n_rows,
        }
    }

    pub fn keys(&self) -> (&str, &str) {
        (&self.first_key, &self.second_key)
    }

    pub fn n_rows(&self) -> RowLimit {
        self.n_rows
    }
}

impl<D: Dataset + ?Sized> ColumnSequence for ColumnPairView<'_, D> {
    type Item = Row;

    fn len(&self) -> usize {
        bounded_len(self.dataset.len(), self.n_rows)
    }

    fn get(&self, index: usize) -> Result<Row> {
        let len = self.len();
        if index >= len {
            return Err(EvaluateError::IndexOutOfRange { index, len });
        }
        let row = self.dataset.row(index)?;
        let first = column_value(&row, &self.first_col, index)?;
        let second = match &self.second_col {
            Some(col) => column_value(&row, col, index)?,
            None => Value::Null,
        };

        let mut pair = Row::new();
        pair.insert(self.first_key.clone(), first);
        pair.insert(self.second_key.clone(), second);
        Ok(pair)
    }
}

impl<'a, 'd, D: Dataset + ?Sized> IntoIterator for &'a ColumnPairView<'d, D> {
    type Item = Result<Row>;
    type IntoIter = ColumnIter<'a, ColumnPairView<'d, D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn column_value(row: &Row, column: &str, index: usize) -> Result<Value> {
    row.get(column)
        .cloned()
        .ok_or_else(|| EvaluateError::ColumnNotFound {
            column: column.to_string(),
            index,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;

    fn table(n: usize) -> Table {
        let rows = (0..n)
            .map(|i| {
                let mut row = Row::new();
                row.insert("prediction".into(), Value::from(format!("p{i}")));
                row.insert("reference".into(), Value::from(format!("r{i}")));
                row.insert("label".into(), Value::Integer(i as i64));
                row
            })
            .collect();
        Table::from_rows(rows)
    }

    #[test]
    fn test_row_limit_truncates_length() {
        let data = table(10);
        let view = ColumnView::new(&data, "label", Some(5));
        assert_eq!(view.len(), 5);
        for i in 0..5 {
            assert_eq!(view.get(i).unwrap(), Value::Integer(i as i64));
        }
        assert!(matches!(
            view.get(5),
            Err(EvaluateError::IndexOutOfRange { index: 5, len: 5 })
        ));
    }

    #[test]
    fn test_unbounded_iterates_whole_dataset() {
        let data = table(3);
        let view = ColumnView::new(&data, "prediction", None);
        assert_eq!(view.len(), 3);
        let values: Vec<Value> = view.iter().collect::<Result<_>>().unwrap();
        let expected: Vec<Value> = (0..3)
            .map(|i| data.row(i).unwrap()["prediction"].clone())
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_limit_larger_than_dataset() {
        let data = table(2);
        let view = ColumnView::new(&data, "label", Some(100));
        assert_eq!(view.len(), 2);
        assert!(matches!(
            view.get(2),
            Err(EvaluateError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let data = table(4);
        let view = ColumnView::new(&data, "label", Some(3));
        let first: Vec<_> = view.iter().map(|v| v.unwrap()).collect();
        let second: Vec<_> = (&view).into_iter().map(|v| v.unwrap()).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(view.iter().len(), 3);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let data = table(1);
        let view = ColumnView::new(&data, "score", None);
        match view.get(0) {
            Err(EvaluateError::ColumnNotFound { column, index }) => {
                assert_eq!(column, "score");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_empty_dataset() {
        let data = table(0);
        let view = ColumnView::new(&data, "label", Some(5));
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn test_pair_view_renames_columns() {
        let data = table(3);
        let view = ColumnPairView::new(
            &data,
            "prediction",
            Some("reference".to_string()),
            "predictions",
            "references",
            None,
        );
        let row = view.get(1).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row["predictions"], Value::from("p1"));
        assert_eq!(row["references"], Value::from("r1"));
    }

    #[test]
    fn test_pair_view_without_second_column_yields_null() {
        let data = table(4);
        let view = ColumnPairView::new(&data, "prediction", None, "predictions", "references", None);
        let rows: Vec<Row> = view.iter().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 4);
        for row in rows {
            assert_eq!(row["references"], Value::Null);
            assert!(row["predictions"].as_str().is_some());
        }
    }

    #[test]
    fn test_pair_view_respects_row_limit() {
        let data = table(10);
        let view = ColumnPairView::new(
            &data,
            "prediction",
            Some("label".to_string()),
            "a",
            "b",
            Some(5),
        );
        assert_eq!(view.len(), 5);
        assert!(view.get(4).is_ok());
        assert!(view.get(5).unwrap_err().is_access_error());
        assert_eq!(view.keys(), ("a", "b"));
    }

    #[test]
    fn test_pair_view_empty_second_column_yields_null() {
        let data = table(2);
        let view = ColumnPairView::new(
            &data,
            "prediction",
            Some(String::new()),
            "predictions",
            "references",
            None,
        );
        for i in 0..2 {
            assert_eq!(view.get(i).unwrap()["references"], Value::Null);
        }
    }
}
