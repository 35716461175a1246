use std::fmt;

use indexmap::IndexMap;

use crate::error::{FacesError, Result};
use crate::value::Value;

/// Row-indexed view over the collection an iteration component walks.
pub trait DataModel: fmt::Debug {
    fn row_count(&self) -> usize;

    fn row_index(&self) -> Option<usize>;

    fn set_row_index(&mut self, index: Option<usize>);

    fn row_data(&self) -> Option<&Value>;

    fn set_row_data(&mut self, value: Value) -> Result<()>;

    fn boxed_clone(&self) -> Box<dyn DataModel>;

    fn is_row_available(&self) -> bool {
        matches!(self.row_index(), Some(index) if index < self.row_count())
    }
}

impl Clone for Box<dyn DataModel> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// A list of rows. Also backs ranges, map entries and the empty model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListDataModel {
    rows: Vec<Value>,
    index: Option<usize>,
}

impl ListDataModel {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows, index: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Integers from `first` to `last` inclusive, stepping down when `last < first`.
    pub fn range(first: i64, last: i64) -> Self {
        let rows = if first <= last {
            (first..=last).map(Value::Int).collect()
        } else {
            (last..=first).rev().map(Value::Int).collect()
        };
        Self::new(rows)
    }

    /// One row per entry, each a map with `key` and `value`.
    pub fn from_entries(entries: &IndexMap<String, Value>) -> Self {
        Self::new(
            entries
                .iter()
                .map(|(key, value)| Value::map([("key", Value::from(key.as_str())), ("value", value.clone())]))
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }
}

impl DataModel for ListDataModel {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_index(&self) -> Option<usize> {
        self.index
    }

    fn set_row_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    fn row_data(&self) -> Option<&Value> {
        self.index.and_then(|index| self.rows.get(index))
    }

    fn set_row_data(&mut self, value: Value) -> Result<()> {
        match self.index.and_then(|index| self.rows.get_mut(index)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FacesError::invalid_argument("no row is available")),
        }
    }

    fn boxed_clone(&self) -> Box<dyn DataModel> {
        Box::new(self.clone())
    }
}

/// Exactly one row holding a single value.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarDataModel {
    value: Value,
    index: Option<usize>,
}

impl ScalarDataModel {
    pub fn new(value: Value) -> Self {
        Self { value, index: None }
    }
}

impl DataModel for ScalarDataModel {
    fn row_count(&self) -> usize {
        1
    }

    fn row_index(&self) -> Option<usize> {
        self.index
    }

    fn set_row_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    fn row_data(&self) -> Option<&Value> {
        (self.index == Some(0)).then_some(&self.value)
    }

    fn set_row_data(&mut self, value: Value) -> Result<()> {
        if self.index != Some(0) {
            return Err(FacesError::invalid_argument("no row is available"));
        }
        self.value = value;
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn DataModel> {
        Box::new(self.clone())
    }
}

/// Picks a model for `value`: lists iterate their items, maps their entries and any other
/// non-null value becomes a single row.
pub fn model_for_value(value: &Value) -> Box<dyn DataModel> {
    match value {
        Value::Null => Box::new(ListDataModel::empty()),
        Value::List(items) => Box::new(ListDataModel::new(items.clone())),
        Value::Map(entries) => Box::new(ListDataModel::from_entries(entries)),
        scalar => Box::new(ScalarDataModel::new(scalar.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_inclusive_in_both_directions() {
        assert_eq!(
            ListDataModel::range(2, 4).rows(),
            &[Value::Int(2), Value::Int(3), Value::Int(4)]
        );
        assert_eq!(
            ListDataModel::range(3, 1).rows(),
            &[Value::Int(3), Value::Int(2), Value::Int(1)]
        );
        assert_eq!(ListDataModel::range(5, 5).row_count(), 1);
    }

    #[test]
    fn row_availability_follows_the_index() {
        let mut model = ListDataModel::new(vec![Value::from("a"), Value::from("b")]);
        assert!(!model.is_row_available());
        model.set_row_index(Some(1));
        assert!(model.is_row_available());
        assert_eq!(model.row_data(), Some(&Value::from("b")));
        model.set_row_index(Some(2));
        assert!(!model.is_row_available());
        assert!(model.set_row_data(Value::Null).is_err());
    }

    #[test]
    fn scalars_and_maps_pick_their_models() {
        let mut scalar = model_for_value(&Value::Int(7));
        assert_eq!(scalar.row_count(), 1);
        scalar.set_row_index(Some(0));
        assert_eq!(scalar.row_data(), Some(&Value::Int(7)));

        let mut entries = model_for_value(&Value::map([("a", Value::Int(1)), ("b", Value::Int(2))]));
        assert_eq!(entries.row_count(), 2);
        entries.set_row_index(Some(1));
        assert_eq!(entries.row_data().and_then(|row| row.get("key")), Some(&Value::from("b")));

        assert_eq!(model_for_value(&Value::Null).row_count(), 0);
    }
}
