use crate::value::Value;

/// Position metadata published under `varStatus` while a row is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationStatus {
    pub first: bool,
    pub last: bool,
    pub index: usize,
    pub begin: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<i64>,
}

impl IterationStatus {
    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    pub fn to_value(&self) -> Value {
        Value::map([
            ("first", Value::Bool(self.first)),
            ("last", Value::Bool(self.last)),
            ("index", Value::from(self.index)),
            ("even", Value::Bool(self.is_even())),
            ("odd", Value::Bool(self.is_odd())),
            ("begin", Value::from(self.begin)),
            ("end", Value::from(self.end)),
            ("step", Value::from(self.step)),
        ])
    }
}
