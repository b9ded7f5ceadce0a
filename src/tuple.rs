//! Values and tuples stored in tables

use crate::types::ColumnType;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single column value
///
/// Integer columns of every width share the `Int` variant; the schema
/// decides the admissible range.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Timestamp(i64),
    Varchar(String),
    Varbinary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check whether this value can be stored in a column of `column_type`.
    ///
    /// NULL fits every type; nullability is the schema's concern.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        match (self, column_type) {
            (Value::Null, _) => true,
            (Value::Bool(_), ColumnType::Bool) => true,
            (Value::Int(v), ty) => match ty.integer_range() {
                Some((min, max)) => *v >= min && *v <= max,
                None => false,
            },
            (Value::Double(_), ColumnType::Double) => true,
            (Value::Timestamp(_), ColumnType::Timestamp) => true,
            (Value::Varchar(s), ColumnType::Varchar(max_len)) => s.len() <= max_len as usize,
            (Value::Varbinary(b), ColumnType::Varbinary(max_len)) => b.len() <= max_len as usize,
            _ => false,
        }
    }

    // Cross-variant ordering rank; NULL sorts first.
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Double(_) => 3,
            Value::Timestamp(_) => 4,
            Value::Varchar(_) => 5,
            Value::Varbinary(_) => 6,
        }
    }
}

// -0.0 and 0.0 are the same key.
fn zero_folded(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => zero_folded(*a).total_cmp(&zero_folded(*b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Varchar(a), Value::Varchar(b)) => a.cmp(b),
            (Value::Varbinary(a), Value::Varbinary(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) | Value::Timestamp(v) => v.hash(state),
            Value::Double(v) => zero_folded(*v).to_bits().hash(state),
            Value::Varchar(v) => v.hash(state),
            Value::Varbinary(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "ts:{}", v),
            Value::Varchar(v) => write!(f, "'{}'", v),
            Value::Varbinary(v) => write!(f, "x'{}'", v.iter().map(|b| format!("{:02x}", b)).collect::<String>()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Varchar(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Varchar(v)
    }
}

/// A row: one value per schema column, in column order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Extract the values of `columns`, in the given order.
    ///
    /// Out of range columns project to NULL; callers validate column
    /// ordinals against the schema before projecting.
    pub fn project(&self, columns: &[usize]) -> Vec<Value> {
        columns
            .iter()
            .map(|&c| self.values.get(c).cloned().unwrap_or(Value::Null))
            .collect()
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Tuple::new(values)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vals: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "({})", vals.join(", "))
    }
}

/// Build a [`Tuple`] from a list of expressions convertible into [`Value`].
#[macro_export]
macro_rules! tuple {
    ($($v:expr),* $(,)?) => {
        $crate::tuple::Tuple::new(vec![$($crate::tuple::Value::from($v)),*])
    };
}
