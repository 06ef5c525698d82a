use crate::{Value, separated_by};
use std::fmt::{self, Display, Formatter};

/// Comparison applied by a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=?`
    Equal,
    /// `like ?`
    Like,
    /// `is null`
    IsNull,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=?",
            Operator::Like => "like ?",
            Operator::IsNull => "is null",
        }
    }

    /// Whether the operator consumes one bound parameter.
    pub fn binds(&self) -> bool {
        !matches!(self, Operator::IsNull)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One condition of a [`Criteria`].
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column name or expression, rendered verbatim.
    pub name: String,
    pub operator: Operator,
    /// Bound value, always `None` for [`Operator::IsNull`].
    pub value: Option<Value>,
}

/// Ordered list of predicates, rendered as a conjunction.
///
/// ```rust
/// use quill_core::Criteria;
/// let criteria = Criteria::new().like("name", "a").is_null("sex");
/// assert_eq!(criteria.to_string(), "name like ? and sex is null");
/// assert_eq!(criteria.params().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    predicates: Vec<Predicate>,
}

impl Criteria {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn equal(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate {
            name: name.into(),
            operator: Operator::Equal,
            value: Some(value.into()),
        });
        self
    }

    /// Substring match, the value is bound as `%value%`.
    pub fn like(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        self.predicates.push(Predicate {
            name: name.into(),
            operator: Operator::Like,
            value: Some(Value::Varchar(Some(format!("%{value}%")))),
        });
        self
    }

    pub fn is_null(mut self, name: impl Into<String>) -> Self {
        self.predicates.push(Predicate {
            name: name.into(),
            operator: Operator::IsNull,
            value: None,
        });
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Bound parameters in rendering order.
    pub fn params(&self) -> Vec<Value> {
        self.predicates
            .iter()
            .filter_map(|v| v.value.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}

impl Display for Criteria {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        separated_by(
            &mut out,
            &self.predicates,
            |out, v| {
                out.push_str(&v.name);
                out.push(' ');
                out.push_str(v.operator.as_str());
            },
            " and ",
        );
        f.write_str(&out)
    }
}
