//! Boolean tests over a record, used by [`Filter`](super::Filter).
//!
//! Predicates are plain shared closures; the combinators here build new ones
//! from existing ones. [`PredicateSpec`] is the declarative form used by
//! configuration documents.

use super::{Metadata, Payload};
use crate::Error;
use crate::level::LogLevel;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

pub type Predicate =
    Arc<dyn Fn(Option<&Payload>, Option<&Payload>, &Metadata) -> bool + Send + Sync>;

/// Wraps a closure as a [`Predicate`].
pub fn predicate<F>(f: F) -> Predicate
where
    F: Fn(Option<&Payload>, Option<&Payload>, &Metadata) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Tests only the metadata record.
pub fn on_meta<F>(f: F) -> Predicate
where
    F: Fn(&Metadata) -> bool + Send + Sync + 'static,
{
    predicate(move |_, _, m| f(m))
}

fn non_empty(op: &'static str, predicates: Vec<Predicate>) -> Result<Vec<Predicate>, Error> {
    if predicates.is_empty() {
        Err(Error::EmptyPredicates(op))
    } else {
        Ok(predicates)
    }
}

/// True iff every predicate is true.
///
/// # Errors
/// [`Error::EmptyPredicates`] when `predicates` is empty.
pub fn all(predicates: Vec<Predicate>) -> Result<Predicate, Error> {
    let predicates = non_empty("all", predicates)?;
    Ok(predicate(move |p, r, m| predicates.iter().all(|pred| pred(p, r, m))))
}

/// True iff at least one predicate is true.
///
/// # Errors
/// [`Error::EmptyPredicates`] when `predicates` is empty.
pub fn some(predicates: Vec<Predicate>) -> Result<Predicate, Error> {
    let predicates = non_empty("some", predicates)?;
    Ok(predicate(move |p, r, m| predicates.iter().any(|pred| pred(p, r, m))))
}

/// True iff no predicate is true.
///
/// # Errors
/// [`Error::EmptyPredicates`] when `predicates` is empty.
pub fn none(predicates: Vec<Predicate>) -> Result<Predicate, Error> {
    let predicates = non_empty("none", predicates)?;
    Ok(predicate(move |p, r, m| !predicates.iter().any(|pred| pred(p, r, m))))
}

#[must_use]
pub fn not(inner: Predicate) -> Predicate {
    predicate(move |p, r, m| !inner(p, r, m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    #[must_use]
    pub const fn test(self, a: i32, b: i32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Gt => a > b,
            Self::Ge => a >= b,
            Self::Lt => a < b,
            Self::Le => a <= b,
        }
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "gt" => Ok(Self::Gt),
            "ge" => Ok(Self::Ge),
            "lt" => Ok(Self::Lt),
            "le" => Ok(Self::Le),
            _ => Err(Error::UnknownComparison(s.to_string())),
        }
    }
}

/// Compares the record's `log_level_id` against `level`'s rank.
#[must_use]
pub fn loglevel(cmp: Comparison, level: &LogLevel) -> Predicate {
    let rank = level.rank();
    on_meta(move |m| cmp.test(m.log_level_id, rank))
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Meta,
    User,
}

/// Builds predicates about one property of the record.
#[derive(Debug, Clone)]
pub struct PropChecker {
    prop: String,
    scope: Scope,
}

/// Checks a top-level metadata field (`logger`, `log_level_id`, ...).
#[must_use]
pub fn meta(prop: impl Into<String>) -> PropChecker {
    PropChecker {
        prop: prop.into(),
        scope: Scope::Meta,
    }
}

/// Checks a field of the user-supplied metadata object.
#[must_use]
pub fn user(prop: impl Into<String>) -> PropChecker {
    PropChecker {
        prop: prop.into(),
        scope: Scope::User,
    }
}

impl PropChecker {
    fn lookup(scope: Scope, prop: &str, m: &Metadata) -> Option<Value> {
        match scope {
            Scope::Meta => m.get(prop),
            Scope::User => m.user(prop).cloned(),
        }
    }

    fn check<F>(&self, f: F) -> Predicate
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        let prop = self.prop.clone();
        let scope = self.scope;
        on_meta(move |m| f(Self::lookup(scope, &prop, m).as_ref()))
    }

    /// Present and strictly equal.
    #[must_use]
    pub fn is(&self, val: impl Into<Value>) -> Predicate {
        let val = val.into();
        self.check(move |v| v == Some(&val))
    }

    #[must_use]
    pub fn is_not(&self, val: impl Into<Value>) -> Predicate {
        let val = val.into();
        self.check(move |v| v != Some(&val))
    }

    /// Loose equality: numbers, numeric strings and booleans compare by value,
    /// and an absent field equals `null`.
    #[must_use]
    pub fn loosely_eq(&self, val: impl Into<Value>) -> Predicate {
        let val = val.into();
        self.check(move |v| loose_eq(v, &val))
    }

    #[must_use]
    pub fn loosely_ne(&self, val: impl Into<Value>) -> Predicate {
        let val = val.into();
        self.check(move |v| !loose_eq(v, &val))
    }

    #[must_use]
    pub fn is_null(&self) -> Predicate {
        self.check(|v| matches!(v, Some(Value::Null)))
    }

    #[must_use]
    pub fn is_undefined(&self) -> Predicate {
        self.check(|v| v.is_none())
    }

    #[must_use]
    pub fn is_defined(&self) -> Predicate {
        self.check(|v| v.is_some())
    }
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

static NULL: Value = Value::Null;

fn loose_eq(a: Option<&Value>, b: &Value) -> bool {
    let a = a.unwrap_or(&NULL);
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => a == b,
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => false,
        },
    }
}

/// Level reference inside a declarative predicate: a built-in name or a rank.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LevelRef {
    Rank(i32),
    Name(String),
}

impl LevelRef {
    fn resolve(&self) -> Result<LogLevel, Error> {
        match self {
            Self::Rank(rank) => Ok(LogLevel::new(rank.to_string(), *rank)),
            Self::Name(name) => name
                .parse()
                .map_err(|_| Error::InvalidLevel(name.clone())),
        }
    }
}

/// One property test; exactly one of the check fields must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropSpec {
    pub prop: String,
    pub is: Option<Value>,
    pub isnt: Option<Value>,
    pub eq: Option<Value>,
    pub ne: Option<Value>,
    pub null: bool,
    pub undef: bool,
    pub def: bool,
}

impl PropSpec {
    fn compile(&self, checker: &PropChecker) -> Result<Predicate, Error> {
        if let Some(v) = &self.is {
            Ok(checker.is(v.clone()))
        } else if let Some(v) = &self.isnt {
            Ok(checker.is_not(v.clone()))
        } else if let Some(v) = &self.eq {
            Ok(checker.loosely_eq(v.clone()))
        } else if let Some(v) = &self.ne {
            Ok(checker.loosely_ne(v.clone()))
        } else if self.null {
            Ok(checker.is_null())
        } else if self.undef {
            Ok(checker.is_undefined())
        } else if self.def {
            Ok(checker.is_defined())
        } else {
            Err(Error::InvalidOptions {
                path: "predicate".to_string(),
                reason: format!("no check given for property \"{}\"", self.prop),
            })
        }
    }
}

/// Declarative predicate, e.g. `{"loglevel": {"cmp": "ge", "level": "WARN"}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateSpec {
    All(Vec<PredicateSpec>),
    #[serde(rename = "some")]
    AnyOf(Vec<PredicateSpec>),
    #[serde(rename = "none")]
    NoneOf(Vec<PredicateSpec>),
    Not(Box<PredicateSpec>),
    Loglevel { cmp: String, level: LevelRef },
    Meta(PropSpec),
    User(PropSpec),
}

impl PredicateSpec {
    /// # Errors
    /// Unknown comparisons or levels, empty combinators, property specs
    /// without a check.
    pub fn compile(&self) -> Result<Predicate, Error> {
        let compile_all = |specs: &[Self]| specs.iter().map(Self::compile).collect::<Result<Vec<_>, _>>();
        match self {
            Self::All(specs) => all(compile_all(specs)?),
            Self::AnyOf(specs) => some(compile_all(specs)?),
            Self::NoneOf(specs) => none(compile_all(specs)?),
            Self::Not(spec) => Ok(not(spec.compile()?)),
            Self::Loglevel { cmp, level } => Ok(loglevel(cmp.parse()?, &level.resolve()?)),
            Self::Meta(spec) => spec.compile(&meta(spec.prop.clone())),
            Self::User(spec) => spec.compile(&user(spec.prop.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(level: &LogLevel) -> Metadata {
        Metadata::new("t", level)
    }

    #[test]
    fn loose_equality_crosses_number_and_string() {
        assert!(loose_eq(Some(&Value::from(30)), &Value::from("30")));
        assert!(loose_eq(None, &Value::Null));
        assert!(!loose_eq(Some(&Value::from("a")), &Value::from(1)));
    }

    #[test]
    fn spec_compiles_nested_combinators() {
        let spec: PredicateSpec = serde_json::from_value(serde_json::json!({
            "all": [
                { "loglevel": { "cmp": "ge", "level": "WARN" } },
                { "not": { "meta": { "prop": "logger", "is": "noisy" } } }
            ]
        }))
        .unwrap();
        let pred = spec.compile().unwrap();
        assert!(pred(None, None, &at(&LogLevel::ERROR)));
        assert!(!pred(None, None, &at(&LogLevel::INFO)));
    }

    #[test]
    fn spec_rejects_empty_combinator() {
        let spec: PredicateSpec = serde_json::from_value(serde_json::json!({ "some": [] })).unwrap();
        assert!(matches!(spec.compile(), Err(Error::EmptyPredicates("some"))));
    }

    #[test]
    fn spec_accepts_numeric_level() {
        let spec: PredicateSpec =
            serde_json::from_value(serde_json::json!({ "loglevel": { "cmp": "lt", "level": 20 } }))
                .unwrap();
        let pred = spec.compile().unwrap();
        assert!(pred(None, None, &at(&LogLevel::DEBUG)));
        assert!(!pred(None, None, &at(&LogLevel::INFO)));
    }
}
