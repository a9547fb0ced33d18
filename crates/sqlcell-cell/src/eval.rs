//! In-memory evaluation of cell constraints.
//!
//! [`ValueCell::accepts`] answers "would a row holding this value satisfy
//! the rendered predicate?" without a database round trip. Evaluation
//! follows SQL three-valued logic: a comparison against NULL is unknown,
//! unknown rows are filtered out, and negating unknown is still unknown.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use regex::Regex;
use sqlcell_core::{Error, Literal, Result, Value};

use crate::cell::ValueCell;
use crate::operator::{CellId, Operator};

/// Number of compiled templates kept before the cache starts over.
const LIKE_CACHE_CAPACITY: usize = 256;

/// Compiled `LIKE` templates, keyed by template text.
///
/// Templates come from application data, so the map is flushed once it
/// reaches `capacity` entries.
struct LikeCache {
    cache: RwLock<HashMap<String, Regex>>,
    capacity: usize,
}

impl LikeCache {
    fn new(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    fn get_or_compile(&self, template: &str) -> Result<Regex> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(regex) = cache.get(template) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(&like_to_regex(template)?).map_err(|e| Error::InvalidPattern {
            pattern: template.to_string(),
            message: e.to_string(),
        })?;
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= self.capacity {
            tracing::debug!(entries = cache.len(), "Flushing LIKE template cache");
            cache.clear();
        }
        cache.insert(template.to_string(), regex.clone());
        Ok(regex)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn like_cache() -> &'static LikeCache {
    static CACHE: OnceLock<LikeCache> = OnceLock::new();
    CACHE.get_or_init(|| LikeCache::new(LIKE_CACHE_CAPACITY))
}

/// Translate a `LIKE` template into an anchored regex.
///
/// `%` matches any run of characters, `_` exactly one, and a backslash
/// makes the next character literal.
fn like_to_regex(template: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 8);
    out.push_str("(?s)^");
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4]))),
                None => {
                    return Err(Error::InvalidPattern {
                        pattern: template.to_string(),
                        message: "pattern must not end with the escape character".to_string(),
                    });
                }
            },
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    Ok(out)
}

/// Whether `text` matches the `LIKE` template.
pub fn like_matches(text: &str, template: &str) -> Result<bool> {
    Ok(like_cache().get_or_compile(template)?.is_match(text))
}

impl<T: Literal> ValueCell<T> {
    /// Evaluate the cell's constraint against a candidate column value.
    ///
    /// `None` stands for SQL NULL. A cell without an operator accepts
    /// everything.
    pub fn accepts(&self, candidate: Option<&T>) -> Result<bool> {
        let Some(op) = self.operator() else {
            return Ok(true);
        };
        let verdict = self.evaluate(op, candidate)?;
        Ok(match verdict {
            Some(truth) => truth != op.is_negated(),
            None => false,
        })
    }

    /// Filter `candidates` down to the accepted ones.
    pub fn filter<'a, I>(&self, candidates: I) -> Result<Vec<Option<&'a T>>>
    where
        I: IntoIterator<Item = Option<&'a T>>,
    {
        let mut accepted = Vec::new();
        for candidate in candidates {
            if self.accepts(candidate)? {
                accepted.push(candidate);
            }
        }
        Ok(accepted)
    }

    /// Evaluate a dynamically typed candidate, converting it first.
    pub fn accepts_value(&self, candidate: &Value) -> Result<bool> {
        if candidate.is_null() {
            return self.accepts(None);
        }
        let typed = T::from_value(candidate)?;
        self.accepts(Some(&typed))
    }

    fn bound(&self, id: CellId) -> Option<&T> {
        self.node(id).value()
    }

    /// Un-negated verdict; `None` is SQL unknown.
    fn evaluate(&self, op: &Operator, candidate: Option<&T>) -> Result<Option<bool>> {
        let null_test = match op {
            Operator::IsNull { .. } => true,
            Operator::Equals { bound, .. } => self.bound(*bound).is_none(),
            _ => false,
        };
        if null_test {
            return Ok(Some(candidate.is_none()));
        }
        let Some(candidate) = candidate else {
            return Ok(None);
        };

        Ok(match op {
            Operator::IsNull { .. } => Some(false),
            Operator::Equals { bound, .. } => Some(self.bound(*bound) == Some(candidate)),
            Operator::Range {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
                ..
            } => {
                let lower_ok = match lower.and_then(|id| self.bound(id)) {
                    None => Some(true),
                    Some(lo) => candidate.partial_cmp(lo).map(|ord| {
                        ord == Ordering::Greater || (*lower_inclusive && ord == Ordering::Equal)
                    }),
                };
                let upper_ok = match upper.and_then(|id| self.bound(id)) {
                    None => Some(true),
                    Some(hi) => candidate.partial_cmp(hi).map(|ord| {
                        ord == Ordering::Less || (*upper_inclusive && ord == Ordering::Equal)
                    }),
                };
                match (lower_ok, upper_ok) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }
            Operator::PermittedSet { members, .. } => Some(
                members
                    .iter()
                    .filter_map(|id| self.bound(*id))
                    .any(|m| m == candidate),
            ),
            Operator::Pattern { template, .. } => {
                if !T::SQL_TYPE.is_textual() {
                    return Err(Error::UnsupportedPredicate {
                        operator: "pattern",
                        sql_type: T::SQL_TYPE,
                        column: None,
                    });
                }
                match self.bound(*template) {
                    None => Some(false),
                    Some(template) => {
                        let template = template.to_value();
                        let text = candidate.to_value();
                        match (text.as_str(), template.as_str()) {
                            (Some(text), Some(template)) => Some(like_matches(text, template)?),
                            _ => Some(false),
                        }
                    }
                }
            }
        })
    }
}
