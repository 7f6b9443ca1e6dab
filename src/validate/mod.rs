//! Ordered response validation rules.
//!
//! Rules are applied in the order the caller supplies them; the first
//! failure is returned with its reason. An empty rule list passes
//! trivially, which is distinct from [`default_rules`] (status in
//! `200..300`).

use std::ops::Range;

use crate::error::ValidationError;
use crate::http::RawResponse;

/// A predicate gating whether a raw response counts as successful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Status code must fall in the half-open range.
    StatusCode(Range<u16>),
    /// `Content-Type` essence must match one of the accepted types.
    /// Parameters (`; charset=...`) are ignored; `*/*` and `type/*`
    /// wildcards are supported.
    ContentType(Vec<String>),
}

impl ValidationRule {
    /// Accept statuses within `range`.
    #[must_use]
    pub fn status(range: Range<u16>) -> Self {
        ValidationRule::StatusCode(range)
    }

    /// Accept the given content types.
    pub fn content_type<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationRule::ContentType(accepted.into_iter().map(Into::into).collect())
    }

    fn check(&self, response: &RawResponse) -> Result<(), ValidationError> {
        match self {
            ValidationRule::StatusCode(range) => {
                let got = response.status().as_u16();
                if range.contains(&got) {
                    Ok(())
                } else {
                    Err(ValidationError::UnacceptableStatusCode {
                        got,
                        expected: range.clone(),
                    })
                }
            }
            ValidationRule::ContentType(accepted) => {
                let got = response.content_type().map(essence);
                match got {
                    Some(ct) if accepted.iter().any(|a| type_matches(a, ct)) => Ok(()),
                    _ => Err(ValidationError::UnacceptableContentType {
                        got: got.map(str::to_owned),
                        expected: accepted.clone(),
                    }),
                }
            }
        }
    }
}

/// The standard validation: status in `200..300`.
#[must_use]
pub fn default_rules() -> Vec<ValidationRule> {
    vec![ValidationRule::StatusCode(200..300)]
}

/// Apply `rules` to `response` in order, returning the first failure.
pub fn validate(response: &RawResponse, rules: &[ValidationRule]) -> Result<(), ValidationError> {
    for rule in rules {
        rule.check(response)?;
    }
    Ok(())
}

/// Strip content-type parameters, leaving `type/subtype`.
fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

fn type_matches(accepted: &str, got: &str) -> bool {
    if accepted == "*/*" {
        return true;
    }
    if let Some(prefix) = accepted.strip_suffix("/*") {
        return got
            .split('/')
            .next()
            .is_some_and(|t| t.eq_ignore_ascii_case(prefix));
    }
    accepted.eq_ignore_ascii_case(got)
}
