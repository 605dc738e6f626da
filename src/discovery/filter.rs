//! Filter predicate evaluation.
//!
//! # Responsibilities
//! - Match records against an AND-combined filter list
//! - Dispatch filter keys to field accessors or label lookups
//!
//! # Design Decisions
//! - Patterns are compiled once per query, not once per record; filtering a
//!   large snapshot stays O(records × filters) in comparison cost
//! - Full-match semantics: patterns are anchored on both ends
//! - Unrecognized keys match nothing, silently (absent labels likewise)

use std::borrow::Cow;

use regex::Regex;

use crate::discovery::types::{Filter, QueryError, Resource};

/// Accessor rendering one literal record field as a string.
type FieldAccessor = for<'a> fn(&'a Resource) -> Cow<'a, str>;

fn name_field(resource: &Resource) -> Cow<'_, str> {
    Cow::Borrowed(&resource.name)
}

fn ip_field(resource: &Resource) -> Cow<'_, str> {
    Cow::Borrowed(&resource.ip)
}

fn port_field(resource: &Resource) -> Cow<'_, str> {
    Cow::Owned(resource.port.to_string())
}

/// Literal field → accessor table. Extending the evaluator means adding a
/// row here; the caching engine is never involved.
const FIELD_ACCESSORS: &[(&str, FieldAccessor)] = &[
    ("name", name_field),
    ("ip", ip_field),
    ("port", port_field),
];

/// Prefix selecting a label value, as in `labels.cluster`.
const LABEL_KEY_PREFIX: &str = "labels.";

#[derive(Debug)]
enum FilterTarget {
    Field(FieldAccessor),
    Label(String),
    /// Key is neither a literal field nor label-prefixed; matches nothing.
    Unrecognized,
}

#[derive(Debug)]
struct CompiledFilter {
    target: FilterTarget,
    pattern: Regex,
}

impl CompiledFilter {
    fn matches(&self, resource: &Resource) -> bool {
        match &self.target {
            FilterTarget::Field(accessor) => self.pattern.is_match(&accessor(resource)),
            FilterTarget::Label(name) => resource
                .labels
                .get(name)
                .is_some_and(|value| self.pattern.is_match(value)),
            FilterTarget::Unrecognized => false,
        }
    }
}

/// A filter list compiled once per query.
#[derive(Debug)]
pub struct CompiledFilters(Vec<CompiledFilter>);

impl CompiledFilters {
    /// Compile every filter's pattern. A malformed pattern fails the whole
    /// query, identified by the offending filter's key.
    pub fn compile(filters: &[Filter]) -> Result<Self, QueryError> {
        let mut compiled = Vec::with_capacity(filters.len());
        for filter in filters {
            let pattern =
                Regex::new(&format!("^(?:{})$", filter.value)).map_err(|source| {
                    QueryError::InvalidFilter {
                        key: filter.key.clone(),
                        source,
                    }
                })?;

            let target = match FIELD_ACCESSORS.iter().find(|&&(key, _)| key == filter.key) {
                Some(&(_, accessor)) => FilterTarget::Field(accessor),
                None => match filter.key.strip_prefix(LABEL_KEY_PREFIX) {
                    Some(label) => FilterTarget::Label(label.to_string()),
                    None => FilterTarget::Unrecognized,
                },
            };
            compiled.push(CompiledFilter { target, pattern });
        }
        Ok(Self(compiled))
    }

    /// A record matches iff every filter matches. An empty list matches
    /// everything.
    pub fn matches(&self, resource: &Resource) -> bool {
        self.0.iter().all(|filter| filter.matches(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, ip: &str, port: u16, labels: &[(&str, &str)]) -> Resource {
        Resource {
            name: name.to_string(),
            ip: ip.to_string(),
            port,
            labels: labels
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn filter(key: &str, value: &str) -> Filter {
        Filter {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_empty_filter_list_matches_everything() {
        let filters = CompiledFilters::compile(&[]).unwrap();
        assert!(filters.matches(&resource("host-1", "10.1.1.1", 80, &[])));
    }

    #[test]
    fn test_name_filter_is_fully_anchored() {
        let target = resource("host-10", "10.1.1.1", 80, &[]);

        let filters = CompiledFilters::compile(&[filter("name", "host-1")]).unwrap();
        assert!(!filters.matches(&target));

        let filters = CompiledFilters::compile(&[filter("name", "host-1.*")]).unwrap();
        assert!(filters.matches(&target));
    }

    #[test]
    fn test_port_is_matched_as_rendered_string() {
        let target = resource("host-1", "10.1.1.1", 8080, &[]);

        let filters = CompiledFilters::compile(&[filter("port", "8080")]).unwrap();
        assert!(filters.matches(&target));

        let filters = CompiledFilters::compile(&[filter("port", "80")]).unwrap();
        assert!(!filters.matches(&target));

        let filters = CompiledFilters::compile(&[filter("port", "80.*")]).unwrap();
        assert!(filters.matches(&target));
    }

    #[test]
    fn test_label_filter_requires_key_presence() {
        let labeled = resource("host-1", "10.1.1.1", 80, &[("cluster", "xx")]);
        let unlabeled = resource("host-2", "10.1.1.2", 80, &[("zone", "xx")]);

        let filters = CompiledFilters::compile(&[filter("labels.cluster", "xx")]).unwrap();
        assert!(filters.matches(&labeled));
        assert!(!filters.matches(&unlabeled));

        // Anchored: a prefix of the label value is not a match.
        let filters = CompiledFilters::compile(&[filter("labels.cluster", "x")]).unwrap();
        assert!(!filters.matches(&labeled));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let target = resource("host-1", "10.1.1.1", 80, &[("cluster", "xx")]);

        let filters = CompiledFilters::compile(&[
            filter("name", "host-.*"),
            filter("labels.cluster", "xx"),
        ])
        .unwrap();
        assert!(filters.matches(&target));

        let filters = CompiledFilters::compile(&[
            filter("name", "host-.*"),
            filter("labels.cluster", "yy"),
        ])
        .unwrap();
        assert!(!filters.matches(&target));
    }

    #[test]
    fn test_unrecognized_key_matches_nothing() {
        let target = resource("host-1", "10.1.1.1", 80, &[]);
        let filters = CompiledFilters::compile(&[filter("hostname", ".*")]).unwrap();
        assert!(!filters.matches(&target));
    }

    #[test]
    fn test_malformed_pattern_is_rejected() {
        let err = CompiledFilters::compile(&[filter("name", "host-[")]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter { key, .. } if key == "name"));
    }
}
