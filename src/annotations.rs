//! Annotation storage and scope precedence.
//!
//! The host runner extracts raw string annotations for the current class and
//! method and hands them to the engine as an [`AnnotationSet`]. Lookup
//! precedence for single-valued annotations is method over class; a name
//! absent at both scopes is simply "not configured" and the engine
//! substitutes its built-in default.
//!
//! The multi-valued `retryIfException` annotation is consulted at method
//! scope only; there is no class-level fallback for it. The asymmetry is
//! deliberate.

use std::collections::BTreeMap;

/// Annotation names recognized by the engine.
pub mod names {
    /// Maximum number of extra retry attempts.
    pub const RETRY_ATTEMPTS: &str = "retryAttempts";
    /// Fixed pause between attempts, in whole seconds.
    pub const RETRY_DELAY_SECONDS: &str = "retryDelaySeconds";
    /// Delay delegate: `"<name> <arg>..."`.
    pub const RETRY_DELAY_METHOD: &str = "retryDelayMethod";
    /// Wall-clock retry budget, in whole seconds.
    pub const RETRY_FOR_SECONDS: &str = "retryForSeconds";
    /// Failure-kind allow-list entry (multi-valued, method scope only).
    pub const RETRY_IF_EXCEPTION: &str = "retryIfException";
    /// Eligibility delegate: `"<name> <arg>..."` (method scope only).
    pub const RETRY_IF_METHOD: &str = "retryIfMethod";
}

/// Scope an annotation was attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Declared on the test class.
    Class,
    /// Declared on the test method.
    Method,
}

/// Raw per-class and per-method annotation values for one test.
///
/// Read-only once handed to the engine; values are kept in declaration
/// order per annotation name.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    class: BTreeMap<String, Vec<String>>,
    method: BTreeMap<String, Vec<String>>,
}

impl AnnotationSet {
    /// Empty set: no retry policy configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `name` at `scope`.
    pub fn add(&mut self, scope: Scope, name: impl Into<String>, value: impl Into<String>) {
        self.scope_mut(scope).entry(name.into()).or_default().push(value.into());
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, scope: Scope, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(scope, name, value);
        self
    }

    /// First value for `name`, method scope winning over class scope.
    ///
    /// An annotation present with an empty value list counts as absent at
    /// that scope, so lookup still falls through to the class value.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.first_at(Scope::Method, name).or_else(|| self.first_at(Scope::Class, name))
    }

    /// First value for `name` at exactly `scope`.
    pub fn first_at(&self, scope: Scope, name: &str) -> Option<&str> {
        self.scope_ref(scope).get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// All method-scope values for `name`, or `None` when absent.
    ///
    /// Used for `retryIfException`, which never falls back to class scope.
    pub fn method_values(&self, name: &str) -> Option<&[String]> {
        self.method.get(name).filter(|values| !values.is_empty()).map(Vec::as_slice)
    }

    fn scope_ref(&self, scope: Scope) -> &BTreeMap<String, Vec<String>> {
        match scope {
            Scope::Class => &self.class,
            Scope::Method => &self.method,
        }
    }

    fn scope_mut(&mut self, scope: Scope) -> &mut BTreeMap<String, Vec<String>> {
        match scope {
            Scope::Class => &mut self.class,
            Scope::Method => &mut self.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_overrides_class() {
        let ann = AnnotationSet::new()
            .with(Scope::Class, names::RETRY_ATTEMPTS, "2")
            .with(Scope::Method, names::RETRY_ATTEMPTS, "5");
        assert_eq!(ann.first(names::RETRY_ATTEMPTS), Some("5"));
    }

    #[test]
    fn class_value_used_when_method_absent() {
        let ann = AnnotationSet::new().with(Scope::Class, names::RETRY_ATTEMPTS, "2");
        assert_eq!(ann.first(names::RETRY_ATTEMPTS), Some("2"));
    }

    #[test]
    fn absent_everywhere_is_none() {
        let ann = AnnotationSet::new();
        assert_eq!(ann.first(names::RETRY_ATTEMPTS), None);
    }

    #[test]
    fn empty_method_list_falls_back_to_class() {
        let mut ann = AnnotationSet::new().with(Scope::Class, names::RETRY_DELAY_SECONDS, "1");
        // Simulate a method entry with no values.
        ann.method.insert(names::RETRY_DELAY_SECONDS.to_string(), Vec::new());
        assert_eq!(ann.first(names::RETRY_DELAY_SECONDS), Some("1"));
    }

    #[test]
    fn exception_list_is_method_scope_only() {
        let ann = AnnotationSet::new()
            .with(Scope::Class, names::RETRY_IF_EXCEPTION, "IoError")
            .with(Scope::Method, names::RETRY_IF_EXCEPTION, "TimeoutError")
            .with(Scope::Method, names::RETRY_IF_EXCEPTION, "DnsError");

        let values = ann.method_values(names::RETRY_IF_EXCEPTION).unwrap();
        assert_eq!(values, ["TimeoutError".to_string(), "DnsError".to_string()]);

        let class_only = AnnotationSet::new().with(Scope::Class, names::RETRY_IF_EXCEPTION, "IoError");
        assert!(class_only.method_values(names::RETRY_IF_EXCEPTION).is_none());
    }

    #[test]
    fn values_preserve_declaration_order() {
        let ann = AnnotationSet::new()
            .with(Scope::Method, names::RETRY_IF_EXCEPTION, "A")
            .with(Scope::Method, names::RETRY_IF_EXCEPTION, "B")
            .with(Scope::Method, names::RETRY_IF_EXCEPTION, "C");
        let values = ann.method_values(names::RETRY_IF_EXCEPTION).unwrap();
        assert_eq!(values, ["A".to_string(), "B".to_string(), "C".to_string()]);
    }
}
