//! Namespace registration.
//!
//! A scope is a plain object; every dotted path segment but the last names a
//! nested container, created on demand. The last segment is bound to the
//! registered value.

use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use crate::ds::object::{ObjectRef, PlainObject};
use crate::ds::value::Value;
use crate::runner::realm::Realm;

#[derive(Parser)]
#[grammar = "runner/namespace.pest"] // relative to src
struct NamespaceParser;

/// A parsed dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespacePath {
    /// Intermediate container names, empty segments removed.
    pub containers: Vec<String>,
    /// Name the value is bound under.
    pub name: String,
}

impl NamespacePath {
    pub fn parse(path: &str) -> Self {
        let mut segments: Vec<String> = match NamespaceParser::parse(Rule::path, path) {
            Ok(pairs) => pairs
                .flat_map(|pair| pair.into_inner())
                .filter(|pair| pair.as_rule() == Rule::segment)
                .map(|pair| pair.as_str().to_string())
                .collect(),
            Err(_) => vec![path.to_string()],
        };
        let name = segments.pop().unwrap_or_default();
        NamespacePath {
            containers: segments.into_iter().filter(|s| !s.is_empty()).collect(),
            name,
        }
    }
}

impl Realm {
    /// Bind `value` under `path` in `scope` (the global scope when `None`).
    /// Never fails; rebinding a path overwrites it.
    pub fn register(&self, path: &str, value: Value, scope: Option<&ObjectRef>) {
        let parsed = NamespacePath::parse(path);
        let mut container = scope.unwrap_or_else(|| self.global_scope()).clone();
        for segment in &parsed.containers {
            container = self.child_container(&container, segment);
        }
        container.borrow_mut().insert(parsed.name, value);
        debug!(path, "registered namespace binding");
    }

    /// Look up a registered value without creating containers.
    pub fn resolve_path(&self, path: &str, scope: Option<&ObjectRef>) -> Option<Value> {
        let parsed = NamespacePath::parse(path);
        let mut container = scope.unwrap_or_else(|| self.global_scope()).clone();
        for segment in &parsed.containers {
            let next = container.borrow().get(segment).cloned();
            container = match next {
                Some(Value::Object(object)) => object,
                Some(Value::Class(class)) => self.members_of(class).ok()?,
                _ => return None,
            };
        }
        let value = container.borrow().get(&parsed.name).cloned();
        value
    }

    fn child_container(&self, parent: &ObjectRef, segment: &str) -> ObjectRef {
        let existing = parent.borrow().get(segment).cloned();
        match existing {
            Some(Value::Object(object)) => object,
            Some(Value::Class(class)) if self.contains(class) => match self.members_of(class) {
                Ok(members) => members,
                Err(_) => self.replace_with_container(parent, segment),
            },
            _ => self.replace_with_container(parent, segment),
        }
    }

    fn replace_with_container(&self, parent: &ObjectRef, segment: &str) -> ObjectRef {
        let created = PlainObject::new_ref();
        parent
            .borrow_mut()
            .insert(segment, Value::Object(created.clone()));
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pest::{consumes_to, parses_to};

    #[test]
    fn test_grammar_splits_on_dots() {
        parses_to! {
            parser: NamespaceParser,
            input: "a.b",
            rule: Rule::path,
            tokens: [
                path(0, 3, [
                    segment(0, 1),
                    segment(2, 3),
                    EOI(3, 3)
                ])
            ]
        };
    }

    #[test]
    fn test_parse_nested_path() {
        let parsed = NamespacePath::parse("myapp.module.MyClass");
        assert_eq!(parsed.containers, vec!["myapp".to_string(), "module".to_string()]);
        assert_eq!(parsed.name, "MyClass");
    }

    #[test]
    fn test_parse_single_segment() {
        let parsed = NamespacePath::parse("MyClass");
        assert!(parsed.containers.is_empty());
        assert_eq!(parsed.name, "MyClass");
    }

    #[test]
    fn test_parse_skips_empty_container_segments() {
        let parsed = NamespacePath::parse(".a..b.C");
        assert_eq!(parsed.containers, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(parsed.name, "C");
    }

    #[test]
    fn test_non_container_intermediate_is_replaced() {
        let realm = Realm::new();
        let scope = PlainObject::new_ref();
        scope.borrow_mut().insert("a", Value::from(5));
        realm.register("a.B", Value::from("bound"), Some(&scope));
        assert_eq!(realm.resolve_path("a.B", Some(&scope)), Some(Value::from("bound")));
    }
}
