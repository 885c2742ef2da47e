//! # Field Validation
//!
//! A small rule registry plus a visitor. Types opt in by implementing
//! [`Validate`] and naming, per field, the rule it must satisfy; nested
//! structures are visited through [`Validator::nested`], which prefixes
//! field names with the parent's (`address.city`).
//!
//! # Standard Rules
//!
//! | Rule       | Passes when                                         |
//! |------------|-----------------------------------------------------|
//! | `required` | the value is not empty                              |
//! | `word`     | the value is one or more ASCII word characters      |
//! | `email`    | `word@word` optionally followed by `.word` parts    |
//!
//! # Unknown Rules
//!
//! A field naming a rule that is not registered fails with
//! [`ValidationError::UnknownRule`]; it never passes silently. To accept a
//! field unconditionally, register a rule that always passes:
//!
//! ```rust
//! # use chute_std::validate::Rules;
//! let mut rules = Rules::new();
//! rules.register("any", |_| true);
//! assert_eq!(rules.check("any", ""), Some(true));
//! assert_eq!(rules.check("anything", ""), None);
//! ```
//!
//! # Example
//!
//! ```rust
//! use chute_std::validate::{Rules, Validate, ValidationError, Validator};
//!
//! struct Signup {
//!     name: String,
//!     email: String,
//! }
//!
//! impl Validate for Signup {
//!     fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
//!         v.field("name", &self.name, "word")?
//!             .field("email", &self.email, "email")?;
//!         Ok(())
//!     }
//! }
//!
//! let rules = Rules::standard().unwrap();
//! let ok = Signup { name: "ada".into(), email: "ada@example.com".into() };
//! assert!(rules.validate(&ok).is_ok());
//!
//! let bad = Signup { name: "ada".into(), email: "ada.example.com".into() };
//! let err = rules.validate(&bad).unwrap_err();
//! assert_eq!(err.field(), "email");
//! ```

use regex::Regex;
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error;

const WORD: &str = r"^[0-9A-Za-z_]+$";
const EMAIL: &str = r"^[0-9A-Za-z_]+@[0-9A-Za-z_]+(\.[0-9A-Za-z_]+)*$";

type RuleFn = dyn Fn(&str) -> bool + Send + Sync;

/// A field failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value does not satisfy the rule.
    #[error("field `{field}` does not satisfy rule `{rule}`")]
    Failed {
        /// Dotted path of the field.
        field: String,
        /// The rule that rejected it.
        rule: String,
    },
    /// The rule name is not registered.
    #[error("field `{field}` uses unknown rule `{rule}`")]
    UnknownRule {
        /// Dotted path of the field.
        field: String,
        /// The unregistered rule name.
        rule: String,
    },
}

impl ValidationError {
    /// Dotted path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Failed { field, .. } | ValidationError::UnknownRule { field, .. } => {
                field
            }
        }
    }

    /// Name of the rule involved.
    pub fn rule(&self) -> &str {
        match self {
            ValidationError::Failed { rule, .. } | ValidationError::UnknownRule { rule, .. } => rule,
        }
    }
}

/// Registry mapping rule names to predicates.
#[derive(Clone, Default)]
pub struct Rules {
    rules: HashMap<String, Arc<RuleFn>>,
}

impl Rules {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `required`, `word` and `email`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a built-in pattern fails to compile, which only
    /// happens if the `regex` crate rejects it.
    pub fn standard() -> Result<Self, regex::Error> {
        let mut rules = Self::new();
        rules
            .register("required", |value| !value.is_empty())
            .register_pattern("word", WORD)?
            .register_pattern("email", EMAIL)?;
        Ok(rules)
    }

    /// Register (or replace) a rule backed by a predicate.
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    /// Register (or replace) a rule that passes when `pattern` matches.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the pattern is invalid.
    pub fn register_pattern(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<&mut Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(self.register(name, move |value| regex.is_match(value)))
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Evaluate rule `name` against `value`; `None` if it is not registered.
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        self.rules.get(name).map(|rule| rule(value))
    }

    /// Validate `value`, stopping at the first failing field.
    pub fn validate<V: Validate + ?Sized>(&self, value: &V) -> Result<(), ValidationError> {
        value.validate(&mut Validator::new(self))
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("Rules").field("rules", &names).finish()
    }
}

/// Implemented by types that can be validated field by field.
pub trait Validate {
    /// Visit every field that carries a rule.
    fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError>;
}

impl<V: Validate + ?Sized> Validate for &V {
    fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
        (**self).validate(v)
    }
}

impl<V: Validate> Validate for Option<V> {
    fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
        match self {
            Some(inner) => inner.validate(v),
            None => Ok(()),
        }
    }
}

/// Visitor handed to [`Validate::validate`].
#[derive(Debug)]
pub struct Validator<'r> {
    rules: &'r Rules,
    prefix: String,
}

impl<'r> Validator<'r> {
    /// A visitor checking against `rules`.
    pub fn new(rules: &'r Rules) -> Self {
        Self {
            rules,
            prefix: String::new(),
        }
    }

    /// Check `value` against `rule`.
    pub fn field(&mut self, name: &str, value: &str, rule: &str) -> Result<&mut Self, ValidationError> {
        match self.rules.check(rule, value) {
            Some(true) => Ok(self),
            Some(false) => Err(ValidationError::Failed {
                field: self.path(name),
                rule: rule.to_owned(),
            }),
            None => Err(ValidationError::UnknownRule {
                field: self.path(name),
                rule: rule.to_owned(),
            }),
        }
    }

    /// Visit a nested structure, prefixing its field names with `name`.
    pub fn nested<V: Validate + ?Sized>(
        &mut self,
        name: &str,
        value: &V,
    ) -> Result<&mut Self, ValidationError> {
        let saved = self.prefix.len();
        if !self.prefix.is_empty() {
            self.prefix.push('.');
        }
        self.prefix.push_str(name);
        let result = value.validate(self);
        self.prefix.truncate(saved);
        result.map(|()| self)
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", self.prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Address {
        city: String,
        zip: String,
    }

    impl Validate for Address {
        fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
            v.field("city", &self.city, "required")?
                .field("zip", &self.zip, "digits")?;
            Ok(())
        }
    }

    struct User {
        name: String,
        email: String,
        address: Address,
        backup: Option<Address>,
    }

    impl Validate for User {
        fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
            v.field("name", &self.name, "word")?
                .field("email", &self.email, "email")?
                .nested("address", &self.address)?
                .nested("backup", &self.backup)?;
            Ok(())
        }
    }

    fn rules() -> Rules {
        let mut rules = Rules::standard().unwrap();
        rules.register("digits", |v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()));
        rules
    }

    fn user() -> User {
        User {
            name: "alice_01".into(),
            email: "alice@mail.example.org".into(),
            address: Address {
                city: "Hefei".into(),
                zip: "230000".into(),
            },
            backup: None,
        }
    }

    #[test]
    fn test_standard_rules() {
        let rules = Rules::standard().unwrap();
        let cases = [
            ("required", "", false),
            ("required", "x", true),
            ("word", "abc_123", true),
            ("word", "abc def", false),
            ("word", "", false),
            ("word", "我", false),
            ("email", "a_1@b", true),
            ("email", "a@b.c.d", true),
            ("email", "a@b.", false),
            ("email", "@b.c", false),
            ("email", "a.b@c", false),
        ];
        for (rule, value, want) in cases {
            assert_eq!(rules.check(rule, value), Some(want), "{rule}({value:?})");
        }
        assert_eq!(rules.check("missing", "x"), None);
    }

    #[test]
    fn test_valid_user() {
        assert_eq!(rules().validate(&user()), Ok(()));
    }

    #[test]
    fn test_first_failure_reported() {
        let mut u = user();
        u.name = "not a word".into();
        u.email = "broken".into();
        assert_eq!(
            rules().validate(&u),
            Err(ValidationError::Failed {
                field: "name".into(),
                rule: "word".into()
            })
        );
    }

    #[test]
    fn test_nested_field_path() {
        let mut u = user();
        u.backup = Some(Address {
            city: String::new(),
            zip: "1".into(),
        });
        let err = rules().validate(&u).unwrap_err();
        assert_eq!(err.field(), "backup.city");
        assert_eq!(err.rule(), "required");

        u.backup = None;
        u.address.zip = "12a".into();
        assert_eq!(rules().validate(&u).unwrap_err().field(), "address.zip");
    }

    #[test]
    fn test_unknown_rule() {
        let err = Rules::standard().unwrap().validate(&user()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownRule {
                field: "address.zip".into(),
                rule: "digits".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "field `address.zip` uses unknown rule `digits`"
        );
    }

    #[test]
    fn test_prefix_restored_after_nested() {
        struct Pair(Address, String);
        impl Validate for Pair {
            fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
                v.nested("inner", &self.0)?.field("tail", &self.1, "required")?;
                Ok(())
            }
        }
        let pair = Pair(
            Address {
                city: "x".into(),
                zip: "1".into(),
            },
            String::new(),
        );
        assert_eq!(rules().validate(&pair).unwrap_err().field(), "tail");
    }
}
