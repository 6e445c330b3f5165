//! # Request Shape Validation
//!
//! A declarative, data-driven validation engine applied to inbound JSON
//! bodies before any business logic runs.
//!
//! Each endpoint owns a [`RuleSet`]: an ordered list of rules binding a
//! field name to a failure message, a set of constraints, and a set of
//! sanitizers. One interpreter ([`RuleSet::apply`]) evaluates every rule
//! set uniformly; there is no per-endpoint bespoke validation code.
//!
//! Two properties matter to clients:
//! - **Aggregation**: every violated rule produces an entry; the engine
//!   never short-circuits on the first failure, so a client can correct
//!   all issues in one round trip.
//! - **Sanitization**: values are trimmed/escaped/normalized in place, so
//!   handlers only ever see sanitized input, never the raw payload.
//!
//! Rule sets are constructed once at startup (see [`RuleSets`]) and shared
//! read-only across all requests.

use serde::Serialize;
use serde_json::Value;

/// A single field-level constraint.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Present, non-null, and (for strings) non-empty after trimming
    Required,
    /// Plausible email address shape
    Email,
    /// String of at least this many characters
    MinLength(usize),
    /// Integer within an inclusive range
    IntRange { min: i64, max: i64 },
    /// String drawn from a fixed set
    OneOf(&'static [&'static str]),
    /// JSON array
    Array,
}

/// An in-place transformation applied to a field's value.
#[derive(Debug, Clone)]
pub enum Sanitizer {
    /// Strip leading/trailing whitespace
    Trim,
    /// HTML-escape special characters (applied after validation)
    Escape,
    /// Lowercase and trim, for email addresses
    NormalizeEmail,
}

/// One rule: a field name, the message reported when the rule is violated,
/// and the constraints/sanitizers bound to the field.
///
/// Built with a chainable API mirroring how endpoints declare their
/// expectations:
///
/// ```ignore
/// Rule::new("name", "Name is required").required().trim().escape()
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    field: &'static str,
    message: &'static str,
    constraints: Vec<Constraint>,
    sanitizers: Vec<Sanitizer>,
}

impl Rule {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            message,
            constraints: Vec::new(),
            sanitizers: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::Required);
        self
    }

    pub fn email(mut self) -> Self {
        self.constraints.push(Constraint::Email);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.constraints.push(Constraint::MinLength(min));
        self
    }

    pub fn int_range(mut self, min: i64, max: i64) -> Self {
        self.constraints.push(Constraint::IntRange { min, max });
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.constraints.push(Constraint::OneOf(allowed));
        self
    }

    pub fn array(mut self) -> Self {
        self.constraints.push(Constraint::Array);
        self
    }

    pub fn trim(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Trim);
        self
    }

    pub fn escape(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Escape);
        self
    }

    pub fn normalize_email(mut self) -> Self {
        self.sanitizers.push(Sanitizer::NormalizeEmail);
        self
    }
}

/// A single violated rule, as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

/// An ordered, immutable collection of rules for one endpoint's payload.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule against `body`, sanitizing in place.
    ///
    /// Pre-validation sanitizers (trim, email normalization) run first so
    /// constraints see the cleaned value; escaping runs only after a rule's
    /// constraints all pass. Each violated rule contributes exactly one
    /// entry to the returned list.
    pub fn apply(&self, body: &mut Value) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            if let Some(value) = body.get_mut(rule.field) {
                for sanitizer in &rule.sanitizers {
                    match sanitizer {
                        Sanitizer::Trim => {
                            if let Some(s) = value.as_str() {
                                *value = Value::String(s.trim().to_string());
                            }
                        }
                        Sanitizer::NormalizeEmail => {
                            if let Some(s) = value.as_str() {
                                *value = Value::String(s.trim().to_lowercase());
                            }
                        }
                        Sanitizer::Escape => {}
                    }
                }
            }

            let value = body.get(rule.field);
            let ok = rule.constraints.iter().all(|c| check(value, c));
            if !ok {
                violations.push(Violation {
                    msg: rule.message.to_string(),
                    path: rule.field.to_string(),
                    location: "body",
                });
                continue;
            }

            // Post-validation sanitization: escape markup, and canonicalize
            // integers that arrived as quoted strings so handlers can
            // deserialize into typed structs.
            if let Some(value) = body.get_mut(rule.field) {
                if rule
                    .constraints
                    .iter()
                    .any(|c| matches!(c, Constraint::IntRange { .. }))
                {
                    if let Some(n) = as_integer(value) {
                        *value = Value::from(n);
                    }
                }
                if rule.sanitizers.iter().any(|s| matches!(s, Sanitizer::Escape)) {
                    if let Some(s) = value.as_str() {
                        *value = Value::String(escape_html(s));
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Evaluate one constraint against an (optionally absent) field value.
///
/// An absent or null field fails every constraint, matching the behavior
/// of validator chains in conventional web stacks: a rule only passes on a
/// value that is actually present and well-formed.
fn check(value: Option<&Value>, constraint: &Constraint) -> bool {
    let Some(value) = value else { return false };
    if value.is_null() {
        return false;
    }

    match constraint {
        Constraint::Required => match value {
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        },
        Constraint::Email => value.as_str().is_some_and(is_email),
        Constraint::MinLength(min) => value
            .as_str()
            .is_some_and(|s| s.chars().count() >= *min),
        Constraint::IntRange { min, max } => {
            as_integer(value).is_some_and(|n| n >= *min && n <= *max)
        }
        Constraint::OneOf(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
        Constraint::Array => value.is_array(),
    }
}

/// Accept integers directly or as numeric strings (clients are sloppy
/// about quoting numbers in form-derived payloads).
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// HTML-escape the characters a payload could use to smuggle markup.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// The four endpoint rule sets, built once at startup and stored in
/// `AppState` for read-only sharing across requests.
#[derive(Debug, Clone)]
pub struct RuleSets {
    pub register: RuleSet,
    pub login: RuleSet,
    pub profile: RuleSet,
    pub listing: RuleSet,
}

impl Default for RuleSets {
    fn default() -> Self {
        Self {
            register: RuleSet::new(vec![
                Rule::new("email", "Please include a valid email")
                    .email()
                    .normalize_email(),
                Rule::new("password", "Password must be 6 or more characters").min_length(6),
            ]),
            login: RuleSet::new(vec![
                Rule::new("email", "Please include a valid email")
                    .email()
                    .normalize_email(),
                Rule::new("password", "Password is required").required(),
            ]),
            profile: RuleSet::new(vec![
                Rule::new("name", "Name is required").required().trim().escape(),
                Rule::new("age", "Age must be a number").int_range(18, 100),
                Rule::new("occupation", "Occupation is required")
                    .required()
                    .trim()
                    .escape(),
                Rule::new("status", "A valid status is required").one_of(&[
                    "seeking_roommate",
                    "seeking_place",
                    "seeking_team_up",
                ]),
                Rule::new("bio", "Bio is required").required().trim().escape(),
                Rule::new("likes", "Likes must be an array").array(),
                Rule::new("dislikes", "Dislikes must be an array").array(),
            ]),
            listing: RuleSet::new(vec![
                Rule::new("address", "Address is required").required().trim().escape(),
                Rule::new("city", "City is required").required().trim().escape(),
                Rule::new("price", "Price must be a valid number").int_range(0, i64::MAX),
                Rule::new("bedrooms", "Bedrooms must be a valid number").int_range(0, i64::MAX),
                Rule::new("bathrooms", "Bathrooms must be a valid number").int_range(0, i64::MAX),
                Rule::new("description", "Description is required")
                    .required()
                    .trim()
                    .escape(),
                Rule::new("vibeTags", "Vibe tags must be an array").array(),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_profile_passes() {
        let rules = RuleSets::default();
        let mut body = json!({
            "name": "Alice",
            "age": 28,
            "occupation": "engineer",
            "status": "seeking_place",
            "bio": "quiet, tidy",
            "likes": ["cats"],
            "dislikes": []
        });

        assert!(rules.profile.apply(&mut body).is_ok());
    }

    #[test]
    fn test_all_violations_aggregated() {
        let rules = RuleSets::default();
        // name empty, age out of range, status unknown: exactly 3 entries
        let mut body = json!({
            "name": "  ",
            "age": 12,
            "occupation": "artist",
            "status": "seeking_castle",
            "bio": "hello",
            "likes": [],
            "dislikes": []
        });

        let violations = rules.profile.apply(&mut body).unwrap_err();
        assert_eq!(violations.len(), 3);

        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "age", "status"]);
        assert_eq!(violations[1].msg, "Age must be a number");
    }

    #[test]
    fn test_missing_fields_each_reported() {
        let rules = RuleSets::default();
        let mut body = json!({});

        let violations = rules.profile.apply(&mut body).unwrap_err();
        // every rule in the profile set fails on an empty body
        assert_eq!(violations.len(), 7);
    }

    #[test]
    fn test_sanitizers_trim_and_escape() {
        let rules = RuleSets::default();
        let mut body = json!({
            "name": "  <b>Alice</b>  ",
            "age": 30,
            "occupation": "engineer",
            "status": "seeking_roommate",
            "bio": "likes \"loud\" music",
            "likes": [],
            "dislikes": []
        });

        rules.profile.apply(&mut body).unwrap();
        assert_eq!(body["name"], "&lt;b&gt;Alice&lt;&#x2F;b&gt;");
        assert_eq!(body["bio"], "likes &quot;loud&quot; music");
    }

    #[test]
    fn test_email_normalized() {
        let rules = RuleSets::default();
        let mut body = json!({ "email": "  Alice@Example.COM ", "password": "hunter22" });

        rules.register.apply(&mut body).unwrap();
        assert_eq!(body["email"], "alice@example.com");
    }

    #[test]
    fn test_bad_email_and_short_password() {
        let rules = RuleSets::default();
        let mut body = json!({ "email": "not-an-email", "password": "abc" });

        let violations = rules.register.apply(&mut body).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].msg, "Please include a valid email");
        assert_eq!(violations[1].msg, "Password must be 6 or more characters");
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let rules = RuleSets::default();
        let mut body = json!({
            "address": "12 Elm St",
            "city": "Lisbon",
            "price": "950",
            "bedrooms": 2,
            "bathrooms": 1,
            "description": "bright flat",
            "vibeTags": ["sunny"]
        });

        assert!(rules.listing.apply(&mut body).is_ok());
        // quoted numbers are canonicalized after passing
        assert_eq!(body["price"], 950);
    }

    #[test]
    fn test_negative_price_rejected() {
        let rules = RuleSets::default();
        let mut body = json!({
            "address": "12 Elm St",
            "city": "Lisbon",
            "price": -5,
            "bedrooms": 2,
            "bathrooms": 1,
            "description": "bright flat",
            "vibeTags": []
        });

        let violations = rules.listing.apply(&mut body).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "price");
    }
}
