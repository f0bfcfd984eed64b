use std::sync::LazyLock;

use regex::Regex;

// Declarative per-field constraints: data, not branching code. A field's
// rules are evaluated in declared order and the first violation's message
// is the one surfaced.

#[derive(Clone, Copy, Debug)]
pub enum Constraint {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(&'static LazyLock<Regex>),
    OneOf(&'static [&'static str]),
}

impl Constraint {
    pub fn holds_for(&self, value: &str) -> bool {
        match self {
            Constraint::Required => !value.is_empty(),
            Constraint::MinLength(min) => value.chars().count() >= *min,
            Constraint::MaxLength(max) => value.chars().count() <= *max,
            Constraint::Pattern(pattern) => pattern.is_match(value),
            Constraint::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub constraint: Constraint,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(constraint: Constraint, message: &'static str) -> Self {
        Self {
            constraint,
            message,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RuleSet {
    rules: &'static [Rule],
}

impl RuleSet {
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn first_violation(&self, value: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !rule.constraint.holds_for(value))
            .map(|rule| rule.message)
    }

    pub fn violations(&self, value: &str) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| !rule.constraint.holds_for(value))
            .map(|rule| rule.message)
            .collect()
    }

    pub fn is_satisfied_by(&self, value: &str) -> bool {
        self.first_violation(value).is_none()
    }
}
