// Immutable pattern registry - danger signatures grouped by policy category

use crate::core::errors::GateError;
use regex::{Regex, RegexBuilder};

/// Policy category a signature belongs to.
///
/// The category decides which evaluator consults the pattern and whether
/// matching is case-sensitive: command and prompt text match
/// case-insensitively, file paths match case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCategory {
    DangerousCommand,
    SensitivePath,
    SecretLeak,
}

impl PatternCategory {
    fn case_insensitive(&self) -> bool {
        !matches!(self, PatternCategory::SensitivePath)
    }
}

/// A named regular-expression signature.
///
/// Matching is a substring search anywhere in the candidate text, not a
/// full-string match.
#[derive(Debug)]
pub struct PolicyPattern {
    name: String,
    category: PatternCategory,
    regex: Regex,
}

impl PolicyPattern {
    pub fn new(
        name: &str,
        pattern: &str,
        category: PatternCategory,
    ) -> Result<Self, GateError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(category.case_insensitive())
            .build()
            .map_err(|e| {
                GateError::ConfigurationError(format!("Invalid pattern '{}': {}", name, e))
            })?;

        Ok(Self {
            name: name.to_string(),
            category,
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> PatternCategory {
        self.category
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

// Signatures for destructive shell commands. Substring regexes, matched
// case-insensitively against the full command string.
const DANGEROUS_COMMAND_PATTERNS: &[(&str, &str)] = &[
    ("recursive root deletion", r"rm\s+-rf\s+/"),
    ("raw disk overwrite", r"dd\s+if=/dev/zero\s+of="),
    ("fork bomb", r":\(\)\{ :\|:& \};:"),
    ("direct block-device write", r">\s*/dev/sda"),
    ("filesystem format", r"mkfs\."),
];

// Signatures for credential and configuration files. Case-sensitive:
// these name real on-disk paths.
const SENSITIVE_PATH_PATTERNS: &[(&str, &str)] = &[
    ("environment secrets file", r"\.env$"),
    ("SSH key directory", r"\.ssh/"),
    ("AWS credential directory", r"\.aws/"),
    ("git repository config", r"\.git/config"),
    ("generic private key", r"private_key"),
    ("RSA private key", r"id_rsa"),
];

// Signatures for key-value-looking secrets in free-text prompts.
const SECRET_LEAK_PATTERNS: &[(&str, &str)] = &[
    ("password assignment", r"password\s*[:=]\s*\S+"),
    ("API key assignment", r"api[_-]?key\s*[:=]\s*\S+"),
    ("secret assignment", r"secret\s*[:=]\s*\S+"),
];

/// Ordered, read-only pattern sets consulted by the evaluators.
///
/// Order is significant: evaluators test patterns in registration order
/// and stop at the first match. Constructed once at startup and shared
/// immutably across requests; tests inject custom sets via
/// [`PatternRegistry::from_patterns`].
#[derive(Debug)]
pub struct PatternRegistry {
    dangerous_commands: Vec<PolicyPattern>,
    sensitive_paths: Vec<PolicyPattern>,
    secret_leaks: Vec<PolicyPattern>,
}

impl PatternRegistry {
    /// Build the registry with the built-in signature set.
    pub fn builtin() -> Result<Self, GateError> {
        let mut patterns = Vec::new();
        for (name, pattern) in DANGEROUS_COMMAND_PATTERNS {
            patterns.push(PolicyPattern::new(
                name,
                pattern,
                PatternCategory::DangerousCommand,
            )?);
        }
        for (name, pattern) in SENSITIVE_PATH_PATTERNS {
            patterns.push(PolicyPattern::new(
                name,
                pattern,
                PatternCategory::SensitivePath,
            )?);
        }
        for (name, pattern) in SECRET_LEAK_PATTERNS {
            patterns.push(PolicyPattern::new(name, pattern, PatternCategory::SecretLeak)?);
        }
        Ok(Self::from_patterns(patterns))
    }

    /// Build a registry from an explicit pattern list, preserving the
    /// relative order within each category.
    pub fn from_patterns(patterns: Vec<PolicyPattern>) -> Self {
        let mut registry = Self {
            dangerous_commands: Vec::new(),
            sensitive_paths: Vec::new(),
            secret_leaks: Vec::new(),
        };
        for pattern in patterns {
            match pattern.category() {
                PatternCategory::DangerousCommand => registry.dangerous_commands.push(pattern),
                PatternCategory::SensitivePath => registry.sensitive_paths.push(pattern),
                PatternCategory::SecretLeak => registry.secret_leaks.push(pattern),
            }
        }
        registry
    }

    /// Patterns for one category, in registration order.
    pub fn category(&self, category: PatternCategory) -> &[PolicyPattern] {
        match category {
            PatternCategory::DangerousCommand => &self.dangerous_commands,
            PatternCategory::SensitivePath => &self.sensitive_paths,
            PatternCategory::SecretLeak => &self.secret_leaks,
        }
    }

    /// First pattern in registration order that matches `text`.
    ///
    /// Empty text never matches anything.
    pub fn first_match(&self, category: PatternCategory, text: &str) -> Option<&PolicyPattern> {
        if text.is_empty() {
            return None;
        }
        self.category(category).iter().find(|p| p.matches(text))
    }
}
