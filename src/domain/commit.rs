use regex::Regex;
use std::sync::OnceLock;

/// Changelog section a commit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Breaking,
    Feature,
    Fix,
    Performance,
    Other,
}

impl ChangeKind {
    /// Section heading used in the changelog
    pub fn heading(&self) -> &'static str {
        match self {
            ChangeKind::Breaking => "Breaking Changes",
            ChangeKind::Feature => "Features",
            ChangeKind::Fix => "Bug Fixes",
            ChangeKind::Performance => "Performance Improvements",
            ChangeKind::Other => "Other Changes",
        }
    }
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^([a-z]+)(?:\(([^)]+)\))?(!?):\s*(.*)$").expect("static regex is valid")
    })
}

impl ParsedCommit {
    /// Parse a commit message according to the conventional commits format
    ///
    /// Supports `type(scope)!: description`, `type(scope): description`,
    /// `type!: description` and `type: description`. Anything else is
    /// treated as a `chore` whose description is the first line.
    pub fn parse(message: &str) -> Self {
        let header = message.lines().next().unwrap_or_default().trim();
        let footer_breaking =
            message.contains("BREAKING CHANGE:") || message.contains("BREAKING-CHANGE:");

        match header_regex().captures(header) {
            Some(captures) => ParsedCommit {
                r#type: captures[1].to_string(),
                scope: captures.get(2).map(|m| m.as_str().to_string()),
                description: captures[4].to_string(),
                is_breaking_change: &captures[3] == "!" || footer_breaking,
            },
            None => ParsedCommit {
                r#type: "chore".to_string(),
                scope: None,
                description: header.to_string(),
                is_breaking_change: false,
            },
        }
    }

    /// Changelog section for this commit
    pub fn kind(&self) -> ChangeKind {
        if self.is_breaking_change {
            return ChangeKind::Breaking;
        }
        match self.r#type.as_str() {
            "feat" | "feature" => ChangeKind::Feature,
            "fix" => ChangeKind::Fix,
            "perf" => ChangeKind::Performance,
            _ => ChangeKind::Other,
        }
    }
}
