//! Strategy tags - which recovery strategy produced a record

use serde::{Deserialize, Serialize};

/// Recovery strategy that resolved an extraction attempt
///
/// Strategies are attempted in declaration order:
/// - Direct: the whole trimmed text is a structured value
/// - FencedBlock: the value sits inside a triple-backtick fence
/// - BraceSpan: the value spans the first `{` to the last `}`
/// - None: every strategy missed (or the input was empty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTag {
    /// Whole text parsed as-is
    Direct,

    /// Inner span of the first code fence
    FencedBlock,

    /// First-open to last-close delimiter span
    BraceSpan,

    /// Total failure
    None,
}

impl StrategyTag {
    /// All tags, in priority order with the failure tag last
    pub const ALL: [StrategyTag; 4] = [
        StrategyTag::Direct,
        StrategyTag::FencedBlock,
        StrategyTag::BraceSpan,
        StrategyTag::None,
    ];

    /// Get the tag name as reported by the health surface
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyTag::Direct => "direct",
            StrategyTag::FencedBlock => "markdown",
            StrategyTag::BraceSpan => "bracket",
            StrategyTag::None => "failed",
        }
    }

    /// Parse a tag from its reported name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Some(StrategyTag::Direct),
            "markdown" | "fenced" => Some(StrategyTag::FencedBlock),
            "bracket" | "brace" => Some(StrategyTag::BraceSpan),
            "failed" | "none" => Some(StrategyTag::None),
            _ => None,
        }
    }

    /// Whether this tag denotes a recovered record
    pub fn is_success(&self) -> bool {
        !matches!(self, StrategyTag::None)
    }
}

impl std::fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid strategy tag: {}", s))
    }
}
