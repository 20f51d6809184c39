//! Model name to organization resolution

use serde::{Deserialize, Serialize};

/// How a table token is matched against a lowercased model name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Name starts with the token
    Prefix,
    /// Name contains the token anywhere
    Substring,
}

/// Maps model display names to the organization that owns them
///
/// Rules are checked in table order; the first matching token wins.
#[derive(Debug, Clone)]
pub struct CompanyResolver {
    rules: Vec<(String, String)>,
    mode: MatchMode,
}

const ARENA_TABLE: &[(&str, &str)] = &[
    ("claude", "Anthropic"),
    ("gpt", "OpenAI"),
    ("chatgpt", "OpenAI"),
    ("gemini", "Google"),
    ("grok", "xAI"),
    ("kimi", "Moonshot"),
    ("mistral", "Mistral"),
    ("codestral", "Mistral"),
    ("devstral", "Mistral"),
    ("deepseek", "DeepSeek"),
    ("qwen", "Alibaba"),
    ("llama", "Meta"),
    ("glm", "Z.ai"),
    ("longcat", "Meituan"),
    ("ernie", "Baidu"),
    ("hunyuan", "Tencent"),
    ("mai", "Microsoft"),
];

const BENCHMARK_TABLE: &[(&str, &str)] = &[
    ("claude", "Anthropic"),
    ("gpt", "OpenAI"),
    ("gemini", "Google"),
    ("grok", "xAI"),
    ("kimi", "Moonshot"),
    ("mistral", "Mistral"),
    ("codestral", "Mistral"),
    ("devstral", "Mistral"),
    ("deepseek", "DeepSeek"),
    ("qwen", "Alibaba"),
    ("llama", "Meta"),
    ("glm", "Z.ai"),
];

impl CompanyResolver {
    pub fn new<I, T, O>(rules: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = (T, O)>,
        T: Into<String>,
        O: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(token, org)| (token.into().to_lowercase(), org.into()))
                .collect(),
            mode,
        }
    }

    /// Arena-style table, matched on name prefix
    pub fn arena() -> Self {
        Self::new(ARENA_TABLE.iter().copied(), MatchMode::Prefix)
    }

    /// Benchmark-style table, matched anywhere in the name
    pub fn benchmark() -> Self {
        Self::new(BENCHMARK_TABLE.iter().copied(), MatchMode::Substring)
    }

    /// Organization for `model_name`, `None` when unknown
    pub fn resolve(&self, model_name: &str) -> Option<String> {
        let name = model_name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find(|(token, _)| match self.mode {
                MatchMode::Prefix => name.starts_with(token.as_str()),
                MatchMode::Substring => name.contains(token.as_str()),
            })
            .map(|(_, org)| org.clone())
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl Default for CompanyResolver {
    fn default() -> Self {
        Self::arena()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_prefix_match() {
        let resolver = CompanyResolver::arena();

        assert_eq!(resolver.resolve("gemini-3-pro").as_deref(), Some("Google"));
        assert_eq!(resolver.resolve("Claude-Opus-4-5").as_deref(), Some("Anthropic"));
        assert_eq!(resolver.resolve("gpt-4o-2024-05-13").as_deref(), Some("OpenAI"));
        assert_eq!(resolver.resolve("longcat-flash").as_deref(), Some("Meituan"));
        assert_eq!(resolver.resolve("mai-1-preview").as_deref(), Some("Microsoft"));
    }

    #[test]
    fn test_arena_requires_prefix() {
        let resolver = CompanyResolver::arena();

        assert_eq!(resolver.resolve("chocolate-gpt"), None);
        assert_eq!(resolver.resolve("anonymous-model"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn test_benchmark_substring_match() {
        let resolver = CompanyResolver::benchmark();

        assert_eq!(resolver.resolve("openai/gpt-5.2-codex").as_deref(), Some("OpenAI"));
        assert_eq!(resolver.resolve("anthropic-claude-opus").as_deref(), Some("Anthropic"));
        assert_eq!(resolver.resolve("longcat-flash"), None);
    }

    #[test]
    fn test_first_rule_wins() {
        let resolver = CompanyResolver::new(
            vec![("gemini", "Google"), ("gemini-pro", "Other")],
            MatchMode::Prefix,
        );
        assert_eq!(resolver.resolve("gemini-pro-2").as_deref(), Some("Google"));
    }
}
