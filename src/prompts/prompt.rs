//! @ai:module:intent Prompt definitions for the contest catalog
//! @ai:module:layer domain
//! @ai:module:public_api PromptSpec, PromptFile, default_prompts
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent One article assignment given to every candidate model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSpec {
    pub id: String,
    pub title: String,
    pub keywords: Vec<String>,
}

impl PromptSpec {
    /// @ai:intent Comma-joined keyword list for prompt construction
    /// @ai:effects pure
    pub fn keyword_list(&self) -> String {
        self.keywords.join(", ")
    }
}

/// @ai:intent Raw prompt structure from a TOML file
#[derive(Debug, Serialize, Deserialize)]
pub struct PromptFile {
    pub prompt: PromptSpec,
}

impl From<PromptFile> for PromptSpec {
    fn from(file: PromptFile) -> Self {
        file.prompt
    }
}

/// @ai:intent The built-in five-prompt catalog written by `init`
/// @ai:effects pure
pub fn default_prompts() -> Vec<PromptSpec> {
    let catalog = [
        (
            "P1",
            "5 Trends in AI-Assisted Learning",
            vec![
                "personalized learning",
                "adaptive quizzes",
                "AI tutoring",
                "learning analytics",
                "student engagement",
            ],
        ),
        (
            "P2",
            "Remote Work: The New Normal",
            vec![
                "hybrid teams",
                "virtual collaboration",
                "digital nomads",
                "work-life balance",
                "productivity tools",
            ],
        ),
        (
            "P3",
            "Blockchain Adoption in Small Business",
            vec![
                "supply chain",
                "smart contracts",
                "transaction fees",
                "decentralization",
                "security",
            ],
        ),
        (
            "P4",
            "Sustainable Tech: Greener Data Centers",
            vec![
                "energy efficiency",
                "liquid cooling",
                "renewable power",
                "carbon footprint",
                "PUE (Power Usage Effectiveness)",
            ],
        ),
        (
            "P5",
            "Cybersecurity Trends for 2025",
            vec![
                "zero trust",
                "AI threat detection",
                "ransomware",
                "IoT security",
                "data privacy",
            ],
        ),
    ];

    catalog
        .into_iter()
        .map(|(id, title, keywords)| PromptSpec {
            id: id.to_string(),
            title: title.to_string(),
            keywords: keywords.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_five_prompts() {
        let prompts = default_prompts();
        assert_eq!(prompts.len(), 5);
        assert_eq!(prompts[0].id, "P1");
        assert_eq!(prompts[4].id, "P5");
    }

    #[test]
    fn test_keyword_list_joins_with_commas() {
        let prompt = PromptSpec {
            id: "P1".to_string(),
            title: "Test".to_string(),
            keywords: vec!["alpha".to_string(), "beta".to_string()],
        };
        assert_eq!(prompt.keyword_list(), "alpha, beta");
    }
}
