use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Top-level practice mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Technology-scoped questions; needs at least one technology.
    General,
    SystemsDesign,
    Behaviour,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::General,
        Category::SystemsDesign,
        Category::Behaviour,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::SystemsDesign => "systems_design",
            Category::Behaviour => "behaviour",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::SystemsDesign => "Systems Design",
            Category::Behaviour => "Behaviour",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Category::General => "Technology-specific technical questions",
            Category::SystemsDesign => "Architecture and design questions",
            Category::Behaviour => "Behavioral interview questions",
        }
    }

    /// Whether sessions in this category are scoped by technology.
    #[must_use]
    pub fn uses_technologies(self) -> bool {
        matches!(self, Category::General)
    }

    /// Collections holding the questions for this category.
    ///
    /// `General` maps each technology to its own collection and yields nothing
    /// when no technology is selected.
    #[must_use]
    pub fn collections(self, technologies: &[String]) -> Vec<CollectionName> {
        match self {
            Category::General => technologies
                .iter()
                .map(|tech| CollectionName::new(tech.as_str()))
                .collect(),
            Category::SystemsDesign | Category::Behaviour => {
                vec![CollectionName::new(self.as_str())]
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Name of an independently queryable set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(String);

impl CollectionName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The practice category a collection belongs to.
    #[must_use]
    pub fn category(&self) -> Category {
        match self.0.as_str() {
            "systems_design" => Category::SystemsDesign,
            "behaviour" => Category::Behaviour,
            _ => Category::General,
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
