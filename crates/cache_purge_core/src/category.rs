use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Artifact families served through the edge cache. Every deployed worker
/// instance is bound to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactCategory {
    Docs,
    Media,
    FrontendRelease,
    StorybookRelease,
    FrontendSandbox,
    StorybookSandbox,
}

impl ArtifactCategory {
    pub const ALL: [Self; 6] = [
        Self::Docs,
        Self::Media,
        Self::FrontendRelease,
        Self::StorybookRelease,
        Self::FrontendSandbox,
        Self::StorybookSandbox,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::Media => "media",
            Self::FrontendRelease => "frontend-release",
            Self::StorybookRelease => "storybook-release",
            Self::FrontendSandbox => "frontend-sandbox",
            Self::StorybookSandbox => "storybook-sandbox",
        }
    }

    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Docs => "https://docs.jicloud.org",
            Self::Media => "https://media.jicloud.org",
            Self::FrontendRelease => "https://frontend.jicloud.org",
            Self::StorybookRelease => "https://storybook.jicloud.org",
            Self::FrontendSandbox => "https://frontend.sandbox.jicloud.org",
            Self::StorybookSandbox => "https://storybook.sandbox.jicloud.org",
        }
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown artifact category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for ArtifactCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed)
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}
