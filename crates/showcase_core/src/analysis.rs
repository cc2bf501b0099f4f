//! Analysis result handed over by the backend.
//!
//! Every field is optional on the wire; absent or `null` values decode to
//! their defaults so a partial payload still renders.
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub stars: u64,
    #[serde(deserialize_with = "null_default")]
    pub forks: u64,
    #[serde(deserialize_with = "null_default")]
    pub open_issues: u64,
    #[serde(deserialize_with = "null_default")]
    pub contributors: Vec<serde_json::Value>,
    pub license: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub languages: BTreeMap<String, u64>,
    pub last_updated: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub open_prs: u64,
    #[serde(deserialize_with = "null_default")]
    pub commits_last_week: u64,
    #[serde(deserialize_with = "null_default")]
    pub commits_last_month: u64,
    #[serde(deserialize_with = "null_default")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub top_contributors: Vec<Contributor>,
    #[serde(deserialize_with = "null_default")]
    pub commit_frequency: BTreeMap<String, u64>,
    pub best_section: Option<BestSection>,
    pub readme_analysis: Option<ReadmeAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Contributor {
    #[serde(deserialize_with = "null_default")]
    pub login: String,
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "null_default")]
    pub contributions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct BestSection {
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ReadmeAnalysis {
    pub main_image: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub matches: Vec<LinkMatch>,
}

/// One README passage that mentioned demo material, with the URLs found in it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LinkMatch {
    #[serde(deserialize_with = "null_default")]
    pub urls: Vec<String>,
}

impl AnalysisResult {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// README match groups in document order; empty when the README was not analysed.
    pub fn link_groups(&self) -> Vec<&[String]> {
        self.readme_analysis
            .as_ref()
            .map(|readme| readme.matches.iter().map(|m| m.urls.as_slice()).collect())
            .unwrap_or_default()
    }
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::AnalysisResult;

    #[test]
    fn partial_payload_decodes_with_defaults() {
        let json = r#"{
            "name": "demo",
            "stars": 12,
            "license": null,
            "languages": {"Rust": 1200, "Shell": 40},
            "readme_analysis": {"main_image": null, "images": [], "matches": [{"urls": ["https://a.io/x"]}]},
            "unknown_field": true
        }"#;
        let analysis = AnalysisResult::from_json(json).unwrap();
        assert_eq!(analysis.name, "demo");
        assert_eq!(analysis.stars, 12);
        assert_eq!(analysis.forks, 0);
        assert_eq!(analysis.license, None);
        assert_eq!(analysis.languages.len(), 2);
        assert_eq!(analysis.link_groups(), vec![&["https://a.io/x".to_string()][..]]);
    }

    #[test]
    fn null_collections_become_empty() {
        let json = r#"{"topics": null, "top_contributors": null, "commit_frequency": null}"#;
        let analysis = AnalysisResult::from_json(json).unwrap();
        assert!(analysis.topics.is_empty());
        assert!(analysis.top_contributors.is_empty());
        assert!(analysis.commit_frequency.is_empty());
        assert!(analysis.link_groups().is_empty());
    }
}
