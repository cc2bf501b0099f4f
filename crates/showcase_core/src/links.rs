use std::collections::HashSet;

use url::Url;

/// Deduplicated, first-occurrence-ordered sequence of links for one analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkSet {
    links: Vec<String>,
}

impl LinkSet {
    /// Flattens the source groups in order, keeping the first occurrence of each link.
    ///
    /// Links are compared by exact string equality; no URL normalization is applied.
    pub fn from_groups<G, S>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for group in groups {
            for link in group {
                let link = link.as_ref();
                if seen.insert(link.to_owned()) {
                    links.push(link.to_owned());
                }
            }
        }
        Self { links }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.iter().any(|l| l == link)
    }
}

/// Short label for a fallback chip: host without a leading `www.`, or the raw input.
pub fn display_label(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => link.to_string(),
        },
        Err(_) => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_label, LinkSet};

    #[test]
    fn groups_are_flattened_in_first_occurrence_order() {
        let set = LinkSet::from_groups(vec![vec!["a", "b"], vec!["b", "c"]]);
        assert_eq!(set.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let set = LinkSet::from_groups(Vec::<Vec<String>>::new());
        assert!(set.is_empty());
        let set = LinkSet::from_groups(vec![Vec::<String>::new(), Vec::new()]);
        assert!(set.is_empty());
    }

    #[test]
    fn duplicates_within_a_group_collapse() {
        let set = LinkSet::from_groups(vec![vec![
            "https://a.io/x",
            "https://a.io/x",
            "https://b.io/y",
        ]]);
        assert_eq!(set.as_slice(), ["https://a.io/x", "https://b.io/y"]);
    }

    #[test]
    fn syntactic_variants_stay_distinct() {
        let set = LinkSet::from_groups(vec![vec!["https://a.io/x", "https://a.io/x/", "HTTPS://A.IO/x"]]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn output_never_exceeds_input_and_has_no_duplicates() {
        let groups = vec![
            vec!["x", "y", "x", "z"],
            vec![],
            vec!["z", "w", "y"],
            vec!["v"],
        ];
        let total: usize = groups.iter().map(Vec::len).sum();
        let set = LinkSet::from_groups(groups);
        assert!(set.len() <= total);
        assert_eq!(set.as_slice(), ["x", "y", "z", "w", "v"]);
    }

    #[test]
    fn label_strips_www_prefix() {
        assert_eq!(display_label("https://www.example.com/foo"), "example.com");
        assert_eq!(display_label("https://docs.example.com/a?b=c"), "docs.example.com");
    }

    #[test]
    fn label_falls_back_to_raw_input() {
        assert_eq!(display_label("not a url"), "not a url");
        assert_eq!(display_label("mailto:someone@example.com"), "mailto:someone@example.com");
    }

    #[test]
    fn only_leading_www_is_stripped() {
        assert_eq!(display_label("https://awww.example.com"), "awww.example.com");
    }
}
