//! Player lookup queries built from command arguments.

use crstats_common::{CrStatsError, Result};
use url::{form_urlencoded, Url};

/// Who to look up on the statistics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerQuery {
    /// Player name as typed.
    pub name: String,
    /// Optional trophy count narrowing the search.
    pub trophies: Option<String>,
}

impl PlayerQuery {
    /// Creates a name-only query.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trophies: None,
        }
    }

    /// Builds a query from the words following the command name.
    ///
    /// The words are re-joined with single spaces. Without a comma the whole text
    /// is the name; otherwise the text before the first comma is the name and the
    /// whitespace-trimmed text after it is the trophy count. Anything after a
    /// second comma is ignored.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let text = args
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");

        let mut parts = text.split(',');
        let name = parts.next().unwrap_or_default();
        match parts.next() {
            Some(trophies) => Self {
                name: name.to_string(),
                trophies: Some(trophies.trim().to_string()),
            },
            None => Self::new(text.clone()),
        }
    }

    /// Appends the query parameters to the API endpoint, percent-encoded.
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url).map_err(|e| {
            CrStatsError::config_with_source(format!("invalid API url '{base_url}'"), e)
        })?;

        let mut pairs: Vec<String> = url
            .query()
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .into_iter()
            .collect();
        pairs.push(format!("name={}", percent_encode(&self.name)));
        if let Some(trophies) = &self.trophies {
            pairs.push(format!("trophies={}", percent_encode(trophies)));
        }
        url.set_query(Some(&pairs.join("&")));

        Ok(url)
    }
}

/// Percent-encodes a query value, spaces included, the way the service expects.
fn percent_encode(value: &str) -> String {
    // `+` in the input is already escaped as %2B, so every `+` left is a space.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://stats.example.com/v2/api.php";

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_name_only() {
        let query = PlayerQuery::from_args(&["Some", "Player"]);
        assert_eq!(query, PlayerQuery::new("Some Player"));

        let url = query.to_url(BASE).unwrap();
        assert_eq!(
            query_pairs(&url),
            vec![("name".to_string(), "Some Player".to_string())]
        );
        assert_eq!(url.query(), Some("name=Some%20Player"));
    }

    #[test]
    fn test_name_and_trophies() {
        let query = PlayerQuery::from_args(&["Some", "Player,", "6400"]);
        assert_eq!(query.name, "Some Player");
        assert_eq!(query.trophies.as_deref(), Some("6400"));

        let url = query.to_url(BASE).unwrap();
        assert_eq!(
            query_pairs(&url),
            vec![
                ("name".to_string(), "Some Player".to_string()),
                ("trophies".to_string(), "6400".to_string()),
            ]
        );
        assert_eq!(url.query(), Some("name=Some%20Player&trophies=6400"));
    }

    #[test]
    fn test_extra_commas_are_ignored() {
        let query = PlayerQuery::from_args(&["A,B,C"]);
        assert_eq!(query.name, "A");
        assert_eq!(query.trophies.as_deref(), Some("B"));
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let url = PlayerQuery::new("#Tag&x=1").to_url(BASE).unwrap();
        assert!(url.as_str().contains("name=%23Tag%26x%3D1"));
        assert_eq!(query_pairs(&url)[0].1, "#Tag&x=1");

        let url = PlayerQuery::new("a+b c").to_url(BASE).unwrap();
        assert_eq!(url.query(), Some("name=a%2Bb%20c"));
        assert_eq!(query_pairs(&url)[0].1, "a+b c");
    }

    #[test]
    fn test_existing_query_is_kept() {
        let url = PlayerQuery::new("A")
            .to_url("https://stats.example.com/api.php?v=2")
            .unwrap();
        assert_eq!(url.query(), Some("v=2&name=A"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(PlayerQuery::new("A").to_url("not a url").is_err());
    }
}
