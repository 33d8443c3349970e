use url::Url;

use crate::{domain::QueryFilter, BoardError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardURL(Url);

impl AsRef<str> for BoardURL {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl BoardURL {
    pub fn parse(base_url: &str) -> Result<Self, BoardError> {
        let url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| BoardError::network(format!("invalid API URL {base_url}: {e}")))?;
        Ok(Self(url))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let mut url = self.0.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        Self(url)
    }

    pub fn with_filter(&self, filter: &impl QueryFilter) -> Self {
        let mut url = self.0.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in filter.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        Self(url)
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityFilter, BudgetWindow, ProjectId};
    use time::macros::datetime;

    #[test]
    fn appends_paths_without_doubling_slashes() {
        let url = BoardURL::parse("https://api.example.com/v1/").unwrap();
        assert_eq!(
            url.append_path("/project").append_path("abc").as_ref(),
            "https://api.example.com/v1/project/abc"
        );
    }

    #[test]
    fn encodes_filter_values() {
        let id = ProjectId::new("a&b");
        let window = BudgetWindow::month_of(datetime!(2024-03-15 00:00:00 UTC), true);

        let url = BoardURL::parse("http://localhost:8080")
            .unwrap()
            .append_path("/activity")
            .with_filter(&ActivityFilter::new(&id, &window));

        assert_eq!(
            url.as_ref(),
            "http://localhost:8080/activity?projectId=a%26b&date=gte%3A1709251200000"
        );
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(matches!(
            BoardURL::parse("not a url"),
            Err(BoardError::Network(_))
        ));
    }
}
