mod activity_filter;

pub use activity_filter::ActivityFilter;

/// A set of query parameters narrowing down a collection endpoint.
pub trait QueryFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}
