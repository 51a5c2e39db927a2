pub mod collect;
pub mod http;

pub use collect::{collect, collect_with_progress, Collected, DateThreshold, MAX_PAGE_SIZE};
pub use http::HttpFetcher;

use crate::error::{GridError, Result};
use crate::model::Record;

/// Transport seam. One authenticated request for page `page` of `endpoint`
/// at `page_size` rows; an empty vector means the endpoint is exhausted.
pub trait PageFetcher {
    fn fetch_page(&self, endpoint: &str, page: u32, page_size: u32) -> Result<Vec<Record>>;
}

/// Commit-listing endpoint for an `owner/name` repository slug.
pub fn commits_endpoint(slug: &str) -> Result<String> {
    let slug = slug.trim().trim_matches('/');
    if slug.is_empty() {
        return Err(GridError::InvalidArgument(
            "Repository must not be empty".to_string(),
        ));
    }
    match slug.split('/').collect::<Vec<_>>()[..] {
        [owner, name] if !owner.is_empty() && !name.is_empty() => {
            Ok(format!("repos/{owner}/{name}/commits"))
        }
        _ => Err(GridError::InvalidArgument(format!(
            "Repository '{slug}' must be given as owner/name"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slug_to_endpoint() {
        assert_eq!(
            commits_endpoint("rust-lang/rust").unwrap(),
            "repos/rust-lang/rust/commits"
        );
        assert_eq!(
            commits_endpoint("/octo/cat/").unwrap(),
            "repos/octo/cat/commits"
        );
        assert!(matches!(commits_endpoint(""), Err(GridError::InvalidArgument(_))));
        assert!(matches!(commits_endpoint("justaname"), Err(GridError::InvalidArgument(_))));
        assert!(matches!(commits_endpoint("a/b/c"), Err(GridError::InvalidArgument(_))));
    }
}

