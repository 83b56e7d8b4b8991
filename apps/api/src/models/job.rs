use serde::{Deserialize, Serialize};

/// A job posting as scraped by the client from a listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    /// Listing site the posting came from, e.g. "linkedin".
    pub source: String,
    pub url: String,
}
