//! Fixture infrastructure for E2E tests
//!
//! Recorded provider responses live under `fixtures/cassettes/` as small
//! VCR-style documents: the request that was made and the response body
//! that came back. Tests replay the body through a mockito server.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// VCR cassette structure matching our recorded HTTP interactions
#[derive(Debug, Deserialize)]
pub struct VcrCassette {
    pub name: String,
    pub request: VcrRequest,
    pub response: VcrResponse,
}

#[derive(Debug, Deserialize)]
pub struct VcrRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub query: Value,
}

#[derive(Debug, Deserialize)]
pub struct VcrResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: Value,
    pub body: Value,
}

/// Absolute path of a cassette, relative to `fixtures/cassettes/`
pub fn cassette_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("cassettes")
        .join(name)
}

pub fn load_cassette(name: &str) -> Result<VcrCassette> {
    let path = cassette_path(name);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to load VCR cassette '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse VCR cassette '{}'", path.display()))
}

/// A cassette's response body as a JSON string, ready for `with_body`
pub fn load_fixture(name: &str) -> Result<String> {
    let cassette = load_cassette(name)?;
    serde_json::to_string(&cassette.response.body)
        .with_context(|| format!("Failed to serialize response body from '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cassettes_parse() {
        for name in [
            "tmdb/search_tv_the_wire.json",
            "tmdb/tv_1438.json",
            "tmdb/tv_1438_recommendations.json",
            "tmdb/tv_1398.json",
        ] {
            let cassette = load_cassette(name).unwrap();
            assert_eq!(cassette.request.method, "GET");
            assert_eq!(cassette.response.status, 200);
            assert!(cassette.request.url.contains("/3/tv") || cassette.request.url.contains("/3/search"));
        }
    }

    #[test]
    fn test_unknown_fixture_is_an_error() {
        assert!(load_fixture("tmdb/missing.json").is_err());
    }
}
