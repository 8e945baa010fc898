//! Token metadata retrieval through an IPFS gateway.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// JSON document a token URI points at. Minted alongside the audio
/// asset; every field is optional because older tokens predate some of
/// them and third-party pins vary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Cover art.
    #[serde(default)]
    pub image: Option<String>,
    /// Playable media, usually the same pin as `animation_url`.
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub animation_url: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub attributes: Vec<TokenAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: String,
}

/// Rewrite an `ipfs://` URI to go through the HTTP gateway. Anything
/// already resolvable (https, data URIs, bare paths) passes through
/// untouched.
pub fn resolve_asset_url(uri: &str, gateway: &str) -> String {
    match uri.split_once("//") {
        Some(("ipfs:", urn)) => format!("{}/{}", gateway.trim_end_matches('/'), urn),
        _ => uri.to_string(),
    }
}

/// HTTP client for metadata documents.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    gateway: String,
    request_timeout: Duration,
}

impl MetadataClient {
    pub fn new(gateway: String, request_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway,
            request_timeout,
        }
    }

    /// Fetch and parse the document behind a token URI. Failures are
    /// logged and collapse to `None`; callers treat missing metadata
    /// as a skippable token, not an error.
    pub async fn fetch(&self, uri: &str) -> Option<TokenMetadata> {
        let url = resolve_asset_url(uri, &self.gateway);
        let response = match self
            .http
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "Metadata request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "Metadata request rejected");
            return None;
        }

        match response.json::<TokenMetadata>().await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(%url, error = %e, "Metadata document unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipfs_uri_goes_through_gateway() {
        assert_eq!(
            resolve_asset_url("ipfs://QmXyz/0", "https://ipfs.io/ipfs/"),
            "https://ipfs.io/ipfs/QmXyz/0"
        );
    }

    #[test]
    fn test_gateway_without_trailing_slash() {
        assert_eq!(
            resolve_asset_url("ipfs://QmXyz", "https://ipfs.io/ipfs"),
            "https://ipfs.io/ipfs/QmXyz"
        );
    }

    #[test]
    fn test_http_uri_passes_through() {
        let uri = "https://example.com/meta/1.json";
        assert_eq!(resolve_asset_url(uri, "https://ipfs.io/ipfs/"), uri);
    }

    #[test]
    fn test_bare_path_passes_through() {
        assert_eq!(resolve_asset_url("QmXyz", "https://ipfs.io/ipfs/"), "QmXyz");
    }

    #[test]
    fn test_metadata_tolerates_sparse_documents() {
        let doc: TokenMetadata = serde_json::from_str(r#"{"name": "Night Drive"}"#).unwrap();
        assert_eq!(doc.name.as_deref(), Some("Night Drive"));
        assert!(doc.description.is_none());
        assert!(doc.attributes.is_empty());
    }

    #[test]
    fn test_metadata_tolerates_unknown_fields() {
        let doc: TokenMetadata = serde_json::from_str(
            r#"{
                "name": "Night Drive",
                "artist": "Mara V",
                "album": "After Hours",
                "releaseYear": 2021,
                "attributes": [{"trait_type": "Genre", "value": "Synthwave"}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.artist.as_deref(), Some("Mara V"));
        assert_eq!(doc.attributes.len(), 1);
        assert_eq!(doc.attributes[0].trait_type, "Genre");
    }
}
