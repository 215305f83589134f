//! Blocking HTTP client for the search cluster.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::response::{classify_cluster_info, classify_index_response, ClusterInfo, IndexResponse};

/// Visibility requested for a freshly written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refresh {
    /// Refresh the affected shards immediately.
    #[default]
    True,
    False,
    /// Block until the next scheduled refresh.
    WaitFor,
}

impl Refresh {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::WaitFor => "wait_for",
        }
    }
}

/// Anything that can store one JSON document in a named index.
///
/// Implementations must be safe to call from many logging call sites at once.
/// Calls block, so they belong on synchronous threads, never a tokio worker.
pub trait IndexWriter: Send + Sync {
    fn index_document(
        &self,
        index: &str,
        body: Vec<u8>,
        refresh: Refresh,
    ) -> Result<IndexResponse, SearchError>;
}

/// Handle to the search cluster. Cheap to clone; clones share the connection pool.
///
/// Every request blocks the calling thread. Call it only from synchronous
/// code: inside a tokio runtime it returns `SearchError::AsyncContext`.
#[derive(Clone)]
pub struct SearchClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    addresses: Vec<Url>,
    credentials: Option<(String, Option<String>)>,
    next: AtomicUsize,
}

impl SearchClient {
    /// Validate the configured addresses and build the HTTP client.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        if config.addresses.is_empty() {
            return Err(SearchError::InvalidAddress {
                address: String::new(),
                reason: "no addresses configured".to_string(),
            });
        }
        let addresses = config
            .addresses
            .iter()
            .map(|a| parse_address(a))
            .collect::<Result<Vec<_>, _>>()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SearchError::Client)?;

        let credentials = config
            .username
            .as_ref()
            .map(|user| (user.clone(), config.password.clone()));

        debug!(addresses = ?config.addresses, "Search client initialized");
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                addresses,
                credentials,
                next: AtomicUsize::new(0),
            }),
        })
    }

    /// Query the cluster root endpoint.
    pub fn ping(&self) -> Result<ClusterInfo, SearchError> {
        let url = self.next_address().clone();
        let (status, body) = self.send(self.inner.http.get(url.clone()), &url)?;
        classify_cluster_info(status, &body)
    }

    /// Pick the next node in rotation.
    fn next_address(&self) -> &Url {
        let n = self.inner.next.fetch_add(1, Ordering::Relaxed);
        &self.inner.addresses[n % self.inner.addresses.len()]
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<(u16, String), SearchError> {
        // reqwest's blocking client panics when driven from a runtime thread.
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(SearchError::AsyncContext);
        }
        let request = match &self.inner.credentials {
            Some((user, pass)) => request.basic_auth(user, pass.as_ref()),
            None => request,
        };
        let transport = |source| SearchError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        Ok((status, body))
    }
}

impl IndexWriter for SearchClient {
    fn index_document(
        &self,
        index: &str,
        body: Vec<u8>,
        refresh: Refresh,
    ) -> Result<IndexResponse, SearchError> {
        let url = index_url(self.next_address(), index, refresh)?;
        let request = self
            .inner
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let (status, text) = self.send(request, &url)?;
        debug!(%url, status, body = %text, "Index response");
        classify_index_response(status, &text)
    }
}

fn parse_address(address: &str) -> Result<Url, SearchError> {
    let invalid = |reason: String| SearchError::InvalidAddress {
        address: address.to_string(),
        reason,
    };
    let url = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// `{base}/{index}/_doc?refresh=...`, keeping any path prefix on the base.
fn index_url(base: &Url, index: &str, refresh: Refresh) -> Result<Url, SearchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SearchError::InvalidAddress {
            address: base.to_string(),
            reason: "address cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .push(index)
        .push("_doc");
    url.query_pairs_mut().append_pair("refresh", refresh.as_str());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["not a url", "ftp://host:21", "http://"] {
            let err = SearchClient::new(&SearchConfig::with_address(bad)).err();
            assert!(
                matches!(err, Some(SearchError::InvalidAddress { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_address_list() {
        let config = SearchConfig {
            addresses: vec![],
            ..Default::default()
        };
        assert!(SearchClient::new(&config).is_err());
    }

    #[test]
    fn index_url_appends_doc_endpoint() {
        let base = Url::parse("http://192.168.61.129:9200").unwrap();
        let url = index_url(&base, "my_index", Refresh::True).unwrap();
        assert_eq!(url.as_str(), "http://192.168.61.129:9200/my_index/_doc?refresh=true");
    }

    #[test]
    fn index_url_keeps_proxy_prefix() {
        let base = Url::parse("https://proxy.local/es/").unwrap();
        let url = index_url(&base, "logs-2024.01.02", Refresh::WaitFor).unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.local/es/logs-2024.01.02/_doc?refresh=wait_for"
        );
    }

    #[test]
    fn addresses_rotate() {
        let config = SearchConfig {
            addresses: vec!["http://a:9200".into(), "http://b:9200".into()],
            ..Default::default()
        };
        let client = SearchClient::new(&config).unwrap();
        assert_eq!(client.next_address().host_str(), Some("a"));
        assert_eq!(client.next_address().host_str(), Some("b"));
        assert_eq!(client.next_address().host_str(), Some("a"));
    }

    #[test]
    fn unreachable_node_is_transport_error() {
        let client = SearchClient::new(&SearchConfig::with_address("http://127.0.0.1:1")).unwrap();
        let err = client
            .index_document("my_index", b"{}".to_vec(), Refresh::True)
            .unwrap_err();
        assert!(matches!(err, SearchError::Transport { .. }));
        assert!(!err.is_rejection());
    }

    #[test]
    fn refuses_to_block_inside_a_runtime() {
        let client = SearchClient::new(&SearchConfig::with_address("http://127.0.0.1:1")).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let result = runtime.block_on(async {
            client.index_document("my_index", b"{}".to_vec(), Refresh::True)
        });

        assert!(matches!(result, Err(SearchError::AsyncContext)));
    }
}
