use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Book, BookId, NewBook},
    protocol::{routes, BookListResponse, BookResponse, DeleteAck},
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub use error::ClientError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Remote book collection. Every call is a single request: no retry, no
/// timeout beyond the transport defaults.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn create_book(&self, book: &NewBook) -> Result<Book>;
    async fn update_book(&self, id: &BookId, book: &Book) -> Result<Book>;
    async fn delete_book(&self, id: &BookId) -> Result<DeleteAck>;
}

pub struct BookClient {
    http: Client,
    base_url: String,
}

impl BookClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !status.is_success() {
            warn!(endpoint, %status, "catalog request rejected");
            return Err(ClientError::Rejected {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        debug!(endpoint, %status, bytes = body.len(), "catalog request completed");
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Delete acknowledgements vary between backends; an empty or non-JSON body
/// still counts as success once the status was 2xx.
fn parse_delete_ack(body: &str) -> DeleteAck {
    if body.trim().is_empty() {
        return DeleteAck::default();
    }
    serde_json::from_str(body).unwrap_or_else(|_| DeleteAck {
        message: Some(body.trim().to_string()),
    })
}

#[async_trait]
impl CatalogApi for BookClient {
    async fn list_books(&self) -> Result<Vec<Book>> {
        let endpoint = format!("GET {}", routes::LIST_BOOKS);
        let body = self
            .send(&endpoint, self.http.get(self.url(routes::LIST_BOOKS)))
            .await?;
        let list: BookListResponse = decode(&endpoint, &body)?;
        Ok(list.data)
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        let endpoint = format!("POST {}", routes::ADD_BOOK);
        let body = self
            .send(
                &endpoint,
                self.http.post(self.url(routes::ADD_BOOK)).json(book),
            )
            .await?;
        decode::<BookResponse>(&endpoint, &body).map(BookResponse::into_book)
    }

    async fn update_book(&self, id: &BookId, book: &Book) -> Result<Book> {
        let path = routes::update_book(id);
        let endpoint = format!("PUT {path}");
        let body = self
            .send(&endpoint, self.http.put(self.url(&path)).json(book))
            .await?;
        decode::<BookResponse>(&endpoint, &body).map(BookResponse::into_book)
    }

    async fn delete_book(&self, id: &BookId) -> Result<DeleteAck> {
        let path = routes::delete_book(id);
        let endpoint = format!("DELETE {path}");
        let body = self
            .send(&endpoint, self.http.delete(self.url(&path)))
            .await?;
        Ok(parse_delete_ack(&body))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
