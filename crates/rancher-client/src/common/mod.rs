//! Common utilities for the Rancher API client
//!
//! Provides the authenticated HTTP wrapper shared by every resource method.

use crate::error::RancherError;
use crate::models::Collection;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// HTTP client wrapper with basic authentication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    access_key: String,
    secret_key: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, access_key: String, secret_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
            secret_key,
        }
    }

    /// Create a wrapper for another base URL with the same credentials
    pub fn rebased(&self, base_url: String) -> Self {
        Self::new(
            self.client.clone(),
            base_url,
            self.access_key.clone(),
            self.secret_key.clone(),
        )
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Build query string from filters
    pub fn build_query_string(&self, filters: &[(String, String)]) -> String {
        filters
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/json");
        if self.access_key.is_empty() {
            request
        } else {
            request.basic_auth(&self.access_key, Some(&self.secret_key))
        }
    }

    /// Turn a non-success response into the matching error
    async fn check(response: Response, method: &str, path: &str) -> Result<Response, RancherError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RancherError::Authentication(
                format!("{} {} failed: {} - {}", method, path, status, body),
            )),
            StatusCode::NOT_FOUND => Err(RancherError::NotFound(format!(
                "Resource not found: {} - {}",
                path, body
            ))),
            _ => Err(RancherError::Api(format!(
                "{} {} failed: {} - {}",
                method, path, status, body
            ))),
        }
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, RancherError> {
        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            RancherError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, RancherError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, "GET", path).await?;
        Self::decode(response).await
    }

    /// Make a GET request, mapping 404 to `None`
    pub async fn get_optional<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<Option<T>, RancherError> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(RancherError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch all pages of a collection response
    pub async fn fetch_all_pages<T: for<'de> Deserialize<'de>>(
        &self,
        mut url: String,
    ) -> Result<Vec<T>, RancherError> {
        let mut all_results = Vec::new();

        loop {
            debug!("Fetching page: {}", url);

            let response = self.authorized(self.client.get(&url)).send().await?;
            let response = Self::check(response, "GET", &url).await?;
            let page: Collection<T> = Self::decode(response).await?;
            all_results.extend(page.data);

            match page.pagination.and_then(|p| p.next) {
                Some(next_url) => {
                    url = self.build_url(&next_url);
                }
                None => break,
            }
        }

        Ok(all_results)
    }

    /// Make a PUT request
    pub async fn put<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, RancherError> {
        let url = self.build_url(path);
        debug!("PUT {} with body: {}", url, body);

        let response = self
            .authorized(self.client.put(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check(response, "PUT", path).await?;
        Self::decode(response).await
    }

    /// Make a POST request
    pub async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, RancherError> {
        let url = self.build_url(path);
        debug!("POST {} with body: {}", url, body);

        let response = self
            .authorized(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check(response, "POST", path).await?;
        Self::decode(response).await
    }

    /// Make a DELETE request
    ///
    /// Rancher answers with the resource in its `removing` state; the body is
    /// not needed by callers and is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), RancherError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::check(response, "DELETE", path).await?;
        Ok(())
    }
}
