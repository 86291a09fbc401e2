use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{PresenterError, ValidationError};
use crate::structs::link_request::{
    DeleteShortcut, DeleteShortcutAnswer, PutShortcut, PutShortcutAnswer,
};

/// The external link-management service behind `/s`.
#[allow(async_fn_in_trait)]
pub trait LinkService {
    /// Creates or replaces a link. Returns the acknowledgement when the
    /// service sent one.
    async fn put(&self, link: &PutShortcut) -> Result<Option<PutShortcutAnswer>, PresenterError>;

    async fn delete(&self, slug: &str) -> Result<Option<DeleteShortcutAnswer>, PresenterError>;
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct HttpLinkService {
    client: Client,
    endpoint: Url,
    credentials: Option<Credentials>,
}

impl HttpLinkService {
    pub fn new(origin: &Url, credentials: Option<Credentials>) -> Result<Self, PresenterError> {
        let endpoint = origin
            .join("/s")
            .map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            credentials,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json");
        match &self.credentials {
            Some(credentials) => {
                builder.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => builder,
        }
    }
}

/// Any status below 300 counts as success. Failure bodies are plain text.
async fn acknowledgement<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, PresenterError> {
    let status = response.status();
    let body = response.text().await?;
    if status.as_u16() < 300 {
        Ok(serde_json::from_str(&body).ok())
    } else {
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        };
        Err(PresenterError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

impl LinkService for HttpLinkService {
    async fn put(&self, link: &PutShortcut) -> Result<Option<PutShortcutAnswer>, PresenterError> {
        log::debug!("Putting '{}' to {}", link.slug, self.endpoint);
        let response = self
            .request(reqwest::Method::PUT)
            .json(link)
            .send()
            .await?;
        acknowledgement(response).await
    }

    async fn delete(&self, slug: &str) -> Result<Option<DeleteShortcutAnswer>, PresenterError> {
        log::debug!("Deleting '{}' at {}", slug, self.endpoint);
        let body = DeleteShortcut {
            slug: slug.to_string(),
        };
        let response = self
            .request(reqwest::Method::DELETE)
            .json(&body)
            .send()
            .await?;
        acknowledgement(response).await
    }
}
