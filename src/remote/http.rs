use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use super::UserGateway;
use crate::error::{NetworkError, Result};
use crate::model::{NewUser, User, UserId, UserPatch};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// HTTP client for a REST user collection.
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

/// Body of an update request: the full form value set, flat.
#[derive(Serialize)]
struct UpdateRequest<'a> {
    id: UserId,
    name: &'a str,
    email: &'a str,
    city: &'a str,
}

impl HttpGateway {
    /// `base_url` is the collection root, e.g. `https://host/users`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, id: Option<UserId>) -> RequestBuilder {
        let url = match id {
            Some(id) => format!("{}/{}", self.base_url, id),
            None => self.base_url.clone(),
        };
        self.client.request(method, url)
    }

    /// Send and turn non-2xx responses into [`NetworkError::Status`].
    async fn execute(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl UserGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<User>> {
        tracing::debug!(url = %self.base_url, "GET collection");
        let response = self.execute(self.request(Method::GET, None)).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, draft: &NewUser) -> Result<User> {
        tracing::debug!(url = %self.base_url, name = %draft.name, "POST collection");
        let req = self.request(Method::POST, None).json(draft);
        let response = self.execute(req).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<()> {
        tracing::debug!(url = %self.base_url, id, "PUT record");
        let body = UpdateRequest {
            id,
            name: &patch.name,
            email: &patch.email,
            city: &patch.city,
        };
        self.execute(self.request(Method::PUT, Some(id)).json(&body)).await?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        tracing::debug!(url = %self.base_url, id, "DELETE record");
        self.execute(self.request(Method::DELETE, Some(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let gw = HttpGateway::new("http://localhost:8080/users/");
        let root = gw.request(Method::GET, None).build().unwrap();
        assert_eq!(root.url().as_str(), "http://localhost:8080/users");
        let one = gw.request(Method::DELETE, Some(7)).build().unwrap();
        assert_eq!(one.url().as_str(), "http://localhost:8080/users/7");
    }
}
