/// Response from the deployment service: status code and full body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over the pre-registered deployment service handle.
///
/// Production code uses [`ReqwestService`], tests use mockall-generated
/// mocks. The handle owns the base URL; callers supply only the relative
/// path, the content type, and the raw request body.
#[allow(async_fn_in_trait)]
pub trait HttpService: Send + Sync {
    async fn post(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, HttpError>;
}

/// Real HTTP service handle over reqwest, bound to a named base URL.
pub struct ReqwestService {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl HttpService for ReqwestService {
    async fn post(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, HttpError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| HttpError::Request {
                service: self.name.clone(),
                url: url.clone(),
                source: e,
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| HttpError::ReadBody {
            service: self.name.clone(),
            source: e,
        })?;

        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("request to service '{service}' at {url} failed")]
    Request {
        service: String,
        url: String,
        source: reqwest::Error,
    },

    #[error("failed to read response body from service '{service}'")]
    ReadBody {
        service: String,
        source: reqwest::Error,
    },
}
