//! Asynchronous Marathon client and the shared request path.

use crate::apps::Apps;
use crate::Result;
use marathon_core::client::{ClientConfig, USER_AGENT};
use marathon_core::config::MarathonConfig;
use marathon_core::{Error, QueryParams};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::{Client, ClientBuilder, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Builder for [`Marathon`].
#[derive(Debug)]
pub struct MarathonClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    basic_auth: Option<(String, Option<SecretString>)>,
    token: Option<SecretString>,
    headers: Vec<(String, String)>,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
    http: Option<Client>,
}

impl MarathonClientBuilder {
    /// Create a builder for the given Marathon host.
    ///
    /// The URL should include the protocol and host (e.g. `http://marathon.mesos:8080`)
    /// and may carry a path prefix when Marathon sits behind a proxy.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid Marathon base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            basic_auth: None,
            token: None,
            headers: Vec::new(),
            tls_verify: true,
            tls_ca_cert: None,
            http: None,
        })
    }

    /// Create a builder from a [`MarathonConfig`].
    pub fn from_config(config: MarathonConfig) -> Result<Self> {
        let base_url = config.parse_url()?;

        let mut http_config = ClientConfig::new();
        if let Some(timeout) = config.timeout() {
            http_config = http_config.with_timeout(timeout);
        }

        Ok(Self {
            base_url,
            http_config,
            basic_auth: config
                .username
                .map(|user| (user, config.password)),
            token: config.token,
            headers: config.headers.into_iter().collect(),
            tls_verify: config.tls_verify,
            tls_ca_cert: config.tls_ca_cert,
            http: None,
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure HTTP basic authentication.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((username.into(), Some(SecretString::from(password.into()))));
        self
    }

    /// Configure an ACS token (sent as `Authorization: token=<token>`).
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM encoded CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Use a caller supplied `reqwest` client as is.
    ///
    /// Timeout, compression and TLS settings of this builder are ignored; auth and
    /// extra headers are still applied per request.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Marathon> {
        if self.base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "Marathon base URL `{}` cannot carry a path",
                self.base_url
            )));
        }

        let headers = self.request_headers()?;
        let http = match self.http {
            Some(http) => http,
            None => build_http_client(
                &self.http_config,
                self.tls_verify,
                self.tls_ca_cert.as_ref(),
            )?,
        };

        let transport = Arc::new(Transport {
            http,
            base_url: self.base_url,
            basic_auth: self.basic_auth,
            headers,
            logging: self.http_config.enable_logging,
        });

        Ok(Marathon {
            apps: Arc::new(Apps::new(Arc::clone(&transport))),
            transport,
        })
    }

    fn request_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| Error::ConfigError(format!("Invalid header name `{name}`: {err}")))?;
            let value = HeaderValue::from_str(value).map_err(|err| {
                Error::ConfigError(format!("Invalid value for header `{name}`: {err}"))
            })?;
            headers.insert(name, value);
        }

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("token={}", token.expose_secret()))
                .map_err(|err| Error::ConfigError(format!("Invalid ACS token: {err}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

fn build_http_client(
    config: &ClientConfig,
    tls_verify: bool,
    tls_ca_cert: Option<&PathBuf>,
) -> Result<Client> {
    let mut builder = ClientBuilder::new().user_agent(USER_AGENT);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if !config.enable_compression {
        builder = builder.no_gzip();
    }

    if !tls_verify {
        warn!("TLS verification disabled for Marathon client");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(ca_cert) = tls_ca_cert {
        debug!("loading Marathon CA certificate from {}", ca_cert.display());
        let bytes = std::fs::read(ca_cert).map_err(|err| {
            Error::ConfigError(format!(
                "Failed to read Marathon CA certificate {}: {err}",
                ca_cert.display()
            ))
        })?;
        let cert = reqwest::Certificate::from_pem(&bytes)
            .map_err(|err| Error::ConfigError(format!("Invalid Marathon CA certificate: {err}")))?;
        builder = builder.add_root_certificate(cert);
    }

    builder
        .build()
        .map_err(|err| Error::ConfigError(format!("Failed to build Marathon HTTP client: {err}")))
}

/// Asynchronous Marathon client.
///
/// Cloning is cheap and every clone talks to the same host through the same
/// [`Apps`] instance. Separate clients (for separate hosts) share nothing.
#[derive(Debug, Clone)]
pub struct Marathon {
    transport: Arc<Transport>,
    apps: Arc<Apps>,
}

impl Marathon {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        MarathonClientBuilder::new(base_url)?.build()
    }

    /// Start building a client for the given base URL.
    pub fn builder(base_url: impl AsRef<str>) -> Result<MarathonClientBuilder> {
        MarathonClientBuilder::new(base_url)
    }

    /// Construct a client from a [`MarathonConfig`].
    pub fn from_config(config: MarathonConfig) -> Result<Self> {
        MarathonClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.transport.base_url
    }

    /// Application endpoints under `/v2/apps`.
    #[must_use]
    pub fn apps(&self) -> &Apps {
        &self.apps
    }

    /// Alias of [`Marathon::apps`]; returns the very same instance.
    #[must_use]
    pub fn app(&self) -> &Apps {
        &self.apps
    }
}

/// Request path shared by every endpoint group.
#[derive(Debug)]
pub(crate) struct Transport {
    http: Client,
    base_url: Url,
    basic_auth: Option<(String, Option<SecretString>)>,
    headers: HeaderMap,
    logging: bool,
}

impl Transport {
    fn build_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!(
                    "Marathon base URL `{}` cannot carry a path",
                    self.base_url
                ))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    pub(crate) async fn get(&self, segments: &[&str], query: &QueryParams) -> Result<Value> {
        self.send_json::<()>(Method::GET, segments, query, None).await
    }

    /// Send one request and decode the JSON body.
    ///
    /// Each segment is percent-encoded on its own, so `/` inside an identifier
    /// becomes `%2F`. The body is encoded before anything is sent. An empty 2xx
    /// body decodes to `Value::Null`.
    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &QueryParams,
        body: Option<&B>,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(segments)?;
        let path = url.path().to_string();

        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| Error::Encode {
                path: path.clone(),
                message: err.to_string(),
            })?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .headers(self.headers.clone());

        if !query.is_empty() {
            request = request.query(query.pairs());
        }
        if let Some((user, pass)) = &self.basic_auth {
            request = request.basic_auth(user, pass.as_ref().map(|p| p.expose_secret()));
        }
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }

        if self.logging {
            debug!(%method, path = %path, ?query, "Marathon request");
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(
                        %method,
                        path = %path,
                        %status,
                        "Failed to read Marathon error body: {err}"
                    );
                    String::new()
                }
            };
            if self.logging {
                warn!(%method, path = %path, %status, "Marathon request failed");
            }
            return Err(Error::Status { status, body });
        }

        if self.logging {
            debug!(%method, path = %path, %status, "Marathon response");
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|err| Error::Decode {
            path,
            message: err.to_string(),
        })
    }
}
