use super::{
    parse_response,
    GraphQlRequest,
    Transport,
    TransportFuture,
};
use eyre::{
    Context as _,
    Result,
};
use reqwest::cookie::Jar;
use std::sync::Arc;
use url::Url;

/// [`Transport`] over HTTPS. Cookies set by the collector are kept and sent along with every request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_jar(Arc::new(Jar::default()))
    }

    pub fn with_jar(jar: Arc<Jar>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        Ok(Self { client, jar })
    }

    /// Seed the cookie store with `name=value` cookies for the collector at `server`.
    pub fn with_cookies<'a>(self, server: &str, cookies: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let server = Url::parse(server).wrap_err_with(|| format!("invalid collector URL {server:?}"))?;
        for cookie in cookies {
            debug!(%server, "adding configured cookie");
            self.jar.add_cookie_str(cookie, &server);
        }
        Ok(self)
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, endpoint: &'a Url, request: &'a GraphQlRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            trace!(%endpoint, query = request.query, "sending request");
            let response = self.client.post(endpoint.clone()).json(request).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            parse_response(status, &body)
        })
    }
}
