//! The weather client and its three calling conventions.
//!
//! Every request goes through one asynchronous core, [`run_request`]. The
//! callback variants (`*_with`) spawn that core on the shared runtime, and the
//! blocking variants (`*_blocking`) park the calling thread on a one-shot
//! channel fed by the callback variant.

use reqwest::{Client, redirect::Policy};
use std::{sync::Arc, time::Duration};
use tokio::{
    runtime::{Handle, RuntimeFlavor},
    sync::oneshot,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::Config,
    document::ForecastDocument,
    endpoint::{EndpointMap, Operation},
    error::{Result, YrError},
    fetch::Fetch,
    model::{LocationArgs, TextForecastArgs},
};

pub const DEFAULT_USER_AGENT: &str = concat!("yr-core/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct WeatherClient {
    endpoints: EndpointMap,
    fetcher: Arc<dyn Fetch>,
    runtime: Handle,
}

impl WeatherClient {
    /// Client for the production endpoints on the current tokio runtime.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> WeatherClientBuilder {
        WeatherClientBuilder::default()
    }

    pub fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }

    pub fn set_endpoints(&mut self, endpoints: EndpointMap) {
        self.endpoints = endpoints;
    }

    /// Request URL for the operation called `operation`.
    pub fn url_for(&self, operation: &str, params: &[(&str, &str)]) -> Result<Url> {
        self.endpoints.url_for(operation, params)
    }

    fn location_url(&self, args: &LocationArgs) -> Result<Url> {
        let [(lon_key, lon), (lat_key, lat)] = args.query_pairs()?;
        Ok(self
            .endpoints
            .url(Operation::LocationForecast, &[(lon_key, lon.as_str()), (lat_key, lat.as_str())]))
    }

    fn text_url(&self, args: &TextForecastArgs) -> Url {
        self.endpoints.url(Operation::TextForecast, &args.query_pairs())
    }

    pub async fn location_forecast(
        &self,
        args: impl Into<LocationArgs>,
    ) -> Result<ForecastDocument> {
        let url = self.location_url(&args.into())?;
        run_request(Arc::clone(&self.fetcher), url).await
    }

    pub async fn text_forecast(&self, args: TextForecastArgs) -> Result<ForecastDocument> {
        let url = self.text_url(&args);
        run_request(Arc::clone(&self.fetcher), url).await
    }

    /// Starts a location forecast request and returns immediately.
    ///
    /// `callback` runs exactly once. Validation errors are delivered before
    /// this method returns; everything else arrives later on the runtime.
    pub fn location_forecast_with<F>(&self, args: impl Into<LocationArgs>, callback: F)
    where
        F: FnOnce(Result<ForecastDocument>) + Send + 'static,
    {
        match self.location_url(&args.into()) {
            Ok(url) => self.dispatch(url, callback),
            Err(e) => callback(Err(e)),
        }
    }

    /// Starts a text forecast request and returns immediately.
    pub fn text_forecast_with<F>(&self, args: TextForecastArgs, callback: F)
    where
        F: FnOnce(Result<ForecastDocument>) + Send + 'static,
    {
        let url = self.text_url(&args);
        self.dispatch(url, callback);
    }

    /// Blocks the calling thread until the location forecast arrives.
    ///
    /// Validation errors are returned first. After that, a client bound to a
    /// current-thread runtime fails with [`YrError::BlockingOnCurrentThread`],
    /// since nothing would drive the request while this thread waits.
    ///
    /// # Panics
    ///
    /// Panics when called from inside an async task; use
    /// [`WeatherClient::location_forecast`] there.
    pub fn location_forecast_blocking(
        &self,
        args: impl Into<LocationArgs>,
    ) -> Result<ForecastDocument> {
        let args = args.into();
        args.validate()?;
        self.ensure_can_block()?;
        wait_for(|done| self.location_forecast_with(args, done))
    }

    /// Blocks the calling thread until the text forecast arrives.
    ///
    /// Fails with [`YrError::BlockingOnCurrentThread`] on a current-thread runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from inside an async task.
    pub fn text_forecast_blocking(&self, args: TextForecastArgs) -> Result<ForecastDocument> {
        self.ensure_can_block()?;
        wait_for(|done| self.text_forecast_with(args, done))
    }

    fn ensure_can_block(&self) -> Result<()> {
        match self.runtime.runtime_flavor() {
            RuntimeFlavor::CurrentThread => Err(YrError::BlockingOnCurrentThread),
            _ => Ok(()),
        }
    }

    fn dispatch<F>(&self, url: Url, callback: F)
    where
        F: FnOnce(Result<ForecastDocument>) + Send + 'static,
    {
        // The task only needs the transport, not the whole client.
        let fetcher = Arc::clone(&self.fetcher);
        self.runtime.spawn(async move {
            callback(run_request(fetcher, url).await);
        });
    }
}

async fn run_request(fetcher: Arc<dyn Fetch>, url: Url) -> Result<ForecastDocument> {
    debug!(%url, "requesting forecast");

    let body = fetcher.get_text(url.clone()).await.inspect_err(|e| {
        warn!(%url, error = %e, "forecast request failed");
    })?;

    ForecastDocument::parse(&body)
}

fn wait_for<S>(start: S) -> Result<ForecastDocument>
where
    S: FnOnce(Box<dyn FnOnce(Result<ForecastDocument>) + Send>),
{
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |result| {
        // The receiver only goes away if this thread stopped waiting.
        let _ = tx.send(result);
    }));
    rx.blocking_recv().map_err(|_| YrError::Cancelled)?
}

/// Builder for [`WeatherClient`] with every collaborator injectable.
#[derive(Debug, Default)]
pub struct WeatherClientBuilder {
    endpoints: Option<EndpointMap>,
    fetcher: Option<Arc<dyn Fetch>>,
    runtime: Option<Handle>,
    max_redirects: Option<usize>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl WeatherClientBuilder {
    /// Builder preloaded with endpoint overrides and HTTP settings from `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::default()
            .endpoints(config.endpoint_map())
            .max_redirects(config.http.max_redirects);

        if let Some(secs) = config.http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(ua) = &config.http.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        builder
    }

    pub fn endpoints(mut self, endpoints: EndpointMap) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Transport to use instead of a freshly built `reqwest::Client`.
    ///
    /// When set, `max_redirects`, `timeout` and `user_agent` are ignored.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn http_client(self, client: Client) -> Self {
        self.fetcher(Arc::new(client))
    }

    /// Runtime that runs requests. Defaults to the runtime the builder is called from.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<WeatherClient> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| YrError::NoRuntime)?,
        };

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let max_redirects = self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS);
                let user_agent =
                    self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
                let mut http = Client::builder()
                    .redirect(Policy::limited(max_redirects))
                    .user_agent(user_agent);
                if let Some(timeout) = self.timeout {
                    http = http.timeout(timeout);
                }
                Arc::new(http.build().map_err(YrError::HttpClient)?)
            }
        };

        Ok(WeatherClient {
            endpoints: self.endpoints.unwrap_or_default(),
            fetcher,
            runtime,
        })
    }
}
