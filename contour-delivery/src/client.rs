//! Delivery API client implementation.

use contour_core::{ActionResponse, ContentEntity, ContentLink, ContentReference, PathResponse};
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ACTION_SERVICE, CONTENT_SERVICE, SITE_SERVICE};
use crate::{
    ApiRequest, ApiResponse, DeliveryConfig, DeliveryError, Interceptor, LoggingInterceptor,
    ReqwestTransport, Result, Transport, Website, WebsiteList,
};

/// Client for the content delivery API.
///
/// Clones share configuration, transport, edit mode flag, error counter and
/// the cached website list.
#[derive(Clone)]
pub struct DeliveryClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: DeliveryConfig,
    base_url: String,
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    edit_mode: AtomicBool,
    error_counter: AtomicI64,
    websites: OnceCell<WebsiteList>,
}

impl DeliveryClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: DeliveryConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Create a client builder.
    pub fn builder(config: DeliveryConfig) -> DeliveryClientBuilder {
        DeliveryClientBuilder {
            config,
            transport: None,
            interceptors: Vec::new(),
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &DeliveryConfig {
        &self.inner.config
    }

    /// Whether network access is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.config.disabled
    }

    /// Whether requests are made in edit mode.
    pub fn is_in_edit_mode(&self) -> bool {
        self.inner.edit_mode.load(Ordering::Acquire)
    }

    /// Switch edit mode, which asks the CMS for uncached draft content.
    pub fn set_edit_mode(&self, edit_mode: bool) -> &Self {
        self.inner.edit_mode.store(edit_mode, Ordering::Release);
        self
    }

    /// Number of network error entities created so far.
    pub fn error_count(&self) -> i64 {
        self.inner.error_counter.load(Ordering::Relaxed)
    }

    /// Resolve a routed path, such as `/en/products/widget/`.
    ///
    /// Transport failures yield a network error entity whose link url is
    /// `path`.
    pub async fn fetch_by_path(&self, path: &str) -> Result<PathResponse> {
        self.ensure_enabled()?;
        let mut url = self.url(path)?;
        self.expand(&mut url);

        let result = self.get_json::<Value>(url).await.and_then(decode_path_response);
        self.recover(result, |e| PathResponse::Content(self.network_error(path, &e)))
    }

    /// Fetch the item a reference points to.
    ///
    /// Returns `None` without touching the network when the reference has
    /// neither a GUID nor a route. Action responses are unwrapped to the
    /// content they were invoked on.
    pub async fn fetch_by_reference(
        &self,
        reference: &ContentReference,
        force_guid: bool,
    ) -> Result<Option<ContentEntity>> {
        let link = match reference {
            ContentReference::Path(api_id) if !api_id.is_empty() => {
                return self.fetch_by_ref(api_id).await.map(Some);
            }
            other => match other.link() {
                Some(link) if !link.is_empty() => link,
                _ => {
                    if self.inner.config.debug {
                        warn!(?reference, "Loading content for an empty reference");
                    }
                    return Ok(None);
                }
            },
        };
        self.ensure_enabled()?;

        let use_guid = link.guid().is_some() && (self.inner.config.prefer_guid || force_guid);
        let mut url = match (use_guid, link.guid(), link.route()) {
            (true, Some(guid), _) => self.url(&format!("{CONTENT_SERVICE}{guid}"))?,
            (_, _, Some(route)) => match self.url(route) {
                Ok(url) => url,
                Err(_) => self.url(&format!("{CONTENT_SERVICE}{}", link.api_id(true, false)?))?,
            },
            _ => self.url(&format!("{CONTENT_SERVICE}{}", link.api_id(true, false)?))?,
        };
        self.expand(&mut url);

        let result = self
            .get_json::<Value>(url)
            .await
            .and_then(decode_path_response)
            .map(|response| Some(response.into_content()));
        self.recover(result, |e| Some(self.network_error("", &e)))
    }

    /// Fetch an item by its raw API id.
    pub async fn fetch_by_ref(&self, api_id: &str) -> Result<ContentEntity> {
        self.ensure_enabled()?;
        let mut url = self.url(&format!("{CONTENT_SERVICE}{api_id}"))?;
        self.expand(&mut url);

        let result = self.get_json::<ContentEntity>(url).await;
        self.recover(result, |e| self.network_error("", &e))
    }

    /// Fetch the children of an item; transport failures yield an empty list.
    pub async fn fetch_children(&self, reference: &ContentReference) -> Result<Vec<ContentEntity>> {
        self.fetch_related(reference, "children").await
    }

    /// Fetch the ancestors of an item; transport failures yield an empty list.
    pub async fn fetch_ancestors(&self, reference: &ContentReference) -> Result<Vec<ContentEntity>> {
        self.fetch_related(reference, "ancestors").await
    }

    /// Fetch several items in one request.
    ///
    /// An empty input returns an empty list without a request; transport
    /// failures also yield an empty list.
    pub async fn fetch_by_references<S: AsRef<str>>(&self, references: &[S]) -> Result<Vec<ContentEntity>> {
        if references.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_enabled()?;

        let joined = references.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let mut url = self.url(CONTENT_SERVICE)?;
        url.query_pairs_mut().append_pair("references", &joined);
        self.expand(&mut url);

        let result = self.get_json::<Vec<ContentEntity>>(url).await;
        self.recover(result, |_| Vec::new())
    }

    /// Invoke a (case sensitive) controller method on the content's controller.
    ///
    /// Failures propagate.
    pub async fn invoke_method<B>(
        &self,
        content: &ContentLink,
        method: &str,
        verb: Method,
        body: Option<&B>,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        self.invoke(content, method, verb, body).await
    }

    /// Strongly typed variant of [`invoke_method`](Self::invoke_method).
    pub async fn invoke_typed_method<TOut, TIn>(
        &self,
        content: &ContentLink,
        method: &str,
        verb: Method,
        body: Option<&TIn>,
    ) -> Result<ActionResponse<TOut>>
    where
        TOut: DeserializeOwned,
        TIn: Serialize + ?Sized,
    {
        self.invoke(content, method, verb, body).await
    }

    /// All websites registered in the CMS, fetched once per client.
    pub async fn websites(&self) -> Result<WebsiteList> {
        let websites = self
            .inner
            .websites
            .get_or_try_init(|| async {
                self.ensure_enabled()?;
                let url = self.url(SITE_SERVICE)?;
                self.get_json::<WebsiteList>(url).await
            })
            .await?;
        Ok(websites.clone())
    }

    /// The first registered website.
    pub async fn website(&self) -> Result<Option<Website>> {
        Ok(self.websites().await?.into_iter().next())
    }

    async fn fetch_related(&self, reference: &ContentReference, relation: &str) -> Result<Vec<ContentEntity>> {
        self.ensure_enabled()?;
        let api_id = reference.api_id(true, false)?;
        let mut url = self.url(&format!("{CONTENT_SERVICE}{api_id}/{relation}"))?;
        self.expand(&mut url);

        let result = self.get_json::<Vec<ContentEntity>>(url).await;
        self.recover(result, |_| Vec::new())
    }

    async fn invoke<T, B>(&self, content: &ContentLink, method: &str, verb: Method, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.ensure_enabled()?;
        let url = self.url(&format!("{ACTION_SERVICE}{}/{method}", content.guid_value))?;

        let mut request = self.request(verb, url);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.execute(request).await?.json()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.execute(self.request(Method::GET, url)).await?.json()
    }

    /// Build a request carrying the default headers.
    fn request(&self, method: Method, url: Url) -> ApiRequest {
        let config = &self.inner.config;
        let mut request = ApiRequest::new(method, url)
            .header("Accept", "application/json")
            .header("Accept-Language", &config.default_language);
        for (name, value) in &config.default_headers {
            request = request.header(name, value);
        }
        request
    }

    /// Run a request through the interceptors and the transport.
    async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        self.ensure_enabled()?;

        if self.is_in_edit_mode() {
            let prevent_cache = rand::random_range(0..=100_000_000u32);
            request = request
                .query("epieditmode", "True")
                .query("preventCache", &prevent_cache.to_string());
        }

        for interceptor in &self.inner.interceptors {
            request = interceptor.intercept_request(request).await?;
        }

        let url = request.url().clone();
        let mut response = self.inner.transport.send(request).await.inspect_err(|e| {
            if self.inner.config.debug {
                debug!(%url, error = %e, "HTTP fetch error");
            }
        })?;

        for interceptor in &self.inner.interceptors {
            response = interceptor.intercept_response(response).await?;
        }

        response.error_for_status()
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.is_disabled() {
            return Err(DeliveryError::ClientDisabled);
        }
        Ok(())
    }

    /// Join `path` onto the base url with exactly one `/` between them.
    fn url(&self, path: &str) -> Result<Url> {
        let joined = match path.strip_prefix('/') {
            Some(rest) => format!("{}/{}", self.inner.base_url, rest),
            None => format!("{}/{}", self.inner.base_url, path),
        };
        Url::parse(&joined).map_err(|e| DeliveryError::InvalidUrl(format!("{joined}: {e}")))
    }

    fn expand(&self, url: &mut Url) {
        if self.inner.config.auto_expand_requests {
            url.query_pairs_mut().append_pair("expand", "*");
        }
    }

    /// Swap transport failures for `fallback`, propagate everything else.
    fn recover<T>(&self, result: Result<T>, fallback: impl FnOnce(DeliveryError) -> T) -> Result<T> {
        match result {
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Content request failed");
                Ok(fallback(e))
            }
            other => other,
        }
    }

    fn network_error(&self, path: &str, error: &DeliveryError) -> ContentEntity {
        let error_id = self.inner.error_counter.fetch_add(1, Ordering::Relaxed) + 1;
        ContentEntity::network_error(error_id, path, error.to_string())
    }
}

fn decode_path_response(value: Value) -> Result<PathResponse> {
    PathResponse::from_value(value).map_err(|e| DeliveryError::Json(e.to_string()))
}

impl fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("base_url", &self.inner.base_url)
            .field("disabled", &self.is_disabled())
            .field("edit_mode", &self.is_in_edit_mode())
            .field("interceptors", &self.inner.interceptors.len())
            .finish()
    }
}

/// Builder for [`DeliveryClient`].
pub struct DeliveryClientBuilder {
    config: DeliveryConfig,
    transport: Option<Arc<dyn Transport>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl DeliveryClientBuilder {
    /// Use a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Add an interceptor; interceptors run in the order they were added.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DeliveryClient> {
        let base_url = self.config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| DeliveryError::InvalidUrl(format!("{base_url}: {e}")))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };

        let mut interceptors = self.interceptors;
        if self.config.debug {
            interceptors.insert(0, Arc::new(LoggingInterceptor::new()));
        }

        Ok(DeliveryClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                base_url,
                transport,
                interceptors,
                edit_mode: AtomicBool::new(false),
                error_counter: AtomicI64::new(0),
                websites: OnceCell::new(),
            }),
        })
    }
}
