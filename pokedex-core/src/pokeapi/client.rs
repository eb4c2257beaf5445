use crate::config::DEFAULT_API_BASE;
use crate::error::PokedexError;
use lazy_static::lazy_static;
use log::debug;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tokio::time::{Duration, Instant};

const USER_AGENT: &str = "pokedex-core/0.1";
const ACCEPT: &str = "application/json, */*";
const POKEAPI_COOLDOWN: Duration = Duration::from_millis(100);
const MAX_API_HISTORY: usize = 100;

#[derive(Debug, Clone)]
pub struct ApiCall {
    pub url: String,
    pub timestamp: OffsetDateTime,
    pub status_code: u16,
    pub success: bool,
    pub call_type: ApiCallType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCallType {
    NetworkRequest,
    CacheHit,
    CacheMiss,
}

// Blocking mutex: the lock is only held to reserve the next call slot
lazy_static! {
    static ref LAST_POKEAPI_CALL: Mutex<Instant> = Mutex::new(Instant::now() - POKEAPI_COOLDOWN);
    static ref API_CALL_HISTORY: Arc<Mutex<Vec<ApiCall>>> = Arc::new(Mutex::new(Vec::new()));
}

#[derive(Debug)]
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new() -> Result<Self, PokedexError> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, PokedexError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(PokeApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path onto the base url
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn call(&self, uri: &str) -> Result<reqwest::Response, PokedexError> {
        let next_call = {
            let mut last = LAST_POKEAPI_CALL
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let next = (*last + POKEAPI_COOLDOWN).max(Instant::now());
            *last = next;
            next
        };
        tokio::time::sleep_until(next_call).await;
        debug!("calling PokeAPI: {}", uri);

        let timestamp = OffsetDateTime::now_utc();
        match self.client.get(uri).send().await {
            Ok(response) => {
                let status = response.status();
                record_api_call(ApiCall {
                    url: uri.to_string(),
                    timestamp,
                    status_code: status.as_u16(),
                    success: status.is_success(),
                    call_type: ApiCallType::NetworkRequest,
                });

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(PokedexError::NotFound(uri.to_string()));
                }
                Ok(response.error_for_status()?)
            }
            Err(e) => {
                record_api_call(ApiCall {
                    url: uri.to_string(),
                    timestamp,
                    status_code: 0, // no response for transport errors
                    success: false,
                    call_type: ApiCallType::NetworkRequest,
                });
                Err(PokedexError::Network(e))
            }
        }
    }

    pub async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, PokedexError> {
        let response = self.call(url).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Get the API call history for debugging purposes
    pub fn get_api_call_history() -> Vec<ApiCall> {
        API_CALL_HISTORY
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn clear_api_call_history() {
        if let Ok(mut history) = API_CALL_HISTORY.lock() {
            history.clear();
        }
    }

    /// Record an in-memory cache lookup alongside real requests
    pub fn record_cache_operation(url: &str, call_type: ApiCallType) {
        record_api_call(ApiCall {
            url: url.to_string(),
            timestamp: OffsetDateTime::now_utc(),
            status_code: 200,
            success: true,
            call_type,
        });
    }
}

fn record_api_call(api_call: ApiCall) {
    if let Ok(mut history) = API_CALL_HISTORY.lock() {
        history.push(api_call);
        if history.len() > MAX_API_HISTORY {
            let excess = history.len() - MAX_API_HISTORY;
            history.drain(0..excess);
        }
    }
}
