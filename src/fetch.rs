//! HTTP plumbing shared by every StoreRate API client

use log::{debug, error, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use crate::auth::SessionStore;
use crate::config::ClientOptions;
use crate::error::Error;

/// Normalize a response payload: a body wrapped one level under `data` is
/// unwrapped, anything else passes through. Applied once, right after the
/// transport call, so nothing downstream sees the wrapper.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode a response body, accepting either envelope shape
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    let value: Value = serde_json::from_slice(body)?;
    Ok(serde_json::from_value(unwrap_envelope(value))?)
}

/// Pull the server's reason out of an error body (`{"error": ...}` or `{"message": ...}`)
pub fn error_reason(body: &str) -> Option<String> {
    let value = unwrap_envelope(serde_json::from_str(body).ok()?);
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Deserialize an identifier sent either as a JSON number or a string
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Int(i) => i.to_string(),
        Id::Float(f) => f.to_string(),
    })
}

/// Like [`string_or_number`] for optional fields; `null` maps to `None`
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

/// Deserialize a numeric aggregate that may arrive as a number, a numeric
/// string (e.g. `"4.50"`), or `null` (treated as zero)
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Num {
        Float(f64),
        Str(String),
    }

    match Option::<Num>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Num::Float(f)) => Ok(f),
        Some(Num::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Integer counterpart of [`lenient_f64`]
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Num {
        Int(u64),
        Str(String),
    }

    match Option::<Num>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Num::Int(i)) => Ok(i),
        Some(Num::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Add bearer authentication only when a token is given
    pub fn maybe_bearer_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer_auth(token),
            None => self,
        }
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Whether an `Authorization` header will be sent
    pub fn has_auth(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        debug!("{} {}", self.method, url);

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and return the response if its status is a success
    async fn send_checked(&self) -> Result<Response, Error> {
        let response = self.build()?.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let reason = error_reason(&text);
            debug!("{} {} failed with {}: {:?}", self.method, self.url, status, reason);
            return Err(Error::api(status, reason));
        }

        Ok(response)
    }

    /// Execute the request and decode the (possibly enveloped) JSON body
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.send_checked().await?;
        let bytes = response.bytes().await?;
        decode(&bytes)
    }

    /// Execute the request, ignoring whatever the body contains
    pub async fn execute_empty(&self) -> Result<(), Error> {
        self.send_checked().await?;
        Ok(())
    }

    /// Execute the request; an empty success body decodes to `None`
    pub async fn execute_optional<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        let response = self.send_checked().await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        decode(&bytes).map(Some)
    }
}

/// Everything an API client needs to talk to the backend: base URL, HTTP
/// client and the shared session the bearer credential is read from.
#[derive(Clone, Debug)]
pub struct ApiContext {
    base_url: String,
    client: Client,
    session: SessionStore,
    clear_session_on_unauthorized: bool,
}

impl ApiContext {
    pub fn new(client: Client, session: SessionStore, options: &ClientOptions) -> Self {
        Self {
            base_url: options.api_url.trim_end_matches('/').to_string(),
            client,
            session,
            clear_session_on_unauthorized: options.clear_session_on_unauthorized,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request; the session token is read now, at call time.
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        let token = self.session.token();
        FetchBuilder::new(&self.client, &self.url(path), method).maybe_bearer_auth(token.as_deref())
    }

    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::POST, path)
    }

    /// POST without the session credential, for the endpoints that create one
    pub fn post_anonymous(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.client, &self.url(path), Method::POST)
    }

    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::PUT, path)
    }

    /// Execute and decode, applying the unauthorized-response policy
    pub async fn execute<T: DeserializeOwned>(&self, builder: FetchBuilder<'_>) -> Result<T, Error> {
        let sent_auth = builder.has_auth();
        let result = builder.execute::<T>().await;
        self.observe(sent_auth, result)
    }

    /// Like [`ApiContext::execute`], but an empty body yields `None`
    pub async fn execute_optional<T: DeserializeOwned>(
        &self,
        builder: FetchBuilder<'_>,
    ) -> Result<Option<T>, Error> {
        let sent_auth = builder.has_auth();
        let result = builder.execute_optional::<T>().await;
        self.observe(sent_auth, result)
    }

    /// Execute, discard the body, apply the unauthorized-response policy
    pub async fn execute_empty(&self, builder: FetchBuilder<'_>) -> Result<(), Error> {
        let sent_auth = builder.has_auth();
        let result = builder.execute_empty().await;
        self.observe(sent_auth, result)
    }

    fn observe<T>(&self, sent_auth: bool, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(ref e) = result {
            if e.is_unauthorized() && sent_auth && self.clear_session_on_unauthorized {
                warn!("Backend rejected the session token, signing out");
                if let Err(clear_err) = self.session.clear_session() {
                    error!("Failed to clear session: {}", clear_err);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes_decode_identically() {
        let raw: Vec<u32> = decode(br#"[1, 2, 3]"#).unwrap();
        let wrapped: Vec<u32> = decode(br#"{"data": [1, 2, 3]}"#).unwrap();
        assert_eq!(raw, wrapped);
    }

    #[test]
    fn test_single_element_array_is_not_unwrapped() {
        let value: Value = decode(br#"[{"id": 1}]"#).unwrap();
        assert_eq!(value, json!([{"id": 1}]));
        let value: Value = decode(br#"{"data": null}"#).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_error_reason() {
        assert_eq!(error_reason(r#"{"error":"Invalid credentials"}"#), Some("Invalid credentials".to_string()));
        assert_eq!(error_reason(r#"{"message":"Not found"}"#), Some("Not found".to_string()));
        assert_eq!(error_reason(r#"{"data":{"error":"nested"}}"#), Some("nested".to_string()));
        assert_eq!(error_reason("<html>502</html>"), None);
        assert_eq!(error_reason(r#"{"error":""}"#), None);
    }

    #[test]
    fn test_lenient_numbers() {
        #[derive(Deserialize)]
        struct Agg {
            #[serde(deserialize_with = "lenient_f64")]
            avg: f64,
            #[serde(deserialize_with = "lenient_u64")]
            total: u64,
            #[serde(deserialize_with = "opt_string_or_number", default)]
            owner: Option<String>,
        }

        let agg: Agg = serde_json::from_value(json!({"avg": "4.50", "total": "3", "owner": 9})).unwrap();
        assert_eq!(agg.avg, 4.5);
        assert_eq!(agg.total, 3);
        assert_eq!(agg.owner.as_deref(), Some("9"));

        let agg: Agg = serde_json::from_value(json!({"avg": null, "total": 0, "owner": null})).unwrap();
        assert_eq!(agg.avg, 0.0);
        assert!(agg.owner.is_none());
    }

    #[test]
    fn test_bearer_only_when_token() {
        let client = Client::new();
        let anon = FetchBuilder::new(&client, "http://localhost/api/stores", Method::GET)
            .maybe_bearer_auth(None);
        assert!(!anon.has_auth());
        let authed = FetchBuilder::new(&client, "http://localhost/api/stores", Method::GET)
            .maybe_bearer_auth(Some("tok"));
        assert!(authed.has_auth());
    }

    #[test]
    fn test_anonymous_post_ignores_session() {
        let session = SessionStore::in_memory();
        session
            .set_session("tok", crate::auth::Role::NormalUser, "1")
            .unwrap();
        let ctx = ApiContext::new(Client::new(), session, &ClientOptions::default());
        assert!(ctx.post("/ratings").has_auth());
        assert!(!ctx.post_anonymous("/auth/login").has_auth());
    }
}
