use std::time::Duration;

use serde_json::Value;

use crate::transport::{
    ApiError, ApiRequest, ApiTransport, SessionToken, TransportFuture, TransportResult,
    normalize_response,
};

/// HTTP transport over a blocking `ureq` agent; each call runs on the tokio
/// blocking pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
    token: SessionToken,
}

impl UreqTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>, token: SessionToken) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl ApiTransport for UreqTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        let agent = self.agent.clone();
        let url = self.url_for(&request.path);
        let token = self.token.get();

        Box::pin(async move {
            tokio::task::spawn_blocking(move || execute_blocking(&agent, &url, token, request))
                .await
                .map_err(|join_error| {
                    ApiError::Network(format!("transport join failure: {join_error}"))
                })?
        })
    }
}

fn execute_blocking(
    agent: &ureq::Agent,
    url: &str,
    token: Option<String>,
    request: ApiRequest,
) -> TransportResult<Value> {
    let mut call = agent
        .request(request.method.as_str(), url)
        .set("Accept", "application/json");
    for (key, value) in &request.query {
        call = call.query(key, value);
    }
    if let Some(token) = token {
        call = call.set("Authorization", &format!("Bearer {token}"));
    }

    let result = match &request.body {
        Some(body) => call
            .set("Content-Type", "application/json")
            .send_string(&body.to_string()),
        None => call.call(),
    };

    match result {
        Ok(response) => {
            let status = response.status();
            let body = response
                .into_string()
                .map_err(|_| ApiError::InvalidResponse)?;
            normalize_response(status, &body)
        }
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            normalize_response(status, &body)
        }
        Err(ureq::Error::Transport(transport)) => {
            tracing::debug!(
                method = request.method.as_str(),
                path = %request.path,
                error = %transport,
                "transport failure"
            );
            Err(ApiError::Network(transport.to_string()))
        }
    }
}
