// Shared JSON GET for feed adapters
use crate::application::feed_error::FeedError;
use serde::de::DeserializeOwned;

pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, FeedError> {
    let transport = |e: reqwest::Error| FeedError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(transport)?;

    if !response.status().is_success() {
        return Err(FeedError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await.map_err(transport)?;
    parse_json(url, &body)
}

pub fn parse_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FeedError> {
    serde_json::from_str(body).map_err(|e| FeedError::Malformed {
        url: url.to_string(),
        message: e.to_string(),
    })
}
