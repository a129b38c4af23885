//! Fetches the decorative fact shown next to the expense form.

use serde::Deserialize;

use crate::Error;

/// The public endpoint that returns a random cat fact.
pub const DEFAULT_FACT_URL: &str = "https://catfact.ninja/fact";

/// Shown in place of the fact when it cannot be fetched.
pub const FACT_FALLBACK: &str = "Error while getting fact";

#[derive(Debug, Deserialize)]
struct CatFact {
    fact: String,
}

/// A client for the fact endpoint.
#[derive(Debug, Clone)]
pub struct FactClient {
    client: reqwest::Client,
    url: String,
}

impl FactClient {
    /// Create a client that fetches facts from `url`.
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_owned(),
        }
    }

    /// Fetch one fact.
    ///
    /// # Errors
    /// Returns [Error::FactFetchError] if the request fails, the server responds with an error
    /// status, or the response body is not a JSON object with a `fact` string.
    pub async fn fetch(&self) -> Result<String, Error> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::FactFetchError(error.to_string()))?;

        let cat_fact: CatFact = response
            .json()
            .await
            .map_err(|error| Error::FactFetchError(error.to_string()))?;

        Ok(cat_fact.fact)
    }

    /// Fetch one fact, or [FACT_FALLBACK] if that fails.
    pub async fn fetch_or_fallback(&self) -> String {
        match self.fetch().await {
            Ok(fact) => fact,
            Err(error) => {
                tracing::warn!("Could not get a fact from {}: {error}", self.url);
                FACT_FALLBACK.to_owned()
            }
        }
    }
}
