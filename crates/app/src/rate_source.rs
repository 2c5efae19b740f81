use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One fetch cycle's worth of rates, all relative to `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

pub trait RateSource: Send + Sync {
    fn fetch(&self, base: &str) -> Result<FetchedRates>;
}

#[derive(Debug, Deserialize)]
struct FxRatesDocument {
    success: bool,
    base: String,
    rates: BTreeMap<String, f64>,
}

/// Source backed by an fxratesapi-style `/latest` endpoint.
pub struct FxRateSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl FxRateSource {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| AppError::Fetch(err.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

impl RateSource for FxRateSource {
    fn fetch(&self, base: &str) -> Result<FetchedRates> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("base", base)])
            .send()
            .map_err(|err| AppError::Fetch(err.to_string()))?;
        if !response.status().is_success() {
            return Err(AppError::Fetch(format!("status {}", response.status())));
        }
        let document: FxRatesDocument = response
            .json()
            .map_err(|err| AppError::Fetch(err.to_string()))?;
        if !document.success {
            return Err(AppError::Fetch("source reported failure".to_string()));
        }
        if document.rates.is_empty() {
            return Err(AppError::Fetch("source returned no rates".to_string()));
        }
        Ok(FetchedRates {
            base: document.base,
            rates: document.rates,
        })
    }
}
