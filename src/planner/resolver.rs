use serde::Serialize;
use thiserror::Error;

use crate::entities::Coordinates;
use crate::external::{Geocoder, ServiceError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    NotConfigured,
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{}", describe(.reason, .label, .address))]
pub struct ResolutionError {
    pub reason: Reason,
    pub address: String,
    /// Who the address belongs to, e.g. the customer name or "origin".
    pub label: String,
    pub detail: Option<String>,
}

fn describe(reason: &Reason, label: &str, address: &str) -> String {
    match reason {
        Reason::NotConfigured => "routing service is not configured".into(),
        Reason::NotFound => format!("could not locate address for {}: {:?}", label, address),
    }
}

/// Geocodes one address and keeps the first candidate. There is no retry.
#[tracing::instrument(skip(geocoder))]
pub async fn resolve(
    geocoder: &(dyn Geocoder + Send + Sync),
    label: &str,
    address: &str,
) -> Result<Coordinates, ResolutionError> {
    let failure = |reason, detail: Option<String>| ResolutionError {
        reason,
        address: address.to_string(),
        label: label.to_string(),
        detail,
    };

    let address = address.trim();
    if address.is_empty() {
        return Err(failure(Reason::NotFound, Some("empty address".into())));
    }

    match geocoder.geocode(address).await {
        Ok(candidates) => candidates
            .into_iter()
            .next()
            .ok_or_else(|| failure(Reason::NotFound, None)),
        Err(ServiceError::NotConfigured) => Err(failure(Reason::NotConfigured, None)),
        Err(err) => Err(failure(Reason::NotFound, Some(err.to_string()))),
    }
}
