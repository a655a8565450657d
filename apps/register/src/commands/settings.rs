//! # Settings Commands

use kantan_core::validation::parse_tax_rate;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::RegisterState;

/// Settings DTO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    /// Fraction, e.g. 0.1
    pub tax_rate: f64,
    /// For display, e.g. 10
    pub tax_percent: f64,
}

pub async fn get_settings(state: &RegisterState) -> SettingsDto {
    debug!("get_settings command");
    let register = state.lock().await;
    let rate = register.settings().tax_rate;
    SettingsDto {
        tax_rate: rate.fraction(),
        tax_percent: rate.percentage(),
    }
}

/// Sets the tax rate from text such as `0.08`, `8` or `8%`.
pub async fn set_tax_rate(state: &RegisterState, input: String) -> Result<SettingsDto, ApiError> {
    debug!(input = %input, "set_tax_rate command");
    let rate = parse_tax_rate(&input)?;

    let mut register = state.lock().await;
    let settings = register.set_tax_rate(rate).await?;
    Ok(SettingsDto {
        tax_rate: settings.tax_rate.fraction(),
        tax_percent: settings.tax_rate.percentage(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_tax_rate_commands() {
        let state = test_support::state().await;
        assert!((get_settings(&state).await.tax_percent - 10.0).abs() < 1e-9);

        let dto = set_tax_rate(&state, "8%".to_string()).await.unwrap();
        assert!((dto.tax_rate - 0.08).abs() < 1e-9);

        let err = set_tax_rate(&state, "120".to_string()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTaxRate);
        assert!((get_settings(&state).await.tax_percent - 8.0).abs() < 1e-9);
    }
}
