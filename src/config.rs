use crate::fees::FixedFee;
use crate::providers::GasCalculation;
use crate::utils::config_loader::{LoadConfigError, load_from_file};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Configuration for the trade aggregation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Base URL of the Symbiosis routing API
    pub symbiosis_api_url: String,
    /// Base URL of the LiFi quote API
    pub lifi_api_url: String,
    /// Per-provider quote timeout in seconds; a provider that does not answer
    /// in time counts as failed, it never stalls the whole calculation
    pub provider_timeout_secs: u64,
    /// Platform fee as a fraction in [0, 1), e.g. 0.003 for 0.3%
    pub platform_fee_percent: f64,
    /// Whether quotes carry gas estimates by default
    pub gas_calculation: GasCalculation,
    /// Optional flat platform fee, only deducted when its token matches the
    /// swap input token
    pub platform_fixed_fee: Option<FixedFee>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            symbiosis_api_url: "https://api.symbiosis.finance/crosschain/".to_string(),
            lifi_api_url: "https://li.quest/".to_string(),
            provider_timeout_secs: 15,
            platform_fee_percent: 0.0,
            gas_calculation: GasCalculation::Enabled,
            platform_fixed_fee: None,
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> eyre::Result<Self> {
        let mut config = Self::default();

        if let Ok(symbiosis_api_url) = std::env::var("SYMBIOSIS_API_URL") {
            let _url = Url::parse(&symbiosis_api_url)
                .map_err(|e| eyre::eyre!("Invalid SYMBIOSIS_API_URL: {}", e))?;
            config.symbiosis_api_url = symbiosis_api_url;
        }

        if let Ok(lifi_api_url) = std::env::var("LIFI_API_URL") {
            let _url = Url::parse(&lifi_api_url)
                .map_err(|e| eyre::eyre!("Invalid LIFI_API_URL: {}", e))?;
            config.lifi_api_url = lifi_api_url;
        }

        if let Ok(timeout_str) = std::env::var("PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout_secs = timeout_str
                .parse()
                .map_err(|e| eyre::eyre!("Invalid PROVIDER_TIMEOUT_SECS: {}", e))?;
        }

        if let Ok(fee_str) = std::env::var("PLATFORM_FEE_PERCENT") {
            config.platform_fee_percent =
                fee_str.parse().map_err(|e| eyre::eyre!("Invalid PLATFORM_FEE_PERCENT: {}", e))?;
        }

        if let Ok(gas_str) = std::env::var("GAS_CALCULATION") {
            config.gas_calculation =
                gas_str.parse().map_err(|e| eyre::eyre!("Invalid GAS_CALCULATION: {}", e))?;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file, with `${VAR}` expansion
    pub async fn load_from_file(file_name: String) -> Result<Self, LoadConfigError> {
        load_from_file(file_name).await
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn symbiosis_url(&self) -> eyre::Result<Url> {
        Url::parse(&self.symbiosis_api_url)
            .map_err(|e| eyre::eyre!("Invalid Symbiosis API URL: {}", e))
    }

    pub fn lifi_url(&self) -> eyre::Result<Url> {
        Url::parse(&self.lifi_api_url).map_err(|e| eyre::eyre!("Invalid LiFi API URL: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.symbiosis_api_url, "https://api.symbiosis.finance/crosschain/");
        assert_eq!(config.lifi_api_url, "https://li.quest/");
        assert_eq!(config.provider_timeout_secs, 15);
        assert_eq!(config.platform_fee_percent, 0.0);
        assert!(config.platform_fixed_fee.is_none());
        assert_eq!(config.gas_calculation, GasCalculation::Enabled);
    }

    #[test]
    fn test_durations_and_urls() {
        let config = AggregatorConfig::default();
        assert_eq!(config.provider_timeout(), Duration::from_secs(15));
        assert!(config.symbiosis_url().is_ok());
        assert!(config.lifi_url().is_ok());

        let broken = AggregatorConfig { lifi_api_url: "not a url".to_string(), ..config };
        assert!(broken.lifi_url().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AggregatorConfig { provider_timeout_secs: 5, ..AggregatorConfig::default() };
        let serialized = toml::to_string(&config).unwrap();
        let parsed: AggregatorConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.provider_timeout_secs, 5);
        assert_eq!(parsed.gas_calculation, GasCalculation::Enabled);
    }
}
