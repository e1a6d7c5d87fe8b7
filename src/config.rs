// ============================================================================
// Module : config
// ============================================================================
// Configuration du screener : valeurs par défaut + surcharges par variables
// d'environnement (comme RUST_LOG pour le logging)
//
// Variables reconnues :
// - LAZYSCREENER_BASE_URL  : URL de base de l'API (défaut : Upbit)
// - LAZYSCREENER_QUOTE     : devise de cotation des marchés scannés (défaut : KRW)
// - LAZYSCREENER_CANDLES   : nombre de bougies journalières demandées (défaut : 200)
// - LAZYSCREENER_DELAY_MS  : délai avant chaque requête de bougies (défaut : 200)
// - LAZYSCREENER_LOG_DIR   : répertoire des logs (lu par le binaire)
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScreenerError;
use crate::screener::Strategy;

/// Nombre maximum de bougies par requête côté Upbit
pub const MAX_CANDLES_PER_REQUEST: usize = 200;

/// Configuration du screener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// URL de base de l'API (sans slash final)
    pub base_url: String,

    /// Devise de cotation (ex: "KRW" => marchés "KRW-*")
    pub quote_currency: String,

    /// Nombre de bougies journalières demandées par marché
    pub candle_count: usize,

    /// Délai obligatoire avant chaque requête de bougies (rate limiting)
    pub request_delay: Duration,

    /// User-Agent envoyé à l'API
    pub user_agent: String,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upbit.com/v1".to_string(),
            quote_currency: "KRW".to_string(),
            candle_count: MAX_CANDLES_PER_REQUEST,
            request_delay: Duration::from_millis(200),
            user_agent: format!("lazyscreener/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScreenerConfig {
    /// Charge la configuration depuis l'environnement du process
    pub fn from_env() -> Result<Self, ScreenerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Charge la configuration depuis une source de variables quelconque
    ///
    /// CONCEPT RUST : closure en paramètre (impl Fn)
    /// - from_env() passe std::env::var
    /// - les tests passent une HashMap, sans toucher à l'environnement global
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScreenerError> {
        let mut config = Self::default();

        if let Some(url) = lookup("LAZYSCREENER_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(quote) = lookup("LAZYSCREENER_QUOTE") {
            config.quote_currency = quote.trim().to_uppercase();
        }
        if let Some(raw) = lookup("LAZYSCREENER_CANDLES") {
            config.candle_count = parse_number("LAZYSCREENER_CANDLES", &raw)?;
        }
        if let Some(raw) = lookup("LAZYSCREENER_DELAY_MS") {
            config.request_delay =
                Duration::from_millis(parse_number("LAZYSCREENER_DELAY_MS", &raw)?);
        }

        config.candle_count = clamp_candle_count(config.candle_count);
        debug!(?config, "Loaded screener configuration");
        Ok(config)
    }

    /// Répertoire des logs
    ///
    /// Ordre : LAZYSCREENER_LOG_DIR, puis ~/.local/share/lazyscreener/logs
    /// (dirs::data_local_dir), puis ./logs
    pub fn log_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("LAZYSCREENER_LOG_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("lazyscreener").join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"))
    }
}

/// Borne le nombre de bougies entre le minimum des stratégies et le maximum API
fn clamp_candle_count(count: usize) -> usize {
    count.clamp(Strategy::max_min_candles(), MAX_CANDLES_PER_REQUEST)
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ScreenerError> {
    raw.trim().parse().map_err(|_| ScreenerError::Config {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================
