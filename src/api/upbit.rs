// ============================================================================
// API Client : Upbit
// ============================================================================
// Récupère la liste des marchés et les bougies journalières depuis Upbit
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : gestion d'erreurs avec contexte (anyhow)
// 3. Serde : désérialisation JSON automatique
// 4. Trait impl : UpbitClient implémente MarketDataSource
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::MarketDataSource;
use crate::config::ScreenerConfig;
use crate::models::{Candle, Coin};

// ============================================================================
// Structures pour parser la réponse JSON d'Upbit
// ============================================================================
// Upbit retourne des tableaux JSON plats, en snake_case : serde mappe
// directement les champs, sans rename
// ============================================================================

/// Un marché de GET /market/all
#[derive(Debug, Deserialize)]
struct MarketEntry {
    market: String,
    #[serde(default)]
    korean_name: String,
    #[serde(default)]
    english_name: String,
}

/// Une bougie de GET /candles/days
#[derive(Debug, Deserialize)]
struct DayCandleEntry {
    market: String,
    candle_date_time_utc: Option<String>,
    opening_price: f64,
    high_price: f64,
    low_price: f64,
    trade_price: f64,
    timestamp: Option<i64>,
    candle_acc_trade_price: f64,
    candle_acc_trade_volume: f64,
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP pour l'API publique d'Upbit
///
/// CONCEPT : Un seul reqwest::Client pour tout le scan
/// - Le client garde un pool de connexions (keep-alive)
/// - Le cloner est peu coûteux (Arc interne)
#[derive(Debug, Clone)]
pub struct UpbitClient {
    client: reqwest::Client,
    base_url: String,
    quote_currency: String,
}

impl UpbitClient {
    /// Crée un client à partir de la configuration
    pub fn new(config: &ScreenerConfig) -> Result<Self> {
        debug!(base_url = %config.base_url, "Creating HTTP client");
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            quote_currency: config.quote_currency.clone(),
        })
    }

    /// Récupère les marchés cotés dans la devise configurée
    #[instrument(skip(self), fields(quote = %self.quote_currency))]
    pub async fn try_fetch_markets(&self) -> Result<Vec<Coin>> {
        let url = format!("{}/market/all?isDetails=false", self.base_url);
        let entries: Vec<MarketEntry> = self.get_json(&url).await?;

        let total = entries.len();
        let coins = filter_markets(entries, &self.quote_currency);
        info!(total, kept = coins.len(), "Fetched market list");
        Ok(coins)
    }

    /// Récupère jusqu'à `count` bougies journalières pour un marché
    ///
    /// L'ordre retourné par l'API n'est pas garanti : c'est CandleSeries::normalize()
    /// qui trie.
    #[instrument(skip(self))]
    pub async fn try_fetch_daily_candles(&self, market: &str, count: usize) -> Result<Vec<Candle>> {
        let url = build_candles_url(&self.base_url, market, count);
        let entries: Vec<DayCandleEntry> = self.get_json(&url).await?;
        let candles = parse_day_candles(entries);

        debug!(candles = candles.len(), "Fetched daily candles");
        Ok(candles)
    }

    /// GET + vérification du statut + parsing JSON
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "Sending HTTP request to Upbit");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Échec de la requête HTTP vers Upbit")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Upbit returned error status");
            anyhow::bail!("Upbit a retourné une erreur : HTTP {}", status);
        }

        response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse Upbit")
    }
}

#[async_trait]
impl MarketDataSource for UpbitClient {
    async fn fetch_markets(&self) -> Vec<Coin> {
        match self.try_fetch_markets().await {
            Ok(coins) => coins,
            Err(e) => {
                error!(error = ?e, "Failed to fetch market list");
                Vec::new()
            }
        }
    }

    async fn fetch_daily_candles(&self, market: &str, count: usize) -> Vec<Candle> {
        match self.try_fetch_daily_candles(market, count).await {
            Ok(candles) => candles,
            Err(e) => {
                warn!(market = %market, error = ?e, "Failed to fetch daily candles");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Fonctions de conversion
// ============================================================================

fn build_candles_url(base_url: &str, market: &str, count: usize) -> String {
    format!("{}/candles/days?market={}&count={}", base_url, market, count)
}

/// Garde uniquement les marchés "<quote>-*" et les convertit en Coin
///
/// Les doublons de code marché sont ignorés (premier gardé).
fn filter_markets(entries: Vec<MarketEntry>, quote: &str) -> Vec<Coin> {
    let mut seen = std::collections::HashSet::new();

    entries
        .into_iter()
        .map(|e| Coin::new(e.market, e.korean_name, e.english_name))
        .filter(|coin| coin.is_quoted_in(quote))
        .filter(|coin| seen.insert(coin.market.clone()))
        .collect()
}

/// Convertit les bougies Upbit en Candle, en ignorant les lignes sans date
fn parse_day_candles(entries: Vec<DayCandleEntry>) -> Vec<Candle> {
    let total = entries.len();
    let mut skipped_count = 0;
    let mut candles = Vec::with_capacity(total);

    for entry in entries {
        let Some(timestamp) = parse_candle_time(&entry) else {
            skipped_count += 1;
            continue;
        };

        candles.push(Candle::new(
            timestamp,
            entry.opening_price,
            entry.high_price,
            entry.low_price,
            entry.trade_price,
            entry.candle_acc_trade_price,
            entry.candle_acc_trade_volume,
        ));
    }

    if skipped_count > 0 {
        warn!(skipped = skipped_count, total, "Skipped candles with invalid timestamp");
    }

    candles
}

/// Date de la bougie : candle_date_time_utc, sinon le timestamp epoch (ms)
fn parse_candle_time(entry: &DayCandleEntry) -> Option<DateTime<Utc>> {
    let from_utc_string = entry.candle_date_time_utc.as_deref().and_then(|s| {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    });

    from_utc_string.or_else(|| {
        debug!(market = %entry.market, "Falling back to epoch timestamp");
        entry.timestamp.and_then(DateTime::from_timestamp_millis)
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================
