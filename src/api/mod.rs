// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les sources de données de marché : la liste des coins
// et leurs bougies journalières
// ============================================================================

use async_trait::async_trait;

use crate::models::{Candle, Coin};

pub mod upbit;  // Client API Upbit

// Re-export du client principal
pub use upbit::UpbitClient;

/// Source de données de marché consommée par le screener
///
/// CONCEPT : Frontière qui ne propage pas d'erreur
/// - Un échec réseau ou une réponse vide donne une liste vide
/// - L'implémentation est responsable de logger l'erreur
/// - Le scan continue toujours avec le coin suivant
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Univers de coins, unique par code marché, filtré sur une devise de cotation
    async fn fetch_markets(&self) -> Vec<Coin>;

    /// Jusqu'à `count` bougies journalières récentes, dans un ordre quelconque
    async fn fetch_daily_candles(&self, market: &str, count: usize) -> Vec<Candle>;
}
