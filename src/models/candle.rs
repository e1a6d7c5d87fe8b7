// ============================================================================
// Structure : Candle (bougie journalière OHLCV)
// ============================================================================
// Représente une journée de trading d'un marché crypto
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : type de chrono pour dates avec timezone UTC
// 2. f64 : floating point 64 bits pour les prix ET les volumes
//    (les volumes crypto sont fractionnaires, contrairement aux actions)
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Une bougie journalière (candlestick)
///
/// Immuable une fois récupérée depuis l'API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Début de la journée de trading (UTC)
    pub timestamp: DateTime<Utc>,

    /// Prix d'ouverture (Open)
    pub open: f64,

    /// Prix le plus haut (High)
    pub high: f64,

    /// Prix le plus bas (Low)
    pub low: f64,

    /// Dernier prix échangé (Close / trade price)
    pub close: f64,

    /// Montant cumulé échangé dans la devise de cotation
    pub acc_trade_price: f64,

    /// Volume cumulé échangé
    pub volume: f64,
}

impl Candle {
    /// Constructeur : crée une nouvelle bougie
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        acc_trade_price: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            acc_trade_price,
            volume,
        }
    }

    /// Vérifie si la bougie est haussière (bullish)
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Vérifie si la bougie est baissière (bearish)
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Variation en pourcentage depuis l'ouverture
    pub fn change_percent(&self) -> f64 {
        if self.open == 0.0 {
            0.0
        } else {
            ((self.close - self.open) / self.open) * 100.0
        }
    }
}

/// Historique de bougies d'un marché
///
/// CONCEPT : Ordre décroissant
/// - Après normalize(), index 0 = journée la plus récente (souvent encore en cours)
/// - index 1 = veille, index 2 = avant-veille, etc.
/// - Les indicateurs travaillent eux en ordre chronologique : voir
///   closes_chronological()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleSeries {
    /// Code du marché (ex: "KRW-BTC")
    pub market: String,

    /// Bougies, triées par timestamp décroissant après normalize()
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(market: String, candles: Vec<Candle>) -> Self {
        Self { market, candles }
    }

    /// Trie les bougies par timestamp strictement décroissant
    ///
    /// L'API ne garantit pas l'ordre. Les doublons de timestamp sont
    /// supprimés (on garde la première occurrence) pour que l'ordre soit strict.
    pub fn normalize(&mut self) {
        // sort_by est stable : la première occurrence d'un doublon reste devant
        self.candles.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.candles.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
    }

    /// Consomme la série et la retourne normalisée
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Retourne le nombre de bougies
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Vérifie si la série est vide
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Retourne la bougie à l'index donné (0 = la plus récente)
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// Retourne la bougie la plus récente
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.first()
    }

    /// Prix de clôture en ordre chronologique (le plus ancien d'abord)
    pub fn closes_chronological(&self) -> Vec<f64> {
        self.candles.iter().rev().map(|c| c.close).collect()
    }

    /// Volumes dans l'ordre de la série (index 0 = le plus récent)
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(offset)
    }

    fn candle_at(offset: i64, close: f64) -> Candle {
        Candle::new(day(offset), close, close, close, close, 0.0, 1.0)
    }

    #[test]
    fn test_candle_bullish() {
        let candle = Candle::new(Utc::now(), 100.0, 112.0, 95.0, 110.0, 0.0, 10.0);
        assert!(candle.is_bullish());
        assert!(!candle.is_bearish());
        assert_eq!(candle.change_percent(), 10.0);
    }

    #[test]
    fn test_candle_bearish() {
        let candle = Candle::new(Utc::now(), 100.0, 105.0, 90.0, 95.0, 0.0, 10.0);
        assert!(candle.is_bearish());
        assert!(!candle.is_bullish());
    }

    #[test]
    fn test_doji_is_neither() {
        let candle = Candle::new(Utc::now(), 100.0, 105.0, 95.0, 100.0, 0.0, 10.0);
        assert!(!candle.is_bullish());
        assert!(!candle.is_bearish());
    }

    #[test]
    fn test_normalize_sorts_descending() {
        let mut series = CandleSeries::new(
            "KRW-BTC".to_string(),
            vec![candle_at(1, 1.0), candle_at(3, 3.0), candle_at(2, 2.0)],
        );
        series.normalize();

        assert_eq!(series.latest().unwrap().close, 3.0);
        assert_eq!(series.get(1).unwrap().close, 2.0);
        assert_eq!(series.get(2).unwrap().close, 1.0);
    }

    #[test]
    fn test_normalize_drops_duplicate_timestamps() {
        let series = CandleSeries::new(
            "KRW-BTC".to_string(),
            vec![candle_at(1, 1.0), candle_at(2, 2.0), candle_at(1, 9.0)],
        )
        .normalized();

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(1).unwrap().close, 1.0);
        assert!(series
            .candles
            .windows(2)
            .all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn test_closes_chronological() {
        let series = CandleSeries::new(
            "KRW-ETH".to_string(),
            vec![candle_at(3, 3.0), candle_at(2, 2.0), candle_at(1, 1.0)],
        );
        assert_eq!(series.closes_chronological(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.volumes(), vec![1.0, 1.0, 1.0]);
    }
}
