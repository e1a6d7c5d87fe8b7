// ============================================================================
// Structure : ScreeningResult
// ============================================================================
// Un coin qui a passé la règle d'une stratégie pendant un scan
//
// CONCEPTS RUST :
// 1. Composition : ScreeningResult contient le Coin et sa CandleSeries
// 2. Option : prix et métriques peuvent manquer
// 3. Durée de vie : gardé en mémoire le temps du scan, jamais persisté
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::{CandleSeries, Coin, Condition, Metrics};

/// Résultat de screening pour un coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// Le marché concerné
    pub coin: Coin,

    /// Historique normalisé (index 0 = le plus récent)
    pub candles: CandleSeries,

    /// Conditions satisfaites, dans l'ordre de déclaration de Condition
    pub conditions: Vec<Condition>,

    /// Prix actuel (close de la bougie la plus récente)
    pub current_price: Option<f64>,

    /// Métriques dérivées (HMA, ratio de volume, RSI)
    pub metrics: Option<Metrics>,
}

impl ScreeningResult {
    pub fn new(
        coin: Coin,
        candles: CandleSeries,
        conditions: Vec<Condition>,
        metrics: Option<Metrics>,
    ) -> Self {
        let current_price = candles.latest().map(|c| c.close);
        Self {
            coin,
            candles,
            conditions,
            current_price,
            metrics,
        }
    }

    /// Nombre de conditions satisfaites (sert au classement)
    pub fn score(&self) -> usize {
        self.conditions.len()
    }

    /// Libellés des conditions satisfaites
    pub fn labels(&self) -> Vec<&'static str> {
        self.conditions.iter().map(|c| c.label()).collect()
    }

    /// Variation de la journée en cours en pourcentage
    pub fn change_percent(&self) -> Option<f64> {
        self.candles.latest().map(|c| c.change_percent())
    }

    /// Formatte le résultat pour l'affichage dans le terminal
    ///
    /// Format : "KRW-BTC    Bitcoin          95000000.00  ▲ +2.11%  [3] Bougie haussière la veille, ..."
    ///
    /// Note : Le nom est tronqué à 16 caractères pour garder les colonnes alignées
    pub fn display(&self) -> String {
        let price_str = match self.current_price {
            Some(price) => format!("{:.2}", price),
            None => "N/A".to_string(),
        };

        let change_str = match self.change_percent() {
            Some(change) => {
                let arrow = if change >= 0.0 { "▲" } else { "▼" };
                format!("{} {:+.2}%", arrow, change)
            }
            None => String::new(),
        };

        let name = self.coin.display_name();
        let truncated_name = if name.chars().count() <= 16 {
            name.to_string()
        } else {
            let truncated: String = name.chars().take(15).collect();
            format!("{}…", truncated)
        };

        format!(
            "{:<10} {:<16} {:>16}  {:<10} [{}] {}",
            self.coin.market,
            truncated_name,
            price_str,
            change_str,
            self.score(),
            self.labels().join(", ")
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
