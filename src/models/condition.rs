// ============================================================================
// Enum : Condition
// ============================================================================
// Les conditions techniques nommées qu'une stratégie peut exiger
//
// CONCEPT RUST : Enum fermée plutôt que des clés String
// - Le compilateur connaît toutes les conditions possibles
// - Un match sur Condition doit traiter tous les cas
// - L'ordre de déclaration sert d'ordre d'affichage des explications
// ============================================================================

use serde::{Deserialize, Serialize};

/// Condition technique évaluée sur l'historique d'un coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// La veille (index 1) est une bougie haussière
    PreviousDayBullish,
    /// La veille clôture au-dessus du plus haut de l'avant-veille
    BreakoutAbovePriorHigh,
    /// Le prix croise la HMA(20) à la hausse entre la veille et aujourd'hui
    Hma20Crossover,
    /// Volume du jour > 1.5x la moyenne des 10 derniers jours
    VolumeSurge,
    /// HMA(5) strictement croissante sur les 3 derniers points
    ShortTermUptrend,
    /// Cassure de plus de 2% au-dessus du plus haut de l'avant-veille
    StrongBreakout,
    /// Volume de la veille > 1.5x la moyenne des 3 jours précédents
    #[serde(rename = "volume_surge_3day")]
    VolumeSurge3Day,
}

impl Condition {
    /// Toutes les conditions, dans l'ordre de déclaration
    pub const ALL: [Condition; 7] = [
        Condition::PreviousDayBullish,
        Condition::BreakoutAbovePriorHigh,
        Condition::Hma20Crossover,
        Condition::VolumeSurge,
        Condition::ShortTermUptrend,
        Condition::StrongBreakout,
        Condition::VolumeSurge3Day,
    ];

    /// Clé stable (identique au nom sérialisé)
    pub fn key(&self) -> &'static str {
        match self {
            Condition::PreviousDayBullish => "previous_day_bullish",
            Condition::BreakoutAbovePriorHigh => "breakout_above_prior_high",
            Condition::Hma20Crossover => "hma20_crossover",
            Condition::VolumeSurge => "volume_surge",
            Condition::ShortTermUptrend => "short_term_uptrend",
            Condition::StrongBreakout => "strong_breakout",
            Condition::VolumeSurge3Day => "volume_surge_3day",
        }
    }

    /// Libellé lisible pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            Condition::PreviousDayBullish => "Bougie haussière la veille",
            Condition::BreakoutAbovePriorHigh => "Cassure du plus haut précédent",
            Condition::Hma20Crossover => "Croisement HMA(20)",
            Condition::VolumeSurge => "Pic de volume (10 jours)",
            Condition::ShortTermUptrend => "Tendance courte haussière (HMA 5)",
            Condition::StrongBreakout => "Cassure forte (> 2%)",
            Condition::VolumeSurge3Day => "Pic de volume (3 jours)",
        }
    }
}

/// Métriques dérivées calculées avec les conditions
///
/// None = pas assez d'historique, ou métrique non applicable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Valeur actuelle de la HMA(20)
    pub hma20_current: Option<f64>,

    /// Volume du jour / volume moyen, seulement si VolumeSurge est vraie
    pub volume_ratio: Option<f64>,

    /// Dernier RSI(14) des clôtures (informatif)
    pub rsi14: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches_serde_name() {
        for condition in Condition::ALL {
            let json = serde_json::to_string(&condition).unwrap();
            assert_eq!(json, format!("\"{}\"", condition.key()));
        }
    }

    #[test]
    fn test_declaration_order() {
        let mut sorted = Condition::ALL;
        sorted.sort();
        assert_eq!(sorted, Condition::ALL);
    }
}
