// ============================================================================
// Enum : Strategy
// ============================================================================
// Les cinq stratégies de screening, chacune une règle de combinaison sur
// les conditions de l'évaluateur
//
// CONCEPT RUST : Enum + FromStr au lieu d'un dispatch par String
// - Le nom reçu de l'extérieur est parsé UNE fois (FromStr)
// - Ensuite, un match exhaustif : impossible d'oublier une stratégie
// - Un nom inconnu devient ScreenerError::InvalidStrategy, sans repli silencieux
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScreenerError;
use crate::models::Condition;
use crate::screener::ConditionSet;

/// Stratégie de screening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Combinée : 2 signaux de prix sur 3 ET au moins 1 confirmation
    All,
    /// Veille haussière ET cassure du plus haut précédent
    BullishBreakout,
    /// Croisement du prix au-dessus de la HMA(20)
    HmaCrossover,
    /// Croisement HMA(20) ET pic de volume ET tendance courte (les trois)
    PremiumHma,
    /// Cassure haussière ET (pic de volume 3 jours OU cassure forte)
    PremiumBullish,
}

/// Signaux de prix de la stratégie combinée (au moins 2 requis)
const ALL_PRICE_SIGNALS: [Condition; 3] = [
    Condition::PreviousDayBullish,
    Condition::BreakoutAbovePriorHigh,
    Condition::Hma20Crossover,
];

/// Confirmations de la stratégie combinée (au moins 1 requise)
const ALL_CONFIRMATIONS: [Condition; 3] = [
    Condition::VolumeSurge,
    Condition::ShortTermUptrend,
    Condition::StrongBreakout,
];

/// Verdict d'une stratégie pour un coin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub passed: bool,
    /// Conditions satisfaites, dans l'ordre de déclaration
    pub explanation: Vec<Condition>,
}

impl Strategy {
    /// Toutes les stratégies
    pub const ALL: [Strategy; 5] = [
        Strategy::All,
        Strategy::BullishBreakout,
        Strategy::HmaCrossover,
        Strategy::PremiumHma,
        Strategy::PremiumBullish,
    ];

    /// Nom externe (CLI, logs, JSON)
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::All => "all",
            Strategy::BullishBreakout => "bullish_breakout",
            Strategy::HmaCrossover => "hma_crossover",
            Strategy::PremiumHma => "premium_hma",
            Strategy::PremiumBullish => "premium_bullish",
        }
    }

    /// Nombre minimum de bougies ; en dessous, le coin est ignoré
    pub fn min_candles(&self) -> usize {
        match self {
            Strategy::All => 22,
            Strategy::BullishBreakout => 3,
            Strategy::HmaCrossover => 22,
            Strategy::PremiumHma => 22,
            Strategy::PremiumBullish => 5,
        }
    }

    /// Plus grand minimum parmi toutes les stratégies
    pub fn max_min_candles() -> usize {
        Strategy::ALL
            .iter()
            .map(Strategy::min_candles)
            .max()
            .unwrap_or(0)
    }

    /// Conditions à évaluer pour cette stratégie (les autres ne sont pas calculées)
    pub fn required_conditions(&self) -> &'static [Condition] {
        match self {
            Strategy::All => &[
                Condition::PreviousDayBullish,
                Condition::BreakoutAbovePriorHigh,
                Condition::Hma20Crossover,
                Condition::VolumeSurge,
                Condition::ShortTermUptrend,
                Condition::StrongBreakout,
            ],
            Strategy::BullishBreakout => &[
                Condition::PreviousDayBullish,
                Condition::BreakoutAbovePriorHigh,
            ],
            Strategy::HmaCrossover => &[Condition::Hma20Crossover],
            Strategy::PremiumHma => &[
                Condition::Hma20Crossover,
                Condition::VolumeSurge,
                Condition::ShortTermUptrend,
            ],
            Strategy::PremiumBullish => &[
                Condition::PreviousDayBullish,
                Condition::BreakoutAbovePriorHigh,
                Condition::StrongBreakout,
                Condition::VolumeSurge3Day,
            ],
        }
    }

    /// Règle de passage
    pub fn passes(&self, set: &ConditionSet) -> bool {
        let met = |c: Condition| set.is_met(c);

        match self {
            Strategy::All => {
                set.count_met(&ALL_PRICE_SIGNALS) >= 2 && set.count_met(&ALL_CONFIRMATIONS) >= 1
            }
            Strategy::BullishBreakout => {
                met(Condition::PreviousDayBullish) && met(Condition::BreakoutAbovePriorHigh)
            }
            Strategy::HmaCrossover => met(Condition::Hma20Crossover),
            Strategy::PremiumHma => {
                met(Condition::Hma20Crossover)
                    && met(Condition::VolumeSurge)
                    && met(Condition::ShortTermUptrend)
            }
            Strategy::PremiumBullish => {
                met(Condition::PreviousDayBullish)
                    && met(Condition::BreakoutAbovePriorHigh)
                    && (met(Condition::VolumeSurge3Day) || met(Condition::StrongBreakout))
            }
        }
    }

    /// Verdict + explication pour un ensemble de conditions évalué
    pub fn evaluate(&self, set: &ConditionSet) -> StrategyOutcome {
        let required = self.required_conditions();
        let explanation = set
            .satisfied()
            .into_iter()
            .filter(|c| required.contains(c))
            .collect();

        StrategyOutcome {
            passed: self.passes(set),
            explanation,
        }
    }

    /// Les résultats de cette stratégie sont-ils classés par score ?
    pub fn ranks_results(&self) -> bool {
        matches!(self, Strategy::All)
    }
}

impl FromStr for Strategy {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == wanted)
            .ok_or_else(|| ScreenerError::InvalidStrategy {
                name: s.to_string(),
                valid: Strategy::ALL.map(|st| st.name()).join(", "),
            })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screener::conditions::tests::{flat_rows, series_from};
    use crate::screener::ConditionEvaluator;

    /// ConditionSet avec exactement les conditions données à vrai
    fn set_with(strategy: Strategy, met: &[Condition]) -> ConditionSet {
        // Série plate : toutes les conditions sont fausses au départ
        let series = series_from(&flat_rows(30));
        let mut set = ConditionEvaluator::new(&series).evaluate(strategy.required_conditions());
        for &condition in met {
            set.force(condition);
        }
        set
    }

    #[test]
    fn test_parse_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!(" all ".parse::<Strategy>().unwrap(), Strategy::All);
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "moon".parse::<Strategy>().unwrap_err();
        match &err {
            ScreenerError::InvalidStrategy { name, valid } => {
                assert_eq!(name, "moon");
                assert!(valid.contains("premium_bullish"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("moon"));
    }

    #[test]
    fn test_min_candles() {
        assert_eq!(Strategy::BullishBreakout.min_candles(), 3);
        assert_eq!(Strategy::PremiumBullish.min_candles(), 5);
        assert_eq!(Strategy::max_min_candles(), 22);
    }

    #[test]
    fn test_bullish_breakout_passes_with_explanation() {
        // day0 quelconque, day1 = {open 100, close 110}, day2 = {high 105}
        let rows = vec![
            (100.0, 100.0, 100.0, 10.0),
            (100.0, 110.0, 110.0, 10.0),
            (100.0, 105.0, 104.0, 10.0),
        ];
        let series = series_from(&rows);
        let strategy = Strategy::BullishBreakout;
        let set = ConditionEvaluator::new(&series).evaluate(strategy.required_conditions());
        let outcome = strategy.evaluate(&set);

        assert!(outcome.passed);
        assert_eq!(
            outcome.explanation,
            vec![Condition::PreviousDayBullish, Condition::BreakoutAbovePriorHigh]
        );
    }

    #[test]
    fn test_bullish_breakout_fails_without_breakout() {
        let set = set_with(Strategy::BullishBreakout, &[Condition::PreviousDayBullish]);
        assert!(!Strategy::BullishBreakout.passes(&set));
    }

    #[test]
    fn test_hma_crossover() {
        let set = set_with(Strategy::HmaCrossover, &[Condition::Hma20Crossover]);
        assert!(Strategy::HmaCrossover.passes(&set));
        let empty = set_with(Strategy::HmaCrossover, &[]);
        assert!(!Strategy::HmaCrossover.passes(&empty));
    }

    #[test]
    fn test_premium_hma_requires_all_three() {
        let partial = set_with(
            Strategy::PremiumHma,
            &[Condition::Hma20Crossover, Condition::VolumeSurge],
        );
        assert!(!Strategy::PremiumHma.passes(&partial));

        let full = set_with(
            Strategy::PremiumHma,
            &[
                Condition::Hma20Crossover,
                Condition::VolumeSurge,
                Condition::ShortTermUptrend,
            ],
        );
        assert!(Strategy::PremiumHma.passes(&full));
    }

    #[test]
    fn test_all_needs_two_signals_and_one_confirmation() {
        let strategy = Strategy::All;

        let two_signals = set_with(
            strategy,
            &[Condition::PreviousDayBullish, Condition::Hma20Crossover],
        );
        assert!(!strategy.passes(&two_signals));

        let one_signal = set_with(
            strategy,
            &[Condition::PreviousDayBullish, Condition::VolumeSurge],
        );
        assert!(!strategy.passes(&one_signal));

        let ok = set_with(
            strategy,
            &[
                Condition::BreakoutAbovePriorHigh,
                Condition::Hma20Crossover,
                Condition::ShortTermUptrend,
            ],
        );
        let outcome = strategy.evaluate(&ok);
        assert!(outcome.passed);
        assert_eq!(
            outcome.explanation,
            vec![
                Condition::BreakoutAbovePriorHigh,
                Condition::Hma20Crossover,
                Condition::ShortTermUptrend,
            ]
        );
    }

    #[test]
    fn test_premium_bullish_either_confirmation() {
        let strategy = Strategy::PremiumBullish;
        let base = [Condition::PreviousDayBullish, Condition::BreakoutAbovePriorHigh];

        assert!(!strategy.passes(&set_with(strategy, &base)));

        let with_volume = set_with(
            strategy,
            &[base[0], base[1], Condition::VolumeSurge3Day],
        );
        assert!(strategy.passes(&with_volume));

        let with_strong = set_with(strategy, &[base[0], base[1], Condition::StrongBreakout]);
        assert!(strategy.passes(&with_strong));
    }

    #[test]
    fn test_premium_bullish_ignores_ten_day_volume() {
        let strategy = Strategy::PremiumBullish;
        let set = set_with(
            strategy,
            &[
                Condition::PreviousDayBullish,
                Condition::BreakoutAbovePriorHigh,
                Condition::VolumeSurge,
            ],
        );
        assert!(!strategy.passes(&set));
        // VolumeSurge ne fait pas partie de l'explication de cette stratégie
        assert!(!strategy.evaluate(&set).explanation.contains(&Condition::VolumeSurge));
    }

    #[test]
    fn test_only_all_is_ranked() {
        assert!(Strategy::All.ranks_results());
        assert!(!Strategy::PremiumHma.ranks_results());
    }
}
