// ============================================================================
// Évaluation des conditions techniques
// ============================================================================
// Calcule, pour l'historique d'UN coin, les conditions nommées et les
// métriques dérivées utilisées par les stratégies
//
// CONVENTION D'INDEX (série normalisée, ordre décroissant) :
// - index 0 : journée en cours (bougie potentiellement encore en formation)
// - index 1 : veille, dernière journée complète
// - index 2 : avant-veille
// Les conditions "de cassure" comparent donc l'index 1 à l'index 2.
//
// CONCEPT RUST : OnceCell pour le calcul paresseux
// - Les HMA ne sont calculées que si une condition demandée en a besoin
// - Puis gardées en cache pour les conditions suivantes du même coin
// ============================================================================

use std::cell::OnceCell;
use std::collections::BTreeMap;

use crate::indicators::{self, IndicatorSeries};
use crate::models::{CandleSeries, Condition, Metrics};

/// Période de la HMA longue (croisement)
pub const HMA_LONG_PERIOD: usize = 20;
/// Période de la HMA courte (tendance)
pub const HMA_SHORT_PERIOD: usize = 5;
/// Période du RSI informatif
pub const RSI_PERIOD: usize = 14;
/// Fenêtre du volume moyen (jours les plus récents, index 0 inclus)
pub const VOLUME_WINDOW: usize = 10;
/// Fenêtre du volume moyen de la variante 3 jours (index 2, 3, 4)
pub const VOLUME_WINDOW_3DAY: usize = 3;
/// Multiplicateur au-delà duquel le volume est un "pic"
pub const VOLUME_SURGE_MULTIPLIER: f64 = 1.5;
/// Seuil d'une cassure forte, en pourcentage
pub const STRONG_BREAKOUT_PERCENT: f64 = 2.0;

/// Résultat de l'évaluation : condition -> vrai/faux, plus les métriques
///
/// Calculé à chaque scan, jamais persisté.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    values: BTreeMap<Condition, bool>,
    pub metrics: Metrics,
}

impl ConditionSet {
    /// Vrai si la condition a été évaluée ET est satisfaite
    pub fn is_met(&self, condition: Condition) -> bool {
        self.values.get(&condition).copied().unwrap_or(false)
    }

    /// Nombre de conditions satisfaites parmi `conditions`
    pub fn count_met(&self, conditions: &[Condition]) -> usize {
        conditions.iter().filter(|c| self.is_met(**c)).count()
    }

    /// Conditions satisfaites, dans l'ordre de déclaration de Condition
    pub fn satisfied(&self) -> Vec<Condition> {
        // BTreeMap itère dans l'ordre de Ord, qui suit l'ordre de déclaration
        self.values
            .iter()
            .filter(|(_, met)| **met)
            .map(|(condition, _)| *condition)
            .collect()
    }

    /// Conditions évaluées (satisfaites ou non)
    pub fn evaluated(&self) -> impl Iterator<Item = (Condition, bool)> + '_ {
        self.values.iter().map(|(c, met)| (*c, *met))
    }

    fn insert(&mut self, condition: Condition, met: bool) {
        self.values.insert(condition, met);
    }

    #[cfg(test)]
    pub(crate) fn force(&mut self, condition: Condition) {
        self.insert(condition, true);
    }
}

/// Évaluateur de conditions pour une série normalisée
pub struct ConditionEvaluator<'a> {
    series: &'a CandleSeries,
    hma_long: OnceCell<IndicatorSeries>,
    hma_short: OnceCell<IndicatorSeries>,
}

impl<'a> ConditionEvaluator<'a> {
    /// La série doit être normalisée (ordre décroissant)
    pub fn new(series: &'a CandleSeries) -> Self {
        Self {
            series,
            hma_long: OnceCell::new(),
            hma_short: OnceCell::new(),
        }
    }

    /// Évalue uniquement les conditions demandées, plus les métriques
    pub fn evaluate(&self, conditions: &[Condition]) -> ConditionSet {
        let mut set = ConditionSet::default();
        for &condition in conditions {
            set.insert(condition, self.check(condition));
        }
        set.metrics = self.metrics();
        set
    }

    /// Évalue une condition
    ///
    /// Une série trop courte pour la condition donne false.
    pub fn check(&self, condition: Condition) -> bool {
        match condition {
            Condition::PreviousDayBullish => self.previous_day_bullish(),
            Condition::BreakoutAbovePriorHigh => self.breakout_above_prior_high(),
            Condition::Hma20Crossover => self.hma20_crossover(),
            Condition::VolumeSurge => self.volume_surge(),
            Condition::ShortTermUptrend => self.short_term_uptrend(),
            Condition::StrongBreakout => self.strong_breakout(),
            Condition::VolumeSurge3Day => self.volume_surge_3day(),
        }
    }

    /// Métriques dérivées : HMA(20) actuelle, ratio de volume, RSI(14)
    pub fn metrics(&self) -> Metrics {
        let volume_ratio = if self.volume_surge() {
            self.volume_average()
                .zip(self.series.latest())
                .map(|(avg, latest)| latest.volume / avg)
        } else {
            None
        };

        let rsi14 = indicators::rsi(&self.series.closes_chronological(), RSI_PERIOD)
            .last()
            .copied()
            .flatten();

        Metrics {
            hma20_current: self.hma_long().first().copied().flatten(),
            volume_ratio,
            rsi14,
        }
    }

    // ------------------------------------------------------------------------
    // Conditions
    // ------------------------------------------------------------------------

    fn previous_day_bullish(&self) -> bool {
        self.series
            .get(1)
            .is_some_and(indicators::is_bullish_candle)
    }

    fn breakout_above_prior_high(&self) -> bool {
        match (self.series.get(1), self.series.get(2)) {
            (Some(prev), Some(before)) => indicators::is_breakout_above_previous_high(prev, before),
            _ => false,
        }
    }

    fn hma20_crossover(&self) -> bool {
        let hma = self.hma_long();
        let (Some(today), Some(prev)) = (self.series.get(0), self.series.get(1)) else {
            return false;
        };

        match (hma.first().copied().flatten(), hma.get(1).copied().flatten()) {
            (Some(cur_ma), Some(prev_ma)) => {
                indicators::is_crossover(prev.close, today.close, prev_ma, cur_ma)
            }
            _ => false,
        }
    }

    fn volume_surge(&self) -> bool {
        match (self.series.latest(), self.volume_average()) {
            (Some(latest), Some(avg)) => latest.volume > VOLUME_SURGE_MULTIPLIER * avg,
            _ => false,
        }
    }

    fn short_term_uptrend(&self) -> bool {
        let hma = self.hma_short();
        match hma.get(..3) {
            Some([Some(h0), Some(h1), Some(h2)]) => h0 > h1 && h1 > h2,
            _ => false,
        }
    }

    fn strong_breakout(&self) -> bool {
        self.breakout_percent() > STRONG_BREAKOUT_PERCENT
    }

    /// Variante propre à premium_bullish : la veille contre les 3 jours d'avant
    fn volume_surge_3day(&self) -> bool {
        let volumes = self.series.volumes();
        let (Some(prev), Some(window)) = (
            volumes.get(1),
            volumes.get(2..2 + VOLUME_WINDOW_3DAY),
        ) else {
            return false;
        };

        indicators::mean(window).is_some_and(|avg| *prev > VOLUME_SURGE_MULTIPLIER * avg)
    }

    // ------------------------------------------------------------------------
    // Calculs intermédiaires
    // ------------------------------------------------------------------------

    /// Pourcentage de cassure de la veille au-dessus du plus haut de l'avant-veille
    ///
    /// 0 s'il n'y a pas de cassure (ou un plus haut nul).
    pub fn breakout_percent(&self) -> f64 {
        if !self.breakout_above_prior_high() {
            return 0.0;
        }
        match (self.series.get(1), self.series.get(2)) {
            (Some(prev), Some(before)) if before.high > 0.0 => {
                (prev.close - before.high) / before.high * 100.0
            }
            _ => 0.0,
        }
    }

    /// Volume moyen des VOLUME_WINDOW bougies les plus récentes
    fn volume_average(&self) -> Option<f64> {
        let volumes = self.series.volumes();
        let window = &volumes[..volumes.len().min(VOLUME_WINDOW)];
        indicators::mean(window)
    }

    /// HMA(20) réalignée en ordre décroissant (index 0 = aujourd'hui)
    fn hma_long(&self) -> &IndicatorSeries {
        self.hma_long.get_or_init(|| {
            let closes = self.series.closes_chronological();
            indicators::to_descending(indicators::hma(&closes, HMA_LONG_PERIOD))
        })
    }

    /// HMA(5) réalignée en ordre décroissant
    fn hma_short(&self) -> &IndicatorSeries {
        self.hma_short.get_or_init(|| {
            let closes = self.series.closes_chronological();
            indicators::to_descending(indicators::hma(&closes, HMA_SHORT_PERIOD))
        })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
