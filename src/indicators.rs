// ============================================================================
// Module : indicators
// ============================================================================
// Indicateurs techniques purs : WMA, HMA, RSI et prédicats sur les bougies
//
// CONCEPTS RUST :
// 1. Option<f64> : une position sans assez d'historique vaut None
//    (au lieu d'un NaN qui se propagerait silencieusement dans les comparaisons)
// 2. Slices (&[f64]) : on emprunte les données, aucune copie
// 3. Fonctions pures : même entrée => même sortie, aucun état
//
// Toutes les séries sont en ordre CHRONOLOGIQUE (le plus ancien d'abord).
// La sortie a toujours la même longueur que l'entrée.
// ============================================================================

use crate::models::Candle;

/// Série d'indicateur : None = pas assez d'historique à cette position
pub type IndicatorSeries = Vec<Option<f64>>;

// ============================================================================
// Moyennes mobiles
// ============================================================================

/// Moyenne mobile pondérée (Weighted Moving Average)
///
/// Poids linéairement décroissants : la valeur la plus récente a le poids
/// `period`, la plus ancienne de la fenêtre a le poids 1.
///
/// Les `period - 1` premières positions valent None.
pub fn wma(series: &[f64], period: usize) -> IndicatorSeries {
    let defined: Vec<Option<f64>> = series.iter().copied().map(Some).collect();
    wma_defined(&defined, period)
}

/// WMA sur une série qui contient déjà des trous
///
/// Une fenêtre qui contient au moins un None produit None.
fn wma_defined(series: &[Option<f64>], period: usize) -> IndicatorSeries {
    if period == 0 {
        return vec![None; series.len()];
    }

    // Somme des poids : period + (period-1) + ... + 1
    let weight_sum = (period * (period + 1) / 2) as f64;

    (0..series.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }

            let mut acc = 0.0;
            for j in 0..period {
                let value = series[i - j]?;
                acc += value * (period - j) as f64;
            }
            Some(acc / weight_sum)
        })
        .collect()
}

/// Moyenne mobile de Hull (Hull Moving Average)
///
/// HMA = WMA(2 * WMA(n/2) - WMA(n), floor(sqrt(n)))
///
/// Définie à partir de l'index `period + floor(sqrt(period)) - 2`.
pub fn hma(series: &[f64], period: usize) -> IndicatorSeries {
    let half = period / 2;
    let root = (period as f64).sqrt().floor() as usize;

    let wma_full = wma(series, period);
    let wma_half = wma(series, half);

    let raw: Vec<Option<f64>> = wma_half
        .iter()
        .zip(&wma_full)
        .map(|(half, full)| match (half, full) {
            (Some(h), Some(f)) => Some(2.0 * h - f),
            _ => None,
        })
        .collect();

    wma_defined(&raw, root)
}

// ============================================================================
// RSI (Relative Strength Index, lissage de Wilder)
// ============================================================================

/// RSI de Wilder
///
/// - Les moyennes de gain/perte sont initialisées sur les `period` premières
///   variations, puis lissées : avg = (avg * (period - 1) + x) / period
/// - La première valeur est à l'index `period` (les précédentes valent None)
/// - Perte moyenne nulle : RSI = 100
pub fn rsi(prices: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return out;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    let mut avg_gain = changes[..period].iter().map(|&c| c.max(0.0)).sum::<f64>() / period_f;
    let mut avg_loss = changes[..period].iter().map(|&c| (-c).max(0.0)).sum::<f64>() / period_f;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    // changes[k] est la variation de prices[k] à prices[k + 1]
    for (k, &change) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (period_f - 1.0) + change.max(0.0)) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + (-change).max(0.0)) / period_f;
        out[k + 1] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// ============================================================================
// Utilitaires
// ============================================================================

/// Réaligne une série chronologique sur l'ordre décroissant d'une CandleSeries
///
/// Après l'appel, index 0 = valeur la plus récente.
pub fn to_descending(mut series: IndicatorSeries) -> IndicatorSeries {
    series.reverse();
    series
}

/// Moyenne arithmétique (None si la slice est vide)
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ============================================================================
// Prédicats sur les bougies
// ============================================================================

/// Bougie haussière : clôture au-dessus de l'ouverture
pub fn is_bullish_candle(candle: &Candle) -> bool {
    candle.is_bullish()
}

/// Cassure : la clôture dépasse le plus haut de la bougie précédente
pub fn is_breakout_above_previous_high(current: &Candle, previous: &Candle) -> bool {
    current.close > previous.high
}

/// Croisement haussier sur une seule barre
///
/// Le prix était sous la moyenne et passe au-dessus.
pub fn is_crossover(prev_price: f64, cur_price: f64, prev_ma: f64, cur_ma: f64) -> bool {
    prev_price < prev_ma && cur_price > cur_ma
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const EPS: f64 = 1e-9;

    fn first_defined(series: &IndicatorSeries) -> Option<usize> {
        series.iter().position(|v| v.is_some())
    }

    #[test]
    fn test_wma_constant_series() {
        let series = vec![7.5; 12];
        let out = wma(&series, 5);

        assert_eq!(out.len(), series.len());
        assert!(out[..4].iter().all(|v| v.is_none()));
        for value in &out[4..] {
            assert!((value.unwrap() - 7.5).abs() < EPS);
        }
    }

    #[test]
    fn test_wma_weights_favor_recent() {
        // (1*1 + 2*2 + 3*3) / 6 = 14 / 6
        let out = wma(&[1.0, 2.0, 3.0], 3);
        assert!((out[2].unwrap() - 14.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn test_wma_period_longer_than_series() {
        let out = wma(&[1.0, 2.0], 3);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn test_wma_zero_period() {
        assert_eq!(wma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_hma_first_defined_index() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin() * 5.0).collect();

        // period 20 : root = 4 => premier index = 22
        assert_eq!(first_defined(&hma(&prices, 20)), Some(22));
        // period 5 : root = 2 => premier index = 5
        assert_eq!(first_defined(&hma(&prices, 5)), Some(5));
        // period 9 : root = 3 => premier index = 10
        assert_eq!(first_defined(&hma(&prices, 9)), Some(10));
    }

    #[test]
    fn test_hma_tracks_linear_trend() {
        // Sur une droite, la HMA n'a pas de retard : elle colle au prix
        let prices: Vec<f64> = (0..30).map(|i| 10.0 + 2.0 * i as f64).collect();
        let out = hma(&prices, 9);
        for (i, value) in out.iter().enumerate().skip(10) {
            assert!((value.unwrap() - prices[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hma_deterministic() {
        let prices: Vec<f64> = (0..50).map(|i| ((i * 37) % 11) as f64).collect();
        assert_eq!(hma(&prices, 20), hma(&prices, 20));
    }

    #[test]
    fn test_rsi_prefix() {
        let prices: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let out = rsi(&prices, 14);
        assert_eq!(first_defined(&out), Some(14));
        assert_eq!(out.len(), prices.len());
    }

    #[test]
    fn test_rsi_increasing_is_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&prices, 14);
        for value in out.iter().flatten() {
            assert_eq!(*value, 100.0);
        }
    }

    #[test]
    fn test_rsi_decreasing_is_0() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&prices, 14);
        for value in out.iter().flatten() {
            assert!(value.abs() < EPS);
        }
    }

    #[test]
    fn test_rsi_in_range() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let out = rsi(&prices, 14);
        for value in out.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
        // Valeur de référence classique de Wilder pour cette série
        assert!((out[14].unwrap() - 70.46).abs() < 0.1);
    }

    #[test]
    fn test_rsi_too_short() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_crossover() {
        assert!(is_crossover(5.0, 15.0, 10.0, 10.0));
        assert!(!is_crossover(15.0, 5.0, 10.0, 10.0));
        // Déjà au-dessus : pas de croisement
        assert!(!is_crossover(11.0, 15.0, 10.0, 10.0));
    }

    #[test]
    fn test_candle_predicates() {
        let prev = Candle::new(Utc::now(), 100.0, 105.0, 95.0, 101.0, 0.0, 1.0);
        let cur = Candle::new(Utc::now(), 100.0, 112.0, 99.0, 110.0, 0.0, 1.0);

        assert!(is_bullish_candle(&cur));
        assert!(is_breakout_above_previous_high(&cur, &prev));
        assert!(!is_breakout_above_previous_high(&prev, &cur));
    }

    #[test]
    fn test_bullish_candle_matches_candle_method() {
        let doji = Candle::new(Utc::now(), 100.0, 101.0, 99.0, 100.0, 0.0, 1.0);
        let red = Candle::new(Utc::now(), 100.0, 101.0, 90.0, 92.0, 0.0, 1.0);
        let green = Candle::new(Utc::now(), 92.0, 101.0, 90.0, 100.0, 0.0, 1.0);

        for candle in [&doji, &red, &green] {
            assert_eq!(is_bullish_candle(candle), candle.is_bullish());
        }
        assert!(!is_bullish_candle(&doji));
    }

    #[test]
    fn test_to_descending_and_mean() {
        assert_eq!(to_descending(vec![None, Some(1.0), Some(2.0)]), vec![Some(2.0), Some(1.0), None]);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
    }
}
