// ============================================================================
// Orchestrateur de scan
// ============================================================================
// Parcourt l'univers de coins, récupère les bougies (avec délai), évalue la
// stratégie choisie, collecte et classe les résultats, publie la progression
//
// CONCEPTS RUST :
// 1. Arc<AtomicU8> : progression lisible depuis une autre tâche sans verrou
// 2. tokio::sync::Mutex : un seul scan actif à la fois, les autres attendent
// 3. Générique S: MarketDataSource : l'API réelle ou une source en mémoire
//
// Le scan est volontairement SÉQUENTIEL : un coin à la fois, avec un délai
// obligatoire avant chaque requête de bougies (limites de l'API).
// ============================================================================

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::api::MarketDataSource;
use crate::config::ScreenerConfig;
use crate::error::{ScreenerError, SkipReason};
use crate::models::{CandleSeries, Coin, ScreeningResult};
use crate::screener::{ConditionEvaluator, Strategy};

// ============================================================================
// Progression
// ============================================================================

/// Progression du scan en cours, en pourcentage (0 à 100)
///
/// CONCEPT : Handle clonable
/// - Tous les clones pointent vers le même compteur
/// - Lecture possible à tout moment depuis une autre tâche (valeur "best effort")
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    percent: Arc<AtomicU8>,
}

impl ScanProgress {
    /// Pourcentage actuel
    pub fn get(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.percent.store(0, Ordering::Relaxed);
    }

    /// Ne fait jamais reculer la progression pendant un scan
    fn advance(&self, processed: usize, total: usize) {
        let percent = percent_of(processed, total);
        self.percent.fetch_max(percent, Ordering::Relaxed);
    }
}

/// floor(processed / total * 100), borné à 100
fn percent_of(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (processed.min(total) * 100 / total) as u8
}

// ============================================================================
// Rapport de scan
// ============================================================================

/// Statistiques d'un scan, loggées à la fin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub matched: usize,
    pub skipped_unavailable: usize,
    pub skipped_short: usize,
    pub elapsed: Duration,
}

/// Résultats d'un scan + ses statistiques
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub strategy: Strategy,
    pub results: Vec<ScreeningResult>,
    pub summary: ScanSummary,
}

// ============================================================================
// Screener
// ============================================================================

/// Orchestrateur : screen(), progress(), reset_progress()
pub struct Screener<S> {
    source: S,
    config: ScreenerConfig,
    progress: ScanProgress,
    scan_lock: Mutex<()>,
}

impl<S: MarketDataSource> Screener<S> {
    pub fn new(source: S, config: ScreenerConfig) -> Self {
        Self::with_progress(source, config, ScanProgress::default())
    }

    /// Crée un screener qui publie sa progression dans un handle existant
    pub fn with_progress(source: S, config: ScreenerConfig, progress: ScanProgress) -> Self {
        Self {
            source,
            config,
            progress,
            scan_lock: Mutex::new(()),
        }
    }

    /// Progression du scan en cours (0 à 100)
    pub fn progress(&self) -> u8 {
        self.progress.get()
    }

    /// Remet la progression à 0
    pub fn reset_progress(&self) {
        self.progress.reset();
    }

    /// Handle de progression à donner à une autre tâche
    pub fn progress_handle(&self) -> ScanProgress {
        self.progress.clone()
    }

    /// Lance un scan à partir d'un nom de stratégie
    ///
    /// Un nom inconnu échoue AVANT toute requête réseau.
    pub async fn screen(&self, strategy_name: &str) -> Result<Vec<ScreeningResult>, ScreenerError> {
        let strategy: Strategy = strategy_name.parse()?;
        Ok(self.run_scan(strategy).await.results)
    }

    /// Lance un scan complet pour une stratégie
    ///
    /// Les scans concurrents sont sérialisés : le second attend la fin du premier.
    #[instrument(skip(self))]
    pub async fn run_scan(&self, strategy: Strategy) -> ScanReport {
        let _guard = self.scan_lock.lock().await;
        let started = Instant::now();

        self.progress.reset();

        let coins = self.source.fetch_markets().await;
        let total = coins.len();
        let mut summary = ScanSummary {
            total,
            matched: 0,
            skipped_unavailable: 0,
            skipped_short: 0,
            elapsed: Duration::ZERO,
        };

        if total == 0 {
            warn!("Coin universe is empty, nothing to scan");
            summary.elapsed = started.elapsed();
            return ScanReport {
                strategy,
                results: Vec::new(),
                summary,
            };
        }

        info!(total, "Starting scan");
        let mut results = Vec::new();

        for (i, coin) in coins.into_iter().enumerate() {
            // Délai obligatoire avant CHAQUE requête de bougies
            tokio::time::sleep(self.config.request_delay).await;

            let candles = self
                .source
                .fetch_daily_candles(&coin.market, self.config.candle_count)
                .await;
            let series = CandleSeries::new(coin.market.clone(), candles);

            match screen_coin(strategy, coin, series) {
                Ok(Some(result)) => {
                    info!(
                        market = %result.coin.market,
                        score = result.score(),
                        conditions = ?result.conditions,
                        "Coin passed strategy"
                    );
                    summary.matched += 1;
                    results.push(result);
                }
                Ok(None) => {}
                Err(SkipReason::DataUnavailable) => summary.skipped_unavailable += 1,
                Err(SkipReason::InsufficientHistory) => summary.skipped_short += 1,
            }

            self.progress.advance(i + 1, total);
        }

        if strategy.ranks_results() {
            // sort_by est stable : à score égal, l'ordre de rencontre est conservé
            results.sort_by(|a, b| b.score().cmp(&a.score()));
        }

        summary.elapsed = started.elapsed();
        info!(
            total = summary.total,
            matched = summary.matched,
            skipped_unavailable = summary.skipped_unavailable,
            skipped_short = summary.skipped_short,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Scan finished"
        );

        ScanReport {
            strategy,
            results,
            summary,
        }
    }
}

/// Évalue un coin : Ok(Some) s'il passe, Ok(None) s'il échoue, Err s'il est ignoré
fn screen_coin(
    strategy: Strategy,
    coin: Coin,
    series: CandleSeries,
) -> Result<Option<ScreeningResult>, SkipReason> {
    if series.is_empty() {
        warn!(market = %coin.market, "No candle data, skipping coin");
        return Err(SkipReason::DataUnavailable);
    }

    let series = series.normalized();
    if series.len() < strategy.min_candles() {
        debug!(
            market = %coin.market,
            candles = series.len(),
            required = strategy.min_candles(),
            "Not enough history, skipping coin"
        );
        return Err(SkipReason::InsufficientHistory);
    }

    let set = ConditionEvaluator::new(&series).evaluate(strategy.required_conditions());
    let outcome = strategy.evaluate(&set);
    if !outcome.passed {
        return Ok(None);
    }

    Ok(Some(ScreeningResult::new(
        coin,
        series,
        outcome.explanation,
        Some(set.metrics),
    )))
}

// ============================================================================
// Tests unitaires
// ============================================================================
