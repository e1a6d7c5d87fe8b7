// ============================================================================
// LazyScreener - Scan des marchés crypto
// ============================================================================
// Programme en ligne de commande : lance un scan avec une stratégie, affiche
// la progression pendant le scan, puis la liste des coins retenus
//
// Utilisation :
//   lazyscreener [STRATEGIE] [--json] [--list]
//
// CONCEPTS RUST CLÉS :
// 1. Async dans sync : tokio::runtime::Runtime pour exécuter le scan
// 2. tokio::spawn : tâche de fond qui lit la progression pendant le scan
// 3. Result + anyhow : propagation des erreurs jusqu'à main()
// 4. clap (derive) : arguments et --help générés depuis la struct Args
// ============================================================================

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use lazyscreener::api::UpbitClient;
use lazyscreener::models::ScreeningResult;
use lazyscreener::screener::{ScanProgress, ScanReport};
use lazyscreener::{Screener, ScreenerConfig, Strategy};

// ============================================================================
// Arguments de la ligne de commande
// ============================================================================

/// Scan des marchés crypto Upbit selon une stratégie
///
/// Variables d'environnement : LAZYSCREENER_BASE_URL, LAZYSCREENER_QUOTE,
/// LAZYSCREENER_CANDLES, LAZYSCREENER_DELAY_MS, LAZYSCREENER_LOG_DIR, RUST_LOG
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Stratégie : all, bullish_breakout, hma_crossover, premium_hma, premium_bullish
    #[arg(default_value = "all")]
    strategy: String,

    /// Affiche les résultats en JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Affiche les stratégies disponibles et quitte
    #[arg(long, default_value_t = false)]
    list: bool,
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging vers fichier
// - stdout est réservé aux résultats (et au JSON avec --json)
// - Tracing : framework moderne de logging structuré
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - LAZYSCREENER_LOG_DIR si défini
/// - sinon Linux : ~/.local/share/lazyscreener/logs/lazyscreener.log
/// - sinon ./logs
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyscreener/logs/lazyscreener.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=lazyscreener=trace lazyscreener all
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = ScreenerConfig::log_dir();

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyscreener.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyscreener, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyscreener=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        print_strategies();
        return Ok(());
    }

    // Logging en premier : si l'init échoue, on continue sans logs
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    // Une stratégie inconnue échoue ici, avant tout appel réseau
    let strategy: Strategy = args.strategy.parse()?;
    let config = ScreenerConfig::from_env()?;
    info!(%strategy, ?config, "LazyScreener starting up");

    let client = UpbitClient::new(&config)?;
    let screener = Screener::new(client, config);

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let report = runtime.block_on(run_with_progress(&screener, strategy, !args.json));

    if args.json {
        let json = serde_json::to_string_pretty(&report.results)
            .context("Échec de la sérialisation JSON des résultats")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    info!(matched = report.results.len(), "LazyScreener exiting");
    Ok(())
}

/// Lance le scan et affiche la progression sur stderr pendant ce temps
///
/// CONCEPT : Tâche de fond
/// - tokio::spawn lance la lecture de progression en parallèle du scan
/// - Le scan lui-même reste séquentiel (un coin à la fois)
/// - abort() arrête la tâche une fois le scan terminé
async fn run_with_progress(
    screener: &Screener<UpbitClient>,
    strategy: Strategy,
    show_progress: bool,
) -> ScanReport {
    let watcher = show_progress.then(|| tokio::spawn(watch_progress(screener.progress_handle())));

    let report = screener.run_scan(strategy).await;

    if let Some(handle) = watcher {
        handle.abort();
        eprintln!("\r  Progression : {:>3}%", screener.progress());
    }

    if report.summary.total == 0 {
        error!("Empty coin universe (API unreachable?)");
    }

    report
}

/// Affiche la progression toutes les 500 ms
async fn watch_progress(progress: ScanProgress) {
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    loop {
        ticker.tick().await;
        eprint!("\r  Progression : {:>3}%", progress.get());
        std::io::stderr().flush().ok();
    }
}

// ============================================================================
// Affichage
// ============================================================================

fn print_strategies() {
    println!("Stratégies disponibles :");
    for strategy in Strategy::ALL {
        println!(
            "  {:<18} (minimum {} bougies)",
            strategy.name(),
            strategy.min_candles()
        );
    }
}

fn print_report(report: &ScanReport) {
    let summary = &report.summary;
    println!(
        "\n📊 Stratégie '{}' : {} coin(s) retenu(s) sur {} ({} sans données, {} historique trop court) en {:.1}s\n",
        report.strategy,
        report.results.len(),
        summary.total,
        summary.skipped_unavailable,
        summary.skipped_short,
        summary.elapsed.as_secs_f64()
    );

    if report.results.is_empty() {
        println!("  Aucun coin ne satisfait la stratégie.");
        return;
    }

    for result in &report.results {
        println!("  {}", result.display());
        print_metrics(result);
    }
}

fn print_metrics(result: &ScreeningResult) {
    let Some(metrics) = result.metrics else {
        return;
    };

    let mut parts = Vec::new();
    if let Some(hma) = metrics.hma20_current {
        parts.push(format!("HMA20 {:.2}", hma));
    }
    if let Some(ratio) = metrics.volume_ratio {
        parts.push(format!("volume x{:.2}", ratio));
    }
    if let Some(rsi) = metrics.rsi14 {
        parts.push(format!("RSI14 {:.1}", rsi));
    }

    if !parts.is_empty() {
        println!("             {}", parts.join(" · "));
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
