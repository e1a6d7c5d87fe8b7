// ============================================================================
// Module : screener
// ============================================================================
// Le moteur de screening : évaluation des conditions, stratégies, et
// orchestration du scan sur tout l'univers de coins
//
// Flux : Screener -> MarketDataSource (bougies) -> ConditionEvaluator
//        -> Strategy (verdict + explication) -> Screener (collecte, classement)
// ============================================================================

pub mod conditions; // Conditions nommées + métriques pour un coin
pub mod scanner;    // Boucle de scan, progression, classement
pub mod strategy;   // Les cinq stratégies

pub use conditions::{ConditionEvaluator, ConditionSet};
pub use scanner::{ScanProgress, ScanReport, ScanSummary, Screener};
pub use strategy::{Strategy, StrategyOutcome};
