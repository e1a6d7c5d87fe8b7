// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données du screener
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod candle;     // Bougies OHLCV et historique d'un marché
pub mod coin;       // Marché crypto (ex: KRW-BTC)
pub mod condition;  // Conditions techniques nommées + métriques
pub mod screening;  // Résultat d'un scan pour un coin

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyscreener::models::candle::Candle;
// On peut faire : use lazyscreener::models::Candle;
pub use candle::{Candle, CandleSeries};
pub use coin::Coin;
pub use condition::{Condition, Metrics};
pub use screening::ScreeningResult;
