// ============================================================================
// LazyScreener - Library
// ============================================================================
// Screener de marchés crypto sur bougies journalières (HMA, RSI, volume)
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;        // Sources de données de marché (Upbit)
pub mod config;     // Configuration (défauts + variables d'environnement)
pub mod error;      // Erreurs typées
pub mod indicators; // WMA, HMA, RSI, prédicats sur les bougies
pub mod models;     // Structures de données
pub mod screener;   // Conditions, stratégies, orchestration du scan

pub use config::ScreenerConfig;
pub use error::ScreenerError;
pub use screener::{Screener, Strategy};
