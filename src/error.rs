// ============================================================================
// Module : error
// ============================================================================
// Erreurs typées exposées par la librairie
//
// CONCEPT RUST : thiserror vs anyhow
// - thiserror : erreurs que l'appelant peut matcher (enum publique)
// - anyhow : erreurs "opaques" avec contexte, pour les I/O et le binaire
// ============================================================================

use thiserror::Error;

/// Erreurs du screener qui remontent jusqu'à l'appelant
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreenerError {
    /// Nom de stratégie inconnu (levée avant tout appel réseau)
    #[error("stratégie inconnue : '{name}' (valeurs possibles : {valid})")]
    InvalidStrategy { name: String, valid: String },

    /// Variable d'environnement présente mais invalide
    #[error("configuration invalide : {key}='{value}'")]
    Config { key: String, value: String },
}

/// Raison pour laquelle un coin est ignoré pendant un scan
///
/// Ni l'une ni l'autre n'interrompt le scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Échec de l'appel à l'API ou réponse vide
    DataUnavailable,
    /// Historique plus court que le minimum de la stratégie
    InsufficientHistory,
}
