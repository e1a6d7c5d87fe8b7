// ============================================================================
// Structure : Coin
// ============================================================================
// Représente un marché crypto de l'exchange (ex: "KRW-BTC")
//
// CONCEPTS RUST :
// 1. String vs &str :
//    - String : owned string (possède la mémoire, heap allocated)
//    - &str : borrowed string slice (référence, ne possède pas)
//    - Les méthodes quote_currency()/base_currency() retournent des &str
//      empruntés au champ market : aucune allocation
// ============================================================================

use serde::{Deserialize, Serialize};

/// Marché crypto identifié par son code "<COTATION>-<ACTIF>"
///
/// Immuable, récupéré à chaque scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Code du marché (ex: "KRW-BTC")
    pub market: String,

    /// Nom coréen (ex: "비트코인")
    pub korean_name: String,

    /// Nom anglais (ex: "Bitcoin")
    pub english_name: String,
}

impl Coin {
    pub fn new(market: String, korean_name: String, english_name: String) -> Self {
        Self {
            market,
            korean_name,
            english_name,
        }
    }

    /// Devise de cotation (partie avant le tiret, ex: "KRW")
    pub fn quote_currency(&self) -> &str {
        self.market
            .split_once('-')
            .map(|(quote, _)| quote)
            .unwrap_or(&self.market)
    }

    /// Actif coté (partie après le tiret, ex: "BTC")
    pub fn base_currency(&self) -> &str {
        self.market
            .split_once('-')
            .map(|(_, base)| base)
            .unwrap_or(&self.market)
    }

    /// Vérifie si le marché est coté dans la devise donnée
    pub fn is_quoted_in(&self, quote: &str) -> bool {
        self.market
            .strip_prefix(quote)
            .is_some_and(|rest| rest.starts_with('-'))
    }

    /// Nom à afficher : nom anglais, sinon le code de l'actif
    pub fn display_name(&self) -> &str {
        if self.english_name.is_empty() {
            self.base_currency()
        } else {
            &self.english_name
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn btc() -> Coin {
        Coin::new(
            "KRW-BTC".to_string(),
            "비트코인".to_string(),
            "Bitcoin".to_string(),
        )
    }

    #[test]
    fn test_currencies() {
        let coin = btc();
        assert_eq!(coin.quote_currency(), "KRW");
        assert_eq!(coin.base_currency(), "BTC");
    }

    #[test]
    fn test_is_quoted_in() {
        let coin = btc();
        assert!(coin.is_quoted_in("KRW"));
        assert!(!coin.is_quoted_in("BTC"));
        assert!(!coin.is_quoted_in("KR"));
    }

    #[test]
    fn test_display_name_fallback() {
        let coin = Coin::new("KRW-XYZ".to_string(), String::new(), String::new());
        assert_eq!(coin.display_name(), "XYZ");
        assert_eq!(btc().display_name(), "Bitcoin");
    }
}
