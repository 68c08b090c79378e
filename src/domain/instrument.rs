use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, TradefestError};

/// Tickers served by the Trading Festival game server, in vector-layout order.
pub const DEFAULT_TICKERS: [&str; 12] = [
    "BANK", "SEMI", "AUTO", "PHARMA", "NITORI", "UTIL", "AIR", "NINTENDO", "ENEOS", "GOLD",
    "USDJPY", "NIKKEI",
];

/// Ticker identifier shared with the game server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instrument(String);

impl Instrument {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Instrument {
    fn from(ticker: &str) -> Self {
        Self::new(ticker)
    }
}

/// Fixed, ordered list of instruments.
///
/// The position of an instrument in the catalog fixes its slot in every
/// observation and action vector, so the catalog never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    /// Build a catalog, rejecting empty lists and duplicate tickers
    pub fn new<I, T>(tickers: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let instruments: Vec<Instrument> = tickers
            .into_iter()
            .map(|t| Instrument::new(t.into().trim().to_string()))
            .collect();

        if instruments.is_empty() {
            return Err(TradefestError::Validation(
                "instrument catalog must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(instruments.len());
        for instrument in &instruments {
            if instrument.as_str().is_empty() {
                return Err(TradefestError::Validation(
                    "instrument catalog contains an empty ticker".to_string(),
                ));
            }
            if !seen.insert(instrument.as_str()) {
                return Err(TradefestError::Validation(format!(
                    "duplicate ticker in instrument catalog: {}",
                    instrument
                )));
            }
        }

        Ok(Self { instruments })
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instrument> {
        self.instruments.get(index)
    }

    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.as_str() == ticker)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_TICKERS.iter().map(|t| Instrument::from(*t)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InstrumentCatalog {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = InstrumentCatalog::default();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.index_of("BANK"), Some(0));
        assert_eq!(catalog.index_of("NIKKEI"), Some(11));
        assert_eq!(catalog.get(7).map(|i| i.as_str()), Some("NINTENDO"));
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let err = InstrumentCatalog::new(["BANK", "SEMI", "BANK"]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_catalog_rejects_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(InstrumentCatalog::new(empty).is_err());
    }
}
