//! Wellness dimensions that practices are tagged with.

use serde::{Deserialize, Serialize};

/// A wellness category.
///
/// The wire labels are the Portuguese names stored by the app
/// (`emocional`, `fisico`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Emotional well-being
    Emocional,
    /// Body and movement
    Fisico,
    /// Creativity and learning
    Intelectual,
    /// Mindfulness and meaning
    Espiritual,
    /// Relationships
    Social,
}

impl Dimension {
    /// Every dimension, in canonical order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Emocional,
        Dimension::Fisico,
        Dimension::Intelectual,
        Dimension::Espiritual,
        Dimension::Social,
    ];

    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Emocional => "emocional",
            Dimension::Fisico => "fisico",
            Dimension::Intelectual => "intelectual",
            Dimension::Espiritual => "espiritual",
            Dimension::Social => "social",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Emocional => "Emocional",
            Dimension::Fisico => "Físico",
            Dimension::Intelectual => "Intelectual",
            Dimension::Espiritual => "Espiritual",
            Dimension::Social => "Social",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of the known dimensions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dimension: {0}")]
pub struct ParseDimensionError(pub String);

impl std::str::FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == label)
            .ok_or_else(|| ParseDimensionError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        for dimension in Dimension::ALL {
            assert_eq!(dimension.as_str().parse::<Dimension>().unwrap(), dimension);
        }
        assert_eq!(" Fisico ".parse::<Dimension>().unwrap(), Dimension::Fisico);
    }

    #[test]
    fn test_parse_unknown_label() {
        let err = "financeiro".parse::<Dimension>().unwrap_err();
        assert_eq!(err, ParseDimensionError("financeiro".to_string()));
    }

    #[test]
    fn test_serde_uses_stored_label() {
        let json = serde_json::to_string(&Dimension::Espiritual).unwrap();
        assert_eq!(json, "\"espiritual\"");
        let back: Dimension = serde_json::from_str("\"social\"").unwrap();
        assert_eq!(back, Dimension::Social);
    }
}
