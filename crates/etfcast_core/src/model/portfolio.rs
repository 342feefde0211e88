use serde::{Deserialize, Serialize};

/// One leg of a simulated portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioComponent {
    /// Opaque identifier (typically an ISIN) used to fetch history
    pub instrument_id: String,
    /// Fraction of portfolio value in [0, 1]
    pub weight: f64,
    /// Annual fractional cost, e.g. 0.0007 for 0.07%
    pub expense_ratio: f64,
}

impl PortfolioComponent {
    pub fn new(instrument_id: impl Into<String>, weight: f64, expense_ratio: f64) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            weight,
            expense_ratio,
        }
    }

    /// Monthly drag subtracted from each historical return.
    #[must_use]
    pub fn monthly_expense(&self) -> f64 {
        self.expense_ratio / 12.0
    }
}

/// Ordered, immutable set of components simulated as one basket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    components: Vec<PortfolioComponent>,
}

impl Portfolio {
    #[must_use]
    pub fn new(components: Vec<PortfolioComponent>) -> Self {
        Self { components }
    }

    /// A single instrument holding the whole portfolio.
    pub fn single(instrument_id: impl Into<String>, expense_ratio: f64) -> Self {
        Self::new(vec![PortfolioComponent::new(instrument_id, 1.0, expense_ratio)])
    }

    #[must_use]
    pub fn components(&self) -> &[PortfolioComponent] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortfolioComponent> {
        self.components.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }
}

impl FromIterator<PortfolioComponent> for Portfolio {
    fn from_iter<I: IntoIterator<Item = PortfolioComponent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
