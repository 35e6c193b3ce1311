//! Generator parameters: the ranges the simulated days are drawn from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DEFAULT_FIXED_STRATEGY, DEFAULT_STRATEGIES, PLACEHOLDER_STRATEGY};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("generator parameter '{0}' must be finite")]
    NonFinite(&'static str),
    #[error("generator parameter '{0}' must not be negative")]
    Negative(&'static str),
    #[error("loss ratio range [{base}, {base} + {span}) must lie within [0, 1]")]
    LossRatioOutOfRange { base: f64, span: f64 },
    #[error("variance band {0} must lie within [0, 1)")]
    VarianceBand(f64),
    #[error("floor reset base {reset_base} is below the profit floor {floor}")]
    FloorResetBelowFloor { reset_base: f64, floor: f64 },
    #[error("loss base must be positive so every loss day is negative")]
    NonPositiveLossBase,
    #[error("strategy catalog is empty")]
    EmptyCatalog,
    #[error("invalid strategy label '{0}'")]
    InvalidLabel(String),
}

/// Draw ranges for the daily PnL generator.
///
/// Every `*_span` is the width of a uniform draw starting at the matching
/// `*_base`. Defaults reproduce the dashboard's historical behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    /// Fraction of simulable days that are losses: `[0.185, 0.285)`.
    pub loss_ratio_base: f64,
    pub loss_ratio_span: f64,
    /// Loss magnitude, negated on draw: `[-1.0, -0.5]`.
    pub loss_base: f64,
    pub loss_span: f64,
    /// Relative noise applied to each profit day: `avg * U(-band, band)`.
    pub variance_band: f64,
    /// Noisy profit values below this are re-drawn from the reset range.
    pub profit_floor: f64,
    pub floor_reset_base: f64,
    pub floor_reset_span: f64,
    pub strategies: Vec<String>,
    pub fixed_strategy: String,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            loss_ratio_base: 0.185,
            loss_ratio_span: 0.1,
            loss_base: 0.5,
            loss_span: 0.5,
            variance_band: 0.2,
            profit_floor: 0.1,
            floor_reset_base: 0.2,
            floor_reset_span: 0.1,
            strategies: DEFAULT_STRATEGIES.iter().map(|s| s.to_string()).collect(),
            fixed_strategy: DEFAULT_FIXED_STRATEGY.to_string(),
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let numeric = [
            ("loss_ratio_base", self.loss_ratio_base),
            ("loss_ratio_span", self.loss_ratio_span),
            ("loss_base", self.loss_base),
            ("loss_span", self.loss_span),
            ("variance_band", self.variance_band),
            ("profit_floor", self.profit_floor),
            ("floor_reset_base", self.floor_reset_base),
            ("floor_reset_span", self.floor_reset_span),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(ParamsError::NonFinite(name));
            }
            if value < 0.0 {
                return Err(ParamsError::Negative(name));
            }
        }
        if self.loss_ratio_base + self.loss_ratio_span > 1.0 {
            return Err(ParamsError::LossRatioOutOfRange {
                base: self.loss_ratio_base,
                span: self.loss_ratio_span,
            });
        }
        if self.loss_base <= 0.0 {
            return Err(ParamsError::NonPositiveLossBase);
        }
        // A reset draw must itself clear the floor.
        if self.floor_reset_base < self.profit_floor {
            return Err(ParamsError::FloorResetBelowFloor {
                reset_base: self.floor_reset_base,
                floor: self.profit_floor,
            });
        }
        if self.variance_band >= 1.0 {
            return Err(ParamsError::VarianceBand(self.variance_band));
        }
        if self.strategies.is_empty() {
            return Err(ParamsError::EmptyCatalog);
        }
        for label in self.strategies.iter().chain(std::iter::once(&self.fixed_strategy)) {
            if label.trim().is_empty() || label == PLACEHOLDER_STRATEGY {
                return Err(ParamsError::InvalidLabel(label.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = GeneratorParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.strategies.len(), 6);
        assert_eq!(params.fixed_strategy, "SmartMoney-X AI V4.0");
    }

    #[test]
    fn rejects_ratio_above_one() {
        let params = GeneratorParams {
            loss_ratio_base: 0.95,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::LossRatioOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_nan_and_negative() {
        let nan = GeneratorParams {
            loss_span: f64::NAN,
            ..Default::default()
        };
        assert_eq!(nan.validate(), Err(ParamsError::NonFinite("loss_span")));

        let negative = GeneratorParams {
            profit_floor: -0.1,
            ..Default::default()
        };
        assert_eq!(negative.validate(), Err(ParamsError::Negative("profit_floor")));
    }

    #[test]
    fn rejects_placeholder_label() {
        let params = GeneratorParams {
            strategies: vec!["-".into()],
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::InvalidLabel("-".into())));

        let empty = GeneratorParams {
            strategies: vec![],
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ParamsError::EmptyCatalog));
    }

    #[test]
    fn rejects_floor_reset_below_floor() {
        let params = GeneratorParams {
            floor_reset_base: 0.0,
            floor_reset_span: 0.05,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamsError::FloorResetBelowFloor {
                reset_base: 0.0,
                floor: 0.1
            })
        );

        let at_floor = GeneratorParams {
            floor_reset_base: 0.1,
            ..Default::default()
        };
        assert!(at_floor.validate().is_ok());
    }

    #[test]
    fn rejects_zero_loss_base() {
        let params = GeneratorParams {
            loss_base: 0.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::NonPositiveLossBase));
    }
}
