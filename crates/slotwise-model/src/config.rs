// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Scoring Configuration
//!
//! The soft constraints are priced by four integer penalties and scaled by four
//! floating weights. Both groups, plus the flag that turns on violation
//! tracing, form a `ScoringConfig` value that is handed to the constraint
//! checker when it is constructed. There is no process-wide scoring state.
//!
//! Penalties and weights must be non-negative (and weights finite). A negative
//! value would let a longer partial assignment score lower than its parent,
//! which breaks the pruning bound, so the builder refuses such input.

/// Integer penalties of the soft constraints.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Penalties {
    /// Per missing lecture below a lecture slot's minimum.
    pub course_min: i64,
    /// Per missing lab/tutorial below a lab slot's minimum.
    pub lab_min: i64,
    /// Per conflicting slot lacking a paired partner.
    pub not_paired: i64,
    /// Per pair of same-course lectures of different sections sharing a slot.
    pub section: i64,
}

/// Floating weights applied to each soft constraint category.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    pub min_filled: f64,
    pub pref: f64,
    pub pair: f64,
    pub sec_diff: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            min_filled: 1.0,
            pref: 1.0,
            pair: 1.0,
            sec_diff: 1.0,
        }
    }
}

/// Everything the checker needs to price an assignment.
///
/// With the `serde` feature the value (de)serializes as `ScoringConfigFields`
/// and is validated by the builder on the way in.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ScoringConfigFields", into = "ScoringConfigFields")
)]
pub struct ScoringConfig {
    penalties: Penalties,
    weights: Weights,
    trace_violations: bool,
}

impl ScoringConfig {
    /// Starts a builder with zero penalties, unit weights and tracing off.
    #[inline]
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::new()
    }

    #[inline]
    pub fn penalties(&self) -> &Penalties {
        &self.penalties
    }

    #[inline]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Whether hard-constraint violations are reported through `tracing`.
    #[inline]
    pub fn trace_violations(&self) -> bool {
        self.trace_violations
    }

    /// Returns a copy with violation tracing switched on or off.
    #[inline]
    pub fn with_trace_violations(mut self, yes: bool) -> Self {
        self.trace_violations = yes;
        self
    }
}

/// Unvalidated field-by-field form of a `ScoringConfig`.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfigFields {
    pub penalties: Penalties,
    pub weights: Weights,
    pub trace_violations: bool,
}

impl TryFrom<ScoringConfigFields> for ScoringConfig {
    type Error = ConfigError;

    fn try_from(fields: ScoringConfigFields) -> Result<Self, Self::Error> {
        ScoringConfig::builder()
            .penalties(fields.penalties)
            .weights(fields.weights)
            .trace_violations(fields.trace_violations)
            .build()
    }
}

impl From<ScoringConfig> for ScoringConfigFields {
    fn from(config: ScoringConfig) -> Self {
        Self {
            penalties: config.penalties,
            weights: config.weights,
            trace_violations: config.trace_violations,
        }
    }
}

impl std::fmt::Display for ScoringConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = &self.penalties;
        let w = &self.weights;
        write!(
            f,
            "ScoringConfig(pen_coursemin: {}, pen_labsmin: {}, pen_notpaired: {}, pen_section: {}, \
             w_minfilled: {}, w_pref: {}, w_pair: {}, w_secdiff: {}, trace: {})",
            p.course_min,
            p.lab_min,
            p.not_paired,
            p.section,
            w.min_filled,
            w.pref,
            w.pair,
            w.sec_diff,
            self.trace_violations
        )
    }
}

/// The error type for invalid scoring configurations.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A penalty is negative.
    NegativePenalty { name: &'static str, value: i64 },
    /// A weight is negative, NaN or infinite.
    InvalidWeight { name: &'static str, value: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativePenalty { name, value } => {
                write!(f, "Penalty '{}' must be non-negative, got {}", name, value)
            }
            Self::InvalidWeight { name, value } => write!(
                f,
                "Weight '{}' must be a finite non-negative number, got {}",
                name, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Builder for `ScoringConfig`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoringConfigBuilder {
    config: ScoringConfig,
}

impl ScoringConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn penalties(mut self, penalties: Penalties) -> Self {
        self.config.penalties = penalties;
        self
    }

    pub fn weights(mut self, weights: Weights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn pen_coursemin(mut self, value: i64) -> Self {
        self.config.penalties.course_min = value;
        self
    }

    pub fn pen_labsmin(mut self, value: i64) -> Self {
        self.config.penalties.lab_min = value;
        self
    }

    pub fn pen_notpaired(mut self, value: i64) -> Self {
        self.config.penalties.not_paired = value;
        self
    }

    pub fn pen_section(mut self, value: i64) -> Self {
        self.config.penalties.section = value;
        self
    }

    pub fn w_minfilled(mut self, value: f64) -> Self {
        self.config.weights.min_filled = value;
        self
    }

    pub fn w_pref(mut self, value: f64) -> Self {
        self.config.weights.pref = value;
        self
    }

    pub fn w_pair(mut self, value: f64) -> Self {
        self.config.weights.pair = value;
        self
    }

    pub fn w_secdiff(mut self, value: f64) -> Self {
        self.config.weights.sec_diff = value;
        self
    }

    pub fn trace_violations(mut self, yes: bool) -> Self {
        self.config.trace_violations = yes;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let p = &self.config.penalties;
        for (name, value) in [
            ("pen_coursemin", p.course_min),
            ("pen_labsmin", p.lab_min),
            ("pen_notpaired", p.not_paired),
            ("pen_section", p.section),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativePenalty { name, value });
            }
        }

        let w = &self.config.weights;
        for (name, value) in [
            ("w_minfilled", w.min_filled),
            ("w_pref", w.pref),
            ("w_pair", w.pair),
            ("w_secdiff", w.sec_diff),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder_is_valid() {
        let config = ScoringConfig::builder().build().unwrap();
        assert_eq!(config.penalties(), &Penalties::default());
        assert_eq!(config.weights().pref, 1.0);
        assert!(!config.trace_violations());
    }

    #[test]
    fn test_setters_are_applied() {
        let config = ScoringConfig::builder()
            .pen_coursemin(5)
            .pen_labsmin(3)
            .pen_notpaired(2)
            .pen_section(4)
            .w_minfilled(2.0)
            .w_pref(0.5)
            .w_pair(1.5)
            .w_secdiff(3.0)
            .trace_violations(true)
            .build()
            .unwrap();

        assert_eq!(config.penalties().course_min, 5);
        assert_eq!(config.penalties().section, 4);
        assert_eq!(config.weights().pair, 1.5);
        assert!(config.trace_violations());
    }

    #[test]
    fn test_negative_penalty_is_rejected() {
        let err = ScoringConfig::builder().pen_notpaired(-1).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::NegativePenalty {
                name: "pen_notpaired",
                value: -1
            }
        );
    }

    #[test]
    fn test_non_finite_weight_is_rejected() {
        let err = ScoringConfig::builder().w_pair(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { name: "w_pair", .. }));
        let err = ScoringConfig::builder().w_pref(-0.5).build().unwrap_err();
        assert!(format!("{}", err).contains("w_pref"));
    }

    #[test]
    fn test_fields_are_validated_by_the_builder() {
        let mut fields = ScoringConfigFields::from(
            ScoringConfig::builder().pen_section(4).w_pref(2.0).build().unwrap(),
        );
        let config = ScoringConfig::try_from(fields).unwrap();
        assert_eq!(config.penalties().section, 4);
        assert_eq!(config.weights().pref, 2.0);

        fields.penalties.lab_min = -3;
        assert_eq!(
            ScoringConfig::try_from(fields),
            Err(ConfigError::NegativePenalty {
                name: "pen_labsmin",
                value: -3
            })
        );

        fields.penalties.lab_min = 0;
        fields.weights.sec_diff = f64::INFINITY;
        assert!(matches!(
            ScoringConfig::try_from(fields),
            Err(ConfigError::InvalidWeight { name: "w_secdiff", .. })
        ));
    }

    #[test]
    fn test_with_trace_violations_keeps_the_scoring() {
        let config = ScoringConfig::builder()
            .pen_notpaired(7)
            .trace_violations(true)
            .build()
            .unwrap();
        let quiet = config.with_trace_violations(false);
        assert!(!quiet.trace_violations());
        assert_eq!(quiet.penalties(), config.penalties());
        assert_eq!(quiet.weights(), config.weights());
    }
}
