use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::label::LabelConfig;

pub const DEFAULT_PERCENTAGE_MOVE: f64 = 3.0;

/// Bars the data source must hold before the detector reacts.
pub const DEFAULT_WARMUP_BARS: usize = 2;

/// Parameters that change what the detector computes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Retracement, in percent of the current extreme, needed to confirm a
    /// reversal. `0.0` is accepted and turns every bar into a new extreme.
    pub percentage_move: f64,

    /// Minimum number of observations before bars are evaluated.
    pub warmup_bars: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            percentage_move: DEFAULT_PERCENTAGE_MOVE,
            warmup_bars: DEFAULT_WARMUP_BARS,
        }
    }
}

impl DetectorConfig {
    pub fn with_percentage_move(percentage_move: f64) -> Self {
        Self {
            percentage_move,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.percentage_move.is_finite() || self.percentage_move < 0.0 {
            return Err(ConfigError::InvalidPercentageMove(self.percentage_move));
        }
        if self.warmup_bars == 0 {
            return Err(ConfigError::InvalidWarmup);
        }
        Ok(())
    }
}

/// Full configuration of a detector and its label adapter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZigZagConfig {
    pub detector: DetectorConfig,
    pub labels: LabelConfig,
}

impl ZigZagConfig {
    /// Load from `ZIGZAG_*` environment variables, keeping defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ZigZagConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = parse_key(&lookup, "ZIGZAG_PERCENTAGE_MOVE")? {
            cfg.detector.percentage_move = v;
        }
        if let Some(v) = parse_key(&lookup, "ZIGZAG_WARMUP_BARS")? {
            cfg.detector.warmup_bars = v;
        }
        if let Some(v) = parse_key(&lookup, "ZIGZAG_SHOW_PRICE")? {
            cfg.labels.show_price = v;
        }
        if let Some(v) = parse_key(&lookup, "ZIGZAG_SHOW_PERCENT_CHANGE")? {
            cfg.labels.show_percent_change = v;
        }

        cfg.detector.validate()?;
        Ok(cfg)
    }
}

fn parse_key<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_indicator_parameters() {
        let cfg = ZigZagConfig::default();

        assert_eq!(cfg.detector.percentage_move, 3.0);
        assert_eq!(cfg.detector.warmup_bars, 2);
        assert!(!cfg.labels.show_price);
        assert!(cfg.labels.show_percent_change);
    }

    #[test]
    fn zero_percentage_is_accepted() {
        assert!(DetectorConfig::with_percentage_move(0.0).validate().is_ok());
    }

    #[test]
    fn negative_or_nan_percentage_is_rejected() {
        assert_eq!(
            DetectorConfig::with_percentage_move(-1.0).validate(),
            Err(ConfigError::InvalidPercentageMove(-1.0))
        );
        assert!(DetectorConfig::with_percentage_move(f64::NAN).validate().is_err());
        assert!(DetectorConfig::with_percentage_move(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn zero_warmup_is_rejected() {
        let cfg = DetectorConfig {
            warmup_bars: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidWarmup));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let cfg = ZigZagConfig::from_lookup(env(&[
            ("ZIGZAG_PERCENTAGE_MOVE", "5.5"),
            ("ZIGZAG_SHOW_PRICE", "true"),
            ("ZIGZAG_SHOW_PERCENT_CHANGE", "false"),
        ]))
        .unwrap();

        assert_eq!(cfg.detector.percentage_move, 5.5);
        assert_eq!(cfg.detector.warmup_bars, 2);
        assert!(cfg.labels.show_price);
        assert!(!cfg.labels.show_percent_change);
    }

    #[test]
    fn unparsable_value_names_the_key() {
        let err = ZigZagConfig::from_lookup(env(&[("ZIGZAG_SHOW_PRICE", "yes")])).unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "ZIGZAG_SHOW_PRICE",
                value: "yes".into()
            }
        );
    }

    #[test]
    fn lookup_still_validates() {
        let err = ZigZagConfig::from_lookup(env(&[("ZIGZAG_PERCENTAGE_MOVE", "-2")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPercentageMove(-2.0));
    }

    #[test]
    fn deserializes_partial_json() {
        let cfg: ZigZagConfig =
            serde_json::from_str(r#"{ "detector": { "percentage_move": 1.5 } }"#).unwrap();

        assert_eq!(cfg.detector.percentage_move, 1.5);
        assert_eq!(cfg.detector.warmup_bars, 2);
        assert!(cfg.labels.show_percent_change);
    }
}
