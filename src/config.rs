use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;

pub const DEFAULT_PAD_SIZE: f32 = 240.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("failed to parse gesture config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happens to the accumulated angle when the smoothed spin flips sign.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversalPolicy {
    /// Restart accumulation from zero at the flip sample.
    #[default]
    ResetAngle,
    /// Let the total run back through zero.
    Accumulate,
}

/// Maps absolute smoothed angular speed (radians per accepted sample) to the
/// multiplier reported with every rotation update. Must be non-decreasing.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SpeedProfile {
    Flat {
        multiplier: f32,
    },
    Step {
        threshold: f32,
        base: f32,
        boosted: f32,
    },
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::Flat { multiplier: 1.0 }
    }
}

impl SpeedProfile {
    pub fn multiplier(&self, speed: f32) -> f32 {
        let speed = speed.abs();
        match *self {
            Self::Flat { multiplier } => multiplier,
            Self::Step {
                threshold,
                base,
                boosted,
            } => {
                if speed >= threshold {
                    boosted
                } else {
                    base
                }
            }
            Self::Custom(curve) => curve(speed),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Flat { multiplier } => positive("speed.multiplier", multiplier),
            Self::Step {
                threshold,
                base,
                boosted,
            } => {
                non_negative("speed.threshold", threshold)?;
                positive("speed.base", base)?;
                positive("speed.boosted", boosted)?;
                if boosted < base {
                    return Err(ConfigError::Invalid {
                        field: "speed.boosted",
                        reason: "must be >= speed.base",
                    });
                }
                Ok(())
            }
            Self::Custom(_) => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Nominal pad diameter; the tracking radius is half of it.
    pub size: f32,
    pub min_radius_ratio: f32,
    pub max_radius_ratio: f32,
    /// Minimum |turns| for a full-circle report.
    pub turn_threshold: f32,
    /// Angular steps below this (radians) are treated as finger jitter.
    pub noise_threshold: f32,
    /// Angular steps below this (radians) are too linear to count as rotation.
    /// Zero disables the gate.
    pub min_step_radians: f32,
    pub ema_alpha: f32,
    pub variance_coefficient: f32,
    pub dead_zone_ratio: f32,
    pub reversal: ReversalPolicy,
    pub speed: SpeedProfile,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAD_SIZE,
            min_radius_ratio: 0.4,
            max_radius_ratio: 1.0,
            turn_threshold: 1.0,
            noise_threshold: 0.002,
            min_step_radians: 0.006,
            ema_alpha: 0.4,
            variance_coefficient: 0.15,
            dead_zone_ratio: 0.05,
            reversal: ReversalPolicy::ResetAngle,
            speed: SpeedProfile::default(),
        }
    }
}

impl GestureConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GestureConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("size", self.size)?;
        non_negative("min_radius_ratio", self.min_radius_ratio)?;
        positive("max_radius_ratio", self.max_radius_ratio)?;
        if self.min_radius_ratio >= self.max_radius_ratio {
            return Err(ConfigError::Invalid {
                field: "min_radius_ratio",
                reason: "must be < max_radius_ratio",
            });
        }
        positive("turn_threshold", self.turn_threshold)?;
        non_negative("noise_threshold", self.noise_threshold)?;
        non_negative("min_step_radians", self.min_step_radians)?;
        if self.min_step_radians > 0.0 && self.min_step_radians < self.noise_threshold {
            return Err(ConfigError::Invalid {
                field: "min_step_radians",
                reason: "must be >= noise_threshold",
            });
        }
        positive("ema_alpha", self.ema_alpha)?;
        if self.ema_alpha > 1.0 {
            return Err(ConfigError::Invalid {
                field: "ema_alpha",
                reason: "must be <= 1",
            });
        }
        positive("variance_coefficient", self.variance_coefficient)?;
        non_negative("dead_zone_ratio", self.dead_zone_ratio)?;
        if self.dead_zone_ratio >= 1.0 {
            return Err(ConfigError::Invalid {
                field: "dead_zone_ratio",
                reason: "must be < 1",
            });
        }
        self.speed.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be > 0",
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be >= 0",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GestureConfig::default()
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = GestureConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config.size, DEFAULT_PAD_SIZE);
        assert_eq!(config.reversal, ReversalPolicy::ResetAngle);
        assert_eq!(config.speed.multiplier(3.0), 1.0);
    }

    #[test]
    fn step_profile_parses_and_boosts_above_threshold() {
        let config = GestureConfig::from_toml_str(
            r#"
size = 300.0
reversal = "accumulate"

[speed]
kind = "step"
threshold = 0.2
base = 1.0
boosted = 1.5
"#,
        )
        .expect("step config should parse");

        assert_eq!(config.radius(), 150.0);
        assert_eq!(config.reversal, ReversalPolicy::Accumulate);
        assert_eq!(config.speed.multiplier(0.1), 1.0);
        assert_eq!(config.speed.multiplier(-0.25), 1.5);
    }

    #[test]
    fn semantic_validation_rejects_invalid_values() {
        let cases = [
            ("size = 0.0", "size must be > 0"),
            (
                "min_radius_ratio = 0.9\nmax_radius_ratio = 0.5",
                "min_radius_ratio must be < max_radius_ratio",
            ),
            ("turn_threshold = -1.0", "turn_threshold must be > 0"),
            ("ema_alpha = 1.5", "ema_alpha must be <= 1"),
            (
                "noise_threshold = 0.01\nmin_step_radians = 0.005",
                "min_step_radians must be >= noise_threshold",
            ),
            ("variance_coefficient = 0.0", "variance_coefficient must be > 0"),
            ("dead_zone_ratio = 1.0", "dead_zone_ratio must be < 1"),
            (
                "[speed]\nkind = \"step\"\nthreshold = 0.2\nbase = 2.0\nboosted = 1.0",
                "speed.boosted must be >= speed.base",
            ),
        ];

        for (raw, expected) in cases {
            let err = GestureConfig::from_toml_str(raw).expect_err(raw);
            assert_eq!(err.to_string(), expected, "input: {raw}");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GestureConfig::from_toml_str("radius_px = 10.0").expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn custom_profile_is_evaluated_on_absolute_speed() {
        fn doubled(speed: f32) -> f32 {
            1.0 + speed * 2.0
        }
        let profile = SpeedProfile::Custom(doubled);
        assert_eq!(profile.multiplier(-0.5), 2.0);
    }
}
