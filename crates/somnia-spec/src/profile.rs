//! Mix profiles: per mix-type fades, crossfade, category gains and filtering.
//!
//! Three profiles are builtin (`sleep`, `focus`, `relax`). A
//! [`ProfileRegistry`] holds them plus any custom profiles loaded from JSON,
//! and resolves unknown mix types to `sleep`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::CategoryLabel;
use crate::error::SpecError;

/// The builtin mix types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixType {
    Sleep,
    Focus,
    Relax,
}

impl MixType {
    /// Returns the profile name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MixType::Sleep => "sleep",
            MixType::Focus => "focus",
            MixType::Relax => "relax",
        }
    }
}

impl fmt::Display for MixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MixType {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(MixType::Sleep),
            "focus" => Ok(MixType::Focus),
            "relax" => Ok(MixType::Relax),
            other => Err(SpecError::InvalidProfile {
                name: other.to_string(),
            }),
        }
    }
}

/// Spectral shaping applied to the master. Exactly one per profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FrequencyShaping {
    /// Single low-pass cutoff.
    LowPass {
        /// Cutoff in Hz.
        cutoff_hz: f64,
    },
    /// Low-pass at `high_hz` followed by high-pass at `low_hz`.
    BandPass {
        /// High-pass cutoff in Hz.
        low_hz: f64,
        /// Low-pass cutoff in Hz.
        high_hz: f64,
    },
}

/// Per mix-type parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixProfile {
    /// Profile name; matched against the request's mix type.
    pub name: String,
    /// Linear fade-in length.
    pub fade_in_ms: u64,
    /// Linear fade-out length.
    pub fade_out_ms: u64,
    /// Crossfade between consecutive clips in a category bed.
    pub crossfade_ms: u64,
    /// Gain applied to each category bed, in dB.
    pub gains_db: BTreeMap<CategoryLabel, f64>,
    /// Master filter.
    pub shaping: FrequencyShaping,
}

impl MixProfile {
    /// Returns the builtin profile for a mix type.
    pub fn builtin(mix_type: MixType) -> Self {
        use CategoryLabel::*;

        let (fade, crossfade, gains, shaping) = match mix_type {
            MixType::Sleep => (
                10_000,
                5_000,
                [0.0, -6.0, -3.0, -2.0, 0.0, -4.0],
                FrequencyShaping::LowPass { cutoff_hz: 4000.0 },
            ),
            MixType::Focus => (
                5_000,
                3_000,
                [-3.0, -10.0, 0.0, -4.0, -2.0, -5.0],
                FrequencyShaping::BandPass {
                    low_hz: 500.0,
                    high_hz: 6000.0,
                },
            ),
            MixType::Relax => (
                8_000,
                4_000,
                [-2.0, -8.0, -5.0, 0.0, 0.0, -3.0],
                FrequencyShaping::LowPass { cutoff_hz: 8000.0 },
            ),
        };

        let gains_db = [Rain, Thunder, WhiteNoise, Nature, Water, Other]
            .into_iter()
            .zip(gains)
            .collect();

        Self {
            name: mix_type.as_str().to_string(),
            fade_in_ms: fade,
            fade_out_ms: fade,
            crossfade_ms: crossfade,
            gains_db,
            shaping,
        }
    }

    /// Gain for a category, if the profile defines one.
    pub fn gain_db(&self, label: CategoryLabel) -> Option<f64> {
        self.gains_db.get(&label).copied()
    }

    /// Checks filter cutoffs and gains.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.name.trim().is_empty() {
            return Err(SpecError::invalid_config("profile.name", "must not be empty"));
        }
        match self.shaping {
            FrequencyShaping::LowPass { cutoff_hz } => {
                if cutoff_hz.is_nan() || cutoff_hz <= 0.0 {
                    return Err(SpecError::invalid_config(
                        "profile.shaping.cutoff_hz",
                        format!("must be positive, got {}", cutoff_hz),
                    ));
                }
            }
            FrequencyShaping::BandPass { low_hz, high_hz } => {
                if low_hz.is_nan() || low_hz <= 0.0 || high_hz.is_nan() || high_hz <= low_hz {
                    return Err(SpecError::invalid_config(
                        "profile.shaping",
                        format!("band-pass needs 0 < low < high, got {}..{}", low_hz, high_hz),
                    ));
                }
            }
        }
        if let Some((label, gain)) = self.gains_db.iter().find(|(_, g)| !g.is_finite()) {
            return Err(SpecError::invalid_config(
                format!("profile.gains_db.{}", label),
                format!("must be finite, got {}", gain),
            ));
        }
        Ok(())
    }

    /// Parses and validates a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let profile: MixProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }
}

/// Profiles keyed by mix-type name.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, MixProfile>,
    fallback: MixProfile,
}

impl ProfileRegistry {
    /// Registry with the three builtin profiles.
    pub fn builtin() -> Self {
        let profiles = [MixType::Sleep, MixType::Focus, MixType::Relax]
            .into_iter()
            .map(|t| (t.as_str().to_string(), MixProfile::builtin(t)))
            .collect();
        Self {
            profiles,
            fallback: MixProfile::builtin(MixType::Sleep),
        }
    }

    /// Adds or replaces a profile. Replacing `sleep` also replaces the fallback.
    pub fn register(&mut self, profile: MixProfile) -> Result<(), SpecError> {
        profile.validate()?;
        if profile.name == MixType::Sleep.as_str() {
            self.fallback = profile.clone();
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Looks up a profile by name.
    pub fn get(&self, name: &str) -> Option<&MixProfile> {
        self.profiles.get(name)
    }

    /// Looks up a profile, failing with [`SpecError::InvalidProfile`].
    pub fn resolve(&self, name: &str) -> Result<&MixProfile, SpecError> {
        self.get(name).ok_or_else(|| SpecError::InvalidProfile {
            name: name.to_string(),
        })
    }

    /// Looks up a profile, falling back to `sleep` for unknown names.
    pub fn resolve_or_default(&self, name: &str) -> &MixProfile {
        match self.resolve(name) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(mix_type = name, error = %err, "falling back to sleep profile");
                &self.fallback
            }
        }
    }

    /// Registered profile names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
