//! Purposes a clip can be scored for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sleep phase targeted by a sleep mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepPhase {
    FallingAsleep,
    DeepSleep,
    Rem,
}

/// What a mix is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Purpose {
    Sleep { phase: SleepPhase },
    Focus,
    Relax,
}

impl Purpose {
    /// The builtin mix type best matching this purpose.
    pub fn mix_type(&self) -> &'static str {
        match self {
            Purpose::Sleep { .. } => "sleep",
            Purpose::Focus => "focus",
            Purpose::Relax => "relax",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Sleep { phase } => match phase {
                SleepPhase::FallingAsleep => f.write_str("sleep/falling_asleep"),
                SleepPhase::DeepSleep => f.write_str("sleep/deep_sleep"),
                SleepPhase::Rem => f.write_str("sleep/rem"),
            },
            Purpose::Focus => f.write_str("focus"),
            Purpose::Relax => f.write_str("relax"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_purpose_serde_tagged() {
        let purpose = Purpose::Sleep {
            phase: SleepPhase::DeepSleep,
        };
        let json = serde_json::to_string(&purpose).unwrap();
        assert_eq!(json, r#"{"type":"sleep","phase":"deep_sleep"}"#);
        let back: Purpose = serde_json::from_str(&json).unwrap();
        assert_eq!(back, purpose);
    }

    #[test]
    fn test_mix_type_mapping() {
        assert_eq!(Purpose::Focus.mix_type(), "focus");
        assert_eq!(
            Purpose::Sleep {
                phase: SleepPhase::Rem
            }
            .mix_type(),
            "sleep"
        );
    }
}
