use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::status::{Expectedness, MatrixClassifier, Status, TransitionClassifier};

// ============================================================================
// Status Transition - immutable value object
// ============================================================================

/// Deserialization reads only the two statuses and re-classifies them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TransitionRecord")]
pub struct StatusTransition {
    from_status: Status,
    to_status: Status,
    expectedness: Expectedness,
}

impl StatusTransition {
    /// Classify with the standard expectedness matrix
    pub fn new(from_status: Status, to_status: Status) -> Self {
        Self::classified_by(from_status, to_status, &MatrixClassifier)
    }

    /// Classify with a caller-supplied classifier. Expectedness is computed once here.
    pub fn classified_by(
        from_status: Status,
        to_status: Status,
        classifier: &dyn TransitionClassifier,
    ) -> Self {
        Self {
            from_status,
            to_status,
            expectedness: classifier.classify(from_status, to_status),
        }
    }

    pub fn from_status(&self) -> Status {
        self.from_status
    }

    pub fn to_status(&self) -> Status {
        self.to_status
    }

    pub fn expectedness(&self) -> Expectedness {
        self.expectedness
    }

    pub fn is_abnormal(&self) -> bool {
        self.expectedness <= Expectedness::Abnormal
    }

    /// True for ABNORMAL as well as UNEXPECTED
    pub fn is_unexpected(&self) -> bool {
        self.expectedness <= Expectedness::Unexpected
    }

    /// True for FORESEEN as well as NEXT_UP
    pub fn is_foreseen(&self) -> bool {
        self.expectedness >= Expectedness::Foreseen
    }

    pub fn is_next_up(&self) -> bool {
        self.expectedness >= Expectedness::NextUp
    }
}

#[derive(Deserialize)]
struct TransitionRecord {
    from_status: Status,
    to_status: Status,
}

impl From<TransitionRecord> for StatusTransition {
    fn from(record: TransitionRecord) -> Self {
        StatusTransition::new(record.from_status, record.to_status)
    }
}

impl fmt::Display for StatusTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({:?})", self.from_status, self.to_status, self.expectedness)
    }
}

// ============================================================================
// Expectedness Setting - caller strictness, strictest first
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpectednessSetting {
    #[default]
    RequireNextUp,
    RequireForeseen,
    AllowUnexpected,
    AllowAbnormal,
}

impl ExpectednessSetting {
    /// Requirements demand a minimum bar; permissions lift a ban
    pub const fn is_requirement(self) -> bool {
        matches!(self, Self::RequireNextUp | Self::RequireForeseen)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequireNextUp => "REQUIRE_NEXT_UP",
            Self::RequireForeseen => "REQUIRE_FORESEEN",
            Self::AllowUnexpected => "ALLOW_UNEXPECTED",
            Self::AllowAbnormal => "ALLOW_ABNORMAL",
        }
    }
}

impl fmt::Display for ExpectednessSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown expectedness setting: {0}")]
pub struct ParseSettingError(pub String);

impl FromStr for ExpectednessSetting {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        [
            Self::RequireNextUp,
            Self::RequireForeseen,
            Self::AllowUnexpected,
            Self::AllowAbnormal,
        ]
        .into_iter()
        .find(|setting| setting.as_str() == normalized)
        .ok_or_else(|| ParseSettingError(s.to_string()))
    }
}

// ============================================================================
// Transition Validator - policy gate
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionValidator;

impl TransitionValidator {
    pub fn validate(&self, transition: &StatusTransition, setting: ExpectednessSetting) -> bool {
        use ExpectednessSetting::*;

        match setting {
            RequireNextUp => transition.is_next_up(),
            RequireForeseen => transition.is_foreseen(),
            _ if transition.is_abnormal() => setting == AllowAbnormal,
            _ if transition.is_unexpected() => matches!(setting, AllowAbnormal | AllowUnexpected),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Status::*;

    const SETTINGS: [ExpectednessSetting; 4] = [
        ExpectednessSetting::RequireNextUp,
        ExpectednessSetting::RequireForeseen,
        ExpectednessSetting::AllowUnexpected,
        ExpectednessSetting::AllowAbnormal,
    ];

    struct AlwaysForeseen;

    impl TransitionClassifier for AlwaysForeseen {
        fn classify(&self, _from: Status, _to: Status) -> Expectedness {
            Expectedness::Foreseen
        }
    }

    #[test]
    fn test_predicates_per_level() {
        // (from, to) chosen to hit each level
        let abnormal = StatusTransition::new(Paid, Pending);
        let unexpected = StatusTransition::new(AcceptedByInventory, Pending);
        let foreseen = StatusTransition::new(Pending, Paid);
        let next_up = StatusTransition::new(Pending, AcceptedByInventory);

        assert!(abnormal.is_abnormal() && abnormal.is_unexpected());
        assert!(!abnormal.is_foreseen() && !abnormal.is_next_up());

        assert!(!unexpected.is_abnormal() && unexpected.is_unexpected());
        assert!(!unexpected.is_foreseen());

        assert!(!foreseen.is_unexpected() && foreseen.is_foreseen());
        assert!(!foreseen.is_next_up());

        assert!(next_up.is_foreseen() && next_up.is_next_up());
        assert!(!next_up.is_unexpected());
    }

    #[test]
    fn test_exactly_one_of_unexpected_or_foreseen() {
        for from in Status::ALL {
            for to in Status::ALL {
                let t = StatusTransition::new(from, to);
                assert_ne!(t.is_unexpected(), t.is_foreseen(), "{t}");
            }
        }
    }

    #[test]
    fn test_custom_classifier() {
        let t = StatusTransition::classified_by(Delivered, Pending, &AlwaysForeseen);
        assert_eq!(t.expectedness(), Expectedness::Foreseen);
        assert_eq!(t.from_status(), Delivered);
        assert_eq!(t.to_status(), Pending);
    }

    #[test]
    fn test_deserialize_reclassifies() {
        let json = r#"{"from_status":"DELIVERED","to_status":"PENDING","expectedness":"NEXT_UP"}"#;
        let t: StatusTransition = serde_json::from_str(json).unwrap();

        assert_eq!(t.expectedness(), Expectedness::Abnormal);
        assert!(!TransitionValidator.validate(&t, ExpectednessSetting::RequireNextUp));

        let next_up = StatusTransition::new(Pending, AcceptedByInventory);
        let back: StatusTransition = serde_json::from_str(&serde_json::to_string(&next_up).unwrap()).unwrap();
        assert_eq!(back, next_up);
    }

    #[test]
    fn test_require_next_up_accepts_only_nominal_next() {
        for from in Status::ALL {
            for to in Status::ALL {
                let accepted = TransitionValidator
                    .validate(&StatusTransition::new(from, to), ExpectednessSetting::RequireNextUp);
                assert_eq!(accepted, from.nominal_next() == Some(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_require_foreseen() {
        let v = TransitionValidator;
        let s = ExpectednessSetting::RequireForeseen;
        assert!(v.validate(&StatusTransition::new(Pending, Shipped), s));
        assert!(v.validate(&StatusTransition::new(Pending, AcceptedByInventory), s));
        assert!(!v.validate(&StatusTransition::new(Pending, Cancelled), s));
        assert!(!v.validate(&StatusTransition::new(Paid, Paid), s));
    }

    #[test]
    fn test_allow_unexpected() {
        let v = TransitionValidator;
        let s = ExpectednessSetting::AllowUnexpected;
        assert!(v.validate(&StatusTransition::new(Shipped, Cancelled), s));
        assert!(v.validate(&StatusTransition::new(AcceptedByInventory, Pending), s));
        assert!(v.validate(&StatusTransition::new(Pending, Delivered), s));
        assert!(!v.validate(&StatusTransition::new(Delivered, Cancelled), s));
        assert!(!v.validate(&StatusTransition::new(Pending, Pending), s));
    }

    #[test]
    fn test_allow_abnormal_accepts_everything() {
        for from in Status::ALL {
            for to in Status::ALL {
                assert!(TransitionValidator.validate(
                    &StatusTransition::new(from, to),
                    ExpectednessSetting::AllowAbnormal
                ));
            }
        }
    }

    #[test]
    fn test_terminal_states_rejected_below_allow_abnormal() {
        for from in [Delivered, Cancelled] {
            for to in Status::ALL {
                let t = StatusTransition::new(from, to);
                for setting in &SETTINGS[..3] {
                    assert!(!TransitionValidator.validate(&t, *setting), "{t} under {setting}");
                }
            }
        }
    }

    #[test]
    fn test_setting_parsing_and_default() {
        assert_eq!(ExpectednessSetting::default(), ExpectednessSetting::RequireNextUp);
        assert_eq!("allow-abnormal".parse::<ExpectednessSetting>().unwrap(), ExpectednessSetting::AllowAbnormal);
        assert_eq!("REQUIRE_FORESEEN".parse::<ExpectednessSetting>().unwrap(), ExpectednessSetting::RequireForeseen);
        assert!("permissive".parse::<ExpectednessSetting>().is_err());
        assert!(SETTINGS.iter().filter(|s| s.is_requirement()).count() == 2);
    }
}
