//! Shared domain enums, stored as TEXT columns

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use utoipa::ToSchema;

/// Implements string codes, human labels and TEXT column conversion for an enum.
/// Codes must match the serde representation of each variant.
macro_rules! text_enum {
    (
        $name:ident {
            $( $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $code => Ok($name::$variant), )+
                    _ => Err(format!("Invalid {} value: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

/// Event ("operation") workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Planning,
    AwaitingReview,
    AwaitingDeparture,
    InProgress,
    Finished,
    Cancelled,
}

text_enum!(EventStatus {
    Planning => ("PLANNING", "Planning"),
    AwaitingReview => ("AWAITING_REVIEW", "Awaiting review"),
    AwaitingDeparture => ("AWAITING_DEPARTURE", "Awaiting departure"),
    InProgress => ("IN_PROGRESS", "In progress"),
    Finished => ("FINISHED", "Finished"),
    Cancelled => ("CANCELLED", "Cancelled"),
});

/// Kind of engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Own,
    Sublease,
    Loan,
}

text_enum!(EventType {
    Own => ("OWN", "Own event"),
    Sublease => ("SUBLEASE", "Sublease"),
    Loan => ("LOAN", "Loan"),
});

/// Power available on site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerType {
    #[serde(rename = "220V")]
    V220,
    #[serde(rename = "380V")]
    V380,
    TwoPhase,
    ThreePhase,
    NotApplicable,
}

text_enum!(PowerType {
    V220 => ("220V", "220V"),
    V380 => ("380V", "380V"),
    TwoPhase => ("TWO_PHASE", "Two-phase"),
    ThreePhase => ("THREE_PHASE", "Three-phase"),
    NotApplicable => ("NOT_APPLICABLE", "Not applicable"),
});

/// Vehicle and cargo access on site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleAccess {
    Easy,
    Medium,
    Hard,
}

text_enum!(VehicleAccess {
    Easy => ("EASY", "Easy (dock, direct access)"),
    Medium => ("MEDIUM", "Medium (stairs, corridors)"),
    Hard => ("HARD", "Hard (restricted, hoisting)"),
});

/// Supply status of a planned material line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyStatus {
    Sufficient,
    Pending,
    Subleased,
    Loaned,
    Purchased,
    Substituted,
}

text_enum!(SupplyStatus {
    Sufficient => ("SUFFICIENT", "Stock OK"),
    Pending => ("PENDING", "Insufficient - action pending"),
    Subleased => ("SUBLEASED", "Resolved (sublease)"),
    Loaned => ("LOANED", "Resolved (loan)"),
    Purchased => ("PURCHASED", "Resolved (purchase)"),
    Substituted => ("SUBSTITUTED", "Resolved (substitution)"),
});

impl SupplyStatus {
    /// Tags recomputed from stock whenever the line is saved
    pub fn is_computed(&self) -> bool {
        matches!(self, SupplyStatus::Sufficient | SupplyStatus::Pending)
    }

    /// Tags accepted when resolving a shortage
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            SupplyStatus::Subleased | SupplyStatus::Loaned | SupplyStatus::Purchased
        )
    }
}

/// Condition grade of a returned item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnCondition {
    Good,
    Defect,
    Broken,
    Lost,
}

text_enum!(ReturnCondition {
    Good => ("GOOD", "Good condition"),
    Defect => ("DEFECT", "Defective"),
    Broken => ("BROKEN", "Broken"),
    Lost => ("LOST", "Lost"),
});

/// Maintenance record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    AwaitingEvaluation,
    InRepair,
    AwaitingParts,
    Repaired,
}

text_enum!(MaintenanceStatus {
    AwaitingEvaluation => ("AWAITING_EVALUATION", "Awaiting evaluation"),
    InRepair => ("IN_REPAIR", "In repair"),
    AwaitingParts => ("AWAITING_PARTS", "Awaiting parts"),
    Repaired => ("REPAIRED", "Repaired / back to stock"),
});

/// Equipment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCategory {
    Accessories,
    Adapters,
    Consoles,
    Effects,
    Structures,
    ConventionalLighting,
    Leds,
    MovingLights,
    Cables,
    DimmerRacks,
    Sound,
    Video,
    Other,
}

text_enum!(EquipmentCategory {
    Accessories => ("ACCESSORIES", "General accessories"),
    Adapters => ("ADAPTERS", "Adapters"),
    Consoles => ("CONSOLES", "Consoles"),
    Effects => ("EFFECTS", "Effects"),
    Structures => ("STRUCTURES", "Structures (box truss, platforms)"),
    ConventionalLighting => ("CONVENTIONAL_LIGHTING", "Conventional lighting"),
    Leds => ("LEDS", "LEDs"),
    MovingLights => ("MOVING_LIGHTS", "Moving lights"),
    Cables => ("CABLES", "Extensions and harnesses"),
    DimmerRacks => ("DIMMER_RACKS", "Dimmer racks"),
    Sound => ("SOUND", "Sound"),
    Video => ("VIDEO", "Video (LED panels, projection)"),
    Other => ("OTHER", "Other"),
});

/// Consumable category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumableCategory {
    Tapes,
    Fasteners,
    Connectors,
    Other,
}

text_enum!(ConsumableCategory {
    Tapes => ("TAPES", "Tapes (insulating, masking, silver)"),
    Fasteners => ("FASTENERS", "Fasteners (cable ties)"),
    Connectors => ("CONNECTORS", "Disposable connectors and adapters"),
    Other => ("OTHER", "Other consumables"),
});

/// Staff contract kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffKind {
    Employee,
    Freelancer,
}

text_enum!(StaffKind {
    Employee => ("EMPLOYEE", "Employee"),
    Freelancer => ("FREELANCER", "Freelancer"),
});

/// Vehicle availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    Travelling,
    InMaintenance,
}

text_enum!(VehicleStatus {
    Available => ("AVAILABLE", "Available"),
    Travelling => ("TRAVELLING", "Travelling"),
    InMaintenance => ("IN_MAINTENANCE", "In maintenance"),
});

/// User access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Planning,
    Logistics,
    Maintenance,
}

text_enum!(Role {
    Admin => ("admin", "Administrator"),
    Planning => ("planning", "Planning"),
    Logistics => ("logistics", "Logistics"),
    Maintenance => ("maintenance", "Maintenance"),
});

/// Who confirms an attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceParty {
    Leader,
    Member,
}

text_enum!(AttendanceParty {
    Leader => ("leader", "Team leader"),
    Member => ("member", "Crew member"),
});
/// Value/label pair for choice lists
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl EquipmentCategory {
    pub fn choices() -> Vec<Choice> {
        Self::ALL
            .iter()
            .map(|c| Choice {
                value: c.as_str(),
                label: c.label(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_status_round_trip_through_str() {
        for status in EventStatus::ALL {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), *status);
        }
        assert!("EM_ANDAMENTO".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&EventStatus::AwaitingDeparture).unwrap();
        assert_eq!(json, "\"AWAITING_DEPARTURE\"");
        let role: Role = serde_json::from_str("\"logistics\"").unwrap();
        assert_eq!(role, Role::Logistics);
        let power: PowerType = serde_json::from_str("\"220V\"").unwrap();
        assert_eq!(power, PowerType::V220);
    }

    #[test]
    fn test_codes_match_serde_representation() {
        fn check<T: Serialize>(values: &[T], code: impl Fn(&T) -> &'static str) {
            for v in values {
                assert_eq!(serde_json::to_string(v).unwrap(), format!("\"{}\"", code(v)));
            }
        }
        check(EventStatus::ALL, |v| v.as_str());
        check(EventType::ALL, |v| v.as_str());
        check(PowerType::ALL, |v| v.as_str());
        check(VehicleAccess::ALL, |v| v.as_str());
        check(SupplyStatus::ALL, |v| v.as_str());
        check(ReturnCondition::ALL, |v| v.as_str());
        check(MaintenanceStatus::ALL, |v| v.as_str());
        check(EquipmentCategory::ALL, |v| v.as_str());
        check(ConsumableCategory::ALL, |v| v.as_str());
        check(StaffKind::ALL, |v| v.as_str());
        check(VehicleStatus::ALL, |v| v.as_str());
        check(Role::ALL, |v| v.as_str());
        check(AttendanceParty::ALL, |v| v.as_str());
    }

    #[test]
    fn test_supply_status_groups() {
        assert!(SupplyStatus::Pending.is_computed());
        assert!(!SupplyStatus::Subleased.is_computed());
        assert!(SupplyStatus::Purchased.is_resolution());
        assert!(!SupplyStatus::Substituted.is_resolution());
        assert!(!SupplyStatus::Sufficient.is_resolution());
    }

    #[test]
    fn test_category_choices_cover_all_variants() {
        let choices = EquipmentCategory::choices();
        assert_eq!(choices.len(), EquipmentCategory::ALL.len());
        assert_eq!(choices[0].value, "ACCESSORIES");
    }
}
