//! Data models for Novalite

pub mod addendum;
pub mod attendance;
pub mod client;
pub mod consumable;
pub mod enums;
pub mod equipment;
pub mod event;
pub mod maintenance;
pub mod material;
pub mod photo;
pub mod report;
pub mod staff;
pub mod user;
pub mod vehicle;
pub mod workflow;

// Re-export commonly used types
pub use client::Client;
pub use enums::{EventStatus, EventType, MaintenanceStatus, ReturnCondition, Role, SupplyStatus};
pub use equipment::Equipment;
pub use event::{Event, EventDetails, EventShort};
pub use material::{PlannedMaterial, ReturnedItem};
pub use user::{User, UserClaims};
