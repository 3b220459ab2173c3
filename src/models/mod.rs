pub mod alert;
pub mod chat;
pub mod error;
pub mod reading;
pub mod report;

pub use alert::RiskAlert;
pub use chat::{ChatMessage, ChatRule};
pub use error::{HmpiError, Result};
pub use reading::{MetalReading, SafetyCategory};
pub use report::{MetalStatus, WaterSafetyReport};
