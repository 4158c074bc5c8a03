// Domain layer - Charge-log models and rules
pub mod charge;
pub mod error;
pub mod insight;
