mod derive;
mod types;

#[cfg(test)]
mod tests;

pub use derive::{derive_stage, matching_rule, DERIVATION_VERSION};
pub use types::{DerivationRule, DerivedStage, StageStatus, StatusCategory};
