use serde::{Deserialize, Serialize};

/// Human status label of a contract.
///
/// The labels are part of the observable contract of the system (dashboards
/// match on them), so `Display` and serde both use the exact label text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StageStatus {
    /// Created; Manager has not entered the stage 2 quality report.
    #[serde(rename = "Pending Quality Entry")]
    PendingQualityEntry,

    /// Manager data is in; the Chairman has to decide the current gate.
    #[serde(rename = "Pending Chairman Approval")]
    PendingChairmanApproval,

    /// Quality approved; Manager has to enter sampling.
    #[serde(rename = "Pending Sampling")]
    PendingSampling,

    /// Sampling entered; Manager has to enter CTS results.
    #[serde(rename = "Pending CTS Entry")]
    PendingCtsEntry,

    /// CTS approved; Manager has to enter the payment requisition.
    #[serde(rename = "Pending Payment Entry")]
    PendingPaymentEntry,

    /// Chairman sent the payment requisition back to the Manager.
    #[serde(rename = "Rollback Requested")]
    RollbackRequested,

    /// Payment approved. Terminal.
    #[serde(rename = "Closed")]
    Closed,
}

impl StageStatus {
    pub fn label(self) -> &'static str {
        match self {
            StageStatus::PendingQualityEntry => "Pending Quality Entry",
            StageStatus::PendingChairmanApproval => "Pending Chairman Approval",
            StageStatus::PendingSampling => "Pending Sampling",
            StageStatus::PendingCtsEntry => "Pending CTS Entry",
            StageStatus::PendingPaymentEntry => "Pending Payment Entry",
            StageStatus::RollbackRequested => "Rollback Requested",
            StageStatus::Closed => "Closed",
        }
    }

    pub fn category(self) -> StatusCategory {
        match self {
            StageStatus::Closed => StatusCategory::Completed,
            StageStatus::RollbackRequested => StatusCategory::Attention,
            _ => StatusCategory::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == StageStatus::Closed
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dashboard grouping of statuses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Pending,
    Completed,
    Attention,
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCategory::Pending => write!(f, "pending"),
            StatusCategory::Completed => write!(f, "completed"),
            StatusCategory::Attention => write!(f, "attention"),
        }
    }
}

/// Current position of a contract in the workflow.
///
/// `stage` is 2..=6: stage 1 (creation) is complete as soon as the contract
/// exists, and 6 means closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DerivedStage {
    pub stage: u8,
    pub status: StageStatus,
}

impl DerivedStage {
    pub const fn new(stage: u8, status: StageStatus) -> Self {
        Self { stage, status }
    }
}

impl std::fmt::Display for DerivedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {} ({})", self.stage, self.status)
    }
}

/// The rules of the derivation cascade, in evaluation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DerivationRule {
    PaymentApproved,
    PaymentRollback,
    PaymentEntered,
    CtsApproved,
    CtsEntered,
    SamplingEntered,
    QualityApproved,
    QualityReported,
    Created,
}

impl DerivationRule {
    pub const ALL: [DerivationRule; 9] = [
        DerivationRule::PaymentApproved,
        DerivationRule::PaymentRollback,
        DerivationRule::PaymentEntered,
        DerivationRule::CtsApproved,
        DerivationRule::CtsEntered,
        DerivationRule::SamplingEntered,
        DerivationRule::QualityApproved,
        DerivationRule::QualityReported,
        DerivationRule::Created,
    ];

    /// 1-based position in the cascade
    pub fn index(self) -> u8 {
        match self {
            DerivationRule::PaymentApproved => 1,
            DerivationRule::PaymentRollback => 2,
            DerivationRule::PaymentEntered => 3,
            DerivationRule::CtsApproved => 4,
            DerivationRule::CtsEntered => 5,
            DerivationRule::SamplingEntered => 6,
            DerivationRule::QualityApproved => 7,
            DerivationRule::QualityReported => 8,
            DerivationRule::Created => 9,
        }
    }

    pub fn outcome(self) -> DerivedStage {
        match self {
            DerivationRule::PaymentApproved => DerivedStage::new(6, StageStatus::Closed),
            DerivationRule::PaymentRollback => {
                DerivedStage::new(5, StageStatus::RollbackRequested)
            }
            DerivationRule::PaymentEntered => {
                DerivedStage::new(5, StageStatus::PendingChairmanApproval)
            }
            DerivationRule::CtsApproved => DerivedStage::new(5, StageStatus::PendingPaymentEntry),
            DerivationRule::CtsEntered => {
                DerivedStage::new(4, StageStatus::PendingChairmanApproval)
            }
            DerivationRule::SamplingEntered => DerivedStage::new(4, StageStatus::PendingCtsEntry),
            DerivationRule::QualityApproved => DerivedStage::new(3, StageStatus::PendingSampling),
            DerivationRule::QualityReported => {
                DerivedStage::new(2, StageStatus::PendingChairmanApproval)
            }
            DerivationRule::Created => DerivedStage::new(2, StageStatus::PendingQualityEntry),
        }
    }
}
