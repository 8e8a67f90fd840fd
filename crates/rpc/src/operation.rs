//! Operation names accepted by [`crate::invoke`]

use crate::error::RpcError;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// A named operation of the command surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    Initialize,
    CreateKycProfile,
    AttachDocument,
    RegisterBank,
    RenewKycProfile,
    AllKycForBank,
    KycByUser,
    KycByBank,
    KycExpiringThisMonth,
    KycCreatedThisMonth,
    KycCounts,
    GetKycDocument,
    Reconcile,
}

impl Operation {
    /// Number of positional arguments the operation takes
    pub fn arity(&self) -> usize {
        match self {
            Operation::Initialize | Operation::Reconcile => 0,
            Operation::RegisterBank
            | Operation::AllKycForBank
            | Operation::KycByBank
            | Operation::KycExpiringThisMonth
            | Operation::KycCreatedThisMonth
            | Operation::KycCounts => 1,
            Operation::RenewKycProfile | Operation::KycByUser | Operation::GetKycDocument => 2,
            Operation::CreateKycProfile | Operation::AttachDocument => 3,
        }
    }

    /// Whether the operation can change ledger state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Initialize
                | Operation::CreateKycProfile
                | Operation::AttachDocument
                | Operation::RegisterBank
                | Operation::RenewKycProfile
                | Operation::Reconcile
        )
    }

    pub fn parse(name: &str) -> Result<Self, RpcError> {
        Self::from_str(name).map_err(|_| RpcError::UnknownOperation(name.to_string()))
    }
}
