//! Operation dispatch
//!
//! Argument counts are checked before the ledger is touched, so a
//! malformed call never changes state. Query payloads are JSON; writes
//! return no payload.

use crate::error::RpcResult;
use crate::operation::Operation;
use kycledger_core::{KycProfile, KycRecord};
use kycledger_registry::{KycLedger, ProfileEntry, RegistryError};
use kycledger_store::LedgerStore;
use serde::Serialize;
use tracing::{debug, info};

/// Payload returned by `kycByUser` when the user has no profile at the bank
pub const USER_NOT_FOUND: &str = "User KYC is not exist";

/// Payload returned by `getKycDocument` when no document is stored
pub const DOCUMENT_NOT_FOUND: &str = "Document not exist";

/// Run a named operation against the ledger
pub fn invoke<S: LedgerStore>(
    ledger: &mut KycLedger<S>,
    operation: &str,
    args: &[String],
) -> RpcResult<Option<Vec<u8>>> {
    let op = Operation::parse(operation)?;
    RegistryError::check_args(operation, args, op.arity())?;
    let payload = execute(ledger, op, args)?;
    if op.is_write() {
        info!(operation, "write applied");
    } else {
        debug!(operation, bytes = payload.as_ref().map_or(0, Vec::len), "query answered");
    }
    Ok(payload)
}

fn execute<S: LedgerStore>(
    ledger: &mut KycLedger<S>,
    op: Operation,
    args: &[String],
) -> RpcResult<Option<Vec<u8>>> {
    let payload = match op {
        Operation::Initialize => {
            ledger.initialize()?;
            None
        }
        Operation::CreateKycProfile => {
            ledger.create_kyc_profile(&args[0], &args[1], &args[2])?;
            None
        }
        Operation::AttachDocument => {
            ledger.attach_document(&args[0], &args[1], &args[2])?;
            None
        }
        Operation::RegisterBank => {
            ledger.register_bank(&args[0])?;
            None
        }
        Operation::RenewKycProfile => {
            ledger.renew_kyc_profile(&args[0], &args[1])?;
            None
        }
        Operation::AllKycForBank => Some(entries(&ledger.all_kyc_for_bank(&args[0])?)?),
        Operation::KycByBank => Some(entries(&ledger.kyc_by_bank(&args[0])?)?),
        Operation::KycByUser => match ledger.kyc_by_user(&args[0], &args[1])? {
            Some(profile) => Some(json(&[KycRecord::from(&profile)])?),
            None => Some(json(USER_NOT_FOUND)?),
        },
        Operation::KycExpiringThisMonth => {
            Some(records(&ledger.kyc_expiring_this_month(&args[0])?)?)
        }
        Operation::KycCreatedThisMonth => {
            Some(records(&ledger.kyc_created_this_month(&args[0])?)?)
        }
        Operation::KycCounts => Some(json(&ledger.kyc_counts(&args[0])?)?),
        Operation::GetKycDocument => match ledger.get_document(&args[0], &args[1])? {
            Some(blob) => Some(json(&blob)?),
            None => Some(json(DOCUMENT_NOT_FOUND)?),
        },
        Operation::Reconcile => Some(json(&ledger.reconcile()?)?),
    };
    Ok(payload)
}

fn json<T: Serialize + ?Sized>(value: &T) -> RpcResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn entries(entries: &[ProfileEntry]) -> RpcResult<Vec<u8>> {
    let records: Vec<KycRecord> = entries.iter().map(ProfileEntry::to_record).collect();
    json(&records)
}

fn records(profiles: &[KycProfile]) -> RpcResult<Vec<u8>> {
    let records: Vec<KycRecord> = profiles.iter().map(KycRecord::from).collect();
    json(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use kycledger_core::{FixedClock, KycCount};
    use kycledger_registry::RegistryConfig;
    use kycledger_store::MemoryStore;
    use std::sync::Arc;
    use strum::IntoEnumIterator;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn ledger() -> KycLedger<MemoryStore> {
        let mut ledger = KycLedger::new(MemoryStore::new(), RegistryConfig::default())
            .with_clock(Arc::new(FixedClock::ymd(2024, 3, 15).unwrap()));
        invoke(&mut ledger, "initialize", &[]).unwrap();
        invoke(&mut ledger, "registerBank", &args(&["ABC"])).unwrap();
        ledger
    }

    fn decode<T: serde::de::DeserializeOwned>(payload: Option<Vec<u8>>) -> T {
        serde_json::from_slice(&payload.unwrap()).unwrap()
    }

    #[test]
    fn test_writes_return_no_payload() {
        let mut ledger = ledger();
        let out = invoke(&mut ledger, "createKycProfile", &args(&["U1", "ABC", "Alice"])).unwrap();
        assert!(out.is_none());
        let out = invoke(&mut ledger, "renewKycProfile", &args(&["U1", "Alice B"])).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_kyc_by_user_found_and_sentinel() {
        let mut ledger = ledger();
        invoke(&mut ledger, "createKycProfile", &args(&["U1", "ABC", "Alice"])).unwrap();

        let found: Vec<KycRecord> =
            decode(invoke(&mut ledger, "kycByUser", &args(&["U1", "ABC"])).unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_name, "Alice");

        let missing: String = decode(invoke(&mut ledger, "kycByUser", &args(&["U9", "ABC"])).unwrap());
        assert_eq!(missing, USER_NOT_FOUND);

        let other_bank: String =
            decode(invoke(&mut ledger, "kycByUser", &args(&["U1", "XYZ"])).unwrap());
        assert_eq!(other_bank, USER_NOT_FOUND);
    }

    #[test]
    fn test_document_sentinel() {
        let mut ledger = ledger();
        let missing: String =
            decode(invoke(&mut ledger, "getKycDocument", &args(&["U1", "PASSPORT"])).unwrap());
        assert_eq!(missing, DOCUMENT_NOT_FOUND);
    }

    #[test]
    fn test_counts_payload() {
        let mut ledger = ledger();
        invoke(&mut ledger, "createKycProfile", &args(&["U1", "ABC", "Alice"])).unwrap();
        let raw = invoke(&mut ledger, "kycCounts", &args(&["ABC"])).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["AllContracts"], 1);
        assert_eq!(value["CreatedContracts"], 1);
        assert_eq!(value["ExpiringContracts"], 0);

        let counts: KycCount = serde_json::from_slice(&raw).unwrap();
        assert_eq!(counts.all, 1);
    }

    #[test]
    fn test_wrong_argument_count_changes_nothing() {
        let mut ledger = ledger();
        let err = invoke(&mut ledger, "createKycProfile", &args(&["U1", "ABC"])).unwrap_err();
        assert!(matches!(err, RpcError::Registry(ref e) if e.is_argument_error()));
        assert_eq!(
            err.to_string(),
            "Incorrect number of arguments for createKycProfile. Need 3, got 2"
        );

        let listed: Vec<KycRecord> = decode(invoke(&mut ledger, "kycByBank", &args(&["ABC"])).unwrap());
        assert!(listed.is_empty());
        assert!(invoke(&mut ledger, "kycCounts", &[]).is_err());
    }

    #[test]
    fn test_every_operation_rejects_extra_argument() {
        let mut ledger = ledger();
        invoke(&mut ledger, "createKycProfile", &args(&["U1", "ABC", "Alice"])).unwrap();
        let before = ledger.store().clone();

        for op in Operation::iter() {
            let extra: Vec<String> = (0..=op.arity()).map(|i| format!("arg{i}")).collect();
            let err = invoke(&mut ledger, &op.to_string(), &extra).unwrap_err();
            assert!(
                matches!(err, RpcError::Registry(ref e) if e.is_argument_error()),
                "{op} accepted {} arguments",
                extra.len()
            );
            if op.arity() > 0 {
                let short = &extra[..op.arity() - 1];
                assert!(invoke(&mut ledger, &op.to_string(), short).is_err());
            }
        }
        assert_eq!(ledger.store(), &before);
    }

    #[test]
    fn test_unknown_operation() {
        let mut ledger = ledger();
        let err = invoke(&mut ledger, "dropTables", &[]).unwrap_err();
        assert!(matches!(err, RpcError::UnknownOperation(_)));
    }
}
