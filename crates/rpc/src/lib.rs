//! KycLedger RPC - named operations and CLI
//!
//! Every operation takes a flat list of string arguments and returns
//! either nothing or a JSON payload, the same surface a chaincode-style
//! invocation framework would call.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod operation;

pub use context::AppContext;
pub use dispatch::invoke;
pub use error::{RpcError, RpcResult};
pub use operation::Operation;
