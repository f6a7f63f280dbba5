//! Domain layer: pure authorization logic. No I/O, no clocks, no globals.

pub mod authenticator;
pub mod collector;
pub mod payload;
pub mod policy;
pub mod transaction;

pub use authenticator::Authenticator;
pub use collector::{AggregateSignature, IndexedSignature, SignatureCollector, SignerBitmap};
pub use payload::TransferCall;
pub use policy::MultisigPolicy;
pub use transaction::{RawTransaction, SignedTransaction};
