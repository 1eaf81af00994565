//! # Assembler
//!
//! Maps scene facts to ALERT and ADVISORY message payloads.
//!
//! Both families share one extraction layer ([`extract`]) and one
//! [`GeoTimeConverter`](contracts::GeoTimeConverter) so coordinates,
//! timestamps and advisory codes are derived identically. The rolling
//! `msgCnt` is an explicit [`MsgCount`](contracts::MsgCount) threaded
//! through [`build_messages`].

pub mod advisory;
pub mod alert;
pub mod extract;
pub mod itis;

mod batch;
mod error;
#[cfg(test)]
mod fixture;

pub use advisory::assemble_advisory;
pub use alert::assemble_alert;
pub use batch::{advisory_messages, alert_messages, assemble_json, build_messages, BatchOutput};
pub use error::{AssemblyError, Result};
pub use extract::AssemblyContext;
pub use itis::{derive_codes, ItisCode};
