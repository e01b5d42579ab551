//! Reveal-script envelopes.
//!
//! Payloads are inscribed in the leaf script of the commit output:
//!
//! ```text
//! <tweaked key> OP_CHECKSIG OP_FALSE OP_IF <chunk> <chunk> ... OP_ENDIF
//! ```
//!
//! Each chunk is at most 520 bytes. The script is revealed as the second witness element
//! of the transaction that spends the commit output.

mod builder;
mod errors;
mod parser;

pub use builder::build_reveal_script;
pub use errors::EnvelopeError;
pub use parser::{parse_envelope_body, parse_reveal_payload};

/// Bytes before the first payload push: the 32 byte key push, `OP_CHECKSIG`, `OP_FALSE` and
/// `OP_IF`.
pub const REVEAL_SCRIPT_HEADER_LEN: usize = 1 + 32 + 1 + 1 + 1;
