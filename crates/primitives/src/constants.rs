//! Protocol constants shared by the builders and the resolver.

use bitcoin::{opcodes::all::OP_RETURN, script, Amount, ScriptBuf};

/// Smallest output value the builders will create.
pub const DUST_LIMIT: Amount = Amount::from_sat(330);

/// Largest single push allowed in a tapscript.
pub const STACK_ELEMENT_SIZE_LIMIT: usize = 520;

/// Marker that follows `OP_RETURN` in a single creation transaction.
pub const DID_CREATION_PREFIX: &[u8; 3] = b"did";

/// Marker that starts a batch creation reveal payload.
pub const BATCH_CREATION_PREFIX: &[u8; 4] = b"dids";

/// Payload pushed after `OP_RETURN` to deactivate a DID.
pub const DEACTIVATION_MARKER: &[u8; 1] = b"d";

/// Length of `"dids" || codec(2) || flags(1)` preceding the batch keys.
pub const BATCH_CREATION_HEADER_LEN: usize = BATCH_CREATION_PREFIX.len() + 2 + 1;

/// Builds the `OP_RETURN "d"` deactivation output script.
pub fn deactivation_script() -> ScriptBuf {
    script::Builder::new()
        .push_opcode(OP_RETURN)
        .push_slice(DEACTIVATION_MARKER)
        .into_script()
}
