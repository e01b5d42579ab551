use bitcoin::{
    opcodes::{
        all::{OP_CHECKSIG, OP_ENDIF, OP_IF},
        OP_FALSE,
    },
    script::{self, PushBytesBuf},
    secp256k1::XOnlyPublicKey,
    ScriptBuf,
};
use didbtc_primitives::constants::STACK_ELEMENT_SIZE_LIMIT;

use crate::EnvelopeError;

/// Builds the leaf script that commits to `payload` and is spendable by `signer`.
pub fn build_reveal_script(
    signer: &XOnlyPublicKey,
    payload: &[u8],
) -> Result<ScriptBuf, EnvelopeError> {
    let mut builder = script::Builder::new()
        .push_x_only_key(signer)
        .push_opcode(OP_CHECKSIG)
        .push_opcode(OP_FALSE)
        .push_opcode(OP_IF);

    for chunk in payload.chunks(STACK_ELEMENT_SIZE_LIMIT) {
        builder = builder.push_slice(PushBytesBuf::try_from(chunk.to_vec())?);
    }

    Ok(builder.push_opcode(OP_ENDIF).into_script())
}
