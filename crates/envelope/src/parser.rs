use bitcoin::{
    opcodes::all::{OP_PUSHDATA1, OP_PUSHDATA2},
    Witness,
};

use crate::{EnvelopeError, REVEAL_SCRIPT_HEADER_LEN};

/// Extracts the inscribed payload from the witness of a reveal input.
pub fn parse_reveal_payload(witness: &Witness) -> Result<Vec<u8>, EnvelopeError> {
    let script = witness.nth(1).ok_or(EnvelopeError::MissingRevealScript)?;
    parse_envelope_body(script)
}

/// Concatenates the pushes between the reveal-script header and the trailing `OP_ENDIF`.
pub fn parse_envelope_body(script: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    if script.len() <= REVEAL_SCRIPT_HEADER_LEN {
        return Err(EnvelopeError::ScriptTooShort(script.len()));
    }
    let body = &script[REVEAL_SCRIPT_HEADER_LEN..script.len() - 1];

    let mut payload = Vec::with_capacity(body.len());
    let mut pos = 0;
    while pos < body.len() {
        let offset = pos;
        let opcode = body[pos];
        pos += 1;

        let len = match opcode {
            1..=75 => opcode as usize,
            op if op == OP_PUSHDATA1.to_u8() => {
                let len = *body
                    .get(pos)
                    .ok_or(EnvelopeError::TruncatedPush { offset })?;
                pos += 1;
                len as usize
            }
            op if op == OP_PUSHDATA2.to_u8() => {
                let len = body
                    .get(pos..pos + 2)
                    .ok_or(EnvelopeError::TruncatedPush { offset })?;
                pos += 2;
                u16::from_le_bytes([len[0], len[1]]) as usize
            }
            _ => return Err(EnvelopeError::InvalidPushOpcode { opcode, offset }),
        };

        let chunk = body
            .get(pos..pos + len)
            .ok_or(EnvelopeError::TruncatedPush { offset })?;
        payload.extend_from_slice(chunk);
        pos += len;
    }

    Ok(payload)
}
