use bitcoin::script::PushBytesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The spending witness has no leaf script element.
    #[error("witness does not contain a reveal script")]
    MissingRevealScript,

    /// The script is shorter than the fixed header and trailer.
    #[error("reveal script too short ({0} bytes)")]
    ScriptTooShort(usize),

    /// Only direct pushes, `OP_PUSHDATA1` and `OP_PUSHDATA2` may appear in the body.
    #[error("invalid push opcode {opcode:#04x} at offset {offset}")]
    InvalidPushOpcode { opcode: u8, offset: usize },

    /// A push runs past the end of the body.
    #[error("push at offset {offset} runs past the end of the envelope")]
    TruncatedPush { offset: usize },

    #[error("payload chunk: {0}")]
    PushBytes(#[from] PushBytesError),
}
