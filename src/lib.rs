//! Stack-based interpreter for Bitcoin-style transaction scripts.
//!
//! The goal of this crate is to faithfully reproduce the behaviour of the
//! reference script engine for legacy (pre-segwit) spends: a byte-code
//! virtual machine that evaluates the predicate guarding a transaction
//! output against the unlocking script supplied by the spending input.
//!
//! The [`Engine`] runs the scriptSig, then the scriptPubKey, and — when the
//! [`VERIFY_P2SH`] flag recognizes a pay-to-script-hash output — the redeem
//! script recovered from the first stack.  [`verify_script`] wraps the whole
//! sequence for callers that just want a verdict.
//!
//! ```
//! use bitcoin::absolute::LockTime;
//! use bitcoin::transaction::Version;
//! use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness};
//! use txscript::{verify_script, VERIFY_NONE};
//!
//! let tx = Transaction {
//!     version: Version(1),
//!     lock_time: LockTime::ZERO,
//!     input: vec![TxIn {
//!         previous_output: OutPoint::default(),
//!         script_sig: ScriptBuf::new(),
//!         sequence: Sequence::MAX,
//!         witness: Witness::new(),
//!     }],
//!     output: vec![TxOut {
//!         value: Amount::from_sat(0),
//!         script_pubkey: ScriptBuf::new(),
//!     }],
//! };
//!
//! // 2 3 OP_ADD 5 OP_EQUAL
//! let script_pubkey = [0x52, 0x53, 0x93, 0x55, 0x87];
//! verify_script(&[], &script_pubkey, &tx, 0, VERIFY_NONE).expect("valid spend");
//! ```

use core::fmt;

use bitcoin::Transaction;

mod engine;
pub mod opcodes;
mod scriptnum;
mod sighash;
mod stack;

pub use engine::{Condition, Engine};
pub use opcodes::{
    disasm_script, disasm_script_pretty, parse_script, serialize_script, ParsedOpcode,
};
pub use scriptnum::{decode_num, encode_num, is_minimally_encoded, parse_scriptnum};
pub use sighash::{
    calc_signature_hash, SIG_HASH_ALL, SIG_HASH_ANY_ONE_CAN_PAY, SIG_HASH_NONE, SIG_HASH_SINGLE,
};
pub use stack::{cast_to_bool, ScriptStack};

/// Maximum number of bytes in a single script.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Maximum number of counted opcodes per script.
pub const MAX_OPS_PER_SCRIPT: usize = 201;
/// Maximum number of bytes in a single pushed element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Maximum combined depth of the data and alternate stacks.
pub const MAX_STACK_SIZE: usize = 1000;
/// Maximum number of public keys in an OP_CHECKMULTISIG.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Do not enable any verification options.
pub const VERIFY_NONE: u32 = 0;
/// Evaluate pay-to-script-hash (BIP16) redeem scripts.
pub const VERIFY_P2SH: u32 = 1 << 0;
/// Enforce strict encoding of signatures, hash types, and public keys.
pub const VERIFY_STRICTENC: u32 = 1 << 1;
/// Enforce strict DER (BIP66) signature encoding.
pub const VERIFY_DERSIG: u32 = 1 << 2;
/// Require signatures to use the low-S form.
pub const VERIFY_LOW_S: u32 = 1 << 3;
/// Require the OP_CHECKMULTISIG dummy argument to be empty.
pub const VERIFY_NULLDUMMY: u32 = 1 << 4;
/// Require minimal encodings for data pushes and numeric operands.
pub const VERIFY_MINIMALDATA: u32 = 1 << 5;
/// Discourage use of the upgradable NOP opcodes.
pub const VERIFY_DISCOURAGE_UPGRADABLE_NOPS: u32 = 1 << 6;
/// Require exactly one stack element to remain after evaluation.
pub const VERIFY_CLEANSTACK: u32 = 1 << 7;

const SUPPORTED_FLAGS: u32 = VERIFY_P2SH
    | VERIFY_STRICTENC
    | VERIFY_DERSIG
    | VERIFY_LOW_S
    | VERIFY_NULLDUMMY
    | VERIFY_MINIMALDATA
    | VERIFY_DISCOURAGE_UPGRADABLE_NOPS
    | VERIFY_CLEANSTACK;

/// Wrapper for script verification flags.
#[derive(Debug, Clone, Copy)]
pub struct ScriptFlags(u32);

impl ScriptFlags {
    pub fn from_bits(bits: u32) -> Result<Self, ScriptError> {
        if bits & !SUPPORTED_FLAGS != 0 {
            return Err(ScriptError::InvalidFlags);
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

/// The single failure kind reported for an aborted script.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The final stack top evaluated to false.
    EvalFalse,
    /// Execution finished with an empty data stack.
    EmptyStack,
    /// More than one element remained with the clean-stack flag set.
    CleanStack,
    /// A script exceeded the maximum script size.
    ScriptTooBig,
    /// A pushed element exceeded the maximum element size.
    ElementTooBig,
    /// The counted-opcode budget was exhausted.
    TooManyOperations,
    /// The combined stacks exceeded the maximum depth.
    StackOverflow,
    /// An OP_CHECKMULTISIG pubkey count was out of range.
    TooManyPubkeys,
    /// An OP_CHECKMULTISIG signature count was out of range.
    InvalidSignatureCount,
    /// A script ended in the middle of a push instruction.
    ShortScript,
    /// An opcode is unknown or malformed for its context.
    InvalidOpcode,
    /// A reserved opcode was encountered.
    ReservedOpcode,
    /// A disabled opcode was encountered.
    OpDisabled,
    /// OP_RETURN terminated the script.
    EarlyReturn,
    /// A verify-style opcode found a false condition.
    VerifyFailed,
    /// Conditional nesting was broken.
    UnbalancedConditional,
    /// A stack operation underflowed or indexed out of range.
    InvalidStackOperation,
    /// A data push did not use the minimal opcode for its payload.
    MinimalData,
    /// A numeric operand was not minimally encoded.
    MinimalNumberEncoding,
    /// A numeric operand exceeded the accepted length.
    NumberOverflow,
    /// A signature violated the strict encoding rules.
    InvalidSignatureEncoding,
    /// A public key violated the strict encoding rules.
    InvalidPubKeyEncoding,
    /// A signature carried an undefined hash type.
    InvalidHashType,
    /// The multisig dummy argument was not empty.
    SigNullDummy,
    /// A pay-to-script-hash scriptSig contained non-push opcodes.
    SigPushOnly,
    /// An upgradable NOP was executed while discouraged.
    DiscourageUpgradableNops,
    /// Verification flags contained unsupported bits.
    InvalidFlags,
    /// The input index does not exist in the transaction.
    InvalidIndex,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ScriptError::*;

        let description = match *self {
            EvalFalse => "script evaluated to false",
            EmptyStack => "stack empty at end of script execution",
            CleanStack => "stack is not clean after evaluation",
            ScriptTooBig => "script is larger than the maximum allowed size",
            ElementTooBig => "element is larger than the maximum allowed size",
            TooManyOperations => "too many operations in script",
            StackOverflow => "combined stack size exceeds the maximum",
            TooManyPubkeys => "invalid pubkey count in OP_CHECKMULTISIG",
            InvalidSignatureCount => "invalid signature count in OP_CHECKMULTISIG",
            ShortScript => "script ends in the middle of a push",
            InvalidOpcode => "invalid opcode",
            ReservedOpcode => "reserved opcode encountered",
            OpDisabled => "disabled opcode encountered",
            EarlyReturn => "script returned early",
            VerifyFailed => "verify failed on stack top",
            UnbalancedConditional => "unbalanced conditional",
            InvalidStackOperation => "invalid stack operation",
            MinimalData => "push is not minimally encoded",
            MinimalNumberEncoding => "number is not minimally encoded",
            NumberOverflow => "number exceeds the accepted length",
            InvalidSignatureEncoding => "invalid signature encoding",
            InvalidPubKeyEncoding => "invalid public key encoding",
            InvalidHashType => "invalid hash type",
            SigNullDummy => "multisig dummy argument is not empty",
            SigPushOnly => "pay-to-script-hash signature script is not push only",
            DiscourageUpgradableNops => "upgradable NOPs are discouraged",
            InvalidFlags => "script verification flags are invalid",
            InvalidIndex => "transaction input index is out of range",
        };

        f.write_str(description)
    }
}

impl std::error::Error for ScriptError {}

/// Verifies that `script_sig` satisfies `script_pubkey` for input
/// `input_index` of `tx` under the given flag bits.
pub fn verify_script(
    script_sig: &[u8],
    script_pubkey: &[u8],
    tx: &Transaction,
    input_index: usize,
    flags: u32,
) -> Result<(), ScriptError> {
    let flags = ScriptFlags::from_bits(flags)?;
    let mut engine = Engine::new(script_sig, script_pubkey, tx, input_index, flags)?;
    engine.execute()
}
