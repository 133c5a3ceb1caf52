//! Transaction digest construction and signature checking.
//!
//! Legacy sighash semantics: the digest commits to a modified copy of the
//! spending transaction whose shape depends on the hash type byte carried at
//! the end of each signature.  The subscript placed in the signed input is
//! the currently executing script from the last OP_CODESEPARATOR onward,
//! with any pushes of the signature itself removed.

use std::sync::OnceLock;

use bitcoin::consensus;
use bitcoin::hashes::{sha256d, Hash};
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, VerifyOnly};
use bitcoin::{Amount, ScriptBuf, Sequence, Transaction, TxOut, Witness};

use crate::opcodes::{ParsedOpcode, OP_CODESEPARATOR, OP_DATA_1, OP_PUSHDATA4};
use crate::{ScriptError, ScriptFlags, VERIFY_DERSIG, VERIFY_LOW_S, VERIFY_STRICTENC};

/// Sign all outputs.
pub const SIG_HASH_ALL: u8 = 0x01;
/// Sign no outputs.
pub const SIG_HASH_NONE: u8 = 0x02;
/// Sign only the output with the same index as the input being signed.
pub const SIG_HASH_SINGLE: u8 = 0x03;
/// Commit to this input only, letting others be added freely.
pub const SIG_HASH_ANY_ONE_CAN_PAY: u8 = 0x80;

const SIG_HASH_MASK: u8 = 0x1f;

static SECP256K1: OnceLock<Secp256k1<VerifyOnly>> = OnceLock::new();

fn with_verification_ctx<R>(f: impl FnOnce(&Secp256k1<VerifyOnly>) -> R) -> R {
    f(SECP256K1.get_or_init(Secp256k1::verification_only))
}

/// Removes every data-push instruction whose payload equals `sig` exactly.
///
/// Matching is done on instruction boundaries of the already-parsed script,
/// never on raw bytes, so a signature that happens to collide with opcode
/// bytes cannot split an unrelated instruction.
pub fn strip_signature(pops: &mut Vec<ParsedOpcode>, sig: &[u8]) {
    pops.retain(|pop| {
        !((OP_DATA_1..=OP_PUSHDATA4).contains(&pop.value()) && pop.data == sig)
    });
}

/// Computes the double-SHA256 digest a signature over `script` commits to.
///
/// `script` is the subscript after signature removal.  For SIGHASH_SINGLE
/// with no output at the input's index the sentinel digest 1 is returned,
/// preserving the historical behavior that consensus relies on.
pub fn calc_signature_hash(
    script: &[ParsedOpcode],
    hash_type: u8,
    tx: &Transaction,
    tx_idx: usize,
) -> Result<[u8; 32], ScriptError> {
    if hash_type & SIG_HASH_MASK == SIG_HASH_SINGLE && tx_idx >= tx.output.len() {
        let mut digest = [0u8; 32];
        digest[0] = 1;
        return Ok(digest);
    }

    // Any code separators remaining past the last executed one are not part
    // of the signed script.
    let mut script_bytes = Vec::new();
    for pop in script.iter().filter(|pop| pop.value() != OP_CODESEPARATOR) {
        script_bytes.extend_from_slice(&pop.serialize()?);
    }
    let anyone_can_pay = hash_type & SIG_HASH_ANY_ONE_CAN_PAY != 0;
    let base = hash_type & SIG_HASH_MASK;

    let mut inputs = Vec::with_capacity(tx.input.len());
    for (i, txin) in tx.input.iter().enumerate() {
        if anyone_can_pay && i != tx_idx {
            continue;
        }
        let mut input = txin.clone();
        input.witness = Witness::new();
        input.script_sig = if i == tx_idx {
            ScriptBuf::from_bytes(script_bytes.clone())
        } else {
            ScriptBuf::new()
        };
        if i != tx_idx && (base == SIG_HASH_NONE || base == SIG_HASH_SINGLE) {
            input.sequence = Sequence::ZERO;
        }
        inputs.push(input);
    }

    let outputs = match base {
        SIG_HASH_NONE => Vec::new(),
        SIG_HASH_SINGLE => {
            let mut outputs = Vec::with_capacity(tx_idx + 1);
            for (i, txout) in tx.output.iter().take(tx_idx + 1).enumerate() {
                if i == tx_idx {
                    outputs.push(txout.clone());
                } else {
                    // Empty script with value -1 on the wire.
                    outputs.push(TxOut {
                        value: Amount::from_sat(u64::MAX),
                        script_pubkey: ScriptBuf::new(),
                    });
                }
            }
            outputs
        }
        _ => tx.output.clone(),
    };

    let tx_copy = Transaction {
        version: tx.version,
        lock_time: tx.lock_time,
        input: inputs,
        output: outputs,
    };

    let mut serialized = consensus::serialize(&tx_copy);
    serialized.extend_from_slice(&(hash_type as u32).to_le_bytes());
    Ok(sha256d::Hash::hash(&serialized).to_byte_array())
}

/// Enforces the strictness flags on a signature-with-hashtype blob.
///
/// The hash type byte is validated before the signature body, so a blob
/// that is malformed in both ways reports the hash type problem.
pub fn check_signature_encoding(
    sig_with_hashtype: &[u8],
    flags: ScriptFlags,
) -> Result<(), ScriptError> {
    let Some(&hash_type) = sig_with_hashtype.last() else {
        return Ok(());
    };
    let bits = flags.bits();

    if bits & VERIFY_STRICTENC != 0 && !is_defined_hashtype(hash_type) {
        return Err(ScriptError::InvalidHashType);
    }
    if bits & (VERIFY_STRICTENC | VERIFY_DERSIG | VERIFY_LOW_S) != 0
        && !is_strict_der_signature(sig_with_hashtype)
    {
        return Err(ScriptError::InvalidSignatureEncoding);
    }
    if bits & VERIFY_LOW_S != 0 && !has_low_s(sig_with_hashtype) {
        return Err(ScriptError::InvalidSignatureEncoding);
    }
    Ok(())
}

/// Enforces the strictness flags on a public key.
pub fn check_pubkey_encoding(pubkey: &[u8], flags: ScriptFlags) -> Result<(), ScriptError> {
    if flags.bits() & VERIFY_STRICTENC != 0 && !is_valid_pubkey_encoding(pubkey) {
        return Err(ScriptError::InvalidPubKeyEncoding);
    }
    Ok(())
}

/// Parses a DER signature, strictly when the flags demand it and laxly
/// otherwise.  Returns `None` on malformed input; the callers translate
/// that into a false verification result rather than an error.
pub fn parse_der_signature(sig: &[u8], flags: ScriptFlags) -> Option<Signature> {
    let strict = flags.bits() & (VERIFY_STRICTENC | VERIFY_DERSIG) != 0;
    if strict {
        Signature::from_der(sig).ok()
    } else {
        Signature::from_der_lax(sig).ok()
    }
}

/// Verifies an already-parsed signature over `digest`.
///
/// High-S signatures are normalized first; rejecting them is the job of the
/// LowS encoding check, not of verification.
pub fn verify_signature(signature: &Signature, pubkey: &PublicKey, digest: &[u8; 32]) -> bool {
    let mut normalized = *signature;
    normalized.normalize_s();
    let message = Message::from_digest(*digest);
    with_verification_ctx(|secp| secp.verify_ecdsa(&message, &normalized, pubkey).is_ok())
}

/// Parses and verifies a raw signature/pubkey pair over `digest`.
pub fn verify_ecdsa(sig: &[u8], pubkey: &[u8], digest: &[u8; 32], flags: ScriptFlags) -> bool {
    let Ok(pubkey) = PublicKey::from_slice(pubkey) else {
        return false;
    };
    let Some(signature) = parse_der_signature(sig, flags) else {
        return false;
    };
    verify_signature(&signature, &pubkey, digest)
}

const DER_SEQUENCE_TAG: u8 = 0x30;
const DER_INTEGER_TAG: u8 = 0x02;
// Shortest blob: sequence header, two one-byte integers, hash type byte.
const DER_MIN_SIG_LEN: usize = 9;
// Longest blob: two 33-byte integers (32-byte magnitude plus sign pad).
const DER_MAX_SIG_LEN: usize = 73;

/// Checks the BIP-66 strict layout of a signature-with-hashtype blob:
/// `0x30 <total> 0x02 <len> R 0x02 <len> S <hashtype>` with exact lengths
/// and canonically padded positive integers.
fn is_strict_der_signature(sig: &[u8]) -> bool {
    if sig.len() < DER_MIN_SIG_LEN || sig.len() > DER_MAX_SIG_LEN {
        return false;
    }
    if sig[0] != DER_SEQUENCE_TAG || sig[1] as usize != sig.len() - 3 {
        return false;
    }

    // Everything between the sequence header and the trailing hash type
    // byte must be exactly the two integers.
    let body = &sig[2..sig.len() - 1];
    let Some(r_len) = read_der_integer(body) else {
        return false;
    };
    let Some(s_len) = read_der_integer(&body[2 + r_len..]) else {
        return false;
    };
    2 + r_len + 2 + s_len == body.len()
}

/// Validates a `0x02 <len> <magnitude>` integer at the start of `buf` and
/// returns its magnitude length.
fn read_der_integer(buf: &[u8]) -> Option<usize> {
    if buf.len() < 3 || buf[0] != DER_INTEGER_TAG {
        return None;
    }
    let len = buf[1] as usize;
    if len == 0 || buf.len() < 2 + len {
        return None;
    }

    let magnitude = &buf[2..2 + len];
    // Values are unsigned; a set top bit would flip the sign.
    if magnitude[0] & 0x80 != 0 {
        return None;
    }
    // A zero pad is only canonical when it protects a would-be sign bit.
    if len > 1 && magnitude[0] == 0 && magnitude[1] & 0x80 == 0 {
        return None;
    }
    Some(len)
}

fn has_low_s(sig_with_hashtype: &[u8]) -> bool {
    if !is_strict_der_signature(sig_with_hashtype) {
        return false;
    }
    let der = &sig_with_hashtype[..sig_with_hashtype.len() - 1];
    match Signature::from_der(der) {
        Ok(parsed) => {
            let mut normalized = parsed;
            normalized.normalize_s();
            normalized == parsed
        }
        Err(_) => false,
    }
}

fn is_defined_hashtype(hash_type: u8) -> bool {
    let base = hash_type & !SIG_HASH_ANY_ONE_CAN_PAY;
    (SIG_HASH_ALL..=SIG_HASH_SINGLE).contains(&base)
}

/// Accepted key encodings: SEC1 compressed (33 bytes, 0x02/0x03 prefix) or
/// uncompressed (65 bytes, 0x04 prefix).
fn is_valid_pubkey_encoding(pubkey: &[u8]) -> bool {
    match (pubkey.first(), pubkey.len()) {
        (Some(0x02) | Some(0x03), 33) => true,
        (Some(0x04), 65) => true,
        _ => false,
    }
}
