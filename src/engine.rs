//! Script execution engine.
//!
//! An [`Engine`] is created for a single spend: it runs the input's
//! scriptSig, then the referenced output's scriptPubKey, and (when the
//! pay-to-script-hash flag recognizes the pattern) finally the redeem
//! script pulled from the first script's result stack.  Execution is
//! strictly sequential; the engine owns all mutable state and borrows the
//! transaction read-only.

use bitcoin::hashes::Hash as _;
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::PublicKey;
use bitcoin::{Script, Transaction};

use crate::opcodes::{self, is_push_only, parse_script, ParsedOpcode};
use crate::sighash::{
    calc_signature_hash, check_pubkey_encoding, check_signature_encoding, parse_der_signature,
    strip_signature, verify_ecdsa, verify_signature,
};
use crate::stack::ScriptStack;
use crate::{
    ScriptError, ScriptFlags, MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG, MAX_SCRIPT_ELEMENT_SIZE,
    MAX_SCRIPT_SIZE, MAX_STACK_SIZE, VERIFY_CLEANSTACK, VERIFY_DISCOURAGE_UPGRADABLE_NOPS,
    VERIFY_MINIMALDATA, VERIFY_NULLDUMMY, VERIFY_P2SH,
};

/// State of one open conditional block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The branch executes.
    True,
    /// The branch does not execute, but an OP_ELSE can revive it.
    False,
    /// The whole block sits inside a non-executing outer branch; OP_ELSE
    /// must not revive it.
    Skip,
}

/// A signature popped by OP_CHECKMULTISIG, with its parse outcome cached so
/// repeated pubkey attempts never re-parse or re-check encoding.
struct MultisigSig {
    raw: Vec<u8>,
    parsed: Option<Signature>,
    attempted: bool,
}

/// Virtual machine evaluating the scripts guarding one transaction input.
pub struct Engine<'tx> {
    flags: ScriptFlags,
    tx: &'tx Transaction,
    tx_idx: usize,
    scripts: Vec<Vec<ParsedOpcode>>,
    raw_scripts: Vec<Vec<u8>>,
    script_idx: usize,
    script_off: usize,
    byte_off: usize,
    last_code_sep: usize,
    dstack: ScriptStack,
    astack: ScriptStack,
    cond_stack: Vec<Condition>,
    num_ops: usize,
    bip16: bool,
    saved_first_stack: Vec<Vec<u8>>,
}

impl<'tx> Engine<'tx> {
    /// Creates an engine for the given scriptSig/scriptPubKey pair spending
    /// input `tx_idx` of `tx`.
    pub fn new(
        script_sig: &[u8],
        script_pubkey: &[u8],
        tx: &'tx Transaction,
        tx_idx: usize,
        flags: ScriptFlags,
    ) -> Result<Self, ScriptError> {
        if tx_idx >= tx.input.len() {
            return Err(ScriptError::InvalidIndex);
        }

        let raw_scripts = vec![script_sig.to_vec(), script_pubkey.to_vec()];
        let mut scripts = Vec::with_capacity(raw_scripts.len() + 1);
        for raw in &raw_scripts {
            if raw.len() > MAX_SCRIPT_SIZE {
                return Err(ScriptError::ScriptTooBig);
            }
            scripts.push(parse_script(raw)?);
        }

        let bip16 =
            flags.bits() & VERIFY_P2SH != 0 && Script::from_bytes(script_pubkey).is_p2sh();
        if bip16 && !is_push_only(&scripts[0]) {
            return Err(ScriptError::SigPushOnly);
        }

        let verify_minimal_data = flags.bits() & VERIFY_MINIMALDATA != 0;
        Ok(Self {
            flags,
            tx,
            tx_idx,
            scripts,
            raw_scripts,
            script_idx: 0,
            script_off: 0,
            byte_off: 0,
            last_code_sep: 0,
            dstack: ScriptStack::new(verify_minimal_data),
            astack: ScriptStack::new(verify_minimal_data),
            cond_stack: vec![Condition::True],
            num_ops: 0,
            bip16,
            saved_first_stack: Vec::new(),
        })
    }

    /// Runs every script to completion and checks the terminal verdict:
    /// balanced conditionals, a non-empty data stack, and a true top
    /// element.
    pub fn execute(&mut self) -> Result<(), ScriptError> {
        while self.script_idx < self.scripts.len() {
            if self.script_off >= self.scripts[self.script_idx].len() {
                self.finish_script()?;
                continue;
            }

            let pop = self.scripts[self.script_idx][self.script_off].clone();
            self.script_off += 1;
            self.byte_off += pop.encoded_len();
            self.execute_opcode(&pop)?;

            if self.dstack.depth() + self.astack.depth() > MAX_STACK_SIZE {
                return Err(ScriptError::StackOverflow);
            }
        }

        self.check_error_condition(true)
    }

    /// Returns a copy of the data stack, bottom first.
    pub fn stack(&self) -> Vec<Vec<u8>> {
        self.dstack.clone().into_items()
    }

    #[inline]
    fn is_executing(&self) -> bool {
        *self.cond_stack.last().expect("condition stack is never empty") == Condition::True
    }

    /// Handles the boundary at the end of the current script: conditionals
    /// must be balanced, per-script counters reset, and a P2SH spend queues
    /// the redeem script recovered from the preserved first stack.
    fn finish_script(&mut self) -> Result<(), ScriptError> {
        if self.cond_stack.len() != 1 {
            return Err(ScriptError::UnbalancedConditional);
        }
        self.num_ops = 0;
        self.script_off = 0;
        self.byte_off = 0;
        self.last_code_sep = 0;

        if self.script_idx == 0 && self.bip16 {
            self.saved_first_stack = self.dstack.clone().into_items();
            self.script_idx += 1;
        } else if self.script_idx == 1 && self.bip16 {
            self.script_idx += 1;
            self.check_error_condition(false)?;

            let mut saved = std::mem::take(&mut self.saved_first_stack);
            let redeem_script = saved.pop().ok_or(ScriptError::EmptyStack)?;
            if redeem_script.len() > MAX_SCRIPT_SIZE {
                return Err(ScriptError::ScriptTooBig);
            }
            self.scripts.push(parse_script(&redeem_script)?);
            self.raw_scripts.push(redeem_script);
            self.dstack.set_items(saved);
        } else {
            self.script_idx += 1;
        }
        Ok(())
    }

    fn check_error_condition(&mut self, final_script: bool) -> Result<(), ScriptError> {
        if final_script
            && self.flags.bits() & VERIFY_CLEANSTACK != 0
            && self.dstack.depth() != 1
        {
            return Err(ScriptError::CleanStack);
        }
        if self.dstack.is_empty() {
            return Err(ScriptError::EmptyStack);
        }
        if !self.dstack.pop_bool()? {
            return Err(ScriptError::EvalFalse);
        }
        Ok(())
    }

    /// Runs one instruction through the gate sequence: disabled and
    /// always-illegal opcodes fail unconditionally, counted opcodes feed the
    /// operation budget, skipped branches fall through, and executed pushes
    /// honor the minimal-data flag before the handler runs.
    fn execute_opcode(&mut self, pop: &ParsedOpcode) -> Result<(), ScriptError> {
        if pop.is_disabled() {
            return Err(ScriptError::OpDisabled);
        }
        if pop.is_always_illegal() {
            return Err(ScriptError::ReservedOpcode);
        }

        if pop.value() > opcodes::OP_16 {
            self.num_ops += 1;
            if self.num_ops > MAX_OPS_PER_SCRIPT {
                return Err(ScriptError::TooManyOperations);
            }
        } else if pop.data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptError::ElementTooBig);
        }

        let executing = self.is_executing();
        if !executing && !pop.is_conditional() {
            return Ok(());
        }

        if executing
            && self.flags.bits() & VERIFY_MINIMALDATA != 0
            && pop.value() <= opcodes::OP_PUSHDATA4
        {
            pop.check_minimal_data_push()?;
        }

        self.dispatch(pop, executing)
    }

    fn dispatch(&mut self, pop: &ParsedOpcode, executing: bool) -> Result<(), ScriptError> {
        use crate::opcodes::*;

        match pop.value() {
            OP_0 => self.dstack.push_byte_array(Vec::new()),
            OP_DATA_1..=OP_PUSHDATA4 => self.dstack.push_byte_array(pop.data.clone()),
            OP_1NEGATE => self.dstack.push_int(-1),
            OP_1..=OP_16 => self.dstack.push_int((pop.value() - (OP_1 - 1)) as i64),

            OP_NOP => {}
            OP_NOP1..=OP_NOP10 => {
                if self.flags.bits() & VERIFY_DISCOURAGE_UPGRADABLE_NOPS != 0 {
                    return Err(ScriptError::DiscourageUpgradableNops);
                }
            }
            OP_RESERVED | OP_VER | OP_RESERVED1 | OP_RESERVED2 => {
                return Err(ScriptError::ReservedOpcode);
            }

            OP_IF => {
                let cond = if executing {
                    if self.dstack.pop_bool()? {
                        Condition::True
                    } else {
                        Condition::False
                    }
                } else {
                    Condition::Skip
                };
                self.push_condition(cond);
            }
            OP_NOTIF => {
                let cond = if executing {
                    if self.dstack.pop_bool()? {
                        Condition::False
                    } else {
                        Condition::True
                    }
                } else {
                    Condition::Skip
                };
                self.push_condition(cond);
            }
            OP_ELSE => self.toggle_condition()?,
            OP_ENDIF => self.pop_condition()?,
            OP_VERIFY => {
                if !self.dstack.pop_bool()? {
                    return Err(ScriptError::VerifyFailed);
                }
            }
            OP_RETURN => return Err(ScriptError::EarlyReturn),

            OP_TOALTSTACK => {
                let value = self.dstack.pop_byte_array()?;
                self.astack.push_byte_array(value);
            }
            OP_FROMALTSTACK => {
                let value = self.astack.pop_byte_array()?;
                self.dstack.push_byte_array(value);
            }

            OP_2DROP => self.dstack.drop_n(2)?,
            OP_2DUP => self.dstack.dup_n(2)?,
            OP_3DUP => self.dstack.dup_n(3)?,
            OP_2OVER => self.dstack.over_n(2)?,
            OP_2ROT => self.dstack.rot_n(2)?,
            OP_2SWAP => self.dstack.swap_n(2)?,
            OP_IFDUP => {
                // Numeric peek, not a raw copy: the duplicate is the
                // re-encoded value, and oversized or non-minimal operands
                // fail here.
                let value = self.dstack.peek_int(0)?;
                if value != 0 {
                    self.dstack.push_int(value);
                }
            }
            OP_DEPTH => {
                let depth = self.dstack.depth() as i64;
                self.dstack.push_int(depth);
            }
            OP_DROP => self.dstack.drop_n(1)?,
            OP_DUP => self.dstack.dup_n(1)?,
            OP_NIP => {
                self.dstack.nip_n(1)?;
            }
            OP_OVER => self.dstack.over_n(1)?,
            OP_PICK => {
                let idx = self.dstack.pop_int()?;
                self.dstack.pick_n(idx)?;
            }
            OP_ROLL => {
                let idx = self.dstack.pop_int()?;
                self.dstack.roll_n(idx)?;
            }
            OP_ROT => self.dstack.rot_n(1)?,
            OP_SWAP => self.dstack.swap_n(1)?,
            OP_TUCK => self.dstack.tuck()?,

            OP_SIZE => {
                let size = self.dstack.peek_byte_array(0)?.len() as i64;
                self.dstack.push_int(size);
            }

            OP_EQUAL => self.op_equal()?,
            OP_EQUALVERIFY => {
                self.op_equal()?;
                if !self.dstack.pop_bool()? {
                    return Err(ScriptError::VerifyFailed);
                }
            }

            OP_1ADD | OP_1SUB | OP_NEGATE | OP_ABS | OP_NOT | OP_0NOTEQUAL => {
                let mut value = self.dstack.pop_int()?;
                match pop.value() {
                    OP_1ADD => value += 1,
                    OP_1SUB => value -= 1,
                    OP_NEGATE => value = -value,
                    OP_ABS => value = value.abs(),
                    OP_NOT => value = (value == 0) as i64,
                    _ => value = (value != 0) as i64,
                }
                self.dstack.push_int(value);
            }

            OP_ADD | OP_SUB | OP_BOOLAND | OP_BOOLOR | OP_NUMEQUAL | OP_NUMEQUALVERIFY
            | OP_NUMNOTEQUAL | OP_LESSTHAN | OP_GREATERTHAN | OP_LESSTHANOREQUAL
            | OP_GREATERTHANOREQUAL | OP_MIN | OP_MAX => {
                let v0 = self.dstack.pop_int()?;
                let v1 = self.dstack.pop_int()?;
                let result = match pop.value() {
                    OP_ADD => v1 + v0,
                    OP_SUB => v1 - v0,
                    OP_BOOLAND => (v1 != 0 && v0 != 0) as i64,
                    OP_BOOLOR => (v1 != 0 || v0 != 0) as i64,
                    OP_NUMEQUAL | OP_NUMEQUALVERIFY => (v1 == v0) as i64,
                    OP_NUMNOTEQUAL => (v1 != v0) as i64,
                    OP_LESSTHAN => (v1 < v0) as i64,
                    OP_GREATERTHAN => (v1 > v0) as i64,
                    OP_LESSTHANOREQUAL => (v1 <= v0) as i64,
                    OP_GREATERTHANOREQUAL => (v1 >= v0) as i64,
                    OP_MIN => v1.min(v0),
                    _ => v1.max(v0),
                };
                self.dstack.push_int(result);
                if pop.value() == OP_NUMEQUALVERIFY && !self.dstack.pop_bool()? {
                    return Err(ScriptError::VerifyFailed);
                }
            }
            OP_WITHIN => {
                let max = self.dstack.pop_int()?;
                let min = self.dstack.pop_int()?;
                let value = self.dstack.pop_int()?;
                self.dstack.push_bool(value >= min && value < max);
            }

            OP_RIPEMD160 => {
                use bitcoin::hashes::ripemd160;
                let data = self.dstack.pop_byte_array()?;
                let hash = ripemd160::Hash::hash(&data);
                self.dstack.push_byte_array(hash.to_byte_array().to_vec());
            }
            OP_SHA1 => {
                use bitcoin::hashes::sha1;
                let data = self.dstack.pop_byte_array()?;
                let hash = sha1::Hash::hash(&data);
                self.dstack.push_byte_array(hash.to_byte_array().to_vec());
            }
            OP_SHA256 => {
                use bitcoin::hashes::sha256;
                let data = self.dstack.pop_byte_array()?;
                let hash = sha256::Hash::hash(&data);
                self.dstack.push_byte_array(hash.to_byte_array().to_vec());
            }
            OP_HASH160 => {
                use bitcoin::hashes::hash160;
                let data = self.dstack.pop_byte_array()?;
                let hash = hash160::Hash::hash(&data);
                self.dstack.push_byte_array(hash.to_byte_array().to_vec());
            }
            OP_HASH256 => {
                use bitcoin::hashes::sha256d;
                let data = self.dstack.pop_byte_array()?;
                let hash = sha256d::Hash::hash(&data);
                self.dstack.push_byte_array(hash.to_byte_array().to_vec());
            }

            OP_CODESEPARATOR => self.last_code_sep = self.byte_off,
            OP_CHECKSIG => self.op_checksig()?,
            OP_CHECKSIGVERIFY => {
                self.op_checksig()?;
                if !self.dstack.pop_bool()? {
                    return Err(ScriptError::VerifyFailed);
                }
            }
            OP_CHECKMULTISIG => self.op_checkmultisig()?,
            OP_CHECKMULTISIGVERIFY => {
                self.op_checkmultisig()?;
                if !self.dstack.pop_bool()? {
                    return Err(ScriptError::VerifyFailed);
                }
            }

            _ => return Err(ScriptError::InvalidOpcode),
        }

        Ok(())
    }

    fn op_equal(&mut self) -> Result<(), ScriptError> {
        let a = self.dstack.pop_byte_array()?;
        let b = self.dstack.pop_byte_array()?;
        self.dstack.push_bool(a == b);
        Ok(())
    }

    /// Pushes a condition frame, demoting it to `Skip` whenever the current
    /// innermost frame is not executing so that nested blocks can never
    /// reactivate inside a dead branch.
    fn push_condition(&mut self, cond: Condition) {
        let coerced = if self.is_executing() { cond } else { Condition::Skip };
        self.cond_stack.push(coerced);
    }

    fn toggle_condition(&mut self) -> Result<(), ScriptError> {
        if self.cond_stack.len() < 2 {
            return Err(ScriptError::UnbalancedConditional);
        }
        let top = self
            .cond_stack
            .last_mut()
            .expect("condition stack is never empty");
        *top = match *top {
            Condition::True => Condition::False,
            Condition::False => Condition::True,
            Condition::Skip => Condition::Skip,
        };
        Ok(())
    }

    fn pop_condition(&mut self) -> Result<(), ScriptError> {
        if self.cond_stack.len() < 2 {
            return Err(ScriptError::UnbalancedConditional);
        }
        self.cond_stack.pop();
        Ok(())
    }

    /// Re-parses the current script from the last OP_CODESEPARATOR onward.
    fn subscript(&self) -> Result<Vec<ParsedOpcode>, ScriptError> {
        parse_script(&self.raw_scripts[self.script_idx][self.last_code_sep..])
    }

    fn op_checksig(&mut self) -> Result<(), ScriptError> {
        let pubkey = self.dstack.pop_byte_array()?;
        let sig_with_hashtype = self.dstack.pop_byte_array()?;

        // The full length is validated by the signature parser; one byte is
        // the minimum needed to carry a hash type at all.
        if sig_with_hashtype.is_empty() {
            self.dstack.push_bool(false);
            return Ok(());
        }

        check_signature_encoding(&sig_with_hashtype, self.flags)?;
        check_pubkey_encoding(&pubkey, self.flags)?;

        let hash_type = sig_with_hashtype[sig_with_hashtype.len() - 1];
        let sig = &sig_with_hashtype[..sig_with_hashtype.len() - 1];

        let mut subscript = self.subscript()?;
        strip_signature(&mut subscript, sig);

        let digest = calc_signature_hash(&subscript, hash_type, self.tx, self.tx_idx)?;
        let valid = verify_ecdsa(sig, &pubkey, &digest, self.flags);
        self.dstack.push_bool(valid);
        Ok(())
    }

    fn op_checkmultisig(&mut self) -> Result<(), ScriptError> {
        let num_keys = self.dstack.pop_int()?;
        if num_keys < 0 || num_keys > MAX_PUBKEYS_PER_MULTISIG as i64 {
            return Err(ScriptError::TooManyPubkeys);
        }
        let num_pubkeys = num_keys as usize;
        self.num_ops += num_pubkeys;
        if self.num_ops > MAX_OPS_PER_SCRIPT {
            return Err(ScriptError::TooManyOperations);
        }

        let mut pubkeys = Vec::with_capacity(num_pubkeys);
        for _ in 0..num_pubkeys {
            pubkeys.push(self.dstack.pop_byte_array()?);
        }

        let num_sigs = self.dstack.pop_int()?;
        if num_sigs < 0 || num_sigs > num_keys {
            return Err(ScriptError::InvalidSignatureCount);
        }
        let num_signatures = num_sigs as usize;

        let mut signatures = Vec::with_capacity(num_signatures);
        for _ in 0..num_signatures {
            signatures.push(MultisigSig {
                raw: self.dstack.pop_byte_array()?,
                parsed: None,
                attempted: false,
            });
        }

        // The reference implementation pops one value more than it uses;
        // that bug is consensus now.
        let dummy = self.dstack.pop_byte_array()?;
        if self.flags.bits() & VERIFY_NULLDUMMY != 0 && !dummy.is_empty() {
            return Err(ScriptError::SigNullDummy);
        }

        let mut subscript = self.subscript()?;
        for sig_info in &signatures {
            strip_signature(&mut subscript, &sig_info.raw);
        }

        let mut success = true;
        let mut remaining_sigs = num_signatures as i64;
        let mut remaining_keys = num_pubkeys as i64;
        let mut sig_idx = 0usize;
        let mut key_idx = 0usize;

        while remaining_sigs > 0 {
            // Once more signatures remain than pubkeys, no assignment of
            // the rest can succeed.
            if remaining_sigs > remaining_keys {
                success = false;
                break;
            }

            let pubkey = pubkeys[key_idx].clone();
            key_idx += 1;
            remaining_keys -= 1;

            let sig_info = &mut signatures[sig_idx];
            if sig_info.raw.is_empty() {
                continue;
            }
            let hash_type = sig_info.raw[sig_info.raw.len() - 1];

            if !sig_info.attempted {
                sig_info.attempted = true;
                check_signature_encoding(&sig_info.raw, self.flags)?;
                let sig_bytes = &sig_info.raw[..sig_info.raw.len() - 1];
                sig_info.parsed = parse_der_signature(sig_bytes, self.flags);
            }
            let Some(signature) = signatures[sig_idx].parsed else {
                continue;
            };

            check_pubkey_encoding(&pubkey, self.flags)?;
            let Ok(parsed_pubkey) = PublicKey::from_slice(&pubkey) else {
                continue;
            };

            let digest = calc_signature_hash(&subscript, hash_type, self.tx, self.tx_idx)?;
            if verify_signature(&signature, &parsed_pubkey, &digest) {
                sig_idx += 1;
                remaining_sigs -= 1;
            }
        }

        self.dstack.push_bool(success);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;
    use crate::{VERIFY_NONE, VERIFY_STRICTENC};
    use bitcoin::absolute::LockTime;
    use bitcoin::transaction::Version;
    use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, TxIn, TxOut, Witness};

    fn dummy_tx() -> Transaction {
        Transaction {
            version: Version(1),
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::default(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![TxOut {
                value: Amount::from_sat(0),
                script_pubkey: ScriptBuf::new(),
            }],
        }
    }

    fn run(script_pubkey: &[u8]) -> Result<(), ScriptError> {
        run_with_sig(&[], script_pubkey)
    }

    fn run_with_sig(script_sig: &[u8], script_pubkey: &[u8]) -> Result<(), ScriptError> {
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(VERIFY_NONE).unwrap();
        let mut engine = Engine::new(script_sig, script_pubkey, &tx, 0, flags)?;
        engine.execute()
    }

    #[test]
    fn terminal_verdicts() {
        assert_eq!(run(&[OP_1]), Ok(()));
        assert_eq!(run(&[OP_NOP]), Err(ScriptError::EmptyStack));
        assert_eq!(run(&[OP_0]), Err(ScriptError::EvalFalse));
        assert_eq!(run(&[]), Err(ScriptError::EmptyStack));
    }

    #[test]
    fn arithmetic_scenario() {
        // 1 1 ADD 2 EQUAL
        assert_eq!(run(&[0x51, 0x51, 0x93, 0x52, 0x87]), Ok(()));
        // 16 1 EQUAL -> false
        assert_eq!(run(&[0x60, 0x51, 0x87]), Err(ScriptError::EvalFalse));
    }

    #[test]
    fn conditional_branches() {
        // 1 IF 1 ELSE 0 ENDIF
        assert_eq!(run(&[OP_1, 0x63, 0x51, 0x67, 0x00, 0x68]), Ok(()));
        // 0 IF 1 ELSE 0 ENDIF -> leaves 0
        assert_eq!(
            run(&[OP_0, 0x63, 0x51, 0x67, 0x00, 0x68]),
            Err(ScriptError::EvalFalse)
        );
        // Nested skip: outer false branch must keep inner ELSE dead.
        assert_eq!(
            run(&[OP_0, OP_IF, OP_IF, OP_ELSE, OP_0, OP_ENDIF, OP_ENDIF, OP_1]),
            Ok(())
        );
    }

    #[test]
    fn unbalanced_conditionals() {
        assert_eq!(run(&[OP_1, OP_IF]), Err(ScriptError::UnbalancedConditional));
        assert_eq!(run(&[OP_ELSE]), Err(ScriptError::UnbalancedConditional));
        assert_eq!(run(&[OP_ENDIF]), Err(ScriptError::UnbalancedConditional));
    }

    #[test]
    fn early_return() {
        assert_eq!(run(&[0x6a]), Err(ScriptError::EarlyReturn));
        // OP_RETURN in a dead branch does not fire.
        assert_eq!(run(&[OP_0, OP_IF, OP_RETURN, OP_ENDIF, OP_1]), Ok(()));
    }

    #[test]
    fn disabled_opcodes_fail_even_when_skipped() {
        for value in [OP_CAT, OP_MUL, OP_LSHIFT, OP_INVERT] {
            assert_eq!(
                run(&[OP_0, OP_IF, value, OP_ENDIF, OP_1]),
                Err(ScriptError::OpDisabled),
                "{value:#x}"
            );
        }
        for value in [OP_VERIF, OP_VERNOTIF] {
            assert_eq!(
                run(&[OP_0, OP_IF, value, OP_ENDIF, OP_1]),
                Err(ScriptError::ReservedOpcode),
                "{value:#x}"
            );
        }
    }

    #[test]
    fn reserved_opcodes_fail_only_when_executed() {
        assert_eq!(run(&[OP_RESERVED]), Err(ScriptError::ReservedOpcode));
        assert_eq!(run(&[OP_0, OP_IF, OP_RESERVED, OP_ENDIF, OP_1]), Ok(()));
    }

    #[test]
    fn altstack_roundtrip() {
        assert_eq!(run(&[OP_1, OP_TOALTSTACK, OP_FROMALTSTACK]), Ok(()));
        assert_eq!(run(&[OP_FROMALTSTACK]), Err(ScriptError::InvalidStackOperation));
    }

    #[test]
    fn within_is_left_inclusive() {
        // x min max WITHIN
        assert_eq!(run(&[OP_2, OP_2, OP_5, OP_WITHIN]), Ok(()));
        assert_eq!(
            run(&[OP_5, OP_2, OP_5, OP_WITHIN]),
            Err(ScriptError::EvalFalse)
        );
    }

    #[test]
    fn sub_and_lessthan_operand_order() {
        // 5 3 SUB -> 2
        assert_eq!(run(&[OP_5, OP_3, OP_SUB, OP_2, OP_EQUAL]), Ok(()));
        // 2 5 LESSTHAN -> 1
        assert_eq!(run(&[OP_2, OP_5, OP_LESSTHAN]), Ok(()));
        // 5 2 LESSTHAN -> 0
        assert_eq!(run(&[OP_5, OP_2, OP_LESSTHAN]), Err(ScriptError::EvalFalse));
    }

    #[test]
    fn element_size_limit() {
        let mut ok_script = vec![OP_PUSHDATA2, 0x08, 0x02]; // 520 bytes
        ok_script.extend_from_slice(&[0u8; 520]);
        ok_script.push(OP_SIZE);
        assert_eq!(run(&ok_script), Ok(()));

        let mut big_script = vec![OP_PUSHDATA2, 0x09, 0x02]; // 521 bytes
        big_script.extend_from_slice(&[0u8; 521]);
        big_script.push(OP_SIZE);
        assert_eq!(run(&big_script), Err(ScriptError::ElementTooBig));
    }

    #[test]
    fn operation_budget() {
        // 201 counted opcodes succeed.
        let mut script = vec![OP_1];
        script.extend(std::iter::repeat(OP_NOP).take(200));
        script.push(OP_DUP);
        assert_eq!(run(&script), Ok(()));

        // The 202nd counted opcode fails.
        let mut script = vec![OP_1];
        script.extend(std::iter::repeat(OP_NOP).take(201));
        script.push(OP_DUP);
        assert_eq!(run(&script), Err(ScriptError::TooManyOperations));
    }

    #[test]
    fn counted_opcodes_exclude_pushes() {
        let mut script = Vec::new();
        for _ in 0..300 {
            script.push(OP_1);
            script.push(OP_DROP);
        }
        // 300 OP_DROPs exceed the budget.
        assert_eq!(run(&script), Err(ScriptError::TooManyOperations));

        let mut script = Vec::new();
        for _ in 0..300 {
            script.push(OP_1);
        }
        script.push(OP_1);
        assert_eq!(run(&script), Ok(()));
    }

    #[test]
    fn stack_size_limit() {
        // 1001 pushes overflow the combined stack.
        let mut script = Vec::new();
        for _ in 0..1001 {
            script.push(OP_1);
        }
        assert_eq!(run(&script), Err(ScriptError::StackOverflow));
    }

    #[test]
    fn minimal_data_flag_rejects_wide_pushes() {
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(crate::VERIFY_MINIMALDATA).unwrap();
        let mut engine = Engine::new(&[], &[OP_PUSHDATA1, 0x01, 0x05], &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Err(ScriptError::MinimalData));

        // The same push in a dead branch is not checked.
        let script = [OP_0, OP_IF, OP_PUSHDATA1, 0x01, 0x05, OP_ENDIF, OP_1];
        let mut engine = Engine::new(&[], &script, &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Ok(()));
    }

    #[test]
    fn discourage_upgradable_nops_flag() {
        assert_eq!(run(&[OP_NOP1, OP_1]), Ok(()));

        let tx = dummy_tx();
        let flags =
            ScriptFlags::from_bits(crate::VERIFY_DISCOURAGE_UPGRADABLE_NOPS).unwrap();
        let mut engine = Engine::new(&[], &[OP_NOP1, OP_1], &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Err(ScriptError::DiscourageUpgradableNops));
    }

    #[test]
    fn ifdup_decodes_numerically() {
        // A five-byte operand overflows the numeric cap instead of being
        // copied through.
        let mut script = vec![0x05];
        script.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0x7f]);
        script.push(OP_IFDUP);
        assert_eq!(run(&script), Err(ScriptError::NumberOverflow));

        // The duplicate is the re-encoded canonical value.
        let script = [0x02, 0x01, 0x00, OP_IFDUP, OP_1, OP_EQUAL];
        assert_eq!(run(&script), Ok(()));

        // Zero is not duplicated.
        assert_eq!(run(&[OP_0, OP_IFDUP, OP_DEPTH, OP_1, OP_EQUAL]), Ok(()));
    }

    #[test]
    fn pick_and_roll_bounds() {
        // depth 2: PICK 0 duplicates the top.
        assert_eq!(run(&[OP_1, OP_0, OP_PICK]), Ok(()));
        // PICK depth fails.
        assert_eq!(run(&[OP_1, OP_1, OP_2, OP_PICK]), Err(ScriptError::InvalidStackOperation));
    }

    #[test]
    fn script_size_limit() {
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(VERIFY_NONE).unwrap();
        let script = vec![OP_NOP; MAX_SCRIPT_SIZE + 1];
        assert!(matches!(
            Engine::new(&[], &script, &tx, 0, flags),
            Err(ScriptError::ScriptTooBig)
        ));
    }

    #[test]
    fn input_index_is_validated() {
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(VERIFY_NONE).unwrap();
        assert!(matches!(
            Engine::new(&[], &[OP_1], &tx, 1, flags),
            Err(ScriptError::InvalidIndex)
        ));
    }

    #[test]
    fn checksig_with_garbage_key_pushes_false() {
        // Pushing junk signature and pubkey must produce a clean false, not
        // an error, when no strictness flags are set.
        let script = [
            0x03, 0x01, 0x02, 0x03, // "signature"
            0x03, 0x04, 0x05, 0x06, // "pubkey"
            OP_CHECKSIG,
        ];
        assert_eq!(run(&script), Err(ScriptError::EvalFalse));

        // With strict encoding the same junk is an encoding error instead.
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(VERIFY_STRICTENC).unwrap();
        let mut engine = Engine::new(&[], &script, &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Err(ScriptError::InvalidSignatureEncoding));
    }

    #[test]
    fn checkmultisig_range_checks() {
        // N = -1
        assert_eq!(
            run(&[OP_0, OP_1NEGATE, OP_CHECKMULTISIG]),
            Err(ScriptError::TooManyPubkeys)
        );
        // M > N
        assert_eq!(
            run(&[OP_0, OP_0, OP_2, OP_0, OP_1, OP_CHECKMULTISIG]),
            Err(ScriptError::InvalidSignatureCount)
        );
        // 0-of-0 with dummy succeeds.
        assert_eq!(run(&[OP_0, OP_0, OP_0, OP_CHECKMULTISIG]), Ok(()));
        // Missing dummy underflows.
        assert_eq!(
            run(&[OP_0, OP_0, OP_CHECKMULTISIG]),
            Err(ScriptError::InvalidStackOperation)
        );
    }

    #[test]
    fn nulldummy_flag_requires_empty_dummy() {
        let script = [OP_1, OP_0, OP_0, OP_CHECKMULTISIG];
        assert_eq!(run(&script), Ok(()));

        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(crate::VERIFY_NULLDUMMY).unwrap();
        let mut engine = Engine::new(&[], &script, &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Err(ScriptError::SigNullDummy));
    }

    #[test]
    fn p2sh_redeem_script_runs() {
        use bitcoin::hashes::{hash160, Hash};

        let redeem_script = vec![OP_1];
        let hash = hash160::Hash::hash(&redeem_script);

        let mut script_pubkey = vec![OP_HASH160, 0x14];
        script_pubkey.extend_from_slice(&hash.to_byte_array());
        script_pubkey.push(OP_EQUAL);

        let mut script_sig = vec![0x01];
        script_sig.extend_from_slice(&redeem_script);

        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(crate::VERIFY_P2SH).unwrap();
        let mut engine = Engine::new(&script_sig, &script_pubkey, &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Ok(()));

        // Without the flag the same spend is just a hash comparison.
        let flags = ScriptFlags::from_bits(VERIFY_NONE).unwrap();
        let mut engine = Engine::new(&script_sig, &script_pubkey, &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Ok(()));
    }

    #[test]
    fn p2sh_requires_push_only_script_sig() {
        use bitcoin::hashes::{hash160, Hash};

        let redeem_script = vec![OP_1];
        let hash = hash160::Hash::hash(&redeem_script);
        let mut script_pubkey = vec![OP_HASH160, 0x14];
        script_pubkey.extend_from_slice(&hash.to_byte_array());
        script_pubkey.push(OP_EQUAL);

        let script_sig = [0x01, OP_1, OP_NOP];

        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(crate::VERIFY_P2SH).unwrap();
        assert!(matches!(
            Engine::new(&script_sig, &script_pubkey, &tx, 0, flags),
            Err(ScriptError::SigPushOnly)
        ));
    }

    #[test]
    fn cleanstack_flag() {
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(crate::VERIFY_CLEANSTACK).unwrap();
        let mut engine = Engine::new(&[], &[OP_1, OP_1], &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Err(ScriptError::CleanStack));

        let mut engine = Engine::new(&[], &[OP_1], &tx, 0, flags).unwrap();
        assert_eq!(engine.execute(), Ok(()));
    }

    #[test]
    fn condition_stack_returns_to_base() {
        let tx = dummy_tx();
        let flags = ScriptFlags::from_bits(VERIFY_NONE).unwrap();
        let script = [OP_1, OP_IF, OP_1, OP_ELSE, OP_0, OP_ENDIF];
        let mut engine = Engine::new(&[], &script, &tx, 0, flags).unwrap();
        engine.execute().unwrap();
        assert_eq!(engine.cond_stack, vec![Condition::True]);
    }

    #[test]
    fn codeseparator_trims_subscript() {
        // The digest changes when a code separator moves the subscript
        // boundary; execution succeeds either way since the junk key makes
        // CHECKSIG push false, inverted by NOT.
        let script = [
            0x01, 0xaa, // junk "signature"
            0x01, 0xbb, // junk "pubkey"
            OP_CODESEPARATOR, OP_CHECKSIG, OP_NOT,
        ];
        assert_eq!(run(&script), Ok(()));
    }
}
