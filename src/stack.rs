//! Data stack used by the script engine.
//!
//! Every stack entry is a plain byte string; numeric and boolean views are
//! conversions applied at pop time.  The same type backs both the data and
//! the alternate stack.

use crate::scriptnum::{encode_num, parse_scriptnum, SCRIPTNUM_MAX_LEN};
use crate::ScriptError;

/// Interprets a stack element as a boolean.
///
/// An element is false when every byte is zero, allowing the final byte to
/// be the bare sign bit 0x80 (negative zero).
pub fn cast_to_bool(data: &[u8]) -> bool {
    for (i, &byte) in data.iter().enumerate() {
        if byte != 0 {
            if i == data.len() - 1 && byte == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

/// Byte-string stack with the top element stored last.
#[derive(Debug, Default, Clone)]
pub struct ScriptStack {
    items: Vec<Vec<u8>>,
    verify_minimal_data: bool,
}

impl ScriptStack {
    /// Creates an empty stack.  `verify_minimal_data` controls whether
    /// numeric pops reject non-minimal encodings.
    pub fn new(verify_minimal_data: bool) -> Self {
        Self {
            items: Vec::new(),
            verify_minimal_data,
        }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the stack, returning the raw items (bottom first).
    pub fn into_items(self) -> Vec<Vec<u8>> {
        self.items
    }

    /// Replaces the stack contents with `items` (bottom first).
    pub fn set_items(&mut self, items: Vec<Vec<u8>>) {
        self.items = items;
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.items.push(data);
    }

    pub fn push_int(&mut self, value: i64) {
        self.items.push(encode_num(value));
    }

    pub fn push_bool(&mut self, value: bool) {
        self.items.push(if value { vec![1] } else { Vec::new() });
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, ScriptError> {
        self.items.pop().ok_or(ScriptError::InvalidStackOperation)
    }

    pub fn pop_int(&mut self) -> Result<i64, ScriptError> {
        let bytes = self.pop_byte_array()?;
        parse_scriptnum(&bytes, self.verify_minimal_data, SCRIPTNUM_MAX_LEN)
    }

    pub fn pop_bool(&mut self) -> Result<bool, ScriptError> {
        Ok(cast_to_bool(&self.pop_byte_array()?))
    }

    /// Returns the element `idx` entries below the top without removing it.
    pub fn peek_byte_array(&self, idx: usize) -> Result<&[u8], ScriptError> {
        if idx >= self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(&self.items[self.items.len() - 1 - idx])
    }

    pub fn peek_int(&self, idx: usize) -> Result<i64, ScriptError> {
        let bytes = self.peek_byte_array(idx)?;
        parse_scriptnum(bytes, self.verify_minimal_data, SCRIPTNUM_MAX_LEN)
    }

    pub fn peek_bool(&self, idx: usize) -> Result<bool, ScriptError> {
        Ok(cast_to_bool(self.peek_byte_array(idx)?))
    }

    /// Removes the top `count` elements.
    pub fn drop_n(&mut self, count: usize) -> Result<(), ScriptError> {
        if count < 1 || count > self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        self.items.truncate(self.items.len() - count);
        Ok(())
    }

    /// Duplicates the top `count` elements, preserving their order.
    pub fn dup_n(&mut self, count: usize) -> Result<(), ScriptError> {
        if count < 1 || count > self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let start = self.items.len() - count;
        for i in start..start + count {
            let copy = self.items[i].clone();
            self.items.push(copy);
        }
        Ok(())
    }

    /// Removes the element `idx` entries below the top.
    pub fn nip_n(&mut self, idx: usize) -> Result<Vec<u8>, ScriptError> {
        if idx >= self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let at = self.items.len() - 1 - idx;
        Ok(self.items.remove(at))
    }

    /// Copies the second group of `count` elements to the top.
    pub fn over_n(&mut self, count: usize) -> Result<(), ScriptError> {
        if count < 1 || 2 * count > self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let start = self.items.len() - 2 * count;
        for i in start..start + count {
            let copy = self.items[i].clone();
            self.items.push(copy);
        }
        Ok(())
    }

    /// Rotates the top three groups of `count` elements to the left, moving
    /// the deepest group to the top.
    pub fn rot_n(&mut self, count: usize) -> Result<(), ScriptError> {
        if count < 1 || 3 * count > self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let start = self.items.len() - 3 * count;
        let rotated: Vec<Vec<u8>> = self.items.drain(start..start + count).collect();
        self.items.extend(rotated);
        Ok(())
    }

    /// Swaps the top two groups of `count` elements.
    pub fn swap_n(&mut self, count: usize) -> Result<(), ScriptError> {
        if count < 1 || 2 * count > self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let start = self.items.len() - 2 * count;
        let swapped: Vec<Vec<u8>> = self.items.drain(start..start + count).collect();
        self.items.extend(swapped);
        Ok(())
    }

    /// Copies the element `idx` entries below the top to the top.
    pub fn pick_n(&mut self, idx: i64) -> Result<(), ScriptError> {
        if idx < 0 || idx as usize >= self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let copy = self.items[self.items.len() - 1 - idx as usize].clone();
        self.items.push(copy);
        Ok(())
    }

    /// Moves the element `idx` entries below the top to the top.
    pub fn roll_n(&mut self, idx: i64) -> Result<(), ScriptError> {
        if idx < 0 || idx as usize >= self.items.len() {
            return Err(ScriptError::InvalidStackOperation);
        }
        let at = self.items.len() - 1 - idx as usize;
        let item = self.items.remove(at);
        self.items.push(item);
        Ok(())
    }

    /// Copies the top element below the second-from-top element.
    pub fn tuck(&mut self) -> Result<(), ScriptError> {
        if self.items.len() < 2 {
            return Err(ScriptError::InvalidStackOperation);
        }
        let len = self.items.len();
        let copy = self.items[len - 1].clone();
        self.items.insert(len - 2, copy);
        Ok(())
    }
}
