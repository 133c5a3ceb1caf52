use core::fmt;
use std::collections::HashMap;
use std::sync::OnceLock;

use bitcoin::hex::FromHex;
use txscript::encode_num;
use txscript::opcodes::{OPCODE_TABLE, OP_0, OP_1, OP_1NEGATE, OP_PUSHDATA1, OP_PUSHDATA2};

#[derive(Debug)]
pub enum ParseScriptError {
    BadDecimal(String),
    DecimalOutOfRange(i64),
    BadOpcode(String),
}

impl fmt::Display for ParseScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseScriptError::BadDecimal(tok) => write!(f, "bad decimal literal `{tok}`"),
            ParseScriptError::DecimalOutOfRange(n) => write!(
                f,
                "decimal out of range: {n} (allowed: -0xffffffff..=0xffffffff)"
            ),
            ParseScriptError::BadOpcode(tok) => write!(f, "unknown opcode `{tok}`"),
        }
    }
}

type OpcodeMap = HashMap<String, u8>;
static OPCODE_MAP: OnceLock<OpcodeMap> = OnceLock::new();

fn opcode_map() -> &'static OpcodeMap {
    OPCODE_MAP.get_or_init(build_opcode_map)
}

fn build_opcode_map() -> OpcodeMap {
    let mut map = HashMap::new();
    for info in OPCODE_TABLE.iter() {
        map.insert(info.name.to_string(), info.value);
        if let Some(bare) = info.name.strip_prefix("OP_") {
            map.insert(bare.to_string(), info.value);
        }
    }
    map.insert("OP_FALSE".to_string(), OP_0);
    map.insert("FALSE".to_string(), OP_0);
    map.insert("OP_TRUE".to_string(), OP_1);
    map.insert("TRUE".to_string(), OP_1);
    map
}

pub fn parse_opcode(token: &str) -> Result<u8, ParseScriptError> {
    opcode_map()
        .get(token)
        .copied()
        .ok_or_else(|| ParseScriptError::BadOpcode(token.to_string()))
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_decimal_i64(s: &str) -> Result<i64, ParseScriptError> {
    let num_i64 = s
        .parse()
        .map_err(|_| ParseScriptError::BadDecimal(s.to_string()))?;
    const LIM: i64 = 0xffff_ffff;
    if !(-LIM..=LIM).contains(&num_i64) {
        return Err(ParseScriptError::DecimalOutOfRange(num_i64));
    }
    Ok(num_i64)
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Appends the canonical push of `data`.
fn push_data(out: &mut Vec<u8>, data: &[u8]) {
    if data.is_empty() {
        out.push(OP_0);
    } else if data.len() <= 75 {
        out.push(data.len() as u8);
        out.extend_from_slice(data);
    } else if data.len() <= 0xff {
        out.push(OP_PUSHDATA1);
        out.push(data.len() as u8);
        out.extend_from_slice(data);
    } else {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(data);
    }
}

fn push_int(out: &mut Vec<u8>, value: i64) {
    if value == 0 {
        out.push(OP_0);
    } else if value == -1 {
        out.push(OP_1NEGATE);
    } else if (1..=16).contains(&value) {
        out.push(OP_1 + value as u8 - 1);
    } else {
        push_data(out, &encode_num(value));
    }
}

enum Token<'a> {
    Decimal(i64),
    Hex(Vec<u8>),
    Quoted(&'a str),
    Opcode(u8),
}

fn classify(token: &str) -> Result<Token<'_>, ParseScriptError> {
    if is_all_digits(token)
        || (token.starts_with('-') && token.len() > 1 && is_all_digits(&token[1..]))
    {
        Ok(Token::Decimal(parse_decimal_i64(token)?))
    } else if token.starts_with("0x") && token.len() > 2 && is_hex(&token[2..]) {
        let hex = Vec::from_hex(&token[2..]).expect("valid hex literal");
        Ok(Token::Hex(hex))
    } else if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        Ok(Token::Quoted(&token[1..token.len() - 1]))
    } else {
        Ok(Token::Opcode(parse_opcode(token)?))
    }
}

/// Assembles a whitespace-separated script description into raw bytes.
///
/// Decimal literals become canonical integer pushes, `0x`-prefixed hex is
/// spliced in verbatim, single-quoted strings are pushed as data, and
/// everything else must be an opcode name (with or without the `OP_`
/// prefix).
pub fn parse_script(s: &str) -> Result<Vec<u8>, ParseScriptError> {
    let mut out = Vec::new();
    for part in s.split([' ', '\t', '\n']).filter(|w| !w.is_empty()) {
        match classify(part)? {
            Token::Decimal(value) => push_int(&mut out, value),
            Token::Hex(bytes) => out.extend_from_slice(&bytes),
            Token::Quoted(body) => push_data(&mut out, body.as_bytes()),
            Token::Opcode(op) => out.push(op),
        }
    }
    Ok(out)
}
