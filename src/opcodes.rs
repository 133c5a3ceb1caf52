//! Opcode definitions, the parsed-instruction type, and disassembly.
//!
//! Every one of the 256 opcode values has a row in [`OPCODE_TABLE`] giving
//! its human-readable name and its encoded length: a positive length is the
//! total encoded size including the opcode byte, while -1, -2 and -4 mark
//! the OP_PUSHDATA variants with a little-endian length prefix of that many
//! bytes.  Execution semantics live in the engine; this module only knows
//! shape.

use crate::ScriptError;

// Opcode byte values, as defined by the reference implementation.
pub const OP_0: u8 = 0x00;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_2: u8 = 0x02;
pub const OP_DATA_3: u8 = 0x03;
pub const OP_DATA_4: u8 = 0x04;
pub const OP_DATA_5: u8 = 0x05;
pub const OP_DATA_6: u8 = 0x06;
pub const OP_DATA_7: u8 = 0x07;
pub const OP_DATA_8: u8 = 0x08;
pub const OP_DATA_9: u8 = 0x09;
pub const OP_DATA_10: u8 = 0x0a;
pub const OP_DATA_11: u8 = 0x0b;
pub const OP_DATA_12: u8 = 0x0c;
pub const OP_DATA_13: u8 = 0x0d;
pub const OP_DATA_14: u8 = 0x0e;
pub const OP_DATA_15: u8 = 0x0f;
pub const OP_DATA_16: u8 = 0x10;
pub const OP_DATA_17: u8 = 0x11;
pub const OP_DATA_18: u8 = 0x12;
pub const OP_DATA_19: u8 = 0x13;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_21: u8 = 0x15;
pub const OP_DATA_22: u8 = 0x16;
pub const OP_DATA_23: u8 = 0x17;
pub const OP_DATA_24: u8 = 0x18;
pub const OP_DATA_25: u8 = 0x19;
pub const OP_DATA_26: u8 = 0x1a;
pub const OP_DATA_27: u8 = 0x1b;
pub const OP_DATA_28: u8 = 0x1c;
pub const OP_DATA_29: u8 = 0x1d;
pub const OP_DATA_30: u8 = 0x1e;
pub const OP_DATA_31: u8 = 0x1f;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_34: u8 = 0x22;
pub const OP_DATA_35: u8 = 0x23;
pub const OP_DATA_36: u8 = 0x24;
pub const OP_DATA_37: u8 = 0x25;
pub const OP_DATA_38: u8 = 0x26;
pub const OP_DATA_39: u8 = 0x27;
pub const OP_DATA_40: u8 = 0x28;
pub const OP_DATA_41: u8 = 0x29;
pub const OP_DATA_42: u8 = 0x2a;
pub const OP_DATA_43: u8 = 0x2b;
pub const OP_DATA_44: u8 = 0x2c;
pub const OP_DATA_45: u8 = 0x2d;
pub const OP_DATA_46: u8 = 0x2e;
pub const OP_DATA_47: u8 = 0x2f;
pub const OP_DATA_48: u8 = 0x30;
pub const OP_DATA_49: u8 = 0x31;
pub const OP_DATA_50: u8 = 0x32;
pub const OP_DATA_51: u8 = 0x33;
pub const OP_DATA_52: u8 = 0x34;
pub const OP_DATA_53: u8 = 0x35;
pub const OP_DATA_54: u8 = 0x36;
pub const OP_DATA_55: u8 = 0x37;
pub const OP_DATA_56: u8 = 0x38;
pub const OP_DATA_57: u8 = 0x39;
pub const OP_DATA_58: u8 = 0x3a;
pub const OP_DATA_59: u8 = 0x3b;
pub const OP_DATA_60: u8 = 0x3c;
pub const OP_DATA_61: u8 = 0x3d;
pub const OP_DATA_62: u8 = 0x3e;
pub const OP_DATA_63: u8 = 0x3f;
pub const OP_DATA_64: u8 = 0x40;
pub const OP_DATA_65: u8 = 0x41;
pub const OP_DATA_66: u8 = 0x42;
pub const OP_DATA_67: u8 = 0x43;
pub const OP_DATA_68: u8 = 0x44;
pub const OP_DATA_69: u8 = 0x45;
pub const OP_DATA_70: u8 = 0x46;
pub const OP_DATA_71: u8 = 0x47;
pub const OP_DATA_72: u8 = 0x48;
pub const OP_DATA_73: u8 = 0x49;
pub const OP_DATA_74: u8 = 0x4a;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;
pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;
pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;
pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;
pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;
pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
pub const OP_NOP1: u8 = 0xb0;
pub const OP_NOP2: u8 = 0xb1;
pub const OP_NOP3: u8 = 0xb2;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;
pub const OP_UNKNOWN186: u8 = 0xba;
pub const OP_UNKNOWN187: u8 = 0xbb;
pub const OP_UNKNOWN188: u8 = 0xbc;
pub const OP_UNKNOWN189: u8 = 0xbd;
pub const OP_UNKNOWN190: u8 = 0xbe;
pub const OP_UNKNOWN191: u8 = 0xbf;
pub const OP_UNKNOWN192: u8 = 0xc0;
pub const OP_UNKNOWN193: u8 = 0xc1;
pub const OP_UNKNOWN194: u8 = 0xc2;
pub const OP_UNKNOWN195: u8 = 0xc3;
pub const OP_UNKNOWN196: u8 = 0xc4;
pub const OP_UNKNOWN197: u8 = 0xc5;
pub const OP_UNKNOWN198: u8 = 0xc6;
pub const OP_UNKNOWN199: u8 = 0xc7;
pub const OP_UNKNOWN200: u8 = 0xc8;
pub const OP_UNKNOWN201: u8 = 0xc9;
pub const OP_UNKNOWN202: u8 = 0xca;
pub const OP_UNKNOWN203: u8 = 0xcb;
pub const OP_UNKNOWN204: u8 = 0xcc;
pub const OP_UNKNOWN205: u8 = 0xcd;
pub const OP_UNKNOWN206: u8 = 0xce;
pub const OP_UNKNOWN207: u8 = 0xcf;
pub const OP_UNKNOWN208: u8 = 0xd0;
pub const OP_UNKNOWN209: u8 = 0xd1;
pub const OP_UNKNOWN210: u8 = 0xd2;
pub const OP_UNKNOWN211: u8 = 0xd3;
pub const OP_UNKNOWN212: u8 = 0xd4;
pub const OP_UNKNOWN213: u8 = 0xd5;
pub const OP_UNKNOWN214: u8 = 0xd6;
pub const OP_UNKNOWN215: u8 = 0xd7;
pub const OP_UNKNOWN216: u8 = 0xd8;
pub const OP_UNKNOWN217: u8 = 0xd9;
pub const OP_UNKNOWN218: u8 = 0xda;
pub const OP_UNKNOWN219: u8 = 0xdb;
pub const OP_UNKNOWN220: u8 = 0xdc;
pub const OP_UNKNOWN221: u8 = 0xdd;
pub const OP_UNKNOWN222: u8 = 0xde;
pub const OP_UNKNOWN223: u8 = 0xdf;
pub const OP_UNKNOWN224: u8 = 0xe0;
pub const OP_UNKNOWN225: u8 = 0xe1;
pub const OP_UNKNOWN226: u8 = 0xe2;
pub const OP_UNKNOWN227: u8 = 0xe3;
pub const OP_UNKNOWN228: u8 = 0xe4;
pub const OP_UNKNOWN229: u8 = 0xe5;
pub const OP_UNKNOWN230: u8 = 0xe6;
pub const OP_UNKNOWN231: u8 = 0xe7;
pub const OP_UNKNOWN232: u8 = 0xe8;
pub const OP_UNKNOWN233: u8 = 0xe9;
pub const OP_UNKNOWN234: u8 = 0xea;
pub const OP_UNKNOWN235: u8 = 0xeb;
pub const OP_UNKNOWN236: u8 = 0xec;
pub const OP_UNKNOWN237: u8 = 0xed;
pub const OP_UNKNOWN238: u8 = 0xee;
pub const OP_UNKNOWN239: u8 = 0xef;
pub const OP_UNKNOWN240: u8 = 0xf0;
pub const OP_UNKNOWN241: u8 = 0xf1;
pub const OP_UNKNOWN242: u8 = 0xf2;
pub const OP_UNKNOWN243: u8 = 0xf3;
pub const OP_UNKNOWN244: u8 = 0xf4;
pub const OP_UNKNOWN245: u8 = 0xf5;
pub const OP_UNKNOWN246: u8 = 0xf6;
pub const OP_UNKNOWN247: u8 = 0xf7;
pub const OP_UNKNOWN248: u8 = 0xf8;
pub const OP_SMALLDATA: u8 = 0xf9;
pub const OP_SMALLINTEGER: u8 = 0xfa;
pub const OP_PUBKEYS: u8 = 0xfb;
pub const OP_UNKNOWN252: u8 = 0xfc;
pub const OP_PUBKEYHASH: u8 = 0xfd;
pub const OP_PUBKEY: u8 = 0xfe;
pub const OP_INVALIDOPCODE: u8 = 0xff;

/// Immutable table describing all 256 opcodes, indexed by opcode byte.
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    OpcodeInfo { value: OP_0, name: "OP_0", length: 1 },
    OpcodeInfo { value: OP_DATA_1, name: "OP_DATA_1", length: 2 },
    OpcodeInfo { value: OP_DATA_2, name: "OP_DATA_2", length: 3 },
    OpcodeInfo { value: OP_DATA_3, name: "OP_DATA_3", length: 4 },
    OpcodeInfo { value: OP_DATA_4, name: "OP_DATA_4", length: 5 },
    OpcodeInfo { value: OP_DATA_5, name: "OP_DATA_5", length: 6 },
    OpcodeInfo { value: OP_DATA_6, name: "OP_DATA_6", length: 7 },
    OpcodeInfo { value: OP_DATA_7, name: "OP_DATA_7", length: 8 },
    OpcodeInfo { value: OP_DATA_8, name: "OP_DATA_8", length: 9 },
    OpcodeInfo { value: OP_DATA_9, name: "OP_DATA_9", length: 10 },
    OpcodeInfo { value: OP_DATA_10, name: "OP_DATA_10", length: 11 },
    OpcodeInfo { value: OP_DATA_11, name: "OP_DATA_11", length: 12 },
    OpcodeInfo { value: OP_DATA_12, name: "OP_DATA_12", length: 13 },
    OpcodeInfo { value: OP_DATA_13, name: "OP_DATA_13", length: 14 },
    OpcodeInfo { value: OP_DATA_14, name: "OP_DATA_14", length: 15 },
    OpcodeInfo { value: OP_DATA_15, name: "OP_DATA_15", length: 16 },
    OpcodeInfo { value: OP_DATA_16, name: "OP_DATA_16", length: 17 },
    OpcodeInfo { value: OP_DATA_17, name: "OP_DATA_17", length: 18 },
    OpcodeInfo { value: OP_DATA_18, name: "OP_DATA_18", length: 19 },
    OpcodeInfo { value: OP_DATA_19, name: "OP_DATA_19", length: 20 },
    OpcodeInfo { value: OP_DATA_20, name: "OP_DATA_20", length: 21 },
    OpcodeInfo { value: OP_DATA_21, name: "OP_DATA_21", length: 22 },
    OpcodeInfo { value: OP_DATA_22, name: "OP_DATA_22", length: 23 },
    OpcodeInfo { value: OP_DATA_23, name: "OP_DATA_23", length: 24 },
    OpcodeInfo { value: OP_DATA_24, name: "OP_DATA_24", length: 25 },
    OpcodeInfo { value: OP_DATA_25, name: "OP_DATA_25", length: 26 },
    OpcodeInfo { value: OP_DATA_26, name: "OP_DATA_26", length: 27 },
    OpcodeInfo { value: OP_DATA_27, name: "OP_DATA_27", length: 28 },
    OpcodeInfo { value: OP_DATA_28, name: "OP_DATA_28", length: 29 },
    OpcodeInfo { value: OP_DATA_29, name: "OP_DATA_29", length: 30 },
    OpcodeInfo { value: OP_DATA_30, name: "OP_DATA_30", length: 31 },
    OpcodeInfo { value: OP_DATA_31, name: "OP_DATA_31", length: 32 },
    OpcodeInfo { value: OP_DATA_32, name: "OP_DATA_32", length: 33 },
    OpcodeInfo { value: OP_DATA_33, name: "OP_DATA_33", length: 34 },
    OpcodeInfo { value: OP_DATA_34, name: "OP_DATA_34", length: 35 },
    OpcodeInfo { value: OP_DATA_35, name: "OP_DATA_35", length: 36 },
    OpcodeInfo { value: OP_DATA_36, name: "OP_DATA_36", length: 37 },
    OpcodeInfo { value: OP_DATA_37, name: "OP_DATA_37", length: 38 },
    OpcodeInfo { value: OP_DATA_38, name: "OP_DATA_38", length: 39 },
    OpcodeInfo { value: OP_DATA_39, name: "OP_DATA_39", length: 40 },
    OpcodeInfo { value: OP_DATA_40, name: "OP_DATA_40", length: 41 },
    OpcodeInfo { value: OP_DATA_41, name: "OP_DATA_41", length: 42 },
    OpcodeInfo { value: OP_DATA_42, name: "OP_DATA_42", length: 43 },
    OpcodeInfo { value: OP_DATA_43, name: "OP_DATA_43", length: 44 },
    OpcodeInfo { value: OP_DATA_44, name: "OP_DATA_44", length: 45 },
    OpcodeInfo { value: OP_DATA_45, name: "OP_DATA_45", length: 46 },
    OpcodeInfo { value: OP_DATA_46, name: "OP_DATA_46", length: 47 },
    OpcodeInfo { value: OP_DATA_47, name: "OP_DATA_47", length: 48 },
    OpcodeInfo { value: OP_DATA_48, name: "OP_DATA_48", length: 49 },
    OpcodeInfo { value: OP_DATA_49, name: "OP_DATA_49", length: 50 },
    OpcodeInfo { value: OP_DATA_50, name: "OP_DATA_50", length: 51 },
    OpcodeInfo { value: OP_DATA_51, name: "OP_DATA_51", length: 52 },
    OpcodeInfo { value: OP_DATA_52, name: "OP_DATA_52", length: 53 },
    OpcodeInfo { value: OP_DATA_53, name: "OP_DATA_53", length: 54 },
    OpcodeInfo { value: OP_DATA_54, name: "OP_DATA_54", length: 55 },
    OpcodeInfo { value: OP_DATA_55, name: "OP_DATA_55", length: 56 },
    OpcodeInfo { value: OP_DATA_56, name: "OP_DATA_56", length: 57 },
    OpcodeInfo { value: OP_DATA_57, name: "OP_DATA_57", length: 58 },
    OpcodeInfo { value: OP_DATA_58, name: "OP_DATA_58", length: 59 },
    OpcodeInfo { value: OP_DATA_59, name: "OP_DATA_59", length: 60 },
    OpcodeInfo { value: OP_DATA_60, name: "OP_DATA_60", length: 61 },
    OpcodeInfo { value: OP_DATA_61, name: "OP_DATA_61", length: 62 },
    OpcodeInfo { value: OP_DATA_62, name: "OP_DATA_62", length: 63 },
    OpcodeInfo { value: OP_DATA_63, name: "OP_DATA_63", length: 64 },
    OpcodeInfo { value: OP_DATA_64, name: "OP_DATA_64", length: 65 },
    OpcodeInfo { value: OP_DATA_65, name: "OP_DATA_65", length: 66 },
    OpcodeInfo { value: OP_DATA_66, name: "OP_DATA_66", length: 67 },
    OpcodeInfo { value: OP_DATA_67, name: "OP_DATA_67", length: 68 },
    OpcodeInfo { value: OP_DATA_68, name: "OP_DATA_68", length: 69 },
    OpcodeInfo { value: OP_DATA_69, name: "OP_DATA_69", length: 70 },
    OpcodeInfo { value: OP_DATA_70, name: "OP_DATA_70", length: 71 },
    OpcodeInfo { value: OP_DATA_71, name: "OP_DATA_71", length: 72 },
    OpcodeInfo { value: OP_DATA_72, name: "OP_DATA_72", length: 73 },
    OpcodeInfo { value: OP_DATA_73, name: "OP_DATA_73", length: 74 },
    OpcodeInfo { value: OP_DATA_74, name: "OP_DATA_74", length: 75 },
    OpcodeInfo { value: OP_DATA_75, name: "OP_DATA_75", length: 76 },
    OpcodeInfo { value: OP_PUSHDATA1, name: "OP_PUSHDATA1", length: -1 },
    OpcodeInfo { value: OP_PUSHDATA2, name: "OP_PUSHDATA2", length: -2 },
    OpcodeInfo { value: OP_PUSHDATA4, name: "OP_PUSHDATA4", length: -4 },
    OpcodeInfo { value: OP_1NEGATE, name: "OP_1NEGATE", length: 1 },
    OpcodeInfo { value: OP_RESERVED, name: "OP_RESERVED", length: 1 },
    OpcodeInfo { value: OP_1, name: "OP_1", length: 1 },
    OpcodeInfo { value: OP_2, name: "OP_2", length: 1 },
    OpcodeInfo { value: OP_3, name: "OP_3", length: 1 },
    OpcodeInfo { value: OP_4, name: "OP_4", length: 1 },
    OpcodeInfo { value: OP_5, name: "OP_5", length: 1 },
    OpcodeInfo { value: OP_6, name: "OP_6", length: 1 },
    OpcodeInfo { value: OP_7, name: "OP_7", length: 1 },
    OpcodeInfo { value: OP_8, name: "OP_8", length: 1 },
    OpcodeInfo { value: OP_9, name: "OP_9", length: 1 },
    OpcodeInfo { value: OP_10, name: "OP_10", length: 1 },
    OpcodeInfo { value: OP_11, name: "OP_11", length: 1 },
    OpcodeInfo { value: OP_12, name: "OP_12", length: 1 },
    OpcodeInfo { value: OP_13, name: "OP_13", length: 1 },
    OpcodeInfo { value: OP_14, name: "OP_14", length: 1 },
    OpcodeInfo { value: OP_15, name: "OP_15", length: 1 },
    OpcodeInfo { value: OP_16, name: "OP_16", length: 1 },
    OpcodeInfo { value: OP_NOP, name: "OP_NOP", length: 1 },
    OpcodeInfo { value: OP_VER, name: "OP_VER", length: 1 },
    OpcodeInfo { value: OP_IF, name: "OP_IF", length: 1 },
    OpcodeInfo { value: OP_NOTIF, name: "OP_NOTIF", length: 1 },
    OpcodeInfo { value: OP_VERIF, name: "OP_VERIF", length: 1 },
    OpcodeInfo { value: OP_VERNOTIF, name: "OP_VERNOTIF", length: 1 },
    OpcodeInfo { value: OP_ELSE, name: "OP_ELSE", length: 1 },
    OpcodeInfo { value: OP_ENDIF, name: "OP_ENDIF", length: 1 },
    OpcodeInfo { value: OP_VERIFY, name: "OP_VERIFY", length: 1 },
    OpcodeInfo { value: OP_RETURN, name: "OP_RETURN", length: 1 },
    OpcodeInfo { value: OP_TOALTSTACK, name: "OP_TOALTSTACK", length: 1 },
    OpcodeInfo { value: OP_FROMALTSTACK, name: "OP_FROMALTSTACK", length: 1 },
    OpcodeInfo { value: OP_2DROP, name: "OP_2DROP", length: 1 },
    OpcodeInfo { value: OP_2DUP, name: "OP_2DUP", length: 1 },
    OpcodeInfo { value: OP_3DUP, name: "OP_3DUP", length: 1 },
    OpcodeInfo { value: OP_2OVER, name: "OP_2OVER", length: 1 },
    OpcodeInfo { value: OP_2ROT, name: "OP_2ROT", length: 1 },
    OpcodeInfo { value: OP_2SWAP, name: "OP_2SWAP", length: 1 },
    OpcodeInfo { value: OP_IFDUP, name: "OP_IFDUP", length: 1 },
    OpcodeInfo { value: OP_DEPTH, name: "OP_DEPTH", length: 1 },
    OpcodeInfo { value: OP_DROP, name: "OP_DROP", length: 1 },
    OpcodeInfo { value: OP_DUP, name: "OP_DUP", length: 1 },
    OpcodeInfo { value: OP_NIP, name: "OP_NIP", length: 1 },
    OpcodeInfo { value: OP_OVER, name: "OP_OVER", length: 1 },
    OpcodeInfo { value: OP_PICK, name: "OP_PICK", length: 1 },
    OpcodeInfo { value: OP_ROLL, name: "OP_ROLL", length: 1 },
    OpcodeInfo { value: OP_ROT, name: "OP_ROT", length: 1 },
    OpcodeInfo { value: OP_SWAP, name: "OP_SWAP", length: 1 },
    OpcodeInfo { value: OP_TUCK, name: "OP_TUCK", length: 1 },
    OpcodeInfo { value: OP_CAT, name: "OP_CAT", length: 1 },
    OpcodeInfo { value: OP_SUBSTR, name: "OP_SUBSTR", length: 1 },
    OpcodeInfo { value: OP_LEFT, name: "OP_LEFT", length: 1 },
    OpcodeInfo { value: OP_RIGHT, name: "OP_RIGHT", length: 1 },
    OpcodeInfo { value: OP_SIZE, name: "OP_SIZE", length: 1 },
    OpcodeInfo { value: OP_INVERT, name: "OP_INVERT", length: 1 },
    OpcodeInfo { value: OP_AND, name: "OP_AND", length: 1 },
    OpcodeInfo { value: OP_OR, name: "OP_OR", length: 1 },
    OpcodeInfo { value: OP_XOR, name: "OP_XOR", length: 1 },
    OpcodeInfo { value: OP_EQUAL, name: "OP_EQUAL", length: 1 },
    OpcodeInfo { value: OP_EQUALVERIFY, name: "OP_EQUALVERIFY", length: 1 },
    OpcodeInfo { value: OP_RESERVED1, name: "OP_RESERVED1", length: 1 },
    OpcodeInfo { value: OP_RESERVED2, name: "OP_RESERVED2", length: 1 },
    OpcodeInfo { value: OP_1ADD, name: "OP_1ADD", length: 1 },
    OpcodeInfo { value: OP_1SUB, name: "OP_1SUB", length: 1 },
    OpcodeInfo { value: OP_2MUL, name: "OP_2MUL", length: 1 },
    OpcodeInfo { value: OP_2DIV, name: "OP_2DIV", length: 1 },
    OpcodeInfo { value: OP_NEGATE, name: "OP_NEGATE", length: 1 },
    OpcodeInfo { value: OP_ABS, name: "OP_ABS", length: 1 },
    OpcodeInfo { value: OP_NOT, name: "OP_NOT", length: 1 },
    OpcodeInfo { value: OP_0NOTEQUAL, name: "OP_0NOTEQUAL", length: 1 },
    OpcodeInfo { value: OP_ADD, name: "OP_ADD", length: 1 },
    OpcodeInfo { value: OP_SUB, name: "OP_SUB", length: 1 },
    OpcodeInfo { value: OP_MUL, name: "OP_MUL", length: 1 },
    OpcodeInfo { value: OP_DIV, name: "OP_DIV", length: 1 },
    OpcodeInfo { value: OP_MOD, name: "OP_MOD", length: 1 },
    OpcodeInfo { value: OP_LSHIFT, name: "OP_LSHIFT", length: 1 },
    OpcodeInfo { value: OP_RSHIFT, name: "OP_RSHIFT", length: 1 },
    OpcodeInfo { value: OP_BOOLAND, name: "OP_BOOLAND", length: 1 },
    OpcodeInfo { value: OP_BOOLOR, name: "OP_BOOLOR", length: 1 },
    OpcodeInfo { value: OP_NUMEQUAL, name: "OP_NUMEQUAL", length: 1 },
    OpcodeInfo { value: OP_NUMEQUALVERIFY, name: "OP_NUMEQUALVERIFY", length: 1 },
    OpcodeInfo { value: OP_NUMNOTEQUAL, name: "OP_NUMNOTEQUAL", length: 1 },
    OpcodeInfo { value: OP_LESSTHAN, name: "OP_LESSTHAN", length: 1 },
    OpcodeInfo { value: OP_GREATERTHAN, name: "OP_GREATERTHAN", length: 1 },
    OpcodeInfo { value: OP_LESSTHANOREQUAL, name: "OP_LESSTHANOREQUAL", length: 1 },
    OpcodeInfo { value: OP_GREATERTHANOREQUAL, name: "OP_GREATERTHANOREQUAL", length: 1 },
    OpcodeInfo { value: OP_MIN, name: "OP_MIN", length: 1 },
    OpcodeInfo { value: OP_MAX, name: "OP_MAX", length: 1 },
    OpcodeInfo { value: OP_WITHIN, name: "OP_WITHIN", length: 1 },
    OpcodeInfo { value: OP_RIPEMD160, name: "OP_RIPEMD160", length: 1 },
    OpcodeInfo { value: OP_SHA1, name: "OP_SHA1", length: 1 },
    OpcodeInfo { value: OP_SHA256, name: "OP_SHA256", length: 1 },
    OpcodeInfo { value: OP_HASH160, name: "OP_HASH160", length: 1 },
    OpcodeInfo { value: OP_HASH256, name: "OP_HASH256", length: 1 },
    OpcodeInfo { value: OP_CODESEPARATOR, name: "OP_CODESEPARATOR", length: 1 },
    OpcodeInfo { value: OP_CHECKSIG, name: "OP_CHECKSIG", length: 1 },
    OpcodeInfo { value: OP_CHECKSIGVERIFY, name: "OP_CHECKSIGVERIFY", length: 1 },
    OpcodeInfo { value: OP_CHECKMULTISIG, name: "OP_CHECKMULTISIG", length: 1 },
    OpcodeInfo { value: OP_CHECKMULTISIGVERIFY, name: "OP_CHECKMULTISIGVERIFY", length: 1 },
    OpcodeInfo { value: OP_NOP1, name: "OP_NOP1", length: 1 },
    OpcodeInfo { value: OP_NOP2, name: "OP_NOP2", length: 1 },
    OpcodeInfo { value: OP_NOP3, name: "OP_NOP3", length: 1 },
    OpcodeInfo { value: OP_NOP4, name: "OP_NOP4", length: 1 },
    OpcodeInfo { value: OP_NOP5, name: "OP_NOP5", length: 1 },
    OpcodeInfo { value: OP_NOP6, name: "OP_NOP6", length: 1 },
    OpcodeInfo { value: OP_NOP7, name: "OP_NOP7", length: 1 },
    OpcodeInfo { value: OP_NOP8, name: "OP_NOP8", length: 1 },
    OpcodeInfo { value: OP_NOP9, name: "OP_NOP9", length: 1 },
    OpcodeInfo { value: OP_NOP10, name: "OP_NOP10", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN186, name: "OP_UNKNOWN186", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN187, name: "OP_UNKNOWN187", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN188, name: "OP_UNKNOWN188", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN189, name: "OP_UNKNOWN189", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN190, name: "OP_UNKNOWN190", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN191, name: "OP_UNKNOWN191", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN192, name: "OP_UNKNOWN192", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN193, name: "OP_UNKNOWN193", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN194, name: "OP_UNKNOWN194", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN195, name: "OP_UNKNOWN195", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN196, name: "OP_UNKNOWN196", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN197, name: "OP_UNKNOWN197", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN198, name: "OP_UNKNOWN198", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN199, name: "OP_UNKNOWN199", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN200, name: "OP_UNKNOWN200", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN201, name: "OP_UNKNOWN201", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN202, name: "OP_UNKNOWN202", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN203, name: "OP_UNKNOWN203", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN204, name: "OP_UNKNOWN204", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN205, name: "OP_UNKNOWN205", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN206, name: "OP_UNKNOWN206", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN207, name: "OP_UNKNOWN207", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN208, name: "OP_UNKNOWN208", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN209, name: "OP_UNKNOWN209", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN210, name: "OP_UNKNOWN210", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN211, name: "OP_UNKNOWN211", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN212, name: "OP_UNKNOWN212", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN213, name: "OP_UNKNOWN213", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN214, name: "OP_UNKNOWN214", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN215, name: "OP_UNKNOWN215", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN216, name: "OP_UNKNOWN216", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN217, name: "OP_UNKNOWN217", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN218, name: "OP_UNKNOWN218", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN219, name: "OP_UNKNOWN219", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN220, name: "OP_UNKNOWN220", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN221, name: "OP_UNKNOWN221", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN222, name: "OP_UNKNOWN222", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN223, name: "OP_UNKNOWN223", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN224, name: "OP_UNKNOWN224", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN225, name: "OP_UNKNOWN225", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN226, name: "OP_UNKNOWN226", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN227, name: "OP_UNKNOWN227", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN228, name: "OP_UNKNOWN228", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN229, name: "OP_UNKNOWN229", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN230, name: "OP_UNKNOWN230", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN231, name: "OP_UNKNOWN231", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN232, name: "OP_UNKNOWN232", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN233, name: "OP_UNKNOWN233", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN234, name: "OP_UNKNOWN234", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN235, name: "OP_UNKNOWN235", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN236, name: "OP_UNKNOWN236", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN237, name: "OP_UNKNOWN237", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN238, name: "OP_UNKNOWN238", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN239, name: "OP_UNKNOWN239", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN240, name: "OP_UNKNOWN240", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN241, name: "OP_UNKNOWN241", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN242, name: "OP_UNKNOWN242", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN243, name: "OP_UNKNOWN243", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN244, name: "OP_UNKNOWN244", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN245, name: "OP_UNKNOWN245", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN246, name: "OP_UNKNOWN246", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN247, name: "OP_UNKNOWN247", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN248, name: "OP_UNKNOWN248", length: 1 },
    OpcodeInfo { value: OP_SMALLDATA, name: "OP_SMALLDATA", length: 1 },
    OpcodeInfo { value: OP_SMALLINTEGER, name: "OP_SMALLINTEGER", length: 1 },
    OpcodeInfo { value: OP_PUBKEYS, name: "OP_PUBKEYS", length: 1 },
    OpcodeInfo { value: OP_UNKNOWN252, name: "OP_UNKNOWN252", length: 1 },
    OpcodeInfo { value: OP_PUBKEYHASH, name: "OP_PUBKEYHASH", length: 1 },
    OpcodeInfo { value: OP_PUBKEY, name: "OP_PUBKEY", length: 1 },
    OpcodeInfo { value: OP_INVALIDOPCODE, name: "OP_INVALIDOPCODE", length: 1 },
];

/// Static description of a single opcode value.
#[derive(Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub value: u8,
    pub name: &'static str,
    pub length: i32,
}

/// One parsed instruction: an opcode plus its immediate push data, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOpcode {
    pub opcode: &'static OpcodeInfo,
    pub data: Vec<u8>,
}

impl ParsedOpcode {
    pub fn value(&self) -> u8 {
        self.opcode.value
    }

    /// Disabled opcodes fail on sight, even inside a non-executing branch.
    pub fn is_disabled(&self) -> bool {
        matches!(
            self.opcode.value,
            OP_CAT
                | OP_SUBSTR
                | OP_LEFT
                | OP_RIGHT
                | OP_INVERT
                | OP_AND
                | OP_OR
                | OP_XOR
                | OP_2MUL
                | OP_2DIV
                | OP_MUL
                | OP_DIV
                | OP_MOD
                | OP_LSHIFT
                | OP_RSHIFT
        )
    }

    /// Opcodes that fail whenever the program counter passes over them,
    /// executing branch or not.
    pub fn is_always_illegal(&self) -> bool {
        matches!(self.opcode.value, OP_VERIF | OP_VERNOTIF)
    }

    /// Conditional-flow opcodes still execute inside a skipped branch so
    /// that nesting stays balanced.
    pub fn is_conditional(&self) -> bool {
        matches!(self.opcode.value, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF)
    }

    /// Checks that a data push uses the shortest possible opcode for its
    /// payload.
    pub fn check_minimal_data_push(&self) -> Result<(), ScriptError> {
        let data_len = self.data.len();
        let opcode = self.opcode.value;

        if data_len == 0 {
            if opcode != OP_0 {
                return Err(ScriptError::MinimalData);
            }
        } else if data_len == 1 && (1..=16).contains(&self.data[0]) {
            if opcode != OP_1 + self.data[0] - 1 {
                return Err(ScriptError::MinimalData);
            }
        } else if data_len == 1 && self.data[0] == 0x81 {
            if opcode != OP_1NEGATE {
                return Err(ScriptError::MinimalData);
            }
        } else if data_len <= 75 {
            if opcode as usize != data_len {
                return Err(ScriptError::MinimalData);
            }
        } else if data_len <= 255 {
            if opcode != OP_PUSHDATA1 {
                return Err(ScriptError::MinimalData);
            }
        } else if data_len <= 65535 {
            if opcode != OP_PUSHDATA2 {
                return Err(ScriptError::MinimalData);
            }
        }
        Ok(())
    }

    /// Total number of bytes this instruction occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        match self.opcode.length {
            length if length > 0 => length as usize,
            -1 => 2 + self.data.len(),
            -2 => 3 + self.data.len(),
            _ => 5 + self.data.len(),
        }
    }

    /// Re-encodes the instruction.  Fails with `InvalidOpcode` when the
    /// attached data does not fit the opcode's encoded form.
    pub fn serialize(&self) -> Result<Vec<u8>, ScriptError> {
        if self.opcode.length == 1 {
            if !self.data.is_empty() {
                return Err(ScriptError::InvalidOpcode);
            }
            return Ok(vec![self.opcode.value]);
        }

        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.push(self.opcode.value);
        match self.opcode.length {
            -1 => {
                if self.data.len() > 0xff {
                    return Err(ScriptError::InvalidOpcode);
                }
                bytes.push(self.data.len() as u8);
            }
            -2 => {
                if self.data.len() > 0xffff {
                    return Err(ScriptError::InvalidOpcode);
                }
                bytes.extend_from_slice(&(self.data.len() as u16).to_le_bytes());
            }
            -4 => {
                if self.data.len() > 0xffff_ffff {
                    return Err(ScriptError::InvalidOpcode);
                }
                bytes.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
            }
            length => {
                if self.data.len() != length as usize - 1 {
                    return Err(ScriptError::InvalidOpcode);
                }
            }
        }
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }

    /// Renders the instruction for disassembly.
    ///
    /// One-line mode matches the reference implementation: the small-integer
    /// opcodes become their numeric literal, push payloads are emitted as
    /// bare concatenated hex.  Multi-line mode keeps the opcode name, prints
    /// the PUSHDATA length prefix as `0xHH..`, and space-separates payload
    /// bytes.
    pub fn print(&self, oneline: bool) -> String {
        let mut name = self.opcode.name;
        if oneline {
            name = match self.opcode.value {
                OP_0 => "0",
                OP_1NEGATE => "-1",
                OP_1 => "1",
                OP_2 => "2",
                OP_3 => "3",
                OP_4 => "4",
                OP_5 => "5",
                OP_6 => "6",
                OP_7 => "7",
                OP_8 => "8",
                OP_9 => "9",
                OP_10 => "10",
                OP_11 => "11",
                OP_12 => "12",
                OP_13 => "13",
                OP_14 => "14",
                OP_15 => "15",
                OP_16 => "16",
                _ => name,
            };
        }

        if self.opcode.length == 1 {
            return name.to_string();
        }

        let mut ret = if oneline { String::new() } else { name.to_string() };
        if !oneline && self.opcode.length < 0 {
            let width = 2 * (-self.opcode.length) as usize;
            ret.push_str(&format!(" 0x{:0width$x}", self.data.len()));
        }
        for byte in &self.data {
            if !oneline {
                ret.push(' ');
            }
            ret.push_str(&format!("{byte:02x}"));
        }
        ret
    }
}

/// Tokenizes a raw script into parsed instructions.
pub fn parse_script(script: &[u8]) -> Result<Vec<ParsedOpcode>, ScriptError> {
    let mut pops = Vec::new();
    let mut i = 0usize;
    while i < script.len() {
        let info = &OPCODE_TABLE[script[i] as usize];
        let mut data = Vec::new();

        match info.length {
            1 => {
                i += 1;
            }
            length if length > 1 => {
                let length = length as usize;
                if script.len() < i + length {
                    return Err(ScriptError::ShortScript);
                }
                data = script[i + 1..i + length].to_vec();
                i += length;
            }
            neg_width => {
                let width = (-neg_width) as usize;
                if script.len() < i + 1 + width {
                    return Err(ScriptError::ShortScript);
                }
                let mut data_len = 0usize;
                for j in 0..width {
                    data_len |= (script[i + 1 + j] as usize) << (8 * j);
                }
                let start = i + 1 + width;
                if script.len() < start + data_len {
                    return Err(ScriptError::ShortScript);
                }
                data = script[start..start + data_len].to_vec();
                i = start + data_len;
            }
        }

        pops.push(ParsedOpcode { opcode: info, data });
    }
    Ok(pops)
}

/// Inverse of [`parse_script`].
pub fn serialize_script(pops: &[ParsedOpcode]) -> Result<Vec<u8>, ScriptError> {
    let mut script = Vec::new();
    for pop in pops {
        script.extend_from_slice(&pop.serialize()?);
    }
    Ok(script)
}

/// Returns whether every instruction is a push (value at most OP_16).
pub fn is_push_only(pops: &[ParsedOpcode]) -> bool {
    pops.iter().all(|pop| pop.value() <= OP_16)
}

/// One-line disassembly of a raw script.
pub fn disasm_script(script: &[u8]) -> Result<String, ScriptError> {
    let pops = parse_script(script)?;
    Ok(pops
        .iter()
        .map(|pop| pop.print(true))
        .collect::<Vec<_>>()
        .join(" "))
}

/// Multi-line disassembly of a raw script, one instruction per line.
pub fn disasm_script_pretty(script: &[u8]) -> Result<String, ScriptError> {
    let pops = parse_script(script)?;
    Ok(pops
        .iter()
        .map(|pop| pop.print(false))
        .collect::<Vec<_>>()
        .join("\n"))
}
