use bitcoin::absolute::LockTime;
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use txscript::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use txscript::{calc_signature_hash, parse_script, verify_script, SIG_HASH_ALL, VERIFY_NONE};

struct BenchCase {
    name: &'static str,
    script_sig: Vec<u8>,
    script_pubkey: Vec<u8>,
}

fn spending_tx() -> Transaction {
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
            value: Amount::from_sat(50_000),
            script_pubkey: ScriptBuf::new(),
        }],
    }
}

fn arithmetic_case() -> BenchCase {
    // Repeated add/compare cycles, no crypto.
    let mut script_pubkey = vec![0x51]; // OP_1
    for _ in 0..60 {
        script_pubkey.extend_from_slice(&[0x51, 0x93]); // OP_1 OP_ADD
    }
    script_pubkey.extend_from_slice(&[0x01, 61, 0x87]); // push 61, OP_EQUAL
    BenchCase {
        name: "arithmetic",
        script_sig: Vec::new(),
        script_pubkey,
    }
}

fn hashing_case() -> BenchCase {
    // Chained SHA256 invocations over a growing digest.
    let mut script_pubkey = vec![0x01, 0xab]; // push one byte
    for _ in 0..50 {
        script_pubkey.push(0xa8); // OP_SHA256
    }
    script_pubkey.extend_from_slice(&[0x82, 0x01, 32, 0x87]); // SIZE, push 32, EQUAL
    BenchCase {
        name: "hash-chain",
        script_sig: Vec::new(),
        script_pubkey,
    }
}

fn p2pkh_case(tx: &Transaction) -> BenchCase {
    let secp = Secp256k1::new();
    let mut sk_bytes = [0u8; 32];
    sk_bytes[31] = 42;
    let sk = SecretKey::from_slice(&sk_bytes).expect("valid key");
    let pk = PublicKey::from_secret_key(&secp, &sk);
    let pk_bytes = pk.serialize();

    let pk_hash = hash160::Hash::hash(&pk_bytes);
    let mut script_pubkey = vec![OP_DUP, OP_HASH160, 0x14];
    script_pubkey.extend_from_slice(&pk_hash.to_byte_array());
    script_pubkey.push(OP_EQUALVERIFY);
    script_pubkey.push(OP_CHECKSIG);

    let pops = parse_script(&script_pubkey).expect("script parses");
    let digest = calc_signature_hash(&pops, SIG_HASH_ALL, tx, 0).expect("digest");
    let signature = secp.sign_ecdsa(&Message::from_digest(digest), &sk);
    let mut sig = signature.serialize_der().to_vec();
    sig.push(SIG_HASH_ALL);

    let mut script_sig = vec![sig.len() as u8];
    script_sig.extend_from_slice(&sig);
    script_sig.push(pk_bytes.len() as u8);
    script_sig.extend_from_slice(&pk_bytes);

    BenchCase {
        name: "p2pkh",
        script_sig,
        script_pubkey,
    }
}

pub fn execution_bench(c: &mut Criterion) {
    let tx = spending_tx();
    let cases = vec![arithmetic_case(), hashing_case(), p2pkh_case(&tx)];

    let mut group = c.benchmark_group("execute");
    for case in cases {
        group.bench_with_input(BenchmarkId::from_parameter(case.name), &case, |b, case| {
            b.iter(|| {
                verify_script(&case.script_sig, &case.script_pubkey, &tx, 0, VERIFY_NONE)
                    .expect("benchmark scripts verify")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, execution_bench);
criterion_main!(benches);
