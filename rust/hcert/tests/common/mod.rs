// Licensed under the MIT License.

//! Fixture builders for end-to-end HCERT tests.
//!
//! Certificates are assembled from a small claim tree, signed with an `rcgen`
//! P-256 key and armored exactly as a QR payload would be.

#![allow(dead_code)]

use std::io::Write as _;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use hcert::{InMemoryTrustList, SignerCertificate};
use minicbor::data::Tag;
use minicbor::Encoder;
use p256::pkcs8::DecodePrivateKey as _;
use signature::Signer as _;

pub(crate) const KID: &[u8] = &[0x25, 0x3e, 0x4c, 0xa6, 0x0b, 0x1f, 0x7e, 0x81];

/// 2021-06-01T00:00:00Z and 2022-06-01T00:00:00Z.
pub(crate) const ISSUED_AT: i64 = 1_622_505_600;
pub(crate) const EXPIRES_AT: i64 = 1_654_041_600;

#[derive(Clone, Debug)]
pub(crate) enum Val {
    Int(i64),
    Float(f64),
    Text(String),
    Tagged(u64, Box<Val>),
    Array(Vec<Val>),
    Map(Vec<(Key, Val)>),
}

#[derive(Clone, Debug)]
pub(crate) enum Key {
    Int(i64),
    Text(String),
}

pub(crate) fn text(s: &str) -> Val {
    Val::Text(s.to_string())
}

pub(crate) fn tagged(tag: u64, v: Val) -> Val {
    Val::Tagged(tag, Box::new(v))
}

pub(crate) fn map(entries: &[(&str, Val)]) -> Val {
    Val::Map(
        entries
            .iter()
            .map(|(k, v)| (Key::Text(k.to_string()), v.clone()))
            .collect(),
    )
}

pub(crate) fn int_map(entries: Vec<(i64, Val)>) -> Val {
    Val::Map(entries.into_iter().map(|(k, v)| (Key::Int(k), v)).collect())
}

/// Replace or append `key` in a text-keyed map.
pub(crate) fn set(v: &mut Val, key: &str, value: Val) {
    if let Val::Map(entries) = v {
        match entries.iter_mut().find(|(k, _)| matches!(k, Key::Text(t) if t == key)) {
            Some(entry) => entry.1 = value,
            None => entries.push((Key::Text(key.to_string()), value)),
        }
    }
}

pub(crate) fn remove(v: &mut Val, key: &str) {
    if let Val::Map(entries) = v {
        entries.retain(|(k, _)| !matches!(k, Key::Text(t) if t == key));
    }
}

fn encode_val(enc: &mut Encoder<&mut Vec<u8>>, v: &Val) {
    match v {
        Val::Int(i) => {
            enc.i64(*i).unwrap();
        }
        Val::Float(f) => {
            enc.f64(*f).unwrap();
        }
        Val::Text(s) => {
            enc.str(s).unwrap();
        }
        Val::Tagged(t, inner) => {
            enc.tag(Tag::new(*t)).unwrap();
            encode_val(enc, inner);
        }
        Val::Array(items) => {
            enc.array(items.len() as u64).unwrap();
            for item in items {
                encode_val(enc, item);
            }
        }
        Val::Map(entries) => {
            enc.map(entries.len() as u64).unwrap();
            for (k, item) in entries {
                match k {
                    Key::Int(i) => {
                        enc.i64(*i).unwrap();
                    }
                    Key::Text(s) => {
                        enc.str(s).unwrap();
                    }
                }
                encode_val(enc, item);
            }
        }
    }
}

pub(crate) fn to_cbor(v: &Val) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    encode_val(&mut enc, v);
    out
}

pub(crate) fn vaccination_entry(dn: i64, sd: i64, dt: &str) -> Val {
    map(&[
        ("tg", text("840539006")),
        ("vp", text("1119349007")),
        ("mp", text("EU/1/20/1528")),
        ("ma", text("ORG-100030215")),
        ("dn", Val::Int(dn)),
        ("sd", Val::Int(sd)),
        ("dt", text(dt)),
        ("co", text("AT")),
        ("is", text("Ministry of Health, Austria")),
        ("ci", text("URN:UVCI:01:AT:10807843F94AEE0EE5093FBC254BD813#B")),
    ])
}

pub(crate) fn test_entry(tt: &str, tr: &str, sc: Val) -> Val {
    map(&[
        ("tg", text("840539006")),
        ("tt", text(tt)),
        ("nm", text("Roche LightCycler qPCR")),
        ("ma", text("1232")),
        ("sc", sc),
        ("tr", text(tr)),
        ("tc", text("Testing center Vienna 1")),
        ("co", text("AT")),
        ("is", text("Ministry of Health, Austria")),
        ("ci", text("URN:UVCI:01:AT:71EE2559DE38C6BF7304FB65A1A451EC#3")),
    ])
}

pub(crate) fn recovery_entry(df: &str, du: &str) -> Val {
    map(&[
        ("tg", text("840539006")),
        ("fr", text("2021-02-20")),
        ("df", text(df)),
        ("du", text(du)),
        ("co", text("AT")),
        ("is", text("Ministry of Health, Austria")),
        ("ci", text("URN:UVCI:01:AT:858CC18CFCF5965EF82F60E493349AA5#K")),
    ])
}

/// Holder claims with one subject entry under `key` (`"v"`, `"t"` or `"r"`).
pub(crate) fn dcc_with(key: &str, entry: Val) -> Val {
    let mut dcc = dcc_without_subject();
    set(&mut dcc, key, Val::Array(vec![entry]));
    dcc
}

pub(crate) fn dcc_without_subject() -> Val {
    map(&[
        ("ver", text("1.2.1")),
        (
            "nam",
            map(&[
                ("fn", text("Musterfrau-Gößinger")),
                ("fnt", text("MUSTERFRAU<GOESSINGER")),
                ("gn", text("Gabriele")),
                ("gnt", text("GABRIELE")),
            ]),
        ),
        ("dob", text("1998-02-26")),
    ])
}

pub(crate) fn cwt(dcc: Val) -> Val {
    int_map(vec![
        (1, text("AT")),
        (4, Val::Int(EXPIRES_AT)),
        (6, Val::Int(ISSUED_AT)),
        (-260, int_map(vec![(1, dcc)])),
    ])
}

pub(crate) fn payload(dcc: Val) -> Vec<u8> {
    to_cbor(&cwt(dcc))
}

pub(crate) fn p256_cert_and_key() -> (String, p256::ecdsa::SigningKey) {
    let certified = rcgen::generate_simple_self_signed(vec!["dsc.example.test".to_string()]).unwrap();
    let pem = certified.cert.pem();
    let key = p256::ecdsa::SigningKey::from_pkcs8_der(&certified.key_pair.serialize_der()).unwrap();
    (pem, key)
}

pub(crate) fn trust_list(pem: &str) -> InMemoryTrustList {
    InMemoryTrustList::from_entries([SignerCertificate::new(pem, KID)])
}

/// A tagged COSE_Sign1 over `payload`, ES256 with [`KID`] in the protected header.
pub(crate) fn sign(payload: &[u8], key: &p256::ecdsa::SigningKey) -> Vec<u8> {
    let mut protected = Vec::new();
    {
        let mut enc = Encoder::new(&mut protected);
        enc.map(2).unwrap();
        enc.i64(1).unwrap().i64(-7).unwrap();
        enc.i64(4).unwrap().bytes(KID).unwrap();
    }

    let sig_structure = hcert_common::encode_signature1_sig_structure(&protected, payload).unwrap();
    let sig: p256::ecdsa::Signature = key.sign(&sig_structure);

    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(18)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(&protected).unwrap();
    enc.map(0).unwrap();
    enc.bytes(payload).unwrap();
    enc.bytes(&sig.to_bytes()).unwrap();
    out
}

pub(crate) fn armor(cose: &[u8]) -> String {
    let mut z = ZlibEncoder::new(Vec::new(), Compression::default());
    z.write_all(cose).unwrap();
    let compressed = z.finish().unwrap();
    format!("HC1:{}", base45::encode(compressed.as_slice()))
}

/// A complete signed and armored certificate plus the signer PEM.
pub(crate) fn signed_hcert(dcc: Val) -> (String, String) {
    let (pem, key) = p256_cert_and_key();
    (armor(&sign(&payload(dcc), &key)), pem)
}
