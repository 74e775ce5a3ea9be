//! # Canonical Digest Vectors
//!
//! Fixed evidence documents with their expected canonical text and SHA-256.
//! The expected values were produced independently with
//! `json.dumps(doc, sort_keys=True, separators=(",", ":"), ensure_ascii=False)`
//! followed by `hashlib.sha256`. Any checkpoint written in another language
//! must reproduce the same payload hashes for certificates to verify.

use coldchain_core::{sha256_digest, CanonicalBytes, ContentDigest};

fn check(doc: serde_json::Value, canonical: &str, hex: &str) {
    let cb = CanonicalBytes::new(&doc).expect("canonicalization should succeed");
    assert_eq!(cb.as_str(), canonical);
    let digest = sha256_digest(&cb);
    assert_eq!(digest.to_hex(), hex);
    assert_eq!(
        ContentDigest::parse(&format!("sha256:{hex}")).unwrap(),
        digest
    );
}

#[test]
fn inspection_report_vector() {
    check(
        serde_json::json!({
            "readings": [-72, -71, -70],
            "passed": true,
            "inspector": "Port of Rotterdam"
        }),
        r#"{"inspector":"Port of Rotterdam","passed":true,"readings":[-72,-71,-70]}"#,
        "f9aab1afc5a855438ee3bac307dc1980abb6129d534db1b2345ff4251e6dcfe2",
    );
}

#[test]
fn empty_evidence_vector() {
    check(
        serde_json::json!({}),
        "{}",
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
    );
}

#[test]
fn batch_manifest_vector() {
    check(
        serde_json::json!({"lot": "EW0150", "doses": 1170, "brand": "Pfizer-BioNTech"}),
        r#"{"brand":"Pfizer-BioNTech","doses":1170,"lot":"EW0150"}"#,
        "2c86d26ccbb89bf5835cf4bb01460d24f6f9ecdbdb6b1bebcb454a48803eb8b5",
    );
}

#[test]
fn struct_and_json_value_agree() {
    #[derive(serde::Serialize)]
    struct Manifest<'a> {
        lot: &'a str,
        doses: u32,
        brand: &'a str,
    }
    let from_struct = CanonicalBytes::new(&Manifest {
        lot: "EW0150",
        doses: 1170,
        brand: "Pfizer-BioNTech",
    })
    .unwrap();
    let from_value = CanonicalBytes::new(
        &serde_json::json!({"brand": "Pfizer-BioNTech", "doses": 1170, "lot": "EW0150"}),
    )
    .unwrap();
    assert_eq!(from_struct, from_value);
}
