//! JAR-style integrity entries under `META-INF/`.
//!
//! - `MANIFEST.MF` lists a digest for every entry written before it
//! - `CERT.SF` carries the digest of `MANIFEST.MF` and of each of its sections
//! - `CERT.RSA` is a DER `SEQUENCE` header padded with zeros
//!
//! Digests are reproducible: the same entries always give the same text.
//! There is no private key involved, so the block does not verify.

use crate::apk::{
    container::ContainerEntry,
    settings::{DigestAlgorithm, SignatureSettings},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Digest manifest path.
pub const MANIFEST_MF_PATH: &str = "META-INF/MANIFEST.MF";
/// Signature file path.
pub const SIGNATURE_FILE_PATH: &str = "META-INF/CERT.SF";
/// Certificate block path.
pub const SIGNATURE_BLOCK_PATH: &str = "META-INF/CERT.RSA";

const MAX_LINE_BYTES: usize = 72;

/// Produces the three `META-INF` entries.
#[derive(Debug, Clone, Copy)]
pub struct SignatureBlockWriter<'a> {
    settings: &'a SignatureSettings,
}

impl<'a> SignatureBlockWriter<'a> {
    /// Writer using the given signature table.
    pub fn new(settings: &'a SignatureSettings) -> Self {
        Self { settings }
    }

    /// Produce the digest manifest, signature file and certificate block,
    /// all stored, covering `entries` in order.
    pub fn write(&self, entries: &[ContainerEntry]) -> Vec<ContainerEntry> {
        let algorithm = self.settings.algorithm;
        let digest_attr = format!("{}-Digest", algorithm.jar_name());

        let mut manifest = String::new();
        push_attr(&mut manifest, "Manifest-Version", "1.0");
        push_attr(&mut manifest, "Created-By", &self.settings.created_by);
        manifest.push_str("\r\n");

        let mut sections = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut section = String::new();
            push_attr(&mut section, "Name", &entry.path);
            push_attr(&mut section, &digest_attr, &b64_digest(algorithm, &entry.bytes));
            section.push_str("\r\n");
            manifest.push_str(&section);
            sections.push((entry.path.as_str(), section));
        }

        let mut signature_file = String::new();
        push_attr(&mut signature_file, "Signature-Version", "1.0");
        push_attr(&mut signature_file, "Created-By", &self.settings.created_by);
        push_attr(
            &mut signature_file,
            &format!("{digest_attr}-Manifest"),
            &b64_digest(algorithm, manifest.as_bytes()),
        );
        signature_file.push_str("\r\n");
        for (path, section) in &sections {
            push_attr(&mut signature_file, "Name", path);
            push_attr(
                &mut signature_file,
                &digest_attr,
                &b64_digest(algorithm, section.as_bytes()),
            );
            signature_file.push_str("\r\n");
        }

        vec![
            ContainerEntry::stored(MANIFEST_MF_PATH, manifest.into_bytes()),
            ContainerEntry::stored(SIGNATURE_FILE_PATH, signature_file.into_bytes()),
            ContainerEntry::stored(SIGNATURE_BLOCK_PATH, self.certificate_block()),
        ]
    }

    fn certificate_block(&self) -> Vec<u8> {
        let size = self.settings.block_size.clamp(4, 0xFFFF + 4);
        let body_len = (size - 4) as u16;
        let mut block = vec![0u8; size];
        block[0] = 0x30; // SEQUENCE
        block[1] = 0x82; // two length bytes follow
        block[2..4].copy_from_slice(&body_len.to_be_bytes());
        block
    }
}

fn b64_digest(algorithm: DigestAlgorithm, data: &[u8]) -> String {
    STANDARD.encode(algorithm.digest(data))
}

/// Append `name: value`, wrapped at 72 bytes with single-space continuations.
fn push_attr(out: &mut String, name: &str, value: &str) {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut limit = MAX_LINE_BYTES;
    loop {
        if rest.len() <= limit {
            out.push_str(rest);
            out.push_str("\r\n");
            return;
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n ");
        rest = &rest[cut..];
        limit = MAX_LINE_BYTES - 1;
    }
}
