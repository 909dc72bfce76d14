//! Placeholder `classes.dex`.
//!
//! The entry carries a correct DEX 035 header (magic, Adler-32 checksum,
//! SHA-1 signature, file size, header size, endian tag) followed by zero
//! padding. Every section table is empty, so the file defines no classes:
//! it satisfies structural checks but contains no runnable code.

use crate::apk::{container::ContainerEntry, settings::CodeStubSettings};
use adler::adler32_slice;
use sha1::{Digest, Sha1};

/// Fixed container path of the code entry.
pub const DEX_PATH: &str = "classes.dex";

/// `dex\n035\0`
pub const DEX_MAGIC: [u8; 8] = [0x64, 0x65, 0x78, 0x0a, 0x30, 0x33, 0x35, 0x00];

/// Size of the fixed DEX header.
pub const HEADER_SIZE: usize = 0x70;

const ENDIAN_CONSTANT: u32 = 0x1234_5678;

const CHECKSUM_OFFSET: usize = 8;
const SIGNATURE_OFFSET: usize = 12;
const FILE_SIZE_OFFSET: usize = 32;
const HEADER_SIZE_OFFSET: usize = 36;
const ENDIAN_TAG_OFFSET: usize = 40;

/// Produces the code placeholder entry.
#[derive(Debug, Clone, Copy)]
pub struct CodeStubGenerator<'a> {
    settings: &'a CodeStubSettings,
}

impl<'a> CodeStubGenerator<'a> {
    /// Generator using the given size table.
    pub fn new(settings: &'a CodeStubSettings) -> Self {
        Self { settings }
    }

    /// Produce the stored `classes.dex` entry.
    pub fn generate(&self) -> ContainerEntry {
        ContainerEntry::stored(DEX_PATH, self.bytes())
    }

    fn bytes(&self) -> Vec<u8> {
        let size = self.settings.min_size.max(HEADER_SIZE);
        let mut dex = vec![0u8; size];

        dex[..DEX_MAGIC.len()].copy_from_slice(&DEX_MAGIC);
        put_u32(&mut dex, FILE_SIZE_OFFSET, size as u32);
        put_u32(&mut dex, HEADER_SIZE_OFFSET, HEADER_SIZE as u32);
        put_u32(&mut dex, ENDIAN_TAG_OFFSET, ENDIAN_CONSTANT);

        // Signature covers everything after itself; checksum covers the signature too.
        let signature = Sha1::digest(&dex[FILE_SIZE_OFFSET..]);
        dex[SIGNATURE_OFFSET..FILE_SIZE_OFFSET].copy_from_slice(&signature);
        let checksum = adler32_slice(&dex[SIGNATURE_OFFSET..]);
        put_u32(&mut dex, CHECKSUM_OFFSET, checksum);

        dex
    }
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apk::container::StorageMode;

    fn u32_at(data: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(data[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn test_adler32_known_value() {
        assert_eq!(adler32_slice(b"Wikipedia"), 0x11E6_0398);
        assert_eq!(adler32_slice(b""), 1);
    }

    #[test]
    fn test_header_fields() {
        let settings = CodeStubSettings::default();
        let entry = CodeStubGenerator::new(&settings).generate();
        let dex = &entry.bytes;

        assert_eq!(entry.path, "classes.dex");
        assert_eq!(entry.storage, StorageMode::Stored);
        assert_eq!(&dex[..8], &DEX_MAGIC);
        assert_eq!(dex.len(), 4096);
        assert_eq!(u32_at(dex, 32), 4096);
        assert_eq!(u32_at(dex, 36), 0x70);
        assert_eq!(u32_at(dex, 40), 0x1234_5678);
        assert_eq!(&dex[12..32], Sha1::digest(&dex[32..]).as_slice());
        assert_eq!(u32_at(dex, 8), adler32_slice(&dex[12..]));
        assert!(dex[HEADER_SIZE..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_min_size_never_below_header() {
        let settings = CodeStubSettings { min_size: 8 };
        let entry = CodeStubGenerator::new(&settings).generate();
        assert_eq!(entry.bytes.len(), HEADER_SIZE);
    }
}
