//! Minimal `resources.arsc` encoder.
//!
//! Emits a `ResTable` header followed by one UTF-8 global string pool that
//! lists the icon resource paths. No package chunk is written, so the
//! header declares a package count of zero. Every chunk size is exact and
//! every chunk ends on a 4-byte boundary, which lets chunk-walking readers
//! traverse the table without tripping over padding.

const RES_STRING_POOL_TYPE: u16 = 0x0001;
const RES_TABLE_TYPE: u16 = 0x0002;

const TABLE_HEADER_SIZE: u16 = 12;
const STRING_POOL_HEADER_SIZE: u16 = 28;

const STRING_FLAG_UTF8: u32 = 0x0000_0100;

/// Leading bytes every table starts with: type `0x0002`, header size `0x000C`.
pub const RES_TABLE_MAGIC: [u8; 4] = [0x02, 0x00, 0x0C, 0x00];

/// Longest string the two-byte length prefix can describe.
const MAX_STRING_LEN: usize = 0x7FFF;

/// Encode a resource table whose global string pool holds `strings`.
///
/// Strings longer than the pool's length prefix allows are truncated at a
/// character boundary.
pub fn encode(strings: &[String]) -> Vec<u8> {
    let pool = encode_string_pool(strings);
    let size = usize::from(TABLE_HEADER_SIZE) + pool.len();

    let mut out = Vec::with_capacity(size);
    put_u16(&mut out, RES_TABLE_TYPE);
    put_u16(&mut out, TABLE_HEADER_SIZE);
    put_u32(&mut out, size as u32);
    put_u32(&mut out, 0);
    out.extend_from_slice(&pool);
    out
}

fn encode_string_pool(strings: &[String]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(strings.len());

    for s in strings {
        let s = truncate(s);
        offsets.push(data.len() as u32);
        put_length(&mut data, s.encode_utf16().count());
        put_length(&mut data, s.len());
        data.extend_from_slice(s.as_bytes());
        data.push(0);
    }
    while data.len() % 4 != 0 {
        data.push(0);
    }

    let strings_start = u32::from(STRING_POOL_HEADER_SIZE) + 4 * strings.len() as u32;
    let size = strings_start + data.len() as u32;

    let mut out = Vec::with_capacity(size as usize);
    put_u16(&mut out, RES_STRING_POOL_TYPE);
    put_u16(&mut out, STRING_POOL_HEADER_SIZE);
    put_u32(&mut out, size);
    put_u32(&mut out, strings.len() as u32);
    put_u32(&mut out, 0); // style count
    put_u32(&mut out, STRING_FLAG_UTF8);
    put_u32(&mut out, strings_start);
    put_u32(&mut out, 0); // styles start
    for offset in offsets {
        put_u32(&mut out, offset);
    }
    out.extend_from_slice(&data);
    out
}

fn truncate(s: &str) -> &str {
    if s.len() <= MAX_STRING_LEN {
        return s;
    }
    let mut end = MAX_STRING_LEN;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// One or two byte length prefix used by UTF-8 string pools.
fn put_length(out: &mut Vec<u8>, len: usize) {
    if len > 0x7F {
        out.push(((len >> 8) as u8 & 0x7F) | 0x80);
        out.push((len & 0xFF) as u8);
    } else {
        out.push(len as u8);
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
