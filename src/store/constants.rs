// src/store/constants.rs
// Core store format constants that never change

/// 🎞 as bytes (container magic, start of file)
pub const STORE_MAGIC: &[u8] = &[0xF0, 0x9F, 0x8E, 0x9E];

/// Container format version - immutable
pub const FORMAT_VERSION: u32 = 0x0001;

/// Fixed header size: magic (4) + version (4) + payload length (8) + SHA-256 (32)
pub const HEADER_SIZE: usize = 48;

// Well-known frame attribute keys
pub const ATTR_SUBSET: &str = "subset";
pub const ATTR_TIME: &str = "time";

// 🎞🗂️🪄
