/// Body size served when none is configured.
pub const DEFAULT_BODY_SIZE: usize = 1_024;

/// Byte the response bodies are filled with.
pub const BODY_FILL: u8 = b'x';
