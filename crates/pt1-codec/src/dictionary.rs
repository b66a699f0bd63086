//! Preset 4096-byte LZSS window.
//!
//! Both directions of the token stream start from the same seed content and the same
//! cursor, and write every literal into the window at the cursor. Data that has been
//! produced overwrites the seed in place.

/// Window length in bytes.
pub const WINDOW_SIZE: usize = 0x1000;

/// Mask applied to every window position.
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Cursor position at the start of every session.
pub const INITIAL_CURSOR: usize = 0xFEE;

const REPEATED_RUN: usize = 13;
const ZERO_RUN: usize = 0x80;
const SPACE_RUN: usize = 0x6E;

/// Build the seed content of the window.
///
/// Layout: every byte value repeated 13 times, one ascending ramp, one descending ramp,
/// 128 zeros, 110 spaces, and 18 trailing zeros under the initial cursor.
pub fn seed_window() -> [u8; WINDOW_SIZE] {
    let mut window = [0u8; WINDOW_SIZE];
    let mut fill = 0usize;

    for value in 0..=u8::MAX {
        window[fill..fill + REPEATED_RUN].fill(value);
        fill += REPEATED_RUN;
    }
    for value in 0..=u8::MAX {
        window[fill] = value;
        fill += 1;
    }
    for value in (0..=u8::MAX).rev() {
        window[fill] = value;
        fill += 1;
    }
    fill += ZERO_RUN;
    window[fill..fill + SPACE_RUN].fill(b' ');
    fill += SPACE_RUN;

    debug_assert_eq!(fill, INITIAL_CURSOR);
    window
}

/// The window plus its write cursor, owned by one encode or decode session.
#[derive(Clone)]
pub struct Dictionary {
    window: Box<[u8; WINDOW_SIZE]>,
    cursor: usize,
}

impl Dictionary {
    /// A freshly seeded window with the cursor at [`INITIAL_CURSOR`].
    pub fn new() -> Self {
        Self {
            window: Box::new(seed_window()),
            cursor: INITIAL_CURSOR,
        }
    }

    /// Write a byte at the cursor and advance, wrapping at the window end.
    pub fn push(&mut self, byte: u8) {
        self.window[self.cursor] = byte;
        self.cursor = (self.cursor + 1) & WINDOW_MASK;
    }

    /// Byte at an arbitrary window position (taken modulo the window size).
    pub fn byte_at(&self, position: usize) -> u8 {
        self.window[position & WINDOW_MASK]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn as_bytes(&self) -> &[u8; WINDOW_SIZE] {
        &self.window
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
