/// Run detection for the MSA RLE scheme

use crate::format::constants::{RLE_MARKER, RLE_MIN_RUN};

/// Length of the run starting at `buffer[0]`, or 0 to emit a single literal
///
/// `max_len` is the number of bytes left in the current track. Ordinary bytes
/// only form a run when at least [`RLE_MIN_RUN`] of them repeat. The marker
/// byte is always reported as a run, even a run of one, since a bare marker
/// would be read back as the start of an escape sequence.
pub fn find_run(buffer: &[u8], max_len: usize) -> usize {
    let max_len = max_len.min(buffer.len());
    let Some(&first) = buffer.first() else {
        return 0;
    };
    if max_len == 0 {
        return 0;
    }

    if first != RLE_MARKER && max_len < 2 {
        return 0;
    }

    let run = buffer[..max_len]
        .iter()
        .take_while(|&&b| b == first)
        .count();

    if first == RLE_MARKER || run >= RLE_MIN_RUN {
        run
    } else {
        0
    }
}
