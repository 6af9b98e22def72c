//! Per-block capture and playback processing.
//!
//! These functions are the bodies of the two real-time callbacks. They are
//! invoked by the host once per block on a thread this crate does not own,
//! so they do no allocation, no locking of their own, and no logging; the
//! session wraps them with the shared-state plumbing.

use crate::processing::frame_buffer::{FrameBuffer, FrameCursor};

/// Value a stage callback hands back to the host after each invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// More frames remain; keep invoking the callback.
    Continue,
    /// The buffer is full (capture) or drained (playback); the host should
    /// stop the stream.
    Complete,
}

/// Split a requested block against the frames left in the traversal.
///
/// A block that meets or exceeds the remainder is the final, possibly
/// short, block: it processes exactly the remainder and completes on that
/// invocation, never a later one.
fn split_block(remaining: usize, requested: usize) -> (usize, BlockOutcome) {
    if remaining <= requested {
        (remaining, BlockOutcome::Complete)
    } else {
        (requested, BlockOutcome::Continue)
    }
}

/// Capture one block of hardware input into the buffer at the cursor.
///
/// `input` holds interleaved samples for `frames` frames when the host
/// presented any; some hosts invoke the callback before the input path has
/// warmed up, in which case `input` is `None` and the block is recorded as
/// silence. That is never an error.
pub fn capture_block(
    buffer: &mut FrameBuffer,
    cursor: &mut FrameCursor,
    input: Option<&[i16]>,
    frames: usize,
) -> BlockOutcome {
    let (to_process, outcome) = split_block(cursor.remaining(), frames);
    let dst = buffer.frames_mut(cursor.index(), to_process);

    match input {
        Some(samples) => dst.copy_from_slice(&samples[..dst.len()]),
        None => dst.fill(0),
    }

    cursor.advance(to_process);
    outcome
}

/// Emit one block from the buffer at the cursor into the hardware output.
///
/// The host always presents an output block, so there is no absent-input
/// branch. On the final short block, any tail of `output` past the frames
/// written is zero-filled explicitly: trailing silence is this function's
/// contract, not the host's.
pub fn playback_block(
    buffer: &FrameBuffer,
    cursor: &mut FrameCursor,
    output: &mut [i16],
) -> BlockOutcome {
    let frames = output.len() / buffer.channels();
    let (to_process, outcome) = split_block(cursor.remaining(), frames);
    let written = to_process * buffer.channels();

    output[..written].copy_from_slice(buffer.frames(cursor.index(), to_process));
    output[written..].fill(0);

    cursor.advance(to_process);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start_frame: usize, frames: usize, channels: usize) -> Vec<i16> {
        (start_frame * channels..(start_frame + frames) * channels)
            .map(|s| (s % 30_000) as i16)
            .collect()
    }

    /// Drive capture to completion, returning the frame count of every
    /// invocation.
    fn capture_all(capacity: usize, block: usize, channels: usize) -> (FrameBuffer, Vec<usize>) {
        let mut buffer = FrameBuffer::allocate(capacity, channels).unwrap();
        let mut cursor = FrameCursor::new(capacity);
        let mut counts = Vec::new();

        loop {
            let before = cursor.index();
            let input = ramp(before, block, channels);
            let outcome = capture_block(&mut buffer, &mut cursor, Some(&input), block);
            counts.push(cursor.index() - before);
            if outcome == BlockOutcome::Complete {
                break;
            }
        }
        (buffer, counts)
    }

    #[test]
    fn scenario_a_short_final_block() {
        let (_, counts) = capture_all(1000, 300, 2);
        assert_eq!(counts, vec![300, 300, 300, 100]);
        assert_eq!(counts.iter().sum::<usize>(), 1000);
    }

    #[test]
    fn scenario_b_single_exact_block_completes_immediately() {
        let (_, counts) = capture_all(1000, 1000, 2);
        assert_eq!(counts, vec![1000]);
    }

    #[test]
    fn invocation_count_is_ceiling_of_capacity_over_block() {
        for (capacity, block) in [(1000, 300), (1000, 1000), (1024, 512), (7, 3), (5, 8)] {
            let (_, counts) = capture_all(capacity, block, 1);
            assert_eq!(counts.len(), capacity.div_ceil(block), "C={capacity} B={block}");
            assert_eq!(counts.iter().sum::<usize>(), capacity);
        }
    }

    #[test]
    fn absent_input_records_silence() {
        let mut buffer = FrameBuffer::allocate(6, 2).unwrap();
        let mut cursor = FrameCursor::new(6);

        // Real samples first, then a warm-up gap.
        let input = ramp(0, 4, 2);
        capture_block(&mut buffer, &mut cursor, Some(&input), 4);
        capture_block(&mut buffer, &mut cursor, None, 4);

        assert_eq!(buffer.frames(0, 4), &input[..]);
        assert!(buffer.frames(4, 2).iter().all(|&s| s == 0));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn all_absent_input_leaves_buffer_all_zero() {
        let mut buffer = FrameBuffer::allocate(10, 2).unwrap();
        let mut cursor = FrameCursor::new(10);
        while capture_block(&mut buffer, &mut cursor, None, 3) == BlockOutcome::Continue {}
        assert!(buffer.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn playback_reproduces_captured_samples_in_order() {
        let (buffer, _) = capture_all(1000, 300, 2);
        let mut cursor = FrameCursor::new(buffer.capacity());
        let mut played = Vec::new();
        let mut block = vec![0i16; 300 * 2];

        loop {
            let before = cursor.index();
            let outcome = playback_block(&buffer, &mut cursor, &mut block);
            let written = (cursor.index() - before) * 2;
            played.extend_from_slice(&block[..written]);
            if outcome == BlockOutcome::Complete {
                break;
            }
        }

        assert_eq!(played, buffer.samples());
    }

    #[test]
    fn playback_zero_fills_the_short_final_block_tail() {
        let (buffer, _) = capture_all(10, 10, 2);
        let mut cursor = FrameCursor::new(10);
        cursor.advance(8);

        // Poison the block to prove the tail is overwritten, not left over.
        let mut block = vec![7i16; 6 * 2];
        let outcome = playback_block(&buffer, &mut cursor, &mut block);

        assert_eq!(outcome, BlockOutcome::Complete);
        assert_eq!(&block[..4], buffer.frames(8, 2));
        assert!(block[4..].iter().all(|&s| s == 0));
    }

    #[test]
    fn completion_never_signaled_early() {
        let mut buffer = FrameBuffer::allocate(1000, 2).unwrap();
        let mut cursor = FrameCursor::new(1000);
        let input = ramp(0, 300, 2);

        for _ in 0..3 {
            let outcome = capture_block(&mut buffer, &mut cursor, Some(&input), 300);
            assert_eq!(outcome, BlockOutcome::Continue);
        }
        assert_eq!(cursor.index(), 900);
        let outcome = capture_block(&mut buffer, &mut cursor, Some(&input), 300);
        assert_eq!(outcome, BlockOutcome::Complete);
        assert_eq!(cursor.index(), 1000);
    }
}
