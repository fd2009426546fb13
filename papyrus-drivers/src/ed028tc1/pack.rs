//! 4 bpp frame packing
//!
//! The controller expects two pixels per byte, left pixel in the high
//! nibble, rows sent bottom-up. Inversion flips every packed bit.

use papyrus_core::Frame;

/// White, used to pad odd-width rows
const WHITE: u8 = 0x0F;

/// Packed size of a frame in bytes
pub fn packed_len(frame: Frame) -> usize {
    (frame.width as usize).div_ceil(2) * frame.height as usize
}

/// Pack `frame` out of a full-panel buffer with row stride `stride`
///
/// `buffer` must cover the frame and `out` must hold [`packed_len`]
/// bytes. Returns the number of bytes written.
pub fn pack_4bpp(buffer: &[u8], stride: usize, frame: Frame, invert: bool, out: &mut [u8]) -> usize {
    let x0 = frame.x as usize;
    let width = frame.width as usize;
    let mut n = 0;

    for row in (frame.y as usize..frame.y as usize + frame.height as usize).rev() {
        let line = &buffer[row * stride + x0..row * stride + x0 + width];
        for pair in line.chunks(2) {
            let hi = pair[0] & 0x0F;
            let lo = pair.get(1).map_or(WHITE, |p| p & 0x0F);
            let byte = (hi << 4) | lo;
            out[n] = if invert { !byte } else { byte };
            n += 1;
        }
    }
    n
}
