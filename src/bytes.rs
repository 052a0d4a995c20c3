//! Byte-level primitives used by the byte-string key ops.
//!
//! Slice-based versions of the classic `mem*`/`str*` helpers. Lengths are
//! carried by the slices, so nothing here can read past the end of a
//! buffer; a too-short destination panics like any out-of-bounds index.

use core::cmp::Ordering;
use core::ops::Range;

/// Copy all of `src` into the front of `dst`. Returns the number of bytes
/// copied. `dst` and `src` cannot overlap (the borrow checker sees to it).
pub fn copy(dst: &mut [u8], src: &[u8]) -> usize {
    dst[..src.len()].copy_from_slice(src);
    src.len()
}

/// Lexicographically compare the first `n` bytes of `a` and `b`.
///
/// If either slice is shorter than `n`, only the common prefix is
/// compared and the shorter slice orders first when that prefix is equal.
pub fn compare(a: &[u8], b: &[u8], n: usize) -> Ordering {
    let a = &a[..n.min(a.len())];
    let b = &b[..n.min(b.len())];
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Number of bytes before the first nul, or the full slice length when
/// there is no terminator.
pub fn length(s: &[u8]) -> usize {
    scan(s, 0, s.len()).unwrap_or(s.len())
}

/// Index of the first `c` within the first `n` bytes of `s`.
pub fn scan(s: &[u8], c: u8, n: usize) -> Option<usize> {
    s[..n.min(s.len())].iter().position(|&b| b == c)
}

/// Copy `src` to `dest` inside `buf`; the ranges may overlap.
pub fn move_within(buf: &mut [u8], src: Range<usize>, dest: usize) {
    buf.copy_within(src, dest);
}

/// Set every byte of `buf` to `c`.
pub fn fill(buf: &mut [u8], c: u8) {
    buf.fill(c);
}

/// Equality of two nul-terminated strings, terminator included.
pub fn cstr_eq(a: &[u8], b: &[u8]) -> bool {
    let la = length(a);
    if la != length(b) {
        return false;
    }
    compare(a, b, la) == Ordering::Equal
}
