//! Aligned, strided multi-channel pixel buffers for zen* image codecs.
//!
//! The core is [`ImageBuf`]: a `width × height × channels` grid of
//! primitive values in one 128-byte-aligned allocation with zeroed row
//! padding, plus zero-copy [`ImageWindow`]/[`ImageWindowMut`] views into
//! sub-rectangles and bulk operations (fill, copy, equality) that take a
//! single-block fast path whenever contiguity allows it.
//!
//! - [`ImageBuf`] / [`ImageWindow`] / [`ImageWindowMut`] — the buffer and
//!   its borrowed views
//! - [`Static`] / [`Dynamic`] — compile-time vs. runtime channel count,
//!   one buffer implementation for both
//! - [`alloc_aligned`] / [`AlignedBuf`] — over-aligned allocation with
//!   header-before-pointer bookkeeping
//! - [`fill_pattern`] — repeating-pattern byte fills
//! - [`Mat3`] / [`convert_slice`] — color-space transforms over pixel
//!   spans, independent of buffer layout
//!
//! ```
//! use zenstride::ImageBuf;
//!
//! let mut img = ImageBuf::<u8>::new(2, 2, 3)?;
//! img.set_pixel(0, 0, &[12, 13, 14]);
//!
//! let mut copy = ImageBuf::<u8>::default();
//! img.copy_into(&mut copy)?;
//! assert_eq!(copy.get(0, 0, 0), 12);
//! assert_eq!(img, copy);
//!
//! let window = img.window(0, 0, 1, 1).unwrap();
//! assert_eq!(window.pixel(0, 0), &[12, 13, 14]);
//! # Ok::<(), zenstride::BufferError>(())
//! ```
//!
//! The buffer does no internal synchronization: share it across threads
//! read-only, or keep one owner per thread. Windows borrow the parent, so
//! the compiler already rules out parent/window write races.

#![no_std]

extern crate alloc;

mod aligned;
mod buffer;
mod channels;
mod color;
mod fill;
mod matrix;
mod window;

pub use aligned::{alloc_aligned, free_aligned, is_ptr_aligned, AlignedBuf, AllocError};
pub use buffer::{
    dimensions_match, BufferError, ImageBuf, BUF_BYTE_ALIGNMENT, ROW_BYTE_ALIGNMENT,
};
pub use channels::{ChannelCount, Dynamic, Static};
pub use color::{
    convert_slice, linear_to_srgb, srgb_to_linear, ColorSpace, LinearRgb, Srgb, Xyz,
};
pub use fill::{fill_pattern, fill_pattern_doubling, fill_pattern_naive, fill_pattern_simple};
pub use matrix::Mat3;
pub use window::{ImageWindow, ImageWindowMut};

// Re-exports for buffer producers and consumers.
pub use imgref::{Img, ImgRef, ImgRefMut, ImgVec};
pub use rgb;
pub use rgb::{Gray, Rgb, Rgba};
