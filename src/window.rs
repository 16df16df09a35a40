//! Borrowed window views into pixel buffers.
//!
//! A window is a rectangular sub-region of an [`ImageBuf`] that references
//! the parent's storage without owning any of it: the borrow checker keeps
//! a window from outliving its parent, and the window types have no way to
//! free or reallocate storage, so the single-owner rule cannot be broken
//! from a view. Windows keep the parent's `row_stride` unconditionally —
//! their rows are only contiguous with each other when the window spans
//! the full parent width of an unpadded parent.
//!
//! [`ImageWindow`] is read-only and `Copy`; [`ImageWindowMut`] borrows the
//! parent exclusively and allows writes. `From` impls build windows over
//! [`imgref`] images with typed [`rgb`] pixels, zero-copy.

use core::fmt;

use bytemuck::Pod;
use imgref::{ImgRef, ImgRefMut};
use rgb::{Gray, Rgb, Rgba};

use crate::buffer::{strided_eq, BufferError, ImageBuf};
use crate::channels::{ChannelCount, Static};

// ---------------------------------------------------------------------------
// ImageWindow (borrowed, read-only)
// ---------------------------------------------------------------------------

/// Read-only view of a rectangular region of a pixel buffer.
///
/// The data slice runs from the window origin to the last element of the
/// window's final row; in-between rows include the parent's stride gap,
/// which accessors never expose.
#[derive(Clone, Copy)]
pub struct ImageWindow<'a, T, C: ChannelCount> {
    data: &'a [T],
    width: u32,
    height: u32,
    row_stride: usize,
    channels: C,
}

impl<'a, T: Pod, C: ChannelCount> ImageWindow<'a, T, C> {
    pub(crate) fn from_raw_parts(
        data: &'a [T],
        width: u32,
        height: u32,
        row_stride: usize,
        channels: C,
    ) -> Self {
        debug_assert_eq!(data.len(), span_len(width, height, row_stride, channels.count()));
        Self {
            data,
            width,
            height,
            row_stride,
            channels,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels per pixel (always the parent's count).
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels.count() as u32
    }

    /// Elements between starts of consecutive rows (always the parent's
    /// stride).
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Whether the window's rows abut with no gap.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.row_stride == self.row_elems()
    }

    /// Whether `(x, y)` addresses a pixel of the window.
    #[inline]
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Whether `(x, y, c)` addresses a value of the window.
    #[inline]
    pub fn in_bounds_channel(&self, x: u32, y: u32, c: u32) -> bool {
        self.in_bounds(x, y) && c < self.channels()
    }

    #[inline]
    fn row_elems(&self) -> usize {
        self.width as usize * self.channels.count()
    }

    #[inline]
    fn index_of(&self, x: u32, y: u32, c: u32) -> usize {
        y as usize * self.row_stride + x as usize * self.channels.count() + c as usize
    }

    /// Read one value, in window coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y, c)` is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u32) -> T {
        assert!(
            self.in_bounds_channel(x, y, c),
            "value ({x},{y},{c}) out of bounds ({}x{}, {} channels)",
            self.width,
            self.height,
            self.channels()
        );
        self.data[self.index_of(x, y, c)]
    }

    /// Read one value, or `None` out of bounds.
    #[inline]
    pub fn try_get(&self, x: u32, y: u32, c: u32) -> Option<T> {
        self.in_bounds_channel(x, y, c)
            .then(|| self.data[self.index_of(x, y, c)])
    }

    /// All channels of one pixel, contiguous.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        assert!(
            self.in_bounds(x, y),
            "pixel ({x},{y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        let start = self.index_of(x, y, 0);
        &self.data[start..start + self.channels.count()]
    }

    /// One row, exactly `width * channels` elements.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        assert!(y < self.height, "row {y} out of bounds (height: {})", self.height);
        let start = y as usize * self.row_stride;
        &self.data[start..start + self.row_elems()]
    }

    /// Borrow a sub-rectangle of this window, in window coordinates.
    ///
    /// Returns `None` when the rectangle is empty or not fully in bounds.
    pub fn window(&self, x: u32, y: u32, width: u32, height: u32) -> Option<ImageWindow<'_, T, C>> {
        let (start, end) = sub_span(
            self.width,
            self.height,
            self.row_stride,
            self.channels.count(),
            x,
            y,
            width,
            height,
        )?;
        Some(ImageWindow {
            data: &self.data[start..end],
            width,
            height,
            row_stride: self.row_stride,
            channels: self.channels,
        })
    }

    /// Reallocate `dest` to this window's dimensions and copy the pixels
    /// over, row by row (one block when both sides are contiguous).
    ///
    /// # Errors
    ///
    /// [`BufferError::ChannelMismatch`] when `dest` has a static channel
    /// policy with a different count; `dest` is left untouched.
    pub fn copy_into<D: ChannelCount>(&self, dest: &mut ImageBuf<T, D>) -> Result<(), BufferError> {
        dest.allocate(self.width, self.height, self.channels())?;

        if cfg!(feature = "scalar") {
            for y in 0..self.height {
                for x in 0..self.width {
                    for c in 0..self.channels() {
                        dest.set(x, y, c, self.get(x, y, c));
                    }
                }
            }
        } else if self.is_contiguous() && dest.is_contiguous() {
            dest.as_mut_slice().copy_from_slice(self.data);
        } else {
            for y in 0..self.height {
                dest.row_mut(y).copy_from_slice(self.row(y));
            }
        }
        Ok(())
    }
}

impl<T: Pod, C: ChannelCount> fmt::Debug for ImageWindow<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImageWindow({}x{}, {} channels)",
            self.width,
            self.height,
            self.channels()
        )
    }
}

// ---------------------------------------------------------------------------
// ImageWindowMut (borrowed, mutable)
// ---------------------------------------------------------------------------

/// Mutable view of a rectangular region of a pixel buffer.
///
/// Holds the parent exclusively borrowed for its lifetime, so parent and
/// window can never be mutated concurrently.
pub struct ImageWindowMut<'a, T, C: ChannelCount> {
    data: &'a mut [T],
    width: u32,
    height: u32,
    row_stride: usize,
    channels: C,
}

impl<'a, T: Pod, C: ChannelCount> ImageWindowMut<'a, T, C> {
    pub(crate) fn from_raw_parts(
        data: &'a mut [T],
        width: u32,
        height: u32,
        row_stride: usize,
        channels: C,
    ) -> Self {
        debug_assert_eq!(data.len(), span_len(width, height, row_stride, channels.count()));
        Self {
            data,
            width,
            height,
            row_stride,
            channels,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels per pixel (always the parent's count).
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels.count() as u32
    }

    /// Elements between starts of consecutive rows (always the parent's
    /// stride).
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Whether the window's rows abut with no gap.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.row_stride == self.row_elems()
    }

    /// Whether `(x, y, c)` addresses a value of the window.
    #[inline]
    pub fn in_bounds_channel(&self, x: u32, y: u32, c: u32) -> bool {
        x < self.width && y < self.height && c < self.channels()
    }

    #[inline]
    fn row_elems(&self) -> usize {
        self.width as usize * self.channels.count()
    }

    #[inline]
    fn index_of(&self, x: u32, y: u32, c: u32) -> usize {
        y as usize * self.row_stride + x as usize * self.channels.count() + c as usize
    }

    /// The same region as a read-only [`ImageWindow`].
    #[inline]
    pub fn as_window(&self) -> ImageWindow<'_, T, C> {
        ImageWindow {
            data: &*self.data,
            width: self.width,
            height: self.height,
            row_stride: self.row_stride,
            channels: self.channels,
        }
    }

    /// Read one value, in window coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y, c)` is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u32) -> T {
        assert!(
            self.in_bounds_channel(x, y, c),
            "value ({x},{y},{c}) out of bounds ({}x{}, {} channels)",
            self.width,
            self.height,
            self.channels()
        );
        self.data[self.index_of(x, y, c)]
    }

    /// Write one value, in window coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y, c)` is out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, c: u32, value: T) {
        assert!(
            self.in_bounds_channel(x, y, c),
            "value ({x},{y},{c}) out of bounds ({}x{}, {} channels)",
            self.width,
            self.height,
            self.channels()
        );
        let index = self.index_of(x, y, c);
        self.data[index] = value;
    }

    /// All channels of one pixel, mutable.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [T] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        let start = self.index_of(x, y, 0);
        let count = self.channels.count();
        &mut self.data[start..start + count]
    }

    /// Overwrite all channels of one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds or `values` is not exactly
    /// `channels` long.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, values: &[T]) {
        let count = self.channels.count();
        assert_eq!(values.len(), count, "expected {count} channel values");
        self.pixel_mut(x, y).copy_from_slice(values);
    }

    /// One row, exactly `width * channels` elements.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        assert!(y < self.height, "row {y} out of bounds (height: {})", self.height);
        let start = y as usize * self.row_stride;
        &self.data[start..start + self.row_elems()]
    }

    /// One mutable row, exactly `width * channels` elements.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds (height: {})", self.height);
        let start = y as usize * self.row_stride;
        let len = self.row_elems();
        &mut self.data[start..start + len]
    }

    /// Set every value of every pixel in the window to `value`, without
    /// touching the stride gap between rows (which belongs to the parent).
    pub fn fill(&mut self, value: T) {
        for y in 0..self.height {
            self.row_mut(y).fill(value);
        }
    }

    /// Borrow a mutable sub-rectangle of this window, in window
    /// coordinates.
    ///
    /// Returns `None` when the rectangle is empty or not fully in bounds.
    pub fn window_mut(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Option<ImageWindowMut<'_, T, C>> {
        let (start, end) = sub_span(
            self.width,
            self.height,
            self.row_stride,
            self.channels.count(),
            x,
            y,
            width,
            height,
        )?;
        Some(ImageWindowMut {
            data: &mut self.data[start..end],
            width,
            height,
            row_stride: self.row_stride,
            channels: self.channels,
        })
    }
}

impl<T: Pod, C: ChannelCount> fmt::Debug for ImageWindowMut<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImageWindowMut({}x{}, {} channels)",
            self.width,
            self.height,
            self.channels()
        )
    }
}

// ---------------------------------------------------------------------------
// Span arithmetic
// ---------------------------------------------------------------------------

/// Length of a window's data slice: origin to the end of the last row's
/// pixels.
fn span_len(width: u32, height: u32, row_stride: usize, channels: usize) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        (height as usize - 1) * row_stride + width as usize * channels
    }
}

/// Element range of a sub-rectangle inside a window, or `None` when out of
/// bounds or empty.
#[allow(clippy::too_many_arguments)]
fn sub_span(
    parent_width: u32,
    parent_height: u32,
    row_stride: usize,
    channels: usize,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Option<(usize, usize)> {
    if width == 0 || height == 0 {
        return None;
    }
    if x.checked_add(width)? > parent_width || y.checked_add(height)? > parent_height {
        return None;
    }
    let start = y as usize * row_stride + x as usize * channels;
    let end =
        (y as usize + height as usize - 1) * row_stride + (x as usize + width as usize) * channels;
    Some((start, end))
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

impl<T: Pod, A: ChannelCount, B: ChannelCount> PartialEq<ImageWindow<'_, T, B>>
    for ImageWindow<'_, T, A>
{
    fn eq(&self, other: &ImageWindow<'_, T, B>) -> bool {
        if self.width != other.width
            || self.height != other.height
            || self.channels() != other.channels()
        {
            return false;
        }
        strided_eq(
            self.data,
            self.row_stride,
            other.data,
            other.row_stride,
            self.row_elems(),
            self.height as usize,
        )
    }
}

impl<T: Pod, A: ChannelCount, B: ChannelCount> PartialEq<ImageBuf<T, B>> for ImageWindow<'_, T, A> {
    fn eq(&self, other: &ImageBuf<T, B>) -> bool {
        if self.width != other.width()
            || self.height != other.height()
            || self.channels() != other.channels()
        {
            return false;
        }
        strided_eq(
            self.data,
            self.row_stride,
            other.as_slice(),
            other.row_stride(),
            self.row_elems(),
            self.height as usize,
        )
    }
}

impl<T: Pod, A: ChannelCount, B: ChannelCount> PartialEq<ImageWindow<'_, T, B>> for ImageBuf<T, A> {
    fn eq(&self, other: &ImageWindow<'_, T, B>) -> bool {
        other == self
    }
}

// ---------------------------------------------------------------------------
// imgref interop (zero-copy From impls)
// ---------------------------------------------------------------------------

macro_rules! impl_from_imgref {
    ($pixel:ident, $channels:expr) => {
        impl<'a, T: Pod> From<ImgRef<'a, $pixel<T>>> for ImageWindow<'a, T, Static<$channels>> {
            fn from(img: ImgRef<'a, $pixel<T>>) -> Self {
                let width = img.width() as u32;
                let height = img.height() as u32;
                let row_stride = img.stride() * $channels;
                let flat: &[T] = bytemuck::cast_slice(img.into_buf());
                let len = span_len(width, height, row_stride, $channels);
                ImageWindow {
                    data: &flat[..len],
                    width,
                    height,
                    row_stride,
                    channels: Static,
                }
            }
        }

        impl<'a, T: Pod> From<ImgRefMut<'a, $pixel<T>>>
            for ImageWindowMut<'a, T, Static<$channels>>
        {
            fn from(img: ImgRefMut<'a, $pixel<T>>) -> Self {
                let width = img.width() as u32;
                let height = img.height() as u32;
                let row_stride = img.stride() * $channels;
                let flat: &mut [T] = bytemuck::cast_slice_mut(img.into_buf());
                let len = span_len(width, height, row_stride, $channels);
                ImageWindowMut {
                    data: &mut flat[..len],
                    width,
                    height,
                    row_stride,
                    channels: Static,
                }
            }
        }
    };
}

impl_from_imgref!(Gray, 1);
impl_from_imgref!(Rgb, 3);
impl_from_imgref!(Rgba, 4);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
