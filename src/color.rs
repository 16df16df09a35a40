//! Color-space conversion over contiguous pixel spans.
//!
//! This layer is a pure numeric transform: it never sees buffer layout,
//! only "a contiguous span of N pixels" as `rgb::Rgb<f32>` slices (a
//! buffer row, or a whole contiguous buffer).
//!
//! Every [`ColorSpace`] relates to CIE XYZ through a colorant matrix plus
//! an optional per-channel transfer function. A conversion between two
//! spaces decodes to linear, applies one fused matrix
//! (`inv(Dst::TO_XYZ) * Src::TO_XYZ`), and re-encodes. For linear spaces
//! the transfer steps are the identity and compile away.

use core::any::TypeId;

use rgb::Rgb;

use crate::matrix::Mat3;

/// Rec.709 primaries to CIE XYZ (D50-adapted colorant matrix).
const REC709_TO_XYZ: Mat3 = Mat3::new(
    0.4360747, 0.3850649, 0.1430804,
    0.2225045, 0.7168786, 0.0606169,
    0.0139322, 0.0971045, 0.7141733,
);

// ---------------------------------------------------------------------------
// sRGB transfer curve
// ---------------------------------------------------------------------------

/// Decode one sRGB-encoded channel value to linear light
/// (IEC 61966-2-1 piecewise curve).
#[inline]
pub fn srgb_to_linear(encoded: f32) -> f32 {
    if encoded < 0.04045 {
        encoded / 12.92
    } else {
        libm::powf((encoded + 0.055) / 1.055, 2.4)
    }
}

/// Encode one linear-light channel value with the sRGB transfer curve.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear < 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * libm::powf(linear, 1.0 / 2.4) - 0.055
    }
}

// ---------------------------------------------------------------------------
// Color spaces
// ---------------------------------------------------------------------------

/// A color space: a colorant matrix to CIE XYZ plus a per-channel
/// transfer function pair.
///
/// Implementors are zero-size marker types; `decode`/`encode` default to
/// the identity, which is correct for any linear space.
pub trait ColorSpace: Copy + 'static {
    /// Whether channel values are proportional to light (no transfer
    /// curve).
    const IS_LINEAR: bool;

    /// Colorant matrix taking *linear* channel values of this space to
    /// CIE XYZ.
    const TO_XYZ: Mat3;

    /// Transfer-decode one channel value to linear light.
    #[inline]
    fn decode(encoded: f32) -> f32 {
        encoded
    }

    /// Transfer-encode one linear-light channel value.
    #[inline]
    fn encode(linear: f32) -> f32 {
        linear
    }
}

/// CIE XYZ: the linear reference space all conversions route through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Xyz;

impl ColorSpace for Xyz {
    const IS_LINEAR: bool = true;
    const TO_XYZ: Mat3 = Mat3::IDENTITY;
}

/// Linear RGB with Rec.709 primaries (the linear counterpart of sRGB).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearRgb;

impl ColorSpace for LinearRgb {
    const IS_LINEAR: bool = true;
    const TO_XYZ: Mat3 = REC709_TO_XYZ;
}

/// sRGB: Rec.709 primaries with the IEC 61966-2-1 transfer curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Srgb;

impl ColorSpace for Srgb {
    const IS_LINEAR: bool = false;
    const TO_XYZ: Mat3 = REC709_TO_XYZ;

    #[inline]
    fn decode(encoded: f32) -> f32 {
        srgb_to_linear(encoded)
    }

    #[inline]
    fn encode(linear: f32) -> f32 {
        linear_to_srgb(linear)
    }
}

// ---------------------------------------------------------------------------
// Span conversion
// ---------------------------------------------------------------------------

/// Convert a span of pixels from `Src` to `Dst`, writing into `dst`.
///
/// Identical spaces degrade to a plain copy. Otherwise each pixel is
/// transfer-decoded, multiplied by the fused `Src`-to-`Dst` matrix, and
/// transfer-encoded; intermediate arithmetic runs in `f64`.
///
/// # Panics
///
/// Panics if the spans differ in length.
pub fn convert_slice<Src: ColorSpace, Dst: ColorSpace>(src: &[Rgb<f32>], dst: &mut [Rgb<f32>]) {
    assert_eq!(src.len(), dst.len(), "source and destination pixel counts differ");
    if TypeId::of::<Src>() == TypeId::of::<Dst>() {
        dst.copy_from_slice(src);
        return;
    }

    // One fused matrix covers the linear part of both ends: going through
    // XYZ explicitly would just multiply by it twice.
    let fused = Dst::TO_XYZ.inverse().mul(&Src::TO_XYZ);

    for (s, d) in src.iter().zip(dst.iter_mut()) {
        let linear = [
            Src::decode(s.r) as f64,
            Src::decode(s.g) as f64,
            Src::decode(s.b) as f64,
        ];
        let out = fused.apply(linear);
        d.r = Dst::encode(out[0] as f32);
        d.g = Dst::encode(out[1] as f32);
        d.b = Dst::encode(out[2] as f32);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    const EPSILON: f32 = 1e-4;

    fn rgb(r: f32, g: f32, b: f32) -> Rgb<f32> {
        Rgb { r, g, b }
    }

    fn assert_close(a: Rgb<f32>, b: Rgb<f32>) {
        assert!(
            (a.r - b.r).abs() < EPSILON && (a.g - b.g).abs() < EPSILON && (a.b - b.b).abs() < EPSILON,
            "{a:?} vs {b:?}"
        );
    }

    #[test]
    fn srgb_transfer_landmarks() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < EPSILON);
        // Below the linear segment cutoff the curve is a straight line.
        assert!((srgb_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-7);
        // Mid grey.
        assert!((srgb_to_linear(0.5) - 0.21404114).abs() < EPSILON);
        assert!((linear_to_srgb(0.21404114) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn srgb_transfer_roundtrip() {
        for i in 0..=100 {
            let encoded = i as f32 / 100.0;
            let linear = srgb_to_linear(encoded);
            assert!((linear_to_srgb(linear) - encoded).abs() < EPSILON);
        }
    }

    #[test]
    fn same_space_is_a_copy() {
        let src = vec![rgb(0.1, 0.2, 0.3), rgb(0.4, 0.5, 0.6)];
        let mut dst = vec![rgb(0.0, 0.0, 0.0); 2];
        convert_slice::<Srgb, Srgb>(&src, &mut dst);
        assert_eq!(src[0], dst[0]);
        assert_eq!(src[1], dst[1]);
    }

    #[test]
    fn linear_rgb_xyz_roundtrip() {
        let src: Vec<Rgb<f32>> = vec![
            rgb(0.0, 0.0, 0.0),
            rgb(1.0, 1.0, 1.0),
            rgb(0.25, 0.5, 0.75),
            rgb(0.9, 0.1, 0.4),
        ];
        let mut xyz = vec![rgb(0.0, 0.0, 0.0); src.len()];
        let mut back = vec![rgb(0.0, 0.0, 0.0); src.len()];
        convert_slice::<LinearRgb, Xyz>(&src, &mut xyz);
        convert_slice::<Xyz, LinearRgb>(&xyz, &mut back);
        for (a, b) in src.iter().zip(&back) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn linear_rgb_to_xyz_white_point() {
        // Rec.709 white (1,1,1) maps to the matrix row sums.
        let src = vec![rgb(1.0, 1.0, 1.0)];
        let mut dst = vec![rgb(0.0, 0.0, 0.0)];
        convert_slice::<LinearRgb, Xyz>(&src, &mut dst);
        assert_close(dst[0], rgb(0.96422, 1.0, 0.82521));
    }

    #[test]
    fn srgb_to_linear_rgb_applies_curve_only() {
        // Same primaries: the fused matrix is the identity, so the
        // conversion is exactly the transfer curve per channel.
        let src = vec![rgb(0.5, 0.25, 1.0)];
        let mut dst = vec![rgb(0.0, 0.0, 0.0)];
        convert_slice::<Srgb, LinearRgb>(&src, &mut dst);
        assert_close(
            dst[0],
            rgb(srgb_to_linear(0.5), srgb_to_linear(0.25), srgb_to_linear(1.0)),
        );
    }

    #[test]
    fn srgb_xyz_roundtrip() {
        let src = vec![rgb(0.8, 0.4, 0.2), rgb(0.05, 0.95, 0.5)];
        let mut xyz = vec![rgb(0.0, 0.0, 0.0); src.len()];
        let mut back = vec![rgb(0.0, 0.0, 0.0); src.len()];
        convert_slice::<Srgb, Xyz>(&src, &mut xyz);
        convert_slice::<Xyz, Srgb>(&xyz, &mut back);
        for (a, b) in src.iter().zip(&back) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn converts_buffer_rows() {
        // The layer's contract with the buffer: any contiguous pixel span
        // works, e.g. a row of a 3-channel f32 buffer viewed as pixels.
        use crate::{ImageBuf, Static};

        let mut buf = ImageBuf::<f32, Static<3>>::new(4, 1).unwrap();
        for x in 0..4 {
            buf.set_pixel(x, 0, &[0.5, 0.25, x as f32 / 4.0]);
        }
        let row: &[Rgb<f32>] = bytemuck::cast_slice(buf.row(0));
        let mut linear = vec![rgb(0.0, 0.0, 0.0); 4];
        convert_slice::<Srgb, LinearRgb>(row, &mut linear);
        assert_close(
            linear[2],
            rgb(srgb_to_linear(0.5), srgb_to_linear(0.25), srgb_to_linear(0.5)),
        );
    }
}
