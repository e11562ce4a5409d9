use image::{imageops, Rgba32FImage};
use log::debug;
use pixelcraft_application::{ApplicationError, FrameRenderer};
use pixelcraft_domain::{EffectParams, RenderedFrame, SourceImage};

// Rec.709-style luminance weights used by the saturate/hue-rotate matrices.
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

const SEPIA: Matrix3 = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

type Matrix3 = [[f32; 3]; 3];

/// CPU compositor for the fixed adjustment chain:
/// brightness, contrast, saturation, hue-rotate, blur, invert, sepia,
/// opacity — in that order, every time. Color stages work on normalized
/// `f32` channels and clamp to [0, 1] before the next stage; alpha only
/// changes in the final opacity stage.
#[derive(Debug, Default)]
pub struct CpuCompositor;

impl FrameRenderer for CpuCompositor {
    fn render(
        &self,
        source: &SourceImage,
        effects: &EffectParams,
    ) -> Result<RenderedFrame, ApplicationError> {
        effects.validate()?;

        let mut canvas = canvas_from_source(source)?;

        // Stages sitting at their identity value are skipped, which keeps
        // the no-op chain an exact byte round-trip.
        if effects.brightness != 100.0 {
            apply_brightness(&mut canvas, effects.brightness / 100.0);
        }
        if effects.contrast != 100.0 {
            apply_contrast(&mut canvas, effects.contrast / 100.0);
        }
        if effects.saturation != 100.0 {
            apply_color_matrix(&mut canvas, saturation_matrix(effects.saturation / 100.0));
        }
        let hue = effects.hue % 360.0;
        if hue != 0.0 {
            apply_color_matrix(&mut canvas, hue_rotate_matrix(hue));
        }
        if effects.blur > 0.0 {
            canvas = imageops::blur(&canvas, effects.blur);
        }
        if effects.invert != 0.0 {
            apply_invert(&mut canvas, effects.invert / 100.0);
        }
        if effects.sepia != 0.0 {
            apply_color_matrix(&mut canvas, sepia_matrix(effects.sepia / 100.0));
        }
        if effects.opacity != 100.0 {
            apply_opacity(&mut canvas, effects.opacity / 100.0);
        }

        debug!(
            "composited {}x{} frame ({} stages active)",
            source.width(),
            source.height(),
            active_stage_count(effects)
        );
        Ok(quantize(&canvas))
    }
}

fn canvas_from_source(source: &SourceImage) -> Result<Rgba32FImage, ApplicationError> {
    let data: Vec<f32> = source
        .pixels()
        .iter()
        .map(|&channel| channel as f32 / 255.0)
        .collect();
    Rgba32FImage::from_raw(source.width(), source.height(), data)
        .ok_or_else(|| ApplicationError::Io("source pixel buffer shape mismatch".to_string()))
}

fn quantize(canvas: &Rgba32FImage) -> RenderedFrame {
    let pixels = canvas
        .as_raw()
        .iter()
        .map(|&channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    RenderedFrame {
        width: canvas.width(),
        height: canvas.height(),
        pixels,
    }
}

fn active_stage_count(effects: &EffectParams) -> usize {
    pixelcraft_domain::EffectParam::ALL
        .iter()
        .filter(|param| effects.get(**param) != param.range().identity)
        .count()
}

/// Linear per-channel scale; 0 is black, 2 doubles every channel.
fn apply_brightness(canvas: &mut Rgba32FImage, factor: f32) {
    for pixel in canvas.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (*channel * factor).clamp(0.0, 1.0);
        }
    }
}

/// Slope through mid-gray: `x * c + 0.5 * (1 - c)`.
fn apply_contrast(canvas: &mut Rgba32FImage, factor: f32) {
    let intercept = 0.5 * (1.0 - factor);
    for pixel in canvas.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (*channel * factor + intercept).clamp(0.0, 1.0);
        }
    }
}

fn apply_color_matrix(canvas: &mut Rgba32FImage, matrix: Matrix3) {
    for pixel in canvas.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [
            (matrix[0][0] * r + matrix[0][1] * g + matrix[0][2] * b).clamp(0.0, 1.0),
            (matrix[1][0] * r + matrix[1][1] * g + matrix[1][2] * b).clamp(0.0, 1.0),
            (matrix[2][0] * r + matrix[2][1] * g + matrix[2][2] * b).clamp(0.0, 1.0),
            a,
        ];
    }
}

/// Blend each channel toward its complement by `amount` in [0, 1].
fn apply_invert(canvas: &mut Rgba32FImage, amount: f32) {
    for pixel in canvas.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (*channel * (1.0 - amount) + (1.0 - *channel) * amount).clamp(0.0, 1.0);
        }
    }
}

/// Global alpha, the last stage of the chain.
fn apply_opacity(canvas: &mut Rgba32FImage, factor: f32) {
    for pixel in canvas.pixels_mut() {
        pixel.0[3] = (pixel.0[3] * factor).clamp(0.0, 1.0);
    }
}

/// SVG/CSS saturate matrix; `s` of 0 is grayscale, 1 is identity.
fn saturation_matrix(s: f32) -> Matrix3 {
    [
        [
            LUMA_R + (1.0 - LUMA_R) * s,
            LUMA_G - LUMA_G * s,
            LUMA_B - LUMA_B * s,
        ],
        [
            LUMA_R - LUMA_R * s,
            LUMA_G + (1.0 - LUMA_G) * s,
            LUMA_B - LUMA_B * s,
        ],
        [
            LUMA_R - LUMA_R * s,
            LUMA_G - LUMA_G * s,
            LUMA_B + (1.0 - LUMA_B) * s,
        ],
    ]
}

/// SVG/CSS hue-rotation matrix for `degrees` already wrapped into [0, 360).
fn hue_rotate_matrix(degrees: f32) -> Matrix3 {
    let radians = degrees.to_radians();
    let cos = radians.cos();
    let sin = radians.sin();
    [
        [
            LUMA_R + cos * (1.0 - LUMA_R) - sin * LUMA_R,
            LUMA_G - cos * LUMA_G - sin * LUMA_G,
            LUMA_B - cos * LUMA_B + sin * (1.0 - LUMA_B),
        ],
        [
            LUMA_R - cos * LUMA_R + sin * 0.143,
            LUMA_G + cos * (1.0 - LUMA_G) + sin * 0.140,
            LUMA_B - cos * LUMA_B - sin * 0.283,
        ],
        [
            LUMA_R - cos * LUMA_R - sin * (1.0 - LUMA_R),
            LUMA_G - cos * LUMA_G + sin * LUMA_G,
            LUMA_B + cos * (1.0 - LUMA_B) + sin * LUMA_B,
        ],
    ]
}

/// Identity blended with the sepia tone matrix by `amount` in [0, 1].
fn sepia_matrix(amount: f32) -> Matrix3 {
    let mut matrix = [[0.0_f32; 3]; 3];
    for row in 0..3 {
        for col in 0..3 {
            let identity = if row == col { 1.0 } else { 0.0 };
            matrix[row][col] = identity * (1.0 - amount) + SEPIA[row][col] * amount;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use pixelcraft_domain::EffectParam;

    use super::*;

    fn gradient_source(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(((x + y) % 256) as u8);
                pixels.push(255);
            }
        }
        SourceImage::from_rgba8(width, height, pixels).expect("valid gradient")
    }

    fn params(edits: &[(EffectParam, f32)]) -> EffectParams {
        let mut params = EffectParams::default();
        for (param, value) in edits {
            params = params.with(*param, *value).expect("in range");
        }
        params
    }

    #[test]
    fn identity_chain_reproduces_the_source() {
        let source = gradient_source(16, 12);
        let frame = CpuCompositor
            .render(&source, &EffectParams::default())
            .expect("render");
        assert_eq!(frame.width, 16);
        assert_eq!(frame.height, 12);
        assert_eq!(frame.pixels, source.pixels());
    }

    #[test]
    fn render_is_deterministic() {
        let source = gradient_source(20, 20);
        let effects = params(&[
            (EffectParam::Brightness, 150.0),
            (EffectParam::Contrast, 120.0),
            (EffectParam::Saturation, 80.0),
            (EffectParam::Hue, 45.0),
            (EffectParam::Blur, 2.0),
            (EffectParam::Opacity, 90.0),
            (EffectParam::Sepia, 30.0),
        ]);
        let first = CpuCompositor.render(&source, &effects).expect("render");
        let second = CpuCompositor.render(&source, &effects).expect("render");
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn render_does_not_mutate_the_source() {
        let source = gradient_source(10, 10);
        let before = source.pixels().to_vec();
        let effects = params(&[(EffectParam::Invert, 100.0), (EffectParam::Blur, 3.0)]);
        CpuCompositor.render(&source, &effects).expect("render");
        assert_eq!(source.pixels(), &before[..]);
    }

    #[test]
    fn zero_brightness_is_black() {
        let source = gradient_source(8, 8);
        let frame = CpuCompositor
            .render(&source, &params(&[(EffectParam::Brightness, 0.0)]))
            .expect("render");
        for rgba in frame.pixels.chunks_exact(4) {
            assert_eq!(&rgba[..3], &[0, 0, 0]);
            assert_eq!(rgba[3], 255);
        }
    }

    #[test]
    fn zero_saturation_is_grayscale() {
        let source = gradient_source(8, 8);
        let frame = CpuCompositor
            .render(&source, &params(&[(EffectParam::Saturation, 0.0)]))
            .expect("render");
        for rgba in frame.pixels.chunks_exact(4) {
            assert!(rgba[0].abs_diff(rgba[1]) <= 1, "not gray: {rgba:?}");
            assert!(rgba[1].abs_diff(rgba[2]) <= 1, "not gray: {rgba:?}");
        }
    }

    #[test]
    fn full_invert_complements_every_channel() {
        let source = gradient_source(8, 8);
        let frame = CpuCompositor
            .render(&source, &params(&[(EffectParam::Invert, 100.0)]))
            .expect("render");
        for (rgba, original) in frame
            .pixels
            .chunks_exact(4)
            .zip(source.pixels().chunks_exact(4))
        {
            assert_eq!(rgba[0], 255 - original[0]);
            assert_eq!(rgba[1], 255 - original[1]);
            assert_eq!(rgba[2], 255 - original[2]);
            assert_eq!(rgba[3], original[3]);
        }
    }

    #[test]
    fn opacity_zero_is_fully_transparent_regardless_of_other_stages() {
        let source = gradient_source(12, 12);
        let effects = params(&[
            (EffectParam::Brightness, 180.0),
            (EffectParam::Hue, 200.0),
            (EffectParam::Blur, 4.0),
            (EffectParam::Sepia, 60.0),
            (EffectParam::Opacity, 0.0),
        ]);
        let frame = CpuCompositor.render(&source, &effects).expect("render");
        for rgba in frame.pixels.chunks_exact(4) {
            assert_eq!(rgba[3], 0);
        }
    }

    #[test]
    fn hue_wraps_at_full_turn() {
        let source = gradient_source(8, 8);
        let at_zero = CpuCompositor
            .render(&source, &EffectParams::default())
            .expect("render");
        let at_full_turn = CpuCompositor
            .render(&source, &params(&[(EffectParam::Hue, 360.0)]))
            .expect("render");
        assert_eq!(at_zero.pixels, at_full_turn.pixels);
    }

    #[test]
    fn hue_then_blur_differs_from_blur_then_hue_at_edges() {
        // Hard vertical edge between saturated red and green: the hue matrix
        // clamps those colors, so the order against blur is observable.
        let width = 16_u32;
        let height = 8_u32;
        let mut pixels = Vec::new();
        for _y in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 255, 0, 255]);
                }
            }
        }
        let source = SourceImage::from_rgba8(width, height, pixels).expect("valid");

        let mut hue_first = canvas_from_source(&source).expect("canvas");
        apply_color_matrix(&mut hue_first, hue_rotate_matrix(90.0));
        let hue_first = imageops::blur(&hue_first, 5.0);

        let mut blur_first = imageops::blur(&canvas_from_source(&source).expect("canvas"), 5.0);
        apply_color_matrix(&mut blur_first, hue_rotate_matrix(90.0));

        assert_ne!(quantize(&hue_first).pixels, quantize(&blur_first).pixels);
    }

    #[test]
    fn chain_order_matches_hue_before_blur() {
        // The public chain must agree with hue-rotate applied before blur.
        let width = 16_u32;
        let height = 8_u32;
        let mut pixels = Vec::new();
        for _y in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 255, 0, 255]);
                }
            }
        }
        let source = SourceImage::from_rgba8(width, height, pixels).expect("valid");

        let chained = CpuCompositor
            .render(
                &source,
                &params(&[(EffectParam::Hue, 90.0), (EffectParam::Blur, 5.0)]),
            )
            .expect("render");

        let mut manual = canvas_from_source(&source).expect("canvas");
        apply_color_matrix(&mut manual, hue_rotate_matrix(90.0));
        let manual = imageops::blur(&manual, 5.0);

        assert_eq!(chained.pixels, quantize(&manual).pixels);
    }

    #[test]
    fn saturation_matrix_is_identity_at_one() {
        let matrix = saturation_matrix(1.0);
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert!((matrix[row][col] - expected).abs() < 1e-6);
            }
        }
    }
}
