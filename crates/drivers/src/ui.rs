use std::time::Instant;

use font8x8::UnicodeFonts;
use log::info;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use pixelcraft_application::{
    EditorService, EffectParamsQuery, ExportImageCommand, RenderPreviewCommand,
    ResetEffectsCommand, SetEffectCommand,
};
use pixelcraft_domain::{EffectParam, EffectParams, RenderedFrame};

use crate::config::AppConfig;

const WINDOW_WIDTH: usize = 1120;
const WINDOW_HEIGHT: usize = 700;
const CANVAS_MARGIN: usize = 24;
const HEADER_TOP: usize = 20;
const HEADER_HEIGHT: usize = 56;
const WORKAREA_TOP: usize = 94;
const WORKAREA_BOTTOM_MARGIN: usize = 28;
const SPLIT_GUTTER: usize = 24;
const CONTROL_PANEL_WIDTH: usize = 300;
const CONTROL_INSET: usize = 18;
const SLIDER_HEIGHT: usize = 44;
const SLIDER_GAP: usize = 10;
const STAGE_BACKGROUND: f32 = 16.0;

#[derive(Debug, Clone, Copy)]
struct SliderSpec {
    param: EffectParam,
    top: usize,
    color: u32,
}

#[derive(Debug, Clone)]
struct PreviewCanvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

/// Interactive editor window. Every accepted slider change re-renders the
/// full frame synchronously on this thread before the next window update;
/// the minifb frame pump is what coalesces rapid drags into one render per
/// displayed frame.
pub fn launch_window(
    service: &mut EditorService,
    image_path: &str,
    config: &AppConfig,
) -> Result<(), String> {
    let width = WINDOW_WIDTH;
    let height = WINDOW_HEIGHT;
    let sliders = slider_specs();

    let mut window = Window::new(
        &format!("pixelcraft | {image_path}"),
        width,
        height,
        WindowOptions::default(),
    )
    .map_err(|error| format!("failed to start UI window: {error}"))?;
    window.limit_update_rate(Some(std::time::Duration::from_micros(16_000)));

    let mut buffer = vec![0x222222_u32; width * height];
    let mut active_drag: Option<EffectParam> = None;
    let mut was_mouse_down = false;
    let mut last_render_ms = 0_u64;
    let mut last_export: Option<String> = None;

    let mut preview = rerender(service, width, height, &mut last_render_ms)?;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut frame_dirty = false;

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            service.reset_effects(ResetEffectsCommand);
            frame_dirty = true;
        }
        if window.is_key_pressed(Key::E, KeyRepeat::No) {
            let target = export_current(service, config)?;
            info!("saved export to {target}");
            last_export = Some(target);
        }

        let mouse_down = window.get_mouse_down(MouseButton::Left);
        let mouse_pos = window.get_mouse_pos(MouseMode::Clamp);
        let hovered_slider = mouse_pos
            .and_then(|(mouse_x, mouse_y)| slider_at_position(mouse_x, mouse_y, &sliders, width));

        if mouse_down {
            if !was_mouse_down {
                active_drag = hovered_slider;
            }
            if let (Some(param), Some((mouse_x, _))) = (active_drag, mouse_pos) {
                let value = x_to_value(mouse_x, width, param);
                let current = service.effect_params(EffectParamsQuery).get(param);
                if (current - value).abs() > f32::EPSILON
                    && service
                        .set_effect(SetEffectCommand { param, value })
                        .is_ok()
                {
                    frame_dirty = true;
                }
            }
        } else {
            active_drag = None;
        }
        was_mouse_down = mouse_down;

        if frame_dirty {
            preview = rerender(service, width, height, &mut last_render_ms)?;
        }

        let params = service.effect_params(EffectParamsQuery);
        draw_background(&mut buffer, width, height);
        draw_header(&mut buffer, width);
        draw_preview_panel(&mut buffer, width, height, &preview);
        draw_control_panel(&mut buffer, width, height);
        draw_sliders(&mut buffer, width, &sliders, params);
        if let Some(hovered) = active_drag.or(hovered_slider) {
            draw_slider_hover(&mut buffer, width, hovered, &sliders);
        }

        window.set_title(&build_window_title(
            image_path,
            params,
            last_render_ms,
            active_drag.or(hovered_slider),
            last_export.as_deref(),
        ));
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|error| format!("failed to update UI window: {error}"))?;
    }

    Ok(())
}

fn rerender(
    service: &EditorService,
    window_width: usize,
    window_height: usize,
    last_render_ms: &mut u64,
) -> Result<PreviewCanvas, String> {
    let started = Instant::now();
    let frame = service
        .render_preview(RenderPreviewCommand)
        .map_err(|error| format!("render failed: {error}"))?;
    *last_render_ms = started.elapsed().as_millis() as u64;
    Ok(preview_canvas_from_frame(&frame, window_width, window_height))
}

fn export_current(service: &EditorService, config: &AppConfig) -> Result<String, String> {
    let artifact = service
        .export_image(ExportImageCommand)
        .map_err(|error| format!("export failed: {error}"))?;
    std::fs::create_dir_all(&config.export_dir)
        .map_err(|error| format!("cannot create export dir: {error}"))?;
    let target = format!("{}/{}", config.export_dir, artifact.file_name);
    std::fs::write(&target, &artifact.bytes)
        .map_err(|error| format!("cannot write {target}: {error}"))?;
    Ok(target)
}

/// Scales the native-resolution frame down to fit the stage with nearest
/// sampling. Display-only; exports always come from the full-size frame.
fn preview_canvas_from_frame(
    frame: &RenderedFrame,
    window_width: usize,
    window_height: usize,
) -> PreviewCanvas {
    let src_width = frame.width as usize;
    let src_height = frame.height as usize;
    if src_width == 0 || src_height == 0 || frame.pixels.is_empty() {
        return PreviewCanvas {
            width: 1,
            height: 1,
            pixels: vec![0_u32],
        };
    }

    let panel_left = preview_panel_left();
    let panel_right = preview_panel_right(window_width);
    let panel_top = preview_panel_top();
    let panel_bottom = preview_panel_bottom(window_height);
    let max_width = panel_right.saturating_sub(panel_left + 26).max(1);
    let max_height = panel_bottom.saturating_sub(panel_top + 26).max(1);

    let scale = (max_width as f32 / src_width as f32)
        .min(max_height as f32 / src_height as f32)
        .min(1.0);
    let dst_width = ((src_width as f32 * scale).max(1.0)).round() as usize;
    let dst_height = ((src_height as f32 * scale).max(1.0)).round() as usize;

    let mut pixels = vec![0_u32; dst_width * dst_height];
    for y in 0..dst_height {
        let src_y = y * src_height / dst_height;
        for x in 0..dst_width {
            let src_x = x * src_width / dst_width;
            let offset = (src_y * src_width + src_x) * 4;
            pixels[y * dst_width + x] = compose_over_stage(
                frame.pixels[offset],
                frame.pixels[offset + 1],
                frame.pixels[offset + 2],
                frame.pixels[offset + 3],
            );
        }
    }

    PreviewCanvas {
        width: dst_width,
        height: dst_height,
        pixels,
    }
}

/// Alpha-composites one frame pixel over the dark stage so the opacity
/// slider is visible in the preview.
fn compose_over_stage(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let alpha = a as f32 / 255.0;
    let blend = |channel: u8| -> u32 {
        (channel as f32 * alpha + STAGE_BACKGROUND * (1.0 - alpha)).round() as u32
    };
    (blend(r) << 16) | (blend(g) << 8) | blend(b)
}

fn slider_specs() -> [SliderSpec; 8] {
    let start = control_panel_top() + 96;
    let stride = SLIDER_HEIGHT + SLIDER_GAP;
    let colors = [
        0xFF996C, 0x9CD8BE, 0xFFD58F, 0x8A95D8, 0xD8E2F0, 0xBEA6E8, 0xF0B7C8, 0xA8D4A0,
    ];
    let mut specs = [SliderSpec {
        param: EffectParam::Brightness,
        top: start,
        color: colors[0],
    }; 8];
    for (index, param) in EffectParam::ALL.into_iter().enumerate() {
        specs[index] = SliderSpec {
            param,
            top: start + stride * index,
            color: colors[index],
        };
    }
    specs
}

fn draw_sliders(buffer: &mut [u32], width: usize, sliders: &[SliderSpec], params: EffectParams) {
    for slider in sliders {
        draw_slider_shell(buffer, width, slider.top);
        let value = params.get(slider.param);
        let x = value_to_x(value, width, slider.param);
        draw_slider_track(buffer, width, slider.top, x, slider.param, slider.color);
        draw_slider_knob(buffer, width, x, slider.top, slider.color);
        let label = format!("{} {:.1}", slider.param.name().to_uppercase(), value);
        draw_text(buffer, width, slider_left(width) + 8, slider.top + 5, &label, 0x4A3E2E);
    }
}

fn draw_slider_shell(buffer: &mut [u32], width: usize, top: usize) {
    let left = slider_left(width);
    let right = slider_right(width);
    fill_rect(
        buffer,
        width,
        left,
        top,
        right.saturating_sub(left).saturating_add(1),
        SLIDER_HEIGHT,
        0xFAF6EE,
    );
    draw_rect(
        buffer,
        width,
        left,
        top,
        right.saturating_sub(left).saturating_add(1),
        SLIDER_HEIGHT,
        0xD8C7AD,
    );
}

fn draw_slider_track(
    buffer: &mut [u32],
    width: usize,
    top: usize,
    knob_x: usize,
    param: EffectParam,
    color: u32,
) {
    let left = slider_left(width);
    let right = slider_right(width);
    let center_y = top + (SLIDER_HEIGHT / 2) + 6;

    for y in center_y.saturating_sub(2)..=center_y + 2 {
        for x in left + 8..right.saturating_sub(8) {
            set_pixel(buffer, width, x, y, 0xB8A58D);
        }
    }

    // filled from the identity position to the knob
    let identity_x = value_to_x(param.range().identity, width, param);
    let range_start = identity_x.min(knob_x).saturating_sub(1);
    let range_end = identity_x.max(knob_x).saturating_add(1).min(right);
    for y in center_y.saturating_sub(2)..=center_y + 2 {
        for x in range_start..=range_end {
            set_pixel(buffer, width, x, y, color);
        }
    }
}

fn draw_slider_knob(buffer: &mut [u32], width: usize, x: usize, top: usize, color: u32) {
    let knob_w = 14;
    let knob_h = SLIDER_HEIGHT.saturating_sub(8);
    let left = x.saturating_sub(knob_w / 2);
    let knob_top = top + 3;

    fill_rect(buffer, width, left, knob_top, knob_w, knob_h, color);
    draw_rect(buffer, width, left, knob_top, knob_w, knob_h, 0xFFFFFF);
}

fn draw_slider_hover(
    buffer: &mut [u32],
    width: usize,
    param: EffectParam,
    sliders: &[SliderSpec],
) {
    if let Some(spec) = sliders.iter().find(|spec| spec.param == param) {
        let left = slider_left(width);
        let right = slider_right(width);
        draw_rect(
            buffer,
            width,
            left,
            spec.top.saturating_sub(1),
            right.saturating_sub(left).saturating_add(1),
            SLIDER_HEIGHT + 2,
            0x5A667A,
        );
    }
}

fn draw_background(buffer: &mut [u32], width: usize, height: usize) {
    for y in 0..height {
        for x in 0..width {
            let t = y as f32 / height.max(1) as f32;
            let mut color = lerp_color(0xF7EFE0, 0xF2E1CC, t);
            if ((x + (y * 2)) / 36) % 2 == 0 {
                color = darken_color(color, 6);
            }
            buffer[y * width + x] = color;
        }
    }
}

fn draw_header(buffer: &mut [u32], width: usize) {
    let left = CANVAS_MARGIN;
    let right = width.saturating_sub(CANVAS_MARGIN);
    let band_width = right.saturating_sub(left);
    fill_rect(buffer, width, left, HEADER_TOP, band_width, HEADER_HEIGHT, 0xFFFDF8);
    draw_rect(buffer, width, left, HEADER_TOP, band_width, HEADER_HEIGHT, 0xCCBBA4);

    let accent_h = HEADER_HEIGHT.saturating_sub(16);
    fill_rect(buffer, width, left + 12, HEADER_TOP + 8, 220, accent_h, 0xF05C4B);
    fill_rect(buffer, width, right.saturating_sub(108), HEADER_TOP + 8, 82, accent_h, 0x1B1F26);
    draw_text(
        buffer,
        width,
        left + 14,
        HEADER_TOP + 24,
        "PIXELCRAFT EDITOR",
        0xFFFFFF,
    );
    draw_text(
        buffer,
        width,
        left + 260,
        HEADER_TOP + 24,
        "DRAG SLIDERS | E EXPORT | R RESET | ESC QUIT",
        0x4A3E2E,
    );
}

fn draw_preview_panel(buffer: &mut [u32], width: usize, height: usize, preview: &PreviewCanvas) {
    let panel_left = preview_panel_left();
    let panel_top = preview_panel_top();
    let panel_right = preview_panel_right(width);
    let panel_bottom = preview_panel_bottom(height);

    fill_rect(
        buffer,
        width,
        panel_left,
        panel_top,
        panel_right.saturating_sub(panel_left),
        panel_bottom.saturating_sub(panel_top),
        0xFBFAF7,
    );
    draw_rect(
        buffer,
        width,
        panel_left,
        panel_top,
        panel_right.saturating_sub(panel_left),
        panel_bottom.saturating_sub(panel_top),
        0xC8B89F,
    );

    let stage_left = panel_left + 12;
    let stage_top = panel_top + 12;
    let stage_width = panel_right.saturating_sub(stage_left + 12);
    let stage_height = panel_bottom.saturating_sub(stage_top + 12);
    fill_rect(buffer, width, stage_left, stage_top, stage_width, stage_height, 0x101010);

    let content_width = stage_width.saturating_sub(2);
    let content_height = stage_height.saturating_sub(2);
    let draw_width = preview.width.min(content_width);
    let draw_height = preview.height.min(content_height);
    let start_x = stage_left + 1 + (content_width.saturating_sub(draw_width)) / 2;
    let start_y = stage_top + 1 + (content_height.saturating_sub(draw_height)) / 2;

    for y in 0..draw_height {
        for x in 0..draw_width {
            let color = preview.pixels[y * preview.width + x];
            set_pixel(buffer, width, start_x + x, start_y + y, color);
        }
    }
}

fn draw_control_panel(buffer: &mut [u32], width: usize, height: usize) {
    let left = control_panel_left(width);
    let top = control_panel_top();
    let right = control_panel_right(width);
    let bottom = control_panel_bottom(height);
    let panel_w = right.saturating_sub(left);
    let panel_h = bottom.saturating_sub(top);

    fill_rect(buffer, width, left, top, panel_w, panel_h, 0xFBFAF7);
    draw_rect(buffer, width, left, top, panel_w, panel_h, 0xCCBBA4);
    fill_rect(buffer, width, left + 18, top + 18, panel_w.saturating_sub(36), 16, 0x1A1F29);
    draw_text(buffer, width, left + 24, top + 22, "EFFECTS", 0xF0E3D0);
    draw_text(buffer, width, left + 18, top + 48, "IDENTITY VALUES APPLY", 0x6A5B47);
    draw_text(buffer, width, left + 18, top + 64, "NO VISIBLE CHANGE", 0x6A5B47);
}

fn build_window_title(
    image_path: &str,
    params: EffectParams,
    last_render_ms: u64,
    focused: Option<EffectParam>,
    last_export: Option<&str>,
) -> String {
    let status = EffectParam::ALL
        .iter()
        .map(|param| format!("{} {:.1}", param.name(), params.get(*param)))
        .collect::<Vec<_>>()
        .join(" | ");
    let focus_text = focused
        .map(|param| format!("focus={} ({})", param.name(), param_hint(param)))
        .unwrap_or_else(|| "focus=none (hover or drag a slider)".to_string());
    let export_text = last_export
        .map(|target| format!("last export {target}"))
        .unwrap_or_else(|| "no export yet".to_string());
    format!(
        "pixelcraft | {image_path} | {status} | render {last_render_ms}ms | {focus_text} | {export_text} | e export r reset esc quit"
    )
}

fn param_hint(param: EffectParam) -> &'static str {
    match param {
        EffectParam::Brightness => "overall lightness",
        EffectParam::Contrast => "light-dark separation",
        EffectParam::Saturation => "color intensity",
        EffectParam::Hue => "color rotation in degrees",
        EffectParam::Blur => "gaussian radius in pixels",
        EffectParam::Opacity => "global transparency",
        EffectParam::Invert => "negative blend",
        EffectParam::Sepia => "warm tone blend",
    }
}

fn slider_at_position(
    mouse_x: f32,
    mouse_y: f32,
    sliders: &[SliderSpec],
    width: usize,
) -> Option<EffectParam> {
    let x = mouse_x.max(0.0) as usize;
    let y = mouse_y.max(0.0) as usize;
    let left = slider_left(width);
    let right = slider_right(width);
    if x < left || x > right {
        return None;
    }
    sliders
        .iter()
        .find(|spec| y >= spec.top.saturating_sub(2) && y <= spec.top + SLIDER_HEIGHT + 2)
        .map(|spec| spec.param)
}

fn value_to_x(value: f32, width: usize, param: EffectParam) -> usize {
    let range = param.range();
    let left = slider_left(width) as f32;
    let right = slider_right(width) as f32;
    let t = (value.clamp(range.min, range.max) - range.min) / (range.max - range.min);
    (left + t * (right - left)).round() as usize
}

/// Mouse position to a step-snapped in-range value. Snapping mirrors the
/// slider widget stepping of the original controls; the model itself takes
/// any in-range value.
fn x_to_value(x: f32, width: usize, param: EffectParam) -> f32 {
    let range = param.range();
    let left = slider_left(width) as f32;
    let right = slider_right(width) as f32;
    let t = (x.clamp(left, right) - left) / (right - left);
    let raw = range.min + t * (range.max - range.min);
    let snapped = (raw / range.step).round() * range.step;
    snapped.clamp(range.min, range.max)
}

fn slider_left(width: usize) -> usize {
    control_panel_left(width).saturating_add(CONTROL_INSET)
}

fn slider_right(width: usize) -> usize {
    control_panel_right(width).saturating_sub(CONTROL_INSET)
}

fn preview_panel_left() -> usize {
    CANVAS_MARGIN
}

fn preview_panel_top() -> usize {
    WORKAREA_TOP
}

fn preview_panel_right(width: usize) -> usize {
    width.saturating_sub(CANVAS_MARGIN + CONTROL_PANEL_WIDTH + SPLIT_GUTTER)
}

fn preview_panel_bottom(height: usize) -> usize {
    height.saturating_sub(WORKAREA_BOTTOM_MARGIN)
}

fn control_panel_left(width: usize) -> usize {
    preview_panel_right(width).saturating_add(SPLIT_GUTTER)
}

fn control_panel_right(width: usize) -> usize {
    width.saturating_sub(CANVAS_MARGIN)
}

fn control_panel_top() -> usize {
    WORKAREA_TOP
}

fn control_panel_bottom(height: usize) -> usize {
    height.saturating_sub(WORKAREA_BOTTOM_MARGIN)
}

fn fill_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    for y in top..top.saturating_add(h) {
        for x in left..left.saturating_add(w) {
            set_pixel(buffer, width, x, y, color);
        }
    }
}

fn draw_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let right = left + w - 1;
    let bottom = top + h - 1;
    for x in left..=right {
        set_pixel(buffer, width, x, top, color);
        set_pixel(buffer, width, x, bottom, color);
    }
    for y in top..=bottom {
        set_pixel(buffer, width, left, y, color);
        set_pixel(buffer, width, right, y, color);
    }
}

fn lerp_color(start: u32, end: u32, t: f32) -> u32 {
    let clamped = t.clamp(0.0, 1.0);
    let sr = ((start >> 16) & 0xFF) as f32;
    let sg = ((start >> 8) & 0xFF) as f32;
    let sb = (start & 0xFF) as f32;
    let er = ((end >> 16) & 0xFF) as f32;
    let eg = ((end >> 8) & 0xFF) as f32;
    let eb = (end & 0xFF) as f32;

    let r = (sr + (er - sr) * clamped).round() as u32;
    let g = (sg + (eg - sg) * clamped).round() as u32;
    let b = (sb + (eb - sb) * clamped).round() as u32;
    (r << 16) | (g << 8) | b
}

fn darken_color(color: u32, amount: u8) -> u32 {
    let r = ((color >> 16) & 0xFF).saturating_sub(amount as u32);
    let g = ((color >> 8) & 0xFF).saturating_sub(amount as u32);
    let b = (color & 0xFF).saturating_sub(amount as u32);
    (r << 16) | (g << 8) | b
}

fn set_pixel(buffer: &mut [u32], width: usize, x: usize, y: usize, color: u32) {
    let height = buffer.len() / width;
    if x < width && y < height {
        buffer[y * width + x] = color;
    }
}

fn draw_text(buffer: &mut [u32], width: usize, x: usize, y: usize, text: &str, color: u32) {
    let mut cursor_x = x;
    for ch in text.chars() {
        if ch == '\n' {
            continue;
        }
        draw_char(buffer, width, cursor_x, y, ch, color);
        cursor_x = cursor_x.saturating_add(8);
    }
}

fn draw_char(buffer: &mut [u32], width: usize, x: usize, y: usize, ch: char, color: u32) {
    let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            if (bits >> col) & 1 == 1 {
                set_pixel(buffer, width, x + col, y + row, color);
            }
        }
    }
}
