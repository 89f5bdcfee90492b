use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::debug;
use winit::window::Window;

use super::{Color, RenderError, Renderer, ResizeObservers, Viewport};

pub struct PixelsRenderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    resize_observers: ResizeObservers,
}

impl PixelsRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport::new(size.width, size.height),
            resize_observers: ResizeObservers::default(),
        })
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }
}

impl Renderer for PixelsRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        if viewport.is_empty() || viewport == self.viewport {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), viewport.width, viewport.height)?;
        self.viewport = viewport;
        debug!(
            width = viewport.width,
            height = viewport.height,
            "renderer_resized"
        );
        self.resize_observers.notify(viewport);
        Ok(())
    }

    fn resize_observers(&mut self) -> &mut ResizeObservers {
        &mut self.resize_observers
    }

    fn fill_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Viewport {
            width: frame_width,
            height: frame_height,
        } = self.viewport;
        if let Some(rect) = PixelRect::from_float(x, y, width, height) {
            fill_rect_clipped(
                self.pixels.frame_mut(),
                frame_width,
                frame_height,
                rect,
                color.rgba(),
            );
        }
    }

    fn stroke_square(&mut self, x: f32, y: f32, size: f32, color: Color, stroke_width: f32) {
        let Viewport {
            width: frame_width,
            height: frame_height,
        } = self.viewport;
        stroke_square_clipped(
            self.pixels.frame_mut(),
            frame_width,
            frame_height,
            x,
            y,
            size,
            stroke_width,
            color.rgba(),
        );
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.pixels.render()?;
        Ok(())
    }
}

/// Half-open pixel rectangle: `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl PixelRect {
    fn from_float(x: f32, y: f32, width: f32, height: f32) -> Option<Self> {
        if ![x, y, width, height].iter().all(|value| value.is_finite()) {
            return None;
        }
        let rect = Self {
            left: x.round() as i64,
            top: y.round() as i64,
            right: (x + width).round() as i64,
            bottom: (y + height).round() as i64,
        };
        rect.non_empty()
    }

    fn non_empty(self) -> Option<Self> {
        (self.right > self.left && self.bottom > self.top).then_some(self)
    }

    fn clipped(self, width: u32, height: u32) -> Option<Self> {
        Self {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.min(i64::from(width)),
            bottom: self.bottom.min(i64::from(height)),
        }
        .non_empty()
    }
}

fn fill_rect_clipped(frame: &mut [u8], width: u32, height: u32, rect: PixelRect, color: [u8; 4]) {
    let Some(rect) = rect.clipped(width, height) else {
        return;
    };
    let row_stride = width as usize * 4;
    for y in rect.top..rect.bottom {
        let row_start = y as usize * row_stride;
        let start = row_start + rect.left as usize * 4;
        let end = row_start + rect.right as usize * 4;
        let Some(row) = frame.get_mut(start..end) else {
            return;
        };
        for pixel in row.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }
}

// The stroke is centred on the square's edge, like a canvas strokeRect.
#[allow(clippy::too_many_arguments)]
fn stroke_square_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: f32,
    y: f32,
    size: f32,
    stroke_width: f32,
    color: [u8; 4],
) {
    let half = stroke_width * 0.5;
    let Some(outer) = PixelRect::from_float(x - half, y - half, size + stroke_width, size + stroke_width)
    else {
        return;
    };
    let Some(inner) = PixelRect::from_float(x + half, y + half, size - stroke_width, size - stroke_width)
    else {
        fill_rect_clipped(frame, width, height, outer, color);
        return;
    };

    let bands = [
        PixelRect {
            bottom: inner.top,
            ..outer
        },
        PixelRect {
            top: inner.bottom,
            ..outer
        },
        PixelRect {
            top: inner.top,
            bottom: inner.bottom,
            right: inner.left,
            ..outer
        },
        PixelRect {
            top: inner.top,
            bottom: inner.bottom,
            left: inner.right,
            ..outer
        },
    ];
    for band in bands.into_iter().filter_map(PixelRect::non_empty) {
        fill_rect_clipped(frame, width, height, band, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn blank_frame(width: u32, height: u32) -> Vec<u8> {
        vec![0; width as usize * height as usize * 4]
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = (y * width + x) as usize * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn painted_count(frame: &[u8]) -> usize {
        frame
            .chunks_exact(4)
            .filter(|pixel| **pixel == RED)
            .count()
    }

    #[test]
    fn fill_covers_exact_rectangle() {
        let mut frame = blank_frame(8, 8);
        let rect = PixelRect::from_float(2.0, 3.0, 4.0, 2.0).expect("rect");
        fill_rect_clipped(&mut frame, 8, 8, rect, RED);

        assert_eq!(painted_count(&frame), 8);
        assert_eq!(pixel(&frame, 8, 2, 3), RED);
        assert_eq!(pixel(&frame, 8, 5, 4), RED);
        assert_eq!(pixel(&frame, 8, 6, 4), [0; 4]);
        assert_eq!(pixel(&frame, 8, 2, 5), [0; 4]);
    }

    #[test]
    fn fill_is_clipped_to_frame() {
        let mut frame = blank_frame(4, 4);
        let rect = PixelRect::from_float(-2.0, 2.0, 10.0, 10.0).expect("rect");
        fill_rect_clipped(&mut frame, 4, 4, rect, RED);

        assert_eq!(painted_count(&frame), 8);
    }

    #[test]
    fn fill_outside_frame_is_ignored() {
        let mut frame = blank_frame(4, 4);
        let rect = PixelRect::from_float(10.0, 10.0, 2.0, 2.0).expect("rect");
        fill_rect_clipped(&mut frame, 4, 4, rect, RED);

        assert_eq!(painted_count(&frame), 0);
    }

    #[test]
    fn degenerate_rectangles_are_rejected() {
        assert!(PixelRect::from_float(0.0, 0.0, 0.0, 5.0).is_none());
        assert!(PixelRect::from_float(0.0, 0.0, 5.0, -1.0).is_none());
        assert!(PixelRect::from_float(f32::NAN, 0.0, 5.0, 5.0).is_none());
    }

    #[test]
    fn one_pixel_stroke_draws_hollow_outline() {
        let mut frame = blank_frame(10, 10);
        stroke_square_clipped(&mut frame, 10, 10, 2.0, 2.0, 4.0, 1.0, RED);

        assert_eq!(pixel(&frame, 10, 2, 2), RED);
        assert_eq!(pixel(&frame, 10, 6, 6), RED);
        assert_eq!(pixel(&frame, 10, 4, 4), [0; 4]);
        assert_eq!(pixel(&frame, 10, 1, 1), [0; 4]);
        assert_eq!(painted_count(&frame), 16);
    }

    #[test]
    fn stroke_wider_than_square_fills_it() {
        let mut frame = blank_frame(10, 10);
        stroke_square_clipped(&mut frame, 10, 10, 4.0, 4.0, 2.0, 4.0, RED);

        assert_eq!(pixel(&frame, 10, 5, 5), RED);
        assert_eq!(painted_count(&frame), 36);
    }
}
