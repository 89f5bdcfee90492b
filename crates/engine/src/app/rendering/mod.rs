mod color;
mod recording;
mod renderer;

use std::fmt;

use thiserror::Error;

use super::actor::AsAny;

pub use color::{Color, ColorParseError};
pub use recording::{DrawCommand, RecordingRenderer};
pub use renderer::PixelsRenderer;

pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel surface error: {0}")]
    Surface(#[from] pixels::Error),
}

/// Drawing surface used by actors. Coordinates are pixels from the top-left
/// corner of the surface.
pub trait Renderer: AsAny {
    fn viewport(&self) -> Viewport;

    /// Applies a new drawable size and notifies every resize observer
    /// before returning.
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError>;

    fn resize_observers(&mut self) -> &mut ResizeObservers;

    fn fill_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Color) {
        self.fill_rectangle(x, y, size, size, color);
    }

    fn stroke_square(&mut self, x: f32, y: f32, size: f32, color: Color, stroke_width: f32);

    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

impl dyn Renderer {
    pub fn downcast_ref<T: Renderer>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Renderer>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

#[derive(Default)]
pub struct ResizeObservers {
    observers: Vec<Box<dyn FnMut(Viewport)>>,
}

impl ResizeObservers {
    pub fn push(&mut self, observer: impl FnMut(Viewport) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn notify(&mut self, viewport: Viewport) {
        for observer in &mut self.observers {
            observer(viewport);
        }
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ResizeObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeObservers")
            .field("len", &self.observers.len())
            .finish()
    }
}
