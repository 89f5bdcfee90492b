use super::{Color, RenderError, Renderer, ResizeObservers, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    FillSquare {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    },
    StrokeSquare {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        stroke_width: f32,
    },
}

/// Headless renderer that keeps every draw call of the frames it was given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    frames_presented: u64,
    resize_observers: ResizeObservers,
}

impl RecordingRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Renderer for RecordingRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.viewport = viewport;
        self.resize_observers.notify(viewport);
        Ok(())
    }

    fn resize_observers(&mut self) -> &mut ResizeObservers {
        &mut self.resize_observers
    }

    fn fill_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::FillRectangle {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Color) {
        self.commands
            .push(DrawCommand::FillSquare { x, y, size, color });
    }

    fn stroke_square(&mut self, x: f32, y: f32, size: f32, color: Color, stroke_width: f32) {
        self.commands.push(DrawCommand::StrokeSquare {
            x,
            y,
            size,
            color,
            stroke_width,
        });
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.frames_presented = self.frames_presented.saturating_add(1);
        Ok(())
    }
}
