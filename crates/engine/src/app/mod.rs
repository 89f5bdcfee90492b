mod actor;
mod game;
mod input;
mod level;
mod loop_runner;
mod metrics;
mod rendering;
mod vector;

pub use actor::{
    Actor, ActorContext, ActorId, ActorMeta, AsAny, GameEvent, RenderContext, DEFAULT_ACTOR_NAME,
};
pub use game::{
    BaseOptions, Game, GameCommand, GameError, GameOptions, TickState, DEFAULT_TARGET_FPS,
};
pub use input::{Input, InputContext, KeyCode, KeyState, KeyboardInput};
pub use level::{Level, LevelId, LevelInfo};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    Color, ColorParseError, DrawCommand, PixelsRenderer, RecordingRenderer, RenderError, Renderer,
    ResizeObservers, Viewport, DEFAULT_STROKE_WIDTH,
};
pub use vector::Vec2;
