pub mod app;

pub use app::{
    run_app, Actor, ActorContext, ActorId, ActorMeta, AppError, AsAny, BaseOptions, Color,
    ColorParseError, DrawCommand, Game, GameCommand, GameError, GameEvent, GameOptions, Input,
    InputContext, KeyCode, KeyState, KeyboardInput, Level, LevelId, LevelInfo, LoopConfig,
    LoopMetricsSnapshot, PixelsRenderer, RecordingRenderer, RenderContext, RenderError, Renderer,
    ResizeObservers, TickState, Vec2, Viewport, DEFAULT_ACTOR_NAME, DEFAULT_STROKE_WIDTH,
    DEFAULT_TARGET_FPS,
};
