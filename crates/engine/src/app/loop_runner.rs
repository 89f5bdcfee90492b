use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use super::game::{Game, GameCommand, GameError, GameOptions};
use super::metrics::MetricsAccumulator;
use super::rendering::{PixelsRenderer, RenderError, Renderer, Viewport};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Engine".to_string(),
            window_width: 800,
            window_height: 600,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] RenderError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Fixed-delay timer for the tick loop. The next deadline is only set once
/// the previous tick has finished, so a changed delay applies from the next
/// iteration on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TickSchedule {
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub(crate) fn idle() -> Self {
        Self::default()
    }

    pub(crate) fn arm(&mut self, due: Instant) {
        self.next_due = Some(due);
    }

    pub(crate) fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_some_and(|due| now >= due)
    }

    pub(crate) fn rearm(&mut self, finished_at: Instant, delay: Duration) {
        self.next_due = Some(finished_at + delay);
    }

    pub(crate) fn cancel(&mut self) {
        self.next_due = None;
    }
}

pub fn run_app<O, F>(config: LoopConfig, mut build_game: F) -> Result<(), AppError>
where
    O: GameOptions,
    F: FnMut(Box<dyn Renderer>) -> Result<Game<O>, GameError>,
{
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = PixelsRenderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    let mut game = build_game(Box::new(renderer))?;
    game.start(Instant::now())?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    info!(
        window_width = config.window_width,
        window_height = config.window_height,
        tick_delay_ms = game.tick_delay().as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut schedule = TickSchedule::idle();
    schedule.arm(Instant::now());
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_frame_instant = Instant::now();
    let mut failure: Option<AppError> = None;

    event_loop
        .run(|event, window_target| {
            let outcome = match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    handle_window_event(
                        event,
                        &mut game,
                        &window,
                        window_target,
                        &mut metrics_accumulator,
                        &mut last_frame_instant,
                    )
                }
                Event::AboutToWait => {
                    let outcome = run_due_tick(
                        &mut game,
                        &mut schedule,
                        &mut metrics_accumulator,
                        &mut build_game,
                        &window,
                        &config.window_title,
                    );
                    if !game.is_running() {
                        window_target.exit();
                    }
                    window.request_redraw();
                    outcome
                }
                Event::LoopExiting => {
                    schedule.cancel();
                    game.stop();
                    info!("shutdown");
                    Ok(())
                }
                _ => Ok(()),
            };
            if let Err(error) = outcome {
                warn!(error = %error, "loop_failed");
                failure = Some(error);
                game.stop();
                window_target.exit();
            }
        })
        .map_err(AppError::EventLoopRun)?;

    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn handle_window_event<O: GameOptions>(
    event: WindowEvent,
    game: &mut Game<O>,
    window: &Window,
    window_target: &EventLoopWindowTarget<()>,
    metrics_accumulator: &mut MetricsAccumulator,
    last_frame_instant: &mut Instant,
) -> Result<(), AppError> {
    match event {
        WindowEvent::CloseRequested => {
            info!(reason = "window_close", "shutdown_requested");
            game.stop();
            window_target.exit();
        }
        WindowEvent::Focused(false) => game.pause(),
        WindowEvent::Focused(true) => game.resume(Instant::now()),
        WindowEvent::Resized(new_size) => {
            game.resize(Viewport::new(new_size.width, new_size.height))?;
        }
        WindowEvent::ScaleFactorChanged { .. } => {
            let size = window.inner_size();
            game.resize(Viewport::new(size.width, size.height))?;
        }
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return Ok(());
            };
            if code == KeyCode::Escape && event.state == ElementState::Pressed {
                info!(reason = "escape_key", "shutdown_requested");
                game.stop();
                window_target.exit();
                return Ok(());
            }
            if !event.repeat {
                game.dispatch_key(code, event.state.into());
            }
        }
        WindowEvent::RedrawRequested => {
            let now = Instant::now();
            let frame_dt = now.saturating_duration_since(*last_frame_instant);
            *last_frame_instant = now;

            game.render_frame()?;
            metrics_accumulator.record_frame(frame_dt);

            if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                info!(
                    fps = snapshot.fps,
                    tps = snapshot.tps,
                    paused_tps = snapshot.paused_tps,
                    frame_time_ms = snapshot.frame_time_ms,
                    actor_count = game.current_level().map_or(0, |level| level.actor_count()),
                    "loop_metrics"
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn run_due_tick<O, F>(
    game: &mut Game<O>,
    schedule: &mut TickSchedule,
    metrics_accumulator: &mut MetricsAccumulator,
    build_game: &mut F,
    window: &Window,
    window_title: &str,
) -> Result<(), AppError>
where
    O: GameOptions,
    F: FnMut(Box<dyn Renderer>) -> Result<Game<O>, GameError>,
{
    let now = Instant::now();
    if !game.is_running() || !schedule.is_due(now) {
        return Ok(());
    }

    game.tick(now)?;
    metrics_accumulator.record_tick(game.options().is_paused());

    for command in game.take_commands() {
        window.set_title(&title_after_command(window_title, &command));
        match command {
            GameCommand::Notify(message) => {
                info!(message = %message, "game_notice");
            }
            GameCommand::Restart => {
                let renderer = game.detach_renderer();
                *game = build_game(renderer)?;
                game.start(Instant::now())?;
                info!("game_restarted");
            }
        }
    }

    let finished_at = Instant::now();
    schedule.rearm(finished_at, game.tick_delay());
    debug!(
        next_tick_in_ms = game.tick_delay().as_millis() as u64,
        "tick_rearmed"
    );
    Ok(())
}

/// A notice is shown next to the title until the next round starts.
fn title_after_command(window_title: &str, command: &GameCommand) -> String {
    match command {
        GameCommand::Notify(message) => format!("{window_title}: {message}"),
        GameCommand::Restart => window_title.to_string(),
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_schedule_is_never_due() {
        let schedule = TickSchedule::idle();
        assert!(!schedule.is_due(Instant::now()));
        assert_eq!(schedule, TickSchedule::default());
    }

    #[test]
    fn armed_schedule_fires_at_deadline() {
        let base = Instant::now();
        let mut schedule = TickSchedule::idle();
        schedule.arm(base);

        assert!(schedule.is_due(base));
        assert!(schedule.is_due(base + Duration::from_millis(1)));
    }

    #[test]
    fn rearm_counts_delay_from_tick_completion() {
        let base = Instant::now();
        let mut schedule = TickSchedule::idle();
        schedule.arm(base);

        let finished = base + Duration::from_millis(4);
        schedule.rearm(finished, Duration::from_millis(60));

        assert!(!schedule.is_due(base + Duration::from_millis(63)));
        assert!(schedule.is_due(base + Duration::from_millis(64)));
    }

    #[test]
    fn cancelled_schedule_stops_firing() {
        let base = Instant::now();
        let mut schedule = TickSchedule::idle();
        schedule.arm(base);
        schedule.cancel();

        assert!(!schedule.is_due(base + Duration::from_secs(1)));
    }

    #[test]
    fn notice_title_is_cleared_when_the_round_restarts() {
        let notice = GameCommand::Notify("You have died. Your score is 3.".to_string());

        assert_eq!(
            title_after_command("Snake", &notice),
            "Snake: You have died. Your score is 3."
        );
        assert_eq!(title_after_command("Snake", &GameCommand::Restart), "Snake");
    }

    #[test]
    fn zero_metrics_interval_falls_back() {
        assert_eq!(
            normalize_non_zero_duration(Duration::ZERO, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(250), Duration::from_secs(1)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn default_config_has_positive_window() {
        let config = LoopConfig::default();
        assert!(config.window_width > 0 && config.window_height > 0);
        assert!(!config.metrics_log_interval.is_zero());
    }
}
