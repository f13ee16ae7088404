use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::config::{ConfigError, WindowConfig};
use crate::StartupError;

use super::frame_clock::FrameClock;
use super::metrics::MetricsAccumulator;
use super::{FramePresenter, InputAction, InputState, RenderOptions, Sandbox, SandboxRenderer};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_catch_up_steps: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from(&WindowConfig::default())
    }
}

impl From<&WindowConfig> for LoopConfig {
    fn from(window: &WindowConfig) -> Self {
        Self {
            window_title: window.title.clone(),
            window_width: window.width,
            window_height: window.height,
            target_tps: window.target_tps,
            max_catch_up_steps: window.max_catch_up_steps,
            metrics_log_interval: Duration::from_millis(window.metrics_log_interval_ms),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize pixel surface: {0}")]
    CreateSurface(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens a window and runs update-then-draw until the window closes.
pub fn run_app(
    config: LoopConfig,
    mut sandbox: Sandbox,
    mut renderer: SandboxRenderer,
) -> Result<(), AppError> {
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
    let mut presenter =
        FramePresenter::new(Arc::clone(&window)).map_err(AppError::CreateSurface)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval = if config.metrics_log_interval.is_zero() {
        Duration::from_secs(1)
    } else {
        config.metrics_log_interval
    };
    let mut clock = FrameClock::new(config.target_tps, config.max_catch_up_steps);
    let fixed_dt_seconds = clock.step().as_secs_f32();
    let mut input_collector = InputCollector::default();

    info!(
        target_tps = config.target_tps,
        max_catch_up_steps = config.max_catch_up_steps,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        entity_count = sandbox.entities().len(),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, last_frame_instant);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = presenter.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "surface_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = presenter.resize(size.width, size.height) {
                        warn!(error = %error, "surface_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(focused) => {
                    input_collector.handle_focus(focused);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if input_collector.take_debug_toggle_pressed() {
                        let options = toggle_debug(renderer.options());
                        renderer.set_options(options);
                        info!(
                            debug_collision = options.debug_collision,
                            debug_node_tree = options.debug_node_tree,
                            "debug_overlay_toggled"
                        );
                    }

                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let plan = clock.advance(frame_dt);
                    let input = input_collector.state();
                    for _ in 0..plan.ticks_to_run {
                        sandbox.update(fixed_dt_seconds, &input);
                    }
                    metrics_accumulator.record_ticks(plan.ticks_to_run);
                    if !plan.dropped_backlog.is_zero() {
                        metrics_accumulator.record_dropped(plan.dropped_backlog, clock.step());
                        warn!(
                            dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                            max_catch_up_steps = config.max_catch_up_steps,
                            "sim_clamp_triggered"
                        );
                    }

                    renderer.draw_frame(presenter.canvas_mut(), &sandbox);
                    if let Err(error) = presenter.present() {
                        warn!(error = %error, "surface_present_failed");
                        window_target.exit();
                    }
                    metrics_accumulator.record_frame(frame_dt);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        window.set_title(&snapshot.window_title(&config.window_title));
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            dropped_ticks = snapshot.dropped_ticks,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn toggle_debug(options: RenderOptions) -> RenderOptions {
    let enabled = !(options.debug_collision || options.debug_node_tree);
    RenderOptions {
        debug_collision: enabled,
        debug_node_tree: enabled,
        ..options
    }
}

/// Folds winit keyboard and focus events into an [`InputState`].
#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    state: InputState,
    debug_toggle_is_down: bool,
    debug_toggle_pressed_edge: bool,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn handle_focus(&mut self, focused: bool) {
        if !focused {
            self.state.clear();
            self.debug_toggle_is_down = false;
        }
    }

    fn state(&self) -> InputState {
        self.state
    }

    fn take_debug_toggle_pressed(&mut self) -> bool {
        let was_pressed = self.debug_toggle_pressed_edge;
        self.debug_toggle_pressed_edge = false;
        was_pressed
    }

    fn update_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.state.set(InputAction::MoveUp, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.state.set(InputAction::MoveDown, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.state.set(InputAction::MoveLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.state.set(InputAction::MoveRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::F3) => {
                if is_pressed && !self.debug_toggle_is_down {
                    self.debug_toggle_pressed_edge = true;
                }
                self.debug_toggle_is_down = is_pressed;
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.state.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }
}
