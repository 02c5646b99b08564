//! Windowed host
//!
//! Opens a winit window, builds a [`GameOfLife`] on a device that can present
//! to it, and drives the simulation with an [`Animator`]. Key presses and
//! clicks become [`Command`]s; every frame renders straight into the surface.
//!
//! | Key | Action |
//! |---|---|
//! | `P` / `Space` | start or stop the animation |
//! | `S` | single step while stopped |
//! | `R` / `C` | randomise / clear |
//! | `W` / `M` | toggle wraparound / mutation |
//! | `G` | switch between glow and simple rendering |
//! | `[` / `]` | less / more glow |
//! | `-` / `=` | slower / faster |
//! | `1`-`6` | load a pattern |
//! | left click | bring a cell to life |
//! | `Esc` | quit |

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::app_settings::AppSettings;
use crate::error::{LifeError, LifeResult};
use crate::gfx::context::GpuContext;
use crate::grid::Pattern;
use crate::simulation::config::{
    LifeConfig, RenderStyle, SUPPORTED_DISPLAY_FORMATS, TARGET_FRAMERATES,
};
use crate::simulation::{Animator, Command, GameOfLife, Simulation};

/// Glow factor change per key press
const GLOW_STEP: f32 = 0.25;

/// What a key press asks the app to do
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppAction {
    Exit,
    ToggleAnimation,
    SingleStep,
    Faster,
    Slower,
    Life(Command),
}

/// Maps a key to an action given the current render style and glow factor
pub fn action_for_key(key: KeyCode, style: RenderStyle, glow_factor: f32) -> Option<AppAction> {
    let action = match key {
        KeyCode::Escape => AppAction::Exit,
        KeyCode::KeyP | KeyCode::Space => AppAction::ToggleAnimation,
        KeyCode::KeyS => AppAction::SingleStep,
        KeyCode::Equal => AppAction::Faster,
        KeyCode::Minus => AppAction::Slower,
        KeyCode::KeyR => AppAction::Life(Command::Randomise),
        KeyCode::KeyC => AppAction::Life(Command::Clear),
        KeyCode::KeyW => AppAction::Life(Command::ToggleWrapping),
        KeyCode::KeyM => AppAction::Life(Command::ToggleMutation),
        KeyCode::KeyG => AppAction::Life(Command::SetRenderStyle(match style {
            RenderStyle::Glow => RenderStyle::Simple,
            RenderStyle::Simple => RenderStyle::Glow,
        })),
        KeyCode::BracketLeft => {
            AppAction::Life(Command::SetGlowFactor((glow_factor - GLOW_STEP).max(0.0)))
        }
        KeyCode::BracketRight => AppAction::Life(Command::SetGlowFactor(glow_factor + GLOW_STEP)),
        KeyCode::Digit1 => AppAction::Life(Command::LoadPattern(Pattern::ALL[0])),
        KeyCode::Digit2 => AppAction::Life(Command::LoadPattern(Pattern::ALL[1])),
        KeyCode::Digit3 => AppAction::Life(Command::LoadPattern(Pattern::ALL[2])),
        KeyCode::Digit4 => AppAction::Life(Command::LoadPattern(Pattern::ALL[3])),
        KeyCode::Digit5 => AppAction::Life(Command::LoadPattern(Pattern::ALL[4])),
        KeyCode::Digit6 => AppAction::Life(Command::LoadPattern(Pattern::ALL[5])),
        _ => return None,
    };
    Some(action)
}

/// Next offered frame rate above (`faster`) or below `current`
pub fn adjacent_framerate(current: f32, faster: bool) -> f32 {
    if faster {
        TARGET_FRAMERATES
            .into_iter()
            .find(|&fps| fps > current)
            .unwrap_or(current)
    } else {
        TARGET_FRAMERATES
            .into_iter()
            .rev()
            .find(|&fps| fps < current)
            .unwrap_or(current)
    }
}

/// Cell under a cursor position on a surface of `surface` pixels
pub fn cell_at(
    position: PhysicalPosition<f64>,
    surface: (u32, u32),
    state: (u32, u32),
) -> (i64, i64) {
    let x = position.x * state.0 as f64 / surface.0.max(1) as f64;
    let y = position.y * state.1 as f64 / surface.1.max(1) as f64;
    (x.floor() as i64, y.floor() as i64)
}

/// Steps the board without rendering; the surface is drawn on redraw
struct Advance<'a>(&'a mut GameOfLife);

impl Simulation for Advance<'_> {
    fn step(&mut self) -> LifeResult<()> {
        self.0.calculate_next_state()
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

pub struct GlowLifeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    settings: AppSettings,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    surface_config: Option<wgpu::SurfaceConfiguration>,
    life: Option<GameOfLife>,
    animator: Animator,
    cursor: Option<PhysicalPosition<f64>>,
    error: Option<LifeError>,
}

impl GlowLifeApp {
    /// Create an application that will open a window sized by `settings`
    pub fn new(settings: AppSettings) -> LifeResult<Self> {
        let event_loop = EventLoop::new().map_err(|e| LifeError::graphics(e.to_string()))?;
        let animator = Animator::new(settings.target_fps)?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                settings,
                window: None,
                surface: None,
                surface_config: None,
                life: None,
                animator,
                cursor: None,
                error: None,
            },
        })
    }

    /// Run the application until the window closes or a fatal error occurs
    pub fn run(mut self) -> LifeResult<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| LifeError::graphics("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| LifeError::graphics(e.to_string()))?;

        match self.app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> LifeResult<()> {
        let config = self.settings.life_config()?;

        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("Glow Life")
                    .with_inner_size(PhysicalSize::new(config.view_width, config.view_height)),
            )
            .map_err(|e| LifeError::graphics(e.to_string()))?;
        let window = Arc::new(window);

        let instance = GpuContext::create_instance();
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| LifeError::graphics(e.to_string()))?;
        let context = pollster::block_on(GpuContext::for_surface(instance, &surface))?;

        let capabilities = surface.get_capabilities(&context.adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .filter(|f| SUPPORTED_DISPLAY_FORMATS.contains(f))
            .find(|f| !f.is_srgb())
            .or_else(|| {
                capabilities
                    .formats
                    .iter()
                    .copied()
                    .find(|f| SUPPORTED_DISPLAY_FORMATS.contains(f))
            })
            .ok_or_else(|| LifeError::graphics("surface offers no RGBA8 or BGRA8 format"))?;

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);

        let config: LifeConfig = config.with_display_format(format);
        let mut life = GameOfLife::new(context, config)?;
        if let Some(pattern) = self.settings.pattern()? {
            life.load_pattern(pattern)?;
        }

        if self.settings.start_running {
            self.animator.start(Instant::now());
        }

        window.request_redraw();
        self.window = Some(window);
        self.surface = Some(surface);
        self.surface_config = Some(surface_config);
        self.life = Some(life);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(surface), Some(config), Some(life)) = (
            self.surface.as_ref(),
            self.surface_config.as_mut(),
            self.life.as_ref(),
        ) else {
            return;
        };

        if size.width == 0 || size.height == 0 {
            return;
        }

        config.width = size.width;
        config.height = size.height;
        surface.configure(&life.context().device, config);
    }

    fn redraw(&mut self) -> LifeResult<()> {
        let (Some(surface), Some(config), Some(life)) = (
            self.surface.as_ref(),
            self.surface_config.as_ref(),
            self.life.as_mut(),
        ) else {
            return Ok(());
        };

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&life.context().device, config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(LifeError::graphics(e.to_string())),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        life.render_state_to(&view, (config.width, config.height))?;
        frame.present();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) -> LifeResult<()> {
        let Some(life) = self.life.as_mut() else {
            return Ok(());
        };

        let Some(action) = action_for_key(key, life.render_style(), life.glow_factor()) else {
            return Ok(());
        };

        let now = Instant::now();
        match action {
            AppAction::Exit => event_loop.exit(),
            AppAction::ToggleAnimation => self.animator.toggle(now),
            AppAction::SingleStep => {
                if !self.animator.is_running() {
                    self.animator.step_once(now, &mut Advance(life))?;
                }
            }
            AppAction::Faster | AppAction::Slower => {
                let fps = adjacent_framerate(
                    self.animator.target_fps(),
                    action == AppAction::Faster,
                );
                self.animator.change_target_framerate(fps, now)?;
                log::info!("Target frame rate {} fps", fps);
            }
            AppAction::Life(command) => life.apply(command)?,
        }

        self.request_redraw();
        Ok(())
    }

    fn handle_click(&mut self) -> LifeResult<()> {
        let (Some(life), Some(config), Some(cursor)) =
            (self.life.as_mut(), self.surface_config.as_ref(), self.cursor)
        else {
            return Ok(());
        };

        let (x, y) = cell_at(
            cursor,
            (config.width, config.height),
            (life.state_width(), life.state_height()),
        );
        match life.set_cell_state(x, y, true) {
            Err(e) if e.is_validation() => log::debug!("Ignoring click: {}", e),
            other => other?,
        }

        self.request_redraw();
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn update_title(&self) {
        if let (Some(window), Some(life)) = (self.window.as_ref(), self.life.as_ref()) {
            window.set_title(&format!(
                "Glow Life | generation {} | {:.1} / {} fps",
                life.generation(),
                self.animator.measured_fps(),
                self.animator.target_fps()
            ));
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: LifeError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let result = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => {
                self.resize(size);
                self.request_redraw();
                Ok(())
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key_code),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
                Ok(())
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Ok(())
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(life) = self.life.as_mut() else {
            return;
        };

        match self.animator.poll(Instant::now(), &mut Advance(life)) {
            Ok(true) => {
                self.update_title();
                self.request_redraw();
            }
            Ok(false) => {}
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        event_loop.set_control_flow(match self.animator.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        });
    }
}
