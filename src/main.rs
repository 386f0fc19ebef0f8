use std::num::NonZeroU32;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use raycaster::frame::{Frame, FrameConfig, Ticker, advance};
use raycaster::input::{InputState, key_action, window_to_view};
use raycaster::renderer::render_frame;
use raycaster::scaler::Stretch;
use raycaster::{BackendError, RunError, Scene, Settings, Vec2, Viewpoint};

struct App {
    settings: Settings,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    window_size: (u32, u32),

    scene: Scene,
    viewpoint: Viewpoint,
    config: FrameConfig,
    frame: Option<Frame>,

    // Both views side by side at their native size
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,
    stretch: Stretch,

    input: InputState,
    ticker: Ticker,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    failure: Option<BackendError>,
}

impl App {
    fn new(settings: Settings) -> Result<Self, RunError> {
        let scene = Scene::default_room();
        let fan = &settings.fan;
        let viewpoint = Viewpoint::fan(
            Vec2::new(fan.start_x, fan.start_y),
            fan.start_heading_deg.to_radians(),
            fan.fov_deg.to_radians(),
            fan.ray_count,
            fan.reach,
        )?;
        let config = FrameConfig::from(&settings);

        let fb_w = 2 * settings.window.view_width as usize;
        let fb_h = settings.window.view_height as usize;

        tracing::info!(
            segments = scene.len(),
            rays = viewpoint.rays().len(),
            policy = ?config.policy,
            fish_eye = ?config.fish_eye,
            "scene ready"
        );

        Ok(Self {
            window: None,
            surface: None,
            window_size: (fb_w as u32, fb_h as u32),
            scene,
            viewpoint,
            config,
            frame: None,
            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,
            stretch: Stretch::default(),
            input: InputState::default(),
            ticker: Ticker::new(settings.window.frame_rate, Instant::now()),
            frame_counter: 0,
            last_fps_print: Instant::now(),
            failure: None,
            settings,
        })
    }

    /// Backend failures are fatal; `run` reports them once the loop returns.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: BackendError) {
        self.failure = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackendError> {
        let attributes = Window::default_attributes()
            .with_title(self.settings.window.title.clone())
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = Rc::new(event_loop.create_window(attributes)?);

        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| BackendError::RendererCreation(e.to_string()))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| BackendError::RendererCreation(e.to_string()))?;

        let size = window.inner_size();
        self.resize(size.width, size.height);

        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        if self.stretch.dst_size() != (width as usize, height as usize) {
            self.stretch = Stretch::new(width as usize, height as usize, self.fb_w, self.fb_h);
        }
    }

    /// One fixed-rate tick: consume input, recast, queue a redraw.
    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let input = self.input.take();
        let frame = advance(&self.scene, &mut self.viewpoint, &input, &self.config);
        if !frame.running {
            tracing::info!("quit requested; stopping");
            event_loop.exit();
            return;
        }
        self.frame = Some(frame);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn present(&mut self) -> Result<(), BackendError> {
        let (Some(surface), Some(frame)) = (self.surface.as_mut(), self.frame.as_ref()) else {
            return Ok(());
        };
        let (dw, dh) = self.window_size;
        let (Some(w), Some(h)) = (NonZeroU32::new(dw), NonZeroU32::new(dh)) else {
            return Ok(()); // Minimized window, skip drawing
        };

        render_frame(
            &mut self.fb,
            self.fb_w,
            self.fb_h,
            &self.scene,
            &self.viewpoint,
            frame,
        );

        surface
            .resize(w, h)
            .map_err(|e| BackendError::Present(e.to_string()))?;
        let mut buf = surface
            .buffer_mut()
            .map_err(|e| BackendError::Present(e.to_string()))?;
        self.stretch.blit(&mut buf, &self.fb);
        buf.present()
            .map_err(|e| BackendError::Present(e.to_string()))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            tracing::info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        self.ticker = Ticker::new(self.settings.window.frame_rate, Instant::now());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.id() != id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("The close button was pressed; stopping");
                self.input.request_quit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(action) = key_action(code) {
                    self.input.apply(action);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let view = (
                    self.settings.window.view_width,
                    self.settings.window.view_height,
                );
                let p = window_to_view(
                    position.x,
                    position.y,
                    self.window_size,
                    (self.fb_w, self.fb_h),
                    view,
                );
                self.input.pointer_moved(p);
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.present() {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() || event_loop.exiting() {
            return;
        }
        if self.ticker.poll(Instant::now()) {
            self.tick(event_loop);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.ticker.deadline()));
    }
}

fn run() -> Result<(), RunError> {
    let settings = Settings::load();
    let event_loop = EventLoop::new().map_err(BackendError::from)?;
    let mut app = App::new(settings)?;

    event_loop
        .run_app(&mut app)
        .map_err(BackendError::from)?;

    match app.failure.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
