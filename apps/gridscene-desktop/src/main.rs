use anyhow::{Context, Result};
use clap::Parser;
use gridscene_common::SceneConfig;
use gridscene_input::{InputAccumulator, MoveKey};
use gridscene_render::{FrameSink, ProjectionConfig};
use gridscene_render_wgpu::GpuFrameSink;
use gridscene_scene::Scene;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "gridscene-desktop", about = "Gridscene desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<String>,
}

struct GpuApp {
    scene: Scene,
    projection: ProjectionConfig,
    input: InputAccumulator,
    mouse_captured: bool,
    window: Option<Arc<Window>>,
    sink: Option<GpuFrameSink>,
}

impl GpuApp {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            projection: ProjectionConfig::default(),
            input: InputAccumulator::new(),
            mouse_captured: false,
            window: None,
            sink: None,
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, event_loop: &ActiveEventLoop) {
        let move_key = match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveKey::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveKey::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveKey::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveKey::Right),
            _ => None,
        };
        if let Some(move_key) = move_key {
            self.input.key(move_key, pressed);
            return;
        }
        if key == KeyCode::Escape && pressed {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(sink) = &mut self.sink else {
            return;
        };

        let input = self.input.sample();
        let snapshot = self.scene.tick(input);

        match sink.submit(&snapshot, &self.projection) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => {
                tracing::error!("rendering stopped: {e}");
                event_loop.exit();
                return;
            }
            Err(e) => {
                // Recoverable: the frame is skipped, the next tick retries.
                tracing::warn!("frame skipped: {e}");
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("gridscene")
            .with_inner_size(PhysicalSize::new(800u32, 600));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gridscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let sink = GpuFrameSink::new(
            surface,
            device,
            queue,
            config,
            self.scene.capacity(),
        );

        self.window = Some(window);
        self.sink = Some(sink);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(sink) = &mut self.sink {
                    sink.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.handle_key(key, key_state == ElementState::Pressed, event_loop);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.mouse_captured);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.mouse_captured {
                self.input.accumulate_spin(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_config(path: Option<&str>) -> Result<SceneConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading scene config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing scene config {path}"))
        }
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("gridscene-desktop starting");

    let config = load_config(cli.config.as_deref())?;
    let scene = Scene::new(&config).context("building scene")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(scene);
    event_loop.run_app(&mut app)?;

    Ok(())
}
