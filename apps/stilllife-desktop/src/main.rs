use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use stilllife_input::{Action, InputState, Key};
use stilllife_render::RenderContext;
use stilllife_render_wgpu::WgpuBackend;
use stilllife_scene::{PrepareReport, SceneManager};
use stilllife_tools::SceneInspector;
use stilllife_view::{ViewManager, WINDOW_HEIGHT, WINDOW_WIDTH};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of touchpad scroll treated as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 50.0;

#[derive(Parser)]
#[command(name = "stilllife-desktop", about = "Still-life scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory the Textures/ folder is resolved against
    #[arg(long, default_value = ".")]
    asset_root: PathBuf,
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyO => Key::O,
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        _ => return None,
    })
}

/// Application state.
struct AppState {
    scene: SceneManager,
    view: ViewManager,
    input: InputState,
    report: Option<PrepareReport>,
    show_inspector: bool,
    selected: Option<String>,
    // Mouse look needs RMB while the inspector is open
    mouse_held: bool,
    quit: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(asset_root: PathBuf) -> Self {
        Self {
            scene: SceneManager::new(asset_root),
            view: ViewManager::new(),
            input: InputState::new(),
            report: None,
            show_inspector: false,
            selected: None,
            mouse_held: false,
            quit: false,
            last_frame: Instant::now(),
        }
    }

    fn update(&mut self, dt: f32) {
        for action in self.input.movement_actions() {
            self.view.apply(action, dt);
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::ToggleInspector => self.show_inspector = !self.show_inspector,
            Action::Quit => self.quit = true,
            other => self.view.apply(other, 0.0),
        }
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(key) = map_key(code) {
            let action = self.input.key(key, pressed);
            self.dispatch(action);
        }
    }

    fn mouse_look_active(&self) -> bool {
        !self.show_inspector || self.mouse_held
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);
        let view = SceneInspector::view(&self.view);

        egui::SidePanel::left("inspector")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Still Life");
                ui.separator();
                ui.label(format!(
                    "Textures: {}  Materials: {}  Objects: {}",
                    summary.textures, summary.materials, summary.objects
                ));
                if let Some(report) = &self.report {
                    ui.label(format!(
                        "Meshes loaded: {}  Texture failures: {}",
                        report.meshes_loaded,
                        report.texture_failures.len()
                    ));
                    for failure in &report.texture_failures {
                        ui.small(format!("{}: {}", failure.tag, failure.reason));
                    }
                }
                ui.separator();

                ui.heading("View");
                ui.label(format!("Projection: {:?}", view.mode));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    view.position[0], view.position[1], view.position[2]
                ));
                ui.label(format!(
                    "Yaw {:.1}  Pitch {:.1}  FOV {:.0}",
                    view.yaw, view.pitch, view.zoom
                ));
                ui.label(format!("Speed: {:.1}", view.speed));
                ui.horizontal(|ui| {
                    if ui.button("Perspective (P)").clicked() {
                        self.view.apply(Action::UsePerspective, 0.0);
                    }
                    if ui.button("Orthographic (O)").clicked() {
                        self.view.apply(Action::UseOrthographic, 0.0);
                    }
                });
                ui.separator();

                egui::CollapsingHeader::new("Textures").show(ui, |ui| {
                    for (slot, entry) in self.scene.textures().entries().iter().enumerate() {
                        ui.label(format!(
                            "{slot}: {} {}x{} {:?}",
                            entry.tag, entry.width, entry.height, entry.format
                        ));
                    }
                });
                egui::CollapsingHeader::new("Materials").show(ui, |ui| {
                    for material in self.scene.materials().iter() {
                        ui.label(format!(
                            "{}: diffuse ({:.2}, {:.2}, {:.2}) shininess {:.0}",
                            material.tag,
                            material.diffuse_color.x,
                            material.diffuse_color.y,
                            material.diffuse_color.z,
                            material.shininess
                        ));
                    }
                });
                egui::CollapsingHeader::new("Objects")
                    .default_open(true)
                    .show(ui, |ui| {
                        for label in SceneInspector::list_objects(&self.scene) {
                            let is_selected = self.selected.as_deref() == Some(label.as_str());
                            if ui.selectable_label(is_selected, label.as_str()).clicked() {
                                self.selected = Some(label);
                            }
                        }
                    });

                if let Some(info) = self
                    .selected
                    .as_deref()
                    .and_then(|label| SceneInspector::inspect_object(&self.scene, label))
                {
                    ui.separator();
                    ui.heading("Object");
                    ui.label(info.to_string());
                }

                ui.separator();
                ui.small("F1: Inspector | RMB: Look | WASD/QE: Move | Wheel: Speed");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    config: Option<wgpu::SurfaceConfiguration>,
    backend: Option<WgpuBackend>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(asset_root: PathBuf) -> Self {
        Self {
            state: AppState::new(asset_root),
            window: None,
            surface: None,
            config: None,
            backend: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Still Life")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;
        let (adapter, device, queue) =
            pollster::block_on(stilllife_render_wgpu::request_device(&instance, &surface))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        self.state.view.resize(config.width, config.height);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);
        let mut backend = WgpuBackend::new(device, queue, surface_format, config.width, config.height);
        let report = self
            .state
            .scene
            .prepare_scene(&mut RenderContext::new(&mut backend));
        for failure in &report.texture_failures {
            tracing::warn!(
                "texture {} unavailable ({}): {}",
                failure.tag,
                failure.path.display(),
                failure.reason
            );
        }
        self.state.report = Some(report);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.config = Some(config);
        self.backend = Some(backend);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);

        let (Some(window), Some(surface), Some(config), Some(backend)) = (
            &self.window,
            &self.surface,
            &self.config,
            &mut self.backend,
        ) else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(backend.device(), config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        {
            let mut ctx = RenderContext::new(&mut *backend);
            self.state.view.prepare_scene_view(&mut ctx);
            self.state.scene.render_scene(&mut ctx);
        }
        backend.render_frame(&view);

        let (Some(egui_winit), Some(egui_renderer)) =
            (&mut self.egui_winit, &mut self.egui_renderer)
        else {
            output.present();
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = backend.device();
        let queue = backend.queue();
        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize GPU: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(backend), Some(config)) =
                    (&self.surface, &mut self.backend, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(backend.device(), config);
                    backend.resize(config.width, config.height);
                    self.state.view.resize(config.width, config.height);
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
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
                if self.state.quit {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_held = btn_state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.state.mouse_held);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
                };
                self.state.dispatch(InputState::scroll(notches));
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
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
            if self.state.mouse_look_active() {
                self.state.dispatch(InputState::look(delta.0, delta.1));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(backend) = &mut self.backend {
            self.state
                .scene
                .release(&mut RenderContext::new(&mut *backend));
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("stilllife-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.asset_root);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stilllife_view::ProjectionMode;

    #[test]
    fn keys_map_to_viewer_actions() {
        let mut state = AppState::new(PathBuf::from("."));
        state.handle_key(KeyCode::KeyO, true);
        assert_eq!(state.view.projection_mode(), ProjectionMode::Orthographic);
        state.handle_key(KeyCode::F1, true);
        assert!(state.show_inspector);
        state.handle_key(KeyCode::Escape, true);
        assert!(state.quit);
        assert!(map_key(KeyCode::KeyZ).is_none());
    }

    #[test]
    fn mouse_look_needs_button_with_inspector_open() {
        let mut state = AppState::new(PathBuf::from("."));
        assert!(state.mouse_look_active());
        state.show_inspector = true;
        assert!(!state.mouse_look_active());
        state.mouse_held = true;
        assert!(state.mouse_look_active());
    }

    #[test]
    fn held_key_moves_camera_on_update() {
        let mut state = AppState::new(PathBuf::from("."));
        let start = state.view.camera().position;
        let up = state.view.camera().up();
        state.handle_key(KeyCode::KeyE, true);
        state.update(0.5);
        assert!(state.view.camera().position.abs_diff_eq(start + up * 10.0, 1e-3));
    }
}
