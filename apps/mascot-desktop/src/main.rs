use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::{EulerRot, Quat, Vec3};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use mascot_chat::{AvatarState, ChatEngine, CompletionClient, CompletionConfig};
use mascot_common::Transform;
use mascot_frame::{FrameLoop, FrameTick, FrameTimer};
use mascot_geometry::{GeometryDesc, Material};
use mascot_guestbook::{GuestbookEntry, GuestbookStore};
use mascot_input::{DragTracker, PointerState};
use mascot_pose::{AvatarFlags, AvatarPose, AvatarRig, Mood, ShapeField};
use mascot_render::{palette_index_for_click, OrbitCamera, ResumePolicy, PALETTES};
use mascot_render_wgpu::WgpuSceneRenderer;
use mascot_scene::{NodeId, SceneGraph, SceneGraphBuilder, ShapeDesc};
use mascot_tools::{PoseInspector, SceneInspector};

/// Pixels of motion separating a click from a drag.
const CLICK_SLOP: f32 = 5.0;
/// Second click within this window counts as a double-click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(350);
/// Seconds the avatar keeps talking after a chat reply lands.
const TALK_DURATION: f32 = 2.0;

#[derive(Parser)]
#[command(name = "mascot-desktop", about = "Mascot desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Guestbook store file
    #[arg(long, default_value = "./guestbook.jsonl")]
    guestbook: String,

    /// Camera behavior after a drag ends: immediate, cooldown, never
    #[arg(long, default_value = "immediate")]
    resume: String,

    /// Seed for the ambient shape field
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// Chat runs on a worker thread so a pending remote call never blocks a
/// frame; replies drain through the channel on the next update.
struct ChatWorker {
    tx: Sender<String>,
    rx: Receiver<String>,
}

impl ChatWorker {
    fn spawn() -> Self {
        let (tx, work_rx) = std::sync::mpsc::channel::<String>();
        let (reply_tx, rx) = std::sync::mpsc::channel::<String>();
        std::thread::spawn(move || {
            let completion = std::env::var("OPENAI_API_KEY").ok().map(|key| {
                CompletionClient::new(CompletionConfig {
                    api_key: Some(key),
                    ..CompletionConfig::default()
                })
            });
            let mut engine = ChatEngine::new(completion);
            while let Ok(input) = work_rx.recv() {
                engine.set_state(AvatarState::Thinking);
                let response = engine.respond(&input);
                if reply_tx.send(response).is_err() {
                    break;
                }
            }
        });
        Self { tx, rx }
    }
}

/// Slow spin rates for the three floating accent rings.
struct RingSpinner {
    node: NodeId,
    rate: Vec3,
}

fn build_scene(seed: u64) -> Result<(SceneGraph, AvatarRig, ShapeField, Vec<RingSpinner>)> {
    let mut builder = SceneGraphBuilder::new();

    let rig = AvatarRig::build(&mut builder, None)?;

    let field_root = builder.group(
        None,
        "field",
        Transform::from_position(Vec3::new(0.0, 0.0, -6.0)),
    )?;
    let field = ShapeField::build(&mut builder, Some(field_root), 20, seed)?;

    // Floating accent rings around the avatar.
    let ring_colors: [[f32; 4]; 3] = [
        [0.659, 0.333, 0.969, 0.7],
        [0.925, 0.282, 0.600, 0.6],
        [0.388, 0.400, 0.945, 0.5],
    ];
    let ring_params = [
        (2.2, 0.015, Vec3::ZERO, Vec3::new(0.3, 0.2, 0.0)),
        (2.5, 0.012, Vec3::new(1.2, 0.0, 0.0), Vec3::new(-0.2, 0.0, 0.25)),
        (2.8, 0.010, Vec3::new(0.6, 0.6, 0.0), Vec3::new(0.0, 0.35, -0.15)),
    ];
    let mut spinners = Vec::new();
    for (i, ((radius, tube, tilt, rate), color)) in
        ring_params.into_iter().zip(ring_colors).enumerate()
    {
        let node = builder.shape(
            None,
            format!("ring_{i}"),
            Transform {
                position: Vec3::new(0.0, -0.5, 0.0),
                rotation: Quat::from_euler(EulerRot::XYZ, tilt.x, tilt.y, tilt.z),
                ..Transform::default()
            },
            ShapeDesc {
                geometry: GeometryDesc::Torus {
                    radius,
                    tube_radius: tube,
                    segments: 100,
                    tube_segments: 16,
                },
                material: Material {
                    base_color: color,
                    emissive: 0.7,
                    roughness: 0.4,
                },
            },
        )?;
        spinners.push(RingSpinner { node, rate });
    }

    // Ambient drifting particles.
    builder.shape(
        None,
        "particles",
        Transform::default(),
        ShapeDesc {
            geometry: GeometryDesc::ParticleCloud {
                count: 20,
                half_extent: 4.0,
                seed,
            },
            material: Material {
                base_color: [0.659, 0.333, 0.969, 0.9],
                emissive: 1.0,
                roughness: 1.0,
            },
        },
    )?;

    let graph = builder.build()?;
    Ok((graph, rig, field, spinners))
}

struct AppState {
    graph: SceneGraph,
    rig: AvatarRig,
    pose: AvatarPose,
    flags: AvatarFlags,
    field: ShapeField,
    spinners: Vec<RingSpinner>,
    palette_index: usize,
    camera: OrbitCamera,
    frame_loop: FrameLoop,
    frame_timer: FrameTimer,
    pointer: PointerState,
    drag: DragTracker,
    surface_size: (f32, f32),
    cursor_px: (f32, f32),
    drag_travel: f32,
    last_click: Option<Instant>,
    talk_timer: f32,
    chat: ChatWorker,
    chat_input: String,
    chat_log: Vec<(bool, String)>,
    chat_pending: bool,
    guestbook: Option<GuestbookStore>,
    guest_entries: Vec<GuestbookEntry>,
    guest_author: String,
    guest_message: String,
    show_inspector: bool,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let (graph, rig, field, spinners) = build_scene(cli.seed)?;

        let resume_policy = match cli.resume.as_str() {
            "cooldown" => ResumePolicy::After(Duration::from_secs(2)),
            "never" => ResumePolicy::Never,
            _ => ResumePolicy::Immediate,
        };
        let mut camera = OrbitCamera::with_resume_policy(resume_policy);
        camera.distance = 12.0;
        camera.min_distance = 6.0;
        camera.max_distance = 20.0;

        let guestbook = match GuestbookStore::open(&cli.guestbook) {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(%err, "guestbook unavailable, continuing without it");
                None
            }
        };
        let guest_entries = guestbook
            .as_ref()
            .and_then(|store| store.load().ok())
            .unwrap_or_default();

        Ok(Self {
            graph,
            rig,
            pose: AvatarPose::new(),
            flags: AvatarFlags::default(),
            field,
            spinners,
            palette_index: 0,
            camera,
            frame_loop: FrameLoop::new(),
            frame_timer: FrameTimer::new(120),
            pointer: PointerState::default(),
            drag: DragTracker::new(),
            surface_size: (1280.0, 720.0),
            cursor_px: (0.0, 0.0),
            drag_travel: 0.0,
            last_click: None,
            talk_timer: 0.0,
            chat: ChatWorker::spawn(),
            chat_input: String::new(),
            chat_log: Vec::new(),
            chat_pending: false,
            guestbook,
            guest_entries,
            guest_author: String::new(),
            guest_message: String::new(),
            show_inspector: true,
        })
    }

    fn set_palette(&mut self, index: usize) {
        self.palette_index = index.min(PALETTES.len() - 1);
        self.field
            .recolor(&PALETTES[self.palette_index].colors, &mut self.graph);
        tracing::info!(palette = self.palette_index, "palette switched");
    }

    fn handle_click(&mut self, now: Instant) {
        let double = self
            .last_click
            .is_some_and(|prev| now.duration_since(prev) <= DOUBLE_CLICK_WINDOW);
        self.last_click = Some(now);

        if double {
            let index =
                palette_index_for_click(self.cursor_px.1, self.surface_size.1, PALETTES.len());
            self.set_palette(index);
        } else {
            // A tap on the scene greets back.
            self.pose.start_wave(1.5);
        }
    }

    fn send_chat(&mut self) {
        let input = self.chat_input.trim().to_string();
        if input.is_empty() || self.chat_pending {
            return;
        }
        self.chat_input.clear();
        self.chat_log.push((true, input.clone()));
        self.chat_pending = true;
        self.flags.mood = Mood::Thinking;
        if self.chat.tx.send(input).is_err() {
            tracing::warn!("chat worker gone; reverting to idle");
            self.chat_pending = false;
            self.flags.mood = Mood::Idle;
        }
    }

    fn sign_guestbook(&mut self) {
        let author = self.guest_author.trim().to_string();
        let message = self.guest_message.trim().to_string();
        if author.is_empty() || message.is_empty() {
            return;
        }
        let Some(store) = self.guestbook.as_mut() else {
            return;
        };
        let entry = GuestbookEntry {
            author,
            message,
            unix_time_ms: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        };
        match store.append(&entry) {
            Ok(()) => {
                self.guest_entries.push(entry);
                self.guest_message.clear();
            }
            Err(err) => tracing::warn!(%err, "failed to sign guestbook"),
        }
    }

    /// One frame of simulation from a clamped tick.
    fn update(&mut self, tick: FrameTick) {
        let t = tick.elapsed_secs();
        let dt = tick.delta_secs();
        self.frame_timer.record(tick.delta);

        // Drain chat replies; a reply sets the avatar talking for a bit.
        while let Ok(reply) = self.chat.rx.try_recv() {
            self.chat_log.push((false, reply));
            self.chat_pending = false;
            self.talk_timer = TALK_DURATION;
            self.flags.mood = Mood::Excited;
        }
        self.talk_timer = (self.talk_timer - dt).max(0.0);
        self.flags.talking = self.talk_timer > 0.0;

        let drag_delta = self.drag.take_delta();
        self.drag_travel += drag_delta.length();
        self.camera.drag(drag_delta.x, drag_delta.y);
        self.camera.update(dt);

        self.pose.update(t, dt, self.pointer, self.flags);
        self.pose.apply(&self.rig, &mut self.graph);
        self.field.update(t, &mut self.graph);
        for spinner in &self.spinners {
            let angles = spinner.rate * t;
            if let Some(local) = self.graph.local_mut(spinner.node) {
                local.rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
            }
        }
        self.graph.propagate();
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        egui::SidePanel::left("inspector")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Mascot");
                ui.separator();

                let summary = SceneInspector::summary(&self.graph);
                ui.label(summary.to_string());
                ui.label(format!(
                    "Frame: avg {:.2} ms, max {:.2} ms",
                    self.frame_timer.average().as_secs_f64() * 1000.0,
                    self.frame_timer.max().as_secs_f64() * 1000.0
                ));
                ui.label(format!(
                    "Pointer: ({:+.2}, {:+.2})  Camera az={:.2}",
                    self.pointer.x, self.pointer.y, self.camera.azimuth
                ));
                ui.separator();

                ui.heading("Mood");
                ui.horizontal(|ui| {
                    for (label, mood) in [
                        ("Idle", Mood::Idle),
                        ("Excited", Mood::Excited),
                        ("Thinking", Mood::Thinking),
                        ("Talking", Mood::Talking),
                    ] {
                        if ui
                            .selectable_label(self.flags.mood == mood, label)
                            .clicked()
                        {
                            self.flags.mood = mood;
                        }
                    }
                });
                if ui.button("Wave").clicked() {
                    self.pose.start_wave(1.5);
                }
                ui.monospace(PoseInspector::readout(&self.pose).to_string());
                ui.separator();

                ui.heading("Palette");
                ui.horizontal(|ui| {
                    for i in 0..PALETTES.len() {
                        if ui
                            .selectable_label(self.palette_index == i, format!("{i}"))
                            .clicked()
                        {
                            self.set_palette(i);
                        }
                    }
                });
                ui.small("Double-click the scene to pick by height");
                ui.separator();

                ui.heading("Chat");
                for (is_user, text) in self.chat_log.iter().rev().take(6).rev() {
                    let who = if *is_user { "you" } else { "assistant" };
                    ui.label(format!("{who}: {text}"));
                }
                if self.chat_pending {
                    ui.label("assistant is typing...");
                }
                ui.horizontal(|ui| {
                    let response = ui.text_edit_singleline(&mut self.chat_input);
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Send").clicked() || submitted {
                        self.send_chat();
                    }
                });
                ui.separator();

                ui.heading("Guestbook");
                if self.guestbook.is_some() {
                    ui.horizontal(|ui| {
                        ui.label("Name:");
                        ui.text_edit_singleline(&mut self.guest_author);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Note:");
                        ui.text_edit_singleline(&mut self.guest_message);
                    });
                    if ui.button("Sign").clicked() {
                        self.sign_guestbook();
                    }
                    for entry in self.guest_entries.iter().rev().take(5) {
                        ui.small(format!("{}: {}", entry.author, entry.message));
                    }
                } else {
                    ui.small("guestbook unavailable");
                }

                ui.separator();
                ui.small("Drag: orbit | Wheel: zoom | Click: wave | Double-click: palette");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuSceneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Mascot")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
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
                label: Some("mascot_device"),
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
        surface.configure(&device, &config);

        self.state.surface_size = (size.width as f32, size.height.max(1) as f32);
        self.state.camera.aspect = size.width as f32 / size.height.max(1) as f32;

        let renderer = WgpuSceneRenderer::new(
            &device,
            surface_format,
            size.width,
            size.height,
            &self.state.graph,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        // The surface exists now; frames may start.
        self.state.frame_loop.start();

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Symmetric stop: no frame callback may outlive the surface.
        self.state.frame_loop.stop();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.state.frame_loop.stop();
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
                self.state.frame_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.surface_size = (config.width as f32, config.height as f32);
                    self.state.camera.aspect = config.width as f32 / config.height.max(1) as f32;
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (px, py) = (position.x as f32, position.y as f32);
                self.state.cursor_px = (px, py);
                self.state.pointer = PointerState::from_pixels(
                    px,
                    py,
                    self.state.surface_size.0,
                    self.state.surface_size.1,
                );
                self.state.drag.movement(px, py);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => match btn_state {
                ElementState::Pressed => {
                    self.state.drag_travel = 0.0;
                    self.state
                        .drag
                        .press(self.state.cursor_px.0, self.state.cursor_px.1);
                    self.state.camera.begin_drag();
                }
                ElementState::Released => {
                    self.state.drag.release();
                    self.state.camera.end_drag();
                    if self.state.drag_travel < CLICK_SLOP {
                        self.state.handle_click(Instant::now());
                    }
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.state.camera.zoom(-scroll);
            }
            WindowEvent::RedrawRequested => {
                // A missing surface means no frame: the loop no-ops
                // rather than erroring.
                let Some(tick) = self.state.frame_loop.tick(Instant::now()) else {
                    return;
                };
                self.state.update(tick);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
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

                if let Some(renderer) = &self.renderer {
                    renderer.render(device, queue, &view, &self.state.camera, &self.state.graph);
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
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
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("mascot-desktop starting");

    let state = AppState::new(&cli)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
