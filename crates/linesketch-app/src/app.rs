//! Core application state and lifecycle.

use kurbo::Point;
use linesketch_core::input::{InputState, MouseButton, PointerEvent};
use linesketch_core::session::SketchSession;
use linesketch_core::summary::Summary;
use linesketch_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::ui::render_ui;

/// Id of the canvas element the web build draws into.
#[cfg(target_arch = "wasm32")]
const CANVAS_ELEMENT_ID: &str = "sketch-canvas";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub stroke_color: Color,
    /// Line stroke width in logical pixels.
    pub stroke_width: f64,
    /// Width of the line listing panel in logical pixels.
    pub panel_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "LineSketch".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            stroke_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_width: 1.0,
            panel_width: 280.0,
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    sketch_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // State
    session: SketchSession,
    input: InputState,
    /// Panel content as of the last redraw.
    summary: Summary,
    config: AppConfig,
}

impl AppState {
    /// Rebuild the scene and the panel content from the model.
    fn redraw_model(&mut self) {
        let ctx = RenderContext::new(self.session.model())
            .with_scale_factor(self.window.scale_factor())
            .with_stroke(self.config.stroke_color, self.config.stroke_width);
        self.sketch_renderer.build_scene(&ctx);
        self.summary = Summary::from_model(self.session.model());
        self.window.request_redraw();
    }

    /// Feed a pointer event through input translation into the session.
    fn handle_pointer(&mut self, event: PointerEvent) {
        let Some(gesture) = self.input.handle_pointer_event(event) else {
            return;
        };
        if self.session.handle(gesture) {
            self.redraw_model();
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application with default configuration.
    pub async fn run() {
        Self::run_with_config(AppConfig::default()).await;
    }

    /// Run the application.
    pub async fn run_with_config(config: AppConfig) {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::with_config(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            if let Err(e) = event_loop.run_app(&mut app) {
                log::error!("Event loop error: {}", e);
            }
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> RenderResult<()> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("render context missing".to_string()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;

        // Vello renders to Rgba8Unorm; the surface may be Bgra8Unorm (WebGPU).
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!("LineSketch initialized - {}x{}", surface.config.width, surface.config.height);

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            sketch_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            session: SketchSession::new(),
            input: InputState::new(),
            summary: Summary::default(),
            config: self.config.clone(),
        };
        state.redraw_model();

        self.state = Some(state);
        self.pending_window = None;
        Ok(())
    }

    /// Create the window attributes for this platform.
    #[cfg(not(target_arch = "wasm32"))]
    fn window_attributes(&self) -> winit::window::WindowAttributes {
        Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
    }

    /// Create the window attributes for this platform, attaching to the page canvas.
    #[cfg(target_arch = "wasm32")]
    fn window_attributes(&self) -> winit::window::WindowAttributes {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|document| {
                document
                    .get_element_by_id(CANVAS_ELEMENT_ID)
                    .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                    .or_else(|| {
                        let body = document.body()?;
                        let canvas = document.create_element("canvas").ok()?;
                        canvas.set_id(CANVAS_ELEMENT_ID);
                        body.append_child(&canvas).ok()?;
                        canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                    })
            });

        if canvas.is_none() {
            log::warn!("No #{} canvas available; winit will create one", CANVAS_ELEMENT_ID);
        }

        Window::default_attributes()
            .with_title(&self.config.title)
            .with_canvas(canvas)
            .with_append(true)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the current scene and the egui overlay to the window surface.
fn render_frame(state: &mut AppState, render_cx: &vello::util::RenderContext) -> RenderResult<()> {
    let panel_width = state.config.panel_width;
    let egui_input = state.egui_state.take_egui_input(&state.window);
    let summary = &state.summary;
    let egui_output = state.egui_ctx.run(egui_input, |ctx| {
        render_ui(ctx, summary, panel_width);
    });
    state
        .egui_state
        .handle_platform_output(&state.window, egui_output.platform_output);
    let egui_primitives = state
        .egui_ctx
        .tessellate(egui_output.shapes, egui_output.pixels_per_point);

    let device_handle = &render_cx.devices[state.surface.dev_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;

    let surface_texture = state
        .surface
        .surface
        .get_current_texture()
        .map_err(|e| RendererError::Surface(e.to_string()))?;

    let width = state.surface.config.width;
    let height = state.surface.config.height;

    let params = RenderParams {
        base_color: state.config.background_color,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };

    // Vello's compute shaders need a StorageBinding texture, which WebGPU only
    // supports for Rgba8Unorm; the result is blitted to the surface afterwards.
    let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("vello render texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let render_texture_view =
        render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    state
        .vello_renderer
        .render_to_texture(
            device,
            queue,
            state.sketch_renderer.scene(),
            &render_texture_view,
            &params,
        )
        .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

    let surface_view = surface_texture
        .texture
        .create_view(&vello::wgpu::TextureViewDescriptor::default());

    {
        let mut blit_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state
            .texture_blitter
            .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
        queue.submit(std::iter::once(blit_encoder.finish()));
    }

    for (id, image_delta) in &egui_output.textures_delta.set {
        state
            .egui_renderer
            .update_texture(device, queue, *id, image_delta);
    }

    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [width, height],
        pixels_per_point: egui_output.pixels_per_point,
    };

    {
        let mut egui_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });

        state.egui_renderer.update_buffers(
            device,
            queue,
            &mut egui_encoder,
            &egui_primitives,
            &screen_descriptor,
        );

        let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
            label: Some("egui render pass"),
            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                view: &surface_view,
                resolve_target: None,
                ops: vello::wgpu::Operations {
                    load: vello::wgpu::LoadOp::Load, // Keep Vello content
                    store: vello::wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // egui-wgpu wants a 'static render pass.
        let mut render_pass = render_pass.forget_lifetime();
        state
            .egui_renderer
            .render(&mut render_pass, &egui_primitives, &screen_descriptor);
        drop(render_pass);

        queue.submit(std::iter::once(egui_encoder.finish()));
    }

    for id in &egui_output.textures_delta.free {
        state.egui_renderer.free_texture(id);
    }
    surface_texture.present();

    if egui_output
        .viewport_output
        .get(&egui::ViewportId::ROOT)
        .is_some_and(|v| v.repaint_delay.is_zero())
    {
        state.window.request_redraw();
    }

    Ok(())
}

/// Map a winit button onto the buttons the sketch understands.
fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window = match event_loop.create_window(self.window_attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let result = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .map_err(|e| RendererError::Surface(e.to_string()))
            .and_then(|surface| self.finish_init(window, surface));

            if let Err(e) = result {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
            }
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, handle async initialization
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let size = window.inner_size();
                    let width = size.width.max(1);
                    let height = size.height.max(1);

                    // Get raw pointer to self for async callback
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");

                        let mut render_cx = vello::util::RenderContext::new();
                        let surface = render_cx
                            .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                            .await;

                        // SAFETY: WASM is single-threaded and the App is kept
                        // alive by the event loop for the whole session.
                        let app = unsafe { &mut *self_ptr };
                        let result = surface
                            .map_err(|e| RendererError::Surface(e.to_string()))
                            .and_then(|surface| {
                                app.render_cx = Some(render_cx);
                                app.finish_init(window_clone, surface)
                            });

                        if let Err(e) = result {
                            log::error!("Failed to initialize renderer: {}", e);
                            app.init_in_progress.set(false);
                        }
                    });
                }

                // Request redraw to keep the event loop running
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let egui_wants_pointer =
            state.egui_ctx.is_pointer_over_area() || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.redraw_model();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(e) = render_frame(state, render_cx) {
                    log::warn!("Skipped frame: {}", e);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.handle_pointer(PointerEvent::Move {
                    position: Point::new(logical.x, logical.y),
                });
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                let position = state.input.pointer_position;

                match btn_state {
                    ElementState::Pressed => {
                        // Presses on the panel belong to egui
                        if egui_wants_pointer {
                            return;
                        }
                        state.handle_pointer(PointerEvent::Down { position, button });
                    }
                    ElementState::Released => {
                        state.handle_pointer(PointerEvent::Up { position, button });
                    }
                }
            }

            _ => {}
        }
    }
}
