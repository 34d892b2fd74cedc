//! Application event loop and per-frame rendering.
//!
//! One logical thread owns all GPU state and the scene: winit delivers input,
//! resize and redraw callbacks, and the three asynchronous asset loads resume
//! execution on the same thread as user events. Each frame samples the
//! monotonic clock, writes the smoke time uniform, advances the damped camera,
//! issues one draw of the whole scene and reschedules itself via
//! `request_redraw`.

use std::{iter, sync::Arc};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    context::Context,
    model::DrawModel,
    resources,
    scene::{Scene, TextureSwapGate},
    smoke::noise_texture_settings,
    texture::Texture,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Monotonic elapsed-time source. Never reset, never paused.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    started: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Explicit lifecycle for the per-frame loop.
///
/// The clock begins at zero on the first `start()` and keeps counting across
/// `stop()`/`start()` cycles; stopping only suppresses rendering.
#[derive(Debug, Default)]
pub struct RenderLoop {
    clock: Option<Clock>,
    running: bool,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if self.clock.is_none() {
            self.clock = Some(Clock::start());
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time since the first `start()`; zero before that.
    pub fn elapsed(&self) -> Duration {
        self.clock
            .as_ref()
            .map(|clock| clock.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

/// Completion events of the asynchronous asset loads, plus the wasm
/// initialization hand-off.
pub enum SceneEvent {
    #[allow(dead_code)]
    Initialized(AppState),
    ModelLoaded(resources::LoadedModel),
    BakedTextureLoaded(image::DynamicImage),
    NoiseTextureLoaded(image::DynamicImage),
}

/// Application state bundle: GPU context, scene and loop bookkeeping.
#[derive(Debug)]
pub struct AppState {
    pub ctx: Context,
    scene: Scene,
    swap_gate: TextureSwapGate,
    render_loop: RenderLoop,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = Context::new(window).await;
        let ctx = match ctx {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };
        let scene = Scene::new(&ctx.device, &ctx.queue);
        let mut render_loop = RenderLoop::new();
        render_loop.start();
        Self {
            ctx,
            scene,
            swap_gate: TextureSwapGate::default(),
            render_loop,
            is_surface_configured: false,
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        let logical: LogicalSize<u32> = size.to_logical(scale_factor);
        self.ctx
            .viewport
            .resize(logical.width, logical.height, scale_factor);
        self.ctx.projection.resize(logical.width, logical.height);
        let (width, height) = self.ctx.viewport.render_size();
        self.ctx.config.width = width;
        self.ctx.config.height = height;
        self.is_surface_configured = true;
        self.ctx
            .surface
            .configure(&self.ctx.device, &self.ctx.config);
        self.ctx.depth_texture =
            Texture::create_depth_texture(&self.ctx.device, [width, height], "depth_texture");
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Reschedule before drawing; the loop has no terminal state.
        self.ctx.window.request_redraw();

        if !self.is_surface_configured || !self.render_loop.is_running() {
            return Ok(());
        }

        let elapsed = self.render_loop.elapsed();
        self.scene.smoke.update(&self.ctx.queue, elapsed);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Opaque geometry first, then the depth-read-only plume on top.
            if let Some(cup) = &self.scene.cup {
                render_pass.set_pipeline(&self.ctx.pipelines.baked);
                render_pass.draw_model(&cup.model, &self.ctx.camera.bind_group);
            }
            render_pass.set_pipeline(&self.ctx.pipelines.smoke);
            self.scene
                .smoke
                .draw(&mut render_pass, &self.ctx.camera.bind_group);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn try_swap(&mut self) {
        if let Some(image) = self.swap_gate.take_ready() {
            if let Err(e) =
                self.scene
                    .swap_baked_texture(&self.ctx.device, &self.ctx.queue, image)
            {
                log::error!("baked texture swap failed: {:#}", e);
            }
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<SceneEvent>,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<SceneEvent>) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            last_time: Instant::now(),
        }
    }
}

fn deliver(proxy: &EventLoopProxy<SceneEvent>, event: SceneEvent) {
    if proxy.send_event(event).is_err() {
        log::warn!("event loop closed before an asset load was delivered");
    }
}

/// Kick off the three independent asset loads. Completion order is not
/// guaranteed; each load resumes on the event loop as a [`SceneEvent`].
fn spawn_asset_loads(
    #[cfg(not(target_arch = "wasm32"))] runtime: &tokio::runtime::Runtime,
    proxy: EventLoopProxy<SceneEvent>,
) {
    let model = {
        let proxy = proxy.clone();
        async move {
            match resources::load_gltf_model(resources::MODEL_PATH).await {
                Ok(model) => deliver(&proxy, SceneEvent::ModelLoaded(model)),
                Err(e) => log::error!("failed to load {}: {:#}", resources::MODEL_PATH, e),
            }
        }
    };
    let baked = {
        let proxy = proxy.clone();
        async move {
            match resources::load_texture_image(resources::BAKED_TEXTURE_PATH).await {
                Ok(image) => deliver(&proxy, SceneEvent::BakedTextureLoaded(image)),
                Err(e) => log::error!("failed to load {}: {:#}", resources::BAKED_TEXTURE_PATH, e),
            }
        }
    };
    let noise = async move {
        match resources::load_texture_image(resources::NOISE_TEXTURE_PATH).await {
            Ok(image) => deliver(&proxy, SceneEvent::NoiseTextureLoaded(image)),
            Err(e) => log::error!("failed to load {}: {:#}", resources::NOISE_TEXTURE_PATH, e),
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    {
        runtime.spawn(model);
        runtime.spawn(baked);
        runtime.spawn(noise);
    }

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(model);
        wasm_bindgen_futures::spawn_local(baked);
        wasm_bindgen_futures::spawn_local(noise);
    }
}

impl ApplicationHandler<SceneEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("coffee smoke");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app_state = self.async_runtime.block_on(AppState::new(window));
            let size = app_state.ctx.window.inner_size();
            let scale_factor = app_state.ctx.window.scale_factor();
            app_state.resize(size, scale_factor);
            spawn_asset_loads(&self.async_runtime, self.proxy.clone());
            self.state = Some(app_state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let app_state = AppState::new(window).await;
                assert!(
                    proxy
                        .send_event(SceneEvent::Initialized(app_state))
                        .is_ok()
                );
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: SceneEvent) {
        match event {
            SceneEvent::Initialized(state) => {
                // The message from the wasm init task.
                self.state = Some(state);
                let app_state = self.state.as_mut().unwrap();
                let size = app_state.ctx.window.inner_size();
                let scale_factor = app_state.ctx.window.scale_factor();
                app_state.resize(size, scale_factor);
                #[cfg(target_arch = "wasm32")]
                spawn_asset_loads(self.proxy.clone());
                app_state.ctx.window.request_redraw();
            }
            SceneEvent::ModelLoaded(model) => {
                if let Some(state) = &mut self.state {
                    match state
                        .scene
                        .attach_cup(&state.ctx.device, &state.ctx.queue, model)
                    {
                        Ok(_) => state.swap_gate.model_attached(),
                        Err(e) => log::error!("failed to attach model: {:#}", e),
                    }
                    state.try_swap();
                }
            }
            SceneEvent::BakedTextureLoaded(image) => {
                if let Some(state) = &mut self.state {
                    state.swap_gate.replacement_loaded(image);
                    state.try_swap();
                }
            }
            SceneEvent::NoiseTextureLoaded(image) => {
                if let Some(state) = &mut self.state {
                    match Texture::from_image(
                        &state.ctx.device,
                        &state.ctx.queue,
                        &image,
                        noise_texture_settings(),
                        resources::NOISE_TEXTURE_PATH,
                    ) {
                        Ok(texture) => {
                            state.scene.smoke.set_noise_texture(&state.ctx.device, texture)
                        }
                        Err(e) => log::error!("failed to upload noise texture: {:#}", e),
                    }
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let Some(state) = &mut self.state {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => {
                state.render_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let scale_factor = state.ctx.window.scale_factor();
                state.resize(size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size, scale_factor);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                // The damped controls must advance before the draw call.
                state
                    .ctx
                    .camera
                    .controller
                    .update(&mut state.ctx.camera.camera, dt);
                state
                    .ctx
                    .camera
                    .uniform
                    .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                state.ctx.queue.write_buffer(
                    &state.ctx.camera.buffer,
                    0,
                    bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                );

                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        let scale_factor = state.ctx.window.scale_factor();
                        state.resize(size, scale_factor);
                    }
                    Err(e) => {
                        log::error!("unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Install the logger, build the event loop and run the scene until the
/// window closes.
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<SceneEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop);
    event_loop.run_app(&mut app)?;

    Ok(())
}
