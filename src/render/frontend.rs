use winit::window::Window;

use super::painter::{PainterCanvas, TextureRegistry};
use super::GpuState;
use crate::assets::SheetImage;
use crate::canvas::{Canvas, ImageId};

/// egui context + wgpu renderer that turns scene draw calls into GPU work.
pub struct Frontend {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    textures: TextureRegistry,
}

/// Tessellated output of one frame, ready for upload.
pub struct FrameOutput {
    pub primitives: Vec<egui::epaint::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
}

impl Frontend {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            textures: TextureRegistry::default(),
        }
    }

    /// Upload a sprite sheet and make it drawable as `id`.
    pub fn register_image(&mut self, id: ImageId, name: &str, sheet: &SheetImage) {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [sheet.width as usize, sheet.height as usize],
            &sheet.rgba,
        );
        let handle = self
            .egui_ctx
            .load_texture(name, image, egui::TextureOptions::NEAREST);
        self.textures.insert(id, handle);
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// Run one egui frame, handing `draw` a canvas over the background layer.
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
        mut draw: impl FnMut(&mut dyn Canvas),
    ) -> FrameOutput {
        let raw_input = self.egui_state.take_egui_input(window);

        let ctx = self.egui_ctx.clone();
        let textures = &self.textures;
        let full_output = ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let mut canvas = PainterCanvas::new(painter, textures);
            draw(&mut canvas);
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        FrameOutput {
            primitives,
            textures_delta: full_output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [screen_w, screen_h],
                pixels_per_point,
            },
        }
    }

    /// Upload egui textures and buffers. Call before the scene render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &FrameOutput,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &frame.screen_descriptor,
        )
    }

    /// Render egui into the given render pass.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'static>, frame: &FrameOutput) {
        self.egui_renderer
            .render(render_pass, &frame.primitives, &frame.screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, frame: &FrameOutput) {
        for id in &frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
