//! # Frame Targets
//!
//! A [`FrameTarget`] hands out the image the renderer draws into for one tick.
//! [`SurfaceTarget`] wraps a window swapchain; [`OffscreenTarget`] renders into
//! a plain texture for headless runs and tests.

use log::warn;

use super::context::GpuContext;
use crate::error::{LifeError, Result};

/// One acquired output image.
pub struct Frame {
    pub view: wgpu::TextureView,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl Frame {
    /// Present the image if it belongs to a swapchain.
    pub fn present(self) {
        if let Some(surface_texture) = self.surface_texture {
            surface_texture.present();
        }
    }
}

/// Source of output images for [`crate::gfx::rendering::FrameRenderer`].
pub trait FrameTarget {
    /// Color format of the images returned by [`FrameTarget::acquire`].
    fn format(&self) -> wgpu::TextureFormat;

    /// Acquire the image to render the next frame into.
    fn acquire(&mut self, ctx: &GpuContext) -> Result<Frame>;
}

/// Swapchain-backed target for a window surface.
pub struct SurfaceTarget {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

/// First non-sRGB format, else the first format offered.
fn preferred_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

impl SurfaceTarget {
    pub fn new(
        surface: wgpu::Surface<'static>,
        ctx: &GpuContext,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let surface_capabilities = surface.get_capabilities(&ctx.adapter);
        let format = preferred_format(&surface_capabilities.formats)
            .ok_or(LifeError::IncompatibleSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // Fifo and Auto are supported everywhere a surface is.
            present_mode: surface_capabilities
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);

        Ok(Self { surface, config })
    }

    pub fn resize(&mut self, ctx: &GpuContext, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&ctx.device, &self.config);
    }
}

impl FrameTarget for SurfaceTarget {
    fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn acquire(&mut self, ctx: &GpuContext) -> Result<Frame> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            // Stale swapchain after a resize or mode switch: reconfigure once.
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                warn!("Surface outdated, reconfiguring");
                self.surface.configure(&ctx.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(err) => return Err(err.into()),
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.config.format),
                ..Default::default()
            });

        Ok(Frame {
            view,
            surface_texture: Some(surface_texture),
        })
    }
}

/// Texture-backed target with no presentation.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    format: wgpu::TextureFormat,
}

impl OffscreenTarget {
    pub fn new(ctx: &GpuContext, width: u32, height: u32) -> Self {
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Frame Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Self { texture, format }
    }

    /// Copy the rendered image back to the host, one RGBA texel per pixel in
    /// row-major order from the top-left corner.
    pub fn read_pixels(&self, ctx: &GpuContext) -> Result<Vec<[u8; 4]>> {
        let width = self.texture.width();
        let height = self.texture.height();
        let unpadded_bytes_per_row = width * 4;
        let bytes_per_row =
            unpadded_bytes_per_row.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        let staging_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Offscreen Frame Staging Buffer"),
            size: bytes_per_row as wgpu::BufferAddress * height as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Frame Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            self.texture.size(),
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let bytes = ctx.map_read(&staging_buffer)?;
        Ok(bytes
            .chunks_exact(bytes_per_row as usize)
            .flat_map(|row| row[..unpadded_bytes_per_row as usize].chunks_exact(4))
            .map(|texel| [texel[0], texel[1], texel[2], texel[3]])
            .collect())
    }
}

impl FrameTarget for OffscreenTarget {
    fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn acquire(&mut self, _ctx: &GpuContext) -> Result<Frame> {
        Ok(Frame {
            view: self
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            surface_texture: None,
        })
    }
}
