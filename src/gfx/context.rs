//! # GPU Context
//!
//! Device and queue ownership. The simulation core only borrows a
//! [`GpuContext`]; creating one (for a window or headless) is setup plumbing.

use std::sync::Arc;

use log::info;

use crate::error::{LifeError, Result};

/// Shared handles to the wgpu device and its queue.
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Create an instance suitable for surface creation.
    pub fn instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Create a context able to present to `surface`.
    pub async fn for_surface(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<Self> {
        Self::from_instance(instance, Some(surface)).await
    }

    /// Create a context with no presentation surface.
    pub async fn headless() -> Result<Self> {
        Self::from_instance(&Self::instance(), None).await
    }

    async fn from_instance(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Life Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096, // Allow higher resolutions on native
                    ..wgpu::Limits::downlevel_defaults()
                },
                ..Default::default()
            })
            .await?;

        Ok(Self {
            adapter,
            device: device.into(),
            queue: queue.into(),
        })
    }

    /// Map a `MAP_READ` staging buffer and copy its contents out.
    ///
    /// Blocks until the device has finished all submitted work, so the copy
    /// into `staging` must already be submitted.
    pub fn map_read(&self, staging: &wgpu::Buffer) -> Result<Vec<u8>> {
        let buffer_slice = staging.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|err| LifeError::Device(err.to_string()))?;

        pollster::block_on(rx)
            .map_err(|_| LifeError::Device("buffer map callback was dropped".to_string()))??;

        let bytes = buffer_slice.get_mapped_range().to_vec();
        staging.unmap();
        Ok(bytes)
    }
}
