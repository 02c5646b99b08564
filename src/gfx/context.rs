//! GPU adapter, device and queue acquisition
//!
//! The simulation never owns a window; it only needs a device and queue. A
//! context is opened headless for tests and offscreen use, or against a
//! surface so that the display pass can render straight into it.

use crate::error::{LifeError, LifeResult};

/// Device, queue and the adapter they were opened on
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Instance over every available backend
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Open a context with no presentation surface
    ///
    /// Prefers a high-performance adapter and falls back to a software
    /// adapter where the platform offers one.
    pub async fn headless() -> LifeResult<Self> {
        let instance = Self::create_instance();

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("No hardware adapter ({}), trying fallback adapter", e);
                instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: None,
                        force_fallback_adapter: true,
                    })
                    .await
                    .map_err(|e| LifeError::graphics(e.to_string()))?
            }
        };

        Self::open(instance, adapter).await
    }

    /// Open a context whose adapter can present to `surface`
    pub async fn for_surface(
        instance: wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> LifeResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| LifeError::graphics(e.to_string()))?;

        Self::open(instance, adapter).await
    }

    async fn open(instance: wgpu::Instance, adapter: wgpu::Adapter) -> LifeResult<Self> {
        // Downlevel limits everywhere except texture size, which the state
        // dimensions are checked against
        let required_limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Life Device"),
                required_features: wgpu::Features::default(),
                required_limits,
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| LifeError::DeviceRequest(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("Uncaptured GPU error: {}", error);
        }));

        let context = GpuContext {
            instance,
            adapter,
            device,
            queue,
        };

        for line in context.info() {
            log::info!("{}", line);
        }

        Ok(context)
    }

    /// Largest width or height a 2D texture may have on this device
    pub fn max_texture_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Human-readable adapter description
    pub fn info(&self) -> Vec<String> {
        let info = self.adapter.get_info();
        vec![
            format!("Adapter = {}", info.name),
            format!("Vendor = {:#06x}", info.vendor),
            format!("Backend = {:?}", info.backend),
            format!("Device type = {:?}", info.device_type),
            format!("Driver = {} {}", info.driver, info.driver_info),
            format!("Max texture size = {}", self.max_texture_size()),
        ]
    }

    /// Problems this device will have running a simulation of the given size
    pub fn warnings(&self, state: (u32, u32), view: (u32, u32)) -> Vec<String> {
        capability_warnings(
            self.adapter.get_info().device_type,
            self.max_texture_size(),
            state,
            view,
        )
    }

    /// Run `f` inside an error scope and return the first error it raised
    pub fn error_scope<T>(
        &self,
        filter: wgpu::ErrorFilter,
        f: impl FnOnce() -> T,
    ) -> (T, Option<wgpu::Error>) {
        self.device.push_error_scope(filter);
        let value = f();
        let error = pollster::block_on(self.device.pop_error_scope());
        (value, error)
    }
}

/// Diagnostic text of a captured device error
///
/// `Display` for validation errors is only a heading; the compiler or
/// validator message is carried in `description`.
pub fn error_message(error: wgpu::Error) -> String {
    match error {
        wgpu::Error::Validation { description, .. } => description,
        wgpu::Error::OutOfMemory { .. } => "out of memory".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn capability_warnings(
    device_type: wgpu::DeviceType,
    max_texture_size: u32,
    (state_width, state_height): (u32, u32),
    (view_width, view_height): (u32, u32),
) -> Vec<String> {
    let mut warnings = Vec::new();

    if device_type == wgpu::DeviceType::Cpu {
        warnings.push(
            "Adapter is a software renderer; large simulations may run slowly".to_string(),
        );
    }

    if state_width > max_texture_size || state_height > max_texture_size {
        warnings.push(format!(
            "Required texture size is {} x {} but max supported texture size is {} x {}",
            state_width, state_height, max_texture_size, max_texture_size
        ));
    }

    if view_width > max_texture_size || view_height > max_texture_size {
        warnings.push(format!(
            "Required view size is {} x {} but max supported texture size is {} x {}",
            view_width, view_height, max_texture_size, max_texture_size
        ));
    }

    warnings
}
