use super::helpers;

/// Multisampled color and depth attachments sized to the surface.
///
/// The color target resolves into the swapchain texture each frame.
pub(crate) struct RenderTargets {
    pub(crate) msaa_tex: wgpu::Texture,
    pub(crate) msaa_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    color_format: wgpu::TextureFormat,
    pub(crate) sample_count: u32,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let (msaa_tex, msaa_view) =
            helpers::create_attachment(device, "msaa_color", width, height, color_format, sample_count);
        let (depth_tex, depth_view) = helpers::create_attachment(
            device,
            "depth",
            width,
            height,
            helpers::DEPTH_FORMAT,
            sample_count,
        );
        Self {
            msaa_tex,
            msaa_view,
            depth_tex,
            depth_view,
            color_format,
            sample_count,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height, self.color_format, self.sample_count);
    }
}
