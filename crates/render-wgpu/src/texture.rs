use image::{RgbaImage, imageops};
use stilllife_render::{PixelFormat, RenderError, TextureUpload};

pub(crate) const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// One level of a mip chain, tightly packed RGBA8.
#[derive(Debug)]
pub(crate) struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

fn to_rgba(upload: &TextureUpload<'_>) -> Vec<u8> {
    match upload.format {
        PixelFormat::Rgba8 => upload.pixels.to_vec(),
        PixelFormat::Rgb8 => upload
            .pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
            .collect(),
    }
}

/// Expand to RGBA8 and downsample level by level to 1x1.
pub(crate) fn mip_chain(upload: &TextureUpload<'_>) -> Result<Vec<MipLevel>, RenderError> {
    upload.validate()?;
    let base = RgbaImage::from_raw(upload.width, upload.height, to_rgba(upload))
        .ok_or_else(|| RenderError::Backend("pixel buffer does not fit extent".into()))?;

    let mut levels = Vec::with_capacity(upload.mip_level_count() as usize);
    let mut current = base;
    loop {
        let (w, h) = current.dimensions();
        let next = (w > 1 || h > 1).then(|| {
            imageops::resize(
                &current,
                (w / 2).max(1),
                (h / 2).max(1),
                imageops::FilterType::Triangle,
            )
        });
        levels.push(MipLevel {
            width: w,
            height: h,
            pixels: current.into_raw(),
        });
        match next {
            Some(image) => current = image,
            None => break,
        }
    }
    Ok(levels)
}

/// A sampled texture and its group-2 bind group.
pub(crate) struct GpuTexture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        levels: &[MipLevel],
    ) -> Self {
        let (width, height) = levels
            .first()
            .map(|l| (l.width, l.height))
            .unwrap_or((1, 1));
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
        }
    }
}

pub(crate) fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("object_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
