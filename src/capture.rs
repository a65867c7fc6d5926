//! Frame capture to PNG.
//!
//! The current frame is drawn a second time into an offscreen texture with
//! the surface format, copied into a mappable buffer and written with the
//! `image` crate. Buffer rows are padded to
//! [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`], so the padding is stripped again
//! before encoding.

use std::path::Path;

use anyhow::{Context as _, bail};

use crate::{context::Context, data_structures::texture::Texture, flow::GraphicsFlow};

const BYTES_PER_PIXEL: u32 = 4;

/// Bytes per buffer row for an image `width` pixels wide.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strips row padding and converts the texel layout to RGBA8.
pub fn unpad_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> anyhow::Result<Vec<u8>> {
    let swizzle = match format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
        other => bail!("cannot capture frames with surface format {:?}", other),
    };
    let padded = padded_bytes_per_row(width) as usize;
    let unpadded = (width * BYTES_PER_PIXEL) as usize;
    if data.len() < padded * height as usize {
        bail!(
            "readback buffer holds {} bytes, expected {}",
            data.len(),
            padded * height as usize
        );
    }
    let mut pixels = Vec::with_capacity(unpadded * height as usize);
    for row in data.chunks(padded).take(height as usize) {
        pixels.extend_from_slice(&row[..unpadded]);
    }
    if swizzle {
        pixels.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
    }
    Ok(pixels)
}

/// Renders the flows once more into an offscreen target and saves it as PNG.
pub async fn save_frame<State, Event>(
    ctx: &Context,
    graphics_flows: &[Box<dyn GraphicsFlow<State, Event>>],
    path: &Path,
) -> anyhow::Result<()> {
    let (width, height) = (ctx.config.width, ctx.config.height);
    let format = ctx.config.format;
    let target = Texture::create_readback_target(
        &ctx.device,
        [width, height],
        format,
        "Capture Texture",
    );

    let padded = padded_bytes_per_row(width);
    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Capture Buffer"),
        size: (padded * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Capture Encoder"),
        });
    crate::flow::draw_flows(ctx, graphics_flows, &mut encoder, &target.view);
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    ctx.device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })
        .context("Waiting for the capture copy failed")?;
    rx.receive()
        .await
        .context("Capture buffer mapping was dropped")?
        .context("Cannot map the capture buffer")?;

    let pixels = {
        let data = buffer_slice.get_mapped_range();
        unpad_to_rgba(&data, width, height, format)?
    };
    output_buffer.unmap();

    let image = image::RgbaImage::from_raw(width, height, pixels)
        .context("Captured pixels do not fill the image")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}
