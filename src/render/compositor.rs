use crate::assets::decode::DecodedImage;
use crate::assets::loader::short_reference;
use crate::assets::resolver::ResourceTable;
use crate::foundation::core::{Point, Rect, Size, rotation_radians};
use crate::foundation::error::{PosterError, PosterResult};
use crate::geometry::fit::resolve_fit;
use crate::geometry::rounded::rounded_rect_path;
use crate::model::descriptor::{ImageItem, RectItem, RenderDescriptor, TextItem};
use crate::render::surface::DrawingSurface;

/// Paint `items` onto `surface` in order.
///
/// Every item is painted between a `save`/`restore` pair so its clip and rotation never leak
/// into later items. Images and QR codes must already be present in `resources`.
pub fn composite<S: DrawingSurface + ?Sized>(
    items: &[RenderDescriptor],
    resources: &ResourceTable,
    surface: &mut S,
) -> PosterResult<()> {
    surface.begin();
    for (i, item) in items.iter().enumerate() {
        tracing::trace!(index = i, kind = item.kind(), "paint");
        surface.save();
        let painted = paint_item(item, resources, surface);
        surface.restore();
        painted?;
    }
    Ok(())
}

fn paint_item<S: DrawingSurface + ?Sized>(
    item: &RenderDescriptor,
    resources: &ResourceTable,
    surface: &mut S,
) -> PosterResult<()> {
    match item {
        RenderDescriptor::Image(img) => {
            if img.source.is_empty() {
                tracing::warn!(x = img.x, y = img.y, "image with empty source skipped");
                return Ok(());
            }
            let image = resources.source(&img.source).ok_or_else(|| {
                PosterError::load(short_reference(&img.source), "image was not resolved")
            })?;
            paint_image(img, image, surface)
        }
        RenderDescriptor::QrCode(qr) => {
            let image = resources
                .qr_code(qr.id)
                .ok_or_else(|| PosterError::load(qr.id.to_string(), "qr code was not resolved"))?;
            paint_image(&qr.as_image(), image, surface)
        }
        RenderDescriptor::Text(text) => {
            paint_text(text, surface);
            Ok(())
        }
        RenderDescriptor::Rect(rect) => {
            paint_rect(rect, surface);
            Ok(())
        }
    }
}

fn item_box(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::from_origin_size(Point::new(x, y), Size::new(width, height))
}

fn paint_image<S: DrawingSurface + ?Sized>(
    item: &ImageItem,
    image: &DecodedImage,
    surface: &mut S,
) -> PosterResult<()> {
    let target = item_box(item.x, item.y, item.width, item.height);
    let dest = resolve_fit(target, image.size(), item.fit_mode)?;

    // Clip in the unrotated space, then rotate what is drawn inside it.
    if item.border_radius > 0.0 {
        surface.clip(&rounded_rect_path(target, item.border_radius));
    }
    if item.rotate != 0.0 {
        surface.rotate(rotation_radians(item.rotate));
    }
    surface.draw_image(image, dest)
}

fn paint_text<S: DrawingSurface + ?Sized>(item: &TextItem, surface: &mut S) {
    if item.rotate != 0.0 {
        surface.rotate(rotation_radians(item.rotate));
    }
    surface.fill_text(&item.text, &item.font, &item.fill_style, item.x, item.y);
}

fn paint_rect<S: DrawingSurface + ?Sized>(item: &RectItem, surface: &mut S) {
    let path = rounded_rect_path(
        item_box(item.x, item.y, item.width, item.height),
        item.border_radius,
    );
    surface.fill_path(&path, &item.style);
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
