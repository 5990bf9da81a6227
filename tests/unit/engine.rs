use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures::future::{BoxFuture, FutureExt};

use super::*;
use crate::assets::decode::DecodedImage;
use crate::foundation::error::PosterError;
use crate::model::descriptor::TextItem;
use crate::render::surface::tests::{Op, RecordingSurface};

/// Serves 8x4 images; `broken.png` fails while `broken` is set.
#[derive(Default)]
struct SwitchLoader {
    broken: AtomicBool,
    calls: AtomicUsize,
}

impl ResourceLoader for SwitchLoader {
    fn load<'a>(&'a self, source: &'a str) -> BoxFuture<'a, PosterResult<DecodedImage>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if source == "broken.png" && self.broken.load(Ordering::SeqCst) {
                return Err(PosterError::load(source, "connection reset"));
            }
            Ok(DecodedImage {
                width: 8,
                height: 4,
                rgba8_premul: Arc::new(vec![255; 8 * 4 * 4]),
            })
        }
        .boxed()
    }
}

fn engine(ratio: f64) -> PosterRender<RecordingSurface, SwitchLoader> {
    PosterRender::with_parts(ratio, RecordingSurface::default(), SwitchLoader::default()).unwrap()
}

fn texts(engine: &PosterRender<RecordingSurface, SwitchLoader>) -> Vec<TextItem> {
    engine
        .descriptors()
        .iter()
        .filter_map(|d| match d {
            RenderDescriptor::Text(t) => Some(t.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn rejects_invalid_pixel_ratio() {
    for ratio in [0.0, -1.0, f64::NAN] {
        let err =
            PosterRender::with_parts(ratio, RecordingSurface::default(), SwitchLoader::default())
                .unwrap_err();
        assert!(matches!(err, PosterError::Validation(_)));
    }
}

#[test]
fn emphasis_splits_into_styled_fragments() {
    let mut e = engine(1.0);
    let style = TextStyle::new("20px sans", "#000").with_highlight("bold 20px sans", "#f00");
    assert_eq!(e.add_text("**VIP** user", &style, 0.0, 0.0, 200.0, 0.0), 2);

    let items = texts(&e);
    assert_eq!(items[0].text, "VIP");
    assert_eq!(items[0].font, "bold 20px sans");
    assert_eq!(items[0].fill_style, "#f00");
    assert_eq!(items[1].text, " user");
    assert_eq!(items[1].font, "20px sans");
    assert_eq!(items[1].fill_style, "#000");
    assert_eq!(items[1].x, items[0].x + 60.0);
}

#[test]
fn highlight_defaults_to_base_style() {
    let mut e = engine(1.0);
    e.add_text("a**b**", &TextStyle::new("10px x", "red"), 0.0, 0.0, 100.0, 0.0);
    let items = texts(&e);
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|t| t.font == "10px x" && t.fill_style == "red"));
}

#[test]
fn lengths_and_fonts_are_scaled_but_angles_are_not() {
    let mut e = engine(2.0);
    e.add_rect(1.0, 2.0, 10.0, 10.0, "#fff", 3.0);
    e.add_image("a.png", 1.0, 1.0, 5.0, 6.0, FitMode::Cover, 2.0, 45.0);
    let style = TextStyle::new("bold 10px sans", "#000").with_line_height(12.0);
    e.add_text("hi", &style, 3.0, 4.0, 50.0, 30.0);

    let d = e.descriptors();
    let RenderDescriptor::Rect(rect) = &d[0] else {
        panic!("expected rect");
    };
    assert_eq!(
        (rect.x, rect.y, rect.width, rect.height, rect.border_radius),
        (2.0, 4.0, 20.0, 20.0, 6.0)
    );
    let RenderDescriptor::Image(img) = &d[1] else {
        panic!("expected image");
    };
    assert_eq!((img.width, img.height, img.border_radius), (10.0, 12.0, 4.0));
    assert_eq!(img.rotate, 45.0);
    let RenderDescriptor::Text(text) = &d[2] else {
        panic!("expected text");
    };
    assert_eq!(text.font, "bold 20px sans");
    assert_eq!((text.x, text.y, text.rotate), (6.0, 8.0, 30.0));
}

#[test]
fn scaled_line_height_advances_lines() {
    let mut e = engine(2.0);
    let style = TextStyle::new("10px m", "#000")
        .with_lines(2)
        .with_line_height(15.0);
    // 20px per char at ratio 2, 100px wide box: five chars per line.
    e.add_text("1234567890", &style, 0.0, 10.0, 50.0, 0.0);
    let items = texts(&e);
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].text.as_str(), items[0].y), ("12345", 20.0));
    assert_eq!((items[1].text.as_str(), items[1].y), ("67890", 50.0));
}

#[test]
fn zero_line_height_falls_back_to_reference_glyph() {
    let mut e = engine(2.0);
    let style = TextStyle::new("10px m", "#000")
        .with_lines(2)
        .with_line_height(0.0);
    e.add_text("1234567890", &style, 0.0, 10.0, 50.0, 0.0);
    let items = texts(&e);
    assert_eq!(items.len(), 2);
    // One 20px reference glyph below the first line.
    assert_eq!((items[0].y, items[1].y), (20.0, 40.0));
}

#[test]
fn qr_codes_get_distinct_ids() {
    let mut e = engine(1.0);
    let a = e.add_qr_code("qr.png", 0.0, 0.0, 10.0, 10.0, 0.0);
    let b = e.add_qr_code("qr.png", 0.0, 0.0, 10.0, 10.0, 0.0);
    assert_ne!(a, b);
}

#[tokio::test]
async fn failed_render_keeps_queue_and_retry_clears_it() {
    let mut e = engine(1.0);
    e.loader().broken.store(true, Ordering::SeqCst);
    e.add_rect(0.0, 0.0, 10.0, 10.0, "#fff", 0.0);
    e.add_image("ok.png", 0.0, 0.0, 10.0, 10.0, FitMode::Full, 0.0, 0.0);
    e.add_image("broken.png", 0.0, 0.0, 10.0, 10.0, FitMode::Full, 0.0, 0.0);

    let err = e.render().await.unwrap_err();
    assert!(err.is_load());
    assert_eq!(e.descriptors().len(), 3);
    // Nothing was painted.
    assert!(e.surface().ops.is_empty());

    e.loader().broken.store(false, Ordering::SeqCst);
    let png = e.render().await.unwrap();
    assert_eq!(png, b"png");
    assert!(e.descriptors().is_empty());
    assert_eq!(e.surface().ops.first(), Some(&Op::Begin));
    assert_eq!(e.surface().ops.last(), Some(&Op::Export));
}

#[tokio::test]
async fn deferred_qr_payload_is_awaited_before_painting() {
    let mut e = engine(1.0);
    let (tx, rx) = futures::channel::oneshot::channel::<String>();
    e.add_qr_code(
        QrPayload::deferred(async move {
            rx.await
                .map_err(|_| PosterError::validation("qr payload dropped"))
        }),
        0.0,
        0.0,
        30.0,
        30.0,
        0.0,
    );
    tx.send("qr.png".to_owned()).unwrap();
    e.render().await.unwrap();

    let draws: Vec<_> = e
        .surface()
        .ops
        .iter()
        .filter(|op| matches!(op, Op::DrawImage { .. }))
        .collect();
    assert_eq!(draws.len(), 1);
}

#[tokio::test]
async fn paint_order_depends_only_on_call_order() {
    async fn run() -> Vec<Op> {
        let mut e = engine(1.5);
        e.add_rect(0.0, 0.0, 100.0, 100.0, "#eee", 8.0);
        e.add_image("a.png", 10.0, 10.0, 40.0, 40.0, FitMode::Contain, 4.0, 0.0);
        e.add_text(
            "hello **world** again",
            &TextStyle::new("12px s", "#333").with_lines(2),
            5.0,
            70.0,
            60.0,
            0.0,
        );
        e.add_qr_code("qr.png", 60.0, 60.0, 30.0, 30.0, 0.0);
        e.render().await.unwrap();
        std::mem::take(&mut e.surface_mut().ops)
    }
    assert_eq!(run().await, run().await);
}

#[tokio::test]
async fn render_data_url_wraps_png() {
    let mut e = engine(1.0);
    let url = e.render_data_url().await.unwrap();
    assert_eq!(url, "data:image/png;base64,cG5n");
}
