//! Fit a bitmap onto a single A4 page and write it as PDF

use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub const PAGE_LONG_MM: f64 = 297.0;
pub const PAGE_SHORT_MM: f64 = 210.0;
pub const MARGIN_MM: f64 = 10.0;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Where the image lands on the page, in millimetres from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfPlacement {
    pub orientation: Orientation,
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub x_mm: f64,
    pub y_mm: f64,
}

/// Scale a `px_width`×`px_height` bitmap into the 277×190 mm usable area of
/// a landscape A4 page, keeping its aspect ratio, then centre it.
///
/// Images that come out taller than wide go on a portrait page instead and
/// are centred on that page.
pub fn fit_to_page(px_width: u32, px_height: u32) -> PdfPlacement {
    let usable_w = PAGE_LONG_MM - 2.0 * MARGIN_MM;
    let usable_h = PAGE_SHORT_MM - 2.0 * MARGIN_MM;
    let aspect = px_height.max(1) as f64 / px_width.max(1) as f64;

    let mut width = usable_w;
    let mut height = width * aspect;
    if height > usable_h {
        height = usable_h;
        width = height / aspect;
    }

    let orientation = if width > height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    let (page_w, page_h) = match orientation {
        Orientation::Landscape => (PAGE_LONG_MM, PAGE_SHORT_MM),
        Orientation::Portrait => (PAGE_SHORT_MM, PAGE_LONG_MM),
    };

    PdfPlacement {
        orientation,
        page_width_mm: page_w,
        page_height_mm: page_h,
        width_mm: width,
        height_mm: height,
        x_mm: (page_w - width) / 2.0,
        y_mm: (page_h - height) / 2.0,
    }
}

/// One-page PDF with `image` drawn at `placement`.
pub fn write_pdf(image: &RgbaImage, placement: &PdfPlacement) -> lopdf::Result<Vec<u8>> {
    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb,
    ));

    // PDF space has its origin bottom-left
    let w = placement.width_mm * POINTS_PER_MM;
    let h = placement.height_mm * POINTS_PER_MM;
    let x = placement.x_mm * POINTS_PER_MM;
    let y = (placement.page_height_mm - placement.y_mm - placement.height_mm) * POINTS_PER_MM;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![real(w), 0.into(), 0.into(), real(h), real(x), real(y)],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![
            0.into(),
            0.into(),
            real(placement.page_width_mm * POINTS_PER_MM),
            real(placement.page_height_mm * POINTS_PER_MM),
        ],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

fn real(value: f64) -> Object {
    (value as f32).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_wide_image_fills_width() {
        let p = fit_to_page(2770, 1000);
        assert!(approx(p.width_mm, 277.0));
        assert!(approx(p.height_mm, 100.0));
        assert!(approx(p.x_mm, 10.0));
        assert!(approx(p.y_mm, 55.0));
        assert_eq!(p.orientation, Orientation::Landscape);
    }

    #[test]
    fn test_tall_image_goes_portrait() {
        let p = fit_to_page(500, 1000);
        assert!(approx(p.height_mm, 190.0));
        assert!(approx(p.width_mm, 95.0));
        assert_eq!(p.orientation, Orientation::Portrait);
        assert!(approx(p.page_width_mm, PAGE_SHORT_MM));
        assert!(approx(p.x_mm, (210.0 - 95.0) / 2.0));
        assert!(approx(p.y_mm, (297.0 - 190.0) / 2.0));
    }
}
