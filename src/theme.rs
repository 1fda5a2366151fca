//! Blue report palette, shared by the PDF renderer and the chart data.

use crate::types::Category;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub title: Rgb8,
    pub heading: Rgb8,
    pub body_text: Rgb8,
    pub table_header_bg: Rgb8,
    pub table_header_text: Rgb8,
    pub grid: Rgb8,
    /// Alternating body row backgrounds.
    pub row_bands: [Rgb8; 2],
    pub category: [Rgb8; 4],
    pub operation_source: [Rgb8; 2],
    pub operation_value: [Rgb8; 3],
    pub title_size: f32,
    pub heading_size: f32,
    pub subheading_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn category_color(&self, category: Category) -> Rgb8 {
        self.category[category.index()]
    }
}

pub static THEME: Theme = Theme {
    title: Rgb8(0x1e, 0x3a, 0x8a),
    heading: Rgb8(0x25, 0x63, 0xeb),
    body_text: Rgb8(0x17, 0x25, 0x54),
    table_header_bg: Rgb8(0x1e, 0x3a, 0x8a),
    table_header_text: Rgb8(0xf5, 0xf5, 0xf5),
    grid: Rgb8(0x80, 0x80, 0x80),
    row_bands: [Rgb8(0xff, 0xff, 0xff), Rgb8(0xf0, 0xf8, 0xff)],
    category: [
        Rgb8(0x1e, 0x3a, 0x8a),
        Rgb8(0x3b, 0x82, 0xf6),
        Rgb8(0x93, 0xc5, 0xfd),
        Rgb8(0xe0, 0xf2, 0xfe),
    ],
    operation_source: [Rgb8(0x1e, 0x3a, 0x8a), Rgb8(0x60, 0xa5, 0xfa)],
    operation_value: [
        Rgb8(0x17, 0x25, 0x54),
        Rgb8(0x25, 0x63, 0xeb),
        Rgb8(0x93, 0xc5, 0xfd),
    ],
    title_size: 24.0,
    heading_size: 16.0,
    subheading_size: 13.0,
    body_size: 9.0,
};
