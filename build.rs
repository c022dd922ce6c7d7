extern crate image;
use std::{env, fs};
use std::path::PathBuf;
use image::{Rgba, RgbaImage};

const ICON_SIZE: u32 = 32;
const BRAND: Rgba<u8> = Rgba([0x00, 0xE6, 0x76, 0xFF]);
const INK: Rgba<u8> = Rgba([0x0A, 0x0A, 0x0A, 0xFF]);

fn out_dir() -> String {
    env::var("OUT_DIR").expect("No OUT_DIR env var")
}

// A green disc with a dark ring, the window icon of the app.
fn draw_icon() -> RgbaImage {
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance > radius {
            Rgba([0, 0, 0, 0])
        } else if (distance - radius * 0.55).abs() < 2.0 {
            INK
        } else {
            BRAND
        }
    })
}

fn build_window_icon() {
    let out_path: PathBuf = [out_dir().as_str(), "icon-32-rgba"].iter().collect();

    let rgba = draw_icon().into_raw();
    fs::write(&out_path, rgba).expect("Failed to write window icon");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    build_window_icon();
}
