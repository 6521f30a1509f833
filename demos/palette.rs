//! Print the median-cut palette of an image.
//!
//!   cargo run --example palette --release -- <image> [colors] [quality]

use rgb::RGBA8;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let input = args.get(1).expect("usage: palette <image> [colors] [quality]");
    let colors: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);
    let quality: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(zenpalette::sampling::DEFAULT_QUALITY);

    let img = image::open(input).unwrap().to_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<RGBA8> = img
        .pixels()
        .map(|p| RGBA8::new(p.0[0], p.0[1], p.0[2], p.0[3]))
        .collect();
    let frame = imgref::Img::new(&pixels[..], w, h);

    let palette = zenpalette::extract_palette(frame, colors, quality).unwrap();
    eprintln!(
        "{input} ({w}x{h}): {} of {colors} colors, quality {quality}",
        palette.len()
    );

    println!("{:<10} {:>10} {:>8}", "color", "population", "volume");
    for s in palette.swatches() {
        let c = s.color;
        println!(
            "#{:02x}{:02x}{:02x}    {:>10} {:>8}",
            c.r, c.g, c.b, s.population, s.volume
        );
    }
}
