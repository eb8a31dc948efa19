// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! File sinks for generator output.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Create a grayscale .ppm image from one byte per pixel.
/// `pixels` must contain `height * width` bytes.
/// Useful for visually checking for patterns in random data.
pub fn write_gray_ppm(
    file_path: &str,
    width: usize,
    height: usize,
    pixels: &[u8],
) -> std::io::Result<()> {
    assert_eq!(pixels.len(), height * width);
    let path = Path::new(file_path);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let header = format!("P6 {} {} 255\n", width, height);
    writer.write_all(header.as_bytes())?;
    for &gray in pixels {
        writer.write_all(&[gray, gray, gray])?;
    }
    Ok(())
}

/// Write floats as newline-delimited decimals with nine fractional
/// digits, for offline statistical inspection by external tools.
pub fn write_csv(file_path: &str, values: &[f64]) -> std::io::Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    for value in values {
        writeln!(writer, "{:.9}", value)?;
    }
    Ok(())
}
