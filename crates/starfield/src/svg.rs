//! Write a scene out as a standalone SVG document

use std::fmt::Write as _;

use starfield_protocol::{GradientStop, Rgb, Scene, StarShape};

/// Render the whole scene.
pub fn render(scene: &Scene) -> Result<String, std::fmt::Error> {
    let mut svg = String::new();

    let width = number(scene.width);
    let height = number(scene.height);
    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}""#
    )?;
    if let Some(class_name) = &scene.class_name {
        write!(svg, r#" class="{}""#, escape(class_name))?;
    }
    writeln!(svg, ">")?;

    for star in &scene.stars {
        write_star(&mut svg, star, &scene.gradient.id)?;
    }

    writeln!(svg, "  <defs>")?;
    writeln!(
        svg,
        r#"    <linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="100%">"#,
        escape(&scene.gradient.id)
    )?;
    write_stop(&mut svg, &scene.gradient.start)?;
    write_stop(&mut svg, &scene.gradient.end)?;
    writeln!(svg, "    </linearGradient>")?;
    writeln!(svg, "  </defs>")?;
    writeln!(svg, "</svg>")?;

    Ok(svg)
}

/// A single star.
fn write_star(svg: &mut String, star: &StarShape, gradient_id: &str) -> std::fmt::Result {
    writeln!(
        svg,
        r#"  <rect data-id="{}" x="{}" y="{}" width="{}" height="{}" fill="url(#{})" transform="rotate({}, {}, {})" />"#,
        star.id,
        number(star.x),
        number(star.y),
        number(star.width),
        number(star.height),
        escape(gradient_id),
        number(star.rotation),
        number(star.origin.0),
        number(star.origin.1),
    )
}

/// One end of the gradient.
fn write_stop(svg: &mut String, stop: &GradientStop) -> std::fmt::Result {
    writeln!(
        svg,
        r#"      <stop offset="{}%" style="stop-color: {}; stop-opacity: {}" />"#,
        number(stop.offset * 100.0),
        hex(stop.colour),
        number(stop.opacity),
    )
}

/// Lowercase CSS hex notation.
fn hex((red, green, blue): Rgb) -> String {
    format!("#{red:02x}{green:02x}{blue:02x}")
}

/// Print a number with at most 3 decimal places, and without any trailing zeros.
fn number(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_owned(),
        _ => trimmed.to_owned(),
    }
}

/// Escape text for use inside a double-quoted attribute.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(character),
        }
    }
    escaped
}
