use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::boxes::{BoxRect, GlyphBox};

// ── Sidecar file ────────────────────────────────────────────────────────────
//
// One line per glyph: `<ch> <x1> <bottom> <x2> <top> 0`, Y measured from the
// bottom edge of the image. The trailing `0` is carried for compatibility
// and ignored on read.

/// `photo.png` -> `photo.png.box`
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let mut name = OsString::from(image_path.as_os_str());
    name.push(".box");
    PathBuf::from(name)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxFileContents {
    pub boxes: Vec<GlyphBox>,
    /// 1-based numbers of lines that could not be parsed.
    pub skipped: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    NotFound,
    Loaded(BoxFileContents),
}

/// Serializes one box. Each coordinate is truncated toward zero on its own,
/// then Y is flipped against `image_height`.
pub fn format_line(glyph: &GlyphBox, image_height: u32) -> String {
    let rect = &glyph.rect;
    let x1 = rect.x as i64;
    let y1 = rect.y as i64;
    let x2 = x1 + rect.width as i64;
    let y2 = y1 + rect.height as i64;

    let h = i64::from(image_height);
    let mut y1t = h - y1;
    let mut y2t = h - y2;
    if y2t > y1t {
        std::mem::swap(&mut y1t, &mut y2t);
    }

    format!("{} {} {} {} {} 0\n", glyph.character, x1, y2t, x2, y1t)
}

/// Parses `<ch> <int> <int> <int> <int>`; anything after the fifth token is
/// ignored. Returns `None` when the line does not have that shape, or when
/// its coordinates overflow once flipped.
pub fn parse_line(line: &str, image_height: u32) -> Option<GlyphBox> {
    let mut chars = line.chars();
    let character = chars.next()?;
    let rest = chars.as_str();
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut fields = rest.split_whitespace().map(|t| t.parse::<i64>());
    let mut next = || fields.next()?.ok();
    let (x1, y1, x2, y2) = (next()?, next()?, next()?, next()?);

    let h = i64::from(image_height);
    let rect = BoxRect::new(
        x1 as f32,
        h.checked_sub(y2)? as f32,
        x2.checked_sub(x1)? as f32,
        y2.checked_sub(y1)? as f32,
    );
    Some(GlyphBox::new(character, rect))
}

pub fn encode(boxes: &[GlyphBox], image_height: u32) -> String {
    boxes
        .iter()
        .map(|glyph| format_line(glyph, image_height))
        .collect()
}

/// Parses a whole file. Malformed lines are logged and collected in
/// `skipped`; blank lines are passed over.
pub fn decode(text: &str, image_height: u32) -> BoxFileContents {
    let mut contents = BoxFileContents::default();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, image_height) {
            Some(glyph) => contents.boxes.push(glyph),
            None => {
                log::warn!("Invalid box line {}: {:?}", i + 1, line);
                contents.skipped.push(i + 1);
            }
        }
    }
    contents
}

pub fn write_boxes(path: &Path, boxes: &[GlyphBox], image_height: u32) -> Result<()> {
    std::fs::write(path, encode(boxes, image_height))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved {} boxes to {}", boxes.len(), path.display());
    Ok(())
}

/// Reads a sidecar file. A missing file is `LoadOutcome::NotFound`, not an
/// error.
pub fn read_boxes(path: &Path, image_height: u32) -> Result<LoadOutcome> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No box file at {}, starting empty", path.display());
            return Ok(LoadOutcome::NotFound);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    let contents = decode(&text, image_height);
    log::info!(
        "Loaded {} boxes from {} ({} lines skipped)",
        contents.boxes.len(),
        path.display(),
        contents.skipped.len()
    );
    Ok(LoadOutcome::Loaded(contents))
}
