// ── Data Model ──────────────────────────────────────────────────────────────

/// Label given to boxes created from the toolbar.
pub const DEFAULT_CHAR: char = '?';

/// Image-space offset applied to a duplicated box.
pub const DUPLICATE_OFFSET: f32 = 10.0;

/// Axis-aligned rectangle in image space: top-left corner plus size, in
/// unscaled pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` rectangle centered on an image of the given size.
    pub fn centered(image_width: f32, image_height: f32, width: f32, height: f32) -> Self {
        Self::new(
            image_width / 2.0 - width / 2.0,
            image_height / 2.0 - height / 2.0,
            width,
            height,
        )
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// One annotated glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBox {
    pub character: char,
    pub rect: BoxRect,
}

impl GlyphBox {
    pub fn new(character: char, rect: BoxRect) -> Self {
        Self { character, rect }
    }
}

// ── Box Store ───────────────────────────────────────────────────────────────

/// Ordered boxes plus an optional selection. The order is the list-row order
/// and the line order of the sidecar file.
///
/// `selected` is kept in range by every mutation.
#[derive(Clone, Debug, Default)]
pub struct BoxStore {
    boxes: Vec<GlyphBox>,
    selected: Option<usize>,
}

impl BoxStore {
    pub fn from_boxes(boxes: Vec<GlyphBox>) -> Self {
        Self {
            boxes,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn get(&self, index: usize) -> Option<&GlyphBox> {
        self.boxes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphBox> {
        self.boxes.iter()
    }

    pub fn as_slice(&self) -> &[GlyphBox] {
        &self.boxes
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_box(&self) -> Option<&GlyphBox> {
        self.selected.and_then(|i| self.boxes.get(i))
    }

    pub fn select(&mut self, index: usize) {
        if index < self.boxes.len() {
            self.selected = Some(index);
        }
    }

    /// Appends a box and returns its index. The selection is left alone.
    pub fn insert(&mut self, glyph: GlyphBox) -> usize {
        self.boxes.push(glyph);
        self.boxes.len() - 1
    }

    /// Appends a copy of the box at `index`, shifted by [`DUPLICATE_OFFSET`]
    /// on both axes, and selects it.
    pub fn duplicate(&mut self, index: usize) -> Option<usize> {
        let original = self.boxes.get(index)?;
        let copy = GlyphBox {
            character: original.character,
            rect: original.rect.translated(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
        };
        let new_index = self.insert(copy);
        self.selected = Some(new_index);
        Some(new_index)
    }

    /// Removes the box at `index`. Deleting the selected box clears the
    /// selection; deleting an earlier box shifts the selection down so it
    /// still names the same box.
    pub fn delete(&mut self, index: usize) -> Option<GlyphBox> {
        if index >= self.boxes.len() {
            return None;
        }
        let removed = self.boxes.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Some(removed)
    }

    pub fn set_rect(&mut self, index: usize, rect: BoxRect) {
        if let Some(glyph) = self.boxes.get_mut(index) {
            glyph.rect = rect;
        }
    }

    pub fn set_char(&mut self, index: usize, character: char) {
        if let Some(glyph) = self.boxes.get_mut(index) {
            glyph.character = character;
        }
    }

    /// Swaps in a freshly loaded sequence. A selection that no longer fits is
    /// dropped.
    pub fn replace_all(&mut self, boxes: Vec<GlyphBox>) {
        self.boxes = boxes;
        if self.selected.is_some_and(|i| i >= self.boxes.len()) {
            self.selected = None;
        }
    }
}
