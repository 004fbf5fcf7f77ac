use egui::{Pos2, Rect, Vec2};

use crate::boxes::{BoxRect, BoxStore, GlyphBox, DEFAULT_CHAR};
use crate::config::EditorConfig;
use crate::transform::ViewTransform;

/// Boxes are never resized below this many image pixels on either axis.
pub const MIN_BOX_SIZE: f32 = 5.0;

// ── Side Panel Layout ───────────────────────────────────────────────────────

pub const PANEL_WIDTH: f32 = 200.0;
const BUTTON_INSET: f32 = 20.0;
const BUTTON_SIZE: Vec2 = Vec2::new(160.0, 30.0);
const LIST_HEADER_Y: f32 = 175.0;
const LIST_TOP: f32 = 200.0;
const LIST_BOTTOM_MARGIN: f32 = 220.0;
pub const ROW_HEIGHT: f32 = 20.0;
const EDITOR_BOTTOM_OFFSET: f32 = 110.0;
const FIELD_INSET: f32 = 30.0;
const FIELD_SIZE: Vec2 = Vec2::new(140.0, 20.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarButton {
    NewBox,
    Save,
    Delete,
    Duplicate,
}

impl ToolbarButton {
    pub const ALL: [ToolbarButton; 4] = [
        ToolbarButton::NewBox,
        ToolbarButton::Save,
        ToolbarButton::Delete,
        ToolbarButton::Duplicate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolbarButton::NewBox => "New Box",
            ToolbarButton::Save => "Save",
            ToolbarButton::Delete => "Delete",
            ToolbarButton::Duplicate => "Duplicate",
        }
    }

    fn top(self) -> f32 {
        match self {
            ToolbarButton::NewBox => 20.0,
            ToolbarButton::Save => 60.0,
            ToolbarButton::Delete => 100.0,
            ToolbarButton::Duplicate => 140.0,
        }
    }

    /// Delete is hidden while nothing is selected.
    pub fn visible(self, has_selection: bool) -> bool {
        self != ToolbarButton::Delete || has_selection
    }
}

/// Screen geometry of the right-hand panel. Shared by hit testing and
/// painting so both agree on where things are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLayout {
    screen: Rect,
    panel: Rect,
}

impl PanelLayout {
    pub fn new(screen: Rect) -> Self {
        let panel = Rect::from_min_max(
            egui::pos2(screen.max.x - PANEL_WIDTH, screen.min.y),
            screen.max,
        );
        Self { screen, panel }
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn panel(&self) -> Rect {
        self.panel
    }

    pub fn over_panel(&self, pos: Pos2) -> bool {
        self.panel.contains(pos)
    }

    pub fn button(&self, button: ToolbarButton) -> Rect {
        Rect::from_min_size(
            egui::pos2(self.panel.min.x + BUTTON_INSET, self.screen.min.y + button.top()),
            BUTTON_SIZE,
        )
    }

    pub fn list_header(&self) -> Pos2 {
        egui::pos2(self.panel.min.x + 10.0, self.screen.min.y + LIST_HEADER_Y)
    }

    /// Row rectangle for list entry `index`, or `None` when scrolled out of
    /// the visible band.
    pub fn list_row(&self, index: usize, scroll_offset: f32) -> Option<Rect> {
        let top = self.screen.min.y + LIST_TOP;
        let bottom = self.screen.max.y - LIST_BOTTOM_MARGIN;
        let y = top + index as f32 * ROW_HEIGHT - scroll_offset;
        if y < top || y > bottom {
            return None;
        }
        Some(Rect::from_min_size(
            egui::pos2(self.panel.min.x, y),
            egui::vec2(PANEL_WIDTH, ROW_HEIGHT),
        ))
    }

    pub fn field(&self, field: Field) -> Rect {
        let y = self.screen.max.y - EDITOR_BOTTOM_OFFSET + field.row() as f32 * FIELD_SIZE.y;
        Rect::from_min_size(egui::pos2(self.panel.min.x + FIELD_INSET, y), FIELD_SIZE)
    }
}

// ── Field Editing ───────────────────────────────────────────────────────────

/// Geometry field of the selected box that can be typed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    X,
    Y,
    W,
    H,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::X, Field::Y, Field::W, Field::H];

    pub fn label(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::W => "w",
            Field::H => "h",
        }
    }

    fn row(self) -> usize {
        match self {
            Field::X => 0,
            Field::Y => 1,
            Field::W => 2,
            Field::H => 3,
        }
    }

    pub fn value(self, rect: &BoxRect) -> f32 {
        match self {
            Field::X => rect.x,
            Field::Y => rect.y,
            Field::W => rect.width,
            Field::H => rect.height,
        }
    }

    pub fn set(self, rect: &mut BoxRect, value: f32) {
        match self {
            Field::X => rect.x = value,
            Field::Y => rect.y = value,
            Field::W => rect.width = value,
            Field::H => rect.height = value,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditField {
    #[default]
    None,
    Active { field: Field, buffer: String },
}

impl EditField {
    pub fn is_active(&self) -> bool {
        matches!(self, EditField::Active { .. })
    }

    /// Pending text when `field` is the one being edited.
    pub fn buffer_for(&self, field: Field) -> Option<&str> {
        match self {
            EditField::Active { field: f, buffer } if *f == field => Some(buffer),
            _ => None,
        }
    }
}

// ── Frame Input ─────────────────────────────────────────────────────────────

/// Raw input polled once per frame. Button `pressed`/`released` are edges,
/// `down` is the level.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub pointer: Option<Pos2>,
    pub primary_pressed: bool,
    pub primary_down: bool,
    pub primary_released: bool,
    pub secondary_pressed: bool,
    pub secondary_down: bool,
    pub secondary_released: bool,
    /// Wheel notches, positive away from the user.
    pub wheel: f32,
    pub typed: Vec<char>,
    pub backspace: bool,
    pub enter: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub reload: bool,
    pub save: bool,
}

/// Side effects the frame loop must carry out after an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Save,
    Reload,
}

// ── Interaction State ───────────────────────────────────────────────────────

/// All mutable per-session UI state. Owned by the app and passed by `&mut`
/// into [`InteractionState::update`] every frame.
#[derive(Clone, Debug)]
pub struct InteractionState {
    pub view: ViewTransform,
    pub scroll_offset: f32,
    pub edit: EditField,
    image_size: Vec2,
    pan_anchor: Option<Pos2>,
    /// Pointer offset from the dragged box's view-space origin.
    drag_offset: Option<Vec2>,
    resizing: bool,
    handle_size: f32,
    scroll_step: f32,
    new_box_size: Vec2,
}

impl InteractionState {
    pub fn new(image_size: Vec2, config: &EditorConfig) -> Self {
        Self {
            view: ViewTransform::fit(
                image_size,
                Vec2::from(config.fit_max_size),
                config.zoom_step,
                config.min_zoom,
            ),
            scroll_offset: 0.0,
            edit: EditField::None,
            image_size,
            pan_anchor: None,
            drag_offset: None,
            resizing: false,
            handle_size: config.handle_size,
            scroll_step: config.scroll_step,
            new_box_size: Vec2::from(config.new_box_size),
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    /// Square grab handle inside the bottom-right corner of a view rect.
    pub fn resize_handle(&self, view_rect: Rect) -> Rect {
        let size = egui::vec2(self.handle_size, self.handle_size);
        Rect::from_min_size(view_rect.max - size, size)
    }

    /// Runs one frame of input against the store. Steps are evaluated in a
    /// fixed order: pan, zoom/scroll, resize, drag, toolbar, list, character
    /// assignment, field editing.
    pub fn update(
        &mut self,
        input: &FrameInput,
        layout: &PanelLayout,
        store: &mut BoxStore,
    ) -> Vec<Command> {
        let mut commands = Vec::new();

        self.update_pan(input, layout);
        self.update_zoom_and_scroll(input);
        if input.reload {
            commands.push(Command::Reload);
        }
        if input.save {
            commands.push(Command::Save);
        }

        self.update_resize(input, layout, store);
        if !self.resizing {
            self.update_drag(input, layout, store);
        }

        if let Some(command) = self.update_toolbar(input, layout, store) {
            commands.push(command);
        }
        self.update_list(input, layout, store);

        if store.selected().is_none() {
            self.edit = EditField::None;
            self.drag_offset = None;
            self.resizing = false;
        }
        if !self.edit.is_active() {
            self.update_character(input, store);
        }
        self.update_fields(input, layout, store);

        commands
    }

    fn canvas_pointer(&self, input: &FrameInput, layout: &PanelLayout) -> Option<Pos2> {
        input.pointer.filter(|p| !layout.over_panel(*p))
    }

    fn update_pan(&mut self, input: &FrameInput, layout: &PanelLayout) {
        if input.secondary_pressed {
            self.pan_anchor = self.canvas_pointer(input, layout);
        }
        if input.secondary_down {
            if let (Some(anchor), Some(pointer)) = (self.pan_anchor, input.pointer) {
                self.view.pan_by(pointer - anchor);
                self.pan_anchor = Some(pointer);
            }
        }
        if input.secondary_released {
            self.pan_anchor = None;
        }
    }

    fn update_zoom_and_scroll(&mut self, input: &FrameInput) {
        if input.zoom_in {
            self.view.zoom_in();
        }
        if input.zoom_out {
            self.view.zoom_out();
        }
        if input.wheel != 0.0 {
            self.scroll_offset = (self.scroll_offset - input.wheel * self.scroll_step).max(0.0);
        }
    }

    fn update_resize(&mut self, input: &FrameInput, layout: &PanelLayout, store: &mut BoxStore) {
        let Some((index, glyph)) = selected(store) else {
            self.resizing = false;
            return;
        };

        if input.primary_pressed {
            let handle = self.resize_handle(self.view.rect_to_view(&glyph.rect));
            if self
                .canvas_pointer(input, layout)
                .is_some_and(|p| handle.contains(p))
            {
                self.resizing = true;
            }
        }

        if self.resizing && input.primary_down {
            if let Some(pointer) = input.pointer {
                let zoom = self.view.zoom;
                let pan = self.view.pan;
                let mut rect = glyph.rect;
                let width = (pointer.x - pan.x - rect.x * zoom) / zoom;
                let height = (pointer.y - pan.y - rect.y * zoom) / zoom;
                if width >= MIN_BOX_SIZE {
                    rect.width = width;
                }
                if height >= MIN_BOX_SIZE {
                    rect.height = height;
                }
                store.set_rect(index, rect);
            }
        }

        if input.primary_released {
            self.resizing = false;
        }
    }

    fn update_drag(&mut self, input: &FrameInput, layout: &PanelLayout, store: &mut BoxStore) {
        let Some((index, glyph)) = selected(store) else {
            self.drag_offset = None;
            return;
        };

        if input.primary_pressed {
            let view_rect = self.view.rect_to_view(&glyph.rect);
            if let Some(pointer) = self.canvas_pointer(input, layout) {
                if view_rect.contains(pointer) {
                    self.drag_offset = Some(pointer - view_rect.min);
                }
            }
        }

        if input.primary_down {
            if let (Some(offset), Some(pointer)) = (self.drag_offset, input.pointer) {
                let origin = self.view.to_image(pointer - offset);
                let mut rect = glyph.rect;
                rect.x = origin.x;
                rect.y = origin.y;
                store.set_rect(index, rect);
            }
        }

        if input.primary_released {
            self.drag_offset = None;
        }
    }

    fn update_toolbar(
        &mut self,
        input: &FrameInput,
        layout: &PanelLayout,
        store: &mut BoxStore,
    ) -> Option<Command> {
        if !input.primary_released {
            return None;
        }
        let pointer = input.pointer?;
        let has_selection = store.selected().is_some();
        let clicked = ToolbarButton::ALL.into_iter().find(|b| {
            b.visible(has_selection) && layout.button(*b).contains(pointer)
        })?;

        match clicked {
            ToolbarButton::NewBox => {
                let rect = BoxRect::centered(
                    self.image_size.x,
                    self.image_size.y,
                    self.new_box_size.x,
                    self.new_box_size.y,
                );
                let index = store.insert(GlyphBox::new(DEFAULT_CHAR, rect));
                log::debug!("New box {}", index);
                None
            }
            ToolbarButton::Save => Some(Command::Save),
            ToolbarButton::Delete => {
                if let Some(index) = store.selected() {
                    store.delete(index);
                    log::debug!("Deleted box {}", index);
                }
                None
            }
            ToolbarButton::Duplicate => {
                if let Some(index) = store.selected().and_then(|i| store.duplicate(i)) {
                    log::debug!("Duplicated into box {}", index);
                }
                None
            }
        }
    }

    fn update_list(&mut self, input: &FrameInput, layout: &PanelLayout, store: &mut BoxStore) {
        if !input.primary_pressed {
            return;
        }
        let Some(pointer) = input.pointer else {
            return;
        };
        let hit = (0..store.len()).find(|&i| {
            layout
                .list_row(i, self.scroll_offset)
                .is_some_and(|row| row.contains(pointer))
        });
        if let Some(index) = hit {
            store.select(index);
        }
    }

    fn update_character(&mut self, input: &FrameInput, store: &mut BoxStore) {
        let Some(index) = store.selected() else {
            return;
        };
        for &c in &input.typed {
            store.set_char(index, c);
        }
    }

    fn update_fields(&mut self, input: &FrameInput, layout: &PanelLayout, store: &mut BoxStore) {
        let Some((index, glyph)) = selected(store) else {
            return;
        };

        if input.primary_pressed {
            if let Some(pointer) = input.pointer {
                if let Some(field) = Field::ALL
                    .into_iter()
                    .find(|f| layout.field(*f).contains(pointer))
                {
                    self.edit = EditField::Active {
                        field,
                        buffer: String::new(),
                    };
                    return;
                }
            }
        }

        let EditField::Active { field, buffer } = &mut self.edit else {
            return;
        };
        buffer.extend(input.typed.iter().filter(|c| c.is_ascii_digit()));
        if input.backspace {
            buffer.pop();
        }
        if input.enter {
            match buffer.parse::<i64>() {
                Ok(value) => {
                    let mut rect = glyph.rect;
                    field.set(&mut rect, value as f32);
                    store.set_rect(index, rect);
                }
                Err(e) => log::debug!("Ignoring {} value {:?}: {}", field.label(), buffer, e),
            }
            self.edit = EditField::None;
        }
    }
}

fn selected(store: &BoxStore) -> Option<(usize, GlyphBox)> {
    let index = store.selected()?;
    store.get(index).map(|glyph| (index, glyph.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        min: Pos2::ZERO,
        max: Pos2::new(1000.0, 800.0),
    };

    fn setup() -> (InteractionState, PanelLayout, BoxStore) {
        let state = InteractionState::new(egui::vec2(400.0, 300.0), &EditorConfig::default());
        let store = BoxStore::from_boxes(vec![
            GlyphBox::new('a', BoxRect::new(10.0, 20.0, 50.0, 30.0)),
            GlyphBox::new('b', BoxRect::new(100.0, 100.0, 20.0, 20.0)),
        ]);
        (state, PanelLayout::new(SCREEN), store)
    }

    fn press(x: f32, y: f32) -> FrameInput {
        FrameInput {
            pointer: Some(egui::pos2(x, y)),
            primary_pressed: true,
            primary_down: true,
            ..Default::default()
        }
    }

    fn hold(x: f32, y: f32) -> FrameInput {
        FrameInput {
            pointer: Some(egui::pos2(x, y)),
            primary_down: true,
            ..Default::default()
        }
    }

    fn release(x: f32, y: f32) -> FrameInput {
        FrameInput {
            pointer: Some(egui::pos2(x, y)),
            primary_released: true,
            ..Default::default()
        }
    }

    fn typed(text: &str) -> FrameInput {
        FrameInput {
            typed: text.chars().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn secondary_drag_pans_view() {
        let (mut state, layout, mut store) = setup();
        let frames = [
            FrameInput {
                pointer: Some(egui::pos2(100.0, 100.0)),
                secondary_pressed: true,
                secondary_down: true,
                ..Default::default()
            },
            FrameInput {
                pointer: Some(egui::pos2(120.0, 95.0)),
                secondary_down: true,
                ..Default::default()
            },
            FrameInput {
                pointer: Some(egui::pos2(130.0, 90.0)),
                secondary_down: true,
                ..Default::default()
            },
        ];
        for frame in &frames {
            state.update(frame, &layout, &mut store);
        }
        assert_eq!(state.view.pan, egui::vec2(30.0, -10.0));
        assert!(state.is_panning());

        state.update(
            &FrameInput {
                pointer: Some(egui::pos2(130.0, 90.0)),
                secondary_released: true,
                ..Default::default()
            },
            &layout,
            &mut store,
        );
        state.update(
            &FrameInput {
                pointer: Some(egui::pos2(500.0, 500.0)),
                secondary_down: true,
                ..Default::default()
            },
            &layout,
            &mut store,
        );
        assert!(!state.is_panning());
        assert_eq!(state.view.pan, egui::vec2(30.0, -10.0));
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn pan_does_not_start_over_panel() {
        let (mut state, layout, mut store) = setup();
        state.update(
            &FrameInput {
                pointer: Some(egui::pos2(900.0, 400.0)),
                secondary_pressed: true,
                secondary_down: true,
                ..Default::default()
            },
            &layout,
            &mut store,
        );
        assert!(!state.is_panning());
    }

    #[test]
    fn zoom_shortcuts_step_and_respect_floor() {
        let (mut state, layout, mut store) = setup();
        let zoom_in = FrameInput {
            zoom_in: true,
            ..Default::default()
        };
        state.update(&zoom_in, &layout, &mut store);
        assert!((state.view.zoom - 1.1).abs() < 1e-5);

        let zoom_out = FrameInput {
            zoom_out: true,
            ..Default::default()
        };
        for _ in 0..20 {
            state.update(&zoom_out, &layout, &mut store);
        }
        assert!(state.view.zoom >= 0.2);
        assert!(state.view.zoom < 0.3);
    }

    #[test]
    fn wheel_scrolls_list_and_clamps_at_zero() {
        let (mut state, layout, mut store) = setup();
        let down = FrameInput {
            wheel: -2.0,
            ..Default::default()
        };
        state.update(&down, &layout, &mut store);
        assert_eq!(state.scroll_offset, 40.0);
        assert_eq!(state.view.zoom, 1.0);

        let up = FrameInput {
            wheel: 5.0,
            ..Default::default()
        };
        state.update(&up, &layout, &mut store);
        assert_eq!(state.scroll_offset, 0.0);
    }

    #[test]
    fn drag_moves_selected_box_in_image_space() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        state.view.zoom = 2.0;
        state.view.pan = egui::vec2(5.0, 5.0);
        // view rect is (25, 45) - (125, 105)

        state.update(&press(35.0, 55.0), &layout, &mut store);
        assert!(state.is_dragging());
        state.update(&hold(75.0, 95.0), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(30.0, 40.0, 50.0, 30.0));

        state.update(&release(75.0, 95.0), &layout, &mut store);
        assert!(!state.is_dragging());
        state.update(&hold(300.0, 300.0), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(30.0, 40.0, 50.0, 30.0));
    }

    #[test]
    fn press_outside_selected_box_does_not_drag() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        state.update(&press(300.0, 300.0), &layout, &mut store);
        state.update(&hold(320.0, 320.0), &layout, &mut store);
        assert!(!state.is_dragging());
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn handle_resizes_instead_of_dragging() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        state.view.zoom = 2.0;
        state.view.pan = egui::vec2(5.0, 5.0);
        // handle is (113, 93) - (125, 105)

        state.update(&press(120.0, 100.0), &layout, &mut store);
        assert!(state.is_resizing());
        assert!(!state.is_dragging());

        state.update(&hold(205.0, 165.0), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(10.0, 20.0, 90.0, 60.0));

        state.update(&release(205.0, 165.0), &layout, &mut store);
        assert!(!state.is_resizing());
    }

    #[test]
    fn resize_below_minimum_keeps_last_valid_size() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        state.view.zoom = 2.0;
        state.view.pan = egui::vec2(5.0, 5.0);

        state.update(&press(120.0, 100.0), &layout, &mut store);
        state.update(&hold(205.0, 165.0), &layout, &mut store);
        state.update(&hold(20.0, 40.0), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(10.0, 20.0, 90.0, 60.0));

        // width rejected, height accepted
        state.update(&hold(30.0, 205.0), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(10.0, 20.0, 90.0, 80.0));
    }

    #[test]
    fn list_row_press_selects() {
        let (mut state, layout, mut store) = setup();
        state.update(&press(810.0, 225.0), &layout, &mut store);
        assert_eq!(store.selected(), Some(1));
        state.update(&press(810.0, 205.0), &layout, &mut store);
        assert_eq!(store.selected(), Some(0));
    }

    #[test]
    fn scrolled_rows_are_clipped() {
        let (mut state, layout, mut store) = setup();
        state.scroll_offset = 20.0;
        assert!(layout.list_row(0, state.scroll_offset).is_none());
        state.update(&press(810.0, 205.0), &layout, &mut store);
        assert_eq!(store.selected(), Some(1));
    }

    #[test]
    fn typed_character_relabels_selected_box() {
        let (mut state, layout, mut store) = setup();
        state.update(&typed("x"), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().character, 'a');

        store.select(0);
        state.update(&typed("x"), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().character, 'x');
        state.update(&typed("yz"), &layout, &mut store);
        assert_eq!(store.get(0).unwrap().character, 'z');
    }

    #[test]
    fn field_edit_commits_integer_on_enter() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        // x field spans (830, 690) - (970, 710)
        state.update(&press(850.0, 695.0), &layout, &mut store);
        assert_eq!(state.edit.buffer_for(Field::X), Some(""));

        state.update(&typed("42a"), &layout, &mut store);
        assert_eq!(state.edit.buffer_for(Field::X), Some("42"));
        assert_eq!(store.get(0).unwrap().character, 'a');

        let backspace = FrameInput {
            backspace: true,
            ..Default::default()
        };
        state.update(&backspace, &layout, &mut store);
        state.update(&typed("7"), &layout, &mut store);
        assert_eq!(state.edit.buffer_for(Field::X), Some("47"));

        let enter = FrameInput {
            enter: true,
            ..Default::default()
        };
        state.update(&enter, &layout, &mut store);
        assert_eq!(state.edit, EditField::None);
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(47.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn field_edit_accepts_values_past_i32() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        // w field is the third row
        state.update(&press(850.0, 735.0), &layout, &mut store);
        assert_eq!(state.edit.buffer_for(Field::W), Some(""));

        state.update(&typed("3000000000"), &layout, &mut store);
        let enter = FrameInput {
            enter: true,
            ..Default::default()
        };
        state.update(&enter, &layout, &mut store);
        assert!(!state.edit.is_active());
        assert_eq!(store.get(0).unwrap().rect.width, 3_000_000_000.0);
    }

    #[test]
    fn empty_field_submission_changes_nothing() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        // h field is the fourth row
        state.update(&press(850.0, 755.0), &layout, &mut store);
        assert_eq!(state.edit.buffer_for(Field::H), Some(""));

        let enter = FrameInput {
            enter: true,
            ..Default::default()
        };
        state.update(&enter, &layout, &mut store);
        assert!(!state.edit.is_active());
        assert_eq!(store.get(0).unwrap().rect, BoxRect::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn new_box_button_appends_centered_box() {
        let (mut state, layout, mut store) = setup();
        store.select(1);
        let commands = state.update(&release(900.0, 35.0), &layout, &mut store);
        assert!(commands.is_empty());
        assert_eq!(store.len(), 3);
        let created = store.get(2).unwrap();
        assert_eq!(created.character, '?');
        assert_eq!(created.rect, BoxRect::new(150.0, 130.0, 100.0, 40.0));
        assert_eq!(store.selected(), Some(1));
    }

    #[test]
    fn delete_button_needs_selection() {
        let (mut state, layout, mut store) = setup();
        state.update(&release(900.0, 115.0), &layout, &mut store);
        assert_eq!(store.len(), 2);

        store.select(0);
        state.update(&release(900.0, 115.0), &layout, &mut store);
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected(), None);
        assert_eq!(store.get(0).unwrap().character, 'b');
    }

    #[test]
    fn duplicate_button_copies_selection() {
        let (mut state, layout, mut store) = setup();
        state.update(&release(900.0, 155.0), &layout, &mut store);
        assert_eq!(store.len(), 2);

        store.select(1);
        state.update(&release(900.0, 155.0), &layout, &mut store);
        assert_eq!(store.len(), 3);
        assert_eq!(store.selected(), Some(2));
        assert_eq!(store.get(2).unwrap().rect, BoxRect::new(110.0, 110.0, 20.0, 20.0));
    }

    #[test]
    fn save_button_and_shortcuts_emit_commands() {
        let (mut state, layout, mut store) = setup();
        let commands = state.update(&release(900.0, 75.0), &layout, &mut store);
        assert_eq!(commands, vec![Command::Save]);

        let shortcuts = FrameInput {
            reload: true,
            save: true,
            ..Default::default()
        };
        let commands = state.update(&shortcuts, &layout, &mut store);
        assert_eq!(commands, vec![Command::Reload, Command::Save]);
    }

    #[test]
    fn clearing_selection_ends_field_edit() {
        let (mut state, layout, mut store) = setup();
        store.select(0);
        state.update(&press(850.0, 695.0), &layout, &mut store);
        assert!(state.edit.is_active());

        state.update(&release(900.0, 115.0), &layout, &mut store);
        assert_eq!(store.selected(), None);
        assert!(!state.edit.is_active());
    }
}
