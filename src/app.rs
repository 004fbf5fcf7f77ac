use std::path::{Path, PathBuf};

use egui::{Align2, Color32, FontId, PointerButton, Stroke, TextureHandle};
use image::DynamicImage;

use crate::box_file::{self, LoadOutcome};
use crate::boxes::{BoxRect, BoxStore, GlyphBox};
use crate::config::EditorConfig;
use crate::interaction::{
    Command, Field, FrameInput, InteractionState, PanelLayout, ToolbarButton,
};

/// Wheel events reported in points are converted to notches with this.
const POINTS_PER_NOTCH: f32 = 50.0;

const BOX_COLOR: Color32 = Color32::BLUE;
const SELECTED_COLOR: Color32 = Color32::RED;
const PANEL_COLOR: Color32 = Color32::from_gray(200);
const BUTTON_COLOR: Color32 = Color32::from_gray(130);
const ACTIVE_FIELD_COLOR: Color32 = Color32::from_rgb(102, 191, 255);

// ── App ─────────────────────────────────────────────────────────────────────

pub struct BoxEditorApp {
    box_path: PathBuf,
    texture: Option<TextureHandle>,
    /// Decoded pixels, dropped once uploaded.
    raw_image: Option<DynamicImage>,
    image_size: (u32, u32),

    store: BoxStore,
    interaction: InteractionState,
    status: String,
}

impl BoxEditorApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        image_path: PathBuf,
        image: DynamicImage,
        config: &EditorConfig,
    ) -> Self {
        // Ctrl +/- belong to the canvas zoom, not egui's UI scale.
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

        let image_size = (image.width(), image.height());
        let box_path = box_file::sidecar_path(&image_path);
        log::info!(
            "Editing {} ({}x{})",
            image_path.display(),
            image_size.0,
            image_size.1
        );
        let (boxes, status) = load_sidecar(&box_path, image_size.1);
        Self {
            box_path,
            texture: None,
            raw_image: Some(image),
            image_size,
            store: BoxStore::from_boxes(boxes),
            interaction: InteractionState::new(
                egui::vec2(image_size.0 as f32, image_size.1 as f32),
                config,
            ),
            status,
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(img) = self.raw_image.take() {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture(
                "image",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn save(&mut self) {
        let result = box_file::write_boxes(&self.box_path, self.store.as_slice(), self.image_size.1);
        self.status = match result {
            Ok(()) => format!("Saved {} boxes", self.store.len()),
            Err(e) => {
                log::error!("{:#}", e);
                "Save failed".to_string()
            }
        };
    }

    fn reload(&mut self) {
        let (boxes, status) = load_sidecar(&self.box_path, self.image_size.1);
        self.store.replace_all(boxes);
        self.status = status;
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::Save => self.save(),
            Command::Reload => self.reload(),
        }
    }

    fn draw_canvas(&self, painter: &egui::Painter, layout: &PanelLayout) {
        let view = &self.interaction.view;

        if let Some(ref tex) = self.texture {
            let img_rect = view.rect_to_view(&BoxRect::new(
                0.0,
                0.0,
                self.image_size.0 as f32,
                self.image_size.1 as f32,
            ));
            painter.image(
                tex.id(),
                img_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        for (i, glyph) in self.store.iter().enumerate() {
            let is_selected = self.store.selected() == Some(i);
            let r = view.rect_to_view(&glyph.rect);
            let color = if is_selected { SELECTED_COLOR } else { BOX_COLOR };
            painter.rect_stroke(r, 0.0, Stroke::new(2.0, color), egui::StrokeKind::Inside);
            painter.text(
                r.min + egui::vec2(2.0, 2.0),
                Align2::LEFT_TOP,
                glyph.character,
                FontId::proportional(16.0),
                Color32::BLACK,
            );
            if is_selected {
                painter.rect_filled(
                    self.interaction.resize_handle(r),
                    0.0,
                    Color32::DARK_GRAY,
                );
            }
        }

        painter.text(
            layout.screen().min + egui::vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            format!("Zoom: {:.1}x", view.zoom),
            FontId::proportional(18.0),
            Color32::BLACK,
        );
    }

    fn draw_panel(&self, painter: &egui::Painter, layout: &PanelLayout) {
        let painter = painter.with_clip_rect(layout.panel());
        painter.rect_filled(layout.panel(), 0.0, PANEL_COLOR);

        let has_selection = self.store.selected().is_some();
        for button in ToolbarButton::ALL {
            if !button.visible(has_selection) {
                continue;
            }
            let rect = layout.button(button);
            painter.rect_filled(rect, 0.0, BUTTON_COLOR);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                button.label(),
                FontId::proportional(16.0),
                Color32::BLACK,
            );
        }

        painter.text(
            layout.list_header(),
            Align2::LEFT_TOP,
            "Boxes:",
            FontId::proportional(20.0),
            Color32::DARK_GRAY,
        );
        for (i, glyph) in self.store.iter().enumerate() {
            let Some(row) = layout.list_row(i, self.interaction.scroll_offset) else {
                continue;
            };
            let color = if self.store.selected() == Some(i) {
                SELECTED_COLOR
            } else {
                Color32::BLACK
            };
            painter.text(
                row.min + egui::vec2(10.0, 0.0),
                Align2::LEFT_TOP,
                format!("[{}] '{}'", i, glyph.character),
                FontId::proportional(16.0),
                color,
            );
        }

        if let Some(glyph) = self.store.selected_box() {
            for field in Field::ALL {
                let rect = layout.field(field);
                let pending = self.interaction.edit.buffer_for(field);
                let fill = if pending.is_some() {
                    ACTIVE_FIELD_COLOR
                } else {
                    Color32::LIGHT_GRAY
                };
                painter.rect_filled(rect, 0.0, fill);
                painter.text(
                    egui::pos2(layout.panel().min.x + 10.0, rect.min.y + 2.0),
                    Align2::LEFT_TOP,
                    format!("{}:", field.label()),
                    FontId::proportional(16.0),
                    Color32::BLACK,
                );
                let display = match pending {
                    Some(buffer) => format!("{}_", buffer),
                    None => format!("{:.0}", field.value(&glyph.rect)),
                };
                painter.text(
                    rect.min + egui::vec2(4.0, 2.0),
                    Align2::LEFT_TOP,
                    display,
                    FontId::proportional(16.0),
                    Color32::BLACK,
                );
            }
        }

        painter.text(
            egui::pos2(layout.panel().min.x + 10.0, layout.panel().max.y - 8.0),
            Align2::LEFT_BOTTOM,
            &self.status,
            FontId::proportional(14.0),
            Color32::DARK_GRAY,
        );
    }
}

/// Reads the sidecar file, turning every outcome into boxes plus a status
/// line. Never fails: a broken file leaves the editor empty.
fn load_sidecar(path: &Path, image_height: u32) -> (Vec<GlyphBox>, String) {
    match box_file::read_boxes(path, image_height) {
        Ok(LoadOutcome::NotFound) => (Vec::new(), "No .box file yet".to_string()),
        Ok(LoadOutcome::Loaded(contents)) => {
            let status = if contents.skipped.is_empty() {
                format!("Loaded {} boxes", contents.boxes.len())
            } else {
                let lines: Vec<String> = contents.skipped.iter().map(|n| n.to_string()).collect();
                format!(
                    "Loaded {} boxes, skipped line {}",
                    contents.boxes.len(),
                    lines.join(", ")
                )
            };
            (contents.boxes, status)
        }
        Err(e) => {
            log::error!("{:#}", e);
            (Vec::new(), "Load failed".to_string())
        }
    }
}

/// True when `key` went down this frame, ignoring OS auto-repeat.
fn first_press(events: &[egui::Event], key: egui::Key) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            egui::Event::Key { key: k, pressed: true, repeat: false, .. } if *k == key
        )
    })
}

/// Collects this frame's raw input into the toolkit-independent form.
fn poll_input(ctx: &egui::Context) -> FrameInput {
    ctx.input(|i| {
        let command = i.modifiers.command;
        let mut input = FrameInput {
            pointer: i.pointer.latest_pos(),
            primary_pressed: i.pointer.button_pressed(PointerButton::Primary),
            primary_down: i.pointer.button_down(PointerButton::Primary),
            primary_released: i.pointer.button_released(PointerButton::Primary),
            secondary_pressed: i.pointer.button_pressed(PointerButton::Secondary),
            secondary_down: i.pointer.button_down(PointerButton::Secondary),
            secondary_released: i.pointer.button_released(PointerButton::Secondary),
            backspace: i.key_pressed(egui::Key::Backspace),
            enter: i.key_pressed(egui::Key::Enter),
            zoom_in: command
                && (first_press(&i.events, egui::Key::Plus)
                    || first_press(&i.events, egui::Key::Equals)),
            zoom_out: command && first_press(&i.events, egui::Key::Minus),
            reload: command && first_press(&i.events, egui::Key::R),
            save: command && first_press(&i.events, egui::Key::S),
            ..Default::default()
        };
        for event in &i.events {
            match event {
                egui::Event::Text(text) if !command => input.typed.extend(text.chars()),
                egui::Event::MouseWheel { unit, delta, .. } => {
                    input.wheel += match unit {
                        egui::MouseWheelUnit::Point => delta.y / POINTS_PER_NOTCH,
                        egui::MouseWheelUnit::Line | egui::MouseWheelUnit::Page => delta.y,
                    };
                }
                _ => {}
            }
        }
        input
    })
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for BoxEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let layout = PanelLayout::new(response.rect);

                let input = poll_input(ctx);
                let commands = self.interaction.update(&input, &layout, &mut self.store);
                for command in commands {
                    self.run(command);
                }
                if self.interaction.is_resizing() {
                    ctx.set_cursor_icon(egui::CursorIcon::ResizeNwSe);
                } else if self.interaction.is_dragging() || self.interaction.is_panning() {
                    ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
                }

                painter.rect_filled(response.rect, 0.0, Color32::from_gray(245));
                self.draw_canvas(&painter, &layout);
                self.draw_panel(&painter, &layout);
            });
    }
}
