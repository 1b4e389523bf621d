// LogView - ui/virtual_list.rs
//
// egui-backed virtualizer. `ScrollArea::show_rows` lays out only the rows
// intersecting the viewport, so render cost stays flat however many records
// the store holds. Every row must occupy exactly `row_height`.

use crate::core::virtualize::Virtualizer;

pub struct ScrollVirtualizer<'u> {
    ui: &'u mut egui::Ui,
    id_salt: &'static str,
    row_height: f32,
    stick_to_bottom: bool,
}

impl<'u> ScrollVirtualizer<'u> {
    pub fn new(ui: &'u mut egui::Ui, id_salt: &'static str, row_height: f32) -> Self {
        Self {
            ui,
            id_salt,
            row_height,
            stick_to_bottom: false,
        }
    }

    /// Keep the newest rows in view as they arrive (live tail).
    pub fn stick_to_bottom(mut self, stick: bool) -> Self {
        self.stick_to_bottom = stick;
        self
    }
}

impl Virtualizer for ScrollVirtualizer<'_> {
    type Surface = egui::Ui;

    fn render(
        &mut self,
        total_count: usize,
        item_content: &mut dyn FnMut(&mut egui::Ui, usize),
    ) {
        egui::ScrollArea::vertical()
            .id_salt(self.id_salt)
            .auto_shrink([false; 2])
            .stick_to_bottom(self.stick_to_bottom)
            .show_rows(self.ui, self.row_height, total_count, |ui, row_range| {
                for index in row_range {
                    item_content(ui, index);
                }
            });
    }
}
