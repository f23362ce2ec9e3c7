use egui::Color32;

pub const ADD_BUTTON_FILL: Color32 = Color32::from_rgb(34, 197, 94);
pub const UPDATE_BUTTON_FILL: Color32 = Color32::from_rgb(234, 179, 8);
pub const DELETE_BUTTON_FILL: Color32 = Color32::from_rgb(239, 68, 68);
pub const SUBMIT_TEXT: Color32 = Color32::from_rgb(4, 15, 35);

/// Submit button fill for the current form mode.
pub fn submit_fill(editing: bool) -> Color32 {
    if editing {
        UPDATE_BUTTON_FILL
    } else {
        ADD_BUTTON_FILL
    }
}
