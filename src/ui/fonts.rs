// LogView - ui/fonts.rs
//
// Registers the raw view font with egui once it has been located.

use crate::app::font_watch::LoadedFont;

/// Name of the egui font family the raw view draws with once its font is
/// installed.
pub const RAW_FAMILY_NAME: &str = "logview-raw";

pub fn raw_family() -> egui::FontFamily {
    egui::FontFamily::Name(RAW_FAMILY_NAME.into())
}

/// Install `font` as the raw view family.
///
/// The family falls back to the built-in monospace fonts so glyphs missing
/// from the loaded face still render. `ctx.set_fonts` takes effect on the
/// next frame; the family must not be used before then.
pub fn install_raw_font(ctx: &egui::Context, font: &LoadedFont) {
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        font.name.clone(),
        egui::FontData::from_owned(font.data.clone()).into(),
    );

    let mut chain = vec![font.name.clone()];
    if let Some(monospace) = fonts.families.get(&egui::FontFamily::Monospace) {
        chain.extend(monospace.iter().cloned());
    }
    fonts.families.insert(raw_family(), chain);

    ctx.set_fonts(fonts);
    tracing::info!(
        font = %font.name,
        path = %font.path.display(),
        "Raw view font installed"
    );
}
