//! Light/dark theme preference and the colours each mode renders with.

use crate::error::Result;
use crate::store::KeyValueStore;

pub const MODE_KEY: &str = "select-mode";
pub const ICON_KEY: &str = "select-icon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// State of the toggle button's icon, persisted next to the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleIcon {
    #[default]
    Right,
    Left,
}

impl ToggleIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            ToggleIcon::Right => "bxs-toggle-right",
            ToggleIcon::Left => "bx-toggle-left",
        }
    }

    /// Glyph drawn on the toggle button.
    pub fn glyph(self) -> &'static str {
        match self {
            ToggleIcon::Right => "☀",
            ToggleIcon::Left => "🌙",
        }
    }

    fn toggled(self) -> Self {
        match self {
            ToggleIcon::Right => ToggleIcon::Left,
            ToggleIcon::Left => ToggleIcon::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemePreference {
    pub mode: ThemeMode,
    pub icon: ToggleIcon,
}

impl ThemePreference {
    /// Read the stored preference. The icon is only honoured when a mode was
    /// stored; with no mode both fall back to the light defaults.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        let Some(mode) = store.get(MODE_KEY)? else {
            return Ok(Self::default());
        };
        let icon = store.get(ICON_KEY)?;

        Ok(Self {
            mode: if mode == ThemeMode::Dark.as_str() {
                ThemeMode::Dark
            } else {
                ThemeMode::Light
            },
            icon: if icon.as_deref() == Some(ToggleIcon::Left.as_str()) {
                ToggleIcon::Left
            } else {
                ToggleIcon::Right
            },
        })
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.set(MODE_KEY, self.mode.as_str())?;
        store.set(ICON_KEY, self.icon.as_str())
    }

    pub fn toggled(self) -> Self {
        Self {
            mode: self.mode.toggled(),
            icon: self.icon.toggled(),
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub dark: bool,
    pub background: egui::Color32,
    pub foreground: egui::Color32,
    pub accent: egui::Color32,
    pub border: egui::Color32,
    pub muted: egui::Color32,
    pub danger: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            dark: true,
            background: egui::Color32::from_rgb(26, 27, 38),
            foreground: egui::Color32::from_rgb(205, 214, 244),
            accent: egui::Color32::from_rgb(116, 199, 236),
            border: egui::Color32::from_rgb(88, 91, 112),
            muted: egui::Color32::from_rgb(166, 173, 200),
            danger: egui::Color32::from_rgb(243, 139, 168),
            success: egui::Color32::from_rgb(166, 227, 161),
            warning: egui::Color32::from_rgb(249, 226, 175),
        }
    }

    fn light() -> Self {
        Self {
            dark: false,
            background: egui::Color32::from_rgb(239, 241, 245),
            foreground: egui::Color32::from_rgb(76, 79, 105),
            accent: egui::Color32::from_rgb(30, 102, 245),
            border: egui::Color32::from_rgb(172, 176, 190),
            muted: egui::Color32::from_rgb(108, 111, 133),
            danger: egui::Color32::from_rgb(223, 71, 89),
            success: egui::Color32::from_rgb(64, 160, 43),
            warning: egui::Color32::from_rgb(223, 142, 29),
        }
    }

    /// Build the egui style for this palette on top of `base`.
    pub fn apply(&self, base: &egui::Style) -> egui::Style {
        let mut style = base.clone();
        style.visuals = if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        style.visuals.window_fill = self.background;
        style.visuals.panel_fill = self.background;
        style.visuals.extreme_bg_color = self.background;
        style.visuals.faint_bg_color = self.border;
        style.visuals.override_text_color = Some(self.foreground);
        style.visuals.selection.bg_fill = self.accent;
        style
    }
}
