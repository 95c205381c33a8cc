//! Overlay configuration snapshot and the widget catalogue.
//!
//! The overlay never reads settings ad hoc while handling input. A
//! [`OverlayConfig`] is loaded from the [`LayoutStore`] once and handed to
//! every rebuild; changing a setting means building a new snapshot.

use crate::controller::{ButtonType, StickType};
use crate::persistence::LayoutStore;
use bitflags::bitflags;
use std::fmt;
use tracing::{debug, warn};

pub const KEY_CONTROL_SCALE: &str = "controlScale";
pub const KEY_TOUCH_ENABLED: &str = "isTouchEnabled";
pub const KEY_JOYSTICK_RECENTER: &str = "joystickRelCenter";
pub const KEY_DPAD_SLIDE: &str = "dpadSlide";
pub const KEY_SHOW_OVERLAY: &str = "showOverlay";
pub const KEY_OVERLAY_INIT: &str = "OverlayInit";

pub const CONTROL_SCALE_MAX: u8 = 150;
pub const CONTROL_SCALE_DEFAULT: u8 = 50;

bitflags! {
    /// Set of enabled widgets, one bit per toggle index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WidgetSet: u16 {
        const BUTTON_A = 1 << 0;
        const BUTTON_B = 1 << 1;
        const BUTTON_X = 1 << 2;
        const BUTTON_Y = 1 << 3;
        const TRIGGER_L = 1 << 4;
        const TRIGGER_R = 1 << 5;
        const TRIGGER_ZL = 1 << 6;
        const TRIGGER_ZR = 1 << 7;
        const BUTTON_PLUS = 1 << 8;
        const BUTTON_MINUS = 1 << 9;
        const DPAD = 1 << 10;
        const STICK_L = 1 << 11;
        const STICK_R = 1 << 12;
        const BUTTON_HOME = 1 << 13;
        const BUTTON_CAPTURE = 1 << 14;
    }
}

impl Default for WidgetSet {
    fn default() -> Self {
        WidgetSet::all() - WidgetSet::BUTTON_HOME - WidgetSet::BUTTON_CAPTURE
    }
}

/// Every widget the overlay knows, in toggle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    TriggerL,
    TriggerR,
    TriggerZl,
    TriggerZr,
    ButtonPlus,
    ButtonMinus,
    Dpad,
    StickL,
    StickR,
    ButtonHome,
    ButtonCapture,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 15] = [
        WidgetKind::ButtonA,
        WidgetKind::ButtonB,
        WidgetKind::ButtonX,
        WidgetKind::ButtonY,
        WidgetKind::TriggerL,
        WidgetKind::TriggerR,
        WidgetKind::TriggerZl,
        WidgetKind::TriggerZr,
        WidgetKind::ButtonPlus,
        WidgetKind::ButtonMinus,
        WidgetKind::Dpad,
        WidgetKind::StickL,
        WidgetKind::StickR,
        WidgetKind::ButtonHome,
        WidgetKind::ButtonCapture,
    ];

    pub fn toggle_index(self) -> usize {
        self as usize
    }

    pub fn toggle_key(self) -> String {
        format!("buttonToggle{}", self.toggle_index())
    }

    pub fn flag(self) -> WidgetSet {
        WidgetSet::from_bits_retain(1 << self.toggle_index())
    }

    /// Button reported by the widget. For the dpad this is its up direction,
    /// for a stick the stick click.
    pub fn button(self) -> ButtonType {
        match self {
            WidgetKind::ButtonA => ButtonType::A,
            WidgetKind::ButtonB => ButtonType::B,
            WidgetKind::ButtonX => ButtonType::X,
            WidgetKind::ButtonY => ButtonType::Y,
            WidgetKind::TriggerL => ButtonType::TriggerL,
            WidgetKind::TriggerR => ButtonType::TriggerR,
            WidgetKind::TriggerZl => ButtonType::TriggerZl,
            WidgetKind::TriggerZr => ButtonType::TriggerZr,
            WidgetKind::ButtonPlus => ButtonType::Plus,
            WidgetKind::ButtonMinus => ButtonType::Minus,
            WidgetKind::Dpad => ButtonType::DpadUp,
            WidgetKind::StickL => ButtonType::StickL,
            WidgetKind::StickR => ButtonType::StickR,
            WidgetKind::ButtonHome => ButtonType::Home,
            WidgetKind::ButtonCapture => ButtonType::Capture,
        }
    }

    pub fn stick(self) -> Option<StickType> {
        match self {
            WidgetKind::StickL => Some(StickType::Left),
            WidgetKind::StickR => Some(StickType::Right),
            _ => None,
        }
    }

    // Persisted coordinates are keyed by this id
    pub fn layout_id(self) -> i32 {
        self.button().id()
    }

    /// Size in pixels at a scale multiplier of 1.0.
    pub fn intrinsic_size(self) -> (i32, i32) {
        match self {
            WidgetKind::ButtonA | WidgetKind::ButtonB | WidgetKind::ButtonX | WidgetKind::ButtonY => {
                (64, 64)
            }
            WidgetKind::TriggerL
            | WidgetKind::TriggerR
            | WidgetKind::TriggerZl
            | WidgetKind::TriggerZr => (80, 48),
            WidgetKind::ButtonPlus
            | WidgetKind::ButtonMinus
            | WidgetKind::ButtonHome
            | WidgetKind::ButtonCapture => (48, 48),
            WidgetKind::Dpad | WidgetKind::StickL | WidgetKind::StickR => (128, 128),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Display orientation. Positions are stored separately for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn suffix(self) -> &'static str {
        match self {
            Orientation::Landscape => "",
            Orientation::Portrait => "-Portrait",
        }
    }

    pub fn from_screen(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

pub fn position_key_x(layout_id: i32, orientation: Orientation) -> String {
    format!("{}{}-X", layout_id, orientation.suffix())
}

pub fn position_key_y(layout_id: i32, orientation: Orientation) -> String {
    format!("{}{}-Y", layout_id, orientation.suffix())
}

/// Immutable view of the overlay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    // Enabled widgets
    pub widgets: WidgetSet,

    // 0..=150, multiplier is (value + 50) / 100
    pub control_scale: u8,

    // Forward unclaimed touches to the emulated touch screen
    pub touch_enabled: bool,

    // Re-anchor joysticks under the thumb on press
    pub joystick_recenter: bool,

    // Let an owned dpad change direction while the finger slides
    pub dpad_slide: bool,

    // Hide every widget without touching the enabled set
    pub show_overlay: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            widgets: WidgetSet::default(),
            control_scale: CONTROL_SCALE_DEFAULT,
            touch_enabled: true,
            joystick_recenter: true,
            dpad_slide: true,
            show_overlay: true,
        }
    }
}

impl OverlayConfig {
    /// Reads the snapshot from the store, falling back to defaults per key.
    pub fn from_store(store: &dyn LayoutStore) -> Self {
        let defaults = Self::default();

        let mut widgets = WidgetSet::empty();
        for kind in WidgetKind::ALL {
            let enabled = store
                .get_bool(&kind.toggle_key())
                .unwrap_or_else(|| defaults.widgets.contains(kind.flag()));
            widgets.set(kind.flag(), enabled);
        }

        let control_scale = match store.get_int(KEY_CONTROL_SCALE) {
            Some(value) if (0..=CONTROL_SCALE_MAX as i64).contains(&value) => value as u8,
            Some(value) => {
                warn!("Control scale {} out of range, clamping", value);
                value.clamp(0, CONTROL_SCALE_MAX as i64) as u8
            }
            None => defaults.control_scale,
        };

        let config = Self {
            widgets,
            control_scale,
            touch_enabled: store
                .get_bool(KEY_TOUCH_ENABLED)
                .unwrap_or(defaults.touch_enabled),
            joystick_recenter: store
                .get_bool(KEY_JOYSTICK_RECENTER)
                .unwrap_or(defaults.joystick_recenter),
            dpad_slide: store.get_bool(KEY_DPAD_SLIDE).unwrap_or(defaults.dpad_slide),
            show_overlay: store
                .get_bool(KEY_SHOW_OVERLAY)
                .unwrap_or(defaults.show_overlay),
        };
        debug!("Loaded overlay config: {:?}", config);
        config
    }

    /// Writes every setting back. Does not commit.
    pub fn write_to(&self, store: &mut dyn LayoutStore) {
        for kind in WidgetKind::ALL {
            store.put_bool(&kind.toggle_key(), self.is_enabled(kind));
        }
        store.put_int(KEY_CONTROL_SCALE, self.control_scale as i64);
        store.put_bool(KEY_TOUCH_ENABLED, self.touch_enabled);
        store.put_bool(KEY_JOYSTICK_RECENTER, self.joystick_recenter);
        store.put_bool(KEY_DPAD_SLIDE, self.dpad_slide);
        store.put_bool(KEY_SHOW_OVERLAY, self.show_overlay);
    }

    pub fn scale_multiplier(&self) -> f32 {
        (self.control_scale.min(CONTROL_SCALE_MAX) as f32 + 50.0) / 100.0
    }

    pub fn is_enabled(&self, kind: WidgetKind) -> bool {
        self.widgets.contains(kind.flag())
    }

    // Enabled kinds in toggle order
    pub fn enabled_kinds(&self) -> impl Iterator<Item = WidgetKind> + '_ {
        WidgetKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }

    /// Size of a widget after scaling.
    pub fn scaled_size(&self, kind: WidgetKind) -> (i32, i32) {
        let scale = self.scale_multiplier();
        let (w, h) = kind.intrinsic_size();
        ((w as f32 * scale) as i32, (h as f32 * scale) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn toggles_map_to_named_flags() {
        assert_eq!(WidgetKind::ButtonA.flag(), WidgetSet::BUTTON_A);
        assert_eq!(WidgetKind::Dpad.flag(), WidgetSet::DPAD);
        assert_eq!(WidgetKind::ButtonCapture.flag(), WidgetSet::BUTTON_CAPTURE);
        assert_eq!(WidgetKind::StickR.toggle_key(), "buttonToggle12");
    }

    #[test]
    fn defaults_hide_home_and_capture() {
        let config = OverlayConfig::from_store(&MemoryStore::default());
        assert!(config.is_enabled(WidgetKind::ButtonA));
        assert!(!config.is_enabled(WidgetKind::ButtonHome));
        assert!(!config.is_enabled(WidgetKind::ButtonCapture));
        assert_eq!(config.enabled_kinds().count(), 13);
        assert_eq!(config.scale_multiplier(), 1.0);
    }

    #[test]
    fn reads_toggles_and_scale_from_store() {
        let mut store = MemoryStore::default();
        store.put_bool("buttonToggle0", false);
        store.put_bool("buttonToggle13", true);
        store.put_int(KEY_CONTROL_SCALE, 150);
        store.put_bool(KEY_TOUCH_ENABLED, false);

        let config = OverlayConfig::from_store(&store);
        assert!(!config.is_enabled(WidgetKind::ButtonA));
        assert!(config.is_enabled(WidgetKind::ButtonHome));
        assert!(!config.touch_enabled);
        assert_eq!(config.scale_multiplier(), 2.0);
        assert_eq!(config.scaled_size(WidgetKind::ButtonA), (128, 128));
    }

    #[test]
    fn out_of_range_scale_is_clamped() {
        let mut store = MemoryStore::default();
        store.put_int(KEY_CONTROL_SCALE, 400);
        assert_eq!(OverlayConfig::from_store(&store).control_scale, 150);

        store.put_int(KEY_CONTROL_SCALE, -3);
        assert_eq!(OverlayConfig::from_store(&store).control_scale, 0);
    }

    #[test]
    fn write_then_read_keeps_snapshot() {
        let config = OverlayConfig {
            widgets: WidgetSet::DPAD | WidgetSet::STICK_L,
            control_scale: 20,
            touch_enabled: false,
            joystick_recenter: false,
            dpad_slide: false,
            show_overlay: true,
        };
        let mut store = MemoryStore::default();
        config.write_to(&mut store);
        assert_eq!(OverlayConfig::from_store(&store), config);
    }

    #[test]
    fn position_keys_carry_orientation() {
        assert_eq!(position_key_x(13, Orientation::Landscape), "13-X");
        assert_eq!(position_key_y(4, Orientation::Portrait), "4-Portrait-Y");
    }
}
