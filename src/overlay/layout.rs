//! Widget registry and default layout.
//!
//! Widgets only ever come into existence through [`WidgetLayout::rebuild`].
//! Positions live in the [`LayoutStore`] as top-left pixel offsets keyed by
//! widget id and orientation, sizes come from the config's scale.

use super::geometry::Rect;
use super::widget::OverlayWidget;
use crate::config::{position_key_x, position_key_y, Orientation, OverlayConfig, WidgetKind};
use crate::persistence::LayoutStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Overlay surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn larger(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn smaller(&self) -> u32 {
        self.width.min(self.height)
    }
}

// Widget centers in permille: x of the horizontal extent, y of the vertical one
const LANDSCAPE_LAYOUT: [(WidgetKind, u16, u16); 15] = [
    (WidgetKind::ButtonA, 900, 600),
    (WidgetKind::ButtonB, 830, 780),
    (WidgetKind::ButtonX, 830, 420),
    (WidgetKind::ButtonY, 760, 600),
    (WidgetKind::TriggerL, 200, 80),
    (WidgetKind::TriggerR, 800, 80),
    (WidgetKind::TriggerZl, 80, 80),
    (WidgetKind::TriggerZr, 920, 80),
    (WidgetKind::ButtonPlus, 560, 920),
    (WidgetKind::ButtonMinus, 440, 920),
    (WidgetKind::Dpad, 170, 760),
    (WidgetKind::StickL, 150, 420),
    (WidgetKind::StickR, 650, 760),
    (WidgetKind::ButtonHome, 660, 920),
    (WidgetKind::ButtonCapture, 340, 920),
];

// Portrait keeps the game in the top half
const PORTRAIT_LAYOUT: [(WidgetKind, u16, u16); 15] = [
    (WidgetKind::ButtonA, 880, 720),
    (WidgetKind::ButtonB, 780, 800),
    (WidgetKind::ButtonX, 780, 640),
    (WidgetKind::ButtonY, 680, 720),
    (WidgetKind::TriggerL, 230, 500),
    (WidgetKind::TriggerR, 770, 500),
    (WidgetKind::TriggerZl, 90, 500),
    (WidgetKind::TriggerZr, 910, 500),
    (WidgetKind::ButtonPlus, 600, 950),
    (WidgetKind::ButtonMinus, 400, 950),
    (WidgetKind::Dpad, 220, 850),
    (WidgetKind::StickL, 200, 650),
    (WidgetKind::StickR, 640, 880),
    (WidgetKind::ButtonHome, 740, 950),
    (WidgetKind::ButtonCapture, 260, 950),
];

/// Top-left position of a widget in the default layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultPosition {
    pub kind: WidgetKind,
    pub x: f32,
    pub y: f32,
}

/// Computes the default layout for every widget kind.
///
/// Landscape spreads x over the larger screen dimension and y over the
/// smaller one, portrait the other way round. Each widget is centered on its
/// permille point, so the layout is the same at any resolution.
pub fn default_layout(
    screen: ScreenSize,
    orientation: Orientation,
    config: &OverlayConfig,
) -> Vec<DefaultPosition> {
    let (table, max_x, max_y) = match orientation {
        Orientation::Landscape => (&LANDSCAPE_LAYOUT, screen.larger(), screen.smaller()),
        Orientation::Portrait => (&PORTRAIT_LAYOUT, screen.smaller(), screen.larger()),
    };

    table
        .iter()
        .map(|&(kind, px, py)| {
            let (w, h) = config.scaled_size(kind);
            let cx = px as f32 * max_x as f32 / 1000.0;
            let cy = py as f32 * max_y as f32 / 1000.0;
            DefaultPosition {
                kind,
                x: cx - w as f32 / 2.0,
                y: cy - h as f32 / 2.0,
            }
        })
        .collect()
}

/// Writes the default layout for one orientation. Does not commit.
pub fn write_default_layout(
    store: &mut dyn LayoutStore,
    screen: ScreenSize,
    orientation: Orientation,
    config: &OverlayConfig,
) {
    for position in default_layout(screen, orientation, config) {
        let id = position.kind.layout_id();
        store.put_float(&position_key_x(id, orientation), position.x);
        store.put_float(&position_key_y(id, orientation), position.y);
    }
    info!(
        "Default {:?} layout written for {}x{}",
        orientation, screen.width, screen.height
    );
}

/// Live set of widgets.
#[derive(Debug, Clone, Default)]
pub struct WidgetLayout {
    widgets: Vec<OverlayWidget>,
    kinds: Vec<WidgetKind>,
}

impl WidgetLayout {
    pub fn build(config: &OverlayConfig, store: &dyn LayoutStore, orientation: Orientation) -> Self {
        let mut layout = Self::default();
        layout.rebuild(config, store, orientation);
        layout
    }

    /// Drops every widget and recreates the enabled ones. Contacts that owned
    /// a widget become unowned.
    pub fn rebuild(
        &mut self,
        config: &OverlayConfig,
        store: &dyn LayoutStore,
        orientation: Orientation,
    ) {
        self.widgets.clear();
        self.kinds.clear();

        if !config.show_overlay {
            info!("Overlay hidden, no widgets built");
            return;
        }

        for kind in config.enabled_kinds() {
            let bounds = widget_bounds(kind, config, store, orientation);
            debug!("Building {} at {:?}", kind, bounds);
            self.widgets.push(OverlayWidget::from_kind(kind, bounds));
            self.kinds.push(kind);
        }
        info!("Overlay rebuilt with {} widgets", self.widgets.len());
    }

    pub fn widgets(&self) -> &[OverlayWidget] {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut [OverlayWidget] {
        &mut self.widgets
    }

    pub fn get(&self, kind: WidgetKind) -> Option<&OverlayWidget> {
        self.kinds
            .iter()
            .position(|k| *k == kind)
            .map(|i| &self.widgets[i])
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

fn widget_bounds(
    kind: WidgetKind,
    config: &OverlayConfig,
    store: &dyn LayoutStore,
    orientation: Orientation,
) -> Rect {
    let (w, h) = config.scaled_size(kind);
    let id = kind.layout_id();
    let x = stored_coordinate(store, &position_key_x(id, orientation));
    let y = stored_coordinate(store, &position_key_y(id, orientation));
    Rect::from_origin_size(x, y, w, h)
}

// Largest offset accepted from the store, in either direction
const MAX_STORED_OFFSET: f32 = 65536.0;

fn stored_coordinate(store: &dyn LayoutStore, key: &str) -> i32 {
    match store.get_float(key) {
        None => 0,
        Some(v) if v.is_finite() && v.abs() <= MAX_STORED_OFFSET => v as i32,
        Some(v) => {
            warn!("Ignoring out of range position {} = {}", key, v);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WidgetSet, KEY_CONTROL_SCALE};
    use crate::persistence::MemoryStore;

    fn relative_centers(screen: ScreenSize) -> Vec<(f32, f32)> {
        let config = OverlayConfig::default();
        let mut store = MemoryStore::default();
        write_default_layout(&mut store, screen, Orientation::Landscape, &config);

        let layout = WidgetLayout::build(&config, &store, Orientation::Landscape);
        layout
            .widgets()
            .iter()
            .map(|w| {
                let b = w.bounds();
                (
                    b.center_x() as f32 / screen.larger() as f32,
                    b.center_y() as f32 / screen.smaller() as f32,
                )
            })
            .collect()
    }

    #[test]
    fn default_layout_is_resolution_independent() {
        let small = relative_centers(ScreenSize::new(1280, 720));
        let large = relative_centers(ScreenSize::new(2560, 1440));

        assert_eq!(small.len(), large.len());
        for (a, b) in small.iter().zip(large.iter()) {
            assert!((a.0 - b.0).abs() < 0.002, "{:?} vs {:?}", a, b);
            assert!((a.1 - b.1).abs() < 0.002, "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn default_layout_follows_permille_table() {
        let config = OverlayConfig::default();
        let layout = default_layout(ScreenSize::new(2000, 1000), Orientation::Landscape, &config);
        let a = layout
            .iter()
            .find(|p| p.kind == WidgetKind::ButtonA)
            .unwrap();
        // center (1800, 600), 64x64 at scale 1.0
        assert_eq!((a.x, a.y), (1768.0, 568.0));
    }

    #[test]
    fn screen_dimensions_are_swapped_for_portrait() {
        let config = OverlayConfig::default();
        let screen = ScreenSize::new(1000, 2000);
        let layout = default_layout(screen, Orientation::Portrait, &config);
        let a = layout
            .iter()
            .find(|p| p.kind == WidgetKind::ButtonA)
            .unwrap();
        assert_eq!((a.x + 32.0, a.y + 32.0), (880.0, 1440.0));
    }

    #[test]
    fn scale_and_position_define_bounds() {
        let mut store = MemoryStore::default();
        store.put_int(KEY_CONTROL_SCALE, 150);
        store.put_float("0-X", 10.0);
        store.put_float("0-Y", 20.0);
        let config = OverlayConfig::from_store(&store);

        let layout = WidgetLayout::build(&config, &store, Orientation::Landscape);
        let a = layout.get(WidgetKind::ButtonA).unwrap();
        assert_eq!(a.bounds(), Rect::new(10, 20, 138, 148));
    }

    #[test]
    fn out_of_range_position_falls_back_to_origin() {
        let mut store = MemoryStore::default();
        store.put_float("0-X", 3.0e9);
        store.put_float("0-Y", f32::NAN);
        store.put_float("1-X", -1.0e12);
        let config = OverlayConfig {
            widgets: WidgetSet::BUTTON_A | WidgetSet::BUTTON_B,
            ..OverlayConfig::default()
        };

        let layout = WidgetLayout::build(&config, &store, Orientation::Landscape);
        let a = layout.get(WidgetKind::ButtonA).unwrap().bounds();
        let b = layout.get(WidgetKind::ButtonB).unwrap().bounds();
        assert_eq!(a, Rect::new(0, 0, 64, 64));
        assert_eq!(b, Rect::new(0, 0, 64, 64));
        assert!(a.contains(32, 32));
    }

    #[test]
    fn missing_position_defaults_to_origin() {
        let config = OverlayConfig {
            widgets: WidgetSet::DPAD,
            ..OverlayConfig::default()
        };
        let layout = WidgetLayout::build(&config, &MemoryStore::default(), Orientation::Portrait);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.widgets()[0].bounds(), Rect::new(0, 0, 128, 128));
        assert_eq!(layout.widgets()[0].layout_id(), 13);
    }

    #[test]
    fn orientation_selects_its_own_keys() {
        let config = OverlayConfig {
            widgets: WidgetSet::STICK_R,
            ..OverlayConfig::default()
        };
        let mut store = MemoryStore::default();
        store.put_float("5-X", 300.0);
        store.put_float("5-Portrait-X", 40.0);

        let landscape = WidgetLayout::build(&config, &store, Orientation::Landscape);
        let portrait = WidgetLayout::build(&config, &store, Orientation::Portrait);
        assert_eq!(landscape.widgets()[0].bounds().left, 300);
        assert_eq!(portrait.widgets()[0].bounds().left, 40);
    }

    #[test]
    fn hidden_overlay_builds_nothing() {
        let config = OverlayConfig {
            show_overlay: false,
            ..OverlayConfig::default()
        };
        let layout = WidgetLayout::build(&config, &MemoryStore::default(), Orientation::Landscape);
        assert!(layout.is_empty());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let config = OverlayConfig::default();
        let store = MemoryStore::default();
        let mut layout = WidgetLayout::build(&config, &store, Orientation::Landscape);
        let first = layout.widgets().to_vec();
        layout.rebuild(&config, &store, Orientation::Landscape);
        assert_eq!(layout.widgets(), first.as_slice());
    }
}
