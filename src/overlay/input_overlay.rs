//! Overlay lifecycle with statum state machine
//!
//! # State Machine
//!
//! ```text
//! Initializing ──► Running ◄──► Editing
//! ```
//!
//! `Running` turns touches into controller events, `Editing` turns them into
//! widget moves. Motion samples, physical pad input, rotation, config changes
//! and layout resets work in both.
//!
//! # Architecture
//!
//! ```text
//! TouchFrame ──► PointerTracker ──► widgets ──┐
//!                                             ├──► EventSink
//! SensorSample ──► MotionRouter ──────────────┤
//! GamepadInput ──► GamepadTranslator ─────────┘
//! ```

use super::editor::LayoutEditor;
use super::layout::{write_default_layout, ScreenSize, WidgetLayout};
use super::touch::{Pointer, TouchFrame, TouchPhase, WidgetInput};
use super::tracker::PointerTracker;
use super::widget::TouchContext;
use crate::config::{Orientation, OverlayConfig, KEY_OVERLAY_INIT};
use crate::controller::{DeviceId, EventSink, GamepadInput, GamepadTranslator};
use crate::motion::{MotionRouter, SensorSample};
use crate::persistence::{LayoutStore, StoreError};
use statum::{machine, state};
use tracing::{debug, error, info};

#[state]
#[derive(Debug, Clone)]
pub enum OverlayState {
    Initializing, // Config loaded, no widgets yet
    Running,      // Touches drive widgets
    Editing,      // Touches move widgets
}

#[machine]
pub struct InputOverlay<S: OverlayState> {
    // Snapshot every rebuild is made from
    config: OverlayConfig,

    screen: ScreenSize,
    orientation: Orientation,

    store: Box<dyn LayoutStore>,
    sink: Box<dyn EventSink>,

    layout: WidgetLayout,
    tracker: PointerTracker,
    motion: MotionRouter,
    gamepad: GamepadTranslator,
    editor: LayoutEditor,
}

impl<S: OverlayState> InputOverlay<S> {
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    pub fn store(&self) -> &dyn LayoutStore {
        self.store.as_ref()
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Feeds a sensor sample. Never touches widget state.
    pub fn handle_motion(&mut self, sample: SensorSample) {
        if let Some(events) = self.motion.on_sample(sample) {
            for event in events {
                self.sink.emit(event);
            }
        }
    }

    /// Feeds a physical pad sample. Widgets are not involved.
    pub fn handle_gamepad(&mut self, input: GamepadInput) {
        for event in self.gamepad.translate(input) {
            self.sink.emit(event);
        }
    }

    /// Recreates every widget from the current config and store.
    pub fn refresh(&mut self) {
        self.release_all();
        self.editor = LayoutEditor::new();
        self.tracker = PointerTracker::from_config(&self.config);
        self.layout
            .rebuild(&self.config, self.store.as_ref(), self.orientation);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        info!("Orientation changed to {:?}", orientation);
        self.orientation = orientation;
        self.refresh();
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    /// Stores a new config snapshot and rebuilds with it.
    pub fn apply_config(&mut self, config: OverlayConfig) -> Result<(), StoreError> {
        info!("Applying overlay config: {:?}", config);
        config.write_to(self.store.as_mut());
        self.config = config;
        let result = self.store.commit();
        if let Err(e) = &result {
            error!("Failed to persist overlay config: {}", e);
        }
        self.refresh();
        result
    }

    /// Regenerates the default layout for both orientations, commits it and
    /// rebuilds. The rebuild happens even if the commit fails.
    pub fn reset_layout(&mut self) -> Result<(), StoreError> {
        info!("Resetting overlay layout");
        self.write_defaults();
        let result = self.store.commit();
        if let Err(e) = &result {
            error!("Failed to persist default layout: {}", e);
        }
        self.refresh();
        result
    }

    fn write_defaults(&mut self) {
        for orientation in [Orientation::Landscape, Orientation::Portrait] {
            write_default_layout(self.store.as_mut(), self.screen, orientation, &self.config);
        }
        self.store.put_bool(KEY_OVERLAY_INIT, true);
    }

    // Lifts every held widget so nothing stays pressed downstream
    fn release_all(&mut self) {
        let ctx = TouchContext::from(&self.config);
        for widget in self.layout.widgets_mut() {
            let Some(owner) = widget.track_id() else {
                continue;
            };
            debug!("Releasing widget held by contact {}", owner);
            let pointer = Pointer {
                id: owner,
                x: 0.0,
                y: 0.0,
            };
            let delta = widget.update_status(&WidgetInput::new(TouchPhase::Up, &pointer), &ctx);
            for event in delta.into_events() {
                self.sink.emit(event);
            }
        }
    }
}

impl InputOverlay<Initializing> {
    pub fn create(store: Box<dyn LayoutStore>, sink: Box<dyn EventSink>) -> Self {
        let config = OverlayConfig::from_store(store.as_ref());
        info!(
            "Creating input overlay with {} enabled widgets",
            config.enabled_kinds().count()
        );
        let tracker = PointerTracker::from_config(&config);

        Self::new(
            config,
            ScreenSize::new(0, 0),
            Orientation::default(),
            store,
            sink,
            WidgetLayout::default(),
            tracker,
            MotionRouter::new(),
            GamepadTranslator::new(DeviceId::Player1),
            LayoutEditor::new(),
        )
    }

    /// Sizes the overlay, writes a default layout on first run and builds
    /// the widgets.
    pub fn initialize(
        mut self,
        screen: ScreenSize,
        orientation: Orientation,
    ) -> InputOverlay<Running> {
        self.screen = screen;
        self.orientation = orientation;

        if self.store.get_bool(KEY_OVERLAY_INIT) != Some(true) {
            info!("No saved layout, generating defaults");
            self.write_defaults();
            if let Err(e) = self.store.commit() {
                error!("Failed to persist default layout: {}", e);
            }
        }

        self.refresh();
        info!(
            "Input overlay running at {}x{} ({:?})",
            screen.width, screen.height, orientation
        );
        self.transition()
    }
}

impl InputOverlay<Running> {
    /// Handles a touch frame. Returns whether the overlay needs a redraw.
    pub fn handle_touch(&mut self, frame: &TouchFrame) -> bool {
        self.tracker
            .dispatch(frame, self.layout.widgets_mut(), self.sink.as_mut())
    }

    pub fn begin_editing(mut self) -> InputOverlay<Editing> {
        self.release_all();
        info!("Entering layout edit mode");
        self.transition()
    }
}

impl InputOverlay<Editing> {
    pub fn handle_touch(&mut self, frame: &TouchFrame) -> bool {
        self.editor.handle_touch(
            frame,
            &mut self.layout,
            self.store.as_mut(),
            self.screen,
            self.orientation,
        )
    }

    pub fn finish_editing(mut self) -> InputOverlay<Running> {
        self.editor.abort(&mut self.layout);
        info!("Leaving layout edit mode");
        self.transition()
    }
}

/// Overlay in whichever mode the host currently has it.
pub enum OverlaySession {
    Running(InputOverlay<Running>),
    Editing(InputOverlay<Editing>),
}

impl OverlaySession {
    pub fn is_editing(&self) -> bool {
        matches!(self, OverlaySession::Editing(_))
    }

    pub fn set_editing(self, editing: bool) -> Self {
        match (self, editing) {
            (OverlaySession::Running(overlay), true) => {
                OverlaySession::Editing(overlay.begin_editing())
            }
            (OverlaySession::Editing(overlay), false) => {
                OverlaySession::Running(overlay.finish_editing())
            }
            (session, _) => session,
        }
    }

    pub fn handle_touch(&mut self, frame: &TouchFrame) -> bool {
        match self {
            OverlaySession::Running(overlay) => overlay.handle_touch(frame),
            OverlaySession::Editing(overlay) => overlay.handle_touch(frame),
        }
    }

    pub fn handle_motion(&mut self, sample: SensorSample) {
        match self {
            OverlaySession::Running(overlay) => overlay.handle_motion(sample),
            OverlaySession::Editing(overlay) => overlay.handle_motion(sample),
        }
    }

    pub fn handle_gamepad(&mut self, input: GamepadInput) {
        match self {
            OverlaySession::Running(overlay) => overlay.handle_gamepad(input),
            OverlaySession::Editing(overlay) => overlay.handle_gamepad(input),
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        match self {
            OverlaySession::Running(overlay) => overlay.set_orientation(orientation),
            OverlaySession::Editing(overlay) => overlay.set_orientation(orientation),
        }
    }

    pub fn reset_layout(&mut self) -> Result<(), StoreError> {
        match self {
            OverlaySession::Running(overlay) => overlay.reset_layout(),
            OverlaySession::Editing(overlay) => overlay.reset_layout(),
        }
    }

    pub fn layout(&self) -> &WidgetLayout {
        match self {
            OverlaySession::Running(overlay) => overlay.layout(),
            OverlaySession::Editing(overlay) => overlay.layout(),
        }
    }
}

impl From<InputOverlay<Running>> for OverlaySession {
    fn from(overlay: InputOverlay<Running>) -> Self {
        OverlaySession::Running(overlay)
    }
}
