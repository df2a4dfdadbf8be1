//! Watch face engine
//!
//! Receives the platform lifecycle events, keeps the display mode and paint
//! style current and decides when the interactive redraw timer runs. Timer
//! decisions are returned as [`TimerAction`]s for a driver such as
//! [`RedrawScheduler`](crate::system::scheduler::RedrawScheduler) to carry out.

use chrono::{FixedOffset, NaiveDateTime, TimeDelta};
use embedded_graphics::{draw_target::DrawTarget, primitives::Rectangle};

use crate::{
    debug, info,
    system::{
        config::{ColorMode, FaceConfig, Properties, ScreenShape},
        time::{offset_from_secs, Clock, TimeError},
        timer::{RedrawTimer, RedrawToken, TimerAction},
    },
    ui::{frame::Frame, style::FaceStyle, sundial_watchface::SundialFace, DisplayMode, RenderState, WatchFace},
    warn,
    weather::store::Preferences,
};

pub struct Engine<'a, C: Clock> {
    store: &'a Preferences,
    clock: C,
    face: SundialFace,
    shape: ScreenShape,
    properties: Properties,
    mode: DisplayMode,
    style: FaceStyle,
    zone: FixedOffset,
    visible: bool,
    destroyed: bool,
    invalidated: bool,
    timer: RedrawTimer,
}

impl<'a, C: Clock> Engine<'a, C> {
    /// Create the engine, interactive and not yet visible
    pub fn on_create(store: &'a Preferences, clock: C) -> Self {
        let shape = ScreenShape::Square;
        let properties = Properties::default();
        let mode = DisplayMode::Interactive;
        let zone = clock.utc_offset();
        Self {
            store,
            clock,
            face: SundialFace,
            shape,
            properties,
            mode,
            style: FaceStyle::new(FaceConfig::for_shape(shape), mode, properties.low_bit_ambient),
            zone,
            visible: false,
            destroyed: false,
            invalidated: true,
            timer: RedrawTimer::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn style(&self) -> &FaceStyle {
        &self.style
    }

    pub fn config(&self) -> &'static FaceConfig {
        FaceConfig::for_shape(self.shape)
    }

    pub fn timer(&self) -> &RedrawTimer {
        &self.timer
    }

    pub fn on_visibility_changed(&mut self, visible: bool) -> TimerAction {
        if self.destroyed {
            return TimerAction::Unchanged;
        }
        info!("Visibility changed: {}", visible);
        self.visible = visible;
        if visible {
            // The zone may have changed while hidden
            self.zone = self.clock.utc_offset();
        }
        self.update_timer()
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) -> TimerAction {
        if self.destroyed {
            return TimerAction::Unchanged;
        }
        let mode = if ambient {
            DisplayMode::Ambient
        } else {
            DisplayMode::Interactive
        };
        if mode != self.mode {
            debug!("Ambient mode: {}", ambient);
            self.mode = mode;
            self.rebuild_style();
            self.invalidated = true;
        }
        self.update_timer()
    }

    pub fn on_properties_changed(&mut self, properties: Properties) {
        if self.destroyed {
            return;
        }
        debug!("Low bit ambient: {}", properties.low_bit_ambient);
        self.properties = properties;
        self.rebuild_style();
    }

    pub fn on_apply_window_insets(&mut self, is_round: bool) {
        if self.destroyed {
            return;
        }
        self.shape = ScreenShape::from_insets(is_round);
        self.rebuild_style();
    }

    /// System minute tick, the only redraw source in ambient mode
    pub fn on_time_tick(&mut self) -> TimerAction {
        if self.destroyed {
            return TimerAction::Unchanged;
        }
        self.invalidate()
    }

    /// Switch to the time zone `offset_secs` east of UTC
    pub fn on_time_zone_changed(&mut self, offset_secs: i32) -> Result<(), TimeError> {
        if self.destroyed {
            return Ok(());
        }
        match offset_from_secs(offset_secs) {
            Ok(zone) => {
                debug!("Time zone offset: {}s", offset_secs);
                self.zone = zone;
                self.invalidated = true;
                Ok(())
            }
            Err(err) => {
                warn!("Ignoring time zone offset {}: {}", offset_secs, err);
                Err(err)
            }
        }
    }

    /// Stop all redraws; every later event is ignored
    pub fn on_destroy(&mut self) -> TimerAction {
        info!("Destroying watch face");
        self.destroyed = true;
        self.timer.cancel();
        TimerAction::Cancel
    }

    /// Handle an expired redraw.
    ///
    /// Returns `None` if the token is stale or the engine was destroyed.
    pub fn on_redraw_timer(&mut self, token: RedrawToken) -> Option<TimerAction> {
        if self.destroyed {
            return None;
        }
        let should_run = self.should_timer_be_running();
        let action = self.timer.fire(token, should_run, self.clock.epoch_millis())?;
        self.invalidated = true;
        Some(action)
    }

    /// Request a redraw and re-evaluate the timer
    pub fn invalidate(&mut self) -> TimerAction {
        self.invalidated = true;
        self.update_timer()
    }

    /// Whether a redraw was requested since the last call
    pub fn take_invalidated(&mut self) -> bool {
        core::mem::take(&mut self.invalidated)
    }

    /// The timer only runs while visible and interactive
    pub fn should_timer_be_running(&self) -> bool {
        !self.destroyed && self.visible && self.mode == DisplayMode::Interactive
    }

    /// Local wall-clock time
    pub fn local_time(&self) -> NaiveDateTime {
        let now = self.clock.now();
        now.checked_add_signed(TimeDelta::seconds(self.zone.local_minus_utc().into()))
            .unwrap_or(now)
    }

    /// Lay out the current frame without drawing it
    pub fn frame(&self, bounds: Rectangle) -> Frame {
        self.face.compose(&self.render_state(bounds), &self.store.weather())
    }

    /// Paint the face onto `target`
    pub fn draw<D>(&self, target: &mut D, bounds: Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        self.face
            .draw(target, &self.render_state(bounds), &self.store.weather())
    }

    fn render_state(&self, bounds: Rectangle) -> RenderState<'_> {
        RenderState {
            time: self.local_time(),
            mode: self.mode,
            bounds,
            config: self.config(),
            style: &self.style,
        }
    }

    fn rebuild_style(&mut self) {
        self.style = FaceStyle::new(self.config(), self.mode, self.properties.low_bit_ambient);
    }

    fn update_timer(&mut self) -> TimerAction {
        let should_run = self.should_timer_be_running();
        self.timer.update(should_run, self.clock.epoch_millis())
    }
}
