use glam::Vec2;
use log::debug;

use crate::input::{
    InputStrategy, PointerChannel, PointerEvent, Subscriptions, TouchPhase, TouchTracker,
};
use crate::params::{ParamError, ParameterStore};
use crate::viewport::{Frustum, OrthographicCamera, ViewportFitter};

/// Routes window events to the fitter and the pointer channel according to
/// the subscriptions of the strategy resolved at startup.
#[derive(Debug)]
pub struct EventDispatcher {
    subscriptions: Subscriptions,
    fitter: ViewportFitter,
    channel: PointerChannel,
    touches: TouchTracker,
    camera: OrthographicCamera,
}

impl EventDispatcher {
    pub fn new(strategy: InputStrategy, store: ParameterStore) -> Self {
        Self {
            subscriptions: strategy.subscriptions(),
            fitter: ViewportFitter::new(store.clone()),
            channel: PointerChannel::new(store),
            touches: TouchTracker::new(),
            camera: OrthographicCamera::new(),
        }
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    /// Startup fit, applied whatever the subscriptions are.
    pub fn fit(&mut self, width: u32, height: u32) -> Result<Frustum, ParamError> {
        self.fitter.apply(&mut self.camera, width, height)
    }

    /// Refits on resize when subscribed. Returns whether the framing changed.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<bool, ParamError> {
        if !self.subscriptions.resize {
            return Ok(false);
        }
        if width == 0 || height == 0 {
            debug!("ignoring zero-area resize");
            return Ok(false);
        }
        self.fit(width, height)?;
        Ok(true)
    }

    pub fn on_cursor_moved(&mut self, position: Vec2) -> Result<Option<Vec2>, ParamError> {
        if !self.subscriptions.mouse_move {
            return Ok(None);
        }
        self.channel.on_move(&PointerEvent::Mouse(position))
    }

    pub fn on_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Vec2,
    ) -> Result<Option<Vec2>, ParamError> {
        if !self.subscriptions.touch_move {
            return Ok(None);
        }
        match self.touches.update(id, phase, position) {
            Some(event) => self.channel.on_move(&event),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(strategy: InputStrategy) -> (EventDispatcher, ParameterStore) {
        let store = ParameterStore::default();
        let mut dispatcher = EventDispatcher::new(strategy, store.clone());
        dispatcher.fit(800, 800).unwrap();
        (dispatcher, store)
    }

    #[test]
    fn touch_strategy_ignores_resize_and_cursor() {
        let (mut dispatcher, store) = dispatcher(InputStrategy::Touch);
        let frustum = dispatcher.camera().frustum();

        assert!(!dispatcher.on_resize(1600, 800).unwrap());
        assert_eq!(dispatcher.camera().frustum(), frustum);
        assert_eq!(store.resolution(), Some(Vec2::new(800.0, 800.0)));

        assert_eq!(dispatcher.on_cursor_moved(Vec2::new(10.0, 20.0)).unwrap(), None);
        assert_eq!(store.pointer(), Some(Vec2::ZERO));
    }

    #[test]
    fn touch_strategy_tracks_first_contact() {
        let (mut dispatcher, store) = dispatcher(InputStrategy::Touch);
        dispatcher
            .on_touch(1, TouchPhase::Started, Vec2::new(5.0, 5.0))
            .unwrap();
        dispatcher
            .on_touch(2, TouchPhase::Started, Vec2::new(9.0, 9.0))
            .unwrap();
        dispatcher
            .on_touch(2, TouchPhase::Moved, Vec2::new(1.0, 1.0))
            .unwrap();
        assert_eq!(store.pointer(), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn pointer_strategy_refits_and_ignores_touch() {
        let (mut dispatcher, store) = dispatcher(InputStrategy::Pointer);

        assert!(dispatcher.on_resize(1600, 800).unwrap());
        assert_eq!(dispatcher.camera().frustum().top, 0.5);
        assert_eq!(store.resolution(), Some(Vec2::new(1600.0, 800.0)));

        dispatcher
            .on_touch(1, TouchPhase::Moved, Vec2::new(3.0, 4.0))
            .unwrap();
        assert_eq!(store.pointer(), Some(Vec2::ZERO));

        dispatcher.on_cursor_moved(Vec2::new(10.0, 20.0)).unwrap();
        assert_eq!(store.pointer(), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn zero_area_resize_keeps_framing() {
        let (mut dispatcher, store) = dispatcher(InputStrategy::Pointer);
        let frustum = dispatcher.camera().frustum();
        assert!(!dispatcher.on_resize(0, 600).unwrap());
        assert_eq!(dispatcher.camera().frustum(), frustum);
        assert_eq!(store.resolution(), Some(Vec2::new(800.0, 800.0)));
    }
}
