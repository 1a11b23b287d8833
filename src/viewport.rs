//! Orthographic framing that keeps the 2×2 preview quad undistorted.

use glam::{Mat4, Vec2, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::params::{ParamError, ParamName, ParamValue, ParameterStore};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 10.0;

/// Bounds of an orthographic projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Fits the quad into a `width` × `height` window.
    ///
    /// The quad fills the shorter window dimension and is letterboxed or
    /// pillarboxed along the longer one. Both dimensions must be positive.
    pub fn fit(width: u32, height: u32) -> Self {
        let (width, height) = (width as f32, height as f32);
        let aspect = width / height;
        let (half_width, half_height) = if aspect >= 1.0 {
            (1.0, height / width)
        } else {
            (aspect, 1.0)
        };
        Self {
            left: -half_width,
            right: half_width,
            top: half_height,
            bottom: -half_height,
            near: NEAR,
            far: FAR,
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
            near: NEAR,
            far: FAR,
        }
    }
}

/// Camera looking down -Z at the quad from one unit away.
///
/// Frustum changes only reach [`view_proj`](Self::view_proj) after
/// [`commit_projection`](Self::commit_projection).
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    frustum: Frustum,
    position: Vec3,
    view_proj: Mat4,
    dirty: bool,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        let mut camera = Self {
            frustum: Frustum::default(),
            position: Vec3::new(0.0, 0.0, 1.0),
            view_proj: Mat4::IDENTITY,
            dirty: true,
        };
        camera.commit_projection();
        camera
    }
}

impl OrthographicCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
        self.dirty = true;
    }

    pub fn commit_projection(&mut self) {
        let view = Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y);
        self.view_proj = self.frustum.projection() * view;
        self.dirty = false;
    }

    pub fn needs_commit(&self) -> bool {
        self.dirty
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }
}

/// Refits the camera to the window and publishes the viewport size.
#[derive(Debug, Clone)]
pub struct ViewportFitter {
    store: ParameterStore,
}

impl ViewportFitter {
    pub fn new(store: ParameterStore) -> Self {
        Self { store }
    }

    /// Recomputes the frustum for the window, commits it to the camera and
    /// writes `u_resolution` when the store has that entry.
    pub fn apply(
        &self,
        camera: &mut OrthographicCamera,
        width: u32,
        height: u32,
    ) -> Result<Frustum, ParamError> {
        let frustum = Frustum::fit(width, height);
        camera.set_frustum(frustum);
        camera.commit_projection();

        let resolution = ParamValue::Vec2(Vec2::new(width as f32, height as f32));
        let written = self.store.set_if_present(ParamName::Resolution, resolution)?;
        debug!(
            "fit {width}x{height}: left={:.3} right={:.3} top={:.3} bottom={:.3} (resolution {})",
            frustum.left,
            frustum.right,
            frustum.top,
            frustum.bottom,
            if written { "updated" } else { "not declared" }
        );
        Ok(frustum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterLayout;

    fn bounds(frustum: Frustum) -> [f32; 4] {
        [frustum.left, frustum.right, frustum.top, frustum.bottom]
    }

    #[test]
    fn square_window_fills_exactly() {
        assert_eq!(bounds(Frustum::fit(100, 100)), [-1.0, 1.0, 1.0, -1.0]);
    }

    #[test]
    fn landscape_letterboxes_vertically() {
        let frustum = Frustum::fit(1600, 800);
        assert_eq!(frustum.right, 1.0);
        assert_eq!(frustum.top, 0.5);
    }

    #[test]
    fn portrait_pillarboxes_horizontally() {
        let frustum = Frustum::fit(800, 1600);
        assert_eq!(frustum.right, 0.5);
        assert_eq!(frustum.top, 1.0);
    }

    #[test]
    fn framing_is_symmetric_and_matches_aspect() {
        let sizes = [1u32, 2, 3, 7, 100, 333, 640, 719, 1080, 1920, 4096];
        for &width in &sizes {
            for &height in &sizes {
                let frustum = Frustum::fit(width, height);
                let (w, h) = (width as f32, height as f32);
                assert_eq!(frustum.right - frustum.left, 2.0 * (w / h).min(1.0));
                assert_eq!(frustum.top - frustum.bottom, 2.0 * (h / w).min(1.0));
                assert_eq!(frustum.left, -frustum.right);
                assert_eq!(frustum.bottom, -frustum.top);
                assert_eq!((frustum.near, frustum.far), (NEAR, FAR));
            }
        }
    }

    #[test]
    fn refitting_is_idempotent() {
        let first = Frustum::fit(1366, 768);
        let second = Frustum::fit(1366, 768);
        assert_eq!(bounds(first).map(f32::to_bits), bounds(second).map(f32::to_bits));
    }

    #[test]
    fn apply_commits_camera_and_writes_resolution() {
        let store = ParameterStore::default();
        let fitter = ViewportFitter::new(store.clone());
        let mut camera = OrthographicCamera::new();
        let frustum = fitter.apply(&mut camera, 1600, 800).unwrap();
        assert!(!camera.needs_commit());
        assert_eq!(camera.frustum(), frustum);
        assert_eq!(store.resolution(), Some(Vec2::new(1600.0, 800.0)));

        // The quad corner at (1, 0.5) lands on the top-right of clip space.
        let corner = camera.view_proj().project_point3(Vec3::new(1.0, 0.5, 0.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn apply_skips_missing_resolution() {
        let store = ParameterStore::new(&ParameterLayout::with_names([ParamName::Time]));
        let fitter = ViewportFitter::new(store.clone());
        let mut camera = OrthographicCamera::new();
        assert!(fitter.apply(&mut camera, 640, 480).is_ok());
        assert_eq!(store.resolution(), None);
    }

    #[test]
    fn set_frustum_requires_commit() {
        let mut camera = OrthographicCamera::new();
        let before = camera.view_proj();
        camera.set_frustum(Frustum::fit(200, 100));
        assert!(camera.needs_commit());
        assert_eq!(camera.view_proj(), before);
        camera.commit_projection();
        assert_ne!(camera.view_proj(), before);
    }
}
