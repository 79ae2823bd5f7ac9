//! # Orbit Controller
//!
//! Camera orbit around a fixed target, driven by drag and wheel input.
//!
//! The controller is plain state: spherical coordinates around the target plus the
//! pending input deltas. Input calls only queue deltas; [`OrbitController::update`]
//! applies a damped share of them once per frame and re-applies the clamps. Distance
//! and polar angle are therefore inside their bounds after construction and after
//! every update, whatever input arrived in between.

use std::f32::consts::PI;

use cgmath::{Point3, Vector3};

use crate::config::OrbitConfig;

/// Keeps the polar angle strictly inside (0, π) so the up vector never degenerates.
const POLAR_EPSILON: f32 = 1e-6;
/// Bound on queued rotation per axis, in radians.
const MAX_PENDING_ROTATION: f32 = 4.0 * PI;
/// Bounds on the queued multiplicative zoom.
const MIN_PENDING_ZOOM: f32 = 1e-3;
const MAX_PENDING_ZOOM: f32 = 1e3;
/// Per-step zoom ratio, matching the usual orbit-control wheel feel.
const ZOOM_STEP: f32 = 0.95;
/// Movement below this is treated as settled.
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Point3<f32>,
    /// Rotation around +Y, measured from +Z toward +X
    azimuth: f32,
    /// Angle from +Y
    polar: f32,
    distance: f32,

    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,

    min_distance: f32,
    max_distance: f32,
    min_polar: f32,
    max_polar: f32,
    enable_damping: bool,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
}

impl OrbitController {
    /// Places the orbit so the camera starts at `position`, clamped into the bounds.
    pub fn new(position: Point3<f32>, config: &OrbitConfig) -> Self {
        let target = Point3::from(config.target);
        let offset = position - target;
        let distance = (offset.x * offset.x + offset.y * offset.y + offset.z * offset.z).sqrt();
        let (azimuth, polar) = if distance > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / distance).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        let min_polar = config.min_polar_angle.max(POLAR_EPSILON);
        let max_polar = config.max_polar_angle.min(PI - POLAR_EPSILON);

        let mut controller = Self {
            target,
            azimuth,
            polar,
            distance,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 1.0,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar,
            max_polar: max_polar.max(min_polar),
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
        };
        controller.apply_clamps();
        controller
    }

    /// Queues a drag of `(dx, dy)` pixels on a viewport `viewport_height` pixels tall.
    ///
    /// A drag across the full viewport height turns the orbit a full circle.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !dx.is_finite() || !dy.is_finite() || !(viewport_height > 0.0) {
            return;
        }

        let per_pixel = 2.0 * PI * self.rotate_speed / viewport_height;
        self.pending_azimuth = (self.pending_azimuth - dx * per_pixel)
            .clamp(-MAX_PENDING_ROTATION, MAX_PENDING_ROTATION);
        self.pending_polar = (self.pending_polar - dy * per_pixel)
            .clamp(-MAX_PENDING_ROTATION, MAX_PENDING_ROTATION);
    }

    /// Queues a zoom of `steps` wheel notches. Positive steps move the camera closer.
    pub fn zoom(&mut self, steps: f32) {
        if !steps.is_finite() {
            return;
        }

        let factor = ZOOM_STEP.powf(steps * self.zoom_speed);
        self.pending_zoom = (self.pending_zoom * factor).clamp(MIN_PENDING_ZOOM, MAX_PENDING_ZOOM);
    }

    /// Applies queued input for one frame. Returns `true` if the camera moved.
    pub fn update(&mut self) -> bool {
        let previous = (self.azimuth, self.polar, self.distance);
        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.azimuth = (self.azimuth + self.pending_azimuth * share).rem_euclid(2.0 * PI);
        self.polar += self.pending_polar * share;
        self.distance *= self.pending_zoom;
        self.pending_zoom = 1.0;
        self.apply_clamps();

        if self.enable_damping {
            self.pending_azimuth *= 1.0 - self.damping_factor;
            self.pending_polar *= 1.0 - self.damping_factor;
            if self.pending_azimuth.abs() < SETTLE_EPSILON {
                self.pending_azimuth = 0.0;
            }
            if self.pending_polar.abs() < SETTLE_EPSILON {
                self.pending_polar = 0.0;
            }
        } else {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
        }

        angular_change(previous.0, self.azimuth) > SETTLE_EPSILON
            || (previous.1 - self.polar).abs() > SETTLE_EPSILON
            || (previous.2 - self.distance).abs() > SETTLE_EPSILON
    }

    /// Whether queued input remains to be applied.
    #[cfg(test)]
    pub fn has_updates(&self) -> bool {
        self.pending_azimuth != 0.0 || self.pending_polar != 0.0 || self.pending_zoom != 1.0
    }

    fn apply_clamps(&mut self) {
        self.polar = self.polar.clamp(self.min_polar, self.max_polar);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Point3<f32> {
        let (polar_sin, polar_cos) = self.polar.sin_cos();
        let (azimuth_sin, azimuth_cos) = self.azimuth.sin_cos();
        self.target
            + Vector3::new(
                polar_sin * azimuth_sin,
                polar_cos,
                polar_sin * azimuth_cos,
            ) * self.distance
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    #[cfg(test)]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[cfg(test)]
    pub fn polar(&self) -> f32 {
        self.polar
    }

    #[cfg(test)]
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    #[cfg(test)]
    pub fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    #[cfg(test)]
    pub fn polar_bounds(&self) -> (f32, f32) {
        (self.min_polar, self.max_polar)
    }
}

fn angular_change(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(2.0 * PI);
    diff.min(2.0 * PI - diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> OrbitController {
        OrbitController::new(Point3::new(6.0, 6.5, 9.0), &OrbitConfig::default())
    }

    fn assert_within_bounds(controller: &OrbitController) {
        let (min_d, max_d) = controller.distance_bounds();
        let (min_p, max_p) = controller.polar_bounds();
        assert!(controller.distance() >= min_d && controller.distance() <= max_d);
        assert!(controller.polar() >= min_p && controller.polar() <= max_p);
    }

    #[test]
    fn initial_position_round_trips_when_inside_bounds() {
        let controller = controller();
        let eye = controller.eye();

        assert!((eye.x - 6.0).abs() < 1e-4);
        assert!((eye.y - 6.5).abs() < 1e-4);
        assert!((eye.z - 9.0).abs() < 1e-4);
        assert_within_bounds(&controller);
    }

    #[test]
    fn initial_position_outside_bounds_is_clamped() {
        let controller =
            OrbitController::new(Point3::new(0.0, 100.0, 0.1), &OrbitConfig::default());

        assert_eq!(controller.distance(), 14.0);
        assert_eq!(controller.polar(), PI / 4.0);
    }

    #[test]
    fn wheel_cannot_escape_distance_bounds() {
        let mut controller = controller();

        for _ in 0..200 {
            controller.zoom(10.0);
            controller.update();
        }
        assert_eq!(controller.distance(), 6.0);

        for _ in 0..200 {
            controller.zoom(-10.0);
            controller.update();
        }
        assert_eq!(controller.distance(), 14.0);
    }

    #[test]
    fn drag_cannot_escape_polar_bounds() {
        let mut controller = controller();

        controller.rotate(0.0, -10_000.0, 600.0);
        for _ in 0..100 {
            controller.update();
        }
        assert_eq!(controller.polar(), 3.0 * PI / 5.0);

        controller.rotate(0.0, 10_000.0, 600.0);
        for _ in 0..100 {
            controller.update();
        }
        assert_eq!(controller.polar(), PI / 4.0);
    }

    #[test]
    fn random_input_sequences_stay_clamped() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut controller = controller();

        for _ in 0..5_000 {
            match rng.u8(0..4) {
                0 => controller.rotate(
                    rng.f32() * 4000.0 - 2000.0,
                    rng.f32() * 4000.0 - 2000.0,
                    rng.f32() * 1000.0 + 1.0,
                ),
                1 => controller.zoom(rng.f32() * 400.0 - 200.0),
                2 => controller.zoom(f32::INFINITY),
                _ => {
                    controller.update();
                    assert_within_bounds(&controller);
                    assert!(controller.eye().x.is_finite());
                }
            }
        }
        controller.update();
        assert_within_bounds(&controller);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut controller = controller();
        let start = controller.azimuth();

        controller.rotate(-30.0, 0.0, 600.0);
        let expected = 30.0 * 2.0 * PI / 600.0;

        controller.update();
        let first_step = angular_change(start, controller.azimuth());
        assert!((first_step - expected * 0.1).abs() < 1e-4);

        for _ in 0..300 {
            controller.update();
        }
        let total = angular_change(start, controller.azimuth());
        assert!((total - expected).abs() < 1e-3);
        assert!(!controller.has_updates());
    }

    #[test]
    fn without_damping_input_applies_at_once() {
        let config = OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        };
        let mut controller = OrbitController::new(Point3::new(6.0, 6.5, 9.0), &config);

        controller.rotate(0.0, 10.0, 600.0);
        assert!(controller.update());
        assert!(!controller.has_updates());
        assert!(!controller.update());
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut controller = controller();

        controller.rotate(f32::NAN, 1.0, 600.0);
        controller.rotate(1.0, 1.0, 0.0);
        controller.zoom(f32::NAN);

        assert!(!controller.has_updates());
    }
}
