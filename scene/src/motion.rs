//! Motion state and the dead-reckoning step.

use glam::{Quat, Vec3, Vec4};

use codec::ObjectMovementUpdate;

/// Fixed physics timestep of the simulator.
pub const HAVOK_TIMESTEP: f32 = 1.0 / 45.0;

/// Magnitudes at or below this are treated as zero when extrapolating.
pub const MOTION_EPSILON: f32 = 0.000_01;

fn snap(v: Vec3) -> Vec3 {
    Vec3::select(v.abs().cmple(Vec3::splat(MOTION_EPSILON)), Vec3::ZERO, v)
}

/// Position, velocity and orientation of a tracked object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub rotation: Quat,
    pub angular_velocity: Vec3,
    pub collision_plane: Option<Vec4>,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
            collision_plane: None,
        }
    }
}

impl MotionState {
    /// Overwrites the state with a decoded movement update.
    ///
    /// A missing collision plane keeps the previous one.
    pub fn apply(&mut self, update: &ObjectMovementUpdate) {
        self.position = update.position;
        self.velocity = update.velocity;
        self.acceleration = update.acceleration;
        self.rotation = update.rotation;
        self.angular_velocity = update.angular_velocity;
        if update.collision_plane.is_some() {
            self.collision_plane = update.collision_plane;
        }
    }

    /// Extrapolates the position by `dt` seconds of simulator time.
    ///
    /// With acceleration the step follows the simulator's integrator, which
    /// lags one physics frame behind; otherwise velocity is applied directly.
    /// Components at or below [`MOTION_EPSILON`] snap to zero before and
    /// after the step. Returns `true` when anything moved.
    pub fn advance_linear(&mut self, dt: f32) -> bool {
        self.velocity = snap(self.velocity);
        self.acceleration = snap(self.acceleration);
        if self.acceleration.length() > MOTION_EPSILON {
            let accel_term = self.acceleration * 0.5 * (dt - HAVOK_TIMESTEP);
            self.position += (self.velocity + accel_term) * dt;
            self.velocity = snap(self.velocity + self.acceleration * dt);
            true
        } else if self.velocity.length() > MOTION_EPSILON {
            self.position += self.velocity * dt;
            true
        } else {
            false
        }
    }

    /// Spins the rotation by the angular velocity over `dt` seconds.
    pub fn advance_angular(&mut self, dt: f32) -> bool {
        self.angular_velocity = snap(self.angular_velocity);
        let omega = self.angular_velocity.length();
        if omega <= MOTION_EPSILON {
            return false;
        }
        let axis = self.angular_velocity / omega;
        self.rotation = (Quat::from_axis_angle(axis, omega * dt) * self.rotation).normalize();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_only() {
        let mut m = MotionState {
            velocity: Vec3::new(2.0, 0.0, 0.0),
            ..MotionState::default()
        };
        assert!(m.advance_linear(0.5));
        assert_eq!(m.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn acceleration_lags_one_frame() {
        let mut m = MotionState {
            acceleration: Vec3::new(0.0, 0.0, -10.0),
            ..MotionState::default()
        };
        let dt = 0.25;
        m.advance_linear(dt);
        let expected_z = -10.0 * 0.5 * (dt - HAVOK_TIMESTEP) * dt;
        assert!((m.position.z - expected_z).abs() < 1e-6);
        assert!((m.velocity.z + 2.5).abs() < 1e-6);
    }

    #[test]
    fn residual_components_snap_to_zero() {
        let mut m = MotionState {
            velocity: Vec3::new(0.000_004, 2.0, -0.000_009),
            angular_velocity: Vec3::new(0.0, 0.000_002, 0.0),
            ..MotionState::default()
        };
        assert!(m.advance_linear(1.0));
        assert_eq!(m.velocity, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(m.position, Vec3::new(0.0, 2.0, 0.0));
        assert!(!m.advance_angular(1.0));
        assert_eq!(m.angular_velocity, Vec3::ZERO);
        assert_eq!(m.rotation, Quat::IDENTITY);
    }

    #[test]
    fn deceleration_stops_at_zero() {
        let mut m = MotionState {
            velocity: Vec3::new(1.0, 0.0, 0.0),
            acceleration: Vec3::new(-4.0, 0.0, 0.0),
            ..MotionState::default()
        };
        m.advance_linear(0.25);
        assert_eq!(m.velocity, Vec3::ZERO);
    }

    #[test]
    fn at_rest_is_untouched() {
        let mut m = MotionState {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..MotionState::default()
        };
        let before = m;
        assert!(!m.advance_linear(1.0));
        assert!(!m.advance_angular(1.0));
        assert_eq!(m, before);
    }

    #[test]
    fn spin_about_z() {
        let mut m = MotionState {
            angular_velocity: Vec3::new(0.0, 0.0, std::f32::consts::PI),
            ..MotionState::default()
        };
        assert!(m.advance_angular(0.5));
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(m.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn apply_keeps_plane_when_absent() {
        let plane = Vec4::new(0.0, 0.0, 1.0, 20.0);
        let mut m = MotionState {
            collision_plane: Some(plane),
            ..MotionState::default()
        };
        let update = ObjectMovementUpdate {
            local_id: 1,
            state: 0,
            avatar: true,
            collision_plane: None,
            position: Vec3::ONE,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
            texture_entry: None,
        };
        m.apply(&update);
        assert_eq!(m.collision_plane, Some(plane));
        assert_eq!(m.position, Vec3::ONE);
    }
}
