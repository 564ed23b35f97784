use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation with `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Orientation as Euler angles in degrees. Content mostly authors yaw-only
/// rotations, hence the [`euler_y`] shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerDeg {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerDeg {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        EulerDeg { x, y, z }
    }
}

pub fn euler_y(yaw: f32) -> EulerDeg {
    EulerDeg::new(0.0, yaw, 0.0)
}

/// Position plus facing, the transform slice the runtime actually scripts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: EulerDeg,
}

impl Pose {
    pub fn new(position: Vec3, rotation: EulerDeg) -> Self {
        Pose { position, rotation }
    }
}
