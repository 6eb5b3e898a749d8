//! Protocol field readers and writers layered on the byte cursors.

use bitstream::{ByteReader, ByteResult, ByteWriter};
use glam::{Quat, Vec3, Vec4};
use uuid::Uuid;

/// Reads protocol-typed fields.
pub trait ReadExt {
    fn read_uuid(&mut self) -> ByteResult<Uuid>;
    fn read_vec3(&mut self) -> ByteResult<Vec3>;
    fn read_vec4(&mut self) -> ByteResult<Vec4>;
    /// Reads a quaternion stored as four floats.
    fn read_quat(&mut self) -> ByteResult<Quat>;
    /// Reads a unit quaternion stored as x, y, z with w reconstructed.
    fn read_packed_quat(&mut self) -> ByteResult<Quat>;
}

/// Writes protocol-typed fields.
pub trait WriteExt {
    fn write_uuid(&mut self, id: Uuid);
    fn write_vec3(&mut self, v: Vec3);
    fn write_vec4(&mut self, v: Vec4);
    fn write_packed_quat(&mut self, q: Quat);
}

impl ReadExt for ByteReader<'_> {
    fn read_uuid(&mut self) -> ByteResult<Uuid> {
        Ok(Uuid::from_bytes(self.read_array::<16>()?))
    }

    fn read_vec3(&mut self) -> ByteResult<Vec3> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        Ok(Vec3::new(x, y, z))
    }

    fn read_vec4(&mut self) -> ByteResult<Vec4> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        let w = self.read_f32()?;
        Ok(Vec4::new(x, y, z, w))
    }

    fn read_quat(&mut self) -> ByteResult<Quat> {
        let v = self.read_vec4()?;
        Ok(Quat::from_vec4(v))
    }

    fn read_packed_quat(&mut self) -> ByteResult<Quat> {
        let v = self.read_vec3()?;
        Ok(unpack_quat(v))
    }
}

impl WriteExt for ByteWriter {
    fn write_uuid(&mut self, id: Uuid) {
        self.write_bytes(id.as_bytes());
    }

    fn write_vec3(&mut self, v: Vec3) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
    }

    fn write_vec4(&mut self, v: Vec4) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
        self.write_f32(v.w);
    }

    fn write_packed_quat(&mut self, q: Quat) {
        let mut q = q.normalize();
        if q.w < 0.0 {
            q = -q;
        }
        self.write_f32(q.x);
        self.write_f32(q.y);
        self.write_f32(q.z);
    }
}

/// Rebuilds a unit quaternion from its vector part.
#[must_use]
pub fn unpack_quat(xyz: Vec3) -> Quat {
    let rem = 1.0 - xyz.length_squared();
    let w = if rem > 0.0 { rem.sqrt() } else { 0.0 };
    Quat::from_xyzw(xyz.x, xyz.y, xyz.z, w)
}
