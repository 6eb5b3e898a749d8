//! Motion-data layout dispatch on hand-built payloads.

use bitstream::ByteWriter;
use codec::{decode_object_block, DecodeLimits, MotionData, MotionLayout};
use glam::{Quat, Vec3, Vec4};
use wire::{ObjectUpdateBlock, PCode};

fn full_precision(collision: Option<Vec4>) -> Vec<u8> {
    let mut w = ByteWriter::new();
    if let Some(plane) = collision {
        for c in plane.to_array() {
            w.write_f32(c);
        }
    }
    let floats = [
        1.0, 2.0, 3.0, // position
        4.0, 5.0, 6.0, // velocity
        0.0, 0.0, -9.8, // acceleration
        0.0, 0.0, 0.0, // rotation xyz
        0.0, 0.0, 0.5, // angular velocity
    ];
    for f in floats {
        w.write_f32(f);
    }
    w.finish()
}

fn assert_full_precision(motion: &MotionData) {
    assert_eq!(motion.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(motion.velocity, Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(motion.acceleration, Vec3::new(0.0, 0.0, -9.8));
    assert_eq!(motion.rotation, Quat::IDENTITY);
    assert_eq!(motion.angular_velocity, Vec3::new(0.0, 0.0, 0.5));
}

#[test]
fn dispatch_60_bytes() {
    let data = full_precision(None);
    assert_eq!(data.len(), 60);
    let motion = MotionData::decode(&data).unwrap();
    assert_eq!(motion.collision_plane, None);
    assert_full_precision(&motion);
}

#[test]
fn dispatch_76_bytes() {
    let plane = Vec4::new(0.0, 0.0, 1.0, 21.5);
    let data = full_precision(Some(plane));
    assert_eq!(data.len(), 76);
    let motion = MotionData::decode(&data).unwrap();
    assert_eq!(motion.collision_plane, Some(plane));
    assert_full_precision(&motion);
}

#[test]
fn dispatch_32_bytes_all_max() {
    let motion = MotionData::decode(&[0xFF; 32]).unwrap();
    assert_eq!(motion.collision_plane, None);
    assert_eq!(motion.position, Vec3::new(384.0, 384.0, 768.0));
    assert_eq!(motion.velocity, Vec3::splat(256.0));
    assert_eq!(motion.acceleration, Vec3::splat(256.0));
    assert_eq!(motion.rotation, Quat::from_xyzw(1.0, 1.0, 1.0, 1.0));
    assert_eq!(motion.angular_velocity, Vec3::splat(256.0));
}

#[test]
fn dispatch_32_bytes_all_min() {
    let motion = MotionData::decode(&[0x00; 32]).unwrap();
    assert_eq!(motion.position, Vec3::new(-128.0, -128.0, -256.0));
    assert_eq!(motion.velocity, Vec3::splat(-256.0));
    assert_eq!(motion.rotation, Quat::from_xyzw(-1.0, -1.0, -1.0, -1.0));
}

#[test]
fn dispatch_48_bytes_all_max() {
    let mut data = Vec::new();
    for c in [0.0f32, 0.0, 1.0, 5.0] {
        data.extend_from_slice(&c.to_le_bytes());
    }
    data.extend_from_slice(&[0xFF; 32]);
    let motion = MotionData::decode(&data).unwrap();
    assert_eq!(motion.collision_plane, Some(Vec4::new(0.0, 0.0, 1.0, 5.0)));
    assert_eq!(motion.position, Vec3::new(384.0, 384.0, 768.0));
    assert_eq!(motion.angular_velocity, Vec3::splat(256.0));
}

#[test]
fn dispatch_16_bytes_all_max() {
    let motion = MotionData::decode(&[0xFF; 16]).unwrap();
    assert_eq!(motion.collision_plane, None);
    assert_eq!(motion.position, Vec3::splat(256.0));
    assert_eq!(motion.velocity, Vec3::splat(256.0));
    assert_eq!(motion.acceleration, Vec3::splat(256.0));
    assert_eq!(motion.rotation, Quat::from_xyzw(1.0, 1.0, 1.0, 1.0));
    assert_eq!(motion.angular_velocity, Vec3::splat(256.0));
}

#[test]
fn dispatch_16_bytes_zero_codes() {
    // 128 is the code zero quantizes to in [-256, 256]
    let mut data = [128u8; 16];
    data[9..13].copy_from_slice(&[128, 128, 128, 255]);
    let motion = MotionData::decode(&data).unwrap();
    assert_eq!(motion.position, Vec3::ZERO);
    assert_eq!(motion.velocity, Vec3::ZERO);
    assert_eq!(motion.rotation.w, 1.0);
}

#[test]
fn quantized_16_tolerance() {
    let motion = MotionData {
        position: Vec3::new(128.3, 17.9, 25.25),
        velocity: Vec3::new(-3.5, 0.0, 12.0),
        rotation: Quat::IDENTITY,
        ..MotionData::default()
    };
    let back = MotionData::decode(&motion.encode(MotionLayout::Quantized16)).unwrap();
    assert!((back.position.x - 128.3).abs() <= 512.0 / 65535.0);
    assert!((back.position.z - 25.25).abs() <= 1024.0 / 65535.0);
    assert!((back.velocity.x + 3.5).abs() <= 512.0 / 65535.0);
    assert_eq!(back.velocity.y, 0.0);
}

#[test]
fn avatar_full_update_uses_collision_layout() {
    let block = ObjectUpdateBlock {
        local_id: 99,
        pcode: PCode::Avatar.raw(),
        object_data: full_precision(Some(Vec4::new(0.0, 0.0, 1.0, 20.0))),
        name_value: b"FirstName STRING RW DS Ada\nLastName STRING RW DS Lovelace".to_vec(),
        ..ObjectUpdateBlock::default()
    };
    let object = decode_object_block(&block, &DecodeLimits::default()).unwrap();
    assert!(object.is_avatar());
    assert!(object.movement.avatar);
    assert_eq!(object.local_id(), 99);
    assert_eq!(object.movement.collision_plane, Some(Vec4::new(0.0, 0.0, 1.0, 20.0)));
    assert_eq!(object.name_values.full_name().as_deref(), Some("Ada Lovelace"));
    assert!(!object.attachment);
}
