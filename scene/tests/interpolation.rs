use glam::{Quat, Vec3};
use proptest::prelude::*;
use scene::SimulatorObjectTables;
use uuid::Uuid;
use wire::JointType;

fn at_rest(tables: &mut SimulatorObjectTables, local_id: u32, position: Vec3, rotation: Quat) {
    let (prim, _) = tables.get_or_create_primitive(local_id, Uuid::from_u128(u128::from(local_id)));
    prim.motion.position = position;
    prim.motion.rotation = rotation;
}

proptest! {
    #[test]
    fn prop_zero_velocity_is_idempotent(
        x in -256.0f32..512.0,
        y in -256.0f32..512.0,
        z in 0.0f32..4096.0,
        angle in -3.0f32..3.0,
        dt in 0.0f32..2.0,
        ticks in 1usize..8,
    ) {
        let mut tables = SimulatorObjectTables::new(1);
        let position = Vec3::new(x, y, z);
        let rotation = Quat::from_rotation_y(angle);
        at_rest(&mut tables, 1, position, rotation);
        tables.get_or_create_avatar(2, Uuid::from_u128(2)).0.motion.position = position;

        for _ in 0..ticks {
            prop_assert_eq!(tables.interpolate(dt), 0);
        }
        let prim = tables.primitive(1).unwrap();
        prop_assert_eq!(prim.motion.position, position);
        prop_assert_eq!(prim.motion.rotation, rotation);
        prop_assert_eq!(tables.avatar(2).unwrap().motion.position, position);
    }
}

#[test]
fn moving_prim_advances() {
    let mut tables = SimulatorObjectTables::new(1);
    at_rest(&mut tables, 1, Vec3::ZERO, Quat::IDENTITY);
    tables.get_or_create_primitive(1, Uuid::nil()).0.motion.velocity = Vec3::X;
    assert_eq!(tables.interpolate(0.25), 1);
    assert_eq!(tables.primitive(1).unwrap().motion.position, Vec3::new(0.25, 0.0, 0.0));
}

#[test]
fn jointed_prims_do_not_spin() {
    let mut tables = SimulatorObjectTables::new(1);
    at_rest(&mut tables, 1, Vec3::ZERO, Quat::IDENTITY);
    at_rest(&mut tables, 2, Vec3::ZERO, Quat::IDENTITY);
    for id in [1, 2] {
        tables.get_or_create_primitive(id, Uuid::nil()).0.motion.angular_velocity =
            Vec3::new(0.0, 0.0, 1.0);
    }
    tables.get_or_create_primitive(2, Uuid::nil()).0.joint.joint_type = JointType::Hinge;

    tables.interpolate(0.5);
    assert!(tables
        .primitive(1)
        .unwrap()
        .motion
        .rotation
        .abs_diff_eq(Quat::from_rotation_z(0.5), 1e-5));
    assert_eq!(tables.primitive(2).unwrap().motion.rotation, Quat::IDENTITY);
}

#[test]
fn avatars_do_not_spin() {
    let mut tables = SimulatorObjectTables::new(1);
    let (avatar, _) = tables.get_or_create_avatar(5, Uuid::from_u128(5));
    avatar.motion.angular_velocity = Vec3::Z;
    tables.interpolate(1.0);
    assert_eq!(tables.avatar(5).unwrap().motion.rotation, Quat::IDENTITY);
}
