use scene::SimulatorObjectTables;
use uuid::Uuid;

fn linked(tables: &mut SimulatorObjectTables, local_id: u32, parent_id: u32) {
    let (prim, _) = tables.get_or_create_primitive(local_id, Uuid::from_u128(u128::from(local_id)));
    prim.parent_id = parent_id;
}

#[test]
fn kill_cascades_through_chain() {
    let mut tables = SimulatorObjectTables::new(1);
    linked(&mut tables, 1, 0); // A
    linked(&mut tables, 2, 1); // B -> A
    linked(&mut tables, 3, 2); // C -> B
    linked(&mut tables, 9, 0); // unrelated

    let outcome = tables.apply_kill(&[1]);
    assert_eq!(outcome.named, vec![1]);
    assert_eq!(outcome.removed, vec![1, 2, 3]);
    assert!(tables.primitive(2).is_none());
    assert!(tables.primitive(3).is_none());
    assert!(tables.primitive(9).is_some());
    assert!(tables
        .primitive_by_full_id(Uuid::from_u128(3))
        .is_none());
}

#[test]
fn killing_an_avatar_removes_attachments() {
    let mut tables = SimulatorObjectTables::new(1);
    tables.get_or_create_avatar(50, Uuid::from_u128(0xA));
    linked(&mut tables, 51, 50);
    linked(&mut tables, 52, 51);

    let outcome = tables.apply_kill(&[50]);
    assert_eq!(outcome.removed, vec![50, 51, 52]);
    assert_eq!(tables.avatar_count(), 0);
    assert_eq!(tables.primitive_count(), 0);
}

#[test]
fn seated_avatar_survives_seat_kill() {
    let mut tables = SimulatorObjectTables::new(1);
    linked(&mut tables, 10, 0);
    let (avatar, _) = tables.get_or_create_avatar(60, Uuid::from_u128(0xB));
    avatar.sitting_on = 10;

    let outcome = tables.apply_kill(&[10]);
    assert_eq!(outcome.removed, vec![10]);
    assert_eq!(outcome.unseated.len(), 1);
    assert_eq!(outcome.unseated[0].previous, 10);
    assert_eq!(tables.avatar(60).map(|a| a.sitting_on), Some(0));
}

#[test]
fn unknown_ids_are_reported_but_harmless() {
    let mut tables = SimulatorObjectTables::new(1);
    linked(&mut tables, 1, 0);
    let outcome = tables.apply_kill(&[404]);
    assert_eq!(outcome.named, vec![404]);
    assert_eq!(outcome.removed, vec![404]);
    assert_eq!(tables.primitive_count(), 1);
}

#[test]
fn cycle_terminates() {
    let mut tables = SimulatorObjectTables::new(1);
    linked(&mut tables, 1, 2);
    linked(&mut tables, 2, 1);
    let outcome = tables.apply_kill(&[1]);
    assert_eq!(outcome.removed, vec![1, 2]);
}
