//! End-to-end texture entry behaviour through both encodings.

use texture::{Color4, TextureEntry, Uuid};

const U0: Uuid = Uuid::from_u128(0x5748_decc_f629_461c_9a36_a35a_221f_e21f);
const U1: Uuid = Uuid::from_u128(0x8dcd_4a48_2d37_4909_9f78_f7a9_eb4e_f903);

fn scenario_entry() -> TextureEntry {
    let mut entry = TextureEntry::new(U0);
    entry.create_face(3).unwrap().set_texture_id(U1);
    entry.create_face(7).unwrap().set_texture_id(U1);
    entry
        .create_face(5)
        .unwrap()
        .set_rgba(Color4::new(1.0, 0.0, 0.0, 1.0));
    entry
}

#[test]
fn binary_scenario() {
    let bytes = scenario_entry().to_bytes();
    let entry = TextureEntry::from_bytes(&bytes).unwrap();

    assert_eq!(entry.face(3).unwrap().texture_id(), U1);
    assert_eq!(entry.face(7).unwrap().texture_id(), U1);
    assert_eq!(entry.face(0).unwrap().texture_id(), U0);
    assert_eq!(
        entry.face(5).unwrap().rgba(),
        Color4::new(1.0, 0.0, 0.0, 1.0)
    );
    assert_eq!(entry.face(5).unwrap().texture_id(), U0);
    assert_eq!(entry, scenario_entry());
}

#[test]
fn scenario_coalesces_shared_texture() {
    let bytes = scenario_entry().to_bytes();
    // default id, one pair for faces 3 and 7 (mask 0x88 in two groups), terminator
    assert_eq!(&bytes[..16], U0.as_bytes());
    assert_eq!(bytes[16], 0x81);
    assert_eq!(bytes[17], 0x08);
    assert_eq!(&bytes[18..34], U1.as_bytes());
    assert_eq!(bytes[34], 0x00);
}

#[test]
fn json_scenario() {
    let json = serde_json::to_string(&scenario_entry()).unwrap();
    let entry: TextureEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(entry, scenario_entry());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["face_number"], -1);
    assert_eq!(records[1]["face_number"], 3);
    assert!(records[1].get("colors").is_none());
}

#[test]
fn json_rejects_face_out_of_range() {
    let json = r#"[{"face_number": 40, "glow": 1.0}]"#;
    assert!(serde_json::from_str::<TextureEntry>(json).is_err());
}
