//! Inspection helpers behind the `gridsync-inspect` binary.
//!
//! Each helper takes raw wire bytes and returns a serializable report that
//! prints as JSON or as a short human-readable summary.

use anyhow::{bail, Context, Result};
use codec::{decode_compressed_block, DecodedObject, DecodeLimits};
use serde::Serialize;
use texture::TextureEntry;
use uuid::Uuid;
use wire::CompressedBlock;

/// Parses hex text, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: String = input.split_whitespace().collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits ({})", digits.len());
    }
    digits
        .as_bytes()
        .chunks(2)
        .enumerate()
        .map(|(index, pair)| {
            let pair = std::str::from_utf8(pair).context("non-ascii input")?;
            u8::from_str_radix(pair, 16)
                .with_context(|| format!("invalid hex byte {pair:?} at offset {}", index * 2))
        })
        .collect()
}

/// A decoded texture entry.
#[derive(Debug, Serialize)]
pub struct TextureEntryReport {
    pub byte_len: usize,
    pub override_count: usize,
    /// The entry in its structured form.
    pub entry: TextureEntry,
}

pub fn inspect_texture_entry(bytes: &[u8]) -> Result<TextureEntryReport> {
    let entry = TextureEntry::from_bytes(bytes).context("decode texture entry")?;
    Ok(TextureEntryReport {
        byte_len: bytes.len(),
        override_count: entry.override_count(),
        entry,
    })
}

/// The fields of a compressed object update worth looking at.
#[derive(Debug, Serialize)]
pub struct ObjectReport {
    pub local_id: u32,
    pub full_id: Uuid,
    pub owner_id: Uuid,
    pub parent_id: u32,
    pub pcode: String,
    pub crc: u32,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub velocity: [f32; 3],
    pub scale: [f32; 3],
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name_values: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<Uuid>,
    pub particle_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sculpt_texture: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_species: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_entry: Option<TextureEntry>,
}

impl From<DecodedObject> for ObjectReport {
    fn from(object: DecodedObject) -> Self {
        Self {
            local_id: object.local_id(),
            full_id: object.full_id,
            owner_id: object.owner_id,
            parent_id: object.parent_id,
            pcode: format!("{:?}", object.pcode),
            crc: object.crc,
            position: object.movement.position.to_array(),
            rotation: object.movement.rotation.to_array(),
            velocity: object.movement.velocity.to_array(),
            scale: object.scale.to_array(),
            text: object.text,
            media_url: object.media_url,
            name_values: object
                .name_values
                .iter()
                .map(|nv| (nv.name.clone(), nv.value.clone()))
                .collect(),
            sound: object.sound.map(|sound| sound.sound_id),
            particle_bytes: object.particles.as_ref().map_or(0, |p| p.as_bytes().len()),
            sculpt_texture: object.extra_params.sculpt_texture(),
            tree_species: object.tree_species,
            texture_entry: object.movement.texture_entry,
        }
    }
}

pub fn inspect_compressed(bytes: &[u8], update_flags: u32) -> Result<ObjectReport> {
    let block = CompressedBlock {
        update_flags,
        data: bytes.to_vec(),
    };
    let object = decode_compressed_block(&block, &DecodeLimits::default())
        .context("decode compressed object update")?;
    Ok(object.into())
}

/// One-paragraph summary of an object report.
pub fn format_object_pretty(report: &ObjectReport) -> String {
    use std::fmt::Write;

    let [x, y, z] = report.position;
    let mut out = format!(
        "{} {} (local {}) owner {}\n  position ({x:.3}, {y:.3}, {z:.3}) parent {} crc {:#010x}\n",
        report.pcode, report.full_id, report.local_id, report.owner_id, report.parent_id, report.crc
    );
    if !report.text.is_empty() {
        let _ = writeln!(out, "  text {:?}", report.text);
    }
    for (name, value) in &report.name_values {
        let _ = writeln!(out, "  {name} = {value}");
    }
    if let Some(entry) = &report.texture_entry {
        let _ = writeln!(out, "  texture entry: {} face overrides", entry.override_count());
    }
    if report.particle_bytes > 0 {
        let _ = writeln!(out, "  particles: {} bytes", report.particle_bytes);
    }
    out
}

#[cfg(test)]
mod tests {
    use bitstream::ByteWriter;
    use glam::{Quat, Vec3};
    use texture::Color4;
    use wire::{PCode, WriteExt};

    use super::*;

    #[test]
    fn hex_accepts_spacing_and_prefix() {
        assert_eq!(parse_hex("0x0a ff\n10").unwrap(), vec![0x0A, 0xFF, 0x10]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn texture_entry_report() {
        let mut entry = TextureEntry::new(Uuid::from_u128(7));
        entry
            .create_face(5)
            .unwrap()
            .set_rgba(Color4::new(1.0, 0.0, 0.0, 1.0));
        let bytes = entry.to_bytes();

        let report = inspect_texture_entry(&bytes).unwrap();
        assert_eq!(report.byte_len, bytes.len());
        assert_eq!(report.override_count, 1);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["override_count"], 1);
        assert!(json["entry"].is_array());
    }

    #[test]
    fn compressed_report() {
        let mut w = ByteWriter::new();
        w.write_uuid(Uuid::from_u128(0xF011));
        w.write_u32(321);
        w.write_u8(PCode::Prim.raw());
        w.write_u8(0);
        w.write_u32(0xDEAD_BEEF);
        w.write_u8(3);
        w.write_u8(0);
        w.write_vec3(Vec3::ONE);
        w.write_vec3(Vec3::new(128.0, 64.0, 22.0));
        w.write_packed_quat(Quat::IDENTITY);
        w.write_u32(0);
        w.write_uuid(Uuid::from_u128(0x0111));
        w.write_u8(0);

        let report = inspect_compressed(&w.finish(), 0).unwrap();
        assert_eq!(report.local_id, 321);
        assert_eq!(report.pcode, "Prim");
        assert_eq!(report.position, [128.0, 64.0, 22.0]);
        let pretty = format_object_pretty(&report);
        assert!(pretty.contains("local 321"));
        assert!(pretty.contains("0xdeadbeef"));
    }

    #[test]
    fn truncated_compressed_fails() {
        assert!(inspect_compressed(&[0; 10], 0).is_err());
    }
}
