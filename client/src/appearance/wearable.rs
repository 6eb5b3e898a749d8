//! Worn items and the text wearable asset format.
//!
//! ```text
//! LLWearable version 22
//! Blue Shirt
//!     permissions 0
//!     { ... }
//! type 4
//! parameters 2
//! 781 0.5
//! 800 0
//! textures 1
//! 1 5748decc-f629-461c-9a36-a35a221fe21f
//! ```

use std::collections::BTreeMap;

use uuid::Uuid;
use wire::WearableType;

use super::layer::TextureSlot;
use crate::collaborators::AssetKind;
use crate::error::{AppearanceError, AppearanceResult};

/// An item in the current outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WearableRef {
    pub item_id: Uuid,
    pub asset_id: Uuid,
    pub wearable_type: WearableType,
}

impl WearableRef {
    #[must_use]
    pub const fn asset_kind(&self) -> AssetKind {
        if self.wearable_type.is_body_part() {
            AssetKind::Bodypart
        } else {
            AssetKind::Clothing
        }
    }
}

/// Decoded contents of a wearable asset.
#[derive(Debug, Clone, PartialEq)]
pub struct WearableAsset {
    pub version: u32,
    pub name: String,
    pub wearable_type: WearableType,
    pub params: BTreeMap<u16, f32>,
    pub textures: BTreeMap<TextureSlot, Uuid>,
}

fn format_error(line: usize, reason: &'static str) -> AppearanceError {
    AppearanceError::WearableFormat { line, reason }
}

fn count_after(line: &str, keyword: &str) -> Option<usize> {
    line.strip_prefix(keyword)?.trim().parse().ok()
}

impl WearableAsset {
    #[must_use]
    pub fn new(wearable_type: WearableType) -> Self {
        Self {
            version: 22,
            name: String::new(),
            wearable_type,
            params: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }

    /// Parses the text form. Permission and sale blocks are skipped.
    pub fn parse(data: &[u8]) -> AppearanceResult<Self> {
        let text = String::from_utf8_lossy(data);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (number, header) = lines.next().ok_or_else(|| format_error(1, "empty asset"))?;
        let version = header
            .strip_prefix("LLWearable version")
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| format_error(number, "missing LLWearable header"))?;
        let name = lines.next().map(|(_, line)| line.to_owned()).unwrap_or_default();

        let mut asset = Self {
            version,
            name,
            ..Self::new(WearableType::Invalid)
        };

        while let Some((number, line)) = lines.next() {
            if let Some(raw) = count_after(line, "type") {
                let raw = u8::try_from(raw).map_err(|_| format_error(number, "bad type"))?;
                asset.wearable_type = WearableType::from_raw(raw);
            } else if let Some(count) = count_after(line, "parameters") {
                for _ in 0..count {
                    let (number, line) =
                        lines.next().ok_or_else(|| format_error(number, "truncated parameters"))?;
                    let (id, value) = split_pair(line)
                        .ok_or_else(|| format_error(number, "bad parameter line"))?;
                    let id = id.parse().map_err(|_| format_error(number, "bad parameter id"))?;
                    let value = value
                        .parse()
                        .map_err(|_| format_error(number, "bad parameter value"))?;
                    asset.params.insert(id, value);
                }
            } else if let Some(count) = count_after(line, "textures") {
                for _ in 0..count {
                    let (number, line) =
                        lines.next().ok_or_else(|| format_error(number, "truncated textures"))?;
                    let (index, id) = split_pair(line)
                        .ok_or_else(|| format_error(number, "bad texture line"))?;
                    let slot = index
                        .parse()
                        .ok()
                        .and_then(TextureSlot::from_index)
                        .ok_or_else(|| format_error(number, "bad texture index"))?;
                    let id = Uuid::parse_str(id).map_err(|_| format_error(number, "bad texture id"))?;
                    asset.textures.insert(slot, id);
                }
            }
        }
        Ok(asset)
    }

    /// Writes the text form read by [`WearableAsset::parse`].
    #[must_use]
    pub fn to_text(&self) -> String {
        use std::fmt::Write;

        let mut out = format!(
            "LLWearable version {}\n{}\ntype {}\nparameters {}\n",
            self.version,
            self.name,
            self.wearable_type.raw(),
            self.params.len()
        );
        for (id, value) in &self.params {
            let _ = writeln!(out, "{id} {value}");
        }
        let _ = writeln!(out, "textures {}", self.textures.len());
        for (slot, id) in &self.textures {
            let _ = writeln!(out, "{} {id}", slot.index());
        }
        out
    }
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let second = parts.next()?;
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIRT: &str = "LLWearable version 22
Blue Shirt
\tpermissions 0
\t{
\t\tbase_mask\t7fffffff
\t\towner_mask\t7fffffff
\t}
\tsale_info\t0
\t{
\t\tsale_type\tnot
\t\tsale_price\t10
\t}
type 4
parameters 2
781 0.5
800 -.25
textures 1
1 5748decc-f629-461c-9a36-a35a221fe21f
";

    #[test]
    fn parse_shirt() {
        let asset = WearableAsset::parse(SHIRT.as_bytes()).unwrap();
        assert_eq!(asset.version, 22);
        assert_eq!(asset.name, "Blue Shirt");
        assert_eq!(asset.wearable_type, WearableType::Shirt);
        assert_eq!(asset.params.get(&781), Some(&0.5));
        assert_eq!(asset.params.get(&800), Some(&-0.25));
        assert_eq!(
            asset.textures.get(&TextureSlot::UpperShirt),
            Some(&Uuid::parse_str("5748decc-f629-461c-9a36-a35a221fe21f").unwrap())
        );
    }

    #[test]
    fn text_roundtrip() {
        let asset = WearableAsset::parse(SHIRT.as_bytes()).unwrap();
        assert_eq!(WearableAsset::parse(asset.to_text().as_bytes()).unwrap(), asset);
    }

    #[test]
    fn missing_header() {
        assert!(matches!(
            WearableAsset::parse(b"Blue Shirt\ntype 4\n"),
            Err(AppearanceError::WearableFormat { line: 1, .. })
        ));
    }

    #[test]
    fn truncated_parameters() {
        let err = WearableAsset::parse(b"LLWearable version 22\nx\nparameters 3\n1 0\n").unwrap_err();
        assert!(matches!(err, AppearanceError::WearableFormat { .. }));
    }

    #[test]
    fn bad_texture_index() {
        let data = b"LLWearable version 22\nx\ntextures 1\n40 5748decc-f629-461c-9a36-a35a221fe21f\n";
        assert!(WearableAsset::parse(data).is_err());
    }

    #[test]
    fn body_parts_are_bodypart_assets() {
        let shape = WearableRef {
            item_id: Uuid::nil(),
            asset_id: Uuid::nil(),
            wearable_type: WearableType::Shape,
        };
        assert_eq!(shape.asset_kind(), AssetKind::Bodypart);
    }
}
