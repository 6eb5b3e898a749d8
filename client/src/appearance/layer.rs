//! Avatar texture slots and bake layers.

use uuid::{uuid, Uuid};
use wire::WearableType;

/// Slot of the avatar texture entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    HeadBodypaint,
    UpperShirt,
    LowerPants,
    EyesIris,
    Hair,
    UpperBodypaint,
    LowerBodypaint,
    LowerShoes,
    HeadBaked,
    UpperBaked,
    LowerBaked,
    EyesBaked,
    LowerSocks,
    UpperJacket,
    LowerJacket,
    UpperGloves,
    UpperUndershirt,
    LowerUnderpants,
    Skirt,
    SkirtBaked,
    HairBaked,
    LowerAlpha,
    UpperAlpha,
    HeadAlpha,
    EyesAlpha,
    HairAlpha,
    HeadTattoo,
    UpperTattoo,
    LowerTattoo,
}

impl TextureSlot {
    pub const COUNT: usize = 29;

    pub const ALL: [Self; Self::COUNT] = [
        Self::HeadBodypaint,
        Self::UpperShirt,
        Self::LowerPants,
        Self::EyesIris,
        Self::Hair,
        Self::UpperBodypaint,
        Self::LowerBodypaint,
        Self::LowerShoes,
        Self::HeadBaked,
        Self::UpperBaked,
        Self::LowerBaked,
        Self::EyesBaked,
        Self::LowerSocks,
        Self::UpperJacket,
        Self::LowerJacket,
        Self::UpperGloves,
        Self::UpperUndershirt,
        Self::LowerUnderpants,
        Self::Skirt,
        Self::SkirtBaked,
        Self::HairBaked,
        Self::LowerAlpha,
        Self::UpperAlpha,
        Self::HeadAlpha,
        Self::EyesAlpha,
        Self::HairAlpha,
        Self::HeadTattoo,
        Self::UpperTattoo,
        Self::LowerTattoo,
    ];

    /// Slots that carry the client identification texture.
    pub const CLIENT_ID: [Self; 3] = [Self::HeadBodypaint, Self::EyesIris, Self::HeadAlpha];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Alpha slots mask their layer instead of painting on it.
    #[must_use]
    pub const fn is_alpha(self) -> bool {
        matches!(
            self,
            Self::LowerAlpha | Self::UpperAlpha | Self::HeadAlpha | Self::EyesAlpha | Self::HairAlpha
        )
    }
}

/// A composited region of the avatar body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BakeLayer {
    Head,
    UpperBody,
    LowerBody,
    Eyes,
    Skirt,
    Hair,
}

const HEAD_WEARABLES: &[WearableType] = &[
    WearableType::Shape,
    WearableType::Skin,
    WearableType::Tattoo,
    WearableType::Hair,
    WearableType::Alpha,
];
const UPPER_WEARABLES: &[WearableType] = &[
    WearableType::Shape,
    WearableType::Skin,
    WearableType::Tattoo,
    WearableType::Shirt,
    WearableType::Jacket,
    WearableType::Gloves,
    WearableType::Undershirt,
    WearableType::Alpha,
];
const LOWER_WEARABLES: &[WearableType] = &[
    WearableType::Shape,
    WearableType::Skin,
    WearableType::Tattoo,
    WearableType::Pants,
    WearableType::Shoes,
    WearableType::Socks,
    WearableType::Jacket,
    WearableType::Underpants,
    WearableType::Alpha,
];

impl BakeLayer {
    pub const ALL: [Self; 6] = [
        Self::Head,
        Self::UpperBody,
        Self::LowerBody,
        Self::Eyes,
        Self::Skirt,
        Self::Hair,
    ];

    /// Slot the finished bake is advertised on.
    #[must_use]
    pub const fn baked_slot(self) -> TextureSlot {
        match self {
            Self::Head => TextureSlot::HeadBaked,
            Self::UpperBody => TextureSlot::UpperBaked,
            Self::LowerBody => TextureSlot::LowerBaked,
            Self::Eyes => TextureSlot::EyesBaked,
            Self::Skirt => TextureSlot::SkirtBaked,
            Self::Hair => TextureSlot::HairBaked,
        }
    }

    /// Salt folded into the layer's cache hash.
    #[must_use]
    pub const fn hash_salt(self) -> Uuid {
        match self {
            Self::Head => uuid!("18ded8d6-bcfc-e415-8539-944c0f5ea7a6"),
            Self::UpperBody => uuid!("338c29e3-3024-4dbb-998d-7c04cf4fa88f"),
            Self::LowerBody => uuid!("91b4a2c7-1b1a-ba16-9a16-1f8f8dcc1c3f"),
            Self::Eyes => uuid!("b2cf28af-b840-1071-3c6a-78085d8128b5"),
            Self::Skirt => uuid!("ea800387-ea1a-14e0-56cb-24f2022f969a"),
            Self::Hair => uuid!("0af1ef7c-ad24-11dd-8790-001f5bf833e8"),
        }
    }

    /// Wearable types whose assets feed the layer's cache hash.
    #[must_use]
    pub const fn contributing_wearables(self) -> &'static [WearableType] {
        match self {
            Self::Head => HEAD_WEARABLES,
            Self::UpperBody => UPPER_WEARABLES,
            Self::LowerBody => LOWER_WEARABLES,
            Self::Eyes => &[WearableType::Eyes],
            Self::Skirt => &[WearableType::Skirt],
            Self::Hair => &[WearableType::Hair],
        }
    }

    /// Source slots composited into the layer, bottom to top.
    #[must_use]
    pub const fn source_slots(self) -> &'static [TextureSlot] {
        use TextureSlot as S;
        match self {
            Self::Head => &[S::HeadBodypaint, S::HeadTattoo, S::HeadAlpha],
            Self::UpperBody => &[
                S::UpperBodypaint,
                S::UpperTattoo,
                S::UpperUndershirt,
                S::UpperShirt,
                S::UpperGloves,
                S::UpperJacket,
                S::UpperAlpha,
            ],
            Self::LowerBody => &[
                S::LowerBodypaint,
                S::LowerTattoo,
                S::LowerUnderpants,
                S::LowerSocks,
                S::LowerShoes,
                S::LowerPants,
                S::LowerJacket,
                S::LowerAlpha,
            ],
            Self::Eyes => &[S::EyesIris, S::EyesAlpha],
            Self::Skirt => &[S::Skirt],
            Self::Hair => &[S::Hair, S::HairAlpha],
        }
    }

    /// Edge length of the square bake in pixels.
    #[must_use]
    pub const fn bake_size(self) -> u32 {
        match self {
            Self::Eyes => 128,
            _ => 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baked_slot_indices() {
        let indices: Vec<usize> = BakeLayer::ALL
            .iter()
            .map(|layer| layer.baked_slot().index())
            .collect();
        assert_eq!(indices, vec![8, 9, 10, 11, 19, 20]);
    }

    #[test]
    fn slot_roundtrip() {
        for (index, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), index);
            assert_eq!(TextureSlot::from_index(index), Some(*slot));
        }
        assert_eq!(TextureSlot::from_index(29), None);
    }

    #[test]
    fn every_source_slot_belongs_to_one_layer() {
        let mut seen = std::collections::HashSet::new();
        for layer in BakeLayer::ALL {
            for slot in layer.source_slots() {
                assert!(seen.insert(*slot), "{slot:?} listed twice");
            }
        }
    }
}
