//! Enumerations carried as raw bytes on the wire.

/// Object category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PCode {
    None,
    Prim,
    Avatar,
    Grass,
    NewTree,
    ParticleSystem,
    Tree,
    /// A code this client does not know.
    Unknown(u8),
}

impl PCode {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            9 => Self::Prim,
            47 => Self::Avatar,
            95 => Self::Grass,
            111 => Self::NewTree,
            143 => Self::ParticleSystem,
            255 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Prim => 9,
            Self::Avatar => 47,
            Self::Grass => 95,
            Self::NewTree => 111,
            Self::ParticleSystem => 143,
            Self::Tree => 255,
            Self::Unknown(other) => other,
        }
    }

    /// Returns `true` for codes tracked in the primitive table.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Prim | Self::Grass | Self::NewTree | Self::Tree | Self::ParticleSystem
        )
    }
}

/// Physics joint constraint attached to a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JointType {
    /// No joint; the primitive moves freely.
    #[default]
    Invalid,
    Hinge,
    Point,
    Unknown(u8),
}

impl JointType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Invalid,
            1 => Self::Hinge,
            2 => Self::Point,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Invalid => 0,
            Self::Hinge => 1,
            Self::Point => 2,
            Self::Unknown(other) => other,
        }
    }
}

/// Kind of a worn wearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WearableType {
    Shape,
    Skin,
    Hair,
    Eyes,
    Shirt,
    Pants,
    Shoes,
    Socks,
    Jacket,
    Gloves,
    Undershirt,
    Underpants,
    Skirt,
    Alpha,
    Tattoo,
    Physics,
    Invalid,
}

impl WearableType {
    /// Every valid wearable type in wire order.
    pub const ALL: [Self; 16] = [
        Self::Shape,
        Self::Skin,
        Self::Hair,
        Self::Eyes,
        Self::Shirt,
        Self::Pants,
        Self::Shoes,
        Self::Socks,
        Self::Jacket,
        Self::Gloves,
        Self::Undershirt,
        Self::Underpants,
        Self::Skirt,
        Self::Alpha,
        Self::Tattoo,
        Self::Physics,
    ];

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        if (raw as usize) < Self::ALL.len() {
            Self::ALL[raw as usize]
        } else {
            Self::Invalid
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Invalid => 255,
            other => other as u8,
        }
    }

    /// Body parts can be replaced but never removed.
    #[must_use]
    pub const fn is_body_part(self) -> bool {
        matches!(self, Self::Shape | Self::Skin | Self::Hair | Self::Eyes)
    }
}
