//! Flag words carried by object-update blocks.

/// Section-presence flags of an `ObjectUpdateCompressed` block.
///
/// Each bit gates one variable-length section. Sections appear in the
/// order of [`CompressedFlags::SECTION_ORDER`], not in bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompressedFlags(u32);

impl CompressedFlags {
    pub const SCRATCH_PAD: u32 = 0x01;
    pub const TREE: u32 = 0x02;
    pub const HAS_TEXT: u32 = 0x04;
    pub const HAS_PARTICLES: u32 = 0x08;
    pub const HAS_SOUND: u32 = 0x10;
    pub const HAS_PARENT: u32 = 0x20;
    pub const TEXTURE_ANIMATION: u32 = 0x40;
    pub const HAS_ANGULAR_VELOCITY: u32 = 0x80;
    pub const HAS_NAME_VALUES: u32 = 0x100;
    pub const MEDIA_URL: u32 = 0x200;

    /// Wire order of the flag-gated sections.
    pub const SECTION_ORDER: [u32; 9] = [
        Self::HAS_ANGULAR_VELOCITY,
        Self::HAS_PARENT,
        Self::TREE | Self::SCRATCH_PAD,
        Self::HAS_TEXT,
        Self::MEDIA_URL,
        Self::HAS_PARTICLES,
        // extra params are unconditional and sit here
        Self::HAS_SOUND,
        Self::HAS_NAME_VALUES,
        Self::TEXTURE_ANIMATION,
    ];

    /// Creates flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Returns a copy with `flag` set.
    #[must_use]
    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }
}

/// Object update flags (`UpdateFlags` / `ObjectFlags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PrimFlags(u32);

impl PrimFlags {
    pub const USE_PHYSICS: u32 = 0x0000_0001;
    pub const CREATE_SELECTED: u32 = 0x0000_0002;
    pub const OBJECT_MODIFY: u32 = 0x0000_0004;
    pub const OBJECT_COPY: u32 = 0x0000_0008;
    pub const OBJECT_ANY_OWNER: u32 = 0x0000_0010;
    pub const OBJECT_YOU_OWNER: u32 = 0x0000_0020;
    pub const SCRIPTED: u32 = 0x0000_0040;
    pub const TOUCH: u32 = 0x0000_0080;
    pub const OBJECT_MOVE: u32 = 0x0000_0100;
    pub const MONEY: u32 = 0x0000_0200;
    pub const PHANTOM: u32 = 0x0000_0400;
    pub const TEMPORARY_ON_REZ: u32 = 0x2000_0000;

    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }
}
