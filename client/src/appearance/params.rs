//! Visual parameters and the avatar size derived from them.

use std::collections::BTreeMap;

use glam::Vec3;
use wire::WearableType;

use super::wearable::WearableAsset;

/// One tweakable body or clothing parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualParam {
    pub id: u16,
    pub name: &'static str,
    pub wearable: WearableType,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl VisualParam {
    /// Quantizes a value to the byte sent in `AgentSetAppearance`.
    #[must_use]
    pub fn to_byte(&self, value: f32) -> u8 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0;
        }
        (((value - self.min) / range).clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

macro_rules! params {
    ($( $id:literal $name:literal $wearable:ident $min:literal $max:literal $default:literal ;)*) => {
        &[$(VisualParam {
            id: $id,
            name: $name,
            wearable: WearableType::$wearable,
            min: $min,
            max: $max,
            default: $default,
        },)*]
    };
}

/// Number of parameters in `AgentSetAppearance`. The simulator reads the
/// bytes by position, so the table must match it entry for entry.
pub const VISUAL_PARAM_COUNT: usize = 218;

/// Group-0 parameters sent in `AgentSetAppearance`, ascending by id.
pub const VISUAL_PARAMS: &[VisualParam] = params! {
    1 "Big_Brow" Shape -0.3 2.0 -0.3;
    2 "Nose_Big_Out" Shape -0.8 2.5 -0.8;
    4 "Broad_Nostrils" Shape -0.5 1.0 -0.5;
    5 "Cleft_Chin" Shape -0.1 1.0 -0.1;
    6 "Bulbous_Nose_Tip" Shape -0.3 1.0 -0.3;
    7 "Weak_Chin" Shape -0.5 0.5 -0.5;
    8 "Double_Chin" Shape -0.5 1.5 -0.5;
    10 "Sunken_Cheeks" Shape -1.5 3.0 -1.5;
    11 "Noble_Nose_Bridge" Shape -0.5 1.5 -0.5;
    12 "Jowls" Shape -0.5 2.5 -0.5;
    13 "Cleft_Chin_Upper" Shape 0.0 1.5 0.0;
    14 "High_Cheek_Bones" Shape -0.5 1.0 -0.5;
    15 "Ears_Out" Shape -0.5 1.5 -0.5;
    16 "Pointy_Eyebrows" Hair -0.5 3.0 -0.5;
    17 "Square_Jaw" Shape -0.5 1.0 -0.5;
    18 "Puffy_Upper_Cheeks" Shape -1.5 2.5 -1.5;
    19 "Upturned_Nose_Tip" Shape -1.5 1.0 -1.5;
    20 "Bulbous_Nose" Shape -0.5 1.5 -0.5;
    21 "Upper_Eyelid_Fold" Shape -0.2 1.3 -0.2;
    22 "Attached_Earlobes" Shape 0.0 1.0 0.0;
    23 "Baggy_Eyes" Shape -0.5 1.5 -0.5;
    24 "Wide_Eyes" Shape -1.5 2.0 -1.5;
    25 "Wide_Lip_Cleft" Shape -0.8 1.5 -0.8;
    27 "Wide_Nose_Bridge" Shape -1.3 1.2 -1.3;
    31 "Arced_Eyebrows" Hair 0.0 2.0 0.5;
    33 "Height" Shape -2.3 2.0 -2.3;
    34 "Thickness" Shape -0.7 1.5 -0.7;
    35 "Big_Ears" Shape -1.0 2.0 -1.0;
    36 "Shoulders" Shape -1.8 1.4 -0.5;
    37 "Hip_Width" Shape -3.2 2.8 -1.0;
    38 "Torso_Length" Shape -1.0 1.0 -1.0;
    80 "male" Shape 0.0 1.0 0.0;
    93 "Glove_Length" Gloves 0.01 1.0 0.8;
    98 "Eye_Lightness" Eyes 0.0 1.0 0.0;
    99 "Eye_Color" Eyes 0.0 1.0 0.0;
    105 "Breast_Size" Shape 0.0 1.0 0.5;
    108 "Rainbow_Color" Skin 0.0 1.0 0.0;
    110 "Red_Skin" Skin 0.0 0.1 0.0;
    111 "Pigment" Skin 0.0 1.0 0.5;
    112 "Rainbow_Color" Hair 0.0 1.0 0.0;
    113 "Red_Hair" Hair 0.0 1.0 0.0;
    114 "Blonde_Hair" Hair 0.0 1.0 0.5;
    115 "White_Hair" Hair 0.0 1.0 0.0;
    116 "Rosy_Complexion" Skin 0.0 1.0 0.0;
    117 "Lip_Pinkness" Skin 0.0 1.0 0.0;
    119 "Eyebrow_Size" Hair 0.0 1.0 0.5;
    130 "Front_Fringe" Hair 0.0 1.0 0.45;
    131 "Side_Fringe" Hair 0.0 1.0 0.5;
    132 "Back_Fringe" Hair 0.0 1.0 0.39;
    133 "Hair_Front" Hair 0.0 1.0 0.25;
    134 "Hair_Sides" Hair 0.0 1.0 0.5;
    135 "Hair_Back" Hair 0.0 1.0 0.55;
    136 "Hair_Sweep" Hair 0.0 1.0 0.5;
    137 "Hair_Tilt" Hair 0.0 1.0 0.5;
    140 "Hair_Part_Middle" Hair 0.0 2.0 0.0;
    141 "Hair_Part_Right" Hair 0.0 2.0 0.0;
    142 "Hair_Part_Left" Hair 0.0 2.0 0.0;
    143 "Hair_Sides_Full" Hair -4.0 1.5 0.125;
    150 "Body_Definition" Skin 0.0 1.0 0.0;
    155 "Lip_Width" Shape -0.9 1.3 0.0;
    157 "Belly_Size" Shape 0.0 1.0 0.0;
    162 "Facial_Definition" Skin 0.0 1.0 0.0;
    163 "wrinkles" Skin 0.0 1.0 0.0;
    165 "Freckles" Skin 0.0 1.0 0.0;
    166 "Sideburns" Hair 0.0 1.0 0.0;
    167 "Moustache" Hair 0.0 1.0 0.0;
    168 "Soulpatch" Hair 0.0 1.0 0.0;
    169 "Chin_Curtains" Hair 0.0 1.0 0.0;
    177 "Hair_Rumpled" Hair 0.0 1.0 0.0;
    181 "Hair_Big_Front" Hair -1.0 1.0 0.14;
    182 "Hair_Big_Top" Hair -1.0 1.0 0.7;
    183 "Hair_Big_Back" Hair -1.0 1.0 0.05;
    184 "Hair_Spiked" Hair 0.0 1.0 0.0;
    185 "Deep_Chin" Shape -1.0 1.0 -1.0;
    192 "Bangs_Part_Middle" Hair 0.0 1.0 0.0;
    193 "Head_Shape" Shape 0.0 1.0 0.5;
    196 "Eye_Spacing" Shape -2.0 1.0 -2.0;
    198 "Heel_Height" Shoes 0.0 1.0 0.0;
    503 "Platform_Height" Shoes 0.0 1.0 0.0;
    505 "Lip_Thickness" Shape 0.0 1.0 0.5;
    506 "Mouth_Height" Shape -2.0 2.0 -2.0;
    507 "Breast_Gravity" Shape -1.5 2.0 0.0;
    508 "Shoe_Platform_Width" Shoes -1.0 2.0 -1.0;
    513 "Heel_Shape" Shoes 0.0 1.0 0.5;
    514 "Toe_Shape" Shoes 0.0 1.0 0.5;
    515 "Foot_Size" Shape -1.0 3.0 -1.0;
    517 "Wide_Nose" Shape -0.5 1.0 -0.5;
    518 "Eyelashes_Long" Shape -0.3 1.5 -0.3;
    600 "Sleeve_Length" Undershirt 0.0 0.85 0.7;
    601 "Shirt_Bottom" Undershirt 0.0 1.0 0.8;
    602 "Collar_Front" Undershirt 0.0 1.0 0.8;
    606 "Sleeve_Length" Jacket 0.0 1.0 0.8;
    607 "Collar_Front" Jacket 0.0 1.0 0.8;
    608 "Jacket_Length" Jacket 0.0 1.0 0.8;
    609 "Open_Jacket" Jacket 0.0 1.0 0.2;
    616 "Shoe_Height" Shoes 0.0 1.0 0.1;
    617 "Socks_Length" Socks 0.0 1.0 0.35;
    619 "Pants_Length" Underpants 0.0 1.0 0.3;
    624 "Pants_Waist" Underpants 0.0 1.0 0.8;
    625 "Glove_Fingers" Gloves 0.01 1.0 1.0;
    629 "Forehead_Angle" Shape 0.0 1.0 0.5;
    637 "Body_Fat" Shape 0.0 1.0 0.0;
    638 "Low_Crotch" Pants 0.0 1.3 0.0;
    646 "Egg_Head" Shape -1.3 1.0 0.0;
    647 "Squash_Stretch_Head" Shape -0.5 1.0 0.0;
    649 "Torso_Muscles" Shape -1.0 1.0 0.5;
    650 "Eyelid_Corner_Up" Shape -1.3 1.2 -1.3;
    652 "Leg_Muscles" Shape -1.0 1.0 0.5;
    653 "Tall_Lips" Shape -1.0 2.0 -1.0;
    654 "Shoe_Toe_Thick" Shoes 0.0 2.0 0.0;
    656 "Crooked_Nose" Shape -2.0 2.0 -2.0;
    659 "Mouth_Corner" Shape -1.4 1.2 0.5;
    662 "Face_Shear" Shape -2.0 2.0 0.0;
    663 "Shift_Mouth" Shape -2.0 2.0 0.0;
    664 "Pop_Eye" Shape -1.3 1.3 0.0;
    665 "Jaw_Jut" Shape -2.0 2.0 0.0;
    674 "Hair_Shear_Back" Hair -1.0 2.0 -0.3;
    675 "Hand_Size" Shape -0.3 0.3 -0.3;
    676 "Love_Handles" Shape -1.0 2.0 0.0;
    678 "Torso_Muscles" Shape -1.0 1.0 0.0;
    682 "Head_Size" Shape 0.0 1.0 0.5;
    683 "Neck_Thickness" Shape -0.4 0.2 -0.15;
    684 "Breast_Female_Cleavage" Shape -0.3 1.3 0.0;
    685 "Chest_Male_No_Pecs" Shape -0.5 1.1 0.0;
    690 "Eye_Size" Shape 0.0 1.0 0.5;
    692 "Leg_Length" Shape -1.0 1.0 0.0;
    693 "Arm_Length" Shape -1.0 1.0 0.6;
    700 "Lipstick_Color" Skin 0.0 1.0 0.25;
    701 "Lipstick" Skin 0.0 0.9 0.0;
    702 "Lipgloss" Skin 0.0 1.0 0.0;
    703 "Eyeliner" Skin 0.0 1.0 0.0;
    704 "Blush" Skin 0.0 0.9 0.0;
    705 "Blush_Color" Skin 0.0 1.0 0.5;
    706 "Out_Shdw_Opacity" Skin 0.2 1.0 0.6;
    707 "Outer_Shadow" Skin 0.0 0.7 0.0;
    708 "Out_Shdw_Color" Skin 0.0 1.0 0.0;
    709 "Inner_Shadow" Skin 0.0 1.0 0.0;
    710 "Nail_Polish" Skin 0.0 1.0 0.0;
    711 "Blush_Opacity" Skin 0.0 1.0 0.5;
    712 "In_Shdw_Color" Skin 0.0 1.0 0.0;
    713 "In_Shdw_Opacity" Skin 0.2 1.0 0.7;
    714 "Eyeliner_Color" Skin 0.0 1.0 0.0;
    715 "Nail_Polish_Color" Skin 0.0 1.0 0.0;
    750 "Eyebrow_Density" Hair 0.0 1.0 0.7;
    752 "Hair_Thickness" Hair 0.0 1.0 0.5;
    753 "Saddlebags" Shape -0.5 3.0 0.0;
    754 "Hair_Taper_Back" Hair -1.0 2.0 0.0;
    755 "Hair_Taper_Front" Hair -1.5 1.5 0.05;
    756 "Neck_Length" Shape -1.0 1.0 0.0;
    757 "Lower_Eyebrows" Hair -4.0 2.0 -1.0;
    758 "Lower_Bridge_Nose" Shape -1.5 1.5 -1.5;
    759 "Low_Septum_Nose" Shape -1.0 1.0 0.5;
    760 "Jaw_Angle" Shape -1.2 2.0 0.0;
    762 "Hair_Volume_Small" Hair 0.0 1.0 0.0;
    763 "Hair_Shear_Front" Hair 0.0 3.0 0.0;
    764 "Lip_Cleft_Deep" Shape -0.5 1.2 -0.5;
    765 "Puffy_Lower_Lids" Shape -0.3 2.5 -0.3;
    769 "Eye_Depth" Shape 0.0 1.0 0.5;
    773 "Head_Length" Shape 0.0 1.0 0.5;
    775 "Body_Freckles" Skin 0.0 1.0 0.0;
    779 "Collar_Back" Undershirt 0.0 1.0 0.84;
    780 "Collar_Back" Jacket 0.0 1.0 0.8;
    781 "Collar_Back" Shirt 0.0 1.0 0.78;
    795 "Butt_Size" Shape 0.0 1.0 0.25;
    796 "Pointy_Ears" Shape -0.4 3.0 -0.4;
    799 "Lip_Ratio" Shape 0.0 1.0 0.5;
    800 "Sleeve_Length" Shirt 0.0 1.0 0.89;
    801 "Shirt_Bottom" Shirt 0.0 1.0 1.0;
    802 "Collar_Front" Shirt 0.0 1.0 0.78;
    803 "shirt_red" Shirt 0.0 1.0 1.0;
    804 "shirt_green" Shirt 0.0 1.0 1.0;
    805 "shirt_blue" Shirt 0.0 1.0 1.0;
    806 "pants_red" Pants 0.0 1.0 1.0;
    807 "pants_green" Pants 0.0 1.0 1.0;
    808 "pants_blue" Pants 0.0 1.0 1.0;
    812 "shoes_red" Shoes 0.0 1.0 1.0;
    813 "shoes_green" Shoes 0.0 1.0 1.0;
    814 "Waist_Height" Pants 0.0 1.0 1.0;
    815 "Pants_Length" Pants 0.0 1.0 0.8;
    816 "Loose_Lower_Clothing" Pants 0.0 1.0 0.0;
    817 "shoes_blue" Shoes 0.0 1.0 1.0;
    818 "socks_red" Socks 0.0 1.0 1.0;
    819 "socks_green" Socks 0.0 1.0 1.0;
    820 "socks_blue" Socks 0.0 1.0 1.0;
    821 "undershirt_red" Undershirt 0.0 1.0 1.0;
    822 "undershirt_green" Undershirt 0.0 1.0 1.0;
    823 "undershirt_blue" Undershirt 0.0 1.0 1.0;
    824 "underpants_red" Underpants 0.0 1.0 1.0;
    825 "underpants_green" Underpants 0.0 1.0 1.0;
    826 "underpants_blue" Underpants 0.0 1.0 1.0;
    827 "gloves_red" Gloves 0.0 1.0 1.0;
    828 "Loose_Upper_Clothing" Shirt 0.0 1.0 0.0;
    829 "gloves_green" Gloves 0.0 1.0 1.0;
    830 "gloves_blue" Gloves 0.0 1.0 1.0;
    831 "upper_jacket_red" Jacket 0.0 1.0 1.0;
    832 "upper_jacket_green" Jacket 0.0 1.0 1.0;
    833 "upper_jacket_blue" Jacket 0.0 1.0 1.0;
    834 "lower_jacket_red" Jacket 0.0 1.0 1.0;
    835 "lower_jacket_green" Jacket 0.0 1.0 1.0;
    836 "lower_jacket_blue" Jacket 0.0 1.0 1.0;
    840 "Shirtsleeve_flair" Shirt 0.0 1.5 0.0;
    841 "Bowed_Legs" Shape -1.0 1.0 0.0;
    842 "Hip_Length" Shape -1.0 1.0 0.0;
    848 "Skirt_Bustle" Skirt 0.0 2.0 0.2;
    858 "Skirt_Length" Skirt 0.01 1.0 0.4;
    859 "Slit_Front" Skirt 0.0 1.0 1.0;
    860 "Slit_Back" Skirt 0.0 1.0 1.0;
    861 "Slit_Left" Skirt 0.0 1.0 1.0;
    862 "Slit_Right" Skirt 0.0 1.0 1.0;
    863 "Skirt_Looseness" Skirt 0.0 1.0 0.333;
    868 "Shirt_Wrinkles" Shirt 0.0 1.0 0.0;
    869 "Pants_Wrinkles" Pants 0.0 1.0 0.0;
    877 "Jacket_Wrinkles" Jacket 0.0 1.0 0.0;
    879 "Male_Package" Shape -0.5 2.0 0.0;
    880 "Eyelid_Inner_Corner_Up" Shape -1.3 1.2 -1.3;
    921 "skirt_red" Skirt 0.0 1.0 1.0;
    922 "skirt_green" Skirt 0.0 1.0 1.0;
    923 "skirt_blue" Skirt 0.0 1.0 1.0;
};

const _: () = assert!(VISUAL_PARAMS.len() == VISUAL_PARAM_COUNT);

/// Looks up a parameter by id.
#[must_use]
pub fn visual_param(id: u16) -> Option<&'static VisualParam> {
    VISUAL_PARAMS
        .binary_search_by_key(&id, |param| param.id)
        .ok()
        .map(|index| &VISUAL_PARAMS[index])
}

/// Resolved parameter values: the worn wearable's value, else the default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualParamValues(BTreeMap<u16, f32>);

impl VisualParamValues {
    #[must_use]
    pub fn resolve(wearables: &BTreeMap<WearableType, WearableAsset>) -> Self {
        let values = VISUAL_PARAMS
            .iter()
            .map(|param| {
                let value = wearables
                    .get(&param.wearable)
                    .and_then(|asset| asset.params.get(&param.id).copied())
                    .unwrap_or(param.default);
                (param.id, value)
            })
            .collect();
        Self(values)
    }

    #[must_use]
    pub fn get(&self, id: u16) -> f32 {
        self.0
            .get(&id)
            .copied()
            .or_else(|| visual_param(id).map(|param| param.default))
            .unwrap_or(0.0)
    }

    /// One byte per table parameter, in table order.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        VISUAL_PARAMS
            .iter()
            .map(|param| param.to_byte(self.get(param.id)))
            .collect()
    }

    /// Bounding size of the avatar sent with its appearance.
    #[must_use]
    pub fn avatar_size(&self) -> Vec3 {
        let height = 1.706
            + 0.1918 * self.get(692)
            + 0.0375 * self.get(842)
            + 0.12022 * self.get(33)
            + 0.01117 * self.get(682)
            + 0.038 * self.get(756)
            + 0.08 * self.get(198)
            + 0.07 * self.get(503);
        Vec3::new(0.45, 0.6, height)
    }
}
