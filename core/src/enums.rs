//! Enumerations shared by the DTI API and the domain models.
//!
//! Enum values travel over the wire by their SCREAMING_SNAKE_CASE names
//! (`HAPPY_FEM`, `SIZE_600`, `NC`), so each enum has `name()`, `Display` and
//! `FromStr` that agree with each other.

use std::fmt;
use std::str::FromStr;

/// An enum name the API sent that this crate does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// A single pet pose. Each pose owns one bit of the pose table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PetPose {
    HappyMasc = 1,
    SadMasc = 2,
    SickMasc = 4,
    HappyFem = 8,
    SadFem = 16,
    SickFem = 32,
    Unconverted = 64,
    Unknown = 128,
}

impl PetPose {
    pub const ALL: [PetPose; 8] = [
        PetPose::HappyMasc,
        PetPose::SadMasc,
        PetPose::SickMasc,
        PetPose::HappyFem,
        PetPose::SadFem,
        PetPose::SickFem,
        PetPose::Unconverted,
        PetPose::Unknown,
    ];

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            PetPose::HappyMasc => "HAPPY_MASC",
            PetPose::SadMasc => "SAD_MASC",
            PetPose::SickMasc => "SICK_MASC",
            PetPose::HappyFem => "HAPPY_FEM",
            PetPose::SadFem => "SAD_FEM",
            PetPose::SickFem => "SICK_FEM",
            PetPose::Unconverted => "UNCONVERTED",
            PetPose::Unknown => "UNKNOWN",
        }
    }

    /// The pose used when the caller does not pick one.
    pub fn ideal() -> Self {
        PetPose::HappyFem
    }

    /// All poses ordered by how good a substitute each is for `self`,
    /// starting with `self` (except `Unknown`, which is a last resort).
    pub fn closest(self) -> [PetPose; 8] {
        use PetPose::*;
        match self {
            HappyMasc => [HappyMasc, HappyFem, SadMasc, SadFem, SickMasc, SickFem, Unconverted, Unknown],
            HappyFem => [HappyFem, HappyMasc, SadFem, SadMasc, SickFem, SickMasc, Unconverted, Unknown],
            SadMasc => [SadMasc, SadFem, HappyMasc, HappyFem, SickMasc, SickFem, Unconverted, Unknown],
            SadFem => [SadFem, SadMasc, HappyFem, HappyMasc, SickFem, SickMasc, Unconverted, Unknown],
            SickMasc => [SickMasc, SickFem, SadMasc, SadFem, HappyMasc, HappyFem, Unconverted, Unknown],
            SickFem => [SickFem, SickMasc, SadFem, SadMasc, HappyFem, HappyMasc, Unconverted, Unknown],
            Unconverted => [Unconverted, HappyFem, HappyMasc, SadFem, SadMasc, SickFem, SickMasc, Unknown],
            Unknown => [HappyFem, HappyMasc, SadFem, SadMasc, SickFem, SickMasc, Unconverted, Unknown],
        }
    }
}

impl fmt::Display for PetPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PetPose {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PetPose::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "pet pose",
                value: s.to_string(),
            })
    }
}

/// A set of poses, as stored in one cell of the pose table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PoseBits(pub u8);

impl PoseBits {
    pub const ALL_MASC: PoseBits = PoseBits(1 | 2 | 4);
    pub const ALL_FEM: PoseBits = PoseBits(8 | 16 | 32);
    pub const ALL_HAPPY: PoseBits = PoseBits(1 | 8);
    pub const ALL_SAD: PoseBits = PoseBits(2 | 16);
    pub const ALL_SICK: PoseBits = PoseBits(4 | 32);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, pose: PetPose) -> bool {
        self.contains_all(pose.into())
    }

    pub fn contains_all(self, other: PoseBits) -> bool {
        self.0 & other.0 == other.0
    }

    /// With no pose: whether any pose exists. With a pose: whether it does.
    pub fn check(self, pose: Option<PetPose>) -> bool {
        match pose {
            None => !self.is_empty(),
            Some(pose) => self.contains(pose),
        }
    }

    pub fn poses(self) -> Vec<PetPose> {
        PetPose::ALL.into_iter().filter(|p| self.contains(*p)).collect()
    }
}

impl From<PetPose> for PoseBits {
    fn from(pose: PetPose) -> Self {
        PoseBits(pose.bits())
    }
}

/// Requested size of rendered layer images, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayerImageSize {
    #[default]
    Size600,
    Size300,
    Size150,
}

impl LayerImageSize {
    pub fn name(self) -> &'static str {
        match self {
            LayerImageSize::Size600 => "SIZE_600",
            LayerImageSize::Size300 => "SIZE_300",
            LayerImageSize::Size150 => "SIZE_150",
        }
    }

    pub fn pixels(self) -> u32 {
        match self {
            LayerImageSize::Size600 => 600,
            LayerImageSize::Size300 => 300,
            LayerImageSize::Size150 => 150,
        }
    }
}

impl fmt::Display for LayerImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an item is obtained on Neopets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Neocash, bought with real money.
    Nc,
    /// Neopoints.
    Np,
    /// Paintbrush items.
    Pb,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Nc => "NC",
            ItemKind::Np => "NP",
            ItemKind::Pb => "PB",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a layer belongs to a pet body or to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceLayerType {
    Biology,
    Object,
}

/// A glitch DTI has flagged on a layer. Unrecognized names are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KnownGlitch {
    OfficialSwfIsIncorrect,
    OfficialSvgIsIncorrect,
    OfficialMovieIsIncorrect,
    DisplaysIncorrectlyButCauseUnknown,
    OfficialBodyIdIsIncorrect,
    RequiresOtherBodySpecificAssets,
    Other(String),
}

impl From<String> for KnownGlitch {
    fn from(name: String) -> Self {
        match name.as_str() {
            "OFFICIAL_SWF_IS_INCORRECT" => KnownGlitch::OfficialSwfIsIncorrect,
            "OFFICIAL_SVG_IS_INCORRECT" => KnownGlitch::OfficialSvgIsIncorrect,
            "OFFICIAL_MOVIE_IS_INCORRECT" => KnownGlitch::OfficialMovieIsIncorrect,
            "DISPLAYS_INCORRECTLY_BUT_CAUSE_UNKNOWN" => KnownGlitch::DisplaysIncorrectlyButCauseUnknown,
            "OFFICIAL_BODY_ID_IS_INCORRECT" => KnownGlitch::OfficialBodyIdIsIncorrect,
            "REQUIRES_OTHER_BODY_SPECIFIC_ASSETS" => KnownGlitch::RequiresOtherBodySpecificAssets,
            _ => KnownGlitch::Other(name),
        }
    }
}
