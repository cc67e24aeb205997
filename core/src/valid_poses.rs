//! The species × color pose table served at `/api/validPetPoses`.
//!
//! Layout: byte 0 is the species count, byte 1 the color count, then one
//! `PoseBits` byte per (species, color) pair, row-major by species. Ids are
//! 1-based.

use crate::enums::{PetPose, PoseBits};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPoses {
    species_count: u8,
    color_count: u8,
    table: Vec<u8>,
}

impl ValidPoses {
    pub fn from_bytes(data: &[u8]) -> Result<Self, ApiError> {
        let [species_count, color_count, table @ ..] = data else {
            return Err(ApiError::InvalidPairBytes {
                expected: 2,
                actual: data.len(),
            });
        };
        let expected = usize::from(*species_count) * usize::from(*color_count);
        if table.len() != expected {
            return Err(ApiError::InvalidPairBytes {
                expected: expected + 2,
                actual: data.len(),
            });
        }
        Ok(Self {
            species_count: *species_count,
            color_count: *color_count,
            table: table.to_vec(),
        })
    }

    pub fn species_count(&self) -> u32 {
        u32::from(self.species_count)
    }

    pub fn color_count(&self) -> u32 {
        u32::from(self.color_count)
    }

    /// The poses available for a pair. Unknown ids have none.
    pub fn bits(&self, species_id: u32, color_id: u32) -> PoseBits {
        if species_id == 0 || color_id == 0 || species_id > self.species_count() || color_id > self.color_count() {
            return PoseBits::default();
        }
        let index = (species_id - 1) as usize * usize::from(self.color_count) + (color_id - 1) as usize;
        PoseBits(self.table[index])
    }

    pub fn check(&self, species_id: u32, color_id: u32, pose: Option<PetPose>) -> bool {
        self.bits(species_id, color_id).check(pose)
    }

    /// Color ids that can (or, with `valid = false`, cannot) be painted on a species.
    pub fn colors_for(&self, species_id: u32, valid: bool) -> Vec<u32> {
        (1..=self.color_count())
            .filter(|&color_id| self.check(species_id, color_id, None) == valid)
            .collect()
    }

    /// Species ids that can (or cannot) be painted a color.
    pub fn species_for(&self, color_id: u32, valid: bool) -> Vec<u32> {
        (1..=self.species_count())
            .filter(|&species_id| self.check(species_id, color_id, None) == valid)
            .collect()
    }
}
