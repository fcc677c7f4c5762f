//! The mystery catalog: the twenty meditations a Rose cycles through.
//!
//! The catalog is fixed reference data compiled into the binary. Ids run
//! 1..=20 in the traditional order: Joyful, Luminous, Sorrowful, Glorious,
//! five mysteries per part.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// Number of mysteries in one full rotation cycle.
pub const CYCLE_LEN: u8 = 20;

/// Number of mysteries in each part.
pub const PART_LEN: u8 = 5;

// ─── MysteryId ───────────────────────────────────────────────────────────────

/// A validated mystery identifier in `1..=20`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct MysteryId(u8);

impl MysteryId {
  pub fn new(id: i64) -> Result<Self> {
    if (1..=i64::from(CYCLE_LEN)).contains(&id) {
      Ok(Self(id as u8))
    } else {
      Err(Error::InvalidMystery(id))
    }
  }

  /// Build an id from a zero-based offset into the cycle, wrapping modulo 20.
  pub fn from_offset(offset: u32) -> Self {
    Self((offset % u32::from(CYCLE_LEN)) as u8 + 1)
  }

  pub fn get(self) -> u8 { self.0 }

  /// Zero-based offset into the cycle.
  pub fn offset(self) -> u32 { u32::from(self.0) - 1 }

  /// The id that follows this one in the cycle; 20 wraps to 1.
  pub fn next(self) -> Self { Self::from_offset(self.offset() + 1) }

  pub fn part(self) -> Part {
    match (self.0 - 1) / PART_LEN {
      0 => Part::Joyful,
      1 => Part::Luminous,
      2 => Part::Sorrowful,
      _ => Part::Glorious,
    }
  }

  pub fn mystery(self) -> Mystery {
    let (name, meditation) = CATALOG[usize::from(self.0 - 1)];
    Mystery {
      id:         self,
      part:       self.part(),
      name:       name.to_owned(),
      meditation: meditation.to_owned(),
      image_url:  None,
    }
  }
}

impl TryFrom<i64> for MysteryId {
  type Error = Error;

  fn try_from(id: i64) -> Result<Self> { Self::new(id) }
}

impl From<MysteryId> for i64 {
  fn from(id: MysteryId) -> Self { i64::from(id.0) }
}

impl std::fmt::Display for MysteryId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Part ────────────────────────────────────────────────────────────────────

/// The four parts of the rosary.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Part {
  Joyful,
  Luminous,
  Sorrowful,
  Glorious,
}

// ─── Mystery ─────────────────────────────────────────────────────────────────

/// One catalog entry as presented to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mystery {
  pub id:         MysteryId,
  pub part:       Part,
  pub name:       String,
  pub meditation: String,
  pub image_url:  Option<String>,
}

/// The whole catalog in id order.
pub fn catalog() -> Vec<Mystery> {
  (0..u32::from(CYCLE_LEN))
    .map(|offset| MysteryId::from_offset(offset).mystery())
    .collect()
}

const CATALOG: [(&str, &str); CYCLE_LEN as usize] = [
  // Joyful
  (
    "The Annunciation",
    "The angel Gabriel announces to Mary that she will bear the Son of God, and she answers: let it be done to me according to your word.",
  ),
  (
    "The Visitation",
    "Mary hastens to her kinswoman Elizabeth, and the child in Elizabeth's womb leaps for joy.",
  ),
  (
    "The Nativity",
    "Jesus is born in Bethlehem and laid in a manger, for there was no room in the inn.",
  ),
  (
    "The Presentation in the Temple",
    "Mary and Joseph present the child in the Temple, where Simeon recognises the light of the nations.",
  ),
  (
    "The Finding in the Temple",
    "After three days of searching, Mary and Joseph find the boy Jesus in the Temple among the teachers.",
  ),
  // Luminous
  (
    "The Baptism in the Jordan",
    "Jesus is baptised by John, and the voice from heaven proclaims: this is my beloved Son.",
  ),
  (
    "The Wedding at Cana",
    "At his mother's request Jesus changes water into wine, and his disciples believe in him.",
  ),
  (
    "The Proclamation of the Kingdom",
    "Jesus proclaims that the Kingdom of God is at hand and calls all to conversion.",
  ),
  (
    "The Transfiguration",
    "On the mountain the face of Jesus shines like the sun before Peter, James and John.",
  ),
  (
    "The Institution of the Eucharist",
    "At the Last Supper Jesus gives his Body and Blood under the signs of bread and wine.",
  ),
  // Sorrowful
  (
    "The Agony in the Garden",
    "In Gethsemane Jesus prays in anguish: not my will, but yours be done.",
  ),
  (
    "The Scourging at the Pillar",
    "Jesus is bound and scourged, bearing in silence the wounds by which we are healed.",
  ),
  (
    "The Crowning with Thorns",
    "The soldiers mock Jesus as king, pressing a crown of thorns upon his head.",
  ),
  (
    "The Carrying of the Cross",
    "Jesus carries his cross to Calvary, helped along the way by Simon of Cyrene.",
  ),
  (
    "The Crucifixion",
    "Jesus dies on the cross, entrusting his mother to the beloved disciple.",
  ),
  // Glorious
  (
    "The Resurrection",
    "On the third day Jesus rises from the dead, and the tomb is found empty.",
  ),
  (
    "The Ascension",
    "Forty days after Easter Jesus ascends into heaven, promising to remain with us always.",
  ),
  (
    "The Descent of the Holy Spirit",
    "At Pentecost the Holy Spirit descends upon Mary and the apostles gathered in prayer.",
  ),
  (
    "The Assumption",
    "At the end of her earthly life Mary is taken up body and soul into heavenly glory.",
  ),
  (
    "The Coronation of Mary",
    "Mary is crowned Queen of heaven and earth, sharing in the glory of her Son.",
  ),
];

#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator as _;

  #[test]
  fn catalog_has_five_per_part_in_order() {
    let all = catalog();
    assert_eq!(all.len(), 20);
    for (i, part) in Part::iter().enumerate() {
      let ids: Vec<u8> = all
        .iter()
        .filter(|m| m.part == part)
        .map(|m| m.id.get())
        .collect();
      let first = i as u8 * PART_LEN + 1;
      assert_eq!(ids, (first..first + PART_LEN).collect::<Vec<_>>());
    }
  }

  #[test]
  fn id_bounds_are_enforced() {
    assert!(MysteryId::new(0).is_err());
    assert!(MysteryId::new(21).is_err());
    assert!(MysteryId::new(-3).is_err());
    assert_eq!(MysteryId::new(20).unwrap().get(), 20);
  }

  #[test]
  fn next_wraps_after_twenty() {
    assert_eq!(MysteryId::new(20).unwrap().next(), MysteryId::new(1).unwrap());
    assert_eq!(MysteryId::new(7).unwrap().next(), MysteryId::new(8).unwrap());
  }

  #[test]
  fn deserialising_out_of_range_id_fails() {
    assert!(serde_json::from_str::<MysteryId>("21").is_err());
    let id: MysteryId = serde_json::from_str("11").unwrap();
    assert_eq!(id.part(), Part::Sorrowful);
    assert_eq!(id.mystery().name, "The Agony in the Garden");
  }
}
