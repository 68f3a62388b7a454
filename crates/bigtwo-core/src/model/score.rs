use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit set explaining a seat's round score. Bits 0..=3 count the twos held,
/// one bit per two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreReasons(u16);

impl ScoreReasons {
    pub const NONE: ScoreReasons = ScoreReasons(0);
    pub const HOLD_TWO: ScoreReasons = ScoreReasons(0b1111);
    pub const TEN_OR_MORE: ScoreReasons = ScoreReasons(1 << 4);
    pub const HOLD_FOUR_OF_KIND: ScoreReasons = ScoreReasons(1 << 5);
    pub const HOLD_STRAIGHT_FLUSH: ScoreReasons = ScoreReasons(1 << 6);
    pub const LAST_SHOW_TWO: ScoreReasons = ScoreReasons(1 << 7);
    pub const LAST_FOUR_OF_KIND: ScoreReasons = ScoreReasons(1 << 8);
    pub const LAST_STRAIGHT_FLUSH: ScoreReasons = ScoreReasons(1 << 9);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & 0x3ff)
    }

    /// One `HOLD_TWO` bit per two, capped at four.
    pub const fn holding_twos(count: usize) -> Self {
        let count = if count > 4 { 4 } else { count };
        Self(((1u16 << count) - 1) & Self::HOLD_TWO.0)
    }

    pub const fn twos_held(self) -> u32 {
        (self.0 & Self::HOLD_TWO.0).count_ones()
    }

    pub const fn contains(self, other: ScoreReasons) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn union(self, other: ScoreReasons) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Multiplier these reasons apply to a penalty: one doubling per bit.
    pub const fn factor(self) -> u32 {
        1 << self.0.count_ones()
    }
}

impl std::ops::BitOr for ScoreReasons {
    type Output = ScoreReasons;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ScoreReasons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ScoreReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        let twos = self.twos_held();
        if twos > 0 {
            parts.push(format!("{twos}x two"));
        }
        let named = [
            (Self::TEN_OR_MORE, "ten or more"),
            (Self::HOLD_FOUR_OF_KIND, "holds four of a kind"),
            (Self::HOLD_STRAIGHT_FLUSH, "holds straight flush"),
            (Self::LAST_SHOW_TWO, "finished on a two"),
            (Self::LAST_FOUR_OF_KIND, "finished on four of a kind"),
            (Self::LAST_STRAIGHT_FLUSH, "finished on straight flush"),
        ];
        for (flag, label) in named {
            if self.contains(flag) {
                parts.push(label.to_string());
            }
        }
        if parts.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
