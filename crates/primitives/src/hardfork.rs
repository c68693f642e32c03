#![allow(non_camel_case_types)]

use core::{fmt, str::FromStr};
pub use SpecId::*;

/// Protocol versions ("forks") a fixture can target.
///
/// The discriminant order is the activation order on mainnet, so the derived
/// `Ord` is the protocol history. Which of them a fixture is generated for is
/// decided by a [`ForkRegistry`](crate::ForkRegistry), not by this enum.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecId {
    /// Frontier hard fork
    /// Activated at block 0
    FRONTIER = 0,
    /// Frontier Thawing hard fork
    /// Activated at block 200000
    FRONTIER_THAWING,
    /// Homestead hard fork
    /// Activated at block 1150000
    HOMESTEAD,
    /// DAO Fork hard fork
    /// Activated at block 1920000
    DAO_FORK,
    /// Tangerine Whistle hard fork
    /// Activated at block 2463000
    TANGERINE,
    /// Spurious Dragon hard fork
    /// Activated at block 2675000
    SPURIOUS_DRAGON,
    /// Byzantium hard fork
    /// Activated at block 4370000
    BYZANTIUM,
    /// Constantinople hard fork
    /// Activated at block 7280000 is overwritten with PETERSBURG
    CONSTANTINOPLE,
    /// Petersburg hard fork
    /// Activated at block 7280000
    PETERSBURG,
    /// Istanbul hard fork
    /// Activated at block 9069000
    ISTANBUL,
    /// Muir Glacier hard fork
    /// Activated at block 9200000
    MUIR_GLACIER,
    /// Berlin hard fork
    /// Activated at block 12244000
    BERLIN,
    /// London hard fork
    /// Activated at block 12965000
    LONDON,
    /// Arrow Glacier hard fork
    /// Activated at block 13773000
    ARROW_GLACIER,
    /// Gray Glacier hard fork
    /// Activated at block 15050000
    GRAY_GLACIER,
    /// Paris/Merge hard fork
    /// Activated at block 15537394 (TTD: 58750000000000000000000)
    MERGE,
    /// Shanghai hard fork
    /// Activated at block 17034870 (Timestamp: 1681338455)
    SHANGHAI,
    /// Cancun hard fork
    /// Activated at block 19426587 (Timestamp: 1710338135)
    CANCUN,
    /// Prague hard fork
    /// Activated at block 22431086 (Timestamp: 1746612311)
    PRAGUE,
    /// Osaka hard fork
    /// Activated at block TBD
    OSAKA,
}

impl SpecId {
    /// Every known fork in activation order.
    pub const ALL: [SpecId; 20] = [
        FRONTIER,
        FRONTIER_THAWING,
        HOMESTEAD,
        DAO_FORK,
        TANGERINE,
        SPURIOUS_DRAGON,
        BYZANTIUM,
        CONSTANTINOPLE,
        PETERSBURG,
        ISTANBUL,
        MUIR_GLACIER,
        BERLIN,
        LONDON,
        ARROW_GLACIER,
        GRAY_GLACIER,
        MERGE,
        SHANGHAI,
        CANCUN,
        PRAGUE,
        OSAKA,
    ];

    /// Returns the [`SpecId`] for the given [`u8`].
    #[inline]
    pub fn try_from_u8(spec_id: u8) -> Option<Self> {
        Self::ALL.get(spec_id as usize).copied()
    }

    /// Returns `true` if the given specification ID is enabled in this spec.
    #[inline]
    pub const fn is_enabled_in(self, other: Self) -> bool {
        self as u8 >= other as u8
    }

    /// Returns the canonical fork name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            FRONTIER => name::FRONTIER,
            FRONTIER_THAWING => name::FRONTIER_THAWING,
            HOMESTEAD => name::HOMESTEAD,
            DAO_FORK => name::DAO_FORK,
            TANGERINE => name::TANGERINE,
            SPURIOUS_DRAGON => name::SPURIOUS_DRAGON,
            BYZANTIUM => name::BYZANTIUM,
            CONSTANTINOPLE => name::CONSTANTINOPLE,
            PETERSBURG => name::PETERSBURG,
            ISTANBUL => name::ISTANBUL,
            MUIR_GLACIER => name::MUIR_GLACIER,
            BERLIN => name::BERLIN,
            LONDON => name::LONDON,
            ARROW_GLACIER => name::ARROW_GLACIER,
            GRAY_GLACIER => name::GRAY_GLACIER,
            MERGE => name::MERGE,
            SHANGHAI => name::SHANGHAI,
            CANCUN => name::CANCUN,
            PRAGUE => name::PRAGUE,
            OSAKA => name::OSAKA,
        }
    }
}

/// String identifiers for hardforks.
pub mod name {
    /// String identifier for the Frontier hardfork
    pub const FRONTIER: &str = "Frontier";
    /// String identifier for the Frontier Thawing hardfork
    pub const FRONTIER_THAWING: &str = "FrontierThawing";
    /// String identifier for the Homestead hardfork
    pub const HOMESTEAD: &str = "Homestead";
    /// String identifier for the DAO Fork hardfork
    pub const DAO_FORK: &str = "DAOFork";
    /// String identifier for the Tangerine Whistle hardfork
    pub const TANGERINE: &str = "Tangerine";
    /// String identifier for the Spurious Dragon hardfork
    pub const SPURIOUS_DRAGON: &str = "SpuriousDragon";
    /// String identifier for the Byzantium hardfork
    pub const BYZANTIUM: &str = "Byzantium";
    /// String identifier for the Constantinople hardfork
    pub const CONSTANTINOPLE: &str = "Constantinople";
    /// String identifier for the Petersburg hardfork
    pub const PETERSBURG: &str = "Petersburg";
    /// String identifier for the Istanbul hardfork
    pub const ISTANBUL: &str = "Istanbul";
    /// String identifier for the Muir Glacier hardfork
    pub const MUIR_GLACIER: &str = "MuirGlacier";
    /// String identifier for the Berlin hardfork
    pub const BERLIN: &str = "Berlin";
    /// String identifier for the London hardfork
    pub const LONDON: &str = "London";
    /// String identifier for the Arrow Glacier hardfork
    pub const ARROW_GLACIER: &str = "ArrowGlacier";
    /// String identifier for the Gray Glacier hardfork
    pub const GRAY_GLACIER: &str = "GrayGlacier";
    /// String identifier for the Paris/Merge hardfork
    pub const MERGE: &str = "Merge";
    /// String identifier for the Shanghai hardfork
    pub const SHANGHAI: &str = "Shanghai";
    /// String identifier for the Cancun hardfork
    pub const CANCUN: &str = "Cancun";
    /// String identifier for the Prague hardfork
    pub const PRAGUE: &str = "Prague";
    /// String identifier for the Osaka hardfork
    pub const OSAKA: &str = "Osaka";
}

/// Alternative names used by state-test fillers for some forks.
const ALIASES: &[(&str, SpecId)] = &[
    ("Paris", MERGE),
    ("ConstantinopleFix", PETERSBURG),
    ("EIP150", TANGERINE),
    ("TangerineWhistle", TANGERINE),
    ("EIP158", SPURIOUS_DRAGON),
];

/// Error type for unknown hardfork names. Returned by [`SpecId::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownHardfork(pub String);

impl fmt::Display for UnknownHardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hardfork name: {:?}", self.0)
    }
}

impl std::error::Error for UnknownHardfork {}

/// Compares names ignoring ASCII case, spaces, `_` and `-`.
fn loose_eq(a: &str, b: &str) -> bool {
    let strip = |s: &str| {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
    };
    strip(a) == strip(b)
}

impl FromStr for SpecId {
    type Err = UnknownHardfork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .map(|spec| (spec.name(), *spec))
            .chain(ALIASES.iter().copied())
            .find(|(name, _)| loose_eq(name, s))
            .map(|(_, spec)| spec)
            .ok_or_else(|| UnknownHardfork(s.to_string()))
    }
}

impl From<SpecId> for &'static str {
    fn from(spec_id: SpecId) -> Self {
        spec_id.name()
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, spec) in SpecId::ALL.iter().enumerate() {
            assert_eq!(*spec as usize, i);
            assert_eq!(SpecId::try_from_u8(i as u8), Some(*spec));
        }
        assert_eq!(SpecId::try_from_u8(SpecId::ALL.len() as u8), None);
    }

    #[test]
    fn name_round_trips() {
        for spec in SpecId::ALL {
            assert_eq!(spec.name().parse::<SpecId>(), Ok(spec));
        }
    }

    #[rstest]
    #[case::lowercase("berlin", BERLIN)]
    #[case::uppercase("SHANGHAI", SHANGHAI)]
    #[case::spaced("Spurious Dragon", SPURIOUS_DRAGON)]
    #[case::snake("gray_glacier", GRAY_GLACIER)]
    #[case::paris_alias("Paris", MERGE)]
    #[case::constantinople_fix_alias("ConstantinopleFix", PETERSBURG)]
    fn parses_loose_names(#[case] input: &str, #[case] expected: SpecId) {
        assert_eq!(input.parse::<SpecId>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "Atlantis".parse::<SpecId>(),
            Err(UnknownHardfork("Atlantis".to_string()))
        );
    }

    #[test]
    fn enabled_in_follows_history() {
        assert!(SHANGHAI.is_enabled_in(BERLIN));
        assert!(BERLIN.is_enabled_in(BERLIN));
        assert!(!ISTANBUL.is_enabled_in(BERLIN));
    }
}
