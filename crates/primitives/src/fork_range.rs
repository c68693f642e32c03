//! Expansion of a filler's fork gate into the concrete forks it runs on.

use crate::{
    fork_registry::{ForkError, ForkRegistry},
    hardfork::SpecId,
};
use core::fmt;

/// Half-open fork interval: includes `from`, excludes `until`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ForkRange {
    /// First fork of the range.
    pub from: SpecId,
    /// First fork after the range.
    pub until: SpecId,
}

impl ForkRange {
    /// Creates a new range. Bounds are checked against a registry on resolution.
    pub const fn new(from: SpecId, until: SpecId) -> Self {
        Self { from, until }
    }

    /// Creates a range from fork names.
    pub fn parse(from: &str, until: &str) -> Result<Self, ForkError> {
        let parse = |name: &str| {
            name.parse::<SpecId>()
                .map_err(|_| ForkError::UnknownFork(name.to_string()))
        };
        Ok(Self::new(parse(from)?, parse(until)?))
    }
}

impl fmt::Display for ForkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.until)
    }
}

/// Which forks a filler applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForkSelection {
    /// `[from, until)`.
    Range(ForkRange),
    /// `from` and every later fork.
    From(SpecId),
    /// A single fork.
    Only(SpecId),
}

impl From<ForkRange> for ForkSelection {
    fn from(range: ForkRange) -> Self {
        Self::Range(range)
    }
}

impl fmt::Display for ForkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => range.fmt(f),
            Self::From(from) => write!(f, "{from}.."),
            Self::Only(fork) => fork.fmt(f),
        }
    }
}

/// Turns fork gates into fork lists against one registry.
///
/// Resolution is a pure function of the registry contents and the input.
#[derive(Clone, Copy, Debug)]
pub struct ForkRangeResolver<'a> {
    registry: &'a ForkRegistry,
}

impl<'a> ForkRangeResolver<'a> {
    /// Creates a resolver over `registry`.
    pub const fn new(registry: &'a ForkRegistry) -> Self {
        Self { registry }
    }

    /// Registry this resolver reads from.
    pub const fn registry(&self) -> &'a ForkRegistry {
        self.registry
    }

    /// Forks covered by `range`, in registry order.
    pub fn resolve(&self, range: &ForkRange) -> Result<Vec<SpecId>, ForkError> {
        self.registry.all_between(range.from, range.until)
    }

    /// Forks covered by any kind of selection, in registry order.
    pub fn resolve_selection(&self, selection: &ForkSelection) -> Result<Vec<SpecId>, ForkError> {
        match selection {
            ForkSelection::Range(range) => self.resolve(range),
            ForkSelection::From(from) => self.registry.all_from(*from),
            ForkSelection::Only(fork) => self.registry.rank(*fork).map(|_| vec![*fork]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardfork::SpecId::*;

    fn registry() -> ForkRegistry {
        ForkRegistry::from_forks([ISTANBUL, BERLIN, LONDON, SHANGHAI]).unwrap()
    }

    #[test]
    fn resolves_berlin_until_shanghai() {
        let registry = registry();
        let resolver = ForkRangeResolver::new(&registry);
        let range = ForkRange::parse("berlin", "shanghai").unwrap();
        assert_eq!(resolver.resolve(&range), Ok(vec![BERLIN, LONDON]));
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = registry();
        let resolver = ForkRangeResolver::new(&registry);
        let range = ForkRange::new(ISTANBUL, SHANGHAI);
        let first = resolver.resolve(&range).unwrap();
        for _ in 0..8 {
            assert_eq!(resolver.resolve(&range).unwrap(), first);
        }
    }

    #[test]
    fn every_range_matches_rank_filter() {
        let registry = registry();
        let resolver = ForkRangeResolver::new(&registry);
        for from in registry.iter() {
            for until in registry.iter() {
                let range = ForkRange::new(from, until);
                let (rf, ru) = (registry.rank(from).unwrap(), registry.rank(until).unwrap());
                match resolver.resolve(&range) {
                    Ok(forks) => {
                        let expected: Vec<_> = registry
                            .iter()
                            .filter(|f| {
                                let r = registry.rank(*f).unwrap();
                                rf <= r && r < ru
                            })
                            .collect();
                        assert_eq!(forks, expected, "{range}");
                    }
                    Err(err) => {
                        assert!(rf > ru, "{range}");
                        assert_eq!(err, ForkError::InvalidRange { from, until });
                    }
                }
            }
        }
    }

    #[test]
    fn selections() {
        let registry = registry();
        let resolver = ForkRangeResolver::new(&registry);
        assert_eq!(
            resolver.resolve_selection(&ForkSelection::From(LONDON)),
            Ok(vec![LONDON, SHANGHAI])
        );
        assert_eq!(
            resolver.resolve_selection(&ForkSelection::Only(BERLIN)),
            Ok(vec![BERLIN])
        );
        assert!(matches!(
            resolver.resolve_selection(&ForkSelection::Only(CANCUN)),
            Err(ForkError::UnknownFork(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(
            ForkRange::parse("berlin", "atlantis"),
            Err(ForkError::UnknownFork("atlantis".to_string()))
        );
    }

    #[test]
    fn display() {
        assert_eq!(ForkRange::new(BERLIN, SHANGHAI).to_string(), "Berlin..Shanghai");
        assert_eq!(ForkSelection::From(LONDON).to_string(), "London..");
    }
}
