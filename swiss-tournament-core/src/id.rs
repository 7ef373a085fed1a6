use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use snowflaked::sync::Generator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const INSTANCE: u16 = 0;

static TOURNAMENT: Generator = Generator::new_unchecked(INSTANCE);
static COMPETITOR: Generator = Generator::new_unchecked(INSTANCE);
static MATCH: Generator = Generator::new_unchecked(INSTANCE);

macro_rules! id {
    ($name:ident, $id:ty, $generator:ident) => {
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[repr(transparent)]
        pub struct $name(pub $id);

        impl $name {
            /// Generates a new, process-wide unique id.
            #[inline]
            pub fn generate() -> Self {
                Self($generator.generate())
            }
        }

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<$id> for $name {
            #[inline]
            fn as_ref(&self) -> &$id {
                &self.0
            }
        }

        impl PartialEq<$id> for $name {
            #[inline]
            fn eq(&self, other: &$id) -> bool {
                self.0 == *other
            }
        }

        impl From<$id> for $name {
            #[inline]
            fn from(id: $id) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = <$id as FromStr>::Err;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse::<$id>()?))
            }
        }
    };
}

id!(TournamentId, u64, TOURNAMENT);
id!(CompetitorId, u64, COMPETITOR);
id!(MatchId, u64, MATCH);
