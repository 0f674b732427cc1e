use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// The places ontology documents may be loaded from.
///
/// Each single place has a flag and the combined values are the flags added up:
/// [`WEB`](Self::Web) is `1`, [`CLASSPATH`](Self::Classpath) is `2` and [`DIRECTORY`](Self::Directory) is `4`.
/// When several places are allowed they are tried in the order directory > web > classpath.
///
/// [`None`](Self::None) forbids any lookup: only explicitly mapped locations are used.
/// "Classpath" is the bundled resource root of the [`LocationResolver`](crate::LocationResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LoadingLocation {
    None = 0,
    Web = 1,
    Classpath = 2,
    WebAndClasspath = 3,
    Directory = 4,
    WebAndDirectory = 5,
    ClasspathAndDirectory = 6,
    #[default]
    All = 7,
}

impl LoadingLocation {
    /// Builds the policy from its numerical value.
    ///
    /// ```
    /// use oxonto::LoadingLocation;
    ///
    /// assert_eq!(LoadingLocation::from_bits(5), Some(LoadingLocation::WebAndDirectory));
    /// assert_eq!(LoadingLocation::from_bits(8), None);
    /// ```
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::None,
            1 => Self::Web,
            2 => Self::Classpath,
            3 => Self::WebAndClasspath,
            4 => Self::Directory,
            5 => Self::WebAndDirectory,
            6 => Self::ClasspathAndDirectory,
            7 => Self::All,
            _ => return None,
        })
    }

    /// The numerical value of the policy.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn allows_web(self) -> bool {
        self.bits() & Self::Web.bits() != 0
    }

    #[inline]
    pub const fn allows_classpath(self) -> bool {
        self.bits() & Self::Classpath.bits() != 0
    }

    #[inline]
    pub const fn allows_directory(self) -> bool {
        self.bits() & Self::Directory.bits() != 0
    }

    /// Checks that every place allowed by `other` is also allowed by `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    /// The single source kind that wins in resolution order, if any.
    pub const fn preferred_source(self) -> Option<SourceKind> {
        if self.allows_directory() {
            Some(SourceKind::Disk)
        } else if self.allows_web() {
            Some(SourceKind::Web)
        } else if self.allows_classpath() {
            Some(SourceKind::Classpath)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Web => "WEB",
            Self::Classpath => "CLASSPATH",
            Self::WebAndClasspath => "WEB_AND_CLASSPATH",
            Self::Directory => "DIRECTORY",
            Self::WebAndDirectory => "WEB_AND_DIRECTORY",
            Self::ClasspathAndDirectory => "CLASSPATH_AND_DIRECTORY",
            Self::All => "ALL",
        }
    }
}

impl BitOr for LoadingLocation {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        // Both operands are at most 7 so the union is always a valid value
        Self::from_bits(self.bits() | rhs.bits()).unwrap_or(Self::All)
    }
}

impl fmt::Display for LoadingLocation {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SourceKind> for LoadingLocation {
    #[inline]
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Disk => Self::Directory,
            SourceKind::Web => Self::Web,
            SourceKind::Classpath => Self::Classpath,
        }
    }
}

/// A single kind of source, as written in import location config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Disk,
    Web,
    Classpath,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Web => "web",
            Self::Classpath => "classpath",
        }
    }
}

impl fmt::Display for SourceKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "disk" => Ok(Self::Disk),
            "web" => Ok(Self::Web),
            "classpath" => Ok(Self::Classpath),
            other => Err(UnknownSourceKind(other.to_owned())),
        }
    }
}

/// A source kind tag that is not one of `disk`, `web` or `classpath`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid loading location provided: {0}. Needs to be one of [disk, web, classpath]")]
pub struct UnknownSourceKind(String);

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    #[test]
    fn flags_match_numerical_values() {
        for bits in 0..=7 {
            let location = LoadingLocation::from_bits(bits).unwrap();
            assert_eq!(location.bits(), bits);
            assert_eq!(location.allows_web(), bits % 2 != 0);
            assert_eq!(location.allows_classpath(), bits & 2 != 0);
            assert_eq!(location.allows_directory(), bits >= 4);
        }
    }

    #[test]
    fn union_combines_flags() {
        assert_eq!(
            LoadingLocation::Web | LoadingLocation::Directory,
            LoadingLocation::WebAndDirectory
        );
        assert_eq!(
            LoadingLocation::WebAndClasspath | LoadingLocation::Directory,
            LoadingLocation::All
        );
        assert!(LoadingLocation::All.contains(LoadingLocation::ClasspathAndDirectory));
        assert!(!LoadingLocation::Web.contains(LoadingLocation::Classpath));
    }

    #[test]
    fn preferred_source_follows_priority() {
        assert_eq!(
            LoadingLocation::All.preferred_source(),
            Some(SourceKind::Disk)
        );
        assert_eq!(
            LoadingLocation::WebAndClasspath.preferred_source(),
            Some(SourceKind::Web)
        );
        assert_eq!(
            LoadingLocation::Classpath.preferred_source(),
            Some(SourceKind::Classpath)
        );
        assert_eq!(LoadingLocation::None.preferred_source(), None);
    }

    #[test]
    fn source_kind_tags() -> Result<(), UnknownSourceKind> {
        assert_eq!("disk".parse::<SourceKind>()?, SourceKind::Disk);
        assert_eq!(" web ".parse::<SourceKind>()?, SourceKind::Web);
        assert_eq!(
            LoadingLocation::from("classpath".parse::<SourceKind>()?),
            LoadingLocation::Classpath
        );
        assert!("ftp".parse::<SourceKind>().is_err());
        Ok(())
    }
}
