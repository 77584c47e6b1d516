//! Traffic light phase.

use std::fmt;

/// The colour a traffic light is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Stop. Every light starts here.
    #[default]
    Red = 0,
    /// Go.
    Green = 1,
}

impl Phase {
    /// Returns the other phase.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    /// Returns true for [`Phase::Green`].
    #[inline]
    #[must_use]
    pub const fn is_green(self) -> bool {
        matches!(self, Self::Green)
    }

    /// Lowercase colour name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
        }
    }
}

impl From<u8> for Phase {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::Green,
            _ => Self::Red,
        }
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase as Self
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(Phase::Red.toggled(), Phase::Green);
        assert_eq!(Phase::Green.toggled(), Phase::Red);
        assert_eq!(Phase::Red.toggled().toggled(), Phase::Red);
    }

    #[test]
    fn test_default_is_red() {
        assert_eq!(Phase::default(), Phase::Red);
        assert!(!Phase::default().is_green());
    }

    #[test]
    fn test_u8_encoding() {
        assert_eq!(u8::from(Phase::Red), 0);
        assert_eq!(u8::from(Phase::Green), 1);
        assert_eq!(Phase::from(1), Phase::Green);
        // Unknown values fall back to the safe phase
        assert_eq!(Phase::from(200), Phase::Red);
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::Green.to_string(), "green");
        assert_eq!(format!("{}", Phase::Red), "red");
    }
}
