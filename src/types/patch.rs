//! Field presence for partial updates
//!
//! `Option<T>` cannot tell "not sent" from "sent as null/empty" once a
//! field is itself optional, so patches carry one `Patch` slot per field.

/// A single field of a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field was not supplied; leave the stored value untouched
    Absent,
    /// Field was supplied with this value
    Present(T),
}

impl<T> Patch<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Patch::Present(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Present(v) => Patch::Present(f(v)),
        }
    }

    /// Map a present value through a fallible conversion
    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<Patch<U>, E> {
        match self {
            Patch::Absent => Ok(Patch::Absent),
            Patch::Present(v) => f(v).map(Patch::Present),
        }
    }

    /// Apply onto a stored value
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Present(v) = self {
            *target = v;
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Absent => None,
            Patch::Present(v) => Some(v),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `None` means "not supplied"
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Present(v),
            None => Patch::Absent,
        }
    }
}
