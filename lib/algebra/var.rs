use std::rc::Rc;

/// A variable in a path-sum polynomial.
///
/// Variables come in three classes: `Input` variables stand for the
/// computational-basis value of an input wire, `Path` variables are summed
/// over existentially by the enclosing path-sum, and `Free` variables are
/// transient names introduced by a frame change during extraction.
///
/// Indices within a class are dense and zero-based; removing a `Path`
/// variable renumbers all higher `Path` indices down by one so that the range
/// `0..path_vars` stays contiguous. The derived ordering (class first, then
/// index or name) is total and is what makes polynomial iteration canonical.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    /// The value of the `i`-th input wire.
    Input(usize),
    /// The `i`-th existentially summed path variable.
    Path(usize),
    /// A named free variable.
    Free(Rc<str>),
}

impl Var {
    /// Create a new free variable with the given name.
    pub fn free<S: AsRef<str>>(name: S) -> Self {
        Self::Free(Rc::from(name.as_ref()))
    }

    /// Return `true` if `self` is `Input`.
    pub fn is_input(&self) -> bool { matches!(self, Self::Input(_)) }

    /// Return `true` if `self` is `Path`.
    pub fn is_path(&self) -> bool { matches!(self, Self::Path(_)) }

    /// Return `true` if `self` is `Free`.
    pub fn is_free(&self) -> bool { matches!(self, Self::Free(_)) }

    /// Return the inner index if `self` is `Input`.
    pub fn input_index(&self) -> Option<usize> {
        match self {
            Self::Input(i) => Some(*i),
            _ => None,
        }
    }

    /// Return the inner index if `self` is `Path`.
    pub fn path_index(&self) -> Option<usize> {
        match self {
            Self::Path(i) => Some(*i),
            _ => None,
        }
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(i) => write!(f, "x{}", i),
            Self::Path(i) => write!(f, "y{}", i),
            Self::Free(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Var::Input(3) < Var::Path(0));
        assert!(Var::Path(7) < Var::free("a"));
        assert!(Var::Input(0) < Var::Input(1));
        assert!(Var::free("a") < Var::free("b"));
    }

    #[test]
    fn accessors() {
        assert_eq!(Var::Input(2).input_index(), Some(2));
        assert_eq!(Var::Input(2).path_index(), None);
        assert_eq!(Var::Path(1).path_index(), Some(1));
        assert!(Var::free("t0").is_free());
    }
}
