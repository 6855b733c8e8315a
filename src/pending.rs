/// Update recorded at a node but not yet forwarded to its children.
///
/// The same type describes the update being applied by `set_range` and
/// `add_range`, so a range operation and a stored lazy tag compose through
/// a single function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Pending {
    #[default]
    Clean,
    Add(i64),
    Set(i64),
}

impl Pending {
    /// Returns the update equivalent to applying `g` first and then `f`.
    ///
    /// Accumulated deltas wrap: a tag may overflow on its own while every
    /// value it is applied to stays in range, and the result is exact
    /// modulo 2^64.
    ///
    /// Require for all f,g,a: apply(compose(f, g), a) = apply(f, apply(g, a))
    pub(crate) fn compose(f: Pending, g: Pending) -> Pending {
        match (f, g) {
            (Pending::Clean, g) => g,
            (Pending::Set(x), _) => Pending::Set(x),
            (Pending::Add(x), Pending::Set(s)) => Pending::Set(s.wrapping_add(x)),
            (Pending::Add(x), Pending::Add(a)) => Pending::add(a.wrapping_add(x)),
            (Pending::Add(x), Pending::Clean) => Pending::add(x),
        }
    }

    /// An add of `delta`, or `Clean` when the add is a no-op.
    pub(crate) fn add(delta: i64) -> Pending {
        if delta == 0 {
            Pending::Clean
        } else {
            Pending::Add(delta)
        }
    }

    /// Applies the update to the maximum of a range.
    ///
    /// Both updates are monotone, so the max of the updated range is the
    /// update applied to the old max.
    pub(crate) fn apply(self, aggregate: i64) -> i64 {
        match self {
            Pending::Clean => aggregate,
            Pending::Add(x) => aggregate.wrapping_add(x),
            Pending::Set(x) => x,
        }
    }

    pub(crate) fn is_clean(self) -> bool {
        self == Pending::Clean
    }
}
