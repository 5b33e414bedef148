/// The result of a rewrite together with a flag that tells whether anything changed.
///
/// Rewrites take their input by value. A rewrite that does not apply returns the exact input with
/// `transformed` set to `false`, so callers never have to compare trees to detect a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed<T> {
    pub data: T,
    pub transformed: bool,
}

impl<T> Transformed<T> {
    pub fn new(data: T, transformed: bool) -> Self {
        Self { data, transformed }
    }

    /// Wraps a changed value.
    pub fn yes(data: T) -> Self {
        Self::new(data, true)
    }

    /// Wraps an unchanged value.
    pub fn no(data: T) -> Self {
        Self::new(data, false)
    }

    /// Applies `f` to the data while keeping the flag.
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> Transformed<U> {
        Transformed::new(f(self.data), self.transformed)
    }
}

impl<T> Transformed<Vec<T>> {
    /// Collects a list of results. The list counts as transformed if any element was.
    pub fn collect_all(items: impl IntoIterator<Item = Transformed<T>>) -> Self {
        let mut transformed = false;
        let data = items
            .into_iter()
            .map(|item| {
                transformed |= item.transformed;
                item.data
            })
            .collect();
        Self::new(data, transformed)
    }
}
