use std::iter::{Enumerate, Map};

pub type WithIdx<I, Idx> =
    Map<Enumerate<I>, fn((usize, <I as Iterator>::Item)) -> (Idx, <I as Iterator>::Item)>;

/// Like `enumerate`, but yields a typed index instead of a bare `usize`.
pub trait EnumerateIdx: Iterator + Sized {
    fn enumerate_idx<Idx: From<usize>>(self) -> WithIdx<Self, Idx> {
        self.enumerate().map(|(index, item)| (Idx::from(index), item))
    }
}

impl<I: Iterator> EnumerateIdx for I {}

#[cfg(test)]
mod tests {
    use crate::problem::destination::DestinationIdx;

    use super::*;

    #[test]
    fn test_enumerate_idx_yields_typed_indices() {
        let ids = ["a", "b", "c"];
        let indexed: Vec<(DestinationIdx, &&str)> = ids.iter().enumerate_idx().collect();

        assert_eq!(indexed.len(), 3);
        assert_eq!(indexed[0].0, DestinationIdx::new(0));
        assert_eq!(indexed[2].0.get(), 2);
        assert_eq!(*indexed[1].1, "b");
    }
}
