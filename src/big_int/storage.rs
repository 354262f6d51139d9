//! growable little-endian place storage
//!
//! two interchangeable backends share one contract: a buffer is never empty,
//! `resize` only grows, and `as_mut_slice` hands out exclusive places. The
//! arithmetic code relies on the contract only, so the backends can be
//! swapped with the `cow-storage` feature without touching it.

use std::rc::Rc;

use super::places::Place;

cfg_if::cfg_if! {
    if #[cfg(feature = "cow-storage")] {
        pub type PlaceBuf = CowBuf;
    } else {
        pub type PlaceBuf = VecBuf;
    }
}

/// the baseline backend, every instance owns its own `Vec`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VecBuf(Vec<Place>);

impl VecBuf {
    pub fn new(len: usize, fill: Place) -> Self {
        assert!(len > 0, "a place buffer is never empty");
        Self(vec![fill; len])
    }
    pub fn from_vec(places: Vec<Place>) -> Self {
        assert!(!places.is_empty(), "a place buffer is never empty");
        Self(places)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn get(&self, at: usize) -> Place {
        self.0[at]
    }
    pub fn last(&self) -> Place {
        self.0[self.0.len() - 1]
    }
    pub fn push(&mut self, place: Place) {
        self.0.push(place);
    }
    pub fn pop(&mut self) {
        assert!(self.0.len() > 1, "a place buffer is never empty");
        self.0.pop();
    }
    pub fn resize(&mut self, new_len: usize, fill: Place) {
        assert!(new_len >= self.0.len(), "place buffers only grow");
        self.0.resize(new_len, fill);
    }

    pub fn as_slice(&self) -> &[Place] {
        &self.0
    }
    pub fn as_mut_slice(&mut self) -> &mut [Place] {
        &mut self.0
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Place> + DoubleEndedIterator + '_ {
        self.0.iter().copied()
    }
}

/// the optimized backend
///
/// a single place is stored inline without allocating; longer buffers live in
/// a reference-counted block that clones share and that is split off before
/// the first write
#[derive(Clone)]
pub enum CowBuf {
    Inline(Place),
    Shared(Rc<Vec<Place>>),
}

impl CowBuf {
    pub fn new(len: usize, fill: Place) -> Self {
        assert!(len > 0, "a place buffer is never empty");
        if len == 1 {
            Self::Inline(fill)
        } else {
            Self::Shared(Rc::new(vec![fill; len]))
        }
    }
    pub fn from_vec(places: Vec<Place>) -> Self {
        match places.len() {
            0 => panic!("a place buffer is never empty"),
            1 => Self::Inline(places[0]),
            _ => Self::Shared(Rc::new(places)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Inline(_) => 1,
            Self::Shared(places) => places.len(),
        }
    }
    pub fn get(&self, at: usize) -> Place {
        self.as_slice()[at]
    }
    pub fn last(&self) -> Place {
        self.as_slice()[self.len() - 1]
    }
    pub fn push(&mut self, place: Place) {
        match self {
            Self::Inline(first) => *self = Self::Shared(Rc::new(vec![*first, place])),
            Self::Shared(places) => Rc::make_mut(places).push(place),
        }
    }
    pub fn pop(&mut self) {
        match self {
            Self::Inline(_) => panic!("a place buffer is never empty"),
            Self::Shared(places) => {
                if let [first, _] = places.as_slice() {
                    *self = Self::Inline(*first);
                } else {
                    Rc::make_mut(places).pop();
                }
            }
        }
    }
    pub fn resize(&mut self, new_len: usize, fill: Place) {
        assert!(new_len >= self.len(), "place buffers only grow");
        match self {
            Self::Inline(first) if new_len > 1 => {
                let mut places = vec![fill; new_len];
                places[0] = *first;
                *self = Self::Shared(Rc::new(places));
            }
            Self::Inline(_) => {}
            Self::Shared(places) => Rc::make_mut(places).resize(new_len, fill),
        }
    }

    pub fn as_slice(&self) -> &[Place] {
        match self {
            Self::Inline(place) => std::slice::from_ref(place),
            Self::Shared(places) => places,
        }
    }
    pub fn as_mut_slice(&mut self) -> &mut [Place] {
        match self {
            Self::Inline(place) => std::slice::from_mut(place),
            Self::Shared(places) => Rc::make_mut(places).as_mut_slice(),
        }
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Place> + DoubleEndedIterator + '_ {
        self.as_slice().iter().copied()
    }
}

impl PartialEq for CowBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}
impl Eq for CowBuf {}
impl std::hash::Hash for CowBuf {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_grow_and_shrink_back() {
        let mut buf = VecBuf::new(1, 7);
        buf.push(8);
        buf.resize(4, 9);
        assert_eq!(buf.as_slice(), [7, 8, 9, 9]);
        buf.pop();
        buf.pop();
        buf.pop();
        assert_eq!(buf.as_slice(), [7]);
    }

    #[test]
    #[should_panic = "never empty"]
    fn vec_cannot_pop_last() {
        VecBuf::new(1, 0).pop();
    }

    #[test]
    fn cow_stays_inline_for_one_place() {
        let mut buf = CowBuf::new(1, 7);
        assert!(matches!(buf, CowBuf::Inline(7)));
        buf.resize(1, 0);
        assert!(matches!(buf, CowBuf::Inline(7)));
    }

    #[test]
    fn cow_collapses_back_to_inline() {
        let mut buf = CowBuf::from_vec(vec![1, 2]);
        assert!(matches!(buf, CowBuf::Shared(_)));
        buf.pop();
        assert!(matches!(buf, CowBuf::Inline(1)));
    }

    #[test]
    fn cow_clones_share_until_written() {
        let mut buf = CowBuf::from_vec(vec![1, 2, 3]);
        let copy = buf.clone();
        if let (CowBuf::Shared(lhs), CowBuf::Shared(rhs)) = (&buf, &copy) {
            assert!(Rc::ptr_eq(lhs, rhs));
        } else {
            panic!("both buffers should share one block");
        }

        buf.as_mut_slice()[0] = 9;
        if let (CowBuf::Shared(lhs), CowBuf::Shared(rhs)) = (&buf, &copy) {
            assert!(!Rc::ptr_eq(lhs, rhs));
        } else {
            panic!("the write should have split the block");
        }
        assert_eq!(buf.as_slice(), [9, 2, 3]);
        assert_eq!(copy.as_slice(), [1, 2, 3]);
    }

    #[test]
    fn backends_agree() {
        let mut vec_buf = VecBuf::new(2, 5);
        let mut cow_buf = CowBuf::new(2, 5);
        for place in [11, 13] {
            vec_buf.push(place);
            cow_buf.push(place);
        }
        assert_eq!(vec_buf.as_slice(), cow_buf.as_slice());
        assert_eq!(vec_buf.last(), cow_buf.last());
        assert_eq!(vec_buf.len(), cow_buf.len());
    }
}
