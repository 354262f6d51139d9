use std::{
    fmt::{Debug, Display},
    ops::{
        Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
        DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
        SubAssign,
    },
    str::FromStr,
};

use itertools::Itertools;

use crate::big_int::{
    places::{sign_bit, Place},
    storage::PlaceBuf,
};

pub mod math_algos;
pub mod places;
pub mod storage;


/// an arbitrary-precision signed integer in two's-complement form
///
/// the value is a little-endian sequence of 32-bit places, conceptually
/// extended to infinity by repeating the top place's sign bit. The stored
/// sequence is kept minimal: at least one place, and never a top place that
/// plain sign extension of the one below it would reproduce. Minimality makes
/// the representation canonical, so equality and hashing are place-wise.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigInt {
    places: PlaceBuf,
}

/// a parse failure of [`BigInt::from_str`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromStrErr {
    /// no digits between the optional sign and the end of the input
    Empty,
    UnknownDigit { digit: char, position: usize },
}
impl Display for FromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no digits to parse"),
            Self::UnknownDigit { digit, position } => {
                write!(f, "unknown digit {digit:?} at position {position}")
            }
        }
    }
}
impl std::error::Error for FromStrErr {}

/// a division or remainder was requested with a divisor of zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideByZero;
impl Display for DivideByZero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "divisor was zero")
    }
}
impl std::error::Error for DivideByZero {}

/// any error this crate reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum Error {
    Parse(FromStrErr),
    DivideByZero(DivideByZero),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => Display::fmt(err, f),
            Self::DivideByZero(err) => Display::fmt(err, f),
        }
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::DivideByZero(err) => Some(err),
        }
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self {
            places: PlaceBuf::new(1, 0),
        }
    }
}

impl From<i32> for BigInt {
    /// the native two's-complement bits carry over as the single place
    fn from(value: i32) -> Self {
        Self {
            places: PlaceBuf::new(1, value as Place),
        }
    }
}

impl FromStr for BigInt {
    type Err = FromStrErr;

    /// an optional `'-'` followed by at least one decimal digit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (is_negated, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() {
            return Err(FromStrErr::Empty);
        }
        let mut num = Self::default();
        for (position, digit) in digits.chars().enumerate() {
            match digit.to_digit(10) {
                Some(value) => {
                    math_algos::mul::assign_place(&mut num, 10);
                    math_algos::add::assign(&mut num, &Self::from(value as i32));
                }
                None => {
                    return Err(FromStrErr::UnknownDigit {
                        digit,
                        position: position + usize::from(is_negated),
                    })
                }
            }
        }
        num.revert_sign(is_negated);
        Ok(num)
    }
}

impl BigInt {
    /// a single place read as an unsigned value
    fn from_place(place: Place) -> Self {
        let mut num = Self {
            places: PlaceBuf::new(1, place),
        };
        num.correct_sign_bit(false, None);
        num
    }

    /// generates a random value of `place_count.start()..=place_count.end()`
    /// places, before normalization
    pub fn new_random(
        place_count: std::ops::RangeInclusive<usize>,
        mut rng: impl rand::RngCore,
    ) -> Self {
        let count = place_count.start()
            + crate::util::rng::next_bound(place_count.end() - place_count.start(), &mut rng, 20);
        let mut num = Self {
            places: PlaceBuf::from_vec((0..count.max(1)).map(|_| rng.next_u32()).collect()),
        };
        num.shrink();
        num
    }

    /// -1, 0 or 1 depending on the represented value
    pub fn signum(&self) -> i32 {
        if self.sign_bit() {
            -1
        } else if self.places.len() == 1 && self.places.get(0) == 0 {
            0
        } else {
            1
        }
    }
    pub fn is_zero(&self) -> bool {
        self.signum() == 0
    }
    pub fn is_negative(&self) -> bool {
        self.sign_bit()
    }

    /// calculates (`self` / `rhs`, `self` % `rhs`) in one pass
    ///
    /// the quotient rounds towards zero and the remainder keeps the sign of
    /// `self`, like the native integer operators
    pub fn div_rem(&self, rhs: &Self) -> Result<(Self, Self), DivideByZero> {
        if rhs.is_zero() {
            return Err(DivideByZero);
        }
        let mut quotient = self.clone();
        let remainder = math_algos::div::assign_long(&mut quotient, rhs);
        Ok((quotient, remainder))
    }

    /// the sign bit of the top place, and with it of the whole value
    fn sign_bit(&self) -> bool {
        sign_bit(self.places.last())
    }
    /// the place that sign extension repeats beyond the stored length
    fn extension_place(&self) -> Place {
        places::extension(self.sign_bit())
    }
    /// the place at `at`, zero below the start and sign-extended past the end
    fn get_extended(&self, at: isize) -> Place {
        if at < 0 {
            0
        } else if at as usize >= self.places.len() {
            self.extension_place()
        } else {
            self.places.get(at as usize)
        }
    }

    /// drops top places that sign extension of the place below reproduces,
    /// restoring minimality
    fn shrink(&mut self) -> &mut Self {
        while self.places.len() > 1
            && self.places.last() == self.extension_place()
            && self.sign_bit() == sign_bit(self.places.get(self.places.len() - 2))
        {
            self.places.pop();
        }
        self
    }
    /// inflates to `new_len` places by materializing the sign extension
    fn resize_extended(&mut self, new_len: usize) {
        let fill = self.extension_place();
        self.places.resize(new_len, fill);
    }
    /// the stored length not counting a top place that only carries the sign
    ///
    /// for a non-negative value this is the length of the magnitude
    fn unsigned_size(&self) -> usize {
        std::cmp::max(
            1,
            self.places.len() - usize::from(self.places.last() == self.extension_place()),
        )
    }

    /// appends `carry` when given, then restores the sign bit to
    /// `expected_sign` by appending one extension place if an operation
    /// overflowed into it, and shrinks
    ///
    /// zero is left alone, its sign bit can never be set
    fn correct_sign_bit(&mut self, expected_sign: bool, carry: Option<Place>) -> &mut Self {
        if let Some(carry) = carry {
            self.places.push(carry);
        }
        if self.sign_bit() != expected_sign
            && !(expected_sign && self.places.iter().all(|place| place == 0))
        {
            self.places.push(places::extension(expected_sign));
        }
        self.shrink()
    }
    /// negates in place when the current sign differs from `sign`
    fn revert_sign(&mut self, sign: bool) -> &mut Self {
        if self.sign_bit() != sign {
            self.negate();
        }
        self
    }
    /// strips the sign and reports whether the value was negative
    fn make_absolute(&mut self) -> bool {
        let sign = self.sign_bit();
        self.revert_sign(false);
        sign
    }
    fn negate(&mut self) {
        math_algos::bit_math::not_assign(self);
        math_algos::add::assign(self, &Self::from(1));
    }

    /// applies `op` to every pair of places, with the shorter side of the
    /// pairing sign-extended
    fn place_wise(&mut self, rhs: &Self, op: impl Fn(Place, Place) -> Place) -> &mut Self {
        self.resize_extended(std::cmp::max(self.places.len(), rhs.places.len()));
        let rhs_fill = rhs.extension_place();
        for elem in self
            .places
            .as_mut_slice()
            .iter_mut()
            .zip_longest(rhs.places.iter())
        {
            use itertools::EitherOrBoth as E;
            let (place, rhs_place) = match elem {
                E::Right(_place) => unreachable!("lhs was inflated to the longer length"),
                E::Left(place) => (place, rhs_fill),
                E::Both(place, rhs_place) => (place, rhs_place),
            };
            *place = op(*place, rhs_place);
        }
        self.shrink()
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let sign = self.sign_bit();
        if sign != other.sign_bit() {
            return if sign {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            };
        }
        // with equal signs a longer magnitude decides, inverted when negative
        let size_order = self.unsigned_size().cmp(&other.unsigned_size());
        if size_order.is_ne() {
            return if sign { size_order.reverse() } else { size_order };
        }
        let magnitude = self.unsigned_size();
        for (place, other_place) in self.places.as_slice()[..magnitude]
            .iter()
            .zip(&other.places.as_slice()[..magnitude])
            .rev()
        {
            let order = place.cmp(other_place);
            if order.is_ne() {
                return order;
            }
        }
        std::cmp::Ordering::Equal
    }
}
impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for BigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut value = self.clone();
        let is_negative = value.make_absolute();
        let mut digits = Vec::new();
        while !value.is_zero() {
            let digit = math_algos::div::assign_place(&mut value, 10);
            digits.push(char::from(b'0' + digit as u8));
        }
        if digits.is_empty() {
            digits.push('0');
        }
        let buf = digits.iter().rev().collect::<String>();
        f.pad_integral(!is_negative, "", &buf)
    }
}
impl Debug for BigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use itertools::Position as P;
        write!(f, "BigInt {{ places: 0x[")?;
        for (position, place) in self.places.iter().rev().with_position() {
            write!(f, "{place:08x}")?;
            if matches!(position, P::First | P::Middle) {
                write!(f, ", ")?;
            }
        }
        write!(f, "] }}")
    }
}

impl Neg for BigInt {
    type Output = Self;
    fn neg(mut self) -> Self {
        self.negate();
        self
    }
}
impl Neg for &BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        -self.clone()
    }
}
impl Not for BigInt {
    type Output = Self;
    fn not(mut self) -> Self {
        math_algos::bit_math::not_assign(&mut self);
        self
    }
}
impl Not for &BigInt {
    type Output = BigInt;
    fn not(self) -> BigInt {
        !self.clone()
    }
}

impl AddAssign<&Self> for BigInt {
    fn add_assign(&mut self, rhs: &Self) {
        math_algos::add::assign(self, rhs);
    }
}
impl SubAssign<&Self> for BigInt {
    fn sub_assign(&mut self, rhs: &Self) {
        math_algos::add::assign(self, &-rhs);
    }
}
impl MulAssign<&Self> for BigInt {
    fn mul_assign(&mut self, rhs: &Self) {
        math_algos::mul::assign(self, rhs);
    }
}
impl DivAssign<&Self> for BigInt {
    fn div_assign(&mut self, rhs: &Self) {
        assert!(!rhs.is_zero(), "attempt to divide by zero");
        let _remainder = math_algos::div::assign_long(self, rhs);
    }
}
impl RemAssign<&Self> for BigInt {
    fn rem_assign(&mut self, rhs: &Self) {
        assert!(
            !rhs.is_zero(),
            "attempt to calculate the remainder with a divisor of zero"
        );
        let mut quotient = std::mem::take(self);
        *self = math_algos::div::assign_long(&mut quotient, rhs);
    }
}
impl BitAndAssign<&Self> for BigInt {
    fn bitand_assign(&mut self, rhs: &Self) {
        math_algos::bit_math::and_assign(self, rhs);
    }
}
impl BitOrAssign<&Self> for BigInt {
    fn bitor_assign(&mut self, rhs: &Self) {
        math_algos::bit_math::or_assign(self, rhs);
    }
}
impl BitXorAssign<&Self> for BigInt {
    fn bitxor_assign(&mut self, rhs: &Self) {
        math_algos::bit_math::xor_assign(self, rhs);
    }
}

/// increment in steps of native values
impl AddAssign<i32> for BigInt {
    fn add_assign(&mut self, rhs: i32) {
        *self += Self::from(rhs);
    }
}
/// decrement in steps of native values
impl SubAssign<i32> for BigInt {
    fn sub_assign(&mut self, rhs: i32) {
        *self -= Self::from(rhs);
    }
}

macro_rules! implBigMath {
    ($assign_trait:ident, $assign_func:ident, $trait:ident, $func:ident) => {
        impl $assign_trait for BigInt {
            fn $assign_func(&mut self, rhs: Self) {
                self.$assign_func(&rhs);
            }
        }
        impl $trait for BigInt {
            type Output = Self;
            fn $func(mut self, rhs: Self) -> Self {
                self.$assign_func(&rhs);
                self
            }
        }
        impl $trait<&Self> for BigInt {
            type Output = Self;
            fn $func(mut self, rhs: &Self) -> Self {
                self.$assign_func(rhs);
                self
            }
        }
        impl $trait<BigInt> for &BigInt {
            type Output = BigInt;
            fn $func(self, rhs: BigInt) -> BigInt {
                self.clone().$func(&rhs)
            }
        }
        impl $trait<Self> for &BigInt {
            type Output = BigInt;
            fn $func(self, rhs: Self) -> BigInt {
                self.clone().$func(rhs)
            }
        }
    };
}
implBigMath!(AddAssign, add_assign, Add, add);
implBigMath!(SubAssign, sub_assign, Sub, sub);
implBigMath!(MulAssign, mul_assign, Mul, mul);
implBigMath!(DivAssign, div_assign, Div, div);
implBigMath!(RemAssign, rem_assign, Rem, rem);
implBigMath!(BitAndAssign, bitand_assign, BitAnd, bitand);
implBigMath!(BitOrAssign, bitor_assign, BitOr, bitor);
implBigMath!(BitXorAssign, bitxor_assign, BitXor, bitxor);

impl ShlAssign<i32> for BigInt {
    fn shl_assign(&mut self, rhs: i32) {
        math_algos::shift::assign(self, rhs);
    }
}
impl ShrAssign<i32> for BigInt {
    /// arithmetic shift, the sign is kept
    fn shr_assign(&mut self, rhs: i32) {
        math_algos::shift::assign(self, -rhs);
    }
}
macro_rules! implBigShift {
    ($trait:ident, $func:ident, $assign_func:ident) => {
        impl $trait<i32> for BigInt {
            type Output = Self;
            fn $func(mut self, rhs: i32) -> Self {
                self.$assign_func(rhs);
                self
            }
        }
        impl $trait<i32> for &BigInt {
            type Output = BigInt;
            fn $func(self, rhs: i32) -> BigInt {
                self.clone().$func(rhs)
            }
        }
    };
}
implBigShift!(Shl, shl, shl_assign);
implBigShift!(Shr, shr, shr_assign);
