#![allow(clippy::wildcard_imports)]
use super::*;
use super::{
    places::{Carrying, Place, PLACE_BITS},
    storage::PlaceBuf,
};
use itertools::Itertools;

pub mod bit_math {
    use super::*;

    /// flips every place; minimality survives because the flip maps
    /// extension places onto extension places of the opposite sign
    pub fn not_assign(lhs: &mut BigInt) {
        for place in lhs.places.as_mut_slice() {
            *place = !*place;
        }
    }
    pub fn and_assign(lhs: &mut BigInt, rhs: &BigInt) {
        lhs.place_wise(rhs, std::ops::BitAnd::bitand);
    }
    pub fn or_assign(lhs: &mut BigInt, rhs: &BigInt) {
        lhs.place_wise(rhs, std::ops::BitOr::bitor);
    }
    pub fn xor_assign(lhs: &mut BigInt, rhs: &BigInt) {
        lhs.place_wise(rhs, std::ops::BitXor::bitxor);
    }
}

pub mod add {
    use super::*;

    /// calculates `lhs` += `rhs` in one carry chain, signs included
    pub fn assign(lhs: &mut BigInt, rhs: &BigInt) {
        let lhs_sign = lhs.sign_bit();
        let rhs_sign = rhs.sign_bit();
        // equal signs can carry past the top place, so the chain gets one
        // extension place of headroom; opposite signs can never overflow
        let max_len = std::cmp::max(lhs.places.len(), rhs.places.len());
        lhs.resize_extended(max_len + usize::from(lhs_sign == rhs_sign));
        let rhs_fill = rhs.extension_place();

        let mut carry = false;
        for elem in lhs
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
            *place = place.addc(rhs_place, &mut carry);
        }
        lhs.shrink();
    }
}

pub mod mul {
    use super::*;

    /// calculates `lhs` *= `rhs`, with `rhs` read as an unsigned place
    pub fn assign_place(lhs: &mut BigInt, rhs: Place) {
        let sign = lhs.make_absolute();
        let mut carry: Place = 0;
        for place in lhs.places.as_mut_slice() {
            let (low, high) = places::mul_1_1(*place, rhs);
            let mut overflow = false;
            *place = low.addc(carry, &mut overflow);
            carry = high.addc(0, &mut overflow);
        }
        lhs.correct_sign_bit(false, (carry != 0).then_some(carry));
        lhs.revert_sign(sign);
    }

    /// calculates `lhs` *= `rhs` as the sum of shifted place products
    pub fn assign(lhs: &mut BigInt, rhs: &BigInt) {
        if lhs.is_zero() {
            return;
        }
        if rhs.is_zero() {
            *lhs = BigInt::default();
            return;
        }
        let sign = lhs.make_absolute() != rhs.sign_bit();
        let mut right = rhs.clone();
        right.make_absolute();

        let mut sum = BigInt::default();
        for (offset, place) in right.places.iter().enumerate() {
            let mut part = lhs.clone();
            assign_place(&mut part, place);
            shift::assign(&mut part, (offset as i32) * PLACE_BITS);
            sum += part;
        }
        sum.revert_sign(sign);
        *lhs = sum;
    }
}

pub mod div {
    use super::*;

    /// calculates `lhs` /= `rhs` with `rhs` read as a nonzero unsigned place,
    /// returning the remainder; `lhs` must be non-negative
    pub fn assign_place(lhs: &mut BigInt, rhs: Place) -> Place {
        let mut rem = 0;
        for place in lhs.places.as_mut_slice().iter_mut().rev() {
            (*place, rem) = places::div_2_1(*place, rem, rhs);
        }
        lhs.shrink();
        rem
    }

    /// schoolbook long division in base 2^32
    ///
    /// `lhs` becomes the quotient and the remainder is returned. Signs follow
    /// the native operators: the quotient rounds towards zero and the
    /// remainder keeps the sign of the dividend. `rhs` must be nonzero.
    pub fn assign_long(lhs: &mut BigInt, rhs: &BigInt) -> BigInt {
        let lhs_sign = lhs.make_absolute();
        let quotient_sign = lhs_sign != rhs.sign_bit();
        let mut right = rhs.clone();
        right.make_absolute();

        let n = lhs.unsigned_size();
        let m = right.unsigned_size();

        let mut rem;
        if m == 1 {
            rem = BigInt::from_place(assign_place(lhs, right.places.get(0)));
        } else if m > n {
            rem = std::mem::take(lhs);
        } else {
            rem = std::mem::take(lhs);

            // normalize so the divisor's top place has its high bit set
            let top = right.places.get(m - 1);
            let factor = if top == Place::MAX {
                1
            } else {
                places::div_2_1(0, 1, top + 1).0
            };
            mul::assign_place(&mut rem, factor);
            mul::assign_place(&mut right, factor);
            let (rhs_low, rhs_high) = (right.places.get(m - 2), right.places.get(m - 1));

            let mut quotient = vec![0; n - m + 1];
            for k in (0..=n - m).rev() {
                let window = rem.places.as_slice();
                let estimate = places::div_3_2(
                    window.get(k + m - 2).copied().unwrap_or(0),
                    window.get(k + m - 1).copied().unwrap_or(0),
                    window.get(k + m).copied().unwrap_or(0),
                    rhs_low,
                    rhs_high,
                )
                .0;
                let (digit, product) = correct_estimate(&rem, &right, estimate, k);
                quotient[k] = digit;
                rem -= product;
            }
            assign_place(&mut rem, factor);
            lhs.places = PlaceBuf::from_vec(quotient);
            lhs.correct_sign_bit(false, None);
        }
        rem.revert_sign(lhs_sign);
        lhs.revert_sign(quotient_sign);
        rem
    }

    /// checks one trial digit against the running remainder; the estimate
    /// overshoots by at most one, so a single decrement settles it
    fn correct_estimate(
        rem: &BigInt,
        right: &BigInt,
        estimate: Place,
        offset: usize,
    ) -> (Place, BigInt) {
        let product = shifted_product(right, estimate, offset);
        if rem < &product {
            let digit = estimate - 1;
            (digit, shifted_product(right, digit, offset))
        } else {
            (estimate, product)
        }
    }
    fn shifted_product(right: &BigInt, digit: Place, offset: usize) -> BigInt {
        let mut product = right.clone();
        mul::assign_place(&mut product, digit);
        shift::assign(&mut product, (offset as i32) * PLACE_BITS);
        product
    }
}

pub mod shift {
    use super::*;

    /// calculates `lhs` <<= `rhs`, where a negative `rhs` shifts right
    /// arithmetically
    pub fn assign(lhs: &mut BigInt, rhs: i32) {
        let sign = lhs.sign_bit();
        let mut place_shift = (rhs / PLACE_BITS) as isize;
        let mut bits = rhs % PLACE_BITS;
        if rhs < 0 && bits != 0 {
            place_shift -= 1;
            bits += PLACE_BITS;
        }

        let len = lhs.places.len() as isize;
        let end = len + place_shift + isize::from(bits > 0);
        let fill = lhs.get_extended(if rhs < 0 { len } else { -1 });
        let mut new_places = vec![fill; end.max(1) as usize];
        for at in place_shift.max(0)..end {
            new_places[at as usize] = if bits == 0 {
                lhs.places.get((at - place_shift) as usize)
            } else {
                // a full-place shift is not defined on the place type itself
                let high = lhs.get_extended(at - place_shift);
                let low = lhs.get_extended(at - place_shift - 1);
                (high << bits) | (low >> (PLACE_BITS - bits))
            };
        }
        lhs.places = PlaceBuf::from_vec(new_places);
        lhs.correct_sign_bit(sign, None);
    }
}
