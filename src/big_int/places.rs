//! arithmetic on one or a few places, built from native 32/64-bit operations
//!
//! nothing here knows about sign extension or storage; these are the
//! fixed-width building blocks the multi-place algorithms are made of

/// one storage unit of a `BigInt`, in little-endian order
pub type Place = u32;

/// bit width of one place
pub const PLACE_BITS: i32 = Place::BITS as i32;

pub trait Carrying: Copy {
    /// `self` + `rhs` + `carry`, leaving the carry-out in `carry`
    fn addc(self, rhs: Self, carry: &mut bool) -> Self;
}
macro_rules! implCarrying {
    ($($uint:ty),*) => {$(
        impl Carrying for $uint {
            fn addc(self, rhs: Self, carry: &mut bool) -> Self {
                let (res, carry_1) = self.overflowing_add(rhs);
                let (res, carry_2) = res.overflowing_add(Self::from(*carry));
                *carry = carry_1 | carry_2;
                res
            }
        }
    )*};
}
implCarrying!(u16, u32, u64);

pub const fn sign_bit(place: Place) -> bool {
    place >> (Place::BITS - 1) != 0
}
/// the place sign extension repeats beyond the stored length
pub const fn extension(sign: bool) -> Place {
    if sign {
        Place::MAX
    } else {
        0
    }
}

pub const fn low_half(wide: u64) -> Place {
    wide as Place
}
pub const fn high_half(wide: u64) -> Place {
    (wide >> Place::BITS) as Place
}

/// `lhs` * `rhs` as (low, high)
pub fn mul_1_1(lhs: Place, rhs: Place) -> (Place, Place) {
    let wide = u64::from(lhs) * u64::from(rhs);
    (low_half(wide), high_half(wide))
}

/// `lhs` * `rhs` as (low, high), from four place-sized partial products
pub fn mul_2_2(lhs: u64, rhs: u64) -> (u64, u64) {
    let (lhs_low, lhs_high) = (u64::from(low_half(lhs)), u64::from(high_half(lhs)));
    let (rhs_low, rhs_high) = (u64::from(low_half(rhs)), u64::from(high_half(rhs)));

    let low = lhs_low * rhs_low;
    let mid_1 = lhs_high * rhs_low;
    let mid_2 = lhs_low * rhs_high;
    let high = lhs_high * rhs_high;

    // the two mid products overlap both result halves
    let mid_carry = high_half(
        u64::from(high_half(low)) + u64::from(low_half(mid_1)) + u64::from(low_half(mid_2)),
    );
    (
        low.wrapping_add(mid_1 << Place::BITS)
            .wrapping_add(mid_2 << Place::BITS),
        high + u64::from(high_half(mid_1)) + u64::from(high_half(mid_2)) + u64::from(mid_carry),
    )
}

/// divides `(high, low)` by a single place, as (quotient, remainder)
///
/// the quotient must fit one place, so `high` < `rhs` is required
pub fn div_2_1(low: Place, high: Place, rhs: Place) -> (Place, Place) {
    let lhs = (u64::from(high) << Place::BITS) | u64::from(low);
    (
        low_half(lhs / u64::from(rhs)),
        low_half(lhs % u64::from(rhs)),
    )
}

/// estimates `(high, mid, low)` / `(rhs_high, rhs_low)` one half-place digit
/// at a time, as (quotient, remainder)
///
/// `rhs_high` must have its top bit set. Each of the two digit estimates can
/// overshoot the true digit by one; the first overshoot leaves the running
/// remainder wrapped, so callers that normalize and divide place by place
/// must compare the estimate against the full value and decrement once.
/// When the quotient cannot fit one place, `(Place::MAX, 0)` is returned.
pub fn div_3_2(low: Place, mid: Place, high: Place, rhs_low: Place, rhs_high: Place) -> (Place, u64) {
    let mut rem_low = (u64::from(mid) << Place::BITS) | u64::from(low);
    let mut rem_high = high;
    let rhs = (u64::from(rhs_high) << Place::BITS) | u64::from(rhs_low);
    let top = u64::from(rhs_high);

    if get_3_halves(rem_low, rem_high, -1) / top != 0 {
        return (Place::MAX, 0);
    }

    let mut digit_1 = low_half(get_3_halves(rem_low, rem_high, 0) / top) as u16;
    let mut product = mul_2_2(rhs, u64::from(digit_1));
    if less_3_halves(
        rem_low,
        rem_high,
        product.0 << 16,
        low_half((product.1 << 16) | (product.0 >> 48)),
    ) {
        digit_1 -= 1;
        product = mul_2_2(rhs, u64::from(digit_1));
    }
    (rem_low, rem_high) = sub_5_halves(rem_low, rem_high, product.0, product.1 as u16, 0);

    let mut digit_0 = low_half(get_3_halves(rem_low, rem_high, 1) / top) as u16;
    product = mul_2_2(rhs, u64::from(digit_0));
    if less_3_halves(rem_low, rem_high, product.0, low_half(product.1)) {
        digit_0 -= 1;
        product = mul_2_2(rhs, u64::from(digit_0));
    }
    let (rem_low, _) = sub_5_halves(rem_low, rem_high, product.0, product.1 as u16, 1);

    (
        (Place::from(digit_1) << 16) | Place::from(digit_0),
        rem_low,
    )
}

/// `(lhs_high, lhs_low)` < `(rhs_high, rhs_low)` over 96 bits
fn less_3_halves(lhs_low: u64, lhs_high: Place, rhs_low: u64, rhs_high: Place) -> bool {
    lhs_high < rhs_high || (lhs_high == rhs_high && lhs_low < rhs_low)
}

/// the top three half-place digits of `(high, low)`, read `at` half-places
/// below the usual position
fn get_3_halves(low: u64, high: Place, at: i32) -> u64 {
    match at {
        -1 => u64::from(high),
        0 => (u64::from(high) << 16) | (low >> 48),
        1 => (u64::from(high << 16) << 16) | (low >> 32),
        _ => 0,
    }
}

/// subtracts the 80-bit `(rhs_high, rhs_low)`, shifted up one half-place when
/// `at` == 0, from the 96-bit `(lhs_high, lhs_low)`
fn sub_5_halves(
    lhs_low: u64,
    lhs_high: Place,
    rhs_low: u64,
    rhs_high: u16,
    at: i32,
) -> (u64, Place) {
    if at == 0 {
        // realign so the 64-bit subtraction stays place-sized
        let mut borrow = false;
        let mid = ((u64::from(lhs_high) & 0xFFFF) << 48) | (lhs_low >> 16);
        let mid = mid.addc(rhs_low.wrapping_neg(), &mut borrow);
        let top = ((lhs_high >> 16) as u16).wrapping_sub(u16::from(borrow));
        borrow = false;
        let top = top.addc(rhs_high.wrapping_neg(), &mut borrow);
        (
            (mid << 16) | (lhs_low & 0xFFFF),
            (Place::from(top) << 16) | low_half(mid >> 48),
        )
    } else {
        let mut borrow = false;
        let low = lhs_low.addc(rhs_low.wrapping_neg(), &mut borrow);
        let high = lhs_high.wrapping_sub(Place::from(borrow));
        borrow = false;
        (low, high.addc(Place::from(rhs_high).wrapping_neg(), &mut borrow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrying_add() {
        let mut carry = false;
        assert_eq!(u32::MAX.addc(0, &mut carry), u32::MAX);
        assert!(!carry);
        assert_eq!(u32::MAX.addc(1, &mut carry), 0);
        assert!(carry);
        assert_eq!(5u32.addc(7, &mut carry), 13);
        assert!(!carry);
    }

    #[test]
    fn split_halves() {
        assert_eq!(low_half(0x8899_aabb_ccdd_eeff), 0xccdd_eeff);
        assert_eq!(high_half(0x8899_aabb_ccdd_eeff), 0x8899_aabb);
    }

    #[test]
    fn mul_one_place() {
        assert_eq!(mul_1_1(3, 5), (15, 0));
        assert_eq!(mul_1_1(u32::MAX, u32::MAX), (1, 0xffff_fffe));
    }

    #[test]
    fn mul_two_places() {
        assert_eq!(mul_2_2(3, 5), (15, 0));
        assert_eq!(
            mul_2_2(0xfedc_ba98_7654_3210, 0x0f0e_0d0c_0b0a_0908),
            (0x0fdc_971d_4d04_2080, 0x0efc_ebfe_5615_5e53)
        );
        assert_eq!(mul_2_2(u64::MAX, u64::MAX), (1, 0xffff_ffff_ffff_fffe));
    }

    #[test]
    fn div_one_place() {
        assert_eq!(div_2_1(0x3322_1100, 0x0000_0001, 0x1234_5678), (0x10, 0x0fdc_a980));
        assert_eq!(div_2_1(0x0000_0005, 0x0000_0001, 7), (613_566_757, 2));
    }

    #[test]
    fn div_two_places_exact() {
        assert_eq!(div_3_2(0, 0, 1, 0, 0x8000_0000), (2, 0));
        assert_eq!(
            div_3_2(0x1122_3344, 0x9abc_def0, 0x1234_5678, 0xcafe_babe, 0xdead_beef),
            (0x14ed_b427, 0x0429_5943_4f20_2852)
        );
    }

    #[test]
    fn div_two_places_overflow() {
        assert_eq!(
            div_3_2(0, 0, 0x8000_0000, 0, 0x8000_0000),
            (Place::MAX, 0)
        );
    }

    #[test]
    fn div_two_places_overshoots_at_most_one() {
        let (lhs, rhs) = (0x7cf8_e51a_17a8_4ee0_b644_6ca7u128, 0xb508_3a33_af21_46ccu64);
        let estimate = div_3_2(
            0xb644_6ca7,
            0x17a8_4ee0,
            0x7cf8_e51a,
            low_half(rhs),
            high_half(rhs),
        )
        .0;
        assert_eq!(u128::from(estimate), lhs / u128::from(rhs) + 1);
    }
}
