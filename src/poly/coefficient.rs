use ark_ff::{Field, Fp, FpConfig, One, Zero};
use num_rational::Ratio;
use std::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign},
};

/// Capability set a polynomial coefficient has to provide: ring operations,
/// division, a test against zero and exponentiation by a non-negative integer.
pub trait Coefficient:
    Sized
    + Clone
    + Debug
    + Display
    + PartialEq
    + Zero
    + One
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    /// `self^exp` by square and multiply.
    fn power(&self, exp: usize) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = exp;
        while exp > 0 {
            if exp & 1 == 1 {
                result *= base.clone();
            }
            exp >>= 1;
            if exp > 0 {
                base *= base.clone();
            }
        }
        result
    }

    /// Whether the value renders with a leading minus sign.
    fn is_negative(&self) -> bool {
        false
    }
}

macro_rules! impl_float_coefficient {
    ($($t:ty),*) => {
        $(
            impl Coefficient for $t {
                fn power(&self, exp: usize) -> Self {
                    match i32::try_from(exp) {
                        Ok(exp) => self.powi(exp),
                        Err(_) => self.powf(exp as $t),
                    }
                }

                fn is_negative(&self) -> bool {
                    *self < 0.0
                }
            }
        )*
    };
}

impl_float_coefficient!(f32, f64);

macro_rules! impl_ratio_coefficient {
    ($($t:ty),*) => {
        $(
            impl Coefficient for Ratio<$t> {
                fn is_negative(&self) -> bool {
                    *self < Self::zero()
                }
            }
        )*
    };
}

impl_ratio_coefficient!(i32, i64, i128);

/// Prime field elements are never negative; they render as their canonical
/// representative.
impl<P: FpConfig<N>, const N: usize> Coefficient for Fp<P, N> {
    fn power(&self, exp: usize) -> Self {
        Field::pow(self, [exp as u64])
    }
}
