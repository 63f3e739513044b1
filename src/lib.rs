#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod poly;

pub use crate::{
    error::PolynomialError,
    poly::{
        coefficient::Coefficient,
        polynomial::{Polynomial, Term},
    },
};
use ark_ff::fields::{Fp64, MontBackend, MontConfig};
use num_rational::Ratio;

#[derive(MontConfig)]
#[modulus = "18446744073709551557"]
#[generator = "2"]
pub struct FqConfig18446744073709551557;

pub type GF = Fp64<MontBackend<FqConfig18446744073709551557, 1>>;

pub type GFPolynomial = Polynomial<GF>;
pub type RealPolynomial = Polynomial<f64>;
pub type RationalPolynomial = Polynomial<Ratio<i64>>;

#[cfg(test)]
#[allow(clippy::all)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};

    #[test]
    fn test_div_mod_polys() {
        // (x^5 + x) = (x^2 - 1) * (x^3 + x) + 2x
        let f: GFPolynomial = Polynomial::from_terms(&[(5, 1.into()), (1, 1.into())]);
        let g: GFPolynomial = Polynomial::from_terms(&[(2, 1.into()), (0, (-1).into())]);

        let (q, r) = f.div_rem(&g).unwrap();

        assert_eq!(q, Polynomial::from_terms(&[(3, 1.into()), (1, 1.into())]));
        assert_eq!(r, Polynomial::monomial(GF::from(2), 1));
        assert_eq!(&(&q * &g) + &r, f);
    }

    #[test]
    fn test_long_division_scenario() {
        // (x^2 + 5x + 6) / (x + 2) = x + 3
        let f: RealPolynomial = Polynomial::new(&[6.0, 5.0, 1.0]);
        let g: RealPolynomial = Polynomial::new(&[2.0, 1.0]);
        let (q, r) = f.div_rem(&g).unwrap();
        assert_eq!(q, Polynomial::new(&[3.0, 1.0]));
        assert!(r.is_zero());
        assert_eq!(q.to_string(), "x+3");
    }

    #[test]
    fn test_gcd_over_fields() {
        let a: RationalPolynomial = [-2, 0, 1].iter().map(|&c| Ratio::from_integer(c)).collect();
        let b: RationalPolynomial = [-1, 0, 1].iter().map(|&c| Ratio::from_integer(c)).collect();
        assert!(a.gcd(&b).eq_scalar(&Ratio::one()));

        let a: GFPolynomial = Polynomial::new(&[(-2).into(), 0.into(), 1.into()]);
        let b: GFPolynomial = Polynomial::new(&[(-1).into(), 0.into(), 1.into()]);
        assert!(a.gcd(&b).eq_scalar(&GF::one()));

        let a: RealPolynomial = Polynomial::new(&[-2.0, 0.0, 1.0]);
        let b: RealPolynomial = Polynomial::new(&[-1.0, 0.0, 1.0]);
        assert_eq!(a.gcd(&b), Polynomial::constant(1.0));
    }

    #[test]
    fn test_division_by_zero() {
        let f: GFPolynomial = Polynomial::new(&[1.into(), 1.into()]);
        assert_eq!(
            f.div_rem(&GFPolynomial::zero()),
            Err(PolynomialError::DivisionByZero)
        );
        assert_eq!(
            PolynomialError::DivisionByZero.to_string(),
            "Division by zero polynomial"
        );
    }
}
