use ark_ff::{One, Zero};
use derivative::Derivative;
use rayon::prelude::*;
use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, BitAnd, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign},
    slice,
    vec::Vec,
};

use crate::{error::PolynomialError, poly::coefficient::Coefficient};

/// A single `coeff * x^degree` term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term<T> {
    pub degree: usize,
    pub coeff: T,
}

impl<T> Term<T> {
    pub fn new(degree: usize, coeff: T) -> Self {
        Self { degree, coeff }
    }
}

/// Stores a sparse univariate polynomial in coefficient form.
///
/// Terms are kept strictly ascending by degree and never carry a zero
/// coefficient, so the empty term list is the zero polynomial.
#[derive(Derivative)]
#[derivative(Clone, PartialEq, Eq, Hash, Default(bound = ""))]
pub struct Polynomial<T> {
    pub(crate) terms: Vec<Term<T>>,
}

impl<T: Coefficient> Polynomial<T> {
    /// Builds a polynomial from dense coefficients, `coeffs[i]` being the
    /// coefficient of `x^i`.
    pub fn new(coeffs: &[T]) -> Self {
        coeffs.iter().cloned().collect()
    }

    /// The constant polynomial `coeff`, or zero if `coeff` is zero.
    pub fn constant(coeff: T) -> Self {
        Self::monomial(coeff, 0)
    }

    pub fn monomial(coeff: T, degree: usize) -> Self {
        if coeff.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![Term::new(degree, coeff)],
            }
        }
    }

    /// Builds a polynomial from `(degree, coeff)` pairs in any order.
    /// Coefficients sharing a degree are summed.
    pub fn from_terms(terms: &[(usize, T)]) -> Self {
        let mut terms = terms.to_vec();
        terms.sort_by(|(d1, _), (d2, _)| d1.cmp(d2));
        let mut terms_dedup: Vec<Term<T>> = Vec::new();
        for (degree, coeff) in terms {
            if let Some(prev) = terms_dedup.last_mut() {
                if prev.degree == degree {
                    prev.coeff += coeff;
                    continue;
                }
            };
            terms_dedup.push(Term::new(degree, coeff));
        }
        terms_dedup.retain(|term| !term.coeff.is_zero());

        Self { terms: terms_dedup }
    }

    pub fn terms(&self) -> &[Term<T>] {
        self.terms.as_slice()
    }

    pub fn iter(&self) -> slice::Iter<'_, Term<T>> {
        self.terms.iter()
    }

    /// Degree of the highest term, `-1` for the zero polynomial.
    pub fn degree(&self) -> i64 {
        self.terms
            .last()
            .map(|term| term.degree as i64)
            .unwrap_or(-1)
    }

    pub fn leading_term(&self) -> Option<&Term<T>> {
        self.terms.last()
    }

    pub fn leading_coefficient(&self) -> Option<T> {
        self.leading_term().map(|term| term.coeff.clone())
    }

    pub fn coefficient_at(&self, power: usize) -> T {
        if power as i64 > self.degree() {
            return T::zero();
        }
        self.terms
            .iter()
            .find(|term| term.degree == power)
            .map(|term| term.coeff.clone())
            .unwrap_or_else(T::zero)
    }

    /// Dense coefficients from degree 0 up to the degree; empty for zero.
    pub fn to_coefficients(&self) -> Vec<T> {
        let mut dense = vec![T::zero(); (self.degree() + 1) as usize];
        for term in &self.terms {
            dense[term.degree] = term.coeff.clone();
        }
        dense
    }

    /// Compares against a bare scalar: only constants and zero can match.
    pub fn eq_scalar(&self, scalar: &T) -> bool {
        match self.terms.as_slice() {
            [] => scalar.is_zero(),
            [Term { degree: 0, coeff }] => coeff == scalar,
            _ => false,
        }
    }

    /// Sums `coeff * x^degree` over all terms.
    pub fn evaluate_at(&self, x: &T) -> T {
        self.terms.iter().fold(T::zero(), |acc, term| {
            acc + term.coeff.clone() * x.power(term.degree)
        })
    }

    pub fn evaluate_many(&self, xs: &[T]) -> Vec<T> {
        xs.par_iter().map(|x| self.evaluate_at(x)).collect()
    }

    pub fn scale(&self, factor: &T) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|term| (term.degree, term.coeff.clone() * factor.clone()))
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(degree, coeff)| Term::new(degree, coeff))
            .collect::<Vec<_>>();
        Self { terms }
    }

    /// Divides every coefficient by the leading one. Zero stays zero.
    pub fn monic(&self) -> Self {
        match self.leading_coefficient() {
            None => Self::zero(),
            Some(lead) => Self {
                terms: self
                    .terms
                    .iter()
                    .map(|term| Term::new(term.degree, term.coeff.clone() / lead.clone()))
                    .collect(),
            },
        }
    }

    /// Long division, returning `(quotient, remainder)`.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), PolynomialError> {
        let lead = divisor
            .leading_term()
            .ok_or(PolynomialError::DivisionByZero)?;
        Ok(self.divide_by(divisor, lead))
    }

    pub fn checked_div(&self, divisor: &Self) -> Result<Self, PolynomialError> {
        self.div_rem(divisor).map(|(quotient, _)| quotient)
    }

    pub fn checked_rem(&self, divisor: &Self) -> Result<Self, PolynomialError> {
        self.div_rem(divisor).map(|(_, remainder)| remainder)
    }

    /// Division by a non-zero divisor whose leading term is `lead`.
    ///
    /// The working dividend lives in a dense buffer indexed by degree; each
    /// step clears its top slot, so the working degree strictly decreases.
    fn divide_by(&self, divisor: &Self, lead: &Term<T>) -> (Self, Self) {
        if self.degree() < divisor.degree() {
            return (Self::zero(), self.clone());
        }

        let shift = lead.degree;
        let lower_terms = &divisor.terms[..divisor.terms.len() - 1];
        let mut remainder = self.to_coefficients();
        let mut quotient = vec![T::zero(); remainder.len() - shift];

        for k in (0..quotient.len()).rev() {
            let top = remainder[k + shift].clone();
            if top.is_zero() {
                continue;
            }
            let q = top / lead.coeff.clone();
            for term in lower_terms {
                remainder[k + term.degree] -= q.clone() * term.coeff.clone();
            }
            remainder[k + shift] = T::zero();
            quotient[k] = q;
        }
        remainder.truncate(shift);

        (quotient.into_iter().collect(), remainder.into_iter().collect())
    }

    /// Euclidean GCD, normalized to a monic polynomial.
    /// `gcd(0, 0)` is the zero polynomial.
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while let Some(lead) = a.leading_term().cloned() {
            let (_, remainder) = b.divide_by(&a, &lead);
            b = a;
            a = remainder;
        }
        b.monic()
    }

    /// GCD of every polynomial in `polys`, zero for an empty slice.
    pub fn gcd_all(polys: &[Self]) -> Self {
        polys
            .par_iter()
            .cloned()
            .reduce(Self::zero, |a, b| a.gcd(&b))
    }

    /// Substitutes `inner` for the variable, i.e. computes `self(inner)`.
    pub fn compose(&self, inner: &Self) -> Self {
        let mut result = Self::zero();
        for coeff in self.to_coefficients().into_iter().rev() {
            result *= inner;
            result += &Self::constant(coeff);
        }
        result
    }

    /// Ordered merge of two term lists. `combine` folds a matching
    /// coefficient of `other` into ours, `lift` maps a term only present in
    /// `other`.
    fn merge_with<C, L>(&mut self, other: &Self, combine: C, lift: L)
    where
        C: Fn(&mut T, T),
        L: Fn(T) -> T,
    {
        let mut merged = Vec::with_capacity(self.terms.len() + other.terms.len());
        let mut lhs = std::mem::take(&mut self.terms).into_iter().peekable();
        let mut rhs = other.terms.iter().peekable();

        loop {
            let which = match (lhs.peek(), rhs.peek()) {
                (Some(cur), Some(other)) => Some(cur.degree.cmp(&other.degree)),
                (Some(_), None) => Some(Ordering::Less),
                (None, Some(_)) => Some(Ordering::Greater),
                (None, None) => None,
            };

            match which {
                Some(Ordering::Less) => merged.extend(lhs.next()),
                Some(Ordering::Equal) => {
                    if let (Some(mut cur), Some(other)) = (lhs.next(), rhs.next()) {
                        combine(&mut cur.coeff, other.coeff.clone());
                        if !cur.coeff.is_zero() {
                            merged.push(cur);
                        }
                    }
                },
                Some(Ordering::Greater) => {
                    if let Some(other) = rhs.next() {
                        merged.push(Term::new(other.degree, lift(other.coeff.clone())));
                    }
                },
                None => break,
            }
        }

        self.terms = merged;
    }
}

impl<T: Coefficient> From<Vec<Term<T>>> for Polynomial<T> {
    /// Terms may come in any order; they are sorted, merged by degree and
    /// stripped of zero coefficients.
    fn from(terms: Vec<Term<T>>) -> Self {
        let pairs: Vec<(usize, T)> = terms
            .into_iter()
            .map(|term| (term.degree, term.coeff))
            .collect();
        Self::from_terms(&pairs)
    }
}

impl<T: Coefficient> FromIterator<T> for Polynomial<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            terms: iter
                .into_iter()
                .enumerate()
                .filter(|(_, coeff)| !coeff.is_zero())
                .map(|(degree, coeff)| Term::new(degree, coeff))
                .collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Polynomial<T> {
    type Item = &'a Term<T>;
    type IntoIter = slice::Iter<'a, Term<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl<T: Coefficient> Zero for Polynomial<T> {
    /// Returns the zero polynomial.
    fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// Checks if the given polynomial is zero.
    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<T: Coefficient> Neg for Polynomial<T> {
    type Output = Self;

    #[inline]
    fn neg(mut self) -> Self::Output {
        for term in &mut self.terms {
            term.coeff = -term.coeff.clone();
        }
        self
    }
}

impl<'a, T: Coefficient> Neg for &'a Polynomial<T> {
    type Output = Polynomial<T>;

    fn neg(self) -> Self::Output {
        self.clone().neg()
    }
}

impl<T: Coefficient> fmt::Debug for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.terms.iter().map(|term| (term.degree, &term.coeff)))
            .finish()
    }
}

impl<T: Coefficient> fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first_written = false;
        for term in self.terms.iter().rev().filter(|term| !term.coeff.is_zero()) {
            let magnitude = if term.coeff.is_negative() {
                write!(f, "-")?;
                -term.coeff.clone()
            } else {
                if first_written {
                    write!(f, "+")?;
                }
                term.coeff.clone()
            };

            if term.degree == 0 || !magnitude.is_one() {
                write!(f, "{}", magnitude)?;
                if term.degree > 0 {
                    write!(f, "*")?;
                }
            }

            match term.degree.cmp(&1) {
                Ordering::Less => {},
                Ordering::Equal => write!(f, "x")?,
                Ordering::Greater => write!(f, "x^{}", term.degree)?,
            }
            first_written = true;
        }
        Ok(())
    }
}

impl<'a, T: Coefficient> AddAssign<&'a Self> for Polynomial<T> {
    fn add_assign(&mut self, other: &'a Self) {
        self.merge_with(other, |cur, other| *cur += other, |other| other);
    }
}

impl<'a, T: Coefficient> SubAssign<&'a Self> for Polynomial<T> {
    fn sub_assign(&mut self, other: &'a Self) {
        self.merge_with(other, |cur, other| *cur -= other, |other| -other);
    }
}

impl<'a, T: Coefficient> MulAssign<&'a Self> for Polynomial<T> {
    fn mul_assign(&mut self, other: &'a Self) {
        if self.is_zero() || other.is_zero() {
            self.terms.clear();
            return;
        }

        let size = (self.degree() + other.degree() + 1) as usize;
        let mut product = vec![T::zero(); size];
        for lhs in &self.terms {
            for rhs in &other.terms {
                product[lhs.degree + rhs.degree] += lhs.coeff.clone() * rhs.coeff.clone();
            }
        }
        *self = product.into_iter().collect();
    }
}

impl<'a, T: Coefficient> AddAssign<&'a Term<T>> for Polynomial<T> {
    fn add_assign(&mut self, rhs: &'a Term<T>) {
        if !rhs.coeff.is_zero() {
            match self.terms.binary_search_by(|term| term.degree.cmp(&rhs.degree)) {
                Ok(i) => {
                    self.terms[i].coeff += rhs.coeff.clone();
                    if self.terms[i].coeff.is_zero() {
                        self.terms.remove(i);
                    }
                },
                Err(i) => self.terms.insert(i, rhs.clone()),
            }
        }
    }
}

impl<'a, T: Coefficient> SubAssign<&'a Term<T>> for Polynomial<T> {
    fn sub_assign(&mut self, rhs: &'a Term<T>) {
        self.add_assign(&Term::new(rhs.degree, -rhs.coeff.clone()));
    }
}

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $assign_method:ident) => {
        impl<T: Coefficient> $op for Polynomial<T> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                let mut result = self;
                result.$assign_method(&rhs);
                result
            }
        }

        impl<'a, T: Coefficient> $op<&'a Self> for Polynomial<T> {
            type Output = Self;

            fn $method(self, rhs: &'a Self) -> Self::Output {
                let mut result = self;
                result.$assign_method(rhs);
                result
            }
        }

        impl<'a, 'b, T: Coefficient> $op<&'a Polynomial<T>> for &'b Polynomial<T> {
            type Output = Polynomial<T>;

            fn $method(self, rhs: &'a Polynomial<T>) -> Self::Output {
                let mut result = self.clone();
                result.$assign_method(rhs);
                result
            }
        }
    };
}

impl_binary_op!(Add, add, add_assign);
impl_binary_op!(Sub, sub, sub_assign);
impl_binary_op!(Mul, mul, mul_assign);

impl<'a, 'b, T: Coefficient> Div<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Result<Polynomial<T>, PolynomialError>;

    fn div(self, rhs: &'a Polynomial<T>) -> Self::Output {
        self.checked_div(rhs)
    }
}

impl<'a, T: Coefficient> Div<&'a Self> for Polynomial<T> {
    type Output = Result<Self, PolynomialError>;

    fn div(self, rhs: &'a Self) -> Self::Output {
        (&self).div(rhs)
    }
}

impl<'a, 'b, T: Coefficient> Rem<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Result<Polynomial<T>, PolynomialError>;

    fn rem(self, rhs: &'a Polynomial<T>) -> Self::Output {
        self.checked_rem(rhs)
    }
}

impl<'a, T: Coefficient> Rem<&'a Self> for Polynomial<T> {
    type Output = Result<Self, PolynomialError>;

    fn rem(self, rhs: &'a Self) -> Self::Output {
        (&self).rem(rhs)
    }
}

/// `f & g` is the composition `f(g)`.
impl<'a, 'b, T: Coefficient> BitAnd<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    fn bitand(self, rhs: &'a Polynomial<T>) -> Self::Output {
        self.compose(rhs)
    }
}

impl<'a, T: Coefficient> BitAnd<&'a Self> for Polynomial<T> {
    type Output = Self;

    fn bitand(self, rhs: &'a Self) -> Self::Output {
        self.compose(rhs)
    }
}
