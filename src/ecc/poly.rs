use super::galois::GaloisField;
use crate::error::{CodecError, Result};

/// Polynomial over a Galois field, coefficients stored highest degree first.
///
/// Leading zero coefficients are stripped on construction, so the zero
/// polynomial is the single coefficient `[0]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GfPoly<'f> {
    field: &'f GaloisField,
    coefficients: Vec<u16>,
}

impl<'f> GfPoly<'f> {
    pub fn new(field: &'f GaloisField, coefficients: &[u16]) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(CodecError::InvalidArgument(
                "polynomial needs at least one coefficient".into(),
            ));
        }
        Ok(Self::from_vec(field, coefficients.to_vec()))
    }

    fn from_vec(field: &'f GaloisField, mut coefficients: Vec<u16>) -> Self {
        if coefficients.len() > 1 && coefficients[0] == 0 {
            let first_non_zero = coefficients
                .iter()
                .position(|&c| c != 0)
                .unwrap_or(coefficients.len());
            if first_non_zero == coefficients.len() {
                coefficients = vec![0];
            } else {
                coefficients.drain(..first_non_zero);
            }
        }
        Self {
            field,
            coefficients,
        }
    }

    pub fn zero(field: &'f GaloisField) -> Self {
        Self {
            field,
            coefficients: vec![0],
        }
    }

    pub fn one(field: &'f GaloisField) -> Self {
        Self {
            field,
            coefficients: vec![1],
        }
    }

    /// `coefficient * x^degree`
    pub fn monomial(field: &'f GaloisField, degree: usize, coefficient: u16) -> Self {
        if coefficient == 0 {
            return Self::zero(field);
        }
        let mut coefficients = vec![0u16; degree + 1];
        coefficients[0] = coefficient;
        Self {
            field,
            coefficients,
        }
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    pub fn coefficients(&self) -> &[u16] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of `x^degree`.
    pub fn coefficient(&self, degree: usize) -> u16 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn evaluate_at(&self, a: u16) -> u16 {
        if a == 0 {
            return self.coefficient(0);
        }
        if a == 1 {
            return self
                .coefficients
                .iter()
                .fold(0, |acc, &c| GaloisField::add(acc, c));
        }
        // Horner
        self.coefficients
            .iter()
            .skip(1)
            .fold(self.coefficients[0], |acc, &c| {
                GaloisField::add(self.field.multiply(a, acc), c)
            })
    }

    pub fn add_or_subtract(&self, other: &GfPoly<'f>) -> GfPoly<'f> {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let diff = larger.len() - smaller.len();
        let mut sum = larger[..diff].to_vec();
        sum.extend(
            larger[diff..]
                .iter()
                .zip(smaller.iter())
                .map(|(&a, &b)| GaloisField::add(a, b)),
        );
        Self::from_vec(self.field, sum)
    }

    pub fn multiply(&self, other: &GfPoly<'f>) -> GfPoly<'f> {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.field);
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u16; a.len() + b.len() - 1];
        for (i, &ac) in a.iter().enumerate() {
            for (j, &bc) in b.iter().enumerate() {
                product[i + j] = GaloisField::add(product[i + j], self.field.multiply(ac, bc));
            }
        }
        Self::from_vec(self.field, product)
    }

    pub fn multiply_scalar(&self, scalar: u16) -> GfPoly<'f> {
        match scalar {
            0 => Self::zero(self.field),
            1 => self.clone(),
            _ => Self::from_vec(
                self.field,
                self.coefficients
                    .iter()
                    .map(|&c| self.field.multiply(c, scalar))
                    .collect(),
            ),
        }
    }

    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u16) -> GfPoly<'f> {
        if coefficient == 0 {
            return Self::zero(self.field);
        }
        let mut product: Vec<u16> = self
            .coefficients
            .iter()
            .map(|&c| self.field.multiply(c, coefficient))
            .collect();
        product.resize(self.coefficients.len() + degree, 0);
        Self::from_vec(self.field, product)
    }

    /// Long division returning `(quotient, remainder)`.
    pub fn divide(&self, other: &GfPoly<'f>) -> Result<(GfPoly<'f>, GfPoly<'f>)> {
        if other.is_zero() {
            return Err(CodecError::DivisionByZero);
        }
        let mut quotient = Self::zero(self.field);
        let mut remainder = self.clone();

        let denominator_leading = other.coefficient(other.degree());
        let inverse_leading = self.field.inverse(denominator_leading)?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_difference = remainder.degree() - other.degree();
            let scale = self
                .field
                .multiply(remainder.coefficient(remainder.degree()), inverse_leading);
            let term = other.multiply_by_monomial(degree_difference, scale);
            let iteration_quotient = Self::monomial(self.field, degree_difference, scale);
            quotient = quotient.add_or_subtract(&iteration_quotient);
            remainder = remainder.add_or_subtract(&term);
        }

        Ok((quotient, remainder))
    }
}
