//! Reed-Solomon error correction over any [`GaloisField`].
//!
//! Codewords are `u16` so the same code serves 4-bit through 12-bit fields.
//! The encoder appends `ec_count` check symbols; the decoder uses the
//! Euclidean algorithm to find the error locator, a Chien search for its
//! roots and Forney's formula for the magnitudes.

use std::sync::{OnceLock, RwLock};

use tracing::trace;

use super::galois::GaloisField;
use super::poly::GfPoly;
use crate::error::{CodecError, Result};

/// Reed-Solomon encoder with a per-field cache of generator polynomials.
pub struct ReedSolomonEncoder<'f> {
    field: &'f GaloisField,
    cached_generators: RwLock<Vec<GfPoly<'f>>>,
}

impl<'f> ReedSolomonEncoder<'f> {
    pub fn new(field: &'f GaloisField) -> Self {
        Self {
            field,
            cached_generators: RwLock::new(vec![GfPoly::one(field)]),
        }
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    /// Generator of degree `degree`: prod_{i<degree} (x - alpha^(i + base)).
    fn build_generator(&self, degree: usize) -> Result<GfPoly<'f>> {
        {
            let cached = self
                .cached_generators
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(generator) = cached.get(degree) {
                return Ok(generator.clone());
            }
        }
        let mut cached = self
            .cached_generators
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while cached.len() <= degree {
            let d = cached.len();
            let last = &cached[d - 1];
            let factor = GfPoly::new(
                self.field,
                &[1, self.field.exp(d - 1 + self.field.generator_base())],
            )?;
            let next = last.multiply(&factor);
            cached.push(next);
        }
        Ok(cached[degree].clone())
    }

    /// Overwrite the last `ec_count` symbols of `to_encode` with check symbols
    /// computed over the leading data symbols.
    pub fn encode(&self, to_encode: &mut [u16], ec_count: usize) -> Result<()> {
        if ec_count == 0 {
            return Err(CodecError::InvalidArgument(
                "no error correction symbols requested".into(),
            ));
        }
        if to_encode.len() <= ec_count {
            return Err(CodecError::InvalidArgument(format!(
                "no data symbols: {} total, {} for error correction",
                to_encode.len(),
                ec_count
            )));
        }
        let data_len = to_encode.len() - ec_count;
        let generator = self.build_generator(ec_count)?;
        let info = GfPoly::new(self.field, &to_encode[..data_len])?.multiply_by_monomial(ec_count, 1);
        let (_, remainder) = info.divide(&generator)?;
        let coefficients = remainder.coefficients();
        let num_zero = ec_count - coefficients.len();
        let tail = &mut to_encode[data_len..];
        tail[..num_zero].fill(0);
        tail[num_zero..].copy_from_slice(coefficients);
        Ok(())
    }

    /// Check symbols for a byte block.
    pub fn ec_codewords(&self, data: &[u8], ec_count: usize) -> Result<Vec<u8>> {
        let mut buffer: Vec<u16> = data.iter().map(|&b| b as u16).collect();
        buffer.resize(data.len() + ec_count, 0);
        self.encode(&mut buffer, ec_count)?;
        Ok(buffer[data.len()..].iter().map(|&s| s as u8).collect())
    }
}

impl ReedSolomonEncoder<'static> {
    /// Shared encoder for the QR field.
    pub fn qr_code() -> &'static ReedSolomonEncoder<'static> {
        static ENCODER: OnceLock<ReedSolomonEncoder<'static>> = OnceLock::new();
        ENCODER.get_or_init(|| ReedSolomonEncoder::new(GaloisField::qr_code()))
    }

    /// Shared encoder for the Data Matrix field.
    pub fn data_matrix() -> &'static ReedSolomonEncoder<'static> {
        static ENCODER: OnceLock<ReedSolomonEncoder<'static>> = OnceLock::new();
        ENCODER.get_or_init(|| ReedSolomonEncoder::new(GaloisField::data_matrix()))
    }
}

/// Reed-Solomon decoder
pub struct ReedSolomonDecoder<'f> {
    field: &'f GaloisField,
}

impl<'f> ReedSolomonDecoder<'f> {
    pub fn new(field: &'f GaloisField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    /// Correct `received` in place; the last `ec_count` symbols are check symbols.
    ///
    /// Returns the number of symbols repaired. Any failure to find a consistent
    /// error pattern is reported as [`CodecError::TooManyErrors`], and the buffer
    /// is only trusted if its syndromes vanish after correction.
    pub fn decode(&self, received: &mut [u16], ec_count: usize) -> Result<usize> {
        if ec_count == 0 || ec_count >= received.len() {
            return Err(CodecError::InvalidArgument(format!(
                "{} check symbols for a block of {}",
                ec_count,
                received.len()
            )));
        }
        let Some(syndrome) = self.syndromes(received, ec_count)? else {
            return Ok(0);
        };
        let corrected = self
            .correct(received, syndrome, ec_count)
            .map_err(|_| CodecError::TooManyErrors)?;
        if self.syndromes(received, ec_count)?.is_some() {
            return Err(CodecError::TooManyErrors);
        }
        trace!(corrected, field = self.field.name(), "reed-solomon block repaired");
        Ok(corrected)
    }

    /// Byte-block convenience wrapper around [`Self::decode`].
    pub fn decode_bytes(&self, received: &mut [u8], ec_count: usize) -> Result<usize> {
        let mut buffer: Vec<u16> = received.iter().map(|&b| b as u16).collect();
        let corrected = self.decode(&mut buffer, ec_count)?;
        for (dst, &src) in received.iter_mut().zip(buffer.iter()) {
            *dst = src as u8;
        }
        Ok(corrected)
    }

    /// Syndrome polynomial, or `None` when every syndrome is zero.
    fn syndromes(&self, received: &[u16], ec_count: usize) -> Result<Option<GfPoly<'f>>> {
        let poly = GfPoly::new(self.field, received)?;
        let mut coefficients = vec![0u16; ec_count];
        let mut no_error = true;
        for i in 0..ec_count {
            let eval = poly.evaluate_at(self.field.exp(i + self.field.generator_base()));
            coefficients[ec_count - 1 - i] = eval;
            if eval != 0 {
                no_error = false;
            }
        }
        if no_error {
            return Ok(None);
        }
        Ok(Some(GfPoly::new(self.field, &coefficients)?))
    }

    fn correct(&self, received: &mut [u16], syndrome: GfPoly<'f>, ec_count: usize) -> Result<usize> {
        let (sigma, omega) = self.run_euclidean_algorithm(
            GfPoly::monomial(self.field, ec_count, 1),
            syndrome,
            ec_count,
        )?;
        let locations = self.find_error_locations(&sigma)?;
        let magnitudes = self.find_error_magnitudes(&omega, &locations)?;
        for (&location, &magnitude) in locations.iter().zip(magnitudes.iter()) {
            let log = self.field.log(location)?;
            if log >= received.len() {
                return Err(CodecError::TooManyErrors);
            }
            let position = received.len() - 1 - log;
            received[position] = GaloisField::add(received[position], magnitude);
        }
        Ok(locations.len())
    }

    fn run_euclidean_algorithm(
        &self,
        a: GfPoly<'f>,
        b: GfPoly<'f>,
        r_degree: usize,
    ) -> Result<(GfPoly<'f>, GfPoly<'f>)> {
        let (a, b) = if a.degree() < b.degree() { (b, a) } else { (a, b) };

        let mut r_last = a;
        let mut r = b;
        let mut t_last = GfPoly::zero(self.field);
        let mut t = GfPoly::one(self.field);

        // Stop once r(x) has degree below R/2
        while 2 * r.degree() >= r_degree {
            let r_last_last = std::mem::replace(&mut r_last, r);
            let t_last_last = std::mem::replace(&mut t_last, t);

            if r_last.is_zero() {
                return Err(CodecError::TooManyErrors);
            }
            r = r_last_last;
            let mut q = GfPoly::zero(self.field);
            let denominator_leading_term = r_last.coefficient(r_last.degree());
            let dlt_inverse = self.field.inverse(denominator_leading_term)?;
            while r.degree() >= r_last.degree() && !r.is_zero() {
                let degree_diff = r.degree() - r_last.degree();
                let scale = self.field.multiply(r.coefficient(r.degree()), dlt_inverse);
                q = q.add_or_subtract(&GfPoly::monomial(self.field, degree_diff, scale));
                r = r.add_or_subtract(&r_last.multiply_by_monomial(degree_diff, scale));
            }

            t = q.multiply(&t_last).add_or_subtract(&t_last_last);

            if r.degree() >= r_last.degree() && !r.is_zero() {
                return Err(CodecError::TooManyErrors);
            }
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(CodecError::TooManyErrors);
        }
        let inverse = self.field.inverse(sigma_tilde_at_zero)?;
        Ok((t.multiply_scalar(inverse), r.multiply_scalar(inverse)))
    }

    /// Chien search: reciprocals of the roots of the error locator.
    fn find_error_locations(&self, error_locator: &GfPoly<'f>) -> Result<Vec<u16>> {
        let num_errors = error_locator.degree();
        if num_errors == 1 {
            return Ok(vec![error_locator.coefficient(1)]);
        }
        let mut result = Vec::with_capacity(num_errors);
        for i in 1..self.field.size() as u16 {
            if result.len() >= num_errors {
                break;
            }
            if error_locator.evaluate_at(i) == 0 {
                result.push(self.field.inverse(i)?);
            }
        }
        if result.len() != num_errors {
            return Err(CodecError::TooManyErrors);
        }
        Ok(result)
    }

    /// Forney's formula.
    fn find_error_magnitudes(
        &self,
        error_evaluator: &GfPoly<'f>,
        error_locations: &[u16],
    ) -> Result<Vec<u16>> {
        let mut result = Vec::with_capacity(error_locations.len());
        for (i, &location) in error_locations.iter().enumerate() {
            let xi_inverse = self.field.inverse(location)?;
            let mut denominator = 1u16;
            for (j, &other) in error_locations.iter().enumerate() {
                if i != j {
                    // 1 + X_j / X_i, written without a field addition
                    let term = self.field.multiply(other, xi_inverse);
                    let term_plus_1 = if term & 1 == 0 { term | 1 } else { term & !1 };
                    denominator = self.field.multiply(denominator, term_plus_1);
                }
            }
            let mut magnitude = self.field.multiply(
                error_evaluator.evaluate_at(xi_inverse),
                self.field.inverse(denominator)?,
            );
            if self.field.generator_base() != 0 {
                magnitude = self.field.multiply(magnitude, xi_inverse);
            }
            result.push(magnitude);
        }
        Ok(result)
    }
}
