use std::ops::{Index, IndexMut};

use crate::{AudioParams, Error, Result};

/// A fixed-length run of samples, the currency passed between components.
///
/// The length is set from [`AudioParams::block_size`] at construction and
/// never changes. Arithmetic between two blocks checks that the lengths
/// agree; division leaves an element untouched when its divisor is zero so
/// that nothing in a signal chain can blow up mid-block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    samples: Vec<f64>,
}

impl Block {
    /// A silent block of the configured size.
    pub fn new(params: &AudioParams) -> Self {
        Self::filled(params, 0.0)
    }

    pub fn filled(params: &AudioParams, value: f64) -> Self {
        Self {
            samples: vec![value; params.block_size()],
        }
    }

    /// Wrap existing samples, which must be exactly one block long.
    pub fn from_vec(params: &AudioParams, samples: Vec<f64>) -> Result<Self> {
        if samples.len() != params.block_size() {
            return Err(Error::SizeMismatch {
                expected: params.block_size(),
                actual: samples.len(),
            });
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.samples.iter()
    }

    pub fn fill(&mut self, value: f64) {
        self.samples.fill(value);
    }

    /// Copy another block's samples into this one.
    ///
    /// Lengths are equal for blocks built from the same parameters; a shorter
    /// source only overwrites its own prefix.
    pub fn copy_from(&mut self, other: &Block) {
        let n = self.len().min(other.len());
        self.samples[..n].copy_from_slice(&other.samples[..n]);
    }

    fn check_len(&self, other: &Block) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::SizeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Block, f: impl Fn(f64, f64) -> f64) -> Result<Block> {
        self.check_len(other)?;
        let samples = self
            .samples
            .iter()
            .zip(&other.samples)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Block { samples })
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Block {
        Block {
            samples: self.samples.iter().map(|&x| f(x)).collect(),
        }
    }

    pub fn add(&self, other: &Block) -> Result<Block> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Block) -> Result<Block> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn multiply(&self, other: &Block) -> Result<Block> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise division; elements over a zero divisor keep their value.
    pub fn divide_guarded(&self, other: &Block) -> Result<Block> {
        self.zip_with(other, |a, b| if b == 0.0 { a } else { a / b })
    }

    pub fn add_assign(&mut self, other: &Block) -> Result<()> {
        self.check_len(other)?;
        for (a, &b) in self.samples.iter_mut().zip(&other.samples) {
            *a += b;
        }
        Ok(())
    }

    pub fn multiply_assign(&mut self, other: &Block) -> Result<()> {
        self.check_len(other)?;
        for (a, &b) in self.samples.iter_mut().zip(&other.samples) {
            *a *= b;
        }
        Ok(())
    }

    pub fn add_scalar(&self, value: f64) -> Block {
        self.map(|x| x + value)
    }

    pub fn sub_scalar(&self, value: f64) -> Block {
        self.map(|x| x - value)
    }

    pub fn scale(&self, gain: f64) -> Block {
        self.map(|x| x * gain)
    }

    /// Divide every element by `divisor`; a zero divisor returns a copy.
    pub fn divide_scalar_guarded(&self, divisor: f64) -> Block {
        if divisor == 0.0 {
            return self.clone();
        }
        self.map(|x| x / divisor)
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()))
    }

    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|x| x * x).sum();
        (sum / self.samples.len() as f64).sqrt()
    }
}

impl Index<usize> for Block {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.samples[index]
    }
}

impl IndexMut<usize> for Block {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.samples[index]
    }
}

impl AsRef<[f64]> for Block {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// A parameter for one processing call: a constant, or one value per sample.
#[derive(Debug, Clone, Copy)]
pub enum Control<'a> {
    Fixed(f64),
    Modulated(&'a Block),
}

impl Control<'_> {
    /// Value at sample `index`. A modulation block shorter than the output
    /// holds its last value.
    #[inline]
    pub fn at(&self, index: usize) -> f64 {
        match self {
            Control::Fixed(value) => *value,
            Control::Modulated(block) => {
                let slice = block.as_slice();
                match slice.get(index) {
                    Some(&v) => v,
                    None => slice.last().copied().unwrap_or(0.0),
                }
            }
        }
    }

    pub fn is_modulated(&self) -> bool {
        matches!(self, Control::Modulated(_))
    }
}

impl From<f64> for Control<'_> {
    fn from(value: f64) -> Self {
        Control::Fixed(value)
    }
}

impl<'a> From<&'a Block> for Control<'a> {
    fn from(block: &'a Block) -> Self {
        Control::Modulated(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(block_size: usize) -> AudioParams {
        AudioParams::new(44_100, 1, block_size).unwrap()
    }

    fn ramp(p: &AudioParams) -> Block {
        let samples = (0..p.block_size()).map(|i| i as f64).collect();
        Block::from_vec(p, samples).unwrap()
    }

    #[test]
    fn new_block_has_configured_length() {
        let block = Block::new(&params(128));
        assert_eq!(block.len(), 128);
        assert!(block.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn from_vec_checks_length() {
        let p = params(4);
        assert!(matches!(
            Block::from_vec(&p, vec![0.0; 3]),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn elementwise_arithmetic() {
        let p = params(4);
        let a = ramp(&p);
        let b = Block::filled(&p, 2.0);

        assert_eq!(a.add(&b).unwrap().as_slice(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.sub(&b).unwrap().as_slice(), &[-2.0, -1.0, 0.0, 1.0]);
        assert_eq!(a.multiply(&b).unwrap().as_slice(), &[0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn guarded_division_leaves_zero_divisors_alone() {
        let p = params(4);
        let a = Block::filled(&p, 6.0);
        let divisor = Block::from_vec(&p, vec![2.0, 0.0, 3.0, 0.0]).unwrap();

        let out = a.divide_guarded(&divisor).unwrap();
        assert_eq!(out.as_slice(), &[3.0, 6.0, 2.0, 6.0]);

        assert_eq!(a.divide_scalar_guarded(0.0), a);
        assert_eq!(a.divide_scalar_guarded(3.0).as_slice(), &[2.0; 4]);
    }

    #[test]
    fn mismatched_blocks_are_rejected() {
        let a = Block::new(&params(4));
        let b = Block::new(&params(8));
        assert!(a.add(&b).is_err());
        assert!(a.clone().add_assign(&b).is_err());
    }

    #[test]
    fn control_reads_fixed_and_modulated() {
        let p = params(4);
        let block = ramp(&p);
        let fixed = Control::from(0.5);
        let modulated = Control::from(&block);

        assert_eq!(fixed.at(3), 0.5);
        assert_eq!(modulated.at(2), 2.0);
        assert_eq!(modulated.at(10), 3.0);
        assert!(modulated.is_modulated());
    }

    #[test]
    fn peak_and_rms() {
        let p = params(4);
        let block = Block::from_vec(&p, vec![1.0, -1.0, 1.0, -1.0]).unwrap();
        assert_eq!(block.peak(), 1.0);
        assert!((block.rms() - 1.0).abs() < 1e-12);
    }
}
