//! Random byte source used for dice rolls
//!
//! Rolls consume raw bytes rather than ranged integers: the byte-to-face
//! mapping lives in the domain so every client computes the same faces.

/// Source of random bytes.
///
/// # Implementations
///
/// - `OsRandomAdapter` in infrastructure (production, operating system CSPRNG)
/// - `FixedRandomPort` for deterministic testing
pub trait RandomPort: Send + Sync {
    /// Fill `buf` with random bytes
    fn fill_bytes(&self, buf: &mut [u8]);

    /// Allocate and return `len` random bytes
    fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.fill_bytes(&mut buf);
        buf
    }
}

/// Fixed random port for deterministic testing.
///
/// Returns bytes from a provided sequence, cycling when exhausted.
#[cfg(test)]
#[derive(Debug)]
pub struct FixedRandomPort {
    values: Vec<u8>,
    index: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FixedRandomPort {
    pub fn new(values: Vec<u8>) -> Self {
        assert!(!values.is_empty(), "FixedRandomPort needs at least one value");
        Self {
            values,
            index: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A port that always yields the same byte
    pub fn constant(value: u8) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
impl RandomPort for FixedRandomPort {
    fn fill_bytes(&self, buf: &mut [u8]) {
        for slot in buf.iter_mut() {
            let idx = self
                .index
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            *slot = self.values[idx % self.values.len()];
        }
    }
}
