//! Operating system randomness for dice rolls

use rand::rngs::OsRng;
use rand::RngCore;

use crate::application::ports::outbound::RandomPort;

/// Random bytes straight from the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomAdapter;

impl RandomPort for OsRandomAdapter {
    fn fill_bytes(&self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}
