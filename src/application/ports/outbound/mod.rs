//! Outbound ports - Interfaces that the application requires from external systems

mod board_feed_port;
mod random_port;

pub use board_feed_port::{BoardFeedError, BoardFeedPort};
pub use random_port::RandomPort;
#[cfg(test)]
pub use random_port::FixedRandomPort;
