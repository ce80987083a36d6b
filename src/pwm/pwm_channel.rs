#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveState {
    Low,
    High,
}

impl ActiveState {
    pub fn inverted(self) -> Self {
        match self {
            ActiveState::Low => ActiveState::High,
            ActiveState::High => ActiveState::Low,
        }
    }
}

/// Timer channel driving the top switch (ccx) and the timer channel whose
/// pin carries the complementary bottom output (coutx).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelPair {
    pub top: u8,
    pub bottom: u8,
}

impl ChannelPair {
    pub const fn new(top: u8, bottom: u8) -> Self {
        Self { top, bottom }
    }
}
