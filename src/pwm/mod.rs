mod dtm_pwm_hl;
mod mode;
mod pwm_calc;
mod pwm_channel;
mod pwm_config;
mod pwm_hl_ext;

pub use dtm_pwm_hl::DtmPwmHl;
pub use mode::Mode;
pub use pwm_calc::{Compare, Limits};
pub use pwm_channel::{ActiveState, ChannelPair};
pub use pwm_config::PwmHlConfig;
pub use pwm_hl_ext::PwmHlInterface;
