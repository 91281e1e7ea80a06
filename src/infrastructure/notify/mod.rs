pub mod noop;
pub mod telegram;
