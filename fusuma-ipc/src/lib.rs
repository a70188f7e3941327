pub mod action;
pub mod command;

pub use action::Action;
pub use command::{BindingInfo, Command, MonitorInfo, Response, StateInfo, WindowInfo};
