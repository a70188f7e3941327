pub mod bar;
pub mod bindings;
mod client;
mod config;
pub mod keysym;
mod layout;
mod monitor;
pub mod prefs;
mod rules_engine;
mod state;
mod tag;

pub use bindings::{Bindings, ButtonBinding, ClickTarget, KeyBinding, Modifiers};
pub use client::*;
pub use config::*;
pub use layout::*;
pub use monitor::*;
pub use rules_engine::*;
pub use state::*;
pub use tag::*;
