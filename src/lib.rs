//! dialog-row
//!
//! Layout, animation, gesture and draw-command generation for one row of a
//! chat client's conversation list, plus a terminal preview host.
//!
//! The presentation core (`layout`, `animation`, `gesture`, `render`) is
//! pure and never fails. `controller` ties it to a host through clock,
//! provider and delegate seams. `config`, `logging`, `source` and `view`
//! form the impure shell used by the preview binary.

pub mod animation;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod source;
pub mod view;
