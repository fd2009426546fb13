//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod eink;
pub mod system;

pub use eink::{eink_task, ChannelAuthority, EinkService};
pub use system::system_task;
