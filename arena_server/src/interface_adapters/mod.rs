// Interface adapters: wire protocol, codec and network handling.

pub mod codec;
pub mod net;
pub mod protocol;
pub mod state;
