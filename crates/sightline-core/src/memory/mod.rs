mod addr;
pub mod layout;
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use addr::RemoteAddr;
pub use process::*;
pub use reader::{FromRemote, MemoryReader, ReadMemory};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
