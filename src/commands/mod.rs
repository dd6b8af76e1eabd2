pub mod chains;
pub mod deposit;
pub mod rpc;
