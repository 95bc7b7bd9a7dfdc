pub mod interface;
pub mod mac;
pub mod node;
pub mod range;
