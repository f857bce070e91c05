pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const DEFAULT_DIFFICULTY: usize = 4;
pub const GENESIS_PAYLOAD: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const DIVIDER: &str = "-----------------------------";
pub const DEMO_PAYLOADS: [&str; 3] = ["Block 1 Data", "Block 2 Data", "Block 3 Data"];
