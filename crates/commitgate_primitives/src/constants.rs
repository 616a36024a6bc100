#![forbid(unsafe_code)]

/// Genesis value of every committed root.
pub const GENESIS_ROOT: [u8; 32] = [0u8; 32];

/// Sentinel stored in unoccupied leaves.
pub const EMPTY_LEAF: [u8; 32] = [0u8; 32];

pub const TAG_ADDRESS_KEY: &str = "commitgate.address.key";
pub const TAG_SALT: &str = "commitgate.salt";

pub const TAG_TREE_LEAF: &str = "commitgate.tree.leaf";
pub const TAG_TREE_NODE: &str = "commitgate.tree.node";

pub const TAG_MAP_LEAF: &str = "commitgate.map.leaf";
pub const TAG_MAP_NODE: &str = "commitgate.map.node";

/// Every tag accepted by [`crate::h_tag`].
pub const ALL_TAGS: &[&str] = &[
    TAG_ADDRESS_KEY,
    TAG_SALT,
    TAG_TREE_LEAF,
    TAG_TREE_NODE,
    TAG_MAP_LEAF,
    TAG_MAP_NODE,
];
