use crate::{
    errors::CodecError,
    map::{boxed_path, MapWitness},
    tree::TreeWitness,
    types::{PathNode, MAP_HEIGHT, TREE_DEPTH},
};

const NODE_LEN: usize = 33; // sibling[32] || is_left u8

#[inline]
#[must_use]
pub const fn le32(x: u32) -> [u8; 4] {
    x.to_le_bytes()
}

fn encode_path(nodes: &[PathNode]) -> Vec<u8> {
    let mut v = Vec::with_capacity(4 + nodes.len() * NODE_LEN);
    v.extend_from_slice(&le32(u32::try_from(nodes.len()).unwrap_or(0)));
    for n in nodes {
        v.extend_from_slice(&n.sibling);
        v.push(u8::from(n.is_left));
    }
    v
}

fn decode_path(b: &[u8], expected_count: usize) -> Result<Vec<PathNode>, CodecError> {
    if b.len() < 4 { return Err(CodecError::DecodeError("short path")); }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&b[..4]);
    let count = u32::from_le_bytes(len_bytes) as usize;
    if count != expected_count {
        return Err(CodecError::InvalidLength { expected: expected_count, got: count });
    }
    let body = &b[4..];
    if body.len() != count * NODE_LEN {
        return Err(CodecError::InvalidLength { expected: 4 + count * NODE_LEN, got: b.len() });
    }
    body.chunks_exact(NODE_LEN)
        .map(|chunk| {
            let mut sibling = [0u8; 32];
            sibling.copy_from_slice(&chunk[..32]);
            let is_left = match chunk[32] {
                0 => false,
                1 => true,
                _ => return Err(CodecError::DecodeError("direction byte not 0/1")),
            };
            Ok(PathNode { sibling, is_left })
        })
        .collect()
}

/// Canonical `TreeWitness`: `LE32(8)` || 8 * (sibling[32] || `is_left`)
#[must_use]
pub fn encode_tree_witness(w: &TreeWitness) -> Vec<u8> {
    encode_path(&w.path)
}

/// Decode a tree witness from bytes.
///
/// # Errors
///
/// Returns `CodecError` for short input, a count other than 8, trailing bytes or a bad
/// direction byte.
pub fn decode_tree_witness(b: &[u8]) -> Result<TreeWitness, CodecError> {
    let nodes = decode_path(b, TREE_DEPTH)?;
    let got = nodes.len();
    let path: [PathNode; TREE_DEPTH] = nodes
        .try_into()
        .map_err(|_| CodecError::InvalidLength { expected: TREE_DEPTH, got })?;
    Ok(TreeWitness::new(path))
}

/// Canonical `MapWitness`: `LE32(256)` || 256 * (sibling[32] || `is_left`)
#[must_use]
pub fn encode_map_witness(w: &MapWitness) -> Vec<u8> {
    encode_path(&w.path[..])
}

/// Decode a map witness from bytes.
///
/// # Errors
///
/// Returns `CodecError` for short input, a count other than 256, trailing bytes or a bad
/// direction byte.
pub fn decode_map_witness(b: &[u8]) -> Result<MapWitness, CodecError> {
    let nodes = decode_path(b, MAP_HEIGHT)?;
    Ok(MapWitness::new(boxed_path(nodes)?))
}
