#![no_main]

use libfuzzer_sys::fuzz_target;
use commitgate::{
    ser::decode_tree_witness, AddressKey, AddressTree, AdmissionConfig, AdmissionController,
    Message, MessageMap, Salt,
};
use ed25519_dalek::SigningKey;

const TREE_WITNESS_LEN: usize = 4 + 8 * 33;

fuzz_target!(|data: &[u8]| {
    // Need a tree witness plus a 32-byte message
    if data.len() < TREE_WITNESS_LEN + 32 { return; }

    let Ok(tw) = decode_tree_witness(&data[..TREE_WITNESS_LEN]) else { return };
    let mut msg = [0u8; 32];
    msg.copy_from_slice(&data[TREE_WITNESS_LEN..TREE_WITNESS_LEN + 32]);
    let message = Message(msg);

    let salt = Salt([7u8; 32]);
    let ctl = AdmissionController::new(AdmissionConfig::default()).unwrap();
    ctl.bootstrap(&salt).unwrap();
    let a = SigningKey::from_bytes(&[1u8; 32]).verifying_key();
    let mut tree = AddressTree::new();
    tree.set_leaf(0, AddressKey::of(&a)).unwrap();
    ctl.register(&ctl.commitments(), &salt, &tree.witness(0).unwrap(), &a).unwrap();

    let before = ctl.commitments();
    let mw = MessageMap::new().witness(&AddressKey::of(&a));
    // Any refusal must leave the commitments untouched
    if ctl.submit(&before, &a, &tw, &message, &mw).is_err() {
        assert_eq!(ctl.commitments(), before);
        assert!(ctl.events().is_empty());
    }
});
