//! Bootstrap, register two participants and submit messages end to end.
//!
//! Run with `RUST_LOG=debug` to see the controller's trace output.

use commitgate::{
    ser::{decode_map_witness, decode_tree_witness, encode_map_witness, encode_tree_witness},
    AddressKey, AddressTree, AdmissionConfig, AdmissionController, Message, MessageMap, Salt,
};
use ed25519_dalek::SigningKey;
use rand_core::OsRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let ctl = AdmissionController::new(AdmissionConfig::default())?;
    let salt = Salt::random();
    ctl.bootstrap(&salt)?;

    // Caller-side copies of the collections.
    let mut tree = AddressTree::new();
    let mut map = MessageMap::new();

    let alice = SigningKey::generate(&mut OsRng).verifying_key();
    let bob = SigningKey::generate(&mut OsRng).verifying_key();
    // `seen` is the snapshot both local copies reflect.
    let mut seen = ctl.commitments();
    for (slot, who) in [(0usize, &alice), (1, &bob)] {
        tree.set_leaf(slot, AddressKey::of(who))?;
        ctl.register(&seen, &salt, &tree.witness(slot)?, who)?;
        seen = ctl.commitments();
    }

    // Witnesses cross the boundary as bytes.
    let key = AddressKey::of(&alice);
    let tw = decode_tree_witness(&encode_tree_witness(&tree.witness(0)?))?;
    let mw = decode_map_witness(&encode_map_witness(&map.witness(&key)))?;
    let message = Message::from(0b1101_0110_0000u64);
    let flag = ctl.submit(&seen, &alice, &tw, &message, &mw)?;
    map.set(key, message);
    seen = ctl.commitments();
    println!("accepted with flag {flag:?}");

    let rejected = Message::from(0b11_1111u64);
    let mw = map.witness(&AddressKey::of(&bob));
    if let Err(e) = ctl.submit(&seen, &bob, &tree.witness(1)?, &rejected, &mw) {
        println!("refused: {e} ({:?})", e.kind());
    }

    let st = ctl.commitments();
    println!("address root   {}", st.address_root);
    println!("message root   {}", st.message_root);
    println!("registrations  {}", st.address_counter);
    println!("messages       {}", st.message_counter);
    for rec in ctl.events() {
        println!("event #{} on {}", rec.seq, rec.event.channel().name());
    }
    Ok(())
}
