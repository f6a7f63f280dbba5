//! Devnet key and policy generator.
//!
//! Prints freshly generated key material to stdout as JSON. The secret keys
//! are included - this tool is for devnet setup only.
//!
//! Usage: `quorum-keygen [key_count] [threshold]` (defaults: 3 2)

use quorum_core::domain::MultisigPolicy;
use quorum_core::foundation::SigningKeypair;
use quorum_core::infrastructure::logging::init_logger;
use serde::Serialize;

#[derive(Serialize)]
struct HolderOut {
    index: u8,
    public_key_hex: String,
    secret_key_hex: String,
}

#[derive(Serialize)]
struct Output {
    key_count: u8,
    threshold: u8,
    account_id: String,
    holders: Vec<HolderOut>,
}

fn parse_arg(value: Option<String>, default: u8, name: &str) -> u8 {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| panic!("invalid {name}: {raw}")),
        None => default,
    }
}

fn main() {
    init_logger(None, "info");

    let mut args = std::env::args().skip(1);
    let key_count = parse_arg(args.next(), 3, "key_count");
    let threshold = parse_arg(args.next(), 2, "threshold");

    let holders: Vec<SigningKeypair> = (0..key_count).map(|_| SigningKeypair::generate()).collect();
    let policy = MultisigPolicy::new(holders.iter().map(|holder| holder.public_key()).collect(), threshold)
        .expect("invalid key_count/threshold combination");

    let output = Output {
        key_count,
        threshold,
        account_id: policy.account_id().to_string(),
        holders: holders
            .iter()
            .enumerate()
            .map(|(index, holder)| HolderOut {
                index: index as u8,
                public_key_hex: hex::encode(holder.public_key().as_bytes()),
                secret_key_hex: hex::encode(holder.secret_bytes().as_ref()),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output).expect("serialize keygen output"));
}
