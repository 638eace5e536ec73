//! CLI tool to issue or verify credential tokens offline.
//!
//! Usage:
//!   cargo run --bin issue-token -- --api-key <key> [--api-secret <secret>]
//!   cargo run --bin issue-token -- --verify <token>
//!
//! When `--api-secret` is omitted the secret is read from `KRAKEN_API_SECRET`
//! so it does not end up in shell history.

use std::env;

use secrecy::ExposeSecret;

use kraken_proxy_lib::config::Config;
use kraken_proxy_lib::crypto::ServerSecret;
use kraken_proxy_lib::models::CredentialPair;
use kraken_proxy_lib::services::CredentialTokenService;

fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut api_key: Option<String> = None;
    let mut api_secret: Option<String> = None;
    let mut verify: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--api-key" | "-k" => {
                i += 1;
                if i < args.len() {
                    api_key = Some(args[i].clone());
                }
            }
            "--api-secret" | "-s" => {
                i += 1;
                if i < args.len() {
                    api_secret = Some(args[i].clone());
                }
            }
            "--verify" | "-v" => {
                i += 1;
                if i < args.len() {
                    verify = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let secret = ServerSecret::from_passphrase(config.app_secret.expose_secret());
    if secret.was_padded() {
        eprintln!("Warning: APP_SECRET is shorter than 32 bytes and has been padded.");
    }
    let tokens = CredentialTokenService::new(&secret);

    if let Some(token) = verify {
        match tokens.redeem(&token) {
            Ok(pair) => {
                println!("Token is valid for API key {}", pair.api_key);
            }
            Err(e) => {
                eprintln!("Token is invalid: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let api_key = match api_key {
        Some(k) if !k.is_empty() => k,
        _ => {
            eprintln!("Error: --api-key is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let api_secret = match api_secret.or_else(|| env::var("KRAKEN_API_SECRET").ok()) {
        Some(s) if !s.is_empty() => s,
        _ => {
            eprintln!("Error: --api-secret or KRAKEN_API_SECRET is required");
            std::process::exit(1);
        }
    };

    match tokens.issue(&CredentialPair::new(api_key, api_secret)) {
        Ok(token) => println!("{}", token),
        Err(e) => {
            eprintln!("Error issuing token: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: issue-token --api-key <key> [--api-secret <secret>]");
    eprintln!("       issue-token --verify <token>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --api-key, -k     Kraken API key to seal");
    eprintln!("  --api-secret, -s  Kraken API secret (default: $KRAKEN_API_SECRET)");
    eprintln!("  --verify, -v      Check that a token opens with the configured APP_SECRET");
    eprintln!("  --help, -h        Show this help");
    eprintln!();
}
