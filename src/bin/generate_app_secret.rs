//! CLI tool to generate an APP_SECRET.
//!
//! Usage:
//!   cargo run --bin generate-app-secret

/// Random bytes in the secret; hex encoding doubles the length to 48 characters.
const SECRET_BYTES: usize = 24;

fn main() {
    if std::env::args().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let random_bytes: [u8; SECRET_BYTES] = rand::random();
    let secret = hex::encode(random_bytes);

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  APP_SECRET Generated");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  APP_SECRET={}", secret);
    println!();
    println!("  ⚠️  Only the first 32 bytes are used as the AES-256 key.");
    println!("  ⚠️  Changing APP_SECRET invalidates every issued token.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: generate-app-secret");
    eprintln!();
    eprintln!("Prints a random secret suitable for the APP_SECRET environment variable.");
    eprintln!();
}
