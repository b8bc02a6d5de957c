#![forbid(unsafe_code)]

fn main() {
    if let Err(e) = a8_headless::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
