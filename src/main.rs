fn main() {
    if let Err(err) = syllabot::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
