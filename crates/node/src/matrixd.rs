fn main() {
    if let Err(err) = matrixd::run_entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
