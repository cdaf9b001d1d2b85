fn main() {
    if let Err(err) = tagdex::run() {
        eprintln!("{}", tagdex::format_error(&err));
        std::process::exit(1);
    }
}
