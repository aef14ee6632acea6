fn main() {
    if let Err(err) = netwulf_render::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
